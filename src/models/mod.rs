// Models module
// Domain types shared by the handlers and the database layer

pub mod lead;
pub mod proposal;

pub use lead::{Lead, LeadPrepNote, PrepStatus, ResetLeadPrepRequest, ResetLeadPrepResponse};
pub use proposal::{SharedProposal, VerifyPasswordRequest};
