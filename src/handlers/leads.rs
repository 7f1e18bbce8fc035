// Lead preparation reset
// Clears auto-generated prep notes and sends matching leads back to
// `pending` so the enrichment pipeline picks them up again.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    models::lead::{ResetLeadPrepRequest, ResetLeadPrepResponse},
};

use super::AppState;

/// Reset lead preparation state
/// POST /functions/reset-lead-prep
///
/// Body is optional JSON `{ "lead_id": "..." }`; malformed bodies are treated
/// as empty. Without a `lead_id` the reset applies to every lead, which is
/// the intended administrative bulk path.
pub async fn reset_lead_prep(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = ResetLeadPrepRequest::from_body(&body);
    let lead_id = request.lead_id;

    info!(
        lead_id = lead_id.as_deref().unwrap_or("<all>"),
        "Resetting lead preparation"
    );

    // Notes must be gone before statuses flip back to pending; if the delete
    // fails the reset is not attempted.
    state.db.delete_auto_generated_notes(lead_id.as_deref()).await?;

    let reset_ids = state.db.reset_lead_prep(lead_id.as_deref()).await?;

    Ok((
        StatusCode::OK,
        Json(ResetLeadPrepResponse {
            success: true,
            reset_count: reset_ids.len() as u64,
            lead_id,
        }),
    ))
}

/// Method fallback for the reset route. axum's built-in 405 has an empty
/// body; callers expect the structured error shape.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
