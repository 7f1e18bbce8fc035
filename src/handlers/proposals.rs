// Shared proposal password verification
// Resolves a proposal by its public share token and checks a submitted
// password against the stored SHA-256 digest.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::{error::ApiError, models::proposal::VerifyPasswordRequest};

use super::AppState;

/// Verify a shared proposal password
/// POST /functions/verify-proposal-password
pub async fn verify_proposal_password(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    // An unparseable body is an unexpected fault, not a validation error:
    // field extraction happens before any field-level checks.
    let request: VerifyPasswordRequest = serde_json::from_slice(&body)
        .map_err(|e| anyhow::anyhow!("Malformed verification request body: {}", e))?;

    let (share_token, password) = request.validate().map_err(ApiError::Validation)?;

    // Lookup failures collapse into the same 404 as a missing or private
    // token, so an unauthenticated caller learns nothing about existence.
    let proposal = state
        .db
        .find_public_proposal(share_token)
        .await
        .map_err(|err| {
            warn!("Proposal lookup failed: {}", err);
            ApiError::not_found("Proposal not found")
        })?
        .ok_or_else(|| ApiError::not_found("Proposal not found"))?;

    if proposal.password_hash.is_none() {
        info!(proposal_id = %proposal.id, "Proposal has no password gate, access granted");
        return Ok((StatusCode::OK, Json(json!({ "success": true }))));
    }

    if proposal.accepts_password(password) {
        info!(proposal_id = %proposal.id, "Proposal password verified");
        Ok((StatusCode::OK, Json(json!({ "success": true }))))
    } else {
        Err(ApiError::unauthorized("Incorrect password"))
    }
}
