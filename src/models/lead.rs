use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of automated preparation/enrichment on a lead.
/// Stored as lowercase text in the datastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl PrepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrepStatus::Pending => "pending",
            PrepStatus::InProgress => "in_progress",
            PrepStatus::Complete => "complete",
            PrepStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PrepStatus::Pending),
            "in_progress" => Some(PrepStatus::InProgress),
            "complete" => Some(PrepStatus::Complete),
            "failed" => Some(PrepStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead row as held by the external datastore. Only the fields touched by
/// the reset flow are modeled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub prep_status: PrepStatus,
    pub enrichment_status: PrepStatus,
    pub prep_summary: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A preparation note attached to a lead. Only auto-generated notes are ever
/// eligible for bulk deletion; manually authored notes are never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadPrepNote {
    pub id: Uuid,
    pub lead_id: String,
    pub is_auto_generated: bool,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Body of the reset endpoint. The whole body is optional, and so is the
/// `lead_id` inside it: without one, the reset applies to every lead.
#[derive(Debug, Default, Deserialize)]
pub struct ResetLeadPrepRequest {
    pub lead_id: Option<String>,
}

impl ResetLeadPrepRequest {
    /// Lenient body parse: an empty or malformed body is treated as an empty
    /// object rather than rejected.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ResetLeadPrepResponse {
    pub success: bool,
    pub reset_count: u64,
    pub lead_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prep_status_text_round_trip() {
        for status in [
            PrepStatus::Pending,
            PrepStatus::InProgress,
            PrepStatus::Complete,
            PrepStatus::Failed,
        ] {
            assert_eq!(PrepStatus::from_str(status.as_str()), Some(status));
        }

        assert_eq!(PrepStatus::from_str("done"), None);
        assert_eq!(PrepStatus::Pending.as_str(), "pending");
        assert_eq!(PrepStatus::InProgress.as_str(), "in_progress");
    }

    #[test]
    fn test_reset_request_parses_lead_id() {
        let request = ResetLeadPrepRequest::from_body(br#"{"lead_id": "L1"}"#);
        assert_eq!(request.lead_id.as_deref(), Some("L1"));
    }

    #[test]
    fn test_reset_request_tolerates_missing_body() {
        assert!(ResetLeadPrepRequest::from_body(b"").lead_id.is_none());
        assert!(ResetLeadPrepRequest::from_body(b"{}").lead_id.is_none());
    }

    #[test]
    fn test_reset_request_tolerates_malformed_json() {
        // Malformed JSON falls back to an empty object, no hard failure
        assert!(ResetLeadPrepRequest::from_body(b"not json at all").lead_id.is_none());
        assert!(ResetLeadPrepRequest::from_body(br#"{"lead_id": "#).lead_id.is_none());
    }

    #[test]
    fn test_lead_serialization_uses_snake_case_statuses() {
        let lead = Lead {
            id: "L1".to_string(),
            prep_status: PrepStatus::InProgress,
            enrichment_status: PrepStatus::Pending,
            prep_summary: None,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["prep_status"], "in_progress");
        assert_eq!(json["enrichment_status"], "pending");
        assert!(json["prep_summary"].is_null());
    }

    #[test]
    fn test_note_serialization() {
        let note = LeadPrepNote {
            id: Uuid::new_v4(),
            lead_id: "L1".to_string(),
            is_auto_generated: true,
            content: "Auto-generated enrichment summary".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["lead_id"], "L1");
        assert_eq!(json["is_auto_generated"], true);
    }

    #[test]
    fn test_reset_response_serialization() {
        let response = ResetLeadPrepResponse {
            success: true,
            reset_count: 3,
            lead_id: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["reset_count"], 3);
        assert!(json["lead_id"].is_null());
    }
}
