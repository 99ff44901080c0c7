//! Request bodies for the campaign API.

use serde::Serialize;
use uuid::Uuid;

/// Body of the availability lookup: which channels to check, under which
/// category, optionally scoped to a campaign so manual-check programs can
/// be matched to an existing request.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityRequest {
    pub channel_ids: Vec<String>,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<Uuid>,
}
