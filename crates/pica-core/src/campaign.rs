//! Campaign records and reference data as returned by the campaign service.
//!
//! ## Observed wire behavior
//!
//! The campaign detail payload is stable in shape but sparse: every field
//! below other than `id` may be `null` or missing entirely depending on how
//! far the campaign has progressed through the wizard, so everything is
//! `#[serde(default)]`. Category review fields are a special case — older
//! records carry `manual_category_review`, newer ones `review_status`, and
//! both use the literal string `"None"` (not JSON `null`) to mean unset.
//! [`CategoryState::review_status`] coalesces the pair; interpreting
//! `"None"` is left to the stage resolver, which owns that rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An advertising category a campaign can be classified under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// An insert print format (stock/size combination) offered by the print
/// price matrix service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertPrintType {
    pub id: String,
    pub name: String,
}

/// A program the user has selected into the campaign. Only `channel_id` is
/// guaranteed; the name is display sugar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedProgram {
    pub channel_id: String,
    #[serde(default)]
    pub program_name: Option<String>,
}

/// Category classification state persisted on a campaign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryState {
    #[serde(default)]
    pub self_declared_category: Option<String>,
    #[serde(default)]
    pub ai_predicted_category_id: Option<String>,
    #[serde(default)]
    pub confirmed_category_id: Option<String>,
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub manual_category_review: Option<String>,
    #[serde(default)]
    pub predicted_category_accepted: Option<bool>,
}

impl CategoryState {
    /// The effective review marker: `review_status` when set, else the
    /// legacy `manual_category_review` field.
    #[must_use]
    pub fn review_status(&self) -> Option<&str> {
        self.review_status
            .as_deref()
            .or(self.manual_category_review.as_deref())
    }
}

/// The persisted campaign record, as returned by the campaign detail
/// endpoint and by every stage-mutating endpoint.
///
/// `current_stage` is carried as the raw wire string; the wizard parses it
/// when resolving a step so that an unknown stage degrades to the default
/// branch instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignDetail {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub category: CategoryState,
    #[serde(default)]
    pub programs: Vec<SelectedProgram>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_detail_decodes_sparse_payload() {
        let detail: CampaignDetail = serde_json::from_str(
            r#"{"id": "7b2d5ed0-3f33-4a7e-9f3e-cf9a43a1f001"}"#,
        )
        .unwrap();
        assert!(detail.name.is_none());
        assert!(detail.current_stage.is_none());
        assert!(detail.programs.is_empty());
        assert!(detail.category.self_declared_category.is_none());
    }

    #[test]
    fn campaign_detail_decodes_full_payload() {
        let detail: CampaignDetail = serde_json::from_str(
            r#"{
                "id": "7b2d5ed0-3f33-4a7e-9f3e-cf9a43a1f001",
                "name": "Spring Inserts",
                "current_stage": "availability_planning",
                "category": {
                    "self_declared_category": "grocery",
                    "ai_predicted_category_id": "cat-12",
                    "confirmed_category_id": "cat-12",
                    "review_status": "None"
                },
                "programs": [{"channel_id": "ch-9", "program_name": "Metro Weekly"}],
                "created_at": "2025-11-02T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(detail.current_stage.as_deref(), Some("availability_planning"));
        assert_eq!(detail.programs.len(), 1);
        assert_eq!(detail.category.review_status(), Some("None"));
    }

    #[test]
    fn review_status_prefers_new_field() {
        let state = CategoryState {
            review_status: Some("requested".into()),
            manual_category_review: Some("legacy".into()),
            ..CategoryState::default()
        };
        assert_eq!(state.review_status(), Some("requested"));
    }

    #[test]
    fn review_status_falls_back_to_legacy_field() {
        let state = CategoryState {
            manual_category_review: Some("requested".into()),
            ..CategoryState::default()
        };
        assert_eq!(state.review_status(), Some("requested"));
    }

    #[test]
    fn review_status_none_when_neither_set() {
        assert_eq!(CategoryState::default().review_status(), None);
    }
}
