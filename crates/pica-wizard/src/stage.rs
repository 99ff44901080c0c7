//! Wizard step resolution from the persisted campaign record.
//!
//! Resolution is an ordered rule table: the first rule whose predicate
//! matches wins, and the table is append-only in spirit — a new stage gets
//! new rows instead of edits to existing predicates, so earlier behavior
//! cannot shift silently. The function is total: malformed stages and
//! out-of-range requested steps fall through to step 1.

use pica_core::{CampaignDetail, CategoryState};

/// The six wizard steps, numbered as rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    CampaignDetails = 1,
    CategorySelection = 2,
    Classification = 3,
    CategoryMismatch = 4,
    ProgramSelection = 5,
    AvailabilityReport = 6,
}

impl WizardStep {
    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_number(n: u8) -> Option<WizardStep> {
        match n {
            1 => Some(WizardStep::CampaignDetails),
            2 => Some(WizardStep::CategorySelection),
            3 => Some(WizardStep::Classification),
            4 => Some(WizardStep::CategoryMismatch),
            5 => Some(WizardStep::ProgramSelection),
            6 => Some(WizardStep::AvailabilityReport),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WizardStep::CampaignDetails => "campaign details",
            WizardStep::CategorySelection => "category selection",
            WizardStep::Classification => "upload & classify",
            WizardStep::CategoryMismatch => "category mismatch",
            WizardStep::ProgramSelection => "program selection",
            WizardStep::AvailabilityReport => "availability report",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.name())
    }
}

/// Recognized values of the persisted `current_stage` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStage {
    CategoryVerification,
    CategoryAssignment,
    CategorySelection,
    ProgramSelection,
    AvailabilityPlanning,
}

impl CampaignStage {
    /// Parses the wire value; unknown stages return `None` and resolution
    /// falls through to the default rule.
    #[must_use]
    pub fn parse(raw: &str) -> Option<CampaignStage> {
        match raw.trim() {
            "category_verification" => Some(CampaignStage::CategoryVerification),
            "category_assignment" => Some(CampaignStage::CategoryAssignment),
            "category_selection" => Some(CampaignStage::CategorySelection),
            // Both spellings occur in persisted records.
            "program_selection" | "programs_selection" => Some(CampaignStage::ProgramSelection),
            "availability_planning" => Some(CampaignStage::AvailabilityPlanning),
            _ => None,
        }
    }

    /// Whether this stage is one of the category-resolution stages.
    fn in_category_phase(self) -> bool {
        matches!(
            self,
            CampaignStage::CategoryVerification
                | CampaignStage::CategoryAssignment
                | CampaignStage::CategorySelection
        )
    }
}

/// A category field is usable when it is set to something other than the
/// empty string or the literal `"None"` (the wire encoding of "unset").
fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty() && s != "None")
}

/// Everything a rule predicate may inspect.
struct RuleInput<'a> {
    stage: Option<CampaignStage>,
    category: &'a CategoryState,
    has_programs: bool,
}

impl RuleInput<'_> {
    fn in_category_phase(&self) -> bool {
        self.stage.is_some_and(CampaignStage::in_category_phase)
    }

    fn in_program_phase(&self) -> bool {
        self.stage == Some(CampaignStage::ProgramSelection)
    }

    fn in_planning_phase(&self) -> bool {
        self.stage == Some(CampaignStage::AvailabilityPlanning)
    }

    fn review_set(&self) -> bool {
        is_set(self.category.review_status())
    }
}

/// One row of the resolution table.
struct StageRule {
    name: &'static str,
    applies: fn(&RuleInput<'_>) -> bool,
    step: WizardStep,
}

/// The resolution table, evaluated top to bottom, first match wins.
///
/// The two `predicted_*` rows both resolve to the mismatch step today;
/// they stay separate rows because they render with different action sets
/// and are expected to diverge.
const RULES: &[StageRule] = &[
    StageRule {
        name: "assignment_under_review",
        applies: |c| c.stage == Some(CampaignStage::CategoryAssignment) && c.review_set(),
        step: WizardStep::CategoryMismatch,
    },
    StageRule {
        name: "no_declared_category",
        applies: |c| {
            c.in_category_phase() && !is_set(c.category.self_declared_category.as_deref())
        },
        step: WizardStep::CategorySelection,
    },
    StageRule {
        name: "not_yet_classified",
        applies: |c| {
            c.in_category_phase() && !is_set(c.category.ai_predicted_category_id.as_deref())
        },
        step: WizardStep::Classification,
    },
    StageRule {
        name: "category_confirmed",
        applies: |c| {
            c.in_category_phase() && is_set(c.category.confirmed_category_id.as_deref())
        },
        step: WizardStep::ProgramSelection,
    },
    StageRule {
        name: "mismatch_awaiting_decision",
        applies: |c| c.in_category_phase() && !c.review_set(),
        step: WizardStep::CategoryMismatch,
    },
    StageRule {
        name: "mismatch_review_pending",
        applies: |c| c.in_category_phase(),
        step: WizardStep::CategoryMismatch,
    },
    StageRule {
        name: "programs_with_confirmed_category",
        applies: |c| c.in_program_phase() && is_set(c.category.confirmed_category_id.as_deref()),
        step: WizardStep::ProgramSelection,
    },
    StageRule {
        name: "predicted_with_review",
        applies: |c| {
            c.in_program_phase()
                && is_set(c.category.ai_predicted_category_id.as_deref())
                && c.review_set()
        },
        step: WizardStep::CategoryMismatch,
    },
    StageRule {
        name: "predicted_without_review",
        applies: |c| {
            c.in_program_phase() && is_set(c.category.ai_predicted_category_id.as_deref())
        },
        step: WizardStep::CategoryMismatch,
    },
    StageRule {
        name: "programs_without_category",
        applies: |c| c.in_program_phase(),
        step: WizardStep::Classification,
    },
    StageRule {
        name: "planning_without_programs",
        applies: |c| c.in_planning_phase() && !c.has_programs,
        step: WizardStep::ProgramSelection,
    },
    StageRule {
        name: "planning_with_programs",
        applies: |c| c.in_planning_phase(),
        step: WizardStep::AvailabilityReport,
    },
];

/// Resolves the wizard step to render for a campaign record.
///
/// Deterministic and total: when no rule matches (unknown or missing
/// stage), the caller-requested step applies when it names a real step,
/// else step 1. Callers re-run this after every mutation of the campaign
/// record rather than advancing steps locally.
#[must_use]
pub fn resolve_step(campaign: &CampaignDetail, requested: Option<u8>) -> WizardStep {
    let input = RuleInput {
        stage: campaign.current_stage.as_deref().and_then(CampaignStage::parse),
        category: &campaign.category,
        has_programs: !campaign.programs.is_empty(),
    };

    for rule in RULES {
        if (rule.applies)(&input) {
            tracing::debug!(rule = rule.name, step = %rule.step, "resolved wizard step");
            return rule.step;
        }
    }

    let fallback = requested
        .and_then(WizardStep::from_number)
        .unwrap_or(WizardStep::CampaignDetails);
    tracing::debug!(step = %fallback, "no rule matched; using fallback step");
    fallback
}

#[cfg(test)]
mod tests {
    use pica_core::SelectedProgram;

    use super::*;

    fn make_campaign(stage: Option<&str>) -> CampaignDetail {
        CampaignDetail {
            id: uuid::Uuid::nil(),
            name: None,
            current_stage: stage.map(str::to_owned),
            category: CategoryState::default(),
            programs: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn set(value: &str) -> Option<String> {
        Some(value.to_owned())
    }

    // -----------------------------------------------------------------------
    // category phase
    // -----------------------------------------------------------------------

    #[test]
    fn empty_category_state_goes_to_selection() {
        let campaign = make_campaign(Some("category_selection"));
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategorySelection);
        // Deterministic regardless of call count.
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategorySelection);
    }

    #[test]
    fn declared_but_unclassified_goes_to_classification() {
        let mut campaign = make_campaign(Some("category_verification"));
        campaign.category.self_declared_category = set("grocery");
        assert_eq!(resolve_step(&campaign, None), WizardStep::Classification);
    }

    #[test]
    fn assignment_with_active_review_goes_to_mismatch_first() {
        let mut campaign = make_campaign(Some("category_assignment"));
        campaign.category.self_declared_category = set("grocery");
        campaign.category.ai_predicted_category_id = set("cat-2");
        campaign.category.confirmed_category_id = set("cat-2");
        campaign.category.review_status = set("requested");
        // Review takes precedence over the confirmed-category rule.
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategoryMismatch);
    }

    #[test]
    fn verification_with_review_is_not_preempted() {
        // The review-first rule applies to category_assignment only.
        let mut campaign = make_campaign(Some("category_verification"));
        campaign.category.self_declared_category = set("grocery");
        campaign.category.ai_predicted_category_id = set("cat-2");
        campaign.category.confirmed_category_id = set("cat-2");
        campaign.category.review_status = set("requested");
        assert_eq!(resolve_step(&campaign, None), WizardStep::ProgramSelection);
    }

    #[test]
    fn confirmed_category_goes_to_program_selection() {
        let mut campaign = make_campaign(Some("category_verification"));
        campaign.category.self_declared_category = set("grocery");
        campaign.category.ai_predicted_category_id = set("cat-2");
        campaign.category.confirmed_category_id = set("cat-2");
        assert_eq!(resolve_step(&campaign, None), WizardStep::ProgramSelection);
    }

    #[test]
    fn classified_but_unconfirmed_goes_to_mismatch() {
        let mut campaign = make_campaign(Some("category_verification"));
        campaign.category.self_declared_category = set("grocery");
        campaign.category.ai_predicted_category_id = set("cat-2");
        // No review yet → the accept-or-request-review variant.
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategoryMismatch);
        // Review rejected (set and valid) → the pick-a-category variant.
        campaign.category.review_status = set("rejected");
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategoryMismatch);
    }

    #[test]
    fn literal_none_string_counts_as_unset() {
        let mut campaign = make_campaign(Some("category_selection"));
        campaign.category.self_declared_category = set("None");
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategorySelection);
    }

    #[test]
    fn legacy_review_field_is_honored() {
        let mut campaign = make_campaign(Some("category_assignment"));
        campaign.category.manual_category_review = set("requested");
        assert_eq!(resolve_step(&campaign, None), WizardStep::CategoryMismatch);
    }

    // -----------------------------------------------------------------------
    // program phase
    // -----------------------------------------------------------------------

    #[test]
    fn program_stage_with_confirmed_category_stays_on_programs() {
        let mut campaign = make_campaign(Some("program_selection"));
        campaign.category.confirmed_category_id = set("cat-2");
        assert_eq!(resolve_step(&campaign, None), WizardStep::ProgramSelection);
    }

    #[test]
    fn program_stage_with_prediction_returns_to_mismatch() {
        for review in [None, set("requested")] {
            let mut campaign = make_campaign(Some("programs_selection"));
            campaign.category.ai_predicted_category_id = set("cat-2");
            campaign.category.review_status = review;
            assert_eq!(resolve_step(&campaign, None), WizardStep::CategoryMismatch);
        }
    }

    #[test]
    fn program_stage_without_category_returns_to_classification() {
        let campaign = make_campaign(Some("program_selection"));
        assert_eq!(resolve_step(&campaign, None), WizardStep::Classification);
    }

    // -----------------------------------------------------------------------
    // planning phase
    // -----------------------------------------------------------------------

    #[test]
    fn planning_without_programs_goes_back_to_selection() {
        let campaign = make_campaign(Some("availability_planning"));
        assert_eq!(resolve_step(&campaign, None), WizardStep::ProgramSelection);
    }

    #[test]
    fn planning_with_programs_goes_to_report() {
        let mut campaign = make_campaign(Some("availability_planning"));
        campaign.programs.push(SelectedProgram {
            channel_id: "ch-1".to_owned(),
            program_name: None,
        });
        assert_eq!(resolve_step(&campaign, None), WizardStep::AvailabilityReport);
    }

    // -----------------------------------------------------------------------
    // fallback
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_stage_uses_requested_step() {
        let campaign = make_campaign(Some("launch_countdown"));
        assert_eq!(
            resolve_step(&campaign, Some(3)),
            WizardStep::Classification
        );
    }

    #[test]
    fn unknown_stage_with_bad_request_defaults_to_step_one() {
        let campaign = make_campaign(Some("launch_countdown"));
        assert_eq!(resolve_step(&campaign, Some(9)), WizardStep::CampaignDetails);
        assert_eq!(resolve_step(&campaign, Some(0)), WizardStep::CampaignDetails);
        assert_eq!(resolve_step(&campaign, None), WizardStep::CampaignDetails);
    }

    #[test]
    fn missing_stage_defaults_like_unknown_stage() {
        let campaign = make_campaign(None);
        assert_eq!(resolve_step(&campaign, Some(6)), WizardStep::AvailabilityReport);
        assert_eq!(resolve_step(&campaign, None), WizardStep::CampaignDetails);
    }

    #[test]
    fn step_numbers_round_trip() {
        for n in 1..=6 {
            let step = WizardStep::from_number(n).unwrap();
            assert_eq!(step.number(), n);
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(7), None);
    }
}
