use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Symbolic action identifiers that schema buttons can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardAction {
    StartMigration,
    SubmitMasterId,
    NextFromMasterId,
    SubmitEntryTypes,
    PrevFromEntryTypes,
    NextFromEntryTypes,
    SubmitEntryTypeAttributes,
    PrevFromEntryTypeAttributes,
    NextFromEntryTypeAttributes,
    PrevFromLogicApps,
    NextFromLogicApps,
}

/// Which collaborator a persisting action saves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistTarget {
    MasterId,
    EntryTypeMappings,
    EntryTypeAttributeMappings,
}

/// Checklist steps the wired pages are linked to. The page behind a step
/// comes from the schema's step table, so plans never name page ids.
pub mod steps {
    pub const MASTER_ID: usize = 0;
    pub const ENTRY_TYPES: usize = 1;
    pub const ENTRY_TYPE_ATTRIBUTES: usize = 2;
    pub const LOGIC_APPS: usize = 3;
}

/// The side effects of one action, applied in order: persist, advance,
/// navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub persist: Option<PersistTarget>,
    /// Step completed by this action
    pub advance_step: Option<usize>,
    /// Step whose linked page is opened afterwards
    pub navigate_step: Option<usize>,
}

impl ActionPlan {
    const fn navigate(step: usize) -> Self {
        Self {
            persist: None,
            advance_step: None,
            navigate_step: Some(step),
        }
    }

    const fn persist(target: PersistTarget) -> Self {
        Self {
            persist: Some(target),
            advance_step: None,
            navigate_step: None,
        }
    }

    const fn advance(step: usize, next: Option<usize>) -> Self {
        Self {
            persist: None,
            advance_step: Some(step),
            navigate_step: next,
        }
    }
}

impl WizardAction {
    pub const ALL: [WizardAction; 11] = [
        WizardAction::StartMigration,
        WizardAction::SubmitMasterId,
        WizardAction::NextFromMasterId,
        WizardAction::SubmitEntryTypes,
        WizardAction::PrevFromEntryTypes,
        WizardAction::NextFromEntryTypes,
        WizardAction::SubmitEntryTypeAttributes,
        WizardAction::PrevFromEntryTypeAttributes,
        WizardAction::NextFromEntryTypeAttributes,
        WizardAction::PrevFromLogicApps,
        WizardAction::NextFromLogicApps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardAction::StartMigration => "START_MIGRATION",
            WizardAction::SubmitMasterId => "SUBMIT_MASTER_ID",
            WizardAction::NextFromMasterId => "NEXT_FROM_MASTER_ID",
            WizardAction::SubmitEntryTypes => "SUBMIT_ENTRY_TYPES",
            WizardAction::PrevFromEntryTypes => "PREV_FROM_ENTRY_TYPES",
            WizardAction::NextFromEntryTypes => "NEXT_FROM_ENTRY_TYPES",
            WizardAction::SubmitEntryTypeAttributes => "SUBMIT_ENTRY_TYPE_ATTRIBUTES",
            WizardAction::PrevFromEntryTypeAttributes => "PREV_FROM_ENTRY_TYPE_ATTRIBUTES",
            WizardAction::NextFromEntryTypeAttributes => "NEXT_FROM_ENTRY_TYPE_ATTRIBUTES",
            WizardAction::PrevFromLogicApps => "PREV_FROM_LOGIC_APPS",
            WizardAction::NextFromLogicApps => "NEXT_FROM_LOGIC_APPS",
        }
    }

    /// Side effects of this action. "Previous" actions only navigate; they
    /// never revert checklist progress.
    pub fn plan(&self) -> ActionPlan {
        use steps::*;

        match self {
            WizardAction::StartMigration => ActionPlan::navigate(MASTER_ID),
            WizardAction::SubmitMasterId => ActionPlan::persist(PersistTarget::MasterId),
            WizardAction::NextFromMasterId => ActionPlan::advance(MASTER_ID, Some(ENTRY_TYPES)),
            WizardAction::SubmitEntryTypes => {
                ActionPlan::persist(PersistTarget::EntryTypeMappings)
            }
            WizardAction::PrevFromEntryTypes => ActionPlan::navigate(MASTER_ID),
            WizardAction::NextFromEntryTypes => {
                ActionPlan::advance(ENTRY_TYPES, Some(ENTRY_TYPE_ATTRIBUTES))
            }
            WizardAction::SubmitEntryTypeAttributes => {
                ActionPlan::persist(PersistTarget::EntryTypeAttributeMappings)
            }
            WizardAction::PrevFromEntryTypeAttributes => ActionPlan::navigate(ENTRY_TYPES),
            WizardAction::NextFromEntryTypeAttributes => {
                ActionPlan::advance(ENTRY_TYPE_ATTRIBUTES, Some(LOGIC_APPS))
            }
            WizardAction::PrevFromLogicApps => ActionPlan::navigate(ENTRY_TYPE_ATTRIBUTES),
            // Last wired step; there is no page after it yet.
            WizardAction::NextFromLogicApps => ActionPlan::advance(LOGIC_APPS, None),
        }
    }

    /// Buttons for this action are disabled while the submit flag is set.
    pub fn honors_submit_disabled(&self) -> bool {
        matches!(self, WizardAction::SubmitMasterId)
    }
}

/// Check whether an action id names a backward navigation.
pub fn is_previous_action(action_id: &str) -> bool {
    action_id.starts_with("PREV_")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown action: {}", self.0)
    }
}

impl FromStr for WizardAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardAction::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
