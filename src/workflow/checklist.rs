use serde::{Deserialize, Serialize};

/// Default page-to-step links, used when the schema declares none.
pub const DEFAULT_PAGE_STEPS: [(&str, usize); 4] = [
    ("master-id", 0),
    ("entry-types", 1),
    ("entry-type-attributes", 2),
    ("logic-apps", 3),
];

const FUTURE_STEP_LABELS: [&str; 21] = [
    "Field Mapping",
    "Relationship Links",
    "Custom Fields",
    "User Permissions",
    "Data Transformation",
    "Error Handling",
    "Batch Configuration",
    "Schedule Setup",
    "Notification Rules",
    "Rollback Strategy",
    "Testing Environment",
    "Dry Run Execution",
    "Performance Check",
    "Security Audit",
    "Compliance Review",
    "Stakeholder Approval",
    "Production Prep",
    "Migration Execution",
    "Data Verification",
    "Post-Migration Audit",
    "Documentation Update",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistStep {
    pub id: String,
    pub label: String,
    pub status: StepStatus,
    pub pages: Vec<String>,
}

impl ChecklistStep {
    pub fn new(id: &str, label: &str, pages: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            status: StepStatus::Pending,
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Authoritative mapping from page id to zero-based step index.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStepTable {
    entries: Vec<(String, usize)>,
}

impl PageStepTable {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, usize)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    pub fn step_for(&self, page_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(id, _)| id == page_id)
            .map(|(_, idx)| *idx)
    }

    /// First page linked to a step.
    pub fn page_for(&self, step_index: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, idx)| *idx == step_index)
            .map(|(id, _)| id.as_str())
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }
}

impl Default for PageStepTable {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_PAGE_STEPS
                .iter()
                .map(|(id, idx)| (id.to_string(), *idx)),
        )
    }
}

/// What `advance_for_page` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    Completed {
        step_index: usize,
        completed_step_count: usize,
    },
    AlreadyCompleted {
        step_index: usize,
    },
    UnmappedPage,
}

/// The 25-step migration checklist: four wired steps followed by future
/// steps that each point at a `step-N` page.
pub fn default_steps() -> Vec<ChecklistStep> {
    let mut steps = vec![
        ChecklistStep::new("step-1", "Master ID Store", &["master-id"]),
        ChecklistStep::new("step-2", "Entry Types", &["entry-types"]),
        ChecklistStep::new(
            "step-3",
            "Entry Type Attributes",
            &["entry-type-attributes"],
        ),
        ChecklistStep::new("step-4", "Logic Apps", &["logic-apps"]),
    ];

    for (i, label) in FUTURE_STEP_LABELS.iter().enumerate() {
        let id = format!("step-{}", i + 5);
        steps.push(ChecklistStep::new(&id, label, &[id.as_str()]));
    }

    steps
}

/// Page-aware progress tracker.
///
/// Step statuses are never set individually; they are recomputed from
/// `completed_step_count` after every transition. Steps the table links to
/// pages take their `pages` from the table, so a schema with its own page
/// ids gets checklist links that resolve.
#[derive(Debug, Clone)]
pub struct Checklist {
    steps: Vec<ChecklistStep>,
    completed_step_count: usize,
    table: PageStepTable,
    initial: Vec<ChecklistStep>,
}

impl Checklist {
    pub fn new(mut steps: Vec<ChecklistStep>, table: PageStepTable) -> Self {
        link_pages(&mut steps, &table);
        let mut checklist = Self {
            initial: steps.clone(),
            steps,
            completed_step_count: 0,
            table,
        };
        checklist.recompute();
        checklist
    }

    pub fn steps(&self) -> &[ChecklistStep] {
        &self.steps
    }

    pub fn completed_step_count(&self) -> usize {
        self.completed_step_count
    }

    /// Same as `completed_step_count`; the name the checklist panel uses.
    pub fn progress(&self) -> usize {
        self.completed_step_count
    }

    pub fn table(&self) -> &PageStepTable {
        &self.table
    }

    /// All steps completed.
    pub fn is_finished(&self) -> bool {
        self.completed_step_count >= self.steps.len()
    }

    pub fn active_step(&self) -> Option<&ChecklistStep> {
        self.steps.get(self.completed_step_count)
    }

    pub fn advance_for_page(&mut self, page_id: &str) -> AdvanceOutcome {
        match self.table.step_for(page_id) {
            Some(idx) => self.advance_step(idx),
            None => {
                tracing::warn!(page_id, "unknown page; no checklist step to advance");
                AdvanceOutcome::UnmappedPage
            }
        }
    }

    /// Complete every step up to and including `step_index`.
    pub fn advance_step(&mut self, step_index: usize) -> AdvanceOutcome {
        if step_index >= self.steps.len() {
            tracing::warn!(
                step_index,
                steps = self.steps.len(),
                "step is past the end of the checklist; nothing to advance"
            );
            return AdvanceOutcome::UnmappedPage;
        }

        if step_index < self.completed_step_count {
            tracing::debug!(step = step_index + 1, "step already completed");
            return AdvanceOutcome::AlreadyCompleted { step_index };
        }

        self.completed_step_count = step_index + 1;
        self.recompute();
        tracing::info!(step = step_index + 1, "checklist step completed");

        AdvanceOutcome::Completed {
            step_index,
            completed_step_count: self.completed_step_count,
        }
    }

    /// Step back one completed step. Returns false at the floor.
    pub fn revert(&mut self) -> bool {
        if self.completed_step_count == 0 {
            return false;
        }
        self.completed_step_count -= 1;
        self.recompute();
        tracing::info!(
            active_step = self.completed_step_count + 1,
            "checklist reverted"
        );
        true
    }

    /// First page of a step, or an empty string when it has none.
    pub fn target_page_id(step: &ChecklistStep) -> &str {
        step.pages.first().map(String::as_str).unwrap_or("")
    }

    pub fn find_step(&self, step_id: &str) -> Option<&ChecklistStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn reset(&mut self) {
        self.steps = self.initial.clone();
        self.completed_step_count = 0;
        self.recompute();
    }

    fn recompute(&mut self) {
        let done = self.completed_step_count;
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.status = if index < done {
                StepStatus::Completed
            } else if index == done {
                StepStatus::Active
            } else {
                StepStatus::Pending
            };
        }
    }
}

fn link_pages(steps: &mut [ChecklistStep], table: &PageStepTable) {
    for (index, step) in steps.iter_mut().enumerate() {
        let linked: Vec<String> = table
            .entries()
            .iter()
            .filter(|(_, idx)| *idx == index)
            .map(|(id, _)| id.clone())
            .collect();
        if !linked.is_empty() {
            step.pages = linked;
        }
    }
}

impl Default for Checklist {
    fn default() -> Self {
        Self::new(default_steps(), PageStepTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(checklist: &Checklist) -> Vec<StepStatus> {
        checklist.steps().iter().map(|s| s.status).collect()
    }

    #[test]
    fn initial_state_has_first_step_active() {
        let checklist = Checklist::default();
        assert_eq!(checklist.steps().len(), 25);
        assert_eq!(checklist.completed_step_count(), 0);
        assert_eq!(checklist.steps()[0].status, StepStatus::Active);
        assert!(checklist.steps()[1..]
            .iter()
            .all(|s| s.status == StepStatus::Pending));
    }

    #[test]
    fn advancing_later_page_completes_all_lower_steps() {
        let mut checklist = Checklist::default();
        let outcome = checklist.advance_for_page("entry-types");
        assert_eq!(
            outcome,
            AdvanceOutcome::Completed {
                step_index: 1,
                completed_step_count: 2
            }
        );
        let s = statuses(&checklist);
        assert_eq!(s[0], StepStatus::Completed);
        assert_eq!(s[1], StepStatus::Completed);
        assert_eq!(s[2], StepStatus::Active);
        assert_eq!(s[3], StepStatus::Pending);
    }

    #[test]
    fn revisiting_an_earlier_page_does_not_regress() {
        let mut checklist = Checklist::default();
        checklist.advance_for_page("entry-type-attributes");
        let before = checklist.steps().to_vec();
        assert_eq!(
            checklist.advance_for_page("master-id"),
            AdvanceOutcome::AlreadyCompleted { step_index: 0 }
        );
        assert_eq!(checklist.steps(), before.as_slice());
        assert_eq!(checklist.completed_step_count(), 3);
    }

    #[test]
    fn unmapped_page_is_a_no_op() {
        let mut checklist = Checklist::default();
        assert_eq!(
            checklist.advance_for_page("migration-start"),
            AdvanceOutcome::UnmappedPage
        );
        assert_eq!(checklist.completed_step_count(), 0);
    }

    #[test]
    fn revert_floors_at_zero() {
        let mut checklist = Checklist::default();
        assert!(!checklist.revert());
        checklist.advance_for_page("master-id");
        assert!(checklist.revert());
        assert_eq!(checklist.completed_step_count(), 0);
        assert_eq!(checklist.steps()[0].status, StepStatus::Active);
    }

    #[test]
    fn terminal_state_absorbs_further_advances() {
        let steps = vec![
            ChecklistStep::new("a", "A", &["p0"]),
            ChecklistStep::new("b", "B", &["p1"]),
        ];
        let table = PageStepTable::from_pairs([("p0".to_string(), 0), ("p1".to_string(), 1)]);
        let mut checklist = Checklist::new(steps, table);
        checklist.advance_for_page("p1");
        assert!(checklist.is_finished());
        assert!(checklist.active_step().is_none());
        assert_eq!(
            checklist.advance_for_page("p1"),
            AdvanceOutcome::AlreadyCompleted { step_index: 1 }
        );
        assert!(checklist
            .steps()
            .iter()
            .all(|s| s.status == StepStatus::Completed));
    }

    #[test]
    fn target_page_is_first_page_or_empty() {
        let step = ChecklistStep::new("x", "X", &["first", "second"]);
        assert_eq!(Checklist::target_page_id(&step), "first");
        let empty = ChecklistStep::new("y", "Y", &[]);
        assert_eq!(Checklist::target_page_id(&empty), "");
    }

    #[test]
    fn table_links_override_default_step_pages() {
        let table = PageStepTable::from_pairs([
            ("choose-id".to_string(), 0),
            ("map-types".to_string(), 1),
        ]);
        let checklist = Checklist::new(default_steps(), table);
        assert_eq!(checklist.steps()[0].pages, vec!["choose-id"]);
        assert_eq!(checklist.steps()[1].pages, vec!["map-types"]);
        assert_eq!(checklist.steps()[2].pages, vec!["entry-type-attributes"]);
        assert_eq!(checklist.steps()[4].pages, vec!["step-5"]);
    }

    #[test]
    fn advancing_past_the_last_step_is_a_no_op() {
        let mut checklist = Checklist::default();
        assert_eq!(checklist.advance_step(25), AdvanceOutcome::UnmappedPage);
        assert_eq!(checklist.completed_step_count(), 0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut checklist = Checklist::default();
        checklist.advance_for_page("logic-apps");
        checklist.reset();
        assert_eq!(checklist.completed_step_count(), 0);
        assert_eq!(checklist.steps()[0].status, StepStatus::Active);
        assert_eq!(checklist.steps()[3].status, StepStatus::Pending);
    }
}
