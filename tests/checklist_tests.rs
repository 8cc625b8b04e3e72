use migration_wizard::workflow::checklist::{
    AdvanceOutcome, Checklist, ChecklistStep, PageStepTable, StepStatus, default_steps,
};
use proptest::prelude::*;

mod common;
use common::WIRED_PAGES;

fn statuses(checklist: &Checklist) -> Vec<StepStatus> {
    checklist.steps().iter().map(|s| s.status).collect()
}

/// Completed steps form a prefix, followed by at most one active step.
fn assert_ordering(checklist: &Checklist) {
    let s = statuses(checklist);
    let active = s.iter().filter(|st| **st == StepStatus::Active).count();
    assert!(active <= 1, "more than one active step: {:?}", s);

    let done = checklist.completed_step_count();
    for (i, status) in s.iter().enumerate() {
        let expected = if i < done {
            StepStatus::Completed
        } else if i == done {
            StepStatus::Active
        } else {
            StepStatus::Pending
        };
        assert_eq!(*status, expected, "step {} out of order", i);
    }
}

#[derive(Debug, Clone)]
enum Op {
    Advance(&'static str),
    Revert,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(vec![
            "master-id",
            "entry-types",
            "entry-type-attributes",
            "logic-apps",
            "step-7",
            "not-a-page",
        ])
        .prop_map(Op::Advance),
        Just(Op::Revert),
    ]
}

proptest! {
    #[test]
    fn ordering_holds_after_any_sequence(ops in prop::collection::vec(op(), 0..40)) {
        let mut checklist = Checklist::default();
        for op in ops {
            match op {
                Op::Advance(page) => { checklist.advance_for_page(page); }
                Op::Revert => { checklist.revert(); }
            }
            assert_ordering(&checklist);
        }
    }

    #[test]
    fn advancing_twice_is_idempotent(
        prefix in prop::collection::vec(prop::sample::select(WIRED_PAGES.to_vec()), 0..6),
        page in prop::sample::select(WIRED_PAGES.to_vec()),
    ) {
        let mut checklist = Checklist::default();
        for p in prefix {
            checklist.advance_for_page(p);
        }
        checklist.advance_for_page(page);
        let once = statuses(&checklist);
        let count = checklist.completed_step_count();

        checklist.advance_for_page(page);
        prop_assert_eq!(statuses(&checklist), once);
        prop_assert_eq!(checklist.completed_step_count(), count);
    }

    #[test]
    fn revert_then_advance_restores_state(page in prop::sample::select(WIRED_PAGES.to_vec())) {
        let mut checklist = Checklist::default();
        checklist.advance_for_page(page);
        let before = statuses(&checklist);
        let count = checklist.completed_step_count();

        prop_assert!(checklist.revert());
        prop_assert_eq!(checklist.completed_step_count(), count - 1);
        checklist.advance_for_page(page);

        prop_assert_eq!(statuses(&checklist), before);
        prop_assert_eq!(checklist.completed_step_count(), count);
    }
}

#[test]
fn skipping_ahead_completes_lower_steps() {
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
    assert!(s[3..].iter().all(|st| *st == StepStatus::Pending));
}

#[test]
fn initial_state_has_first_step_active() {
    let checklist = Checklist::default();
    assert_eq!(checklist.completed_step_count(), 0);
    assert_eq!(checklist.steps().len(), 25);
    assert_eq!(checklist.active_step().map(|s| s.id.as_str()), Some("step-1"));
}

#[test]
fn revert_floors_at_zero() {
    let mut checklist = Checklist::default();
    assert!(!checklist.revert());
    assert_eq!(checklist.progress(), 0);
    assert_eq!(statuses(&checklist)[0], StepStatus::Active);
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
    assert!(statuses(&checklist).iter().all(|s| *s == StepStatus::Completed));

    assert_eq!(
        checklist.advance_for_page("p1"),
        AdvanceOutcome::AlreadyCompleted { step_index: 1 }
    );
    assert_eq!(
        checklist.advance_for_page("p0"),
        AdvanceOutcome::AlreadyCompleted { step_index: 0 }
    );
}

#[test]
fn unmapped_page_is_a_noop() {
    let mut checklist = Checklist::default();
    checklist.advance_for_page("master-id");
    assert_eq!(
        checklist.advance_for_page("unknown-page"),
        AdvanceOutcome::UnmappedPage
    );
    assert_eq!(checklist.completed_step_count(), 1);
}

#[test]
fn target_page_is_first_page_or_empty() {
    let steps = default_steps();
    assert_eq!(Checklist::target_page_id(&steps[1]), "entry-types");
    assert_eq!(Checklist::target_page_id(&steps[9]), "step-10");

    let bare = ChecklistStep::new("x", "No pages", &[]);
    assert_eq!(Checklist::target_page_id(&bare), "");
}

#[test]
fn reset_restores_initial_state() {
    let mut checklist = Checklist::default();
    checklist.advance_for_page("logic-apps");
    checklist.reset();
    assert_eq!(checklist.completed_step_count(), 0);
    assert_eq!(statuses(&checklist)[0], StepStatus::Active);
    assert_eq!(statuses(&checklist)[3], StepStatus::Pending);
}
