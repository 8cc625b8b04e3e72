pub mod actions;
pub mod checklist;
pub mod mapping;
