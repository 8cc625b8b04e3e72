//! Schema-driven migration wizard engine.
//!
//! Pages are declared in a schema, rendered through a component registry
//! against a per-render snapshot of feature state, and driven by button
//! actions and UI events. A page-aware checklist tracks progress and two
//! one-to-one mapping engines hold the user's task connections.

pub mod api;
pub mod cli;
pub mod engine;
pub mod error;
pub mod feature;
pub mod report;
pub mod schema;
pub mod script;
pub mod session;
pub mod trace;
pub mod workflow;
