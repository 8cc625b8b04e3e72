use std::str::FromStr;

use serde::Serialize;

use crate::engine::binder::{ExternalStateBag, bind_external_state};
use crate::engine::registry::ComponentRegistry;
use crate::engine::render_model::PageView;
use crate::engine::renderer::render_page;
use crate::error::WizardResult;
use crate::feature::logic_apps::LogicAppsState;
use crate::feature::master_ids::MasterIdState;
use crate::feature::providers::{Collaborators, MappingItems};
use crate::feature::task_feed::{MappingFeed, TaskMappingFeed};
use crate::schema::resolver::PageResolver;
use crate::schema::store::SchemaStore;
use crate::session::events::{MappingGesture, UiEvent, WorkspaceButton};
use crate::session::navigation::Navigation;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::workflow::actions::{PersistTarget, WizardAction};
use crate::workflow::checklist::{AdvanceOutcome, Checklist, default_steps};
use crate::workflow::mapping::{SelectOutcome, TaskConnection};

/// Result of a save triggered by an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    Saved { target: PersistTarget },
    /// Nothing to save, e.g. no master id selected yet
    Skipped { target: PersistTarget },
    Failed { target: PersistTarget, message: String },
}

/// Everything one `dispatch` call did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub action_id: String,
    pub action: Option<WizardAction>,
    pub persisted: Option<PersistOutcome>,
    pub advanced: Option<AdvanceOutcome>,
    pub navigated_to: Option<String>,
}

impl DispatchOutcome {
    fn unknown(action_id: &str) -> Self {
        Self {
            action_id: action_id.to_string(),
            action: None,
            persisted: None,
            advanced: None,
            navigated_to: None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.action.is_some()
    }

    pub fn persistence_failed(&self) -> bool {
        matches!(self.persisted, Some(PersistOutcome::Failed { .. }))
    }
}

/// What `handle_event` did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventOutcome {
    MasterIdSelected { group_key: u32, refetched: bool },
    Selection { outcome: SelectOutcome },
    Dropped { connection: Option<TaskConnection> },
    MappingUpdated,
    LogicAppSelected { definition_loaded: bool },
    Dispatched { outcome: DispatchOutcome },
    Navigated { page_id: String },
    /// Accepted but has no effect beyond the log line
    Acknowledged,
    Ignored { reason: String },
}

/// The application state for one user session.
///
/// Owns the schema, the checklist, every feature slice and the external
/// collaborators. Nothing here is global: tests build a fresh session or
/// call `reset`.
pub struct WizardSession {
    store: SchemaStore,
    registry: ComponentRegistry,
    checklist: Checklist,
    master_ids: MasterIdState,
    entry_types: TaskMappingFeed,
    entry_type_attributes: TaskMappingFeed,
    logic_apps: LogicAppsState,
    navigation: Navigation,
    collaborators: Collaborators,
    trace: TraceLogger,
    seq: u64,
}

impl WizardSession {
    pub fn new(store: SchemaStore, collaborators: Collaborators) -> Self {
        let checklist = Checklist::new(default_steps(), store.step_table().clone());
        Self {
            store,
            registry: ComponentRegistry::standard(),
            checklist,
            master_ids: MasterIdState::default(),
            entry_types: TaskMappingFeed::new(MappingFeed::EntryTypes),
            entry_type_attributes: TaskMappingFeed::new(MappingFeed::EntryTypeAttributes),
            logic_apps: LogicAppsState::default(),
            navigation: Navigation::default(),
            collaborators,
            trace: TraceLogger::disabled(),
            seq: 0,
        }
    }

    pub fn with_trace(mut self, trace: TraceLogger) -> Self {
        self.trace = trace;
        self
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.checklist
    }

    pub fn master_ids(&self) -> &MasterIdState {
        &self.master_ids
    }

    pub fn logic_apps(&self) -> &LogicAppsState {
        &self.logic_apps
    }

    pub fn mapping(&self, feed: MappingFeed) -> &TaskMappingFeed {
        match feed {
            MappingFeed::EntryTypes => &self.entry_types,
            MappingFeed::EntryTypeAttributes => &self.entry_type_attributes,
        }
    }

    /// Direct access to a feed, for driving fetches by hand.
    pub fn mapping_mut(&mut self, feed: MappingFeed) -> &mut TaskMappingFeed {
        match feed {
            MappingFeed::EntryTypes => &mut self.entry_types,
            MappingFeed::EntryTypeAttributes => &mut self.entry_type_attributes,
        }
    }

    pub fn current_page(&self) -> &str {
        self.navigation.current()
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Initial fetch of every feed. A failing feed records its own error
    /// and leaves the others untouched.
    pub fn load(&mut self) {
        tracing::info!(pages = self.store.len(), "loading wizard data");
        self.refresh_master_ids();
        self.refresh_entry_types();
        self.refresh_entry_type_attributes();
        self.refresh_logic_apps();
    }

    pub fn refresh_master_ids(&mut self) {
        let ticket = self.master_ids.fetch.begin();
        let result = self.collaborators.master_ids.fetch_master_ids();
        if let Some(options) = self.master_ids.fetch.finish("master IDs", ticket, result) {
            tracing::debug!(count = options.len(), "master ids loaded");
            self.master_ids.options = options;
        }
    }

    /// Refetch entry types for the selected master id's group key.
    pub fn refresh_entry_types(&mut self) {
        let group_key = self.master_ids.selected_group_key;
        let ticket = self.entry_types.begin_fetch(Some(group_key));
        let result = self
            .collaborators
            .entry_types
            .fetch_entry_types(group_key)
            .map(|items| MappingItems::from_entry_types(&items));
        self.entry_types.complete_fetch(ticket, result);
    }

    pub fn refresh_entry_type_attributes(&mut self) {
        let ticket = self.entry_type_attributes.begin_fetch(None);
        let result = self
            .collaborators
            .entry_type_attributes
            .fetch_attribute_names()
            .map(MappingItems::mirrored);
        self.entry_type_attributes.complete_fetch(ticket, result);
    }

    pub fn refresh_logic_apps(&mut self) {
        let ticket = self.logic_apps.list_fetch.begin();
        let result = self.collaborators.logic_apps.fetch_logic_apps();
        if let Some(items) = self.logic_apps.list_fetch.finish("logic apps", ticket, result) {
            self.logic_apps.items = items;
        }
    }

    pub fn external_state(&self) -> ExternalStateBag {
        bind_external_state(
            &self.master_ids,
            &self.entry_types,
            &self.entry_type_attributes,
            &self.logic_apps,
        )
    }

    /// Render the current page.
    pub fn render(&self) -> PageView {
        self.render_page(self.navigation.current())
    }

    pub fn render_page(&self, page_id: &str) -> PageView {
        let resolver = PageResolver::new(&self.store);
        let external = self.external_state();
        render_page(&resolver, &self.registry, page_id, &external, &self.checklist)
    }

    pub fn navigate(&mut self, page_id: &str) {
        self.navigation.go_to(page_id);
    }

    /// Run a button action: persist, then advance, then navigate.
    ///
    /// Unknown ids are logged and ignored. A failed save is logged and
    /// reported in the outcome; the rest of the plan still runs.
    pub fn dispatch(&mut self, action_id: &str) -> DispatchOutcome {
        let action = match WizardAction::from_str(action_id) {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(action_id, "{}", e);
                let outcome = DispatchOutcome::unknown(action_id);
                self.record(action_id, "unknown action");
                return outcome;
            }
        };

        let plan = action.plan();
        let persisted = plan.persist.map(|target| self.persist(target));
        let advanced = plan.advance_step.map(|step| self.checklist.advance_step(step));
        let navigated_to = plan.navigate_step.and_then(|step| self.page_for_step(step));
        if let Some(page) = &navigated_to {
            self.navigate(page);
        }

        let outcome = DispatchOutcome {
            action_id: action_id.to_string(),
            action: Some(action),
            persisted,
            advanced,
            navigated_to,
        };
        self.record(action_id, summarize_dispatch(&outcome));
        outcome
    }

    fn page_for_step(&self, step: usize) -> Option<String> {
        let page = self.checklist.table().page_for(step).map(str::to_string);
        if page.is_none() {
            tracing::warn!(step = step + 1, "no page is linked to this step; staying put");
        }
        page
    }

    fn persist(&mut self, target: PersistTarget) -> PersistOutcome {
        let result = match target {
            PersistTarget::MasterId => {
                if !self.master_ids.has_selection() {
                    tracing::debug!("no master id selected; nothing to save");
                    return PersistOutcome::Skipped { target };
                }
                self.collaborators
                    .master_id_store
                    .save_master_id(&self.master_ids.selected_id)
            }
            PersistTarget::EntryTypeMappings => self.save_feed(MappingFeed::EntryTypes),
            PersistTarget::EntryTypeAttributeMappings => {
                self.save_feed(MappingFeed::EntryTypeAttributes)
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(?target, "saved");
                PersistOutcome::Saved { target }
            }
            Err(e) => {
                tracing::error!(?target, error = %e, "save failed");
                PersistOutcome::Failed {
                    target,
                    message: e.to_string(),
                }
            }
        }
    }

    fn save_feed(&self, feed: MappingFeed) -> WizardResult<()> {
        let connections = self.mapping(feed).engine.connections();
        self.collaborators
            .mapping_store
            .save_mappings(feed, connections)
    }

    pub fn handle_event(&mut self, event: UiEvent) -> EventOutcome {
        let description = event.describe();
        let outcome = match event {
            UiEvent::MasterIdChanged { id } => {
                let changed = self.master_ids.select(&id);
                if changed {
                    self.refresh_entry_types();
                }
                EventOutcome::MasterIdSelected {
                    group_key: self.master_ids.selected_group_key,
                    refetched: changed,
                }
            }
            UiEvent::Mapping { feed, gesture } => self.apply_gesture(feed, gesture),
            UiEvent::LogicAppSelected { id } => self.select_logic_app(&id),
            UiEvent::LogicAppsButton { button } => self.press_workspace_button(button),
            UiEvent::ChecklistStepClicked { step_id } => self.open_step(&step_id),
        };
        self.record(&description, format!("{:?}", outcome));
        outcome
    }

    fn apply_gesture(&mut self, feed: MappingFeed, gesture: MappingGesture) -> EventOutcome {
        let engine = &mut self.mapping_mut(feed).engine;
        match gesture {
            MappingGesture::SelectLeft { id } => EventOutcome::Selection {
                outcome: engine.select_left(&id),
            },
            MappingGesture::SelectRight { id } => EventOutcome::Selection {
                outcome: engine.select_right(&id),
            },
            MappingGesture::DragStart { id } => {
                engine.drag_start(&id);
                EventOutcome::MappingUpdated
            }
            MappingGesture::Drop { id } => EventOutcome::Dropped {
                connection: engine.drop(&id),
            },
            MappingGesture::DragEnd => {
                engine.drag_end();
                EventOutcome::MappingUpdated
            }
            MappingGesture::DisconnectPair { left_id, right_id } => {
                engine.disconnect_by_pair(&left_id, &right_id);
                EventOutcome::MappingUpdated
            }
            MappingGesture::DisconnectLeft { id } => {
                engine.disconnect_by_left(&id);
                EventOutcome::MappingUpdated
            }
            MappingGesture::DisconnectRight { id } => {
                engine.disconnect_by_right(&id);
                EventOutcome::MappingUpdated
            }
        }
    }

    fn select_logic_app(&mut self, id: &str) -> EventOutcome {
        if !self.logic_apps.select(id) {
            return EventOutcome::LogicAppSelected {
                definition_loaded: self.logic_apps.definition.is_some(),
            };
        }

        self.logic_apps.definition = None;
        let ticket = self.logic_apps.definition_fetch.begin();
        let result = self.collaborators.logic_apps.fetch_definition(id);
        let definition = self
            .logic_apps
            .definition_fetch
            .finish("logic app definition", ticket, result);
        let loaded = definition.is_some();
        self.logic_apps.definition = definition;
        EventOutcome::LogicAppSelected {
            definition_loaded: loaded,
        }
    }

    fn press_workspace_button(&mut self, button: WorkspaceButton) -> EventOutcome {
        match button {
            WorkspaceButton::ClickMe => {
                tracing::info!("logic apps: click me pressed");
                EventOutcome::Acknowledged
            }
            WorkspaceButton::Submit => {
                // No checklist tick and nothing persisted yet.
                tracing::info!("logic apps: submit pressed");
                EventOutcome::Acknowledged
            }
            WorkspaceButton::Previous => EventOutcome::Dispatched {
                outcome: self.dispatch(WizardAction::PrevFromLogicApps.as_str()),
            },
            WorkspaceButton::Next => EventOutcome::Dispatched {
                outcome: self.dispatch(WizardAction::NextFromLogicApps.as_str()),
            },
        }
    }

    fn open_step(&mut self, step_id: &str) -> EventOutcome {
        let Some(step) = self.checklist.find_step(step_id) else {
            tracing::warn!(step_id, "unknown checklist step");
            return EventOutcome::Ignored {
                reason: format!("unknown step '{}'", step_id),
            };
        };

        let target = Checklist::target_page_id(step).to_string();
        if target.is_empty() {
            return EventOutcome::Ignored {
                reason: format!("step '{}' has no page", step_id),
            };
        }

        self.navigate(&target);
        EventOutcome::Navigated { page_id: target }
    }

    /// Back to a fresh session: progress, selections, connections, fetched
    /// data and navigation are cleared. Call `load` again to refetch.
    pub fn reset(&mut self) {
        tracing::info!("resetting wizard session");
        self.checklist.reset();
        self.master_ids = MasterIdState::default();
        self.entry_types = TaskMappingFeed::new(MappingFeed::EntryTypes);
        self.entry_type_attributes = TaskMappingFeed::new(MappingFeed::EntryTypeAttributes);
        self.logic_apps = LogicAppsState::default();
        self.navigation = Navigation::default();
    }

    fn record(&mut self, event: &str, outcome: impl ToString) {
        if !self.trace.is_enabled() {
            return;
        }
        self.seq += 1;
        let entry = TraceEvent::now(self.seq, self.navigation.current(), event)
            .with_outcome(outcome)
            .with_progress(self.checklist.completed_step_count())
            .with_fingerprint(self.store.fingerprint());
        self.trace.log(&entry);
    }
}

fn summarize_dispatch(outcome: &DispatchOutcome) -> String {
    let mut parts = Vec::new();
    match &outcome.persisted {
        Some(PersistOutcome::Saved { .. }) => parts.push("saved".to_string()),
        Some(PersistOutcome::Skipped { .. }) => parts.push("save skipped".to_string()),
        Some(PersistOutcome::Failed { message, .. }) => {
            parts.push(format!("save failed: {}", message))
        }
        None => {}
    }
    match &outcome.advanced {
        Some(AdvanceOutcome::Completed { step_index, .. }) => {
            parts.push(format!("completed step {}", step_index + 1))
        }
        Some(AdvanceOutcome::AlreadyCompleted { .. }) => {
            parts.push("already completed".to_string())
        }
        Some(AdvanceOutcome::UnmappedPage) => parts.push("unmapped page".to_string()),
        None => {}
    }
    if let Some(page) = &outcome.navigated_to {
        parts.push(format!("navigated to {}", page));
    }
    if parts.is_empty() {
        "no effect".to_string()
    } else {
        parts.join(", ")
    }
}
