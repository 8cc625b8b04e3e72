use serde::Serialize;

use crate::engine::render_model::DropdownOption;
use crate::feature::logic_apps::LogicAppsState;
use crate::feature::master_ids::MasterIdState;
use crate::feature::task_feed::{MappingFeed, TaskMappingFeed};
use crate::workflow::mapping::TaskConnection;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MasterIdBinding {
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MappingBinding {
    pub feed: MappingFeed,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub connections: Vec<TaskConnection>,
    pub selected_left: Option<String>,
    pub selected_right: Option<String>,
    pub dragged_item: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl MappingBinding {
    pub fn empty(feed: MappingFeed) -> Self {
        Self {
            feed,
            left: Vec::new(),
            right: Vec::new(),
            connections: Vec::new(),
            selected_left: None,
            selected_right: None,
            dragged_item: None,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LogicAppsBinding {
    pub options: Vec<DropdownOption>,
    pub selected_id: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub definition: Option<serde_json::Value>,
    pub definition_loading: bool,
}

/// Per-render snapshot of every feature slice, keyed by feature.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExternalStateBag {
    pub master_ids: MasterIdBinding,
    pub entry_types: MappingBinding,
    pub entry_type_attributes: MappingBinding,
    pub logic_apps: LogicAppsBinding,
    /// Submit stays disabled until a master id is chosen
    pub submit_disabled: bool,
}

impl ExternalStateBag {
    pub fn mapping(&self, feed: MappingFeed) -> &MappingBinding {
        match feed {
            MappingFeed::EntryTypes => &self.entry_types,
            MappingFeed::EntryTypeAttributes => &self.entry_type_attributes,
        }
    }
}

impl Default for ExternalStateBag {
    fn default() -> Self {
        Self {
            master_ids: MasterIdBinding::default(),
            entry_types: MappingBinding::empty(MappingFeed::EntryTypes),
            entry_type_attributes: MappingBinding::empty(MappingFeed::EntryTypeAttributes),
            logic_apps: LogicAppsBinding::default(),
            submit_disabled: true,
        }
    }
}

/// Assemble the bag from live feature state.
pub fn bind_external_state(
    master_ids: &MasterIdState,
    entry_types: &TaskMappingFeed,
    entry_type_attributes: &TaskMappingFeed,
    logic_apps: &LogicAppsState,
) -> ExternalStateBag {
    ExternalStateBag {
        master_ids: MasterIdBinding {
            options: master_ids
                .options
                .iter()
                .map(|opt| DropdownOption {
                    id: opt.id.clone(),
                    label: opt.label.clone(),
                })
                .collect(),
            value: master_ids.selected_id.clone(),
            is_loading: master_ids.fetch.is_loading,
            error: master_ids.fetch.error.clone(),
        },
        entry_types: bind_mapping(entry_types),
        entry_type_attributes: bind_mapping(entry_type_attributes),
        logic_apps: LogicAppsBinding {
            options: logic_apps
                .items
                .iter()
                .map(|la| DropdownOption {
                    id: la.id.clone(),
                    label: la.label.clone(),
                })
                .collect(),
            selected_id: logic_apps.selected_id_or_empty().to_string(),
            is_loading: logic_apps.list_fetch.is_loading,
            error: logic_apps
                .list_fetch
                .error
                .clone()
                .or_else(|| logic_apps.definition_fetch.error.clone()),
            definition: logic_apps.definition.clone(),
            definition_loading: logic_apps.definition_fetch.is_loading,
        },
        submit_disabled: !master_ids.has_selection(),
    }
}

fn bind_mapping(feed: &TaskMappingFeed) -> MappingBinding {
    MappingBinding {
        feed: feed.feed,
        left: feed.items.left.clone(),
        right: feed.items.right.clone(),
        connections: feed.engine.connections().to_vec(),
        selected_left: feed.engine.selected_left().map(str::to_string),
        selected_right: feed.engine.selected_right().map(str::to_string),
        dragged_item: feed.engine.dragged_item().map(str::to_string),
        is_loading: feed.fetch.is_loading,
        error: feed.fetch.error.clone(),
    }
}
