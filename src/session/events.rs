use serde::{Deserialize, Serialize};

use crate::feature::task_feed::MappingFeed;

/// Interaction with a rendered widget, routed back into the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    MasterIdChanged {
        id: String,
    },

    Mapping {
        feed: MappingFeed,
        gesture: MappingGesture,
    },

    LogicAppSelected {
        id: String,
    },

    /// One of the buttons inside the logic apps workspace. These are not
    /// schema actions.
    LogicAppsButton {
        button: WorkspaceButton,
    },

    ChecklistStepClicked {
        step_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingGesture {
    SelectLeft { id: String },
    SelectRight { id: String },
    DragStart { id: String },
    Drop { id: String },
    DragEnd,
    DisconnectPair { left_id: String, right_id: String },
    DisconnectLeft { id: String },
    DisconnectRight { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceButton {
    ClickMe,
    Submit,
    Previous,
    Next,
}

impl UiEvent {
    /// Short label used in trace records.
    pub fn describe(&self) -> String {
        match self {
            UiEvent::MasterIdChanged { id } => format!("master_id_changed:{}", id),
            UiEvent::Mapping { feed, gesture } => {
                format!("mapping:{}:{:?}", feed.label(), gesture)
            }
            UiEvent::LogicAppSelected { id } => format!("logic_app_selected:{}", id),
            UiEvent::LogicAppsButton { button } => format!("logic_apps_button:{:?}", button),
            UiEvent::ChecklistStepClicked { step_id } => {
                format!("checklist_step_clicked:{}", step_id)
            }
        }
    }
}
