use serde::Serialize;

use crate::feature::task_feed::MappingFeed;
use crate::schema::schema_model::PageLayout;
use crate::workflow::checklist::ChecklistStep;
use crate::workflow::mapping::TaskConnection;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DropdownOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonNode {
    pub label: String,
    /// Action id sent back to the dispatcher on click
    pub action: String,
    pub variant: ButtonVariant,
    pub disabled: bool,
    pub centered: bool,
}

/// What the designer area of the logic apps workspace shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DesignerPanel {
    Loading { message: String },
    Placeholder { message: String },
    Designer {
        master_id: String,
        definition: Option<serde_json::Value>,
    },
}

/// Tag plus props handed to the presentational layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "component", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RenderNode {
    Heading {
        value: String,
        level: u8,
    },
    Text {
        value: String,
        full_width: bool,
    },
    Button(ButtonNode),
    ButtonGroup {
        left: Vec<ButtonNode>,
        right: Vec<ButtonNode>,
    },
    Dropdown {
        label: String,
        source: String,
        options: Vec<DropdownOption>,
        value: String,
        placeholder: String,
        is_loading: bool,
        error: Option<String>,
    },
    TaskMapping {
        /// Feed that UI events from this widget must target
        feed: MappingFeed,
        left_source: String,
        right_source: String,
        left_items: Vec<String>,
        right_items: Vec<String>,
        connections: Vec<TaskConnection>,
        selected_left: Option<String>,
        selected_right: Option<String>,
        dragged_item: Option<String>,
        is_loading: bool,
        error: Option<String>,
    },
    LogicAppsWorkspace {
        options: Vec<DropdownOption>,
        selected_id: String,
        is_loading: bool,
        error: Option<String>,
        designer: DesignerPanel,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedComponent {
    /// Position of the descriptor in the page schema
    pub key: usize,
    #[serde(flatten)]
    pub node: RenderNode,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistPanel {
    pub steps: Vec<ChecklistStep>,
    pub completed_step_count: usize,
}

/// A fully rendered page, or an explicit not-found state. Serialized with
/// the same camelCase keys the page schema uses.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PageView {
    Loaded {
        page_id: String,
        title: String,
        description: Option<String>,
        layout: PageLayout,
        components: Vec<RenderedComponent>,
        checklist: Option<ChecklistPanel>,
    },
    NotFound {
        page_id: String,
        is_loading: bool,
        message: String,
    },
}

impl PageView {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageView::NotFound { .. })
    }

    pub fn components(&self) -> &[RenderedComponent] {
        match self {
            PageView::Loaded { components, .. } => components,
            PageView::NotFound { .. } => &[],
        }
    }
}
