use std::collections::HashMap;

use crate::engine::binder::ExternalStateBag;
use crate::engine::render_model::{
    ButtonNode, ButtonVariant, DesignerPanel, RenderNode, RenderedComponent,
};
use crate::feature::task_feed::MappingFeed;
use crate::schema::schema_model::{
    ButtonConfig, ButtonPosition, Component, ComponentDescriptor, ComponentKind,
};
use crate::workflow::actions::{WizardAction, is_previous_action};

/// Dropdown `source` bound to the master id feed.
pub const MASTER_IDS_SOURCE: &str = "masterIds";

/// Maps descriptor fields plus a slice of external state to render props.
pub type RenderFn = fn(&Component, &ExternalStateBag) -> RenderNode;

/// Lookup table from component tag to renderer.
pub struct ComponentRegistry {
    renderers: HashMap<ComponentKind, RenderFn>,
}

impl ComponentRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registry with a renderer for every known component kind.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(ComponentKind::Heading, render_heading);
        registry.register(ComponentKind::Button, render_button);
        registry.register(ComponentKind::ButtonGroup, render_button_group);
        registry.register(ComponentKind::Text, render_text);
        registry.register(ComponentKind::Dropdown, render_dropdown);
        registry.register(ComponentKind::TaskMapping, render_task_mapping);
        registry.register(ComponentKind::LogicAppsWorkspace, render_logic_apps_workspace);
        registry
    }

    pub fn register(&mut self, kind: ComponentKind, renderer: RenderFn) {
        self.renderers.insert(kind, renderer);
    }

    pub fn unregister(&mut self, kind: ComponentKind) -> Option<RenderFn> {
        self.renderers.remove(&kind)
    }

    pub fn is_registered(&self, kind: ComponentKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Render one descriptor. Anything that cannot be rendered logs a warning
    /// and renders nothing.
    pub fn render(
        &self,
        descriptor: &ComponentDescriptor,
        index: usize,
        external: &ExternalStateBag,
    ) -> Option<RenderedComponent> {
        let component = match descriptor {
            ComponentDescriptor::Known(component) => component,
            ComponentDescriptor::Unrecognized(other) => {
                tracing::warn!(
                    component_type = %other.type_name,
                    index,
                    "unknown component type"
                );
                return None;
            }
            ComponentDescriptor::Malformed(bad) => {
                tracing::warn!(
                    component_type = bad.type_name.as_deref().unwrap_or("<missing>"),
                    index,
                    error = %bad.error,
                    "malformed component descriptor"
                );
                return None;
            }
        };

        let Some(renderer) = self.renderers.get(&component.kind()) else {
            tracing::warn!(
                component_type = component.kind().as_str(),
                index,
                "component type is not registered"
            );
            return None;
        };

        Some(RenderedComponent {
            key: index,
            node: renderer(component, external),
        })
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Disabled-state rule table: only actions that honor the submit flag can
/// be disabled.
fn button_disabled(action: &str, external: &ExternalStateBag) -> bool {
    match action.parse::<WizardAction>() {
        Ok(known) if known.honors_submit_disabled() => external.submit_disabled,
        _ => false,
    }
}

fn button_variant(action: &str) -> ButtonVariant {
    if is_previous_action(action) {
        ButtonVariant::Secondary
    } else {
        ButtonVariant::Primary
    }
}

fn render_heading(component: &Component, _external: &ExternalStateBag) -> RenderNode {
    let value = match component {
        Component::Heading { value } => value.clone(),
        _ => String::new(),
    };
    RenderNode::Heading { value, level: 1 }
}

fn render_text(component: &Component, _external: &ExternalStateBag) -> RenderNode {
    let value = match component {
        Component::Text { value } => value.clone(),
        _ => String::new(),
    };
    RenderNode::Text {
        value,
        full_width: true,
    }
}

fn render_button(component: &Component, external: &ExternalStateBag) -> RenderNode {
    let (label, action) = match component {
        Component::Button { label, action } => (label.clone(), action.clone()),
        _ => (String::new(), String::new()),
    };
    RenderNode::Button(ButtonNode {
        disabled: button_disabled(&action, external),
        variant: ButtonVariant::Primary,
        centered: true,
        label,
        action,
    })
}

fn render_button_group(component: &Component, external: &ExternalStateBag) -> RenderNode {
    let buttons: &[ButtonConfig] = match component {
        Component::ButtonGroup { buttons } => buttons.as_slice(),
        _ => &[],
    };

    let to_node = |config: &ButtonConfig| ButtonNode {
        label: config.label.clone(),
        action: config.action.clone(),
        variant: button_variant(&config.action),
        disabled: button_disabled(&config.action, external),
        centered: false,
    };

    RenderNode::ButtonGroup {
        left: buttons
            .iter()
            .filter(|b| b.position == ButtonPosition::Left)
            .map(to_node)
            .collect(),
        right: buttons
            .iter()
            .filter(|b| b.position == ButtonPosition::Right)
            .map(to_node)
            .collect(),
    }
}

fn render_dropdown(component: &Component, external: &ExternalStateBag) -> RenderNode {
    let (label, source) = match component {
        Component::Dropdown { label, source } => (label.clone(), source.clone()),
        _ => (String::new(), String::new()),
    };

    // Only the master id source has a feed behind it.
    if source == MASTER_IDS_SOURCE {
        let binding = &external.master_ids;
        RenderNode::Dropdown {
            label,
            source,
            options: binding.options.clone(),
            value: binding.value.clone(),
            placeholder: "Select an option".into(),
            is_loading: binding.is_loading,
            error: binding.error.clone(),
        }
    } else {
        tracing::debug!(source = %source, "dropdown source has no bound feed");
        RenderNode::Dropdown {
            label,
            source,
            options: Vec::new(),
            value: String::new(),
            placeholder: "Select an option".into(),
            is_loading: false,
            error: None,
        }
    }
}

fn render_task_mapping(component: &Component, external: &ExternalStateBag) -> RenderNode {
    let (left_source, right_source) = match component {
        Component::TaskMapping {
            left_source,
            right_source,
        } => (left_source.clone(), right_source.clone()),
        _ => (String::new(), String::new()),
    };

    let feed = MappingFeed::from_left_source(&left_source);
    let binding = external.mapping(feed);

    RenderNode::TaskMapping {
        feed,
        left_source,
        right_source,
        left_items: binding.left.clone(),
        right_items: binding.right.clone(),
        connections: binding.connections.clone(),
        selected_left: binding.selected_left.clone(),
        selected_right: binding.selected_right.clone(),
        dragged_item: binding.dragged_item.clone(),
        is_loading: binding.is_loading,
        error: binding.error.clone(),
    }
}

fn render_logic_apps_workspace(_component: &Component, external: &ExternalStateBag) -> RenderNode {
    let binding = &external.logic_apps;

    let designer = if binding.definition_loading {
        DesignerPanel::Loading {
            message: "Loading Logic App definition...".into(),
        }
    } else if binding.selected_id.is_empty() {
        DesignerPanel::Placeholder {
            message: "Select a Logic App to view the workflow".into(),
        }
    } else {
        DesignerPanel::Designer {
            master_id: binding.selected_id.clone(),
            definition: binding.definition.clone(),
        }
    };

    RenderNode::LogicAppsWorkspace {
        options: binding.options.clone(),
        selected_id: binding.selected_id.clone(),
        is_loading: binding.is_loading,
        error: binding.error.clone(),
        designer,
    }
}
