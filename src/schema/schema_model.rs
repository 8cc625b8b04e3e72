use serde::{Deserialize, Deserializer, Serialize};

/// A declarative description of one wizard screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageDefinition {
    /// Unique key used for routing and resolution
    pub page_id: String,

    pub title: String,

    /// Full-width description rendered below the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub layout: PageLayout,

    /// Zero-based checklist step this page completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,

    #[serde(default)]
    pub components: Vec<ComponentDescriptor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageLayout {
    #[default]
    Default,
    /// Wizard layout: renders the checklist panel next to the page
    Migration,
}

/// Which side of a button group a button sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ButtonConfig {
    pub label: String,
    pub action: String,
    pub position: ButtonPosition,
}

/// The widget variants the engine knows how to describe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Component {
    Heading {
        value: String,
    },
    Button {
        label: String,
        action: String,
    },
    ButtonGroup {
        buttons: Vec<ButtonConfig>,
    },
    Text {
        value: String,
    },
    Dropdown {
        label: String,
        source: String,
    },
    #[serde(rename_all = "camelCase")]
    TaskMapping {
        left_source: String,
        right_source: String,
    },
    LogicAppsWorkspace {
        source: String,
    },
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Heading { .. } => ComponentKind::Heading,
            Component::Button { .. } => ComponentKind::Button,
            Component::ButtonGroup { .. } => ComponentKind::ButtonGroup,
            Component::Text { .. } => ComponentKind::Text,
            Component::Dropdown { .. } => ComponentKind::Dropdown,
            Component::TaskMapping { .. } => ComponentKind::TaskMapping,
            Component::LogicAppsWorkspace { .. } => ComponentKind::LogicAppsWorkspace,
        }
    }
}

/// A component entry whose `type` tag did not match any known variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnrecognizedComponent {
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A component entry with a known tag but unusable fields, or no tag at all.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MalformedComponent {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub error: String,
}

/// One entry in a page's component list.
///
/// The `type` tag is read first. A known tag whose fields fail to parse
/// becomes `Malformed` with the field error, an unknown tag becomes
/// `Unrecognized`. Neither fails the schema load.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ComponentDescriptor {
    Known(Component),
    Unrecognized(UnrecognizedComponent),
    Malformed(MalformedComponent),
}

impl<'de> Deserialize<'de> for ComponentDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;

        let Some(tag) = raw.get("type").and_then(|t| t.as_str()) else {
            return Ok(ComponentDescriptor::Malformed(MalformedComponent {
                type_name: None,
                error: "missing string field `type`".to_string(),
            }));
        };

        if ComponentKind::from_tag(tag).is_none() {
            return Ok(ComponentDescriptor::Unrecognized(UnrecognizedComponent {
                type_name: tag.to_string(),
            }));
        }

        let tag = tag.to_string();
        Ok(match serde_json::from_value::<Component>(raw) {
            Ok(component) => ComponentDescriptor::Known(component),
            Err(e) => ComponentDescriptor::Malformed(MalformedComponent {
                type_name: Some(tag),
                error: e.to_string(),
            }),
        })
    }
}

impl ComponentDescriptor {
    /// The discriminant tag as written in the schema, empty when missing.
    pub fn type_name(&self) -> &str {
        match self {
            ComponentDescriptor::Known(component) => component.kind().as_str(),
            ComponentDescriptor::Unrecognized(other) => &other.type_name,
            ComponentDescriptor::Malformed(bad) => bad.type_name.as_deref().unwrap_or(""),
        }
    }
}

impl From<Component> for ComponentDescriptor {
    fn from(component: Component) -> Self {
        ComponentDescriptor::Known(component)
    }
}

/// Registry key for a component variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Heading,
    Button,
    ButtonGroup,
    Text,
    Dropdown,
    TaskMapping,
    LogicAppsWorkspace,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::Heading,
        ComponentKind::Button,
        ComponentKind::ButtonGroup,
        ComponentKind::Text,
        ComponentKind::Dropdown,
        ComponentKind::TaskMapping,
        ComponentKind::LogicAppsWorkspace,
    ];

    pub fn from_tag(tag: &str) -> Option<ComponentKind> {
        ComponentKind::ALL.iter().copied().find(|k| k.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Heading => "heading",
            ComponentKind::Button => "button",
            ComponentKind::ButtonGroup => "buttonGroup",
            ComponentKind::Text => "text",
            ComponentKind::Dropdown => "dropdown",
            ComponentKind::TaskMapping => "taskMapping",
            ComponentKind::LogicAppsWorkspace => "logicAppsWorkspace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_mapping_uses_camel_case_sources() {
        let json = r#"{"type":"taskMapping","leftSource":"entryTypesLeft","rightSource":"entryTypesRight"}"#;
        let descriptor: ComponentDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            descriptor,
            ComponentDescriptor::Known(Component::TaskMapping {
                left_source: "entryTypesLeft".into(),
                right_source: "entryTypesRight".into(),
            })
        );
        assert_eq!(descriptor.type_name(), "taskMapping");
    }

    #[test]
    fn unknown_tag_is_kept_by_name() {
        let json = r#"{"type":"carousel","slides":3}"#;
        let descriptor: ComponentDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.type_name(), "carousel");
        assert!(matches!(descriptor, ComponentDescriptor::Unrecognized(_)));
    }

    #[test]
    fn known_tag_with_missing_field_is_malformed_not_unknown() {
        let json = r#"{"type":"button","label":"Go"}"#;
        let descriptor: ComponentDescriptor = serde_json::from_str(json).unwrap();
        match &descriptor {
            ComponentDescriptor::Malformed(bad) => {
                assert_eq!(bad.type_name.as_deref(), Some("button"));
                assert!(bad.error.contains("action"), "error was: {}", bad.error);
            }
            other => panic!("expected malformed descriptor, got {:?}", other),
        }
        assert_eq!(descriptor.type_name(), "button");
    }

    #[test]
    fn entry_without_type_does_not_fail_the_page() {
        let json = r#"[{"value":"x"},{"type":"text","value":"kept"}]"#;
        let list: Vec<ComponentDescriptor> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            &list[0],
            ComponentDescriptor::Malformed(MalformedComponent { type_name: None, .. })
        ));
        assert_eq!(
            list[1],
            ComponentDescriptor::Known(Component::Text {
                value: "kept".into()
            })
        );
    }

    #[test]
    fn every_kind_is_found_by_its_tag() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ComponentKind::from_tag("carousel"), None);
    }

    #[test]
    fn layout_defaults_when_missing() {
        let json = r#"{"pageId":"p","title":"T","components":[]}"#;
        let page: PageDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(page.layout, PageLayout::Default);
        assert_eq!(page.step_index, None);
        assert!(page.description.is_none());
    }
}
