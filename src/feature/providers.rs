use serde::{Deserialize, Serialize};

use crate::error::WizardResult;
use crate::feature::task_feed::MappingFeed;
use crate::workflow::mapping::TaskConnection;

/// Group key used when a master id has no explicit one.
pub const DEFAULT_GROUP_KEY: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MasterIdOption {
    pub id: String,
    pub label: String,
    /// Entry-type filter key for this master id
    #[serde(rename = "ocisid")]
    pub group_key: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryTypeItem {
    pub ocid: i64,
    pub ocisid: u32,
    pub ocname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocdescription: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogicAppItem {
    pub id: String,
    pub label: String,
}

/// Item lists for the two sides of a mapping widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappingItems {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl MappingItems {
    /// Entry types map their names onto the numbered targets "1".."N".
    pub fn from_entry_types(items: &[EntryTypeItem]) -> Self {
        let left: Vec<String> = items.iter().map(|item| item.ocname.clone()).collect();
        let right = (1..=left.len()).map(|n| n.to_string()).collect();
        Self { left, right }
    }

    /// Same names on both sides.
    pub fn mirrored(names: Vec<String>) -> Self {
        Self {
            right: names.clone(),
            left: names,
        }
    }
}

pub trait MasterIdProvider {
    fn fetch_master_ids(&self) -> WizardResult<Vec<MasterIdOption>>;
}

pub trait EntryTypesProvider {
    /// Entry types whose group key equals `group_key`.
    fn fetch_entry_types(&self, group_key: u32) -> WizardResult<Vec<EntryTypeItem>>;
}

pub trait EntryTypeAttributesProvider {
    fn fetch_attribute_names(&self) -> WizardResult<Vec<String>>;
}

pub trait LogicAppsProvider {
    fn fetch_logic_apps(&self) -> WizardResult<Vec<LogicAppItem>>;

    /// Raw workflow definition JSON, passed through untouched.
    fn fetch_definition(&self, id: &str) -> WizardResult<serde_json::Value>;
}

pub trait MasterIdStore {
    fn save_master_id(&self, master_id: &str) -> WizardResult<()>;
}

/// Saves the full connection set of one mapping feed.
pub trait MappingStore {
    fn save_mappings(&self, feed: MappingFeed, connections: &[TaskConnection]) -> WizardResult<()>;
}

/// Every external collaborator the wizard talks to.
pub struct Collaborators {
    pub master_ids: Box<dyn MasterIdProvider>,
    pub entry_types: Box<dyn EntryTypesProvider>,
    pub entry_type_attributes: Box<dyn EntryTypeAttributesProvider>,
    pub logic_apps: Box<dyn LogicAppsProvider>,
    pub master_id_store: Box<dyn MasterIdStore>,
    pub mapping_store: Box<dyn MappingStore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_types_map_onto_numbered_targets() {
        let items = vec![
            EntryTypeItem {
                ocid: 10,
                ocisid: 1,
                ocname: "Invoice".into(),
                ocdescription: None,
            },
            EntryTypeItem {
                ocid: 11,
                ocisid: 1,
                ocname: "Receipt".into(),
                ocdescription: Some("Paid".into()),
            },
        ];
        let mapped = MappingItems::from_entry_types(&items);
        assert_eq!(mapped.left, vec!["Invoice", "Receipt"]);
        assert_eq!(mapped.right, vec!["1", "2"]);
    }

    #[test]
    fn master_id_group_key_reads_ocisid() {
        let json = r#"{"id":"MID-1","label":"MID-1","ocisid":6}"#;
        let option: MasterIdOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.group_key, 6);
    }
}
