use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::error::{WizardError, WizardResult};
use crate::feature::providers::{
    Collaborators, EntryTypeAttributesProvider, EntryTypeItem, EntryTypesProvider, LogicAppItem,
    LogicAppsProvider, MappingStore, MasterIdOption, MasterIdProvider, MasterIdStore,
};
use crate::feature::task_feed::MappingFeed;
use crate::workflow::mapping::TaskConnection;

pub const ENTRY_TYPE_ATTRIBUTE_NAMES: [&str; 10] = [
    "ATTR_NAME",
    "ATTR_DESCRIPTION",
    "ATTR_STATUS",
    "ATTR_TYPE",
    "ATTR_CATEGORY",
    "ATTR_OWNER",
    "ATTR_CREATED_DATE",
    "ATTR_MODIFIED_DATE",
    "ATTR_EXPIRY_DATE",
    "ATTR_PRIORITY",
];

/// Serves a fixed list of master ids, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct FixtureMasterIds {
    pub options: Vec<MasterIdOption>,
    pub failure: Option<String>,
}

impl FixtureMasterIds {
    pub fn sample() -> Self {
        let options = [("MID-ALPHA", 1), ("MID-BETA", 6), ("MID-GAMMA", 9), ("MID-DELTA", 1)]
            .into_iter()
            .map(|(id, group_key)| MasterIdOption {
                id: id.to_string(),
                label: id.to_string(),
                group_key,
            })
            .collect();
        Self {
            options,
            failure: None,
        }
    }
}

impl MasterIdProvider for FixtureMasterIds {
    fn fetch_master_ids(&self) -> WizardResult<Vec<MasterIdOption>> {
        match &self.failure {
            Some(message) => Err(WizardError::fetch("master IDs", message.clone())),
            None => Ok(self.options.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureEntryTypes {
    pub items: Vec<EntryTypeItem>,
    pub failure: Option<String>,
}

impl FixtureEntryTypes {
    pub fn sample() -> Self {
        let rows = [
            (101, 1, "Invoice"),
            (102, 1, "Receipt"),
            (103, 1, "Purchase Order"),
            (201, 6, "Contract"),
            (202, 6, "Amendment"),
            (301, 9, "Policy"),
        ];
        let items = rows
            .into_iter()
            .map(|(ocid, ocisid, name)| EntryTypeItem {
                ocid,
                ocisid,
                ocname: name.to_string(),
                ocdescription: None,
            })
            .collect();
        Self {
            items,
            failure: None,
        }
    }
}

impl EntryTypesProvider for FixtureEntryTypes {
    fn fetch_entry_types(&self, group_key: u32) -> WizardResult<Vec<EntryTypeItem>> {
        if let Some(message) = &self.failure {
            return Err(WizardError::fetch("entry types", message.clone()));
        }
        Ok(self
            .items
            .iter()
            .filter(|item| item.ocisid == group_key)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct FixtureEntryTypeAttributes {
    pub names: Vec<String>,
    pub failure: Option<String>,
}

impl Default for FixtureEntryTypeAttributes {
    fn default() -> Self {
        Self {
            names: ENTRY_TYPE_ATTRIBUTE_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
            failure: None,
        }
    }
}

impl EntryTypeAttributesProvider for FixtureEntryTypeAttributes {
    fn fetch_attribute_names(&self) -> WizardResult<Vec<String>> {
        match &self.failure {
            Some(message) => Err(WizardError::fetch("entry type attributes", message.clone())),
            None => Ok(self.names.clone()),
        }
    }
}

/// Six logic apps sharing one raw workflow definition.
#[derive(Debug, Clone)]
pub struct FixtureLogicApps {
    pub items: Vec<LogicAppItem>,
    pub definition: serde_json::Value,
    pub failure: Option<String>,
}

impl Default for FixtureLogicApps {
    fn default() -> Self {
        Self {
            items: (1..=6)
                .map(|n| LogicAppItem {
                    id: format!("logic-app-{}", n),
                    label: format!("LogicApp{}", n),
                })
                .collect(),
            definition: sample_workflow_definition(),
            failure: None,
        }
    }
}

impl LogicAppsProvider for FixtureLogicApps {
    fn fetch_logic_apps(&self) -> WizardResult<Vec<LogicAppItem>> {
        match &self.failure {
            Some(message) => Err(WizardError::fetch("logic apps", message.clone())),
            None => Ok(self.items.clone()),
        }
    }

    fn fetch_definition(&self, id: &str) -> WizardResult<serde_json::Value> {
        if let Some(message) = &self.failure {
            return Err(WizardError::fetch("logic app definition", message.clone()));
        }
        if !self.items.iter().any(|item| item.id == id) {
            return Err(WizardError::fetch(
                "logic app definition",
                format!("no logic app with id '{}'", id),
            ));
        }
        Ok(self.definition.clone())
    }
}

fn sample_workflow_definition() -> serde_json::Value {
    json!({
        "definition": {
            "$schema": "https://schema.management.azure.com/providers/Microsoft.Logic/schemas/2016-06-01/workflowdefinition.json#",
            "contentVersion": "1.0.0.0",
            "triggers": {
                "Receive_HTTP_Request": {
                    "type": "Request",
                    "kind": "Http",
                    "inputs": {
                        "method": "POST",
                        "schema": {
                            "type": "object",
                            "properties": { "schemaId": { "type": "string", "minLength": 1 } },
                            "required": ["schemaId"]
                        }
                    }
                }
            },
            "actions": {
                "Initialize_CorrelationId": {
                    "runAfter": {},
                    "type": "InitializeVariable",
                    "inputs": {
                        "variables": [
                            { "name": "correlationId", "type": "string", "value": "@{guid()}" }
                        ]
                    }
                },
                "Return_Success_Response": {
                    "runAfter": { "Initialize_CorrelationId": ["Succeeded"] },
                    "type": "Response",
                    "kind": "Http",
                    "inputs": { "statusCode": 200, "body": "" }
                }
            },
            "outputs": {}
        },
        "parameters": {}
    })
}

#[derive(Debug, Default)]
struct SavedMasterId {
    last: Option<String>,
    saves: usize,
    failure: Option<String>,
}

/// Records the last saved master id. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMasterIdStore {
    inner: Arc<Mutex<SavedMasterId>>,
}

impl InMemoryMasterIdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_saved(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|s| s.last.clone())
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|s| s.saves).unwrap_or(0)
    }

    /// Make subsequent saves fail with `message`, or succeed again with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut state) = self.inner.lock() {
            state.failure = message.map(str::to_string);
        }
    }
}

impl MasterIdStore for InMemoryMasterIdStore {
    fn save_master_id(&self, master_id: &str) -> WizardResult<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| WizardError::persistence("master ID", e.to_string()))?;
        if let Some(message) = &state.failure {
            return Err(WizardError::persistence("master ID", message.clone()));
        }
        state.last = Some(master_id.to_string());
        state.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SavedMappings {
    by_feed: HashMap<MappingFeed, Vec<TaskConnection>>,
    saves: usize,
    failure: Option<String>,
}

/// Keeps the last full connection set saved per feed. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    inner: Arc<Mutex<SavedMappings>>,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self, feed: MappingFeed) -> Vec<TaskConnection> {
        self.inner
            .lock()
            .ok()
            .and_then(|s| s.by_feed.get(&feed).cloned())
            .unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|s| s.saves).unwrap_or(0)
    }

    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut state) = self.inner.lock() {
            state.failure = message.map(str::to_string);
        }
    }
}

impl MappingStore for InMemoryMappingStore {
    fn save_mappings(&self, feed: MappingFeed, connections: &[TaskConnection]) -> WizardResult<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| WizardError::persistence(feed.label(), e.to_string()))?;
        if let Some(message) = &state.failure {
            return Err(WizardError::persistence(feed.label(), message.clone()));
        }
        state.by_feed.insert(feed, connections.to_vec());
        state.saves += 1;
        Ok(())
    }
}

impl Collaborators {
    /// Fixture data for every feed and fresh in-memory stores.
    pub fn fixtures() -> Self {
        Self::fixtures_with_stores(InMemoryMasterIdStore::new(), InMemoryMappingStore::new())
    }

    /// Fixture feeds writing to the given stores, so callers can inspect
    /// what was saved.
    pub fn fixtures_with_stores(
        master_id_store: InMemoryMasterIdStore,
        mapping_store: InMemoryMappingStore,
    ) -> Self {
        Self {
            master_ids: Box::new(FixtureMasterIds::sample()),
            entry_types: Box::new(FixtureEntryTypes::sample()),
            entry_type_attributes: Box::new(FixtureEntryTypeAttributes::default()),
            logic_apps: Box::new(FixtureLogicApps::default()),
            master_id_store: Box::new(master_id_store),
            mapping_store: Box::new(mapping_store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_types_are_filtered_by_group_key() {
        let provider = FixtureEntryTypes::sample();
        let group_six = provider.fetch_entry_types(6).unwrap();
        assert_eq!(group_six.len(), 2);
        assert!(group_six.iter().all(|i| i.ocisid == 6));
        assert!(provider.fetch_entry_types(42).unwrap().is_empty());
    }

    #[test]
    fn mapping_store_clones_share_saved_state() {
        let store = InMemoryMappingStore::new();
        let handle = store.clone();
        store
            .save_mappings(MappingFeed::EntryTypes, &[TaskConnection::new("A", "1")])
            .unwrap();
        assert_eq!(handle.saved(MappingFeed::EntryTypes).len(), 1);
        assert!(handle.saved(MappingFeed::EntryTypeAttributes).is_empty());

        handle.set_failure(Some("offline"));
        let err = store
            .save_mappings(MappingFeed::EntryTypes, &[])
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to save entry types: offline");
        assert_eq!(handle.saved(MappingFeed::EntryTypes).len(), 1);
    }

    #[test]
    fn unknown_logic_app_definition_is_a_fetch_error() {
        let provider = FixtureLogicApps::default();
        assert!(provider.fetch_definition("logic-app-3").is_ok());
        assert!(matches!(
            provider.fetch_definition("logic-app-99"),
            Err(WizardError::Fetch { .. })
        ));
    }
}
