use crate::feature::fetch::FetchState;
use crate::feature::providers::LogicAppItem;

/// Logic app list, selection and the raw definition of the selected app.
#[derive(Debug, Clone, Default)]
pub struct LogicAppsState {
    pub items: Vec<LogicAppItem>,
    pub list_fetch: FetchState,
    pub selected_id: Option<String>,
    pub definition: Option<serde_json::Value>,
    pub definition_fetch: FetchState,
}

impl LogicAppsState {
    /// Select an app. Returns false when it was already selected.
    pub fn select(&mut self, id: &str) -> bool {
        if self.selected_id.as_deref() == Some(id) {
            return false;
        }
        self.selected_id = Some(id.to_string());
        true
    }

    pub fn selected_id_or_empty(&self) -> &str {
        self.selected_id.as_deref().unwrap_or("")
    }
}
