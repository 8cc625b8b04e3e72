use crate::feature::fetch::FetchState;
use crate::feature::providers::{DEFAULT_GROUP_KEY, MasterIdOption};

/// Master id options and the current selection.
#[derive(Debug, Clone)]
pub struct MasterIdState {
    pub options: Vec<MasterIdOption>,
    pub fetch: FetchState,
    /// Empty until the user picks an option
    pub selected_id: String,
    pub selected_group_key: u32,
}

impl Default for MasterIdState {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            fetch: FetchState::default(),
            selected_id: String::new(),
            selected_group_key: DEFAULT_GROUP_KEY,
        }
    }
}

impl MasterIdState {
    /// Select an id and look up its group key. Returns true when the group
    /// key changed, meaning dependent feeds need a refetch.
    pub fn select(&mut self, id: &str) -> bool {
        let group_key = self
            .options
            .iter()
            .find(|opt| opt.id == id)
            .map(|opt| opt.group_key)
            .unwrap_or(DEFAULT_GROUP_KEY);

        tracing::debug!(master_id = id, group_key, "master id selected");

        self.selected_id = id.to_string();
        let changed = group_key != self.selected_group_key;
        self.selected_group_key = group_key;
        changed
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_id.is_empty()
    }
}
