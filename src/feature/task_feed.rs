use serde::{Deserialize, Serialize};

use crate::error::WizardResult;
use crate::feature::fetch::{FetchState, FetchTicket};
use crate::feature::providers::MappingItems;
use crate::workflow::mapping::TaskMappingEngine;

/// Schema `leftSource` value that selects the attributes feed.
pub const ENTRY_TYPE_ATTRIBUTES_LEFT: &str = "entryTypeAttributesLeft";

/// The two independent mapping data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingFeed {
    EntryTypes,
    EntryTypeAttributes,
}

impl MappingFeed {
    /// Route a `taskMapping` descriptor to its feed. Anything other than the
    /// attributes source falls back to entry types.
    pub fn from_left_source(left_source: &str) -> Self {
        if left_source == ENTRY_TYPE_ATTRIBUTES_LEFT {
            MappingFeed::EntryTypeAttributes
        } else {
            MappingFeed::EntryTypes
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MappingFeed::EntryTypes => "entry types",
            MappingFeed::EntryTypeAttributes => "entry type attributes",
        }
    }
}

/// Item data plus click/drag state for one mapping widget.
#[derive(Debug, Clone)]
pub struct TaskMappingFeed {
    pub feed: MappingFeed,
    pub items: MappingItems,
    pub fetch: FetchState,
    pub engine: TaskMappingEngine,
    /// Group key of the most recent entry-type request
    pub group_key: Option<u32>,
}

impl TaskMappingFeed {
    pub fn new(feed: MappingFeed) -> Self {
        Self {
            feed,
            items: MappingItems::default(),
            fetch: FetchState::default(),
            engine: TaskMappingEngine::new(),
            group_key: None,
        }
    }

    pub fn begin_fetch(&mut self, group_key: Option<u32>) -> FetchTicket {
        self.group_key = group_key;
        let ticket = self.fetch.begin();
        tracing::debug!(
            feed = self.feed.label(),
            generation = ticket.generation(),
            ?group_key,
            "fetching mapping items"
        );
        ticket
    }

    /// Apply a fetch result unless a newer fetch has started since.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: WizardResult<MappingItems>) -> bool {
        match self.fetch.finish(self.feed.label(), ticket, result) {
            Some(items) => {
                tracing::debug!(
                    feed = self.feed.label(),
                    left = items.left.len(),
                    right = items.right.len(),
                    "mapping items loaded"
                );
                self.items = items;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_attributes_source_routes_to_attributes_feed() {
        assert_eq!(
            MappingFeed::from_left_source("entryTypeAttributesLeft"),
            MappingFeed::EntryTypeAttributes
        );
        assert_eq!(
            MappingFeed::from_left_source("entryTypesLeft"),
            MappingFeed::EntryTypes
        );
        assert_eq!(
            MappingFeed::from_left_source("somethingElse"),
            MappingFeed::EntryTypes
        );
    }

    #[test]
    fn stale_items_do_not_overwrite_newer_ones() {
        let mut feed = TaskMappingFeed::new(MappingFeed::EntryTypes);
        let first = feed.begin_fetch(Some(1));
        let second = feed.begin_fetch(Some(6));

        assert!(feed.complete_fetch(second, Ok(MappingItems::mirrored(vec!["six".into()]))));
        assert!(!feed.complete_fetch(first, Ok(MappingItems::mirrored(vec!["one".into()]))));
        assert_eq!(feed.items.left, vec!["six"]);
        assert_eq!(feed.group_key, Some(6));
    }
}
