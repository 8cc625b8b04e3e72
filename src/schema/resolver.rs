use crate::error::{WizardError, WizardResult};
use crate::schema::schema_model::PageDefinition;
use crate::schema::store::SchemaStore;

/// Result of looking up a page, shaped like an asynchronous query result so
/// callers can tell "not found" apart from "still loading".
#[derive(Debug, Clone, PartialEq)]
pub struct PageResolution<'a> {
    pub data: Option<&'a PageDefinition>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl PageResolution<'_> {
    pub fn is_not_found(&self) -> bool {
        !self.is_loading && self.data.is_none()
    }
}

/// Synchronous lookup against a fully materialized schema store.
#[derive(Debug, Clone, Copy)]
pub struct PageResolver<'a> {
    store: &'a SchemaStore,
}

impl<'a> PageResolver<'a> {
    pub fn new(store: &'a SchemaStore) -> Self {
        Self { store }
    }

    pub fn resolve(&self, page_id: &str) -> PageResolution<'a> {
        let page = self.store.get(page_id);
        PageResolution {
            data: page,
            is_loading: false,
            error: match page {
                Some(_) => None,
                None => Some(format!("Page not found: {}", page_id)),
            },
        }
    }

    /// Like `resolve`, but reports a missing page as an error.
    pub fn require(&self, page_id: &str) -> WizardResult<&'a PageDefinition> {
        self.store
            .get(page_id)
            .ok_or_else(|| WizardError::PageNotFound(page_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_page_is_not_found_and_not_loading() {
        let store = SchemaStore::builtin().unwrap();
        let resolution = PageResolver::new(&store).resolve("does-not-exist");
        assert!(resolution.data.is_none());
        assert!(!resolution.is_loading);
        assert_eq!(
            resolution.error.as_deref(),
            Some("Page not found: does-not-exist")
        );
        assert!(resolution.is_not_found());
    }

    #[test]
    fn known_page_resolves_by_exact_id() {
        let store = SchemaStore::builtin().unwrap();
        let resolver = PageResolver::new(&store);
        let resolution = resolver.resolve("master-id");
        assert_eq!(resolution.data.map(|p| p.title.as_str()), Some("Master ID Store"));
        assert!(resolution.error.is_none());
        assert!(resolver.resolve("Master-ID").is_not_found());
        assert!(matches!(
            resolver.require("nope"),
            Err(WizardError::PageNotFound(id)) if id == "nope"
        ));
    }
}
