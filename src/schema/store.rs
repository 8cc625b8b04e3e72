use std::collections::HashSet;
use std::path::Path;

use crate::error::{WizardError, WizardResult};
use crate::schema::schema_model::PageDefinition;
use crate::workflow::checklist::PageStepTable;

const BUILTIN_SCHEMA: &str = include_str!("../../pages/migration.json");

/// Immutable, ordered collection of page definitions loaded once at startup.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    pages: Vec<PageDefinition>,
    fingerprint: String,
    step_table: PageStepTable,
}

impl SchemaStore {
    /// The schema shipped with the crate.
    pub fn builtin() -> WizardResult<Self> {
        Self::from_json_str(BUILTIN_SCHEMA)
    }

    pub fn from_json_str(source: &str) -> WizardResult<Self> {
        let pages: Vec<PageDefinition> =
            serde_json::from_str(source).map_err(|source| WizardError::SchemaJson {
                context: "page list".into(),
                source,
            })?;
        Self::from_pages(pages, source)
    }

    pub fn from_yaml_str(source: &str) -> WizardResult<Self> {
        let pages: Vec<PageDefinition> =
            serde_yaml::from_str(source).map_err(|source| WizardError::SchemaYaml {
                context: "page list".into(),
                source,
            })?;
        Self::from_pages(pages, source)
    }

    /// Load a schema file, picking the format from its extension.
    pub fn load_file(path: impl AsRef<Path>) -> WizardResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WizardError::io(format!("reading {}", path.display()), e))?;

        let is_yaml = path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml");

        let store = if is_yaml {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        tracing::info!(
            path = %path.display(),
            pages = store.len(),
            fingerprint = %store.fingerprint(),
            "page schema loaded"
        );
        Ok(store)
    }

    fn from_pages(pages: Vec<PageDefinition>, source: &str) -> WizardResult<Self> {
        validate_page_ids(&pages)?;
        let step_table = derive_step_table(&pages)?;

        Ok(SchemaStore {
            pages,
            fingerprint: schema_fingerprint(source),
            step_table,
        })
    }

    pub fn pages(&self) -> &[PageDefinition] {
        &self.pages
    }

    pub fn get(&self, page_id: &str) -> Option<&PageDefinition> {
        self.pages.iter().find(|p| p.page_id == page_id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// SHA-1 of the raw schema source.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Page-to-step table declared by the schema, or the default table when
    /// no page carries a step index.
    pub fn step_table(&self) -> &PageStepTable {
        &self.step_table
    }
}

fn validate_page_ids(pages: &[PageDefinition]) -> WizardResult<()> {
    let mut seen = HashSet::new();
    for page in pages {
        if page.page_id.trim().is_empty() {
            return Err(WizardError::SchemaValidation(format!(
                "page '{}' has an empty pageId",
                page.title
            )));
        }
        if !seen.insert(page.page_id.as_str()) {
            return Err(WizardError::SchemaValidation(format!(
                "duplicate pageId '{}'",
                page.page_id
            )));
        }
    }
    Ok(())
}

/// Build the page-to-step table from `stepIndex` fields.
///
/// Indices must be unique and contiguous from zero.
fn derive_step_table(pages: &[PageDefinition]) -> WizardResult<PageStepTable> {
    let mut linked: Vec<(&str, usize)> = pages
        .iter()
        .filter_map(|p| p.step_index.map(|idx| (p.page_id.as_str(), idx)))
        .collect();

    if linked.is_empty() {
        return Ok(PageStepTable::default());
    }

    linked.sort_by_key(|(_, idx)| *idx);

    for (expected, (page_id, idx)) in linked.iter().enumerate() {
        if *idx < expected {
            return Err(WizardError::SchemaValidation(format!(
                "stepIndex {} on page '{}' is already used by another page",
                idx, page_id
            )));
        }
        if *idx > expected {
            return Err(WizardError::SchemaValidation(format!(
                "stepIndex values must be contiguous from 0; missing {} before page '{}'",
                expected, page_id
            )));
        }
    }

    Ok(PageStepTable::from_pairs(
        linked.into_iter().map(|(id, idx)| (id.to_string(), idx)),
    ))
}

fn schema_fingerprint(source: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_schema_loads_with_wizard_pages() {
        let store = SchemaStore::builtin().unwrap();
        for id in [
            "migration-start",
            "master-id",
            "entry-types",
            "entry-type-attributes",
            "logic-apps",
        ] {
            assert!(store.get(id).is_some(), "missing page {}", id);
        }
        assert_eq!(store.step_table().step_for("entry-types"), Some(1));
        assert_eq!(store.step_table().step_for("migration-start"), None);
        assert_eq!(store.fingerprint().len(), 40);
    }

    #[test]
    fn duplicate_page_ids_are_rejected() {
        let json = r#"[
            {"pageId":"a","title":"A","layout":"default","components":[]},
            {"pageId":"a","title":"Again","layout":"default","components":[]}
        ]"#;
        let err = SchemaStore::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("duplicate pageId 'a'"));
    }

    #[test]
    fn step_index_gap_is_rejected() {
        let json = r#"[
            {"pageId":"a","title":"A","stepIndex":0},
            {"pageId":"b","title":"B","stepIndex":2}
        ]"#;
        let err = SchemaStore::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn duplicate_step_index_is_rejected() {
        let json = r#"[
            {"pageId":"a","title":"A","stepIndex":0},
            {"pageId":"b","title":"B","stepIndex":0}
        ]"#;
        let err = SchemaStore::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("already used"));
    }

    #[test]
    fn schema_without_step_links_uses_default_table() {
        let json = r#"[{"pageId":"entry-types","title":"Entry Types"}]"#;
        let store = SchemaStore::from_json_str(json).unwrap();
        assert_eq!(store.step_table().step_for("logic-apps"), Some(3));
    }

    #[test]
    fn yaml_and_json_fingerprints_differ_by_source() {
        let yaml = "- pageId: a\n  title: A\n";
        let store = SchemaStore::from_yaml_str(yaml).unwrap();
        assert_eq!(store.len(), 1);
        assert_ne!(
            store.fingerprint(),
            SchemaStore::from_json_str(r#"[{"pageId":"a","title":"A"}]"#)
                .unwrap()
                .fingerprint()
        );
    }
}
