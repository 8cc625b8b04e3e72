#![allow(dead_code)]

use std::path::PathBuf;

use migration_wizard::api::fixtures::{InMemoryMappingStore, InMemoryMasterIdStore};
use migration_wizard::feature::providers::Collaborators;
use migration_wizard::schema::store::SchemaStore;
use migration_wizard::session::wizard::WizardSession;

/// Loaded session over the built-in schema and fixture data.
pub fn fixture_session() -> WizardSession {
    let mut session = WizardSession::new(builtin_schema(), Collaborators::fixtures());
    session.load();
    session
}

/// Loaded session plus handles onto its in-memory stores.
pub fn session_with_stores() -> (WizardSession, InMemoryMasterIdStore, InMemoryMappingStore) {
    let ids = InMemoryMasterIdStore::new();
    let mappings = InMemoryMappingStore::new();
    let mut session = WizardSession::new(
        builtin_schema(),
        Collaborators::fixtures_with_stores(ids.clone(), mappings.clone()),
    );
    session.load();
    (session, ids, mappings)
}

pub fn builtin_schema() -> SchemaStore {
    SchemaStore::builtin().unwrap()
}

pub fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub const WIRED_PAGES: [&str; 4] = [
    "master-id",
    "entry-types",
    "entry-type-attributes",
    "logic-apps",
];
