use migration_wizard::engine::binder::ExternalStateBag;
use migration_wizard::engine::registry::ComponentRegistry;
use migration_wizard::engine::renderer::render_page;
use migration_wizard::error::WizardError;
use migration_wizard::feature::providers::Collaborators;
use migration_wizard::schema::resolver::PageResolver;
use migration_wizard::schema::schema_model::{
    ComponentDescriptor, MalformedComponent, PageLayout,
};
use migration_wizard::schema::store::SchemaStore;
use migration_wizard::session::events::UiEvent;
use migration_wizard::session::wizard::{EventOutcome, WizardSession};
use migration_wizard::workflow::checklist::{AdvanceOutcome, Checklist};

mod common;
use common::write_file;

const YAML_SCHEMA: &str = r#"
- pageId: intro
  title: Intro
  components:
    - type: text
      value: Welcome
- pageId: sources
  title: Sources
  layout: migration
  stepIndex: 1
  components:
    - type: heading
      value: Sources
    - type: carousel
      slides: 3
    - type: dropdown
      label: Master ID
      source: masterIds
- pageId: targets
  title: Targets
  layout: migration
  stepIndex: 0
  components: []
"#;

#[test]
fn yaml_schema_loads_from_file_with_unknown_component() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "pages.yaml", YAML_SCHEMA);

    let store = SchemaStore::load_file(&path).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.fingerprint().len(), 40);

    let sources = store.get("sources").unwrap();
    assert_eq!(sources.layout, PageLayout::Migration);
    assert!(matches!(
        sources.components[1],
        ComponentDescriptor::Unrecognized(_)
    ));
    assert_eq!(sources.components[1].type_name(), "carousel");
}

#[test]
fn unknown_component_is_skipped_but_page_still_renders() {
    let store = SchemaStore::from_yaml_str(YAML_SCHEMA).unwrap();
    let resolver = PageResolver::new(&store);
    let registry = ComponentRegistry::standard();
    let external = ExternalStateBag::default();

    let view = render_page(
        &resolver,
        &registry,
        "sources",
        &external,
        &Checklist::default(),
    );
    assert!(!view.is_not_found());
    let keys: Vec<usize> = view.components().iter().map(|c| c.key).collect();
    assert_eq!(keys, vec![2]);
}

#[test]
fn schema_step_indices_drive_the_checklist() {
    let store = SchemaStore::from_yaml_str(YAML_SCHEMA).unwrap();
    assert_eq!(store.step_table().step_for("targets"), Some(0));
    assert_eq!(store.step_table().step_for("sources"), Some(1));
    assert_eq!(store.step_table().step_for("master-id"), None);

    let mut session = WizardSession::new(store, Collaborators::fixtures());
    assert_eq!(
        session.checklist_mut().advance_for_page("sources"),
        AdvanceOutcome::Completed {
            step_index: 1,
            completed_step_count: 2
        }
    );
    assert_eq!(
        session.checklist_mut().advance_for_page("master-id"),
        AdvanceOutcome::UnmappedPage
    );
}

#[test]
fn schema_page_ids_flow_into_checklist_links_and_actions() {
    let store = SchemaStore::from_yaml_str(YAML_SCHEMA).unwrap();
    let mut session = WizardSession::new(store, Collaborators::fixtures());
    session.load();

    assert_eq!(session.checklist().steps()[0].pages, vec!["targets"]);
    assert_eq!(session.checklist().steps()[1].pages, vec!["sources"]);

    let clicked = session.handle_event(UiEvent::ChecklistStepClicked {
        step_id: "step-1".into(),
    });
    assert_eq!(
        clicked,
        EventOutcome::Navigated {
            page_id: "targets".into()
        }
    );
    assert!(!session.render().is_not_found());

    let start = session.dispatch("START_MIGRATION");
    assert_eq!(start.navigated_to.as_deref(), Some("targets"));

    let next = session.dispatch("NEXT_FROM_MASTER_ID");
    assert_eq!(
        next.advanced,
        Some(AdvanceOutcome::Completed {
            step_index: 0,
            completed_step_count: 1
        })
    );
    assert_eq!(next.navigated_to.as_deref(), Some("sources"));
    assert_eq!(session.current_page(), "sources");

    // Step 3 has no page in this schema: progress moves, the page stays.
    let next = session.dispatch("NEXT_FROM_ENTRY_TYPE_ATTRIBUTES");
    assert_eq!(
        next.advanced,
        Some(AdvanceOutcome::Completed {
            step_index: 2,
            completed_step_count: 3
        })
    );
    assert_eq!(next.navigated_to, None);
    assert_eq!(session.current_page(), "sources");
}

const MALFORMED_COMPONENTS: &str = r#"[
    {"pageId":"p","title":"P","components":[
        {"value":"no tag"},
        {"type":"button","label":"Go"},
        {"type":"text","value":"kept"}
    ]}
]"#;

#[test]
fn malformed_components_load_and_are_reported_with_field_errors() {
    let store = SchemaStore::from_json_str(MALFORMED_COMPONENTS).unwrap();
    let components = &store.get("p").unwrap().components;

    assert!(matches!(
        &components[0],
        ComponentDescriptor::Malformed(MalformedComponent { type_name: None, .. })
    ));
    match &components[1] {
        ComponentDescriptor::Malformed(bad) => {
            assert_eq!(bad.type_name.as_deref(), Some("button"));
            assert!(bad.error.contains("action"), "error was: {}", bad.error);
        }
        other => panic!("expected malformed button, got {:?}", other),
    }

    let resolver = PageResolver::new(&store);
    let view = render_page(
        &resolver,
        &ComponentRegistry::standard(),
        "p",
        &ExternalStateBag::default(),
        &Checklist::default(),
    );
    let keys: Vec<usize> = view.components().iter().map(|c| c.key).collect();
    assert_eq!(keys, vec![2]);
}

#[test]
fn duplicate_step_index_is_rejected() {
    let json = r#"[
        {"pageId":"a","title":"A","stepIndex":0},
        {"pageId":"b","title":"B","stepIndex":0}
    ]"#;
    let err = SchemaStore::from_json_str(json).unwrap_err();
    match err {
        WizardError::SchemaValidation(msg) => assert!(msg.contains("already used")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn malformed_schema_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "broken.json", "[{\"pageId\": 5}]");
    assert!(matches!(
        SchemaStore::load_file(&path),
        Err(WizardError::SchemaJson { .. })
    ));

    let missing = dir.path().join("nope.json");
    assert!(matches!(
        SchemaStore::load_file(&missing),
        Err(WizardError::Io { .. })
    ));
}

#[test]
fn fingerprint_tracks_schema_source() {
    let a = SchemaStore::from_json_str(r#"[{"pageId":"a","title":"A"}]"#).unwrap();
    let b = SchemaStore::from_json_str(r#"[{"pageId":"a","title":"B"}]"#).unwrap();
    let a2 = SchemaStore::from_json_str(r#"[{"pageId":"a","title":"A"}]"#).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint(), a2.fingerprint());
}

#[test]
fn resolver_distinguishes_not_found_from_loading() {
    let store = SchemaStore::builtin().unwrap();
    let resolver = PageResolver::new(&store);

    let hit = resolver.resolve("logic-apps");
    assert!(hit.data.is_some());
    assert!(hit.error.is_none());

    let miss = resolver.resolve("step-9");
    assert!(miss.is_not_found());
    assert!(!miss.is_loading);
    assert_eq!(miss.error.as_deref(), Some("Page not found: step-9"));
    assert!(matches!(
        resolver.require("step-9"),
        Err(WizardError::PageNotFound(_))
    ));
}
