use std::path::Path;

use crate::api::fixtures::{
    FixtureEntryTypeAttributes, FixtureLogicApps, InMemoryMappingStore, InMemoryMasterIdStore,
};
use crate::api::http::{ApiSettings, HttpMigrationApi};
use crate::engine::render_model::PageView;
use crate::feature::providers::Collaborators;
use crate::report::console::format_console_report;
use crate::report::report_model::SuiteReport;
use crate::schema::store::SchemaStore;
use crate::script::runner::ScriptRunner;
use crate::script::script_model::WalkthroughScript;
use crate::session::wizard::WizardSession;
use crate::trace::logger::TraceLogger;

/// Everything a command needs, resolved from CLI flags and config.
pub struct CommandContext {
    pub schema_path: Option<String>,
    pub trace_path: Option<String>,
    pub api: ApiSettings,
}

impl CommandContext {
    pub fn load_schema(&self) -> Result<SchemaStore, Box<dyn std::error::Error>> {
        let store = match &self.schema_path {
            Some(path) => SchemaStore::load_file(path)?,
            None => SchemaStore::builtin()?,
        };
        Ok(store)
    }

    /// A loaded session over the resolved schema and collaborators.
    pub fn open_session(&self) -> Result<WizardSession, Box<dyn std::error::Error>> {
        self.open_session_with(build_collaborators(&self.api))
    }

    pub fn open_session_with(
        &self,
        collaborators: Collaborators,
    ) -> Result<WizardSession, Box<dyn std::error::Error>> {
        let store = self.load_schema()?;
        let mut session = WizardSession::new(store, collaborators);
        if let Some(path) = &self.trace_path {
            session = session.with_trace(TraceLogger::new(path));
        }
        session.load();
        Ok(session)
    }
}

/// HTTP feeds for master ids and entry types when an API base URL is set;
/// fixture data for everything else.
pub fn build_collaborators(api: &ApiSettings) -> Collaborators {
    if !api.is_configured() {
        tracing::debug!("no API base URL configured; using fixture data");
        return Collaborators::fixtures();
    }

    tracing::info!(base_url = %api.base_url, "using migration API");
    Collaborators {
        master_ids: Box::new(HttpMigrationApi::new(api.clone())),
        entry_types: Box::new(HttpMigrationApi::new(api.clone())),
        entry_type_attributes: Box::new(FixtureEntryTypeAttributes::default()),
        logic_apps: Box::new(FixtureLogicApps::default()),
        master_id_store: Box::new(InMemoryMasterIdStore::new()),
        mapping_store: Box::new(InMemoryMappingStore::new()),
    }
}

// ============================================================================
// pages / validate / render subcommands
// ============================================================================

pub fn cmd_pages(ctx: &CommandContext) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.load_schema()?;
    for page in store.pages() {
        let step = store
            .step_table()
            .step_for(&page.page_id)
            .map(|i| format!("step {}", i + 1))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:<8} {}", page.page_id, step, page.title);
    }
    Ok(())
}

pub fn cmd_validate(ctx: &CommandContext) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.load_schema()?;
    println!(
        "Schema OK: {} pages, {} checklist-linked",
        store.len(),
        store.step_table().entries().len()
    );
    println!("Fingerprint: {}", store.fingerprint());
    Ok(())
}

pub fn cmd_render(ctx: &CommandContext, page_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let view = render_view(ctx, page_id)?;
    if view.is_not_found() {
        tracing::warn!(page_id, "rendered not-found view");
    }
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// Render a page against fixture data, whatever API the config names.
pub fn render_view(
    ctx: &CommandContext,
    page_id: &str,
) -> Result<PageView, Box<dyn std::error::Error>> {
    let session = ctx.open_session_with(Collaborators::fixtures())?;
    Ok(session.render_page(page_id))
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run walkthrough scripts, each against a fresh session. Returns whether
/// all passed.
pub fn cmd_run(
    ctx: &CommandContext,
    script_path: &str,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scripts = load_scripts(script_path)?;

    if scripts.is_empty() {
        eprintln!("No walkthrough scripts found at: {}", script_path);
        return Ok(true);
    }

    let start = std::time::Instant::now();
    let mut results = Vec::new();
    let mut last_progress = 0;
    for script in &scripts {
        tracing::info!(script = %script.name, "running walkthrough");
        let mut session = ctx.open_session()?;
        results.push(ScriptRunner::run(script, &mut session));
        last_progress = session.checklist().completed_step_count();
    }

    let suite_name = if scripts.len() == 1 {
        scripts[0].name.clone()
    } else {
        script_path.to_string()
    };
    let report = SuiteReport::from_results(&suite_name, results)
        .with_duration(start.elapsed().as_millis())
        .with_progress(last_progress);
    let all_passed = report.all_passed();

    let rendered = format_console_report(&report);
    match output {
        Some(path) => std::fs::write(path, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(all_passed)
}

/// Load scripts from a single YAML file or a directory of YAML files.
pub fn load_scripts(path: &str) -> Result<Vec<WalkthroughScript>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_dir() {
        return Ok(vec![WalkthroughScript::load_file(path)?]);
    }

    let mut scripts = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let p = entry?.path();
        if is_yaml(&p) {
            scripts.push(WalkthroughScript::load_file(&p)?);
        }
    }
    scripts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scripts)
}

fn is_yaml(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "yaml" || e == "yml")
}
