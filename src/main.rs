use clap::Parser;
use migration_wizard::cli::commands::{
    CommandContext, cmd_pages, cmd_render, cmd_run, cmd_validate,
};
use migration_wizard::cli::config::{
    Cli, Commands, load_config, process_env, resolve_api_settings, resolve_schema_path,
    resolve_trace_path,
};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let ctx = CommandContext {
        schema_path: resolve_schema_path(&cli, &config),
        trace_path: resolve_trace_path(&cli, &config),
        api: resolve_api_settings(&config.api, process_env),
    };

    match &cli.command {
        Commands::Pages => cmd_pages(&ctx)?,
        Commands::Validate => cmd_validate(&ctx)?,
        Commands::Render { page } => cmd_render(&ctx, page)?,
        Commands::Run { script, output } => {
            let all_passed = cmd_run(&ctx, script, output.as_deref())?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
