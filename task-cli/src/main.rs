use anyhow::Context;
use task_cli::clock::SystemClock;
use task_cli::commands::{self, TaskContext};
use task_cli::config::Settings;
use task_cli::storage;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let registry = commands::registry();
    let matches = registry
        .parse(std::env::args_os())
        .unwrap_or_else(|error| error.exit());

    let settings = Settings::load().context("Failed to load settings")?;
    let repository = storage::load(&settings.store_path)?;
    let mut context = TaskContext::new(repository, Box::new(SystemClock), std::io::stdout());

    registry.dispatch(&mut context, &matches)?;

    if context.is_modified() {
        storage::save(context.repository(), &settings.store_path)?;
    }
    Ok(())
}
