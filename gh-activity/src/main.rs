use anyhow::Context;
use gh_activity::commands::{self, ActivityContext};
use gh_activity::config::Settings;
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
    let mut context = ActivityContext::new(&settings, std::io::stdout())?;

    registry.dispatch(&mut context, &matches)
}
