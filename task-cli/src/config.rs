use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "json_task_tracker/tasks.json";
pub const ENV_PREFIX: &str = "TASK_CLI";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub store_path: PathBuf,
}

impl Settings {
    /// Loads settings from an optional `task-cli.*` file in the working
    /// directory, overridden by `TASK_CLI_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_from(environment: config::Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("store_path", DEFAULT_STORE_PATH)?
            .add_source(config::File::with_name("task-cli").required(false))
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
