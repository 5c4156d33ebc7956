use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const ENV_PREFIX: &str = "GH_ACTIVITY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub timeout_secs: u64,
    /// Events per page; the API caps this at 100.
    pub per_page: u32,
    /// Upper bound on pages requested at the same time.
    pub max_concurrency: usize,
    /// Query `/rate_limit` before fetching events.
    pub check_rate_limit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            per_page: 100,
            max_concurrency: 8,
            check_rate_limit: true,
        }
    }
}

impl Settings {
    /// Loads settings from an optional `gh-activity.*` file in the working
    /// directory, overridden by `GH_ACTIVITY_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_from(environment: config::Environment) -> anyhow::Result<Self> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("timeout_secs", defaults.timeout_secs as i64)?
            .set_default("per_page", i64::from(defaults.per_page))?
            .set_default("max_concurrency", defaults.max_concurrency as i64)?
            .set_default("check_rate_limit", defaults.check_rate_limit)?
            .add_source(config::File::with_name("gh-activity").required(false))
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
