use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Idle sessions (and with them the stored token pair) expire after
    /// this many hours of inactivity.
    #[serde(default = "default_session_inactivity_hours")]
    pub session_inactivity_hours: i64,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL of the shortener REST API; `/api` is appended per request.
    pub base_url: String,
    /// How long cached list/detail responses stay fresh.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    /// Interval at which the short-URL table re-fetches itself while the
    /// page is visible, to keep click counts current.
    #[serde(default = "default_url_poll_seconds")]
    pub url_poll_seconds: u64,
}

#[derive(Deserialize, Clone, Default)]
pub struct ObservabilitySettings {
    /// OTLP collector endpoint; spans are exported only when set.
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_session_inactivity_hours() -> i64 {
    24
}

fn default_cache_ttl_seconds() -> u64 {
    30
}

fn default_url_poll_seconds() -> u64 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Works both from the workspace root and from within the member crate
    let configuration_directory = if base_path.ends_with("console-frontend") {
        base_path.join("config")
    } else {
        base_path.join("console-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
