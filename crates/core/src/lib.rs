pub mod client;
pub mod domain;
pub mod history;
pub mod normalize;
pub mod session;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub mod config {
    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub http_timeout_secs: Option<String>,
        pub history_path: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_base_url: std::env::var("ADVISOR_API_BASE_URL").ok(),
                http_timeout_secs: std::env::var("ADVISOR_HTTP_TIMEOUT_SECS").ok(),
                history_path: std::env::var("ADVISOR_HISTORY_PATH").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }
    }
}
