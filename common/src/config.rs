use tracing::warn;

/// Backend used when nothing else is configured. Development only.
pub const DEV_FALLBACK_API_URL: &str = "http://127.0.0.1:8000";

/// Where the inventory backend lives.
///
/// Resolved once at startup and handed to the client constructor, so several
/// independently configured clients can coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    dev_fallback: bool,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            dev_fallback: false,
        }
    }

    /// Uses `explicit` when it holds something, the development fallback otherwise.
    pub fn resolve(explicit: Option<&str>) -> Self {
        match explicit.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Self::new(url),
            None => {
                warn!("No backend URL configured, falling back to {DEV_FALLBACK_API_URL} (development only)");
                Self {
                    dev_fallback: true,
                    ..Self::new(DEV_FALLBACK_API_URL)
                }
            }
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_dev_fallback(&self) -> bool {
        self.dev_fallback
    }
}

pub struct Config {
    pub api: ApiConfig,
    /// Suppresses banners and headers, `2` also hides per-device trees.
    pub quiet: u8,
    pub no_banner: bool,
    /// Answers the reset confirmation up front.
    pub assume_yes: bool,
}
