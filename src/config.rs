use std::{num::NonZeroUsize, path::PathBuf};

use secrecy::Secret;

const DEFAULT_MAX_CONCURRENCY: usize = 10;
const DEFAULT_NODE: &str = "node";

pub const REPORT_FILE_NAME: &str = "guest-information-report.csv";

#[derive(Debug, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] envy::Error);

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    newsletter_api_base: String,
    newsletter_api_username: String,
    newsletter_api_password: Secret<String>,

    edgeservpos_license_base_url: String,
    edgeservpos_alt_base_url: String,
    edgeservpos_email: String,
    edgeservpos_password: Secret<String>,
    edgeservpos_restaurant_code: String,

    tmp_dir: PathBuf,

    #[serde(default)]
    sync_max_concurrency: Option<usize>,

    #[serde(default)]
    playwright_node: Option<String>,

    #[serde(default)]
    playwright_headless: Option<bool>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    pub fn scratch_dir(&self) -> &PathBuf {
        &self.tmp_dir
    }

    pub fn max_concurrency(&self) -> NonZeroUsize {
        self.sync_max_concurrency
            .and_then(NonZeroUsize::new)
            .or_else(|| NonZeroUsize::new(DEFAULT_MAX_CONCURRENCY))
            .unwrap_or(NonZeroUsize::MIN)
    }

    pub fn portal(&self) -> PortalConfig {
        PortalConfig {
            license_base_url: self.edgeservpos_license_base_url.clone(),
            alt_base_url: self.edgeservpos_alt_base_url.clone(),
            email: self.edgeservpos_email.clone(),
            password: self.edgeservpos_password.clone(),
            restaurant_code: self.edgeservpos_restaurant_code.clone(),
        }
    }

    pub fn newsletter(&self) -> NewsletterConfig {
        NewsletterConfig {
            base_url: self.newsletter_api_base.clone(),
            username: self.newsletter_api_username.clone(),
            password: self.newsletter_api_password.clone(),
        }
    }

    pub fn playwright(&self) -> PlaywrightConfig {
        PlaywrightConfig {
            node: self
                .playwright_node
                .clone()
                .unwrap_or_else(|| DEFAULT_NODE.to_string()),
            headless: self.playwright_headless.unwrap_or(true),
        }
    }
}

/// Credentials and addresses for the point-of-sale back office.
///
/// Base URLs are used verbatim and are expected to end with `/`.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub license_base_url: String,
    pub alt_base_url: String,
    pub email: String,
    pub password: Secret<String>,
    pub restaurant_code: String,
}

impl PortalConfig {
    pub fn login_url(&self) -> String {
        format!("{}license/", self.license_base_url)
    }

    pub fn dashboard_url(&self) -> String {
        format!(
            "{}{}/boh/kpi-dashboard",
            self.alt_base_url, self.restaurant_code
        )
    }

    pub fn report_url_pattern(&self) -> String {
        format!("{}{}/boh/report*", self.alt_base_url, self.restaurant_code)
    }
}

#[derive(Clone, Debug)]
pub struct NewsletterConfig {
    pub base_url: String,
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Clone, Debug)]
pub struct PlaywrightConfig {
    pub node: String,
    pub headless: bool,
}
