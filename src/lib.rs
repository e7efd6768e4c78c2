mod app;
mod config;
pub mod domain;
pub mod error;
pub mod newsletter_client;
pub mod report;
pub mod sync;
pub mod telemetry;

pub use self::{
    app::App,
    config::{Config, NewsletterConfig, PlaywrightConfig, PortalConfig, REPORT_FILE_NAME},
    newsletter_client::NewsletterClient,
};
