use std::path::PathBuf;

use eyre::WrapErr as _;
use tracing::{error, Instrument as _};

use crate::{
    config::{PlaywrightConfig, REPORT_FILE_NAME},
    newsletter_client::NewsletterClient,
    report::{Browser, PlaywrightBrowser, ReportFetcher},
    sync::Synchronizer,
    telemetry, Config,
};

/// Fetches the guest report, then enrolls its guests.
pub struct App {
    scratch_dir: PathBuf,
    playwright: PlaywrightConfig,
    fetcher: ReportFetcher,
    synchronizer: Synchronizer,
}

impl App {
    pub fn new(config: Config) -> eyre::Result<Self> {
        let client = NewsletterClient::new(config.newsletter())
            .wrap_err("failed to configure newsletter client")?;

        Ok(Self {
            scratch_dir: config.scratch_dir().clone(),
            playwright: config.playwright(),
            fetcher: ReportFetcher::new(config.portal()),
            synchronizer: Synchronizer::new(client)
                .with_max_concurrency(config.max_concurrency()),
        })
    }

    pub fn with_fetcher(mut self, fetcher: ReportFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn report_path(&self) -> PathBuf {
        self.scratch_dir.join(REPORT_FILE_NAME)
    }

    /// Fetch then sync. Only an unreadable report fails the run.
    pub async fn run(&self) -> eyre::Result<()> {
        let span = telemetry::run_span(Default::default());
        async {
            self.fetch_report().await;
            self.sync_report().await
        }
        .instrument(span)
        .await
    }

    /// Creates the scratch directory, then drives a real browser through the portal.
    pub async fn fetch_report(&self) -> Option<PathBuf> {
        if let Err(error) = tokio::fs::create_dir_all(&self.scratch_dir).await {
            error!(
                error = ?eyre::Report::new(error),
                scratch_dir = %self.scratch_dir.display(),
                "failed to create scratch directory"
            );
            return None;
        }

        match PlaywrightBrowser::launch(&self.playwright).await {
            Ok(browser) => self.fetch_report_with(browser).await,
            Err(error) => {
                error!(error = ?eyre::Report::new(error), "failed to launch browser");
                None
            }
        }
    }

    pub async fn fetch_report_with<B: Browser>(&self, browser: B) -> Option<PathBuf> {
        self.fetcher
            .download_report(browser, &self.scratch_dir, REPORT_FILE_NAME)
            .await
    }

    /// Sync whatever report is on disk, which may be stale if the fetch failed.
    pub async fn sync_report(&self) -> eyre::Result<()> {
        self.synchronizer
            .sync_file(&self.report_path())
            .await
            .wrap_err("guest sync failed")
    }
}
