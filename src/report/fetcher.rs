use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use secrecy::ExposeSecret;
use tracing::{error, info, warn};

use super::browser::{Browser, Locator};
use crate::{config::PortalConfig, error::FetchError};

const DASHBOARD_SETTLE: Duration = Duration::from_millis(500);
const MENU_SETTLE: Duration = Duration::from_millis(250);

/// Logs into the back office and downloads the guest information report,
/// filtered to guests who agreed to be contacted by e-mail.
#[derive(Clone, Debug)]
pub struct ReportFetcher {
    portal: PortalConfig,
    dashboard_settle: Duration,
    menu_settle: Duration,
}

impl ReportFetcher {
    pub fn new(portal: PortalConfig) -> Self {
        Self {
            portal,
            dashboard_settle: DASHBOARD_SETTLE,
            menu_settle: MENU_SETTLE,
        }
    }

    /// Scale the pauses the back office needs between menu interactions.
    pub fn with_settle_delays(mut self, dashboard: Duration, menu: Duration) -> Self {
        self.dashboard_settle = dashboard;
        self.menu_settle = menu;
        self
    }

    /// Download the report to `download_dir/file_name`, replacing any previous copy.
    ///
    /// Failures are logged rather than returned, and `None` means no fresh report
    /// was written. The browser is closed exactly once either way.
    #[tracing::instrument(skip_all, fields(download_dir = %download_dir.display(), file_name = %file_name))]
    pub async fn download_report<B: Browser>(
        &self,
        mut browser: B,
        download_dir: &Path,
        file_name: &str,
    ) -> Option<PathBuf> {
        let target = download_dir.join(file_name);
        let result = self.run(&mut browser, download_dir, &target).await;

        if let Err(error) = browser.close().await {
            warn!(error = %error, "failed to close browser");
        }

        match result {
            Ok(()) => {
                info!(path = %target.display(), "guest report downloaded");
                Some(target)
            }
            Err(error) => {
                error!(error = ?eyre::Report::new(error), "failed to download guest report");
                None
            }
        }
    }

    async fn run<B: Browser>(
        &self,
        browser: &mut B,
        download_dir: &Path,
        target: &Path,
    ) -> Result<(), FetchError> {
        tokio::fs::create_dir_all(download_dir)
            .await
            .map_err(|source| FetchError::Io {
                path: download_dir.to_owned(),
                source,
            })?;

        let login_url = self.portal.login_url();
        info!(url = %login_url, "navigating to login page");
        browser.goto(&login_url).await?;

        browser
            .fill(&Locator::label("Email"), &self.portal.email)
            .await?;
        browser
            .fill(
                &Locator::label("Password"),
                self.portal.password.expose_secret(),
            )
            .await?;
        browser
            .click(&Locator::css("button[aria-label='LOG IN']"))
            .await?;
        browser.wait_for_url(&self.portal.dashboard_url()).await?;
        info!("logged in");

        tokio::time::sleep(self.dashboard_settle).await;

        browser
            .click(&Locator::css("span:has-text('Reports') >> xpath=.."))
            .await?;
        tokio::time::sleep(self.menu_settle).await;
        browser.click(&Locator::text("Guest")).await?;
        tokio::time::sleep(self.menu_settle).await;
        browser
            .click(&Locator::role("link", "Guest Information Report"))
            .await?;
        browser
            .wait_for_url(&self.portal.report_url_pattern())
            .await?;

        let email_option = Locator::role("option", "E-Mail");
        browser
            .click(&Locator::css("mat-select[formcontrolname='value']"))
            .await?;
        browser.wait_for(&email_option).await?;
        browser.click(&email_option).await?;
        info!("selected e-mail agreement filter");

        let downloaded = browser
            .download(&Locator::css("button:has-text('Generate CSV')"))
            .await?;
        tokio::fs::copy(&downloaded, target)
            .await
            .map_err(|source| FetchError::Io {
                path: target.to_owned(),
                source,
            })?;

        Ok(())
    }
}
