//! Downloading the guest information report from the point-of-sale back office.

mod browser;
mod fetcher;
mod playwright;

pub use self::{
    browser::{Browser, Locator},
    fetcher::ReportFetcher,
    playwright::PlaywrightBrowser,
};
