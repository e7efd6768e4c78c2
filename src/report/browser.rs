use std::path::PathBuf;

use crate::error::BrowserError;

/// How to find an element on the current page.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    Css { selector: String },
    Text { text: String },
    Role { role: String, name: String },
    Label { label: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            selector: selector.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }
}

/// A single page in an isolated browser session.
///
/// Every call blocks until the browser has finished the interaction or its own
/// default timeout has expired.
#[async_trait::async_trait]
pub trait Browser: Send {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn fill(&mut self, target: &Locator, value: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, target: &Locator) -> Result<(), BrowserError>;

    /// Wait until the page URL matches `pattern`, where `*` matches any run of characters.
    async fn wait_for_url(&mut self, pattern: &str) -> Result<(), BrowserError>;

    async fn wait_for(&mut self, target: &Locator) -> Result<(), BrowserError>;

    /// Click `trigger` and return where the browser stored the resulting download.
    ///
    /// The file is only guaranteed to exist until [`Browser::close`].
    async fn download(&mut self, trigger: &Locator) -> Result<PathBuf, BrowserError>;

    async fn close(&mut self) -> Result<(), BrowserError>;
}
