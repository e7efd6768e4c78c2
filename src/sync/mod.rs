//! Enrolling report guests in the newsletter.

mod pool;
mod reader;

use std::{num::NonZeroUsize, path::Path};

use reqwest::StatusCode;
use tracing::{error, info, warn, Instrument as _};

pub use self::{
    pool::run_bounded,
    reader::{guest_from_row, read_guests},
};
use crate::{
    domain::{GuestRecord, NewSubscriber},
    error::SyncError,
    newsletter_client::{Creation, NewsletterClient},
};

const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// What happened to one guest during a sync.
#[derive(Debug, PartialEq, Eq)]
pub enum Enrollment {
    AlreadyEnrolled,
    Enrolled,
    Rejected { status: StatusCode },
    Failed,
}

pub struct Synchronizer {
    client: NewsletterClient,
    max_concurrency: NonZeroUsize,
}

impl Synchronizer {
    pub fn new(client: NewsletterClient) -> Self {
        Self {
            client,
            max_concurrency: NonZeroUsize::new(DEFAULT_MAX_CONCURRENCY)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: NonZeroUsize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub async fn sync_file(&self, path: &Path) -> Result<(), SyncError> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| SyncError::Read {
                path: path.to_owned(),
                source,
            })?;

        self.sync_report(&contents).await;
        Ok(())
    }

    /// Enroll every valid guest in `contents`, returning once all have been handled.
    ///
    /// Guests are not deduplicated: an email listed twice is checked and, if
    /// absent, created twice, concurrently.
    pub async fn sync_report(&self, contents: &[u8]) {
        let subscribers = read_guests(contents)
            .into_iter()
            .filter_map(validate)
            .collect::<Vec<_>>();
        info!(
            guests = subscribers.len(),
            max_concurrency = self.max_concurrency.get(),
            "enrolling guests"
        );

        run_bounded(subscribers, self.max_concurrency, move |subscriber| async move {
            self.enroll(&subscriber).await;
        })
        .await;
    }

    /// Create `subscriber` unless the newsletter service already knows the email.
    pub async fn enroll(&self, subscriber: &NewSubscriber) -> Enrollment {
        let span = tracing::info_span!("enroll", email = %subscriber.email);
        self.check_and_create(subscriber).instrument(span).await
    }

    async fn check_and_create(&self, subscriber: &NewSubscriber) -> Enrollment {
        info!("checking if guest is enrolled");
        match self.client.is_enrolled(&subscriber.email).await {
            Ok(true) => {
                info!("already enrolled, skipping");
                return Enrollment::AlreadyEnrolled;
            }
            Ok(false) => info!("not enrolled, enrolling"),
            Err(error) => {
                error!(error = ?eyre::Report::new(error), "failed to look up subscriber");
                return Enrollment::Failed;
            }
        }

        match self.client.create_subscriber(subscriber).await {
            Ok(Creation::Created) => {
                info!("successfully enrolled");
                Enrollment::Enrolled
            }
            Ok(Creation::Rejected { status, body }) => {
                warn!(status = status.as_u16(), %body, "enrollment request failed");
                Enrollment::Rejected { status }
            }
            Err(error) => {
                error!(error = ?eyre::Report::new(error), "failed to create subscriber");
                Enrollment::Failed
            }
        }
    }
}

fn validate(guest: GuestRecord) -> Option<NewSubscriber> {
    match NewSubscriber::try_from(guest) {
        Ok(subscriber) => Some(subscriber),
        Err(error) => {
            info!(%error, "skipping guest");
            None
        }
    }
}
