use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};

use crate::{
    config::NewsletterConfig,
    domain::{GuestEmail, NewSubscriber},
    error::ClientError,
};

const DEFAULT_LIST_ID: u32 = 1;
const ENROLLED_STATUS: &str = "confirmed";

/// Client for the newsletter service's subscriber resource.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct NewsletterClient {
    http_client: Client,
    base_url: Url,
    username: String,
    password: Secret<String>,
}

/// Result of a creation request that reached the service.
#[derive(Debug, PartialEq, Eq)]
pub enum Creation {
    Created,
    Rejected { status: StatusCode, body: String },
}

#[derive(serde::Serialize)]
struct CreateSubscriber<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    lists: [ListMembership; 1],
    status: &'static str,
}

#[derive(serde::Serialize)]
struct ListMembership {
    id: u32,
    value: u32,
}

impl NewsletterClient {
    pub fn new(config: NewsletterConfig) -> Result<Self, ClientError> {
        let base_url: Url = config.base_url.parse()?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::CannotBeABase);
        }

        Ok(Self {
            http_client: Client::new(),
            base_url,
            username: config.username,
            password: config.password,
        })
    }

    /// `true` when the service answers 200 for this email, `false` for any other status.
    #[tracing::instrument(skip_all)]
    pub async fn is_enrolled(&self, email: &GuestEmail) -> Result<bool, ClientError> {
        let response = self
            .http_client
            .get(self.subscriber_url(email)?)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await?;

        Ok(response.status() == StatusCode::OK)
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_subscriber(
        &self,
        subscriber: &NewSubscriber,
    ) -> Result<Creation, ClientError> {
        let body = CreateSubscriber {
            email: subscriber.email.as_ref(),
            first_name: &subscriber.first_name,
            last_name: &subscriber.last_name,
            lists: [ListMembership {
                id: DEFAULT_LIST_ID,
                value: 1,
            }],
            status: ENROLLED_STATUS,
        };

        let response = self
            .http_client
            .put(self.subscriber_url(&subscriber.email)?)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(Creation::Created),
            status => Ok(Creation::Rejected {
                status,
                body: response.text().await?,
            }),
        }
    }

    fn subscriber_url(&self, email: &GuestEmail) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::CannotBeABase)?
            .pop_if_empty()
            .push("subscribers")
            .push(email.as_ref());
        Ok(url)
    }
}
