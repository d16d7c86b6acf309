//! REST client for alias subscriptions and channel messages.
//!
//! Every operation is a single HTTP round trip with no retry and no
//! de-duplication of in-flight requests. Futures resolve on whichever
//! task awaits them; the fire-and-forget [`ChannelSubscriptionClient::register`]
//! runs on a spawned tokio task instead.

mod error;
mod models;
mod parse;
mod routes;

pub use error::{ClientError, ParseError};
pub use models::{PostOptions, PostedMessage};
pub use parse::ParseMode;
pub use routes::{ApiVariant, Operation, Route};

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Client, Url};
use tokio::task::JoinHandle;

use crate::core::ClientConfig;

#[derive(Clone, Debug)]
pub struct ChannelSubscriptionClient {
    http: Client,
    base_url: Url,
    variant: ApiVariant,
    parse_mode: ParseMode,
    // Shared between clones. Each call reads it once while building its
    // request, so a concurrent `set_registration_id` may or may not be
    // seen by a call that is already underway.
    registration_id: Arc<RwLock<String>>,
}

impl ChannelSubscriptionClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            variant: ApiVariant::default(),
            parse_mode: ParseMode::default(),
            registration_id: Arc::new(RwLock::new(String::new())),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Self::new(&config.base_url)?
            .with_variant(config.variant)
            .with_parse_mode(config.parse_mode);
        client.set_registration_id(&config.registration_id);
        Ok(client)
    }

    pub fn with_variant(mut self, variant: ApiVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Overwrite the registration identifier used by subsequent calls.
    pub fn set_registration_id(&self, id: &str) {
        let mut current = self
            .registration_id
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = id.to_string();
    }

    pub fn registration_id(&self) -> String {
        self.registration_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_registration_id(&self) -> Result<String, ClientError> {
        let reg_id = self.registration_id();
        if reg_id.is_empty() {
            return Err(ClientError::Unregistered);
        }
        Ok(reg_id)
    }

    fn route(&self, op: &Operation<'_>) -> Result<Route, ClientError> {
        self.variant
            .route(op)
            .ok_or_else(|| ClientError::Unsupported {
                operation: op.name(),
                variant: self.variant,
            })
    }

    /// Send `route` and return the body of a 2xx response.
    async fn execute(&self, route: &Route) -> Result<String, ClientError> {
        let url = route.url(&self.base_url)?;
        tracing::debug!("{} {}", route.method, url);

        let mut request = self.http.request(route.method.clone(), url);
        if !route.form.is_empty() {
            request = request.form(&route.form);
        }

        let res = request.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }

        Ok(body)
    }

    /// Send the registration request and wait for the plain-text reply.
    pub async fn send_registration(&self) -> Result<String, ClientError> {
        let reg_id = self.require_registration_id()?;
        let route = self.route(&Operation::Register { reg_id: &reg_id })?;
        self.execute(&route).await
    }

    /// Fire-and-forget registration.
    ///
    /// The outcome is only logged. The returned handle resolves once the
    /// attempt is over and carries no result to branch on.
    pub fn register(&self) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            match client.send_registration().await {
                Ok(body) => tracing::info!("Registration sent. {}", body.trim()),
                Err(ClientError::Unregistered) => {
                    tracing::warn!("Skipping registration, no registration identifier set")
                }
                Err(err) => tracing::warn!("Registration failed: {}", err),
            }
        })
    }

    pub async fn add_alias(&self, alias: &str) -> Result<(), ClientError> {
        let reg_id = self.require_registration_id()?;
        let route = self.route(&Operation::AddAlias {
            reg_id: &reg_id,
            alias,
        })?;
        self.execute(&route).await?;
        Ok(())
    }

    pub async fn delete_alias(&self, alias: &str) -> Result<(), ClientError> {
        let reg_id = self.require_registration_id()?;
        let route = self.route(&Operation::DeleteAlias {
            reg_id: &reg_id,
            alias,
        })?;
        self.execute(&route).await?;
        Ok(())
    }

    /// Aliases subscribed by this device, in server order.
    ///
    /// `Ok(None)` only happens in [`ParseMode::Lenient`] when the
    /// response was malformed.
    pub async fn get_aliases(&self) -> Result<Option<Vec<String>>, ClientError> {
        let reg_id = self.require_registration_id()?;
        let route = self.route(&Operation::ListAliases { reg_id: &reg_id })?;
        let body = self.execute(&route).await?;
        self.parse_mode.apply(&route.path(), parse::aliases(&body))
    }

    /// Message texts posted to `channel`, in server order.
    pub async fn list_channel(&self, channel: &str) -> Result<Option<Vec<String>>, ClientError> {
        let route = self.route(&Operation::ListChannel { channel })?;
        let body = self.execute(&route).await?;
        self.parse_mode
            .apply(&route.path(), parse::channel_messages(&body))
    }

    /// Queue `message` for every device subscribed to `channel`.
    pub async fn post_message(
        &self,
        channel: &str,
        message: &str,
        options: &PostOptions,
    ) -> Result<Option<PostedMessage>, ClientError> {
        let route = self.route(&Operation::PostMessage {
            channel,
            message,
            collapse_key: options.collapse_key.as_deref(),
            delay_while_idle: options.delay_while_idle,
        })?;
        let body = self.execute(&route).await?;
        self.parse_mode
            .apply(&route.path(), parse::posted_message(&body))
    }
}
