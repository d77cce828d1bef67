use crate::alerts::history::TriggeredAlert;
use crate::config::settings::NotificationsConfig;
use crate::error::{Error, Result};
use crate::utils::time::format_timestamp;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Email,
    Sms,
    Webhook,
}

impl FromStr for ChannelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "email" => Ok(ChannelKind::Email),
            "sms" => Ok(ChannelKind::Sms),
            "webhook" => Ok(ChannelKind::Webhook),
            other => Err(Error::UnsupportedChannel(other.to_string())),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
            ChannelKind::Webhook => "webhook",
        };
        write!(f, "{name}")
    }
}

/// Single delivery capability every channel implements. A channel reports
/// failure through its `Result`; the dispatcher converts that into a
/// recorded non-delivery instead of letting it escape.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, alert: &TriggeredAlert) -> anyhow::Result<()>;
}

/// Prints the outbound message the way a real mail relay integration would
/// log it; wiring an SMTP client in is the host's concern.
pub struct EmailChannel {
    pub from_addr: String,
    pub to_addrs: Vec<String>,
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn deliver(&self, alert: &TriggeredAlert) -> anyhow::Result<()> {
        println!(
            "[EMAIL NOTIFICATION] {}: {}",
            format_timestamp(alert.triggered_at),
            alert.message
        );
        debug!(to = ?self.to_addrs, from = %self.from_addr, "email notification emitted");
        Ok(())
    }
}

pub struct SmsChannel {
    pub phone_number: String,
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    async fn deliver(&self, alert: &TriggeredAlert) -> anyhow::Result<()> {
        println!(
            "[SMS NOTIFICATION] {}: {}",
            format_timestamp(alert.triggered_at),
            alert.message
        );
        debug!(number = %self.phone_number, "sms notification emitted");
        Ok(())
    }
}

/// POSTs the alert as JSON to a configured endpoint.
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn deliver(&self, alert: &TriggeredAlert) -> anyhow::Result<()> {
        if self.url.is_empty() {
            anyhow::bail!("no webhook URL configured");
        }

        let response = self
            .client
            .post(&self.url)
            .json(alert)
            .send()
            .await
            .with_context(|| format!("webhook POST to {} failed", self.url))?;

        response
            .error_for_status()
            .context("webhook endpoint rejected the alert")?;
        Ok(())
    }
}

/// Routes a triggered alert to a named channel. Delivery is best-effort:
/// failures come back as `delivered = false` and never abort the caller's
/// ingestion loop. Only an unrecognized channel name is an error.
pub struct NotificationDispatcher {
    channels: HashMap<ChannelKind, Box<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Dispatcher with all three stock channels wired from config.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(
            ChannelKind::Email,
            Box::new(EmailChannel {
                from_addr: config.email_from.clone(),
                to_addrs: config.email_to.clone(),
            }),
        );
        dispatcher.register(
            ChannelKind::Sms,
            Box::new(SmsChannel {
                phone_number: config.sms_number.clone(),
            }),
        );
        dispatcher.register(
            ChannelKind::Webhook,
            Box::new(WebhookChannel::new(config.webhook_url.clone())),
        );
        dispatcher
    }

    pub fn register(&mut self, kind: ChannelKind, channel: Box<dyn NotificationChannel>) {
        self.channels.insert(kind, channel);
    }

    /// Deliver `alert` through the channel named by `channel`. Returns
    /// whether delivery succeeded; an unknown channel name fails fast with
    /// `Error::UnsupportedChannel`.
    pub async fn send(&self, alert: &TriggeredAlert, channel: &str) -> Result<bool> {
        let kind: ChannelKind = channel.parse()?;
        let channel = self
            .channels
            .get(&kind)
            .ok_or_else(|| Error::UnsupportedChannel(kind.to_string()))?;

        match channel.deliver(alert).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(channel = %kind, error = %e, "alert delivery failed");
                Ok(false)
            }
        }
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
