mod gupshup;
mod inmemory;
mod sms019;

pub use gupshup::{GupshupConfig, GupshupProvider};
pub use inmemory::{InMemoryDeliveryProvider, SentMessage, SentMessageKind};
pub use sms019::{Sms019Config, Sms019Provider};

use rsvp_scheduler_domain::{
    DeliveryChannel, DeliveryError, DeliveryReceipt, EventSummary, PhoneNumber,
};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound of a single provider round trip
pub(crate) const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends structured messages to a phone number through some gateway.
///
/// Failures are normal (rate limits, unregistered numbers, unapproved templates)
/// and callers must never let one abort a whole batch.
#[async_trait::async_trait]
pub trait IDeliveryProvider: Send + Sync {
    async fn send_invitation(
        &self,
        phone: &PhoneNumber,
        event: &EventSummary,
        guest_name: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;

    async fn send_reminder(
        &self,
        phone: &PhoneNumber,
        event: &EventSummary,
    ) -> Result<DeliveryReceipt, DeliveryError>;

    async fn send_free_text(
        &self,
        phone: &PhoneNumber,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// One provider per `DeliveryChannel`
#[derive(Clone)]
pub struct DeliveryProviders {
    pub whatsapp: Arc<dyn IDeliveryProvider>,
    pub sms: Arc<dyn IDeliveryProvider>,
}

impl DeliveryProviders {
    /// Reads the gateway credentials from the environment and fails on the first missing one
    pub fn from_env() -> anyhow::Result<Self> {
        let whatsapp = GupshupProvider::new(GupshupConfig::from_env()?)?;
        let sms = Sms019Provider::new(Sms019Config::from_env()?)?;
        Ok(Self {
            whatsapp: Arc::new(whatsapp),
            sms: Arc::new(sms),
        })
    }

    pub fn for_channel(&self, channel: DeliveryChannel) -> &Arc<dyn IDeliveryProvider> {
        match channel {
            DeliveryChannel::WhatsApp => &self.whatsapp,
            DeliveryChannel::Sms => &self.sms,
        }
    }
}

fn required_env(var: &str) -> anyhow::Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow::anyhow!(
            "The {} environment variable is required for message delivery",
            var
        )),
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
