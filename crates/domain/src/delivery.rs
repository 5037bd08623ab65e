use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    WhatsApp,
    Sms,
}

/// What an outgoing scheduled batch is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Invitation,
    Reminder,
}

impl MessageKind {
    /// The first message of a schedule is the invitation, every later one is a reminder
    pub fn from_ordinal(ordinal: u32) -> Self {
        if ordinal <= 1 {
            Self::Invitation
        } else {
            Self::Reminder
        }
    }
}

/// The parts of an `Event` that are rendered into outgoing messages
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Acknowledgement of a provider that it accepted a message
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliveryReceipt {
    pub provider_message_id: Option<String>,
}

/// A single failed send. These are expected and never abort a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("Provider rejected the message: {0}")]
    Rejected(String),
    #[error("Provider request failed: {0}")]
    Transport(String),
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}
