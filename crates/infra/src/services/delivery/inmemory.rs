use super::IDeliveryProvider;
use rsvp_scheduler_domain::{DeliveryError, DeliveryReceipt, EventSummary, PhoneNumber};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum SentMessageKind {
    Invitation,
    Reminder,
    FreeText(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub phone: PhoneNumber,
    pub kind: SentMessageKind,
}

/// Provider that only records what it was asked to send. Used when testing.
pub struct InMemoryDeliveryProvider {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<PhoneNumber>>,
}

impl InMemoryDeliveryProvider {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Every following send to this number is rejected
    pub fn fail_for(&self, phone: &PhoneNumber) {
        self.failing.lock().unwrap().insert(phone.clone());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, phone: &PhoneNumber) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.phone == *phone)
            .collect()
    }

    fn record(
        &self,
        phone: &PhoneNumber,
        kind: SentMessageKind,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        if self.failing.lock().unwrap().contains(phone) {
            return Err(DeliveryError::Rejected(format!(
                "Number {} is not registered",
                phone
            )));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            phone: phone.clone(),
            kind,
        });
        Ok(DeliveryReceipt {
            provider_message_id: Some(format!("inmemory-{}", sent.len())),
        })
    }
}

impl Default for InMemoryDeliveryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IDeliveryProvider for InMemoryDeliveryProvider {
    async fn send_invitation(
        &self,
        phone: &PhoneNumber,
        _event: &EventSummary,
        _guest_name: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        self.record(phone, SentMessageKind::Invitation)
    }

    async fn send_reminder(
        &self,
        phone: &PhoneNumber,
        _event: &EventSummary,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        self.record(phone, SentMessageKind::Reminder)
    }

    async fn send_free_text(
        &self,
        phone: &PhoneNumber,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        self.record(phone, SentMessageKind::FreeText(text.to_string()))
    }
}
