use super::IScheduledMessageRepo;
use crate::repos::event::InMemoryEventRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use chrono::NaiveDate;
use rsvp_scheduler_domain::{ScheduledMessage, ScheduledMessageStatus, ID};
use std::sync::Arc;

pub struct InMemoryScheduledMessageRepo {
    scheduled_messages: std::sync::Mutex<Vec<ScheduledMessage>>,
    /// Needed to resolve the `Event` conditions of due messages
    events: Arc<InMemoryEventRepo>,
}

impl InMemoryScheduledMessageRepo {
    pub fn new(events: Arc<InMemoryEventRepo>) -> Self {
        Self {
            scheduled_messages: std::sync::Mutex::new(Vec::new()),
            events,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledMessageRepo for InMemoryScheduledMessageRepo {
    async fn insert(&self, message: &ScheduledMessage) -> anyhow::Result<bool> {
        let mut messages = self.scheduled_messages.lock().unwrap();
        if messages
            .iter()
            .any(|m| m.event_id == message.event_id && m.ordinal == message.ordinal)
        {
            return Ok(false);
        }
        messages.push(message.clone());
        Ok(true)
    }

    async fn save(&self, message: &ScheduledMessage) -> anyhow::Result<()> {
        save(message, &self.scheduled_messages);
        Ok(())
    }

    async fn find(&self, message_id: &ID) -> Option<ScheduledMessage> {
        find(message_id, &self.scheduled_messages)
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<ScheduledMessage>> {
        let mut messages = find_by(&self.scheduled_messages, |m| m.event_id == *event_id);
        messages.sort_by_key(|m| m.ordinal);
        Ok(messages)
    }

    async fn find_due(
        &self,
        today: NaiveDate,
        stale_before: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<ScheduledMessage>> {
        let mut messages = find_by(&self.scheduled_messages, |m| {
            m.is_claimable(stale_before) && m.due_date <= today
        });
        messages.retain(|m| self.events.is_dispatchable(&m.event_id));
        messages.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.ordinal.cmp(&b.ordinal))
        });
        messages.truncate(limit);
        Ok(messages)
    }

    async fn claim(&self, message_id: &ID, now: i64, stale_before: i64) -> anyhow::Result<bool> {
        Ok(update_if(
            message_id,
            &self.scheduled_messages,
            |m| m.is_claimable(stale_before),
            |m| {
                m.status = ScheduledMessageStatus::Processing;
                m.updated = now;
            },
        ))
    }

    async fn release(&self, message_id: &ID, now: i64) -> anyhow::Result<()> {
        update_if(
            message_id,
            &self.scheduled_messages,
            |m| m.status == ScheduledMessageStatus::Processing,
            |m| {
                m.status = ScheduledMessageStatus::Pending;
                m.updated = now;
            },
        );
        Ok(())
    }

    async fn delete_pending_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.scheduled_messages, |m| {
            m.event_id == *event_id && m.is_pending()
        }))
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.scheduled_messages, |m| {
            m.event_id == *event_id
        }))
    }
}
