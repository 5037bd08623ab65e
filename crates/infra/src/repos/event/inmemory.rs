use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use rsvp_scheduler_domain::{Event, EventStatus, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<Event>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Whether messages of the given `Event` may be dispatched
    pub(crate) fn is_dispatchable(&self, event_id: &ID) -> bool {
        find(event_id, &self.events)
            .map(|e| e.status == EventStatus::Active && e.date.is_some())
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        insert(e, &self.events);
        Ok(())
    }

    async fn save(&self, e: &Event) -> anyhow::Result<()> {
        save(e, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        find(event_id, &self.events)
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        Ok(find_by(&self.events, |e| event_ids.contains(&e.id)))
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        delete(event_id, &self.events)
    }
}
