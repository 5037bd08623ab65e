mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;
use rsvp_scheduler_domain::{Event, ID};

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, e: &Event) -> anyhow::Result<()>;
    async fn save(&self, e: &Event) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<Event>;
    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>>;
    async fn delete(&self, event_id: &ID) -> Option<Event>;
}

#[cfg(test)]
mod tests {
    use crate::RsvpContext;
    use chrono::NaiveDate;
    use rsvp_scheduler_domain::{Entity, Event, EventStatus, MessageSchedulePolicy, ID};

    fn generate_default_event() -> Event {
        let mut event = Event::new(ID::default(), "Wedding".into(), 100);
        event.date = NaiveDate::from_ymd_opt(2025, 12, 25);
        event
    }

    #[tokio::test]
    async fn create_and_delete() {
        let ctx = RsvpContext::create_inmemory();
        let event = generate_default_event();

        assert!(ctx.repos.events.insert(&event).await.is_ok());

        let found = ctx.repos.events.find(&event.id).await.unwrap();
        assert!(found.eq(&event));
        let found = ctx
            .repos
            .events
            .find_many(&[event.id.clone()])
            .await
            .expect("To find many events");
        assert_eq!(found.len(), 1);

        let deleted = ctx.repos.events.delete(&event.id).await.unwrap();
        assert!(deleted.eq(&event));
        assert!(ctx.repos.events.find(&event.id).await.is_none());
    }

    #[tokio::test]
    async fn update() {
        let ctx = RsvpContext::create_inmemory();
        let mut event = generate_default_event();
        assert!(ctx.repos.events.insert(&event).await.is_ok());

        event.status = EventStatus::Cancelled;
        event.message_schedule = MessageSchedulePolicy::custom(vec![3]);
        assert!(ctx.repos.events.save(&event).await.is_ok());

        let found = ctx.repos.events.find(&event.id).await.expect("To be event");
        assert_eq!(found.status, EventStatus::Cancelled);
        assert_eq!(found.message_schedule.days_before, vec![3]);
    }
}
