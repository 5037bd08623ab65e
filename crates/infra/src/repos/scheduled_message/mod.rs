mod inmemory;
mod postgres;

use super::shared::repo::DeleteResult;
use chrono::NaiveDate;
pub use inmemory::InMemoryScheduledMessageRepo;
pub use postgres::PostgresScheduledMessageRepo;
use rsvp_scheduler_domain::{ScheduledMessage, ID};

#[async_trait::async_trait]
pub trait IScheduledMessageRepo: Send + Sync {
    /// Inserts the message unless the (event, ordinal) pair already exists.
    /// Returns whether a row was created.
    async fn insert(&self, message: &ScheduledMessage) -> anyhow::Result<bool>;
    async fn save(&self, message: &ScheduledMessage) -> anyhow::Result<()>;
    async fn find(&self, message_id: &ID) -> Option<ScheduledMessage>;
    /// All messages of an `Event` ordered by ordinal
    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<ScheduledMessage>>;
    /// Messages due at or before `today` that belong to an active `Event`
    /// with a known date, oldest first. Besides pending messages this includes
    /// those whose `processing` claim was last touched before `stale_before`.
    async fn find_due(
        &self,
        today: NaiveDate,
        stale_before: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<ScheduledMessage>>;
    /// Moves a claimable message to `processing`. Returns `false` when the
    /// message is owned by a live run or no longer due.
    async fn claim(&self, message_id: &ID, now: i64, stale_before: i64) -> anyhow::Result<bool>;
    /// Hands a claimed message back to `pending`
    async fn release(&self, message_id: &ID, now: i64) -> anyhow::Result<()>;
    async fn delete_pending_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult>;
    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::RsvpContext;
    use chrono::NaiveDate;
    use rsvp_scheduler_domain::{
        plan_scheduled_messages, Event, EventStatus, MessageSchedulePolicy, ScheduledMessageStatus,
        ID,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn insert_event(ctx: &RsvpContext, event_date: Option<NaiveDate>) -> Event {
        let mut event = Event::new(ID::default(), "Bar Mitzvah".into(), 0);
        event.date = event_date;
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn insert_is_idempotent_per_ordinal() {
        let ctx = RsvpContext::create_inmemory();
        let event = insert_event(&ctx, Some(date(2025, 12, 25))).await;
        let planned = plan_scheduled_messages(
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::default(),
            date(2025, 11, 1),
            0,
        );

        for message in &planned {
            assert!(ctx.repos.scheduled_messages.insert(message).await.unwrap());
        }
        let replanned = plan_scheduled_messages(
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::default(),
            date(2025, 11, 1),
            0,
        );
        for message in &replanned {
            assert!(!ctx.repos.scheduled_messages.insert(message).await.unwrap());
        }

        let stored = ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(
            stored.iter().map(|m| m.ordinal).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn due_messages_only_of_active_events() {
        let ctx = RsvpContext::create_inmemory();
        let active = insert_event(&ctx, Some(date(2025, 12, 25))).await;
        let mut cancelled = insert_event(&ctx, Some(date(2025, 12, 25))).await;
        cancelled.status = EventStatus::Cancelled;
        ctx.repos.events.save(&cancelled).await.unwrap();

        for event in &[&active, &cancelled] {
            let planned = plan_scheduled_messages(
                &event.id,
                date(2025, 12, 25),
                &MessageSchedulePolicy::default(),
                date(2025, 11, 1),
                0,
            );
            for message in &planned {
                ctx.repos.scheduled_messages.insert(message).await.unwrap();
            }
        }

        let due = ctx
            .repos
            .scheduled_messages
            .find_due(date(2025, 12, 11), 0, 50)
            .await
            .unwrap();
        assert_eq!(due.len(), 2);
        assert!(due.iter().all(|m| m.event_id == active.id));

        let due = ctx
            .repos
            .scheduled_messages
            .find_due(date(2025, 12, 11), 0, 1)
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].ordinal, 1);
    }

    #[tokio::test]
    async fn claim_only_once() {
        let ctx = RsvpContext::create_inmemory();
        let event = insert_event(&ctx, Some(date(2025, 12, 25))).await;
        let planned = plan_scheduled_messages(
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::custom(vec![7]),
            date(2025, 11, 1),
            0,
        );
        let message = &planned[0];
        ctx.repos.scheduled_messages.insert(message).await.unwrap();

        let repo = &ctx.repos.scheduled_messages;
        assert!(repo.claim(&message.id, 1, 0).await.unwrap());
        assert!(!repo.claim(&message.id, 2, 0).await.unwrap());
        assert_eq!(
            repo.find(&message.id).await.unwrap().status,
            ScheduledMessageStatus::Processing
        );

        repo.release(&message.id, 3).await.unwrap();
        assert_eq!(
            repo.find(&message.id).await.unwrap().status,
            ScheduledMessageStatus::Pending
        );
    }

    #[tokio::test]
    async fn abandoned_claims_become_due_again() {
        let ctx = RsvpContext::create_inmemory();
        let event = insert_event(&ctx, Some(date(2025, 12, 25))).await;
        let planned = plan_scheduled_messages(
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::custom(vec![7]),
            date(2025, 11, 1),
            0,
        );
        let message = &planned[0];
        ctx.repos.scheduled_messages.insert(message).await.unwrap();

        // The run holding the claim never saved nor released it
        let repo = &ctx.repos.scheduled_messages;
        assert!(repo.claim(&message.id, 1_000, 0).await.unwrap());
        let due = repo.find_due(date(2025, 12, 18), 500, 50).await.unwrap();
        assert!(due.is_empty());
        assert!(!repo.claim(&message.id, 2_000, 500).await.unwrap());

        // Once the lease is over the next run takes it
        let due = repo.find_due(date(2025, 12, 18), 1_500, 50).await.unwrap();
        assert_eq!(due.len(), 1);
        assert!(repo.claim(&message.id, 2_000, 1_500).await.unwrap());
        let claimed = repo.find(&message.id).await.unwrap();
        assert_eq!(claimed.status, ScheduledMessageStatus::Processing);
        assert_eq!(claimed.updated, 2_000);
        assert!(!repo.claim(&message.id, 2_100, 1_500).await.unwrap());
    }

    #[tokio::test]
    async fn delete_pending_keeps_history() {
        let ctx = RsvpContext::create_inmemory();
        let event = insert_event(&ctx, Some(date(2025, 12, 25))).await;
        let mut planned = plan_scheduled_messages(
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::default(),
            date(2025, 11, 1),
            0,
        );
        planned[0].status = ScheduledMessageStatus::Completed;
        for message in &planned {
            ctx.repos.scheduled_messages.insert(message).await.unwrap();
        }

        let res = ctx
            .repos
            .scheduled_messages
            .delete_pending_by_event(&event.id)
            .await
            .unwrap();
        assert_eq!(res.deleted_count, 2);

        let left = ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].status, ScheduledMessageStatus::Completed);
    }
}
