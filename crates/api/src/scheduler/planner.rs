//! Turns the date and schedule policy of an `Event` into `ScheduledMessage` rows.

use chrono::NaiveDate;
use rsvp_scheduler_domain::{plan_scheduled_messages, MessageSchedulePolicy, ScheduledMessage, ID};
use rsvp_scheduler_infra::RsvpContext;
use tracing::info;

#[derive(Debug)]
pub struct Rescheduled {
    pub deleted: u32,
    pub created: Vec<ScheduledMessage>,
}

/// Creates the missing rows of the event. Offsets that are already overdue and
/// ordinals that already have a row are skipped, so calling this again is a no-op.
pub async fn create_schedules_for_event(
    ctx: &RsvpContext,
    event_id: &ID,
    event_date: NaiveDate,
    policy: &MessageSchedulePolicy,
) -> anyhow::Result<Vec<ScheduledMessage>> {
    let today = ctx.sys.today(&ctx.config.timezone);
    let now = ctx.sys.get_timestamp_millis();

    let mut created = Vec::new();
    for message in plan_scheduled_messages(event_id, event_date, policy, today, now) {
        if ctx.repos.scheduled_messages.insert(&message).await? {
            created.push(message);
        }
    }

    info!(
        "Planned {} scheduled messages for event {} on {}",
        created.len(),
        event_id,
        event_date
    );
    Ok(created)
}

/// Drops every row of the event that has not been executed yet and plans again.
/// Executed rows are history and keep their ordinal.
pub async fn update_schedules_on_date_change(
    ctx: &RsvpContext,
    event_id: &ID,
    new_date: NaiveDate,
    policy: &MessageSchedulePolicy,
) -> anyhow::Result<Rescheduled> {
    let deleted = ctx
        .repos
        .scheduled_messages
        .delete_pending_by_event(event_id)
        .await?;
    let created = create_schedules_for_event(ctx, event_id, new_date, policy).await?;

    Ok(Rescheduled {
        deleted: deleted.deleted_count as u32,
        created,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::{date, insert_event, setup_at};
    use rsvp_scheduler_domain::{PackageKind, ScheduledMessageStatus};

    #[actix_web::main]
    #[test]
    async fn skips_offsets_that_are_already_overdue() {
        let test = setup_at(date(2025, 12, 10));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;

        let created = create_schedules_for_event(
            &test.ctx,
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::default(),
        )
        .await
        .unwrap();

        // 21 days before is 2025-12-04 which has passed
        let ordinals = created.iter().map(|m| m.ordinal).collect::<Vec<_>>();
        assert_eq!(ordinals, vec![2, 3]);
        assert_eq!(created[0].due_date, date(2025, 12, 11));
    }

    #[actix_web::main]
    #[test]
    async fn creating_twice_does_not_duplicate_rows() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;
        let policy = MessageSchedulePolicy::default();

        let first = create_schedules_for_event(&test.ctx, &event.id, date(2025, 12, 25), &policy)
            .await
            .unwrap();
        let second = create_schedules_for_event(&test.ctx, &event.id, date(2025, 12, 25), &policy)
            .await
            .unwrap();

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
        let rows = test
            .ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[actix_web::main]
    #[test]
    async fn empty_policy_plans_nothing() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;

        let created = create_schedules_for_event(
            &test.ctx,
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::custom(vec![]),
        )
        .await
        .unwrap();
        assert!(created.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn date_change_keeps_executed_rows() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;
        let policy = MessageSchedulePolicy::default();
        let repo = &test.ctx.repos.scheduled_messages;

        let mut created = create_schedules_for_event(&test.ctx, &event.id, date(2025, 12, 25), &policy)
            .await
            .unwrap();
        let mut sent = created.remove(0);
        sent.status = ScheduledMessageStatus::Sent;
        repo.save(&sent).await.unwrap();

        let rescheduled =
            update_schedules_on_date_change(&test.ctx, &event.id, date(2026, 1, 15), &policy)
                .await
                .unwrap();
        assert_eq!(rescheduled.deleted, 2);
        let ordinals = rescheduled
            .created
            .iter()
            .map(|m| m.ordinal)
            .collect::<Vec<_>>();
        assert_eq!(ordinals, vec![2, 3]);

        let rows = repo.find_by_event(&event.id).await.unwrap();
        assert_eq!(rows.len(), 3);
        let history = rows.iter().find(|m| m.id == sent.id).unwrap();
        assert_eq!(history.status, ScheduledMessageStatus::Sent);
        assert_eq!(history.due_date, date(2025, 12, 4));
        let pending_due = rows
            .iter()
            .filter(|m| m.is_pending())
            .map(|m| m.due_date)
            .collect::<Vec<_>>();
        assert_eq!(pending_due, vec![date(2026, 1, 1), date(2026, 1, 8)]);
    }
}
