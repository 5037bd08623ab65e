use crate::error::ApiError;
use crate::rsvp::personal_rsvp_link;
use crate::shared::{
    auth::protect_cron_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use anyhow::anyhow;
use chrono::NaiveDate;
use rsvp_scheduler_api_structs::process_due_messages::*;
use rsvp_scheduler_domain::{
    format_date, BatchResult, DeliveryChannel, DeliveryError, DeliveryReceipt, Event, Guest,
    MessageKind, ScheduledMessage, PROCESSING_LEASE_MILLIS,
};
use rsvp_scheduler_infra::RsvpContext;
use tracing::{error, info, warn};

pub async fn process_due_messages_controller(
    http_req: HttpRequest,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_cron_route(&http_req, &ctx)?;

    execute(ProcessDueMessagesUseCase, &ctx)
        .await
        .map(|run| {
            HttpResponse::Ok().json(APIResponse::new(run.today, run.skipped, run.processed))
        })
        .map_err(ApiError::from)
}

/// Executes every `ScheduledMessage` that is due today or earlier.
///
/// Meant to be triggered once a day by an external scheduler. A message is
/// claimed before it is worked on, so overlapping runs never execute the same
/// message twice, and a message that is no longer pending is never picked up again.
#[derive(Debug)]
pub struct ProcessDueMessagesUseCase;

#[derive(Debug)]
pub struct DispatchRun {
    pub today: NaiveDate,
    pub skipped: u32,
    pub processed: Vec<ScheduledMessage>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessDueMessagesUseCase {
    type Response = DispatchRun;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueMessages";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let today = ctx.sys.today(&ctx.config.timezone);
        let stale_before = ctx.sys.get_timestamp_millis() - PROCESSING_LEASE_MILLIS;
        let due = ctx
            .repos
            .scheduled_messages
            .find_due(today, stale_before, ctx.config.dispatch_batch_size)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!("Found {} scheduled messages due by {}", due.len(), today);

        let mut run = DispatchRun {
            today,
            skipped: 0,
            processed: Vec::with_capacity(due.len()),
        };
        for message in due {
            let now = ctx.sys.get_timestamp_millis();
            match ctx
                .repos
                .scheduled_messages
                .claim(&message.id, now, stale_before)
                .await
            {
                Ok(true) => (),
                Ok(false) => {
                    info!("Scheduled message {} is owned by another run", message.id);
                    run.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("Unable to claim scheduled message {}: {:?}", message.id, e);
                    run.skipped += 1;
                    continue;
                }
            }

            let message_id = message.id.clone();
            match process_one(message, ctx).await {
                Ok(message) => run.processed.push(message),
                Err(e) => {
                    error!("Failed to process scheduled message {}: {:?}", message_id, e);
                    let now = ctx.sys.get_timestamp_millis();
                    if let Err(e) = ctx.repos.scheduled_messages.release(&message_id, now).await {
                        error!(
                            "Unable to release scheduled message {}: {:?}",
                            message_id, e
                        );
                    }
                    run.skipped += 1;
                }
            }
        }

        Ok(run)
    }
}

async fn process_one(
    mut message: ScheduledMessage,
    ctx: &RsvpContext,
) -> anyhow::Result<ScheduledMessage> {
    let event = ctx
        .repos
        .events
        .find(&message.event_id)
        .await
        .ok_or_else(|| anyhow!("Event {} no longer exists", message.event_id))?;
    let kind = message.kind();
    let channel = event.delivery_channel();

    let mut guests = ctx.repos.guests.find_by_event(&event.id).await?;
    if kind == MessageKind::Reminder {
        guests.retain(|g| g.should_receive_reminder());
    }

    if guests.is_empty() {
        info!(
            "No recipients for message {} of event {}",
            message.ordinal, event.id
        );
        message.finish_without_recipients("No guests to notify", ctx.sys.get_timestamp_millis());
        ctx.repos.scheduled_messages.save(&message).await?;
        return Ok(message);
    }

    info!(
        "Sending message {} ({:?}) of event {} over {:?} to {} guests",
        message.ordinal,
        kind,
        event.id,
        channel,
        guests.len()
    );

    let mut result = BatchResult::default();
    for guest in guests {
        match send_to_guest(ctx, &event, &guest, kind, channel).await {
            Ok(_) => {
                result.record_success();
                arm_conversation(ctx, guest).await;
            }
            Err(e) => {
                warn!(
                    "Failed to send {:?} of event {} to guest {}: {}",
                    kind, event.id, guest.id, e
                );
                result.record_failure(guest.phone.as_str(), e);
            }
        }
    }

    message.finish(&result, ctx.sys.get_timestamp_millis());
    ctx.repos.scheduled_messages.save(&message).await?;
    info!(
        "Scheduled message {} of event {} ended as {:?}: {} sent, {} failed",
        message.ordinal, event.id, message.status, message.sent_count, message.failed_count
    );

    Ok(message)
}

async fn send_to_guest(
    ctx: &RsvpContext,
    event: &Event,
    guest: &Guest,
    kind: MessageKind,
    channel: DeliveryChannel,
) -> Result<DeliveryReceipt, DeliveryError> {
    let provider = ctx.providers.for_channel(channel);
    match channel {
        DeliveryChannel::WhatsApp => match kind {
            MessageKind::Invitation => {
                provider
                    .send_invitation(&guest.phone, &event.summary(), &guest.name)
                    .await
            }
            MessageKind::Reminder => provider.send_reminder(&guest.phone, &event.summary()).await,
        },
        DeliveryChannel::Sms => {
            let now_secs = ctx.sys.get_timestamp_millis() / 1000;
            let link = personal_rsvp_link(&ctx.config, guest, event, now_secs);
            provider
                .send_free_text(&guest.phone, &sms_text(kind, event, guest, &link))
                .await
        }
    }
}

fn sms_text(kind: MessageKind, event: &Event, guest: &Guest, link: &str) -> String {
    let when = event
        .date
        .as_ref()
        .map(|date| format!(" on {}", format_date(date)))
        .unwrap_or_default();
    match kind {
        MessageKind::Invitation => format!(
            "Hi {}, you are invited to {}{}. Please RSVP here: {}",
            guest.name, event.title, when, link
        ),
        MessageKind::Reminder => format!(
            "Reminder: {}{}. We are still waiting for your answer: {}",
            event.title, when, link
        ),
    }
}

/// The guest has now been asked, so replies can be attributed to the conversation
async fn arm_conversation(ctx: &RsvpContext, mut guest: Guest) {
    if !guest.await_rsvp() {
        return;
    }
    guest.updated = ctx.sys.get_timestamp_millis();
    match ctx.repos.guests.save_versioned(&guest).await {
        Ok(true) => (),
        // Someone else wrote the guest in between, e.g. a reply came in
        Ok(false) => {
            if let Some(mut fresh) = ctx.repos.guests.find(&guest.id).await {
                if fresh.await_rsvp() {
                    fresh.updated = guest.updated;
                    if let Err(e) = ctx.repos.guests.save_versioned(&fresh).await {
                        warn!("Unable to update conversation of guest {}: {:?}", fresh.id, e);
                    }
                }
            }
        }
        Err(e) => warn!("Unable to update conversation of guest {}: {:?}", guest.id, e),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scheduler::planner::create_schedules_for_event;
    use crate::shared::test_helpers::{date, insert_event, insert_guest, setup_at, TestContext};
    use rsvp_scheduler_domain::{
        ConversationState, GuestStatus, MessageSchedulePolicy, PackageKind,
        ScheduledMessageStatus,
    };
    use rsvp_scheduler_infra::delivery::SentMessageKind;

    /// Plans the default policy of an event on 2025-12-25 and moves the clock to `today`
    async fn planned_event(package: PackageKind, today: NaiveDate) -> (TestContext, Event) {
        let planning = setup_at(date(2025, 11, 1));
        let event = insert_event(&planning.ctx, Some(date(2025, 12, 25)), package).await;
        create_schedules_for_event(
            &planning.ctx,
            &event.id,
            date(2025, 12, 25),
            &MessageSchedulePolicy::default(),
        )
        .await
        .unwrap();

        let mut test = planning;
        test.ctx.sys = setup_at(today).ctx.sys;
        (test, event)
    }

    #[actix_web::main]
    #[test]
    async fn sends_invitations_and_arms_conversations() {
        let (test, event) = planned_event(PackageKind::Full, date(2025, 12, 4)).await;
        let dana = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;
        let omer = insert_guest(&test.ctx, &event, "Omer", "+972 52 765 4321").await;

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        assert_eq!(run.processed.len(), 1);
        assert_eq!(run.skipped, 0);
        let message = &run.processed[0];
        assert_eq!(message.ordinal, 1);
        assert_eq!(message.status, ScheduledMessageStatus::Completed);
        assert_eq!(message.sent_count, 2);
        assert_eq!(message.failed_count, 0);
        assert!(message.sent_at.is_some());

        assert_eq!(test.whatsapp.sent().len(), 2);
        assert!(test
            .whatsapp
            .sent()
            .iter()
            .all(|m| m.kind == SentMessageKind::Invitation));
        assert!(test.sms.sent().is_empty());

        for guest in [&dana, &omer] {
            let guest = test.ctx.repos.guests.find(&guest.id).await.unwrap();
            assert_eq!(guest.conversation_state, ConversationState::WaitingForRsvp);
            assert_eq!(guest.status, GuestStatus::Pending);
        }

        // Nothing is due anymore
        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        assert!(run.processed.is_empty());
        assert_eq!(test.whatsapp.sent().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn reminders_skip_guests_who_answered() {
        let (test, event) = planned_event(PackageKind::Full, date(2025, 12, 11)).await;
        let pending = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;
        let mut confirmed = insert_guest(&test.ctx, &event, "Omer", "0527654321").await;
        confirmed.set_status(GuestStatus::Confirmed, Some(2));
        test.ctx.repos.guests.save(&confirmed).await.unwrap();
        let mut declined = insert_guest(&test.ctx, &event, "Gal", "0541112222").await;
        declined.set_status(GuestStatus::Declined, None);
        test.ctx.repos.guests.save(&declined).await.unwrap();

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        // The invitation was never sent so both the invitation and the first reminder are due
        assert_eq!(run.processed.len(), 2);
        let reminder = run.processed.iter().find(|m| m.ordinal == 2).unwrap();
        assert_eq!(reminder.sent_count, 1);

        let reminders = test
            .whatsapp
            .sent()
            .into_iter()
            .filter(|m| m.kind == SentMessageKind::Reminder)
            .collect::<Vec<_>>();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].phone, pending.phone);
        assert!(test
            .whatsapp
            .sent_to(&confirmed.phone)
            .iter()
            .all(|m| m.kind == SentMessageKind::Invitation));
    }

    #[actix_web::main]
    #[test]
    async fn failures_of_single_guests_do_not_abort_the_batch() {
        let (test, event) = planned_event(PackageKind::Full, date(2025, 12, 4)).await;
        let phones = [
            "0501111111",
            "0502222222",
            "0503333333",
            "0504444444",
            "0505555555",
        ];
        for (idx, phone) in phones.iter().enumerate() {
            let guest = insert_guest(&test.ctx, &event, &format!("Guest {}", idx), phone).await;
            if idx % 2 == 1 {
                test.whatsapp.fail_for(&guest.phone);
            }
        }

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        let message = &run.processed[0];
        assert_eq!(message.status, ScheduledMessageStatus::Partial);
        assert_eq!(message.sent_count, 3);
        assert_eq!(message.failed_count, 2);
        let errors = message.error_message.clone().unwrap();
        assert_eq!(errors.split("; ").count(), 2);
        assert!(errors.contains("972502222222"));
    }

    #[actix_web::main]
    #[test]
    async fn total_outage_marks_message_failed() {
        let (test, event) = planned_event(PackageKind::Full, date(2025, 12, 4)).await;
        let guest = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;
        test.whatsapp.fail_for(&guest.phone);

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        assert_eq!(run.processed[0].status, ScheduledMessageStatus::Failed);
        assert_eq!(run.processed[0].failed_count, 1);

        let guest = test.ctx.repos.guests.find(&guest.id).await.unwrap();
        assert_eq!(guest.conversation_state, ConversationState::None);
    }

    #[actix_web::main]
    #[test]
    async fn completes_without_recipients() {
        let (test, _event) = planned_event(PackageKind::Full, date(2025, 12, 4)).await;

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        let message = &run.processed[0];
        assert_eq!(message.status, ScheduledMessageStatus::Completed);
        assert_eq!(message.sent_count, 0);
        assert_eq!(message.failed_count, 0);
        assert!(message.error_message.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn sms_package_sends_personal_links() {
        let (test, event) = planned_event(PackageKind::SmsOnly, date(2025, 12, 4)).await;
        let guest = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;

        execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();

        assert!(test.whatsapp.sent().is_empty());
        let sent = test.sms.sent_to(&guest.phone);
        assert_eq!(sent.len(), 1);
        match &sent[0].kind {
            SentMessageKind::FreeText(text) => {
                assert!(text.contains("Noa & Eli"));
                assert!(text.contains(&format!(
                    "{}/{}?token=",
                    test.ctx.config.rsvp_link_base_url, guest.id
                )));
            }
            other => panic!("Expected free text, got {:?}", other),
        }
    }

    #[actix_web::main]
    #[test]
    async fn claimed_messages_are_skipped() {
        let (test, event) = planned_event(PackageKind::Full, date(2025, 12, 4)).await;
        insert_guest(&test.ctx, &event, "Dana", "0501234567").await;
        let due = test
            .ctx
            .repos
            .scheduled_messages
            .find_due(date(2025, 12, 4), 0, 50)
            .await
            .unwrap();
        let now = test.ctx.sys.get_timestamp_millis();
        assert!(test
            .ctx
            .repos
            .scheduled_messages
            .claim(&due[0].id, now, 0)
            .await
            .unwrap());

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        assert!(run.processed.is_empty());
        assert!(test.whatsapp.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn abandoned_claims_are_retried() {
        let (test, event) = planned_event(PackageKind::Full, date(2025, 12, 4)).await;
        insert_guest(&test.ctx, &event, "Dana", "0501234567").await;
        let due = test
            .ctx
            .repos
            .scheduled_messages
            .find_due(date(2025, 12, 4), 0, 50)
            .await
            .unwrap();
        // Claimed by a run that died before storing any outcome
        let claimed_at = test.ctx.sys.get_timestamp_millis() - PROCESSING_LEASE_MILLIS - 1;
        assert!(test
            .ctx
            .repos
            .scheduled_messages
            .claim(&due[0].id, claimed_at, 0)
            .await
            .unwrap());

        let run = execute(ProcessDueMessagesUseCase, &test.ctx).await.unwrap();
        assert_eq!(run.processed.len(), 1);
        assert_eq!(run.processed[0].id, due[0].id);
        assert_eq!(run.processed[0].status, ScheduledMessageStatus::Completed);
        assert_eq!(test.whatsapp.sent().len(), 1);
    }
}
