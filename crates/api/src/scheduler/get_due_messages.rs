use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use rsvp_scheduler_api_structs::get_due_messages::*;
use rsvp_scheduler_domain::{ScheduledMessage, PROCESSING_LEASE_MILLIS};
use rsvp_scheduler_infra::RsvpContext;

pub async fn get_due_messages_controller(
    http_req: HttpRequest,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    execute(GetDueMessagesUseCase, &ctx)
        .await
        .map(|due| HttpResponse::Ok().json(APIResponse::new(due.today, due.messages)))
        .map_err(ApiError::from)
}

/// The pending messages the next dispatch run would pick up
#[derive(Debug)]
pub struct GetDueMessagesUseCase;

#[derive(Debug)]
pub struct DueMessages {
    pub today: NaiveDate,
    pub messages: Vec<ScheduledMessage>,
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
impl UseCase for GetDueMessagesUseCase {
    type Response = DueMessages;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDueMessages";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let today = ctx.sys.today(&ctx.config.timezone);
        let messages = ctx
            .repos
            .scheduled_messages
            .find_due(
                today,
                ctx.sys.get_timestamp_millis() - PROCESSING_LEASE_MILLIS,
                ctx.config.dispatch_batch_size,
            )
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(DueMessages { today, messages })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scheduler::planner::create_schedules_for_event;
    use crate::shared::test_helpers::{date, insert_event, setup_at};
    use rsvp_scheduler_domain::{EventStatus, PackageKind};

    #[actix_web::main]
    #[test]
    async fn lists_messages_due_by_today_of_active_events() {
        let planning = setup_at(date(2025, 11, 1));
        let event = insert_event(&planning.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;
        let mut cancelled =
            insert_event(&planning.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;
        for e in [&event, &cancelled] {
            create_schedules_for_event(&planning.ctx, &e.id, date(2025, 12, 25), &e.message_schedule)
                .await
                .unwrap();
        }
        cancelled.status = EventStatus::Cancelled;
        planning.ctx.repos.events.save(&cancelled).await.unwrap();

        // Same storage, later clock
        let mut ctx = planning.ctx.clone();
        ctx.sys = setup_at(date(2025, 12, 12)).ctx.sys;

        let due = execute(GetDueMessagesUseCase, &ctx).await.unwrap();
        assert_eq!(due.today, date(2025, 12, 12));
        let ordinals = due.messages.iter().map(|m| m.ordinal).collect::<Vec<_>>();
        assert_eq!(ordinals, vec![1, 2]);
        assert!(due.messages.iter().all(|m| m.event_id == event.id));
    }
}
