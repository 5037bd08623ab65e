use super::planner::{update_schedules_on_date_change, Rescheduled};
use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::update_schedules::*;
use rsvp_scheduler_domain::{parse_date, MessageSchedulePolicy, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn update_schedules_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let event_id = path_params.into_inner().event_id;
    let body = body.0;
    let usecase = UpdateSchedulesUseCase {
        event_id: event_id.clone(),
        event_date: body.event_date,
        message_schedule: body.message_schedule,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(event_id, res.deleted, res.created))
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct UpdateSchedulesUseCase {
    pub event_id: ID,
    pub event_date: String,
    pub message_schedule: Option<MessageSchedulePolicy>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidDate(String),
    InvalidSchedulePolicy(String),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::InvalidDate(date) => {
                Self::BadClientData(format!("Invalid event date: {}", date))
            }
            UseCaseError::InvalidSchedulePolicy(e) => Self::BadClientData(e),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateSchedulesUseCase {
    type Response = Rescheduled;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateSchedules";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        let new_date = parse_date(&self.event_date)
            .map_err(|_| UseCaseError::InvalidDate(self.event_date.clone()))?;
        if let Some(policy) = self.message_schedule.take() {
            policy
                .validate()
                .map_err(|e| UseCaseError::InvalidSchedulePolicy(e.to_string()))?;
            event.message_schedule = policy;
        }

        event.date = Some(new_date);
        event.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        update_schedules_on_date_change(ctx, &event.id, new_date, &event.message_schedule)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scheduler::planner::create_schedules_for_event;
    use crate::shared::test_helpers::{date, insert_event, setup_at};
    use rsvp_scheduler_domain::PackageKind;

    #[actix_web::main]
    #[test]
    async fn moves_pending_messages_to_the_new_date() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;
        create_schedules_for_event(
            &test.ctx,
            &event.id,
            date(2025, 12, 25),
            &event.message_schedule,
        )
        .await
        .unwrap();

        let usecase = UpdateSchedulesUseCase {
            event_id: event.id.clone(),
            event_date: "2025-12-31T19:00:00".into(),
            message_schedule: None,
        };
        let res = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(res.deleted, 3);
        let due = res.created.iter().map(|m| m.due_date).collect::<Vec<_>>();
        assert_eq!(
            due,
            vec![date(2025, 12, 10), date(2025, 12, 17), date(2025, 12, 24)]
        );

        let event = test.ctx.repos.events.find(&event.id).await.unwrap();
        assert_eq!(event.date, Some(date(2025, 12, 31)));
    }
}
