use super::planner::create_schedules_for_event;
use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::create_schedules::*;
use rsvp_scheduler_domain::{parse_date, MessageSchedulePolicy, ScheduledMessage, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn create_schedules_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let event_id = path_params.into_inner().event_id;
    let body = body.0;
    let usecase = CreateSchedulesUseCase {
        event_id: event_id.clone(),
        event_date: body.event_date,
        message_schedule: body.message_schedule,
    };

    execute(usecase, &ctx)
        .await
        .map(|created| {
            HttpResponse::Created().json(APIResponse::new(event_id, created))
        })
        .map_err(ApiError::from)
}

/// Stores the date (and policy when given) on the event and plans its messages
#[derive(Debug)]
pub struct CreateSchedulesUseCase {
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
impl UseCase for CreateSchedulesUseCase {
    type Response = Vec<ScheduledMessage>;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateSchedules";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        let event_date = parse_date(&self.event_date)
            .map_err(|_| UseCaseError::InvalidDate(self.event_date.clone()))?;
        if let Some(policy) = self.message_schedule.take() {
            policy
                .validate()
                .map_err(|e| UseCaseError::InvalidSchedulePolicy(e.to_string()))?;
            event.message_schedule = policy;
        }

        event.date = Some(event_date);
        event.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        create_schedules_for_event(ctx, &event.id, event_date, &event.message_schedule)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
