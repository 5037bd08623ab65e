use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::get_event_schedules::*;
use rsvp_scheduler_domain::{ScheduledMessage, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn get_event_schedules_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let event_id = path_params.into_inner().event_id;
    let usecase = GetEventSchedulesUseCase {
        event_id: event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|messages| HttpResponse::Ok().json(APIResponse::new(event_id, messages)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct GetEventSchedulesUseCase {
    pub event_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventSchedulesUseCase {
    type Response = Vec<ScheduledMessage>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEventSchedules";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id.clone()));
        }

        ctx.repos
            .scheduled_messages
            .find_by_event(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
