use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::get_event_guests::*;
use rsvp_scheduler_domain::{Guest, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn get_event_guests_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let usecase = GetEventGuestsUseCase {
        event_id: path_params.into_inner().event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|guests| HttpResponse::Ok().json(APIResponse::new(guests)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct GetEventGuestsUseCase {
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
impl UseCase for GetEventGuestsUseCase {
    type Response = Vec<Guest>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEventGuests";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id.clone()));
        }

        ctx.repos
            .guests
            .find_by_event(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
