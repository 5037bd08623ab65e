use super::{authorize_guest, RsvpAccessError};
use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use rsvp_scheduler_api_structs::get_rsvp_details::*;
use rsvp_scheduler_domain::{Event, Guest, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn get_rsvp_details_controller(
    path_params: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    let usecase = GetRsvpDetailsUseCase {
        guest_id: path_params.into_inner().guest_id,
        token: query.into_inner().token,
    };

    execute(usecase, &ctx)
        .await
        .map(|(guest, event)| HttpResponse::Ok().json(APIResponse::new(guest, event)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct GetRsvpDetailsUseCase {
    pub guest_id: ID,
    pub token: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    Access(RsvpAccessError),
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Access(RsvpAccessError::GuestNotFound(guest_id)) => Self::NotFound(
                format!("The guest with id: {}, was not found.", guest_id),
            ),
            UseCaseError::Access(RsvpAccessError::InvalidToken(e)) => {
                Self::Forbidden(e.to_string())
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRsvpDetailsUseCase {
    type Response = (Guest, Event);

    type Error = UseCaseError;

    const NAME: &'static str = "GetRsvpDetails";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        authorize_guest(ctx, &self.guest_id, &self.token)
            .await
            .map_err(UseCaseError::Access)
    }
}
