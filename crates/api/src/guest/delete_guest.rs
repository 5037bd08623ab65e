use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::delete_guest::*;
use rsvp_scheduler_domain::{Guest, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn delete_guest_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let usecase = DeleteGuestUseCase {
        guest_id: path_params.into_inner().guest_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|guest| HttpResponse::Ok().json(APIResponse::new(guest)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct DeleteGuestUseCase {
    pub guest_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(guest_id) => Self::NotFound(format!(
                "The guest with id: {}, was not found.",
                guest_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteGuestUseCase {
    type Response = Guest;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteGuest";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .guests
            .delete(&self.guest_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.guest_id.clone()))
    }
}
