use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::delete_event::*;
use rsvp_scheduler_domain::{Event, ID};
use rsvp_scheduler_infra::RsvpContext;
use tracing::info;

pub async fn delete_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let usecase = DeleteEventUseCase {
        event_id: path_params.into_inner().event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(ApiError::from)
}

/// Removes the event together with its guests and scheduled messages
#[derive(Debug)]
pub struct DeleteEventUseCase {
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
impl UseCase for DeleteEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id.clone()));
        }

        let messages = ctx
            .repos
            .scheduled_messages
            .delete_by_event(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let guests = ctx
            .repos
            .guests
            .delete_by_event(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            "Deleting event {} with {} guests and {} scheduled messages",
            self.event_id, guests.deleted_count, messages.deleted_count
        );

        ctx.repos
            .events
            .delete(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))
    }
}
