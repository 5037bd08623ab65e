use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::update_guest::*;
use rsvp_scheduler_domain::{Guest, GuestStatus, PhoneNumber, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn update_guest_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateGuestUseCase {
        guest_id: path_params.into_inner().guest_id,
        name: body.name,
        phone: body.phone,
        email: body.email,
        status: body.status,
        attending_count: body.attending_count,
    };

    execute(usecase, &ctx)
        .await
        .map(|guest| HttpResponse::Ok().json(APIResponse::new(guest)))
        .map_err(ApiError::from)
}

/// Staff edit of a guest. Status changes bypass the reply conversation.
#[derive(Debug, Default)]
pub struct UpdateGuestUseCase {
    pub guest_id: ID,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<GuestStatus>,
    pub attending_count: Option<u32>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyName,
    InvalidPhone(String),
    InvalidStatus(String),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(guest_id) => Self::NotFound(format!(
                "The guest with id: {}, was not found.",
                guest_id
            )),
            UseCaseError::EmptyName => Self::BadClientData("The guest needs a name".into()),
            UseCaseError::InvalidPhone(phone) => {
                Self::BadClientData(format!("Invalid phone number: {}", phone))
            }
            UseCaseError::InvalidStatus(e) => Self::BadClientData(e),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateGuestUseCase {
    type Response = Guest;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateGuest";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let mut guest = ctx
            .repos
            .guests
            .find(&self.guest_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.guest_id.clone()))?;

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(UseCaseError::EmptyName);
            }
            guest.name = name.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            guest.phone =
                PhoneNumber::parse(phone).map_err(|_| UseCaseError::InvalidPhone(phone.clone()))?;
        }
        if let Some(email) = self.email.take() {
            guest.email = Some(email);
        }
        if self.status.is_some() || self.attending_count.is_some() {
            let status = self.status.unwrap_or(guest.status);
            guest
                .override_status(status, self.attending_count)
                .map_err(|e| UseCaseError::InvalidStatus(e.to_string()))?;
        }

        guest.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .guests
            .save(&guest)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(guest)
    }
}
