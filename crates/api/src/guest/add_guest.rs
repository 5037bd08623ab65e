use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::add_guest::*;
use rsvp_scheduler_domain::{Guest, PhoneNumber, ID};
use rsvp_scheduler_infra::RsvpContext;

pub async fn add_guest_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = AddGuestUseCase {
        event_id: path_params.into_inner().event_id,
        name: body.name,
        phone: body.phone,
        email: body.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|guest| HttpResponse::Created().json(APIResponse::new(guest)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct AddGuestUseCase {
    pub event_id: ID,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyName,
    InvalidPhone(String),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::EmptyName => Self::BadClientData("The guest needs a name".into()),
            UseCaseError::InvalidPhone(phone) => {
                Self::BadClientData(format!("Invalid phone number: {}", phone))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddGuestUseCase {
    type Response = Guest;

    type Error = UseCaseError;

    const NAME: &'static str = "AddGuest";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(UseCaseError::EmptyName);
        }
        let phone = PhoneNumber::parse(&self.phone)
            .map_err(|_| UseCaseError::InvalidPhone(self.phone.clone()))?;

        let mut guest = Guest::new(
            self.event_id.clone(),
            self.name.trim().to_string(),
            phone,
            ctx.sys.get_timestamp_millis(),
        );
        guest.email = self.email.take();

        ctx.repos
            .guests
            .insert(&guest)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(guest)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::{date, insert_event, setup_at};
    use rsvp_scheduler_domain::{ConversationState, GuestStatus, PackageKind};

    #[actix_web::main]
    #[test]
    async fn stores_phone_in_canonical_form() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, None, PackageKind::Full).await;

        let usecase = AddGuestUseCase {
            event_id: event.id.clone(),
            name: "Dana".into(),
            phone: "050-123-4567".into(),
            email: None,
        };
        let guest = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(guest.phone.as_str(), "972501234567");
        assert_eq!(guest.status, GuestStatus::Pending);
        assert_eq!(guest.conversation_state, ConversationState::None);
        assert!(test.ctx.repos.guests.find(&guest.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_phone() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, None, PackageKind::Full).await;

        let usecase = AddGuestUseCase {
            event_id: event.id.clone(),
            name: "Dana".into(),
            phone: "call me".into(),
            email: None,
        };
        assert_eq!(
            execute(usecase, &test.ctx).await.unwrap_err(),
            UseCaseError::InvalidPhone("call me".into())
        );
    }
}
