use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::add_guests_bulk::*;
use rsvp_scheduler_api_structs::dtos::NewGuestDTO;
use rsvp_scheduler_domain::{Guest, PhoneNumber, ID};
use rsvp_scheduler_infra::RsvpContext;
use tracing::info;

pub async fn add_guests_bulk_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let usecase = AddGuestsBulkUseCase {
        event_id: path_params.into_inner().event_id,
        guests: body.0.guests,
    };

    execute(usecase, &ctx)
        .await
        .map(|guests| HttpResponse::Created().json(APIResponse::new(guests)))
        .map_err(ApiError::from)
}

/// Imports a guest list. Either every row is stored or none is.
#[derive(Debug)]
pub struct AddGuestsBulkUseCase {
    pub event_id: ID,
    pub guests: Vec<NewGuestDTO>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    /// 1-based row of the import and the reason it was rejected
    InvalidRow(usize, String),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::InvalidRow(row, reason) => {
                Self::BadClientData(format!("Guest on row {} is invalid: {}", row, reason))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddGuestsBulkUseCase {
    type Response = Vec<Guest>;

    type Error = UseCaseError;

    const NAME: &'static str = "AddGuestsBulk";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id.clone()));
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut guests = Vec::with_capacity(self.guests.len());
        for (idx, new_guest) in self.guests.iter().enumerate() {
            if new_guest.name.trim().is_empty() {
                return Err(UseCaseError::InvalidRow(idx + 1, "missing name".into()));
            }
            let phone = PhoneNumber::parse(&new_guest.phone)
                .map_err(|e| UseCaseError::InvalidRow(idx + 1, e.to_string()))?;
            let mut guest = Guest::new(
                self.event_id.clone(),
                new_guest.name.trim().to_string(),
                phone,
                now,
            );
            guest.email = new_guest.email.clone();
            guests.push(guest);
        }

        ctx.repos
            .guests
            .insert_many(&guests)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            "Imported {} guests into event {}",
            guests.len(),
            self.event_id
        );

        Ok(guests)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::{date, insert_event, setup_at};
    use rsvp_scheduler_domain::PackageKind;

    fn row(name: &str, phone: &str) -> NewGuestDTO {
        NewGuestDTO {
            name: name.into(),
            phone: phone.into(),
            email: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn imports_every_row() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, None, PackageKind::Full).await;

        let usecase = AddGuestsBulkUseCase {
            event_id: event.id.clone(),
            guests: vec![
                row("Dana", "0501234567"),
                row("Omer", "+972527654321"),
                row("Gal", "972541112222"),
            ],
        };
        let guests = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(guests.len(), 3);
        assert_eq!(
            test.ctx
                .repos
                .guests
                .find_by_event(&event.id)
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[actix_web::main]
    #[test]
    async fn one_bad_row_rejects_the_import() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, None, PackageKind::Full).await;

        let usecase = AddGuestsBulkUseCase {
            event_id: event.id.clone(),
            guests: vec![row("Dana", "0501234567"), row("Omer", "12")],
        };
        assert!(matches!(
            execute(usecase, &test.ctx).await,
            Err(UseCaseError::InvalidRow(2, _))
        ));
        assert!(test
            .ctx
            .repos
            .guests
            .find_by_event(&event.id)
            .await
            .unwrap()
            .is_empty());
    }
}
