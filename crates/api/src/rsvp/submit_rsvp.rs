use super::{authorize_guest, RsvpAccessError};
use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use rsvp_scheduler_api_structs::submit_rsvp::*;
use rsvp_scheduler_domain::{Event, Guest, GuestStatus, ID};
use rsvp_scheduler_infra::RsvpContext;
use tracing::info;

pub async fn submit_rsvp_controller(
    path_params: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    let body = body.0;
    let usecase = SubmitRsvpUseCase {
        guest_id: path_params.into_inner().guest_id,
        token: query.into_inner().token,
        status: body.status,
        attending_count: body.attending_count,
    };

    execute(usecase, &ctx)
        .await
        .map(|(guest, event)| HttpResponse::Ok().json(APIResponse::new(guest, event)))
        .map_err(ApiError::from)
}

/// Answer given on the RSVP page. Closes the reply conversation.
#[derive(Debug)]
pub struct SubmitRsvpUseCase {
    pub guest_id: ID,
    pub token: String,
    pub status: GuestStatus,
    pub attending_count: u32,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    Access(RsvpAccessError),
    UnsupportedAnswer(GuestStatus),
    MissingAttendingCount,
    StorageError,
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
            UseCaseError::UnsupportedAnswer(status) => Self::BadClientData(format!(
                "Answer must be confirmed or declined, got {}",
                status.as_str()
            )),
            UseCaseError::MissingAttendingCount => Self::BadClientData(
                "A confirmation needs at least one attending guest".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SubmitRsvpUseCase {
    type Response = (Guest, Event);

    type Error = UseCaseError;

    const NAME: &'static str = "SubmitRsvp";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let (mut guest, event) = authorize_guest(ctx, &self.guest_id, &self.token)
            .await
            .map_err(UseCaseError::Access)?;

        let attending_count = match self.status {
            GuestStatus::Confirmed if self.attending_count == 0 => {
                return Err(UseCaseError::MissingAttendingCount)
            }
            GuestStatus::Confirmed => Some(self.attending_count),
            GuestStatus::Declined => None,
            other => return Err(UseCaseError::UnsupportedAnswer(other)),
        };
        guest
            .override_status(self.status, attending_count)
            .map_err(|_| UseCaseError::MissingAttendingCount)?;

        guest.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .guests
            .save(&guest)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            "Guest {} answered {} through the RSVP page",
            guest.id,
            guest.status.as_str()
        );

        Ok((guest, event))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rsvp::personal_rsvp_link;
    use crate::shared::test_helpers::{date, insert_event, insert_guest, setup_at};
    use rsvp_scheduler_domain::{ConversationState, PackageKind};

    #[actix_web::main]
    #[test]
    async fn confirms_through_the_page() {
        let test = setup_at(date(2025, 12, 4));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::SmsOnly).await;
        let mut guest = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;
        guest.await_rsvp();
        test.ctx.repos.guests.save(&guest).await.unwrap();

        let now_secs = test.ctx.sys.get_timestamp_millis() / 1000;
        let link = personal_rsvp_link(&test.ctx.config, &guest, &event, now_secs);
        let token = link.split("token=").nth(1).unwrap().to_string();

        let usecase = SubmitRsvpUseCase {
            guest_id: guest.id.clone(),
            token: token.clone(),
            status: GuestStatus::Confirmed,
            attending_count: 0,
        };
        assert_eq!(
            execute(usecase, &test.ctx).await.unwrap_err(),
            UseCaseError::MissingAttendingCount
        );

        let usecase = SubmitRsvpUseCase {
            guest_id: guest.id.clone(),
            token: token.clone(),
            status: GuestStatus::Maybe,
            attending_count: 0,
        };
        assert_eq!(
            execute(usecase, &test.ctx).await.unwrap_err(),
            UseCaseError::UnsupportedAnswer(GuestStatus::Maybe)
        );

        let usecase = SubmitRsvpUseCase {
            guest_id: guest.id.clone(),
            token,
            status: GuestStatus::Confirmed,
            attending_count: 2,
        };
        let (guest, _) = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(guest.status, GuestStatus::Confirmed);
        assert_eq!(guest.attending_count, 2);
        assert_eq!(guest.conversation_state, ConversationState::Done);

        let stored = test.ctx.repos.guests.find(&guest.id).await.unwrap();
        assert_eq!(stored.status, GuestStatus::Confirmed);
    }

    #[actix_web::main]
    #[test]
    async fn garbage_token_is_rejected() {
        let test = setup_at(date(2025, 12, 4));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::SmsOnly).await;
        let guest = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;

        let usecase = SubmitRsvpUseCase {
            guest_id: guest.id.clone(),
            token: "not-a-token".into(),
            status: GuestStatus::Declined,
            attending_count: 0,
        };
        assert!(matches!(
            execute(usecase, &test.ctx).await,
            Err(UseCaseError::Access(RsvpAccessError::InvalidToken(_)))
        ));
    }
}
