use super::subscribers::CreateSchedulesOnEventCreated;
use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::create_event::*;
use rsvp_scheduler_domain::{
    parse_date, parse_time, Event, MessageSchedulePolicy, PackageKind, ID,
};
use rsvp_scheduler_infra::RsvpContext;

pub async fn create_event_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateEventUseCase {
        owner_id: body.owner_id.unwrap_or_default(),
        title: body.title,
        date: body.date,
        time: body.time,
        location: body.location,
        additional_info: body.additional_info,
        image_url: body.image_url,
        package: body.package.unwrap_or_default(),
        message_schedule: body.message_schedule.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub owner_id: ID,
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub additional_info: Option<String>,
    pub image_url: Option<String>,
    pub package: PackageKind,
    pub message_schedule: MessageSchedulePolicy,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    InvalidDate(String),
    InvalidTime(String),
    InvalidSchedulePolicy(String),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::BadClientData("The event needs a title".into()),
            UseCaseError::InvalidDate(date) => {
                Self::BadClientData(format!("Invalid event date: {}", date))
            }
            UseCaseError::InvalidTime(time) => {
                Self::BadClientData(format!("Invalid event time: {}", time))
            }
            UseCaseError::InvalidSchedulePolicy(e) => Self::BadClientData(e),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        self.message_schedule
            .validate()
            .map_err(|e| UseCaseError::InvalidSchedulePolicy(e.to_string()))?;

        let mut e = Event::new(
            self.owner_id.clone(),
            self.title.trim().to_string(),
            ctx.sys.get_timestamp_millis(),
        );
        if let Some(date) = &self.date {
            e.date = Some(parse_date(date).map_err(|_| UseCaseError::InvalidDate(date.clone()))?);
        }
        if let Some(time) = &self.time {
            e.time = Some(parse_time(time).map_err(|_| UseCaseError::InvalidTime(time.clone()))?);
        }
        e.location = self.location.clone();
        e.additional_info = self.additional_info.clone();
        e.image_url = self.image_url.clone();
        e.package = self.package;
        e.message_schedule = self.message_schedule.clone();

        ctx.repos
            .events
            .insert(&e)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(e)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CreateSchedulesOnEventCreated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::{date, setup_at};
    use chrono::NaiveTime;
    use rsvp_scheduler_domain::{EventStatus, ScheduleKind};

    fn usecase(date: Option<&str>) -> CreateEventUseCase {
        CreateEventUseCase {
            owner_id: ID::default(),
            title: "Noa & Eli".into(),
            date: date.map(String::from),
            time: Some("19:30".into()),
            location: Some("Tel Aviv".into()),
            additional_info: None,
            image_url: None,
            package: PackageKind::Full,
            message_schedule: Default::default(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_event_and_plans_its_messages() {
        let test = setup_at(date(2025, 11, 1));

        let event = execute(usecase(Some("2025-12-25")), &test.ctx).await.unwrap();
        assert_eq!(event.status, EventStatus::Active);
        assert_eq!(event.date, Some(date(2025, 12, 25)));
        assert_eq!(event.time, NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(event.message_schedule.kind, ScheduleKind::Default);

        let planned = test
            .ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert_eq!(planned.len(), 3);
    }

    #[actix_web::main]
    #[test]
    async fn nothing_is_planned_without_a_date() {
        let test = setup_at(date(2025, 11, 1));

        let event = execute(usecase(None), &test.ctx).await.unwrap();
        let planned = test
            .ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert!(planned.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_input() {
        let test = setup_at(date(2025, 11, 1));

        let mut bad_title = usecase(None);
        bad_title.title = "  ".into();
        assert_eq!(
            execute(bad_title, &test.ctx).await.unwrap_err(),
            UseCaseError::EmptyTitle
        );

        assert_eq!(
            execute(usecase(Some("25/12/2025")), &test.ctx)
                .await
                .unwrap_err(),
            UseCaseError::InvalidDate("25/12/2025".into())
        );

        let mut bad_policy = usecase(None);
        bad_policy.message_schedule = MessageSchedulePolicy::custom(vec![500]);
        assert!(matches!(
            execute(bad_policy, &test.ctx).await,
            Err(UseCaseError::InvalidSchedulePolicy(_))
        ));
    }
}
