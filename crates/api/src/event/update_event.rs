use super::subscribers::RescheduleOnEventUpdated;
use crate::error::ApiError;
use crate::shared::{
    auth::protect_api_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::update_event::*;
use rsvp_scheduler_domain::{
    parse_date, parse_time, Event, EventStatus, MessageSchedulePolicy, PackageKind, ID,
};
use rsvp_scheduler_infra::RsvpContext;

pub async fn update_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RsvpContext>,
) -> Result<HttpResponse, ApiError> {
    protect_api_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateEventUseCase {
        event_id: path_params.into_inner().event_id,
        title: body.title,
        date: body.date,
        time: body.time,
        location: body.location,
        additional_info: body.additional_info,
        image_url: body.image_url,
        package: body.package,
        message_schedule: body.message_schedule,
        status: body.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|updated| HttpResponse::Ok().json(APIResponse::new(updated.event)))
        .map_err(ApiError::from)
}

#[derive(Debug, Default)]
pub struct UpdateEventUseCase {
    pub event_id: ID,
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub additional_info: Option<String>,
    pub image_url: Option<String>,
    pub package: Option<PackageKind>,
    pub message_schedule: Option<MessageSchedulePolicy>,
    pub status: Option<EventStatus>,
}

#[derive(Debug)]
pub struct UpdatedEvent {
    pub event: Event,
    /// The date or the schedule policy changed
    pub schedule_changed: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyTitle,
    InvalidDate(String),
    InvalidTime(String),
    InvalidSchedulePolicy(String),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
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
impl UseCase for UpdateEventUseCase {
    type Response = UpdatedEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let mut e = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        let mut schedule_changed = false;

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            e.title = title.trim().to_string();
        }
        if let Some(date) = &self.date {
            let date = parse_date(date).map_err(|_| UseCaseError::InvalidDate(date.clone()))?;
            schedule_changed |= e.date != Some(date);
            e.date = Some(date);
        }
        if let Some(time) = &self.time {
            e.time = Some(parse_time(time).map_err(|_| UseCaseError::InvalidTime(time.clone()))?);
        }
        if let Some(policy) = self.message_schedule.take() {
            policy
                .validate()
                .map_err(|e| UseCaseError::InvalidSchedulePolicy(e.to_string()))?;
            schedule_changed |= e.message_schedule != policy;
            e.message_schedule = policy;
        }
        if let Some(location) = self.location.take() {
            e.location = Some(location);
        }
        if let Some(additional_info) = self.additional_info.take() {
            e.additional_info = Some(additional_info);
        }
        if let Some(image_url) = self.image_url.take() {
            e.image_url = Some(image_url);
        }
        if let Some(package) = self.package {
            e.package = package;
        }
        if let Some(status) = self.status {
            e.status = status;
        }

        e.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .events
            .save(&e)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UpdatedEvent {
            event: e,
            schedule_changed,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RescheduleOnEventUpdated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scheduler::planner::create_schedules_for_event;
    use crate::shared::test_helpers::{date, insert_event, setup_at};
    use rsvp_scheduler_domain::ScheduledMessageStatus;

    #[actix_web::main]
    #[test]
    async fn date_change_replans_pending_messages() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;
        let mut planned = create_schedules_for_event(
            &test.ctx,
            &event.id,
            date(2025, 12, 25),
            &event.message_schedule,
        )
        .await
        .unwrap();
        let mut sent = planned.remove(0);
        sent.status = ScheduledMessageStatus::Completed;
        test.ctx.repos.scheduled_messages.save(&sent).await.unwrap();

        let usecase = UpdateEventUseCase {
            event_id: event.id.clone(),
            date: Some("2026-01-20".into()),
            ..Default::default()
        };
        let updated = execute(usecase, &test.ctx).await.unwrap();
        assert!(updated.schedule_changed);

        let rows = test
            .ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, sent.id);
        assert_eq!(rows[0].status, ScheduledMessageStatus::Completed);
        assert_eq!(rows[1].due_date, date(2026, 1, 6));
        assert_eq!(rows[2].due_date, date(2026, 1, 13));
    }

    #[actix_web::main]
    #[test]
    async fn other_changes_keep_the_schedule() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, Some(date(2025, 12, 25)), PackageKind::Full).await;

        let usecase = UpdateEventUseCase {
            event_id: event.id.clone(),
            title: Some("Noa & Eli's wedding".into()),
            date: Some("2025-12-25".into()),
            status: Some(EventStatus::Cancelled),
            ..Default::default()
        };
        let updated = execute(usecase, &test.ctx).await.unwrap();
        assert!(!updated.schedule_changed);
        assert_eq!(updated.event.status, EventStatus::Cancelled);
        assert_eq!(updated.event.title, "Noa & Eli's wedding");

        let rows = test
            .ctx
            .repos
            .scheduled_messages
            .find_by_event(&event.id)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn unknown_event_is_not_found() {
        let test = setup_at(date(2025, 11, 1));
        let event_id = ID::default();
        let usecase = UpdateEventUseCase {
            event_id: event_id.clone(),
            ..Default::default()
        };
        assert_eq!(
            execute(usecase, &test.ctx).await.unwrap_err(),
            UseCaseError::NotFound(event_id)
        );
    }
}
