use super::{create_event::CreateEventUseCase, update_event::UpdateEventUseCase};
use crate::scheduler::planner::{create_schedules_for_event, update_schedules_on_date_change};
use crate::shared::usecase::Subscriber;
use rsvp_scheduler_domain::Event;
use rsvp_scheduler_infra::RsvpContext;
use tracing::error;

use super::update_event::UpdatedEvent;

pub struct CreateSchedulesOnEventCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateEventUseCase> for CreateSchedulesOnEventCreated {
    async fn notify(&self, e: &Event, ctx: &RsvpContext) {
        let event_date = match e.date {
            Some(date) => date,
            None => return,
        };

        // Sideeffect, only log errors
        if let Err(err) =
            create_schedules_for_event(ctx, &e.id, event_date, &e.message_schedule).await
        {
            error!("Unable to plan messages for event {}: {:?}", e.id, err);
        }
    }
}

pub struct RescheduleOnEventUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventUseCase> for RescheduleOnEventUpdated {
    async fn notify(&self, updated: &UpdatedEvent, ctx: &RsvpContext) {
        let e = &updated.event;
        let event_date = match e.date {
            Some(date) if updated.schedule_changed => date,
            _ => return,
        };

        // Sideeffect, only log errors
        if let Err(err) =
            update_schedules_on_date_change(ctx, &e.id, event_date, &e.message_schedule).await
        {
            error!("Unable to replan messages for event {}: {:?}", e.id, err);
        }
    }
}
