use crate::{APIResponse, BaseClient, MessageSchedulePolicy, ID};
use rsvp_scheduler_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SchedulerClient {
    base: Arc<BaseClient>,
}

pub struct ScheduleInput {
    pub event_id: ID,
    /// `YYYY-MM-DD`
    pub event_date: String,
    pub message_schedule: Option<MessageSchedulePolicy>,
}

impl ScheduleInput {
    fn body(self) -> ScheduleRequestBody {
        ScheduleRequestBody {
            event_date: self.event_date,
            message_schedule: self.message_schedule,
        }
    }
}

impl SchedulerClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Runs the daily dispatch job now
    pub async fn process_due(&self) -> APIResponse<process_due_messages::APIResponse> {
        self.base
            .post((), "scheduler/process".into(), StatusCode::OK)
            .await
    }

    pub async fn get_due(&self) -> APIResponse<get_due_messages::APIResponse> {
        self.base
            .get("scheduler/due".into(), StatusCode::OK)
            .await
    }

    pub async fn create_schedules(
        &self,
        input: ScheduleInput,
    ) -> APIResponse<create_schedules::APIResponse> {
        let path = format!("scheduler/events/{}/schedules", input.event_id);
        self.base
            .post(input.body(), path, StatusCode::CREATED)
            .await
    }

    pub async fn update_schedules(
        &self,
        input: ScheduleInput,
    ) -> APIResponse<update_schedules::APIResponse> {
        let path = format!("scheduler/events/{}/schedules", input.event_id);
        self.base.put(input.body(), path, StatusCode::OK).await
    }

    pub async fn get_schedules(
        &self,
        event_id: ID,
    ) -> APIResponse<get_event_schedules::APIResponse> {
        self.base
            .get(
                format!("scheduler/events/{}/schedules", event_id),
                StatusCode::OK,
            )
            .await
    }
}
