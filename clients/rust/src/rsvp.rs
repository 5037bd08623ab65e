use crate::{APIResponse, BaseClient, GuestStatus, ID};
use rsvp_scheduler_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct RsvpClient {
    base: Arc<BaseClient>,
}

pub struct SubmitRsvpInput {
    pub guest_id: ID,
    pub token: String,
    pub status: GuestStatus,
    pub attending_count: u32,
}

impl RsvpClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get(&self, guest_id: ID, token: &str) -> APIResponse<get_rsvp_details::APIResponse> {
        self.base
            .get_with_query(
                &[("token", token)],
                format!("rsvp/{}", guest_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn submit(&self, input: SubmitRsvpInput) -> APIResponse<submit_rsvp::APIResponse> {
        let body = submit_rsvp::RequestBody {
            status: input.status,
            attending_count: input.attending_count,
        };
        let path = format!("rsvp/{}?token={}", input.guest_id, input.token);
        self.base.post(body, path, StatusCode::OK).await
    }
}
