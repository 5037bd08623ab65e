use crate::{APIResponse, BaseClient, GuestStatus, NewGuest, ID};
use rsvp_scheduler_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct GuestClient {
    base: Arc<BaseClient>,
}

#[derive(Default)]
pub struct UpdateGuestInput {
    pub guest_id: ID,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<GuestStatus>,
    pub attending_count: Option<u32>,
}

impl GuestClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn add(&self, event_id: ID, guest: NewGuest) -> APIResponse<add_guest::APIResponse> {
        self.base
            .post(
                guest,
                format!("events/{}/guests", event_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn add_bulk(
        &self,
        event_id: ID,
        guests: Vec<NewGuest>,
    ) -> APIResponse<add_guests_bulk::APIResponse> {
        let body = add_guests_bulk::RequestBody { guests };
        self.base
            .post(
                body,
                format!("events/{}/guests/bulk", event_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get_by_event(&self, event_id: ID) -> APIResponse<get_event_guests::APIResponse> {
        self.base
            .get(format!("events/{}/guests", event_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateGuestInput) -> APIResponse<update_guest::APIResponse> {
        let body = update_guest::RequestBody {
            name: input.name,
            phone: input.phone,
            email: input.email,
            status: input.status,
            attending_count: input.attending_count,
        };
        self.base
            .put(body, format!("guests/{}", input.guest_id), StatusCode::OK)
            .await
    }

    pub async fn delete(&self, guest_id: ID) -> APIResponse<delete_guest::APIResponse> {
        self.base
            .delete(format!("guests/{}", guest_id), StatusCode::OK)
            .await
    }
}
