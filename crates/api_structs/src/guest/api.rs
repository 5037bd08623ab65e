use crate::dtos::{GuestDTO, NewGuestDTO};
use rsvp_scheduler_domain::{Guest, GuestStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    pub guest: GuestDTO,
}

impl GuestResponse {
    pub fn new(guest: Guest) -> Self {
        Self {
            guest: GuestDTO::new(guest),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestsResponse {
    pub guests: Vec<GuestDTO>,
}

impl GuestsResponse {
    pub fn new(guests: Vec<Guest>) -> Self {
        Self {
            guests: guests.into_iter().map(GuestDTO::new).collect(),
        }
    }
}

pub mod add_guest {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type RequestBody = NewGuestDTO;

    pub type APIResponse = GuestResponse;
}

pub mod add_guests_bulk {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub guests: Vec<NewGuestDTO>,
    }

    pub type APIResponse = GuestsResponse;
}

pub mod get_event_guests {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = GuestsResponse;
}

pub mod update_guest {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub guest_id: ID,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub status: Option<GuestStatus>,
        pub attending_count: Option<u32>,
    }

    pub type APIResponse = GuestResponse;
}

pub mod delete_guest {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub guest_id: ID,
    }

    pub type APIResponse = GuestResponse;
}
