use chrono::{NaiveDate, NaiveTime};
use rsvp_scheduler_domain::{Event, Guest, GuestStatus, ID};
use serde::{Deserialize, Serialize};

/// What the public RSVP page shows to a `Guest`
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpDetailsResponse {
    pub guest: RsvpGuestDTO,
    pub event: RsvpEventDTO,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpGuestDTO {
    pub id: ID,
    pub name: String,
    pub status: GuestStatus,
    pub attending_count: u32,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpEventDTO {
    pub id: ID,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl RsvpDetailsResponse {
    pub fn new(guest: Guest, event: Event) -> Self {
        Self {
            guest: RsvpGuestDTO {
                id: guest.id,
                name: guest.name,
                status: guest.status,
                attending_count: guest.attending_count,
            },
            event: RsvpEventDTO {
                id: event.id,
                title: event.title,
                date: event.date,
                time: event.time,
                location: event.location,
                image_url: event.image_url,
            },
        }
    }
}

#[derive(Deserialize, Serialize)]
pub struct RsvpPathParams {
    pub guest_id: ID,
}

#[derive(Deserialize, Serialize)]
pub struct RsvpQueryParams {
    pub token: String,
}

pub mod get_rsvp_details {
    use super::*;

    pub type PathParams = RsvpPathParams;
    pub type QueryParams = RsvpQueryParams;
    pub type APIResponse = RsvpDetailsResponse;
}

pub mod submit_rsvp {
    use super::*;

    pub type PathParams = RsvpPathParams;
    pub type QueryParams = RsvpQueryParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Either `confirmed` or `declined`
        pub status: GuestStatus,
        #[serde(default)]
        pub attending_count: u32,
    }

    pub type APIResponse = RsvpDetailsResponse;
}
