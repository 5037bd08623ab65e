use chrono::{NaiveDate, NaiveTime};
use rsvp_scheduler_domain::{Event, EventStatus, MessageSchedulePolicy, PackageKind, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: ID,
    pub owner_id: ID,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub additional_info: Option<String>,
    pub image_url: Option<String>,
    pub package: PackageKind,
    pub message_schedule: MessageSchedulePolicy,
    pub status: EventStatus,
    pub created: i64,
    pub updated: i64,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id,
            owner_id: event.owner_id,
            title: event.title,
            date: event.date,
            time: event.time,
            location: event.location,
            additional_info: event.additional_info,
            image_url: event.image_url,
            package: event.package,
            message_schedule: event.message_schedule,
            status: event.status,
            created: event.created,
            updated: event.updated,
        }
    }
}
