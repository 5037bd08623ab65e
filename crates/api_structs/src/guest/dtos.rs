use rsvp_scheduler_domain::{ConversationState, Guest, GuestStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GuestDTO {
    pub id: ID,
    pub event_id: ID,
    pub name: String,
    /// Canonical international digits, e.g. `972501234567`
    pub phone: String,
    pub email: Option<String>,
    pub status: GuestStatus,
    pub attending_count: u32,
    pub conversation_state: ConversationState,
    pub created: i64,
    pub updated: i64,
}

impl GuestDTO {
    pub fn new(guest: Guest) -> Self {
        Self {
            id: guest.id,
            event_id: guest.event_id,
            name: guest.name,
            phone: guest.phone.into(),
            email: guest.email,
            status: guest.status,
            attending_count: guest.attending_count,
            conversation_state: guest.conversation_state,
            created: guest.created,
            updated: guest.updated,
        }
    }
}

/// A guest as entered by a user, the phone may be in any common format
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestDTO {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}
