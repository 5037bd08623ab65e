use crate::phone::PhoneNumber;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::event::UnknownVariantError;

/// An invitee of an `Event`
#[derive(Debug, Clone)]
pub struct Guest {
    pub id: ID,
    pub event_id: ID,
    pub name: String,
    /// Primary channel key, always stored in canonical form
    pub phone: PhoneNumber,
    pub email: Option<String>,
    pub status: GuestStatus,
    /// Only meaningful once the `Guest` has confirmed
    pub attending_count: u32,
    pub conversation_state: ConversationState,
    /// Incremented on every write, used for optimistic concurrency control
    pub version: i64,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestStatus {
    Pending,
    Tentative,
    Confirmed,
    Declined,
    Maybe,
}

impl GuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Tentative => "tentative",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
            Self::Maybe => "maybe",
        }
    }

    /// The guest gave a final answer and should not be reminded anymore
    pub fn has_responded(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Declined)
    }
}

impl FromStr for GuestStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "tentative" => Ok(Self::Tentative),
            "confirmed" => Ok(Self::Confirmed),
            "declined" => Ok(Self::Declined),
            "maybe" => Ok(Self::Maybe),
            _ => Err(UnknownVariantError(s.to_string())),
        }
    }
}

/// Progress of a `Guest` through the inbound reply conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    None,
    WaitingForRsvp,
    WaitingForGuestsCount,
    Done,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::WaitingForRsvp => "waiting_for_rsvp",
            Self::WaitingForGuestsCount => "waiting_for_guests_count",
            Self::Done => "done",
        }
    }

    /// The conversation still expects input from the `Guest`
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Done)
    }
}

impl FromStr for ConversationState {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "waiting_for_rsvp" => Ok(Self::WaitingForRsvp),
            "waiting_for_guests_count" => Ok(Self::WaitingForGuestsCount),
            "done" => Ok(Self::Done),
            _ => Err(UnknownVariantError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidGuestStatus {
    #[error("A confirmed guest must attend with at least one person")]
    MissingAttendingCount,
}

impl Guest {
    pub fn new(event_id: ID, name: String, phone: PhoneNumber, created: i64) -> Self {
        Self {
            id: Default::default(),
            event_id,
            name,
            phone,
            email: None,
            status: GuestStatus::Pending,
            attending_count: 0,
            conversation_state: ConversationState::None,
            version: 0,
            created,
            updated: created,
        }
    }

    pub fn should_receive_reminder(&self) -> bool {
        !self.status.has_responded()
    }

    /// Marks that the `Guest` has been asked to RSVP. Returns whether anything changed.
    pub fn await_rsvp(&mut self) -> bool {
        if self.conversation_state == ConversationState::None {
            self.conversation_state = ConversationState::WaitingForRsvp;
            true
        } else {
            false
        }
    }

    /// Sets status and head count while keeping the count consistent with the status
    pub fn set_status(&mut self, status: GuestStatus, attending_count: Option<u32>) {
        self.status = status;
        match status {
            GuestStatus::Pending | GuestStatus::Declined => self.attending_count = 0,
            _ => {
                if let Some(count) = attending_count {
                    self.attending_count = count;
                }
            }
        }
    }

    /// Explicit override by staff or through the RSVP web page. Bypasses the
    /// conversation flow and closes it when the answer is final.
    pub fn override_status(
        &mut self,
        status: GuestStatus,
        attending_count: Option<u32>,
    ) -> Result<(), InvalidGuestStatus> {
        if status == GuestStatus::Confirmed && attending_count.unwrap_or(self.attending_count) == 0
        {
            return Err(InvalidGuestStatus::MissingAttendingCount);
        }
        self.set_status(status, attending_count);
        if status.has_responded() {
            self.conversation_state = ConversationState::Done;
        }
        Ok(())
    }
}

impl Entity for Guest {
    fn id(&self) -> &ID {
        &self.id
    }
}
