mod base;
mod event;
mod guest;
mod rsvp;
mod scheduler;
mod status;
mod webhook;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use event::EventClient;
pub use event::{CreateEventInput, UpdateEventInput};
use guest::GuestClient;
pub use guest::UpdateGuestInput;
use rsvp::RsvpClient;
pub use rsvp::SubmitRsvpInput;
use scheduler::SchedulerClient;
pub use scheduler::ScheduleInput;
use status::StatusClient;
use std::sync::Arc;
use webhook::WebhookClient;

pub use rsvp_scheduler_api_structs::dtos::*;
pub use rsvp_scheduler_domain::{
    ConversationState, EventStatus, GuestStatus, MessageKind, MessageSchedulePolicy, PackageKind,
    ScheduleKind, ScheduledMessageStatus, ID,
};

// Domain
pub use rsvp_scheduler_api_structs::dtos::EventDTO as Event;
pub use rsvp_scheduler_api_structs::dtos::GuestDTO as Guest;
pub use rsvp_scheduler_api_structs::dtos::NewGuestDTO as NewGuest;
pub use rsvp_scheduler_api_structs::dtos::ScheduledMessageDTO as ScheduledMessage;

/// RSVP Scheduler Server SDK
///
/// The SDK contains methods for interacting with the RSVP Scheduler server
/// API.
#[derive(Clone)]
pub struct RsvpSDK {
    pub event: EventClient,
    pub guest: GuestClient,
    pub rsvp: RsvpClient,
    pub scheduler: SchedulerClient,
    pub status: StatusClient,
    pub webhook: WebhookClient,
}

impl RsvpSDK {
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        Self::with_base(base)
    }

    /// Client for the external trigger of the daily dispatch job
    pub fn with_cron_secret<T: Into<String>>(address: String, cron_secret: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_cron_secret(cron_secret.into());
        Self::with_base(base)
    }

    fn with_base(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let event = EventClient::new(base.clone());
        let guest = GuestClient::new(base.clone());
        let rsvp = RsvpClient::new(base.clone());
        let scheduler = SchedulerClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let webhook = WebhookClient::new(base);

        Self {
            event,
            guest,
            rsvp,
            scheduler,
            status,
            webhook,
        }
    }
}
