mod date;
mod delivery;
mod event;
mod guest;
mod phone;
mod rsvp;
mod rsvp_token;
mod scheduled_message;
mod shared;

pub use date::{date_in_timezone, format_date, format_time, parse_date, parse_time};
pub use delivery::{DeliveryChannel, DeliveryError, DeliveryReceipt, EventSummary, MessageKind};
pub use event::{
    Event, EventStatus, InvalidSchedulePolicy, MessageSchedulePolicy, PackageKind, ScheduleKind,
    UnknownVariantError,
};
pub use guest::{ConversationState, Guest, GuestStatus, InvalidGuestStatus};
pub use phone::{InvalidPhoneNumber, PhoneNumber};
pub use rsvp::{InboundReply, RsvpAnswer, RsvpOutcome};
pub use rsvp_token::{InvalidRsvpToken, RsvpToken, MAX_RSVP_TOKEN_TTL_DAYS};
pub use scheduled_message::{
    plan_scheduled_messages, BatchResult, ScheduledMessage, ScheduledMessageStatus,
    PROCESSING_LEASE_MILLIS,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use chrono_tz::Tz;
