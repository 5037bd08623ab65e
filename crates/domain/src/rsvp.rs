//! The inbound reply conversation with a `Guest`.
//!
//! ```text
//! none / waiting_for_rsvp --confirm--> waiting_for_guests_count --N > 0--> done (confirmed)
//! none / waiting_for_rsvp --decline--> done (declined)
//! none / waiting_for_rsvp --maybe----> done (maybe)
//! ```
//!
//! Any reply received once the conversation is `done` is ignored, so replayed
//! webhooks never change a `Guest` twice.

use crate::guest::{ConversationState, Guest, GuestStatus};

/// A reply as received from a provider webhook
#[derive(Debug, Clone, PartialEq)]
pub enum InboundReply {
    /// Id of a quick reply button, e.g. `rsvp_yes`
    Button(String),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpAnswer {
    Confirm,
    Decline,
    Maybe,
}

const CONFIRM_KEYWORDS: [&str; 4] = ["1", "yes", "confirm", "כן"];
const DECLINE_KEYWORDS: [&str; 4] = ["0", "no", "decline", "לא"];
const MAYBE_KEYWORDS: [&str; 2] = ["maybe", "אולי"];

impl RsvpAnswer {
    pub fn parse(reply: &InboundReply) -> Option<Self> {
        match reply {
            InboundReply::Button(id) => match id.trim() {
                "rsvp_yes" => Some(Self::Confirm),
                "rsvp_no" => Some(Self::Decline),
                "rsvp_maybe" => Some(Self::Maybe),
                _ => None,
            },
            InboundReply::Text(text) => {
                let text = text.trim().to_lowercase();
                let text = text.as_str();
                if CONFIRM_KEYWORDS.contains(&text) {
                    Some(Self::Confirm)
                } else if DECLINE_KEYWORDS.contains(&text) {
                    Some(Self::Decline)
                } else if MAYBE_KEYWORDS.contains(&text) {
                    Some(Self::Maybe)
                } else {
                    None
                }
            }
        }
    }
}

/// Result of feeding one reply to the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpOutcome {
    /// Said yes, now asked how many people are coming
    AwaitingGuestsCount,
    Confirmed(u32),
    Declined,
    Maybe,
    /// Expected a positive head count but got something else
    InvalidGuestsCount,
    /// The reply does not match any transition of the current state
    Unrecognized,
    /// The conversation is already over
    Ignored,
}

impl RsvpOutcome {
    /// Whether the `Guest` was modified and has to be persisted
    pub fn changes_guest(&self) -> bool {
        matches!(
            self,
            Self::AwaitingGuestsCount | Self::Confirmed(_) | Self::Declined | Self::Maybe
        )
    }

    /// The message sent back to the `Guest`, if any
    pub fn reply_text(&self) -> Option<String> {
        let text = match self {
            Self::AwaitingGuestsCount => {
                "Wonderful! How many guests will be attending? Reply with a number, e.g. 2".into()
            }
            Self::Confirmed(count) => format!(
                "Thank you! We have registered {} attending. Looking forward to seeing you!",
                count
            ),
            Self::Declined => "Thank you for letting us know! Hope to see you another time.".into(),
            Self::Maybe => {
                "Thanks! We noted that you might come. Once you know, you can update your answer through your personal RSVP link."
                    .into()
            }
            Self::InvalidGuestsCount => {
                "Please send a valid number of attending guests (for example: 2)".into()
            }
            Self::Unrecognized => "Please reply 1 if you are coming or 0 if you are not".into(),
            Self::Ignored => return None,
        };
        Some(text)
    }
}

impl Guest {
    /// Advances the conversation with the given reply and updates the RSVP status
    pub fn apply_reply(&mut self, reply: &InboundReply) -> RsvpOutcome {
        match self.conversation_state {
            ConversationState::Done => RsvpOutcome::Ignored,
            ConversationState::WaitingForGuestsCount => match parse_guests_count(reply) {
                Some(count) => {
                    self.set_status(GuestStatus::Confirmed, Some(count));
                    self.conversation_state = ConversationState::Done;
                    RsvpOutcome::Confirmed(count)
                }
                None => RsvpOutcome::InvalidGuestsCount,
            },
            // Guests that never got a tracked invitation (e.g. answered an SMS)
            // are treated as if they were asked
            ConversationState::None | ConversationState::WaitingForRsvp => {
                match RsvpAnswer::parse(reply) {
                    Some(RsvpAnswer::Confirm) => {
                        self.conversation_state = ConversationState::WaitingForGuestsCount;
                        RsvpOutcome::AwaitingGuestsCount
                    }
                    Some(RsvpAnswer::Decline) => {
                        self.set_status(GuestStatus::Declined, None);
                        self.conversation_state = ConversationState::Done;
                        RsvpOutcome::Declined
                    }
                    Some(RsvpAnswer::Maybe) => {
                        self.set_status(GuestStatus::Maybe, None);
                        self.conversation_state = ConversationState::Done;
                        RsvpOutcome::Maybe
                    }
                    None => RsvpOutcome::Unrecognized,
                }
            }
        }
    }
}

fn parse_guests_count(reply: &InboundReply) -> Option<u32> {
    match reply {
        InboundReply::Text(text) => match text.trim().parse::<i64>() {
            Ok(count) if count > 0 => u32::try_from(count).ok(),
            _ => None,
        },
        InboundReply::Button(_) => None,
    }
}
