use crate::shared::usecase::{Subscriber, UseCase};
use rsvp_scheduler_domain::{
    ConversationState, DeliveryChannel, EventStatus, Guest, InboundReply, PhoneNumber,
    RsvpOutcome,
};
use rsvp_scheduler_infra::RsvpContext;
use tracing::{info, warn};

/// Feeds a reply received over `channel` to the conversation of the guest
/// owning the sending phone number.
#[derive(Debug)]
pub struct HandleInboundReplyUseCase {
    pub phone: String,
    pub reply: InboundReply,
    pub channel: DeliveryChannel,
}

#[derive(Debug)]
pub struct HandledReply {
    pub guest: Guest,
    pub outcome: RsvpOutcome,
    pub channel: DeliveryChannel,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidPhone(String),
    UnknownSender(String),
    /// The guest kept changing while the reply was applied
    Conflict,
    StorageError,
}

impl UseCaseError {
    pub fn describe(&self) -> String {
        match self {
            Self::InvalidPhone(phone) => format!("Invalid sender phone: {}", phone),
            Self::UnknownSender(phone) => format!("No guest found for {}", phone),
            Self::Conflict => "Guest was modified concurrently".into(),
            Self::StorageError => "Reply could not be stored".into(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for HandleInboundReplyUseCase {
    type Response = HandledReply;

    type Error = UseCaseError;

    const NAME: &'static str = "HandleInboundReply";

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
        let phone = PhoneNumber::parse(&self.phone)
            .map_err(|_| UseCaseError::InvalidPhone(self.phone.clone()))?;
        let mut guest = find_guest(ctx, &phone)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::UnknownSender(phone.to_string()))?;

        let mut outcome = guest.apply_reply(&self.reply);
        if outcome.changes_guest() {
            guest.updated = ctx.sys.get_timestamp_millis();
            let stored = ctx
                .repos
                .guests
                .save_versioned(&guest)
                .await
                .map_err(|_| UseCaseError::StorageError)?;

            if !stored {
                // Evaluate the reply once more against what is stored now
                let mut fresh = ctx
                    .repos
                    .guests
                    .find(&guest.id)
                    .await
                    .ok_or_else(|| UseCaseError::UnknownSender(phone.to_string()))?;
                outcome = fresh.apply_reply(&self.reply);
                if outcome.changes_guest() {
                    fresh.updated = ctx.sys.get_timestamp_millis();
                    let stored = ctx
                        .repos
                        .guests
                        .save_versioned(&fresh)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?;
                    if !stored {
                        return Err(UseCaseError::Conflict);
                    }
                }
                guest = fresh;
            }
        }

        match outcome {
            RsvpOutcome::Ignored => info!(
                "Ignoring reply of guest {} whose conversation is over",
                guest.id
            ),
            RsvpOutcome::Unrecognized | RsvpOutcome::InvalidGuestsCount => warn!(
                "Reply {:?} of guest {} did not match the conversation state {:?}",
                self.reply, guest.id, guest.conversation_state
            ),
            _ => info!("Guest {} replied: {:?}", guest.id, outcome),
        }

        Ok(HandledReply {
            guest,
            outcome,
            channel: self.channel,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(AnswerGuestOnReply)]
    }
}

/// Exact match on the canonical number first, then on the last digits for
/// numbers stored before they were normalized.
///
/// A number can belong to guests of several events. Guests of active events
/// win, then the conversation furthest along (a guest asked for a head count
/// before one asked to RSVP before one never asked), then the most recently
/// updated guest.
async fn find_guest(ctx: &RsvpContext, phone: &PhoneNumber) -> anyhow::Result<Option<Guest>> {
    let mut candidates = ctx.repos.guests.find_by_phone(phone).await?;
    if candidates.is_empty() {
        candidates = ctx.repos.guests.find_by_phone_suffix(phone.suffix()).await?;
    }

    let mut ranked = Vec::with_capacity(candidates.len());
    for guest in candidates {
        let event_active = ctx
            .repos
            .events
            .find(&guest.event_id)
            .await
            .map(|e| e.status == EventStatus::Active)
            .unwrap_or(false);
        ranked.push(((event_active, conversation_rank(&guest)), guest));
    }

    // Candidates come most recent first and `max_by_key` keeps the last maximum
    Ok(ranked
        .into_iter()
        .rev()
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, guest)| guest))
}

fn conversation_rank(guest: &Guest) -> u8 {
    match guest.conversation_state {
        ConversationState::WaitingForGuestsCount => 3,
        ConversationState::WaitingForRsvp => 2,
        ConversationState::None if !guest.status.has_responded() => 1,
        _ => 0,
    }
}

pub struct AnswerGuestOnReply;

#[async_trait::async_trait(?Send)]
impl Subscriber<HandleInboundReplyUseCase> for AnswerGuestOnReply {
    async fn notify(&self, handled: &HandledReply, ctx: &RsvpContext) {
        let text = match handled.outcome.reply_text() {
            Some(text) => text,
            None => return,
        };

        let provider = ctx.providers.for_channel(handled.channel);
        if let Err(e) = provider.send_free_text(&handled.guest.phone, &text).await {
            warn!(
                "Unable to answer guest {} over {:?}: {}",
                handled.guest.id, handled.channel, e
            );
        }
    }
}
