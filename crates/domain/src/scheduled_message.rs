use crate::delivery::MessageKind;
use crate::event::{MessageSchedulePolicy, UnknownVariantError};
use crate::shared::entity::{Entity, ID};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How long a dispatch run may hold a `processing` claim. Older claims belong
/// to a run that died or lost its database, and the message is due again.
pub const PROCESSING_LEASE_MILLIS: i64 = 6 * 60 * 60 * 1000;

/// One planned batch send of an `Event`, e.g. "the reminder 14 days before".
///
/// There is at most one `ScheduledMessage` per (event, ordinal).
#[derive(Debug, Clone)]
pub struct ScheduledMessage {
    pub id: ID,
    pub event_id: ID,
    /// 1-based position in the `Event`s message schedule
    pub ordinal: u32,
    pub days_before: u32,
    pub due_date: NaiveDate,
    pub status: ScheduledMessageStatus,
    pub sent_at: Option<i64>,
    pub sent_count: u32,
    pub failed_count: u32,
    pub error_message: Option<String>,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledMessageStatus {
    Pending,
    /// Claimed by a dispatch run
    Processing,
    Sent,
    Failed,
    Partial,
    Completed,
}

impl ScheduledMessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Partial => "partial",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for ScheduledMessageStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "partial" => Ok(Self::Partial),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownVariantError(s.to_string())),
        }
    }
}

/// Aggregated result of sending one `ScheduledMessage` to its recipients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub sent: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

impl BatchResult {
    pub fn record_success(&mut self) {
        self.sent += 1;
    }

    pub fn record_failure(&mut self, recipient: &str, error: impl std::fmt::Display) {
        self.failed += 1;
        self.errors.push(format!("{}: {}", recipient, error));
    }

    pub fn status(&self) -> ScheduledMessageStatus {
        if self.failed == 0 {
            ScheduledMessageStatus::Completed
        } else if self.sent == 0 {
            ScheduledMessageStatus::Failed
        } else {
            ScheduledMessageStatus::Partial
        }
    }

    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join("; "))
        }
    }
}

impl ScheduledMessage {
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_ordinal(self.ordinal)
    }

    pub fn is_pending(&self) -> bool {
        self.status == ScheduledMessageStatus::Pending
    }

    /// Pending, or claimed by a run whose lease expired before `stale_before`
    pub fn is_claimable(&self, stale_before: i64) -> bool {
        self.is_pending()
            || (self.status == ScheduledMessageStatus::Processing && self.updated < stale_before)
    }

    pub fn finish(&mut self, result: &BatchResult, now: i64) {
        self.status = result.status();
        self.sent_count = result.sent;
        self.failed_count = result.failed;
        self.error_message = result.error_summary();
        self.sent_at = Some(now);
        self.updated = now;
    }

    /// There was nobody to send to, which is a valid outcome
    pub fn finish_without_recipients(&mut self, note: &str, now: i64) {
        self.status = ScheduledMessageStatus::Completed;
        self.sent_count = 0;
        self.failed_count = 0;
        self.error_message = Some(note.to_string());
        self.sent_at = Some(now);
        self.updated = now;
    }
}

impl Entity for ScheduledMessage {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Computes the `ScheduledMessage`s of an `Event` happening at `event_date`.
///
/// Offsets whose due date is already in the past relative to `today` are skipped.
/// The ordinals follow the position in the policy, also for skipped offsets, so that
/// re-planning never changes what an ordinal means.
pub fn plan_scheduled_messages(
    event_id: &ID,
    event_date: NaiveDate,
    policy: &MessageSchedulePolicy,
    today: NaiveDate,
    now: i64,
) -> Vec<ScheduledMessage> {
    policy
        .days_before
        .iter()
        .enumerate()
        .map(|(idx, days)| (idx as u32 + 1, *days, event_date - Duration::days(*days as i64)))
        .filter(|(_, _, due_date)| *due_date >= today)
        .map(|(ordinal, days_before, due_date)| ScheduledMessage {
            id: Default::default(),
            event_id: event_id.clone(),
            ordinal,
            days_before,
            due_date,
            status: ScheduledMessageStatus::Pending,
            sent_at: None,
            sent_count: 0,
            failed_count: 0,
            error_message: None,
            created: now,
            updated: now,
        })
        .collect()
}
