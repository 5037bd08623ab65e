use crate::delivery::{DeliveryChannel, EventSummary};
use crate::shared::entity::{Entity, ID};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// The maximum number of reminder offsets a single `Event` can have
const MAX_SCHEDULE_OFFSETS: usize = 10;
/// Reminders can not be planned further away than this from the `Event`
const MAX_DAYS_BEFORE: u32 = 365;

/// An `Event` is the occasion that `Guest`s are invited to, e.g. a wedding.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: ID,
    /// The user account owning this `Event`
    pub owner_id: ID,
    pub title: String,
    /// The date of the `Event`. Nothing is scheduled before this is known.
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub additional_info: Option<String>,
    /// Invitation artwork attached to WhatsApp templates
    pub image_url: Option<String>,
    pub package: PackageKind,
    pub message_schedule: MessageSchedulePolicy,
    pub status: EventStatus,
    pub created: i64,
    pub updated: i64,
}

impl Event {
    pub fn new(owner_id: ID, title: String, created: i64) -> Self {
        Self {
            id: Default::default(),
            owner_id,
            title,
            date: None,
            time: None,
            location: None,
            additional_info: None,
            image_url: None,
            package: Default::default(),
            message_schedule: Default::default(),
            status: EventStatus::Active,
            created,
            updated: created,
        }
    }

    /// Only the SMS package sends over SMS, every other package uses WhatsApp
    pub fn delivery_channel(&self) -> DeliveryChannel {
        match self.package {
            PackageKind::SmsOnly => DeliveryChannel::Sms,
            _ => DeliveryChannel::WhatsApp,
        }
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            title: self.title.clone(),
            date: self.date,
            time: self.time,
            location: self.location.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Active,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Error, Debug)]
#[error("Unknown value: {0}")]
pub struct UnknownVariantError(pub String);

impl FromStr for EventStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(UnknownVariantError(s.to_string())),
        }
    }
}

/// The purchased package decides which channel invitations go out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageKind {
    Manual,
    SmsOnly,
    WhatsappOnly,
    Full,
}

impl Default for PackageKind {
    fn default() -> Self {
        Self::Manual
    }
}

impl PackageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::SmsOnly => "sms_only",
            Self::WhatsappOnly => "whatsapp_only",
            Self::Full => "full",
        }
    }
}

impl FromStr for PackageKind {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "sms_only" => Ok(Self::SmsOnly),
            "whatsapp_only" => Ok(Self::WhatsappOnly),
            "full" => Ok(Self::Full),
            _ => Err(UnknownVariantError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Default,
    Custom,
}

/// Decides at which days before the `Event` messages are sent out.
/// The first offset is the invitation, the following ones are reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSchedulePolicy {
    pub kind: ScheduleKind,
    pub days_before: Vec<u32>,
}

impl Default for MessageSchedulePolicy {
    fn default() -> Self {
        Self {
            kind: ScheduleKind::Default,
            days_before: vec![21, 14, 7],
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidSchedulePolicy {
    #[error("At most {0} reminder offsets are allowed")]
    TooManyOffsets(usize),
    #[error("Offset of {0} days is more than the allowed {1} days")]
    OffsetTooLarge(u32, u32),
    #[error("Offset of {0} days is given more than once")]
    DuplicateOffset(u32),
}

impl MessageSchedulePolicy {
    pub fn custom(days_before: Vec<u32>) -> Self {
        Self {
            kind: ScheduleKind::Custom,
            days_before,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidSchedulePolicy> {
        if self.days_before.len() > MAX_SCHEDULE_OFFSETS {
            return Err(InvalidSchedulePolicy::TooManyOffsets(MAX_SCHEDULE_OFFSETS));
        }
        if let Some(days) = self.days_before.iter().find(|d| **d > MAX_DAYS_BEFORE) {
            return Err(InvalidSchedulePolicy::OffsetTooLarge(*days, MAX_DAYS_BEFORE));
        }
        let mut seen = HashSet::new();
        if let Some(days) = self.days_before.iter().find(|d| !seen.insert(**d)) {
            return Err(InvalidSchedulePolicy::DuplicateOffset(*days));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_sms_package_uses_sms() {
        let mut event = Event::new(ID::default(), "Wedding".into(), 0);
        for package in &[
            PackageKind::Manual,
            PackageKind::WhatsappOnly,
            PackageKind::Full,
        ] {
            event.package = *package;
            assert_eq!(event.delivery_channel(), DeliveryChannel::WhatsApp);
        }
        event.package = PackageKind::SmsOnly;
        assert_eq!(event.delivery_channel(), DeliveryChannel::Sms);
    }

    #[test]
    fn default_policy_is_three_weeks_two_weeks_one_week() {
        let policy = MessageSchedulePolicy::default();
        assert_eq!(policy.kind, ScheduleKind::Default);
        assert_eq!(policy.days_before, vec![21, 14, 7]);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_policies() {
        assert_eq!(
            MessageSchedulePolicy::custom(vec![400]).validate(),
            Err(InvalidSchedulePolicy::OffsetTooLarge(400, MAX_DAYS_BEFORE))
        );
        assert_eq!(
            MessageSchedulePolicy::custom(vec![7, 3, 7]).validate(),
            Err(InvalidSchedulePolicy::DuplicateOffset(7))
        );
        assert_eq!(
            MessageSchedulePolicy::custom((1..=11).collect()).validate(),
            Err(InvalidSchedulePolicy::TooManyOffsets(MAX_SCHEDULE_OFFSETS))
        );
        assert!(MessageSchedulePolicy::custom(vec![]).validate().is_ok());
    }

    #[test]
    fn parses_stored_variants() {
        assert_eq!("sms_only".parse::<PackageKind>().unwrap(), PackageKind::SmsOnly);
        assert_eq!(
            "cancelled".parse::<EventStatus>().unwrap(),
            EventStatus::Cancelled
        );
        assert!("archived".parse::<EventStatus>().is_err());
    }
}
