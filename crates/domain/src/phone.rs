use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

const COUNTRY_CODE: &str = "972";
/// Number of trailing digits used when stored and received numbers disagree on format
const SUFFIX_LEN: usize = 9;
/// E.164 allows at most 15 digits
const MAX_DIGITS: usize = 15;
/// Country code plus the shortest domestic number
const MIN_DIGITS: usize = 10;

/// A phone number in canonical international digit form, e.g. `972501234567`.
///
/// Guests are keyed by this form at write time so that inbound provider
/// webhooks (which use various formats) can be matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

#[derive(Error, Debug, PartialEq)]
pub enum InvalidPhoneNumber {
    #[error("Phone number `{0}` contains no digits")]
    Empty(String),
    #[error("Phone number `{0}` has an invalid length")]
    InvalidLength(String),
}

impl PhoneNumber {
    /// Normalizes local (`0501234567`), international (`972501234567`)
    /// and `+` prefixed numbers into the canonical form
    pub fn parse(raw: &str) -> Result<Self, InvalidPhoneNumber> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(InvalidPhoneNumber::Empty(raw.to_string()));
        }

        let canonical = if digits.starts_with(COUNTRY_CODE) {
            digits
        } else if let Some(local) = digits.strip_prefix('0') {
            format!("{}{}", COUNTRY_CODE, local)
        } else {
            format!("{}{}", COUNTRY_CODE, digits)
        };

        if canonical.len() < MIN_DIGITS || canonical.len() > MAX_DIGITS {
            return Err(InvalidPhoneNumber::InvalidLength(raw.to_string()));
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last digits of the number, shared by every format of it
    pub fn suffix(&self) -> &str {
        let start = self.0.len().saturating_sub(SUFFIX_LEN);
        &self.0[start..]
    }

    /// Domestic format with a leading zero, e.g. `0501234567`
    pub fn local_format(&self) -> String {
        match self.0.strip_prefix(COUNTRY_CODE) {
            Some(local) => format!("0{}", local),
            None => self.0.clone(),
        }
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = InvalidPhoneNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = InvalidPhoneNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
