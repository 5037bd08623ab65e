use chrono::{NaiveDate, Utc};
use rsvp_scheduler_domain::{date_in_timezone, Tz};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;

    /// The current date in the given timezone
    fn today(&self, tz: &Tz) -> NaiveDate {
        date_in_timezone(self.get_timestamp_millis(), tz)
    }
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
