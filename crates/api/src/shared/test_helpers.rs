use chrono::NaiveDate;
use rsvp_scheduler_domain::{Event, Guest, PackageKind, PhoneNumber, ID};
use rsvp_scheduler_infra::{delivery::InMemoryDeliveryProvider, ISys, RsvpContext};
use std::sync::Arc;

/// Clock pinned to a fixed point in time
pub struct StaticTimeSys {
    pub now: i64,
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now
    }
}

pub struct TestContext {
    pub ctx: RsvpContext,
    pub whatsapp: Arc<InMemoryDeliveryProvider>,
    pub sms: Arc<InMemoryDeliveryProvider>,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory context where it is morning of `today` in the configured timezone
pub fn setup_at(today: NaiveDate) -> TestContext {
    let mut ctx = RsvpContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys {
        now: today
            .and_hms_opt(8, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis(),
    });
    let whatsapp = Arc::new(InMemoryDeliveryProvider::new());
    let sms = Arc::new(InMemoryDeliveryProvider::new());
    ctx.providers.whatsapp = whatsapp.clone();
    ctx.providers.sms = sms.clone();

    TestContext { ctx, whatsapp, sms }
}

pub async fn insert_event(
    ctx: &RsvpContext,
    event_date: Option<NaiveDate>,
    package: PackageKind,
) -> Event {
    let mut event = Event::new(ID::default(), "Noa & Eli".into(), 0);
    event.date = event_date;
    event.package = package;
    ctx.repos.events.insert(&event).await.unwrap();
    event
}

pub async fn insert_guest(ctx: &RsvpContext, event: &Event, name: &str, phone: &str) -> Guest {
    let guest = Guest::new(
        event.id.clone(),
        name.into(),
        PhoneNumber::parse(phone).unwrap(),
        0,
    );
    ctx.repos.guests.insert(&guest).await.unwrap();
    guest
}
