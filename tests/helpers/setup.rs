use chrono::NaiveDate;
use rsvp_scheduler_api::Application;
use rsvp_scheduler_infra::{delivery::InMemoryDeliveryProvider, Config, ISys, RsvpContext};
use rsvp_scheduler_sdk::RsvpSDK;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock the tests can move forward between requests
pub struct TestClock {
    now: AtomicI64,
}

impl TestClock {
    fn new(today: NaiveDate) -> Self {
        let clock = Self {
            now: AtomicI64::new(0),
        };
        clock.set_today(today);
        clock
    }

    /// Morning of the given day in the configured timezone
    pub fn set_today(&self, today: NaiveDate) {
        let millis = today
            .and_hms_opt(8, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl ISys for TestClock {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub config: Config,
    pub address: String,
    pub clock: Arc<TestClock>,
    pub whatsapp: Arc<InMemoryDeliveryProvider>,
    pub sms: Arc<InMemoryDeliveryProvider>,
}

impl TestApp {
    /// SDK authenticated as the external dispatch trigger
    pub fn cron_sdk(&self) -> RsvpSDK {
        RsvpSDK::with_cron_secret(self.address.clone(), self.config.cron_secret.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Launch the application as a background task
pub async fn spawn_app(today: NaiveDate) -> (TestApp, RsvpSDK, String) {
    let mut ctx = RsvpContext::create_inmemory();
    ctx.config.port = 0; // Random port

    let clock = Arc::new(TestClock::new(today));
    let whatsapp = Arc::new(InMemoryDeliveryProvider::new());
    let sms = Arc::new(InMemoryDeliveryProvider::new());
    ctx.sys = clock.clone();
    ctx.providers.whatsapp = whatsapp.clone();
    ctx.providers.sms = sms.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = RsvpSDK::new(address.clone(), config.api_secret.clone());
    let app = TestApp {
        config,
        address: address.clone(),
        clock,
        whatsapp,
        sms,
    };
    (app, sdk, address)
}
