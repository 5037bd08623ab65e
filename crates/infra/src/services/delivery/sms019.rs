use super::{env_or, required_env, IDeliveryProvider, PROVIDER_TIMEOUT};
use reqwest::Client;
use rsvp_scheduler_domain::{
    format_date, DeliveryError, DeliveryReceipt, EventSummary, PhoneNumber,
};
use serde::{Deserialize, Serialize};
use tracing::error;

const SMS019_API_URL: &str = "https://019sms.co.il/api";
/// Sender ids are alphanumeric and at most 11 characters
const MAX_SOURCE_LEN: usize = 11;

#[derive(Debug, Clone)]
pub struct Sms019Config {
    pub username: String,
    pub api_token: String,
    pub source: String,
}

impl Sms019Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            username: required_env("SMS019_USERNAME")?,
            api_token: required_env("SMS019_API_TOKEN")?,
            source: env_or("SMS019_SOURCE", "invite2you"),
        })
    }
}

/// Plain SMS through the 019SMS gateway
pub struct Sms019Provider {
    client: Client,
    config: Sms019Config,
}

#[derive(Debug, Serialize)]
struct SmsRequest<'a> {
    sms: SmsBody<'a>,
}

#[derive(Debug, Serialize)]
struct SmsBody<'a> {
    user: SmsUser<'a>,
    source: String,
    destinations: SmsDestinations,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct SmsUser<'a> {
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct SmsDestinations {
    phone: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SmsResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    shipment_id: Option<serde_json::Value>,
}

impl Sms019Provider {
    pub fn new(config: Sms019Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn request<'a>(&'a self, phone: &PhoneNumber, text: &'a str) -> SmsRequest<'a> {
        SmsRequest {
            sms: SmsBody {
                user: SmsUser {
                    username: &self.config.username,
                },
                source: self.config.source.chars().take(MAX_SOURCE_LEN).collect(),
                // The gateway expects the domestic format
                destinations: SmsDestinations {
                    phone: vec![phone.local_format()],
                },
                message: text,
            },
        }
    }
}

/// Status 0 is the only success, any other value carries an error message
fn accept_response(res: SmsResponse) -> Result<DeliveryReceipt, DeliveryError> {
    if res.status != 0 {
        return Err(DeliveryError::Rejected(format!(
            "API error (status {}): {}",
            res.status,
            res.message.unwrap_or_else(|| "Unknown API error".into())
        )));
    }
    Ok(DeliveryReceipt {
        provider_message_id: res.shipment_id.map(|id| match id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        }),
    })
}

fn when(event: &EventSummary) -> String {
    match &event.date {
        Some(date) => format!(" on {}", format_date(date)),
        None => String::new(),
    }
}

#[async_trait::async_trait]
impl IDeliveryProvider for Sms019Provider {
    async fn send_invitation(
        &self,
        phone: &PhoneNumber,
        event: &EventSummary,
        guest_name: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let text = format!(
            "Hello {}, you are invited to {}{}. Reply 1 to confirm or 0 to decline.",
            guest_name.trim(),
            event.title.trim(),
            when(event)
        );
        self.send_free_text(phone, &text).await
    }

    async fn send_reminder(
        &self,
        phone: &PhoneNumber,
        event: &EventSummary,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let text = format!(
            "Reminder: {}{}. Reply 1 to confirm or 0 to decline.",
            event.title.trim(),
            when(event)
        );
        self.send_free_text(phone, &text).await
    }

    async fn send_free_text(
        &self,
        phone: &PhoneNumber,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let res = self
            .client
            .post(SMS019_API_URL)
            .bearer_auth(&self.config.api_token)
            .json(&self.request(phone, text))
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] 019SMS API error. Error message: {:?}", e);
                DeliveryError::Transport(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected(format!(
                "API returned HTTP status {}",
                status
            )));
        }

        let parsed = res.json::<SmsResponse>().await.map_err(|e| {
            error!(
                "[Unexpected Response] 019SMS API error. Error message: {:?}",
                e
            );
            DeliveryError::Rejected("Failed to parse API response".into())
        })?;
        accept_response(parsed)
    }
}
