use super::{env_or, required_env, IDeliveryProvider, PROVIDER_TIMEOUT};
use reqwest::Client;
use rsvp_scheduler_domain::{
    format_date, format_time, DeliveryError, DeliveryReceipt, EventSummary, PhoneNumber,
};
use serde::{Deserialize, Serialize};
use tracing::error;

const GUPSHUP_MESSAGE_URL: &str = "https://api.gupshup.io/wa/api/v1/msg";
const GUPSHUP_TEMPLATE_URL: &str = "https://api.gupshup.io/wa/api/v1/template/msg";

#[derive(Debug, Clone)]
pub struct GupshupConfig {
    pub api_key: String,
    pub app_name: String,
    /// The WhatsApp business number messages are sent from
    pub source_number: String,
    pub invitation_template: String,
    pub reminder_template: String,
    /// Attached to invitations of events without their own artwork
    pub default_image_url: String,
    /// Last parameter of the invitation template
    pub signature: String,
}

impl GupshupConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: required_env("GUPSHUP_API_KEY")?,
            app_name: required_env("GUPSHUP_APP_NAME")?,
            source_number: required_env("GUPSHUP_SOURCE_NUMBER")?,
            invitation_template: env_or("GUPSHUP_INVITATION_TEMPLATE", "event_invitation_new"),
            reminder_template: env_or("GUPSHUP_REMINDER_TEMPLATE", "event_reminder"),
            default_image_url: env_or(
                "GUPSHUP_DEFAULT_IMAGE_URL",
                "https://i.ibb.co/pKDqkh5/default-invitation.jpg",
            ),
            signature: env_or("INVITATION_SIGNATURE", "SaveDay Events"),
        })
    }
}

/// WhatsApp Business messages through the Gupshup gateway
pub struct GupshupProvider {
    client: Client,
    config: GupshupConfig,
}

#[derive(Debug, Serialize)]
struct TemplateRef<'a> {
    id: &'a str,
    params: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum MessagePayload<'a> {
    Text { text: &'a str },
    Image { image: ImageLink },
}

#[derive(Debug, Serialize)]
struct ImageLink {
    link: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GupshupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GupshupProvider {
    pub fn new(config: GupshupConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn base_form(&self, phone: &PhoneNumber) -> Vec<(&'static str, String)> {
        vec![
            ("channel", "whatsapp".to_string()),
            ("source", self.config.source_number.clone()),
            ("destination", phone.to_string()),
            ("src.name", self.config.app_name.clone()),
        ]
    }

    async fn send_template(
        &self,
        phone: &PhoneNumber,
        template: &str,
        params: Vec<String>,
        image_url: Option<&str>,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let mut form = self.base_form(phone);
        form.push(("template", to_json(&TemplateRef { id: template, params })?));
        if let Some(image_url) = image_url {
            // WhatsApp rejects media links with query strings
            let link = image_url.split('?').next().unwrap_or(image_url).to_string();
            form.push(("message", to_json(&MessagePayload::Image { image: ImageLink { link } })?));
        }
        self.post(GUPSHUP_TEMPLATE_URL, &form).await
    }

    async fn post(
        &self,
        url: &str,
        form: &[(&'static str, String)],
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let res = self
            .client
            .post(url)
            .header("apikey", &self.config.api_key)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Gupshup API error. Error message: {:?}", e);
                DeliveryError::Transport(e.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| DeliveryError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(DeliveryError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GupshupResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "[Unexpected Response] Gupshup API error. Error message: {:?}",
                e
            );
            DeliveryError::Rejected(format!("Unexpected response: {}", body))
        })?;
        accept_response(parsed)
    }
}

/// Gupshup answers 200 also for rejected messages, only a message id means success
fn accept_response(res: GupshupResponse) -> Result<DeliveryReceipt, DeliveryError> {
    if res.status.as_deref() == Some("error") {
        return Err(DeliveryError::Rejected(
            res.message.unwrap_or_else(|| "Unknown error from Gupshup".into()),
        ));
    }
    match res.message_id {
        Some(id) => Ok(DeliveryReceipt {
            provider_message_id: Some(id),
        }),
        None => Err(DeliveryError::Rejected(
            res.message.unwrap_or_else(|| "No message id returned".into()),
        )),
    }
}

fn to_json(value: &impl Serialize) -> Result<String, DeliveryError> {
    serde_json::to_string(value).map_err(|e| DeliveryError::Rejected(e.to_string()))
}

fn event_details(event: &EventSummary) -> [String; 3] {
    [
        event.date.as_ref().map(format_date).unwrap_or_default(),
        event.time.as_ref().map(format_time).unwrap_or_default(),
        event.location.clone().unwrap_or_default().trim().to_string(),
    ]
}

#[async_trait::async_trait]
impl IDeliveryProvider for GupshupProvider {
    async fn send_invitation(
        &self,
        phone: &PhoneNumber,
        event: &EventSummary,
        guest_name: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let [date, time, location] = event_details(event);
        let params = vec![
            guest_name.trim().to_string(),
            event.title.trim().to_string(),
            date,
            time,
            location,
            self.config.signature.clone(),
        ];
        let image_url = event
            .image_url
            .as_deref()
            .unwrap_or(&self.config.default_image_url);
        self.send_template(phone, &self.config.invitation_template, params, Some(image_url))
            .await
    }

    async fn send_reminder(
        &self,
        phone: &PhoneNumber,
        event: &EventSummary,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let [date, time, location] = event_details(event);
        let params = vec![event.title.trim().to_string(), date, time, location];
        self.send_template(phone, &self.config.reminder_template, params, None)
            .await
    }

    async fn send_free_text(
        &self,
        phone: &PhoneNumber,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let mut form = self.base_form(phone);
        form.push(("message", to_json(&MessagePayload::Text { text })?));
        self.post(GUPSHUP_MESSAGE_URL, &form).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn response(json: &str) -> GupshupResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn message_id_means_accepted() {
        let receipt =
            accept_response(response(r#"{"status":"submitted","messageId":"abc"}"#)).unwrap();
        assert_eq!(receipt.provider_message_id, Some("abc".into()));
    }

    #[test]
    fn error_status_is_rejected_even_with_200() {
        let err = accept_response(response(
            r#"{"status":"error","message":"Template not approved"}"#,
        ))
        .unwrap_err();
        assert_eq!(err, DeliveryError::Rejected("Template not approved".into()));

        assert!(accept_response(response(r#"{"status":"submitted"}"#)).is_err());
    }

    #[test]
    fn text_payload_shape() {
        let json = serde_json::to_string(&MessagePayload::Text { text: "hi" }).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hi"}"#);
    }
}
