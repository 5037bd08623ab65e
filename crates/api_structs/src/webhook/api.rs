use serde::{Deserialize, Serialize};

/// Providers retry on anything but a 2xx, so webhooks always answer with this
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub status: String,
    pub message: String,
}

impl WebhookAck {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "ok".into(),
            message: message.into(),
        }
    }
}

pub mod gupshup_webhook {
    use super::*;

    /// A Gupshup callback. Only `message` events carry guest replies.
    #[derive(Deserialize, Serialize, Debug)]
    pub struct RequestBody {
        #[serde(rename = "type")]
        pub event_type: String,
        #[serde(default)]
        pub payload: Option<InboundMessage>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct InboundMessage {
        /// `text`, `button_reply`, `quick_reply`, `location` ...
        #[serde(rename = "type")]
        pub message_type: String,
        #[serde(default)]
        pub source: Option<String>,
        #[serde(default)]
        pub sender: Option<Sender>,
        #[serde(default)]
        pub payload: Option<MessageContent>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct Sender {
        pub phone: String,
        #[serde(default)]
        pub name: Option<String>,
    }

    #[derive(Deserialize, Serialize, Debug, Default)]
    pub struct MessageContent {
        /// Button id of button replies
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub text: Option<String>,
        #[serde(default)]
        pub title: Option<String>,
    }

    impl InboundMessage {
        /// The phone the reply came from
        pub fn sender_phone(&self) -> Option<&str> {
            self.sender
                .as_ref()
                .map(|s| s.phone.as_str())
                .or(self.source.as_deref())
        }
    }

    pub type APIResponse = WebhookAck;
}

pub mod sms_webhook {
    use super::*;

    /// A 019SMS reply, either as query parameters or as a JSON body
    #[derive(Deserialize, Serialize, Debug, Default)]
    pub struct InboundSms {
        #[serde(alias = "from", alias = "from_number", alias = "phone")]
        pub msisdn: Option<String>,
        #[serde(alias = "message", alias = "text", alias = "content")]
        pub msg: Option<String>,
    }

    pub type QueryParams = InboundSms;
    pub type RequestBody = InboundSms;
    pub type APIResponse = WebhookAck;
}
