use crate::{APIResponse, BaseClient};
use rsvp_scheduler_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

/// Plays the part of the delivery providers calling back with guest replies
#[derive(Clone)]
pub struct WebhookClient {
    base: Arc<BaseClient>,
}

impl WebhookClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Posts a raw Gupshup callback
    pub async fn gupshup(
        &self,
        callback: serde_json::Value,
    ) -> APIResponse<gupshup_webhook::APIResponse> {
        self.base
            .post(callback, "webhooks/gupshup".into(), StatusCode::OK)
            .await
    }

    /// Forwards an SMS reply the way 019SMS does
    pub async fn sms(&self, msisdn: &str, msg: &str) -> APIResponse<sms_webhook::APIResponse> {
        self.base
            .get_with_query(
                &[("msisdn", msisdn), ("msg", msg)],
                "webhooks/sms".into(),
                StatusCode::OK,
            )
            .await
    }
}
