//! Expo push notification service.
//!
//! Implements the [`PushService`] seam against the Expo push HTTP API.
//! One request per token, bounded by the configured timeout; a failed
//! or rejected delivery is terminal for that token.

use std::time::Duration;

use async_trait::async_trait;
use domain::services::{AlertPush, PushResult, PushService};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::PushConfig;

/// Per-type presentation hints forwarded to the mobile client.
struct TypeStyle {
    priority: &'static str,
    channel_id: &'static str,
    color: &'static str,
    icon: &'static str,
    icon_family: &'static str,
}

fn style_for(priority: i32) -> TypeStyle {
    // High-priority alerts (>= 75) ride the critical channel with sound;
    // the rest stay on the default channel.
    if priority >= 75 {
        TypeStyle {
            priority: "high",
            channel_id: "critical",
            color: "#F44336",
            icon: "alert-triangle",
            icon_family: "Feather",
        }
    } else {
        TypeStyle {
            priority: "normal",
            channel_id: "default",
            color: "#3AB0FF",
            icon: "bell",
            icon_family: "Feather",
        }
    }
}

/// Expo push API request body.
#[derive(Debug, Serialize)]
struct ExpoMessage {
    to: String,
    title: String,
    body: String,
    data: serde_json::Value,
    sound: &'static str,
    badge: u32,
    ttl: u64,
    priority: &'static str,
    #[serde(rename = "channelId")]
    channel_id: &'static str,
}

/// Expo push API response. A 200 can still carry per-message errors.
#[derive(Debug, Deserialize)]
struct ExpoResponse {
    #[serde(default)]
    errors: Vec<ExpoError>,
    #[serde(default)]
    data: Vec<ExpoTicket>,
}

#[derive(Debug, Deserialize)]
struct ExpoError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<ExpoTicketDetails>,
}

#[derive(Debug, Deserialize)]
struct ExpoTicketDetails {
    #[serde(default)]
    error: Option<String>,
}

/// Error type for Expo client construction.
#[derive(Debug, thiserror::Error)]
pub enum ExpoPushError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push delivery is not enabled")]
    NotEnabled,
}

pub struct ExpoPushService {
    client: Client,
    config: PushConfig,
}

impl ExpoPushService {
    pub fn new(config: PushConfig) -> Result<Self, ExpoPushError> {
        if !config.enabled {
            return Err(ExpoPushError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn build_message(&self, token: &str, push: &AlertPush) -> ExpoMessage {
        let style = style_for(push.priority);

        let mut data = push.data.clone();
        if let Some(map) = data.as_object_mut() {
            map.insert("type".to_string(), push.kind.to_string().into());
            map.insert("icon".to_string(), style.icon.into());
            map.insert("iconFamily".to_string(), style.icon_family.into());
            map.insert("iconColor".to_string(), style.color.into());
        }

        ExpoMessage {
            to: token.to_string(),
            title: push.title.clone(),
            body: push.body.clone(),
            data,
            sound: "notif.mp3",
            badge: 1,
            ttl: 86400,
            priority: style.priority,
            channel_id: style.channel_id,
        }
    }
}

#[async_trait]
impl PushService for ExpoPushService {
    async fn send_alert(&self, token: &str, push: AlertPush) -> PushResult {
        let message = self.build_message(token, &push);

        let response = match self
            .client
            .post(&self.config.endpoint)
            .json(&message)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PushResult::Failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return PushResult::Failed(format!("Expo API status {status}: {body}"));
        }

        let parsed: ExpoResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => return PushResult::Failed(format!("Invalid Expo response: {e}")),
        };

        if let Some(error) = parsed.errors.first() {
            return PushResult::Failed(error.message.clone());
        }

        // A 200 response still carries per-ticket errors; DeviceNotRegistered
        // means the token is dead and the recipient must re-register.
        if let Some(ticket) = parsed.data.iter().find(|t| t.status != "ok") {
            let detail = ticket
                .details
                .as_ref()
                .and_then(|d| d.error.as_deref())
                .unwrap_or_default();
            if detail == "DeviceNotRegistered" {
                return PushResult::InvalidToken;
            }
            return PushResult::Failed(ticket.message.clone());
        }

        PushResult::Sent
    }
}
