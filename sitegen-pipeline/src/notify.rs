//! Outcome notifications.
//!
//! Fired after the terminal status is persisted. Best-effort: a notifier
//! failure is logged and never changes the record.

use std::time::Duration;

use serde::Serialize;

use sitegen_core::{Domain, RecordId};

/// A site went live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub record_id: RecordId,
    pub domain: Domain,
    pub deployment_url: String,
    pub owner_contact: Option<String>,
}

/// A run ended in `ERROR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    pub record_id: RecordId,
    pub domain: Domain,
    pub error_message: String,
    pub owner_contact: Option<String>,
}

pub trait Notifier: Send + Sync {
    fn on_live(&self, event: &LiveEvent);
    fn on_error(&self, event: &ErrorEvent);
}

/// Logs outcomes through `tracing`. Installed by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn on_live(&self, event: &LiveEvent) {
        tracing::info!(
            record_id = %event.record_id,
            domain = %event.domain,
            url = %event.deployment_url,
            contact = event.owner_contact.as_deref().unwrap_or("-"),
            "site is live"
        );
    }

    fn on_error(&self, event: &ErrorEvent) {
        tracing::error!(
            record_id = %event.record_id,
            domain = %event.domain,
            error = %event.error_message,
            contact = event.owner_contact.as_deref().unwrap_or("-"),
            "site generation failed"
        );
    }
}

/// POSTs each event as JSON to a fixed URL.
///
/// Body: `{"event": "live" | "error", ...event fields}`.
pub struct WebhookNotifier {
    url: String,
    agent: ureq::Agent,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    event: &'static str,
    #[serde(flatten)]
    payload: &'a T,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    fn post<T: Serialize>(&self, event: &'static str, payload: &T) {
        let body = match serde_json::to_value(Envelope { event, payload }) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode webhook payload");
                return;
            }
        };
        match self.agent.post(&self.url).send_json(body) {
            Ok(_) => tracing::debug!(url = %self.url, event, "webhook delivered"),
            Err(e) => tracing::warn!(url = %self.url, event, error = %e, "webhook delivery failed"),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn on_live(&self, event: &LiveEvent) {
        self.post("live", event);
    }

    fn on_error(&self, event: &ErrorEvent) {
        self.post("error", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> LiveEvent {
        LiveEvent {
            record_id: RecordId::new(),
            domain: Domain::parse("ada.example").unwrap(),
            deployment_url: "https://ada.example".into(),
            owner_contact: Some("ada@example.com".into()),
        }
    }

    #[test]
    fn envelope_flattens_payload() {
        let event = live();
        let json = serde_json::to_value(Envelope {
            event: "live",
            payload: &event,
        })
        .unwrap();
        assert_eq!(json["event"], "live");
        assert_eq!(json["domain"], "ada.example");
        assert_eq!(json["deploymentUrl"], "https://ada.example");
        assert_eq!(json["ownerContact"], "ada@example.com");
    }

    #[test]
    fn unreachable_webhook_is_swallowed() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook", Duration::from_millis(200));
        notifier.on_live(&live());
    }
}
