use async_trait::async_trait;
use dawan_core::{EmailDispatcher, Error, OutgoingEmail, Result};
use serde::Serialize;
use tracing::info;

use crate::config::Config;

/// Dispatcher that POSTs rendered messages to the configured HTTP email
/// provider.
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from_address: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    headers: Vec<(&'a str, &'a str)>,
}

impl HttpDispatcher {
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config
            .mailer_url
            .clone()
            .ok_or_else(|| Error::Config("MAILER_URL must be set to send email".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: config.mailer_api_key.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl EmailDispatcher for HttpDispatcher {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let body = SendRequest {
            from: &self.from_address,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            headers: email
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        request
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Dispatch(format!("mailer rejected message: {}", e)))?;
        Ok(())
    }
}

/// Dry-run dispatcher: logs what would have been sent and delivers nothing.
#[derive(Default)]
pub struct LogDispatcher;

#[async_trait]
impl EmailDispatcher for LogDispatcher {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        info!(
            "📧 [dry-run] to={} subject={:?} ({} bytes of HTML)",
            email.to,
            email.subject,
            email.html.len()
        );
        Ok(())
    }
}
