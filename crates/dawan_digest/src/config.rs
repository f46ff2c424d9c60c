use dawan_core::{Error, Result};
use std::env;

pub const DEFAULT_SITE_URL: &str = "https://dawan.so";
pub const DEFAULT_FROM_ADDRESS: &str = "Dawan TV <warside@dawan.so>";

/// Process configuration for the digest pipeline. Loaded once at startup;
/// a missing signing secret is fatal there, never at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub site_url: String,
    pub unsubscribe_secret: String,
    pub from_address: String,
    /// HTTP endpoint of the outbound email provider.
    pub mailer_url: Option<String>,
    pub mailer_api_key: Option<String>,
    /// Shared secret required by the send-digest trigger route, when set.
    pub trigger_secret: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Tests inject closures
    /// here instead of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let unsubscribe_secret = lookup("NEWSLETTER_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::Config("NEWSLETTER_SECRET must be set".to_string()))?;

        Ok(Self {
            site_url: lookup("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            unsubscribe_secret,
            from_address: lookup("NEWSLETTER_FROM")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            mailer_url: lookup("MAILER_URL"),
            mailer_api_key: lookup("MAILER_API_KEY"),
            trigger_secret: lookup("DIGEST_TRIGGER_SECRET"),
        })
    }
}
