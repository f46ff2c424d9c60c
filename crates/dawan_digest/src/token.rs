use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use dawan_core::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Stateless unsubscribe tokens: the normalized email and issue timestamp are
/// embedded in the payload next to an HMAC-SHA256 tag, so any holder of the
/// secret can verify a token without a database lookup.
pub struct UnsubscribeTokenService {
    secret: String,
    base_url: String,
}

/// Decoded payload of a token that passed signature verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedUnsubscribe {
    pub email: String,
    pub timestamp_ms: i64,
}

impl UnsubscribeTokenService {
    /// Fails on an empty secret. Constructed once at startup; a misconfigured
    /// process never gets far enough to issue unsigned tokens.
    pub fn new(secret: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(Error::Config(
                "unsubscribe signing secret is not set".to_string(),
            ));
        }
        Ok(Self {
            secret,
            base_url: base_url.into(),
        })
    }

    fn sign(&self, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| Error::Config(format!("invalid HMAC key: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Token for `email` issued at an explicit timestamp (milliseconds).
    pub fn build_token_at(&self, email: &str, timestamp_ms: i64) -> Result<String> {
        let normalized = email.trim().to_lowercase();
        let payload = format!("{}:{}", normalized, timestamp_ms);
        let signature = self.sign(&payload)?;
        Ok(URL_SAFE_NO_PAD.encode(format!("{}:{}", payload, signature)))
    }

    pub fn build_token(&self, email: &str) -> Result<String> {
        self.build_token_at(email, Utc::now().timestamp_millis())
    }

    /// Full one-click unsubscribe URL for a recipient.
    pub fn build_unsubscribe_url(&self, email: &str) -> Result<String> {
        let token = self.build_token(email)?;
        let endpoint = format!(
            "{}/api/newsletter/unsubscribe",
            self.base_url.trim_end_matches('/')
        );
        let mut url = Url::parse(&endpoint).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("token", &token);
        Ok(url.to_string())
    }

    /// Decode a token, recompute the HMAC over its embedded payload, and
    /// compare in constant time.
    pub fn verify(&self, token: &str) -> Result<VerifiedUnsubscribe> {
        let decoded = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| Error::InvalidToken("not valid base64url".to_string()))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| Error::InvalidToken("payload is not UTF-8".to_string()))?;

        let mut parts = decoded.rsplitn(3, ':');
        let signature = parts.next();
        let timestamp = parts.next();
        let email = parts.next();
        let (Some(signature), Some(timestamp), Some(email)) = (signature, timestamp, email)
        else {
            return Err(Error::InvalidToken("malformed payload".to_string()));
        };

        let expected = self.sign(&format!("{}:{}", email, timestamp))?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(Error::InvalidToken("signature mismatch".to_string()));
        }

        let timestamp_ms = timestamp
            .parse::<i64>()
            .map_err(|_| Error::InvalidToken("bad timestamp".to_string()))?;
        Ok(VerifiedUnsubscribe {
            email: email.to_string(),
            timestamp_ms,
        })
    }
}
