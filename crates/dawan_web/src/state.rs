use dawan_digest::{DigestJob, UnsubscribeTokenService};

pub struct AppState {
    pub job: DigestJob,
    pub tokens: UnsubscribeTokenService,
    /// When set, the send-digest route requires this value in the
    /// `x-digest-secret` header.
    pub trigger_secret: Option<String>,
}
