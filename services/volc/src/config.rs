use crate::constants::*;
use std::fmt::{Debug, Formatter};
use volcsign_core::utils::Redact;
use volcsign_core::Context;

/// Config for volcengine services.
///
/// Endpoints are deliberately not part of this config: the base URL a
/// request goes to belongs to whatever transport the caller owns and is
/// passed there explicitly.
#[derive(Clone, Default)]
pub struct Config {
    /// Access key id.
    pub access_key_id: Option<String>,
    /// Secret access key.
    pub secret_access_key: Option<String>,
    /// Region, e.g. `cn-north-1`.
    pub region: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            access_key_id: ctx.env_var(VOLC_ACCESSKEY),
            secret_access_key: ctx.env_var(VOLC_SECRETKEY),
            region: ctx.env_var(VOLC_REGION),
        }
    }
}
