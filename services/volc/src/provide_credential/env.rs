use crate::{constants::*, Credential};
use async_trait::async_trait;
use volcsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the access key pair from environment
/// variables.
///
/// This provider looks for the following environment variables:
/// - `VOLC_ACCESSKEY`: the access key id
/// - `VOLC_SECRETKEY`: the secret access key
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(VOLC_ACCESSKEY), envs.get(VOLC_SECRETKEY)) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak.clone(),
                secret_access_key: sk.clone(),
            })),
            _ => Ok(None),
        }
    }
}
