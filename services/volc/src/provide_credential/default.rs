use crate::provide_credential::{EnvCredentialProvider, ProvideCredentialChain};
use crate::Credential;
use async_trait::async_trait;
use volcsign_core::{Context, ProvideCredential, Result};

/// DefaultCredentialProvider is a loader that will try to load credential
/// via the default chain.
///
/// Resolution order:
///
/// 1. Environment variables (`VOLC_ACCESSKEY`, `VOLC_SECRETKEY`)
///
/// Key pairs that arrive with a request or from persisted configuration
/// are expressed through [`crate::StaticCredentialProvider`] and
/// [`crate::ConfigCredentialProvider`] instead, either standalone or via
/// [`with_chain`](Self::with_chain).
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new().push(EnvCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{VOLC_ACCESSKEY, VOLC_SECRETKEY};
    use std::collections::HashMap;
    use volcsign_core::StaticEnv;

    #[tokio::test]
    async fn test_default_provider_without_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::new(),
        });

        let provider = DefaultCredentialProvider::new();
        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed");
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_default_provider_with_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from_iter([
                (VOLC_ACCESSKEY.to_string(), "access_key_id".to_string()),
                (VOLC_SECRETKEY.to_string(), "secret_access_key".to_string()),
            ]),
        });

        let provider = DefaultCredentialProvider::new();
        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed")
            .expect("credential must be found");
        assert_eq!("access_key_id", cred.access_key_id);
        assert_eq!("secret_access_key", cred.secret_access_key);
    }
}
