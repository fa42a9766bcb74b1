//! Shows how to plug a custom scheme into the signing framework: define a
//! credential, a provider, and a `SignRequest` implementation, then glue
//! them together with `Signer`.

use async_trait::async_trait;
use http::request::Parts;
use http::HeaderValue;
use std::time::Duration;
use volcsign_core::hash::hex_hmac_sha256;
use volcsign_core::time::{format_iso8601, now};
use volcsign_core::{Context, OsEnv, ProvideCredential, Result, SignRequest, Signer, SigningCredential};

#[derive(Clone, Debug)]
struct TokenCredential {
    token: String,
}

impl SigningCredential for TokenCredential {
    fn is_valid(&self) -> bool {
        !self.token.is_empty()
    }
}

#[derive(Debug)]
struct EnvTokenProvider;

#[async_trait]
impl ProvideCredential for EnvTokenProvider {
    type Credential = TokenCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let token = ctx.env_var("MY_API_TOKEN").unwrap_or_default();

        if token.is_empty() {
            println!("No token in environment, using a demo token");
            return Ok(Some(TokenCredential {
                token: "demo-token".to_string(),
            }));
        }

        Ok(Some(TokenCredential { token }))
    }
}

/// Signs requests with a keyed hash of the timestamp and payload. Not a
/// real provider scheme, just the smallest thing that shows the seams.
#[derive(Debug)]
struct TokenSigner;

#[async_trait]
impl SignRequest for TokenSigner {
    type Credential = TokenCredential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
        _expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let stamp = format_iso8601(now());
        let mut message = stamp.clone().into_bytes();
        message.extend_from_slice(body);

        let mac = hex_hmac_sha256(cred.token.as_bytes(), &message);

        req.headers.insert("x-timestamp", stamp.parse()?);
        req.headers.insert("x-signature", {
            let mut value: HeaderValue = mac.parse()?;
            value.set_sensitive(true);
            value
        });

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(OsEnv);
    let signer = Signer::new(ctx, EnvTokenProvider, TokenSigner);

    let body = b"{\"hello\":\"world\"}";
    let (mut parts, _) = http::Request::post("https://api.example.com/v1/things")
        .body(())
        .expect("request must be valid")
        .into_parts();

    signer.sign(&mut parts, body, None).await?;

    println!("x-timestamp: {:?}", parts.headers.get("x-timestamp"));
    println!("x-signature: {:?}", parts.headers.get("x-signature"));
    Ok(())
}
