mod storage;
mod visual;

use anyhow::Result;
use http::{Request, StatusCode};
use log::debug;
use reqwest::Client;
use std::env;
use volcsign_core::{Context, SignRequest};
use volcsign_volc::{Credential, RequestSigner};

/// Load a static credential from environment variables.
pub fn load_static_credential() -> Credential {
    let access_key =
        env::var("VOLCSIGN_ACCESS_KEY").expect("VOLCSIGN_ACCESS_KEY must be set");
    let secret_key =
        env::var("VOLCSIGN_SECRET_KEY").expect("VOLCSIGN_SECRET_KEY must be set");

    Credential::new(&access_key, &secret_key)
}

/// Initialize the live signing test environment.
///
/// Returns `None` unless `VOLCSIGN_TEST=on`, so these tests are skipped by
/// default and only run against real endpoints when explicitly enabled.
pub fn init_signing_test() -> Option<(Context, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("VOLCSIGN_TEST").is_err() || env::var("VOLCSIGN_TEST").unwrap() != "on" {
        return None;
    }

    let region = env::var("VOLCSIGN_REGION").unwrap_or_else(|_| "cn-north-1".to_string());

    Some((Context::new(), region))
}

/// Send a signed request and return status plus body.
pub async fn send_signed_request(
    ctx: &Context,
    signer: &RequestSigner,
    req: Request<String>,
    cred: &Credential,
) -> Result<(StatusCode, String)> {
    let (mut parts, body) = req.into_parts();
    signer
        .sign_request(ctx, &mut parts, body.as_bytes(), Some(cred), None)
        .await
        .expect("sign request must succeed");
    let req = Request::from_parts(parts, body);

    debug!("signed request: {req:?}");

    let client = Client::new();
    let resp = client.execute(req.try_into()?).await?;

    let status = resp.status();
    let body = resp.text().await?;

    debug!("response status: {status}, body: {body}");
    Ok((status, body))
}
