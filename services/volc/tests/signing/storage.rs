use super::{init_signing_test, load_static_credential, send_signed_request};
use anyhow::Result;
use http::{Request, StatusCode};
use std::env;
use volcsign_volc::{RequestSigner, Service};

/// Fetch a (probably missing) object from the storage endpoint. A missing
/// object comes back 404; a broken signature comes back 403.
#[tokio::test]
async fn test_storage_get_object() -> Result<()> {
    let Some((ctx, region)) = init_signing_test() else {
        return Ok(());
    };
    let cred = load_static_credential();
    let url = env::var("VOLCSIGN_TOS_URL").expect("VOLCSIGN_TOS_URL must be set");

    let signer = RequestSigner::new(Service::ObjectStorage, &region);

    let req = Request::builder()
        .method("GET")
        .uri(format!("{url}/volcsign-test-not-exist"))
        .body(String::new())?;

    let (status, body) = send_signed_request(&ctx, &signer, req, &cred).await?;
    assert_ne!(
        status,
        StatusCode::FORBIDDEN,
        "signature was rejected: {body}"
    );

    Ok(())
}
