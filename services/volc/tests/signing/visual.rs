use super::{init_signing_test, load_static_credential, send_signed_request};
use anyhow::Result;
use http::{Request, StatusCode};
use std::env;
use volcsign_volc::{RequestSigner, Service};

/// Submit a task query against the visual endpoint. The request body is
/// deliberately minimal: what matters is that the endpoint accepts the
/// signature instead of rejecting it outright.
#[tokio::test]
async fn test_visual_query_task() -> Result<()> {
    let Some((ctx, region)) = init_signing_test() else {
        return Ok(());
    };
    let cred = load_static_credential();
    let url =
        env::var("VOLCSIGN_VISUAL_URL").expect("VOLCSIGN_VISUAL_URL must be set");

    let signer = RequestSigner::new(Service::Visual, &region);

    let req = Request::builder()
        .method("POST")
        .uri(format!("{url}/?Action=CVGetResult&Version=2022-08-31"))
        .header("Content-Type", "application/json")
        .body(r#"{"req_key":"jimeng_t2i_v40","task_id":"unknown"}"#.to_string())?;

    let (status, body) = send_signed_request(&ctx, &signer, req, &cred).await?;
    assert_ne!(
        status,
        StatusCode::FORBIDDEN,
        "signature was rejected: {body}"
    );
    assert_ne!(
        status,
        StatusCode::UNAUTHORIZED,
        "signature was rejected: {body}"
    );

    Ok(())
}
