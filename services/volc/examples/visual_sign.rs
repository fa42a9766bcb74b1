use anyhow::Result;
use volcsign_core::{Context, OsEnv, ProvideCredential, Signer};
use volcsign_volc::{DefaultCredentialProvider, RequestSigner, Service, StaticCredentialProvider};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(OsEnv);

    // The endpoint is a plain value owned by the caller; nothing in the
    // signing path knows or stores base URLs.
    let endpoint = std::env::var("VOLC_VISUAL_ENDPOINT")
        .unwrap_or_else(|_| "https://visual.volcengineapi.com".to_string());

    let loader = DefaultCredentialProvider::new();
    let builder = RequestSigner::new(Service::Visual, "cn-north-1");

    let signer = if loader.provide_credential(&ctx).await?.is_none() {
        println!("No credentials in the environment, using demo credentials");
        Signer::new(
            ctx,
            StaticCredentialProvider::new("AKLTexample", "demo-secret-key"),
            builder,
        )
    } else {
        Signer::new(ctx, loader, builder)
    };

    // Submit a text-to-image task.
    let body = r#"{"req_key":"jimeng_t2i_v40","prompt":"a lighthouse at dusk"}"#;
    let req = http::Request::post(format!(
        "{endpoint}/?Action=CVSync2AsyncSubmitTask&Version=2022-08-31"
    ))
    .header("Content-Type", "application/json")
    .body(body.to_string())?;

    let (mut parts, body) = req.into_parts();
    signer.sign(&mut parts, body.as_bytes(), None).await?;

    println!("Request signed successfully!");
    println!(
        "Authorization header: {:?}",
        parts.headers.get("authorization")
    );
    println!("X-Date header: {:?}", parts.headers.get("x-date"));
    println!("Demo mode: not sending the request");

    Ok(())
}
