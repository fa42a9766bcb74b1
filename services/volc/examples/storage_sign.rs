use anyhow::Result;
use volcsign_core::{Context, OsEnv, Signer};
use volcsign_volc::{DefaultCredentialProvider, RequestSigner, Service};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(OsEnv);

    // Bucket endpoint supplied by the caller, never baked into the signer.
    let bucket = std::env::var("VOLC_TOS_BUCKET").unwrap_or_else(|_| "my-bucket".to_string());
    let region = std::env::var("VOLC_REGION").unwrap_or_else(|_| "cn-beijing".to_string());
    let endpoint = format!("https://{bucket}.tos-{region}.volces.com");

    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new(Service::ObjectStorage, &region),
    );

    // Upload an object.
    let payload = b"hello object storage";
    let req = http::Request::put(format!("{endpoint}/uploads/hello.txt"))
        .header("Content-Type", "application/octet-stream")
        .body(())?;

    let (mut parts, _) = req.into_parts();
    match signer.sign(&mut parts, payload, None).await {
        Ok(()) => {
            println!("Request signed successfully!");
            println!(
                "Authorization header: {:?}",
                parts.headers.get("authorization")
            );
            println!("X-Tos-Date header: {:?}", parts.headers.get("x-tos-date"));
            println!("Demo mode: not sending the request");
        }
        Err(e) => eprintln!("Failed to sign request: {e}"),
    }

    Ok(())
}
