use crate::constants::{
    QUERY_ENCODE_SET, SCOPE_SERVICE_STORAGE, SCOPE_SERVICE_VISUAL, URI_ENCODE_SET, X_DATE,
    X_TOS_DATE,
};
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Write;
use std::time::Duration;
use volcsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use volcsign_core::time::{format_date, format_iso8601, now, DateTime};
use volcsign_core::{Context, Error, Result, SignRequest, SigningRequest};

/// Hex SHA256 of the empty payload.
///
/// A request without a body and a request with an explicitly empty body
/// hash identically.
pub const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Service selects the signing profile applied to a request.
///
/// Each variant canonicalizes the same way but differs in algorithm label,
/// signed header set, date header, credential-scope service name, and
/// secret key material. The differences live in one descriptor per
/// variant rather than in branches spread through the shared pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Service {
    /// Visual/compute APIs, signed with the `cv` scope.
    Visual,
    /// Object storage, signed with the `tos` scope.
    ObjectStorage,
    /// Any other service, signed with the AWS4-style fallback profile.
    /// The string is the service name placed in the credential scope.
    Generic(String),
}

/// Which request headers participate in the signature.
#[derive(Debug, Clone, Copy)]
enum SignedHeaderSet {
    /// Every header present on the request after host/date injection.
    All,
    /// A fixed list. Must be sorted and lower-cased.
    Exact(&'static [&'static str]),
}

/// Everything that differs between the signing variants.
struct Profile<'a> {
    algorithm: &'static str,
    date_header: &'static str,
    scope_service: &'a str,
    /// Whether the key derivation starts from `"AWS4" + secret` instead of
    /// the raw secret. A wire-compatibility requirement of the storage
    /// protocol, not a stylistic choice.
    prefixed_secret: bool,
    signed_headers: SignedHeaderSet,
}

impl Service {
    fn profile(&self) -> Profile<'_> {
        match self {
            Service::Visual => Profile {
                algorithm: "HMAC-SHA256",
                date_header: X_DATE,
                scope_service: SCOPE_SERVICE_VISUAL,
                prefixed_secret: false,
                signed_headers: SignedHeaderSet::Exact(&["host", "x-date"]),
            },
            Service::ObjectStorage => Profile {
                algorithm: "TOS4-HMAC-SHA256",
                date_header: X_TOS_DATE,
                scope_service: SCOPE_SERVICE_STORAGE,
                prefixed_secret: true,
                signed_headers: SignedHeaderSet::Exact(&["host"]),
            },
            Service::Generic(name) => Profile {
                algorithm: "AWS4-HMAC-SHA256",
                date_header: X_DATE,
                scope_service: name,
                prefixed_secret: true,
                signed_headers: SignedHeaderSet::All,
            },
        }
    }
}

/// RequestSigner that implements the volcengine Signature V4 derivative.
///
/// - [Signature method](https://www.volcengine.com/docs/6348/69824)
#[derive(Debug)]
pub struct RequestSigner {
    service: Service,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given service profile and region.
    pub fn new(service: Service, region: &str) -> Self {
        Self {
            service,
            region: region.to_string(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        if expires_in.is_some() {
            return Err(Error::request_invalid(
                "presigned requests are not supported by this signing scheme",
            ));
        }

        // One instant per call. Both the date stamp and the full timestamp
        // derive from it, so header and credential scope cannot disagree.
        let now = self.time.unwrap_or_else(now);
        let profile = self.service.profile();
        let mut signing_req = SigningRequest::build(req)?;

        canonicalize_headers(&mut signing_req, &profile, now)?;
        canonicalize_query(&mut signing_req);

        let signed_headers = signed_header_names(&signing_req, &profile);
        let creq = canonical_request_string(&signing_req, &signed_headers, body)?;
        debug!("calculated canonical request: {creq}");

        let scope = format!(
            "{}/{}/{}/request",
            format_date(now),
            self.region,
            profile.scope_service
        );
        debug!("calculated scope: {scope}");

        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{}", profile.algorithm)?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", hex_sha256(creq.as_bytes()))?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            derive_signing_key(&cred.secret_access_key, &profile, now, &self.region);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            profile.algorithm,
            cred.access_key_id,
            scope,
            signed_headers.join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);

        signing_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        signing_req.apply(req)
    }
}

/// Prepare the headers every profile relies on.
///
/// `host` always participates in the signature and is derived from the
/// request authority when absent. The profile's date header is stamped
/// unconditionally: a caller-supplied value could diverge from the instant
/// the scope is built from.
fn canonicalize_headers(
    ctx: &mut SigningRequest,
    profile: &Profile<'_>,
    now: DateTime,
) -> Result<()> {
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, ctx.authority.as_str().parse()?);
    }

    ctx.headers
        .insert(profile.date_header, HeaderValue::try_from(format_iso8601(now))?);

    Ok(())
}

/// Percent-encode each decoded query pair, then order by encoded key with
/// ties broken by encoded value.
fn canonicalize_query(ctx: &mut SigningRequest) {
    let mut query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    query.sort();

    ctx.query = query;
}

/// The header names participating in the signature, sorted and lower-cased.
fn signed_header_names<'a>(ctx: &'a SigningRequest, profile: &Profile<'_>) -> Vec<&'a str> {
    match profile.signed_headers {
        SignedHeaderSet::All => ctx.header_name_to_vec_sorted(),
        SignedHeaderSet::Exact(names) => names.to_vec(),
    }
}

fn canonical_request_string(
    ctx: &SigningRequest,
    signed_headers: &[&str],
    body: &[u8],
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", ctx.method)?;

    let path = percent_decode_str(&ctx.path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid(format!("failed to decode path: {e}")))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &URI_ENCODE_SET))?;

    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;

    for name in signed_headers {
        let value = match ctx.headers.get(*name) {
            Some(v) => SigningRequest::header_value_canonical(v)?,
            None => String::new(),
        };
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{}", hashed_payload(body))?;

    Ok(f)
}

fn hashed_payload(body: &[u8]) -> String {
    if body.is_empty() {
        return EMPTY_PAYLOAD_HASH.to_string();
    }

    hex_sha256(body)
}

/// Derive the scoped signing key through iterated HMAC-SHA256: each step's
/// output keys the next, narrowing the long-lived secret into a key bound
/// to date, region, and service.
fn derive_signing_key(
    secret: &str,
    profile: &Profile<'_>,
    now: DateTime,
    region: &str,
) -> Vec<u8> {
    let k_date = if profile.prefixed_secret {
        hmac_sha256(
            format!("AWS4{secret}").as_bytes(),
            format_date(now).as_bytes(),
        )
    } else {
        hmac_sha256(secret.as_bytes(), format_date(now).as_bytes())
    };
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, profile.scope_service.as_bytes());

    hmac_sha256(&k_service, b"request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use volcsign_core::time::parse_iso8601;

    fn test_time() -> DateTime {
        parse_iso8601("20240101T000000Z").expect("time must parse")
    }

    fn visual_parts() -> Parts {
        http::Request::builder()
            .method("POST")
            .uri("https://visual.example.com/?Action=Foo&Version=2022-08-31")
            .header("Content-Type", "application/json")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0
    }

    fn test_credential() -> Credential {
        Credential::new("AKID", "SECRET")
    }

    async fn authorization_for(
        signer: &RequestSigner,
        mut parts: Parts,
        body: &[u8],
    ) -> Result<String> {
        signer
            .sign_request(
                &Context::new(),
                &mut parts,
                body,
                Some(&test_credential()),
                None,
            )
            .await?;
        Ok(parts.headers[header::AUTHORIZATION].to_str()?.to_string())
    }

    #[test]
    fn test_visual_canonical_request() {
        let mut parts = visual_parts();
        let mut ctx = SigningRequest::build(&mut parts).expect("must build");

        let service = Service::Visual;
        let profile = service.profile();
        canonicalize_headers(&mut ctx, &profile, test_time()).expect("must canonicalize");
        canonicalize_query(&mut ctx);

        let signed_headers = signed_header_names(&ctx, &profile);
        let creq =
            canonical_request_string(&ctx, &signed_headers, b"").expect("must canonicalize");

        assert_eq!(
            creq,
            "POST\n\
             /\n\
             Action=Foo&Version=2022-08-31\n\
             host:visual.example.com\n\
             x-date:20240101T000000Z\n\
             \n\
             host;x-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_path_is_reencoded_once() {
        let mut parts = http::Request::builder()
            .method("GET")
            .uri("https://bucket.example.com/uploads/my%20file.png")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0;
        let mut ctx = SigningRequest::build(&mut parts).expect("must build");

        let service = Service::ObjectStorage;
        let profile = service.profile();
        canonicalize_headers(&mut ctx, &profile, test_time()).expect("must canonicalize");

        let signed_headers = signed_header_names(&ctx, &profile);
        let creq =
            canonical_request_string(&ctx, &signed_headers, b"").expect("must canonicalize");

        assert!(creq.starts_with("GET\n/uploads/my%20file.png\n"), "{creq}");
    }

    #[tokio::test]
    async fn test_visual_sign() -> Result<()> {
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());

        let mut parts = visual_parts();
        signer
            .sign_request(
                &Context::new(),
                &mut parts,
                b"{}",
                Some(&test_credential()),
                None,
            )
            .await?;

        let authorization = parts.headers[header::AUTHORIZATION].to_str()?;
        let prefix = "HMAC-SHA256 Credential=AKID/20240101/cn-north-1/cv/request, \
                      SignedHeaders=host;x-date, Signature=";
        assert!(
            authorization.starts_with(prefix),
            "unexpected authorization: {authorization}"
        );

        let signature = &authorization[prefix.len()..];
        assert_eq!(signature.len(), 64);
        assert!(signature
            .chars()
            .all(|c| matches!(c, '0'..='9' | 'a'..='f')));

        // Supplied headers survive signing even when they are not signed.
        assert_eq!(parts.headers["host"], "visual.example.com");
        assert_eq!(parts.headers["x-date"], "20240101T000000Z");
        assert_eq!(parts.headers["content-type"], "application/json");
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_is_deterministic() -> Result<()> {
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());

        let first = authorization_for(&signer, visual_parts(), b"{}").await?;
        let second = authorization_for(&signer, visual_parts(), b"{}").await?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_order_does_not_matter() -> Result<()> {
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());

        let parts_for = |uri: &'static str| {
            http::Request::builder()
                .method("GET")
                .uri(uri)
                .body(())
                .expect("request must be valid")
                .into_parts()
                .0
        };

        let ordered =
            authorization_for(&signer, parts_for("https://visual.example.com/?a=1&b=2"), b"")
                .await?;
        let shuffled =
            authorization_for(&signer, parts_for("https://visual.example.com/?b=2&a=1"), b"")
                .await?;
        assert_eq!(ordered, shuffled);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_body_hash() -> Result<()> {
        assert_eq!(hashed_payload(b""), EMPTY_PAYLOAD_HASH);
        assert_eq!(hashed_payload(b""), hex_sha256(b""));
        assert_eq!(hashed_payload(b"{}"), hex_sha256(b"{}"));

        // Absent and explicitly empty payloads sign identically; a real
        // payload does not.
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());
        let empty = authorization_for(&signer, visual_parts(), b"").await?;
        let also_empty = authorization_for(&signer, visual_parts(), "".as_bytes()).await?;
        let with_body = authorization_for(&signer, visual_parts(), b"{}").await?;
        assert_eq!(empty, also_empty);
        assert_ne!(empty, with_body);
        Ok(())
    }

    #[tokio::test]
    async fn test_storage_sign() -> Result<()> {
        let signer =
            RequestSigner::new(Service::ObjectStorage, "cn-beijing").with_time(test_time());

        let mut parts = http::Request::builder()
            .method("PUT")
            .uri("https://bucket.tos-cn-beijing.volces.com/uploads/pic.png")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0;
        signer
            .sign_request(
                &Context::new(),
                &mut parts,
                b"image-bytes",
                Some(&test_credential()),
                None,
            )
            .await?;

        let authorization = parts.headers[header::AUTHORIZATION].to_str()?;
        assert!(
            authorization.starts_with(
                "TOS4-HMAC-SHA256 Credential=AKID/20240101/cn-beijing/tos/request, \
                 SignedHeaders=host, Signature="
            ),
            "unexpected authorization: {authorization}"
        );
        assert_eq!(parts.headers["x-tos-date"], "20240101T000000Z");
        assert!(!parts.headers.contains_key("x-date"));
        Ok(())
    }

    #[tokio::test]
    async fn test_generic_sign_covers_all_headers() -> Result<()> {
        let signer = RequestSigner::new(Service::Generic("iam".to_string()), "cn-north-1")
            .with_time(test_time());

        let authorization = authorization_for(&signer, visual_parts(), b"{}").await?;
        assert!(
            authorization.starts_with(
                "AWS4-HMAC-SHA256 Credential=AKID/20240101/cn-north-1/iam/request, \
                 SignedHeaders=content-type;host;x-date, Signature="
            ),
            "unexpected authorization: {authorization}"
        );
        Ok(())
    }

    #[test]
    fn test_signing_key_secret_prefix() {
        let now = test_time();

        // Storage derivation starts from "AWS4" + secret.
        let service = Service::ObjectStorage;
        let derived = derive_signing_key("SECRET", &service.profile(), now, "cn-north-1");
        let k_date = hmac_sha256(b"AWS4SECRET", b"20240101");
        let k_region = hmac_sha256(&k_date, b"cn-north-1");
        let k_service = hmac_sha256(&k_region, b"tos");
        assert_eq!(derived, hmac_sha256(&k_service, b"request"));

        // Visual derivation starts from the raw secret.
        let service = Service::Visual;
        let derived = derive_signing_key("SECRET", &service.profile(), now, "cn-north-1");
        let k_date = hmac_sha256(b"SECRET", b"20240101");
        let k_region = hmac_sha256(&k_date, b"cn-north-1");
        let k_service = hmac_sha256(&k_region, b"cv");
        assert_eq!(derived, hmac_sha256(&k_service, b"request"));
    }

    #[tokio::test]
    async fn test_sign_without_authority_fails() {
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());

        let mut parts = http::Request::builder()
            .method("POST")
            .uri("/relative/only")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0;
        let err = signer
            .sign_request(
                &Context::new(),
                &mut parts,
                b"",
                Some(&test_credential()),
                None,
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), volcsign_core::ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_sign_rejects_expires_in() {
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());

        let mut parts = visual_parts();
        let err = signer
            .sign_request(
                &Context::new(),
                &mut parts,
                b"",
                Some(&test_credential()),
                Some(Duration::from_secs(3600)),
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), volcsign_core::ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_sign_without_credential_is_noop() -> Result<()> {
        let signer = RequestSigner::new(Service::Visual, "cn-north-1").with_time(test_time());

        let mut parts = visual_parts();
        signer
            .sign_request(&Context::new(), &mut parts, b"", None, None)
            .await?;
        assert!(!parts.headers.contains_key(header::AUTHORIZATION));
        assert!(!parts.headers.contains_key("x-date"));
        Ok(())
    }
}
