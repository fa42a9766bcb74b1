//! Core components for signing Volcengine API requests.
//!
//! This crate holds the provider-independent pieces of the volcsign
//! workspace: the signing context, the traits that connect credential
//! loading to request signing, and the small utility modules the service
//! crates share.
//!
//! ## Overview
//!
//! - **Context**: runtime facilities (environment access) available to
//!   credential providers.
//! - **Traits**: [`ProvideCredential`] loads a credential, [`SignRequest`]
//!   turns a request plus credential into signed headers.
//! - **Signer**: the orchestrator that caches a credential while it stays
//!   valid and delegates the actual signing.
//!
//! The signing computation itself is pure: given the same credential,
//! request, body, and timestamp, it produces byte-identical output.
//!
//! ## Example
//!
//! ```no_run
//! use volcsign_core::{
//!     Context, ProvideCredential, Result, SignRequest, Signer, SigningCredential,
//! };
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &mut http::request::Parts,
//!         _body: &[u8],
//!         _cred: Option<&Self::Credential>,
//!         _expires_in: Option<Duration>,
//!     ) -> Result<()> {
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), MyProvider, MySigner);
//!
//! let (mut parts, body) = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(Vec::new())
//!     .expect("request must be valid")
//!     .into_parts();
//! signer.sign(&mut parts, &body, None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, NoopEnv, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
