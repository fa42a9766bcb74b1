//! Volcengine service signer
//!
//! Implements the provider's Signature V4 derivative: one shared
//! canonicalization pipeline driven by per-service profiles (visual
//! compute, object storage, and an AWS4-style generic fallback).

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{RequestSigner, Service, EMPTY_PAYLOAD_HASH};

mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    ProvideCredentialChain, StaticCredentialProvider,
};

mod constants;
