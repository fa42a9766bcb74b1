#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use volcsign_core::*;

#[cfg(feature = "volc")]
pub mod volc {
    pub use volcsign_volc::*;
}
