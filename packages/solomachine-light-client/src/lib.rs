#![doc = include_str!("../README.md")]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod client;
pub mod client_state;
pub mod consensus_state;
pub mod error;
pub mod membership;
pub mod misbehaviour;
pub mod path;
pub mod proof;
pub mod proto;
pub mod public_key;
pub mod sign_bytes;
pub mod signature;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
