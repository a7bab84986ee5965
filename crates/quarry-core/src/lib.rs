//! Quarry Core
//!
//! Shared vocabulary for the Quarry remote artifact cache: the error
//! taxonomy and the key type used to address cached values. This crate has
//! minimal dependencies and is depended on by every other crate.

pub mod error;
pub mod key;

pub use error::{Error, Result};
pub use key::CacheKey;
