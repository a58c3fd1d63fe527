//! ft-core: shared foundation for fuzzytherm.
//!
//! Contains:
//! - numeric (Real + tolerances + float and parameter checks)
//! - error (shared error type)

pub mod error;
pub mod numeric;

pub use error::{FtError, FtResult};
pub use numeric::*;
