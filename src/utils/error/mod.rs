//! Error handling for the service
//!
//! This module defines the crate error type, its HTTP rendering and the
//! stable `success: false` body every failure is reported with.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::ErrorResponse;
pub use types::{Result, StoreRateError};
