//! Wire and domain types shared between the ES analysis client crates.

pub mod domain;
pub mod error;
pub mod protocol;
pub mod scoring;
