//! Command handlers
//!
//! Each handler writes its report to the supplied writer and returns the
//! value it produced so callers can inspect it.

pub mod anchor;
pub mod attributes;
pub mod inspect;
pub mod keygen;
pub mod sign;
pub mod signer;
pub mod verify;
