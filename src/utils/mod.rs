//! Shared utility types.

pub mod caseless;
