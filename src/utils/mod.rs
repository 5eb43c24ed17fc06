//! Internal utilities.

pub mod mime;
