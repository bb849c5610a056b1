//! HTTP handlers, grouped by resource.

pub mod plans;
pub mod system;
