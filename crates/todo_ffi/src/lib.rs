//! Flutter-facing bindings for the Todo core.

pub mod api;
