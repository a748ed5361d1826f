//! Flutter-facing bindings for BlueprintDB core.

pub mod api;
