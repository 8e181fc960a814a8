// src/resource/mod.rs
// =============================================================================
// This module knows how Redfish resources are named.
//
// Submodules:
// - identifier: ResourceIdentifier (a normalized path) and ServiceRoot (the
//   fixed base that references are resolved against)
// =============================================================================

mod identifier;

pub use identifier::{ResourceIdentifier, ServiceRoot, ODATA_ID, SERVICE_ROOT_PATH};
