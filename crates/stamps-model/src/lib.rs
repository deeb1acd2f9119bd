//! # Stamps Model
//!
//! Resource model and JSON:API wire codec for the Stamps permissioning
//! service, shared by the HTTP client and by anything that needs to read or
//! build service documents without talking to the network.
//!
//! ## Overview
//!
//! The stamps-model crate handles:
//! - **Wire codec**: JSON:API documents (`data`/`included`/`errors`),
//!   dasherized wire attribute keys, compound-document resolution
//! - **Resources**: the decoded resource form (identity, ordered attribute
//!   map, relationships)
//! - **Kinds**: the typed resource kinds (Stamp, Permission, Material,
//!   Deputy) with their accessors and custom-action tables
//! - **Permission vocabulary**: the server-owned permission-type symbols
//!
//! ## Wire format
//!
//! ```text
//! { "data": { "type": "stamps", "id": "42",
//!             "attributes": { "name": "stamp4", "owner-id": "guest" },
//!             "relationships": { "permissions": { "data": [ {"type": "permissions", "id": "1"} ] } } },
//!   "included": [ { "type": "permissions", "id": "1", "attributes": { ... } } ] }
//! ```
//!
//! Attribute keys use dash-separated wire names (`owner-id`); in-memory
//! callers write underscore names and [`encode`](document::encode) rewrites
//! them. The one contractual exception is the Deputy kind, whose wire keys
//! are underscore-form (`user_email`).
//!
//! ## Usage
//!
//! ```rust
//! use stamps_model::{Document, Stamp, ResourceKind};
//!
//! let body = r#"{ "data": { "type": "stamps", "id": "42",
//!                           "attributes": { "name": "stamp4", "owner-id": "guest" } } }"#;
//! let document: Document = serde_json::from_str(body).unwrap();
//! let stamps: Vec<Stamp> = document
//!     .into_resources()
//!     .into_iter()
//!     .map(Stamp::from_resource)
//!     .collect();
//! assert_eq!(stamps[0].name(), Some("stamp4"));
//! assert_eq!(stamps[0].owner_id(), Some("guest"));
//! ```

pub mod document;
pub mod kinds;
pub mod permission_type;
pub mod resource;

// Re-export main types for convenience
pub use document::{
    encode, AttrMap, Document, ErrorObject, PrimaryData, Relationship, RelationshipData,
    ResourceIdentifier, ResourceObject, MEDIA_TYPE,
};
pub use kinds::{Deputy, Material, NewPermission, Permission, Stamp};
pub use permission_type::PermissionType;
pub use resource::{ActionMethod, ActionScope, CustomAction, Resource, ResourceKind};
