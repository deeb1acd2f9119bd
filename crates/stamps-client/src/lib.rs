//! # Stamps Client
//!
//! Typed HTTP client for the Stamps permissioning service: stamps, their
//! permissions, the materials they apply to, and deputy delegation.
//!
//! ## Overview
//!
//! The stamps-client crate handles:
//! - **CRUD**: find / all / create / update / destroy per resource kind
//! - **Compound documents**: `?include=` fetches with relationship fields
//!   populated from the response
//! - **Custom actions**: `set_permissions`, `apply`, `unapply` on stamps
//!   and `check` on permissions, dispatched through each kind's static
//!   action table
//! - **Permission checks**: the 403-with-payload denial protocol, surfaced
//!   as [`CheckOutcome`] data instead of an error
//!
//! Resource types and the wire codec live in the `stamps-model` crate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stamps_client::{CheckOutcome, CheckRequest, StampsClient, StampsConfig};
//! use stamps_model::{PermissionType, Stamp};
//!
//! async fn example() -> Result<(), stamps_client::StampsError> {
//!     let client = StampsClient::new(StampsConfig::from_env());
//!
//!     // Typed fetches
//!     let stamps = client.all::<Stamp>().await?;
//!     for stamp in &stamps {
//!         println!("{:?} owned by {:?}", stamp.name(), stamp.owner_id());
//!     }
//!
//!     // Permission check with a structured denial
//!     let outcome = client
//!         .check_catch(&CheckRequest {
//!             permission_type: PermissionType::Spend,
//!             names: vec!["dirk@here.com".to_string()],
//!             material_uuids: vec!["m1".to_string()],
//!         })
//!         .await?;
//!     match outcome {
//!         CheckOutcome::Allowed => println!("all materials permitted"),
//!         CheckOutcome::Denied { material_uuids } => {
//!             println!("unpermitted: {:?}", material_uuids)
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error model
//!
//! All failures surface as [`StampsError`] to the direct caller: nothing
//! is retried and nothing is swallowed. A 403 is [`StampsError::AccessDenied`]
//! everywhere except [`StampsClient::check_catch`], which converts the
//! check-denial payload into [`CheckOutcome::Denied`].

pub mod check;
pub mod client;
pub mod config;
pub mod error;

// Re-export main types
pub use check::{unpermitted_uuids, CheckOutcome, CheckRequest};
pub use client::StampsClient;
pub use config::StampsConfig;
pub use error::StampsError;
