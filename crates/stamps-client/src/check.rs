//! Permission-check protocol.
//!
//! `POST /permissions/check` asks whether a set of actors hold a permission
//! over a set of materials. The service answers 2xx when every material
//! passes, and 403 with an error body naming the unpermitted material
//! identifiers otherwise. [`StampsClient::check_catch`] converts that denial
//! into [`CheckOutcome::Denied`] data so callers can branch on the outcome
//! without error-handling boilerplate; every other failure (5xx, transport,
//! malformed body, a 403 without the check payload shape) still propagates
//! as an error.
//!
//! The check request body uses flat underscore keys (`permission_type`,
//! `names`, `material_uuids`), unlike the dasherized attribute-map shape of
//! create/set_permissions. The asymmetry is part of the service's contract
//! and is preserved exactly.

use serde::Serialize;
use serde_json::json;
use std::sync::RwLock;
use tracing::{debug, instrument};

use stamps_model::{Permission, PermissionType};

use crate::client::StampsClient;
use crate::error::StampsError;

/// Process-wide record of the most recent denial, standing in for "the
/// outcome of the last check" for callers that predate [`CheckOutcome`].
static UNPERMITTED_UUIDS: RwLock<Option<Vec<String>>> = RwLock::new(None);

/// A permission-check request.
///
/// Serializes with flat underscore keys, mirroring the distinct request
/// shape the service expects for checks.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRequest {
    /// Permission-type symbol to check.
    pub permission_type: PermissionType,
    /// Actor identifiers (e.g. emails) that must hold the permission.
    pub names: Vec<String>,
    /// Materials the permission must cover.
    pub material_uuids: Vec<String>,
}

/// Outcome of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Every named actor holds the permission over every material.
    Allowed,
    /// The check failed for the named materials.
    Denied {
        /// Material identifiers that were not permitted, in server order.
        material_uuids: Vec<String>,
    },
}

impl CheckOutcome {
    /// True when the check passed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, CheckOutcome::Allowed)
    }
}

/// The unpermitted material identifiers recorded by the most recent denied
/// check, if any.
///
/// This is process-wide state scoped to the Permission kind as a whole, not
/// to any call or instance. It is overwritten by each denied check and left
/// untouched by an allowed one, so a stale list from an earlier denial
/// remains visible after a later success. Concurrent `check_catch` calls
/// race on this slot nondeterministically; read the [`CheckOutcome`]
/// returned by the call itself instead wherever possible, and read this
/// slot (if at all) immediately after a `Denied` result, before any other
/// check call.
pub fn unpermitted_uuids() -> Option<Vec<String>> {
    UNPERMITTED_UUIDS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

fn record_denial(material_uuids: &[String]) {
    let mut slot = UNPERMITTED_UUIDS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(material_uuids.to_vec());
}

impl StampsClient {
    /// Run a permission check, propagating a denial as
    /// [`StampsError::AccessDenied`].
    ///
    /// Most callers want [`check_catch`](Self::check_catch) instead.
    #[instrument(skip(self, request), fields(permission_type = %request.permission_type))]
    pub async fn check(&self, request: &CheckRequest) -> Result<(), StampsError> {
        debug!(
            "Checking {} actors against {} materials",
            request.names.len(),
            request.material_uuids.len()
        );

        let body = json!({ "data": request });
        self.invoke::<Permission>("check", None, &body).await?;
        Ok(())
    }

    /// Run a permission check, converting a structured denial into data.
    ///
    /// Returns [`CheckOutcome::Allowed`] on success and
    /// [`CheckOutcome::Denied`] when the service answers 403 with the
    /// unpermitted-identifier payload; the process-wide
    /// [`unpermitted_uuids`] slot is overwritten on denial and left
    /// untouched on success. Any other failure propagates unchanged.
    pub async fn check_catch(&self, request: &CheckRequest) -> Result<CheckOutcome, StampsError> {
        match self.check(request).await {
            Ok(()) => Ok(CheckOutcome::Allowed),
            Err(StampsError::AccessDenied { errors }) => {
                let material_uuids = errors
                    .first()
                    .and_then(|error| error.material_uuids.clone());
                match material_uuids {
                    Some(material_uuids) => {
                        debug!(
                            "Check denied for {} materials",
                            material_uuids.len()
                        );
                        record_denial(&material_uuids);
                        Ok(CheckOutcome::Denied { material_uuids })
                    }
                    // 403 without the check payload shape: not special-cased.
                    None => Err(StampsError::AccessDenied { errors }),
                }
            }
            Err(other) => Err(other),
        }
    }
}
