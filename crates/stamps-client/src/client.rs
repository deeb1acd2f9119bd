//! Stamps service client.
//!
//! HTTP client for the Stamps permissioning service. Provides typed CRUD,
//! compound-document fetches, and the custom-action dispatcher; every call
//! is a single synchronous request/response round-trip with the
//! `application/vnd.api+json` header pair on both directions. There is no
//! caching, no retry, and no cross-call ordering guarantee: callers may
//! invoke operations concurrently, but this layer does nothing to order
//! them.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use stamps_model::document::dasherize_keys;
use stamps_model::{
    encode, ActionMethod, ActionScope, AttrMap, Document, NewPermission, ResourceKind, Stamp,
    MEDIA_TYPE,
};

use crate::config::StampsConfig;
use crate::error::StampsError;

/// Stamps service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct StampsClient {
    /// HTTP client instance.
    client: Client,

    /// Service configuration.
    config: StampsConfig,
}

impl StampsClient {
    /// Create a new client for the given configuration.
    pub fn new(config: StampsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Create a client configured from the environment (`STAMP_URL`,
    /// `STAMP_TIMEOUT_SECS`).
    pub fn from_env() -> Self {
        Self::new(StampsConfig::from_env())
    }

    /// The active configuration.
    pub fn config(&self) -> &StampsConfig {
        &self.config
    }

    /// Fetch one resource by id.
    ///
    /// Returns a one-element sequence for shape-uniformity with
    /// [`all`](Self::all). An absent id is a [`StampsError::NotFound`]
    /// failure, never an empty success.
    #[instrument(skip(self), fields(kind = K::TYPE, id = %id))]
    pub async fn find<K: ResourceKind>(&self, id: &str) -> Result<Vec<K>, StampsError> {
        debug!("Fetching {} {}", K::TYPE, id);
        self.get_member(id, None).await
    }

    /// Fetch every resource of a kind.
    #[instrument(skip(self), fields(kind = K::TYPE))]
    pub async fn all<K: ResourceKind>(&self) -> Result<Vec<K>, StampsError> {
        debug!("Listing {}", K::TYPE);
        let url = self.collection_url::<K>();
        let response = self.prepare(self.client.get(&url)).send().await?;
        self.read_resources(response).await
    }

    /// Fetch one resource by id with a relationship included in the same
    /// response (`?include=<relationship>`).
    ///
    /// The named relationship field of the result is populated from the
    /// compound document: an empty sequence when the server reports zero
    /// related resources, never absent.
    #[instrument(skip(self), fields(kind = K::TYPE, id = %id, include = %relationship))]
    pub async fn find_included<K: ResourceKind>(
        &self,
        id: &str,
        relationship: &str,
    ) -> Result<Vec<K>, StampsError> {
        debug!("Fetching {} {} with {}", K::TYPE, id, relationship);
        self.get_member(id, Some(relationship)).await
    }

    /// Fetch a stamp together with its permissions.
    pub async fn find_stamp_with_permissions(&self, id: &str) -> Result<Vec<Stamp>, StampsError> {
        self.find_included::<Stamp>(id, "permissions").await
    }

    /// Fetch a stamp together with its materials.
    pub async fn find_stamp_with_materials(&self, id: &str) -> Result<Vec<Stamp>, StampsError> {
        self.find_included::<Stamp>(id, "materials").await
    }

    /// Create a resource from an attribute map (in-memory key names; the
    /// wire rewrite happens in the codec).
    ///
    /// Returns the server-assigned resource, including server-populated
    /// defaults. A permission denial fails with
    /// [`StampsError::AccessDenied`].
    #[instrument(skip(self, attributes), fields(kind = K::TYPE))]
    pub async fn create<K: ResourceKind>(&self, attributes: AttrMap) -> Result<K, StampsError> {
        debug!("Creating {}", K::TYPE);
        let document = encode(K::TYPE, &attributes, None);
        let url = self.collection_url::<K>();
        let response = self
            .prepare(self.client.post(&url))
            .body(Self::encode_body(&document)?)
            .send()
            .await?;

        let mut resources = self.read_resources::<K>(response).await?;
        if resources.is_empty() {
            return Err(StampsError::InvalidResponse(format!(
                "create returned no {} resource",
                K::TYPE
            )));
        }
        Ok(resources.remove(0))
    }

    /// Partial-update a resource: PATCH the member URL with only the given
    /// attribute subset.
    ///
    /// On success the resource's in-memory attributes are refreshed from
    /// the patch. The patch is authoritative for the fields it names, and
    /// unaffected fields keep their local values.
    #[instrument(skip(self, resource, patch), fields(kind = K::TYPE))]
    pub async fn update<K: ResourceKind>(
        &self,
        resource: &mut K,
        patch: AttrMap,
    ) -> Result<(), StampsError> {
        let id = resource
            .id()
            .ok_or(StampsError::MissingId(K::TYPE))?
            .to_string();
        debug!("Updating {} {}", K::TYPE, id);

        let document = encode(K::TYPE, &patch, Some(&id));
        let url = self.member_url::<K>(&id);
        let response = self
            .prepare(self.client.patch(&url))
            .body(Self::encode_body(&document)?)
            .send()
            .await?;
        self.read_resources::<K>(response).await?;

        resource.resource_mut().merge_attributes(&dasherize_keys(&patch));
        Ok(())
    }

    /// Delete a resource. Returns `true` on success (including "no
    /// content"); a permission denial fails with
    /// [`StampsError::AccessDenied`].
    #[instrument(skip(self, resource), fields(kind = K::TYPE))]
    pub async fn destroy<K: ResourceKind>(&self, resource: &K) -> Result<bool, StampsError> {
        let id = resource.id().ok_or(StampsError::MissingId(K::TYPE))?;
        debug!("Deleting {} {}", K::TYPE, id);

        let url = self.member_url::<K>(id);
        let response = self.prepare(self.client.delete(&url)).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(Self::access_denied(response).await);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Stamps API error ({}): {}", status.as_u16(), message);
            return Err(StampsError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(true)
    }

    /// Invoke a declared custom action.
    ///
    /// The action must appear in the kind's static table; member-scoped
    /// actions require `id`. The body is posted as given and the response
    /// decoded exactly as a fetch: a sequence of resources, empty when the
    /// service answers with no body.
    #[instrument(skip(self, body), fields(kind = K::TYPE, action = %action))]
    pub async fn invoke<K: ResourceKind>(
        &self,
        action: &str,
        id: Option<&str>,
        body: &Value,
    ) -> Result<Vec<K>, StampsError> {
        let descriptor = K::action(action).ok_or_else(|| StampsError::UnknownAction {
            kind: K::TYPE,
            action: action.to_string(),
        })?;

        let url = match descriptor.scope {
            ActionScope::Member => {
                let id = id.ok_or(StampsError::MissingId(K::TYPE))?;
                format!("{}/{}", self.member_url::<K>(id), descriptor.name)
            }
            ActionScope::Collection => {
                format!("{}/{}", self.collection_url::<K>(), descriptor.name)
            }
        };
        debug!("Invoking {} on {}", descriptor.name, url);

        let request = match descriptor.method {
            ActionMethod::Post => self.client.post(&url),
        };
        let body = serde_json::to_vec(body).map_err(StampsError::Encode)?;
        let response = self.prepare(request).body(body).send().await?;
        self.read_resources(response).await
    }

    /// Replace a stamp's full permission set server-side.
    ///
    /// Returns the updated stamp with its `permissions` relationship
    /// populated from the response.
    pub async fn set_permissions_to(
        &self,
        stamp: &Stamp,
        permissions: &[NewPermission],
    ) -> Result<Stamp, StampsError> {
        let body = json!({ "data": permissions });
        self.invoke_one("set_permissions", stamp.id(), &body).await
    }

    /// Associate materials with a stamp.
    ///
    /// Returns the updated stamp with its `materials` relationship
    /// populated.
    pub async fn apply_to(
        &self,
        stamp: &Stamp,
        material_uuids: &[String],
    ) -> Result<Stamp, StampsError> {
        let body = json!({ "data": { "materials": material_uuids } });
        self.invoke_one("apply", stamp.id(), &body).await
    }

    /// Disassociate materials from a stamp.
    ///
    /// The returned stamp's `materials` sequence excludes the removed
    /// entries (empty if none remain).
    pub async fn unapply_to(
        &self,
        stamp: &Stamp,
        material_uuids: &[String],
    ) -> Result<Stamp, StampsError> {
        let body = json!({ "data": { "materials": material_uuids } });
        self.invoke_one("unapply", stamp.id(), &body).await
    }

    async fn invoke_one<K: ResourceKind>(
        &self,
        action: &str,
        id: Option<&str>,
        body: &Value,
    ) -> Result<K, StampsError> {
        let mut resources = self.invoke::<K>(action, id, body).await?;
        if resources.is_empty() {
            return Err(StampsError::InvalidResponse(format!(
                "{} `{}` returned no resource",
                K::TYPE,
                action
            )));
        }
        Ok(resources.remove(0))
    }

    async fn get_member<K: ResourceKind>(
        &self,
        id: &str,
        include: Option<&str>,
    ) -> Result<Vec<K>, StampsError> {
        let url = self.member_url::<K>(id);
        let mut request = self.client.get(&url);
        if let Some(relationship) = include {
            request = request.query(&[("include", relationship)]);
        }
        let response = self.prepare(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StampsError::NotFound {
                kind: K::TYPE,
                id: id.to_string(),
            });
        }
        let resources = self.read_resources(response).await?;
        if resources.is_empty() {
            return Err(StampsError::NotFound {
                kind: K::TYPE,
                id: id.to_string(),
            });
        }
        Ok(resources)
    }

    fn collection_url<K: ResourceKind>(&self) -> String {
        self.config.url(K::TYPE)
    }

    fn member_url<K: ResourceKind>(&self, id: &str) -> String {
        self.config.url(&format!("{}/{}", K::TYPE, id))
    }

    /// Set the JSON:API header pair carried on every request.
    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCEPT, MEDIA_TYPE)
            .header(CONTENT_TYPE, MEDIA_TYPE)
    }

    fn encode_body(document: &Document) -> Result<Vec<u8>, StampsError> {
        serde_json::to_vec(document).map_err(StampsError::Encode)
    }

    /// Classify a response and decode its document into resources.
    async fn read_resources<K: ResourceKind>(
        &self,
        response: Response,
    ) -> Result<Vec<K>, StampsError> {
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(Self::access_denied(response).await);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Stamps API error ({}): {}", status.as_u16(), message);
            return Err(StampsError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let document: Document = serde_json::from_str(&text)
            .map_err(|e| StampsError::InvalidResponse(e.to_string()))?;

        if let Some(errors) = document.errors {
            let message = errors
                .iter()
                .filter_map(|error| error.title.as_deref())
                .collect::<Vec<_>>()
                .join("; ");
            warn!("Stamps API errors with success status: {}", message);
            return Err(StampsError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(document
            .into_resources()
            .into_iter()
            .map(K::from_resource)
            .collect())
    }

    /// Parse a 403 body into the structured denial error. The service sends
    /// bare 403s for some operations, so an unparsable or empty body still
    /// denies, with an empty error list.
    async fn access_denied(response: Response) -> StampsError {
        let text = response.text().await.unwrap_or_default();
        let errors = serde_json::from_str::<Document>(&text)
            .ok()
            .and_then(|document| document.errors)
            .unwrap_or_default();
        warn!("Stamps access denied ({} error objects)", errors.len());
        StampsError::AccessDenied { errors }
    }
}
