//! JSON:API wire codec.
//!
//! Converts between the normalized in-memory attribute map and the JSON:API
//! documents the Stamps service speaks: top-level `data`/`included`/`errors`,
//! `type`/`id`/`attributes`/`relationships` resource objects, dash-separated
//! wire attribute keys. Decoding resolves the `included` section against
//! relationship reference lists so callers receive materialized resources
//! rather than bare `{type, id}` pairs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::resource::Resource;

/// Media type carried on `Accept` and `Content-Type` for every request and
/// response exchanged with the service.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Ordered attribute map, keyed by wire attribute name.
///
/// serde_json's `preserve_order` feature keeps entries in the order they
/// appear on the wire.
pub type AttrMap = Map<String, Value>;

/// Rewrite an in-memory attribute key to its wire form (`owner_id` →
/// `owner-id`). Keys without underscores pass through unchanged.
pub fn dasherize(key: &str) -> String {
    key.replace('_', "-")
}

/// Rewrite every key of an attribute map to its wire form.
///
/// Only top-level keys are rewritten; nested values are carried verbatim.
pub fn dasherize_keys(attributes: &AttrMap) -> AttrMap {
    attributes
        .iter()
        .map(|(key, value)| (dasherize(key), value.clone()))
        .collect()
}

/// A top-level JSON:API document.
///
/// A response carries either `data` (with optional `included`) or `errors`,
/// never a meaningful mix; a document with `errors` is classified as a
/// failure and is never decoded into resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Primary data: a single resource object or an ordered array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,

    /// Side-loaded related resources for compound documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,

    /// Error objects, present on failure responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,
}

/// Primary `data` member: singular or plural.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// A single resource object (`GET /stamps/{id}`).
    One(ResourceObject),
    /// An ordered array of resource objects (`GET /stamps`).
    Many(Vec<ResourceObject>),
}

/// A resource object as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceObject {
    /// Wire type name (`stamps`, `permissions`, `materials`, `deputies`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Server-assigned identifier; absent on not-yet-created resources.
    ///
    /// The service occasionally emits numeric ids; they are normalized to
    /// strings on decode.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    pub id: Option<String>,

    /// Attribute map under wire key names.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: AttrMap,

    /// Relationship name → reference list. Absent on plain fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
}

/// A single relationship member.
///
/// Responses without inclusion carry only `links` here (ignored); responses
/// to an `include=` request carry `data` reference lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Resource linkage: references into the `included` section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
}

/// Relationship linkage: to-one or to-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// A single reference.
    One(ResourceIdentifier),
    /// An ordered reference list; may be empty.
    Many(Vec<ResourceIdentifier>),
}

/// A `{type, id}` reference pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Wire type name of the referenced resource.
    #[serde(rename = "type")]
    pub kind: String,

    /// Identifier of the referenced resource; numeric ids are normalized to
    /// strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

/// A JSON:API error object.
///
/// The permission-check denial response extends the standard shape with
/// `material_uuids`, the subset of material identifiers that failed the
/// check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// HTTP status, as a string (`"403"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Short, human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Human-readable explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Unpermitted material identifiers on a permission-check denial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_uuids: Option<Vec<String>>,
}

/// Build the request document for a create or update call.
///
/// Produces `{ data: { type, id?, attributes } }` with attribute keys
/// rewritten from the in-memory underscore convention to the dasherized
/// wire convention.
pub fn encode(kind: &str, attributes: &AttrMap, id: Option<&str>) -> Document {
    Document {
        data: Some(PrimaryData::One(ResourceObject {
            kind: kind.to_string(),
            id: id.map(str::to_string),
            attributes: dasherize_keys(attributes),
            relationships: None,
        })),
        included: None,
        errors: None,
    }
}

impl Document {
    /// Decode the primary data into resources, resolving `included` against
    /// relationship reference lists.
    ///
    /// A singular `data` yields a one-element sequence so that find-by-id
    /// and find-all share a result shape. Order is preserved from the wire.
    /// A relationship whose linkage is an empty array decodes to an empty
    /// sequence (present, not absent); a reference with no matching
    /// `included` entry materializes as an id-only resource with no
    /// attributes. Documents carrying `errors` decode to an empty sequence;
    /// callers classify those before decoding.
    pub fn into_resources(self) -> Vec<Resource> {
        if self.errors.is_some() {
            return Vec::new();
        }

        let index: HashMap<(String, String), ResourceObject> = self
            .included
            .unwrap_or_default()
            .into_iter()
            .filter_map(|object| {
                let id = object.id.clone()?;
                Some(((object.kind.clone(), id), object))
            })
            .collect();

        match self.data {
            None => Vec::new(),
            Some(PrimaryData::One(object)) => vec![materialize(object, &index)],
            Some(PrimaryData::Many(objects)) => objects
                .into_iter()
                .map(|object| materialize(object, &index))
                .collect(),
        }
    }
}

/// Turn a wire resource object into a decoded resource, populating
/// relationship fields from the included index.
///
/// Included resources are materialized shallowly: their own relationships
/// are not resolved, which rules out reference cycles.
fn materialize(object: ResourceObject, index: &HashMap<(String, String), ResourceObject>) -> Resource {
    let mut resource = Resource::with_attributes(object.kind, object.id, object.attributes);

    if let Some(relationships) = object.relationships {
        for (name, relationship) in relationships {
            let data = match relationship.data {
                Some(data) => data,
                None => continue,
            };
            let references = match data {
                RelationshipData::One(identifier) => vec![identifier],
                RelationshipData::Many(identifiers) => identifiers,
            };
            let related = references
                .into_iter()
                .map(|identifier| {
                    match index.get(&(identifier.kind.clone(), identifier.id.clone())) {
                        Some(object) => Resource::with_attributes(
                            object.kind.clone(),
                            object.id.clone(),
                            object.attributes.clone(),
                        ),
                        None => Resource::with_attributes(
                            identifier.kind,
                            Some(identifier.id),
                            AttrMap::new(),
                        ),
                    }
                })
                .collect();
            resource.set_relationship(name, related);
        }
    }

    resource
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid resource id: {}",
            other
        ))),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid resource id: {}",
            other
        ))),
    }
}
