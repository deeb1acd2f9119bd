//! Decoded resources and per-kind declarations.
//!
//! A [`Resource`] is the decoded form of a wire resource object: identity,
//! an ordered attribute map under wire key names, and relationship fields
//! populated from compound documents. The [`ResourceKind`] trait is the seam
//! between the generic fetch/dispatch machinery and the typed kinds: each
//! kind declares its wire type name and its static custom-action table.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::document::AttrMap;

/// A typed, identified entity exchanged with the service.
///
/// Value-like once fetched, but mutable locally: attribute edits stay local
/// until an update call round-trips them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    kind: String,
    id: Option<String>,
    attributes: AttrMap,
    relationships: BTreeMap<String, Vec<Resource>>,
}

impl Resource {
    /// Create an empty, not-yet-persisted resource of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            attributes: AttrMap::new(),
            relationships: BTreeMap::new(),
        }
    }

    /// Create a resource with identity and attributes, as produced by the
    /// wire codec.
    pub fn with_attributes(
        kind: impl Into<String>,
        id: Option<String>,
        attributes: AttrMap,
    ) -> Self {
        Self {
            kind: kind.into(),
            id,
            attributes,
            relationships: BTreeMap::new(),
        }
    }

    /// Wire type name of this resource.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Server-assigned identifier; `None` only before the resource has been
    /// created.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The full attribute map, keyed by wire attribute name.
    pub fn attributes(&self) -> &AttrMap {
        &self.attributes
    }

    /// Look up an attribute value by wire name.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Look up a string attribute by wire name.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    /// Set a local attribute value under its wire name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// Merge a patch into the attribute map, overwriting the named fields
    /// and leaving every other attribute untouched.
    pub fn merge_attributes(&mut self, patch: &AttrMap) {
        for (name, value) in patch {
            self.attributes.insert(name.clone(), value.clone());
        }
    }

    /// The named relationship, if it was populated by a compound-document
    /// fetch. An empty slice means the server reported zero related
    /// resources; `None` means the relationship was not requested.
    pub fn relationship(&self, name: &str) -> Option<&[Resource]> {
        self.relationships.get(name).map(Vec::as_slice)
    }

    /// Replace a relationship field with the resources decoded for it.
    pub fn set_relationship(&mut self, name: impl Into<String>, related: Vec<Resource>) {
        self.relationships.insert(name.into(), related);
    }
}

/// Scope of a custom action: where its URL is rooted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionScope {
    /// `<collection>/<id>/<name>`: acts on one resource.
    Member,
    /// `<collection>/<name>`: acts on the resource kind as a whole.
    Collection,
}

/// HTTP method of a custom action.
///
/// Every action the service exposes today posts; the method is still part
/// of the declaration so the dispatcher never hardcodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMethod {
    /// HTTP POST.
    Post,
}

/// A declared non-CRUD endpoint on a resource kind.
///
/// Kinds declare these in a static table; the dispatcher consults the table
/// at invocation and rejects unknown action names client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomAction {
    /// Action name, appended to the scope URL.
    pub name: &'static str,
    /// Member or collection scope.
    pub scope: ActionScope,
    /// HTTP method.
    pub method: ActionMethod,
}

/// A typed resource kind: wire type name, custom-action table, and
/// conversions to and from the decoded [`Resource`] form.
pub trait ResourceKind: Sized {
    /// Wire type name, also the collection URL segment.
    const TYPE: &'static str;

    /// Declared custom actions; empty for plain-CRUD kinds.
    const ACTIONS: &'static [CustomAction] = &[];

    /// Wrap a decoded resource.
    fn from_resource(resource: Resource) -> Self;

    /// Borrow the underlying resource.
    fn resource(&self) -> &Resource;

    /// Mutably borrow the underlying resource.
    fn resource_mut(&mut self) -> &mut Resource;

    /// Server-assigned identifier.
    fn id(&self) -> Option<&str> {
        self.resource().id()
    }

    /// Look up a declared custom action by name.
    fn action(name: &str) -> Option<&'static CustomAction> {
        Self::ACTIONS.iter().find(|action| action.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_resource_has_no_id() {
        let resource = Resource::new("stamps");
        assert_eq!(resource.kind(), "stamps");
        assert!(resource.id().is_none());
        assert!(resource.attributes().is_empty());
    }

    #[test]
    fn test_attribute_access() {
        let mut resource = Resource::new("stamps");
        resource.set_attr("name", json!("stamp1"));
        resource.set_attr("owner-id", json!("jeff"));

        assert_eq!(resource.attr_str("name"), Some("stamp1"));
        assert_eq!(resource.attr_str("owner-id"), Some("jeff"));
        assert!(resource.attr("missing").is_none());
    }

    #[test]
    fn test_merge_attributes_overwrites_only_named_fields() {
        let mut resource = Resource::new("stamps");
        resource.set_attr("name", json!("stamp1"));
        resource.set_attr("owner-id", json!("jeff"));

        let mut patch = AttrMap::new();
        patch.insert("name".to_string(), json!("newname"));
        resource.merge_attributes(&patch);

        assert_eq!(resource.attr_str("name"), Some("newname"));
        assert_eq!(resource.attr_str("owner-id"), Some("jeff"));
    }

    #[test]
    fn test_relationship_absent_vs_empty() {
        let mut resource = Resource::new("stamps");
        assert!(resource.relationship("permissions").is_none());

        resource.set_relationship("permissions", Vec::new());
        assert!(resource.relationship("permissions").unwrap().is_empty());
    }
}
