//! The typed resource kinds: Stamp, Permission, Material, Deputy.
//!
//! Each kind is a thin wrapper over [`Resource`] with read-only accessors
//! projecting the attribute map; accessors never touch the network. Custom
//! actions are declared here as static tables consulted by the dispatcher.

use serde::Serialize;

use crate::permission_type::PermissionType;
use crate::resource::{ActionMethod, ActionScope, CustomAction, Resource, ResourceKind};

/// A stamp: a named grant of authority over materials.
///
/// Wire type `stamps`, attributes `name` and `owner-id`. Relationships
/// `permissions` and `materials` are populated only by compound-document
/// fetches (`?include=`).
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    resource: Resource,
}

impl ResourceKind for Stamp {
    const TYPE: &'static str = "stamps";

    const ACTIONS: &'static [CustomAction] = &[
        CustomAction {
            name: "set_permissions",
            scope: ActionScope::Member,
            method: ActionMethod::Post,
        },
        CustomAction {
            name: "apply",
            scope: ActionScope::Member,
            method: ActionMethod::Post,
        },
        CustomAction {
            name: "unapply",
            scope: ActionScope::Member,
            method: ActionMethod::Post,
        },
    ];

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Stamp {
    /// Stamp name.
    pub fn name(&self) -> Option<&str> {
        self.resource.attr_str("name")
    }

    /// Identifier of the owning actor.
    pub fn owner_id(&self) -> Option<&str> {
        self.resource.attr_str("owner-id")
    }

    /// Permissions side-loaded by a `?include=permissions` fetch.
    ///
    /// Empty when the stamp has no permissions, and also when the stamp was
    /// fetched without inclusion, since accessors never go to the network.
    pub fn permissions(&self) -> Vec<Permission> {
        self.related("permissions")
    }

    /// Materials side-loaded by a `?include=materials` fetch.
    pub fn materials(&self) -> Vec<Material> {
        self.related("materials")
    }

    fn related<K: ResourceKind>(&self, name: &str) -> Vec<K> {
        self.resource
            .relationship(name)
            .unwrap_or(&[])
            .iter()
            .cloned()
            .map(K::from_resource)
            .collect()
    }
}

/// A permission: an actor's authority of a given type over an accessible
/// entity.
///
/// Wire type `permissions`, attributes `permission-type`, `permitted` and
/// `accessible-id`. Reached directly by id or through a stamp's
/// `permissions` relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Permission {
    resource: Resource,
}

impl ResourceKind for Permission {
    const TYPE: &'static str = "permissions";

    const ACTIONS: &'static [CustomAction] = &[CustomAction {
        name: "check",
        scope: ActionScope::Collection,
        method: ActionMethod::Post,
    }];

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Permission {
    /// The permission-type symbol. Unknown server symbols pass through as
    /// [`PermissionType::Other`].
    pub fn permission_type(&self) -> Option<PermissionType> {
        self.resource
            .attr_str("permission-type")
            .map(PermissionType::parse)
    }

    /// The permitted actor (e.g. an email address).
    pub fn permitted(&self) -> Option<&str> {
        self.resource.attr_str("permitted")
    }

    /// Identifier of the entity this permission applies to.
    pub fn accessible_id(&self) -> Option<&str> {
        self.resource.attr_str("accessible-id")
    }
}

/// A material: an external entity a stamp can be applied to.
///
/// Wire type `materials`, attributes `material-uuid` (a stable external
/// identifier, distinct from the resource id) and `stamp-id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    resource: Resource,
}

impl ResourceKind for Material {
    const TYPE: &'static str = "materials";

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Material {
    /// Stable external identifier of the material.
    pub fn material_uuid(&self) -> Option<&str> {
        self.resource.attr_str("material-uuid")
    }

    /// Identifier of the stamp currently applied to this material.
    pub fn stamp_id(&self) -> Option<&str> {
        self.resource.attr_str("stamp-id")
    }
}

/// A deputy: an actor granted delegate authority by a user.
///
/// Wire type `deputies`. This is the one kind whose wire attribute keys are
/// underscore-form (`user_email`, `deputy`), part of the service's
/// existing contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Deputy {
    resource: Resource,
}

impl ResourceKind for Deputy {
    const TYPE: &'static str = "deputies";

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Deputy {
    /// Email of the delegating user.
    pub fn user_email(&self) -> Option<&str> {
        self.resource.attr_str("user_email")
    }

    /// The actor granted delegate authority.
    pub fn deputy(&self) -> Option<&str> {
        self.resource.attr_str("deputy")
    }
}

/// One entry of a `set_permissions` request: the permission to grant,
/// serialized under wire key names.
#[derive(Debug, Clone, Serialize)]
pub struct NewPermission {
    /// Permission-type symbol.
    #[serde(rename = "permission-type")]
    pub permission_type: PermissionType,
    /// The actor to permit.
    pub permitted: String,
}
