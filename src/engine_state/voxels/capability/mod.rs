//! # Capability System
//!
//! Orthogonal behaviors attached to an owning object at runtime.
//!
//! A capability is a closed set of variants ([`Capability`]) rather than a type
//! hierarchy. Each variant declares a [`CapabilityRequirement`] that is checked
//! against the owner when the capability is attached; a failed check rejects the
//! attach with [`CapabilityError::TypeMismatch`] and leaves the owner untouched.
//!
//! Capabilities are never detached and live exactly as long as their owner.
//!
//! ## Owners
//!
//! Anything implementing [`CapabilityOwner`] can carry capabilities. Owners that
//! sit on a grid cell also implement [`Placeable`], which is what the lighting
//! capability requires.

use std::slice::Iter;

use cgmath::{Point3, Vector2};
use thiserror::Error;

pub mod debug;
pub mod lighting;

pub use debug::DebugCapability;
pub use lighting::LightingCapability;

/// Errors raised when attaching a capability.
#[derive(Debug, Error, PartialEq)]
pub enum CapabilityError {
    /// The owner does not satisfy the capability's requirement
    #[error("{capability} capability requires a {required} owner, got {owner}")]
    TypeMismatch {
        /// Capability being attached
        capability: &'static str,
        /// What the capability needed
        required: &'static str,
        /// Identity of the rejected owner
        owner: String,
    },
}

/// What a capability needs from its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CapabilityRequirement {
    /// Any owner
    Any,
    /// An owner occupying a grid cell
    Placeable,
}

impl CapabilityRequirement {
    /// Whether `owner` meets the requirement.
    pub fn is_met_by(self, owner: &dyn CapabilityOwner) -> bool {
        match self {
            CapabilityRequirement::Any => true,
            CapabilityRequirement::Placeable => owner.as_placeable().is_some(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            CapabilityRequirement::Any => "any",
            CapabilityRequirement::Placeable => "placeable",
        }
    }
}

/// An object positioned on a grid cell.
pub trait Placeable {
    /// Global block position.
    fn location(&self) -> Point3<i32>;

    /// Chunk column derived from [`Placeable::location`].
    fn chunk_location(&self) -> Vector2<i32>;

    /// Position relative to the chunk column's origin.
    fn local_location(&self) -> Point3<i32>;
}

/// An object that can carry capabilities.
pub trait CapabilityOwner {
    /// Short human-readable identity, e.g. `block container2`.
    fn identity(&self) -> String;

    /// Labelled state lines included in diagnostic dumps.
    fn state(&self) -> Vec<(&'static str, String)>;

    /// The owner as a grid-placed object, if it is one.
    fn as_placeable(&self) -> Option<&dyn Placeable> {
        None
    }

    /// Capabilities attached so far.
    fn capabilities(&self) -> &CapabilitySet;

    /// Mutable access used by [`CapabilityOwner::attach`].
    fn capabilities_mut(&mut self) -> &mut CapabilitySet;

    /// Attaches `capability`, running its apply action against this owner first.
    ///
    /// # Returns
    /// `Err(TypeMismatch)` if the owner does not meet the capability's requirement.
    /// Nothing is appended on failure.
    fn attach(&mut self, mut capability: Capability) -> Result<(), CapabilityError>
    where
        Self: Sized,
    {
        capability.apply(&*self)?;
        self.capabilities_mut().push(capability);
        Ok(())
    }
}

/// A behavior attached to a [`CapabilityOwner`].
#[derive(Clone, Debug, PartialEq)]
pub enum Capability {
    /// Read-only diagnostic dump of the owner
    Debug(DebugCapability),
    /// Point light emitted from the owner's cell
    Lighting(LightingCapability),
}

impl Capability {
    /// Name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Debug(_) => "debug",
            Capability::Lighting(_) => "lighting",
        }
    }

    /// Requirement checked against the owner at attach time.
    pub fn requirement(&self) -> CapabilityRequirement {
        match self {
            Capability::Debug(_) => CapabilityRequirement::Any,
            Capability::Lighting(_) => CapabilityRequirement::Placeable,
        }
    }

    /// Validates the owner and binds the capability to it.
    fn apply(&mut self, owner: &dyn CapabilityOwner) -> Result<(), CapabilityError> {
        let requirement = self.requirement();
        if !requirement.is_met_by(owner) {
            return Err(CapabilityError::TypeMismatch {
                capability: self.name(),
                required: requirement.name(),
                owner: owner.identity(),
            });
        }

        match self {
            Capability::Debug(_) => {}
            Capability::Lighting(lighting) => {
                if let Some(placeable) = owner.as_placeable() {
                    lighting.bind(placeable);
                }
            }
        }
        Ok(())
    }
}

/// Ordered capabilities of one owner. Insertion order is lookup order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapabilitySet {
    items: Vec<Capability>,
}

impl CapabilitySet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only a diagnostic capability.
    ///
    /// Debug has no owner requirement, so every owner starts with one without
    /// going through [`CapabilityOwner::attach`].
    pub(crate) fn with_debug() -> Self {
        Self {
            items: vec![Capability::Debug(DebugCapability::new())],
        }
    }

    fn push(&mut self, capability: Capability) {
        self.items.push(capability);
    }

    /// First capability matching `predicate`, in insertion order.
    pub fn find(&self, predicate: impl Fn(&Capability) -> bool) -> Option<&Capability> {
        self.items.iter().find(|capability| predicate(capability))
    }

    /// First lighting capability.
    pub fn lighting(&self) -> Option<&LightingCapability> {
        self.items.iter().find_map(|capability| match capability {
            Capability::Lighting(lighting) => Some(lighting),
            _ => None,
        })
    }

    /// First debug capability.
    pub fn debug(&self) -> Option<&DebugCapability> {
        self.items.iter().find_map(|capability| match capability {
            Capability::Debug(debug) => Some(debug),
            _ => None,
        })
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> Iter<'_, Capability> {
        self.items.iter()
    }

    /// Number of attached capabilities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::lighting::PointLight;
    use cgmath::Vector3;

    /// Owner that is not placed on the grid.
    struct Floating {
        capabilities: CapabilitySet,
    }

    impl CapabilityOwner for Floating {
        fn identity(&self) -> String {
            "floating".to_string()
        }

        fn state(&self) -> Vec<(&'static str, String)> {
            vec![]
        }

        fn capabilities(&self) -> &CapabilitySet {
            &self.capabilities
        }

        fn capabilities_mut(&mut self) -> &mut CapabilitySet {
            &mut self.capabilities
        }
    }

    /// Owner sitting on a fixed cell.
    struct Pinned {
        cell: Point3<i32>,
        capabilities: CapabilitySet,
    }

    impl Placeable for Pinned {
        fn location(&self) -> Point3<i32> {
            self.cell
        }

        fn chunk_location(&self) -> Vector2<i32> {
            Vector2::new(0, 0)
        }

        fn local_location(&self) -> Point3<i32> {
            self.cell
        }
    }

    impl CapabilityOwner for Pinned {
        fn identity(&self) -> String {
            "pinned".to_string()
        }

        fn state(&self) -> Vec<(&'static str, String)> {
            vec![("cell", format!("{:?}", self.cell))]
        }

        fn as_placeable(&self) -> Option<&dyn Placeable> {
            Some(self)
        }

        fn capabilities(&self) -> &CapabilitySet {
            &self.capabilities
        }

        fn capabilities_mut(&mut self) -> &mut CapabilitySet {
            &mut self.capabilities
        }
    }

    fn lamp() -> Capability {
        Capability::Lighting(LightingCapability::new(PointLight {
            position: cgmath::Point3::new(1.0, 2.0, 3.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            ambient: Vector3::new(0.8, 0.8, 0.8),
            diffuse: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(0.0, 0.0, 0.0),
        }))
    }

    #[test]
    fn find_returns_first_match_in_insertion_order() {
        let mut owner = Floating {
            capabilities: CapabilitySet::new(),
        };
        owner.attach(Capability::Debug(DebugCapability::new())).unwrap();
        owner.attach(Capability::Debug(DebugCapability::new())).unwrap();

        let first = owner.capabilities().iter().next();
        let found = owner
            .capabilities()
            .find(|c| matches!(c, Capability::Debug(_)));
        assert!(std::ptr::eq(found.unwrap(), first.unwrap()));
    }

    #[test]
    fn find_without_match_is_none() {
        let owner = Floating {
            capabilities: CapabilitySet::new(),
        };
        assert!(owner
            .capabilities()
            .find(|c| matches!(c, Capability::Lighting(_)))
            .is_none());
        assert!(owner.capabilities().lighting().is_none());
    }

    #[test]
    fn lighting_on_unplaced_owner_is_a_type_mismatch() {
        let mut owner = Floating {
            capabilities: CapabilitySet::new(),
        };
        owner.attach(Capability::Debug(DebugCapability::new())).unwrap();

        let err = owner.attach(lamp()).unwrap_err();
        assert!(matches!(err, CapabilityError::TypeMismatch { capability: "lighting", .. }));
        assert_eq!(owner.capabilities().len(), 1);
        assert!(owner.capabilities().debug().is_some());
    }

    #[test]
    fn with_debug_starts_with_one_diagnostic_capability() {
        let set = CapabilitySet::with_debug();
        assert_eq!(set.len(), 1);
        assert!(set.debug().is_some());
        assert!(set.lighting().is_none());
    }

    #[test]
    fn lighting_binds_to_the_owner_cell() {
        let mut owner = Pinned {
            cell: Point3::new(5, 2, 5),
            capabilities: CapabilitySet::new(),
        };
        owner.attach(lamp()).unwrap();

        let lighting = owner.capabilities().lighting().unwrap();
        assert_eq!(lighting.cell(), Some(Point3::new(5, 2, 5)));
    }
}
