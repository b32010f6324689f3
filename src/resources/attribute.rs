//! Vertex attribute definitions
//!
//! An [`AttributeLocation`] names a shader input slot. A [`TypedAttribute`]
//! pairs a location with the Rust type fed to it, so shader families can
//! publish their inputs as constants (see [`generic2d`] and [`generic3d`]).
//! An [`Attribute`] is the record a mesh keeps for every bound attribute,
//! including the stride and offset computed when the mesh is finalized.

use std::fmt;
use std::marker::PhantomData;

use crate::backend::types::{ComponentType, VertexComponent};

/// Shader attribute location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeLocation(u32);

impl AttributeLocation {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl From<u32> for AttributeLocation {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for AttributeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bound vertex attribute.
///
/// `stride` and `offset` are zero until the owning mesh is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub location: AttributeLocation,
    pub components: u32,
    pub component_type: ComponentType,
    pub stride: u64,
    pub offset: u64,
}

impl Attribute {
    pub(crate) fn new<T: VertexComponent>(location: AttributeLocation) -> Self {
        Self {
            location,
            components: T::COMPONENTS,
            component_type: T::TYPE,
            stride: 0,
            offset: 0,
        }
    }

    /// Size in bytes of one value of this attribute
    pub fn byte_size(&self) -> u64 {
        self.components as u64 * self.component_type.size()
    }
}

/// Attribute location tagged with the type it is fed with
pub struct TypedAttribute<T: VertexComponent> {
    location: AttributeLocation,
    _marker: PhantomData<fn() -> T>,
}

impl<T: VertexComponent> TypedAttribute<T> {
    pub const fn new(location: u32) -> Self {
        Self {
            location: AttributeLocation::new(location),
            _marker: PhantomData,
        }
    }

    pub fn location(&self) -> AttributeLocation {
        self.location
    }
}

impl<T: VertexComponent> Clone for TypedAttribute<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: VertexComponent> Copy for TypedAttribute<T> {}

impl<T: VertexComponent> fmt::Debug for TypedAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAttribute")
            .field("location", &self.location)
            .field("components", &T::COMPONENTS)
            .field("component_type", &T::TYPE)
            .finish()
    }
}

/// Generic attributes shared by the 2D shaders (flat, vector, distance field
/// vector, vertex color).
pub mod generic2d {
    use super::TypedAttribute;
    use glam::{Vec2, Vec3, Vec4};

    pub const POSITION: TypedAttribute<Vec2> = TypedAttribute::new(0);
    pub const TEXTURE_COORDINATES: TypedAttribute<Vec2> = TypedAttribute::new(1);
    /// Three-component vertex color
    pub const COLOR3: TypedAttribute<Vec3> = TypedAttribute::new(3);
    /// Four-component vertex color, same location as [`COLOR3`]
    pub const COLOR4: TypedAttribute<Vec4> = TypedAttribute::new(3);
}

/// Generic attributes shared by the 3D shaders (phong, flat, mesh
/// visualizer, vertex color).
pub mod generic3d {
    use super::TypedAttribute;
    use glam::{Vec2, Vec3, Vec4};

    pub const POSITION: TypedAttribute<Vec3> = TypedAttribute::new(0);
    pub const TEXTURE_COORDINATES: TypedAttribute<Vec2> = TypedAttribute::new(1);
    pub const NORMAL: TypedAttribute<Vec3> = TypedAttribute::new(2);
    pub const COLOR3: TypedAttribute<Vec3> = TypedAttribute::new(3);
    pub const COLOR4: TypedAttribute<Vec4> = TypedAttribute::new(3);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_attribute_from_type() {
        let attribute = Attribute::new::<Vec3>(AttributeLocation::new(2));
        assert_eq!(attribute.components, 3);
        assert_eq!(attribute.component_type, ComponentType::Float);
        assert_eq!(attribute.byte_size(), 12);
        assert_eq!(attribute.stride, 0);
        assert_eq!(attribute.offset, 0);
    }

    #[test]
    fn test_generic_locations() {
        assert_eq!(generic3d::POSITION.location().index(), 0);
        assert_eq!(generic3d::NORMAL.location().index(), 2);
        assert_eq!(generic2d::COLOR3.location(), generic2d::COLOR4.location());
    }

    #[test]
    fn test_location_from_u32() {
        let location: AttributeLocation = 5.into();
        assert_eq!(location, AttributeLocation::new(5));
        assert_eq!(location.to_string(), "5");
    }
}
