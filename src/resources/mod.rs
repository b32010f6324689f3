//! Mesh resources
//!
//! Meshes, the buffers they own, and the attribute definitions bound to them.

pub mod attribute;
mod buffer;
mod mesh;

pub use attribute::{generic2d, generic3d, Attribute, AttributeLocation, TypedAttribute};
pub use buffer::Buffer;
pub use mesh::{BufferHandle, Mesh, MeshDescriptor, MeshError};
