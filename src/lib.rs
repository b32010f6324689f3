//! Graphics Mesh - non-indexed meshes over owned vertex buffers
//!
//! A [`Mesh`] owns one or more vertex buffers, maps typed vertex attributes
//! onto byte ranges of those buffers, and submits attribute bindings and a
//! draw call to a [`GraphicsContext`].
//!
//! # Backends
//! - [`RecordingBackend`]: records commands without touching a GPU
//! - `GlBackend` (feature `gl`): OpenGL via glow
//!
//! # Example
//!
//! ```ignore
//! use graphics_mesh::{generic3d, Mesh, MeshDescriptor, Primitive, RecordingBackend};
//!
//! let backend = Rc::new(RecordingBackend::new());
//! let mut mesh = Mesh::new(backend.clone(), MeshDescriptor::new(Primitive::Triangles, 3));
//! let vertices = mesh.add_buffer(true)?;
//! mesh.bind(vertices, generic3d::POSITION)?;
//! mesh.draw(backend.as_ref())?;
//! ```

pub mod backend;
pub mod resources;

pub use backend::{
    BackendError, BackendResult, BufferBackend, BufferId, BufferUsage, Command, ComponentType,
    GraphicsContext, Primitive, RecordingBackend, VertexComponent,
};
#[cfg(feature = "gl")]
pub use backend::GlBackend;
pub use resources::{
    generic2d, generic3d, Attribute, AttributeLocation, Buffer, BufferHandle, Mesh,
    MeshDescriptor, MeshError, TypedAttribute,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version. Call once after installing a logger.
pub fn init() {
    log::info!("Graphics Mesh v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_recording_backend() {
        let backend = RecordingBackend::new();
        assert_eq!(backend.name(), "Recording");
    }
}
