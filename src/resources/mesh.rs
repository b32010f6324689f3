//! Non-indexed mesh
//!
//! A [`Mesh`] owns its vertex buffers and remembers which attribute reads
//! from which buffer. Layout is computed once, when the mesh is finalized
//! (explicitly or by the first [`Mesh::draw`]):
//!
//! - **Interleaved** buffers store all attributes of one vertex next to each
//!   other. The stride is the sum of the attribute sizes, and each offset is
//!   the sum of the sizes of the attributes bound before it.
//! - **Non-interleaved** buffers store each attribute as one contiguous run
//!   over all vertices. The stride is zero (tightly packed), and each offset
//!   is the vertex count times the sum of the sizes bound before it.
//!
//! # Example
//!
//! ```ignore
//! let backend = Rc::new(RecordingBackend::new());
//! let mut mesh = Mesh::new(backend.clone(), MeshDescriptor::new(Primitive::Triangles, 3));
//!
//! let vertices = mesh.add_buffer(true)?;
//! mesh.bind(vertices, generic3d::POSITION)?;
//! mesh.bind(vertices, generic3d::NORMAL)?;
//! mesh.buffer_mut(vertices).unwrap().set_pod_data(&data, BufferUsage::StaticDraw)?;
//!
//! mesh.draw(backend.as_ref())?;
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::backend::{BackendError, BufferBackend, GraphicsContext, Primitive, VertexComponent};

use super::attribute::{Attribute, AttributeLocation, TypedAttribute};
use super::buffer::Buffer;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a buffer owned by a particular mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    mesh: MeshId,
    index: usize,
}

impl BufferHandle {
    /// Position of the buffer in its mesh, in creation order
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Mesh error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Attribute location {location} is already bound")]
    InvalidRebind { location: AttributeLocation },
    #[error("Buffer is not owned by this mesh")]
    ForeignBuffer,
    #[error("Mesh is already finalized")]
    LateBind,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Parameters fixed at mesh creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshDescriptor {
    pub primitive: Primitive,
    pub vertex_count: u32,
    pub label: Option<String>,
}

impl MeshDescriptor {
    pub fn new(primitive: Primitive, vertex_count: u32) -> Self {
        Self {
            primitive,
            vertex_count,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

struct MeshBuffer {
    buffer: Buffer,
    interleaved: bool,
    attributes: Vec<Attribute>,
}

/// A non-indexed mesh over owned vertex buffers.
pub struct Mesh {
    id: MeshId,
    backend: Rc<dyn BufferBackend>,
    primitive: Primitive,
    vertex_count: u32,
    label: Option<String>,
    finalized: bool,
    buffers: Vec<MeshBuffer>,
    bound: BTreeSet<AttributeLocation>,
}

impl Mesh {
    pub fn new(backend: Rc<dyn BufferBackend>, descriptor: MeshDescriptor) -> Self {
        Self {
            id: MeshId::next(),
            backend,
            primitive: descriptor.primitive,
            vertex_count: descriptor.vertex_count,
            label: descriptor.label,
            finalized: false,
            buffers: Vec::new(),
            bound: BTreeSet::new(),
        }
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Add a new buffer owned by this mesh.
    ///
    /// `interleaved` selects whether attributes bound to the buffer are stored
    /// per vertex (interleaved) or one after another (non-interleaved).
    pub fn add_buffer(&mut self, interleaved: bool) -> Result<BufferHandle, MeshError> {
        if self.finalized {
            return Err(MeshError::LateBind);
        }

        let buffer = Buffer::new(self.backend.clone())?;
        let handle = BufferHandle {
            mesh: self.id,
            index: self.buffers.len(),
        };
        self.buffers.push(MeshBuffer {
            buffer,
            interleaved,
            attributes: Vec::new(),
        });
        Ok(handle)
    }

    /// Bind an attribute of type `T` at `location` to `buffer`.
    ///
    /// A rejected bind leaves the mesh unchanged.
    pub fn bind_attribute<T: VertexComponent>(
        &mut self,
        buffer: BufferHandle,
        location: AttributeLocation,
    ) -> Result<(), MeshError> {
        let result = self.try_bind(buffer, Attribute::new::<T>(location));
        if let Err(err) = &result {
            log::debug!(
                "Mesh {:?}: rejected binding of location {}: {}",
                self.label,
                location,
                err
            );
        }
        result
    }

    /// Bind a typed attribute definition to `buffer`.
    pub fn bind<T: VertexComponent>(
        &mut self,
        buffer: BufferHandle,
        attribute: TypedAttribute<T>,
    ) -> Result<(), MeshError> {
        self.bind_attribute::<T>(buffer, attribute.location())
    }

    fn try_bind(&mut self, buffer: BufferHandle, attribute: Attribute) -> Result<(), MeshError> {
        if self.finalized {
            return Err(MeshError::LateBind);
        }
        let index = self.resolve(buffer).ok_or(MeshError::ForeignBuffer)?;
        if !self.bound.insert(attribute.location) {
            return Err(MeshError::InvalidRebind {
                location: attribute.location,
            });
        }
        self.buffers[index].attributes.push(attribute);
        Ok(())
    }

    fn resolve(&self, buffer: BufferHandle) -> Option<usize> {
        (buffer.mesh == self.id && buffer.index < self.buffers.len()).then_some(buffer.index)
    }

    /// Compute stride and offset of every bound attribute.
    ///
    /// Only the first call has an effect; no attributes can be bound after it.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }

        let vertex_count = self.vertex_count as u64;
        for entry in &mut self.buffers {
            let stride = if entry.interleaved {
                entry.attributes.iter().map(Attribute::byte_size).sum()
            } else {
                0
            };

            let mut offset = 0;
            for attribute in &mut entry.attributes {
                attribute.stride = stride;
                attribute.offset = offset;
                offset += if entry.interleaved {
                    attribute.byte_size()
                } else {
                    attribute.byte_size() * vertex_count
                };
            }
        }

        self.finalized = true;
        log::debug!(
            "Mesh {:?}: finalized {} buffers, {} attributes",
            self.label,
            self.buffers.len(),
            self.bound.len()
        );
    }

    /// Bind all attributes and draw the mesh.
    ///
    /// Finalizes the mesh on first use. Expects an active shader with all
    /// uniforms set on `ctx`. Every attribute is validated against `ctx`
    /// before the first bind, so a rejected draw submits nothing.
    pub fn draw<C: GraphicsContext + ?Sized>(&mut self, ctx: &C) -> Result<(), MeshError> {
        self.finalize();

        for entry in &self.buffers {
            for attribute in &entry.attributes {
                ctx.validate_attribute(entry.buffer.id(), attribute)?;
            }
        }
        for entry in &self.buffers {
            for attribute in &entry.attributes {
                ctx.bind_attribute(entry.buffer.id(), attribute)?;
            }
        }
        ctx.draw_primitives(self.primitive, self.vertex_count)?;
        Ok(())
    }

    /// Whether `location` is bound to any buffer of this mesh
    pub fn is_bound(&self, location: AttributeLocation) -> bool {
        self.bound.contains(&location)
    }

    /// All bound locations, in ascending order
    pub fn bound_locations(&self) -> impl Iterator<Item = AttributeLocation> + '_ {
        self.bound.iter().copied()
    }

    pub fn is_interleaved(&self, buffer: BufferHandle) -> Option<bool> {
        self.resolve(buffer).map(|index| self.buffers[index].interleaved)
    }

    /// Attributes bound to `buffer`, in bind order
    pub fn attributes(&self, buffer: BufferHandle) -> Option<&[Attribute]> {
        self.resolve(buffer)
            .map(|index| self.buffers[index].attributes.as_slice())
    }

    /// Stride of `buffer`, known once the mesh is finalized
    pub fn stride(&self, buffer: BufferHandle) -> Option<u64> {
        if !self.finalized {
            return None;
        }
        let entry = &self.buffers[self.resolve(buffer)?];
        if entry.interleaved {
            Some(entry.attributes.iter().map(Attribute::byte_size).sum())
        } else {
            Some(0)
        }
    }

    pub fn buffer(&self, buffer: BufferHandle) -> Option<&Buffer> {
        self.resolve(buffer).map(|index| &self.buffers[index].buffer)
    }

    /// Mutable access to a buffer, for uploading vertex data
    pub fn buffer_mut(&mut self, buffer: BufferHandle) -> Option<&mut Buffer> {
        let index = self.resolve(buffer)?;
        Some(&mut self.buffers[index].buffer)
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("label", &self.label)
            .field("primitive", &self.primitive)
            .field("vertex_count", &self.vertex_count)
            .field("finalized", &self.finalized)
            .field("buffers", &self.buffers.len())
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
