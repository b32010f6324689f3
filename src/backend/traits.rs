//! Core backend abstraction traits
//!
//! A mesh talks to the GPU through two narrow capabilities: a [`BufferBackend`]
//! that owns buffer storage, and a [`GraphicsContext`] that receives attribute
//! bindings and draw commands. A backend usually implements both.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::types::*;
use crate::resources::Attribute;
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Failed to create buffer: {0}")]
    BufferCreationFailed(String),
    #[error("Unknown buffer {0:?}")]
    UnknownBuffer(BufferId),
    #[error("Invalid attribute layout: {0}")]
    InvalidLayout(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

static NEXT_BACKEND_ID: AtomicU64 = AtomicU64::new(1);

/// Backend-side identifier of a GPU buffer.
///
/// Ids are tagged with the backend instance that created them, so a buffer
/// can never be mistaken for one of another backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId {
    backend: u64,
    index: u64,
}

impl BufferId {
    /// Per-backend buffer number
    pub fn raw(&self) -> u64 {
        self.index
    }
}

/// Hands out buffer ids for one backend instance
#[derive(Debug)]
pub(crate) struct BufferIdAllocator {
    backend: u64,
    next: Cell<u64>,
}

impl BufferIdAllocator {
    pub(crate) fn new() -> Self {
        Self {
            backend: NEXT_BACKEND_ID.fetch_add(1, Ordering::Relaxed),
            next: Cell::new(1),
        }
    }

    pub(crate) fn allocate(&self) -> BufferId {
        let index = self.next.get();
        self.next.set(index + 1);
        BufferId {
            backend: self.backend,
            index,
        }
    }
}

impl Default for BufferIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffer storage capability.
///
/// Methods take `&self`: backends are shared between the meshes that own
/// their buffers and use interior mutability for bookkeeping.
pub trait BufferBackend {
    /// Create an empty buffer
    fn create_buffer(&self) -> BackendResult<BufferId>;

    /// Release a buffer. Unknown ids are ignored.
    fn destroy_buffer(&self, buffer: BufferId);

    /// Replace the whole contents of a buffer
    fn write_buffer(&self, buffer: BufferId, data: &[u8], usage: BufferUsage)
        -> BackendResult<()>;
}

/// Command submission capability.
///
/// The caller is expected to have an active shader program with its uniforms
/// set before any command reaches the context.
pub trait GraphicsContext {
    /// Check that `attribute` can be bound to `buffer` without submitting
    /// anything. A mesh validates all of its attributes before the first bind.
    fn validate_attribute(&self, buffer: BufferId, attribute: &Attribute) -> BackendResult<()>;

    /// Point a vertex attribute location at a byte range of `buffer`
    fn bind_attribute(&self, buffer: BufferId, attribute: &Attribute) -> BackendResult<()>;

    /// Draw `vertex_count` non-indexed vertices
    fn draw_primitives(&self, primitive: Primitive, vertex_count: u32) -> BackendResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_differ_across_backends() {
        let a = BufferIdAllocator::new();
        let b = BufferIdAllocator::new();
        let first = a.allocate();
        let second = b.allocate();

        assert_eq!(first.raw(), second.raw());
        assert_ne!(first, second);
        assert_eq!(a.allocate().raw(), 2);
    }
}
