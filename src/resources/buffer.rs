//! Owned GPU buffer

use std::fmt;
use std::rc::Rc;

use bytemuck::Pod;

use crate::backend::{BackendResult, BufferBackend, BufferId, BufferUsage};

/// A GPU buffer owned by a mesh.
///
/// The backend buffer is released when this value is dropped.
pub struct Buffer {
    id: BufferId,
    size: u64,
    backend: Rc<dyn BufferBackend>,
}

impl Buffer {
    pub(crate) fn new(backend: Rc<dyn BufferBackend>) -> BackendResult<Self> {
        let id = backend.create_buffer()?;
        Ok(Self {
            id,
            size: 0,
            backend,
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Size in bytes of the last upload
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Replace the buffer contents
    pub fn set_data(&mut self, data: &[u8], usage: BufferUsage) -> BackendResult<()> {
        self.backend.write_buffer(self.id, data, usage)?;
        self.size = data.len() as u64;
        Ok(())
    }

    /// Replace the buffer contents with a slice of plain-old-data values
    pub fn set_pod_data<T: Pod>(&mut self, data: &[T], usage: BufferUsage) -> BackendResult<()> {
        self.set_data(bytemuck::cast_slice(data), usage)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.backend.destroy_buffer(self.id);
    }
}
