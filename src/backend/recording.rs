//! Recording backend for testing and development.
//!
//! This backend doesn't touch a GPU. It hands out buffer ids, keeps track of
//! which buffers are alive and how many bytes they hold, and records every
//! command it receives so callers can inspect exactly what a mesh submitted.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::resources::Attribute;

/// A command received by the [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateBuffer(BufferId),
    DestroyBuffer(BufferId),
    WriteBuffer {
        buffer: BufferId,
        len: usize,
        usage: BufferUsage,
    },
    BindAttribute {
        buffer: BufferId,
        attribute: Attribute,
    },
    DrawPrimitives {
        primitive: Primitive,
        vertex_count: u32,
    },
}

/// No-GPU backend that records submitted commands.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    ids: BufferIdAllocator,
    buffers: RefCell<BTreeMap<BufferId, Vec<u8>>>,
    commands: RefCell<Vec<Command>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Recording"
    }

    /// Snapshot of all recorded commands.
    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    /// Drain the recorded commands.
    pub fn take_commands(&self) -> Vec<Command> {
        self.commands.take()
    }

    /// Number of buffers created and not yet destroyed.
    pub fn live_buffers(&self) -> usize {
        self.buffers.borrow().len()
    }

    /// Contents last written to `buffer`, if it is alive.
    pub fn buffer_data(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.buffers.borrow().get(&buffer).cloned()
    }

    fn record(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }
}

impl BufferBackend for RecordingBackend {
    fn create_buffer(&self) -> BackendResult<BufferId> {
        let id = self.ids.allocate();
        self.buffers.borrow_mut().insert(id, Vec::new());
        log::trace!("RecordingBackend: creating buffer {:?}", id);
        self.record(Command::CreateBuffer(id));
        Ok(id)
    }

    fn destroy_buffer(&self, buffer: BufferId) {
        if self.buffers.borrow_mut().remove(&buffer).is_some() {
            log::trace!("RecordingBackend: destroying buffer {:?}", buffer);
            self.record(Command::DestroyBuffer(buffer));
        }
    }

    fn write_buffer(
        &self,
        buffer: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> BackendResult<()> {
        let mut buffers = self.buffers.borrow_mut();
        let storage = buffers
            .get_mut(&buffer)
            .ok_or(BackendError::UnknownBuffer(buffer))?;
        storage.clear();
        storage.extend_from_slice(data);
        drop(buffers);

        log::trace!(
            "RecordingBackend: writing {} bytes to buffer {:?} ({:?})",
            data.len(),
            buffer,
            usage
        );
        self.record(Command::WriteBuffer {
            buffer,
            len: data.len(),
            usage,
        });
        Ok(())
    }
}

impl GraphicsContext for RecordingBackend {
    fn validate_attribute(&self, buffer: BufferId, _attribute: &Attribute) -> BackendResult<()> {
        if self.buffers.borrow().contains_key(&buffer) {
            Ok(())
        } else {
            Err(BackendError::UnknownBuffer(buffer))
        }
    }

    fn bind_attribute(&self, buffer: BufferId, attribute: &Attribute) -> BackendResult<()> {
        self.validate_attribute(buffer, attribute)?;
        self.record(Command::BindAttribute {
            buffer,
            attribute: *attribute,
        });
        Ok(())
    }

    fn draw_primitives(&self, primitive: Primitive, vertex_count: u32) -> BackendResult<()> {
        log::trace!(
            "RecordingBackend: drawing {} vertices as {:?}",
            vertex_count,
            primitive
        );
        self.record(Command::DrawPrimitives {
            primitive,
            vertex_count,
        });
        Ok(())
    }
}
