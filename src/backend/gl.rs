//! OpenGL backend using glow
//!
//! Context creation is left to the caller. On core profiles a vertex array
//! object must already be bound when meshes are drawn.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glow::HasContext;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::resources::Attribute;

type GlBuffer = <glow::Context as HasContext>::Buffer;

/// OpenGL implementation of [`BufferBackend`] and [`GraphicsContext`].
pub struct GlBackend {
    gl: Rc<glow::Context>,
    ids: BufferIdAllocator,
    buffers: RefCell<HashMap<BufferId, GlBuffer>>,
    // Locations enabled since the last draw
    enabled: RefCell<Vec<u32>>,
}

impl GlBackend {
    pub fn new(gl: Rc<glow::Context>) -> Self {
        Self {
            gl,
            ids: BufferIdAllocator::new(),
            buffers: RefCell::new(HashMap::new()),
            enabled: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        "OpenGL"
    }

    fn lookup(&self, buffer: BufferId) -> BackendResult<GlBuffer> {
        self.buffers
            .borrow()
            .get(&buffer)
            .copied()
            .ok_or(BackendError::UnknownBuffer(buffer))
    }
}

impl BufferBackend for GlBackend {
    fn create_buffer(&self) -> BackendResult<BufferId> {
        let gl_buffer = unsafe { self.gl.create_buffer() }
            .map_err(BackendError::BufferCreationFailed)?;
        let id = self.ids.allocate();
        self.buffers.borrow_mut().insert(id, gl_buffer);
        log::trace!("GlBackend: created buffer {:?}", id);
        Ok(id)
    }

    fn destroy_buffer(&self, buffer: BufferId) {
        if let Some(gl_buffer) = self.buffers.borrow_mut().remove(&buffer) {
            unsafe { self.gl.delete_buffer(gl_buffer) };
            log::trace!("GlBackend: deleted buffer {:?}", buffer);
        }
    }

    fn write_buffer(
        &self,
        buffer: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> BackendResult<()> {
        let gl_buffer = self.lookup(buffer)?;
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(gl_buffer));
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, gl_usage(usage));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        Ok(())
    }
}

impl GraphicsContext for GlBackend {
    fn validate_attribute(&self, buffer: BufferId, attribute: &Attribute) -> BackendResult<()> {
        self.lookup(buffer)?;
        attribute_pointer(attribute)?;
        Ok(())
    }

    fn bind_attribute(&self, buffer: BufferId, attribute: &Attribute) -> BackendResult<()> {
        let gl_buffer = self.lookup(buffer)?;
        let (stride, offset) = attribute_pointer(attribute)?;
        let location = attribute.location.index();

        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(gl_buffer));
            self.gl.enable_vertex_attrib_array(location);
            // Integer data is converted to float, unnormalized
            self.gl.vertex_attrib_pointer_f32(
                location,
                attribute.components as i32,
                gl_component_type(attribute.component_type),
                false,
                stride,
                offset,
            );
        }
        self.enabled.borrow_mut().push(location);
        Ok(())
    }

    fn draw_primitives(&self, primitive: Primitive, vertex_count: u32) -> BackendResult<()> {
        let result = to_gl_int(vertex_count as u64, "vertex count");
        unsafe {
            if let Ok(count) = result {
                self.gl.draw_arrays(gl_primitive(primitive), 0, count);
            }
            // Enabled arrays are released whether or not the draw was issued
            for location in self.enabled.borrow_mut().drain(..) {
                self.gl.disable_vertex_attrib_array(location);
            }
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        result.map(|_| ())
    }
}

impl Drop for GlBackend {
    fn drop(&mut self) {
        let remaining = self.buffers.get_mut().len();
        if remaining > 0 {
            log::warn!("GlBackend dropped with {} live buffers", remaining);
        }
    }
}

fn to_gl_int(value: u64, what: &str) -> BackendResult<i32> {
    i32::try_from(value)
        .map_err(|_| BackendError::InvalidLayout(format!("{what} {value} exceeds GLint range")))
}

/// Stride and offset of `attribute` as passed to `glVertexAttribPointer`
fn attribute_pointer(attribute: &Attribute) -> BackendResult<(i32, i32)> {
    let stride = to_gl_int(attribute.stride, "stride")?;
    let offset = to_gl_int(attribute.offset, "offset")?;
    Ok((stride, offset))
}

fn gl_component_type(ty: ComponentType) -> u32 {
    match ty {
        ComponentType::Byte => glow::BYTE,
        ComponentType::UnsignedByte => glow::UNSIGNED_BYTE,
        ComponentType::Short => glow::SHORT,
        ComponentType::UnsignedShort => glow::UNSIGNED_SHORT,
        ComponentType::Int => glow::INT,
        ComponentType::UnsignedInt => glow::UNSIGNED_INT,
        ComponentType::Float => glow::FLOAT,
        ComponentType::Double => glow::DOUBLE,
    }
}

fn gl_primitive(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Points => glow::POINTS,
        Primitive::Lines => glow::LINES,
        Primitive::LineStrip => glow::LINE_STRIP,
        Primitive::LineLoop => glow::LINE_LOOP,
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
        Primitive::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn gl_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::AttributeLocation;

    #[test]
    fn test_gl_int_conversion() {
        assert_eq!(to_gl_int(24, "stride"), Ok(24));
        assert!(matches!(
            to_gl_int(u64::from(u32::MAX), "offset"),
            Err(BackendError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_attribute_pointer_rejects_large_offset() {
        let mut attribute = Attribute::new::<glam::Vec3>(AttributeLocation::new(2));
        attribute.stride = 24;
        attribute.offset = 12;
        assert_eq!(attribute_pointer(&attribute), Ok((24, 12)));

        attribute.offset = 3 * (i32::MAX as u64);
        assert!(matches!(
            attribute_pointer(&attribute),
            Err(BackendError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_gl_enums() {
        assert_eq!(gl_component_type(ComponentType::Float), glow::FLOAT);
        assert_eq!(gl_component_type(ComponentType::UnsignedByte), glow::UNSIGNED_BYTE);
        assert_eq!(gl_primitive(Primitive::TriangleFan), glow::TRIANGLE_FAN);
        assert_eq!(gl_usage(BufferUsage::StreamDraw), glow::STREAM_DRAW);
    }
}
