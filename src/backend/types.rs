//! Common types shared between backends

use glam::{Vec2, Vec3, Vec4};

/// Scalar type of a single attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
    Double,
}

impl ComponentType {
    /// Size in bytes of one component
    pub fn size(&self) -> u64 {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::Int | ComponentType::UnsignedInt | ComponentType::Float => 4,
            ComponentType::Double => 8,
        }
    }
}

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Single points
    Points,
    /// Each pair of vertices is a separate line
    Lines,
    /// Polyline
    LineStrip,
    /// Polyline with the last vertex connected back to the first
    LineLoop,
    /// Each three vertices are a separate triangle
    Triangles,
    /// Every vertex after the first two adds a triangle with the previous two
    TriangleStrip,
    /// First vertex is the center, every following pair adds a triangle
    TriangleFan,
}

/// Expected update frequency of buffer contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

/// A type that can be fed to a vertex attribute.
///
/// Resolves to a component count and scalar type at compile time, so binding
/// an attribute never goes through dynamic dispatch.
pub trait VertexComponent {
    const COMPONENTS: u32;
    const TYPE: ComponentType;

    /// Size in bytes of one attribute value
    fn byte_size() -> u64 {
        Self::COMPONENTS as u64 * Self::TYPE.size()
    }
}

macro_rules! impl_vertex_component {
    ($($ty:ty => ($count:expr, $component:ident)),* $(,)?) => {
        $(
            impl VertexComponent for $ty {
                const COMPONENTS: u32 = $count;
                const TYPE: ComponentType = ComponentType::$component;
            }
        )*
    };
}

impl_vertex_component! {
    i8 => (1, Byte),
    u8 => (1, UnsignedByte),
    i16 => (1, Short),
    u16 => (1, UnsignedShort),
    i32 => (1, Int),
    u32 => (1, UnsignedInt),
    f32 => (1, Float),
    f64 => (1, Double),
    Vec2 => (2, Float),
    Vec3 => (3, Float),
    Vec4 => (4, Float),
    [f32; 2] => (2, Float),
    [f32; 3] => (3, Float),
    [f32; 4] => (4, Float),
}
