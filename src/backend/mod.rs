//! Backend abstraction layer
//!
//! Provides the collaborator traits meshes submit through, the types they
//! share, and the bundled backends:
//!
//! - `recording` (always available): no-GPU backend that records commands
//! - `gl` (feature `gl`): OpenGL backend using glow

pub mod recording;
pub mod traits;
pub mod types;

#[cfg(feature = "gl")]
pub mod gl;

pub use recording::{Command, RecordingBackend};
pub use traits::*;
pub use types::*;

#[cfg(feature = "gl")]
pub use gl::GlBackend;
