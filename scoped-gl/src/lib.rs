//! Scoped wrappers over an OpenGL-style driver.
//!
//! Every wrapper operation that touches a binding point saves the previous binding and restores
//! it when done, so callers never observe binding side effects. Objects own their driver names
//! and delete them on drop.
//!
//! The driver is abstracted behind [`GlApi`]. With the `soft` feature (on by default) the crate
//! ships [`SoftGl`], an in-memory implementation used for testing.

#[macro_use]
pub mod error;
#[macro_use]
mod handle;

pub mod api;
pub mod binding;
pub mod buffer;
pub mod framebuffer;
pub mod gl;
pub mod pixel_store;
pub mod renderbuffer;
pub mod shader;
pub mod texture;
pub mod uniform;
pub mod vertex_array;

#[cfg(feature = "soft")]
pub mod soft;

pub use crate::api::{Gl, GlApi, PixelPackData, PixelUnpackData};
pub use crate::binding::{
    current_binding, ActiveTextureUnit, BindingPoint, BufferTarget, FramebufferTarget,
    ProgramBinding, RenderbufferTarget, SaveBinding, TextureTarget, VertexArrayBinding,
};
pub use crate::buffer::{Buffer, BufferAccess, BufferMapping};
pub use crate::error::{CallSite, DriverError, Error, GlResult};
pub use crate::framebuffer::{
    Area, AttachedObject, AttachmentPoint, AttachmentSource, BufferMask, Framebuffer,
    FramebufferRef, Region, Size,
};
pub use crate::pixel_store::{PixelPackSettings, PixelUnpackSettings};
pub use crate::renderbuffer::Renderbuffer;
pub use crate::shader::{Program, ProgramRef, Shader, ShaderStage};
pub use crate::texture::{Texture, TextureFormat, TextureRef, TextureSettings, TextureType};
pub use crate::uniform::{UniformValue, Uniforms};
pub use crate::vertex_array::{VertexArray, VertexArraySlot};

#[cfg(feature = "soft")]
pub use crate::soft::{Limits, SoftGl};
