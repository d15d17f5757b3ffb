//! OpenGL scalar types and enum values.
//!
//! Everything in the core profile comes from the generated `gl` bindings. The constants defined
//! here are extension or compatibility enums that the core registry does not carry.

pub use ::gl::*;

use ::gl::types::GLenum;

// EXT_texture_compression_s3tc
pub const COMPRESSED_RGB_S3TC_DXT1_EXT: GLenum = 0x83F0;
pub const COMPRESSED_RGBA_S3TC_DXT1_EXT: GLenum = 0x83F1;
pub const COMPRESSED_RGBA_S3TC_DXT3_EXT: GLenum = 0x83F2;
pub const COMPRESSED_RGBA_S3TC_DXT5_EXT: GLenum = 0x83F3;

// EXT_texture_filter_anisotropic
pub const TEXTURE_MAX_ANISOTROPY_EXT: GLenum = 0x84FE;

// EXT_texture_mirror_clamp
pub const MIRROR_CLAMP_EXT: GLenum = 0x8742;
pub const MIRROR_CLAMP_TO_BORDER_EXT: GLenum = 0x8912;

// compatibility profile
pub const GENERATE_MIPMAP: GLenum = 0x8191;
