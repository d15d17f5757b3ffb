//! Texture enums: formats, pixel types, swizzle channels and sampling parameters.
use crate::gl;
use crate::gl::types::*;

/// Pixel formats, used both as client-side transfer formats and as internal formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum TextureFormat {
    Red = gl::RED,
    Rg = gl::RG,
    Rgb = gl::RGB,
    Rgba = gl::RGBA,
    Bgr = gl::BGR,
    Bgra = gl::BGRA,

    R8 = gl::R8,
    Rg8 = gl::RG8,
    Rgb8 = gl::RGB8,
    Rgba8 = gl::RGBA8,
    R16F = gl::R16F,
    Rg16F = gl::RG16F,
    Rgb16F = gl::RGB16F,
    Rgba16F = gl::RGBA16F,
    R32F = gl::R32F,
    Rg32F = gl::RG32F,
    Rgb32F = gl::RGB32F,
    Rgba32F = gl::RGBA32F,

    Stencil = gl::STENCIL_INDEX,
    Stencil8 = gl::STENCIL_INDEX8,
    Depth = gl::DEPTH_COMPONENT,
    Depth16 = gl::DEPTH_COMPONENT16,
    Depth24 = gl::DEPTH_COMPONENT24,
    Depth32F = gl::DEPTH_COMPONENT32F,
    DepthStencil = gl::DEPTH_STENCIL,
    Depth24Stencil8 = gl::DEPTH24_STENCIL8,

    CompressedRgbS3tcDxt1 = gl::COMPRESSED_RGB_S3TC_DXT1_EXT,
    CompressedRgbaS3tcDxt1 = gl::COMPRESSED_RGBA_S3TC_DXT1_EXT,
    CompressedRgbaS3tcDxt3 = gl::COMPRESSED_RGBA_S3TC_DXT3_EXT,
    CompressedRgbaS3tcDxt5 = gl::COMPRESSED_RGBA_S3TC_DXT5_EXT,
}

impl TextureFormat {
    pub fn from_gl(value: GLenum) -> Option<TextureFormat> {
        use TextureFormat::*;
        let format = match value {
            gl::RED => Red,
            gl::RG => Rg,
            gl::RGB => Rgb,
            gl::RGBA => Rgba,
            gl::BGR => Bgr,
            gl::BGRA => Bgra,
            gl::R8 => R8,
            gl::RG8 => Rg8,
            gl::RGB8 => Rgb8,
            gl::RGBA8 => Rgba8,
            gl::R16F => R16F,
            gl::RG16F => Rg16F,
            gl::RGB16F => Rgb16F,
            gl::RGBA16F => Rgba16F,
            gl::R32F => R32F,
            gl::RG32F => Rg32F,
            gl::RGB32F => Rgb32F,
            gl::RGBA32F => Rgba32F,
            gl::STENCIL_INDEX => Stencil,
            gl::STENCIL_INDEX8 => Stencil8,
            gl::DEPTH_COMPONENT => Depth,
            gl::DEPTH_COMPONENT16 => Depth16,
            gl::DEPTH_COMPONENT24 => Depth24,
            gl::DEPTH_COMPONENT32F => Depth32F,
            gl::DEPTH_STENCIL => DepthStencil,
            gl::DEPTH24_STENCIL8 => Depth24Stencil8,
            gl::COMPRESSED_RGB_S3TC_DXT1_EXT => CompressedRgbS3tcDxt1,
            gl::COMPRESSED_RGBA_S3TC_DXT1_EXT => CompressedRgbaS3tcDxt1,
            gl::COMPRESSED_RGBA_S3TC_DXT3_EXT => CompressedRgbaS3tcDxt3,
            gl::COMPRESSED_RGBA_S3TC_DXT5_EXT => CompressedRgbaS3tcDxt5,
            _ => return None,
        };
        Some(format)
    }

    /// Returns whether this is one of the S3TC block-compressed formats.
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            TextureFormat::CompressedRgbS3tcDxt1
                | TextureFormat::CompressedRgbaS3tcDxt1
                | TextureFormat::CompressedRgbaS3tcDxt3
                | TextureFormat::CompressedRgbaS3tcDxt5
        )
    }
}

/// Byte size of a `width` x `height` image in a compressed format.
///
/// Returns `None` for uncompressed formats. Partial blocks at the right and bottom edges count as
/// full blocks. RGB DXT1 images are sized with 3x3 blocks of 6 bytes.
pub fn compressed_image_size(format: TextureFormat, width: u32, height: u32) -> Option<usize> {
    let (block_edge, block_bytes) = match format {
        TextureFormat::CompressedRgbS3tcDxt1 => (3, 6),
        TextureFormat::CompressedRgbaS3tcDxt1 => (4, 8),
        TextureFormat::CompressedRgbaS3tcDxt3 | TextureFormat::CompressedRgbaS3tcDxt5 => (4, 16),
        _ => return None,
    };
    let blocks_x = (width as usize + block_edge - 1) / block_edge;
    let blocks_y = (height as usize + block_edge - 1) / block_edge;
    Some(blocks_x * blocks_y * block_bytes)
}

/// Client-side component types, including the packed formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum TextureType {
    UnsignedByte = gl::UNSIGNED_BYTE,
    UnsignedShort = gl::UNSIGNED_SHORT,
    UnsignedInt = gl::UNSIGNED_INT,

    UnsignedByte332 = gl::UNSIGNED_BYTE_3_3_2,
    UnsignedByte233Rev = gl::UNSIGNED_BYTE_2_3_3_REV,

    UnsignedShort565 = gl::UNSIGNED_SHORT_5_6_5,
    UnsignedShort565Rev = gl::UNSIGNED_SHORT_5_6_5_REV,
    UnsignedShort4444 = gl::UNSIGNED_SHORT_4_4_4_4,
    UnsignedShort4444Rev = gl::UNSIGNED_SHORT_4_4_4_4_REV,
    UnsignedShort5551 = gl::UNSIGNED_SHORT_5_5_5_1,
    UnsignedShort1555Rev = gl::UNSIGNED_SHORT_1_5_5_5_REV,

    UnsignedInt8888 = gl::UNSIGNED_INT_8_8_8_8,
    UnsignedInt8888Rev = gl::UNSIGNED_INT_8_8_8_8_REV,
    UnsignedInt1010102 = gl::UNSIGNED_INT_10_10_10_2,
    UnsignedInt2101010Rev = gl::UNSIGNED_INT_2_10_10_10_REV,
    UnsignedInt248 = gl::UNSIGNED_INT_24_8,

    Byte = gl::BYTE,
    Short = gl::SHORT,
    Int = gl::INT,
    HalfFloat = gl::HALF_FLOAT,
    Float = gl::FLOAT,
    Double = gl::DOUBLE,
}

/// Source of a swizzled channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum Channel {
    Zero = gl::ZERO,
    One = gl::ONE,
    R = gl::RED,
    G = gl::GREEN,
    B = gl::BLUE,
    A = gl::ALPHA,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum Wrap {
    Repeat = gl::REPEAT,
    MirroredRepeat = gl::MIRRORED_REPEAT,
    ClampToEdge = gl::CLAMP_TO_EDGE,
    ClampToBorder = gl::CLAMP_TO_BORDER,
    MirrorClamp = gl::MIRROR_CLAMP_EXT,
    MirrorClampToEdge = gl::MIRROR_CLAMP_TO_EDGE,
    MirrorClampToBorder = gl::MIRROR_CLAMP_TO_BORDER_EXT,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum CompareMode {
    None = gl::NONE,
    RefToTexture = gl::COMPARE_REF_TO_TEXTURE,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum CompareFunc {
    Never = gl::NEVER,
    Less = gl::LESS,
    Equal = gl::EQUAL,
    LessEqual = gl::LEQUAL,
    Greater = gl::GREATER,
    NotEqual = gl::NOTEQUAL,
    GreaterEqual = gl::GEQUAL,
    Always = gl::ALWAYS,
}

/// Magnification filter, also used by framebuffer blits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum Filter {
    Nearest = gl::NEAREST,
    Linear = gl::LINEAR,
}

/// Minification filter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum MinFilter {
    Nearest = gl::NEAREST,
    Linear = gl::LINEAR,
    NearestMipmapNearest = gl::NEAREST_MIPMAP_NEAREST,
    NearestMipmapLinear = gl::NEAREST_MIPMAP_LINEAR,
    LinearMipmapNearest = gl::LINEAR_MIPMAP_NEAREST,
    LinearMipmapLinear = gl::LINEAR_MIPMAP_LINEAR,
}

/// Storage class of a channel in a texture level, as reported by the driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum ChannelType {
    None = gl::NONE,
    SignedNormalized = gl::SIGNED_NORMALIZED,
    UnsignedNormalized = gl::UNSIGNED_NORMALIZED,
    Float = gl::FLOAT,
    Int = gl::INT,
    UnsignedInt = gl::UNSIGNED_INT,
}

impl ChannelType {
    pub fn from_gl(value: GLenum) -> Option<ChannelType> {
        match value {
            gl::NONE => Some(ChannelType::None),
            gl::SIGNED_NORMALIZED => Some(ChannelType::SignedNormalized),
            gl::UNSIGNED_NORMALIZED => Some(ChannelType::UnsignedNormalized),
            gl::FLOAT => Some(ChannelType::Float),
            gl::INT => Some(ChannelType::Int),
            gl::UNSIGNED_INT => Some(ChannelType::UnsignedInt),
            _ => None,
        }
    }
}

/// Channel selector for [`ChannelType`] queries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum ChannelName {
    Red = gl::TEXTURE_RED_TYPE,
    Green = gl::TEXTURE_GREEN_TYPE,
    Blue = gl::TEXTURE_BLUE_TYPE,
    Alpha = gl::TEXTURE_ALPHA_TYPE,
    Depth = gl::TEXTURE_DEPTH_TYPE,
}

impl ChannelName {
    pub const ALL: [ChannelName; 5] = [
        ChannelName::Red,
        ChannelName::Green,
        ChannelName::Blue,
        ChannelName::Alpha,
        ChannelName::Depth,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dxt3_dxt5_sizes() {
        for &format in &[
            TextureFormat::CompressedRgbaS3tcDxt3,
            TextureFormat::CompressedRgbaS3tcDxt5,
        ] {
            assert_eq!(compressed_image_size(format, 4, 4), Some(16));
            assert_eq!(compressed_image_size(format, 5, 5), Some(64));
            assert_eq!(compressed_image_size(format, 1, 1), Some(16));
            assert_eq!(compressed_image_size(format, 256, 128), Some(64 * 32 * 16));
        }
    }

    #[test]
    fn test_rgba_dxt1_sizes() {
        let format = TextureFormat::CompressedRgbaS3tcDxt1;
        assert_eq!(compressed_image_size(format, 4, 4), Some(8));
        assert_eq!(compressed_image_size(format, 8, 5), Some(2 * 2 * 8));
    }

    #[test]
    fn test_rgb_dxt1_uses_three_texel_blocks() {
        let format = TextureFormat::CompressedRgbS3tcDxt1;
        assert_eq!(compressed_image_size(format, 3, 3), Some(6));
        assert_eq!(compressed_image_size(format, 4, 4), Some(2 * 2 * 6));
        assert_eq!(compressed_image_size(format, 9, 1), Some(3 * 6));
    }

    #[test]
    fn test_uncompressed_has_no_block_size() {
        assert_eq!(compressed_image_size(TextureFormat::Rgba, 4, 4), None);
        assert!(!TextureFormat::Depth24Stencil8.is_compressed());
        assert!(TextureFormat::CompressedRgbaS3tcDxt5.is_compressed());
    }

    #[test]
    fn test_format_from_gl() {
        assert_eq!(TextureFormat::from_gl(gl::RGBA8), Some(TextureFormat::Rgba8));
        assert_eq!(
            TextureFormat::from_gl(gl::COMPRESSED_RGB_S3TC_DXT1_EXT),
            Some(TextureFormat::CompressedRgbS3tcDxt1)
        );
        assert_eq!(TextureFormat::from_gl(0xdead), None);
        assert_eq!(
            ChannelType::from_gl(gl::UNSIGNED_NORMALIZED),
            Some(ChannelType::UnsignedNormalized)
        );
    }
}
