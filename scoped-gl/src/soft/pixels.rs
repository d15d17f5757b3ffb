//! Pixel transfers: client memory layout, format/type decoding and internal format storage rules.
//!
//! Texels are stored as four `f32` components. Color formats use them as RGBA; depth and stencil
//! formats keep the depth value in component 0 and the stencil index in component 1.
use crate::gl;
use crate::gl::types::*;

pub(super) type Texel = [f32; 4];

pub(super) const DEFAULT_TEXEL: Texel = [0.0, 0.0, 0.0, 1.0];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum StorageClass {
    Color,
    Depth,
    Stencil,
    DepthStencil,
}

impl StorageClass {
    /// Whether images of class `self` can be transferred with a client format of class `transfer`.
    pub(super) fn accepts(self, transfer: StorageClass) -> bool {
        use StorageClass::*;
        match (self, transfer) {
            (Color, Color) | (Depth, Depth) | (Stencil, Stencil) => true,
            (DepthStencil, Depth) | (DepthStencil, Stencil) | (DepthStencil, DepthStencil) => true,
            _ => false,
        }
    }

    pub(super) fn has_depth(self) -> bool {
        matches!(self, StorageClass::Depth | StorageClass::DepthStencil)
    }

    pub(super) fn has_stencil(self) -> bool {
        matches!(self, StorageClass::Stencil | StorageClass::DepthStencil)
    }
}

/// Storage properties of an internal format.
#[derive(Copy, Clone, Debug)]
pub(super) struct InternalFormat {
    pub class: StorageClass,
    /// Red, green, blue and alpha presence (color formats).
    pub channels: [bool; 4],
    /// `UNSIGNED_NORMALIZED` or `FLOAT`, for every stored color or depth channel.
    pub channel_type: GLenum,
    pub compressed: bool,
}

const RGBA: [bool; 4] = [true, true, true, true];
const RGB: [bool; 4] = [true, true, true, false];
const RG: [bool; 4] = [true, true, false, false];
const R: [bool; 4] = [true, false, false, false];
const NO_COLOR: [bool; 4] = [false; 4];

pub(super) fn internal_format(format: GLenum) -> Option<InternalFormat> {
    let color = |channels, channel_type| InternalFormat {
        class: StorageClass::Color,
        channels,
        channel_type,
        compressed: false,
    };
    let other = |class, channel_type| InternalFormat {
        class,
        channels: NO_COLOR,
        channel_type,
        compressed: false,
    };
    let compressed = |channels| InternalFormat {
        class: StorageClass::Color,
        channels,
        channel_type: gl::UNSIGNED_NORMALIZED,
        compressed: true,
    };
    let unorm = gl::UNSIGNED_NORMALIZED;
    let float = gl::FLOAT;

    let info = match format {
        gl::RED | gl::R8 => color(R, unorm),
        gl::RG | gl::RG8 => color(RG, unorm),
        gl::RGB | gl::BGR | gl::RGB8 => color(RGB, unorm),
        gl::RGBA | gl::BGRA | gl::RGBA8 => color(RGBA, unorm),
        gl::R16F | gl::R32F => color(R, float),
        gl::RG16F | gl::RG32F => color(RG, float),
        gl::RGB16F | gl::RGB32F => color(RGB, float),
        gl::RGBA16F | gl::RGBA32F => color(RGBA, float),
        gl::DEPTH_COMPONENT | gl::DEPTH_COMPONENT16 | gl::DEPTH_COMPONENT24 => {
            other(StorageClass::Depth, unorm)
        }
        gl::DEPTH_COMPONENT32F => other(StorageClass::Depth, float),
        gl::DEPTH_STENCIL | gl::DEPTH24_STENCIL8 => other(StorageClass::DepthStencil, unorm),
        gl::STENCIL_INDEX | gl::STENCIL_INDEX8 => other(StorageClass::Stencil, gl::NONE),
        gl::COMPRESSED_RGB_S3TC_DXT1_EXT => compressed(RGB),
        gl::COMPRESSED_RGBA_S3TC_DXT1_EXT
        | gl::COMPRESSED_RGBA_S3TC_DXT3_EXT
        | gl::COMPRESSED_RGBA_S3TC_DXT5_EXT => compressed(RGBA),
        _ => return None,
    };
    Some(info)
}

impl InternalFormat {
    /// Result of a `TEXTURE_*_TYPE` level query.
    pub(super) fn channel_type(&self, pname: GLenum) -> GLenum {
        let present = match pname {
            gl::TEXTURE_RED_TYPE => self.channels[0],
            gl::TEXTURE_GREEN_TYPE => self.channels[1],
            gl::TEXTURE_BLUE_TYPE => self.channels[2],
            gl::TEXTURE_ALPHA_TYPE => self.channels[3],
            gl::TEXTURE_DEPTH_TYPE => self.class.has_depth(),
            _ => false,
        };
        if present {
            self.channel_type
        } else {
            gl::NONE
        }
    }

    /// Converts a texel to what this format retains: absent color channels take their default
    /// value, normalized channels are clamped.
    pub(super) fn store(&self, texel: Texel) -> Texel {
        let normalized = self.channel_type == gl::UNSIGNED_NORMALIZED;
        let clamp = |v: f32| if normalized { v.max(0.0).min(1.0) } else { v };
        match self.class {
            StorageClass::Color => {
                let mut out = DEFAULT_TEXEL;
                for i in 0..4 {
                    if self.channels[i] {
                        out[i] = clamp(texel[i]);
                    }
                }
                out
            }
            StorageClass::Depth => [clamp(texel[0]), 0.0, 0.0, 0.0],
            StorageClass::Stencil => [0.0, stencil_value(texel[1]), 0.0, 0.0],
            StorageClass::DepthStencil => [clamp(texel[0]), stencil_value(texel[1]), 0.0, 0.0],
        }
    }
}

fn stencil_value(v: f32) -> f32 {
    v.round().max(0.0).min(255.0)
}

/// Client-side pixel format: which texel components are transferred, in order.
#[derive(Copy, Clone, Debug)]
pub(super) struct TransferFormat {
    pub class: StorageClass,
    pub components: &'static [usize],
}

pub(super) fn transfer_format(format: GLenum) -> Option<TransferFormat> {
    let (class, components): (StorageClass, &'static [usize]) = match format {
        gl::RED => (StorageClass::Color, &[0]),
        gl::GREEN => (StorageClass::Color, &[1]),
        gl::BLUE => (StorageClass::Color, &[2]),
        gl::ALPHA => (StorageClass::Color, &[3]),
        gl::RG => (StorageClass::Color, &[0, 1]),
        gl::RGB => (StorageClass::Color, &[0, 1, 2]),
        gl::BGR => (StorageClass::Color, &[2, 1, 0]),
        gl::RGBA => (StorageClass::Color, &[0, 1, 2, 3]),
        gl::BGRA => (StorageClass::Color, &[2, 1, 0, 3]),
        gl::DEPTH_COMPONENT => (StorageClass::Depth, &[0]),
        gl::STENCIL_INDEX => (StorageClass::Stencil, &[1]),
        gl::DEPTH_STENCIL => (StorageClass::DepthStencil, &[0, 1]),
        _ => return None,
    };
    Some(TransferFormat { class, components })
}

/// Client-side component type.
///
/// Half floats and the small packed formats are not supported by this driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum TransferType {
    Scalar { ty: GLenum, size: usize },
    Packed8888 { reversed: bool },
    Packed248,
}

pub(super) fn transfer_type(ty: GLenum) -> Option<TransferType> {
    let scalar = |size| Some(TransferType::Scalar { ty, size });
    match ty {
        gl::UNSIGNED_BYTE | gl::BYTE => scalar(1),
        gl::UNSIGNED_SHORT | gl::SHORT => scalar(2),
        gl::UNSIGNED_INT | gl::INT | gl::FLOAT => scalar(4),
        gl::UNSIGNED_INT_8_8_8_8 => Some(TransferType::Packed8888 { reversed: false }),
        gl::UNSIGNED_INT_8_8_8_8_REV => Some(TransferType::Packed8888 { reversed: true }),
        gl::UNSIGNED_INT_24_8 => Some(TransferType::Packed248),
        _ => None,
    }
}

/// A validated format/type pair.
#[derive(Copy, Clone, Debug)]
pub(super) struct PixelFormat {
    pub format: TransferFormat,
    pub ty: TransferType,
}

impl PixelFormat {
    /// Validates a format/type pair. Returns the GL error for invalid combinations.
    pub(super) fn new(format: GLenum, ty: GLenum) -> Result<PixelFormat, GLenum> {
        let format = transfer_format(format).ok_or(gl::INVALID_ENUM)?;
        let ty = transfer_type(ty).ok_or(gl::INVALID_ENUM)?;
        let valid = match ty {
            TransferType::Packed8888 { .. } => format.components.len() == 4,
            TransferType::Packed248 => format.class == StorageClass::DepthStencil,
            TransferType::Scalar { .. } => format.class != StorageClass::DepthStencil,
        };
        if !valid {
            return Err(gl::INVALID_OPERATION);
        }
        Ok(PixelFormat { format, ty })
    }

    /// Bytes per pixel.
    pub(super) fn group_size(&self) -> usize {
        match self.ty {
            TransferType::Scalar { size, .. } => size * self.format.components.len(),
            _ => 4,
        }
    }

    /// Size of the unit that `swap_bytes` reverses.
    pub(super) fn element_size(&self) -> usize {
        match self.ty {
            TransferType::Scalar { size, .. } => size,
            _ => 4,
        }
    }

    /// Reads one pixel into the components of `texel` selected by the format.
    pub(super) fn decode(&self, bytes: &[u8], swap: bool, texel: &mut Texel) {
        match self.ty {
            TransferType::Scalar { ty, size } => {
                for (i, &c) in self.format.components.iter().enumerate() {
                    let raw = read_scalar(&bytes[i * size..(i + 1) * size], ty, swap);
                    texel[c] = if c == 1 && self.format.class != StorageClass::Color {
                        raw as f32
                    } else {
                        normalize(raw, ty) as f32
                    };
                }
            }
            TransferType::Packed8888 { reversed } => {
                let v = read_u32(bytes, swap);
                for (i, &c) in self.format.components.iter().enumerate() {
                    let shift = if reversed { 8 * i } else { 24 - 8 * i };
                    texel[c] = ((v >> shift) & 0xff) as f32 / 255.0;
                }
            }
            TransferType::Packed248 => {
                let v = read_u32(bytes, swap);
                texel[0] = ((v >> 8) as f64 / 16_777_215.0) as f32;
                texel[1] = (v & 0xff) as f32;
            }
        }
    }

    /// Writes the components of `texel` selected by the format as one pixel.
    pub(super) fn encode(&self, texel: &Texel, swap: bool, out: &mut [u8]) {
        match self.ty {
            TransferType::Scalar { ty, size } => {
                for (i, &c) in self.format.components.iter().enumerate() {
                    let value = texel[c] as f64;
                    let raw = if c == 1 && self.format.class != StorageClass::Color {
                        value
                    } else {
                        denormalize(value, ty)
                    };
                    write_scalar(raw, ty, swap, &mut out[i * size..(i + 1) * size]);
                }
            }
            TransferType::Packed8888 { reversed } => {
                let mut v = 0u32;
                for (i, &c) in self.format.components.iter().enumerate() {
                    let shift = if reversed { 8 * i } else { 24 - 8 * i };
                    let byte = (texel[c].max(0.0).min(1.0) * 255.0).round() as u32;
                    v |= byte << shift;
                }
                write_u32(v, swap, out);
            }
            TransferType::Packed248 => {
                let depth = (texel[0].max(0.0).min(1.0) as f64 * 16_777_215.0).round() as u32;
                let stencil = stencil_value(texel[1]) as u32;
                write_u32((depth << 8) | stencil, swap, out);
            }
        }
    }
}

fn read_u32(bytes: &[u8], swap: bool) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[..4]);
    if swap {
        b.reverse();
    }
    u32::from_ne_bytes(b)
}

fn write_u32(v: u32, swap: bool, out: &mut [u8]) {
    let mut b = v.to_ne_bytes();
    if swap {
        b.reverse();
    }
    out[..4].copy_from_slice(&b);
}

/// Raw component value: the integer for integer types, the value itself for floats.
fn read_scalar(bytes: &[u8], ty: GLenum, swap: bool) -> f64 {
    let mut b = [0u8; 4];
    let n = bytes.len().min(4);
    b[..n].copy_from_slice(&bytes[..n]);
    if swap {
        b[..n].reverse();
    }
    match ty {
        gl::UNSIGNED_BYTE => b[0] as f64,
        gl::BYTE => b[0] as i8 as f64,
        gl::UNSIGNED_SHORT => u16::from_ne_bytes([b[0], b[1]]) as f64,
        gl::SHORT => i16::from_ne_bytes([b[0], b[1]]) as f64,
        gl::UNSIGNED_INT => u32::from_ne_bytes(b) as f64,
        gl::INT => i32::from_ne_bytes(b) as f64,
        gl::FLOAT => f32::from_ne_bytes(b) as f64,
        _ => 0.0,
    }
}

fn write_scalar(raw: f64, ty: GLenum, swap: bool, out: &mut [u8]) {
    let mut b = [0u8; 4];
    let n = match ty {
        gl::UNSIGNED_BYTE => {
            b[0] = raw as u8;
            1
        }
        gl::BYTE => {
            b[0] = raw as i8 as u8;
            1
        }
        gl::UNSIGNED_SHORT => {
            b[..2].copy_from_slice(&(raw as u16).to_ne_bytes());
            2
        }
        gl::SHORT => {
            b[..2].copy_from_slice(&(raw as i16).to_ne_bytes());
            2
        }
        gl::UNSIGNED_INT => {
            b = (raw as u32).to_ne_bytes();
            4
        }
        gl::INT => {
            b = (raw as i32).to_ne_bytes();
            4
        }
        gl::FLOAT => {
            b = (raw as f32).to_ne_bytes();
            4
        }
        _ => 0,
    };
    if swap {
        b[..n].reverse();
    }
    out[..n].copy_from_slice(&b[..n]);
}

fn type_max(ty: GLenum) -> Option<f64> {
    match ty {
        gl::UNSIGNED_BYTE => Some(255.0),
        gl::BYTE => Some(127.0),
        gl::UNSIGNED_SHORT => Some(65_535.0),
        gl::SHORT => Some(32_767.0),
        gl::UNSIGNED_INT => Some(4_294_967_295.0),
        gl::INT => Some(2_147_483_647.0),
        _ => None,
    }
}

fn is_signed(ty: GLenum) -> bool {
    matches!(ty, gl::BYTE | gl::SHORT | gl::INT)
}

fn normalize(raw: f64, ty: GLenum) -> f64 {
    match type_max(ty) {
        Some(max) => (raw / max).max(-1.0),
        None => raw,
    }
}

fn denormalize(value: f64, ty: GLenum) -> f64 {
    match type_max(ty) {
        Some(max) => {
            let lo = if is_signed(ty) { -1.0 } else { 0.0 };
            (value.max(lo).min(1.0) * max).round()
        }
        None => value,
    }
}

//--------------------------------------------------------------------------------------------------

/// Pixel store state for one direction (pack or unpack).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) struct PixelStore {
    pub swap_bytes: bool,
    pub lsb_first: bool,
    pub row_length: i32,
    pub image_height: i32,
    pub skip_rows: i32,
    pub skip_pixels: i32,
    pub skip_images: i32,
    pub alignment: i32,
}

impl Default for PixelStore {
    fn default() -> Self {
        PixelStore {
            swap_bytes: false,
            lsb_first: false,
            row_length: 0,
            image_height: 0,
            skip_rows: 0,
            skip_pixels: 0,
            skip_images: 0,
            alignment: 4,
        }
    }
}

/// Byte addressing of a `width` x `height` x `depth` image in client memory.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) struct Layout {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub group: usize,
    pub row_stride: usize,
    pub image_stride: usize,
    pub start: usize,
    pub swap: bool,
}

impl Layout {
    /// `dims` is the dimensionality of the transfer: image height and skipped images only apply
    /// to 3D transfers.
    pub(super) fn new(
        store: &PixelStore,
        pixel: &PixelFormat,
        dims: u32,
        width: usize,
        height: usize,
        depth: usize,
    ) -> Layout {
        let group = pixel.group_size();
        let alignment = store.alignment.max(1) as usize;
        let row_length = if store.row_length > 0 {
            store.row_length as usize
        } else {
            width
        };
        let row_bytes = row_length * group;
        let row_stride = (row_bytes + alignment - 1) / alignment * alignment;
        let image_height = if dims == 3 && store.image_height > 0 {
            store.image_height as usize
        } else {
            height
        };
        let image_stride = row_stride * image_height;
        let skip_images = if dims == 3 {
            store.skip_images as usize
        } else {
            0
        };
        let start = skip_images * image_stride
            + store.skip_rows as usize * row_stride
            + store.skip_pixels as usize * group;
        Layout {
            width,
            height,
            depth,
            group,
            row_stride,
            image_stride,
            start,
            swap: store.swap_bytes && pixel.element_size() > 1,
        }
    }

    pub(super) fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        self.start + z * self.image_stride + y * self.row_stride + x * self.group
    }

    /// Smallest client buffer holding every addressed pixel. The last row is not padded.
    pub(super) fn required_len(&self) -> usize {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return 0;
        }
        self.offset(self.width - 1, self.height - 1, self.depth - 1) + self.group
    }
}

/// Decodes `layout.width * layout.height * layout.depth` pixels from client memory, row by row.
/// Components the format does not carry take their default value.
pub(super) fn unpack(input: &[u8], layout: &Layout, pixel: &PixelFormat) -> Vec<Texel> {
    let mut texels = Vec::with_capacity(layout.width * layout.height * layout.depth);
    for z in 0..layout.depth {
        for y in 0..layout.height {
            for x in 0..layout.width {
                let offset = layout.offset(x, y, z);
                let mut texel = DEFAULT_TEXEL;
                pixel.decode(&input[offset..offset + layout.group], layout.swap, &mut texel);
                texels.push(texel);
            }
        }
    }
    texels
}

/// Encodes `texels` (row by row) into client memory. Bytes between rows are left untouched.
pub(super) fn pack(output: &mut [u8], layout: &Layout, pixel: &PixelFormat, texels: &[Texel]) {
    let mut i = 0;
    for z in 0..layout.depth {
        for y in 0..layout.height {
            for x in 0..layout.width {
                let offset = layout.offset(x, y, z);
                pixel.encode(&texels[i], layout.swap, &mut output[offset..offset + layout.group]);
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba8() -> PixelFormat {
        PixelFormat::new(gl::RGBA, gl::UNSIGNED_BYTE).unwrap()
    }

    #[test]
    fn test_default_layout_pads_rows_to_four_bytes() {
        let rgb = PixelFormat::new(gl::RGB, gl::UNSIGNED_BYTE).unwrap();
        let layout = Layout::new(&PixelStore::default(), &rgb, 2, 3, 2, 1);
        assert_eq!(layout.group, 3);
        assert_eq!(layout.row_stride, 12);
        assert_eq!(layout.offset(1, 1, 0), 15);
        assert_eq!(layout.required_len(), 12 + 9);
    }

    #[test]
    fn test_row_length_and_skips() {
        let store = PixelStore {
            row_length: 10,
            skip_rows: 2,
            skip_pixels: 3,
            alignment: 1,
            ..PixelStore::default()
        };
        let layout = Layout::new(&store, &rgba8(), 2, 4, 4, 1);
        assert_eq!(layout.row_stride, 40);
        assert_eq!(layout.start, 2 * 40 + 3 * 4);
        assert_eq!(layout.offset(0, 1, 0), layout.start + 40);
    }

    #[test]
    fn test_image_height_only_for_3d() {
        let store = PixelStore {
            image_height: 8,
            skip_images: 1,
            ..PixelStore::default()
        };
        let flat = Layout::new(&store, &rgba8(), 2, 2, 2, 1);
        assert_eq!(flat.start, 0);
        let volume = Layout::new(&store, &rgba8(), 3, 2, 2, 2);
        assert_eq!(volume.image_stride, 8 * 8);
        assert_eq!(volume.start, 64);
    }

    #[test]
    fn test_invalid_combinations() {
        assert_eq!(
            PixelFormat::new(gl::RGB, gl::UNSIGNED_INT_8_8_8_8).unwrap_err(),
            gl::INVALID_OPERATION
        );
        assert_eq!(
            PixelFormat::new(gl::DEPTH_STENCIL, gl::FLOAT).unwrap_err(),
            gl::INVALID_OPERATION
        );
        assert_eq!(
            PixelFormat::new(gl::RGBA, gl::HALF_FLOAT).unwrap_err(),
            gl::INVALID_ENUM
        );
    }

    #[test]
    fn test_decode_encode_unsigned_byte() {
        let bgra = PixelFormat::new(gl::BGRA, gl::UNSIGNED_BYTE).unwrap();
        let mut texel = DEFAULT_TEXEL;
        bgra.decode(&[0, 51, 255, 102], false, &mut texel);
        assert_eq!(texel, [1.0, 0.2, 0.0, 0.4]);
        let mut out = [0u8; 4];
        bgra.encode(&texel, false, &mut out);
        assert_eq!(out, [0, 51, 255, 102]);
    }

    #[test]
    fn test_swap_bytes_on_shorts() {
        let red = PixelFormat::new(gl::RED, gl::UNSIGNED_SHORT).unwrap();
        let mut texel = DEFAULT_TEXEL;
        let bytes = 65_535u16.to_ne_bytes();
        red.decode(&bytes, true, &mut texel);
        assert_eq!(texel[0], 1.0);

        let mut out = [0u8; 2];
        red.encode(&[0.0, 0.0, 0.0, 1.0], true, &mut out);
        assert_eq!(out, [0, 0]);
        let half = PixelFormat::new(gl::RED, gl::UNSIGNED_SHORT).unwrap();
        half.encode(&[1.0, 0.0, 0.0, 1.0], true, &mut out);
        assert_eq!(out, [0xff, 0xff]);
        // 0x0100 swapped is 0x0001
        half.decode(&0x0100u16.to_ne_bytes(), true, &mut texel);
        assert_eq!(texel[0], (1.0f64 / 65_535.0) as f32);
    }

    #[test]
    fn test_packed_formats() {
        let rev = PixelFormat::new(gl::RGBA, gl::UNSIGNED_INT_8_8_8_8_REV).unwrap();
        let mut texel = DEFAULT_TEXEL;
        rev.decode(&0x00ff_0000u32.to_ne_bytes(), false, &mut texel);
        assert_eq!(texel, [0.0, 0.0, 1.0, 0.0]);

        let ds = PixelFormat::new(gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8).unwrap();
        ds.decode(&0xffff_ff07u32.to_ne_bytes(), false, &mut texel);
        assert_eq!(texel[0], 1.0);
        assert_eq!(texel[1], 7.0);
        let mut out = [0u8; 4];
        ds.encode(&texel, false, &mut out);
        assert_eq!(u32::from_ne_bytes(out), 0xffff_ff07);
    }

    #[test]
    fn test_unpack_then_pack_with_row_padding() {
        let rgb = PixelFormat::new(gl::RGB, gl::UNSIGNED_BYTE).unwrap();
        let layout = Layout::new(&PixelStore::default(), &rgb, 2, 1, 2, 1);
        let input = [255, 0, 0, 99, 0, 255, 0];
        let texels = unpack(&input, &layout, &rgb);
        assert_eq!(texels, vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]]);

        let mut output = [7u8; 7];
        pack(&mut output, &layout, &rgb, &texels);
        assert_eq!(output, [255, 0, 0, 7, 0, 255, 0]);
    }

    #[test]
    fn test_store_fills_absent_channels() {
        let rgb8 = internal_format(gl::RGB8).unwrap();
        assert_eq!(rgb8.store([0.5, 2.0, -1.0, 0.25]), [0.5, 1.0, 0.0, 1.0]);
        let r32f = internal_format(gl::R32F).unwrap();
        assert_eq!(r32f.store([4.0, 1.0, 1.0, 0.0]), [4.0, 0.0, 0.0, 1.0]);
        let depth = internal_format(gl::DEPTH24_STENCIL8).unwrap();
        assert_eq!(depth.channel_type(gl::TEXTURE_DEPTH_TYPE), gl::UNSIGNED_NORMALIZED);
        assert_eq!(depth.channel_type(gl::TEXTURE_RED_TYPE), gl::NONE);
    }
}
