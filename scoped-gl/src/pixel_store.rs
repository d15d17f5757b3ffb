//! Pixel transfer settings.
//!
//! These describe the client-side memory layout of pixel data (byte order, row stride, alignment,
//! skip offsets). They are applied to the context right before each transfer.
use crate::api::Gl;
use crate::error::GlResult;
use crate::gl;
use crate::gl::types::*;

macro_rules! impl_pixel_settings {
    (
        $(#[$m:meta])*
        $name:ident {
            swap_bytes: $swap_bytes:ident,
            lsb_first: $lsb_first:ident,
            row_length: $row_length:ident,
            image_height: $image_height:ident,
            skip_rows: $skip_rows:ident,
            skip_pixels: $skip_pixels:ident,
            skip_images: $skip_images:ident,
            alignment: $alignment:ident,
        }
    ) => {
        $(#[$m])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            pub swap_bytes: bool,
            pub lsb_first: bool,
            pub row_length: i32,
            pub image_height: i32,
            pub skip_rows: i32,
            pub skip_pixels: i32,
            pub skip_images: i32,
            pub alignment: i32,
        }

        impl Default for $name {
            fn default() -> Self {
                $name {
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

        impl $name {
            /// Writes every setting to the context.
            pub fn apply(&self, gl: &Gl) -> GlResult<()> {
                let params: [(GLenum, GLint); 8] = [
                    (gl::$swap_bytes, self.swap_bytes as GLint),
                    (gl::$lsb_first, self.lsb_first as GLint),
                    (gl::$row_length, self.row_length),
                    (gl::$image_height, self.image_height),
                    (gl::$skip_rows, self.skip_rows),
                    (gl::$skip_pixels, self.skip_pixels),
                    (gl::$skip_images, self.skip_images),
                    (gl::$alignment, self.alignment),
                ];
                for &(pname, value) in params.iter() {
                    glcheck!(gl, gl.pixel_store(pname, value));
                }
                Ok(())
            }

            pub fn swap_bytes(mut self, value: bool) -> Self {
                self.swap_bytes = value;
                self
            }

            pub fn lsb_first(mut self, value: bool) -> Self {
                self.lsb_first = value;
                self
            }

            pub fn row_length(mut self, value: i32) -> Self {
                self.row_length = value;
                self
            }

            pub fn image_height(mut self, value: i32) -> Self {
                self.image_height = value;
                self
            }

            pub fn skip_rows(mut self, value: i32) -> Self {
                self.skip_rows = value;
                self
            }

            pub fn skip_pixels(mut self, value: i32) -> Self {
                self.skip_pixels = value;
                self
            }

            pub fn skip_images(mut self, value: i32) -> Self {
                self.skip_images = value;
                self
            }

            /// Row alignment in bytes: 1, 2, 4 or 8.
            pub fn alignment(mut self, value: i32) -> Self {
                self.alignment = value;
                self
            }
        }
    };
}

impl_pixel_settings!(
    /// Layout of client memory written by readbacks (`read_pixels`, `get_tex_image`).
    PixelPackSettings {
        swap_bytes: PACK_SWAP_BYTES,
        lsb_first: PACK_LSB_FIRST,
        row_length: PACK_ROW_LENGTH,
        image_height: PACK_IMAGE_HEIGHT,
        skip_rows: PACK_SKIP_ROWS,
        skip_pixels: PACK_SKIP_PIXELS,
        skip_images: PACK_SKIP_IMAGES,
        alignment: PACK_ALIGNMENT,
    }
);

impl_pixel_settings!(
    /// Layout of client memory read by uploads (`tex_image_*`, `tex_sub_image_*`, `draw_pixels`).
    PixelUnpackSettings {
        swap_bytes: UNPACK_SWAP_BYTES,
        lsb_first: UNPACK_LSB_FIRST,
        row_length: UNPACK_ROW_LENGTH,
        image_height: UNPACK_IMAGE_HEIGHT,
        skip_rows: UNPACK_SKIP_ROWS,
        skip_pixels: UNPACK_SKIP_PIXELS,
        skip_images: UNPACK_SKIP_IMAGES,
        alignment: UNPACK_ALIGNMENT,
    }
);

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::soft::SoftGl;
    use std::rc::Rc;

    #[test]
    fn test_apply_writes_context_state() {
        let gl = Gl::new(Rc::new(SoftGl::new(4, 4)));
        PixelPackSettings::default()
            .row_length(17)
            .alignment(1)
            .skip_rows(2)
            .apply(&gl)
            .unwrap();
        assert_eq!(gl.get_integer(gl::PACK_ROW_LENGTH), 17);
        assert_eq!(gl.get_integer(gl::PACK_ALIGNMENT), 1);
        assert_eq!(gl.get_integer(gl::PACK_SKIP_ROWS), 2);
        // unpack state is untouched
        assert_eq!(gl.get_integer(gl::UNPACK_ALIGNMENT), 4);
    }

    #[test]
    fn test_invalid_alignment_is_reported() {
        let gl = Gl::new(Rc::new(SoftGl::new(4, 4)));
        let result = PixelUnpackSettings::default().alignment(3).apply(&gl);
        if cfg!(debug_assertions) {
            assert_eq!(
                result.unwrap_err().driver_error(),
                Some(crate::DriverError::InvalidValue)
            );
        }
    }
}
