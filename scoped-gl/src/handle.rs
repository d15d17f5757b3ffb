/// Implements the handle accessors and the delete-on-drop behavior shared by owning wrappers.
///
/// The wrapper must have a `gl: Gl` and an `id: GLuint` field. `id == 0` means no object.
macro_rules! impl_handle_type {
    ($name:ident, $kind:literal, |$gl:ident, $id:ident| $delete:expr) => {
        impl $name {
            /// Returns the raw object name, or 0 if no object is allocated.
            pub fn id(&self) -> $crate::gl::types::GLuint {
                self.id
            }

            /// Returns whether an object is currently allocated.
            pub fn created(&self) -> bool {
                self.id != 0
            }

            /// Returns the context the object belongs to.
            pub fn gl(&self) -> &$crate::api::Gl {
                &self.gl
            }

            /// Deletes the underlying object. Does nothing if no object is allocated.
            pub fn remove(&mut self) {
                if self.id != 0 {
                    let $gl = &self.gl;
                    let $id = self.id;
                    tracing::trace!(id = $id, kind = $kind, "delete");
                    $delete;
                    self.id = 0;
                }
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                self.remove()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.id).finish()
            }
        }
    };
}
