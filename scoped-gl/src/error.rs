use crate::api::Gl;
use crate::gl;
use crate::gl::types::GLenum;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Error flag reported by the driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DriverError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
    InvalidFramebufferOperation,
    Unknown(GLenum),
}

impl DriverError {
    /// Converts a `glGetError` value. Returns `None` for `NO_ERROR`.
    pub fn from_gl(code: GLenum) -> Option<DriverError> {
        match code {
            gl::NO_ERROR => None,
            gl::INVALID_ENUM => Some(DriverError::InvalidEnum),
            gl::INVALID_VALUE => Some(DriverError::InvalidValue),
            gl::INVALID_OPERATION => Some(DriverError::InvalidOperation),
            gl::OUT_OF_MEMORY => Some(DriverError::OutOfMemory),
            gl::INVALID_FRAMEBUFFER_OPERATION => Some(DriverError::InvalidFramebufferOperation),
            other => Some(DriverError::Unknown(other)),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DriverError::InvalidEnum => f.write_str("invalid enum"),
            DriverError::InvalidValue => f.write_str("invalid value"),
            DriverError::InvalidOperation => f.write_str("invalid operation"),
            DriverError::OutOfMemory => f.write_str("out of memory"),
            DriverError::InvalidFramebufferOperation => {
                f.write_str("invalid framebuffer operation")
            }
            DriverError::Unknown(code) => write!(f, "unknown error {:#06x}", code),
        }
    }
}

/// Where a checked driver call was issued from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "file '{}' module '{}' line {}", self.file, self.module, self.line)
    }
}

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("OpenGL error: {kind}. {site} '{call}'")]
    Driver {
        kind: DriverError,
        call: &'static str,
        site: CallSite,
    },
    #[error("compilation failed: '{0}'")]
    Compile(String),
    #[error("linkage failed: '{0}'")]
    Link(String),
    #[error("validation failed: '{0}'")]
    Validation(String),
    #[error("framebuffer incomplete (status {0:#06x})")]
    FramebufferIncomplete(GLenum),
    #[error("unexpected {what} value returned by the driver: {value:#06x}")]
    UnknownEnum { what: &'static str, value: GLenum },
}

impl Error {
    /// Returns the driver error kind if this is a driver error.
    pub fn driver_error(&self) -> Option<DriverError> {
        match *self {
            Error::Driver { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type GlResult<T> = Result<T, Error>;

/// Discards errors left over by unchecked calls, so that the next check only sees errors from the
/// checked call.
#[doc(hidden)]
pub fn flush_errors(gl: &Gl) {
    // the error flag set is finite; bound the loop in case a driver never clears it
    for _ in 0..16 {
        match DriverError::from_gl(gl.get_error()) {
            Some(stale) => warn!(%stale, "discarding stale driver error"),
            None => break,
        }
    }
}

#[doc(hidden)]
pub fn check_error(gl: &Gl, call: &'static str, site: CallSite) -> GlResult<()> {
    match DriverError::from_gl(gl.get_error()) {
        Some(kind) => Err(Error::Driver { kind, call, site }),
        None => Ok(()),
    }
}

/// Issues a driver call and, in checked builds, converts a raised error flag into
/// [`Error::Driver`] (returned with `?` from the enclosing function).
///
/// Checks are active with `debug_assertions` or the `check-errors` feature; otherwise the macro
/// expands to the bare call.
#[macro_export]
macro_rules! glcheck {
    ($gl:expr, $call:expr) => {{
        #[cfg(any(debug_assertions, feature = "check-errors"))]
        $crate::error::flush_errors(&$gl);
        #[allow(clippy::let_unit_value)]
        let result = $call;
        #[cfg(any(debug_assertions, feature = "check-errors"))]
        $crate::error::check_error(
            &$gl,
            stringify!($call),
            $crate::error::CallSite {
                file: file!(),
                line: line!(),
                module: module_path!(),
            },
        )?;
        result
    }};
}
