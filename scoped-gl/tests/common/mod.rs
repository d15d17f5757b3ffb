use scoped_gl::{Gl, SoftGl};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Routes driver and wrapper logs to the test output. Filter with `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A software context with a `width` x `height` default framebuffer.
pub fn context(width: u32, height: u32) -> Gl {
    init_logging();
    Gl::new(Rc::new(SoftGl::new(width, height)))
}

/// Like [`context`], also returning the driver for inspection.
pub fn soft_context(width: u32, height: u32) -> (Gl, Rc<SoftGl>) {
    init_logging();
    let soft = Rc::new(SoftGl::new(width, height));
    (Gl::new(soft.clone()), soft)
}
