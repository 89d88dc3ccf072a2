//! Presenting surfaces
//!
//! A surface is whatever screen region the host positions a HUD over: a
//! window, a panel, a terminal session. The presenter never owns a surface;
//! it keeps a weak reference and treats a dropped surface as "already
//! removed".

use std::fmt;
use std::sync::Arc;

/// A region a HUD can be presented over.
///
/// The library only needs identity and liveness from a surface; hosts
/// implement this on their own view/screen types and hand the presenter an
/// `Arc<dyn Surface>`. Dropping the last strong reference makes any HUD on
/// that surface tear itself down the next time a timer or animation touches
/// it.
pub trait Surface: Send + Sync + 'static {
    /// Short label used in log output.
    fn label(&self) -> &str {
        "surface"
    }
}

/// Identity of a presenting surface, derived from the allocation behind the
/// host's `Arc`. Stable across clones of the same `Arc`, distinct between
/// different surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

impl SurfaceId {
    /// The id the presenter and renderers will use for this surface.
    pub fn of(surface: &Arc<dyn Surface>) -> Self {
        SurfaceId(Arc::as_ptr(surface) as *const () as usize)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
