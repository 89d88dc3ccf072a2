//! The renderer seam
//!
//! The presenter drives everything visual through this trait. Animation
//! methods are async and resolve when the animation has settled; the
//! presenter sequences them (a region is always fully faded out before its
//! replacement fades in) and guards against stale completions itself, so
//! renderers stay dumb: draw what they are told, take roughly as long as
//! they are told.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::scene::{Region, Scene};
use crate::surface::SurfaceId;

/// Errors surfaced by a renderer.
///
/// Only construction can fail; everything after a successful attach is
/// best-effort. A construction failure indicates a packaging or backend
/// defect, not a runtime condition.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to construct hud view: {0}")]
    Construction(String),
    #[error("render backend i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Visual backend driven by the presenter.
///
/// Implementations must not call back into the presenter; they only draw.
#[async_trait]
pub trait Renderer: Send + Sync + 'static {
    /// Build and attach the HUD view for `surface`, initially fully hidden.
    fn attach(&self, surface: SurfaceId, scene: &Scene) -> Result<(), RenderError>;

    /// Tear the view down. Absence is a no-op.
    fn detach(&self, surface: SurfaceId);

    /// Swap the displayed scene while the affected regions are hidden.
    fn apply(&self, surface: SurfaceId, scene: &Scene);

    /// Fade/scale the whole HUD in. Resolves when the animation settles.
    async fn animate_in(&self, surface: SurfaceId, duration: Duration);

    /// Fade the whole HUD out.
    async fn animate_out(&self, surface: SurfaceId, duration: Duration);

    /// Fade the given body regions in.
    async fn fade_in(&self, surface: SurfaceId, regions: Region, duration: Duration);

    /// Fade the given body regions out.
    async fn fade_out(&self, surface: SurfaceId, regions: Region, duration: Duration);
}
