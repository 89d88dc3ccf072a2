//! superhud - transient centered overlay (HUD) presenter
//!
//! A HUD is a small popup box over a presenting surface showing a loading
//! spinner, an icon, a title, and/or a message: "Loading...", "Done!",
//! "1 new message". This crate owns the lifecycle of at most one HUD per
//! surface - appear, update in place, auto-dismiss, tap-to-dismiss, cycle
//! loading messages - and drives all drawing through the [`Renderer`]
//! trait. A terminal backend ([`term::TermRenderer`]) and a recording
//! backend for tests ([`testing::RecordingRenderer`]) are included.
//!
//! ```no_run
//! use std::sync::Arc;
//! use superhud::{HudPresenter, HudRequest, IconKind, Surface};
//!
//! struct Screen;
//! impl Surface for Screen {}
//!
//! # async fn demo() -> Result<(), superhud::RenderError> {
//! let presenter = HudPresenter::new(Arc::new(superhud::term::TermRenderer::stdout()));
//! let screen: Arc<dyn Surface> = Arc::new(Screen);
//!
//! presenter.show_or_update(&screen, HudRequest::loading("Loading...")).await?;
//! // ... work ...
//! presenter
//!     .show_or_update(&screen, HudRequest::icon(IconKind::CheckMark, "Done!"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod appearance;
pub mod content;
pub mod messages;
pub mod presenter;
pub mod render;
pub mod request;
pub mod scene;
pub mod surface;
pub mod term;
pub mod testing;

pub use appearance::{BlurEffect, Color, FontSpec, HudAppearance, ShadowSpec};
pub use content::{
    AccessorySpec, AutoRemove, ContentSpec, HudStatus, IconKind, Image, ImageSource, Language,
    ParticleEffect,
};
pub use presenter::HudPresenter;
pub use render::{RenderError, Renderer};
pub use request::HudRequest;
pub use scene::{Region, Scene};
pub use surface::{Surface, SurfaceId};
