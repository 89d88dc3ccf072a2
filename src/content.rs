//! HUD content model
//!
//! What a HUD shows is split into text content (`ContentSpec`) and a single
//! accessory above it (`AccessorySpec`): a loading spinner or an icon.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Text content of the HUD body. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSpec {
    /// No text.
    None,
    /// A single message line.
    Message(String),
    /// An ordered list of messages, cycled in order at a fixed interval.
    MessageList(Vec<String>),
    /// Optional title over an optional message.
    TitledMessage {
        title: Option<String>,
        message: Option<String>,
    },
    /// Built-in localized placeholder loading strings, cycled randomly.
    FunnyMessages(Language),
}

/// Language of the built-in funny loading messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Swedish,
}

/// The visual element above the text: spinner, icon, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessorySpec {
    None,
    /// Animated loading spinner.
    Spinner,
    Icon(ImageSource),
}

/// Where an icon's pixels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// One of the icons bundled with the library.
    Builtin(IconKind),
    /// A caller-supplied image.
    Raw(Image),
}

/// Icons bundled with the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    CheckMark,
    Email,
    HappyFace,
    SadFace,
    Info,
}

/// Opaque caller-supplied image payload, passed through to the renderer
/// untouched.
#[derive(Clone)]
pub struct Image {
    name: Option<String>,
    data: Arc<[u8]>,
}

impl Image {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Image {
            name: None,
            data: data.into(),
        }
    }

    pub fn named(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Image {
            name: Some(name.into()),
            data: data.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && (Arc::ptr_eq(&self.data, &other.data) || self.data == other.data)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// When, if ever, the HUD removes itself without caller action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRemove {
    /// Persist until an explicit remove or tap.
    No,
    /// Remove after the appearance's default duration.
    Default,
    /// Remove after the given delay. Zero behaves like `No`.
    After(Duration),
}

/// Particle effect drawn behind the HUD box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleEffect {
    Sparkles,
    Confetti,
    Snow,
}

/// Lifecycle notifications delivered to a request's status callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudStatus {
    /// The HUD finished appearing on a surface it was absent from.
    Presented,
    /// An update to an already-visible HUD settled.
    Updated,
    /// The HUD left the surface.
    Removed,
}
