//! Show requests
//!
//! A `HudRequest` bundles everything one `show_or_update` call carries:
//! content, accessory, auto-remove policy, optional particle effect, and an
//! optional status callback. Constructors cover the common shapes; the
//! auto-remove defaults follow them (loading content persists, icon and
//! message content uses the appearance's default duration).

use std::fmt;
use std::time::Duration;

use crate::content::{
    AccessorySpec, AutoRemove, ContentSpec, HudStatus, IconKind, Image, ImageSource, Language,
    ParticleEffect,
};

pub(crate) type StatusCallback = Box<dyn FnMut(HudStatus) + Send + 'static>;

/// One show-or-update request.
pub struct HudRequest {
    pub content: ContentSpec,
    pub accessory: AccessorySpec,
    pub auto_remove: AutoRemove,
    pub particle_effect: Option<ParticleEffect>,
    pub(crate) on_status: Option<StatusCallback>,
}

impl HudRequest {
    /// Bare request; combine with the builder methods below.
    pub fn new(content: ContentSpec, accessory: AccessorySpec) -> Self {
        HudRequest {
            content,
            accessory,
            auto_remove: AutoRemove::Default,
            particle_effect: None,
            on_status: None,
        }
    }

    /// A plain text message, auto-removed after the default duration.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(ContentSpec::Message(text.into()), AccessorySpec::None)
    }

    /// A title over a message, auto-removed after the default duration.
    pub fn titled(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ContentSpec::TitledMessage {
                title: Some(title.into()),
                message: Some(message.into()),
            },
            AccessorySpec::None,
        )
    }

    /// A loading spinner with a message. Persists until removed.
    pub fn loading(text: impl Into<String>) -> Self {
        Self::new(ContentSpec::Message(text.into()), AccessorySpec::Spinner)
            .auto_remove(AutoRemove::No)
    }

    /// A loading spinner cycling through `messages` in order. Persists until
    /// removed.
    pub fn loading_messages(messages: Vec<String>) -> Self {
        Self::new(ContentSpec::MessageList(messages), AccessorySpec::Spinner)
            .auto_remove(AutoRemove::No)
    }

    /// A loading spinner cycling randomly through the built-in funny
    /// messages. Persists until removed.
    pub fn funny_messages(language: Language) -> Self {
        Self::new(
            ContentSpec::FunnyMessages(language),
            AccessorySpec::Spinner,
        )
        .auto_remove(AutoRemove::No)
    }

    /// A built-in icon with a message, auto-removed after the default
    /// duration.
    pub fn icon(icon: IconKind, text: impl Into<String>) -> Self {
        Self::new(
            ContentSpec::Message(text.into()),
            AccessorySpec::Icon(ImageSource::Builtin(icon)),
        )
    }

    /// A caller-supplied image with a message, auto-removed after the
    /// default duration.
    pub fn image(image: Image, text: impl Into<String>) -> Self {
        Self::new(
            ContentSpec::Message(text.into()),
            AccessorySpec::Icon(ImageSource::Raw(image)),
        )
    }

    /// Override the auto-remove policy.
    pub fn auto_remove(mut self, policy: AutoRemove) -> Self {
        self.auto_remove = policy;
        self
    }

    /// Shorthand for `auto_remove(AutoRemove::After(duration))`.
    pub fn after(self, duration: Duration) -> Self {
        self.auto_remove(AutoRemove::After(duration))
    }

    /// Draw a particle effect behind the HUD box.
    pub fn particle_effect(mut self, effect: ParticleEffect) -> Self {
        self.particle_effect = Some(effect);
        self
    }

    /// Observe this HUD's lifecycle. A later request's callback (including
    /// none) replaces this one.
    pub fn on_status(mut self, callback: impl FnMut(HudStatus) + Send + 'static) -> Self {
        self.on_status = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for HudRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HudRequest")
            .field("content", &self.content)
            .field("accessory", &self.accessory)
            .field("auto_remove", &self.auto_remove)
            .field("particle_effect", &self.particle_effect)
            .field("on_status", &self.on_status.as_ref().map(|_| "..."))
            .finish()
    }
}
