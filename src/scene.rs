//! Resolved scenes handed to the renderer
//!
//! A `Scene` is the complete visual description of a HUD at one moment: the
//! appearance snapshot taken when the content was assigned, the accessory,
//! and the resolved title/message strings (cycling content resolves to the
//! cycler's current string). The presenter diffs scenes to decide which
//! regions need to fade across a content swap.

use bitflags::bitflags;

use crate::appearance::HudAppearance;
use crate::content::{AccessorySpec, ContentSpec, ParticleEffect};
use crate::messages::MessageCycler;

bitflags! {
    /// Parts of the HUD body a fade applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Region: u8 {
        const ACCESSORY = 1 << 0;
        const TITLE = 1 << 1;
        const MESSAGE = 1 << 2;
    }
}

impl Region {
    /// Every content region of the HUD body.
    pub const BODY: Region = Region::all();
}

/// Complete visual description of a HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Appearance snapshot taken at content-assignment time.
    pub appearance: HudAppearance,
    pub accessory: AccessorySpec,
    pub title: Option<String>,
    pub message: Option<String>,
    pub particle_effect: Option<ParticleEffect>,
}

impl Scene {
    /// Resolve content + accessory against an appearance snapshot.
    pub fn compose(
        appearance: HudAppearance,
        content: &ContentSpec,
        accessory: &AccessorySpec,
        particle_effect: Option<ParticleEffect>,
        cycler: Option<&MessageCycler>,
    ) -> Self {
        let (title, message) = match content {
            ContentSpec::None => (None, None),
            ContentSpec::Message(message) => (None, Some(message.clone())),
            ContentSpec::MessageList(_) | ContentSpec::FunnyMessages(_) => {
                (None, cycler.map(|c| c.current().to_string()))
            }
            ContentSpec::TitledMessage { title, message } => (title.clone(), message.clone()),
        };

        Scene {
            appearance,
            accessory: accessory.clone(),
            title,
            message,
            particle_effect,
        }
    }

    /// Regions whose content differs between `self` and `next`.
    ///
    /// Appearance-only changes report no regions: already-rendered elements
    /// keep their prior styling until their next content transition.
    pub fn diff(&self, next: &Scene) -> Region {
        let mut regions = Region::empty();
        if self.accessory != next.accessory {
            regions |= Region::ACCESSORY;
        }
        if self.title != next.title {
            regions |= Region::TITLE;
        }
        if self.message != next.message {
            regions |= Region::MESSAGE;
        }
        regions
    }
}
