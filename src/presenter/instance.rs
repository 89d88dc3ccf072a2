//! Live HUD instance state
//!
//! One `HudInstance` exists per presenting surface while a HUD is anywhere
//! between appearing and disappearing. All mutation happens under the slot
//! lock in `presenter`; this module only defines the state and the small
//! invariant-preserving helpers on it.

use std::sync::Weak;
use std::time::Duration;

use crate::content::{AutoRemove, HudStatus};
use crate::messages::MessageCycler;
use crate::request::{HudRequest, StatusCallback};
use crate::scene::Scene;
use crate::surface::{Surface, SurfaceId};

use super::timers::TimerHandle;

/// Where the instance is in its lifecycle. `Absent` is represented by the
/// instance not existing in the registry at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Animating in after creation.
    Appearing,
    /// Settled and visible.
    Displaying,
    /// A content swap's fades are in flight.
    Transitioning,
    /// Animating out before detach.
    Disappearing,
}

/// Callback invoked once removal completes.
pub(crate) type DoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// A request that arrived while an animation was in flight. Depth-1 queue,
/// latest wins: a newer request silently replaces an older queued one.
pub(crate) enum Pending {
    Show(HudRequest),
    Remove {
        animated: bool,
        on_done: Option<DoneCallback>,
    },
}

pub(crate) struct HudInstance {
    pub(crate) id: SurfaceId,
    /// Non-owning back-reference; the HUD is positioned within the surface,
    /// it never keeps it alive.
    pub(crate) surface: Weak<dyn Surface>,
    pub(crate) phase: Phase,
    /// Bumped on every takeover (transition, disappear, teardown, re-arm).
    /// Timers and animation continuations capture the epoch they were
    /// scheduled under and give up when it no longer matches.
    pub(crate) epoch: u64,
    /// What the renderer is currently showing (or animating towards).
    pub(crate) scene: Scene,
    pub(crate) cycler: Option<MessageCycler>,
    pub(crate) auto_remove: AutoRemove,
    pub(crate) pending: Option<Pending>,
    pub(crate) dismiss_timer: Option<TimerHandle>,
    pub(crate) cycle_timer: Option<TimerHandle>,
    pub(crate) on_status: Option<StatusCallback>,
}

impl HudInstance {
    pub(crate) fn new(
        id: SurfaceId,
        surface: Weak<dyn Surface>,
        scene: Scene,
        cycler: Option<MessageCycler>,
        auto_remove: AutoRemove,
        on_status: Option<StatusCallback>,
    ) -> Self {
        HudInstance {
            id,
            surface,
            phase: Phase::Appearing,
            epoch: 0,
            scene,
            cycler,
            auto_remove,
            pending: None,
            dismiss_timer: None,
            cycle_timer: None,
            on_status,
        }
    }

    /// Invalidate all outstanding timers and continuations: cancels both
    /// timer handles and bumps the epoch. Returns the new epoch for
    /// whatever work takes over next.
    pub(crate) fn bump(&mut self) -> u64 {
        self.cancel_timers();
        self.epoch += 1;
        self.epoch
    }

    pub(crate) fn cancel_timers(&mut self) {
        if let Some(timer) = self.dismiss_timer.take() {
            timer.cancel();
        }
        if let Some(timer) = self.cycle_timer.take() {
            timer.cancel();
        }
    }

    pub(crate) fn surface_alive(&self) -> bool {
        self.surface.strong_count() > 0
    }

    /// Replace any queued request; latest wins.
    pub(crate) fn set_pending(&mut self, pending: Pending) {
        self.pending = Some(pending);
    }

    /// Delay the dismiss timer should use, if any. Zero means no timer.
    pub(crate) fn dismiss_delay(&self) -> Option<Duration> {
        let delay = match self.auto_remove {
            AutoRemove::No => return None,
            AutoRemove::Default => self.scene.appearance.default_duration,
            AutoRemove::After(delay) => delay,
        };
        (delay > Duration::ZERO).then_some(delay)
    }

    pub(crate) fn fire_status(&mut self, status: HudStatus) {
        if let Some(callback) = self.on_status.as_mut() {
            callback(status);
        }
    }
}
