//! HUD presenter
//!
//! Owns the lifecycle of at most one HUD per presenting surface. The
//! presenter is a cheap clone (shared state behind an `Arc`); timers and
//! animation continuations run as spawned tasks holding clones.
//!
//! ## State machine
//!
//! An instance moves through `Appearing → Displaying → Transitioning →
//! Displaying → ... → Disappearing`; `Absent` is the instance not existing
//! in the registry. Requests that arrive while an animation is in flight
//! are serialized through a depth-1 pending slot, latest wins: intermediate
//! requests are dropped, the newest is processed when the in-flight
//! animation settles. A request queued behind a disappearing HUD
//! re-presents it from scratch after detach.
//!
//! Stale scheduled work is fenced by a per-instance epoch: every takeover
//! (content swap, removal, teardown, timer re-arm) cancels both timers and
//! bumps the epoch, and every timer fire or animation completion re-checks
//! the epoch under the slot lock before acting.

mod instance;
mod timers;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use dashmap::mapref::entry::{Entry, VacantEntry};
use dashmap::DashMap;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::appearance::HudAppearance;
use crate::content::HudStatus;
use crate::messages::MessageCycler;
use crate::render::{RenderError, Renderer};
use crate::request::HudRequest;
use crate::scene::{Region, Scene};
use crate::surface::{Surface, SurfaceId};

use instance::{DoneCallback, HudInstance, Pending, Phase};

type Slot = Arc<Mutex<HudInstance>>;

struct PresenterShared {
    renderer: Arc<dyn Renderer>,
    appearance: RwLock<HudAppearance>,
    registry: DashMap<SurfaceId, Slot>,
}

/// Presents, updates, and removes HUDs over surfaces.
#[derive(Clone)]
pub struct HudPresenter {
    inner: Arc<PresenterShared>,
}

impl HudPresenter {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        HudPresenter {
            inner: Arc::new(PresenterShared {
                renderer,
                appearance: RwLock::new(HudAppearance::default()),
                registry: DashMap::new(),
            }),
        }
    }

    /// Snapshot of the current appearance configuration.
    pub fn appearance(&self) -> HudAppearance {
        match self.inner.appearance.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the appearance configuration. Affects the next HUD created
    /// or updated; HUDs already on screen keep their styling until their
    /// next content transition.
    pub fn set_appearance(&self, appearance: HudAppearance) {
        match self.inner.appearance.write() {
            Ok(mut guard) => *guard = appearance,
            Err(poisoned) => *poisoned.into_inner() = appearance,
        }
    }

    /// Mutate the appearance configuration in place.
    pub fn update_appearance(&self, mutate: impl FnOnce(&mut HudAppearance)) {
        match self.inner.appearance.write() {
            Ok(mut guard) => mutate(&mut guard),
            Err(poisoned) => mutate(&mut poisoned.into_inner()),
        }
    }

    /// Show a HUD on `surface`, or update the one already there.
    ///
    /// Returns after the synchronous part (lookup-or-create, diff, timer
    /// re-arm, queueing); animations proceed on spawned tasks. The only
    /// error is a renderer construction failure on first attach; every
    /// absent-target condition is a silent no-op.
    pub async fn show_or_update(
        &self,
        surface: &Arc<dyn Surface>,
        request: HudRequest,
    ) -> Result<(), RenderError> {
        let id = SurfaceId::of(surface);
        loop {
            let existing = match self.inner.registry.entry(id) {
                Entry::Vacant(entry) => return self.create_and_appear(entry, surface, id, request),
                Entry::Occupied(entry) => entry.get().clone(),
            };
            let mut inst = existing.lock().await;
            if !inst.surface_alive() {
                // Stale instance for a surface that died (or an address that
                // was reused); tear down and fall through to a fresh attach.
                self.teardown_silent(&mut inst);
                drop(inst);
                continue;
            }
            if inst.phase == Phase::Displaying {
                self.begin_transition(&existing, &mut inst, request);
            } else {
                debug!(surface = %id, phase = ?inst.phase, "animation in flight; queueing latest request");
                inst.set_pending(Pending::Show(request));
            }
            return Ok(());
        }
    }

    /// Remove the HUD from `surface`, if any.
    pub async fn remove(&self, surface: &Arc<dyn Surface>, animated: bool) {
        self.remove_impl(SurfaceId::of(surface), animated, None).await;
    }

    /// Remove the HUD from `surface`, invoking `on_done` once it is fully
    /// detached. `on_done` does not fire if no HUD was attached.
    pub async fn remove_with(
        &self,
        surface: &Arc<dyn Surface>,
        animated: bool,
        on_done: impl FnOnce() + Send + 'static,
    ) {
        self.remove_impl(SurfaceId::of(surface), animated, Some(Box::new(on_done)))
            .await;
    }

    /// Remove every HUD on every surface. Resolves when all are gone.
    pub async fn dismiss_all(&self, animated: bool) {
        let slots: Vec<(SurfaceId, Slot)> = self
            .inner
            .registry
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut waiters = Vec::new();
        for (id, slot) in slots {
            let mut inst = slot.lock().await;
            if !inst.surface_alive() {
                self.teardown_silent(&mut inst);
                continue;
            }
            let (tx, rx) = oneshot::channel::<()>();
            let done: DoneCallback = Box::new(move || {
                let _ = tx.send(());
            });
            match inst.phase {
                Phase::Displaying => {
                    self.begin_disappear(&slot, &mut inst, animated, Some(done));
                    waiters.push(rx);
                }
                Phase::Disappearing => {
                    debug!(surface = %id, "dismiss_all: already disappearing");
                }
                _ => {
                    inst.set_pending(Pending::Remove {
                        animated,
                        on_done: Some(done),
                    });
                    waiters.push(rx);
                }
            }
        }

        let _ = futures::future::join_all(waiters).await;
    }

    /// The host's tap entry point. Removes the HUD when the appearance's
    /// `cancelable_on_touch` flag is set, regardless of any pending
    /// auto-dismiss timer; otherwise does nothing.
    pub async fn tap(&self, surface: &Arc<dyn Surface>) {
        if self.appearance().cancelable_on_touch {
            debug!("tap: removing hud");
            self.remove(surface, true).await;
        } else {
            debug!("tap ignored; cancelable_on_touch is off");
        }
    }

    /// Whether a HUD is currently bound to `surface` (in any phase).
    pub fn is_presenting(&self, surface: &Arc<dyn Surface>) -> bool {
        self.inner.registry.contains_key(&SurfaceId::of(surface))
    }

    /// Number of surfaces with a HUD bound.
    pub fn active_count(&self) -> usize {
        self.inner.registry.len()
    }

    // --- create / appear -------------------------------------------------

    fn create_and_appear(
        &self,
        entry: VacantEntry<'_, SurfaceId, Slot>,
        surface: &Arc<dyn Surface>,
        id: SurfaceId,
        request: HudRequest,
    ) -> Result<(), RenderError> {
        let appearance = self.appearance();
        let cycler = MessageCycler::for_content(&request.content);
        let scene = Scene::compose(
            appearance,
            &request.content,
            &request.accessory,
            request.particle_effect,
            cycler.as_ref(),
        );
        self.inner.renderer.attach(id, &scene)?;

        let animate_in = scene.appearance.animate_in;
        let instance = HudInstance::new(
            id,
            Arc::downgrade(surface),
            scene,
            cycler,
            request.auto_remove,
            request.on_status,
        );
        let slot: Slot = Arc::new(Mutex::new(instance));
        entry.insert(slot.clone());
        info!(surface = %id, label = surface.label(), "hud attached; appearing");
        self.spawn_appear(slot, id, 0, animate_in);
        Ok(())
    }

    fn spawn_appear(&self, slot: Slot, id: SurfaceId, epoch: u64, duration: Duration) {
        let presenter = self.clone();
        tokio::spawn(async move {
            presenter.inner.renderer.animate_in(id, duration).await;
            let mut inst = slot.lock().await;
            if inst.epoch != epoch {
                return;
            }
            inst.phase = Phase::Displaying;
            inst.fire_status(HudStatus::Presented);
            info!(surface = %id, "hud presented");
            presenter.settle(&slot, &mut inst);
        });
    }

    // --- update / transition ---------------------------------------------

    fn begin_transition(&self, slot: &Slot, inst: &mut HudInstance, request: HudRequest) {
        let epoch = inst.bump();
        let HudRequest {
            content,
            accessory,
            auto_remove,
            particle_effect,
            on_status,
        } = request;

        let appearance = self.appearance();
        let cycler = MessageCycler::for_content(&content);
        let scene = Scene::compose(
            appearance,
            &content,
            &accessory,
            particle_effect,
            cycler.as_ref(),
        );
        let regions = inst.scene.diff(&scene);

        inst.cycler = cycler;
        inst.auto_remove = auto_remove;
        inst.on_status = on_status;

        if regions.is_empty() {
            // Identical content: nothing to animate, but the dismiss
            // deadline restarts.
            debug!(surface = %inst.id, "identical content; restarting dismiss timer");
            inst.fire_status(HudStatus::Updated);
            self.settle(slot, inst);
            return;
        }

        let out_duration = inst.scene.appearance.animate_out;
        let in_duration = scene.appearance.animate_in;
        inst.scene = scene.clone();
        inst.phase = Phase::Transitioning;
        debug!(surface = %inst.id, ?regions, "content swap; transitioning");
        self.spawn_transition(
            slot.clone(),
            inst.id,
            epoch,
            regions,
            scene,
            out_duration,
            in_duration,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_transition(
        &self,
        slot: Slot,
        id: SurfaceId,
        epoch: u64,
        regions: Region,
        scene: Scene,
        out_duration: Duration,
        in_duration: Duration,
    ) {
        let presenter = self.clone();
        tokio::spawn(async move {
            // The outgoing content is fully faded out before the new content
            // fades in; spinner and icon are never visible together.
            presenter.inner.renderer.fade_out(id, regions, out_duration).await;
            {
                let inst = slot.lock().await;
                if inst.epoch != epoch {
                    return;
                }
                presenter.inner.renderer.apply(id, &scene);
            }
            presenter.inner.renderer.fade_in(id, regions, in_duration).await;

            let mut inst = slot.lock().await;
            if inst.epoch != epoch {
                return;
            }
            inst.phase = Phase::Displaying;
            inst.fire_status(HudStatus::Updated);
            info!(surface = %id, "hud updated");
            presenter.settle(&slot, &mut inst);
        });
    }

    // --- remove / disappear ----------------------------------------------

    async fn remove_impl(&self, id: SurfaceId, animated: bool, on_done: Option<DoneCallback>) {
        let Some(slot) = self.inner.registry.get(&id).map(|entry| entry.value().clone()) else {
            debug!(surface = %id, "remove: no hud attached; ignoring");
            return;
        };
        let mut inst = slot.lock().await;
        if !inst.surface_alive() {
            self.teardown_silent(&mut inst);
            return;
        }
        match inst.phase {
            Phase::Displaying => self.begin_disappear(&slot, &mut inst, animated, on_done),
            Phase::Disappearing => {
                debug!(surface = %id, "remove: already disappearing");
            }
            _ => {
                debug!(surface = %id, phase = ?inst.phase, "animation in flight; queueing removal");
                inst.set_pending(Pending::Remove { animated, on_done });
            }
        }
    }

    fn begin_disappear(
        &self,
        slot: &Slot,
        inst: &mut HudInstance,
        animated: bool,
        on_done: Option<DoneCallback>,
    ) {
        let epoch = inst.bump();
        inst.phase = Phase::Disappearing;
        let out_duration = animated.then_some(inst.scene.appearance.animate_out);
        let presenter = self.clone();
        let slot = slot.clone();
        let id = inst.id;
        tokio::spawn(async move {
            if let Some(duration) = out_duration {
                presenter.inner.renderer.animate_out(id, duration).await;
            }
            let (pending, surface) = {
                let mut inst = slot.lock().await;
                if inst.epoch != epoch {
                    return;
                }
                inst.bump();
                presenter.inner.renderer.detach(id);
                presenter.inner.registry.remove(&id);
                inst.fire_status(HudStatus::Removed);
                (inst.pending.take(), inst.surface.clone())
            };
            info!(surface = %id, "hud removed");
            if let Some(done) = on_done {
                done();
            }
            match pending {
                // A show that arrived mid-disappear re-presents from scratch.
                Some(Pending::Show(request)) => {
                    if let Some(surface) = surface.upgrade() {
                        if let Err(error) = presenter.show_or_update(&surface, request).await {
                            warn!(surface = %id, %error, "failed to re-present queued request");
                        }
                    }
                }
                Some(Pending::Remove {
                    on_done: Some(done),
                    ..
                }) => done(),
                _ => {}
            }
        });
    }

    /// Tear an instance down without animation or callbacks. Used when the
    /// presenting surface has been dropped: per contract that HUD is
    /// treated as already removed.
    fn teardown_silent(&self, inst: &mut HudInstance) {
        debug!(surface = %inst.id, "surface dropped; tearing hud down");
        inst.bump();
        inst.pending = None;
        self.inner.renderer.detach(inst.id);
        self.inner.registry.remove(&inst.id);
    }

    // --- settling and timers ---------------------------------------------

    /// The instance just reached `Displaying`. Process the queued request
    /// if there is one, otherwise (re-)arm the timers.
    fn settle(&self, slot: &Slot, inst: &mut HudInstance) {
        if !inst.surface_alive() {
            self.teardown_silent(inst);
            return;
        }
        if let Some(pending) = inst.pending.take() {
            match pending {
                Pending::Show(request) => self.begin_transition(slot, inst, request),
                Pending::Remove { animated, on_done } => {
                    self.begin_disappear(slot, inst, animated, on_done);
                }
            }
            return;
        }
        if let Some(delay) = inst.dismiss_delay() {
            self.arm_dismiss(slot, inst, delay);
        }
        if inst.cycler.as_ref().is_some_and(|c| c.len() > 1) {
            self.arm_cycle(slot, inst);
        }
    }

    fn arm_dismiss(&self, slot: &Slot, inst: &mut HudInstance, delay: Duration) {
        let presenter = self.clone();
        let slot = slot.clone();
        let epoch = inst.epoch;
        let id = inst.id;
        inst.dismiss_timer = Some(timers::one_shot(delay, async move {
            let mut inst = slot.lock().await;
            if inst.epoch != epoch {
                return;
            }
            if !inst.surface_alive() {
                presenter.teardown_silent(&mut inst);
                return;
            }
            debug!(surface = %id, "auto-dismiss timer fired");
            presenter.begin_disappear(&slot, &mut inst, true, None);
        }));
    }

    fn arm_cycle(&self, slot: &Slot, inst: &mut HudInstance) {
        let interval = inst.scene.appearance.cycle_interval;
        if interval == Duration::ZERO {
            return;
        }
        let presenter = self.clone();
        let slot = slot.clone();
        inst.cycle_timer = Some(timers::repeating(interval, move || {
            let presenter = presenter.clone();
            let slot = slot.clone();
            async move { presenter.cycle_tick(slot).await }
        }));
    }

    /// One message-cycle tick: fade the message line out, swap to the next
    /// message, fade it back in. Independent of the dismiss timer.
    async fn cycle_tick(&self, slot: Slot) {
        let (id, epoch, scene, out_duration, in_duration) = {
            let mut inst = slot.lock().await;
            if inst.phase != Phase::Displaying {
                return;
            }
            if !inst.surface_alive() {
                self.teardown_silent(&mut inst);
                return;
            }
            let Some(cycler) = inst.cycler.as_mut() else {
                return;
            };
            let next = cycler.advance().to_string();
            inst.scene.message = Some(next);
            (
                inst.id,
                inst.epoch,
                inst.scene.clone(),
                inst.scene.appearance.animate_out,
                inst.scene.appearance.animate_in,
            )
        };

        self.inner
            .renderer
            .fade_out(id, Region::MESSAGE, out_duration)
            .await;
        {
            let inst = slot.lock().await;
            if inst.epoch != epoch {
                return;
            }
            self.inner.renderer.apply(id, &scene);
        }
        self.inner
            .renderer
            .fade_in(id, Region::MESSAGE, in_duration)
            .await;
    }
}
