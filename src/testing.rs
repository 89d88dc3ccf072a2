//! Test support
//!
//! A renderer that records every command it receives and "animates" by
//! sleeping the requested duration on tokio's clock, so tests running under
//! a paused runtime get deterministic, instant animations.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::sleep;

use crate::render::{RenderError, Renderer};
use crate::scene::{Region, Scene};
use crate::surface::SurfaceId;

/// One renderer command, in the order received.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Attach(SurfaceId),
    Detach(SurfaceId),
    Apply(SurfaceId),
    AnimateIn(SurfaceId),
    AnimateOut(SurfaceId),
    FadeOut(SurfaceId, Region),
    FadeIn(SurfaceId, Region),
}

/// Records renderer commands and current scenes for assertions.
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
    scenes: DashMap<SurfaceId, Scene>,
    /// When set, `attach` fails with this message.
    fail_attach: Mutex<Option<String>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `attach` calls fail, for exercising the construction
    /// error path.
    pub fn fail_attach_with(&self, message: impl Into<String>) {
        *self.lock_fail() = Some(message.into());
    }

    /// Everything recorded so far, in order.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.lock_events().clone()
    }

    pub fn clear_events(&self) {
        self.lock_events().clear();
    }

    /// The scene most recently attached or applied for `surface`.
    pub fn scene(&self, surface: SurfaceId) -> Option<Scene> {
        self.scenes.get(&surface).map(|entry| entry.value().clone())
    }

    pub fn is_attached(&self, surface: SurfaceId) -> bool {
        self.scenes.contains_key(&surface)
    }

    pub fn attach_count(&self) -> usize {
        self.lock_events()
            .iter()
            .filter(|event| matches!(event, RenderEvent::Attach(_)))
            .count()
    }

    fn record(&self, event: RenderEvent) {
        self.lock_events().push(event);
    }

    fn lock_events(&self) -> std::sync::MutexGuard<'_, Vec<RenderEvent>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_fail(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.fail_attach.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    fn attach(&self, surface: SurfaceId, scene: &Scene) -> Result<(), RenderError> {
        if let Some(message) = self.lock_fail().clone() {
            return Err(RenderError::Construction(message));
        }
        self.record(RenderEvent::Attach(surface));
        self.scenes.insert(surface, scene.clone());
        Ok(())
    }

    fn detach(&self, surface: SurfaceId) {
        self.record(RenderEvent::Detach(surface));
        self.scenes.remove(&surface);
    }

    fn apply(&self, surface: SurfaceId, scene: &Scene) {
        self.record(RenderEvent::Apply(surface));
        self.scenes.insert(surface, scene.clone());
    }

    async fn animate_in(&self, surface: SurfaceId, duration: Duration) {
        self.record(RenderEvent::AnimateIn(surface));
        sleep(duration).await;
    }

    async fn animate_out(&self, surface: SurfaceId, duration: Duration) {
        self.record(RenderEvent::AnimateOut(surface));
        sleep(duration).await;
    }

    async fn fade_in(&self, surface: SurfaceId, regions: Region, duration: Duration) {
        self.record(RenderEvent::FadeIn(surface, regions));
        sleep(duration).await;
    }

    async fn fade_out(&self, surface: SurfaceId, regions: Region, duration: Duration) {
        self.record(RenderEvent::FadeOut(surface, regions));
        sleep(duration).await;
    }
}
