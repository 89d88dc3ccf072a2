//! End-to-end tests for the HUD presenter
//!
//! Drives the public API against the recording renderer under a paused
//! tokio clock, so animation and timer durations are exact and instant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_test::assert_ok;

use superhud::testing::{RecordingRenderer, RenderEvent};
use superhud::{
    AccessorySpec, AutoRemove, HudPresenter, HudRequest, HudStatus, IconKind, ImageSource,
    Language, Region, Surface, SurfaceId,
};

struct TestSurface(&'static str);

impl Surface for TestSurface {
    fn label(&self) -> &str {
        self.0
    }
}

fn setup() -> (HudPresenter, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::new());
    let presenter = HudPresenter::new(renderer.clone());
    (presenter, renderer)
}

fn surface(name: &'static str) -> Arc<dyn Surface> {
    Arc::new(TestSurface(name))
}

/// Zero out animation durations for timer-focused tests.
fn zero_animations(presenter: &HudPresenter) {
    presenter.update_appearance(|appearance| {
        appearance.animate_in = Duration::ZERO;
        appearance.animate_out = Duration::ZERO;
    });
}

/// Let spawned animation tasks run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

fn status_recorder() -> (
    Arc<Mutex<Vec<HudStatus>>>,
    impl FnMut(HudStatus) + Send + 'static,
) {
    let log: Arc<Mutex<Vec<HudStatus>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    (log, move |status| sink.lock().unwrap().push(status))
}

fn message_of(renderer: &RecordingRenderer, id: SurfaceId) -> Option<String> {
    renderer.scene(id).and_then(|scene| scene.message)
}

// --- singleton and convergence ------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_rapid_calls_attach_exactly_one_hud() {
    let (presenter, renderer) = setup();
    let screen = surface("main");

    for i in 0..5 {
        tokio_test::assert_ok!(
            presenter
                .show_or_update(&screen, HudRequest::loading(format!("step {}", i)))
                .await
        );
    }
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(renderer.attach_count(), 1);
    assert!(presenter.is_presenting(&screen));
    assert_eq!(presenter.active_count(), 1);
    assert_eq!(
        message_of(&renderer, SurfaceId::of(&screen)).as_deref(),
        Some("step 4")
    );
}

#[tokio::test(start_paused = true)]
async fn test_last_update_wins_and_intermediates_are_dropped() {
    let (presenter, renderer) = setup();
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("one"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await; // appear settles

    // "two" starts a transition; "three" and "four" arrive while its fades
    // are in flight, so only the latest survives the pending slot.
    for text in ["two", "three", "four"] {
        presenter
            .show_or_update(&screen, HudRequest::loading(text))
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(
        message_of(&renderer, SurfaceId::of(&screen)).as_deref(),
        Some("four")
    );
    assert_eq!(renderer.attach_count(), 1);
    let applies = renderer
        .events()
        .iter()
        .filter(|event| matches!(event, RenderEvent::Apply(_)))
        .count();
    // "two" and "four" were applied; "three" was superseded in the queue
    assert_eq!(applies, 2);
}

// --- dismiss timer -------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_auto_remove_after_duration() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    presenter
        .show_or_update(
            &screen,
            HudRequest::icon(IconKind::Email, "1 new message").after(Duration::from_secs(3)),
        )
        .await
        .unwrap();
    settle().await;
    assert!(presenter.is_presenting(&screen));

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert!(presenter.is_presenting(&screen));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!presenter.is_presenting(&screen));
    assert!(!renderer.is_attached(SurfaceId::of(&screen)));
    assert!(renderer
        .events()
        .contains(&RenderEvent::Detach(SurfaceId::of(&screen))));
}

#[tokio::test(start_paused = true)]
async fn test_no_auto_remove_persists_indefinitely() {
    let (presenter, _renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("still here"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1000)).await;

    assert!(presenter.is_presenting(&screen));
}

#[tokio::test(start_paused = true)]
async fn test_default_policy_uses_appearance_duration() {
    let (presenter, _renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    // icon requests default to AutoRemove::Default (2s appearance default)
    presenter
        .show_or_update(&screen, HudRequest::icon(IconKind::CheckMark, "done"))
        .await
        .unwrap();
    settle().await;
    assert!(presenter.is_presenting(&screen));

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(!presenter.is_presenting(&screen));
}

#[tokio::test(start_paused = true)]
async fn test_identical_update_restarts_dismiss_timer() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    let request = || HudRequest::icon(IconKind::CheckMark, "saved").after(Duration::from_secs(3));

    presenter.show_or_update(&screen, request()).await.unwrap();
    settle().await;

    tokio::time::sleep(Duration::from_secs(2)).await;
    presenter.show_or_update(&screen, request()).await.unwrap();
    settle().await;

    // original deadline (t=3) passes; the restarted timer keeps it alive
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(presenter.is_presenting(&screen));

    // restarted deadline (t=2+3) fires
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!presenter.is_presenting(&screen));

    // identical content never re-animated
    let applies = renderer
        .events()
        .iter()
        .filter(|event| matches!(event, RenderEvent::Apply(_)))
        .count();
    assert_eq!(applies, 0);
    assert_eq!(renderer.attach_count(), 1);
}

// --- tap-to-dismiss ------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_tap_removes_when_cancelable() {
    let (presenter, _renderer) = setup();
    zero_animations(&presenter);
    presenter.update_appearance(|appearance| appearance.cancelable_on_touch = true);
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("working"))
        .await
        .unwrap();
    settle().await;

    presenter.tap(&screen).await;
    settle().await;
    assert!(!presenter.is_presenting(&screen));
}

#[tokio::test(start_paused = true)]
async fn test_tap_ignored_when_not_cancelable() {
    let (presenter, _renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("working"))
        .await
        .unwrap();
    settle().await;

    presenter.tap(&screen).await;
    settle().await;
    assert!(presenter.is_presenting(&screen));
}

// --- scenarios -----------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_loading_spinner_then_explicit_remove() {
    let (presenter, renderer) = setup();
    let screen = surface("main");
    let id = SurfaceId::of(&screen);

    presenter
        .show_or_update(&screen, HudRequest::loading("Loading..."))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    let scene = renderer.scene(id).unwrap();
    assert_eq!(scene.accessory, AccessorySpec::Spinner);
    assert_eq!(scene.message.as_deref(), Some("Loading..."));
    assert!(presenter.is_presenting(&screen));

    let done = Arc::new(AtomicBool::new(false));
    let flag = done.clone();
    presenter
        .remove_with(&screen, true, move || flag.store(true, Ordering::SeqCst))
        .await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(done.load(Ordering::SeqCst));
    assert!(!presenter.is_presenting(&screen));

    let events = renderer.events();
    let out_at = events
        .iter()
        .position(|event| matches!(event, RenderEvent::AnimateOut(_)))
        .unwrap();
    let detach_at = events
        .iter()
        .position(|event| matches!(event, RenderEvent::Detach(_)))
        .unwrap();
    assert!(out_at < detach_at);
}

#[tokio::test(start_paused = true)]
async fn test_icon_scene_contents() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");
    let id = SurfaceId::of(&screen);

    presenter
        .show_or_update(
            &screen,
            HudRequest::icon(IconKind::Email, "1 new message").after(Duration::from_secs(3)),
        )
        .await
        .unwrap();
    settle().await;

    let scene = renderer.scene(id).unwrap();
    assert_eq!(
        scene.accessory,
        AccessorySpec::Icon(ImageSource::Builtin(IconKind::Email))
    );
    assert_eq!(scene.message.as_deref(), Some("1 new message"));
}

// --- message cycling -----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_message_list_cycles_in_order() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");
    let id = SurfaceId::of(&screen);

    presenter
        .show_or_update(
            &screen,
            HudRequest::loading_messages(vec!["a".into(), "b".into(), "c".into()]),
        )
        .await
        .unwrap();
    settle().await;
    assert_eq!(message_of(&renderer, id).as_deref(), Some("a"));

    // default cycle interval is 2.5s
    tokio::time::sleep(Duration::from_millis(2600)).await;
    assert_eq!(message_of(&renderer, id).as_deref(), Some("b"));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(message_of(&renderer, id).as_deref(), Some("c"));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(message_of(&renderer, id).as_deref(), Some("a"));

    assert!(presenter.is_presenting(&screen));
}

#[tokio::test(start_paused = true)]
async fn test_cycle_swaps_only_the_message_region() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    presenter
        .show_or_update(
            &screen,
            HudRequest::loading_messages(vec!["a".into(), "b".into()]),
        )
        .await
        .unwrap();
    settle().await;
    renderer.clear_events();

    tokio::time::sleep(Duration::from_millis(2600)).await;

    let events = renderer.events();
    assert!(events
        .iter()
        .any(|event| matches!(event, RenderEvent::FadeOut(_, regions) if *regions == Region::MESSAGE)));
    assert!(events
        .iter()
        .any(|event| matches!(event, RenderEvent::FadeIn(_, regions) if *regions == Region::MESSAGE)));
}

#[tokio::test(start_paused = true)]
async fn test_funny_messages_rotate() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");
    let id = SurfaceId::of(&screen);

    presenter
        .show_or_update(&screen, HudRequest::funny_messages(Language::English))
        .await
        .unwrap();
    settle().await;

    let first = message_of(&renderer, id).unwrap();
    assert!(!first.is_empty());

    tokio::time::sleep(Duration::from_millis(2600)).await;
    let second = message_of(&renderer, id).unwrap();
    assert_ne!(first, second);
}

// --- accessory swap ordering ---------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_accessory_swap_fades_out_before_in() {
    let (presenter, renderer) = setup();
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("working"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;
    renderer.clear_events();

    presenter
        .show_or_update(&screen, HudRequest::icon(IconKind::CheckMark, "done"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    let events = renderer.events();
    let fade_out = events
        .iter()
        .position(|event| matches!(event, RenderEvent::FadeOut(_, regions) if regions.contains(Region::ACCESSORY)))
        .unwrap();
    let apply = events
        .iter()
        .position(|event| matches!(event, RenderEvent::Apply(_)))
        .unwrap();
    let fade_in = events
        .iter()
        .position(|event| matches!(event, RenderEvent::FadeIn(_, regions) if regions.contains(Region::ACCESSORY)))
        .unwrap();
    assert!(fade_out < apply);
    assert!(apply < fade_in);
}

// --- multiple surfaces ---------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_surfaces_are_independent() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let left = surface("left");
    let right = surface("right");

    presenter
        .show_or_update(&left, HudRequest::loading("left busy"))
        .await
        .unwrap();
    presenter
        .show_or_update(&right, HudRequest::loading("right busy"))
        .await
        .unwrap();
    settle().await;

    assert_eq!(presenter.active_count(), 2);
    assert_eq!(renderer.attach_count(), 2);

    presenter.remove(&left, false).await;
    settle().await;
    assert!(!presenter.is_presenting(&left));
    assert!(presenter.is_presenting(&right));
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_all_removes_everything() {
    let (presenter, renderer) = setup();
    let left = surface("left");
    let right = surface("right");

    presenter
        .show_or_update(&left, HudRequest::loading("left"))
        .await
        .unwrap();
    presenter
        .show_or_update(&right, HudRequest::loading("right"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    presenter.dismiss_all(true).await;

    assert_eq!(presenter.active_count(), 0);
    let detaches = renderer
        .events()
        .iter()
        .filter(|event| matches!(event, RenderEvent::Detach(_)))
        .count();
    assert_eq!(detaches, 2);
}

// --- status callbacks ----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_status_callback_lifecycle() {
    let (presenter, _renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");

    let (first_log, first_callback) = status_recorder();
    presenter
        .show_or_update(
            &screen,
            HudRequest::loading("working").on_status(first_callback),
        )
        .await
        .unwrap();
    settle().await;
    assert_eq!(&*first_log.lock().unwrap(), &[HudStatus::Presented]);

    let (second_log, second_callback) = status_recorder();
    presenter
        .show_or_update(
            &screen,
            HudRequest::icon(IconKind::CheckMark, "done")
                .auto_remove(AutoRemove::No)
                .on_status(second_callback),
        )
        .await
        .unwrap();
    settle().await;
    assert_eq!(&*second_log.lock().unwrap(), &[HudStatus::Updated]);

    presenter.remove(&screen, false).await;
    settle().await;
    assert_eq!(
        &*second_log.lock().unwrap(),
        &[HudStatus::Updated, HudStatus::Removed]
    );
    // the first callback was replaced by the second request
    assert_eq!(&*first_log.lock().unwrap(), &[HudStatus::Presented]);
}

// --- defensive paths -----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_dropped_surface_tears_down_silently() {
    let (presenter, renderer) = setup();
    zero_animations(&presenter);
    let screen = surface("main");
    let id = SurfaceId::of(&screen);

    let (log, callback) = status_recorder();
    presenter
        .show_or_update(
            &screen,
            HudRequest::loading("working")
                .after(Duration::from_secs(1))
                .on_status(callback),
        )
        .await
        .unwrap();
    settle().await;

    drop(screen);
    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(presenter.active_count(), 0);
    assert!(!renderer.is_attached(id));
    let events = renderer.events();
    assert!(events.contains(&RenderEvent::Detach(id)));
    assert!(!events
        .iter()
        .any(|event| matches!(event, RenderEvent::AnimateOut(_))));
    // silent: no Removed notification
    assert_eq!(&*log.lock().unwrap(), &[HudStatus::Presented]);
}

#[tokio::test(start_paused = true)]
async fn test_attach_failure_propagates() {
    let (presenter, renderer) = setup();
    renderer.fail_attach_with("view template missing");
    let screen = surface("main");

    let result = presenter
        .show_or_update(&screen, HudRequest::message("hello"))
        .await;
    assert!(result.is_err());
    assert_eq!(presenter.active_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_remove_without_hud_is_a_noop() {
    let (presenter, renderer) = setup();
    let screen = surface("main");

    let done = Arc::new(AtomicBool::new(false));
    let flag = done.clone();
    presenter
        .remove_with(&screen, true, move || flag.store(true, Ordering::SeqCst))
        .await;
    settle().await;

    assert!(!done.load(Ordering::SeqCst));
    assert!(renderer.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_show_while_disappearing_represents() {
    let (presenter, renderer) = setup();
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("first"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    presenter.remove(&screen, true).await;
    // arrives while the fade-out is in flight
    presenter
        .show_or_update(&screen, HudRequest::loading("back again"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(presenter.is_presenting(&screen));
    assert_eq!(
        message_of(&renderer, SurfaceId::of(&screen)).as_deref(),
        Some("back again")
    );
    assert_eq!(renderer.attach_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_remove_queued_behind_appear() {
    let (presenter, _renderer) = setup();
    let screen = surface("main");

    presenter
        .show_or_update(&screen, HudRequest::loading("flash"))
        .await
        .unwrap();
    // still appearing; removal is queued and runs once the appear settles
    presenter.remove(&screen, true).await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(!presenter.is_presenting(&screen));
}
