//! superhud demo
//!
//! Runs the showcase sequence against the terminal renderer: a loading
//! spinner that resolves into a check mark, an icon notification with a
//! duration, ordered message cycling, and the funny loading messages.
//! Watch the center of the terminal.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::info;

use superhud::term::TermRenderer;
use superhud::{
    AutoRemove, HudPresenter, HudRequest, IconKind, Language, ParticleEffect, Surface,
};

/// The demo's single presenting surface: the whole terminal screen.
struct Screen;

impl Surface for Screen {
    fn label(&self) -> &str {
        "screen"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("superhud=info".parse()?),
        )
        .init();

    let presenter = HudPresenter::new(Arc::new(TermRenderer::stdout()));
    presenter.update_appearance(|appearance| {
        appearance.cancelable_on_touch = true;
        appearance.animate_in = Duration::from_millis(400);
        appearance.animate_out = Duration::from_millis(400);
    });

    let screen: Arc<dyn Surface> = Arc::new(Screen);

    info!("loading with text");
    presenter
        .show_or_update(&screen, HudRequest::loading("Demo loading..."))
        .await?;
    sleep(Duration::from_secs(3)).await;

    info!("resolving into a check mark");
    presenter
        .show_or_update(
            &screen,
            HudRequest::icon(IconKind::CheckMark, "Done loading!")
                .auto_remove(AutoRemove::After(Duration::from_secs(2))),
        )
        .await?;
    sleep(Duration::from_secs(4)).await;

    info!("icon notification with default duration");
    presenter
        .show_or_update(
            &screen,
            HudRequest::icon(IconKind::Email, "1 new message")
                .particle_effect(ParticleEffect::Sparkles),
        )
        .await?;
    sleep(Duration::from_secs(4)).await;

    info!("cycling messages");
    presenter
        .show_or_update(
            &screen,
            HudRequest::loading_messages(vec![
                "Contacting server...".to_string(),
                "Fetching payload...".to_string(),
                "Unpacking...".to_string(),
            ]),
        )
        .await?;
    sleep(Duration::from_secs(8)).await;

    info!("funny messages");
    presenter
        .show_or_update(&screen, HudRequest::funny_messages(Language::English))
        .await?;
    sleep(Duration::from_secs(8)).await;

    info!("removing");
    presenter.remove(&screen, true).await;
    sleep(Duration::from_secs(1)).await;

    presenter.dismiss_all(true).await;
    info!("demo complete");
    Ok(())
}
