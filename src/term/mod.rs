//! Terminal renderer
//!
//! Draws the HUD as a centered box overlay on an ANSI terminal. This is the
//! reference backend and what the demo binary uses: fades become timed
//! show/hide steps, the spinner runs on its own 100ms frame task, and
//! GUI-only appearance options (blur, shadow, backdrop tint) are simply not
//! drawn. The presenter drives it exactly like any other renderer.

mod spinner;
mod styles;

use std::io::{self, Write};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::style::Stylize;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use unicode_width::UnicodeWidthStr;

use crate::content::{AccessorySpec, IconKind, ImageSource, ParticleEffect};
use crate::render::{RenderError, Renderer};
use crate::scene::{Region, Scene};
use crate::surface::SurfaceId;

pub use spinner::{spinner_char, FRAME_INTERVAL, SPINNER_FRAMES};
use styles::{ctrl, term_color, BoxChars};

/// Rows the HUD box occupies on screen.
const BOX_ROWS: usize = 7;

struct TermHud {
    scene: Scene,
    hidden: Region,
    visible: bool,
    frame: u8,
    ticker: Option<JoinHandle<()>>,
}

struct TermInner {
    huds: DashMap<SurfaceId, TermHud>,
    out: StdMutex<io::Stdout>,
    size: (u16, u16),
}

/// Renders HUDs onto an ANSI terminal via crossterm.
#[derive(Clone)]
pub struct TermRenderer {
    inner: Arc<TermInner>,
}

impl TermRenderer {
    /// Renderer writing to stdout, centered in the current terminal size
    /// (80x24 when the size cannot be queried).
    pub fn stdout() -> Self {
        let size = crossterm::terminal::size().unwrap_or((80, 24));
        TermRenderer {
            inner: Arc::new(TermInner {
                huds: DashMap::new(),
                out: StdMutex::new(io::stdout()),
                size,
            }),
        }
    }
}

impl TermInner {
    fn lock_out(&self) -> MutexGuard<'_, io::Stdout> {
        match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn draw(&self, id: SurfaceId) -> io::Result<()> {
        let rendered = {
            let Some(hud) = self.huds.get(&id) else {
                return Ok(());
            };
            if !hud.visible {
                return Ok(());
            }
            render_lines(&hud.scene, hud.hidden, hud.frame)
        };
        self.write_lines(&rendered.lines, rendered.width)
    }

    fn clear_area(&self, scene: &Scene) -> io::Result<()> {
        let width = inner_width(scene) + 2;
        let blank = vec![" ".repeat(width); BOX_ROWS];
        self.write_lines(&blank, width)
    }

    fn write_lines(&self, lines: &[String], width: usize) -> io::Result<()> {
        let (cols, rows) = self.size;
        let top = rows.saturating_sub(lines.len() as u16) / 2;
        let left = cols.saturating_sub(width as u16) / 2 + 1;

        let mut frame = String::new();
        frame.push_str(&ctrl::save_cursor());
        frame.push_str(&ctrl::hide_cursor());
        for (i, line) in lines.iter().enumerate() {
            frame.push_str(&ctrl::move_to(top + i as u16 + 1, left));
            frame.push_str(line);
        }
        frame.push_str(&ctrl::restore_cursor());

        let mut out = self.lock_out();
        out.write_all(frame.as_bytes())?;
        out.flush()
    }
}

#[async_trait]
impl Renderer for TermRenderer {
    fn attach(&self, surface: SurfaceId, scene: &Scene) -> Result<(), RenderError> {
        self.inner.huds.insert(
            surface,
            TermHud {
                scene: scene.clone(),
                hidden: Region::empty(),
                visible: false,
                frame: 0,
                ticker: None,
            },
        );
        // verify the backend is writable up front
        self.inner.lock_out().flush()?;

        let inner = self.inner.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(FRAME_INTERVAL);
            loop {
                interval.tick().await;
                let advanced = {
                    let Some(mut hud) = inner.huds.get_mut(&surface) else {
                        break;
                    };
                    if hud.visible
                        && hud.scene.accessory == AccessorySpec::Spinner
                        && !hud.hidden.contains(Region::ACCESSORY)
                    {
                        hud.frame = hud.frame.wrapping_add(1);
                        true
                    } else {
                        false
                    }
                };
                if advanced && inner.draw(surface).is_err() {
                    break;
                }
            }
        });
        if let Some(mut hud) = self.inner.huds.get_mut(&surface) {
            hud.ticker = Some(ticker);
        } else {
            ticker.abort();
        }
        Ok(())
    }

    fn detach(&self, surface: SurfaceId) {
        if let Some((_, mut hud)) = self.inner.huds.remove(&surface) {
            if let Some(ticker) = hud.ticker.take() {
                ticker.abort();
            }
            let _ = self.inner.clear_area(&hud.scene);
            let mut out = self.inner.lock_out();
            let _ = out.write_all(ctrl::show_cursor().as_bytes());
            let _ = out.flush();
        }
    }

    fn apply(&self, surface: SurfaceId, scene: &Scene) {
        if let Some(mut hud) = self.inner.huds.get_mut(&surface) {
            hud.scene = scene.clone();
        }
        let _ = self.inner.draw(surface);
    }

    async fn animate_in(&self, surface: SurfaceId, duration: Duration) {
        if let Some(mut hud) = self.inner.huds.get_mut(&surface) {
            hud.visible = true;
        }
        let _ = self.inner.draw(surface);
        sleep(duration).await;
    }

    async fn animate_out(&self, surface: SurfaceId, duration: Duration) {
        sleep(duration).await;
        let scene = self.inner.huds.get_mut(&surface).map(|mut hud| {
            hud.visible = false;
            hud.scene.clone()
        });
        if let Some(scene) = scene {
            let _ = self.inner.clear_area(&scene);
        }
    }

    async fn fade_out(&self, surface: SurfaceId, regions: Region, duration: Duration) {
        if let Some(mut hud) = self.inner.huds.get_mut(&surface) {
            hud.hidden.insert(regions);
        }
        let _ = self.inner.draw(surface);
        sleep(duration).await;
    }

    async fn fade_in(&self, surface: SurfaceId, regions: Region, duration: Duration) {
        sleep(duration).await;
        if let Some(mut hud) = self.inner.huds.get_mut(&surface) {
            hud.hidden.remove(regions);
        }
        let _ = self.inner.draw(surface);
    }
}

struct RenderedBox {
    lines: Vec<String>,
    width: usize,
}

/// Inner width of the box, scaled from the configured HUD size and grown to
/// fit the text.
fn inner_width(scene: &Scene) -> usize {
    let base = (scene.appearance.hud_size / 4.0).round() as usize;
    let title = scene.title.as_deref().unwrap_or("").width();
    let message = scene.message.as_deref().unwrap_or("").width();
    base.max(title + 6).max(message + 6).min(76)
}

fn render_lines(scene: &Scene, hidden: Region, frame: u8) -> RenderedBox {
    let border = term_color(scene.appearance.foreground_color);
    let text = term_color(scene.appearance.text_color);
    let inner = inner_width(scene);

    let title = if hidden.contains(Region::TITLE) {
        ""
    } else {
        scene.title.as_deref().unwrap_or("")
    };
    let message = if hidden.contains(Region::MESSAGE) {
        ""
    } else {
        scene.message.as_deref().unwrap_or("")
    };
    let accessory = if hidden.contains(Region::ACCESSORY) {
        String::new()
    } else {
        accessory_glyph(&scene.accessory, frame)
    };
    let accessory_color = match scene.accessory {
        AccessorySpec::Spinner => term_color(scene.appearance.spinner_color),
        _ => term_color(scene.appearance.icon_color),
    };

    let rounded = scene.appearance.corner_radius > 0.0;
    let (tl, tr, bl, br) = if rounded {
        (
            BoxChars::TOP_LEFT,
            BoxChars::TOP_RIGHT,
            BoxChars::BOTTOM_LEFT,
            BoxChars::BOTTOM_RIGHT,
        )
    } else {
        (
            BoxChars::TOP_LEFT_SQUARE,
            BoxChars::TOP_RIGHT_SQUARE,
            BoxChars::BOTTOM_LEFT_SQUARE,
            BoxChars::BOTTOM_RIGHT_SQUARE,
        )
    };
    let horizontal = BoxChars::HORIZONTAL.repeat(inner);

    let lines = vec![
        format!("{}", format!("{tl}{horizontal}{tr}").with(border)),
        filler_row(scene, inner, border),
        centered_row(&accessory, accessory_color, inner, border, false),
        centered_row(title, text, inner, border, true),
        centered_row(message, text, inner, border, false),
        filler_row(scene, inner, border),
        format!("{}", format!("{bl}{horizontal}{br}").with(border)),
    ];

    RenderedBox {
        lines,
        width: inner + 2,
    }
}

fn accessory_glyph(accessory: &AccessorySpec, frame: u8) -> String {
    match accessory {
        AccessorySpec::None => String::new(),
        AccessorySpec::Spinner => spinner_char(frame).to_string(),
        AccessorySpec::Icon(ImageSource::Builtin(kind)) => icon_glyph(*kind).to_string(),
        AccessorySpec::Icon(ImageSource::Raw(_)) => "❖".to_string(),
    }
}

fn icon_glyph(kind: IconKind) -> &'static str {
    match kind {
        IconKind::CheckMark => "✓",
        IconKind::Email => "✉",
        IconKind::HappyFace => "☺",
        IconKind::SadFace => "☹",
        IconKind::Info => "ℹ",
    }
}

fn centered_row(
    content: &str,
    color: crossterm::style::Color,
    inner: usize,
    border: crossterm::style::Color,
    bold: bool,
) -> String {
    let width = content.width();
    let pad = inner.saturating_sub(width);
    let left = pad / 2;
    let right = pad - left;

    let styled = if bold {
        format!("{}", content.with(color).bold())
    } else {
        format!("{}", content.with(color))
    };
    format!(
        "{}{}{}{}{}",
        BoxChars::VERTICAL.with(border),
        " ".repeat(left),
        styled,
        " ".repeat(right),
        BoxChars::VERTICAL.with(border)
    )
}

/// Blank row, or a particle pattern row when the scene carries an effect.
fn filler_row(scene: &Scene, inner: usize, border: crossterm::style::Color) -> String {
    let Some(effect) = scene.particle_effect else {
        return centered_row("", border, inner, border, false);
    };
    let pattern: &[char] = match effect {
        ParticleEffect::Sparkles => &['✦', '·'],
        ParticleEffect::Confetti => &['*', ':', '.'],
        ParticleEffect::Snow => &['❄', '.'],
    };
    let mut row = String::new();
    for i in 0..inner {
        if i % 4 == 1 {
            row.push(pattern[(i / 4) % pattern.len()]);
        } else {
            row.push(' ');
        }
    }
    let color = term_color(scene.appearance.particle_effect_background_color);
    format!(
        "{}{}{}",
        BoxChars::VERTICAL.with(border),
        row.with(color),
        BoxChars::VERTICAL.with(border)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::HudAppearance;
    use crate::content::ContentSpec;
    use crate::messages::MessageCycler;

    fn scene(content: &ContentSpec, accessory: AccessorySpec) -> Scene {
        let cycler = MessageCycler::for_content(content);
        Scene::compose(
            HudAppearance::default(),
            content,
            &accessory,
            None,
            cycler.as_ref(),
        )
    }

    fn joined(rendered: &RenderedBox) -> String {
        rendered.lines.join("\n")
    }

    #[test]
    fn test_render_shows_message_and_spinner() {
        let s = scene(
            &ContentSpec::Message("Loading...".into()),
            AccessorySpec::Spinner,
        );
        let out = joined(&render_lines(&s, Region::empty(), 0));
        assert!(out.contains("Loading..."));
        assert!(out.contains(spinner_char(0)));
        assert!(out.contains(BoxChars::TOP_LEFT));
    }

    #[test]
    fn test_hidden_message_region_is_blank() {
        let s = scene(
            &ContentSpec::Message("Loading...".into()),
            AccessorySpec::Spinner,
        );
        let out = joined(&render_lines(&s, Region::MESSAGE, 0));
        assert!(!out.contains("Loading..."));
        assert!(out.contains(spinner_char(0)));
    }

    #[test]
    fn test_square_corners_when_radius_zero() {
        let mut s = scene(&ContentSpec::Message("x".into()), AccessorySpec::None);
        s.appearance.corner_radius = 0.0;
        let out = joined(&render_lines(&s, Region::empty(), 0));
        assert!(out.contains(BoxChars::TOP_LEFT_SQUARE));
        assert!(!out.contains(BoxChars::TOP_LEFT));
    }

    #[test]
    fn test_icon_glyphs() {
        let s = scene(
            &ContentSpec::Message("1 new message".into()),
            AccessorySpec::Icon(ImageSource::Builtin(IconKind::Email)),
        );
        let out = joined(&render_lines(&s, Region::empty(), 0));
        assert!(out.contains('✉'));
    }

    #[test]
    fn test_particle_row() {
        let mut s = scene(&ContentSpec::Message("x".into()), AccessorySpec::None);
        s.particle_effect = Some(ParticleEffect::Sparkles);
        let out = joined(&render_lines(&s, Region::empty(), 0));
        assert!(out.contains('✦'));
    }

    #[test]
    fn test_box_grows_to_fit_long_messages() {
        let long = "a much longer message than the default box width allows";
        let s = scene(&ContentSpec::Message(long.into()), AccessorySpec::None);
        assert!(inner_width(&s) >= long.len() + 6);
    }
}
