//! HUD appearance configuration
//!
//! A pure data holder with sensible defaults. The presenter snapshots the
//! appearance when it builds or updates a HUD, so mutating it affects the
//! next HUD created or updated, never frames already on screen.
//!
//! Appearance can also be loaded from a TOML theme file; missing files fall
//! back to defaults, partial files fill the rest from defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGBA color, independent of any rendering backend.
///
/// Serializes as `"#rrggbb"` or `"#rrggbbaa"` in theme files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s)))
    }
}

/// Font family and point size for HUD text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        FontSpec {
            family: family.into(),
            size,
        }
    }
}

/// Blur applied to the backdrop behind the HUD box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlurEffect {
    None,
    Dark,
    Light,
    ExtraLight,
}

/// Drop shadow around the HUD box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    pub color: Color,
    pub offset: (f32, f32),
    pub radius: f32,
    pub opacity: f32,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        ShadowSpec {
            color: Color::BLACK,
            offset: (0.0, 0.0),
            radius: 6.0,
            opacity: 0.15,
        }
    }
}

/// The full set of HUD appearance options.
///
/// All setters are plain field writes; every combination of values is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudAppearance {
    /// Color of title and message text inside the HUD.
    pub text_color: Color,
    /// Color of the backdrop covering the presenting surface.
    pub background_color: Color,
    /// Background color behind a particle effect.
    pub particle_effect_background_color: Color,
    /// Fill color of the HUD box itself.
    pub foreground_color: Color,
    /// Tint of a built-in icon.
    pub icon_color: Color,
    /// Color of the loading spinner.
    pub spinner_color: Color,
    /// Blur applied to the backdrop.
    pub background_blur: BlurEffect,
    /// Corner radius of the HUD box.
    pub corner_radius: f32,
    /// Whether the HUD box casts a shadow.
    pub shadow: bool,
    pub shadow_spec: ShadowSpec,
    pub title_font: FontSpec,
    pub message_font: FontSpec,
    /// Side length of the square HUD box.
    pub hud_size: f32,
    pub icon_width: f32,
    pub icon_height: f32,
    /// Fade/scale-in duration.
    #[serde(with = "duration_secs")]
    pub animate_in: Duration,
    /// Fade-out duration.
    #[serde(with = "duration_secs")]
    pub animate_out: Duration,
    /// Auto-dismiss delay used by `AutoRemove::Default`.
    #[serde(with = "duration_secs")]
    pub default_duration: Duration,
    /// Interval between message swaps for cycling content.
    #[serde(with = "duration_secs")]
    pub cycle_interval: Duration,
    /// Whether a tap on the HUD removes it.
    pub cancelable_on_touch: bool,
}

impl Default for HudAppearance {
    fn default() -> Self {
        HudAppearance {
            text_color: Color::BLACK,
            background_color: Color::BLACK.with_alpha(128),
            particle_effect_background_color: Color::WHITE,
            foreground_color: Color::WHITE,
            icon_color: Color::GRAY,
            spinner_color: Color::GRAY,
            background_blur: BlurEffect::None,
            corner_radius: 10.0,
            shadow: true,
            shadow_spec: ShadowSpec::default(),
            title_font: FontSpec::new("Helvetica-Bold", 20.0),
            message_font: FontSpec::new("Helvetica", 13.0),
            hud_size: 144.0,
            icon_width: 48.0,
            icon_height: 48.0,
            animate_in: Duration::from_millis(700),
            animate_out: Duration::from_millis(700),
            default_duration: Duration::from_secs(2),
            cycle_interval: Duration::from_millis(2500),
            cancelable_on_touch: false,
        }
    }
}

impl HudAppearance {
    /// Load appearance from a TOML theme file.
    ///
    /// A missing file is not an error: defaults are returned and a warning
    /// logged. Fields absent from the file keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("theme not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let appearance: HudAppearance = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!("loaded theme from {}", path.display());

        Ok(appearance)
    }
}

/// Durations as fractional seconds in theme files. Non-positive values clamp
/// to zero, which arms no timer.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if secs.is_finite() && secs > 0.0 {
            Ok(Duration::from_secs_f64(secs))
        } else {
            Ok(Duration::ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let a = HudAppearance::default();
        assert_eq!(a.text_color, Color::BLACK);
        assert_eq!(a.background_color.a, 128);
        assert_eq!(a.corner_radius, 10.0);
        assert_eq!(a.hud_size, 144.0);
        assert_eq!(a.animate_in, Duration::from_millis(700));
        assert_eq!(a.default_duration, Duration::from_secs(2));
        assert_eq!(a.cycle_interval, Duration::from_millis(2500));
        assert!(!a.cancelable_on_touch);
        assert!(a.shadow);
    }

    #[test]
    fn test_color_hex_round_trip() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(
            Color::from_hex("#ff800080"),
            Some(Color::rgba(255, 128, 0, 128))
        );
        assert_eq!(Color::rgba(255, 128, 0, 128).to_hex(), "#ff800080");
        assert_eq!(Color::from_hex("ff8000"), None);
        assert_eq!(Color::from_hex("#ff80"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_partial_theme_fills_defaults() {
        let theme = r##"
            text_color = "#222222"
            corner_radius = 12.0
            animate_in = 1.0
            cancelable_on_touch = true
        "##;
        let a: HudAppearance = toml::from_str(theme).unwrap();
        assert_eq!(a.text_color, Color::rgb(0x22, 0x22, 0x22));
        assert_eq!(a.corner_radius, 12.0);
        assert_eq!(a.animate_in, Duration::from_secs(1));
        assert!(a.cancelable_on_touch);
        // untouched fields keep defaults
        assert_eq!(a.hud_size, 144.0);
        assert_eq!(a.animate_out, Duration::from_millis(700));
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let a: HudAppearance = toml::from_str("default_duration = -3.0").unwrap();
        assert_eq!(a.default_duration, Duration::ZERO);
    }

    #[test]
    fn test_theme_round_trip() {
        let mut a = HudAppearance::default();
        a.background_blur = BlurEffect::ExtraLight;
        a.title_font = FontSpec::new("Avenir-Heavy", 18.0);
        let text = toml::to_string(&a).unwrap();
        let back: HudAppearance = toml::from_str(&text).unwrap();
        assert_eq!(a, back);
    }
}
