//! RGB/HSL dual-representation colors with lazy mutual derivation (spec
//! §3, §4.4).
//!
//! Grounded in the channel-changer surface (`change_rgb`/`change_hsl`/
//! `change_alpha`/`mix`) shown by the `pickfire-grass` fork's
//! `builtin/color/other.rs` (`examples/other_examples/
//! f5fb13f6_pickfire-grass__src-builtin-color-other.rs.rs`), generalized
//! from that file's standalone functions into methods on one type per
//! spec §9's `ColorRepr` design note. The lazy cross-representation cache
//! uses `once_cell::sync::OnceCell` rather than a raw `Cell`/`RefCell` so
//! the benign race the concurrency model (spec §5) allows is also
//! data-race-free under the compiler's rules, without a lock.

use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::OnceCell;

use crate::fuzzy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

#[derive(Debug)]
enum ColorRepr {
    RgbKnown(Rgba, OnceCell<Hsla>),
    HslKnown(Hsla, OnceCell<Rgba>),
}

/// A Sass color value. Exactly one of RGB or HSL is stored eagerly; the
/// other is derived via the CSS3 algorithm on first access and cached.
#[derive(Debug)]
pub struct Color {
    repr: ColorRepr,
}

impl Clone for Color {
    fn clone(&self) -> Self {
        match &self.repr {
            ColorRepr::RgbKnown(rgba, hsl) => Color {
                repr: ColorRepr::RgbKnown(*rgba, clone_cell(hsl)),
            },
            ColorRepr::HslKnown(hsla, rgb) => Color {
                repr: ColorRepr::HslKnown(*hsla, clone_cell(rgb)),
            },
        }
    }
}

fn clone_cell<T: Copy>(cell: &OnceCell<T>) -> OnceCell<T> {
    let fresh = OnceCell::new();
    if let Some(v) = cell.get() {
        let _ = fresh.set(*v);
    }
    fresh
}

fn clamp_channel(v: u8) -> u8 {
    v
}

fn clamp_alpha(a: f64) -> f64 {
    a.clamp(0.0, 1.0)
}

fn modulo_hue(h: f64) -> f64 {
    let r = h % 360.0;
    if r < 0.0 {
        r + 360.0
    } else {
        r
    }
}

impl Color {
    pub fn rgb(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self {
            repr: ColorRepr::RgbKnown(
                Rgba {
                    red: clamp_channel(red),
                    green: clamp_channel(green),
                    blue: clamp_channel(blue),
                    alpha: clamp_alpha(alpha),
                },
                OnceCell::new(),
            ),
        }
    }

    pub fn hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            repr: ColorRepr::HslKnown(
                Hsla {
                    hue: modulo_hue(hue),
                    saturation: saturation.clamp(0.0, 100.0),
                    lightness: lightness.clamp(0.0, 100.0),
                    alpha: clamp_alpha(alpha),
                },
                OnceCell::new(),
            ),
        }
    }

    pub fn as_rgba(&self) -> Rgba {
        match &self.repr {
            ColorRepr::RgbKnown(rgba, _) => *rgba,
            ColorRepr::HslKnown(hsla, cache) => *cache.get_or_init(|| hsl_to_rgb(*hsla)),
        }
    }

    pub fn as_hsla(&self) -> Hsla {
        match &self.repr {
            ColorRepr::HslKnown(hsla, _) => *hsla,
            ColorRepr::RgbKnown(rgba, cache) => *cache.get_or_init(|| rgb_to_hsl(*rgba)),
        }
    }

    pub fn red(&self) -> u8 {
        self.as_rgba().red
    }

    pub fn green(&self) -> u8 {
        self.as_rgba().green
    }

    pub fn blue(&self) -> u8 {
        self.as_rgba().blue
    }

    pub fn hue(&self) -> f64 {
        self.as_hsla().hue
    }

    pub fn saturation(&self) -> f64 {
        self.as_hsla().saturation
    }

    pub fn lightness(&self) -> f64 {
        self.as_hsla().lightness
    }

    pub fn alpha(&self) -> f64 {
        match &self.repr {
            ColorRepr::RgbKnown(rgba, _) => rgba.alpha,
            ColorRepr::HslKnown(hsla, _) => hsla.alpha,
        }
    }

    /// Returns a fresh color with any of `red`/`green`/`blue`/`alpha`
    /// overridden, deriving RGB first if this color was HSL-known.
    pub fn change_rgb(
        &self,
        red: Option<u8>,
        green: Option<u8>,
        blue: Option<u8>,
        alpha: Option<f64>,
    ) -> Color {
        let current = self.as_rgba();
        Color::rgb(
            red.unwrap_or(current.red),
            green.unwrap_or(current.green),
            blue.unwrap_or(current.blue),
            alpha.unwrap_or(current.alpha),
        )
    }

    pub fn change_hsl(
        &self,
        hue: Option<f64>,
        saturation: Option<f64>,
        lightness: Option<f64>,
        alpha: Option<f64>,
    ) -> Color {
        let current = self.as_hsla();
        Color::hsl(
            hue.unwrap_or(current.hue),
            saturation.unwrap_or(current.saturation),
            lightness.unwrap_or(current.lightness),
            alpha.unwrap_or(current.alpha),
        )
    }

    pub fn change_alpha(&self, alpha: f64) -> Color {
        match &self.repr {
            ColorRepr::RgbKnown(rgba, _) => Color::rgb(rgba.red, rgba.green, rgba.blue, alpha),
            ColorRepr::HslKnown(hsla, _) => {
                Color::hsl(hsla.hue, hsla.saturation, hsla.lightness, alpha)
            }
        }
    }

    /// Weighted average of two colors' RGB channels and alpha, per the
    /// CSS `color.mix`/Sass `mix()` algorithm: the alpha-adjusted weight
    /// biases the channel average, and the result's own alpha is the
    /// plain weighted average of the two alphas.
    pub fn mix(&self, other: &Color, weight: f64) -> Color {
        let a = self.as_rgba();
        let b = other.as_rgba();

        let raw_weight = weight.clamp(0.0, 100.0) / 100.0;
        let normalized = raw_weight * 2.0 - 1.0;
        let alpha_distance = a.alpha - b.alpha;

        let combined_weight = if normalized * alpha_distance == -1.0 {
            normalized
        } else {
            (normalized + alpha_distance) / (1.0 + normalized * alpha_distance)
        };
        let w1 = (combined_weight + 1.0) / 2.0;
        let w2 = 1.0 - w1;

        let mix_channel = |x: u8, y: u8| -> u8 {
            fuzzy::fuzzy_round(x as f64 * w1 + y as f64 * w2)
                .clamp(0.0, 255.0) as u8
        };

        Color::rgb(
            mix_channel(a.red, b.red),
            mix_channel(a.green, b.green),
            mix_channel(a.blue, b.blue),
            a.alpha * raw_weight + b.alpha * (1.0 - raw_weight),
        )
    }

    pub fn to_css_string(&self) -> String {
        let rgba = self.as_rgba();
        if fuzzy::fuzzy_equals(rgba.alpha, 1.0) {
            format!("#{:02x}{:02x}{:02x}", rgba.red, rgba.green, rgba.blue)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                rgba.red, rgba.green, rgba.blue, rgba.alpha
            )
        }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        let a = self.as_rgba();
        let b = other.as_rgba();
        a.red == b.red
            && a.green == b.green
            && a.blue == b.blue
            && fuzzy::fuzzy_equals(a.alpha, b.alpha)
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let rgba = self.as_rgba();
        rgba.red.hash(state);
        rgba.green.hash(state);
        rgba.blue.hash(state);
        fuzzy::fuzzy_hash_code(rgba.alpha).hash(state);
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string())
    }
}

/// CSS3 HSL -> RGB, https://www.w3.org/TR/css-color-3/#hsl-color.
fn hsl_to_rgb(hsla: Hsla) -> Rgba {
    let h = hsla.hue / 360.0;
    let s = hsla.saturation / 100.0;
    let l = hsla.lightness / 100.0;

    let m2 = if l <= 0.5 {
        l * (s + 1.0)
    } else {
        l + s - l * s
    };
    let m1 = l * 2.0 - m2;

    let red = hue_to_rgb(m1, m2, h + 1.0 / 3.0);
    let green = hue_to_rgb(m1, m2, h);
    let blue = hue_to_rgb(m1, m2, h - 1.0 / 3.0);

    Rgba {
        red: channel_to_u8(red),
        green: channel_to_u8(green),
        blue: channel_to_u8(blue),
        alpha: hsla.alpha,
    }
}

fn channel_to_u8(v: f64) -> u8 {
    fuzzy::fuzzy_round(v * 255.0).clamp(0.0, 255.0) as u8
}

fn hue_to_rgb(m1: f64, m2: f64, hue: f64) -> f64 {
    let mut hue = hue;
    if hue < 0.0 {
        hue += 1.0;
    }
    if hue > 1.0 {
        hue -= 1.0;
    }

    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 1.0 / 2.0 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// CSS3 RGB -> HSL, the inverse of [`hsl_to_rgb`].
fn rgb_to_hsl(rgba: Rgba) -> Hsla {
    let r = rgba.red as f64 / 255.0;
    let g = rgba.green as f64 / 255.0;
    let b = rgba.blue as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let lightness = (max + min) / 2.0;

    let saturation = if delta == 0.0 {
        0.0
    } else if lightness < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Hsla {
        hue: modulo_hue(hue),
        saturation: saturation * 100.0,
        lightness: lightness * 100.0,
        alpha: rgba.alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hsl_round_trip() {
        let color = Color::rgb(51, 204, 51, 1.0);
        let rgba = color.as_rgba();
        let rebuilt_hsla = color.as_hsla();
        let roundtrip = Color::hsl(
            rebuilt_hsla.hue,
            rebuilt_hsla.saturation,
            rebuilt_hsla.lightness,
            rebuilt_hsla.alpha,
        );
        let roundtrip_rgba = roundtrip.as_rgba();
        assert!((roundtrip_rgba.red as i32 - rgba.red as i32).abs() <= 1);
        assert!((roundtrip_rgba.green as i32 - rgba.green as i32).abs() <= 1);
        assert!((roundtrip_rgba.blue as i32 - rgba.blue as i32).abs() <= 1);
    }

    #[test]
    fn hue_wraps_modularly() {
        let color = Color::hsl(400.0, 50.0, 50.0, 1.0);
        assert!((color.hue() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn equality_forces_derivation() {
        let rgb = Color::rgb(0, 0, 0, 1.0);
        let hsl = Color::hsl(0.0, 0.0, 0.0, 1.0);
        assert_eq!(rgb, hsl);
    }

    #[test]
    fn change_alpha_preserves_channels() {
        let color = Color::rgb(10, 20, 30, 1.0);
        let changed = color.change_alpha(0.5);
        assert_eq!(changed.red(), 10);
        assert_eq!(changed.alpha(), 0.5);
    }

    #[test]
    fn mix_averages_channels_evenly() {
        let black = Color::rgb(0, 0, 0, 1.0);
        let white = Color::rgb(255, 255, 255, 1.0);
        let mixed = black.mix(&white, 50.0);
        assert!((mixed.red() as i32 - 128).abs() <= 1);
    }
}
