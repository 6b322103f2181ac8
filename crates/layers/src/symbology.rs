//! Colors and the value-to-color scale used to fill regions.

use serde::{Deserialize, Serialize};

/// An sRGB color with channels in `0..=255` and alpha in `0..=1`.
///
/// Channels stay fractional until formatted so interpolated colors are not
/// rounded twice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized color {:?}", self.input)
    }
}

impl std::error::Error for ColorParseError {}

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("cyan", 0x00ffff),
    ("aqua", 0x00ffff),
    ("magenta", 0xff00ff),
    ("fuchsia", 0xff00ff),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("lightgray", 0xd3d3d3),
    ("lightgrey", 0xd3d3d3),
    ("darkgray", 0xa9a9a9),
    ("darkgrey", 0xa9a9a9),
    ("silver", 0xc0c0c0),
    ("maroon", 0x800000),
    ("olive", 0x808000),
    ("navy", 0x000080),
    ("purple", 0x800080),
    ("teal", 0x008080),
    ("orange", 0xffa500),
    ("brown", 0xa52a2a),
    ("pink", 0xffc0cb),
    ("gold", 0xffd700),
    ("steelblue", 0x4682b4),
    ("skyblue", 0x87ceeb),
    ("lightblue", 0xadd8e6),
    ("darkblue", 0x00008b),
    ("darkgreen", 0x006400),
    ("darkred", 0x8b0000),
    ("orangered", 0xff4500),
    ("tomato", 0xff6347),
    ("crimson", 0xdc143c),
    ("indigo", 0x4b0082),
    ("violet", 0xee82ee),
    ("beige", 0xf5f5dc),
    ("ivory", 0xfffff0),
    ("whitesmoke", 0xf5f5f5),
];

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    fn from_hex24(v: u32) -> Self {
        Self::rgb(
            ((v >> 16) & 0xff) as f64,
            ((v >> 8) & 0xff) as f64,
            (v & 0xff) as f64,
        )
    }

    /// Parse a CSS color: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
    /// `rgb()`/`rgba()` or a common named color.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim().to_ascii_lowercase();
        let err = || ColorParseError {
            input: input.to_string(),
        };

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }
        if let Some(args) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args).ok_or_else(err);
        }
        if s == "transparent" {
            return Ok(Self::rgba(0.0, 0.0, 0.0, 0.0));
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, v)| Self::from_hex24(*v))
            .ok_or_else(err)
    }

    /// `#rrggbb` for opaque colors, `rgba(r,g,b,a)` otherwise.
    pub fn to_css(&self) -> String {
        let r = channel(self.r);
        let g = channel(self.g);
        let b = channel(self.b);
        let a = if self.a.is_finite() {
            self.a.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r},{g},{b},{a})")
        }
    }

    pub fn interpolate(&self, other: &Color, t: f64, space: ColorSpace) -> Color {
        match space {
            ColorSpace::Rgb => Color::rgba(
                lerp(self.r, other.r, t),
                lerp(self.g, other.g, t),
                lerp(self.b, other.b, t),
                lerp(self.a, other.a, t),
            ),
            ColorSpace::Hcl => {
                let a = Hcl::from_color(self);
                let b = Hcl::from_color(other);
                let mut out = a.interpolate(&b, t).to_color();
                out.a = lerp(self.a, other.a, t);
                out
            }
        }
    }
}

fn channel(v: f64) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Color::rgba(
        r as f64,
        g as f64,
        b as f64,
        a as f64 / 255.0,
    ))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut rgb = [0.0; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => part.parse::<f64>().ok()?,
        }
        .clamp(0.0, 255.0);
    }
    let a = match parts.get(3) {
        Some(part) => match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => part.parse::<f64>().ok()?,
        }
        .clamp(0.0, 1.0),
        None => 1.0,
    };
    Some(Color::rgba(rgb[0], rgb[1], rgb[2], a))
}

/// Color space used to interpolate between the two ramp ends.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    #[default]
    Rgb,
    Hcl,
}

impl ColorSpace {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Some(ColorSpace::Rgb),
            "hcl" | "lch" => Some(ColorSpace::Hcl),
            _ => None,
        }
    }
}

// CIE L*C*h under D50, matching the sRGB conversion browsers use for `lch()`.
#[derive(Debug, Copy, Clone)]
struct Hcl {
    h: f64,
    c: f64,
    l: f64,
}

const XN: f64 = 0.96422;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

fn rgb_to_linear(v: f64) -> f64 {
    let v = v / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_rgb(v: f64) -> f64 {
    255.0
        * if v <= 0.0031308 {
            12.92 * v
        } else {
            1.055 * v.powf(1.0 / 2.4) - 0.055
        }
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 { t.cbrt() } else { t / T2 + T0 }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 { t * t * t } else { T2 * (t - T0) }
}

impl Hcl {
    fn from_color(c: &Color) -> Self {
        let r = rgb_to_linear(c.r);
        let g = rgb_to_linear(c.g);
        let b = rgb_to_linear(c.b);
        let y = xyz_to_lab(0.2225045 * r + 0.7168786 * g + 0.0606169 * b);
        let (x, z) = if r == g && g == b {
            (y, y)
        } else {
            (
                xyz_to_lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
                xyz_to_lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
            )
        };
        let l = 116.0 * y - 16.0;
        let a = 500.0 * (x - y);
        let bb = 200.0 * (y - z);
        let chroma = (a * a + bb * bb).sqrt();
        // Achromatic colors have no hue; interpolation borrows the other end's.
        let h = if chroma < 1e-9 {
            f64::NAN
        } else {
            bb.atan2(a).to_degrees().rem_euclid(360.0)
        };
        Self { h, c: chroma, l }
    }

    fn interpolate(&self, other: &Hcl, t: f64) -> Hcl {
        let h = match (self.h.is_nan(), other.h.is_nan()) {
            (true, true) => f64::NAN,
            (true, false) => other.h,
            (false, true) => self.h,
            (false, false) => {
                let mut d = other.h - self.h;
                if d > 180.0 {
                    d -= 360.0;
                } else if d < -180.0 {
                    d += 360.0;
                }
                self.h + d * t
            }
        };
        Hcl {
            h,
            c: lerp(self.c, other.c, t),
            l: lerp(self.l, other.l, t),
        }
    }

    fn to_color(self) -> Color {
        let (a, b) = if self.h.is_nan() {
            (0.0, 0.0)
        } else {
            let h = self.h.to_radians();
            (self.c * h.cos(), self.c * h.sin())
        };
        let y = (self.l + 16.0) / 116.0;
        let x = XN * lab_to_xyz(y + a / 500.0);
        let z = ZN * lab_to_xyz(y - b / 200.0);
        let y = lab_to_xyz(y);
        Color::rgb(
            linear_to_rgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
            linear_to_rgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
            linear_to_rgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
        )
    }
}

/// Extent of the finite values a scale maps from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorDomain {
    pub min: f64,
    pub max: f64,
}

impl ColorDomain {
    /// `None` when there is no finite value.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(ColorDomain { min: v, max: v }),
                Some(d) => Some(ColorDomain {
                    min: d.min.min(v),
                    max: d.max.max(v),
                }),
            })
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Linear map from a value domain onto a two-color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Option<ColorDomain>,
    low: Color,
    high: Color,
    space: ColorSpace,
    fallback: Color,
}

impl ColorScale {
    pub fn build(
        values: impl IntoIterator<Item = f64>,
        low: Color,
        high: Color,
        space: ColorSpace,
        fallback: Color,
    ) -> Self {
        Self {
            domain: ColorDomain::from_values(values),
            low,
            high,
            space,
            fallback,
        }
    }

    pub fn domain(&self) -> Option<ColorDomain> {
        self.domain
    }

    /// Color for a value. Missing values get the fallback color; values
    /// outside the domain are clamped to the ramp ends; a degenerate domain
    /// maps everything to the ramp midpoint.
    pub fn resolve(&self, value: Option<f64>) -> Color {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return self.fallback;
        };
        let t = match self.domain {
            Some(d) if !d.is_degenerate() => ((v - d.min) / (d.max - d.min)).clamp(0.0, 1.0),
            _ => 0.5,
        };
        if t == 0.0 {
            return self.low;
        }
        if t == 1.0 {
            return self.high;
        }
        self.low.interpolate(&self.high, t, self.space)
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorScale, ColorSpace};

    fn scale(values: &[f64], space: ColorSpace) -> ColorScale {
        ColorScale::build(
            values.iter().copied(),
            Color::parse("#000000").unwrap(),
            Color::parse("#ffffff").unwrap(),
            space,
            Color::parse("#cccccc").unwrap(),
        )
    }

    #[test]
    fn parses_css_forms() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::rgb(255.0, 255.0, 255.0));
        assert_eq!(Color::parse(" #FF8000 ").unwrap(), Color::rgb(255.0, 128.0, 0.0));
        assert_eq!(Color::parse("rgb(1, 2, 3)").unwrap(), Color::rgb(1.0, 2.0, 3.0));
        assert_eq!(
            Color::parse("rgba(10,20,30,0.5)").unwrap(),
            Color::rgba(10.0, 20.0, 30.0, 0.5)
        );
        assert_eq!(Color::parse("SteelBlue").unwrap().to_css(), "#4682b4");
        assert_eq!(Color::parse("transparent").unwrap().a, 0.0);
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("notacolor").is_err());
        assert!(Color::parse("rgb(1,2)").is_err());
    }

    #[test]
    fn formats_opaque_as_hex_and_translucent_as_rgba() {
        assert_eq!(Color::rgb(255.0, 0.0, 127.6).to_css(), "#ff0080");
        assert_eq!(Color::rgba(1.0, 2.0, 3.0, 0.25).to_css(), "rgba(1,2,3,0.25)");
    }

    #[test]
    fn endpoints_map_to_ramp_colors() {
        let s = scale(&[0.0, 10.0], ColorSpace::Rgb);
        assert_eq!(s.resolve(Some(0.0)).to_css(), "#000000");
        assert_eq!(s.resolve(Some(10.0)).to_css(), "#ffffff");
        assert_eq!(s.resolve(Some(5.0)).to_css(), "#808080");
    }

    #[test]
    fn interior_values_lie_on_the_ramp() {
        let low = Color::rgb(0.0, 100.0, 200.0);
        let high = Color::rgb(200.0, 100.0, 0.0);
        let s = ColorScale::build([0.0, 4.0], low, high, ColorSpace::Rgb, low);
        for i in 0..=4 {
            let c = s.resolve(Some(i as f64));
            let t = i as f64 / 4.0;
            assert!((c.r - 200.0 * t).abs() < 1e-9);
            assert!((c.g - 100.0).abs() < 1e-9);
            assert!((c.b - 200.0 * (1.0 - t)).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_and_out_of_range_values() {
        let s = scale(&[0.0, 10.0], ColorSpace::Rgb);
        assert_eq!(s.resolve(None).to_css(), "#cccccc");
        assert_eq!(s.resolve(Some(f64::NAN)).to_css(), "#cccccc");
        assert_eq!(s.resolve(Some(-5.0)).to_css(), "#000000");
        assert_eq!(s.resolve(Some(50.0)).to_css(), "#ffffff");
    }

    #[test]
    fn degenerate_domain_uses_midpoint() {
        let s = scale(&[3.0, 3.0], ColorSpace::Rgb);
        assert!(s.domain().unwrap().is_degenerate());
        assert_eq!(s.resolve(Some(3.0)).to_css(), "#808080");
        let empty = scale(&[], ColorSpace::Rgb);
        assert!(empty.domain().is_none());
        assert_eq!(empty.resolve(Some(1.0)).to_css(), "#808080");
    }

    #[test]
    fn hcl_keeps_endpoints_and_stays_grey_between_greys() {
        let s = scale(&[0.0, 10.0], ColorSpace::Hcl);
        assert_eq!(s.resolve(Some(0.0)).to_css(), "#000000");
        assert_eq!(s.resolve(Some(10.0)).to_css(), "#ffffff");
        let mid = s.resolve(Some(5.0));
        assert!((mid.r - mid.g).abs() < 1.0 && (mid.g - mid.b).abs() < 1.0);
    }

    #[test]
    fn hcl_takes_the_short_hue_arc() {
        let red = Color::parse("#ff0000").unwrap();
        let magenta = Color::parse("#ff00ff").unwrap();
        let mid = red.interpolate(&magenta, 0.5, ColorSpace::Hcl);
        // Between red and magenta, not through green.
        assert!(mid.r > mid.g);
        assert!(mid.b > mid.g);
    }

    #[test]
    fn hcl_round_trip_is_stable() {
        let c = Color::parse("#4682b4").unwrap();
        assert_eq!(c.interpolate(&c, 0.3, ColorSpace::Hcl).to_css(), "#4682b4");
    }
}
