//! Color values for theme config and drawing.
//!
//! Colors are straight (non-premultiplied) RGBA in normalized f64 channels;
//! premultiplication happens inside the raster pipeline. Procedural drawing
//! code picks colors through [`Color::hsla`], which takes the usual
//! (360, 100, 100, 100) ranges.

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            (r as f64) / 255.0,
            (g as f64) / 255.0,
            (b as f64) / 255.0,
            1.0,
        )
    }

    /// HSL with hue in 0..360 and saturation/lightness/alpha in 0..100.
    pub fn hsla(h: f64, s: f64, l: f64, a: f64) -> Self {
        hsla_to_rgba(h, s / 100.0, l / 100.0, a / 100.0)
    }

    /// Straight-alpha RGBA8 channels for the raster backend.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::rgba(v[0], v[1], v[2], 1.0))
                } else if v.len() == 4 {
                    Ok(Self::rgba(v[0], v[1], v[2], v[3]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    let (r, g, b, a) = match s.len() {
        6 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            (r, g, b, 255)
        }
        8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = hex_byte(&s[6..8])?;
            (r, g, b, a)
        }
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Color::rgba(
        (r as f64) / 255.0,
        (g as f64) / 255.0,
        (b as f64) / 255.0,
        (a as f64) / 255.0,
    ))
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Color {
    // Standard HSL -> RGB conversion (sRGB space, normalized 0..1 inputs).
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Color::rgba(l, l, l, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    Color::rgba(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_rgb_and_rgba() {
        let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

        let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
        assert!((c.b - 1.0).abs() < 1e-9);
        assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
    }

    #[test]
    fn parses_rgba_object_and_array() {
        let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
        assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

        let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
        assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));
    }

    #[test]
    fn hsla_matches_known_points() {
        // Pure red at full saturation, half lightness.
        let c = Color::hsla(0.0, 100.0, 50.0, 100.0);
        assert!((c.r - 1.0).abs() < 1e-9);
        assert!((c.g - 0.0).abs() < 1e-9);
        assert!((c.b - 0.0).abs() < 1e-9);
        assert!((c.a - 1.0).abs() < 1e-9);

        // Zero saturation collapses to gray at the lightness level.
        let c = Color::hsla(123.0, 0.0, 40.0, 100.0);
        assert!((c.r - 0.4).abs() < 1e-9);
        assert!((c.g - 0.4).abs() < 1e-9);
        assert!((c.b - 0.4).abs() < 1e-9);
    }

    #[test]
    fn hsla_alpha_is_percent() {
        let c = Color::hsla(50.0, 50.0, 75.0, 10.0);
        assert!((c.a - 0.1).abs() < 1e-9);
    }

    #[test]
    fn to_rgba8_quantizes_straight_channels() {
        let c = Color::rgba(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.to_rgba8(), [255, 128, 0, 128]);
    }
}
