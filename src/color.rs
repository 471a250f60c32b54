use rand::Rng;
use serde::{Deserialize, Serialize};

// Particle colors are sampled in HSVA space (uniform per channel between two
// endpoint colors) and resolved to RGBA bytes once, at creation time.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ColorHsva {
    pub h: f32,
    pub s: f32,
    pub v: f32,
    pub a: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorHsva {
    pub const WHITE: ColorHsva = ColorHsva {
        h: 0.0,
        s: 0.0,
        v: 1.0,
        a: 1.0,
    };

    pub fn new(h: f32, s: f32, v: f32, a: f32) -> ColorHsva {
        ColorHsva { h, s, v, a }
    }

    // All channels in [0, 1]; hue wraps.
    pub fn to_rgba(self) -> ColorRgba {
        let h = (self.h - self.h.floor()) * 6.0;
        let c = self.v * self.s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = self.v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        ColorRgba {
            r: ((r + m) * 255.0) as u8,
            g: ((g + m) * 255.0) as u8,
            b: ((b + m) * 255.0) as u8,
            a: (self.a * 255.0) as u8,
        }
    }

    pub fn sample_between<R: Rng>(rng: &mut R, min: ColorHsva, max: ColorHsva) -> ColorHsva {
        ColorHsva {
            h: min.h + (max.h - min.h) * rng.gen::<f32>(),
            s: min.s + (max.s - min.s) * rng.gen::<f32>(),
            v: min.v + (max.v - min.v) * rng.gen::<f32>(),
            a: min.a + (max.a - min.a) * rng.gen::<f32>(),
        }
    }
}

impl ColorRgba {
    pub const WHITE: ColorRgba = ColorRgba {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

impl Default for ColorRgba {
    fn default() -> ColorRgba {
        ColorRgba::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn white_converts_to_opaque_white() {
        assert_eq!(ColorHsva::WHITE.to_rgba(), ColorRgba::WHITE);
    }

    #[test]
    fn primary_hues() {
        let red = ColorHsva::new(0.0, 1.0, 1.0, 1.0).to_rgba();
        assert_eq!((red.r, red.g, red.b), (255, 0, 0));
        let green = ColorHsva::new(1.0 / 3.0, 1.0, 1.0, 1.0).to_rgba();
        assert_eq!((green.r, green.g, green.b), (0, 255, 0));
        let blue = ColorHsva::new(2.0 / 3.0, 1.0, 1.0, 1.0).to_rgba();
        assert_eq!((blue.r, blue.g, blue.b), (0, 0, 255));
    }

    #[test]
    fn hue_wraps_past_one() {
        let a = ColorHsva::new(0.25, 0.8, 0.9, 1.0).to_rgba();
        let b = ColorHsva::new(1.25, 0.8, 0.9, 1.0).to_rgba();
        assert_eq!(a, b);
    }

    #[test]
    fn sample_between_equal_endpoints_is_exact() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = ColorHsva::new(0.6, 0.5, 0.4, 0.3);
        let sampled = ColorHsva::sample_between(&mut rng, c, c);
        assert_eq!(sampled, c);
    }

    #[test]
    fn sample_between_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let min = ColorHsva::new(0.1, 0.2, 0.3, 0.4);
        let max = ColorHsva::new(0.2, 0.4, 0.6, 0.8);
        for _ in 0..100 {
            let c = ColorHsva::sample_between(&mut rng, min, max);
            assert!(c.h >= min.h && c.h <= max.h);
            assert!(c.s >= min.s && c.s <= max.s);
            assert!(c.v >= min.v && c.v <= max.v);
            assert!(c.a >= min.a && c.a <= max.a);
        }
    }
}
