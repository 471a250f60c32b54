use cgmath::{Vector2, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::color::ColorHsva;

// An inclusive scalar interval used for all emission sampling. A degenerate
// interval (max <= min) always yields min, so fixed values are just
// zero-width ranges and never trip rand's empty-range check.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Range {
        Range { min, max }
    }

    pub fn fixed(value: f32) -> Range {
        Range {
            min: value,
            max: value,
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min, self.max)
        }
    }

    // Integer half-open sample, used for burst sizes.
    pub fn sample_count<R: Rng>(&self, rng: &mut R) -> u32 {
        let min = self.min as i64;
        let max = self.max as i64;
        let count = if max <= min {
            min
        } else {
            rng.gen_range(min, max)
        };
        count.max(0) as u32
    }

    // Random direction on the unit sphere, scaled by a magnitude drawn from
    // this range. Positional and velocity jitter both use this policy.
    pub fn sample_vector<R: Rng>(&self, rng: &mut R) -> Vector3<f32> {
        let z: f32 = rng.gen_range(-1.0, 1.0);
        let theta: f32 = rng.gen_range(0.0, 2.0 * PI);
        let planar = (1.0 - z * z).sqrt();
        Vector3::new(planar * theta.cos(), planar * theta.sin(), z) * self.sample(rng)
    }
}

// Distributions sampled once per particle at creation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct EmissionData {
    pub lifetime: Range, // milliseconds
    pub base_pos: Vector3<f32>,
    pub random_pos: Range,
    pub random_angle: Range, // radians
    pub base_vel: Vector3<f32>,
    pub random_vel: Range,
    pub random_angle_vel: Range,
    pub min_color: ColorHsva,
    pub max_color: ColorHsva,
}

impl Default for EmissionData {
    fn default() -> Self {
        EmissionData {
            lifetime: Range::new(1000.0, 3000.0),
            base_pos: Vector3::new(0.0, 0.0, 0.0),
            random_pos: Range::fixed(0.0),
            random_angle: Range::new(0.0, 2.0 * PI),
            base_vel: Vector3::new(0.0, 0.0, 0.0),
            random_vel: Range::new(0.0, 3.0),
            random_angle_vel: Range::new(-0.05, 0.05),
            min_color: ColorHsva::WHITE,
            max_color: ColorHsva::WHITE,
        }
    }
}

// When and how many particles each burst creates. A negative max_burst_count
// means the emitter never stops bursting.
// Scalar fields come before table-valued ones so toml can serialize this.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct EmissionPattern {
    pub max_burst_count: i32,
    pub delay: Range, // milliseconds between bursts
    pub count: Range, // particles per burst
}

impl Default for EmissionPattern {
    fn default() -> Self {
        EmissionPattern {
            max_burst_count: -1,
            delay: Range::fixed(100.0),
            count: Range::fixed(1.0),
        }
    }
}

// Parameters that define one particle effect. These don't change mid-frame.
// Scalar fields come before table-valued ones so toml can serialize this.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct EffectParams {
    pub linear_drag: f32,
    pub angular_drag: f32,
    pub fade_out_at: f32,
    pub dispose_when_empty: bool,
    pub particle_size: Vector2<f32>,

    #[serde(default)]
    pub emit_data: EmissionData,

    #[serde(default)]
    pub emit_pattern: EmissionPattern,
}

impl Default for EffectParams {
    fn default() -> Self {
        EffectParams {
            linear_drag: 0.3,
            angular_drag: 0.3,
            fade_out_at: 0.75,
            dispose_when_empty: true,
            particle_size: Vector2::new(16.0, 16.0),
            emit_data: EmissionData::default(),
            emit_pattern: EmissionPattern::default(),
        }
    }
}

impl std::str::FromStr for EffectParams {
    type Err = toml::de::Error;
    fn from_str(serialized: &str) -> Result<Self, Self::Err> {
        let params = toml::from_str(serialized)?;
        Ok(params)
    }
}

pub fn get_effect_config_from_default_file() -> EffectParams {
    let config_data = include_str!("../effect_config.toml");
    match config_data.parse() {
        Ok(params) => params,
        Err(e) => {
            log::error!(
                "Failed to parse config file({}): {:?}",
                "../effect_config.toml",
                e
            );
            EffectParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn smoke() {
        let params = EffectParams {
            linear_drag: 0.1,
            angular_drag: 0.2,
            fade_out_at: 0.5,
            dispose_when_empty: false,
            particle_size: Vector2::new(24.0, 24.0),
            emit_data: EmissionData::default(),
            emit_pattern: EmissionPattern::default(),
        };
        let serialized = toml::to_string(&params).unwrap();
        println!("serialized = {}", serialized);
        let deserialized: EffectParams = toml::from_str(&serialized).unwrap();
        println!("deserialized = {:?}", deserialized);
        assert_eq!(params.particle_size, deserialized.particle_size);
        assert_eq!(params.linear_drag, deserialized.linear_drag);
        assert_eq!(params.fade_out_at, deserialized.fade_out_at);
        assert_eq!(
            params.emit_pattern.max_burst_count,
            deserialized.emit_pattern.max_burst_count
        );
    }

    #[test]
    fn documented_defaults() {
        let data = EmissionData::default();
        assert_eq!(data.lifetime, Range::new(1000.0, 3000.0));
        assert_eq!(data.random_pos, Range::fixed(0.0));
        assert_eq!(data.random_angle, Range::new(0.0, 2.0 * PI));
        assert_eq!(data.random_vel, Range::new(0.0, 3.0));
        assert_eq!(data.random_angle_vel, Range::new(-0.05, 0.05));
        assert_eq!(data.min_color, ColorHsva::WHITE);
        assert_eq!(data.max_color, ColorHsva::WHITE);

        let pattern = EmissionPattern::default();
        assert_eq!(pattern.delay, Range::fixed(100.0));
        assert_eq!(pattern.count, Range::fixed(1.0));
        assert_eq!(pattern.max_burst_count, -1);

        let params = EffectParams::default();
        assert_eq!(params.particle_size, Vector2::new(16.0, 16.0));
        assert_eq!(params.linear_drag, 0.3);
        assert_eq!(params.angular_drag, 0.3);
        assert_eq!(params.fade_out_at, 0.75);
        assert!(params.dispose_when_empty);
    }

    #[test]
    fn degenerate_range_saturates_to_min() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(Range::fixed(42.0).sample(&mut rng), 42.0);
        assert_eq!(Range::new(10.0, 2.0).sample(&mut rng), 10.0);
        assert_eq!(Range::fixed(1.0).sample_count(&mut rng), 1);
        assert_eq!(Range::new(-3.0, -1.0).sample_count(&mut rng), 0);
    }

    #[test]
    fn scalar_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let range = Range::new(-2.0, 5.0);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!(v >= range.min && v < range.max);
        }
    }

    #[test]
    fn jitter_vector_magnitude_stays_in_range() {
        use cgmath::InnerSpace;
        let mut rng = StdRng::seed_from_u64(13);
        let range = Range::new(1.0, 4.0);
        for _ in 0..100 {
            let v = range.sample_vector(&mut rng);
            let len = v.magnitude();
            assert!(len >= range.min - 1e-4 && len <= range.max + 1e-4);
        }
    }
}
