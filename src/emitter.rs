use cgmath::prelude::*;
use cgmath::Vector3;
use log::trace;
use rand::Rng;

use crate::atlas::{MaterialRef, SpriteAtlas};
use crate::color::ColorHsva;
use crate::effect_params::EffectParams;
use crate::frame_clock::FrameTiming;
use crate::particle_store::ParticleStore;

// A complete particle effect: emission state, the particle population and the
// conservative bounding radius the host uses for culling. One instance is
// advanced exactly once per frame tick; rendering reads it without mutation.
pub struct ParticleEffect {
    pub params: EffectParams,
    pub material: MaterialRef,

    store: ParticleStore,
    burst_count: i32,
    burst_timer: f32,
    bound_radius: f32,
}

impl ParticleEffect {
    pub fn new(material: MaterialRef, params: EffectParams) -> ParticleEffect {
        ParticleEffect {
            params,
            material,
            store: ParticleStore::new(),
            burst_count: 0,
            burst_timer: 0.0,
            bound_radius: 0.0,
        }
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn live_count(&self) -> usize {
        self.store.len()
    }

    // Number of bursts emitted so far.
    pub fn burst_count(&self) -> i32 {
        self.burst_count
    }

    // Conservative culling radius around the owner, in world units.
    pub fn bound_radius(&self, owner_scale: f32) -> f32 {
        self.bound_radius * owner_scale
    }

    // Creates count particles from the emission distributions. Skips silently
    // while the material's texture atlas has not resolved yet; that race is
    // expected during asset streaming and must not abort the frame.
    pub fn add_particles<A, R>(&mut self, count: u32, atlas: Option<&A>, rng: &mut R)
    where
        A: SpriteAtlas + ?Sized,
        R: Rng,
    {
        let atlas = match atlas {
            Some(atlas) => atlas,
            None => {
                trace!("particle material not resolved, skipping emit of {}", count);
                return;
            }
        };
        let frame_count = atlas.frame_count();
        let emit_data = self.params.emit_data;

        for particle in self.store.grow(count as usize) {
            particle.age_factor = 0.0;
            particle.position = emit_data.base_pos + emit_data.random_pos.sample_vector(rng);
            particle.velocity = emit_data.base_vel + emit_data.random_vel.sample_vector(rng);
            particle.angle = emit_data.random_angle.sample(rng);
            particle.angle_velocity = emit_data.random_angle_vel.sample(rng);
            particle.time_to_live = emit_data.lifetime.sample(rng);
            particle.sprite_index = if frame_count > 0 {
                rng.gen_range(0, frame_count)
            } else {
                0
            };
            particle.color =
                ColorHsva::sample_between(rng, emit_data.min_color, emit_data.max_color).to_rgba();
        }
    }

    // One simulation step: kinematics and aging, retirement, bounding update,
    // burst emission. Returns true when the owner should dispose this effect
    // (dispose_when_empty is set and no particle survived the step).
    pub fn advance<A, R>(&mut self, timing: FrameTiming, atlas: Option<&A>, rng: &mut R) -> bool
    where
        A: SpriteAtlas + ?Sized,
        R: Rng,
    {
        let time_mult = timing.time_mult;
        let linear_decay = self.params.linear_drag * 0.1 * time_mult;
        let angular_decay = self.params.angular_drag * 0.1 * time_mult;

        // Iterate back to front so the swap-removal of an expired particle
        // never skips the entry swapped into its slot.
        let mut bound_max = Vector3::new(0.0f32, 0.0, 0.0);
        for i in (0..self.store.len()).rev() {
            let expired;
            {
                let particle = &mut self.store.as_mut_slice()[i];
                particle.position += particle.velocity * time_mult;
                particle.angle += particle.angle_velocity * time_mult;
                // Multiplicative decay, deliberately not clamped at zero;
                // extreme drag values can flip the sign (see the drag test).
                particle.velocity -= particle.velocity * linear_decay;
                particle.angle_velocity -= particle.angle_velocity * angular_decay;
                particle.age_factor += timing.delta_ms / particle.time_to_live;

                expired = particle.age_factor > 1.0;
                if !expired {
                    bound_max.x = bound_max.x.max(particle.position.x.abs());
                    bound_max.y = bound_max.y.max(particle.position.y.abs());
                    bound_max.z = bound_max.z.max(particle.position.z.abs());
                }
            }
            if expired {
                self.store.remove_at(i);
            }
        }
        self.bound_radius = bound_max.magnitude() + self.params.particle_size.magnitude();

        // Burst emission while budget remains.
        let pattern = self.params.emit_pattern;
        if self.burst_count < pattern.max_burst_count || pattern.max_burst_count < 0 {
            self.burst_timer -= timing.delta_ms;
            if self.burst_timer <= 0.0 {
                // Re-arm by adding the sampled delay so any overshoot of this
                // frame carries into the next interval.
                self.burst_timer += pattern.delay.sample(rng);
                self.burst_count += 1;
                let burst_size = pattern.count.sample_count(rng);
                trace!("burst {} of {} particles", self.burst_count, burst_size);
                self.add_particles(burst_size, atlas, rng);
            }
        }

        self.params.dispose_when_empty && self.store.is_empty()
    }
}
