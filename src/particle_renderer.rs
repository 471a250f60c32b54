use cgmath::{Matrix2, Rad, Vector2, Vector3};

use crate::atlas::{MaterialRef, SpriteAtlas};
use crate::emitter::ParticleEffect;

// Vertex layout submitted to the draw device: position, atlas UV, RGBA bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, zerocopy::FromBytes, zerocopy::AsBytes)]
pub struct ParticleVertex {
    pub pos: [f32; 3],
    pub tex_coord: [f32; 2],
    pub color: [u8; 4],
}

// World-space transform of the entity owning the effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerTransform {
    pub pos: Vector3<f32>,
    pub angle: f32, // radians
    pub scale: f32, // uniform
}

impl Default for OwnerTransform {
    fn default() -> OwnerTransform {
        OwnerTransform {
            pos: Vector3::new(0.0, 0.0, 0.0),
            angle: 0.0,
            scale: 1.0,
        }
    }
}

// The drawing backend. preprocess_coords runs before quad extents are
// computed and may adjust both inputs (perspective or screen-space
// correction); the effect treats it as opaque.
pub trait DrawDevice {
    fn preprocess_coords(&mut self, pos: &mut Vector3<f32>, scale: &mut f32);
    fn add_quads(&mut self, material: MaterialRef, vertices: &[ParticleVertex]);
}

// Combined rotation and uniform scale for the 2D part of a transform.
fn rotation_scale_basis(angle: f32, scale: f32) -> Matrix2<f32> {
    Matrix2::from_angle(Rad(angle)) * scale
}

fn vertex(pos: Vector3<f32>, corner: Vector2<f32>, tex_coord: [f32; 2], color: [u8; 4]) -> ParticleVertex {
    ParticleVertex {
        pos: [pos.x + corner.x, pos.y + corner.y, pos.z],
        tex_coord,
        color,
    }
}

// Builds one camera-facing textured quad per live particle and submits the
// whole batch to the device. The scratch buffer is reused between frames and
// only ever grows.
pub struct ParticleRenderer {
    vertex_buf: Vec<ParticleVertex>,
}

impl ParticleRenderer {
    pub fn new() -> ParticleRenderer {
        ParticleRenderer {
            vertex_buf: Vec::new(),
        }
    }

    pub fn render<A, D>(
        &mut self,
        effect: &ParticleEffect,
        atlas: Option<&A>,
        owner: &OwnerTransform,
        device: &mut D,
    ) where
        A: SpriteAtlas + ?Sized,
        D: DrawDevice + ?Sized,
    {
        self.vertex_buf.clear();
        let particles = effect.store().as_slice();
        if particles.is_empty() {
            return;
        }
        let atlas = match atlas {
            Some(atlas) => atlas,
            None => return,
        };

        let params = &effect.params;
        let half_size = params.particle_size * 0.5;
        let owner_basis = rotation_scale_basis(owner.angle, owner.scale);

        self.vertex_buf.reserve(particles.len() * 4);
        for particle in particles {
            let mut color = particle.color;
            if params.fade_out_at < 1.0 {
                // Linear ramp from full alpha at the fade threshold down to
                // zero at the end of the particle's lifetime.
                let alpha = ((1.0 - particle.age_factor) / (1.0 - params.fade_out_at))
                    .max(0.0)
                    .min(1.0);
                color.a = (alpha * 255.0) as u8;
            }
            let rgba = [color.r, color.g, color.b, color.a];

            let uv = atlas.frame_uv(particle.sprite_index);

            let local = owner_basis * Vector2::new(particle.position.x, particle.position.y);
            let mut pos = Vector3::new(local.x, local.y, particle.position.z) + owner.pos;
            let mut scale = owner.scale;
            device.preprocess_coords(&mut pos, &mut scale);

            let corner_basis = rotation_scale_basis(owner.angle + particle.angle, scale);
            let top_left = corner_basis * Vector2::new(-half_size.x, -half_size.y);
            let bottom_left = corner_basis * Vector2::new(-half_size.x, half_size.y);
            let bottom_right = corner_basis * Vector2::new(half_size.x, half_size.y);
            let top_right = corner_basis * Vector2::new(half_size.x, -half_size.y);

            self.vertex_buf
                .push(vertex(pos, top_left, [uv.min.x, uv.min.y], rgba));
            self.vertex_buf
                .push(vertex(pos, bottom_left, [uv.min.x, uv.max.y], rgba));
            self.vertex_buf
                .push(vertex(pos, bottom_right, [uv.max.x, uv.max.y], rgba));
            self.vertex_buf
                .push(vertex(pos, top_right, [uv.max.x, uv.min.y], rgba));
        }

        device.add_quads(effect.material, &self.vertex_buf);
    }
}

impl Default for ParticleRenderer {
    fn default() -> ParticleRenderer {
        ParticleRenderer::new()
    }
}
