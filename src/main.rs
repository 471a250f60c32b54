use anyhow::Context;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ember::atlas::{MaterialRef, SpriteAtlas, UvRect};
use ember::effect_params::EffectParams;
use ember::emitter::ParticleEffect;
use ember::frame_clock::{FrameClock, FrameTiming};
use ember::particle_renderer::{DrawDevice, OwnerTransform, ParticleRenderer, ParticleVertex};

gflags::define! {
    --log_filter: &str = "info"
}
gflags::define! {
    --config: &str = "effect_config.toml"
}
gflags::define! {
    --seed: u64 = 17
}
gflags::define! {
    --frames: u32 = 600
}
gflags::define! {
    --fps: f64 = 60.0
}
gflags::define! {
    // Pace the loop with a wall clock instead of a fixed step.
    --realtime = false
}
gflags::define! {
    -h, --help = false
}

// Stand-ins for the host engine's collaborators, enough to drive the effect
// headless: a horizontal-strip sprite sheet and a device that only counts.
struct StripAtlas {
    frames: u32,
}

impl SpriteAtlas for StripAtlas {
    fn frame_count(&self) -> u32 {
        self.frames
    }
    fn frame_uv(&self, index: u32) -> UvRect {
        let step = 1.0 / self.frames as f32;
        UvRect {
            min: cgmath::Vector2::new(index as f32 * step, 0.0),
            max: cgmath::Vector2::new((index + 1) as f32 * step, 1.0),
        }
    }
}

#[derive(Default)]
struct NullDevice {
    batches: usize,
    vertices: usize,
}

impl DrawDevice for NullDevice {
    fn preprocess_coords(&mut self, _pos: &mut cgmath::Vector3<f32>, _scale: &mut f32) {}
    fn add_quads(&mut self, _material: MaterialRef, vertices: &[ParticleVertex]) {
        self.batches += 1;
        self.vertices += vertices.len();
    }
}

fn load_params() -> anyhow::Result<EffectParams> {
    if std::path::Path::new(CONFIG.flag).exists() {
        let serialized = std::fs::read_to_string(CONFIG.flag)
            .with_context(|| format!("reading {}", CONFIG.flag))?;
        let params: EffectParams = serialized
            .parse()
            .with_context(|| format!("parsing {}", CONFIG.flag))?;
        Ok(params)
    } else {
        Ok(ember::effect_params::get_effect_config_from_default_file())
    }
}

fn main() -> anyhow::Result<()> {
    gflags::parse();
    if HELP.flag {
        gflags::print_help_and_exit(0);
    }
    scrub_log::init_with_filter_string(LOG_FILTER.flag).unwrap();

    let params = load_params()?;
    info!("Effect config: {:?}", params);

    let atlas = StripAtlas { frames: 8 };
    let mut rng = StdRng::seed_from_u64(SEED.flag);
    let mut effect = ParticleEffect::new(MaterialRef(1), params);
    let mut renderer = ParticleRenderer::new();
    let mut device = NullDevice::default();
    let owner = OwnerTransform::default();
    let mut clock = FrameClock::new(FPS.flag);

    for frame in 0..FRAMES.flag {
        let timing = if REALTIME.flag {
            clock.tick()
        } else {
            FrameTiming::fixed_step(FPS.flag)
        };
        let dispose = effect.advance(timing, Some(&atlas), &mut rng);
        renderer.render(&effect, Some(&atlas), &owner, &mut device);

        if frame % 60 == 0 {
            info!(
                "frame {}: {} live, bound radius {:.1}",
                frame,
                effect.live_count(),
                effect.bound_radius(owner.scale)
            );
        }
        if dispose {
            info!("Effect drained after {} frames", frame + 1);
            break;
        }
    }
    info!(
        "Submitted {} quad batches, {} vertices total",
        device.batches, device.vertices
    );
    Ok(())
}
