pub mod atlas;
pub mod color;
pub mod effect_params;
pub mod emitter;
pub mod frame_clock;
pub mod particle_renderer;
pub mod particle_store;
