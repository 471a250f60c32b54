use cgmath::Vector2;

// Handle to an externally managed material. The effect never dereferences it;
// it is handed back to the draw device together with each vertex batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialRef(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vector2<f32>,
    pub max: Vector2<f32>,
}

impl UvRect {
    pub fn full() -> UvRect {
        UvRect {
            min: Vector2::new(0.0, 0.0),
            max: Vector2::new(1.0, 1.0),
        }
    }
}

// A sprite sheet owned by the host. Resolution of a material to its atlas can
// transiently fail while assets stream in, so callers hand the effect an
// `Option<&A>` and a `None` degrades to a no-op.
pub trait SpriteAtlas {
    fn frame_count(&self) -> u32;
    fn frame_uv(&self, index: u32) -> UvRect;
}
