use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("viewport must be non-empty, got {width}x{height}")]
    EmptyViewport { width: usize, height: usize },

    #[error("grid has {found} cells, expected {expected}")]
    GridSize { expected: usize, found: usize },

    #[error("{layer} grid is {found:?}, base grid is {expected:?}")]
    GridMismatch {
        layer: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("texture has {found} pixels, expected {expected}")]
    TextureSize { expected: usize, found: usize },

    #[error("at least one wall texture is required")]
    NoWallTextures,

    #[error("wall texture {index} is {found:?}, expected {expected:?}")]
    WallTextureSize {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("sprite {sprite} references missing texture {texture}")]
    MissingSpriteTexture { sprite: usize, texture: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
