//! Errors reported for configurations that cannot seed a limit set.
//!
//! Geometric degeneracies met during generation (fixed circles, colinear triplets, budget
//! overrun) are normal outcomes and never show up here.

#[derive(Debug, thiserror::Error)]
pub enum LimitSetError {
    #[error("mapping primitive {index} has invalid radius {radius} (must be positive and finite)")]
    NonPositiveRadius { index: usize, radius: f64 },

    #[error("configuration '{geometry}' has no triplet of tangent mapping primitives (found {triplets}), generation 0 cannot be seeded")]
    InsufficientTangency { geometry: String, triplets: usize },

    #[error("mapping primitive {index} contains the origin, its hyperbolic radius is undefined")]
    NotNormalizable { index: usize },

    #[error("mapping sphere {index} passes through the stereographic projection center")]
    DegenerateProjection { index: usize },

    #[error("setting '{name}' has invalid value {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("unknown geometry '{name}'")]
    UnknownGeometry { name: String },

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LimitSetError>;
