//! # limitset
//!
//! `limitset` computes limit sets of groups generated by inversions at touching circles
//! (in the plane) or spheres (in space), designed to be used in Rust as well as compiled
//! to WebAssembly (WASM). In the plane the result is an Apollonian gasket, in space the
//! mapping spheres sit at the vertices of a regular solid and the images are circles.
//!
//! ## Features
//!
//! - **Exact inversion**: circles, lines and spheres with every degenerate case handled
//!   explicitly, fixed images are reported as [`Inversion::Unchanged`].
//! - **Generation engine**: a step-wise state machine with a budget on the number of images.
//! - **Presets**: the Apollonian gasket and the five Platonic solids, the latter also as
//!   stereographic projections to the plane.
//! - **Output**: OpenSCAD export and a [`render::Renderer`] adapter for drawing backends.
//! - **WASM-first**: `LimitSet2D` and `LimitSet3D` classes for JavaScript.
//!
//! ## Example
//!
//! ```
//! use limitset::{LimitSet2D, Settings};
//!
//! let settings = Settings { generations: 2, ..Settings::default() };
//! let mut set = LimitSet2D::from_settings(&settings).unwrap();
//! set.calculate();
//! assert_eq!(set.generation(0).len(), 4);
//! ```
//!
//! See the `demos/` directory for SVG plots made with `plotters`.

pub mod error;
pub mod export;
pub mod limit_set;
pub mod presets;
pub mod primitive;
pub mod render;
pub mod settings;
pub mod triplet;
pub mod wasm;

pub use error::{LimitSetError, Result};
pub use limit_set::{GenerationContext, GenerationState, LimitSet, LimitSet2D, LimitSet3D, Outcome, SeedImage};
pub use presets::Geometry;
pub use primitive::d2::{Circle2D, Image2D, Line2D};
pub use primitive::d3::{Circle3D, Image3D, Line3D, Sphere};
pub use primitive::{Image, Inversion, Mapping, EPS};
pub use settings::Settings;
