//! Isometric tile-grid editor: projection, hit testing, grid editing and a
//! pannable, zoomable canvas viewport rendered with yew.

pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod render;
pub mod state;
pub mod util;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
