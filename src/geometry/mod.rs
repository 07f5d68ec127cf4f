pub mod hitbox;
pub mod layout;
pub mod projection;

pub use hitbox::{Hitbox, build_hitbox};
pub use layout::WorldLayout;
pub use projection::{TileMetrics, grid_cell_at, project, screen_to_grid};
