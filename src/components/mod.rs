pub mod app;
pub mod bindings;
pub mod block_menu;
pub mod camera_controls;
pub mod grid_view;

pub use app::{App, AppProps};
pub use block_menu::BlockMenu;
pub use camera_controls::CameraControls;
pub use grid_view::GridView;
