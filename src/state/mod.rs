pub mod camera;
pub mod editor;
pub mod selection;
pub mod touch;

pub use camera::{Camera, ViewportOptions};
pub use editor::{EditorAction, EditorState};
pub use selection::{MenuAnchor, SelectOutcome, Selection, SelectionController};
pub use touch::{PinchGesture, TouchState};
