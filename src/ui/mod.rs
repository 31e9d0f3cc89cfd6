//! UI module - egui-based allow-list editor and settings panel

pub mod editor;
pub mod list;
pub mod state;

pub use editor::{draw_settings_panel, editor_hotkey, SpectreEditor};
pub use list::SpectreList;
pub use state::{EditorAction, EditorState};
