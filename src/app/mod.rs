//! Application-Layer: Editor-Controller, Intents und Undo-Historie.

pub mod editor;
pub mod events;
pub mod history;

pub use editor::{PathEditor, Pick};
pub use events::EditorIntent;
pub use history::{EditHistory, Snapshot};
