//! Vehicle Path Editor Library.
//!
//! Geometrie-Kern fuer einen editierbaren Fahrzeugpfad aus geraden Strecken,
//! Kreisboegen und Drehungen auf der Stelle. Als Library exportiert fuer Tests,
//! Benchmarks und das `path-inspect`-Werkzeug.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{EditorIntent, PathEditor, Pick};
pub use core::{
    ArcGeometry, CommandKind, CommandOwner, CommandParams, CommandSlot, Drawable, EdgeId,
    EdgeShape, NodeId, NodeKind, Path, PathConfig, PathEdge, PathNode, PrecisionMode,
    TurnDirection,
};
pub use shared::PathOptions;
