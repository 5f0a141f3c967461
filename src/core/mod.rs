//! Core-Domänentypen: Nodes, Edges, Path und Geometrie.

pub mod command;
pub mod edge;
pub mod geometry;
/// Datenmodell des Pfads
///
/// - Path: geordnete Kette, besitzt alle Nodes und Edges
/// - PathNode: Wegpunkt mit abgeleiteten Headings
/// - PathEdge: Gerade oder Kreisbogen zwischen zwei Nodes
pub mod node;
pub mod path;

pub use command::{CommandKind, CommandOwner, CommandParams, CommandSlot, PrecisionMode};
pub use edge::{ArcGeometry, EdgeId, EdgeShape, PathEdge};
pub use node::{NodeId, NodeKind, PathNode, TurnDirection};
pub use path::{Drawable, Path, PathConfig};
