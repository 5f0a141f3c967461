//! EditorIntent-Enum fuer den Eingabe-Datenfluss.

use crate::core::{CommandOwner, EdgeId, NodeId, PrecisionMode};
use glam::Vec2;

/// Eingaben aus UI/System ohne eigene Mutationslogik.
/// Werden von `PathEditor::handle_intent` validiert und ausgefuehrt.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorIntent {
    /// Waypoint ans Pfadende anhaengen
    AddWaypoint {
        position: Vec2,
        /// Tangential weiterfahren statt gerade
        curved: bool,
        /// Position vorher einrasten
        snap: bool,
    },
    /// Node in eine bestehende Edge einfuegen
    InsertNode {
        edge: EdgeId,
        position: Vec2,
        snap: bool,
    },
    /// Node loeschen (nicht den Start-Node)
    DeleteNode { node: NodeId },
    /// Node verschieben
    MoveNode {
        node: NodeId,
        position: Vec2,
        snap: bool,
    },
    /// Kontrollpunkt einer Edge ziehen
    DragCurveControl { edge: EdgeId, pointer: Vec2 },
    /// Curve-Offset einer Edge direkt setzen (ohne Einrasten)
    SetCurveOffset { edge: EdgeId, offset: f32 },
    /// Shoot-Aktion an einem Node umschalten
    SetShoot { node: NodeId, shoot: bool },
    /// Geschwindigkeit eines Fahrbefehls setzen
    SetCommandSpeed { owner: CommandOwner, speed: f32 },
    /// Praezisionsmodus eines Fahrbefehls setzen
    SetCommandPrecision {
        owner: CommandOwner,
        precision: PrecisionMode,
    },
    /// Beginn einer Zieh-Geste: alle folgenden `MoveNode`/`DragCurveControl`
    /// bis `EndDrag` bilden einen einzigen Undo-Schritt
    BeginDrag,
    /// Ende einer Zieh-Geste
    EndDrag,
    /// Letzte Aenderung rueckgaengig machen
    Undo,
    /// Rueckgaengig gemachte Aenderung wiederholen
    Redo,
}
