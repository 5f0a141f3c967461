//! Editor-Controller: validiert Intents und fuehrt sie auf dem Pfad aus.

use super::events::EditorIntent;
use super::history::{EditHistory, Snapshot};
use crate::core::{CommandOwner, CommandParams, CommandSlot, EdgeId, NodeId, Path};
use crate::shared::PathOptions;
use glam::Vec2;
use std::sync::Arc;

/// Ergebnis eines Treffertests im Editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Node(NodeId),
    /// Kontrollpunkt einer Edge (Sehnenmitte bei Geraden)
    CurveControl(EdgeId),
    Edge(EdgeId),
}

/// Laufende Zieh-Geste zwischen `BeginDrag` und `EndDrag`.
#[derive(Debug, Clone, Copy, Default)]
struct DragGesture {
    /// Snapshot fuer diese Geste bereits abgelegt
    recorded: bool,
}

/// Haelt Pfad, Optionen und Undo-Historie und verarbeitet `EditorIntent`s.
#[derive(Debug)]
pub struct PathEditor {
    path: Arc<Path>,
    options: PathOptions,
    history: EditHistory,
    gesture: Option<DragGesture>,
}

impl PathEditor {
    /// Erstellt einen Editor mit einem Pfad, der nur aus dem Start-Node besteht.
    pub fn new(start: Vec2, options: PathOptions) -> Self {
        let path = Path::with_config(start, options.path_config());
        Self {
            path: Arc::new(path),
            history: EditHistory::new_with_capacity(options.history_depth),
            options,
            gesture: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// Uebernimmt neue Optionen. Die Undo-Historie bleibt erhalten.
    pub fn set_options(&mut self, options: PathOptions) {
        let config = options.path_config();
        if *self.path.config() != config {
            Arc::make_mut(&mut self.path).set_config(config);
        }
        self.options = options;
        log::info!("Editor-Optionen uebernommen");
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Ob gerade eine Zieh-Geste laeuft.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Treffertest: Nodes vor Kontrollpunkten vor Edges.
    pub fn pick(&self, position: Vec2) -> Option<Pick> {
        let radius = self.options.node_pick_radius;
        if let Some(node) = self.path.nearest_node(position, radius) {
            return Some(Pick::Node(node));
        }

        let control = self
            .path
            .edges()
            .map(|edge| (edge.id, edge.control_point().distance(position)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((edge, _)) = control {
            return Some(Pick::CurveControl(edge));
        }

        self.path
            .pick_edge(position, self.options.edge_pick_tolerance)
            .map(Pick::Edge)
    }

    /// Befehls-Panel mit den Positionen aus den Optionen.
    pub fn command_panel(&self) -> Vec<(CommandSlot, Vec2)> {
        self.path.command_panel_layout(
            self.options.command_panel_origin(),
            self.options.command_panel_spacing,
        )
    }

    /// Verarbeitet einen Intent.
    ///
    /// Unbekannte IDs und unzulaessige Operationen werden mit einer Warnung
    /// verworfen. Fehler liefern nur ungueltige Zahlenwerte (NaN/unendlich).
    pub fn handle_intent(&mut self, intent: EditorIntent) -> anyhow::Result<()> {
        log::debug!("Intent: {:?}", intent);

        match intent {
            EditorIntent::AddWaypoint {
                position,
                curved,
                snap,
            } => {
                ensure_finite(position)?;
                self.add_waypoint(position, curved, snap);
            }
            EditorIntent::InsertNode {
                edge,
                position,
                snap,
            } => {
                ensure_finite(position)?;
                self.insert_node(edge, position, snap);
            }
            EditorIntent::DeleteNode { node } => self.delete_node(node),
            EditorIntent::MoveNode {
                node,
                position,
                snap,
            } => {
                ensure_finite(position)?;
                self.move_node(node, position, snap);
            }
            EditorIntent::DragCurveControl { edge, pointer } => {
                ensure_finite(pointer)?;
                self.drag_curve_control(edge, pointer);
            }
            EditorIntent::SetCurveOffset { edge, offset } => {
                anyhow::ensure!(offset.is_finite(), "Curve-Offset {} ist ungueltig", offset);
                self.set_curve_offset(edge, offset);
            }
            EditorIntent::SetShoot { node, shoot } => self.set_shoot(node, shoot),
            EditorIntent::SetCommandSpeed { owner, speed } => {
                anyhow::ensure!(speed.is_finite(), "Geschwindigkeit {} ist ungueltig", speed);
                self.edit_command(owner, |params| params.set_speed(speed));
            }
            EditorIntent::SetCommandPrecision { owner, precision } => {
                self.edit_command(owner, |params| params.precision = precision);
            }
            EditorIntent::BeginDrag => self.begin_drag(),
            EditorIntent::EndDrag => self.end_drag(),
            EditorIntent::Undo => self.undo(),
            EditorIntent::Redo => self.redo(),
        }

        Ok(())
    }

    // ── Mutationen ──────────────────────────────────────────────────

    fn record_snapshot(&mut self) {
        self.history.record_snapshot(Snapshot::of(&self.path));
    }

    /// Legt `before` nach einer tatsaechlichen Aenderung ab; innerhalb einer
    /// Zieh-Geste nur beim ersten Mal.
    fn record_change(&mut self, before: Snapshot) {
        match self.gesture.as_mut() {
            Some(gesture) if gesture.recorded => {}
            Some(gesture) => {
                gesture.recorded = true;
                self.history.record_snapshot(before);
            }
            None => self.history.record_snapshot(before),
        }
    }

    fn begin_drag(&mut self) {
        if self.gesture.is_some() {
            log::debug!("BeginDrag: Geste laeuft bereits");
            return;
        }
        self.gesture = Some(DragGesture::default());
    }

    fn end_drag(&mut self) {
        match self.gesture.take() {
            Some(gesture) if gesture.recorded => log::info!("Zieh-Geste abgeschlossen"),
            Some(_) => log::debug!("Zieh-Geste ohne Aenderung"),
            None => log::debug!("EndDrag ohne laufende Geste"),
        }
    }

    fn path_mut(&mut self) -> &mut Path {
        Arc::make_mut(&mut self.path)
    }

    fn add_waypoint(&mut self, position: Vec2, curved: bool, snap: bool) {
        let position = if snap {
            self.path.snap_new_point(position, None)
        } else {
            position
        };

        self.record_snapshot();
        self.path_mut().add_waypoint(position, curved);
    }

    fn insert_node(&mut self, edge: EdgeId, position: Vec2, snap: bool) {
        if self.path.edge(edge).is_none() {
            log::warn!("Einfuegen verworfen: Edge {} existiert nicht", edge);
            return;
        }
        let position = if snap {
            self.path.snap_insert_point(edge, position)
        } else {
            position
        };

        self.record_snapshot();
        self.path_mut().insert_node(edge, position);
    }

    fn delete_node(&mut self, node: NodeId) {
        match self.path.node(node) {
            None => {
                log::warn!("Loeschen verworfen: Node {} existiert nicht", node);
                return;
            }
            Some(n) if n.is_start() => {
                log::warn!("Loeschen verworfen: Start-Node {} bleibt erhalten", node);
                return;
            }
            Some(_) => {}
        }

        self.record_snapshot();
        self.path_mut().delete_node(node);
    }

    fn move_node(&mut self, node: NodeId, position: Vec2, snap: bool) {
        if self.path.node(node).is_none() {
            log::warn!("Verschieben verworfen: Node {} existiert nicht", node);
            return;
        }
        let position = if snap {
            self.path.snap_new_point(position, Some(node))
        } else {
            position
        };
        if self.path.node(node).is_some_and(|n| n.position == position) {
            return;
        }

        let before = Snapshot::of(&self.path);
        self.path_mut().move_node(node, position);
        self.record_change(before);
    }

    fn drag_curve_control(&mut self, edge: EdgeId, pointer: Vec2) {
        if self.path.edge(edge).is_none() {
            log::warn!("Kurve verworfen: Edge {} existiert nicht", edge);
            return;
        }

        let before = Snapshot::of(&self.path);
        if !self.path_mut().drag_curve_control(edge, pointer) {
            log::debug!("Kurve fuer Edge {} ausserhalb des Halbkreises", edge);
            return;
        }
        if offset_changed(&before.path, &self.path, edge) {
            self.record_change(before);
        }
    }

    fn set_curve_offset(&mut self, edge: EdgeId, offset: f32) {
        if self.path.edge(edge).is_none() {
            log::warn!("Offset verworfen: Edge {} existiert nicht", edge);
            return;
        }

        let before = Snapshot::of(&self.path);
        if !self.path_mut().set_curve_offset(edge, offset) {
            log::warn!("Offset {:.3} fuer Edge {} ausserhalb des Halbkreises", offset, edge);
            return;
        }
        if offset_changed(&before.path, &self.path, edge) {
            self.record_change(before);
        }
    }

    fn set_shoot(&mut self, node: NodeId, shoot: bool) {
        match self.path.node(node) {
            None => {
                log::warn!("Shoot verworfen: Node {} existiert nicht", node);
                return;
            }
            Some(n) if n.is_shoot() == shoot => return,
            Some(_) => {}
        }

        self.record_snapshot();
        self.path_mut().set_shoot(node, shoot);
    }

    fn edit_command(&mut self, owner: CommandOwner, edit: impl FnOnce(&mut CommandParams)) {
        let exists = match owner {
            CommandOwner::Edge(id) => self.path.edge(id).is_some(),
            CommandOwner::Node(id) => self.path.node(id).is_some_and(|n| n.command().is_some()),
        };
        if !exists {
            log::warn!("Fahrbefehl verworfen: {:?} hat keinen Fahrbefehl", owner);
            return;
        }

        self.record_snapshot();
        if let Some(params) = self.path_mut().command_mut(owner) {
            edit(params);
        }
    }

    fn undo(&mut self) {
        // Undo beendet eine laufende Geste
        self.gesture = None;
        let current = Snapshot::of(&self.path);
        if let Some(prev) = self.history.pop_undo_with_current(current) {
            self.restore(prev);
            log::info!("Undo ausgefuehrt");
        } else {
            log::debug!("Undo: nichts zu tun");
        }
    }

    fn redo(&mut self) {
        self.gesture = None;
        let current = Snapshot::of(&self.path);
        if let Some(next) = self.history.pop_redo_with_current(current) {
            self.restore(next);
            log::info!("Redo ausgefuehrt");
        } else {
            log::debug!("Redo: nichts zu tun");
        }
    }

    /// Setzt einen Snapshot ein; Optionen aus der Zwischenzeit gelten weiter.
    fn restore(&mut self, snap: Snapshot) {
        self.path = snap.path;
        let config = self.options.path_config();
        if *self.path.config() != config {
            self.path_mut().set_config(config);
        }
    }
}

fn offset_changed(before: &Path, after: &Path, edge: EdgeId) -> bool {
    let offset = |path: &Path| path.edge(edge).map(|e| e.curve_offset());
    offset(before) != offset(after)
}

/// Lehnt NaN- und unendliche Positionen ab.
fn ensure_finite(position: Vec2) -> anyhow::Result<()> {
    anyhow::ensure!(
        position.is_finite(),
        "Position ({}, {}) ist ungueltig",
        position.x,
        position.y
    );
    Ok(())
}
