//! Integrationstests fuer den Editor-Datenfluss:
//! - Waypoints anhaengen, einfuegen, loeschen (inkl. Einrasten)
//! - Kurven ziehen und Offsets setzen
//! - Fahrbefehle bearbeiten
//! - Undo/Redo

use approx::assert_relative_eq;
use glam::Vec2;
use vehicle_path_editor::{
    CommandKind, CommandOwner, EditorIntent, PathEditor, PathOptions, PrecisionMode,
    TurnDirection,
};

fn add(editor: &mut PathEditor, x: f32, y: f32) {
    editor
        .handle_intent(EditorIntent::AddWaypoint {
            position: Vec2::new(x, y),
            curved: false,
            snap: false,
        })
        .expect("AddWaypoint darf nicht fehlschlagen");
}

/// Editor mit Pfad (0,0) → (10,0) → (10,10).
fn l_shaped_editor() -> PathEditor {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    add(&mut editor, 10.0, 10.0);
    editor
}

// ─── Waypoints ───────────────────────────────────────────────────────────────

#[test]
fn test_collinear_waypoints_ohne_drehbefehle() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 5.0, 0.0);
    add(&mut editor, 10.0, 0.0);

    let path = editor.path();
    assert_eq!(path.node_count(), 3);
    assert!(path.nodes().all(|n| !n.has_turn()));
    let panel = editor.command_panel();
    assert_eq!(panel.len(), 2);
    assert!(panel
        .iter()
        .all(|(slot, _)| slot.kind == CommandKind::Straight));
}

#[test]
fn test_add_waypoint_mit_snap_rastet_auf_tangente_ein() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);

    editor
        .handle_intent(EditorIntent::AddWaypoint {
            position: Vec2::new(20.0, 0.3),
            curved: false,
            snap: true,
        })
        .expect("AddWaypoint darf nicht fehlschlagen");

    let last = editor.path().last_node();
    assert_eq!(last.position.y, 0.0);
    assert!(!editor.path().node_at(1).has_turn());
}

#[test]
fn test_snap_toleranz_kommt_aus_den_optionen() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    let candidate = Vec2::new(10.0, 0.0) + Vec2::from_angle(0.1) * 10.0;

    let unsnapped = editor.path().snap_new_point(candidate, None);
    assert_eq!(unsnapped, candidate);

    editor.set_options(PathOptions {
        snap_tolerance: 0.2,
        ..PathOptions::default()
    });
    let snapped = editor.path().snap_new_point(candidate, None);
    assert_eq!(snapped.y, 0.0);
}

#[test]
fn test_curved_waypoint_setzt_tangential_an() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    editor
        .handle_intent(EditorIntent::AddWaypoint {
            position: Vec2::new(20.0, 5.0),
            curved: true,
            snap: false,
        })
        .expect("AddWaypoint darf nicht fehlschlagen");

    let path = editor.path();
    assert!(!path.edge_at(1).is_straight());
    assert!(!path.node_at(1).has_turn());
}

// ─── Einfuegen / Loeschen ────────────────────────────────────────────────────

#[test]
fn test_insert_node_mit_snap_auf_gerade() {
    let mut editor = l_shaped_editor();
    add(&mut editor, 10.0, 20.0);
    let edge = editor.path().edge_at(1).id;

    editor
        .handle_intent(EditorIntent::InsertNode {
            edge,
            position: Vec2::new(10.2, 5.0),
            snap: true,
        })
        .expect("InsertNode darf nicht fehlschlagen");

    let path = editor.path();
    assert_eq!(path.node_count(), 5);
    let inserted = path.node_at(2);
    assert_relative_eq!(inserted.position.x, 10.0, epsilon = 1e-4);
    assert_relative_eq!(inserted.position.y, 5.0, epsilon = 1e-4);
    assert!(!inserted.has_turn());
}

#[test]
fn test_delete_start_node_wird_verworfen() {
    let mut editor = l_shaped_editor();
    let start = editor.path().start_node().id;

    editor
        .handle_intent(EditorIntent::DeleteNode { node: start })
        .expect("DeleteNode darf nicht fehlschlagen");

    assert_eq!(editor.path().node_count(), 3);
    assert_eq!(editor.path().start_node().id, start);
}

#[test]
fn test_delete_unbekannter_node_wird_verworfen() {
    let mut editor = l_shaped_editor();
    let edge = editor.path().edge_at(0).id;
    let unknown = vehicle_path_editor::NodeId(4711);

    editor
        .handle_intent(EditorIntent::DeleteNode { node: unknown })
        .expect("DeleteNode darf nicht fehlschlagen");
    editor
        .handle_intent(EditorIntent::MoveNode {
            node: unknown,
            position: Vec2::ONE,
            snap: false,
        })
        .expect("MoveNode darf nicht fehlschlagen");
    editor
        .handle_intent(EditorIntent::SetCurveOffset {
            edge: vehicle_path_editor::EdgeId(4711),
            offset: 1.0,
        })
        .expect("SetCurveOffset darf nicht fehlschlagen");

    assert_eq!(editor.path().node_count(), 3);
    assert!(editor.path().edge(edge).is_some_and(|e| e.is_straight()));
}

#[test]
fn test_delete_interior_node_behaelt_fahrbefehl() {
    let mut editor = l_shaped_editor();
    let first_edge = editor.path().edge_at(0).id;
    editor
        .handle_intent(EditorIntent::SetCommandSpeed {
            owner: CommandOwner::Edge(first_edge),
            speed: 0.3,
        })
        .expect("SetCommandSpeed darf nicht fehlschlagen");

    let middle = editor.path().node_at(1).id;
    editor
        .handle_intent(EditorIntent::DeleteNode { node: middle })
        .expect("DeleteNode darf nicht fehlschlagen");

    let path = editor.path();
    assert_eq!(path.edge_count(), 1);
    let merged = path.edge_at(0);
    assert_eq!(merged.id, first_edge);
    assert_relative_eq!(merged.command().speed(), 0.3, epsilon = 1e-6);
}

// ─── Kurven ──────────────────────────────────────────────────────────────────

#[test]
fn test_drag_curve_control_erzeugt_bogen() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    let edge = editor.path().edge_at(0).id;

    editor
        .handle_intent(EditorIntent::DragCurveControl {
            edge,
            pointer: Vec2::new(5.0, 3.0),
        })
        .expect("DragCurveControl darf nicht fehlschlagen");

    let path = editor.path();
    let arc = path.edge_at(0).arc().copied().expect("Bogen erwartet");
    assert_eq!(arc.turn, TurnDirection::Clockwise);
    assert_relative_eq!(arc.center.y, -8.0 / 3.0, epsilon = 1e-3);

    let panel = editor.command_panel();
    assert_eq!(
        panel[0].0.kind,
        CommandKind::Curve {
            turn: TurnDirection::Clockwise
        }
    );
}

#[test]
fn test_ungueltiger_offset_laesst_pfad_unveraendert() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    let edge = editor.path().edge_at(0).id;

    editor
        .handle_intent(EditorIntent::SetCurveOffset { edge, offset: 9.0 })
        .expect("SetCurveOffset darf nicht fehlschlagen");
    assert!(editor.path().edge_at(0).is_straight());

    let result = editor.handle_intent(EditorIntent::SetCurveOffset {
        edge,
        offset: f32::INFINITY,
    });
    assert!(result.is_err());
}

// ─── Fahrbefehle ─────────────────────────────────────────────────────────────

#[test]
fn test_command_panel_nutzt_optionen() {
    let options = PathOptions {
        command_panel_origin: [100.0, 10.0],
        command_panel_spacing: 50.0,
        ..PathOptions::default()
    };
    let mut editor = PathEditor::new(Vec2::ZERO, options);
    add(&mut editor, 10.0, 0.0);
    add(&mut editor, 10.0, 10.0);

    let panel = editor.command_panel();
    assert_eq!(panel.len(), 3);
    assert_eq!(panel[0].1, Vec2::new(100.0, 10.0));
    assert_eq!(panel[1].1, Vec2::new(100.0, 60.0));
    assert_eq!(
        panel[1].0.kind,
        CommandKind::Turn {
            turn: TurnDirection::CounterClockwise
        }
    );
}

#[test]
fn test_neue_fahrbefehle_nutzen_default_parameter() {
    let options = PathOptions {
        default_speed: 0.5,
        default_precision: PrecisionMode::Fast,
        ..PathOptions::default()
    };
    let mut editor = PathEditor::new(Vec2::ZERO, options);
    add(&mut editor, 10.0, 0.0);

    let params = editor.path().edge_at(0).command();
    assert_relative_eq!(params.speed(), 0.5, epsilon = 1e-6);
    assert_eq!(params.precision, PrecisionMode::Fast);
}

#[test]
fn test_turn_command_bearbeiten_und_verwerfen() {
    let mut editor = l_shaped_editor();
    let middle = editor.path().node_at(1).id;
    let owner = CommandOwner::Node(middle);

    editor
        .handle_intent(EditorIntent::SetCommandPrecision {
            owner,
            precision: PrecisionMode::Precise.toggled(),
        })
        .expect("SetCommandPrecision darf nicht fehlschlagen");
    let params = editor.path().node_at(1).command().copied();
    assert_eq!(params.map(|p| p.precision), Some(PrecisionMode::Fast));

    // Drehung verschwindet → Fahrbefehl auch
    let last = editor.path().last_node().id;
    editor
        .handle_intent(EditorIntent::MoveNode {
            node: last,
            position: Vec2::new(20.0, 0.0),
            snap: false,
        })
        .expect("MoveNode darf nicht fehlschlagen");
    assert!(editor.path().node_at(1).command().is_none());

    // Intent auf den verschwundenen Befehl wird verworfen
    editor
        .handle_intent(EditorIntent::SetCommandSpeed { owner, speed: 0.2 })
        .expect("SetCommandSpeed darf nicht fehlschlagen");
    assert!(editor.path().node_at(1).command().is_none());
}

#[test]
fn test_shoot_marker_und_befehl() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 5.0, 0.0);
    add(&mut editor, 10.0, 0.0);
    let middle = editor.path().node_at(1).id;

    editor
        .handle_intent(EditorIntent::SetShoot {
            node: middle,
            shoot: true,
        })
        .expect("SetShoot darf nicht fehlschlagen");

    let node = editor.path().node_at(1);
    assert!(node.is_shoot());
    assert!(node.command().is_some());
    let markers = editor
        .path()
        .drawables()
        .filter(|d| matches!(d, vehicle_path_editor::Drawable::ShootMarker { .. }))
        .count();
    assert_eq!(markers, 1);
}

// ─── Undo / Redo ─────────────────────────────────────────────────────────────

#[test]
fn test_undo_redo_waypoints() {
    let mut editor = l_shaped_editor();
    add(&mut editor, 20.0, 10.0);
    assert_eq!(editor.path().node_count(), 4);

    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert_eq!(editor.path().node_count(), 2);
    assert!(editor.can_redo());

    editor.handle_intent(EditorIntent::Redo).expect("Redo");
    assert_eq!(editor.path().node_count(), 3);
    assert_eq!(editor.path().last_node().position, Vec2::new(10.0, 10.0));
}

#[test]
fn test_undo_stellt_fahrbefehl_wieder_her() {
    let mut editor = l_shaped_editor();
    let edge = editor.path().edge_at(1).id;
    editor
        .handle_intent(EditorIntent::SetCommandSpeed {
            owner: CommandOwner::Edge(edge),
            speed: 0.42,
        })
        .expect("SetCommandSpeed darf nicht fehlschlagen");
    assert_relative_eq!(editor.path().edge_at(1).command().speed(), 0.42, epsilon = 1e-6);

    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert_relative_eq!(editor.path().edge_at(1).command().speed(), 1.0);
}

#[test]
fn test_neue_aenderung_verwirft_redo() {
    let mut editor = l_shaped_editor();
    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert!(editor.can_redo());

    add(&mut editor, 0.0, 10.0);
    assert!(!editor.can_redo());
}

#[test]
fn test_undo_ohne_historie_ist_noop() {
    let mut editor = PathEditor::new(Vec2::new(3.0, 4.0), PathOptions::default());
    assert!(!editor.can_undo());
    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    editor.handle_intent(EditorIntent::Redo).expect("Redo");
    assert_eq!(editor.path().node_count(), 1);
    assert_eq!(editor.path().start_node().position, Vec2::new(3.0, 4.0));
}

// ─── Zieh-Gesten ─────────────────────────────────────────────────────────────

#[test]
fn test_kurven_geste_wird_mit_einem_undo_zurueckgenommen() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    let edge = editor.path().edge_at(0).id;

    editor.handle_intent(EditorIntent::BeginDrag).expect("BeginDrag");
    for y in [2.5, 3.0, 3.5, 4.0] {
        editor
            .handle_intent(EditorIntent::DragCurveControl {
                edge,
                pointer: Vec2::new(5.0, y),
            })
            .expect("DragCurveControl darf nicht fehlschlagen");
    }
    editor.handle_intent(EditorIntent::EndDrag).expect("EndDrag");
    assert_relative_eq!(editor.path().edge_at(0).curve_offset(), 4.0, epsilon = 1e-5);

    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert!(editor.path().edge_at(0).is_straight());
    assert_eq!(editor.path().edge_at(0).curve_offset(), 0.0);
    assert_eq!(editor.path().node_count(), 2);

    editor.handle_intent(EditorIntent::Redo).expect("Redo");
    assert_relative_eq!(editor.path().edge_at(0).curve_offset(), 4.0, epsilon = 1e-5);
}

#[test]
fn test_verschiebe_geste_ist_ein_undo_schritt() {
    let mut editor = l_shaped_editor();
    let last = editor.path().last_node().id;

    editor.handle_intent(EditorIntent::BeginDrag).expect("BeginDrag");
    for step in 1..=50 {
        editor
            .handle_intent(EditorIntent::MoveNode {
                node: last,
                position: Vec2::new(10.0 + step as f32 * 0.2, 10.0),
                snap: false,
            })
            .expect("MoveNode darf nicht fehlschlagen");
    }
    editor.handle_intent(EditorIntent::EndDrag).expect("EndDrag");
    assert!(!editor.is_dragging());

    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert_eq!(editor.path().last_node().position, Vec2::new(10.0, 10.0));
    assert_eq!(editor.path().node_count(), 3);

    // Davor liegen nur noch die beiden AddWaypoint-Schritte
    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert_eq!(editor.path().node_count(), 1);
    assert!(!editor.can_undo());
}

#[test]
fn test_geste_ohne_aenderung_legt_keinen_undo_schritt_an() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    let edge = editor.path().edge_at(0).id;
    let end = editor.path().last_node().id;

    // Gerade Edge rastet wieder auf gerade ein, Node bleibt stehen
    editor.handle_intent(EditorIntent::BeginDrag).expect("BeginDrag");
    editor
        .handle_intent(EditorIntent::DragCurveControl {
            edge,
            pointer: Vec2::new(5.0, 1.0),
        })
        .expect("DragCurveControl darf nicht fehlschlagen");
    editor
        .handle_intent(EditorIntent::MoveNode {
            node: end,
            position: Vec2::new(10.0, 0.0),
            snap: false,
        })
        .expect("MoveNode darf nicht fehlschlagen");
    editor.handle_intent(EditorIntent::EndDrag).expect("EndDrag");

    // Einziger Undo-Schritt ist das Anhaengen des Waypoints
    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert_eq!(editor.path().node_count(), 1);
    assert!(!editor.can_undo());
}

#[test]
fn test_einzelne_drag_events_ohne_geste_bleiben_einzelne_schritte() {
    let mut editor = PathEditor::new(Vec2::ZERO, PathOptions::default());
    add(&mut editor, 10.0, 0.0);
    let edge = editor.path().edge_at(0).id;

    for y in [3.0, 4.0] {
        editor
            .handle_intent(EditorIntent::DragCurveControl {
                edge,
                pointer: Vec2::new(5.0, y),
            })
            .expect("DragCurveControl darf nicht fehlschlagen");
    }

    editor.handle_intent(EditorIntent::Undo).expect("Undo");
    assert_relative_eq!(editor.path().edge_at(0).curve_offset(), 3.0, epsilon = 1e-5);
}
