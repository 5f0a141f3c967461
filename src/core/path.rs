//! Der editierbare Pfad: geordnete Kette aus Nodes und Edges.
//!
//! Nodes und Edges liegen in zwei `IndexMap`-Arenen. Die Einfuegereihenfolge der
//! Maps *ist* die Pfadreihenfolge: `edges[i]` verbindet `nodes[i]` und `nodes[i + 1]`.
//! Nach jeder Mutation laeuft `recompute()` einmal von links nach rechts ueber
//! die Kette und reicht das laufende Heading von Element zu Element weiter.

use super::command::{CommandKind, CommandOwner, CommandParams, CommandSlot};
use super::edge::{EdgeId, EdgeShape, PathEdge};
use super::geometry::{
    angular_delta, heading_between, offset_for_entry_heading, polar,
    project_point_onto_heading, project_point_onto_line, project_point_onto_segment,
    point_touching_segment, signed_distance_point_to_line, OFFSET_EPSILON,
};
use super::node::{NodeId, PathNode};
use glam::Vec2;
use indexmap::IndexMap;
use std::f32::consts::TAU;

/// Standard-Winkeltoleranz fuer das Einrasten (Radiant).
pub const SNAP_TOLERANCE: f32 = 0.06;
/// Kontrollpunkt-Abstaende unterhalb dieses Werts rasten auf "gerade" ein.
pub const CURVE_SNAP_DISTANCE: f32 = 2.0;
/// Ausrichtung des Fahrzeugs am Start-Node, solange noch keine Edge existiert.
pub const START_HEADING: f32 = 0.0;

/// Geometrie-Einstellungen eines Pfads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConfig {
    /// Winkeltoleranz fuer `snap_new_point` (Radiant)
    pub snap_tolerance: f32,
    /// Mindestabstand des Kontrollpunkts von der Sehne, bevor ein Bogen entsteht
    pub curve_snap_distance: f32,
    /// Ausrichtung am Start-Node fuer den ersten gekruemmten Waypoint
    pub start_heading: f32,
    /// Parameter fuer neu entstehende Fahrbefehle
    pub default_command: CommandParams,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
            curve_snap_distance: CURVE_SNAP_DISTANCE,
            start_heading: START_HEADING,
            default_command: CommandParams::default(),
        }
    }
}

/// Zeichenbares Element, in stabiler Pfadreihenfolge geliefert.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Node(&'a PathNode),
    Edge(&'a PathEdge),
    /// Ziehbarer Kontrollpunkt einer Edge
    CurveControl { edge: EdgeId, position: Vec2 },
    /// Marker einer aktiven Shoot-Aktion
    ShootMarker { node: NodeId, position: Vec2 },
}

/// Editierbarer Fahrzeugpfad
#[derive(Debug, Clone)]
pub struct Path {
    nodes: IndexMap<NodeId, PathNode>,
    edges: IndexMap<EdgeId, PathEdge>,
    next_node_id: u64,
    next_edge_id: u64,
    config: PathConfig,
}

impl Path {
    /// Erstellt einen Pfad, der nur aus dem Start-Node besteht.
    pub fn new(start: Vec2) -> Self {
        Self::with_config(start, PathConfig::default())
    }

    /// Erstellt einen Pfad mit eigenen Geometrie-Einstellungen.
    pub fn with_config(start: Vec2, config: PathConfig) -> Self {
        let mut path = Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            next_node_id: 0,
            next_edge_id: 0,
            config,
        };
        let id = path.allocate_node_id();
        path.nodes.insert(id, PathNode::start(id, start));
        path.recompute();
        path
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Uebernimmt neue Einstellungen. Bestehende Fahrbefehle bleiben unveraendert.
    pub fn set_config(&mut self, config: PathConfig) {
        self.config = config;
        self.recompute();
    }

    fn allocate_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn allocate_edge_id(&mut self) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }

    // ── Lesezugriff ─────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Alle Nodes in Pfadreihenfolge
    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.values()
    }

    /// Alle Edges in Pfadreihenfolge
    pub fn edges(&self) -> impl Iterator<Item = &PathEdge> {
        self.edges.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&PathNode> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&PathEdge> {
        self.edges.get(&id)
    }

    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    pub fn edge_index(&self, id: EdgeId) -> Option<usize> {
        self.edges.get_index_of(&id)
    }

    /// Node an Position `index` der Kette.
    ///
    /// # Panics
    /// Wenn `index` hinter dem Pfadende liegt.
    pub fn node_at(&self, index: usize) -> &PathNode {
        &self.nodes[index]
    }

    /// Edge an Position `index` der Kette.
    ///
    /// # Panics
    /// Wenn `index` hinter dem Pfadende liegt.
    pub fn edge_at(&self, index: usize) -> &PathEdge {
        &self.edges[index]
    }

    pub fn start_node(&self) -> &PathNode {
        &self.nodes[0]
    }

    pub fn last_node(&self) -> &PathNode {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Gefahrene Gesamtlaenge aller Edges
    pub fn total_length(&self) -> f32 {
        self.edges.values().map(PathEdge::length).sum()
    }

    fn expect_node_index(&self, id: NodeId) -> usize {
        self.node_index(id)
            .unwrap_or_else(|| panic!("Node {} existiert nicht im Pfad", id))
    }

    fn expect_edge_index(&self, id: EdgeId) -> usize {
        self.edge_index(id)
            .unwrap_or_else(|| panic!("Edge {} existiert nicht im Pfad", id))
    }

    fn edge_endpoints(&self, edge_index: usize) -> (Vec2, Vec2) {
        (
            self.nodes[edge_index].position,
            self.nodes[edge_index + 1].position,
        )
    }

    // ── Neuberechnung ───────────────────────────────────────────────

    /// Berechnet alle Headings, Boegen und Drehungen neu.
    ///
    /// Faltet einmal ueber die Edges und reicht das `after_heading` jeder Edge
    /// als ankommendes Heading an den folgenden Node weiter. Node `i` wird
    /// aufgeloest, sobald seine abgehende Edge `i` berechnet ist.
    pub fn recompute(&mut self) {
        let default_command = self.config.default_command;

        if self.edges.is_empty() {
            self.nodes[0].resolve(None, None, default_command);
            return;
        }

        let edge_count = self.edges.len();
        let incoming = (0..edge_count).fold(None, |incoming, i| self.compute_step(i, incoming));
        self.nodes[edge_count].resolve(incoming, None, default_command);

        debug_assert!(self.links_consistent(), "Pfad-Verkettung inkonsistent");
    }

    /// Berechnet Edge `i` und loest anschliessend ihren vorderen Node auf.
    fn compute_step(&mut self, i: usize, incoming: Option<f32>) -> Option<f32> {
        let (prev, next) = self.edge_endpoints(i);
        let edge = &mut self.edges[i];
        let after = edge.compute(prev, next);
        let outgoing = edge.before_heading();
        self.nodes[i].resolve(incoming, Some(outgoing), self.config.default_command);
        Some(after)
    }

    fn links_consistent(&self) -> bool {
        self.nodes.len() == self.edges.len() + 1
            && self.edges.values().enumerate().all(|(i, edge)| {
                edge.previous == self.nodes[i].id && edge.next == self.nodes[i + 1].id
            })
    }

    // ── Strukturelle Operationen ────────────────────────────────────

    /// Haengt einen Waypoint ans Pfadende an und gibt seine ID zurueck.
    ///
    /// `curved = false` erzeugt immer eine Gerade. Bei `curved = true` setzt die
    /// neue Edge tangential an das ankommende Heading des bisherigen Endes an
    /// (bzw. an `start_heading`, solange nur der Start-Node existiert). Laesst
    /// sich kein Bogen bis maximal Halbkreis bilden, bleibt die Edge gerade.
    pub fn add_waypoint(&mut self, position: Vec2, curved: bool) -> NodeId {
        let last = self.last_node();
        let from_id = last.id;
        let from = last.position;
        let entry_heading = last.before_heading().unwrap_or(self.config.start_heading);

        let node_id = self.allocate_node_id();
        let edge_id = self.allocate_edge_id();
        self.nodes.insert(node_id, PathNode::turn(node_id, position));
        self.edges.insert(
            edge_id,
            PathEdge::new(edge_id, from_id, node_id, self.config.default_command),
        );

        if curved {
            let offset = offset_for_entry_heading(from, position, entry_heading)
                .filter(|offset| offset.abs() >= OFFSET_EPSILON);
            if let Some(offset) = offset {
                let index = self.edges.len() - 1;
                if !self.edges[index].set_curve_offset(offset, from, position) {
                    log::debug!("Waypoint {}: tangentialer Bogen nicht moeglich, Gerade", node_id);
                }
            }
        }

        self.recompute();
        log::info!(
            "Waypoint {} an Position ({:.1}, {:.1}) angehaengt",
            node_id,
            position.x,
            position.y
        );
        node_id
    }

    /// Teilt eine Edge durch einen neuen Node an `position`.
    ///
    /// Die bisherige Edge bleibt als vordere Haelfte erhalten (inkl. Fahrbefehl),
    /// die hintere Haelfte ist neu. Bei einem Bogen werden beide Offsets aus dem
    /// Einfahrts-Heading des urspruenglichen Bogens abgeleitet, sodass ein Punkt
    /// auf dem Bogen denselben Kreis reproduziert.
    ///
    /// # Panics
    /// Wenn `edge` nicht zum Pfad gehoert.
    pub fn insert_node(&mut self, edge: EdgeId, position: Vec2) -> NodeId {
        let index = self.expect_edge_index(edge);
        let (prev, next) = self.edge_endpoints(index);
        let original = &self.edges[index];
        let was_straight = original.is_straight();
        let entry_heading = original.before_heading();
        let next_id = original.next;

        let node_id = self.allocate_node_id();
        let trailing_id = self.allocate_edge_id();
        self.nodes
            .shift_insert(index + 1, node_id, PathNode::turn(node_id, position));
        self.edges[index].next = node_id;
        self.edges.shift_insert(
            index + 1,
            trailing_id,
            PathEdge::new(trailing_id, node_id, next_id, self.config.default_command),
        );

        if !was_straight {
            let leading = &mut self.edges[index];
            let leading_offset =
                offset_for_entry_heading(prev, position, entry_heading).unwrap_or(0.0);
            if !leading.set_curve_offset(leading_offset, prev, position) {
                leading.set_curve_offset(0.0, prev, position);
            }
            let exit_heading = leading.after_heading();

            let trailing = &mut self.edges[index + 1];
            let trailing_offset =
                offset_for_entry_heading(position, next, exit_heading).unwrap_or(0.0);
            if !trailing.set_curve_offset(trailing_offset, position, next) {
                trailing.set_curve_offset(0.0, position, next);
            }
        }

        self.recompute();
        log::info!("Node {} in Edge {} eingefuegt", node_id, edge);
        node_id
    }

    /// Entfernt einen Node und fuehrt die angrenzenden Edges zusammen.
    ///
    /// Die ankommende Edge bleibt (inkl. Fahrbefehl) und wird gerade mit dem
    /// folgenden Node verbunden; die abgehende Edge entfaellt. Am Pfadende wird
    /// nur gekuerzt. Gibt den entfernten Node zurueck.
    ///
    /// # Panics
    /// Beim Start-Node oder wenn `node` nicht zum Pfad gehoert.
    pub fn delete_node(&mut self, node: NodeId) -> PathNode {
        let index = self.expect_node_index(node);
        assert!(index != 0, "Start-Node {} kann nicht geloescht werden", node);

        let is_last = index == self.nodes.len() - 1;
        let removed = self
            .nodes
            .shift_remove_index(index)
            .map(|(_, removed)| removed)
            .unwrap_or_else(|| panic!("Node {} existiert nicht im Pfad", node));

        if is_last {
            self.edges.shift_remove_index(index - 1);
        } else if let Some((_, outgoing)) = self.edges.shift_remove_index(index) {
            // Nach dem Entfernen zeigt `index` auf den bisher uebernaechsten Node
            let (prev, next) = self.edge_endpoints(index - 1);
            let merged = &mut self.edges[index - 1];
            merged.next = outgoing.next;
            merged.set_curve_offset(0.0, prev, next);
        }

        self.recompute();
        log::info!("Node {} geloescht", node);
        removed
    }

    /// Verschiebt einen Node (auch den Start-Node).
    ///
    /// # Panics
    /// Wenn `node` nicht zum Pfad gehoert.
    pub fn move_node(&mut self, node: NodeId, position: Vec2) {
        let index = self.expect_node_index(node);
        self.nodes[index].position = position;
        self.recompute();
    }

    /// Setzt den Curve-Offset einer Edge. Gibt `false` zurueck, wenn der Bogen
    /// ungueltig waere; die Edge bleibt dann unveraendert.
    ///
    /// # Panics
    /// Wenn `edge` nicht zum Pfad gehoert.
    pub fn set_curve_offset(&mut self, edge: EdgeId, offset: f32) -> bool {
        let index = self.expect_edge_index(edge);
        let (prev, next) = self.edge_endpoints(index);
        let accepted = self.edges[index].set_curve_offset(offset, prev, next);
        self.recompute();
        accepted
    }

    /// Zieht den Kontrollpunkt einer Edge zur Zeigerposition.
    ///
    /// Der Offset ist der vorzeichenbehaftete Abstand des Zeigers zur Sehne;
    /// unterhalb von `curve_snap_distance` rastet die Edge auf gerade ein.
    pub fn drag_curve_control(&mut self, edge: EdgeId, pointer: Vec2) -> bool {
        let index = self.expect_edge_index(edge);
        let (prev, next) = self.edge_endpoints(index);
        let mut offset = signed_distance_point_to_line(pointer, prev, next);
        if offset.abs() < self.config.curve_snap_distance {
            offset = 0.0;
        }
        self.set_curve_offset(edge, offset)
    }

    /// Aktiviert oder deaktiviert die Shoot-Aktion eines Nodes.
    pub fn set_shoot(&mut self, node: NodeId, shoot: bool) {
        let index = self.expect_node_index(node);
        self.nodes[index].set_shoot(shoot);
        self.recompute();
    }

    // ── Einrasten ───────────────────────────────────────────────────

    /// Rastet einen Kandidatenpunkt auf "saubere" Geometrie ein.
    ///
    /// - `near = None`: Punkt wird ans Pfadende angehaengt
    /// - `near = Some(id)`: Punkt ist die neue Position von Node `id`
    ///
    /// Reihenfolge: (a) Tangente des vorherigen Nodes, (b) gerade zwischen
    /// beiden Nachbarn, (c) Tangente des naechsten Nodes. Die erste passende
    /// Regel gewinnt; sonst wird `position` unveraendert zurueckgegeben.
    pub fn snap_new_point(&self, position: Vec2, near: Option<NodeId>) -> Vec2 {
        match near {
            None => self.snap_between(position, Some(self.last_node()), None),
            Some(id) => {
                let index = self.expect_node_index(id);
                let previous = index.checked_sub(1).map(|i| &self.nodes[i]);
                let next = self.nodes.get_index(index + 1).map(|(_, node)| node);
                self.snap_between(position, previous, next)
            }
        }
    }

    /// Wie `snap_new_point`, fuer einen Punkt, der in `edge` eingefuegt werden soll.
    pub fn snap_insert_point(&self, edge: EdgeId, position: Vec2) -> Vec2 {
        let index = self.expect_edge_index(edge);
        self.snap_between(
            position,
            Some(&self.nodes[index]),
            Some(&self.nodes[index + 1]),
        )
    }

    fn snap_between(
        &self,
        position: Vec2,
        previous: Option<&PathNode>,
        next: Option<&PathNode>,
    ) -> Vec2 {
        let tolerance = self.config.snap_tolerance;

        if let Some(prev) = previous {
            if prev.position.distance(position) > f32::EPSILON {
                let reference = prev.before_heading().unwrap_or(self.config.start_heading);
                let heading = heading_between(prev.position, position);
                if angular_delta(reference, heading).abs() < tolerance {
                    log::debug!("Snap: Tangente von Node {}", prev.id);
                    return project_point_onto_heading(prev.position, reference, position);
                }
            }
        }

        if let (Some(prev), Some(next)) = (previous, next) {
            let incoming = heading_between(prev.position, position);
            let outgoing = heading_between(position, next.position);
            if angular_delta(incoming, outgoing).abs() < tolerance {
                log::debug!("Snap: gerade zwischen {} und {}", prev.id, next.id);
                return project_point_onto_line(position, prev.position, next.position);
            }
        }

        if let Some(next) = next {
            if let Some(reference) = next.after_heading() {
                if next.position.distance(position) > f32::EPSILON {
                    let heading = heading_between(position, next.position);
                    if angular_delta(reference, heading).abs() < tolerance {
                        log::debug!("Snap: Tangente von Node {}", next.id);
                        return project_point_onto_heading(next.position, reference, position);
                    }
                }
            }
        }

        position
    }

    // ── Treffertests ────────────────────────────────────────────────

    /// Naechster Node innerhalb von `radius`.
    pub fn nearest_node(&self, position: Vec2, radius: f32) -> Option<NodeId> {
        self.nodes
            .values()
            .map(|node| (node.id, node.position.distance(position)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Erste Edge, deren Gerade bzw. Bogen naeher als `tolerance` an `position` liegt.
    pub fn pick_edge(&self, position: Vec2, tolerance: f32) -> Option<EdgeId> {
        self.edges.values().enumerate().find_map(|(i, edge)| {
            let (prev, next) = self.edge_endpoints(i);
            let hit = match edge.shape() {
                EdgeShape::Straight => point_touching_segment(position, prev, next, tolerance),
                EdgeShape::Arc(_) => {
                    closest_point_on_shape(edge, prev, next, position).distance(position)
                        < tolerance
                }
            };
            hit.then_some(edge.id)
        })
    }

    /// Naechster Punkt auf einer Edge (fuer Einfuege-Vorschau).
    ///
    /// # Panics
    /// Wenn `edge` nicht zum Pfad gehoert.
    pub fn closest_point_on_edge(&self, edge: EdgeId, position: Vec2) -> Vec2 {
        let index = self.expect_edge_index(edge);
        let (prev, next) = self.edge_endpoints(index);
        closest_point_on_shape(&self.edges[index], prev, next, position)
    }

    // ── Fahrbefehle ─────────────────────────────────────────────────

    /// Alle Fahrbefehle in Pfadreihenfolge: eine Zeile je Edge plus eine je
    /// innerem Node mit Drehung.
    pub fn command_slots(&self) -> Vec<CommandSlot> {
        let mut slots = Vec::with_capacity(self.edges.len() * 2);
        let last_index = self.nodes.len() - 1;

        for (i, edge) in self.edges.values().enumerate() {
            let kind = match edge.shape() {
                EdgeShape::Straight => CommandKind::Straight,
                EdgeShape::Arc(arc) => CommandKind::Curve { turn: arc.turn },
            };
            slots.push(CommandSlot {
                owner: CommandOwner::Edge(edge.id),
                kind,
                params: *edge.command(),
            });

            let node = &self.nodes[i + 1];
            if i + 1 < last_index && node.has_turn() {
                if let Some(params) = node.command() {
                    slots.push(CommandSlot {
                        owner: CommandOwner::Node(node.id),
                        kind: CommandKind::Turn {
                            turn: node.turn_direction(),
                        },
                        params: *params,
                    });
                }
            }
        }

        slots
    }

    /// Panel-Positionen der Fahrbefehle: untereinander ab `origin` im Abstand `spacing`.
    pub fn command_panel_layout(&self, origin: Vec2, spacing: f32) -> Vec<(CommandSlot, Vec2)> {
        self.command_slots()
            .into_iter()
            .enumerate()
            .map(|(i, slot)| (slot, origin + Vec2::new(0.0, i as f32 * spacing)))
            .collect()
    }

    /// Parameter eines Fahrbefehls zum Bearbeiten (None wenn der Besitzer keinen hat).
    pub fn command_mut(&mut self, owner: CommandOwner) -> Option<&mut CommandParams> {
        match owner {
            CommandOwner::Edge(id) => self.edges.get_mut(&id).map(PathEdge::command_mut),
            CommandOwner::Node(id) => self.nodes.get_mut(&id).and_then(PathNode::command_mut),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Zeichenbare Elemente: erst Nodes, dann Edges, dann Anker-Punkte.
    pub fn drawables(&self) -> impl Iterator<Item = Drawable<'_>> + '_ {
        let nodes = self.nodes.values().map(Drawable::Node);
        let edges = self.edges.values().map(Drawable::Edge);
        let controls = self.edges.values().map(|edge| Drawable::CurveControl {
            edge: edge.id,
            position: edge.control_point(),
        });
        let shoots = self
            .nodes
            .values()
            .filter(|node| node.is_shoot())
            .map(|node| Drawable::ShootMarker {
                node: node.id,
                position: node.position,
            });
        nodes.chain(edges).chain(controls).chain(shoots)
    }

    pub fn for_each_drawable(&self, mut f: impl FnMut(Drawable<'_>)) {
        for drawable in self.drawables() {
            f(drawable);
        }
    }
}

/// Naechster Punkt auf Gerade oder Bogen einer Edge.
fn closest_point_on_shape(edge: &PathEdge, prev: Vec2, next: Vec2, position: Vec2) -> Vec2 {
    let Some(arc) = edge.arc() else {
        return project_point_onto_segment(position, prev, next);
    };

    let angle = heading_between(arc.center, position);
    let relative = (angle - arc.theta1).rem_euclid(TAU);
    if relative <= arc.sweep() {
        return arc.center + polar(arc.radius, angle);
    }
    // Ausserhalb des Bogens: naeheren Endpunkt nehmen
    if position.distance(prev) <= position.distance(next) {
        prev
    } else {
        next
    }
}
