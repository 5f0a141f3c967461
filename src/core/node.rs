//! Repräsentiert einen Wegpunkt des Pfads (Start-Node oder Turn-Node).

use super::command::CommandParams;
use super::geometry::{angular_delta, HEADING_EPSILON};
use glam::Vec2;
use std::fmt;

/// Stabile Node-ID innerhalb eines Pfads (wird nie wiederverwendet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Drehrichtung an einem Node bzw. entlang eines Bogens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnDirection {
    /// Keine Drehung
    #[default]
    None,
    /// Rechtsdrehung (Heading nimmt ab)
    Clockwise,
    /// Linksdrehung (Heading nimmt zu)
    CounterClockwise,
}

impl TurnDirection {
    /// Leitet die Drehrichtung aus einer Heading-Differenz ab (Toleranz `HEADING_EPSILON`).
    pub fn from_delta(delta: f32) -> Self {
        if delta > HEADING_EPSILON {
            Self::CounterClockwise
        } else if delta < -HEADING_EPSILON {
            Self::Clockwise
        } else {
            Self::None
        }
    }
}

/// Variante eines Wegpunkts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Ursprung des Pfads, hat nie ein ankommendes Heading
    Start,
    /// Jeder weitere Wegpunkt, ggf. ohne Drehung
    Turn,
}

/// Ein Wegpunkt mit abgeleiteten Headings
#[derive(Debug, Clone)]
pub struct PathNode {
    /// Node-ID
    pub id: NodeId,
    /// Position in Feldkoordinaten
    pub position: Vec2,
    kind: NodeKind,
    before_heading: Option<f32>,
    after_heading: Option<f32>,
    turn: TurnDirection,
    shoot: bool,
    command: Option<CommandParams>,
}

impl PathNode {
    /// Erstellt den Start-Node eines Pfads.
    pub fn start(id: NodeId, position: Vec2) -> Self {
        Self::new(id, position, NodeKind::Start)
    }

    /// Erstellt einen Turn-Node.
    pub fn turn(id: NodeId, position: Vec2) -> Self {
        Self::new(id, position, NodeKind::Turn)
    }

    fn new(id: NodeId, position: Vec2, kind: NodeKind) -> Self {
        Self {
            id,
            position,
            kind,
            before_heading: None,
            after_heading: None,
            turn: TurnDirection::None,
            shoot: false,
            command: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_start(&self) -> bool {
        self.kind == NodeKind::Start
    }

    /// Fahrtrichtung bei Ankunft (None fuer den Start-Node)
    pub fn before_heading(&self) -> Option<f32> {
        self.before_heading
    }

    /// Fahrtrichtung beim Verlassen (None fuer den letzten Node)
    pub fn after_heading(&self) -> Option<f32> {
        self.after_heading
    }

    pub fn turn_direction(&self) -> TurnDirection {
        self.turn
    }

    pub fn has_turn(&self) -> bool {
        self.turn != TurnDirection::None
    }

    /// Signierte Drehung am Node (0 ohne Drehung oder ohne beide Headings).
    pub fn turn_angle(&self) -> f32 {
        match (self.before_heading, self.after_heading) {
            (Some(before), Some(after)) if self.has_turn() => angular_delta(before, after),
            _ => 0.0,
        }
    }

    pub fn is_shoot(&self) -> bool {
        self.shoot
    }

    pub(crate) fn set_shoot(&mut self, shoot: bool) {
        self.shoot = shoot;
    }

    pub fn command(&self) -> Option<&CommandParams> {
        self.command.as_ref()
    }

    pub(crate) fn command_mut(&mut self) -> Option<&mut CommandParams> {
        self.command.as_mut()
    }

    /// Loest die Drehung am Node aus den Headings der angrenzenden Edges auf.
    ///
    /// - `incoming`: `after_heading` der ankommenden Edge (wird beim Start-Node ignoriert)
    /// - `outgoing`: `before_heading` der abgehenden Edge (None am Pfadende)
    ///
    /// Ein Parameter-Record entsteht beim Wechsel auf "Drehung" und verschwindet
    /// wieder, sobald die Drehung wegfaellt (ausser die Shoot-Aktion ist aktiv).
    /// Gibt das abgehende Heading zurueck.
    pub fn resolve(
        &mut self,
        incoming: Option<f32>,
        outgoing: Option<f32>,
        default_command: CommandParams,
    ) -> Option<f32> {
        self.before_heading = match self.kind {
            NodeKind::Start => None,
            NodeKind::Turn => incoming,
        };
        self.after_heading = outgoing;

        self.turn = match (self.before_heading, self.after_heading) {
            (Some(before), Some(after)) => TurnDirection::from_delta(angular_delta(before, after)),
            _ => TurnDirection::None,
        };

        let needs_command = self.has_turn() || self.shoot;
        match (needs_command, self.command.is_some()) {
            (true, false) => self.command = Some(default_command),
            (false, true) => self.command = None,
            _ => {}
        }

        self.after_heading
    }
}
