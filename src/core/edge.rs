//! Repräsentiert ein Segment zwischen zwei aufeinanderfolgenden Wegpunkten.
//!
//! Ein Segment ist gerade, bis sein Kontrollpunkt seitlich von der Sehne
//! weggezogen wird – dann wird es zum Kreisbogen durch Start, Kontrollpunkt und Ende.

use super::command::CommandParams;
use super::geometry::{
    circle_center_from_three_points, heading_between, midpoint, normalize_angle, polar,
    OFFSET_EPSILON,
};
use super::node::{NodeId, TurnDirection};
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

/// Stabile Edge-ID innerhalb eines Pfads (wird nie wiederverwendet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Kreisbogen-Geometrie eines gekruemmten Segments.
///
/// Der Bogen wird immer gegen den Uhrzeigersinn von `theta1` nach `theta2`
/// ueberstrichen (`0 < theta2 - theta1 <= π`), unabhaengig von der Fahrtrichtung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    /// Kreismittelpunkt
    pub center: Vec2,
    /// Kreisradius
    pub radius: f32,
    /// Start-Winkel des Bogens (Radiant, Sicht vom Mittelpunkt)
    pub theta1: f32,
    /// End-Winkel des Bogens, immer groesser als `theta1`
    pub theta2: f32,
    /// Drehrichtung der Fahrt entlang des Bogens
    pub turn: TurnDirection,
}

impl ArcGeometry {
    /// Ueberstrichener Winkel in (0, π].
    pub fn sweep(&self) -> f32 {
        self.theta2 - self.theta1
    }

    pub fn length(&self) -> f32 {
        self.radius * self.sweep()
    }
}

/// Form eines Segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeShape {
    Straight,
    Arc(ArcGeometry),
}

/// Grund, warum ein Curve-Offset verworfen wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitRejection {
    /// Start, Kontrollpunkt und Ende sind kollinear (kein eindeutiger Kreis)
    Degenerate,
    /// Der Kreismittelpunkt wuerde die Sehne ueberqueren (Bogen > Halbkreis)
    CenterCrossesChord,
    /// Offset ist NaN oder unendlich
    NonFinite,
}

/// Ergebnis eines erfolgreichen Bogen-Fits.
#[derive(Debug, Clone, Copy)]
struct ArcFit {
    shape: EdgeShape,
    control_point: Vec2,
    before_heading: f32,
    after_heading: f32,
}

/// Fittet die Segment-Geometrie fuer `offset` zwischen `prev` und `next`.
///
/// Vorzeichenkonvention: der Kontrollpunkt liegt bei `Sehnen-Heading + π/2`.
/// Positiver Offset (Kontrollpunkt links) → Fahrt im Uhrzeigersinn, Tangente = Radius − π/2.
/// Negativer Offset → gegen den Uhrzeigersinn, Tangente = Radius + π/2.
fn fit_arc(prev: Vec2, next: Vec2, offset: f32) -> Result<ArcFit, FitRejection> {
    if !offset.is_finite() {
        return Err(FitRejection::NonFinite);
    }

    let chord_heading = heading_between(prev, next);
    let mid = midpoint(prev, next);
    let control_point = mid + polar(offset, chord_heading + FRAC_PI_2);

    if offset.abs() < OFFSET_EPSILON {
        return Ok(ArcFit {
            shape: EdgeShape::Straight,
            control_point: mid,
            before_heading: chord_heading,
            after_heading: chord_heading,
        });
    }

    let center = circle_center_from_three_points(prev, control_point, next)
        .ok_or(FitRejection::Degenerate)?;

    // Mittelpunkt darf die Sehne nicht ueberqueren
    if control_point.distance(center) < control_point.distance(mid) {
        return Err(FitRejection::CenterCrossesChord);
    }

    let h1 = heading_between(center, prev);
    let h2 = heading_between(center, next);

    let (turn, tangent_rotation) = if offset > 0.0 {
        (TurnDirection::Clockwise, -FRAC_PI_2)
    } else {
        (TurnDirection::CounterClockwise, FRAC_PI_2)
    };

    let (theta1, mut theta2) = match turn {
        TurnDirection::Clockwise => (h2, h1),
        _ => (h1, h2),
    };
    if theta2 <= theta1 {
        theta2 += TAU;
    }

    Ok(ArcFit {
        shape: EdgeShape::Arc(ArcGeometry {
            center,
            radius: center.distance(prev),
            theta1,
            theta2,
            turn,
        }),
        control_point,
        before_heading: normalize_angle(h1 + tangent_rotation),
        after_heading: normalize_angle(h2 + tangent_rotation),
    })
}

/// Ein Segment zwischen zwei Nodes
#[derive(Debug, Clone)]
pub struct PathEdge {
    /// Edge-ID
    pub id: EdgeId,
    /// Vorheriger Node (nicht besitzend)
    pub previous: NodeId,
    /// Naechster Node (nicht besitzend)
    pub next: NodeId,
    curve_offset: f32,
    distance: f32,
    midpoint: Vec2,
    control_point: Vec2,
    shape: EdgeShape,
    before_heading: f32,
    after_heading: f32,
    command: CommandParams,
}

impl PathEdge {
    /// Erstellt ein gerades Segment. Geometrie ist erst nach `compute()` gueltig.
    pub fn new(id: EdgeId, previous: NodeId, next: NodeId, command: CommandParams) -> Self {
        Self {
            id,
            previous,
            next,
            curve_offset: 0.0,
            distance: 0.0,
            midpoint: Vec2::ZERO,
            control_point: Vec2::ZERO,
            shape: EdgeShape::Straight,
            before_heading: 0.0,
            after_heading: 0.0,
            command,
        }
    }

    /// Berechnet die Geometrie aus den Endpunkten neu und gibt das `after_heading` zurueck.
    ///
    /// Ist der aktuelle Offset fuer die neuen Positionen ungueltig, bleiben
    /// Offset, Bogen und Headings auf dem letzten gueltigen Stand; nur Abstand
    /// und Mittelpunkt folgen den Endpunkten. Der Bogenmittelpunkt ist dann
    /// nicht mehr zu beiden Endpunkten aequidistant.
    pub fn compute(&mut self, prev: Vec2, next: Vec2) -> f32 {
        self.distance = prev.distance(next);
        self.midpoint = midpoint(prev, next);

        match fit_arc(prev, next, self.curve_offset) {
            Ok(fit) => self.apply(fit),
            Err(reason) => {
                log::debug!(
                    "Edge {}: Offset {:.3} ungueltig ({:?}), letzter Zustand bleibt",
                    self.id,
                    self.curve_offset,
                    reason
                );
            }
        }

        self.after_heading
    }

    /// Setzt einen neuen Curve-Offset, falls der Bogen gueltig ist.
    ///
    /// Gibt `false` zurueck wenn der Offset verworfen wurde; Offset, Bogen und
    /// Headings bleiben dann unveraendert.
    pub fn set_curve_offset(&mut self, offset: f32, prev: Vec2, next: Vec2) -> bool {
        match fit_arc(prev, next, offset) {
            Ok(fit) => {
                self.curve_offset = if fit.shape == EdgeShape::Straight {
                    0.0
                } else {
                    offset
                };
                self.distance = prev.distance(next);
                self.midpoint = midpoint(prev, next);
                self.apply(fit);
                true
            }
            Err(reason) => {
                log::debug!(
                    "Edge {}: Offset {:.3} verworfen ({:?})",
                    self.id,
                    offset,
                    reason
                );
                false
            }
        }
    }

    fn apply(&mut self, fit: ArcFit) {
        self.shape = fit.shape;
        self.control_point = fit.control_point;
        self.before_heading = fit.before_heading;
        self.after_heading = fit.after_heading;
    }

    pub fn curve_offset(&self) -> f32 {
        self.curve_offset
    }

    /// Sehnenlaenge zwischen den beiden Nodes
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Gefahrene Laenge (Bogenlaenge bzw. Sehnenlaenge)
    pub fn length(&self) -> f32 {
        match self.shape {
            EdgeShape::Straight => self.distance,
            EdgeShape::Arc(arc) => arc.length(),
        }
    }

    pub fn shape(&self) -> EdgeShape {
        self.shape
    }

    pub fn arc(&self) -> Option<&ArcGeometry> {
        match &self.shape {
            EdgeShape::Straight => None,
            EdgeShape::Arc(arc) => Some(arc),
        }
    }

    pub fn arc_center(&self) -> Option<Vec2> {
        self.arc().map(|arc| arc.center)
    }

    pub fn is_straight(&self) -> bool {
        self.shape == EdgeShape::Straight
    }

    /// Drehrichtung entlang des Segments (None fuer Geraden)
    pub fn turn_direction(&self) -> TurnDirection {
        self.arc().map_or(TurnDirection::None, |arc| arc.turn)
    }

    pub fn midpoint(&self) -> Vec2 {
        self.midpoint
    }

    /// Ziehbarer Kontrollpunkt (Sehnenmitte bei Geraden)
    pub fn control_point(&self) -> Vec2 {
        self.control_point
    }

    /// Fahrtrichtung am Anfang des Segments
    pub fn before_heading(&self) -> f32 {
        self.before_heading
    }

    /// Fahrtrichtung am Ende des Segments
    pub fn after_heading(&self) -> f32 {
        self.after_heading
    }

    pub fn command(&self) -> &CommandParams {
        &self.command
    }

    pub(crate) fn command_mut(&mut self) -> &mut CommandParams {
        &mut self.command
    }
}
