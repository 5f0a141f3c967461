//! Rein-mathematische Hilfsfunktionen fuer Headings, Kreise und Linien.
//!
//! Alle Winkel in Radiant, Headings im Bereich (-π, π].
//! Toleranzen werden hier einmal definiert und ueberall wiederverwendet.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Toleranz fuer Heading-Vergleiche (Radiant).
pub const HEADING_EPSILON: f32 = 1e-3;
/// Toleranz der Determinante beim Kreisfit (relativ zur quadrierten Ausdehnung).
pub const COLLINEAR_EPSILON: f32 = 1e-6;
/// Curve-Offsets unterhalb dieses Betrags gelten als gerade Strecke.
pub const OFFSET_EPSILON: f32 = 1e-4;

/// Normalisiert einen Winkel auf (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Heading des Vektors a→b.
pub fn heading_between(a: Vec2, b: Vec2) -> f32 {
    let delta = b - a;
    normalize_angle(delta.y.atan2(delta.x))
}

/// Vorzeichenbehaftete kuerzeste Differenz `to - from` in (-π, π].
///
/// Positiv = Drehung gegen den Uhrzeigersinn (Linkskurve).
pub fn angular_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Vektor aus Betrag und Heading.
pub fn polar(magnitude: f32, heading: f32) -> Vec2 {
    Vec2::from_angle(heading) * magnitude
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Mittelpunkt des Kreises durch drei Punkte.
///
/// Gibt `None` wenn die Punkte (nahezu) kollinear sind – das Gleichungssystem
/// hat dann keine eindeutige Loesung.
pub fn circle_center_from_three_points(p1: Vec2, p2: Vec2, p3: Vec2) -> Option<Vec2> {
    // Relativ zu p1 rechnen, damit grosse Feldkoordinaten nicht ausloeschen
    let b = p2 - p1;
    let c = p3 - p1;
    let det = 2.0 * b.perp_dot(c);
    let extent = b.length_squared().max(c.length_squared());
    if extent < f32::EPSILON || det.abs() <= COLLINEAR_EPSILON * extent {
        return None;
    }

    let b_sq = b.length_squared();
    let c_sq = c.length_squared();
    let ux = (c.y * b_sq - b.y * c_sq) / det;
    let uy = (b.x * c_sq - c.x * b_sq) / det;
    Some(p1 + Vec2::new(ux, uy))
}

/// Vorzeichenbehafteter Abstand von `p` zur unendlichen Geraden durch a→b.
///
/// Positiv links der Fahrtrichtung a→b (Seite `heading + π/2`).
/// Bei `a == b` wird der Punktabstand zurueckgegeben.
pub fn signed_distance_point_to_line(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let dir = b - a;
    let len = dir.length();
    if len < f32::EPSILON {
        return p.distance(a);
    }
    dir.perp_dot(p - a) / len
}

/// Senkrechter Abstand von `p` zur unendlichen Geraden durch a und b.
pub fn distance_point_to_line(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    signed_distance_point_to_line(p, a, b).abs()
}

/// Naechster Punkt auf der Geraden durch a und b.
pub fn project_point_onto_line(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let dir = b - a;
    let len_sq = dir.length_squared();
    if len_sq < f32::EPSILON {
        return a;
    }
    a + dir * ((p - a).dot(dir) / len_sq)
}

/// Naechster Punkt auf der Strecke a–b (geklemmt auf die Endpunkte).
pub fn project_point_onto_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let dir = b - a;
    let len_sq = dir.length_squared();
    if len_sq < f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(dir) / len_sq).clamp(0.0, 1.0);
    a + dir * t
}

/// Projiziert `p` auf die Gerade durch `origin` in Richtung `heading`.
///
/// Negative Parameter sind zulaessig (Punkt hinter dem Ursprung).
pub fn project_point_onto_heading(origin: Vec2, heading: f32, p: Vec2) -> Vec2 {
    let dir = Vec2::from_angle(heading);
    origin + dir * (p - origin).dot(dir)
}

/// Prueft ob `p` naeher als `tolerance` an der Strecke a–b liegt.
pub fn point_touching_segment(p: Vec2, a: Vec2, b: Vec2, tolerance: f32) -> bool {
    p.distance(project_point_onto_segment(p, a, b)) < tolerance
}

/// Curve-Offset eines Bogens von `from` nach `to`, der mit `entry_heading` startet.
///
/// Sagitta `s = (L/2)·tan(δ/2)` mit δ = Abweichung der Tangente von der Sehne.
/// Gibt `None` wenn der Bogen groesser als ein Halbkreis waere (|δ| ≥ π/2)
/// oder die Sehne degeneriert ist.
pub fn offset_for_entry_heading(from: Vec2, to: Vec2, entry_heading: f32) -> Option<f32> {
    let chord = from.distance(to);
    if chord < f32::EPSILON {
        return None;
    }
    let deviation = angular_delta(heading_between(from, to), entry_heading);
    if deviation.abs() >= std::f32::consts::FRAC_PI_2 - HEADING_EPSILON {
        return None;
    }
    if deviation.abs() < HEADING_EPSILON {
        return Some(0.0);
    }
    Some(0.5 * chord * (0.5 * deviation).tan())
}
