//! Fahrbefehl-Parameter, die an Edges und Turn-Nodes haengen.
//!
//! Die Geometrie erzeugt und verwirft die Records, liest aber nie ihren Inhalt.

use super::{EdgeId, NodeId, TurnDirection};
use serde::{Deserialize, Serialize};

/// Minimale Geschwindigkeit (Anteil der Maximalgeschwindigkeit).
pub const SPEED_MIN: f32 = 0.0;
/// Maximale Geschwindigkeit.
pub const SPEED_MAX: f32 = 1.0;
/// Schrittweite des Geschwindigkeits-Reglers.
pub const SPEED_STEP: f32 = 0.01;

/// Praezisionsmodus eines Fahrbefehls (Umschalter PREC/FAST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrecisionMode {
    /// Langsam und exakt anfahren
    #[default]
    Precise,
    /// Schnell, mit Toleranz am Zielpunkt
    Fast,
}

impl PrecisionMode {
    /// Gegenstueck fuer den PREC/FAST-Umschalter
    pub fn toggled(self) -> Self {
        match self {
            Self::Precise => Self::Fast,
            Self::Fast => Self::Precise,
        }
    }
}

/// Parameter eines Fahrbefehls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandParams {
    speed: f32,
    /// Praezisionsmodus
    pub precision: PrecisionMode,
}

impl CommandParams {
    /// Erstellt einen Parameter-Record; `speed` wird geklemmt und gerastert.
    pub fn new(speed: f32, precision: PrecisionMode) -> Self {
        let mut params = Self {
            speed: SPEED_MAX,
            precision,
        };
        params.set_speed(speed);
        params
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Setzt die Geschwindigkeit auf den naechsten Reglerschritt in [SPEED_MIN, SPEED_MAX].
    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        let clamped = speed.clamp(SPEED_MIN, SPEED_MAX);
        self.speed = ((clamped / SPEED_STEP).round() * SPEED_STEP).clamp(SPEED_MIN, SPEED_MAX);
    }
}

impl Default for CommandParams {
    fn default() -> Self {
        Self {
            speed: SPEED_MAX,
            precision: PrecisionMode::Precise,
        }
    }
}

/// Besitzer eines Fahrbefehls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandOwner {
    Edge(EdgeId),
    Node(NodeId),
}

/// Art des Fahrbefehls, abgeleitet aus der aktuellen Geometrie des Besitzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Gerade Strecke
    Straight,
    /// Kreisbogen
    Curve { turn: TurnDirection },
    /// Drehung auf der Stelle an einem Node
    Turn { turn: TurnDirection },
}

/// Ein Eintrag der Befehlsliste (eine Zeile im Parameter-Panel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandSlot {
    pub owner: CommandOwner,
    pub kind: CommandKind,
    pub params: CommandParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_params_full_speed_precise() {
        let params = CommandParams::default();
        assert_relative_eq!(params.speed(), 1.0);
        assert_eq!(params.precision, PrecisionMode::Precise);
    }

    #[test]
    fn test_set_speed_clamps_and_snaps_to_step() {
        let mut params = CommandParams::default();
        params.set_speed(0.456);
        assert_relative_eq!(params.speed(), 0.46, epsilon = 1e-6);
        params.set_speed(-3.0);
        assert_relative_eq!(params.speed(), 0.0);
        params.set_speed(7.0);
        assert_relative_eq!(params.speed(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_set_speed_ignores_nan() {
        let mut params = CommandParams::new(0.5, PrecisionMode::Fast);
        params.set_speed(f32::NAN);
        assert_relative_eq!(params.speed(), 0.5, epsilon = 1e-6);
        assert_eq!(params.precision, PrecisionMode::Fast);
    }

    #[test]
    fn test_precision_toggle() {
        assert_eq!(PrecisionMode::Precise.toggled(), PrecisionMode::Fast);
        assert_eq!(PrecisionMode::Fast.toggled(), PrecisionMode::Precise);
    }
}
