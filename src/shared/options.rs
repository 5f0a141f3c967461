//! Zentrale Konfiguration fuer den Vehicle Path Editor.
//!
//! `PathOptions` enthaelt alle zur Laufzeit aenderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::path::{CURVE_SNAP_DISTANCE, SNAP_TOLERANCE, START_HEADING};
use crate::core::{CommandParams, PathConfig, PrecisionMode};
use serde::{Deserialize, Serialize};

// ── Treffertests ────────────────────────────────────────────────────

/// Pick-Radius fuer Nodes (Feldeinheiten).
pub const NODE_PICK_RADIUS: f32 = 1.0;
/// Maximaler Abstand eines Klicks zu einer Edge (Feldeinheiten).
pub const EDGE_PICK_TOLERANCE: f32 = 0.5;

// ── Befehls-Panel ───────────────────────────────────────────────────

/// Position der ersten Panel-Zeile (rechts neben dem Spielfeld).
pub const COMMAND_PANEL_ORIGIN: [f32; 2] = [817.0, 18.0];
/// Vertikaler Abstand der Panel-Zeilen.
pub const COMMAND_PANEL_SPACING: f32 = 70.0;

// ── Undo ────────────────────────────────────────────────────────────

/// Maximale Anzahl Undo-Schritte.
pub const HISTORY_DEPTH: usize = 100;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit aenderbaren Editor-Optionen.
/// Wird als `vehicle_path_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOptions {
    // ── Einrasten ───────────────────────────────────────────────
    /// Winkeltoleranz fuer das Einrasten neuer Punkte (Radiant)
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f32,
    /// Kontrollpunkt-Abstand, unter dem eine Edge gerade bleibt
    #[serde(default = "default_curve_snap_distance")]
    pub curve_snap_distance: f32,
    /// Ausrichtung des Fahrzeugs am Start-Node (Radiant)
    #[serde(default)]
    pub start_heading: f32,

    // ── Treffertests ────────────────────────────────────────────
    /// Pick-Radius fuer Nodes
    #[serde(default = "default_node_pick_radius")]
    pub node_pick_radius: f32,
    /// Pick-Toleranz fuer Edges
    #[serde(default = "default_edge_pick_tolerance")]
    pub edge_pick_tolerance: f32,

    // ── Befehls-Panel ───────────────────────────────────────────
    /// Position der ersten Panel-Zeile
    #[serde(default = "default_command_panel_origin")]
    pub command_panel_origin: [f32; 2],
    /// Abstand der Panel-Zeilen
    #[serde(default = "default_command_panel_spacing")]
    pub command_panel_spacing: f32,

    // ── Fahrbefehle ─────────────────────────────────────────────
    /// Geschwindigkeit neuer Fahrbefehle (0..=1)
    #[serde(default = "default_speed")]
    pub default_speed: f32,
    /// Praezisionsmodus neuer Fahrbefehle
    #[serde(default)]
    pub default_precision: PrecisionMode,

    // ── Undo ────────────────────────────────────────────────────
    /// Maximale Undo-Tiefe
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
            curve_snap_distance: CURVE_SNAP_DISTANCE,
            start_heading: START_HEADING,
            node_pick_radius: NODE_PICK_RADIUS,
            edge_pick_tolerance: EDGE_PICK_TOLERANCE,
            command_panel_origin: COMMAND_PANEL_ORIGIN,
            command_panel_spacing: COMMAND_PANEL_SPACING,
            default_speed: 1.0,
            default_precision: PrecisionMode::Precise,
            history_depth: HISTORY_DEPTH,
        }
    }
}

fn default_snap_tolerance() -> f32 {
    SNAP_TOLERANCE
}

fn default_curve_snap_distance() -> f32 {
    CURVE_SNAP_DISTANCE
}

fn default_node_pick_radius() -> f32 {
    NODE_PICK_RADIUS
}

fn default_edge_pick_tolerance() -> f32 {
    EDGE_PICK_TOLERANCE
}

fn default_command_panel_origin() -> [f32; 2] {
    COMMAND_PANEL_ORIGIN
}

fn default_command_panel_spacing() -> f32 {
    COMMAND_PANEL_SPACING
}

fn default_speed() -> f32 {
    1.0
}

fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

impl PathOptions {
    /// Laedt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("vehicle_path_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("vehicle_path_editor.toml")
    }

    /// Geometrie-Einstellungen fuer den Pfad.
    pub fn path_config(&self) -> PathConfig {
        PathConfig {
            snap_tolerance: self.snap_tolerance,
            curve_snap_distance: self.curve_snap_distance,
            start_heading: self.start_heading,
            default_command: CommandParams::new(self.default_speed, self.default_precision),
        }
    }

    pub fn command_panel_origin(&self) -> glam::Vec2 {
        glam::Vec2::from(self.command_panel_origin)
    }
}
