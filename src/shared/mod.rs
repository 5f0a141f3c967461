//! Geteilte Typen fuer layer-uebergreifende Vertraege.
//!
//! Enthaelt die Laufzeit-Optionen, die sowohl `app` als auch die Binary lesen.

pub mod options;

pub use options::PathOptions;
