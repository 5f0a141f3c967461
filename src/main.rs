//! path-inspect: baut einen Pfad aus Kommandozeilen-Waypoints und gibt
//! Headings, Edge-Geometrie und Fahrbefehle aus.
//!
//! Aufruf: `path-inspect [--write-options] x,y x,y[@offset] ...`
//! Das erste Argument ist der Start-Node, `@offset` kruemmt die Edge zum Waypoint.

use anyhow::{bail, Context};
use glam::Vec2;
use vehicle_path_editor::{
    CommandKind, CommandOwner, EdgeShape, EditorIntent, PathEditor, PathOptions,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("path-inspect v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = PathOptions::config_path();
    let options = PathOptions::load_from_file(&config_path);

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(pos) = args.iter().position(|a| a == "--write-options") {
        args.remove(pos);
        options
            .save_to_file(&config_path)
            .with_context(|| format!("Optionen nicht schreibbar: {}", config_path.display()))?;
    }

    let waypoints = args
        .iter()
        .map(|arg| parse_waypoint(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let Some(((start, _), rest)) = waypoints.split_first() else {
        bail!("Mindestens ein Waypoint erwartet (x,y)");
    };

    let mut editor = PathEditor::new(*start, options);
    for (position, offset) in rest {
        editor.handle_intent(EditorIntent::AddWaypoint {
            position: *position,
            curved: false,
            snap: false,
        })?;
        if let Some(offset) = offset {
            let edge = editor.path().edge_at(editor.path().edge_count() - 1).id;
            editor.handle_intent(EditorIntent::SetCurveOffset {
                edge,
                offset: *offset,
            })?;
        }
    }

    print_report(&editor);
    Ok(())
}

/// Parst `x,y` oder `x,y@offset`.
fn parse_waypoint(arg: &str) -> anyhow::Result<(Vec2, Option<f32>)> {
    let (coords, offset) = match arg.split_once('@') {
        Some((coords, offset)) => {
            let offset: f32 = offset
                .trim()
                .parse()
                .with_context(|| format!("Ungueltiger Offset in '{}'", arg))?;
            (coords, Some(offset))
        }
        None => (arg, None),
    };

    let Some((x, y)) = coords.split_once(',') else {
        bail!("Waypoint '{}' hat nicht das Format x,y", arg);
    };
    let x: f32 = x
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige x-Koordinate in '{}'", arg))?;
    let y: f32 = y
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige y-Koordinate in '{}'", arg))?;
    Ok((Vec2::new(x, y), offset))
}

fn print_report(editor: &PathEditor) {
    let path = editor.path();

    println!("Nodes:");
    for node in path.nodes() {
        println!(
            "  {} ({:.2}, {:.2}) vor={} nach={} drehung={:?}",
            node.id,
            node.position.x,
            node.position.y,
            fmt_heading(node.before_heading()),
            fmt_heading(node.after_heading()),
            node.turn_direction(),
        );
    }

    println!("Edges:");
    for edge in path.edges() {
        match edge.shape() {
            EdgeShape::Straight => println!(
                "  {} {}→{} gerade L={:.2} heading={:.3}",
                edge.id,
                edge.previous,
                edge.next,
                edge.length(),
                edge.before_heading()
            ),
            EdgeShape::Arc(arc) => println!(
                "  {} {}→{} bogen r={:.2} M=({:.2}, {:.2}) L={:.2} {:.3}→{:.3} {:?}",
                edge.id,
                edge.previous,
                edge.next,
                arc.radius,
                arc.center.x,
                arc.center.y,
                arc.length(),
                edge.before_heading(),
                edge.after_heading(),
                arc.turn
            ),
        }
    }

    println!("Fahrbefehle:");
    for (slot, pos) in editor.command_panel() {
        let owner = match slot.owner {
            CommandOwner::Edge(id) => id.to_string(),
            CommandOwner::Node(id) => id.to_string(),
        };
        let kind = match slot.kind {
            CommandKind::Straight => "Gerade".to_string(),
            CommandKind::Curve { turn } => format!("Kurve {:?}", turn),
            CommandKind::Turn { turn } => format!("Drehung {:?}", turn),
        };
        println!(
            "  [{:.0}, {:.0}] {} {} v={:.2} {:?}",
            pos.x,
            pos.y,
            owner,
            kind,
            slot.params.speed(),
            slot.params.precision
        );
    }
    println!("Gesamtlaenge: {:.2}", path.total_length());
}

fn fmt_heading(heading: Option<f32>) -> String {
    heading.map_or_else(|| "-".to_string(), |h| format!("{:.3}", h))
}
