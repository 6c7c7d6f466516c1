//! Headless demo driving the navigation core from a scripted tap sequence
//!
//! Usage: `tapnav [config.ron]`. Set `RUST_LOG=debug` to watch state
//! transitions.

use std::time::Duration;

use tapnav::ecs::Name;
use tapnav::grid::TilePalette;
use tapnav::prelude::*;

/// Fixed simulation step
const FRAME: Duration = Duration::from_micros(16_667);

enum ScriptedCommand {
    Tap(Option<Vec3>),
    Mine,
    BuildMode(BuildMode),
    Cancel,
}

fn build_terrain(divisions: u32) -> TileMap {
    let mut map = TileMap::open(divisions);
    let d = divisions as i32;

    // A river across the middle with a single ford
    map.fill_rect(Cell::new(0, d / 2), Cell::new(d - 1, d / 2), TileType::Water);
    map.paint(Cell::new(d / 4, d / 2), TileType::Sand);
    // Boulders near the start
    for z in 2..6 {
        map.set_blocked(Cell::new(d / 3, z), true);
    }
    log::info!(
        "Terrain {divisions}x{divisions} with {} water tiles",
        map.count(TileType::Water)
    );
    map
}

/// Frame number and the command delivered on it
fn script(core: &NavigationCore<TileMap>) -> Vec<(u32, ScriptedCommand)> {
    let d = core.config().divisions as i32;
    let at = |x: i32, z: i32| Some(core.grid().cell_center_world(Cell::new(x, z)));

    vec![
        (1, ScriptedCommand::Tap(at(d - 3, 3))),
        // Change of mind halfway there
        (90, ScriptedCommand::Tap(at(d / 2, d - 4))),
        // Tap into the river: unreachable
        (150, ScriptedCommand::Tap(at(d / 2, d / 2))),
        // Raycast miss
        (151, ScriptedCommand::Tap(None)),
        (160, ScriptedCommand::Mine),
        (900, ScriptedCommand::BuildMode(BuildMode::painting(TileType::Stone))),
        (901, ScriptedCommand::Tap(at(d / 2 + 1, d / 2))),
        (902, ScriptedCommand::BuildMode(BuildMode::off())),
        (903, ScriptedCommand::Tap(at(d / 2 + 1, 1))),
        (960, ScriptedCommand::Cancel),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => NavConfig::load_ron(&path)?,
        None => NavConfig::default().with_grid(24.0, 24),
    };
    log::info!("Starting navigation demo with {:?}", config);

    let terrain = build_terrain(config.divisions);
    let mut core = NavigationCore::spawn_at_cell(config, terrain, Cell::new(1, 1))?;

    let mut world = World::new();
    let d = core.config().divisions as i32;
    let rock_at = core.grid().cell_center_world(Cell::new(d / 4 + 2, d - 3));
    let rock = world.spawn((ActionSite::new(rock_at), Name::new("rock")));

    let palette = TilePalette::default();
    let script = script(&core);
    let dt = FRAME.as_secs_f32();
    let mut last_state = core.snapshot().state;

    for frame in 0..1200u32 {
        for (_, command) in script.iter().filter(|(at, _)| *at == frame) {
            match *command {
                ScriptedCommand::Tap(point) => core.queue(NavCommand::Tap(point)),
                ScriptedCommand::Mine => core.queue(NavCommand::Action(rock)),
                ScriptedCommand::BuildMode(mode) => core.set_build_mode(mode),
                ScriptedCommand::Cancel => core.queue(NavCommand::Cancel),
            }
        }

        core.update(dt, &world);

        let mut mined = Vec::new();
        for event in core.events_mut().drain() {
            match event {
                NavEvent::ActionCompleted { target } => {
                    let name = world
                        .get::<Name>(target)
                        .map(|n| n.0.clone())
                        .unwrap_or_default();
                    log::info!("Frame {frame}: finished working on {name} ({target:?})");
                    mined.push(target);
                }
                NavEvent::TilePainted { cell, tile } => {
                    let style = palette.style(tile);
                    log::info!("Frame {frame}: painted {cell} {tile} (color {:?})", style.color);
                }
                NavEvent::PathNotFound { goal } => {
                    log::info!("Frame {frame}: can't get to {goal}");
                }
                other => log::debug!("Frame {frame}: {other:?}"),
            }
        }
        for target in mined {
            world.despawn(target)?;
        }

        let snapshot = core.snapshot();
        if snapshot.state != last_state {
            let visual = PathVisual::from_snapshot(&snapshot);
            log::info!(
                "Frame {frame}: {} at {} ({} waypoints left, route {:.1} units)",
                snapshot.state,
                snapshot.position,
                snapshot.remaining_waypoints.len(),
                visual.length()
            );
            last_state = snapshot.state;
        }
    }

    let snapshot = core.snapshot();
    log::info!(
        "Demo finished: agent {} at cell {}",
        snapshot.state,
        core.agent_cell()
    );
    Ok(())
}
