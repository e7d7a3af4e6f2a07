//! Reach Map
//!
//! Generates a seeded demo map, plans a move on it and prints where the
//! stack or unit can go: ASCII for eyeballing, JSON for tooling.

use std::path::PathBuf;

use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use realm_movement::battle::{calculate_combat_movement, CombatContext, CombatMap, CombatUnit};
use realm_movement::campaign::{calculate_overland_movement, CampaignMap, OverlandContext};
use realm_movement::core::error::{MovementError, Result};
use realm_movement::core::types::{DoubledMoves, PlayerId, UnitId};
use realm_movement::core::{config, set_config, MovementConfig};
use realm_movement::movement::{MoveType, MovementGrid};
use realm_movement::rules::{load_rules, MovementRules, RulesDatabase};
use realm_movement::spatial::{Coords, Direction, DirectionSet, PlaneCoords, SquareCoordinateSystem};
use realm_movement::units::{
    create_unit_stack, ExpandedUnit, PlayerKind, Players, RangedAttack, UnitRoster, UnitSnapshot,
};

const ME: PlayerId = PlayerId(1);
const THEM: PlayerId = PlayerId(2);

/// Reach Map - print movement ranges on a generated map
#[derive(Parser, Debug)]
#[command(name = "reach_map")]
#[command(about = "Plan a move on a seeded demo map and print the reachable cells")]
struct Args {
    /// Rules database to load
    #[arg(long, default_value = "data/rules/movement.toml")]
    rules: PathBuf,

    /// Optional movement config overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plan on the combat grid instead of the overland map
    #[arg(long)]
    combat: bool,

    /// Overland map width
    #[arg(long, default_value_t = 24)]
    width: i32,

    /// Overland map height
    #[arg(long, default_value_t = 16)]
    height: i32,

    /// Doubled movement points left this turn
    #[arg(long, default_value_t = 6)]
    moves: DoubledMoves,

    /// Give the moving unit a ranged attack (combat only)
    #[arg(long)]
    ranged: bool,

    /// Random seed for deterministic maps
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct ReachReport {
    mode: &'static str,
    seed: u64,
    origin: Coords,
    width: usize,
    height: usize,
    costs: Vec<Vec<Option<DoubledMoves>>>,
    directions: Vec<Vec<Option<u8>>>,
    reachable_this_turn: Vec<Vec<bool>>,
    move_types: Vec<Vec<MoveType>>,
}

impl ReachReport {
    fn from_grid(mode: &'static str, seed: u64, origin: Coords, grid: &MovementGrid) -> Self {
        let cell = |c: Coords| grid.cell(c).copied().unwrap_or_default();
        Self {
            mode,
            seed,
            origin,
            width: grid.width(),
            height: grid.height(),
            costs: rows(grid, |c| grid.cost(c)),
            directions: rows(grid, |c| cell(c).direction.map(Direction::number)),
            reachable_this_turn: rows(grid, |c| cell(c).reachable_this_turn),
            move_types: rows(grid, |c| grid.move_type(c)),
        }
    }
}

/// One layer of the grid as nested rows, north row first
fn rows<T>(grid: &MovementGrid, f: impl Fn(Coords) -> T) -> Vec<Vec<T>> {
    (0..grid.height() as i32)
        .map(|y| (0..grid.width() as i32).map(|x| f(Coords::new(x, y))).collect())
        .collect()
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("realm_movement=info")
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let overrides = MovementConfig::from_toml_str(&std::fs::read_to_string(path)?)?;
        overrides.validate().map_err(MovementError::Configuration)?;
        if set_config(overrides).is_err() {
            tracing::warn!("Movement config already initialised; ignoring {:?}", path);
        }
    }

    let rules = load_rules(&args.rules)?;
    let mut players = Players::new();
    players
        .add(ME, "Player", PlayerKind::Human)
        .add(THEM, "Rival", PlayerKind::Ai);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let (mode, origin, grid) = if args.combat {
        let (origin, grid) = plan_combat(&args, &rules, &players, &mut rng)?;
        ("combat", origin, grid)
    } else {
        let (origin, grid) = plan_overland(&args, &rules, &players, &mut rng)?;
        ("overland", origin, grid)
    };

    match args.format.as_str() {
        "json" => {
            let report = ReachReport::from_grid(mode, args.seed, origin, &grid);
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| MovementError::Configuration(format!("JSON output failed: {}", e)))?;
            println!("{}", json);
        }
        _ => print_ascii(origin, &grid),
    }

    Ok(())
}

fn plan_overland(
    args: &Args,
    rules: &RulesDatabase,
    players: &Players,
    rng: &mut ChaCha8Rng,
) -> Result<(Coords, MovementGrid)> {
    let config = config();
    let terrain: Vec<_> = rules
        .tile_types()
        .iter()
        .filter(|t| t.id != config.unseen_tile_type)
        .map(|t| t.id.clone())
        .collect();
    let Some(first) = terrain.first() else {
        return Err(MovementError::Configuration("Rules define no tile types".into()));
    };

    let system = SquareCoordinateSystem::cylinder(args.width, args.height);
    let mut map = CampaignMap::filled(system, config.planes, first.clone());
    for y in 0..args.height {
        for x in 0..args.width {
            if let Some(tile) = terrain.choose(rng) {
                map.set_tile_type(PlaneCoords::new(x, y, 0), tile.clone());
            }
        }
    }

    let start = PlaneCoords::new(args.width / 2, args.height / 2, 0);
    map.set_tile_type(start, first.clone());
    let mut roster = UnitRoster::new();
    roster.add(UnitSnapshot::new(
        UnitId(1),
        ME,
        start,
        ExpandedUnit::new("Spearmen", args.moves),
    ));
    for id in 2..6 {
        let at = PlaneCoords::new(rng.gen_range(0..args.width), rng.gen_range(0..args.height), 0);
        if at != start {
            roster.add(UnitSnapshot::new(UnitId(id), THEM, at, ExpandedUnit::new("Raiders", 4)));
        }
    }

    let stack = create_unit_stack(&[UnitId(1)], &roster, players, rules)?;
    let ctx = OverlandContext {
        map: &map,
        roster: &roster,
        players,
        rules,
        config,
    };
    let movement = calculate_overland_movement(&ctx, &stack, args.moves)?;
    tracing::info!(seed = args.seed, "Planned overland move");

    let grid = movement
        .plane(start.plane)
        .cloned()
        .unwrap_or_else(|| MovementGrid::new(map.width(), map.height()));
    Ok((start.coords(), grid))
}

fn plan_combat(
    args: &Args,
    rules: &RulesDatabase,
    players: &Players,
    rng: &mut ChaCha8Rng,
) -> Result<(Coords, MovementGrid)> {
    let config = config();
    let mut map = CombatMap::from_config(config, "grass");
    let width = map.width() as i32;
    let height = map.height() as i32;
    for y in 0..height {
        for x in 0..width {
            let at = Coords::new(x, y);
            match rng.gen_range(0..10) {
                0 => map.set_building(at, "tree"),
                1 => map.set_building(at, "house"),
                2 => {
                    if let Some(cell) = map.get_mut(at) {
                        cell.terrain = Some("rough".into());
                    }
                }
                _ => {}
            }
        }
    }

    // A short wall across the middle with a gap
    let wall_y = height / 2 - 2;
    for x in 2..width - 2 {
        if x != width / 2 {
            map.add_border(
                Coords::new(x, wall_y),
                "stone_wall",
                DirectionSet::empty().with(Direction::North),
            );
        }
    }

    let origin = Coords::new(width / 2, height - 3);
    if let Some(cell) = map.get_mut(origin) {
        cell.building = None;
    }

    let mut details = ExpandedUnit::new("Bowmen", args.moves).with_combat_moves(args.moves);
    if args.ranged {
        details = details.with_ranged_attack(RangedAttack {
            ammo: 8,
            ..Default::default()
        });
    }
    let mover = CombatUnit::new(UnitId(1), ME, origin, details);
    let mut units = vec![mover.clone()];
    for id in 2..6 {
        let at = Coords::new(rng.gen_range(0..width), rng.gen_range(0..wall_y));
        units.push(CombatUnit::new(UnitId(id), THEM, at, ExpandedUnit::new("Orcs", 2)));
    }

    let ctx = CombatContext {
        map: &map,
        units: &units,
        players,
        rules,
        config,
    };
    let grid = calculate_combat_movement(&ctx, &mover, args.moves)?;
    tracing::info!(seed = args.seed, ranged = args.ranged, "Planned combat move");
    Ok((origin, grid))
}

fn print_ascii(origin: Coords, grid: &MovementGrid) {
    for y in 0..grid.height() as i32 {
        let line: String = (0..grid.width() as i32)
            .map(|x| {
                let at = Coords::new(x, y);
                if at == origin {
                    return '@';
                }
                let this_turn = grid.cell(at).is_some_and(|c| c.reachable_this_turn);
                match grid.move_type(at) {
                    MoveType::CannotMove => '#',
                    MoveType::Move if this_turn => '.',
                    MoveType::Move => ',',
                    MoveType::Melee => 'X',
                    MoveType::Ranged => 'R',
                }
            })
            .collect();
        println!("{}", line);
    }
    println!();
    println!("@ start  . this turn  , later turns  X melee  R ranged  # blocked");
}
