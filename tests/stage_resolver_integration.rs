//! Stage tick integration tests for movement, pushing, cogs and victory.

use cogworks::components::tilegrid::{Direction, Point, TileGrid, TileKind};
use cogworks::components::worker::{MoveState, WorkerColor, WorkerSpawn};
use cogworks::resources::stage::{ClearQuality, Stage};
use cogworks::systems::resolver::{Instruction, MoveRules};
use rustc_hash::FxHashSet;

const DT: f32 = 0.05;
const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];
const COLORS: [WorkerColor; 4] = [
    WorkerColor::Red,
    WorkerColor::Green,
    WorkerColor::Blue,
    WorkerColor::Yellow,
];

fn rules(push_limit: usize) -> MoveRules {
    MoveRules {
        move_duration: 0.1,
        push_limit,
    }
}

fn make_stage(rows: &[&str], spawns: Vec<WorkerSpawn>) -> Stage {
    Stage::new(TileGrid::from_ascii(rows), spawns, rules(1))
}

/// Tick with no new instruction until every move has landed.
fn settle(stage: &mut Stage) {
    for _ in 0..100 {
        if !stage.any_moving() {
            return;
        }
        stage.tick(DT, &Instruction::None);
    }
    panic!("stage never came to rest");
}

/// Start one turn and let it finish.
fn turn(stage: &mut Stage, instruction: Instruction) {
    stage.tick(DT, &instruction);
    settle(stage);
}

fn position(stage: &Stage, index: usize) -> Point {
    stage.workers()[index].position
}

// ==================== GRID ====================

#[test]
fn outside_the_grid_is_wall() {
    let grid = TileGrid::from_ascii(&["..", ".#"]);
    assert_eq!(grid.tile_at(-1, 0), TileKind::Wall);
    assert_eq!(grid.tile_at(2, 0), TileKind::Wall);
    assert_eq!(grid.tile_at(0, 2), TileKind::Wall);
    assert_eq!(grid.tile_at(1, 1), TileKind::Wall);
    assert_eq!(grid.tile_at(0, 1), TileKind::Floor);
}

#[test]
fn worker_stops_at_grid_edge() {
    let mut stage = make_stage(&["..."], vec![WorkerSpawn::worker(0, 0, WorkerColor::Red)]);
    turn(&mut stage, Instruction::All(Direction::Left));
    assert_eq!(position(&stage, 0), Point::new(0, 0));
    assert_eq!(stage.turns(), 0);
}

// ==================== COLLISIONS ====================

#[test]
fn facing_workers_do_not_swap() {
    let mut stage = make_stage(
        &["..."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::worker(1, 0, WorkerColor::Green),
        ],
    );
    turn(
        &mut stage,
        Instruction::PerWorker(vec![Some(Direction::Right), Some(Direction::Left)]),
    );
    assert_eq!(position(&stage, 0), Point::new(0, 0));
    assert_eq!(position(&stage, 1), Point::new(1, 0));
}

#[test]
fn follower_waits_for_the_leader() {
    let mut stage = make_stage(
        &["...."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::worker(1, 0, WorkerColor::Red),
        ],
    );
    turn(&mut stage, Instruction::All(Direction::Right));
    // The follower's target was occupied when the turn started.
    assert_eq!(position(&stage, 0), Point::new(0, 0));
    assert_eq!(position(&stage, 1), Point::new(2, 0));
}

#[test]
fn contested_tile_rejects_every_claimant() {
    let mut stage = make_stage(
        &["...", "...", "..."],
        vec![
            WorkerSpawn::worker(1, 0, WorkerColor::Red),
            WorkerSpawn::worker(0, 1, WorkerColor::Green),
            WorkerSpawn::worker(2, 1, WorkerColor::Blue),
        ],
    );
    turn(
        &mut stage,
        Instruction::PerWorker(vec![
            Some(Direction::Down),
            Some(Direction::Right),
            Some(Direction::Left),
        ]),
    );
    assert_eq!(position(&stage, 0), Point::new(1, 0));
    assert_eq!(position(&stage, 1), Point::new(0, 1));
    assert_eq!(position(&stage, 2), Point::new(2, 1));
    assert_eq!(stage.turns(), 0);
}

#[test]
fn colour_instruction_moves_only_that_colour() {
    let mut stage = make_stage(
        &["...", "..."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::worker(0, 1, WorkerColor::Blue),
        ],
    );
    turn(&mut stage, Instruction::Color(WorkerColor::Blue, Direction::Right));
    assert_eq!(position(&stage, 0), Point::new(0, 0));
    assert_eq!(position(&stage, 1), Point::new(1, 1));
}

// ==================== PUSHING ====================

#[test]
fn worker_pushes_a_sleeper() {
    let mut stage = make_stage(
        &["..."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::sleeper(1, 0, WorkerColor::Green),
        ],
    );
    turn(&mut stage, Instruction::All(Direction::Right));
    assert_eq!(position(&stage, 0), Point::new(1, 0));
    assert_eq!(position(&stage, 1), Point::new(2, 0));
    assert_eq!(stage.turns(), 1);
}

#[test]
fn push_into_wall_is_rejected() {
    let mut stage = make_stage(
        &["..#"],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::sleeper(1, 0, WorkerColor::Green),
        ],
    );
    turn(&mut stage, Instruction::All(Direction::Right));
    assert_eq!(position(&stage, 0), Point::new(0, 0));
    assert_eq!(position(&stage, 1), Point::new(1, 0));

    // The grid edge behaves the same.
    let mut edge = make_stage(
        &[".."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::sleeper(1, 0, WorkerColor::Green),
        ],
    );
    turn(&mut edge, Instruction::All(Direction::Right));
    assert_eq!(position(&edge, 1), Point::new(1, 0));
}

#[test]
fn push_chain_respects_the_limit() {
    let spawns = vec![
        WorkerSpawn::worker(0, 0, WorkerColor::Red),
        WorkerSpawn::sleeper(1, 0, WorkerColor::Green),
        WorkerSpawn::sleeper(2, 0, WorkerColor::Green),
    ];

    let mut short = Stage::new(TileGrid::open(4, 1), spawns.clone(), rules(1));
    turn(&mut short, Instruction::All(Direction::Right));
    assert_eq!(position(&short, 0), Point::new(0, 0));

    let mut long = Stage::new(TileGrid::open(4, 1), spawns.clone(), rules(2));
    turn(&mut long, Instruction::All(Direction::Right));
    assert_eq!(position(&long, 0), Point::new(1, 0));
    assert_eq!(position(&long, 1), Point::new(2, 0));
    assert_eq!(position(&long, 2), Point::new(3, 0));

    let mut none = Stage::new(TileGrid::open(4, 1), spawns[..2].to_vec(), rules(0));
    turn(&mut none, Instruction::All(Direction::Right));
    assert_eq!(position(&none, 0), Point::new(0, 0));
}

#[test]
fn awake_workers_cannot_be_pushed() {
    let mut stage = make_stage(
        &["...."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::worker(1, 0, WorkerColor::Green),
        ],
    );
    turn(&mut stage, Instruction::Color(WorkerColor::Red, Direction::Right));
    assert_eq!(position(&stage, 0), Point::new(0, 0));
    assert_eq!(position(&stage, 1), Point::new(1, 0));
}

// ==================== COGS ====================

#[test]
fn matching_cog_catches_and_other_cogs_block() {
    let mut stage = make_stage(
        &["...", "..."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::cog(1, 0, WorkerColor::Red),
            WorkerSpawn::worker(0, 1, WorkerColor::Green),
            WorkerSpawn::cog(1, 1, WorkerColor::Blue),
        ],
    );
    turn(&mut stage, Instruction::All(Direction::Right));
    assert_eq!(stage.workers()[0].move_state, MoveState::Dead);
    assert_eq!(position(&stage, 0), Point::new(1, 0));
    assert_eq!(stage.workers()[2].move_state, MoveState::Idle);
    assert_eq!(position(&stage, 2), Point::new(0, 1));
    // Cogs never move.
    assert_eq!(position(&stage, 1), Point::new(1, 0));
    assert_eq!(position(&stage, 3), Point::new(1, 1));
}

#[test]
fn sleeper_pushed_onto_its_cog_is_caught() {
    let mut stage = make_stage(
        &["..."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::sleeper(1, 0, WorkerColor::Blue),
            WorkerSpawn::cog(2, 0, WorkerColor::Blue),
        ],
    );
    turn(&mut stage, Instruction::All(Direction::Right));
    assert!(stage.workers()[1].is_dead());
    assert!(!stage.workers()[0].is_dead());
    assert_eq!(stage.alive_count(), 1);
}

// ==================== VICTORY ====================

#[test]
fn victory_needs_every_worker_caught() {
    let mut stage = make_stage(
        &["..", ".."],
        vec![
            WorkerSpawn::worker(0, 0, WorkerColor::Red),
            WorkerSpawn::cog(1, 0, WorkerColor::Red),
            WorkerSpawn::worker(0, 1, WorkerColor::Green),
            WorkerSpawn::cog(1, 1, WorkerColor::Green),
        ],
    )
    .with_move_target(Some(1));
    assert!(!stage.is_cleared());
    turn(&mut stage, Instruction::All(Direction::Right));
    assert!(stage.is_cleared());
    assert_eq!(stage.clear_quality(), ClearQuality::Perfect);

    // Undo one capture and the stage is no longer won.
    for index in [0, 2] {
        let mut revived = stage.clone();
        revived.workers_mut()[index].move_state = MoveState::Idle;
        assert!(!revived.is_cleared());
        assert_eq!(revived.clear_quality(), ClearQuality::None);
    }
}

#[test]
fn stage_without_workers_is_cleared() {
    let stage = make_stage(&["."], vec![WorkerSpawn::cog(0, 0, WorkerColor::Red)]);
    assert!(stage.is_cleared());
}

// ==================== RANDOMIZED ====================

fn random_stage(rng: &mut fastrand::Rng) -> Stage {
    let (width, height) = (rng.i32(3..8), rng.i32(3..7));
    let rows: Vec<String> = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| if rng.f32() < 0.2 { '#' } else { '.' })
                .collect()
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let grid = TileGrid::from_ascii(&rows);

    let mut free: Vec<Point> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Point::new(x, y)))
        .filter(|p| grid.tile_at_point(*p) == TileKind::Floor)
        .collect();
    rng.shuffle(&mut free);
    let count = rng.usize(0..=free.len().min(8));
    let spawns = free[..count]
        .iter()
        .map(|p| {
            let color = COLORS[rng.usize(..COLORS.len())];
            match rng.u8(0..4) {
                0 => WorkerSpawn::cog(p.x, p.y, color),
                1 => WorkerSpawn::sleeper(p.x, p.y, color),
                _ => WorkerSpawn::worker(p.x, p.y, color),
            }
        })
        .collect();
    Stage::new(grid, spawns, rules(rng.usize(0..3)))
}

fn random_instruction(rng: &mut fastrand::Rng, workers: usize) -> Instruction {
    let dir = DIRECTIONS[rng.usize(..DIRECTIONS.len())];
    match rng.u8(0..3) {
        0 => Instruction::All(dir),
        1 => Instruction::Color(COLORS[rng.usize(..COLORS.len())], dir),
        _ => Instruction::PerWorker(
            (0..workers)
                .map(|_| rng.bool().then(|| DIRECTIONS[rng.usize(..DIRECTIONS.len())]))
                .collect(),
        ),
    }
}

fn assert_rest_invariants(stage: &Stage, before_alive: usize, before_turns: u32) {
    let mut occupied = FxHashSet::default();
    for (i, w) in stage.workers().iter().enumerate() {
        assert_eq!(
            stage.grid().tile_at_point(w.position),
            TileKind::Floor,
            "worker {i} ended in a wall"
        );
        if !w.is_dead() {
            assert!(
                occupied.insert(w.position),
                "worker {i} shares {:?}",
                w.position
            );
        }
    }
    assert!(stage.alive_count() <= before_alive);
    assert!(stage.turns() >= before_turns);
    assert_eq!(stage.is_cleared(), stage.alive_count() == 0);
}

#[test]
fn random_turns_keep_the_board_consistent() {
    for seed in 0..200 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut stage = random_stage(&mut rng);
        let cogs: Vec<Point> = stage
            .workers()
            .iter()
            .filter(|w| w.is_cog)
            .map(|w| w.position)
            .collect();
        for _ in 0..30 {
            let (alive, turns) = (stage.alive_count(), stage.turns());
            let instruction = random_instruction(&mut rng, stage.workers().len());
            turn(&mut stage, instruction);
            assert_rest_invariants(&stage, alive, turns);
        }
        let after: Vec<Point> = stage
            .workers()
            .iter()
            .filter(|w| w.is_cog)
            .map(|w| w.position)
            .collect();
        assert_eq!(cogs, after, "seed {seed}: a cog moved");
    }
}

#[test]
fn reset_restores_the_layout() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut stage = random_stage(&mut rng);
    let initial: Vec<Point> = stage.workers().iter().map(|w| w.position).collect();
    for _ in 0..10 {
        let instruction = random_instruction(&mut rng, stage.workers().len());
        turn(&mut stage, instruction);
    }
    stage.reset();
    let positions: Vec<Point> = stage.workers().iter().map(|w| w.position).collect();
    assert_eq!(positions, initial);
    assert_eq!(stage.turns(), 0);
    assert!(stage.workers().iter().all(|w| !w.is_dead()));
}
