//! Stage controller resource.
//!
//! A [`Stage`] owns the tile grid and the workers of one puzzle and drives
//! the simulation one tick at a time:
//!
//! 1. hazard pre-pass: resting workers already on a matching cog are caught
//! 2. in-flight moves advance; if nothing was moving when the tick started,
//!    new moves are planned from the instruction against one snapshot
//! 3. the terminal condition is evaluated
//!
//! A cleared stage only reports it through [`TickReport::cleared`]; opening
//! the end-of-stage menu is up to the game scene.

use bevy_ecs::prelude::Resource;
use log::{debug, info};

use crate::components::tilegrid::TileGrid;
use crate::components::worker::{Worker, WorkerSpawn};
use crate::resources::mapstore::MapFile;
use crate::systems::resolver::{
    Instruction, MoveRules, advance_moves, apply_intents, catch_workers, plan_moves,
};

/// Background cog rotation, radians per second.
pub const COG_SPEED: f32 = 3.0;

/// Completion metric of a stage, persisted by the progress store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ClearQuality {
    #[default]
    None = 0,
    Cleared = 1,
    Perfect = 2,
}

impl ClearQuality {
    pub fn metric(self) -> i32 {
        self as i32
    }

    pub fn from_metric(value: i32) -> Self {
        match value {
            v if v >= 2 => ClearQuality::Perfect,
            1 => ClearQuality::Cleared,
            _ => ClearQuality::None,
        }
    }
}

/// What happened during one [`Stage::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// At least one worker started a move (the turn counter advanced).
    pub started_moving: bool,
    /// Workers neutralized during this tick.
    pub neutralized: Vec<usize>,
    /// The stage is cleared.
    pub cleared: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct Stage {
    grid: TileGrid,
    layout: Vec<WorkerSpawn>,
    workers: Vec<Worker>,
    turns: u32,
    move_target: Option<u32>,
    rules: MoveRules,
    /// Cosmetic rotation of the cogs, in radians.
    pub cog_angle: f32,
}

impl Stage {
    pub fn new(grid: TileGrid, layout: Vec<WorkerSpawn>, rules: MoveRules) -> Self {
        let workers = layout.iter().map(Worker::from_spawn).collect();
        Stage {
            grid,
            layout,
            workers,
            turns: 0,
            move_target: None,
            rules,
            cog_angle: 0.0,
        }
    }

    pub fn with_move_target(mut self, target: Option<u32>) -> Self {
        self.move_target = target;
        self
    }

    /// Build a stage from a loaded map.
    pub fn from_map(map: &MapFile, rules: MoveRules) -> Self {
        Stage::new(map.grid(), map.spawns(), rules).with_move_target(map.move_target)
    }

    /// Rebuild the workers from the map-defined layout. The tile grid is kept.
    pub fn reset(&mut self) {
        self.workers = self.layout.iter().map(Worker::from_spawn).collect();
        self.turns = 0;
        debug!("Stage reset: {} workers", self.workers.len());
    }

    /// Reload grid, layout and move target from `map`, then reset.
    pub fn hard_reset(&mut self, map: &MapFile) {
        self.grid = map.grid();
        self.layout = map.spawns();
        self.move_target = map.move_target;
        self.cog_angle = 0.0;
        self.reset();
        info!(
            "Stage '{}' loaded: {}x{}, {} workers",
            map.name,
            self.grid.width(),
            self.grid.height(),
            self.workers.len()
        );
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Mutable access for scripted setups; the resolver invariants are the
    /// caller's responsibility.
    pub fn workers_mut(&mut self) -> &mut [Worker] {
        &mut self.workers
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn move_target(&self) -> Option<u32> {
        self.move_target
    }

    pub fn rules(&self) -> &MoveRules {
        &self.rules
    }

    pub fn any_moving(&self) -> bool {
        self.workers.iter().any(Worker::is_moving)
    }

    /// Non-cog workers that are not dead.
    pub fn alive_count(&self) -> usize {
        self.workers.iter().filter(|w| w.is_alive()).count()
    }

    /// Victory: no non-cog worker is left and nothing is mid-move.
    pub fn is_cleared(&self) -> bool {
        self.alive_count() == 0 && !self.any_moving()
    }

    /// Quality of the clear; [`ClearQuality::None`] while not cleared.
    pub fn clear_quality(&self) -> ClearQuality {
        if !self.is_cleared() {
            return ClearQuality::None;
        }
        match self.move_target {
            Some(target) if self.turns <= target => ClearQuality::Perfect,
            _ => ClearQuality::Cleared,
        }
    }

    /// Run one simulation tick.
    pub fn tick(&mut self, dt: f32, instruction: &Instruction) -> TickReport {
        let mut report = TickReport::default();

        // Pre-update: resting workers already standing on a matching cog.
        report.neutralized.extend(catch_workers(&mut self.workers, None));

        if self.any_moving() {
            report
                .neutralized
                .extend(advance_moves(&mut self.workers, &self.rules, dt));
        } else if !instruction.is_none() {
            let intents = plan_moves(&self.grid, &self.workers, &self.rules, instruction);
            if apply_intents(&mut self.workers, &intents) > 0 {
                self.turns += 1;
                report.started_moving = true;
                debug!("Turn {}: {} moves started", self.turns, intents.len());
            }
        }

        report.cleared = self.is_cleared();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tilegrid::{Direction, Point, TileKind};
    use crate::components::worker::{MoveState, WorkerColor};
    use crate::resources::mapstore::MapWorker;

    fn rules() -> MoveRules {
        MoveRules {
            move_duration: 0.5,
            push_limit: 1,
        }
    }

    fn settle(stage: &mut Stage) -> Vec<TickReport> {
        let mut reports = Vec::new();
        while stage.any_moving() {
            reports.push(stage.tick(0.25, &Instruction::None));
        }
        reports
    }

    #[test]
    fn turn_counter_counts_started_moves() {
        let mut stage = Stage::new(
            TileGrid::open(4, 1),
            vec![WorkerSpawn::worker(0, 0, WorkerColor::Red)],
            rules(),
        );
        let report = stage.tick(0.25, &Instruction::All(Direction::Right));
        assert!(report.started_moving);
        assert_eq!(stage.turns(), 1);
        settle(&mut stage);
        assert_eq!(stage.workers()[0].position, Point::new(1, 0));

        // Rejected moves do not count.
        let mut blocked = Stage::new(
            TileGrid::open(1, 1),
            vec![WorkerSpawn::worker(0, 0, WorkerColor::Red)],
            rules(),
        );
        let report = blocked.tick(0.25, &Instruction::All(Direction::Right));
        assert!(!report.started_moving);
        assert_eq!(blocked.turns(), 0);
    }

    #[test]
    fn no_new_instruction_while_moving() {
        let mut stage = Stage::new(
            TileGrid::open(4, 4),
            vec![WorkerSpawn::worker(0, 0, WorkerColor::Red)],
            rules(),
        );
        stage.tick(0.25, &Instruction::All(Direction::Right));
        stage.tick(0.25, &Instruction::All(Direction::Down));
        assert_eq!(stage.workers()[0].target, Point::new(1, 0));
        assert_eq!(stage.turns(), 1);
    }

    #[test]
    fn clear_and_quality() {
        let mut stage = Stage::new(
            TileGrid::open(3, 1),
            vec![
                WorkerSpawn::worker(0, 0, WorkerColor::Blue),
                WorkerSpawn::cog(1, 0, WorkerColor::Blue),
            ],
            rules(),
        )
        .with_move_target(Some(1));
        assert!(!stage.tick(0.25, &Instruction::All(Direction::Right)).cleared);
        let reports = settle(&mut stage);
        let last = reports.last().expect("at least one tick");
        assert!(last.cleared);
        assert_eq!(last.neutralized, vec![0]);
        assert_eq!(stage.clear_quality(), ClearQuality::Perfect);

        stage.reset();
        assert_eq!(stage.workers()[0].move_state, MoveState::Idle);
        assert_eq!(stage.turns(), 0);
        assert_eq!(stage.clear_quality(), ClearQuality::None);
    }

    #[test]
    fn over_target_is_plain_clear() {
        let mut stage = Stage::new(
            TileGrid::open(3, 1),
            vec![
                WorkerSpawn::worker(0, 0, WorkerColor::Blue),
                WorkerSpawn::cog(2, 0, WorkerColor::Blue),
            ],
            rules(),
        )
        .with_move_target(Some(1));
        for _ in 0..2 {
            stage.tick(0.25, &Instruction::All(Direction::Right));
            settle(&mut stage);
        }
        assert!(stage.is_cleared());
        assert_eq!(stage.turns(), 2);
        assert_eq!(stage.clear_quality(), ClearQuality::Cleared);
    }

    #[test]
    fn pre_pass_catches_resting_worker() {
        let mut stage = Stage::new(
            TileGrid::open(2, 1),
            vec![
                WorkerSpawn::worker(0, 0, WorkerColor::Yellow),
                WorkerSpawn::cog(0, 0, WorkerColor::Yellow),
            ],
            rules(),
        );
        let report = stage.tick(0.25, &Instruction::None);
        assert_eq!(report.neutralized, vec![0]);
        assert!(report.cleared);
    }

    #[test]
    fn hard_reset_loads_another_map() {
        let mut stage = Stage::new(
            TileGrid::open(4, 1),
            vec![WorkerSpawn::worker(0, 0, WorkerColor::Red)],
            rules(),
        )
        .with_move_target(Some(9));
        stage.tick(0.25, &Instruction::All(Direction::Right));
        settle(&mut stage);
        stage.cog_angle = 1.5;
        assert_eq!(stage.turns(), 1);

        let map = MapFile {
            name: "other".into(),
            difficulty: 2,
            move_target: Some(3),
            width: 2,
            height: 2,
            tiles: vec![0, 1, 0, 0],
            workers: vec![
                MapWorker {
                    x: 0,
                    y: 1,
                    color: WorkerColor::Blue,
                    sleeping: true,
                    cog: false,
                },
                MapWorker {
                    x: 1,
                    y: 1,
                    color: WorkerColor::Blue,
                    sleeping: false,
                    cog: true,
                },
            ],
        };
        stage.hard_reset(&map);

        assert_eq!((stage.grid().width(), stage.grid().height()), (2, 2));
        assert_eq!(stage.grid().tile_at(1, 0), TileKind::Wall);
        assert_eq!(stage.move_target(), Some(3));
        assert_eq!(stage.turns(), 0);
        assert_eq!(stage.cog_angle, 0.0);
        let workers = stage.workers();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].position, Point::new(0, 1));
        assert!(workers[0].sleeping);
        assert!(workers[1].is_cog);

        // The new layout is what a plain reset rebuilds.
        stage.workers_mut()[0].kill();
        stage.reset();
        assert_eq!(stage.workers()[0].position, Point::new(0, 1));
        assert_eq!(stage.alive_count(), 1);
    }

    #[test]
    fn metric_round_trip() {
        for q in [ClearQuality::None, ClearQuality::Cleared, ClearQuality::Perfect] {
            assert_eq!(ClearQuality::from_metric(q.metric()), q);
        }
        assert_eq!(ClearQuality::from_metric(-3), ClearQuality::None);
        assert!(ClearQuality::Perfect > ClearQuality::Cleared);
    }
}
