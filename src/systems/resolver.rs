//! Worker movement and collision resolver.
//!
//! Moves are decided in two phases against one start-of-tick snapshot of the
//! occupancy ([`Occupancy`]):
//!
//! 1. [`plan_moves`] turns the instruction of every eligible worker into a
//!    [`MoveIntent`] (a mover plus the chain of sleeping workers it pushes),
//!    rejecting moves into walls, immovable occupants and over-long chains.
//! 2. Intents that claim the same destination tile are all dropped, and the
//!    survivors are applied together by [`apply_intents`].
//!
//! Nothing is written to the workers until every decision of the tick has
//! been taken, so iteration order never changes the outcome and two workers
//! can never swap tiles.
//!
//! [`advance_moves`] drives in-flight moves and applies the cog hazard on
//! arrival; [`catch_workers`] applies it to resting workers.

use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::tilegrid::{Direction, Point, TileGrid, TileKind};
use crate::components::worker::{Worker, WorkerColor};

/// Tunables of the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRules {
    /// Seconds a single tile move takes.
    pub move_duration: f32,
    /// Longest chain of sleeping workers a mover may push. `0` disables pushing.
    pub push_limit: usize,
}

impl Default for MoveRules {
    fn default() -> Self {
        MoveRules {
            move_duration: 0.2,
            push_limit: 1,
        }
    }
}

/// Where each worker gets its direction from during a tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Instruction {
    #[default]
    None,
    /// Every awake worker moves the same way.
    All(Direction),
    /// Only awake workers of one colour move.
    Color(WorkerColor, Direction),
    /// One entry per worker index; missing entries mean "stay".
    PerWorker(Vec<Option<Direction>>),
}

impl Instruction {
    /// Direction requested for the worker at `index`, if it may self-direct.
    pub fn direction_for(&self, index: usize, worker: &Worker) -> Option<Direction> {
        if worker.sleeping || worker.is_cog || worker.is_dead() || worker.is_moving() {
            return None;
        }
        match self {
            Instruction::None => None,
            Instruction::All(dir) => Some(*dir),
            Instruction::Color(color, dir) => (worker.color == *color).then_some(*dir),
            Instruction::PerWorker(dirs) => dirs.get(index).copied().flatten(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Instruction::None)
    }
}

/// Start-of-tick snapshot: tile -> indices of the non-dead workers on it.
#[derive(Debug, Default)]
pub struct Occupancy {
    tiles: FxHashMap<Point, SmallVec<[usize; 2]>>,
}

impl Occupancy {
    pub fn snapshot(workers: &[Worker]) -> Self {
        let mut tiles: FxHashMap<Point, SmallVec<[usize; 2]>> = FxHashMap::default();
        for (i, w) in workers.iter().enumerate() {
            if !w.is_dead() {
                tiles.entry(w.position).or_default().push(i);
            }
        }
        Occupancy { tiles }
    }

    pub fn occupants(&self, p: Point) -> &[usize] {
        self.tiles.get(&p).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Whether `worker` may end a move on `p`: not a wall, and every occupant
    /// is a cog of the worker's colour.
    pub fn is_enterable(&self, grid: &TileGrid, workers: &[Worker], worker: &Worker, p: Point) -> bool {
        if grid.tile_at_point(p) == TileKind::Wall {
            return false;
        }
        self.occupants(p)
            .iter()
            .all(|&o| worker.is_caught_by(&workers[o]))
    }
}

/// A planned move: the mover first, followed by every pushed worker.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveIntent {
    pub steps: SmallVec<[(usize, Point); 2]>,
}

impl MoveIntent {
    pub fn mover(&self) -> usize {
        self.steps[0].0
    }

    pub fn pushed(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().skip(1).map(|(i, _)| *i)
    }
}

/// Decide the move of one worker against the snapshot. `None` means the move
/// is rejected and the worker stays idle.
pub fn plan_move(
    grid: &TileGrid,
    workers: &[Worker],
    occupancy: &Occupancy,
    rules: &MoveRules,
    index: usize,
    direction: Direction,
) -> Option<MoveIntent> {
    let mover = &workers[index];
    let target = mover.position.step(direction);

    if grid.tile_at_point(target) == TileKind::Wall {
        trace!("worker {index}: {target:?} is a wall");
        return None;
    }

    let mut steps: SmallVec<[(usize, Point); 2]> = SmallVec::new();
    steps.push((index, target));

    if occupancy.is_enterable(grid, workers, mover, target) {
        return Some(MoveIntent { steps });
    }

    // Walk the chain of sleeping workers in front of the mover.
    let mut cursor = target;
    loop {
        let occupants = occupancy.occupants(cursor);
        let [pushed] = occupants else {
            trace!("worker {index}: {cursor:?} holds {} occupants", occupants.len());
            return None;
        };
        let pushed = *pushed;
        let candidate = &workers[pushed];
        if !candidate.sleeping || candidate.is_cog {
            trace!("worker {index}: worker {pushed} cannot be pushed");
            return None;
        }
        if steps.len() > rules.push_limit {
            trace!("worker {index}: push chain exceeds {}", rules.push_limit);
            return None;
        }
        let beyond = cursor.step(direction);
        if grid.tile_at_point(beyond) == TileKind::Wall {
            trace!("worker {index}: push of worker {pushed} blocked by wall at {beyond:?}");
            return None;
        }
        steps.push((pushed, beyond));
        if occupancy.is_enterable(grid, workers, candidate, beyond) {
            return Some(MoveIntent { steps });
        }
        cursor = beyond;
    }
}

/// Plan the moves of every worker for this tick against one snapshot, then
/// drop every intent that contends for a destination tile.
pub fn plan_moves(
    grid: &TileGrid,
    workers: &[Worker],
    rules: &MoveRules,
    instruction: &Instruction,
) -> Vec<MoveIntent> {
    let occupancy = Occupancy::snapshot(workers);

    let intents: Vec<MoveIntent> = workers
        .iter()
        .enumerate()
        .filter_map(|(i, w)| {
            let dir = instruction.direction_for(i, w)?;
            plan_move(grid, workers, &occupancy, rules, i, dir)
        })
        .collect();

    // Claims on destination tiles and on workers (a sleeper cannot be pushed
    // by two movers at once).
    let mut tile_claims: FxHashMap<Point, usize> = FxHashMap::default();
    let mut worker_claims: FxHashMap<usize, usize> = FxHashMap::default();
    for intent in &intents {
        for (worker, dest) in &intent.steps {
            *tile_claims.entry(*dest).or_default() += 1;
            *worker_claims.entry(*worker).or_default() += 1;
        }
    }

    intents
        .into_iter()
        .filter(|intent| {
            let contested = intent
                .steps
                .iter()
                .any(|(w, dest)| tile_claims[dest] > 1 || worker_claims[w] > 1);
            if contested {
                trace!("worker {}: destination contested", intent.mover());
            }
            !contested
        })
        .collect()
}

/// Commit planned intents: every listed worker starts moving in lockstep.
/// Returns the number of movers that started.
pub fn apply_intents(workers: &mut [Worker], intents: &[MoveIntent]) -> usize {
    for intent in intents {
        for (worker, dest) in &intent.steps {
            workers[*worker].start_move(*dest);
        }
    }
    intents.len()
}

/// Advance in-flight moves. Workers that arrive on a matching cog are
/// neutralized. Returns the indices neutralized by this call.
pub fn advance_moves(workers: &mut [Worker], rules: &MoveRules, dt: f32) -> Vec<usize> {
    let step = if rules.move_duration > 0.0 {
        dt / rules.move_duration
    } else {
        1.0
    };
    let mut arrived = Vec::new();
    for (i, w) in workers.iter_mut().enumerate() {
        if w.advance(step) {
            arrived.push(i);
        }
    }
    if arrived.is_empty() {
        return arrived;
    }
    catch_workers(workers, Some(&arrived))
}

/// Neutralize resting workers that share a tile with a cog of their colour.
/// With `only` set, only those indices are checked. Returns the indices
/// neutralized.
pub fn catch_workers(workers: &mut [Worker], only: Option<&[usize]>) -> Vec<usize> {
    let candidates: Vec<usize> = match only {
        Some(list) => list.to_vec(),
        None => (0..workers.len()).collect(),
    };
    let caught: Vec<usize> = candidates
        .into_iter()
        .filter(|&i| {
            let w = &workers[i];
            !w.is_moving()
                && workers
                    .iter()
                    .any(|cog| !cog.is_moving() && cog.position == w.position && w.is_caught_by(cog))
        })
        .collect();
    for &i in &caught {
        trace!("worker {i} caught by a cog at {:?}", workers[i].position);
        workers[i].kill();
    }
    caught
}
