//! Worker data.
//!
//! A [`Worker`] is a grid-bound entity moved by the turn resolver
//! ([`crate::systems::resolver`]). Cogs are workers too: they never move,
//! but they neutralize ordinary workers of the same [`WorkerColor`] that end
//! a move on their tile.

use serde::{Deserialize, Serialize};

use crate::components::tilegrid::Point;

/// Matching group of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerColor {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
}

impl WorkerColor {
    /// Single-letter tag used by the text renderer.
    pub fn letter(self) -> char {
        match self {
            WorkerColor::Red => 'r',
            WorkerColor::Green => 'g',
            WorkerColor::Blue => 'b',
            WorkerColor::Yellow => 'y',
        }
    }
}

/// Motion state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveState {
    #[default]
    Idle,
    Moving,
    Dead,
}

/// Initial placement of a worker, as defined by a stage map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSpawn {
    pub position: Point,
    pub color: WorkerColor,
    pub sleeping: bool,
    pub is_cog: bool,
}

impl WorkerSpawn {
    pub fn worker(x: i32, y: i32, color: WorkerColor) -> Self {
        WorkerSpawn {
            position: Point::new(x, y),
            color,
            sleeping: false,
            is_cog: false,
        }
    }

    pub fn sleeper(x: i32, y: i32, color: WorkerColor) -> Self {
        WorkerSpawn {
            sleeping: true,
            ..WorkerSpawn::worker(x, y, color)
        }
    }

    pub fn cog(x: i32, y: i32, color: WorkerColor) -> Self {
        WorkerSpawn {
            is_cog: true,
            ..WorkerSpawn::worker(x, y, color)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    /// Resting tile. While moving this is still the tile the move started from.
    pub position: Point,
    /// Destination of the current move; equals `position` when not moving.
    pub target: Point,
    pub color: WorkerColor,
    /// Sleeping workers never start a move on their own but can be pushed.
    pub sleeping: bool,
    pub is_cog: bool,
    pub move_state: MoveState,
    /// Interpolation fraction of the current move in `[0, 1]`.
    pub move_progress: f32,
}

impl Worker {
    pub fn from_spawn(spawn: &WorkerSpawn) -> Self {
        Worker {
            position: spawn.position,
            target: spawn.position,
            color: spawn.color,
            sleeping: spawn.sleeping,
            is_cog: spawn.is_cog,
            move_state: MoveState::Idle,
            move_progress: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.move_state == MoveState::Dead
    }

    pub fn is_moving(&self) -> bool {
        self.move_state == MoveState::Moving
    }

    /// Counts towards the victory condition: a non-cog worker that is not dead.
    pub fn is_alive(&self) -> bool {
        !self.is_cog && !self.is_dead()
    }

    /// Whether this worker is neutralized by `cog`.
    pub fn is_caught_by(&self, cog: &Worker) -> bool {
        cog.is_cog && !self.is_cog && !self.is_dead() && cog.color == self.color
    }

    /// Begin a move towards `target`.
    pub fn start_move(&mut self, target: Point) {
        self.target = target;
        self.move_state = MoveState::Moving;
        self.move_progress = 0.0;
    }

    /// Advance the current move by `step`. Returns `true` when the move
    /// completed and the new position was committed.
    pub fn advance(&mut self, step: f32) -> bool {
        if !self.is_moving() {
            return false;
        }
        self.move_progress = (self.move_progress + step).min(1.0);
        if self.move_progress >= 1.0 {
            self.position = self.target;
            self.move_state = MoveState::Idle;
            self.move_progress = 0.0;
            return true;
        }
        false
    }

    pub fn kill(&mut self) {
        self.target = self.position;
        self.move_state = MoveState::Dead;
        self.move_progress = 0.0;
    }

    /// Interpolated position in tile units, for drawing.
    pub fn render_position(&self) -> (f32, f32) {
        let t = if self.is_moving() {
            self.move_progress
        } else {
            0.0
        };
        (
            self.position.x as f32 + (self.target.x - self.position.x) as f32 * t,
            self.position.y as f32 + (self.target.y - self.position.y) as f32 * t,
        )
    }
}
