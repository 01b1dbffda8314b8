//! Tile grid of a stage.
//!
//! A [`TileGrid`] is built once when a stage is loaded and never mutated
//! afterwards. Queries outside the grid report [`TileKind::Wall`], so the
//! movement resolver treats the border exactly like any other wall.

use serde::{Deserialize, Serialize};

/// Integer tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Tile reached by taking one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The four grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector of the direction; `y` grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Classification of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
}

impl TileKind {
    /// Map file encoding: `1` is a wall, everything else is floor.
    pub fn from_id(id: u8) -> Self {
        if id == 1 { TileKind::Wall } else { TileKind::Floor }
    }
}

/// Read-only, row-major tile storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    cells: Vec<TileKind>,
}

impl TileGrid {
    /// Build a grid from row-major cells.
    ///
    /// Returns `None` when `cells` does not hold exactly `width * height`
    /// entries or a dimension is negative.
    pub fn from_cells(width: i32, height: i32, cells: Vec<TileKind>) -> Option<Self> {
        if width < 0 || height < 0 || cells.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(TileGrid {
            width,
            height,
            cells,
        })
    }

    /// A grid of `width * height` floor tiles.
    pub fn open(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        TileGrid {
            width: w,
            height: h,
            cells: vec![TileKind::Floor; (w as usize) * (h as usize)],
        }
    }

    /// Parse an ASCII picture: `#` is a wall, anything else is floor.
    /// Rows shorter than the widest row are padded with floor.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in rows {
            let mut count = 0;
            for ch in row.chars() {
                cells.push(if ch == '#' {
                    TileKind::Wall
                } else {
                    TileKind::Floor
                });
                count += 1;
            }
            for _ in count..width {
                cells.push(TileKind::Floor);
            }
        }
        TileGrid {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Tile at `(x, y)`; anything outside the grid is a wall.
    pub fn tile_at(&self, x: i32, y: i32) -> TileKind {
        if !self.in_bounds(x, y) {
            return TileKind::Wall;
        }
        self.cells[(y * self.width + x) as usize]
    }

    pub fn tile_at_point(&self, p: Point) -> TileKind {
        self.tile_at(p.x, p.y)
    }
}
