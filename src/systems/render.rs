//! Draw intents.
//!
//! Scenes describe what is on screen through the [`Renderer`] trait; the
//! frontend decides how it looks. [`TextRenderer`] is the headless backend
//! used by the command line runner and the tests: every tile becomes a
//! two-character cell, and text, menus and the fade overlay are appended
//! below the map as lines.

use std::f32::consts::TAU;

use crate::components::menu::Menu;
use crate::components::tilegrid::TileKind;
use crate::components::worker::Worker;
use crate::resources::stage::Stage;

pub trait Renderer {
    /// Start a frame for a `width` × `height` tile area.
    fn begin_frame(&mut self, width: i32, height: i32);
    fn draw_tile(&mut self, x: i32, y: i32, kind: TileKind);
    fn draw_worker(&mut self, worker: &Worker, cog_angle: f32);
    fn draw_text(&mut self, text: &str);
    /// Draw `menu` if it is active.
    fn draw_menu(&mut self, menu: &Menu);
    /// Cover the screen; `alpha` is `0.0..=1.0`.
    fn draw_fade(&mut self, alpha: f32);
}

/// Draw the grid and every worker, caught ones included.
///
/// Layers: caught workers, then cogs, then live workers, so a cog covers
/// what it caught and a worker on its way onto a cog is drawn over it.
pub fn draw_stage(renderer: &mut dyn Renderer, stage: &Stage) {
    let grid = stage.grid();
    renderer.begin_frame(grid.width(), grid.height());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            renderer.draw_tile(x, y, grid.tile_at(x, y));
        }
    }
    let workers = stage.workers();
    let dead = workers.iter().filter(|w| w.is_dead());
    let cogs = workers.iter().filter(|w| w.is_cog && !w.is_dead());
    let live = workers.iter().filter(|w| w.is_alive());
    for worker in dead.chain(cogs).chain(live) {
        renderer.draw_worker(worker, stage.cog_angle);
    }
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Character-buffer renderer.
#[derive(Debug, Default, Clone)]
pub struct TextRenderer {
    cells: Vec<Vec<[char; 2]>>,
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        TextRenderer::default()
    }

    /// The frame drawn so far.
    pub fn frame(&self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            let line: String = row.iter().flat_map(|cell| cell.iter()).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Text lines drawn below the map.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut [char; 2]> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
    }
}

impl Renderer for TextRenderer {
    fn begin_frame(&mut self, width: i32, height: i32) {
        let (w, h) = (width.max(0) as usize, height.max(0) as usize);
        self.cells = vec![vec![[' ', ' ']; w]; h];
        self.lines.clear();
    }

    fn draw_tile(&mut self, x: i32, y: i32, kind: TileKind) {
        if let Some(cell) = self.cell_mut(x, y) {
            *cell = match kind {
                TileKind::Floor => ['.', ' '],
                TileKind::Wall => ['#', '#'],
            };
        }
    }

    fn draw_worker(&mut self, worker: &Worker, cog_angle: f32) {
        let (fx, fy) = worker.render_position();
        let letter = worker.color.letter();
        let glyph = if worker.is_dead() {
            [letter.to_ascii_lowercase(), 'x']
        } else if worker.is_cog {
            let turn = cog_angle.rem_euclid(TAU) / TAU;
            let frame = ((turn * SPINNER.len() as f32) as usize).min(SPINNER.len() - 1);
            [letter.to_ascii_uppercase(), SPINNER[frame]]
        } else if worker.sleeping {
            [letter.to_ascii_lowercase(), ' ']
        } else {
            [letter.to_ascii_uppercase(), ' ']
        };
        if let Some(cell) = self.cell_mut(fx.round() as i32, fy.round() as i32) {
            *cell = glyph;
        }
    }

    fn draw_text(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn draw_menu(&mut self, menu: &Menu) {
        if !menu.is_active() {
            return;
        }
        self.lines.push(format!("== {} ==", menu.title));
        for (i, item) in menu.items.iter().enumerate() {
            let marker = if i == menu.cursor { '>' } else { ' ' };
            self.lines.push(format!("{} {}", marker, item.label));
        }
    }

    fn draw_fade(&mut self, alpha: f32) {
        if alpha > 0.0 {
            self.lines
                .push(format!("[fade {:.0}%]", alpha.clamp(0.0, 1.0) * 100.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::menu::MenuItem;
    use crate::components::tilegrid::{Direction, TileGrid};
    use crate::components::worker::{WorkerColor, WorkerSpawn};
    use crate::systems::resolver::{Instruction, MoveRules};
    use bevy_ecs::prelude::World;

    fn noop(_world: &mut World) {}

    #[test]
    fn stage_renders_walls_and_workers() {
        let stage = Stage::new(
            TileGrid::from_ascii(&["#..#"]),
            vec![
                WorkerSpawn::worker(1, 0, WorkerColor::Green),
                WorkerSpawn::sleeper(2, 0, WorkerColor::Blue),
            ],
            MoveRules::default(),
        );
        let mut r = TextRenderer::new();
        draw_stage(&mut r, &stage);
        assert_eq!(r.frame(), "##G b ##\n");
    }

    #[test]
    fn cog_shows_spinner() {
        let mut stage = Stage::new(
            TileGrid::open(1, 1),
            vec![WorkerSpawn::cog(0, 0, WorkerColor::Red)],
            MoveRules::default(),
        );
        stage.cog_angle = 0.0;
        let mut r = TextRenderer::new();
        draw_stage(&mut r, &stage);
        assert_eq!(r.frame(), "R|\n");
    }

    #[derive(Default)]
    struct Tally {
        workers: usize,
        dead: usize,
    }

    impl Renderer for Tally {
        fn begin_frame(&mut self, _width: i32, _height: i32) {}
        fn draw_tile(&mut self, _x: i32, _y: i32, _kind: TileKind) {}
        fn draw_worker(&mut self, worker: &Worker, _cog_angle: f32) {
            self.workers += 1;
            if worker.is_dead() {
                self.dead += 1;
            }
        }
        fn draw_text(&mut self, _text: &str) {}
        fn draw_menu(&mut self, _menu: &Menu) {}
        fn draw_fade(&mut self, _alpha: f32) {}
    }

    fn caught_stage() -> Stage {
        let mut stage = Stage::new(
            TileGrid::open(2, 1),
            vec![
                WorkerSpawn::worker(0, 0, WorkerColor::Red),
                WorkerSpawn::cog(1, 0, WorkerColor::Red),
            ],
            MoveRules::default(),
        );
        stage.tick(0.1, &Instruction::All(Direction::Right));
        while stage.any_moving() {
            stage.tick(0.1, &Instruction::None);
        }
        assert!(stage.workers()[0].is_dead());
        stage
    }

    #[test]
    fn caught_worker_is_still_drawn() {
        let stage = caught_stage();
        let mut tally = Tally::default();
        draw_stage(&mut tally, &stage);
        assert_eq!(tally.workers, 2);
        assert_eq!(tally.dead, 1);
    }

    #[test]
    fn cog_covers_what_it_caught() {
        let stage = caught_stage();
        let mut r = TextRenderer::new();
        draw_stage(&mut r, &stage);
        assert_eq!(r.frame(), ". R|\n");

        let mut dead_only = TextRenderer::new();
        dead_only.begin_frame(2, 1);
        dead_only.draw_worker(&stage.workers()[0], 0.0);
        assert_eq!(dead_only.frame(), "  rx\n");
    }

    #[test]
    fn menus_and_fade_become_lines() {
        let mut menu = Menu::new("Pause", vec![MenuItem::new("Resume", noop), MenuItem::new("Quit", noop)]);
        let mut r = TextRenderer::new();
        r.begin_frame(0, 0);
        r.draw_menu(&menu);
        assert!(r.lines().is_empty());
        menu.activate(Some(1));
        r.draw_menu(&menu);
        r.draw_fade(0.5);
        r.draw_fade(0.0);
        assert_eq!(r.lines(), &["== Pause ==", "  Resume", "> Quit", "[fade 50%]"]);
    }
}
