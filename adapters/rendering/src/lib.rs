#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tower Defense adapters.
//!
//! The renderer rasterizes a [`GameSnapshot`] into a fixed character grid: the
//! playfield on the left, a sidebar on the right and a HUD line along the
//! bottom border. Backends only need to put the finished [`TextFrame`] on
//! screen.

use std::fmt;

use anyhow::Result as AnyResult;
use glam::{DVec2, IVec2};
use tower_defense_core::{
    GameSnapshot, Position, SessionStats, TowerKind, GAME_TITLE, WORLD_HEIGHT, WORLD_WIDTH,
};

/// Number of character columns in a frame.
pub const GRID_WIDTH: usize = 100;
/// Number of character rows in a frame.
pub const GRID_HEIGHT: usize = 30;
/// Columns reserved for the sidebar, separator included.
pub const SIDEBAR_WIDTH: usize = 25;
/// Rows taken by the title bar and its borders.
pub const HUD_HEIGHT: usize = 3;

/// Character used for every border.
pub const BORDER_GLYPH: char = '█';
/// Character used for path cells.
pub const PATH_GLYPH: char = '.';
/// Character used for enemies.
pub const ENEMY_GLYPH: char = 'E';

const BLANK: char = ' ';
const SIDEBAR_COLUMN: usize = GRID_WIDTH - SIDEBAR_WIDTH + 1;
const SEPARATOR_COLUMN: usize = GRID_WIDTH - SIDEBAR_WIDTH;
const HUD_ROW: usize = GRID_HEIGHT - 1;
const CONTROLS: [&str; 4] = [
    "B: Build mode",
    "U: Upgrade tower",
    "S: Sell tower",
    "P: Pause game",
];

/// Fixed-size character buffer holding one rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFrame {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl TextFrame {
    /// Creates a blank frame of the given dimensions.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Character at column `x`, row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        self.index(x, y).map(|index| self.cells[index])
    }

    /// Row `y` as a string, or `None` past the bottom edge.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<String> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(self.cells[start..start + self.width].iter().collect())
    }

    /// Iterates over every row from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }

    /// Resets every cell to a blank.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Writes `glyph` at column `x`, row `y`, ignoring cells off the frame.
    pub fn put(&mut self, x: usize, y: usize, glyph: char) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = glyph;
        }
    }

    /// Writes `text` starting at column `x` of row `y`, stopping before the
    /// right border.
    pub fn draw_text(&mut self, y: usize, x: usize, text: &str) {
        let limit = self.width.saturating_sub(1);
        for (offset, glyph) in text.chars().enumerate() {
            let column = x + offset;
            if column >= limit {
                break;
            }
            self.put(column, y, glyph);
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl fmt::Display for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Maps world coordinates onto playfield cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    world: DVec2,
    extent: IVec2,
    min: IVec2,
    max: IVec2,
}

impl Viewport {
    /// Viewport covering the default world on the default grid.
    #[must_use]
    pub fn new() -> Self {
        let columns = (GRID_WIDTH - SIDEBAR_WIDTH - 2) as i32;
        let rows = (GRID_HEIGHT - HUD_HEIGHT - 3) as i32;
        Self {
            world: DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            extent: IVec2::new(columns, rows),
            min: IVec2::new(1, HUD_HEIGHT as i32),
            max: IVec2::new(columns, GRID_HEIGHT as i32 - 2),
        }
    }

    /// Projects `position` to a cell, truncating and clamping to the playfield.
    #[must_use]
    pub fn project(&self, position: Position) -> IVec2 {
        let scaled = DVec2::new(position.x(), position.y()) * self.extent.as_dvec2() / self.world;
        scaled.as_ivec2().clamp(self.min, self.max)
    }

    /// Whether `cell` lies inside the drawable playfield.
    #[must_use]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x > 0
            && cell.x < (GRID_WIDTH - SIDEBAR_WIDTH - 1) as i32
            && cell.y >= HUD_HEIGHT as i32
            && cell.y < (GRID_HEIGHT - 1) as i32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells visited by Bresenham's line from `from` to `to`, endpoints included.
#[must_use]
pub fn rasterize_line(from: IVec2, to: IVec2) -> Vec<IVec2> {
    let delta = (to - from).abs();
    let step = IVec2::new(
        if from.x < to.x { 1 } else { -1 },
        if from.y < to.y { 1 } else { -1 },
    );
    let mut error = delta.x - delta.y;
    let mut cell = from;
    let mut cells = Vec::with_capacity((delta.x.max(delta.y) + 1) as usize);

    loop {
        cells.push(cell);
        if cell == to {
            break;
        }
        let doubled = 2 * error;
        if doubled > -delta.y {
            error -= delta.y;
            cell.x += step.x;
        }
        if doubled < delta.x {
            error += delta.x;
            cell.y += step.y;
        }
    }

    cells
}

/// Renders game snapshots into a reusable [`TextFrame`].
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    frame: TextFrame,
    viewport: Viewport,
}

impl TextRenderer {
    /// Creates a renderer with a blank default-sized frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `snapshot` and `stats` and returns the finished frame.
    ///
    /// Later layers overwrite earlier ones: path, towers, enemies, borders,
    /// HUD, then sidebar.
    pub fn render(&mut self, snapshot: &GameSnapshot, stats: &SessionStats) -> &TextFrame {
        self.frame.clear();
        self.draw_path(&snapshot.path);
        for tower in &snapshot.towers {
            self.plot(tower.position, tower.kind.glyph());
        }
        for enemy in &snapshot.enemies {
            self.plot(enemy.position, ENEMY_GLYPH);
        }
        self.draw_window();
        self.draw_hud(snapshot);
        self.draw_sidebar(snapshot, stats);
        &self.frame
    }

    /// Most recently rendered frame.
    #[must_use]
    pub fn frame(&self) -> &TextFrame {
        &self.frame
    }

    fn draw_path(&mut self, path: &[Position]) {
        for segment in path.windows(2) {
            let from = self.viewport.project(segment[0]);
            let to = self.viewport.project(segment[1]);
            for cell in rasterize_line(from, to) {
                self.put_cell(cell, PATH_GLYPH);
            }
        }
    }

    fn plot(&mut self, position: Position, glyph: char) {
        let cell = self.viewport.project(position);
        self.put_cell(cell, glyph);
    }

    fn put_cell(&mut self, cell: IVec2, glyph: char) {
        if self.viewport.contains(cell) {
            self.frame.put(cell.x as usize, cell.y as usize, glyph);
        }
    }

    fn draw_window(&mut self) {
        for y in 0..GRID_HEIGHT {
            self.frame.put(0, y, BORDER_GLYPH);
            self.frame.put(GRID_WIDTH - 1, y, BORDER_GLYPH);
            self.frame.put(SEPARATOR_COLUMN, y, BORDER_GLYPH);
        }
        for x in 0..GRID_WIDTH {
            self.frame.put(x, 0, BORDER_GLYPH);
            self.frame.put(x, HUD_HEIGHT - 1, BORDER_GLYPH);
            self.frame.put(x, GRID_HEIGHT - 1, BORDER_GLYPH);
        }

        let title = format!(" {GAME_TITLE} ");
        let start = (GRID_WIDTH - title.chars().count()) / 2;
        self.frame.draw_text(1, start, &title);
    }

    fn draw_hud(&mut self, snapshot: &GameSnapshot) {
        let mut hud = format!(
            "Wave: {} | Lives: {} | Money: {}",
            snapshot.wave, snapshot.lives, snapshot.money
        );
        if snapshot.paused {
            hud.push_str(" | PAUSED");
        }
        self.frame.draw_text(HUD_ROW, 1, &hud);
    }

    fn draw_sidebar(&mut self, snapshot: &GameSnapshot, stats: &SessionStats) {
        let mut row = HUD_HEIGHT;
        self.frame.draw_text(row, SIDEBAR_COLUMN, "Tower Types:");
        for (kind, price) in snapshot.tower_costs.iter() {
            row += 1;
            self.frame.draw_text(row, SIDEBAR_COLUMN, &price_line(kind, price));
        }

        row += 2;
        self.frame.draw_text(row, SIDEBAR_COLUMN, "Controls:");
        for control in CONTROLS {
            row += 1;
            self.frame.draw_text(row, SIDEBAR_COLUMN, control);
        }

        row += 2;
        self.frame.draw_text(row, SIDEBAR_COLUMN, "Stats:");
        row += 1;
        let lines = [
            format!("Towers Standing: {}", snapshot.towers.len()),
            format!("Towers Built: {}", stats.towers_built),
            format!("Kills: {}", stats.enemies_killed),
            format!("Escaped: {}", stats.enemies_escaped),
            format!("Shots Fired: {}", stats.shots_fired),
        ];
        for line in lines {
            row += 1;
            self.frame.draw_text(row, SIDEBAR_COLUMN, &line);
        }
    }
}

fn price_line(kind: TowerKind, price: u32) -> String {
    let number = TowerKind::ALL
        .iter()
        .position(|candidate| *candidate == kind)
        .map_or(0, |index| index + 1);
    let name = format!("{} Tower", kind.label());
    format!("{number}. {name:<13}${price}")
}

/// Output surface that can display finished frames.
pub trait RenderingBackend {
    /// Puts `frame` on screen.
    fn present(&mut self, frame: &TextFrame) -> AnyResult<()>;
}
