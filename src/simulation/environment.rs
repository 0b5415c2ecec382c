//! Ground-truth house model.
//!
//! Holds walls, the dock and per-cell dirt. The layout is surrounded by a ring
//! of walls, so a vacuum can never leave it.

use std::path::Path;

use rand::Rng;

use crate::error::{Result, SimError};
use crate::simulation::geometry::Position;
use crate::simulation::params::MAX_DIRT;

/// Contents of one ground-truth cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Dock,
    Floor(u8),
}

/// A house to be cleaned, plus its run limits.
#[derive(Clone, Debug)]
pub struct House {
    pub name: String,
    pub max_steps: usize,
    pub max_battery: u32,
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
    dock: Position,
    total_dirt: u32,
}

impl House {
    /// Builds a house from layout rows.
    ///
    /// `W` wall, `D` dock, `1`-`9` dirt, anything else clean floor. Rows are
    /// padded to the longest one; a wall ring is added around the whole.
    pub fn from_layout(
        name: impl Into<String>,
        layout: &[&str],
        max_steps: usize,
        max_battery: u32,
    ) -> Result<Self> {
        let width = layout.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        Self::build(name.into(), layout, layout.len(), width, max_steps, max_battery)
    }

    fn build(
        name: String,
        layout: &[&str],
        rows: usize,
        cols: usize,
        max_steps: usize,
        max_battery: u32,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimError::InvalidDimensions { rows, cols });
        }
        let (padded_rows, padded_cols) = (rows + 2, cols + 2);
        let mut tiles = vec![Tile::Wall; padded_rows * padded_cols];
        let mut dock = None;
        let mut total_dirt = 0;

        for r in 0..rows {
            let line: Vec<char> = layout.get(r).map(|l| l.chars().collect()).unwrap_or_default();
            for c in 0..cols {
                let tile = match line.get(c).copied().unwrap_or(' ') {
                    'W' => Tile::Wall,
                    'D' => Tile::Dock,
                    ch @ '1'..='9' => Tile::Floor(ch as u8 - b'0'),
                    _ => Tile::Floor(0),
                };
                let pos = Position::new(r as i32 + 1, c as i32 + 1);
                if tile == Tile::Dock {
                    if dock.is_some() {
                        return Err(SimError::DuplicateDock { name, at: pos });
                    }
                    dock = Some(pos);
                }
                if let Tile::Floor(dirt) = tile {
                    total_dirt += u32::from(dirt);
                }
                tiles[(r + 1) * padded_cols + c + 1] = tile;
            }
        }

        let Some(dock) = dock else {
            return Err(SimError::MissingDock(name));
        };
        Ok(Self {
            name,
            max_steps,
            max_battery,
            rows: padded_rows,
            cols: padded_cols,
            tiles,
            dock,
            total_dirt,
        })
    }

    /// Parses a house file.
    ///
    /// ```text
    /// <name line>
    /// MaxSteps = 100
    /// MaxBattery = 20
    /// Rows = 4
    /// Cols = 10
    /// <layout rows>
    /// ```
    pub fn parse(source: &str, label: &Path) -> Result<Self> {
        let mut lines = source.lines();
        let name = lines
            .next()
            .map(str::trim)
            .ok_or_else(|| SimError::house_parse(label, 1, "empty house file"))?;
        let name = if name.is_empty() { "house" } else { name }.to_owned();

        let mut header = |line_no: usize, key: &str| -> Result<usize> {
            let line = lines
                .next()
                .ok_or_else(|| SimError::house_parse(label, line_no, format!("missing {key}")))?;
            let (found, value) = line
                .split_once('=')
                .ok_or_else(|| SimError::house_parse(label, line_no, format!("expected '{key} = <n>'")))?;
            if !found.trim().eq_ignore_ascii_case(key) {
                return Err(SimError::house_parse(
                    label,
                    line_no,
                    format!("expected {key}, found '{}'", found.trim()),
                ));
            }
            value.trim().parse().map_err(|_| {
                SimError::house_parse(label, line_no, format!("{key} is not a number: '{}'", value.trim()))
            })
        };

        let max_steps = header(2, "MaxSteps")?;
        let max_battery = header(3, "MaxBattery")?;
        let rows = header(4, "Rows")?;
        let cols = header(5, "Cols")?;
        let max_battery = u32::try_from(max_battery)
            .map_err(|_| SimError::house_parse(label, 3, "MaxBattery out of range"))?;

        let layout: Vec<&str> = lines.take(rows).collect();
        Self::build(name, &layout, rows, cols, max_steps, max_battery)
    }

    /// Reads and parses a house file; the file stem becomes the house name.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let mut house = Self::parse(&source, path)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            house.name = stem.to_owned();
        }
        Ok(house)
    }

    /// Generates a random house: scattered walls and dirt around one dock.
    ///
    /// Cells walled off from the dock may appear; the controller has to cope.
    pub fn generate(rng: &mut impl Rng, rows: usize, cols: usize, wall_density: f64, dirt_density: f64) -> Result<Self> {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let dock = (rng.random_range(0..rows), rng.random_range(0..cols));
        let layout: Vec<String> = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| {
                        if (r, c) == dock {
                            'D'
                        } else if rng.random_bool(wall_density) {
                            'W'
                        } else if rng.random_bool(dirt_density) {
                            char::from(b'0' + rng.random_range(1..=MAX_DIRT))
                        } else {
                            ' '
                        }
                    })
                    .collect()
            })
            .collect();
        let layout: Vec<&str> = layout.iter().map(String::as_str).collect();
        let area = rows * cols;
        Self::from_layout("random", &layout, area * 6, (area as u32).max(8) * 2)
    }

    /// Size including the wall ring.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub const fn dock(&self) -> Position {
        self.dock
    }

    #[must_use]
    pub fn tile(&self, pos: Position) -> Tile {
        self.index(pos).map_or(Tile::Wall, |i| self.tiles[i])
    }

    #[must_use]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile(pos) == Tile::Wall
    }

    #[must_use]
    pub fn dirt_at(&self, pos: Position) -> u8 {
        match self.tile(pos) {
            Tile::Floor(dirt) => dirt,
            _ => 0,
        }
    }

    /// Removes one unit of dirt; returns false if there was none.
    pub fn clean(&mut self, pos: Position) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        match self.tiles[i] {
            Tile::Floor(dirt) if dirt > 0 => {
                self.tiles[i] = Tile::Floor(dirt - 1);
                self.total_dirt -= 1;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn total_dirt(&self) -> u32 {
        self.total_dirt
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.total_dirt == 0
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok().filter(|&r| r < self.rows)?;
        let col = usize::try_from(pos.col).ok().filter(|&c| c < self.cols)?;
        Some(row * self.cols + col)
    }
}
