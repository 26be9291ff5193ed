use std::{fmt, ops::Deref, str::FromStr};

use super::{
    common::{Position, Tile},
    error::MazeError,
    level::Level,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    cells: Vec<Tile>,
}
impl Deref for Row {
    type Target = Vec<Tile>;

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

/// Rectangular map of tiles, addressed by `Position`.
///
/// Rows are stored top to bottom, so iteration is row-major: y ascending
/// outside, x ascending inside. `find` relies on that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
    dimension: (usize, usize),
}

impl Grid {
    pub fn filled(xsize: usize, ysize: usize, tile: Tile) -> Self {
        Self {
            rows: (0..ysize)
                .map(|_| Row {
                    cells: vec![tile; xsize],
                })
                .collect(),
            dimension: (xsize, ysize),
        }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let xsize = rows.first().map_or(0, Vec::len);
        let ysize = rows.len();
        Self {
            rows: rows.into_iter().map(|cells| Row { cells }).collect(),
            dimension: (xsize, ysize),
        }
    }

    pub fn xsize(&self) -> usize {
        self.dimension.0
    }

    pub fn ysize(&self) -> usize {
        self.dimension.1
    }

    pub fn dimension(&self) -> (usize, usize) {
        self.dimension
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cell(position).is_some()
    }

    pub fn get(&self, position: Position) -> Result<Tile, MazeError> {
        self.cell(position)
            .map(|(x, y)| self.rows[y][x])
            .ok_or(MazeError::OutOfBounds(position))
    }

    pub fn set(&mut self, position: Position, tile: Tile) -> Result<(), MazeError> {
        let (x, y) = self
            .cell(position)
            .ok_or(MazeError::OutOfBounds(position))?;
        self.rows[y].cells[x] = tile;
        Ok(())
    }

    /// Turns a marker into open floor. Returns false if there was no marker.
    pub fn consume_marker(&mut self, position: Position) -> bool {
        match self.cell(position) {
            Some((x, y)) if self.rows[y][x] == Tile::Marker => {
                self.rows[y].cells[x] = Tile::Open;
                true
            }
            _ => false,
        }
    }

    pub fn find(&self, tile: Tile) -> Option<Position> {
        self.iter()
            .find(|(_, candidate)| *candidate == tile)
            .map(|(position, _)| position)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.iter().filter(|(_, candidate)| *candidate == tile).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Position::new(x as i32, y as i32), *tile))
        })
    }

    fn cell(&self, position: Position) -> Option<(usize, usize)> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        if x < self.dimension.0 && y < self.dimension.1 {
            Some((x, y))
        } else {
            None
        }
    }
}

impl FromStr for Grid {
    type Err = MazeError;

    /// Parses level text; spawn glyphs are read as open floor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Level>().map(|level| level.grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: String = row.iter().map(Tile::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
