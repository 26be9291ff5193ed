use std::collections::HashSet;

use tracing::{debug, info};

use super::{
    common::{Position, Tile},
    error::MazeError,
    grid::Grid,
};

const MIN_SIZE: usize = 3;

// A candidate joins the maze only while fewer than this many of its eight
// neighbours already did. Changing it changes the character of the mazes.
const CROWDED_NEIGHBORS: usize = 5;

/// Generates mazes of walls and markers with a single exit.
pub struct MazeGenerator {
    rng: fastrand::Rng,
}

impl MazeGenerator {
    /// Seeded generators are reproducible; without a seed every maze differs.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self::with_rng(rng)
    }

    pub fn with_rng(rng: fastrand::Rng) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, xsize: usize, ysize: usize) -> Result<Grid, MazeError> {
        if xsize < MIN_SIZE || ysize < MIN_SIZE {
            return Err(MazeError::InvalidSize { xsize, ysize });
        }

        // Only interior cells are candidates, so the border stays wall.
        let mut grid = Grid::filled(xsize, ysize, Tile::Wall);
        let markers = self.place_markers(xsize, ysize);
        for position in &markers {
            grid.set(*position, Tile::Marker)?;
        }

        let exit = Position::new(xsize as i32 - 2, ysize as i32 - 2);
        grid.set(exit, Tile::Exit)?;

        info!(
            "generated {}x{} maze with {} markers",
            xsize,
            ysize,
            grid.count(Tile::Marker)
        );

        Ok(grid)
    }

    /// Visits the interior in random order; returns the accepted cells in
    /// the order they were accepted.
    pub(crate) fn place_markers(&mut self, xsize: usize, ysize: usize) -> Vec<Position> {
        let mut candidates: Vec<Position> = (1..ysize.saturating_sub(1))
            .flat_map(|y| {
                (1..xsize.saturating_sub(1)).map(move |x| Position::new(x as i32, y as i32))
            })
            .collect();

        let mut chosen = HashSet::with_capacity(candidates.len());
        let mut accepted = Vec::with_capacity(candidates.len());

        while !candidates.is_empty() {
            let index = self.rng.usize(..candidates.len());
            let position = candidates.swap_remove(index);

            if accepts(&chosen, position) {
                chosen.insert(position);
                accepted.push(position);
            } else {
                debug!("rejected {:?}", position);
            }
        }

        accepted
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Whether `position` may join `chosen` without crowding it.
fn accepts(chosen: &HashSet<Position>, position: Position) -> bool {
    let crowded = neighborhood(position)
        .filter(|neighbor| chosen.contains(neighbor))
        .count();
    crowded < CROWDED_NEIGHBORS
}

/// The eight cells around `position`, diagonals included.
fn neighborhood(position: Position) -> impl Iterator<Item = Position> {
    const OFFSETS: [(i32, i32); 8] = [
        (0, -1),
        (0, 1),
        (-1, 0),
        (1, 0),
        (-1, -1),
        (1, -1),
        (-1, 1),
        (1, 1),
    ];
    OFFSETS
        .into_iter()
        .map(move |(dx, dy)| Position::new(position.x + dx, position.y + dy))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::maze::{
        common::{Position, Tile},
        error::MazeError,
    };

    use super::{accepts, neighborhood, MazeGenerator, CROWDED_NEIGHBORS};

    #[test]
    fn test_border_is_wall_and_single_exit() {
        for seed in 0..20 {
            let mut generator = MazeGenerator::new(Some(seed));
            for (xsize, ysize) in [(3, 3), (12, 7), (7, 12), (20, 15)] {
                let grid = generator.generate(xsize, ysize).unwrap();

                assert_eq!(grid.dimension(), (xsize, ysize));
                for (position, tile) in grid.iter() {
                    let on_border = position.x == 0
                        || position.y == 0
                        || position.x as usize == xsize - 1
                        || position.y as usize == ysize - 1;
                    if on_border {
                        assert_eq!(tile, Tile::Wall, "border at {:?}", position);
                    }
                }
                assert_eq!(grid.count(Tile::Exit), 1);
                assert_eq!(
                    grid.find(Tile::Exit),
                    Some(Position::new(xsize as i32 - 2, ysize as i32 - 2))
                );
            }
        }
    }

    #[test]
    fn test_markers_respect_density_cap_when_placed() {
        for seed in 0..20 {
            let mut generator = MazeGenerator::new(Some(seed));
            let accepted = generator.place_markers(15, 11);

            let mut chosen = HashSet::new();
            for position in accepted {
                let crowded = neighborhood(position)
                    .filter(|neighbor| chosen.contains(neighbor))
                    .count();
                assert!(crowded < CROWDED_NEIGHBORS, "{:?} was too crowded", position);
                assert!(chosen.insert(position), "{:?} accepted twice", position);
            }
        }
    }

    #[test]
    fn test_four_chosen_neighbors_accept_five_reject() {
        let center = Position::new(2, 2);
        let mut chosen: HashSet<Position> = neighborhood(center).take(4).collect();

        assert!(accepts(&chosen, center));

        chosen.extend(neighborhood(center).nth(4));
        assert_eq!(chosen.len(), 5);
        assert!(!accepts(&chosen, center));

        chosen.extend(neighborhood(center));
        assert!(!accepts(&chosen, center));
    }

    #[test]
    fn test_diagonal_neighbors_count() {
        let center = Position::new(2, 2);
        let corners: HashSet<Position> = [(1, 1), (3, 1), (1, 3), (3, 3), (2, 1)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();

        assert!(!accepts(&corners, center));
    }

    #[test]
    fn test_every_skipped_cell_is_crowded() {
        for seed in 0..20 {
            let mut generator = MazeGenerator::new(Some(seed));
            let chosen: HashSet<Position> = generator.place_markers(15, 11).into_iter().collect();

            for y in 1..10 {
                for x in 1..14 {
                    let position = Position::new(x, y);
                    if !chosen.contains(&position) {
                        assert!(!accepts(&chosen, position), "{:?} was free", position);
                    }
                }
            }
        }
    }

    #[test]
    fn test_only_walls_and_markers_besides_exit() {
        let mut generator = MazeGenerator::new(Some(7));
        let grid = generator.generate(12, 7).unwrap();

        assert_eq!(grid.count(Tile::Open), 0);
        assert_eq!(
            grid.count(Tile::Wall) + grid.count(Tile::Marker) + 1,
            12 * 7
        );
        assert!(grid.count(Tile::Marker) > 0);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let first = MazeGenerator::new(Some(42)).generate(16, 9).unwrap();
        let second = MazeGenerator::new(Some(42)).generate(16, 9).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_too_small_is_invalid() {
        let mut generator = MazeGenerator::new(Some(1));

        assert_eq!(
            generator.generate(2, 5),
            Err(MazeError::InvalidSize { xsize: 2, ysize: 5 })
        );
        assert_eq!(
            generator.generate(5, 2),
            Err(MazeError::InvalidSize { xsize: 5, ysize: 2 })
        );
        assert_eq!(
            generator.generate(0, 0),
            Err(MazeError::InvalidSize { xsize: 0, ysize: 0 })
        );
    }
}
