use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::location::Location;
use crate::tile::Tile;

/// Reasons map text fails to parse into a [`Grid`].
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    /// The map text contains no rows at all.
    #[error("map is empty")]
    Empty,
    /// A row is shorter or longer than the first row.
    #[error("inconsistent row width at line {row}: expected {expected}, got {got}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
    },
    /// A character outside the map alphabet.
    #[error("unexpected tile {tile:?} at {location}")]
    UnknownTile {
        /// The offending character.
        tile: char,
        /// Where it sits.
        location: Location,
    },
    /// No `H` anywhere in the map.
    #[error("no horse tile found in map")]
    NoHorse,
    /// More than one `H` in the map.
    #[error("multiple horses found in map: {first} and {second}")]
    MultipleHorses {
        /// The first horse encountered in row-major order.
        first: Location,
        /// The second.
        second: Location,
    },
}

/// A rectangular map of [`Tile`]s with exactly one horse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    pub(crate) tiles: Array2<Tile>,
    pub(crate) horse: Location,
    pub(crate) portals: BTreeMap<u8, Vec<Location>>,
}

impl FromStr for Grid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s.lines().collect_vec();
        if lines.is_empty() {
            return Err(ParseError::Empty);
        }

        let height = lines.len();
        let width = lines[0].chars().count();
        let mut tiles = Array2::from_elem((height, width), Tile::Water);
        let mut horse = None;
        let mut portals: BTreeMap<u8, Vec<Location>> = BTreeMap::new();

        for (row, line) in lines.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(ParseError::RaggedRow { row, expected: width, got });
            }
            for (col, ch) in line.chars().enumerate() {
                let location = Location(row, col);
                let tile = Tile::from_char(ch).ok_or(ParseError::UnknownTile { tile: ch, location })?;
                match tile {
                    Tile::Horse => match horse {
                        None => horse = Some(location),
                        Some(first) => return Err(ParseError::MultipleHorses { first, second: location }),
                    },
                    Tile::Portal(id) => portals.entry(id).or_default().push(location),
                    _ => {}
                }
                tiles[location.as_index()] = tile;
            }
        }

        let horse = horse.ok_or(ParseError::NoHorse)?;
        Ok(Self { tiles, horse, portals })
    }
}

impl Grid {
    pub(crate) fn height(&self) -> usize {
        self.tiles.nrows()
    }

    pub(crate) fn width(&self) -> usize {
        self.tiles.ncols()
    }

    pub(crate) fn tile(&self, location: Location) -> Tile {
        self.tiles[location.as_index()]
    }

    pub(crate) fn tile_at(&self, location: Location) -> Option<Tile> {
        self.tiles.get(location.as_index()).copied()
    }

    /// Whether `location` sits on the outer rim of the map.
    pub(crate) fn on_boundary(&self, location: Location) -> bool {
        location.0 == 0 || location.0 == self.height() - 1 || location.1 == 0 || location.1 == self.width() - 1
    }

    /// All non-water locations in row-major order.
    pub(crate) fn candidates(&self) -> impl Iterator<Item = Location> + '_ {
        self.tiles
            .indexed_iter()
            .filter(|(_, tile)| tile.is_candidate())
            .map(|(index, _)| Location::from(index))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.outer_iter() {
            for tile in &row {
                write!(f, "{}", tile.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
