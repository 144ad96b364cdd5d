use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::builder::BuiltModel;
use crate::grid::Grid;
use crate::location::Location;
use crate::model::{Operand, Solution};
use crate::solver::SolveError;
use crate::tile::Tile;

/// Final verdict on one tile of a solved board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TileState {
    /// Water; never part of the optimization.
    Water,
    /// A candidate left untouched: neither wall nor pasture.
    Grass,
    /// The horse.
    Horse,
    /// A placed wall.
    Wall,
    /// Enclosed and scored.
    Pasture,
}

/// How the solve that produced an [`Enclosure`] ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolveStatus {
    /// Proven best.
    Optimal,
    /// Valid but not proven best.
    Feasible,
    /// The deadline passed; this is the incumbent at that point.
    TimedOut,
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Optimal => "Optimal",
            Self::Feasible => "Feasible",
            Self::TimedOut => "TimedOut",
        })
    }
}

/// A solved board: per-tile verdicts plus the realized score.
///
/// [`Display`] renders the board with walls as `#` and enclosed grass as `*`.
/// Portal and cherry tiles keep their map glyph whether enclosed or not.
#[derive(Clone, Debug)]
pub struct Enclosure {
    states: Array2<TileState>,
    tiles: Array2<Tile>,
    status: SolveStatus,
    score: i64,
}

impl Enclosure {
    /// How the solve ended.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Total score: one per enclosed tile, horse included, plus cherry bonuses.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// How many walls the assignment placed.
    pub fn walls_used(&self) -> usize {
        self.states.iter().filter(|&&state| state == TileState::Wall).count()
    }

    /// How many tiles are enclosed, not counting the horse.
    pub fn pasture_tiles(&self) -> usize {
        self.states.iter().filter(|&&state| state == TileState::Pasture).count()
    }

    /// The verdict at `location`, or `None` outside the board.
    pub fn state(&self, location: Location) -> Option<TileState> {
        self.states.get(location.as_index()).copied()
    }
}

/// Read an assignment back onto the board.
///
/// The score is recomputed from the tile states here; when the adapter
/// reported an objective value the two must agree exactly.
pub(crate) fn map_solution(
    grid: &Grid,
    built: &BuiltModel,
    cherry_bonus: i64,
    status: SolveStatus,
    solution: &Solution,
    reported: Option<i64>,
) -> Result<Enclosure, SolveError> {
    let mut states = Array2::from_elem(grid.tiles.raw_dim(), TileState::Water);

    for (&location, vars) in &built.tile_vars {
        let state = if location == grid.horse {
            TileState::Horse
        } else if value_of(vars.wall, solution) == 1 {
            TileState::Wall
        } else if value_of(vars.inside, solution) == 1 {
            TileState::Pasture
        } else {
            TileState::Grass
        };
        states[location.as_index()] = state;
    }

    let score: i64 = states
        .indexed_iter()
        .map(|(index, &state)| match state {
            TileState::Horse => 1,
            TileState::Pasture => grid.tile(Location::from(index)).value(cherry_bonus),
            _ => 0,
        })
        .sum();

    if let Some(reported) = reported {
        if score != reported {
            return Err(SolveError::ScoreMismatch { computed: score, reported });
        }
    }

    Ok(Enclosure { states, tiles: grid.tiles.clone(), status, score })
}

fn value_of(operand: Operand, solution: &Solution) -> i64 {
    match operand {
        Operand::Var(var) => solution.value_of(var),
        Operand::Const(value) => value,
    }
}

impl Display for Enclosure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (states, tiles) in self.states.outer_iter().zip(self.tiles.outer_iter()) {
            for (&state, &tile) in states.iter().zip(tiles.iter()) {
                let glyph = match (state, tile) {
                    (TileState::Wall, _) => '#',
                    (TileState::Horse, _) => 'H',
                    (TileState::Pasture, Tile::Grass) => '*',
                    (_, tile) => tile.to_char(),
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Display colors for renderers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hue {
    /// Water.
    Blue,
    /// Grass and non-scoring cherries.
    Green,
    /// The horse.
    Brown,
    /// Walls.
    LightGrey,
    /// Portals, enclosed or not.
    Purple,
    /// A cherry that scored.
    Yellow,
}

/// The fixed tile-to-color mapping.
///
/// Walls win over everything except water and the horse, which can never be
/// walls anyway; a cherry only turns yellow once it actually scores.
pub fn hue(tile: Tile, state: TileState) -> Hue {
    match (tile, state) {
        (Tile::Water, _) => Hue::Blue,
        (Tile::Horse, _) => Hue::Brown,
        (_, TileState::Wall) => Hue::LightGrey,
        (Tile::Portal(_), _) => Hue::Purple,
        (Tile::Cherry, TileState::Pasture) => Hue::Yellow,
        (Tile::Cherry, _) => Hue::Green,
        (Tile::Grass, _) => Hue::Green,
    }
}
