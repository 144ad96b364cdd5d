#![warn(missing_docs)]

//! # `paddock`
//!
//! A solver for horse-enclosure map puzzles: given a rectangular map of water, grass,
//! portal pairs, cherries and a single horse, place at most a budgeted number of walls
//! so the horse ends up enclosed with the most valuable pasture possible.
//! Begin by parsing a [`Board`] from map text, then call [`solve()`](Board::solve) with a
//! [`SolveConfig`], yielding an [`Enclosure`] with per-tile verdicts and the realized score.
//!
//! # Internals
//! This crate is driven by expressing the puzzle as a mixed-integer linear program.
//! The map becomes an undirected graph over its non-water tiles, where portal pairs are
//! ordinary edges, so everything downstream of parsing is insensitive to where tiles sit.
//! Each tile gets two binary variables, "wall here" and "enclosed here", and a tile that is
//! enclosed may not border a tile that is not unless one of the pair holds a wall.
//!
//! Edge separation alone still admits enclosed regions floating free of the horse, so a
//! [`Connectivity`] encoding ties the enclosed set together: either a single-commodity
//! flow pumped from the horse, or parent selection with integer ranks. Both accept
//! exactly the wall-enclosed regions containing the horse; they differ only in solve speed
//! on a given map. The backend's assignment is then read back onto the board, with the
//! score recomputed from the tiles as a check on the reported objective.

pub use board::{Board, BoardError};
pub use builder::SolveConfig;
pub use connectivity::Connectivity;
pub use enclosure::{hue, Enclosure, Hue, SolveStatus, TileState};
pub use graph::GraphError;
pub use grid::{Grid, ParseError};
pub use location::Location;
pub use model::{Comparator, LinearConstraint, LinearExpr, Model, Solution, VarDomain, VarId};
pub use solver::{MilpSolver, Outcome, SolveError, SolveOptions, SolverAdapter};
pub use tile::Tile;

pub(crate) mod board;
mod tests;
pub(crate) mod location;
pub(crate) mod tile;
pub(crate) mod grid;
pub(crate) mod graph;
pub(crate) mod model;
pub(crate) mod builder;
pub(crate) mod connectivity;
pub(crate) mod solver;
pub(crate) mod enclosure;
