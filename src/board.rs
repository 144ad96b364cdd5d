use std::fmt::{Display, Formatter};
use std::str::FromStr;

use petgraph::graphmap::UnGraphMap;
use thiserror::Error;

use crate::builder::{ModelBuilder, SolveConfig};
use crate::enclosure::{self, Enclosure, SolveStatus};
use crate::graph::{self, GraphError, Link};
use crate::grid::{Grid, ParseError};
use crate::location::Location;
use crate::solver::{MilpSolver, Outcome, SolveError, SolveOptions, SolverAdapter};

/// Reasons map text fails to become a [`Board`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BoardError {
    /// The text itself is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The text parsed but the portal structure is invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A parsed puzzle: the grid plus the adjacency over its candidate tiles.
///
/// Parse one with [`FromStr`], then call [`solve`](Self::solve).
#[derive(Debug)]
pub struct Board {
    pub(crate) grid: Grid,
    pub(crate) graph: UnGraphMap<Location, Link>,
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let grid: Grid = s.parse()?;
        let graph = graph::build(&grid)?;
        Ok(Self { grid, graph })
    }
}

impl Board {
    /// Solve with the bundled [`MilpSolver`].
    pub fn solve(&self, config: &SolveConfig) -> Result<Enclosure, SolveError> {
        self.solve_with(&MilpSolver, config)
    }

    /// Solve with a caller-supplied backend.
    pub fn solve_with(&self, adapter: &impl SolverAdapter, config: &SolveConfig) -> Result<Enclosure, SolveError> {
        let built = ModelBuilder::new(&self.grid, &self.graph, config).build();
        let options = SolveOptions { time_limit: config.time_limit };

        match adapter.solve(&built.model, &options)? {
            Outcome::Optimal { solution, objective } => {
                enclosure::map_solution(&self.grid, &built, config.cherry_bonus, SolveStatus::Optimal, &solution, Some(objective))
            }
            Outcome::Feasible { solution, objective } => {
                enclosure::map_solution(&self.grid, &built, config.cherry_bonus, SolveStatus::Feasible, &solution, Some(objective))
            }
            Outcome::TimedOut { best: Some(solution) } => {
                enclosure::map_solution(&self.grid, &built, config.cherry_bonus, SolveStatus::TimedOut, &solution, None)
            }
            Outcome::TimedOut { best: None } => Err(SolveError::TimedOut),
            Outcome::Infeasible => Err(SolveError::Infeasible { max_walls: config.max_walls }),
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.grid)
    }
}
