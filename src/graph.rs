use petgraph::graphmap::UnGraphMap;
use strum::VariantArray;
use thiserror::Error;

use crate::grid::Grid;
use crate::location::{Location, Step};

/// Why two candidate tiles count as neighbors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    /// The tiles share an edge on the map.
    Adjacent,
    /// The tiles carry the same portal digit.
    Portal,
}

/// The map parsed, but its portal structure is unusable.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum GraphError {
    /// A portal digit with anything other than exactly two tiles.
    #[error("portal {id} appears on {count} tiles, expected exactly 2")]
    MalformedPortal {
        /// The portal digit.
        id: u8,
        /// How many tiles carry it.
        count: usize,
    },
}

/// Build the adjacency graph over all candidate tiles: von Neumann neighbors
/// plus one edge per portal pair. Isolated candidates stay in as bare nodes.
pub(crate) fn build(grid: &Grid) -> Result<UnGraphMap<Location, Link>, GraphError> {
    let mut graph = UnGraphMap::with_capacity(grid.height() * grid.width(), grid.height() * grid.width() * 2);

    for location in grid.candidates() {
        graph.add_node(location);
        for step in Step::VARIANTS {
            let neighbor = step.attempt_from(location);
            if grid.tile_at(neighbor).is_some_and(|tile| tile.is_candidate()) {
                graph.add_edge(location, neighbor, Link::Adjacent);
            }
        }
    }

    for (&id, locations) in &grid.portals {
        match *locations.as_slice() {
            [a, b] => {
                graph.add_edge(a, b, Link::Portal);
            }
            _ => return Err(GraphError::MalformedPortal { id, count: locations.len() }),
        }
    }

    Ok(graph)
}

/// Both directions of every edge, for encoders that work on directed arcs.
pub(crate) fn arcs(graph: &UnGraphMap<Location, Link>) -> impl Iterator<Item = (Location, Location)> + '_ {
    graph.all_edges().flat_map(|(a, b, _)| [(a, b), (b, a)])
}
