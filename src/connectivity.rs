//! Connectivity encodings. Both guarantee every enclosed tile is reachable
//! from the horse through enclosed tiles, but they trade model size against
//! relaxation tightness differently.

use std::collections::BTreeMap;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::builder::TileVars;
use crate::graph::{self, Link};
use crate::location::Location;
use crate::model::{LinearExpr, Model, Operand};

/// Which connectivity encoding the model builder emits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Connectivity {
    /// Single-commodity flow: the horse pumps one unit to every enclosed tile.
    Flow,
    /// Spanning arborescence: each enclosed tile picks an enclosed parent,
    /// with integer ranks ruling out parent cycles.
    #[default]
    Reachability,
}

impl Connectivity {
    pub(crate) fn encoder(self) -> &'static dyn ConnectivityEncoder {
        match self {
            Self::Flow => &FlowEncoder,
            Self::Reachability => &ReachabilityEncoder,
        }
    }
}

/// Appends constraints tying the `inside` variables to connectivity with the
/// horse. Implementations may create as many auxiliary variables as they need.
pub(crate) trait ConnectivityEncoder {
    fn encode(
        &self,
        model: &mut Model,
        graph: &UnGraphMap<Location, Link>,
        tiles: &BTreeMap<Location, TileVars>,
        horse: Location,
    );
}

/// Flow conservation with capacity `m` (the candidate count) per arc.
///
/// The horse emits exactly one unit per enclosed tile, every other tile
/// consumes one unit if enclosed, and arcs into a tile carry nothing unless
/// the tile is enclosed and unwalled. Any enclosed region cut off from the
/// horse would starve, so no feasible assignment contains one.
pub(crate) struct FlowEncoder;

impl ConnectivityEncoder for FlowEncoder {
    fn encode(
        &self,
        model: &mut Model,
        graph: &UnGraphMap<Location, Link>,
        tiles: &BTreeMap<Location, TileVars>,
        horse: Location,
    ) {
        let m = tiles.len() as i64;
        let mut flows = BTreeMap::new();

        for (u, v) in graph::arcs(graph) {
            let flow = model.int_var(0, m);
            flows.insert((u, v), flow);

            // flow(u->v) <= m * inside(v)
            let mut inside_cap = LinearExpr::with_capacity(2);
            inside_cap.add_mul(1, Operand::Var(flow));
            inside_cap.add_mul(-m, tiles[&v].inside);
            model.constrain(inside_cap.leq(0));

            // flow(u->v) <= m * (1 - wall(v))
            let mut wall_cap = LinearExpr::with_capacity(2);
            wall_cap.add_mul(1, Operand::Var(flow));
            wall_cap.add_mul(m, tiles[&v].wall);
            model.constrain(wall_cap.leq(m));
        }

        // the horse's net outflow matches the number of enclosed tiles
        let mut emission = LinearExpr::with_capacity(tiles.len() + graph.neighbors(horse).count() * 2);
        for neighbor in graph.neighbors(horse) {
            emission.add_mul(1, Operand::Var(flows[&(horse, neighbor)]));
            emission.add_mul(-1, Operand::Var(flows[&(neighbor, horse)]));
        }
        for (&x, vars) in tiles {
            if x != horse {
                emission.add_mul(-1, vars.inside);
            }
        }
        model.constrain(emission.eq(0));

        // every other tile consumes one unit iff enclosed
        for (&x, vars) in tiles {
            if x == horse {
                continue;
            }
            let mut consumption = LinearExpr::with_capacity(graph.neighbors(x).count() * 2 + 1);
            for neighbor in graph.neighbors(x) {
                consumption.add_mul(1, Operand::Var(flows[&(neighbor, x)]));
                consumption.add_mul(-1, Operand::Var(flows[&(x, neighbor)]));
            }
            consumption.add_mul(-1, vars.inside);
            model.constrain(consumption.eq(0));
        }
    }
}

/// Parent selection with integer ranks.
///
/// Each enclosed tile other than the horse picks exactly one enclosed,
/// unwalled neighbor as its parent. Ranks grow strictly along parent arcs
/// starting from the horse at rank zero, so parent chains cannot close into
/// a cycle detached from the horse.
pub(crate) struct ReachabilityEncoder;

impl ConnectivityEncoder for ReachabilityEncoder {
    fn encode(
        &self,
        model: &mut Model,
        graph: &UnGraphMap<Location, Link>,
        tiles: &BTreeMap<Location, TileVars>,
        horse: Location,
    ) {
        let n = tiles.len() as i64;

        let mut ranks = BTreeMap::new();
        for &x in tiles.keys() {
            let rank =
                if x == horse { Operand::Const(0) } else { Operand::Var(model.int_var(0, n)) };
            ranks.insert(x, rank);
        }

        // nothing parents the horse
        let mut parents = BTreeMap::new();
        for (u, v) in graph::arcs(graph) {
            if v == horse {
                continue;
            }
            let parent = model.bool_var();
            parents.insert((u, v), parent);

            for endpoint in [u, v] {
                // parent(u->v) <= inside(endpoint)
                let mut inside_cap = LinearExpr::with_capacity(2);
                inside_cap.add_mul(1, Operand::Var(parent));
                inside_cap.add_mul(-1, tiles[&endpoint].inside);
                model.constrain(inside_cap.leq(0));

                // parent(u->v) + wall(endpoint) <= 1
                let mut wall_cap = LinearExpr::with_capacity(2);
                wall_cap.add_mul(1, Operand::Var(parent));
                wall_cap.add_mul(1, tiles[&endpoint].wall);
                model.constrain(wall_cap.leq(1));
            }
        }

        for (&v, vars) in tiles {
            if v == horse {
                continue;
            }

            let incoming = graph.neighbors(v).collect_vec();
            if incoming.is_empty() {
                // no path to the horse can exist
                let mut isolated = LinearExpr::with_capacity(1);
                isolated.add_mul(1, vars.inside);
                model.constrain(isolated.eq(0));
            } else {
                // exactly one parent iff enclosed
                let mut sum = LinearExpr::with_capacity(incoming.len() + 1);
                for u in incoming {
                    sum.add_mul(1, Operand::Var(parents[&(u, v)]));
                }
                sum.add_mul(-1, vars.inside);
                model.constrain(sum.eq(0));
            }

            // rank(v) <= n * inside(v)
            let mut ceiling = LinearExpr::with_capacity(2);
            ceiling.add_mul(1, ranks[&v]);
            ceiling.add_mul(-n, vars.inside);
            model.constrain(ceiling.leq(0));

            // rank(v) >= inside(v)
            let mut floor = LinearExpr::with_capacity(2);
            floor.add_mul(1, ranks[&v]);
            floor.add_mul(-1, vars.inside);
            model.constrain(floor.geq(0));
        }

        // rank(v) >= rank(u) + 1 - n * (1 - parent(u->v))
        for (&(u, v), &parent) in &parents {
            let mut order = LinearExpr::with_capacity(3);
            order.add_mul(1, ranks[&v]);
            order.add_mul(-1, ranks[&u]);
            order.add_mul(-n, Operand::Var(parent));
            model.constrain(order.geq(1 - n));
        }
    }
}
