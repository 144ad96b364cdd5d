use std::collections::BTreeMap;
use std::time::Duration;

use petgraph::graphmap::UnGraphMap;
use tracing::debug;

use crate::connectivity::Connectivity;
use crate::graph::Link;
use crate::grid::Grid;
use crate::location::Location;
use crate::model::{LinearExpr, Model, Operand};

/// The wall and enclosure operands attached to one candidate tile.
///
/// The horse carries constants instead of variables: it is always enclosed
/// and never walled, so it never costs the backend a variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TileVars {
    pub(crate) wall: Operand,
    pub(crate) inside: Operand,
}

/// Knobs for a single solve.
#[derive(Clone, Copy, Debug)]
pub struct SolveConfig {
    pub(crate) max_walls: u32,
    pub(crate) connectivity: Connectivity,
    pub(crate) cherry_bonus: i64,
    pub(crate) time_limit: Option<Duration>,
}

impl SolveConfig {
    /// A config with the given wall budget and everything else defaulted:
    /// reachability encoding, cherry bonus 3, no time limit.
    pub fn new(max_walls: u32) -> Self {
        Self { max_walls, connectivity: Connectivity::default(), cherry_bonus: 3, time_limit: None }
    }

    /// Use `connectivity` instead of the default encoding.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Score each enclosed cherry at `1 + cherry_bonus`.
    pub fn with_cherry_bonus(mut self, cherry_bonus: i64) -> Self {
        self.cherry_bonus = cherry_bonus;
        self
    }

    /// Give up after `time_limit` of wall-clock time, keeping any incumbent.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

/// A [`Model`] plus the tile operands needed to read an assignment back.
pub(crate) struct BuiltModel {
    pub(crate) model: Model,
    pub(crate) tile_vars: BTreeMap<Location, TileVars>,
}

/// Assembles the enclosure model for one grid.
pub(crate) struct ModelBuilder<'a> {
    grid: &'a Grid,
    graph: &'a UnGraphMap<Location, Link>,
    config: &'a SolveConfig,
}

impl<'a> ModelBuilder<'a> {
    pub(crate) fn new(grid: &'a Grid, graph: &'a UnGraphMap<Location, Link>, config: &'a SolveConfig) -> Self {
        Self { grid, graph, config }
    }

    pub(crate) fn build(self) -> BuiltModel {
        let mut model = Model::new();
        let mut tile_vars = BTreeMap::new();

        for location in self.grid.candidates() {
            if location == self.grid.horse {
                tile_vars.insert(location, TileVars { wall: Operand::Const(0), inside: Operand::Const(1) });
                continue;
            }

            let tile = self.grid.tile(location);
            let wall = Operand::Var(model.bool_var());
            let inside = Operand::Var(model.bool_var());
            tile_vars.insert(location, TileVars { wall, inside });

            // a tile is a wall or enclosed, never both
            let mut exclusive = LinearExpr::with_capacity(2);
            exclusive.add_mul(1, wall);
            exclusive.add_mul(1, inside);
            model.constrain(exclusive.leq(1));

            if !tile.wallable() {
                let mut unwallable = LinearExpr::with_capacity(1);
                unwallable.add_mul(1, wall);
                model.constrain(unwallable.eq(0));
            }

            // rim tiles leak; only the horse itself may sit enclosed on the rim
            if self.grid.on_boundary(location) {
                let mut leaky = LinearExpr::with_capacity(1);
                leaky.add_mul(1, inside);
                model.constrain(leaky.eq(0));
            }
        }

        let mut budget = LinearExpr::with_capacity(tile_vars.len());
        for vars in tile_vars.values() {
            budget.add_mul(1, vars.wall);
        }
        model.constrain(budget.leq(i64::from(self.config.max_walls)));

        // an enclosed tile may not touch a non-enclosed one unless the pair holds a wall
        for (a, b, _) in self.graph.all_edges() {
            for (x, y) in [(a, b), (b, a)] {
                let mut separation = LinearExpr::with_capacity(4);
                separation.add_mul(1, tile_vars[&x].inside);
                separation.add_mul(-1, tile_vars[&y].inside);
                separation.add_mul(-1, tile_vars[&x].wall);
                separation.add_mul(-1, tile_vars[&y].wall);
                model.constrain(separation.leq(0));
            }
        }

        let mut objective = LinearExpr::with_capacity(tile_vars.len());
        for (&location, vars) in &tile_vars {
            objective.add_mul(self.grid.tile(location).value(self.config.cherry_bonus), vars.inside);
        }
        model.maximize(objective);

        self.config.connectivity.encoder().encode(&mut model, self.graph, &tile_vars, self.grid.horse);

        debug!(
            variables = model.var_count(),
            constraints = model.constraint_count(),
            encoding = ?self.config.connectivity,
            "assembled enclosure model"
        );

        BuiltModel { model, tile_vars }
    }
}
