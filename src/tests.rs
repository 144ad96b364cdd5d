#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};
    use std::time::Duration;

    use crate::board::{Board, BoardError};
    use crate::builder::{ModelBuilder, SolveConfig};
    use crate::connectivity::Connectivity;
    use crate::enclosure::{hue, Enclosure, Hue, SolveStatus, TileState};
    use crate::graph::GraphError;
    use crate::grid::{Grid, ParseError};
    use crate::location::Location;
    use crate::model::{Model, Solution};
    use crate::solver::{MilpSolver, Outcome, SolveError, SolveOptions, SolverAdapter};
    use crate::tile::Tile;

    // a 10x10 pocket of grass sealed off by the lake, plus a detached strip
    const LAKE: &str = include_str!("../maps/example.txt");
    // two sealed pockets joined only by a portal pair
    const PORTALS: &str = include_str!("../maps/portals.txt");
    // a sealed pocket with two cherries, and a detached strip with a third
    const CHERRIES: &str = include_str!("../maps/cherries.txt");
    // three sealed pockets chained by two portal pairs
    const CHAIN: &str = include_str!("../maps/chain.txt");
    // a grass room with two corridors running to the rim
    const NECK: &str = include_str!("../maps/neck.txt");
    // a lone horse ringed by water
    const ISLET: &str = include_str!("../maps/islet.txt");
    // open grass on all sides
    const MEADOW: &str = include_str!("../maps/meadow.txt");

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    /// Checks the structural guarantees every returned enclosure carries:
    /// walls within budget, no pasture on the rim, no unwalled leak between
    /// enclosed and non-enclosed neighbors, and every pasture tile reachable
    /// from the horse through enclosed tiles.
    fn verify_enclosure(board: &Board, enclosure: &Enclosure, budget: u32) {
        let inside = |location: Location| {
            matches!(enclosure.state(location), Some(TileState::Pasture | TileState::Horse))
        };

        assert!(enclosure.walls_used() <= budget as usize);
        for location in board.grid.candidates() {
            if enclosure.state(location) == Some(TileState::Pasture) {
                assert!(!board.grid.on_boundary(location), "pasture on the rim at {location}");
            }
        }

        for (a, b, _) in board.graph.all_edges() {
            if inside(a) != inside(b) {
                let walled = enclosure.state(a) == Some(TileState::Wall)
                    || enclosure.state(b) == Some(TileState::Wall);
                assert!(walled, "unwalled leak between {a} and {b}");
            }
        }

        let mut seen = BTreeSet::from([board.grid.horse]);
        let mut frontier = VecDeque::from([board.grid.horse]);
        while let Some(location) = frontier.pop_front() {
            for neighbor in board.graph.neighbors(location) {
                if inside(neighbor) && seen.insert(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }
        let enclosed = board.grid.candidates().filter(|&location| inside(location)).count();
        assert_eq!(seen.len(), enclosed, "detached pasture");
    }

    #[test]
    fn parse_round_trip() {
        for text in [NECK, PORTALS, CHAIN] {
            assert_eq!(format!("{}", board(text)), text);
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Grid>().unwrap_err(), ParseError::Empty);
        assert_eq!(
            "~~\n~".parse::<Grid>().unwrap_err(),
            ParseError::RaggedRow { row: 1, expected: 2, got: 1 }
        );
        assert_eq!(
            "~x~\n~H~".parse::<Grid>().unwrap_err(),
            ParseError::UnknownTile { tile: 'x', location: Location(0, 1) }
        );
        assert_eq!("~~\n~~".parse::<Grid>().unwrap_err(), ParseError::NoHorse);
        assert_eq!(
            "HH".parse::<Grid>().unwrap_err(),
            ParseError::MultipleHorses { first: Location(0, 0), second: Location(0, 1) }
        );
    }

    #[test]
    fn portal_pairs_validated() {
        assert_eq!(
            "~0~\n~H~".parse::<Board>().unwrap_err(),
            BoardError::Graph(GraphError::MalformedPortal { id: 0, count: 1 })
        );
        assert_eq!(
            "000\n~H~".parse::<Board>().unwrap_err(),
            BoardError::Graph(GraphError::MalformedPortal { id: 0, count: 3 })
        );
    }

    #[test]
    fn portal_edges_link_pairs() {
        let board = board("0.0\n.H.");
        // seven grid edges plus the portal edge
        assert_eq!(board.graph.edge_count(), 8);
        assert!(board.graph.contains_edge(Location(0, 0), Location(0, 2)));
        assert!(!board.graph.contains_edge(Location(0, 0), Location(1, 1)));
    }

    // One grass tile right of the horse, both on the rim. Variables land in
    // creation order: wall, inside, then the encoder's rank and parent.
    #[test]
    fn model_semantics_reachability() {
        let board = board("H.");
        let config = SolveConfig::new(1);
        let built = ModelBuilder::new(&board.grid, &board.graph, &config).build();
        assert_eq!(built.model.var_count(), 4);

        // walling off the grass is the only way to seal the horse
        let walled = Solution::new(vec![1, 0, 0, 0]);
        assert!(built.model.satisfied_by(&walled));
        // the horse alone still scores one
        assert_eq!(built.model.objective_value(&walled), 1);

        // leaving the pair untouched leaks past the horse
        assert!(!built.model.satisfied_by(&Solution::new(vec![0, 0, 0, 0])));
        // rim tiles may not be enclosed
        assert!(!built.model.satisfied_by(&Solution::new(vec![0, 1, 1, 1])));
        // wall and enclosed are mutually exclusive
        assert!(!built.model.satisfied_by(&Solution::new(vec![1, 1, 1, 1])));
        // domains are enforced too
        assert!(!built.model.satisfied_by(&Solution::new(vec![2, 0, 0, 0])));
        assert!(!built.model.satisfied_by(&Solution::new(vec![1, 0, 0])));
    }

    // Same board through the flow encoder: wall, inside, then one flow
    // variable per arc direction.
    #[test]
    fn model_semantics_flow() {
        let board = board("H.");
        let config = SolveConfig::new(1).with_connectivity(Connectivity::Flow);
        let built = ModelBuilder::new(&board.grid, &board.graph, &config).build();
        assert_eq!(built.model.var_count(), 4);

        assert!(built.model.satisfied_by(&Solution::new(vec![1, 0, 0, 0])));
        // flow may not enter a tile that is not enclosed
        assert!(!built.model.satisfied_by(&Solution::new(vec![1, 0, 1, 0])));
    }

    #[test]
    fn lake_seals_the_pocket() {
        let board = board(LAKE);
        let config = SolveConfig::new(13);
        let enclosure = board.solve(&config).unwrap();

        assert_eq!(enclosure.status(), SolveStatus::Optimal);
        assert_eq!(enclosure.score(), 103);
        assert_eq!(enclosure.pasture_tiles(), 102);
        verify_enclosure(&board, &enclosure, 13);
    }

    #[test]
    fn portal_joins_the_pockets() {
        let board = board(PORTALS);
        let config = SolveConfig::new(10);
        let enclosure = board.solve(&config).unwrap();

        // 49 tiles around the horse plus 45 on the far side of the portal
        assert_eq!(enclosure.score(), 94);
        assert_eq!(enclosure.pasture_tiles(), 93);
        assert_eq!(enclosure.state(Location(12, 10)), Some(TileState::Pasture));
        verify_enclosure(&board, &enclosure, 10);
    }

    #[test]
    fn portals_chain_across_pockets() {
        let board = board(CHAIN);
        let config = SolveConfig::new(12);
        let enclosure = board.solve(&config).unwrap();

        assert_eq!(enclosure.score(), 204);
        assert_eq!(enclosure.pasture_tiles(), 203);
        verify_enclosure(&board, &enclosure, 12);
    }

    #[test]
    fn cherries_score_their_bonus() {
        let board = board(CHERRIES);
        let enclosure = board.solve(&SolveConfig::new(12)).unwrap();

        // 60 tiles, two of them cherries at 1 + 3 apiece
        assert_eq!(enclosure.score(), 66);
        assert_eq!(enclosure.pasture_tiles(), 59);
        verify_enclosure(&board, &enclosure, 12);

        let flat = board.solve(&SolveConfig::new(12).with_cherry_bonus(0)).unwrap();
        assert_eq!(flat.score(), 60);
    }

    #[test]
    fn neck_needs_both_walls() {
        let board = board(NECK);

        for budget in [0, 1] {
            assert_eq!(
                board.solve(&SolveConfig::new(budget)).unwrap_err(),
                SolveError::Infeasible { max_walls: budget }
            );
        }

        let enclosure = board.solve(&SolveConfig::new(2)).unwrap();
        assert_eq!(enclosure.score(), 15);
        assert_eq!(enclosure.walls_used(), 2);
        assert_eq!(format!("{}", enclosure), "~~~~~~~~~
~~***~~~~
~~*H****#
~~***~~~~
~~~*~~~~~
~~~*~~~~~
~~~*~~~~~
~~~#~~~~~
");
    }

    #[test]
    fn meadow_rises_with_the_budget() {
        let board = board(MEADOW);

        for budget in [0, 3] {
            assert_eq!(
                board.solve(&SolveConfig::new(budget)).unwrap_err(),
                SolveError::Infeasible { max_walls: budget }
            );
        }

        // four walls buy exactly the horse
        let tight = board.solve(&SolveConfig::new(4)).unwrap();
        assert_eq!(tight.score(), 1);
        assert_eq!(tight.walls_used(), 4);
        assert_eq!(tight.pasture_tiles(), 0);
        assert_eq!(format!("{}", tight), ".....
..#..
.#H#.
..#..
.....
");

        // eight buy the horse and four neighbors
        let wide = board.solve(&SolveConfig::new(8)).unwrap();
        assert_eq!(wide.score(), 5);
        verify_enclosure(&board, &wide, 8);
    }

    #[test]
    fn islet_needs_no_walls() {
        let board = board(ISLET);
        let enclosure = board.solve(&SolveConfig::new(0)).unwrap();

        assert_eq!(enclosure.status(), SolveStatus::Optimal);
        assert_eq!(enclosure.score(), 1);
        assert_eq!(enclosure.walls_used(), 0);
        assert_eq!(format!("{}", enclosure), ISLET);
    }

    #[test]
    fn encodings_agree() {
        for (text, budget) in [(NECK, 2), (MEADOW, 8), (PORTALS, 10)] {
            let board = board(text);
            let flow = board
                .solve(&SolveConfig::new(budget).with_connectivity(Connectivity::Flow))
                .unwrap();
            let reach = board
                .solve(&SolveConfig::new(budget).with_connectivity(Connectivity::Reachability))
                .unwrap();
            assert_eq!(flow.score(), reach.score());
        }
    }

    #[test]
    fn deadline_keeps_the_incumbent() {
        let board = board(NECK);
        let config = SolveConfig::new(2).with_time_limit(Duration::ZERO);
        let enclosure = board.solve(&config).unwrap();

        assert_eq!(enclosure.status(), SolveStatus::TimedOut);
        assert_eq!(enclosure.score(), 15);
    }

    struct Stalled;

    impl SolverAdapter for Stalled {
        fn solve(&self, _model: &Model, _options: &SolveOptions) -> Result<Outcome, SolveError> {
            Ok(Outcome::TimedOut { best: None })
        }
    }

    #[test]
    fn deadline_without_incumbent_is_an_error() {
        let board = board(NECK);
        assert_eq!(
            board.solve_with(&Stalled, &SolveConfig::new(2)).unwrap_err(),
            SolveError::TimedOut
        );
    }

    struct Unproven;

    impl SolverAdapter for Unproven {
        fn solve(&self, model: &Model, options: &SolveOptions) -> Result<Outcome, SolveError> {
            match MilpSolver.solve(model, options)? {
                Outcome::Optimal { solution, objective } => Ok(Outcome::Feasible { solution, objective }),
                other => Ok(other),
            }
        }
    }

    #[test]
    fn feasible_outcomes_map_through() {
        let board = board(ISLET);
        let enclosure = board.solve_with(&Unproven, &SolveConfig::new(0)).unwrap();

        assert_eq!(enclosure.status(), SolveStatus::Feasible);
        assert_eq!(enclosure.score(), 1);
    }

    struct Inflated;

    impl SolverAdapter for Inflated {
        fn solve(&self, model: &Model, options: &SolveOptions) -> Result<Outcome, SolveError> {
            match MilpSolver.solve(model, options)? {
                Outcome::Optimal { solution, objective } => {
                    Ok(Outcome::Optimal { solution, objective: objective + 1 })
                }
                other => Ok(other),
            }
        }
    }

    #[test]
    fn reported_objective_is_cross_checked() {
        let board = board(ISLET);
        assert_eq!(
            board.solve_with(&Inflated, &SolveConfig::new(0)).unwrap_err(),
            SolveError::ScoreMismatch { computed: 1, reported: 2 }
        );
    }

    #[test]
    fn palette() {
        assert_eq!(hue(Tile::Water, TileState::Water), Hue::Blue);
        assert_eq!(hue(Tile::Horse, TileState::Horse), Hue::Brown);
        assert_eq!(hue(Tile::Grass, TileState::Wall), Hue::LightGrey);
        assert_eq!(hue(Tile::Portal(3), TileState::Pasture), Hue::Purple);
        assert_eq!(hue(Tile::Portal(3), TileState::Grass), Hue::Purple);
        assert_eq!(hue(Tile::Cherry, TileState::Pasture), Hue::Yellow);
        assert_eq!(hue(Tile::Cherry, TileState::Grass), Hue::Green);
        assert_eq!(hue(Tile::Grass, TileState::Pasture), Hue::Green);
    }

    #[test]
    fn config_defaults() {
        let config = SolveConfig::new(5);
        assert_eq!(config.max_walls, 5);
        assert_eq!(config.connectivity, Connectivity::Reachability);
        assert_eq!(config.cherry_bonus, 3);
        assert_eq!(config.time_limit, None);
    }
}
