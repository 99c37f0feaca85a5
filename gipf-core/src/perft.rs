//! Move-generation verification: leaf counts over the game tree

use crate::error::EngineError;
use crate::game::{GameState, Move, Snapshot};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Counters gathered by `perft`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerftStats {
    /// Leaf positions (terminal positions count as leaves)
    pub nodes: u64,
    /// Last-ply moves that capture at least one line
    pub captures: u64,
    /// Last-ply moves that are one of several plans for the same push
    pub plan_choices: u64,
    /// Leaves where the game is over
    pub terminals: u64,
}

impl PerftStats {
    pub fn merge(&mut self, other: PerftStats) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.plan_choices += other.plan_choices;
        self.terminals += other.terminals;
    }
}

/// Walk the tree to `depth` plies with apply / undo
pub fn perft(state: &mut GameState, depth: u32) -> Result<PerftStats, EngineError> {
    let mut stats = PerftStats::default();
    walk(state, depth, &mut stats)?;
    Ok(stats)
}

fn walk(state: &mut GameState, depth: u32, stats: &mut PerftStats) -> Result<(), EngineError> {
    if state.is_terminal() {
        stats.nodes += 1;
        stats.terminals += 1;
        return Ok(());
    }
    if depth == 0 {
        stats.nodes += 1;
        return Ok(());
    }

    let moves = state.legal_moves();
    for mv in &moves {
        if depth == 1 {
            if mv.is_capture() {
                stats.captures += 1;
            }
            if has_alternatives(&moves, mv) {
                stats.plan_choices += 1;
            }
        }
        state.apply(mv)?;
        let result = walk(state, depth - 1, stats);
        state.undo();
        result?;
    }
    Ok(())
}

fn has_alternatives(moves: &[Move], mv: &Move) -> bool {
    moves
        .iter()
        .filter(|other| other.insertion == mv.insertion && other.direction == mv.direction)
        .count()
        > 1
}

/// Number of distinct positions exactly `depth` plies ahead (terminal
/// positions reached earlier are included)
pub fn unique_positions(state: &mut GameState, depth: u32) -> Result<usize, EngineError> {
    let mut seen: FxHashSet<Snapshot> = FxHashSet::default();
    collect(state, depth, &mut seen)?;
    Ok(seen.len())
}

fn collect(
    state: &mut GameState,
    depth: u32,
    seen: &mut FxHashSet<Snapshot>,
) -> Result<(), EngineError> {
    if depth == 0 || state.is_terminal() {
        seen.insert(state.snapshot());
        return Ok(());
    }
    for mv in state.legal_moves() {
        state.apply(&mv)?;
        let result = collect(state, depth - 1, seen);
        state.undo();
        result?;
    }
    Ok(())
}

/// `perft` with root moves split across worker threads, each on its own clone
#[cfg(feature = "parallel")]
pub fn perft_parallel(state: &GameState, depth: u32) -> Result<PerftStats, EngineError> {
    use rayon::prelude::*;

    if depth <= 1 || state.is_terminal() {
        return perft(&mut state.clone(), depth);
    }

    let per_move: Vec<PerftStats> = state
        .legal_moves()
        .par_iter()
        .map(|mv| {
            let mut worker = state.clone();
            worker.apply(mv)?;
            perft(&mut worker, depth - 1)
        })
        .collect::<Result<_, _>>()?;

    let mut stats = PerftStats::default();
    for child in per_move {
        stats.merge(child);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_shallow() {
        let mut game = GameState::new();
        assert_eq!(perft(&mut game, 0).unwrap().nodes, 1);

        let stats = perft(&mut game, 1).unwrap();
        assert_eq!(stats.nodes, 42);
        assert_eq!(stats.captures, 0);
        assert_eq!(stats.plan_choices, 0);
        assert_eq!(stats.terminals, 0);
        assert_eq!(game.history_len(), 0);
    }

    #[test]
    fn test_perft_two_plies() {
        let mut game = GameState::new();
        let before = game.clone();
        let stats = perft(&mut game, 2).unwrap();
        // Every first push leaves all 42 entries open
        assert_eq!(stats.nodes, 42 * 42);
        assert_eq!(game, before);
    }

    #[test]
    fn test_unique_positions() {
        let mut game = GameState::new();
        assert_eq!(unique_positions(&mut game, 0).unwrap(), 1);
        // Every entry lands on the ring just inside the edge; the 42 pushes
        // cover its 18 cells
        let landing: FxHashSet<_> = crate::GEOMETRY
            .insertion_points()
            .iter()
            .flat_map(|point| point.directions.iter().map(move |&dir| (point.position, dir)))
            .filter_map(|(pos, dir)| pos.neighbor(dir))
            .collect();
        assert!(landing.iter().all(|pos| pos.distance_to_center() == 3));
        assert_eq!(landing.len(), 18);
        assert_eq!(unique_positions(&mut game, 1).unwrap(), 18);
    }

    #[test]
    fn test_perft_counts_plan_choices() {
        let mut init = vec!['_'; 61];
        for (file, row) in [(1, 1), (1, 2), (1, 4), (2, 4), (3, 5), (4, 6)] {
            init[crate::Position::from_coords(file, row).unwrap().index()] = '1';
        }
        let mut game: GameState = init.into_iter().collect::<String>().parse().unwrap();
        let stats = perft(&mut game, 1).unwrap();
        // Filling b4 from b1 completes two lines through it
        assert!(stats.plan_choices >= 2);
        assert!(stats.captures >= stats.plan_choices);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let game = GameState::new();
        let serial = perft(&mut game.clone(), 3).unwrap();
        assert_eq!(perft_parallel(&game, 3).unwrap(), serial);
    }
}
