//! Capture detection and grouping into alternative capture plans
//!
//! After a push, any line holding a contiguous run of four or more pieces of
//! one player is captured together with every piece extending it on either
//! side (the whole occupied segment of the line around the run). When
//! several captures overlap, only one of each overlapping group can be taken;
//! the mover picks one plan.

use crate::bitset::PositionSet;
use crate::board::GEOMETRY;
use crate::game::Player;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pieces of one player in a row needed to capture
pub const RUN_LENGTH: u32 = 4;

/// Cells removed by a single captured line, and the player reclaiming them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureMask {
    pub cells: PositionSet,
    pub owner: Player,
}

impl fmt::Display for CaptureMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.cells)
    }
}

/// Non-intersecting masks captured together
pub type CapturePlan = Vec<CaptureMask>;

/// Find every line completed on this board.
///
/// Lines are scanned for the mover first, then the opponent; a segment
/// reached from both players (or from two runs) is reported once.
pub fn find_capture_masks(pieces: &[PositionSet; 2], mover: Player) -> Vec<CaptureMask> {
    let occupied = pieces[0].union(pieces[1]);
    let mut masks: Vec<CaptureMask> = Vec::new();

    for player in [mover, mover.opponent()] {
        let own = pieces[player.index()];
        if own.count() < RUN_LENGTH {
            continue;
        }

        for line in GEOMETRY.lines() {
            let mut segment = PositionSet::EMPTY;
            let mut run = 0;
            let mut completed = false;

            for &cell in &line.cells {
                if occupied.contains(cell) {
                    segment.insert(cell);
                    if own.contains(cell) {
                        run += 1;
                        completed |= run >= RUN_LENGTH;
                    } else {
                        run = 0;
                    }
                } else {
                    if completed {
                        record(&mut masks, segment, pieces, player);
                    }
                    segment = PositionSet::EMPTY;
                    run = 0;
                    completed = false;
                }
            }
            if completed {
                record(&mut masks, segment, pieces, player);
            }
        }
    }

    masks
}

fn record(
    masks: &mut Vec<CaptureMask>,
    cells: PositionSet,
    pieces: &[PositionSet; 2],
    runner: Player,
) {
    if masks.iter().any(|mask| mask.cells == cells) {
        return;
    }
    masks.push(CaptureMask {
        cells,
        owner: majority_owner(cells, pieces, runner),
    });
}

/// Player holding most of `cells`; ties go to the player whose run completed
fn majority_owner(cells: PositionSet, pieces: &[PositionSet; 2], runner: Player) -> Player {
    let white = cells.intersection(pieces[Player::White.index()]).count();
    let black = cells.intersection(pieces[Player::Black.index()]).count();
    match white.cmp(&black) {
        std::cmp::Ordering::Greater => Player::White,
        std::cmp::Ordering::Less => Player::Black,
        std::cmp::Ordering::Equal => runner,
    }
}

/// Group masks into alternative plans.
///
/// Each mask joins the first plan none of whose members it intersects,
/// otherwise it opens a new plan.
pub fn group_into_plans(masks: &[CaptureMask]) -> Vec<CapturePlan> {
    let mut plans: Vec<CapturePlan> = Vec::new();
    for &mask in masks {
        let compatible = plans
            .iter_mut()
            .find(|plan| plan.iter().all(|member| !member.cells.intersects(mask.cells)));
        match compatible {
            Some(plan) => plan.push(mask),
            None => plans.push(vec![mask]),
        }
    }
    plans
}

/// Alternative capture plans for a post-push board (empty if nothing completes)
pub fn capture_plans(pieces: &[PositionSet; 2], mover: Player) -> Vec<CapturePlan> {
    group_into_plans(&find_capture_masks(pieces, mover))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    fn cell(file: i8, row: i8) -> Position {
        Position::from_coords(file, row).unwrap()
    }

    fn set(cells: &[(i8, i8)]) -> PositionSet {
        cells.iter().map(|&(f, r)| cell(f, r)).collect()
    }

    fn mask(cells: &[(i8, i8)]) -> CaptureMask {
        CaptureMask { cells: set(cells), owner: Player::White }
    }

    #[test]
    fn test_no_capture_below_four() {
        let pieces = [set(&[(1, 0), (1, 1), (1, 2)]), PositionSet::EMPTY];
        assert!(find_capture_masks(&pieces, Player::White).is_empty());
        assert!(capture_plans(&pieces, Player::White).is_empty());
    }

    #[test]
    fn test_run_of_four() {
        let pieces = [set(&[(1, 0), (1, 1), (1, 2), (1, 3)]), PositionSet::EMPTY];
        let masks = find_capture_masks(&pieces, Player::Black);
        assert_eq!(masks, vec![mask(&[(1, 0), (1, 1), (1, 2), (1, 3)])]);
    }

    #[test]
    fn test_segment_extends_past_run() {
        // Black piece and a gap after it: the segment ends at the gap
        let white = set(&[(4, 1), (4, 2), (4, 3), (4, 4)]);
        let black = set(&[(4, 0), (4, 5), (4, 7)]);
        let masks = find_capture_masks(&[white, black], Player::White);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].cells, set(&[(4, 0), (4, 1), (4, 2), (4, 3), (4, 4), (4, 5)]));
        assert_eq!(masks[0].owner, Player::White);
    }

    #[test]
    fn test_shared_segment_reported_once() {
        // Both players own a run of four in one fully occupied segment
        let white = set(&[(4, 0), (4, 1), (4, 2), (4, 3)]);
        let black = set(&[(4, 4), (4, 5), (4, 6), (4, 7)]);
        let masks = find_capture_masks(&[white, black], Player::Black);
        assert_eq!(masks.len(), 1);
        // Four apiece: the mover's run wins the tie
        assert_eq!(masks[0].owner, Player::Black);
    }

    #[test]
    fn test_majority_owner() {
        let white = set(&[(4, 0), (4, 1), (4, 2), (4, 3), (4, 4)]);
        let black = set(&[(4, 5), (4, 6), (4, 7), (4, 8)]);
        let masks = find_capture_masks(&[white, black], Player::Black);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].owner, Player::White);
    }

    #[test]
    fn test_grouping_intersecting_masks() {
        let a = mask(&[(1, 0), (1, 1), (1, 2), (1, 3)]);
        let b = mask(&[(1, 3), (2, 4), (3, 5), (4, 6)]);
        let c = mask(&[(6, 0), (6, 1), (6, 2), (6, 3)]);

        let plans = group_into_plans(&[a, b, c]);
        assert_eq!(plans, vec![vec![a, c], vec![b]]);
    }

    #[test]
    fn test_grouping_disjoint_masks() {
        let a = mask(&[(1, 0), (1, 1), (1, 2), (1, 3)]);
        let c = mask(&[(6, 0), (6, 1), (6, 2), (6, 3)]);
        assert_eq!(group_into_plans(&[a, c]), vec![vec![a, c]]);
        assert!(group_into_plans(&[]).is_empty());
    }

    #[test]
    fn test_intersecting_lines_give_two_plans() {
        let white = set(&[(1, 0), (1, 1), (1, 2), (1, 3), (2, 4), (3, 5), (4, 6)]);
        let plans = capture_plans(&[white, PositionSet::EMPTY], Player::White);
        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|plan| plan.len() == 1));
        assert!(plans[0][0].cells.intersects(plans[1][0].cells));
        assert!(plans[0][0].cells.contains(cell(1, 3)));
    }
}
