//! Position evaluation

use crate::game::{GameState, Player};
use serde::{Deserialize, Serialize};

/// Score of a position the side to move has won
pub const WIN_SCORE: i32 = i32::MAX;

/// Score of a position the side to move has lost
pub const LOSS_SCORE: i32 = -i32::MAX;

/// Largest distance from the center cell
const MAX_DISTANCE: i32 = 4;

/// Heuristic weights for position evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Value of the first reserve piece
    pub reserve_base: i32,
    /// How fast each further reserve piece loses value
    pub reserve_falloff: i32,
    /// Value per piece on the board
    pub material_weight: i32,
    /// Scale of the quadratic elimination term
    pub elimination_weight: i32,
    /// Value per ring of closeness to the center; 0 disables
    pub center_weight: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            reserve_base: 280,
            reserve_falloff: 20,
            material_weight: 230,
            elimination_weight: 10,
            center_weight: 4,
        }
    }
}

impl Heuristics {
    /// Value of holding `pieces_left` pieces in reserve.
    ///
    /// `n * (base - floor(cbrt(n - 1) * falloff))`: each extra piece is worth
    /// a little less than the one before.
    pub fn reserve_value(&self, pieces_left: i32) -> i32 {
        let spread = f64::from(pieces_left - 1).cbrt() * f64::from(self.reserve_falloff);
        let falloff = spread.floor() as i32;
        pieces_left * (self.reserve_base - falloff)
    }

    fn positional(&self, state: &GameState, player: Player) -> i32 {
        if self.center_weight == 0 {
            return 0;
        }
        state
            .pieces(player)
            .iter()
            .map(|pos| self.center_weight * (MAX_DISTANCE - i32::from(pos.distance_to_center())))
            .sum()
    }
}

/// Evaluate position from the side to move's perspective.
///
/// Terminal positions return `WIN_SCORE` / `LOSS_SCORE`. An exhausted side
/// to move counts as lost even if the opponent is exhausted too.
pub fn evaluate(state: &GameState, heuristics: &Heuristics) -> i32 {
    let current = state.current_player();
    if state.is_terminal() {
        return if state.reserve(current) <= 0 {
            LOSS_SCORE
        } else {
            WIN_SCORE
        };
    }

    let white = Player::White;
    let black = Player::Black;

    let mut score = heuristics.reserve_value(state.reserve(white))
        - heuristics.reserve_value(state.reserve(black));

    score += heuristics.material_weight * (state.on_board(white) - state.on_board(black));

    // Fewer losses is better, and the difference matters more as losses mount
    let dead_white = state.eliminated(white);
    let dead_black = state.eliminated(black);
    score += heuristics.elimination_weight * (dead_black - dead_white) * (dead_black + dead_white);

    score += heuristics.positional(state, white) - heuristics.positional(state, black);

    if current == Player::Black {
        -score
    } else {
        score
    }
}
