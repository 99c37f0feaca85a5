//! Game state, move generation and reversible move application

use crate::bitset::PositionSet;
use crate::board::{Direction, Position, CELL_COUNT, GEOMETRY};
use crate::capture::{capture_plans, CaptureMask, CapturePlan};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eval::{evaluate, Heuristics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Initialization string symbol for a White piece
pub const WHITE_SYMBOL: char = '1';

/// Initialization string symbol for a Black piece
pub const BLACK_SYMBOL: char = '2';

/// Initialization string symbol for an empty cell
pub const EMPTY_SYMBOL: char = '_';

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color; White moves first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> char {
        match self {
            Player::White => WHITE_SYMBOL,
            Player::Black => BLACK_SYMBOL,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("White"),
            Player::Black => f.write_str("Black"),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
}

/// A legal move: push a new piece in from an edge cell, then take one
/// capture plan (empty when nothing completes)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub insertion: Position,
    pub direction: Direction,
    pub captures: CapturePlan,
}

impl Move {
    pub fn new(insertion: Position, direction: Direction) -> Self {
        Self {
            insertion,
            direction,
            captures: Vec::new(),
        }
    }

    pub fn with_captures(insertion: Position, direction: Direction, captures: CapturePlan) -> Self {
        Self {
            insertion,
            direction,
            captures,
        }
    }

    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.insertion, self.direction)?;
        for mask in &self.captures {
            write!(f, " x{}", mask)?;
        }
        Ok(())
    }
}

/// Copyable board state, without history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pieces: [PositionSet; 2],
    occupied: PositionSet,
    reserves: [i32; 2],
    eliminated: [i32; 2],
    to_move: Player,
}

impl Snapshot {
    fn empty(starting_reserve: i32) -> Self {
        Self {
            pieces: [PositionSet::EMPTY; 2],
            occupied: PositionSet::EMPTY,
            reserves: [starting_reserve; 2],
            eliminated: [0; 2],
            to_move: Player::White,
        }
    }

    pub fn pieces(&self, player: Player) -> PositionSet {
        self.pieces[player.index()]
    }

    pub fn reserve(&self, player: Player) -> i32 {
        self.reserves[player.index()]
    }

    pub fn eliminated(&self, player: Player) -> i32 {
        self.eliminated[player.index()]
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Bring the mover's piece in from `insertion` and shift the chain
    fn push(&mut self, insertion: Position, direction: Direction) {
        let mover = self.to_move.index();
        self.pieces[mover].slide(insertion, direction, &mut self.occupied);
        self.pieces[1 - mover] = self.occupied.difference(self.pieces[mover]);
        self.reserves[mover] -= 1;
    }

    /// Remove a captured line: the owner reclaims its pieces, the other
    /// player's pieces leave the game
    fn capture(&mut self, mask: &CaptureMask) {
        let owner = mask.owner.index();
        let other = mask.owner.opponent().index();

        let reclaimed = self.pieces[owner].intersection(mask.cells).count() as i32;
        let lost = self.pieces[other].intersection(mask.cells).count() as i32;
        self.reserves[owner] += reclaimed;
        self.eliminated[other] += lost;

        self.pieces[owner] = self.pieces[owner].difference(mask.cells);
        self.pieces[other] = self.pieces[other].difference(mask.cells);
        self.occupied = self.occupied.difference(mask.cells);
    }

    fn plans(&self) -> Vec<CapturePlan> {
        capture_plans(&self.pieces, self.to_move)
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state, mutated in place by `apply` / `undo`
#[derive(Clone, Debug)]
pub struct GameState {
    current: Snapshot,
    history: Vec<Snapshot>,
    starting_reserve: i32,
    heuristics: Heuristics,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, default reserves and weights
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Empty board with configured reserves and weights
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            current: Snapshot::empty(config.starting_reserve),
            history: Vec::new(),
            starting_reserve: config.starting_reserve,
            heuristics: config.heuristics,
        }
    }

    /// Build from a 61-character string in canonical cell order.
    ///
    /// `'1'` marks White, `'2'` Black, `'_'` an empty cell. Each player's
    /// reserve is the configured starting reserve minus its pieces on board.
    pub fn from_init_string(init: &str, config: &EngineConfig) -> Result<Self, EngineError> {
        let actual = init.chars().count();
        if actual != CELL_COUNT {
            return Err(EngineError::InvalidLength {
                expected: CELL_COUNT,
                actual,
            });
        }

        let mut state = Self::with_config(config);
        for (pos, symbol) in Position::all().zip(init.chars()) {
            let player = match symbol {
                WHITE_SYMBOL => Player::White,
                BLACK_SYMBOL => Player::Black,
                EMPTY_SYMBOL => continue,
                _ => {
                    return Err(EngineError::UnknownSymbol {
                        symbol,
                        index: pos.index(),
                    })
                }
            };
            state.current.pieces[player.index()].insert(pos);
            state.current.occupied.insert(pos);
            state.current.reserves[player.index()] -= 1;
        }

        Ok(state)
    }

    /// Inverse of `from_init_string` for the board part of the state
    pub fn to_init_string(&self) -> String {
        Position::all()
            .map(|pos| self.owner_of(pos).map_or(EMPTY_SYMBOL, Player::symbol))
            .collect()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.current.to_move
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        !self.current.occupied.contains(pos)
    }

    /// Owner of the piece at `pos`, if any
    pub fn owner_of(&self, pos: Position) -> Option<Player> {
        if self.current.pieces[Player::White.index()].contains(pos) {
            Some(Player::White)
        } else if self.current.pieces[Player::Black.index()].contains(pos) {
            Some(Player::Black)
        } else {
            None
        }
    }

    pub fn pieces(&self, player: Player) -> PositionSet {
        self.current.pieces(player)
    }

    pub fn occupied(&self) -> PositionSet {
        self.current.occupied
    }

    /// Pieces not yet placed
    pub fn reserve(&self, player: Player) -> i32 {
        self.current.reserve(player)
    }

    /// Pieces permanently removed from play
    pub fn eliminated(&self, player: Player) -> i32 {
        self.current.eliminated(player)
    }

    /// Pieces on the board
    pub fn on_board(&self, player: Player) -> i32 {
        self.current.pieces(player).count() as i32
    }

    pub fn starting_reserve(&self) -> i32 {
        self.starting_reserve
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Copy of the current state without history
    pub fn snapshot(&self) -> Snapshot {
        self.current
    }

    /// Number of moves that can be undone
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ========================================================================
    // TERMINAL / WIN
    // ========================================================================

    /// True once either player has run out of reserve pieces
    pub fn is_terminal(&self) -> bool {
        self.current.reserves.iter().any(|&reserve| reserve <= 0)
    }

    /// True if `player`'s opponent has run out of reserve pieces
    pub fn is_winner(&self, player: Player) -> bool {
        self.reserve(player.opponent()) <= 0
    }

    /// Outcome; an exhausted side to move loses even if both are exhausted
    pub fn result(&self) -> GameResult {
        let to_move = self.current_player();
        let winner = if self.reserve(to_move) <= 0 {
            to_move.opponent()
        } else if self.reserve(to_move.opponent()) <= 0 {
            to_move
        } else {
            return GameResult::Ongoing;
        };
        match winner {
            Player::White => GameResult::WhiteWins,
            Player::Black => GameResult::BlackWins,
        }
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Generate all legal moves, in insertion-table then plan order
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        if self.is_terminal() {
            return moves;
        }

        for point in GEOMETRY.insertion_points() {
            for &direction in &point.directions {
                if !self.current.occupied.can_push_from(point.position, direction) {
                    continue;
                }

                let mut scratch = self.current;
                scratch.push(point.position, direction);
                let plans = scratch.plans();

                if plans.is_empty() {
                    moves.push(Move::new(point.position, direction));
                } else {
                    moves.extend(
                        plans
                            .into_iter()
                            .map(|plan| Move::with_captures(point.position, direction, plan)),
                    );
                }
            }
        }

        moves
    }

    // ========================================================================
    // APPLY / UNDO
    // ========================================================================

    /// Apply a move in place.
    ///
    /// Moves that `legal_moves` would not produce are rejected and leave the
    /// state untouched.
    pub fn apply(&mut self, mv: &Move) -> Result<(), EngineError> {
        if self.is_terminal() {
            return Err(self.reject(mv, "game is over"));
        }
        if !GEOMETRY.is_entry(mv.insertion, mv.direction) {
            return Err(self.reject(mv, "not an insertion point"));
        }
        if !self.current.occupied.can_push_from(mv.insertion, mv.direction) {
            return Err(self.reject(mv, "push is blocked"));
        }

        let before = self.current;
        self.current.push(mv.insertion, mv.direction);

        let plans = self.current.plans();
        let plan_is_legal = if plans.is_empty() {
            mv.captures.is_empty()
        } else {
            plans.iter().any(|plan| *plan == mv.captures)
        };
        if !plan_is_legal {
            self.current = before;
            return Err(self.reject(mv, "capture plan does not match the board"));
        }

        for mask in &mv.captures {
            self.current.capture(mask);
        }
        self.current.to_move = self.current.to_move.opponent();
        self.history.push(before);

        tracing::trace!(%mv, depth = self.history.len(), "applied move");
        self.debug_check_invariants();
        Ok(())
    }

    /// Restore the state before the most recent `apply`.
    ///
    /// # Panics
    ///
    /// Panics if there is nothing to undo; callers must undo in exact reverse
    /// order of application.
    pub fn undo(&mut self) {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                tracing::trace!(depth = self.history.len(), "undid move");
            }
            None => panic!("undo called with empty history"),
        }
    }

    fn reject(&self, mv: &Move, reason: &'static str) -> EngineError {
        tracing::debug!(%mv, reason, "rejected move");
        EngineError::IllegalMove {
            mv: mv.to_string(),
            reason,
        }
    }

    fn debug_check_invariants(&self) {
        let white = self.current.pieces[Player::White.index()];
        let black = self.current.pieces[Player::Black.index()];
        debug_assert!(!white.intersects(black), "player sets overlap");
        debug_assert_eq!(white.union(black), self.current.occupied, "occupancy out of sync");
    }

    // ========================================================================
    // EVALUATION
    // ========================================================================

    /// Static score from the side to move's point of view
    pub fn get_goodness(&self) -> i32 {
        evaluate(self, &self.heuristics)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for GameState {
    type Err = EngineError;

    fn from_str(init: &str) -> Result<Self, Self::Err> {
        Self::from_init_string(init, &EngineConfig::default())
    }
}

// Equality and hashing look at the position only, not at how it was reached
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.current.hash(state);
    }
}

// ============================================================================
// TESTS
// ============================================================================
