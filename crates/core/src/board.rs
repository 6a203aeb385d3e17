use std::str::FromStr;

use crate::color::{Cell, Color};
use crate::coord::{Coord, BOARD_SIZE, NUM_SQUARES};
use crate::error::{BoardError, InvalidMoveReason, Result};

/// Scan order for neighbours and capture rays: N, NE, E, SE, S, SW, W, NW
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Opponent stones flipped by a placement, in discovery order
pub type CaptureSet = Vec<Coord>;

/// Outcome of a finished (or scored) position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    BlackWins,
    WhiteWins,
    Draw,
}

/// 8x8 Reversi position with cached piece counts
///
/// The board does not track whose turn it is; every operation takes the
/// acting color explicitly. Counts always satisfy
/// `black + white + empty == 64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; NUM_SQUARES],
    /// Indexed by `Cell as usize`: empty, black, white
    counts: [u8; 3],
}

impl Board {
    /// Standard opening: D4/E5 white, E4/D5 black
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.put(Coord::new(3, 3), Cell::White);
        board.put(Coord::new(3, 4), Cell::Black);
        board.put(Coord::new(4, 3), Cell::Black);
        board.put(Coord::new(4, 4), Cell::White);
        board
    }

    /// Board with no stones
    pub fn empty() -> Self {
        Self {
            cells: [Cell::Empty; NUM_SQUARES],
            counts: [NUM_SQUARES as u8, 0, 0],
        }
    }

    /// Build a board from 64 cells in row-major order
    pub fn from_cells(cells: [Cell; NUM_SQUARES]) -> Self {
        let mut counts = [0u8; 3];
        for cell in cells {
            counts[cell as usize] += 1;
        }
        Self { cells, counts }
    }

    /// Contents of `coord`; off-board coordinates read as empty
    pub fn get(&self, coord: Coord) -> Cell {
        if coord.is_on_board() {
            self.cells[coord.index()]
        } else {
            Cell::Empty
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell; NUM_SQUARES] {
        &self.cells
    }

    pub fn count(&self, cell: Cell) -> u32 {
        self.counts[cell as usize] as u32
    }

    pub fn black_count(&self) -> u32 {
        self.count(Cell::Black)
    }

    pub fn white_count(&self) -> u32 {
        self.count(Cell::White)
    }

    pub fn empty_count(&self) -> u32 {
        self.count(Cell::Empty)
    }

    /// True when all 64 squares hold a stone
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    fn put(&mut self, coord: Coord, cell: Cell) {
        let idx = coord.index();
        let prev = self.cells[idx];
        self.counts[prev as usize] -= 1;
        self.counts[cell as usize] += 1;
        self.cells[idx] = cell;
    }

    /// Opponent stones that placing `color` at `coord` would flip
    ///
    /// An empty result means the placement is illegal (this includes
    /// occupied and off-board targets).
    pub fn can_flip(&self, coord: Coord, color: Color) -> CaptureSet {
        let mut captures = CaptureSet::new();
        if !coord.is_on_board() || self.get(coord) != Cell::Empty {
            return captures;
        }

        let own = color.cell();
        let opp = color.opponent().cell();

        for &(dr, dc) in &DIRECTIONS {
            let ray_start = captures.len();
            let mut cursor = coord.offset(dr, dc);
            let mut closed = false;

            while let Some(c) = cursor {
                match self.get(c) {
                    cell if cell == opp => {
                        captures.push(c);
                        cursor = c.offset(dr, dc);
                    }
                    cell if cell == own => {
                        closed = true;
                        break;
                    }
                    _ => break,
                }
            }

            // Ray ran into the edge or an empty square
            if !closed {
                captures.truncate(ray_start);
            }
        }

        captures
    }

    /// Legal placements for `color`, in a stable order
    ///
    /// Candidates are the empty squares next to an opponent stone, taken in the
    /// order opponent stones are met row by row (neighbours in N, NE, E, ... NW
    /// order); only candidates that capture something are returned.
    pub fn legal_moves(&self, color: Color) -> Vec<Coord> {
        let opp = color.opponent().cell();
        let mut seen = [false; NUM_SQUARES];
        let mut moves = Vec::new();

        for coord in Coord::all().filter(|&c| self.get(c) == opp) {
            for &(dr, dc) in &DIRECTIONS {
                let Some(candidate) = coord.offset(dr, dc) else {
                    continue;
                };
                let idx = candidate.index();
                if seen[idx] || self.cells[idx] != Cell::Empty {
                    continue;
                }
                seen[idx] = true;
                if !self.can_flip(candidate, color).is_empty() {
                    moves.push(candidate);
                }
            }
        }

        moves
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        !self.legal_moves(color).is_empty()
    }

    /// Legal placements, or an error explaining why there are none
    ///
    /// Returns `NoLegalMove` when `color` must pass and `GameOver` when
    /// neither side can move.
    pub fn require_moves(&self, color: Color) -> Result<Vec<Coord>> {
        let moves = self.legal_moves(color);
        if !moves.is_empty() {
            return Ok(moves);
        }
        if self.has_legal_move(color.opponent()) {
            Err(BoardError::NoLegalMove(color))
        } else {
            Err(BoardError::GameOver)
        }
    }

    /// Place a stone for `color` and flip the captured stones
    ///
    /// Returns the flipped coordinates, which [`Board::undo`] needs to
    /// restore the position.
    pub fn apply(&mut self, coord: Coord, color: Color) -> Result<CaptureSet> {
        let reason = if !coord.is_on_board() {
            Some(InvalidMoveReason::OutOfRange)
        } else if self.get(coord) != Cell::Empty {
            Some(InvalidMoveReason::Occupied)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(BoardError::InvalidMove { coord, reason });
        }

        let captures = self.can_flip(coord, color);
        if captures.is_empty() {
            return Err(BoardError::InvalidMove {
                coord,
                reason: InvalidMoveReason::NoCaptures,
            });
        }

        let own = color.cell();
        for &c in &captures {
            self.put(c, own);
        }
        self.put(coord, own);
        Ok(captures)
    }

    /// Exact inverse of [`Board::apply`]
    pub fn undo(&mut self, coord: Coord, captures: &[Coord], color: Color) {
        if !coord.is_on_board() {
            return;
        }
        self.put(coord, Cell::Empty);
        let opp = color.opponent().cell();
        for &c in captures {
            self.put(c, opp);
        }
    }

    /// True when neither color has a legal placement
    ///
    /// Empty squares may remain (mutual blockade).
    pub fn is_over(&self) -> bool {
        !self.has_legal_move(Color::Black) && !self.has_legal_move(Color::White)
    }

    /// Result by piece count, with the absolute margin (0 for a draw)
    pub fn winner(&self) -> (GameResult, u32) {
        let black = self.black_count();
        let white = self.white_count();
        if black > white {
            (GameResult::BlackWins, black - white)
        } else if white > black {
            (GameResult::WhiteWins, white - black)
        } else {
            (GameResult::Draw, 0)
        }
    }

    /// Three 8x8 feature planes (side to move, opponent, empty), flattened
    ///
    /// This is the input layout policy/value networks are trained on.
    pub fn to_planes(&self, to_move: Color) -> [f32; 3 * NUM_SQUARES] {
        let mut planes = [0f32; 3 * NUM_SQUARES];
        for (idx, cell) in self.cells.iter().enumerate() {
            let plane = match cell.color() {
                None => 2,
                Some(c) if c == to_move => 0,
                Some(_) => 1,
            };
            planes[plane * NUM_SQUARES + idx] = 1.0;
        }
        planes
    }

    /// 64 characters, row-major: `X` black, `O` white, `-` empty
    pub fn to_compact_string(&self) -> String {
        self.cells.iter().map(|c| c.to_char()).collect()
    }

    /// Eight lines of the compact form, one per row
    pub fn to_rows(&self) -> String {
        let mut out = String::with_capacity(NUM_SQUARES + BOARD_SIZE);
        for row in self.cells.chunks(BOARD_SIZE) {
            for cell in row {
                out.push(cell.to_char());
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse 64 cells (`X`, `O`, `-` or `.`); whitespace is ignored
    fn from_str(s: &str) -> Result<Self> {
        let mut cells = [Cell::Empty; NUM_SQUARES];
        let mut n = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            let cell = Cell::from_char(ch)
                .ok_or_else(|| BoardError::Parse(format!("unexpected character {ch:?}")))?;
            if n == NUM_SQUARES {
                return Err(BoardError::Parse("more than 64 cells".into()));
            }
            cells[n] = cell;
            n += 1;
        }
        if n != NUM_SQUARES {
            return Err(BoardError::Parse(format!("expected 64 cells, got {n}")));
        }
        Ok(Self::from_cells(cells))
    }
}
