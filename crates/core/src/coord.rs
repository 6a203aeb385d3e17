use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

/// Side length of the board
pub const BOARD_SIZE: usize = 8;

/// Number of squares on the board
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

const COLUMN_LETTERS: &[u8; BOARD_SIZE] = b"ABCDEFGH";

/// Zero-based board coordinate
///
/// The fields are public so callers can build arbitrary coordinates;
/// [`Coord::is_on_board`] tells whether one actually addresses a square.
/// The text form is a column letter followed by a row digit, e.g. `(2, 3)` is `"D3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Coordinate for a flat square index (`row * 8 + col`)
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NUM_SQUARES {
            Some(Self::new((index / BOARD_SIZE) as u8, (index % BOARD_SIZE) as u8))
        } else {
            None
        }
    }

    /// Flat square index (`row * 8 + col`)
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub fn is_on_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Neighbour one step away in direction `(dr, dc)`, if still on the board
    pub(crate) fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if (0..BOARD_SIZE as i16).contains(&row) && (0..BOARD_SIZE as i16).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// All 64 squares in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..NUM_SQUARES).filter_map(Coord::from_index)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(
                f,
                "{}{}",
                COLUMN_LETTERS[self.col as usize] as char,
                self.row + 1
            )
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

impl FromStr for Coord {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(BoardError::Parse(format!("invalid coordinate {s:?}")));
        }

        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c == bytes[0].to_ascii_uppercase());
        let row = match bytes[1] {
            b'1'..=b'8' => Some(bytes[1] - b'1'),
            _ => None,
        };

        match (row, col) {
            (Some(row), Some(col)) => Ok(Coord::new(row, col as u8)),
            _ => Err(BoardError::Parse(format!("invalid coordinate {s:?}"))),
        }
    }
}

/// An action for one side: place a stone, or pass when no placement is legal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Coord),
    Pass,
}

impl Move {
    /// Target square, `None` for a pass
    pub fn coord(self) -> Option<Coord> {
        match self {
            Move::Place(c) => Some(c),
            Move::Pass => None,
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, Move::Pass)
    }
}

impl From<Coord> for Move {
    fn from(c: Coord) -> Self {
        Move::Place(c)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(c) => c.fmt(f),
            Move::Pass => write!(f, "pass"),
        }
    }
}

impl FromStr for Move {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("pass") {
            Ok(Move::Pass)
        } else {
            s.parse().map(Move::Place)
        }
    }
}
