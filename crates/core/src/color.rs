/// Side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Both colors, Black first
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The cell occupied by a stone of this color
    pub fn cell(self) -> Cell {
        match self {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }

    /// Index into per-color arrays (Black = 0, White = 1)
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Contents of a single board square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Color of the stone on this cell, if any
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
        }
    }

    pub(crate) fn to_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }

    pub(crate) fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Black),
            'O' | 'o' => Some(Cell::White),
            _ => None,
        }
    }
}
