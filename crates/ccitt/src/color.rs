//! Common structs and enums

/// Black or White Color
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Color {
    /// No-Ink
    #[default]
    White,
    /// Ink
    Black,
}

impl From<bool> for Color {
    fn from(b: bool) -> Color {
        if b {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl Color {
    /// Invert a color
    pub fn invert(&mut self) {
        *self = self.opposite();
    }

    /// The other color
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}
