use std::fmt;
use std::ops::Neg;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Colour of a stone. Serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum Stone {
    Black = 1,
    White = -1,
}

impl Stone {
    pub fn opp(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Single-letter form used by SGF and the analysis engine ("B" / "W").
    pub fn letter(self) -> &'static str {
        match self {
            Stone::Black => "B",
            Stone::White => "W",
        }
    }

    /// Accepts anything starting with `b`/`w` in either case ("B", "white", ...).
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim().chars().next()?.to_ascii_uppercase() {
            'B' => Some(Stone::Black),
            'W' => Some(Stone::White),
            _ => None,
        }
    }
}

impl Neg for Stone {
    type Output = Self;

    fn neg(self) -> Self {
        self.opp()
    }
}

/// Lowercase, matching [`crate::Cell`]'s display.
impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stone::Black => "black",
            Stone::White => "white",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    #[test]
    fn letters_round_trip() {
        for stone in [Stone::Black, Stone::White] {
            assert_eq!(Stone::from_letter(stone.letter()), Some(stone));
            assert_eq!(Stone::from_letter(stone.opp().letter()), Some(-stone));
        }
    }

    #[test]
    fn from_letter_is_lenient() {
        assert_eq!(Stone::from_letter("white"), Some(Stone::White));
        assert_eq!(Stone::from_letter(" b"), Some(Stone::Black));
        assert_eq!(Stone::from_letter("x"), None);
        assert_eq!(Stone::from_letter(""), None);
    }

    #[test]
    fn displays_like_its_cell() {
        for stone in [Stone::Black, Stone::White] {
            assert_eq!(stone.to_string(), Cell::from(stone).to_string());
        }
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Stone::White).unwrap(), "-1");
        let s: Stone = serde_json::from_str("1").unwrap();
        assert_eq!(s, Stone::Black);
    }
}
