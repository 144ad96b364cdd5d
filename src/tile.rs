/// One tile of a parsed map.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tile {
    /// Impassable water. Never enclosed, never walled.
    Water,
    /// Plain grass. May become a wall or part of the pasture.
    Grass,
    /// The horse. Exactly one per map, always enclosed.
    Horse,
    /// One end of a portal pair, carrying the pair's digit.
    Portal(u8),
    /// A cherry tile. Worth a bonus when enclosed, but cannot hold a wall.
    Cherry,
}

impl Tile {
    pub(crate) fn from_char(value: char) -> Option<Self> {
        match value {
            '~' => Some(Self::Water),
            '.' => Some(Self::Grass),
            'H' => Some(Self::Horse),
            'C' => Some(Self::Cherry),
            '0'..='9' => Some(Self::Portal(value as u8 - b'0')),
            _ => None,
        }
    }

    pub(crate) fn to_char(self) -> char {
        match self {
            Self::Water => '~',
            Self::Grass => '.',
            Self::Horse => 'H',
            Self::Cherry => 'C',
            Self::Portal(id) => (id + b'0') as char,
        }
    }

    /// Whether this tile participates in the optimization at all.
    pub(crate) fn is_candidate(self) -> bool {
        !matches!(self, Self::Water)
    }

    /// Whether a wall may be placed on this tile.
    pub(crate) fn wallable(self) -> bool {
        matches!(self, Self::Grass)
    }

    /// Score contributed when this tile ends up enclosed.
    pub(crate) fn value(self, cherry_bonus: i64) -> i64 {
        match self {
            Self::Cherry => 1 + cherry_bonus,
            _ => 1,
        }
    }
}
