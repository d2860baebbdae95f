use serde::Serialize;
use std::fmt;

/// Catch-ups per student that are not charged.
pub const FREE_CATCHUPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Free,
    Charge,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "Free",
            Tier::Charge => "Charge",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier of the catch-up at 1-based `position` in a student's sequence.
pub fn tier_for(position: usize) -> Tier {
    debug_assert!(position >= 1, "catch-up positions are 1-based");
    if position <= FREE_CATCHUPS {
        Tier::Free
    } else {
        Tier::Charge
    }
}
