//! Per-cell burn state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Burn state of a single grid cell.
///
/// Legal transitions are `Unburned → Burning → Burned` and
/// `Unburned → Firebreak`. Nothing ever returns to `Unburned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CellState {
    /// Not yet reached by fire
    #[default]
    Unburned = 0,
    /// Actively burning
    Burning = 1,
    /// Burnt out
    Burned = 2,
    /// Cleared buffer marked by the firebreak pass
    Firebreak = 3,
}

impl CellState {
    /// All states in reporting order
    pub const ALL: [CellState; 4] = [
        CellState::Unburned,
        CellState::Burning,
        CellState::Burned,
        CellState::Firebreak,
    ];

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CellState::Unburned),
            1 => Some(CellState::Burning),
            2 => Some(CellState::Burned),
            3 => Some(CellState::Firebreak),
            _ => None,
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether `self → next` is a legal transition (staying put is always legal)
    pub fn can_transition_to(self, next: CellState) -> bool {
        matches!(
            (self, next),
            (CellState::Unburned, _)
                | (CellState::Burning, CellState::Burning | CellState::Burned)
                | (CellState::Burned, CellState::Burned)
                | (CellState::Firebreak, CellState::Firebreak)
        )
    }

    /// Burning or burned: the cell has been reached by fire
    pub fn is_fire_affected(self) -> bool {
        matches!(self, CellState::Burning | CellState::Burned)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellState::Unburned => "unburned",
            CellState::Burning => "burning",
            CellState::Burned => "burned",
            CellState::Firebreak => "firebreak",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_conversion() {
        for state in CellState::ALL {
            assert_eq!(CellState::from_u8(state.as_u8()), Some(state));
        }
        assert_eq!(CellState::from_u8(4), None);
    }

    #[test]
    fn test_transitions() {
        use CellState::{Burned, Burning, Firebreak, Unburned};

        assert!(Unburned.can_transition_to(Burning));
        assert!(Unburned.can_transition_to(Firebreak));
        assert!(Burning.can_transition_to(Burned));

        assert!(!Burning.can_transition_to(Unburned));
        assert!(!Burned.can_transition_to(Burning));
        assert!(!Burning.can_transition_to(Firebreak));
        assert!(!Firebreak.can_transition_to(Burning));
    }
}
