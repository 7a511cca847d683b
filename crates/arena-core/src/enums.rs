//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Team a player or shot belongs to. Wire codes follow declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    #[default]
    Rogue,
    Red,
    Green,
    Blue,
    Purple,
    Observer,
    Rabbit,
    Hunter,
}

impl TeamColor {
    pub fn wire_code(self) -> i16 {
        match self {
            TeamColor::Rogue => 0,
            TeamColor::Red => 1,
            TeamColor::Green => 2,
            TeamColor::Blue => 3,
            TeamColor::Purple => 4,
            TeamColor::Observer => 5,
            TeamColor::Rabbit => 6,
            TeamColor::Hunter => 7,
        }
    }

    pub fn from_wire_code(code: i16) -> Option<Self> {
        Some(match code {
            0 => TeamColor::Rogue,
            1 => TeamColor::Red,
            2 => TeamColor::Green,
            3 => TeamColor::Blue,
            4 => TeamColor::Purple,
            5 => TeamColor::Observer,
            6 => TeamColor::Rabbit,
            7 => TeamColor::Hunter,
            _ => return None,
        })
    }
}

/// Flag carried by a player (or by the player who fired a shot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagType {
    #[default]
    NoFlag,
    GuidedMissile,
    /// Invisible to radar and to missile seekers.
    Stealth,
    Cloaking,
    Jamming,
    SuperBullet,
}

/// Why a shot ended, as reported to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotEndReason {
    /// Shot detonated (lifetime, ground, building).
    Exploded,
    /// Shot vanished without detonating.
    Fizzled,
}

impl ShotEndReason {
    pub fn wire_code(self) -> i16 {
        match self {
            ShotEndReason::Exploded => 0,
            ShotEndReason::Fizzled => 1,
        }
    }

    pub fn from_wire_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(ShotEndReason::Exploded),
            1 => Some(ShotEndReason::Fizzled),
            _ => None,
        }
    }
}
