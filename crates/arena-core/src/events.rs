//! Outbound notifications emitted by shots.
//!
//! All of these are fire-and-forget: the simulation never waits for an
//! acknowledgment.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::ShotEndReason;
use crate::types::{ObstacleId, PlayerId, ShotId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShotEvent {
    /// Shot detonated at `position`.
    Explosion {
        player: PlayerId,
        shot_id: ShotId,
        position: Vec3,
    },
    /// Smoke trail puff left behind the missile.
    Puff {
        shot_id: ShotId,
        position: Vec3,
        velocity: Vec3,
    },
    /// Shot passed through a teleporter link.
    Teleported {
        player: PlayerId,
        shot_id: ShotId,
        link_src: ObstacleId,
        link_dst: ObstacleId,
    },
    /// Shot removed from play.
    ShotEnded {
        player: PlayerId,
        shot_id: ShotId,
        reason: ShotEndReason,
    },
    /// Text for the local message panel.
    Message { text: String },
}
