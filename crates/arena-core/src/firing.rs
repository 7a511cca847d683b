//! Firing descriptor: the identity and initial kinematics of a shot.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{FlagType, TeamColor};
use crate::error::WireError;
use crate::types::{PlayerId, ShotId};
use crate::wire::Reader;

/// Packed shot state shared by every shot message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotDescriptor {
    pub player: PlayerId,
    pub id: ShotId,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Time since the shot was fired when this descriptor was taken.
    pub dt: f32,
    pub team: TeamColor,
}

/// Everything known about a shot at the moment it is fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiringInfo {
    pub shot: ShotDescriptor,
    /// Flag held by the shooter when firing.
    pub flag: FlagType,
    /// Seconds the shot may fly.
    pub lifetime: f32,
}

impl ShotDescriptor {
    /// Size of the packed form in bytes.
    pub const PACKED_LEN: usize = 1 + 2 + 12 + 12 + 4 + 2;

    /// Append the big-endian packed form to `out`.
    pub fn pack(&self, out: &mut Vec<u8>) {
        out.push(self.player.0);
        out.extend_from_slice(&self.id.0.to_be_bytes());
        for c in self.pos.to_array() {
            out.extend_from_slice(&c.to_be_bytes());
        }
        for c in self.vel.to_array() {
            out.extend_from_slice(&c.to_be_bytes());
        }
        out.extend_from_slice(&self.dt.to_be_bytes());
        out.extend_from_slice(&self.team.wire_code().to_be_bytes());
    }

    pub fn unpack(reader: &mut Reader<'_>) -> Result<Self, WireError> {
        let player = PlayerId(reader.u8()?);
        let id = ShotId(reader.u16()?);
        let pos = reader.vec3()?;
        let vel = reader.vec3()?;
        let dt = reader.f32()?;
        let code = reader.i16()?;
        let team = TeamColor::from_wire_code(code).ok_or(WireError::UnknownTeam(code))?;
        Ok(Self {
            player,
            id,
            pos,
            vel,
            dt,
            team,
        })
    }
}
