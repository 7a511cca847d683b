//! Shot messages on the game session transport.
//!
//! "GM update" is the minimal correction a missile's owner sends whenever
//! its pursued target changes. Format (big-endian):
//! - packed `ShotDescriptor` (33 bytes)
//! - u8 target player, `NO_TARGET` for none
//!
//! "Shot end" retires a shot: u8 player, u16 shot id, i16 reason.

use glam::Vec3;

use crate::enums::ShotEndReason;
use crate::error::WireError;
use crate::firing::ShotDescriptor;
use crate::types::{PlayerId, ShotId};

/// Message codes on the game session transport.
pub const MSG_GM_UPDATE: u16 = 0x676d;
pub const MSG_SHOT_END: u16 = 0x7365;

/// Wire value meaning "no target".
pub const NO_TARGET: u8 = 253;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GmUpdate {
    pub shot: ShotDescriptor,
    pub target: Option<PlayerId>,
}

impl GmUpdate {
    pub const PACKED_LEN: usize = ShotDescriptor::PACKED_LEN + 1;

    pub fn encode(&self, out: &mut Vec<u8>) {
        self.shot.pack(out);
        out.push(encode_target(self.target));
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::PACKED_LEN);
        self.encode(&mut out);
        out
    }

    /// Decode a complete payload. Trailing bytes are rejected.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader::new(payload);
        let shot = ShotDescriptor::unpack(&mut reader)?;
        let target = decode_target(reader.u8()?);
        reader.finish()?;
        Ok(Self { shot, target })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndShot {
    pub player: PlayerId,
    pub shot_id: ShotId,
    pub reason: ShotEndReason,
}

impl EndShot {
    pub const PACKED_LEN: usize = 1 + 2 + 2;

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::PACKED_LEN);
        out.push(self.player.0);
        out.extend_from_slice(&self.shot_id.0.to_be_bytes());
        out.extend_from_slice(&self.reason.wire_code().to_be_bytes());
        out
    }

    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader::new(payload);
        let player = PlayerId(reader.u8()?);
        let shot_id = ShotId(reader.u16()?);
        let code = reader.i16()?;
        let reason = ShotEndReason::from_wire_code(code).ok_or(WireError::UnknownEndReason(code))?;
        reader.finish()?;
        Ok(Self {
            player,
            shot_id,
            reason,
        })
    }
}

pub fn encode_target(target: Option<PlayerId>) -> u8 {
    match target {
        Some(PlayerId(id)) => id,
        None => NO_TARGET,
    }
}

pub fn decode_target(raw: u8) -> Option<PlayerId> {
    if raw == NO_TARGET {
        None
    } else {
        Some(PlayerId(raw))
    }
}

/// Cursor over a big-endian payload.
pub struct Reader<'a> {
    inp: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(inp: &'a [u8]) -> Self {
        Self { inp }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        if self.inp.len() < N {
            return Err(WireError::Truncated {
                needed: N,
                available: self.inp.len(),
            });
        }
        let (head, rest) = self.inp.split_at(N);
        self.inp = rest;
        let mut buf = [0u8; N];
        buf.copy_from_slice(head);
        Ok(buf)
    }

    pub fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn i16(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    pub fn f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_be_bytes(self.take()?))
    }

    pub fn vec3(&mut self) -> Result<Vec3, WireError> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    /// Fail if any bytes are left unread.
    pub fn finish(self) -> Result<(), WireError> {
        match self.inp.len() {
            0 => Ok(()),
            n => Err(WireError::TrailingBytes(n)),
        }
    }
}
