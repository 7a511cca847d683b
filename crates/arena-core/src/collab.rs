//! Narrow interfaces to the collaborators a shot needs but does not own.
//!
//! World geometry, the teleporter link table, the player roster, the server
//! connection and the scene are all supplied by the embedding game. Every
//! call is synchronous and read-only from the shot's point of view, except
//! `ServerLink` and `SceneSink`, which only ever receive data.

use glam::{Affine3A, Vec3};

use crate::enums::{FlagType, ShotEndReason, TeamColor};
use crate::types::{ObstacleId, PlayerId, Ray, ShotId};
use crate::wire::{EndShot, MSG_SHOT_END};

/// First obstacle crossed by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    pub obstacle: ObstacleId,
    /// Ray parameter of the hit, in `[epsilon, horizon]`.
    pub time: f32,
}

/// World obstacle storage.
pub trait GeometryQuery {
    /// First obstacle hit along `ray` with `epsilon <= t <= horizon`.
    fn first_hit(&self, ray: &Ray, epsilon: f32, horizon: f32) -> Option<ObstacleHit>;
}

/// A teleporter face a shot has entered.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSource {
    pub face: ObstacleId,
    /// Shown to the shooter when the face refuses a shot early in its life.
    pub fail_text: Option<String>,
}

/// Physics applied while passing through a link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPhysics {
    pub speed_scale: f32,
    /// Shown when a shot passes through.
    pub pass_text: Option<String>,
}

impl Default for LinkPhysics {
    fn default() -> Self {
        Self {
            speed_scale: 1.0,
            pass_text: None,
        }
    }
}

/// A resolved teleport from one face to another.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRoute {
    pub src: ObstacleId,
    pub dst: ObstacleId,
    /// Maps positions and directions from the entry face frame to the exit.
    pub transform: Affine3A,
    pub physics: LinkPhysics,
}

impl LinkRoute {
    /// Relocate a position and velocity through the link.
    pub fn teleport(&self, pos: Vec3, vel: Vec3) -> (Vec3, Vec3) {
        let out_pos = self.transform.transform_point3(pos);
        let out_vel = self.transform.transform_vector3(vel) * self.physics.speed_scale;
        (out_pos, out_vel)
    }
}

/// Who is asking for a link destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkIdentity {
    /// Deterministic seed so every peer picks the same destination.
    pub seed: u32,
    pub team: TeamColor,
    pub flag: FlagType,
}

/// Teleporter link graph.
pub trait LinkResolver {
    /// The entry face for `obstacle`, if it is a teleporter entry.
    fn classify(&self, obstacle: ObstacleId) -> Option<LinkSource>;

    /// Choose a destination for a shot entering `src`. `None` disables the
    /// teleport for this event.
    fn resolve_destination(
        &self,
        src: &LinkSource,
        identity: &LinkIdentity,
        pos: Vec3,
        vel: Vec3,
    ) -> Option<LinkRoute>;
}

/// A world without teleporters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl LinkResolver for NoLinks {
    fn classify(&self, _obstacle: ObstacleId) -> Option<LinkSource> {
        None
    }

    fn resolve_destination(
        &self,
        _src: &LinkSource,
        _identity: &LinkIdentity,
        _pos: Vec3,
        _vel: Vec3,
    ) -> Option<LinkRoute> {
        None
    }
}

/// What a seeker can know about a player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub id: PlayerId,
    pub position: Vec3,
    /// Height of the muzzle above `position`.
    pub muzzle_height: f32,
    pub alive: bool,
    pub flag: FlagType,
}

impl TargetInfo {
    /// Dead players and stealth carriers cannot be tracked.
    pub fn is_trackable(&self) -> bool {
        self.alive && self.flag != FlagType::Stealth
    }

    /// Where the seeker aims: right between the eyes.
    pub fn aim_point(&self) -> Vec3 {
        self.position + Vec3::Z * self.muzzle_height
    }
}

/// Player roster.
pub trait TargetRegistry {
    fn resolve(&self, id: PlayerId) -> Option<TargetInfo>;
}

/// Outbound connection to the game server. Sends are fire-and-forget.
pub trait ServerLink {
    fn send(&mut self, code: u16, payload: &[u8]);

    /// Retire a shot on the server. Encodes a shot-end message by default.
    fn send_end_shot(&mut self, player: PlayerId, shot_id: ShotId, reason: ShotEndReason) {
        let msg = EndShot {
            player,
            shot_id,
            reason,
        };
        self.send(MSG_SHOT_END, &msg.to_bytes());
    }
}
