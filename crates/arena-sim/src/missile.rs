//! Guided missile: the per-shot guidance engine.
//!
//! A `GuidedMissile` is stepped once per frame by its owner. The firing
//! player's machine is the local authority: it picks the target, decides
//! lifetime expiry and announces target changes. Every other peer integrates
//! the same kinematics against the last announced target.

use glam::Vec3;
use tracing::{debug, trace};

use arena_core::collab::{LinkIdentity, ServerLink};
use arena_core::config::{RadarDisplay, Tunables};
use arena_core::enums::ShotEndReason;
use arena_core::error::WireError;
use arena_core::events::ShotEvent;
use arena_core::firing::{FiringInfo, ShotDescriptor};
use arena_core::types::{PlayerId, Ray, ShotId, TrajectorySegment};
use arena_core::wire::{GmUpdate, MSG_GM_UPDATE};

use crate::collision::{earliest_contact, probe_obstacles, Collision, ShotCollider, ShotHit};
use crate::context::ShotContext;
use crate::guidance::{step_kinematics, KinematicState};
use crate::history::SegmentHistory;
use crate::presentation::{self, BoltVisual, RadarGlyph, SceneSink, TextureId};

/// Tunables captured when the missile is fired.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GuidanceParams {
    turn_rate: f32,
    puff_time: f32,
    activation_time: f32,
    shot_radius: f32,
    link_fail_window: f32,
}

impl From<&Tunables> for GuidanceParams {
    fn from(tunables: &Tunables) -> Self {
        Self {
            turn_rate: tunables.gm_turn_rate,
            puff_time: tunables.gm_puff_time,
            activation_time: tunables.gm_activation_time,
            shot_radius: tunables.shot_radius,
            link_fail_window: tunables.link_fail_notice_window,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuidedMissile {
    firing: FiringInfo,
    params: GuidanceParams,
    speed: f32,
    start_time: f64,
    current_time: f64,
    prev_time: f64,
    /// Committed position; the next step starts here.
    pos: Vec3,
    /// Committed velocity.
    vel: Vec3,
    last_target: Option<PlayerId>,
    need_update: bool,
    expiring: bool,
    last_puff: f64,
    render_times: u32,
    history: SegmentHistory,
    visual: BoltVisual,
}

impl GuidedMissile {
    /// Fire a missile at `start_time`.
    ///
    /// The lifetime is scaled by `gm_life_factor` and the velocity rescaled
    /// to the missile speed. The muzzle check then probes the short stretch
    /// behind the muzzle, so a shot fired from inside a building explodes
    /// at once and one fired through a teleporter leaves on the far side.
    pub fn new(
        mut firing: FiringInfo,
        start_time: f64,
        tunables: &Tunables,
        ctx: &ShotContext<'_>,
        events: &mut Vec<ShotEvent>,
    ) -> Self {
        firing.lifetime *= tunables.gm_life_factor;
        let speed = tunables.missile_speed();
        let dir = firing.shot.vel.normalize_or_zero();
        firing.shot.vel = dir * speed;

        let pos = firing.shot.pos;
        let vel = firing.shot.vel;
        let seed = TrajectorySegment::new(start_time, start_time, Ray::new(pos, vel));

        let mut missile = Self {
            firing,
            params: GuidanceParams::from(tunables),
            speed,
            start_time,
            current_time: start_time,
            prev_time: start_time,
            pos,
            vel,
            last_target: None,
            need_update: true,
            expiring: false,
            last_puff: start_time,
            render_times: 0,
            history: SegmentHistory::filled(seed),
            visual: BoltVisual::new(pos, vel),
        };

        if speed > 0.0 {
            missile.prev_time = start_time - f64::from(tunables.muzzle_front / speed);
            let muzzle_ray = Ray::new(pos - dir * tunables.muzzle_front, vel);
            missile.check_buildings(&muzzle_ray, ctx, events);
            missile.prev_time = start_time;
        }
        missile
    }

    /// Advance the missile by `dt` seconds.
    pub fn update(&mut self, dt: f32, ctx: &ShotContext<'_>, events: &mut Vec<ShotEvent>) {
        if self.expiring {
            return;
        }
        let local = ctx.is_local(self.player());

        if !local && dt < 0.0 {
            trace!("Dropped stale tick for shot {:?} (dt = {})", self.shot_id(), dt);
            return;
        }

        self.prev_time = self.current_time;
        self.current_time += f64::from(dt);

        // Only the owner expires a shot on lifetime.
        if local && self.elapsed() >= f64::from(self.firing.lifetime) {
            debug!("Shot {:?} ran out of fuel", self.shot_id());
            self.explode(events);
            return;
        }

        let aim = self.acquire_target(local, ctx);
        let world = ctx.world();
        let step = step_kinematics(&self.kinematic_state(), aim, dt, world.as_ref(), &self.identity());

        self.render_times += 1;

        if self.current_time - self.last_puff > f64::from(self.params.puff_time) {
            self.last_puff = self.current_time;
            events.push(ShotEvent::Puff {
                shot_id: self.shot_id(),
                position: step.ray.origin,
                velocity: step.ray.direction,
            });
        }

        self.pos = step.pos;
        self.vel = step.vel;
        self.react(&step.collision, events);

        let segment_end = match step.collision.time() {
            Some(t) => self.prev_time + f64::from(t),
            None => self.current_time,
        };
        self.history
            .push_front(TrajectorySegment::new(self.prev_time, segment_end, step.ray));
    }

    /// Probe obstacles along `ray` over the window since the previous tick.
    ///
    /// Returns the hit time relative to `prev_time`, or `None` when nothing
    /// was hit or no world is loaded. A teleport relocates the committed
    /// state; a solid hit expires the missile at the impact point.
    pub fn check_buildings(
        &mut self,
        ray: &Ray,
        ctx: &ShotContext<'_>,
        events: &mut Vec<ShotEvent>,
    ) -> Option<f32> {
        let world = ctx.world()?;
        let horizon = (self.current_time - self.prev_time) as f32;
        let collision = probe_obstacles(&world, ray, horizon, &self.identity(), self.pos, self.vel);
        match &collision {
            Collision::Teleported { route, .. } => {
                let (pos, vel) = route.teleport(self.pos, self.vel);
                self.pos = pos;
                self.vel = vel;
            }
            Collision::Blocked { point, .. } => self.pos = *point,
            Collision::Clear | Collision::Ground { .. } => {}
        }
        self.react(&collision, events);
        collision.time()
    }

    /// Where the missile would be, and how fast, after `dt` more seconds.
    ///
    /// Never mutates the missile. `None` when no world is loaded, the
    /// missile is already expiring, the lifetime would run out, or the step
    /// ends on the ground or against a solid obstacle.
    pub fn predict(&self, dt: f32, ctx: &ShotContext<'_>) -> Option<(Vec3, Vec3)> {
        if self.expiring {
            return None;
        }
        let world = ctx.world()?;
        if self.elapsed() + f64::from(dt) >= f64::from(self.firing.lifetime) {
            trace!("Prediction for shot {:?} outlives the missile", self.shot_id());
            return None;
        }

        let aim = self.peek_target(ctx);
        let step = step_kinematics(&self.kinematic_state(), aim, dt, Some(&world), &self.identity());
        if step.collision.survives() {
            Some((step.pos, step.vel))
        } else {
            trace!("Prediction for shot {:?} ends in {:?}", self.shot_id(), step.collision);
            None
        }
    }

    pub fn predict_position(&self, dt: f32, ctx: &ShotContext<'_>) -> Option<Vec3> {
        self.predict(dt, ctx).map(|(pos, _)| pos)
    }

    pub fn predict_velocity(&self, dt: f32, ctx: &ShotContext<'_>) -> Option<Vec3> {
        self.predict(dt, ctx).map(|(_, vel)| vel)
    }

    /// Earliest contact with a tank. Harmless until the activation time.
    pub fn check_hit(&self, collider: &ShotCollider) -> Option<ShotHit> {
        if self.elapsed() < f64::from(self.params.activation_time) {
            return None;
        }
        earliest_contact(&self.history, collider, self.params.shot_radius)
    }

    /// Send a GM update if the target changed since the last send.
    ///
    /// The flag is cleared as soon as the message is handed to `link`.
    pub fn send_update(&mut self, link: &mut dyn ServerLink) -> bool {
        if !self.need_update {
            return false;
        }
        self.need_update = false;
        let update = self.gm_update();
        link.send(MSG_GM_UPDATE, &update.to_bytes());
        debug!("Sent GM update for shot {:?}, target {:?}", self.shot_id(), self.last_target);
        true
    }

    /// The outbound correction for the current state.
    pub fn gm_update(&self) -> GmUpdate {
        GmUpdate {
            shot: ShotDescriptor {
                pos: self.pos,
                vel: self.vel,
                dt: self.elapsed() as f32,
                ..self.firing.shot
            },
            target: self.last_target,
        }
    }

    /// Decode and apply an inbound GM update addressed to this missile.
    pub fn read_update(&mut self, payload: &[u8]) -> Result<(), WireError> {
        let update = GmUpdate::decode(payload)?;
        let shot = &self.firing.shot;
        if update.shot.player != shot.player || update.shot.id != shot.id {
            return Err(WireError::ShotMismatch {
                player: update.shot.player.0,
                shot: update.shot.id.0,
                expected_player: shot.player.0,
                expected_shot: shot.id.0,
            });
        }
        self.apply_update(&update);
        Ok(())
    }

    /// Take the sender's target and jump to its committed state. The next
    /// `update` integrates from there.
    pub fn apply_update(&mut self, update: &GmUpdate) {
        self.last_target = update.target;
        self.pos = update.shot.pos;
        self.vel = update.shot.vel;
    }

    /// Final notification when the missile is removed from play.
    pub fn expire(&self, ctx: &ShotContext<'_>, link: &mut dyn ServerLink, events: &mut Vec<ShotEvent>) {
        let reason = ShotEndReason::Exploded;
        if ctx.is_local(self.player()) {
            link.send_end_shot(self.player(), self.shot_id(), reason);
        }
        events.push(ShotEvent::ShotEnded {
            player: self.player(),
            shot_id: self.shot_id(),
            reason,
        });
    }

    pub fn set_texture(&mut self, texture: TextureId) {
        self.visual.apply_missile_texture(texture);
    }

    /// Move the bolt to the committed state and hand it to `scene`.
    pub fn add_shot(&mut self, scene: &mut dyn SceneSink) {
        self.visual.move_to(self.pos, self.vel);
        scene.add_dynamic_node(&self.visual);
    }

    pub fn radar_glyph(&self, display: &RadarDisplay, tail_length: f32) -> RadarGlyph {
        presentation::radar_glyph(self.pos, self.vel, display, tail_length)
    }

    // --- Accessors ---

    pub fn player(&self) -> PlayerId {
        self.firing.shot.player
    }

    pub fn shot_id(&self) -> ShotId {
        self.firing.shot.id
    }

    pub fn firing(&self) -> &FiringInfo {
        &self.firing
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn velocity(&self) -> Vec3 {
        self.vel
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn last_target(&self) -> Option<PlayerId> {
        self.last_target
    }

    pub fn needs_update(&self) -> bool {
        self.need_update
    }

    pub fn is_expiring(&self) -> bool {
        self.expiring
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Seconds flown so far.
    pub fn elapsed(&self) -> f64 {
        self.current_time - self.start_time
    }

    pub fn render_times(&self) -> u32 {
        self.render_times
    }

    pub fn history(&self) -> &SegmentHistory {
        &self.history
    }

    pub fn visual(&self) -> &BoltVisual {
        &self.visual
    }

    // --- Internals ---

    fn kinematic_state(&self) -> KinematicState {
        KinematicState {
            pos: self.pos,
            vel: self.vel,
            speed: self.speed,
            max_turn_rate: self.params.turn_rate,
        }
    }

    /// Every peer seeds link selection with the shot id.
    fn identity(&self) -> LinkIdentity {
        LinkIdentity {
            seed: u32::from(self.firing.shot.id.0),
            team: self.firing.shot.team,
            flag: self.firing.flag,
        }
    }

    /// Resolve the pursued target for a live tick and return its aim point.
    fn acquire_target(&mut self, local: bool, ctx: &ShotContext<'_>) -> Option<Vec3> {
        if local && ctx.selected_target != self.last_target {
            debug!(
                "Shot {:?} retargeted {:?} -> {:?}",
                self.shot_id(),
                self.last_target,
                ctx.selected_target
            );
            self.last_target = ctx.selected_target;
            self.need_update = true;
        }

        let target = ctx.targets.resolve(self.last_target?)?;
        if !target.is_trackable() {
            self.last_target = None;
            self.need_update = true;
            return None;
        }
        Some(target.aim_point())
    }

    /// Same target choice as `acquire_target`, without touching state.
    fn peek_target(&self, ctx: &ShotContext<'_>) -> Option<Vec3> {
        let id = if ctx.is_local(self.player()) {
            ctx.selected_target
        } else {
            self.last_target
        };
        ctx.targets
            .resolve(id?)
            .filter(|target| target.is_trackable())
            .map(|target| target.aim_point())
    }

    fn explode(&mut self, events: &mut Vec<ShotEvent>) {
        self.expiring = true;
        events.push(ShotEvent::Explosion {
            player: self.player(),
            shot_id: self.shot_id(),
            position: self.pos,
        });
    }

    /// Side effects of a collision once the committed state reflects it.
    fn react(&mut self, collision: &Collision, events: &mut Vec<ShotEvent>) {
        match collision {
            Collision::Clear => {}
            Collision::Ground { .. } => {
                debug!("Shot {:?} hit the ground", self.shot_id());
                self.explode(events);
            }
            Collision::Blocked { time, refused, .. } => {
                let age = self.prev_time + f64::from(*time) - self.start_time;
                if let Some(text) = refused.as_ref().and_then(|source| source.fail_text.as_ref()) {
                    if age < f64::from(self.params.link_fail_window) {
                        events.push(ShotEvent::Message { text: text.clone() });
                    }
                }
                debug!("Shot {:?} hit an obstacle", self.shot_id());
                self.explode(events);
            }
            Collision::Teleported { route, .. } => {
                if let Some(text) = &route.physics.pass_text {
                    events.push(ShotEvent::Message { text: text.clone() });
                }
                debug!(
                    "Shot {:?} teleported {:?} -> {:?}",
                    self.shot_id(),
                    route.src,
                    route.dst
                );
                events.push(ShotEvent::Teleported {
                    player: self.player(),
                    shot_id: self.shot_id(),
                    link_src: route.src,
                    link_dst: route.dst,
                });
            }
        }
    }
}
