//! Shot engine: owns in-flight guided missiles and drives them per tick.
//!
//! Missiles live in a hecs world next to their `ShotKey`, so inbound GM
//! updates can be routed by (player, shot id). Completely headless; the
//! embedding game supplies collaborators through `ShotContext` each call.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::{debug, warn};

use arena_core::collab::ServerLink;
use arena_core::config::Tunables;
use arena_core::error::WireError;
use arena_core::events::ShotEvent;
use arena_core::firing::FiringInfo;
use arena_core::types::{PlayerId, ShotId};
use arena_core::wire::GmUpdate;

use crate::collision::{ShotCollider, ShotHit};
use crate::context::ShotContext;
use crate::missile::GuidedMissile;
use crate::presentation::{RadarGlyph, SceneSink, TextureId};

/// Network identity of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShotKey {
    pub player: PlayerId,
    pub shot_id: ShotId,
}

pub struct ShotEngine {
    world: World,
    tunables: Tunables,
    time: f64,
    texture: Option<TextureId>,
    events: Vec<ShotEvent>,
    despawn_buffer: Vec<Entity>,
}

impl ShotEngine {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            world: World::new(),
            tunables,
            time: 0.0,
            texture: None,
            events: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Texture applied to every missile fired from now on.
    pub fn set_missile_texture(&mut self, texture: TextureId) {
        self.texture = Some(texture);
    }

    /// Fire a missile at the current engine time. Muzzle check events are
    /// returned by the next `tick`.
    pub fn fire(&mut self, firing: FiringInfo, ctx: &ShotContext<'_>) -> Entity {
        let key = ShotKey {
            player: firing.shot.player,
            shot_id: firing.shot.id,
        };
        let mut missile = GuidedMissile::new(firing, self.time, &self.tunables, ctx, &mut self.events);
        if let Some(texture) = self.texture {
            missile.set_texture(texture);
        }
        let entity = self.world.spawn((key, missile));
        debug!("Spawned guided missile {:?} as {:?}", key, entity);
        entity
    }

    /// Advance every missile by `dt`, send outbound corrections for local
    /// shots and retire expiring ones. Returns the events of this tick.
    pub fn tick(&mut self, dt: f32, ctx: &ShotContext<'_>, link: &mut dyn ServerLink) -> Vec<ShotEvent> {
        self.time += f64::from(dt);

        for (_entity, missile) in self.world.query_mut::<&mut GuidedMissile>() {
            missile.update(dt, ctx, &mut self.events);
            if ctx.is_local(missile.player()) && !missile.is_expiring() {
                missile.send_update(link);
            }
        }

        self.cleanup(ctx, link);
        std::mem::take(&mut self.events)
    }

    /// Route an inbound GM update to its missile.
    ///
    /// Returns `Ok(false)` when no such shot is in flight or the shot is
    /// owned locally; the local authority never takes corrections.
    pub fn receive_gm_update(&mut self, payload: &[u8], ctx: &ShotContext<'_>) -> Result<bool, WireError> {
        let update = GmUpdate::decode(payload).map_err(|err| {
            warn!("Dropped malformed GM update: {}", err);
            err
        })?;
        let key = ShotKey {
            player: update.shot.player,
            shot_id: update.shot.id,
        };
        if ctx.is_local(key.player) {
            debug!("Ignored GM update for own shot {:?}", key);
            return Ok(false);
        }
        let Some(entity) = self.find(key) else {
            warn!("GM update for unknown shot {:?}", key);
            return Ok(false);
        };
        if let Ok(mut missile) = self.world.get::<&mut GuidedMissile>(entity) {
            missile.apply_update(&update);
        }
        Ok(true)
    }

    /// Remove a shot without an explosion or end-shot notice.
    pub fn cancel(&mut self, key: ShotKey) -> bool {
        match self.find(key) {
            Some(entity) => {
                debug!("Cancelled guided missile {:?}", key);
                self.world.despawn(entity).is_ok()
            }
            None => false,
        }
    }

    pub fn find(&self, key: ShotKey) -> Option<Entity> {
        self.world
            .query::<&ShotKey>()
            .iter()
            .find(|(_, k)| **k == key)
            .map(|(entity, _)| entity)
    }

    pub fn missile(&self, key: ShotKey) -> Option<hecs::Ref<'_, GuidedMissile>> {
        let entity = self.find(key)?;
        self.world.get::<&GuidedMissile>(entity).ok()
    }

    pub fn predict(&self, key: ShotKey, dt: f32, ctx: &ShotContext<'_>) -> Option<(Vec3, Vec3)> {
        self.missile(key)?.predict(dt, ctx)
    }

    /// Earliest contact between any armed missile and `collider`.
    pub fn first_hit(&self, collider: &ShotCollider) -> Option<(ShotKey, ShotHit)> {
        self.world
            .query::<(&ShotKey, &GuidedMissile)>()
            .iter()
            .filter_map(|(_, (key, missile))| missile.check_hit(collider).map(|hit| (*key, hit)))
            .min_by(|a, b| a.1.time.total_cmp(&b.1.time))
    }

    pub fn add_shots(&mut self, scene: &mut dyn SceneSink) {
        for (_entity, missile) in self.world.query_mut::<&mut GuidedMissile>() {
            missile.add_shot(scene);
        }
    }

    pub fn radar_glyphs(&self) -> Vec<RadarGlyph> {
        let display = self.tunables.radar;
        let tail = self.tunables.shot_tail_length;
        self.world
            .query::<&GuidedMissile>()
            .iter()
            .map(|(_, missile)| missile.radar_glyph(&display, tail))
            .collect()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Notify and despawn every expiring missile.
    fn cleanup(&mut self, ctx: &ShotContext<'_>, link: &mut dyn ServerLink) {
        self.despawn_buffer.clear();

        for (entity, missile) in self.world.query_mut::<&GuidedMissile>() {
            if missile.is_expiring() {
                missile.expire(ctx, link, &mut self.events);
                self.despawn_buffer.push(entity);
            }
        }

        for entity in self.despawn_buffer.drain(..) {
            debug!("Despawned guided missile {:?}", entity);
            let _ = self.world.despawn(entity);
        }
    }
}
