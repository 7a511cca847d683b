//! Teleporter link table.
//!
//! Each source face maps to one or more destination faces. When several
//! destinations accept a shot, the choice is drawn from a ChaCha8 stream
//! seeded with the shot id, so every peer independently picks the same exit.

use std::collections::HashMap;

use glam::{Affine3A, Mat3, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use arena_core::collab::{LinkIdentity, LinkPhysics, LinkResolver, LinkRoute, LinkSource};
use arena_core::enums::{FlagType, TeamColor};
use arena_core::types::ObstacleId;

use crate::intersect::Face;
use crate::map::ArenaMap;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("obstacle {0:?} does not exist")]
    UnknownObstacle(ObstacleId),

    #[error("obstacle {0:?} is not a teleporter face")]
    NotAFace(ObstacleId),

    #[error("face {0:?} has no outgoing links")]
    NotASource(ObstacleId),
}

/// Who may use a link and what it does to them.
#[derive(Debug, Clone, Default)]
pub struct LinkRules {
    pub physics: LinkPhysics,
    /// `None` admits every team.
    pub allowed_teams: Option<Vec<TeamColor>>,
    pub blocked_flags: Vec<FlagType>,
}

impl LinkRules {
    fn admits(&self, identity: &LinkIdentity) -> bool {
        let team_ok = self
            .allowed_teams
            .as_ref()
            .map_or(true, |teams| teams.contains(&identity.team));
        team_ok && !self.blocked_flags.contains(&identity.flag)
    }
}

#[derive(Debug, Clone)]
struct Destination {
    face_id: ObstacleId,
    face: Face,
    rules: LinkRules,
}

#[derive(Debug, Clone)]
struct Source {
    face: Face,
    fail_text: Option<String>,
    destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    sources: HashMap<ObstacleId, Source>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link face `src` to face `dst`. A source may be linked several times.
    pub fn link(
        &mut self,
        map: &ArenaMap,
        src: ObstacleId,
        dst: ObstacleId,
        rules: LinkRules,
    ) -> Result<(), LinkError> {
        let src_face = *lookup_face(map, src)?;
        let dst_face = *lookup_face(map, dst)?;
        let source = self.sources.entry(src).or_insert_with(|| Source {
            face: src_face,
            fail_text: None,
            destinations: Vec::new(),
        });
        source.destinations.push(Destination {
            face_id: dst,
            face: dst_face,
            rules,
        });
        Ok(())
    }

    /// Message shown when `src` refuses a young shot.
    pub fn set_fail_text(&mut self, src: ObstacleId, text: impl Into<String>) -> Result<(), LinkError> {
        let source = self
            .sources
            .get_mut(&src)
            .ok_or(LinkError::NotASource(src))?;
        source.fail_text = Some(text.into());
        Ok(())
    }

    pub fn is_source(&self, face: ObstacleId) -> bool {
        self.sources.contains_key(&face)
    }
}

fn lookup_face(map: &ArenaMap, id: ObstacleId) -> Result<&Face, LinkError> {
    map.get(id).ok_or(LinkError::UnknownObstacle(id))?;
    map.face(id).ok_or(LinkError::NotAFace(id))
}

/// Rigid transform taking the entry face frame onto the exit face frame.
///
/// Travel into the front of `src` becomes travel out of the front of `dst`:
/// the normal and u axes flip, v is preserved.
pub fn face_transform(src: &Face, dst: &Face) -> Affine3A {
    let flip = Mat3::from_diagonal(Vec3::new(-1.0, 1.0, -1.0));
    let rotation = dst.frame() * flip * src.frame().transpose();
    let translation = dst.center - rotation * src.center;
    Affine3A::from_mat3_translation(rotation, translation)
}

impl LinkResolver for LinkTable {
    fn classify(&self, obstacle: ObstacleId) -> Option<LinkSource> {
        self.sources.get(&obstacle).map(|source| LinkSource {
            face: obstacle,
            fail_text: source.fail_text.clone(),
        })
    }

    fn resolve_destination(
        &self,
        src: &LinkSource,
        identity: &LinkIdentity,
        _pos: Vec3,
        _vel: Vec3,
    ) -> Option<LinkRoute> {
        let source = self.sources.get(&src.face)?;
        let admitted: Vec<&Destination> = source
            .destinations
            .iter()
            .filter(|d| d.rules.admits(identity))
            .collect();

        let chosen = match admitted.len() {
            0 => {
                tracing::debug!(face = src.face.0, seed = identity.seed, "no admissible link destination");
                return None;
            }
            1 => admitted[0],
            n => {
                let mut rng = ChaCha8Rng::seed_from_u64(u64::from(identity.seed));
                admitted[rng.gen_range(0..n)]
            }
        };

        Some(LinkRoute {
            src: src.face,
            dst: chosen.face_id,
            transform: face_transform(&source.face, &chosen.face),
            physics: chosen.rules.physics.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersect::Aabb;
    use glam::Vec2;

    fn identity(seed: u32) -> LinkIdentity {
        LinkIdentity {
            seed,
            team: TeamColor::Red,
            flag: FlagType::GuidedMissile,
        }
    }

    /// Entry face at x=10 facing -X, exit face at y=50 facing +Y.
    fn two_face_map() -> (ArenaMap, ObstacleId, ObstacleId) {
        let mut map = ArenaMap::new();
        let src = map.add_face(Face::new(Vec3::new(10.0, 0.0, 5.0), -Vec3::X, Vec3::Y, Vec2::new(2.0, 5.0)));
        let dst = map.add_face(Face::new(Vec3::new(0.0, 50.0, 5.0), Vec3::Y, Vec3::X, Vec2::new(2.0, 5.0)));
        (map, src, dst)
    }

    #[test]
    fn test_link_requires_faces() {
        let (mut map, src, _dst) = two_face_map();
        let b = map.add_box(Aabb::new(Vec3::ZERO, Vec3::ONE));
        let mut table = LinkTable::new();
        assert_eq!(
            table.link(&map, src, b, LinkRules::default()),
            Err(LinkError::NotAFace(b))
        );
        assert_eq!(
            table.link(&map, ObstacleId(77), src, LinkRules::default()),
            Err(LinkError::UnknownObstacle(ObstacleId(77)))
        );
        assert_eq!(
            table.set_fail_text(src, "nope"),
            Err(LinkError::NotASource(src))
        );
    }

    #[test]
    fn test_teleport_exits_front_of_destination() {
        let (map, src, dst) = two_face_map();
        let mut table = LinkTable::new();
        table.link(&map, src, dst, LinkRules::default()).unwrap();

        let source = table.classify(src).unwrap();
        let route = table
            .resolve_destination(&source, &identity(1), Vec3::ZERO, Vec3::X)
            .unwrap();
        assert_eq!(route.dst, dst);

        // one unit past the entry face, travelling into it
        let (pos, vel) = route.teleport(Vec3::new(11.0, 0.0, 5.0), Vec3::new(120.0, 0.0, 0.0));
        assert!((pos - Vec3::new(0.0, 51.0, 5.0)).length() < 1e-4, "pos = {pos}");
        assert!((vel - Vec3::new(0.0, 120.0, 0.0)).length() < 1e-3, "vel = {vel}");
    }

    #[test]
    fn test_blocked_flag_denies_link() {
        let (map, src, dst) = two_face_map();
        let mut table = LinkTable::new();
        table
            .link(
                &map,
                src,
                dst,
                LinkRules {
                    blocked_flags: vec![FlagType::GuidedMissile],
                    ..Default::default()
                },
            )
            .unwrap();
        table.set_fail_text(src, "Teleporter blocks missiles").unwrap();

        let source = table.classify(src).unwrap();
        assert_eq!(source.fail_text.as_deref(), Some("Teleporter blocks missiles"));
        assert!(table
            .resolve_destination(&source, &identity(1), Vec3::ZERO, Vec3::X)
            .is_none());
    }

    #[test]
    fn test_team_filter() {
        let (map, src, dst) = two_face_map();
        let mut table = LinkTable::new();
        table
            .link(
                &map,
                src,
                dst,
                LinkRules {
                    allowed_teams: Some(vec![TeamColor::Blue]),
                    ..Default::default()
                },
            )
            .unwrap();
        let source = table.classify(src).unwrap();
        assert!(table
            .resolve_destination(&source, &identity(3), Vec3::ZERO, Vec3::X)
            .is_none());
    }

    #[test]
    fn test_seeded_choice_is_deterministic() {
        let (mut map, src, dst) = two_face_map();
        let dst2 = map.add_face(Face::new(Vec3::new(0.0, -50.0, 5.0), -Vec3::Y, Vec3::X, Vec2::ONE));
        let dst3 = map.add_face(Face::new(Vec3::new(-50.0, 0.0, 5.0), -Vec3::X, Vec3::Y, Vec2::ONE));
        let mut table = LinkTable::new();
        for d in [dst, dst2, dst3] {
            table.link(&map, src, d, LinkRules::default()).unwrap();
        }
        let source = table.classify(src).unwrap();

        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let a = table
                .resolve_destination(&source, &identity(seed), Vec3::ZERO, Vec3::X)
                .unwrap();
            let b = table
                .resolve_destination(&source, &identity(seed), Vec3::ZERO, Vec3::X)
                .unwrap();
            assert_eq!(a.dst, b.dst, "same seed must pick the same exit");
            seen.insert(a.dst);
        }
        assert!(seen.len() > 1, "different seeds should spread across exits");
    }

    #[test]
    fn test_unlinked_face_is_not_a_source() {
        let (map, src, dst) = two_face_map();
        let mut table = LinkTable::new();
        table.link(&map, src, dst, LinkRules::default()).unwrap();
        assert!(table.is_source(src));
        assert!(table.classify(dst).is_none());
        assert!(!table.is_source(dst));
    }
}
