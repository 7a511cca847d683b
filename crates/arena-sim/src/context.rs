//! Collaborators handed to a missile for one call.

use arena_core::collab::{GeometryQuery, LinkResolver, TargetRegistry};
use arena_core::types::PlayerId;

/// Everything outside the missile that a tick or prediction may consult.
#[derive(Clone, Copy)]
pub struct ShotContext<'a> {
    /// The player on this machine, `None` for a pure spectator.
    pub local_player: Option<PlayerId>,
    /// Target currently selected by the local player.
    pub selected_target: Option<PlayerId>,
    /// World geometry; `None` while no world is loaded.
    pub geometry: Option<&'a dyn GeometryQuery>,
    pub links: &'a dyn LinkResolver,
    pub targets: &'a dyn TargetRegistry,
}

/// Geometry and links together, available only when a world is loaded.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub geometry: &'a dyn GeometryQuery,
    pub links: &'a dyn LinkResolver,
}

impl<'a> ShotContext<'a> {
    /// Whether shots fired by `player` are steered on this machine.
    pub fn is_local(&self, player: PlayerId) -> bool {
        self.local_player == Some(player)
    }

    pub fn world(&self) -> Option<WorldView<'a>> {
        self.geometry.map(|geometry| WorldView {
            geometry,
            links: self.links,
        })
    }
}
