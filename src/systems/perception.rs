//! Visibility tests and target resolution.
//!
//! `can_sense` is the pure detection predicate agents run every tick;
//! `resolve_target` feeds it, applying hideout rules before any
//! geometry is consulted.

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::Concealment;
use crate::queries;
use crate::scene::{Aabb, Scene};

/// Sense geometry for one visibility test
#[derive(Debug, Clone, Copy)]
pub struct SightParams {
    /// Point-blank radius that bypasses the cone and occlusion
    pub near_radius: f32,
    pub detection_radius: f32,
    /// Total field of view; the cone spans half this to each side
    pub fov_degrees: f32,
    pub eye_height: f32,
}

/// The tracked target as the senses see it this tick
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTarget {
    pub entity: Entity,
    pub pos: Vec3,
    /// Height above the ground position that sight rays aim at
    pub height_offset: f32,
    /// Detection-radius scale from partial concealment
    pub radius_scale: f32,
}

/// Decide whether an agent at `agent_pos` looking along `forward` can
/// sense a target at `target_pos`.
///
/// Inside the near radius the answer is always yes. Beyond it the
/// target must sit inside the detection radius and the view cone, with
/// nothing cutting the eye-to-target segment. The cone test uses the
/// full 3D direction so elevation changes (stairs, balconies) detect
/// correctly. The occlusion segment stops at the sensed point, so
/// geometry beyond the target never occludes it.
pub fn can_sense(
    agent_pos: Vec3,
    forward: Vec3,
    target_pos: Vec3,
    target_height: f32,
    params: &SightParams,
    scene: &Scene,
    door_boxes: &[Aabb],
) -> bool {
    let distance = agent_pos.distance(target_pos);
    if distance < params.near_radius {
        return true;
    }
    if distance >= params.detection_radius {
        return false;
    }

    let eye = agent_pos + Vec3::Y * params.eye_height;
    let sensed = target_pos + Vec3::Y * target_height;
    let to_target = (sensed - eye).normalize_or_zero();
    if to_target == Vec3::ZERO {
        return true;
    }

    let half_fov = (params.fov_degrees * 0.5).to_radians();
    if forward.angle_between(to_target) >= half_fov {
        return false;
    }

    !scene.segment_blocked(eye, sensed, door_boxes)
}

/// Resolve the tracked target for this tick.
///
/// A missing target or a completely hidden one yields None and the
/// caller no-ops. Partial concealment halves the usable detection
/// radius instead of hiding the target outright.
pub fn resolve_target(world: &World) -> Option<ResolvedTarget> {
    let (entity, pos, height_offset) = queries::sight_target(world)?;
    let concealment = world
        .get::<&Concealment>(entity)
        .map(|c| *c)
        .unwrap_or_else(|_| Concealment::none());
    if concealment.complete {
        return None;
    }
    Some(ResolvedTarget {
        entity,
        pos,
        height_offset,
        radius_scale: if concealment.partial { 0.5 } else { 1.0 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position, SightTarget};
    use crate::scene::HideoutKind;

    fn params() -> SightParams {
        SightParams {
            near_radius: 3.0,
            detection_radius: 10.0,
            fov_degrees: 60.0,
            eye_height: 1.6,
        }
    }

    #[test]
    fn point_blank_target_is_sensed_even_facing_away() {
        let scene = Scene::new();
        let agent = Vec3::ZERO;
        let target = Vec3::new(2.0, 0.0, 0.0);

        assert!(can_sense(agent, -Vec3::X, target, 1.0, &params(), &scene, &[]));
    }

    #[test]
    fn point_blank_sense_ignores_walls() {
        let mut scene = Scene::new();
        scene.add_wall(Aabb::new(
            Vec3::new(0.9, 0.0, -3.0),
            Vec3::new(1.1, 3.0, 3.0),
        ));
        let target = Vec3::new(2.0, 0.0, 0.0);

        assert!(can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &scene, &[]));
    }

    #[test]
    fn targets_beyond_the_detection_radius_are_invisible() {
        let scene = Scene::new();
        let target = Vec3::new(15.0, 0.0, 0.0);

        assert!(!can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &scene, &[]));
    }

    #[test]
    fn targets_outside_the_cone_are_invisible_regardless_of_occlusion() {
        let scene = Scene::new();
        // In radius, dead ahead of -X facing: 180 degrees off the cone
        let target = Vec3::new(5.0, 0.0, 0.0);

        assert!(!can_sense(Vec3::ZERO, -Vec3::X, target, 1.0, &params(), &scene, &[]));
        // 90 degrees off to the side
        assert!(!can_sense(Vec3::ZERO, Vec3::Z, target, 1.0, &params(), &scene, &[]));
    }

    #[test]
    fn a_wall_between_eye_and_target_occludes() {
        let mut scene = Scene::new();
        scene.add_wall(Aabb::new(
            Vec3::new(4.0, 0.0, -3.0),
            Vec3::new(4.2, 3.0, 3.0),
        ));
        let target = Vec3::new(8.0, 0.0, 0.0);

        assert!(!can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &scene, &[]));

        let empty = Scene::new();
        assert!(can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &empty, &[]));
    }

    #[test]
    fn geometry_beyond_the_target_does_not_occlude() {
        let mut scene = Scene::new();
        scene.add_wall(Aabb::new(
            Vec3::new(9.0, 0.0, -3.0),
            Vec3::new(9.2, 3.0, 3.0),
        ));
        let target = Vec3::new(8.0, 0.0, 0.0);

        assert!(can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &scene, &[]));
    }

    #[test]
    fn closed_door_boxes_occlude_like_walls() {
        let scene = Scene::new();
        let door = Aabb::from_center(Vec3::new(4.0, 1.2, 0.0), Vec3::new(0.1, 1.2, 1.0));
        let target = Vec3::new(8.0, 0.0, 0.0);

        assert!(!can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &scene, &[door]));
        assert!(can_sense(Vec3::ZERO, Vec3::X, target, 1.0, &params(), &scene, &[]));
    }

    #[test]
    fn the_cone_test_runs_in_full_3d() {
        let scene = Scene::new();
        // Directly overhead on a balcony: steep angle out of a level cone
        let overhead = Vec3::new(1.0, 6.0, 0.0);
        assert!(!can_sense(Vec3::ZERO, Vec3::X, overhead, 1.0, &params(), &scene, &[]));

        // Looking up the stairwell brings it into the cone:
        // eye sits at y=1.6, the sensed point at y=7.0
        let up_the_stairs = Vec3::new(1.0, 5.4, 0.0).normalize();
        assert!(can_sense(
            Vec3::ZERO,
            up_the_stairs,
            overhead,
            1.0,
            &params(),
            &scene,
            &[],
        ));
    }

    #[test]
    fn completely_hidden_targets_resolve_to_nothing() {
        let mut world = World::new();
        world.spawn((
            Position::new(Vec3::new(1.0, 0.0, 1.0)),
            SightTarget::new(1.0),
            Concealment {
                complete: true,
                partial: false,
            },
        ));

        assert!(resolve_target(&world).is_none());
    }

    #[test]
    fn partial_concealment_halves_the_detection_radius() {
        let mut world = World::new();
        world.spawn((
            Position::new(Vec3::new(1.0, 0.0, 1.0)),
            SightTarget::new(1.0),
            Concealment {
                complete: false,
                partial: true,
            },
        ));

        let target = resolve_target(&world).unwrap();
        assert_eq!(target.radius_scale, 0.5);

        // Halved radius feeds straight into the distance check
        let scene = Scene::new();
        let mut p = params();
        p.detection_radius *= target.radius_scale;
        p.near_radius = 0.0;
        assert!(!can_sense(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(6.0, 0.0, 0.0),
            1.0,
            &p,
            &scene,
            &[],
        ));
        assert!(can_sense(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(4.0, 0.0, 0.0),
            1.0,
            &p,
            &scene,
            &[],
        ));
    }

    #[test]
    fn hideout_kinds_map_onto_concealment() {
        // Ties the scene's volume kinds to the resolution rules above
        let mut scene = Scene::new();
        scene.add_hideout(
            Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.5, 2.0)),
            HideoutKind::Complete,
        );
        assert_eq!(
            scene.hideout_at(Vec3::new(1.0, 1.0, 1.0)),
            Some(HideoutKind::Complete)
        );
    }
}
