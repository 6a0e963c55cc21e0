//! Static scene geometry and spatial queries.
//!
//! The scene holds axis-aligned wall boxes and hideout volumes. Sight rays
//! are tested against the walls plus whatever dynamic boxes the caller
//! passes in (closed doors); traversal blocking is the nav module's job.

use glam::Vec3;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Slab test against the segment from..to. Touching counts as a hit.
    pub fn hit_by_segment(&self, from: Vec3, to: Vec3) -> bool {
        let dir = to - from;
        let mut t_min: f32 = 0.0;
        let mut t_max: f32 = 1.0;

        for axis in 0..3 {
            let origin = from[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                // Parallel to this slab; outside means no hit at all
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let mut t1 = (lo - origin) / d;
            let mut t2 = (hi - origin) / d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return false;
            }
        }

        true
    }
}

/// How well a hideout conceals its occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideoutKind {
    /// Invisible while inside, even point-blank
    Complete,
    /// Sensed only at close range
    Partial,
}

/// A concealing region of the scene
#[derive(Debug, Clone, Copy)]
pub struct Hideout {
    pub bounds: Aabb,
    pub kind: HideoutKind,
}

/// Static world geometry
#[derive(Debug, Clone, Default)]
pub struct Scene {
    walls: Vec<Aabb>,
    hideouts: Vec<Hideout>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wall(&mut self, wall: Aabb) {
        self.walls.push(wall);
    }

    pub fn add_hideout(&mut self, bounds: Aabb, kind: HideoutKind) {
        self.hideouts.push(Hideout { bounds, kind });
    }

    /// True when any wall or extra box cuts the segment from..to.
    ///
    /// The segment form keeps the test bounded to the exact target
    /// distance, so geometry beyond the far endpoint never occludes.
    pub fn segment_blocked(&self, from: Vec3, to: Vec3, extra: &[Aabb]) -> bool {
        self.walls
            .iter()
            .chain(extra.iter())
            .any(|aabb| aabb.hit_by_segment(from, to))
    }

    /// Strongest hideout containing the point, if any.
    pub fn hideout_at(&self, p: Vec3) -> Option<HideoutKind> {
        let mut found = None;
        for hideout in &self.hideouts {
            if !hideout.bounds.contains(p) {
                continue;
            }
            match hideout.kind {
                HideoutKind::Complete => return Some(HideoutKind::Complete),
                HideoutKind::Partial => found = Some(HideoutKind::Partial),
            }
        }
        found
    }
}
