//! Waypoint-graph navigation: path planning and agent traversal.
//!
//! A thin stand-in for a navigation mesh. Agents submit destinations on
//! their `NavAgent`; the planner resolves them one tick later (pending
//! flag), and traversal walks the planned corridor, halting in front of
//! closed doors until someone opens them.

use crate::components::{Facing, NavAgent, Position};
use crate::scene::Aabb;
use glam::Vec3;
use hecs::{Entity, World};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: usize,
    cost: f32,
    /// Door entity gating this edge, if any
    door: Option<Entity>,
}

#[derive(Clone, Copy, PartialEq)]
struct ScoredNode {
    node: usize,
    f_score: f32, // g_score + heuristic
}

impl Eq for ScoredNode {}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_score.total_cmp(&self.f_score)
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walkable-space graph the planner runs over
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    nodes: Vec<Vec3>,
    edges: Vec<Vec<Edge>>,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, pos: Vec3) -> usize {
        self.nodes.push(pos);
        self.edges.push(Vec::new());
        self.nodes.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Connect two nodes both ways at distance cost.
    pub fn connect(&mut self, a: usize, b: usize) {
        self.link(a, b, None);
    }

    /// Connect two nodes both ways through a doorway.
    pub fn connect_through_door(&mut self, a: usize, b: usize, door: Entity) {
        self.link(a, b, Some(door));
    }

    fn link(&mut self, a: usize, b: usize, door: Option<Entity>) {
        let cost = self.nodes[a].distance(self.nodes[b]);
        self.edges[a].push(Edge { to: b, cost, door });
        self.edges[b].push(Edge { to: a, cost, door });
    }

    fn nearest_index(&self, p: Vec3) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance_squared(p).total_cmp(&b.distance_squared(p)))
            .map(|(i, _)| i)
    }

    /// Snap a point onto the graph if a node lies within max_dist.
    /// Mirrors a navmesh sample query; used to validate agent spawns.
    pub fn sample_position(&self, p: Vec3, max_dist: f32) -> Option<Vec3> {
        let idx = self.nearest_index(p)?;
        let node = self.nodes[idx];
        if node.distance(p) <= max_dist {
            Some(node)
        } else {
            None
        }
    }

    /// Plan a corridor from..to, excluding the start point.
    ///
    /// Edges through doors in `blocked_doors` are never taken. Returns
    /// None when the graph is cut; the caller's stuck recovery owns
    /// retries. An empty graph or a shared nearest node degenerates to
    /// the direct segment.
    pub fn plan(
        &self,
        from: Vec3,
        to: Vec3,
        blocked_doors: &HashSet<Entity>,
    ) -> Option<Vec<Vec3>> {
        if self.nodes.is_empty() {
            return Some(vec![to]);
        }
        let start = self.nearest_index(from)?;
        let goal = self.nearest_index(to)?;
        if start == goal {
            return Some(vec![to]);
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();
        let mut g_score: HashMap<usize, f32> = HashMap::new();

        g_score.insert(start, 0.0);
        open_set.push(ScoredNode {
            node: start,
            f_score: self.heuristic(start, goal),
        });

        while let Some(current) = open_set.pop() {
            if current.node == goal {
                let mut path: Vec<Vec3> = self
                    .reconstruct(&came_from, current.node)
                    .into_iter()
                    .map(|i| self.nodes[i])
                    .collect();
                path.push(to);
                return Some(path);
            }

            let current_g = *g_score.get(&current.node).unwrap_or(&f32::INFINITY);

            for edge in &self.edges[current.node] {
                if let Some(door) = edge.door {
                    if blocked_doors.contains(&door) {
                        continue;
                    }
                }

                let tentative_g = current_g + edge.cost;
                let neighbor_g = *g_score.get(&edge.to).unwrap_or(&f32::INFINITY);

                if tentative_g < neighbor_g {
                    came_from.insert(edge.to, current.node);
                    g_score.insert(edge.to, tentative_g);
                    open_set.push(ScoredNode {
                        node: edge.to,
                        f_score: tentative_g + self.heuristic(edge.to, goal),
                    });
                }
            }
        }

        None // The graph is cut between the two points
    }

    fn heuristic(&self, a: usize, b: usize) -> f32 {
        self.nodes[a].distance(self.nodes[b])
    }

    /// Walk came_from back to the start, returning nodes start-exclusive.
    fn reconstruct(&self, came_from: &HashMap<usize, usize>, mut current: usize) -> Vec<usize> {
        let mut path = vec![current];
        while let Some(&prev) = came_from.get(&current) {
            current = prev;
            path.push(current);
        }
        path.pop(); // drop the start node
        path.reverse();
        path
    }
}

/// Plan paths for agents whose destination was submitted last tick.
pub fn resolve_pending_paths(world: &mut World, graph: &NavGraph, locked_doors: &HashSet<Entity>) {
    for (_, (position, agent)) in world.query_mut::<(&Position, &mut NavAgent)>() {
        if !agent.pending {
            continue;
        }
        let Some(dest) = agent.destination else {
            agent.pending = false;
            continue;
        };
        agent.path = graph.plan(position.pos, dest, locked_doors).unwrap_or_default();
        agent.next_index = 0;
        agent.pending = false;
    }
}

/// Move every agent along its corridor, stopping short of closed doors.
pub fn advance_agents(world: &mut World, closed_doors: &[Aabb], dt: f32) {
    puffin::profile_function!();

    for (_, (position, agent, facing)) in
        world.query_mut::<(&mut Position, &mut NavAgent, &mut Facing)>()
    {
        let start = position.pos;

        if agent.stopped || agent.pending || agent.destination.is_none() {
            agent.velocity = Vec3::ZERO;
            continue;
        }

        let mut pos = start;
        let mut budget = agent.speed * dt;
        while budget > 0.0 {
            let Some(&target) = agent.path.get(agent.next_index) else {
                break;
            };
            let to_target = target - pos;
            let dist = to_target.length();
            if dist <= 1e-4 {
                agent.next_index += 1;
                continue;
            }
            let step = budget.min(dist);
            let next = pos + to_target / dist * step;
            if segment_hits_door(pos, next, closed_doors) {
                // Parked in front of a shut door; the door routine takes it from here
                break;
            }
            pos = next;
            budget -= step;
            if step >= dist {
                agent.next_index += 1;
            }
        }

        position.pos = pos;
        agent.velocity = if dt > 0.0 { (pos - start) / dt } else { Vec3::ZERO };
        facing.look_along(agent.velocity);
    }
}

/// A door box blocks a step unless the walker is already inside it
/// (stepping out of a doorway must always be possible).
pub fn segment_hits_door(from: Vec3, to: Vec3, closed_doors: &[Aabb]) -> bool {
    closed_doors
        .iter()
        .any(|door| !door.contains(from) && door.hit_by_segment(from, to))
}
