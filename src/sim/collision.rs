//! Hero vs. entity collision on the curved path
//!
//! Trees and collectibles use full 3D distance. Rocks are barriers: they only
//! test the lane-plane distance and are cleared by jumping high enough.
//! At most one outcome per resolve; obstacles are checked before collectibles.

use glam::Vec3;

use super::lane::HeroState;
use super::path::{lane_plane, lane_unit_length, surface_delta, surface_point};
use super::pool::Pool;
use super::state::{Collectible, CollectibleKind, GameEvent, Obstacle, ObstacleKind};
use crate::consts::{COLLECTIBLE_HEIGHT, OBSTACLE_HEIGHT};
use crate::tuning::Tuning;

/// What a resolve pass found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    ObstacleHit { id: u32, kind: ObstacleKind },
    Collected { id: u32, kind: CollectibleKind },
}

/// Per-tick inputs to a resolve pass
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub hero: &'a HeroState,
    /// Path distance rolled so far
    pub rolled: f32,
    pub tick: u64,
    pub dt: f32,
    pub magnet_active: bool,
    /// Hero is in the post-hit grace window
    pub invulnerable: bool,
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    rock_hit_distance: f32,
    jump_clearance: f32,
    tree_hit_distance: f32,
    pickup_distance: f32,
    magnet_collect_radius: f32,
    magnet_attract_radius: f32,
    magnet_pull_speed: f32,
    visibility_cutoff: f32,
}

impl CollisionResolver {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rock_hit_distance: tuning.rock_hit_distance,
            jump_clearance: tuning.jump_clearance,
            tree_hit_distance: tuning.tree_hit_distance,
            pickup_distance: tuning.pickup_distance,
            magnet_collect_radius: tuning.magnet_collect_radius,
            magnet_attract_radius: tuning.magnet_attract_radius,
            magnet_pull_speed: tuning.magnet_pull_speed,
            visibility_cutoff: tuning.visibility_cutoff,
        }
    }

    /// Run one collision pass. The matched entity is released back to its
    /// pool and a despawn event is pushed for it.
    pub fn resolve(
        &self,
        ctx: ResolveContext<'_>,
        obstacles: &mut Pool<Obstacle>,
        collectibles: &mut Pool<Collectible>,
        events: &mut Vec<GameEvent>,
    ) -> Option<CollisionOutcome> {
        let hero_pos = surface_point(ctx.hero.lateral, 0.0, ctx.hero.height);

        if !ctx.invulnerable {
            if let Some((id, kind)) = self.find_obstacle_hit(&ctx, hero_pos, obstacles) {
                obstacles.release(id);
                events.push(GameEvent::ObstacleDespawned { id });
                return Some(CollisionOutcome::ObstacleHit { id, kind });
            }
        }

        if ctx.magnet_active {
            self.attract_coins(&ctx, hero_pos, collectibles, events);
        }

        let (id, kind) = self.find_pickup(&ctx, hero_pos, collectibles)?;
        collectibles.release(id);
        events.push(GameEvent::CollectibleDespawned { id });
        Some(CollisionOutcome::Collected { id, kind })
    }

    fn find_obstacle_hit(
        &self,
        ctx: &ResolveContext<'_>,
        hero_pos: Vec3,
        obstacles: &Pool<Obstacle>,
    ) -> Option<(u32, ObstacleKind)> {
        for obstacle in obstacles.iter_active() {
            if obstacle.spawned_tick == ctx.tick {
                continue;
            }
            let rel = obstacle.path_distance - ctx.rolled;
            if rel < -self.visibility_cutoff {
                continue;
            }
            let pos = surface_point(obstacle.lateral, rel, OBSTACLE_HEIGHT);
            let hit = if obstacle.kind.is_barrier() {
                let planar = lane_plane(hero_pos).distance(lane_plane(pos));
                planar < self.rock_hit_distance
                    && ctx.hero.height < ctx.hero.base_height + self.jump_clearance
            } else {
                hero_pos.distance(pos) <= self.tree_hit_distance
            };
            if hit {
                return Some((obstacle.id, obstacle.kind));
            }
        }
        None
    }

    /// Pull nearby coins toward the hero by a fixed step
    fn attract_coins(
        &self,
        ctx: &ResolveContext<'_>,
        hero_pos: Vec3,
        collectibles: &mut Pool<Collectible>,
        events: &mut Vec<GameEvent>,
    ) {
        let step = self.magnet_pull_speed * ctx.dt;
        if step <= 0.0 {
            return;
        }
        for coin in collectibles.iter_active_mut() {
            if coin.kind != CollectibleKind::Coin || coin.spawned_tick == ctx.tick {
                continue;
            }
            let rel = coin.path_distance - ctx.rolled;
            let pos = surface_point(coin.lateral, rel, COLLECTIBLE_HEIGHT);
            if hero_pos.distance(pos) > self.magnet_attract_radius {
                continue;
            }
            let delta = surface_delta((coin.lateral, rel), (ctx.hero.lateral, 0.0));
            let gap = delta.length();
            if gap <= f32::EPSILON {
                continue;
            }
            let moved = delta / gap * step.min(gap);
            coin.lateral += moved.x / lane_unit_length();
            coin.path_distance += moved.y;
            events.push(GameEvent::CollectibleMoved(coin.descriptor()));
        }
    }

    fn find_pickup(
        &self,
        ctx: &ResolveContext<'_>,
        hero_pos: Vec3,
        collectibles: &Pool<Collectible>,
    ) -> Option<(u32, CollectibleKind)> {
        let radius = if ctx.magnet_active {
            self.pickup_distance.max(self.magnet_collect_radius)
        } else {
            self.pickup_distance
        };
        collectibles
            .iter_active()
            .filter(|c| c.spawned_tick != ctx.tick)
            .find(|c| {
                let pos = surface_point(c.lateral, c.path_distance - ctx.rolled, COLLECTIBLE_HEIGHT);
                hero_pos.distance(pos) < radius
            })
            .map(|c| (c.id, c.kind))
    }
}
