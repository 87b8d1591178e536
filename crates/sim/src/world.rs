//! Authoritative game state: both fighters, live bullets, the obstacle and
//! the outcome latch. The engine owns exactly one `WorldState`; everything
//! else sees it through `WorldSnapshot`s.

use glam::Vec2;

use aeroduel_shared::{
    BulletSnapshot, FighterKind, FighterSnapshot, FighterStats, ImpactSnapshot, MatchStatus,
    ObstacleSnapshot, Turning, WorldSnapshot, BULLET_MAX_DISTANCE, BULLET_SPEED, FIELD_HEIGHT,
    FIELD_WIDTH, FIGHTER_EXTENT, MUZZLE_OFFSET, OBSTACLE_HEIGHT, OBSTACLE_WIDTH, TICK_SECS,
};

use crate::mask::Rect;
use crate::sprite::Footprint;

#[derive(Debug, Clone)]
pub struct Fighter {
    pub kind: FighterKind,
    pub position: Vec2,
    /// Degrees clockwise from "up", always in [0, 360).
    pub heading: f32,
    pub turning: Turning,
    pub curr_speed: f32,
    pub curr_ammo: u32,
    /// Simulation-time stamps, in seconds.
    pub last_fire_secs: f64,
    pub last_regen_secs: f64,
    pub alive: bool,
}

impl Fighter {
    pub fn new(kind: FighterKind) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            position: Vec2::new(stats.spawn_x, stats.spawn_y),
            heading: stats.spawn_heading,
            turning: Turning::Straight,
            curr_speed: stats.start_speed,
            curr_ammo: stats.start_ammo,
            // Negative infinity means the fire delay is already satisfied at
            // the first tick.
            last_fire_secs: f64::NEG_INFINITY,
            last_regen_secs: 0.0,
            alive: true,
        }
    }

    pub fn stats(&self) -> &'static FighterStats {
        self.kind.stats()
    }

    /// The muzzle point: half the sprite extent plus the muzzle offset,
    /// projected along the current heading.
    pub fn tip_position(&self) -> Vec2 {
        let rad = self.heading.to_radians();
        let reach = FIGHTER_EXTENT as f32 / 2.0 + MUZZLE_OFFSET;
        Vec2::new(
            self.position.x + reach * rad.sin(),
            self.position.y - reach * rad.cos(),
        )
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::fighter(self.kind, self.position, self.heading)
    }

    pub fn snapshot(&self) -> FighterSnapshot {
        let stats = self.stats();
        FighterSnapshot {
            kind: self.kind,
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
            turning: self.turning,
            curr_speed: self.curr_speed,
            top_speed: stats.top_speed,
            min_speed: stats.min_speed,
            acceleration: stats.acceleration,
            turn_speed: stats.turn_speed,
            curr_ammo: self.curr_ammo,
            max_ammo: stats.max_ammo,
            ammo_regen_secs: stats.ammo_regen_secs,
            fire_delay_secs: stats.fire_delay_secs,
            alive: self.alive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub position: Vec2,
    /// Inherited from the firer at spawn, fixed thereafter.
    pub heading: f32,
    pub speed: f32,
    pub distance_traveled: f32,
    pub max_distance: f32,
    /// Set by exactly one terminal condition; spent bullets are pruned at
    /// the end of the tick.
    pub spent: bool,
}

impl Bullet {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            speed: BULLET_SPEED,
            distance_traveled: 0.0,
            max_distance: BULLET_MAX_DISTANCE,
            spent: false,
        }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::bullet(self.position, self.heading)
    }

    pub fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
            speed: self.speed,
            distance_traveled: self.distance_traveled,
            max_distance: self.max_distance,
        }
    }
}

/// The single static obstacle, centered on the field.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub fn new() -> Self {
        let center = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        Self {
            rect: Rect::from_center(center, OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::obstacle(self.rect)
    }

    pub fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            x: self.rect.left as f32,
            y: self.rect.top as f32,
            width: self.rect.width as f32,
            height: self.rect.height as f32,
        }
    }
}

impl Default for Obstacle {
    fn default() -> Self {
        Self::new()
    }
}

/// A collision registered this tick; consumed by the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct ImpactEvent {
    pub position: Vec2,
    pub size: u32,
}

/// One-way match outcome latch: `Running` until a terminal condition fires,
/// then frozen forever.
#[derive(Debug, Clone)]
pub struct Outcome {
    status: MatchStatus,
    reason: Option<String>,
    ended_at_secs: Option<f64>,
}

impl Outcome {
    fn new() -> Self {
        Self {
            status: MatchStatus::Running,
            reason: None,
            ended_at_secs: None,
        }
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn ended_at_secs(&self) -> Option<f64> {
        self.ended_at_secs
    }

    /// Latch a terminal status. A no-op once latched.
    pub(crate) fn latch(&mut self, status: MatchStatus, reason: String, now_secs: f64) {
        debug_assert!(status.is_terminal());
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.reason = Some(reason);
        self.ended_at_secs = Some(now_secs);
    }
}

pub struct WorldState {
    pub tick: u64,
    pub jet: Fighter,
    pub prop: Fighter,
    pub bullets: Vec<Bullet>,
    pub obstacle: Obstacle,
    pub outcome: Outcome,
    pub impacts: Vec<ImpactEvent>,
    pub shots_fired: u32,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            jet: Fighter::new(FighterKind::Jet),
            prop: Fighter::new(FighterKind::Prop),
            bullets: Vec::new(),
            obstacle: Obstacle::new(),
            outcome: Outcome::new(),
            impacts: Vec::new(),
            shots_fired: 0,
        }
    }

    /// Simulation time in seconds: ticks elapsed times the nominal tick.
    pub fn now_secs(&self) -> f64 {
        self.tick as f64 * TICK_SECS
    }

    pub fn fighter(&self, kind: FighterKind) -> &Fighter {
        match kind {
            FighterKind::Jet => &self.jet,
            FighterKind::Prop => &self.prop,
        }
    }

    pub fn fighter_mut(&mut self, kind: FighterKind) -> &mut Fighter {
        match kind {
            FighterKind::Jet => &mut self.jet,
            FighterKind::Prop => &mut self.prop,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.status().is_terminal()
    }

    /// Immutable copy of the public state; never aliases live state.
    /// Spent bullets are excluded.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            elapsed_secs: self.outcome.ended_at_secs().unwrap_or_else(|| self.now_secs()),
            jet: self.jet.snapshot(),
            prop: self.prop.snapshot(),
            obstacle: self.obstacle.snapshot(),
            bullets: self
                .bullets
                .iter()
                .filter(|b| !b.spent)
                .map(Bullet::snapshot)
                .collect(),
            status: self.outcome.status(),
            reason: self.outcome.reason().map(str::to_owned),
            impacts: self
                .impacts
                .iter()
                .map(|i| ImpactSnapshot {
                    x: i.position.x,
                    y: i.position.y,
                    size: i.size,
                })
                .collect(),
        }
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let world = WorldState::new();
        assert!(world.jet.alive && world.prop.alive);
        assert_eq!(world.jet.curr_ammo, 5);
        assert_eq!(world.prop.curr_ammo, 0);
        assert_eq!(world.tick, 0);
        assert!(world.bullets.is_empty());
        assert_eq!(world.outcome.status(), MatchStatus::Running);
    }

    #[test]
    fn test_obstacle_centered() {
        let o = Obstacle::new();
        assert_eq!(o.rect.left, 500);
        assert_eq!(o.rect.top, 400);
        assert_eq!(o.rect.right(), 1100);
        assert_eq!(o.rect.bottom(), 800);
    }

    #[test]
    fn test_tip_position_follows_heading() {
        let mut f = Fighter::new(FighterKind::Jet);
        f.position = Vec2::new(200.0, 200.0);
        f.heading = 0.0; // up
        let tip = f.tip_position();
        assert!((tip.x - 200.0).abs() < 1e-3);
        assert!((tip.y - 150.0).abs() < 1e-3); // 40 half-extent + 10 muzzle

        f.heading = 90.0; // east
        let tip = f.tip_position();
        assert!((tip.x - 250.0).abs() < 1e-3);
        assert!((tip.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_outcome_latches_once() {
        let mut outcome = Outcome::new();
        outcome.latch(MatchStatus::JetWin, "first".into(), 10.0);
        outcome.latch(MatchStatus::PropWin, "second".into(), 20.0);
        assert_eq!(outcome.status(), MatchStatus::JetWin);
        assert_eq!(outcome.reason(), Some("first"));
        assert_eq!(outcome.ended_at_secs(), Some(10.0));
    }

    #[test]
    fn test_snapshot_hides_spent_bullets() {
        let mut world = WorldState::new();
        world.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), 0.0));
        world.bullets.push(Bullet::new(Vec2::new(20.0, 20.0), 0.0));
        world.bullets[0].spent = true;
        let snap = world.snapshot();
        assert_eq!(snap.bullets.len(), 1);
        assert!((snap.bullets[0].x - 20.0).abs() < 1e-6);
    }
}
