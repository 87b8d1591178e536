//! Scripted pursuit agent: chases the opponent along the shortest toroidal
//! path, swerves around the obstacle, and shoots when lined up in range.

use aeroduel_shared::{
    BulletSnapshot, Command, FighterSnapshot, ObstacleSnapshot, Turning, FIELD_HEIGHT, FIELD_WIDTH,
};

use crate::agent::DecisionAgent;

/// Margin added around the obstacle when probing ahead, covering the
/// fighter's own half-extent plus slack for turn radius.
const AVOID_MARGIN: f32 = 60.0;
/// How far ahead of the nose the avoidance probe sits.
const PROBE_DISTANCE: f32 = 160.0;
/// Half-angle within which the gun is considered lined up.
const AIM_DEADBAND_DEG: f32 = 4.0;
/// Do not waste ammo beyond this range.
const FIRE_RANGE: f32 = 900.0;

pub struct PursuitAgent;

impl PursuitAgent {
    pub fn new() -> Self {
        PursuitAgent
    }
}

impl Default for PursuitAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionAgent for PursuitAgent {
    fn name(&self) -> &str {
        "pursuit"
    }

    fn decide(
        &mut self,
        _seq: u64,
        own: &FighterSnapshot,
        opponent: &FighterSnapshot,
        obstacle: &ObstacleSnapshot,
        _bullets: &[BulletSnapshot],
    ) -> Command {
        // Steering around the obstacle outranks everything else.
        if let Some(cmd) = avoid_obstacle(own, obstacle) {
            return cmd;
        }

        // Shortest displacement on the torus, not across the open field.
        let dx = torus_delta(own.x, opponent.x, FIELD_WIDTH);
        let dy = torus_delta(own.y, opponent.y, FIELD_HEIGHT);
        let distance = (dx * dx + dy * dy).sqrt();

        // Heading 0 is up and increases clockwise; travel is (sin h, -cos h).
        let desired = dx.atan2(-dy).to_degrees().rem_euclid(360.0);
        let diff = angle_diff(desired, own.heading);

        if diff > AIM_DEADBAND_DEG {
            return Command::TurnRight;
        }
        if diff < -AIM_DEADBAND_DEG {
            return Command::TurnLeft;
        }
        if own.turning != Turning::Straight {
            return Command::GoStraight;
        }
        if own.curr_ammo > 0 && distance < FIRE_RANGE {
            return Command::FireAmmo;
        }
        if own.curr_speed < own.top_speed {
            return Command::Accelerate;
        }
        Command::Noop
    }
}

/// Turn away when the point ahead of the nose lands inside the inflated
/// obstacle rectangle.
fn avoid_obstacle(own: &FighterSnapshot, obstacle: &ObstacleSnapshot) -> Option<Command> {
    let rad = own.heading.to_radians();
    let px = (own.x + PROBE_DISTANCE * rad.sin()).rem_euclid(FIELD_WIDTH);
    let py = (own.y - PROBE_DISTANCE * rad.cos()).rem_euclid(FIELD_HEIGHT);

    let inside = px >= obstacle.x - AVOID_MARGIN
        && px <= obstacle.x + obstacle.width + AVOID_MARGIN
        && py >= obstacle.y - AVOID_MARGIN
        && py <= obstacle.y + obstacle.height + AVOID_MARGIN;
    if !inside {
        return None;
    }

    // Break toward whichever side the obstacle center is NOT on.
    let cx = obstacle.x + obstacle.width / 2.0;
    let cy = obstacle.y + obstacle.height / 2.0;
    let to_center = torus_delta(own.x, cx, FIELD_WIDTH)
        .atan2(-torus_delta(own.y, cy, FIELD_HEIGHT))
        .to_degrees()
        .rem_euclid(360.0);
    if angle_diff(to_center, own.heading) >= 0.0 {
        Some(Command::TurnLeft)
    } else {
        Some(Command::TurnRight)
    }
}

/// Signed shortest displacement from `from` to `to` on a wrapping axis.
fn torus_delta(from: f32, to: f32, bound: f32) -> f32 {
    let mut d = to - from;
    if d > bound / 2.0 {
        d -= bound;
    } else if d < -bound / 2.0 {
        d += bound;
    }
    d
}

/// Shortest angular difference in degrees, in [-180, 180).
fn angle_diff(target: f32, current: f32) -> f32 {
    (target - current + 180.0).rem_euclid(360.0) - 180.0
}
