//! Kinematic stepping: turning, translation, toroidal wrap, ammo regen and
//! bullet mileage. Each call advances exactly one nominal tick regardless of
//! wall time; there is no delta clamping and no catch-up.

use glam::Vec2;

use aeroduel_shared::{FIELD_HEIGHT, FIELD_WIDTH, TICK_SECS};

use crate::world::{Bullet, Fighter, WorldState};

/// Wrap a position onto the torus. `rem_euclid` keeps every coordinate in
/// [0, bound) and is idempotent once inside.
pub fn wrap_position(p: Vec2) -> Vec2 {
    Vec2::new(p.x.rem_euclid(FIELD_WIDTH), p.y.rem_euclid(FIELD_HEIGHT))
}

/// Advance the world by one tick. Frozen once the outcome latches.
pub fn step(world: &mut WorldState) {
    if world.is_terminal() {
        return;
    }
    let now = world.now_secs();
    step_fighter(&mut world.jet, now);
    step_fighter(&mut world.prop, now);
    for bullet in &mut world.bullets {
        step_bullet(bullet);
    }
    world.tick += 1;
}

fn step_fighter(f: &mut Fighter, now: f64) {
    if !f.alive {
        return;
    }
    let stats = f.stats();
    let dt = TICK_SECS as f32;

    // Heading first, then translation along the new heading.
    f.heading = (f.heading + stats.turn_speed * f.turning.rate() * dt).rem_euclid(360.0);
    let rad = f.heading.to_radians();
    f.position = wrap_position(Vec2::new(
        f.position.x + f.curr_speed * rad.sin() * dt,
        f.position.y - f.curr_speed * rad.cos() * dt,
    ));

    // Ammo regen. The else branch keeps re-stamping while the magazine is
    // full, so dropping below max never grants an instant round.
    if f.curr_ammo < stats.max_ammo {
        if now - f.last_regen_secs > stats.ammo_regen_secs {
            f.curr_ammo += 1;
            f.last_regen_secs = now;
        }
    } else {
        f.last_regen_secs = now;
    }

    debug_assert!(f.curr_ammo <= stats.max_ammo);
    debug_assert!((0.0..360.0).contains(&f.heading));
}

fn step_bullet(b: &mut Bullet) {
    if b.spent {
        return;
    }
    let dt = TICK_SECS as f32;
    let rad = b.heading.to_radians();
    b.position = wrap_position(Vec2::new(
        b.position.x + b.speed * rad.sin() * dt,
        b.position.y - b.speed * rad.cos() * dt,
    ));
    b.distance_traveled += b.speed * dt;
}
