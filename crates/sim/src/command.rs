//! Command routing: translates `Command` values into entity mutation,
//! enforcing the ammo and cooldown rules. The agent channel sets turning
//! state directly; the human (keyboard) channel uses toggle semantics.

use aeroduel_shared::{Command, FighterKind, Turning};

use crate::world::{Bullet, Fighter, WorldState};

/// Apply an agent-issued command. Turning commands set the state directly.
pub fn apply_agent(world: &mut WorldState, kind: FighterKind, cmd: Command) {
    if world.is_terminal() || !world.fighter(kind).alive {
        return;
    }
    match cmd {
        Command::Noop => {}
        Command::TurnLeft => world.fighter_mut(kind).turning = Turning::CounterClockwise,
        Command::TurnRight => world.fighter_mut(kind).turning = Turning::Clockwise,
        Command::GoStraight => world.fighter_mut(kind).turning = Turning::Straight,
        Command::Accelerate => accelerate(world.fighter_mut(kind)),
        Command::Decelerate => decelerate(world.fighter_mut(kind)),
        Command::FireAmmo => try_fire(world, kind),
    }
}

/// Apply a keyboard-issued command. A directional press engages its turn
/// only from straight flight; pressing the opposite direction while turning
/// cancels back to straight, and repeating the held direction is idempotent.
pub fn apply_human(world: &mut WorldState, kind: FighterKind, cmd: Command) {
    if world.is_terminal() || !world.fighter(kind).alive {
        return;
    }
    match cmd {
        Command::TurnLeft => {
            let f = world.fighter_mut(kind);
            f.turning = match f.turning {
                Turning::Straight => Turning::CounterClockwise,
                Turning::Clockwise => Turning::Straight,
                Turning::CounterClockwise => Turning::CounterClockwise,
            };
        }
        Command::TurnRight => {
            let f = world.fighter_mut(kind);
            f.turning = match f.turning {
                Turning::Straight => Turning::Clockwise,
                Turning::CounterClockwise => Turning::Straight,
                Turning::Clockwise => Turning::Clockwise,
            };
        }
        other => apply_agent(world, kind, other),
    }
}

fn accelerate(f: &mut Fighter) {
    let stats = f.stats();
    f.curr_speed = (f.curr_speed + stats.acceleration).min(stats.top_speed);
}

fn decelerate(f: &mut Fighter) {
    let stats = f.stats();
    f.curr_speed = (f.curr_speed - stats.acceleration).max(stats.min_speed);
}

/// Fire iff ammo remains and the fire delay has elapsed. Success spawns a
/// bullet at the muzzle, inheriting the firer's heading. Failure is a
/// silent no-op.
fn try_fire(world: &mut WorldState, kind: FighterKind) {
    let now = world.now_secs();
    let f = world.fighter_mut(kind);
    let stats = f.stats();
    if f.curr_ammo == 0 || now < f.last_fire_secs + stats.fire_delay_secs {
        return;
    }
    f.curr_ammo -= 1;
    f.last_fire_secs = now;
    let tip = f.tip_position();
    let heading = f.heading;
    world.bullets.push(Bullet::new(tip, heading));
    world.shots_fired += 1;
}
