//! Victory resolution. Checked once per tick after physics and bullet
//! collision, only while the match is running. The priority order below is
//! part of the contract and must not be reordered.

use tracing::info;

use aeroduel_shared::{MatchStatus, IMPACT_SIZE_FIGHTER};

use crate::collision::{collide, first_hit, impact_point};
use crate::world::{ImpactEvent, WorldState};

/// Resolve terminal conditions in fixed priority order, short-circuiting on
/// the first match. Latches the outcome and kills the involved entities.
pub fn resolve(world: &mut WorldState) {
    if world.is_terminal() {
        return;
    }
    let now = world.now_secs();
    let survived = || format!("Prop-fighter survived {} seconds", now as u64);

    // 1. A bullet reaches the prop: first bullet in creation order wins.
    if world.prop.alive {
        let prop_fp = world.prop.footprint();
        let hit = first_hit(
            &prop_fp,
            world
                .bullets
                .iter()
                .filter(|b| !b.spent)
                .map(|b| b.footprint()),
        );
        if let Some(idx) = hit {
            // Map the filtered index back onto the bullet list.
            let idx = world
                .bullets
                .iter()
                .enumerate()
                .filter(|(_, b)| !b.spent)
                .nth(idx)
                .map(|(i, _)| i)
                .expect("hit index out of range");
            let bullet_fp = world.bullets[idx].footprint();
            world.impacts.push(ImpactEvent {
                position: impact_point(&bullet_fp, &prop_fp),
                size: IMPACT_SIZE_FIGHTER,
            });
            world.bullets.remove(idx);
            world.prop.alive = false;
            info!(tick = world.tick, "prop shot down");
            world.outcome.latch(MatchStatus::JetWin, survived(), now);
            return;
        }
    }

    let obstacle_fp = world.obstacle.footprint();

    // 2. The jet flies into the obstacle.
    if world.jet.alive && collide(&obstacle_fp, &world.jet.footprint()) {
        world.impacts.push(ImpactEvent {
            position: impact_point(&obstacle_fp, &world.jet.footprint()),
            size: IMPACT_SIZE_FIGHTER,
        });
        world.jet.alive = false;
        info!(tick = world.tick, "jet hit the obstacle");
        world.outcome.latch(
            MatchStatus::PropWin,
            "Jet-fighter committed suicide".into(),
            now,
        );
        return;
    }

    // 3. The prop flies into the obstacle.
    if world.prop.alive && collide(&obstacle_fp, &world.prop.footprint()) {
        world.impacts.push(ImpactEvent {
            position: impact_point(&obstacle_fp, &world.prop.footprint()),
            size: IMPACT_SIZE_FIGHTER,
        });
        world.prop.alive = false;
        info!(tick = world.tick, "prop hit the obstacle");
        world.outcome.latch(MatchStatus::JetWin, survived(), now);
        return;
    }

    // 4. The fighters collide directly; the ram favors the prop.
    if world.jet.alive
        && world.prop.alive
        && collide(&world.jet.footprint(), &world.prop.footprint())
    {
        world.impacts.push(ImpactEvent {
            position: impact_point(&world.jet.footprint(), &world.prop.footprint()),
            size: IMPACT_SIZE_FIGHTER,
        });
        world.jet.alive = false;
        world.prop.alive = false;
        info!(tick = world.tick, "fighters collided");
        world.outcome.latch(
            MatchStatus::PropWin,
            "Jet-fighter crashed into Prop-fighter".into(),
            now,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Bullet;
    use glam::Vec2;

    #[test]
    fn test_bullet_hit_wins_for_jet() {
        let mut world = WorldState::new();
        world.prop.position = Vec2::new(300.0, 300.0);
        world.tick = 400; // 10 s in
        world
            .bullets
            .push(Bullet::new(Vec2::new(300.0, 300.0), 0.0));

        resolve(&mut world);

        assert_eq!(world.outcome.status(), MatchStatus::JetWin);
        assert!(!world.prop.alive);
        assert!(world.jet.alive);
        assert!(world.bullets.is_empty());
        assert_eq!(world.outcome.reason(), Some("Prop-fighter survived 10 seconds"));
        assert_eq!(world.impacts.len(), 1);
        assert_eq!(world.impacts[0].size, IMPACT_SIZE_FIGHTER);
    }

    #[test]
    fn test_jet_obstacle_crash_wins_for_prop() {
        let mut world = WorldState::new();
        world.jet.position = Vec2::new(800.0, 600.0); // obstacle center

        resolve(&mut world);

        assert_eq!(world.outcome.status(), MatchStatus::PropWin);
        assert!(!world.jet.alive);
        assert!(world.prop.alive);
        assert_eq!(world.outcome.reason(), Some("Jet-fighter committed suicide"));
    }

    #[test]
    fn test_prop_obstacle_crash_wins_for_jet() {
        let mut world = WorldState::new();
        world.prop.position = Vec2::new(800.0, 600.0);

        resolve(&mut world);

        assert_eq!(world.outcome.status(), MatchStatus::JetWin);
        assert!(!world.prop.alive);
    }

    #[test]
    fn test_ram_kills_both_and_wins_for_prop() {
        let mut world = WorldState::new();
        world.jet.position = Vec2::new(300.0, 300.0);
        world.prop.position = Vec2::new(305.0, 300.0);

        resolve(&mut world);

        assert_eq!(world.outcome.status(), MatchStatus::PropWin);
        assert!(!world.jet.alive);
        assert!(!world.prop.alive);
        assert_eq!(
            world.outcome.reason(),
            Some("Jet-fighter crashed into Prop-fighter")
        );
    }

    #[test]
    fn test_bullet_rule_outranks_obstacle_rule() {
        // The prop simultaneously overlaps a bullet and the obstacle; the
        // bullet rule must win per the fixed priority order.
        let mut world = WorldState::new();
        world.prop.position = Vec2::new(800.0, 600.0); // inside obstacle
        world
            .bullets
            .push(Bullet::new(Vec2::new(800.0, 600.0), 0.0));

        resolve(&mut world);

        assert_eq!(world.outcome.status(), MatchStatus::JetWin);
        assert!(world.bullets.is_empty(), "bullet must be consumed by the hit");
        assert_eq!(world.impacts.len(), 1);
    }

    #[test]
    fn test_jet_obstacle_outranks_ram() {
        // Jet touches both the obstacle and the prop: rule 2 fires first,
        // so the prop survives.
        let mut world = WorldState::new();
        world.jet.position = Vec2::new(800.0, 600.0);
        world.prop.position = Vec2::new(805.0, 600.0);

        resolve(&mut world);

        assert_eq!(world.outcome.status(), MatchStatus::PropWin);
        assert!(!world.jet.alive);
        assert!(world.prop.alive);
        assert_eq!(world.outcome.reason(), Some("Jet-fighter committed suicide"));
    }

    #[test]
    fn test_no_contact_stays_running() {
        let mut world = WorldState::new();
        resolve(&mut world);
        assert_eq!(world.outcome.status(), MatchStatus::Running);
        assert!(world.jet.alive && world.prop.alive);
        assert!(world.impacts.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent_after_latch() {
        let mut world = WorldState::new();
        world.jet.position = Vec2::new(800.0, 600.0);
        resolve(&mut world);
        let status = world.outcome.status();

        // A later tick with a new would-be condition must not re-latch.
        world.prop.position = Vec2::new(800.0, 600.0);
        resolve(&mut world);
        assert_eq!(world.outcome.status(), status);
        assert!(world.prop.alive);
    }
}
