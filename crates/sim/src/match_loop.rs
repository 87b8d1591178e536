//! Deterministic, synchronous match runner. No threads, no sleeping: agents
//! are invoked once per tick, so identical inputs always produce identical
//! replays. The real-time engine (`engine`/`bridge`) covers the concurrent
//! case; this loop covers the CLI, the server and the tests.

use aeroduel_shared::{FighterKind, MatchConfig, MatchResult, Replay};

use crate::agent::DecisionAgent;
use crate::world::WorldState;
use crate::{collision, command, outcome, physics};

/// Advance the world by one full tick: physics, bullet resolution, then
/// outcome, in that order. Command routing happens before this, at the tick
/// boundary.
pub fn step_tick(world: &mut WorldState) {
    physics::step(world);
    collision::resolve_bullets(world);
    outcome::resolve(world);
}

/// Run a match to completion (outcome latch or tick cap) and record it.
/// The jet agent is mandatory; without a prop agent the prop flies straight,
/// exactly as it would with no keys pressed.
pub fn run_match(
    config: &MatchConfig,
    jet_agent: &mut (dyn DecisionAgent + '_),
    mut prop_agent: Option<&mut (dyn DecisionAgent + '_)>,
) -> Replay {
    let mut world = WorldState::new();
    let frame_interval = config.frame_interval.max(1);
    let mut frames = Vec::new();

    // Capture the initial frame.
    frames.push(world.snapshot());

    for seq in 0..config.max_ticks {
        let snap = world.snapshot();
        let cmd = jet_agent.decide(seq, &snap.jet, &snap.prop, &snap.obstacle, &snap.bullets);
        command::apply_agent(&mut world, FighterKind::Jet, cmd);
        if let Some(agent) = prop_agent.as_deref_mut() {
            let cmd = agent.decide(seq, &snap.prop, &snap.jet, &snap.obstacle, &snap.bullets);
            command::apply_agent(&mut world, FighterKind::Prop, cmd);
        }

        step_tick(&mut world);

        if world.tick % frame_interval == 0 || world.is_terminal() {
            frames.push(world.snapshot());
        }
        world.impacts.clear();

        if world.is_terminal() {
            break;
        }
    }

    let result = MatchResult {
        status: world.outcome.status(),
        reason: world.outcome.reason().map(str::to_owned),
        final_tick: world.tick,
        elapsed_secs: world.outcome.ended_at_secs().unwrap_or_else(|| world.now_secs()),
        shots_fired: world.shots_fired,
    };

    Replay {
        config: config.clone(),
        frames,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::NoopAgent;
    use crate::agents::PursuitAgent;
    use aeroduel_shared::{MatchStatus, TICKS_PER_SEC};

    #[test]
    fn test_idle_match_runs_to_the_tick_cap() {
        let config = MatchConfig {
            max_ticks: 2 * TICKS_PER_SEC,
            ..Default::default()
        };
        let mut jet = NoopAgent;
        let replay = run_match(&config, &mut jet, None);

        assert_eq!(replay.result.status, MatchStatus::Running);
        assert_eq!(replay.result.final_tick, config.max_ticks);
        assert!(!replay.frames.is_empty());
    }

    #[test]
    fn test_frames_recorded_at_interval() {
        let config = MatchConfig {
            max_ticks: 40,
            frame_interval: 4,
            ..Default::default()
        };
        let mut jet = NoopAgent;
        let replay = run_match(&config, &mut jet, None);

        // Initial frame + one per interval.
        assert_eq!(replay.frames.len(), 11);
        assert_eq!(replay.frames[0].tick, 0);
        assert_eq!(replay.frames[1].tick, 4);
    }

    #[test]
    fn test_pursuit_agent_opens_fire() {
        let config = MatchConfig {
            jet_agent: "pursuit".into(),
            max_ticks: 30 * TICKS_PER_SEC,
            ..Default::default()
        };
        let mut jet = PursuitAgent::new();
        let replay = run_match(&config, &mut jet, None);

        assert!(replay.result.shots_fired > 0, "pursuit never fired");
    }

    #[test]
    fn test_deterministic_replays() {
        let config = MatchConfig {
            jet_agent: "pursuit".into(),
            max_ticks: 20 * TICKS_PER_SEC,
            ..Default::default()
        };

        let replay1 = {
            let mut jet = PursuitAgent::new();
            run_match(&config, &mut jet, None)
        };
        let replay2 = {
            let mut jet = PursuitAgent::new();
            run_match(&config, &mut jet, None)
        };

        assert_eq!(replay1.result.final_tick, replay2.result.final_tick);
        assert_eq!(replay1.result.status, replay2.result.status);
        assert_eq!(replay1.result.shots_fired, replay2.result.shots_fired);
        assert_eq!(replay1.frames.len(), replay2.frames.len());
        for (a, b) in replay1.frames.iter().zip(&replay2.frames) {
            assert_eq!(a.tick, b.tick);
            assert_eq!(a.jet.x.to_bits(), b.jet.x.to_bits());
            assert_eq!(a.prop.y.to_bits(), b.prop.y.to_bits());
        }
    }

    #[test]
    fn test_replay_serialization_round_trip() {
        let config = MatchConfig {
            max_ticks: 40,
            ..Default::default()
        };
        let mut jet = NoopAgent;
        let replay = run_match(&config, &mut jet, None);

        let json = serde_json::to_string(&replay).expect("replay should serialize");
        let back: Replay = serde_json::from_str(&json).expect("replay should deserialize");
        assert_eq!(back.result.final_tick, replay.result.final_tick);
        assert_eq!(back.frames.len(), replay.frames.len());
    }
}
