use glam::Vec2;

use aeroduel_shared::{Command, FighterKind, MatchConfig, MatchStatus, TICKS_PER_SEC};
use aeroduel_sim::agents::PursuitAgent;
use aeroduel_sim::world::Bullet;
use aeroduel_sim::{command, run_match, step_tick, ControlMode, Engine, WorldState};

#[test]
fn test_point_blank_shot_downs_the_prop() {
    let mut world = WorldState::new();
    world.jet.position = Vec2::new(300.0, 300.0);
    world.jet.heading = 90.0; // east, straight at the prop
    world.prop.position = Vec2::new(400.0, 300.0);
    world.prop.heading = 90.0; // fleeing east, slower than the bullet

    command::apply_agent(&mut world, FighterKind::Jet, Command::FireAmmo);
    assert_eq!(world.bullets.len(), 1);

    for _ in 0..TICKS_PER_SEC {
        step_tick(&mut world);
        if world.is_terminal() {
            break;
        }
    }

    assert_eq!(
        world.outcome.status(),
        MatchStatus::JetWin,
        "a point-blank bullet must down the prop, got {:?} at tick {}",
        world.outcome.status(),
        world.tick,
    );
    assert!(!world.prop.alive);
    assert!(world.jet.alive);
    assert!(world.bullets.is_empty(), "the hit must consume the bullet");
    assert_eq!(
        world.outcome.reason(),
        Some("Prop-fighter survived 0 seconds")
    );
}

#[test]
fn test_bullet_expires_at_max_distance() {
    let mut world = WorldState::new();
    // Clear corridor: x=200 crosses neither the obstacle nor either flight
    // path within the bullet's lifetime.
    world.bullets.push(Bullet::new(Vec2::new(200.0, 1150.0), 0.0));

    // 1200 px at 300 px/s is 4.0 s = 160 ticks.
    for _ in 0..(4 * TICKS_PER_SEC - 1) {
        step_tick(&mut world);
    }
    assert_eq!(world.bullets.len(), 1, "bullet expired early");

    step_tick(&mut world);
    assert!(world.bullets.is_empty(), "bullet must expire at 4.0 s");
    assert_eq!(world.outcome.status(), MatchStatus::Running);
}

#[test]
fn test_seam_straddling_fighters_ram() {
    // Jet straddling x=W, prop straddling x=0: their bodies only meet
    // through the wrapped mirror images. Without composite masks this
    // tunnels straight through.
    let mut world = WorldState::new();
    world.jet.position = Vec2::new(1595.0, 300.0);
    world.jet.heading = 0.0;
    world.prop.position = Vec2::new(5.0, 300.0);
    world.prop.heading = 0.0;

    step_tick(&mut world);

    assert_eq!(
        world.outcome.status(),
        MatchStatus::PropWin,
        "seam-straddling overlap must resolve as a ram"
    );
    assert!(!world.jet.alive);
    assert!(!world.prop.alive);
    assert_eq!(
        world.outcome.reason(),
        Some("Jet-fighter crashed into Prop-fighter")
    );
}

#[test]
fn test_pursuit_match_is_live_and_deterministic() {
    let config = MatchConfig {
        jet_agent: "pursuit".into(),
        max_ticks: 60 * TICKS_PER_SEC,
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

    assert!(
        replay1.result.shots_fired > 0,
        "pursuit should engage the prop, stats: {:?}",
        replay1.result,
    );
    assert!(replay1.result.final_tick <= config.max_ticks);
    assert_eq!(replay1.result.final_tick, replay2.result.final_tick);
    assert_eq!(replay1.result.status, replay2.result.status);
    assert_eq!(replay1.frames.len(), replay2.frames.len());
}

#[test]
fn test_realtime_engine_with_agent_smoke() {
    let mut engine = Engine::new(ControlMode::SingleAgent);
    engine
        .register_agent(Box::new(PursuitAgent::new()))
        .expect("registration must succeed");

    let snap = engine.run(Some(2 * TICKS_PER_SEC));

    // Two wall-clock seconds of pursuit from the spawn poses: the match is
    // still in progress and the engine advanced exactly to the cap.
    assert_eq!(snap.tick, 2 * TICKS_PER_SEC);
    assert_eq!(snap.status, MatchStatus::Running);
}

#[test]
fn test_keyboard_prop_steers_in_realtime() {
    let mut engine = Engine::new(ControlMode::TwoPlayer);
    let input = engine.human_input();
    input.press(FighterKind::Prop, Command::TurnLeft);
    input.press(FighterKind::Prop, Command::Accelerate);

    let snap = engine.run(Some(10));

    assert_eq!(i8::from(snap.prop.turning), -1);
    // One accelerate press: 100 start + 5.
    assert!((snap.prop.curr_speed - 105.0).abs() < 1e-3);
}
