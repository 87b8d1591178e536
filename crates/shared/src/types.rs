use serde::{Deserialize, Serialize};

use crate::constants::{FighterStats, JET_STATS, PROP_STATS};

/// One actuation request for a fighter, issued by the keyboard boundary or a
/// decision agent. Every variant other than `FireAmmo` mutates at most one
/// field of the target fighter; `FireAmmo` may spawn a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Noop,
    Accelerate,
    Decelerate,
    TurnLeft,
    TurnRight,
    GoStraight,
    FireAmmo,
}

impl Default for Command {
    fn default() -> Self {
        Command::Noop
    }
}

/// Turning state of a fighter. Serialized as -1 / 0 / 1 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Turning {
    CounterClockwise,
    Straight,
    Clockwise,
}

impl Turning {
    /// Signed multiplier applied to `turn_speed`.
    pub fn rate(self) -> f32 {
        match self {
            Turning::CounterClockwise => -1.0,
            Turning::Straight => 0.0,
            Turning::Clockwise => 1.0,
        }
    }
}

impl Default for Turning {
    fn default() -> Self {
        Turning::Straight
    }
}

impl From<Turning> for i8 {
    fn from(t: Turning) -> i8 {
        match t {
            Turning::CounterClockwise => -1,
            Turning::Straight => 0,
            Turning::Clockwise => 1,
        }
    }
}

impl TryFrom<i8> for Turning {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Turning::CounterClockwise),
            0 => Ok(Turning::Straight),
            1 => Ok(Turning::Clockwise),
            other => Err(format!("turning must be -1, 0 or 1, got {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FighterKind {
    Jet,
    Prop,
}

impl FighterKind {
    pub fn stats(self) -> &'static FighterStats {
        match self {
            FighterKind::Jet => &JET_STATS,
            FighterKind::Prop => &PROP_STATS,
        }
    }

    pub fn opponent(self) -> FighterKind {
        match self {
            FighterKind::Jet => FighterKind::Prop,
            FighterKind::Prop => FighterKind::Jet,
        }
    }
}

/// Match state. Transitions `Running` -> terminal exactly once, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Running,
    JetWin,
    PropWin,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchStatus::Running)
    }
}

/// Public state of one fighter, as exposed to decision agents and the
/// presentation layer. Field set mirrors the decision-agent contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub kind: FighterKind,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub turning: Turning,
    pub curr_speed: f32,
    pub top_speed: f32,
    pub min_speed: f32,
    pub acceleration: f32,
    pub turn_speed: f32,
    pub curr_ammo: u32,
    pub max_ammo: u32,
    pub ammo_regen_secs: f64,
    pub fire_delay_secs: f64,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletSnapshot {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub speed: f32,
    pub distance_traveled: f32,
    pub max_distance: f32,
}

/// The obstacle rectangle; `x`/`y` are the top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A collision registered this tick, for the presentation layer to animate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImpactSnapshot {
    pub x: f32,
    pub y: f32,
    pub size: u32,
}

/// Read-only view of the whole world after one tick. This is what rendering
/// and the decision-agent bridge consume; it never aliases live state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub elapsed_secs: f64,
    pub jet: FighterSnapshot,
    pub prop: FighterSnapshot,
    pub obstacle: ObstacleSnapshot,
    pub bullets: Vec<BulletSnapshot>,
    pub status: MatchStatus,
    pub reason: Option<String>,
    pub impacts: Vec<ImpactSnapshot>,
}

impl WorldSnapshot {
    pub fn fighter(&self, kind: FighterKind) -> &FighterSnapshot {
        match kind {
            FighterKind::Jet => &self.jet,
            FighterKind::Prop => &self.prop,
        }
    }
}

/// Configuration for one headless match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub jet_agent: String,
    /// None leaves the prop uncontrolled (it flies straight).
    pub prop_agent: Option<String>,
    pub max_ticks: u64,
    pub frame_interval: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            jet_agent: "noop".into(),
            prop_agent: None,
            max_ticks: crate::constants::DEFAULT_MAX_TICKS,
            frame_interval: crate::constants::DEFAULT_FRAME_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub status: MatchStatus,
    pub reason: Option<String>,
    pub final_tick: u64,
    pub elapsed_secs: f64,
    pub shots_fired: u32,
}

/// A recorded match: config, sampled frames, final result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replay {
    pub config: MatchConfig,
    pub frames: Vec<WorldSnapshot>,
    pub result: MatchResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turning_wire_format() {
        let json = serde_json::to_string(&Turning::CounterClockwise).unwrap();
        assert_eq!(json, "-1");
        let back: Turning = serde_json::from_str("1").unwrap();
        assert_eq!(back, Turning::Clockwise);
        assert!(serde_json::from_str::<Turning>("2").is_err());
    }

    #[test]
    fn test_command_wire_format() {
        let json = serde_json::to_string(&Command::FireAmmo).unwrap();
        assert_eq!(json, "\"fire_ammo\"");
    }

    #[test]
    fn test_stat_tables_sane() {
        for stats in [&JET_STATS, &PROP_STATS] {
            assert!(stats.min_speed < stats.top_speed);
            assert!(stats.start_speed >= stats.min_speed);
            assert!(stats.start_speed <= stats.top_speed);
            assert!(stats.start_ammo <= stats.max_ammo);
        }
        assert_eq!(PROP_STATS.max_ammo, 0);
    }

    #[test]
    fn test_opponent_is_involutive() {
        assert_eq!(FighterKind::Jet.opponent(), FighterKind::Prop);
        assert_eq!(FighterKind::Prop.opponent().opponent(), FighterKind::Prop);
    }
}
