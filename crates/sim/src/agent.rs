//! The pluggable decision seam: external logic that issues one command per
//! invocation for an automated fighter.

use aeroduel_shared::{BulletSnapshot, Command, FighterSnapshot, ObstacleSnapshot};

/// External decision logic. Implementations are invoked on the bridge's
/// schedule (real-time) or once per tick (headless); `seq` is the tick
/// counter at invocation time and may skip values when an invocation overran
/// its interval. Implementations see immutable snapshot data only and must
/// return exactly one command. A panic is contained by the caller and
/// degrades to `Command::Noop`.
pub trait DecisionAgent: Send {
    fn name(&self) -> &str;

    fn decide(
        &mut self,
        seq: u64,
        own: &FighterSnapshot,
        opponent: &FighterSnapshot,
        obstacle: &ObstacleSnapshot,
        bullets: &[BulletSnapshot],
    ) -> Command;
}

/// Agent that does nothing - useful for testing.
pub struct NoopAgent;

impl DecisionAgent for NoopAgent {
    fn name(&self) -> &str {
        "noop"
    }

    fn decide(
        &mut self,
        _seq: u64,
        _own: &FighterSnapshot,
        _opponent: &FighterSnapshot,
        _obstacle: &ObstacleSnapshot,
        _bullets: &[BulletSnapshot],
    ) -> Command {
        Command::Noop
    }
}
