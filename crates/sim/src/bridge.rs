//! The decision-agent bridge: runs external decision logic on its own
//! cadence, feeding it immutable snapshots and queueing one command per
//! invocation for the engine to apply at the next tick boundary. The bridge
//! never touches live state, and nothing an agent does can take the engine
//! down: panics degrade to `Noop`, overruns skip ticks instead of queueing.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use aeroduel_shared::{Command, WorldSnapshot, TICK_MS};

use crate::agent::DecisionAgent;
use crate::engine::SnapshotCell;

/// Bounded handoff depth. The engine drains the queue every tick, so depth
/// only matters when the main loop itself stalls.
pub(crate) const COMMAND_QUEUE_DEPTH: usize = 8;

pub(crate) fn spawn(
    agent: Box<dyn DecisionAgent>,
    snapshots: SnapshotCell,
    commands: SyncSender<Command>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("decision-bridge".into())
        .spawn(move || run(agent, snapshots, commands, running))
        .expect("failed to spawn decision bridge thread")
}

fn run(
    mut agent: Box<dyn DecisionAgent>,
    snapshots: SnapshotCell,
    commands: SyncSender<Command>,
    running: Arc<AtomicBool>,
) {
    let tick = Duration::from_millis(TICK_MS);
    let mut seq: u64 = 0;
    info!(agent = agent.name(), "decision bridge started");
    thread::sleep(tick); // one-tick lead-in before the first invocation

    while running.load(Ordering::Acquire) {
        let started = Instant::now();
        let snapshot = snapshots.latest();
        let cmd = invoke(agent.as_mut(), seq, &snapshot);
        match commands.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!(seq, "command queue full; dropping command"),
            Err(TrySendError::Disconnected(_)) => break,
        }

        let elapsed = started.elapsed();
        if elapsed > tick {
            warn!(
                seq,
                elapsed_ms = elapsed.as_millis() as u64,
                "decision agent overran the tick interval; skipping ticks"
            );
        }
        seq = seq.saturating_add(whole_intervals(elapsed) + 1);
        thread::sleep(interval_remainder(elapsed));
    }
    info!("decision bridge stopped");
}

/// Invoke the external decision function, containing any panic.
fn invoke(agent: &mut dyn DecisionAgent, seq: u64, snap: &WorldSnapshot) -> Command {
    let result = catch_unwind(AssertUnwindSafe(|| {
        agent.decide(seq, &snap.jet, &snap.prop, &snap.obstacle, &snap.bullets)
    }));
    match result {
        Ok(cmd) => cmd,
        Err(_) => {
            warn!(seq, "decision agent panicked; substituting noop");
            Command::Noop
        }
    }
}

/// Whole tick intervals covered by `elapsed`. The sequence counter advances
/// by this plus one per invocation, so overruns skip ticks rather than
/// accumulating a backlog.
pub(crate) fn whole_intervals(elapsed: Duration) -> u64 {
    elapsed.as_micros() as u64 / (TICK_MS * 1000)
}

/// Time left until the next tick boundary; zero when the invocation consumed
/// the interval exactly.
pub(crate) fn interval_remainder(elapsed: Duration) -> Duration {
    let tick_us = TICK_MS * 1000;
    let rem = (tick_us - elapsed.as_micros() as u64 % tick_us) % tick_us;
    Duration::from_micros(rem)
}
