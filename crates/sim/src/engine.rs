//! The real-time engine: one cooperative main loop owning the world,
//! advancing at a fixed nominal tick and pacing itself with wall-clock
//! sleeps. A registered decision agent runs on the separate bridge thread;
//! its commands and keyboard commands both land in bounded queues that the
//! main loop drains at the start of each tick. Nothing else ever mutates
//! `WorldState`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use aeroduel_shared::{Command, FighterKind, WorldSnapshot, TICK_MS};

use crate::agent::DecisionAgent;
use crate::world::WorldState;
use crate::{bridge, command, match_loop};

const HUMAN_QUEUE_DEPTH: usize = 32;
/// Bounded wait for the bridge to finish an in-flight external call at
/// shutdown; after this the thread is detached with a warning.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);
/// Ticks the loop keeps publishing snapshots after the outcome latches, so
/// the presentation layer can play out the ending.
const LINGER_TICKS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// A decision agent flies the jet; the keyboard flies the prop.
    SingleAgent,
    /// Both fighters are keyboard-controlled.
    TwoPlayer,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a decision agent is already registered")]
    AgentAlreadyRegistered,
    #[error("decision agents require single-agent mode")]
    AgentNeedsSingleAgentMode,
    #[error("the decision bridge already ran for this engine")]
    BridgeAlreadyRan,
}

/// Shared cell holding the most recent published snapshot. Readers clone an
/// `Arc` under a brief lock; neither side ever blocks for long.
#[derive(Clone)]
pub struct SnapshotCell {
    inner: Arc<Mutex<Arc<WorldSnapshot>>>,
}

impl SnapshotCell {
    fn new(initial: WorldSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Arc::new(initial))),
        }
    }

    pub fn latest(&self) -> Arc<WorldSnapshot> {
        self.inner.lock().expect("snapshot lock poisoned").clone()
    }

    fn publish(&self, snapshot: WorldSnapshot) {
        *self.inner.lock().expect("snapshot lock poisoned") = Arc::new(snapshot);
    }
}

/// Signals the engine (and through it the bridge) to stop after the current
/// tick. Cloneable across threads.
#[derive(Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keyboard boundary: frontends push discrete key commands here; the engine
/// applies them with the human channel's toggle semantics at the next tick.
#[derive(Clone)]
pub struct HumanInput {
    tx: SyncSender<(FighterKind, Command)>,
}

impl HumanInput {
    pub fn press(&self, kind: FighterKind, cmd: Command) {
        // Bounded and lossy under pressure, like a real keyboard buffer.
        let _ = self.tx.try_send((kind, cmd));
    }
}

pub struct Engine {
    world: WorldState,
    mode: ControlMode,
    agent: Option<Box<dyn DecisionAgent>>,
    bridge_started: bool,
    snapshots: SnapshotCell,
    running: Arc<AtomicBool>,
    human_tx: SyncSender<(FighterKind, Command)>,
    human_rx: Receiver<(FighterKind, Command)>,
}

impl Engine {
    pub fn new(mode: ControlMode) -> Self {
        let world = WorldState::new();
        let snapshots = SnapshotCell::new(world.snapshot());
        let (human_tx, human_rx) = mpsc::sync_channel(HUMAN_QUEUE_DEPTH);
        Self {
            world,
            mode,
            agent: None,
            bridge_started: false,
            snapshots,
            running: Arc::new(AtomicBool::new(false)),
            human_tx,
            human_rx,
        }
    }

    /// Register the external decision agent for the jet. At most one agent
    /// (and one bridge run) per engine lifetime, single-agent mode only.
    pub fn register_agent(&mut self, agent: Box<dyn DecisionAgent>) -> Result<(), EngineError> {
        if self.mode != ControlMode::SingleAgent {
            return Err(EngineError::AgentNeedsSingleAgentMode);
        }
        if self.bridge_started {
            return Err(EngineError::BridgeAlreadyRan);
        }
        if self.agent.is_some() {
            return Err(EngineError::AgentAlreadyRegistered);
        }
        self.agent = Some(agent);
        Ok(())
    }

    pub fn snapshots(&self) -> SnapshotCell {
        self.snapshots.clone()
    }

    pub fn human_input(&self) -> HumanInput {
        HumanInput {
            tx: self.human_tx.clone(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.running.clone())
    }

    /// Run in real time until the outcome latches (plus a short linger for
    /// the presentation layer), the optional tick cap is reached, or the
    /// stop handle fires. Returns the final snapshot.
    pub fn run(&mut self, max_ticks: Option<u64>) -> WorldSnapshot {
        self.running.store(true, Ordering::Release);

        let (bridge_handle, agent_rx) = match self.agent.take() {
            Some(agent) => {
                self.bridge_started = true;
                let (tx, rx) = mpsc::sync_channel(bridge::COMMAND_QUEUE_DEPTH);
                let handle = bridge::spawn(agent, self.snapshots.clone(), tx, self.running.clone());
                (Some(handle), Some(rx))
            }
            None => (None, None),
        };

        let tick = Duration::from_millis(TICK_MS);
        self.snapshots.publish(self.world.snapshot());
        let mut linger = LINGER_TICKS;

        while self.running.load(Ordering::Acquire) {
            let started = Instant::now();

            self.drain_commands(agent_rx.as_ref());
            match_loop::step_tick(&mut self.world);
            self.snapshots.publish(self.world.snapshot());
            self.world.impacts.clear();

            if self.world.is_terminal() {
                if linger == LINGER_TICKS {
                    info!(
                        reason = self.world.outcome.reason().unwrap_or_default(),
                        tick = self.world.tick,
                        "match ended"
                    );
                }
                linger -= 1;
                if linger == 0 {
                    break;
                }
            } else if max_ticks.is_some_and(|cap| self.world.tick >= cap) {
                break;
            }

            let elapsed = started.elapsed();
            if elapsed < tick {
                thread::sleep(tick - elapsed);
            }
        }

        self.running.store(false, Ordering::Release);
        if let Some(handle) = bridge_handle {
            join_with_grace(handle);
        }
        self.snapshots.latest().as_ref().clone()
    }

    /// Apply everything queued since the last tick boundary. Agent commands
    /// always target the jet; human jet commands are ignored while an agent
    /// owns it (single-agent mode).
    fn drain_commands(&mut self, agent_rx: Option<&Receiver<Command>>) {
        if let Some(rx) = agent_rx {
            while let Ok(cmd) = rx.try_recv() {
                command::apply_agent(&mut self.world, FighterKind::Jet, cmd);
            }
        }
        while let Ok((kind, cmd)) = self.human_rx.try_recv() {
            if kind == FighterKind::Jet && self.mode == ControlMode::SingleAgent {
                continue;
            }
            command::apply_human(&mut self.world, kind, cmd);
        }
    }
}

fn join_with_grace(handle: thread::JoinHandle<()>) {
    let deadline = Instant::now() + SHUTDOWN_GRACE;
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    if handle.is_finished() {
        let _ = handle.join();
    } else {
        warn!("decision bridge still inside an external call at shutdown; detaching");
    }
}
