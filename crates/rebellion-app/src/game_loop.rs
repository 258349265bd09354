//! Game loop thread: steps the simulation at the nominal tick rate and
//! publishes render views.
//!
//! The engine moves into the thread and comes back out through the join
//! handle when the loop stops. Commands arrive over an `mpsc` channel.
//! Real-time pacing feeds wall-clock frame times through a [`FrameClock`]
//! so the simulation always advances in whole `DT` steps.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};

use rebellion_core::constants::{DT, TICK_RATE};
use rebellion_core::enums::RunStatus;
use rebellion_core::input::InputIntent;
use rebellion_core::state::{SaveSnapshot, WorldView};
use rebellion_sim::SimulationEngine;

use crate::pilot::Pilot;
use crate::state::{GameLoopCommand, RunSummary, SharedView};

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Most steps taken to catch up on one wall-clock frame.
const MAX_CATCH_UP_STEPS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep between ticks to match the wall clock.
    RealTime,
    /// Step as fast as possible, one tick per iteration.
    Unpaced,
}

/// Turns variable wall-clock frame times into whole fixed steps.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f64,
}

impl FrameClock {
    /// Number of `DT` steps owed after `elapsed_secs` of wall time.
    pub fn steps(&mut self, elapsed_secs: f64) -> u32 {
        if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            self.accumulator += elapsed_secs;
        }
        let mut steps = 0;
        while self.accumulator >= DT && steps < MAX_CATCH_UP_STEPS {
            self.accumulator -= DT;
            steps += 1;
        }
        if self.accumulator >= DT {
            log::debug!("dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }
}

pub struct LoopOptions {
    pub pacing: Pacing,
    /// Stop after this many steps.
    pub max_frames: Option<u64>,
    /// Flies the ship when set; otherwise `Input` commands do.
    pub pilot: Option<Box<dyn Pilot + Send>>,
}

/// Handle to a running game loop thread.
pub struct LoopHandle {
    commands: mpsc::Sender<GameLoopCommand>,
    latest_view: SharedView,
    thread: JoinHandle<(SimulationEngine, RunSummary)>,
}

impl LoopHandle {
    pub fn send(&self, command: GameLoopCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("game loop has stopped"))
    }

    /// Most recent view published by the loop.
    pub fn latest_view(&self) -> Option<WorldView> {
        self.latest_view.lock().ok().and_then(|view| view.clone())
    }

    /// Ask the loop for a save snapshot and wait for the reply.
    pub fn request_save(&self) -> Result<SaveSnapshot> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(GameLoopCommand::Save(reply_tx))?;
        reply_rx
            .recv()
            .context("game loop stopped before answering the save request")
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to stop on its own (frame limit or run over).
    pub fn wait(self) -> Result<(SimulationEngine, RunSummary)> {
        let Self {
            commands, thread, ..
        } = self;
        let outcome = thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"));
        drop(commands);
        outcome
    }

    /// Stop the loop now.
    pub fn shutdown(self) -> Result<(SimulationEngine, RunSummary)> {
        let _ = self.commands.send(GameLoopCommand::Shutdown);
        self.wait()
    }
}

/// Move `engine` into a new game loop thread.
pub fn spawn_game_loop(engine: SimulationEngine, options: LoopOptions) -> Result<LoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_view: SharedView = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_view);

    let thread = std::thread::Builder::new()
        .name("rebellion-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &shared, options))
        .context("failed to spawn game loop thread")?;

    Ok(LoopHandle {
        commands: cmd_tx,
        latest_view,
        thread,
    })
}

/// The game loop. Runs until Shutdown, channel disconnect, the frame limit,
/// or the end of the run.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_view: &Mutex<Option<WorldView>>,
    mut options: LoopOptions,
) -> (SimulationEngine, RunSummary) {
    let mut held = InputIntent::default();
    let mut clock = FrameClock::default();
    let mut view = engine.view();
    let mut frames = 0u64;
    let mut last_frame = Instant::now();
    let mut next_tick_time = Instant::now();
    let max_frames = options.max_frames;
    let limit_reached = |frames: u64| max_frames.is_some_and(|max| frames >= max);

    log::info!(
        "game loop started ({:?}, pilot: {})",
        options.pacing,
        options.pilot.as_ref().map_or("none", |pilot| pilot.id())
    );

    'run: loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(intent)) => held = intent,
                Ok(GameLoopCommand::Purchase(upgrade)) => {
                    match engine.purchase_upgrade(upgrade) {
                        Ok(cost) => log::debug!("{upgrade:?} bought for {cost}"),
                        Err(err) => log::warn!("{upgrade:?} refused: {err}"),
                    }
                }
                Ok(GameLoopCommand::Save(reply)) => {
                    let _ = reply.send(engine.save_snapshot());
                }
                Ok(GameLoopCommand::Load(snapshot)) => {
                    engine.apply_snapshot(&snapshot);
                    view = engine.view();
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    break 'run;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Steps owed this iteration
        let steps = match options.pacing {
            Pacing::Unpaced => 1,
            Pacing::RealTime => {
                let now = Instant::now();
                let steps = clock.steps((now - last_frame).as_secs_f64());
                last_frame = now;
                steps
            }
        };

        // 3. Advance
        for _ in 0..steps {
            if limit_reached(frames) || engine.status() != RunStatus::Active {
                break;
            }
            let intent = match options.pilot.as_mut() {
                Some(pilot) => pilot.next_intent(&view),
                None => held,
            };
            let result = engine.step(DT, intent);
            frames += 1;
            view = engine.view();
            if result.run_ended {
                log::info!("player destroyed at frame {frames}");
            }
            if result.campaign_complete {
                log::info!("campaign complete at frame {frames}");
            }
        }

        // 4. Publish the latest view
        if let Ok(mut lock) = latest_view.lock() {
            *lock = Some(view.clone());
        }

        if limit_reached(frames) || engine.status() != RunStatus::Active {
            break;
        }

        // 5. Sleep until the next tick
        if options.pacing == Pacing::RealTime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind, reset rather than spiral
                next_tick_time = now;
            }
        }
    }

    let summary = RunSummary::from_engine(&engine, frames);
    log::info!(
        "game loop stopped after {} frames: {:?}, score {}",
        summary.frames,
        summary.status,
        summary.score
    );
    (engine, summary)
}
