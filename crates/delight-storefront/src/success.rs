//! Post-purchase success overlay.
//!
//! A visible/hidden state machine with a one-second countdown from 10
//! that auto-dismisses at zero, plus a decorative confetti scheduler.
//! The two run on separate timers on purpose: dismissing the overlay
//! cancels only the countdown, while the confetti always plays out
//! its full ten-second window.

use rand::Rng;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

/// Seconds the overlay stays up without interaction.
pub const COUNTDOWN_START: u32 = 10;
/// How long the confetti effect runs once started.
pub const CONFETTI_WINDOW: Duration = Duration::from_secs(10);

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
const CONFETTI_INTERVAL: Duration = Duration::from_millis(250);
const CONFETTI_INITIAL_PARTICLES: f64 = 50.0;
const CONFETTI_CHANNEL_CAPACITY: usize = 256;

/// Visibility of the success overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessFlowState {
    /// Overlay not shown.
    Hidden,
    /// Overlay shown with the remaining seconds.
    Visible {
        /// Seconds until auto-dismiss.
        countdown: u32,
    },
}

/// One decorative particle burst. Origins are in viewport fractions,
/// matching the widget convention (0.0 left/top, 1.0 right/bottom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiBurst {
    /// Horizontal origin, jittered near the left or right edge.
    pub origin_x: f64,
    /// Vertical origin, jittered around the top.
    pub origin_y: f64,
    /// Particle count, decaying linearly over the window.
    pub particle_count: u32,
}

/// Drives the success overlay and the confetti effect.
pub struct SuccessFlowController {
    state: watch::Sender<SuccessFlowState>,
    confetti: broadcast::Sender<ConfettiBurst>,
    countdown_task: Mutex<Option<JoinHandle<()>>>,
    confetti_task: Mutex<Option<JoinHandle<()>>>,
}

impl SuccessFlowController {
    /// Create a controller in the hidden state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SuccessFlowState::Hidden);
        let (confetti, _) = broadcast::channel(CONFETTI_CHANNEL_CAPACITY);
        Self {
            state,
            confetti,
            countdown_task: Mutex::new(None),
            confetti_task: Mutex::new(None),
        }
    }

    /// Current overlay state.
    pub fn state(&self) -> SuccessFlowState {
        *self.state.borrow()
    }

    /// Whether the overlay is currently visible.
    pub fn is_visible(&self) -> bool {
        matches!(self.state(), SuccessFlowState::Visible { .. })
    }

    /// Observe overlay state changes.
    pub fn subscribe(&self) -> watch::Receiver<SuccessFlowState> {
        self.state.subscribe()
    }

    /// Observe confetti bursts. Subscribe before [`start`](Self::start)
    /// to see the whole effect.
    pub fn subscribe_confetti(&self) -> broadcast::Receiver<ConfettiBurst> {
        self.confetti.subscribe()
    }

    /// Show the overlay with a fresh countdown and start the confetti
    /// window. A second start supersedes any run still in progress.
    pub fn start(&self) {
        self.replace_countdown_task(None);
        self.replace_confetti_task(None);

        self.state.send_replace(SuccessFlowState::Visible {
            countdown: COUNTDOWN_START,
        });

        let state = self.state.clone();
        let countdown = tokio::spawn(async move {
            let mut tick = time::interval(COUNTDOWN_TICK);
            tick.tick().await; // first tick is immediate
            loop {
                tick.tick().await;
                let mut done = false;
                state.send_modify(|s| match *s {
                    SuccessFlowState::Visible { countdown } if countdown > 1 => {
                        *s = SuccessFlowState::Visible {
                            countdown: countdown - 1,
                        };
                    }
                    _ => {
                        *s = SuccessFlowState::Hidden;
                        done = true;
                    }
                });
                if done {
                    break;
                }
            }
        });
        self.replace_countdown_task(Some(countdown));

        let bursts = self.confetti.clone();
        let confetti = tokio::spawn(async move {
            let started = Instant::now();
            let mut tick = time::interval(CONFETTI_INTERVAL);
            tick.tick().await;
            loop {
                tick.tick().await;
                let elapsed = started.elapsed();
                if elapsed >= CONFETTI_WINDOW {
                    break;
                }
                let remaining =
                    (CONFETTI_WINDOW - elapsed).as_secs_f64() / CONFETTI_WINDOW.as_secs_f64();
                let particle_count = (CONFETTI_INITIAL_PARTICLES * remaining).round() as u32;

                let mut rng = rand::thread_rng();
                let origin_y = rng.gen::<f64>() - 0.2;
                for origin_x in [rng.gen_range(0.1..0.3), rng.gen_range(0.7..0.9)] {
                    // Dropped unless someone is rendering, which is fine.
                    let _ = bursts.send(ConfettiBurst {
                        origin_x,
                        origin_y,
                        particle_count,
                    });
                }
            }
            debug!("confetti window elapsed");
        });
        self.replace_confetti_task(Some(confetti));
    }

    /// Hide the overlay immediately. Cancels the countdown but not
    /// the confetti, which finishes its window on its own.
    pub fn dismiss(&self) {
        self.replace_countdown_task(None);
        self.state.send_replace(SuccessFlowState::Hidden);
    }

    fn replace_countdown_task(&self, task: Option<JoinHandle<()>>) {
        let mut guard = self
            .countdown_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = guard.take() {
            old.abort();
        }
        *guard = task;
    }

    fn replace_confetti_task(&self, task: Option<JoinHandle<()>>) {
        let mut guard = self
            .confetti_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = guard.take() {
            old.abort();
        }
        *guard = task;
    }
}

impl Default for SuccessFlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SuccessFlowController {
    fn drop(&mut self) {
        // Teardown must not leak timers.
        self.replace_countdown_task(None);
        self.replace_confetti_task(None);
    }
}
