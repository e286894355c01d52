//! Cancellable periodic message sources
//!
//! A source owns at most one running timer task. Restarting cancels the old
//! task before spawning the new one and bumps a generation counter that is
//! stamped on every message, so a message the old task managed to queue before
//! it was canceled can be recognised and dropped by the receiver.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Running {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct PeriodicSource {
    period: Duration,
    generation: u64,
    running: Option<Running>,
}

impl PeriodicSource {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            running: None,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Whether a message stamped with `generation` came from the live task.
    pub fn is_current(&self, generation: u64) -> bool {
        self.running.is_some() && generation == self.generation
    }

    /// Replace the running task. The first message arrives one full period from now.
    pub fn restart<M, F>(&mut self, sender: mpsc::Sender<M>, make_message: F)
    where
        M: Send + 'static,
        F: Fn(u64) -> M + Send + 'static,
    {
        self.stop();
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        if sender.send(make_message(generation)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        self.running = Some(Running { token, handle });
    }

    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
            running.handle.abort();
        }
    }
}

impl Drop for PeriodicSource {
    fn drop(&mut self) {
        self.stop();
    }
}
