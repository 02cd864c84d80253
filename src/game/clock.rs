//! Async driver that ticks a shared [`GameRun`] once per period.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, mpsc},
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

use super::run::{GameRun, RunEvent};

/// Tick period of the session clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick `run` every `period` until it completes or expires, forwarding tick events.
///
/// Late ticks are delayed rather than bunched so a stalled runtime never burns several seconds
/// of session time at once. Closing the receiving side of `events` does not stop the clock.
pub async fn drive(
    run: Arc<Mutex<GameRun>>,
    period: Duration,
    events: mpsc::UnboundedSender<RunEvent>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let mut guard = run.lock().await;
        for event in guard.tick() {
            let _ = events.send(event);
        }
        if guard.is_over() {
            debug!(remaining = guard.remaining(), "session clock stopped");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        run::{Advance, PlayerProfile},
        stage::{Stage, default_catalog},
    };

    fn started() -> Arc<Mutex<GameRun>> {
        let mut run = GameRun::new(default_catalog());
        run.start(PlayerProfile::new("Ada", "CS").unwrap()).unwrap();
        Arc::new(Mutex::new(run))
    }

    #[tokio::test(start_paused = true)]
    async fn drives_session_to_expiry() {
        let run = started();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut snapshots = run.lock().await.subscribe();

        drive(run.clone(), TICK_PERIOD, tx).await;

        assert_eq!(run.lock().await.remaining(), 0);
        assert_eq!(rx.recv().await, Some(RunEvent::SessionExpired));
        assert!(snapshots.has_changed().unwrap());
        assert!(snapshots.borrow_and_update().expired());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_once_run_completes() {
        let run = started();
        let (tx, _rx) = mpsc::unbounded_channel();
        let clock = tokio::spawn(drive(run.clone(), TICK_PERIOD, tx));

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        {
            let mut guard = run.lock().await;
            let mut completed = None;
            while completed.is_none() {
                let answers: &[&str] = match guard.stage() {
                    Stage::Game => &["1"],
                    Stage::Emoji => &["run", "on", "web"],
                    Stage::Inspect | Stage::Ascii => &["2"],
                    Stage::Caesar => &["zero"],
                    Stage::Extension => &["5"],
                    _ => &["webverse"],
                };
                guard.submit(answers);
                if let Advance::Completed(done) = guard.advance().unwrap() {
                    completed = Some(done);
                }
            }
            assert_eq!(completed.unwrap().time_taken, 3);
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(clock.is_finished());
        assert_eq!(run.lock().await.remaining(), 597);
    }
}
