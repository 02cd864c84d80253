//! The leaderboard load cycle: flush the queue, submit the current run, fetch, rank.

use std::{collections::HashSet, future::Future, sync::Arc};

use futures::future::{AbortHandle, Abortable, Aborted};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::game::{CompletedRun, scoring::format_clock};

use super::{
    SyncError, SyncResult,
    environment::SyncEnvironment,
    queue::{PendingScore, PendingScoreQueue},
    rank::{PlayerMatch, RankedEntry, annotate},
    transport::LeaderboardTransport,
};

/// User-facing banner explaining a degraded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Headline.
    pub message: &'static str,
    /// Follow-up hint.
    pub details: &'static str,
}

impl Notice {
    /// A request failed while the device reported connectivity.
    pub const CONNECTION_ISSUES: Notice = Notice {
        message: "Connection issues detected",
        details: "Using offline mode. Scores will sync when connection is restored.",
    };
    /// The device reported no connectivity before the cycle started.
    pub const OFFLINE: Notice = Notice {
        message: "You are currently offline",
        details: "Scores will be submitted when connection is restored",
    };
    /// A manual retry was requested while still offline.
    pub const STILL_OFFLINE: Notice = Notice {
        message: "Still offline",
        details: "Please check your internet connection",
    };
    /// The network worked but the local queue could not be read or saved.
    pub const STORAGE_ISSUES: Notice = Notice {
        message: "Saved scores could not be stored on this device",
        details: "Unsent scores may be lost if the page is reloaded.",
    };
}

/// The local player's own result, shown even when the leaderboard is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnResult {
    /// Player name.
    pub name: String,
    /// Player department.
    pub department: String,
    /// Seconds the run took.
    pub time_taken: u32,
    /// Locally computed score.
    pub score: u32,
}

impl OwnResult {
    /// Time taken rendered as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.time_taken)
    }
}

/// Outcome of a load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    /// Ranked rows; empty when the fetch failed.
    pub entries: Vec<RankedEntry>,
    /// Rank of the local player's run, when listed.
    pub player_rank: Option<u32>,
    /// Whether any network step failed or was skipped.
    pub offline: bool,
    /// Banner to display, if any.
    pub notice: Option<Notice>,
    /// Scores still waiting in the queue.
    pub pending: usize,
    /// The local player's result, if a run was completed on this device.
    pub own_result: Option<OwnResult>,
}

/// Aborts the cycle it was issued for when dropped or on [`CycleHandle::abort`].
#[derive(Debug)]
pub struct CycleHandle {
    handle: AbortHandle,
}

impl CycleHandle {
    /// Abort the cycle now.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the cycle was aborted.
    pub fn is_aborted(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Drop for CycleHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug)]
struct CurrentScore {
    run: CompletedRun,
    own: OwnResult,
    key: Option<u64>,
}

/// Drives leaderboard load cycles for one device.
///
/// Queue storage failures never end a cycle: the engine keeps working from its in-memory copy
/// and remembers every key the server acknowledged, so an entry whose removal could not be
/// persisted is dropped again instead of being re-sent.
pub struct LeaderboardSync {
    transport: Arc<dyn LeaderboardTransport>,
    environment: Arc<dyn SyncEnvironment>,
    current: Option<CurrentScore>,
    acked: HashSet<u64>,
    storage_trouble: bool,
}

impl LeaderboardSync {
    /// Create an engine with no completed run attached.
    pub fn new(
        transport: Arc<dyn LeaderboardTransport>,
        environment: Arc<dyn SyncEnvironment>,
    ) -> Self {
        Self {
            transport,
            environment,
            current: None,
            acked: HashSet::new(),
            storage_trouble: false,
        }
    }

    /// Attach the run just completed on this device; it is submitted by the next cycle.
    pub fn set_completed_run(&mut self, run: &CompletedRun) {
        self.current = Some(CurrentScore {
            run: run.clone(),
            own: OwnResult {
                name: run.profile.name.clone(),
                department: run.profile.department.clone(),
                time_taken: run.time_taken,
                score: run.score,
            },
            key: None,
        });
    }

    /// The attached run, if any.
    pub fn own_result(&self) -> Option<&OwnResult> {
        self.current.as_ref().map(|current| &current.own)
    }

    /// Start an abortable load cycle.
    ///
    /// The returned future resolves to [`SyncError::Cancelled`] once the handle is aborted or
    /// dropped. Entries acknowledged before the abort stay removed from the queue.
    pub fn start_cycle(
        &mut self,
    ) -> (
        impl Future<Output = SyncResult<LeaderboardView>> + Send + '_,
        CycleHandle,
    ) {
        let (handle, registration) = AbortHandle::new_pair();
        let cycle = Abortable::new(self.load(), registration);
        let cycle = async move {
            match cycle.await {
                Ok(view) => Ok(view),
                Err(Aborted) => {
                    debug!("leaderboard cycle aborted");
                    Err(SyncError::Cancelled)
                }
            }
        };
        (cycle, CycleHandle { handle })
    }

    /// Run one full load cycle.
    pub async fn load(&mut self) -> LeaderboardView {
        self.storage_trouble = false;
        let mut queue = self.load_queue().await;
        let now = now_millis();
        if let Some(current) = self.current.as_mut() {
            current.key.get_or_insert_with(|| queue.next_key(now));
        }

        if !self.environment.is_online() {
            info!(pending = queue.len(), "device offline; skipping network");
            self.enqueue_current(&mut queue).await;
            return self.view(Vec::new(), None, true, Some(Notice::OFFLINE), queue.len());
        }

        let mut offline = self.flush(&mut queue).await;
        offline |= self.submit_current(&mut queue).await;

        let (entries, player_rank) = match self.transport.fetch().await {
            Ok(records) => {
                debug!(count = records.len(), "leaderboard fetched");
                annotate(records, self.player_match())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch leaderboard");
                offline = true;
                (Vec::new(), None)
            }
        };

        let notice = if offline {
            Some(Notice::CONNECTION_ISSUES)
        } else {
            self.storage_trouble.then_some(Notice::STORAGE_ISSUES)
        };
        self.view(entries, player_rank, offline, notice, queue.len())
    }

    /// Manual retry: a full cycle, unless the device is still offline.
    pub async fn retry(&mut self) -> LeaderboardView {
        if self.environment.is_online() {
            return self.load().await;
        }

        let queue = self.load_queue().await;
        self.view(
            Vec::new(),
            None,
            true,
            Some(Notice::STILL_OFFLINE),
            queue.len(),
        )
    }

    /// Last-resort recovery: ask the host to reload the client.
    pub fn recover(&self) {
        warn!("requesting full client reload");
        self.environment.request_reload();
    }

    /// Read the persisted queue without entries already acknowledged by this engine.
    ///
    /// An unreadable queue is replaced by an empty one.
    async fn load_queue(&mut self) -> PendingScoreQueue {
        let mut queue = match self.environment.load_queue().await {
            Ok(queue) => queue,
            Err(err) => {
                warn!(error = %err, "pending queue unreadable; starting from an empty queue");
                self.storage_trouble = true;
                PendingScoreQueue::default()
            }
        };

        let stale: Vec<u64> = self
            .acked
            .iter()
            .copied()
            .filter(|key| queue.contains(*key))
            .collect();
        if !stale.is_empty() {
            for key in &stale {
                queue.remove(*key);
            }
            debug!(count = stale.len(), "dropping entries acknowledged earlier");
            self.persist(&queue).await;
        }
        queue
    }

    async fn persist(&mut self, queue: &PendingScoreQueue) {
        if let Err(err) = self.environment.store_queue(queue).await {
            warn!(error = %err, pending = queue.len(), "failed to persist pending queue");
            self.storage_trouble = true;
        }
    }

    /// Submit every queued entry once; returns whether the current run's entry failed again.
    async fn flush(&mut self, queue: &mut PendingScoreQueue) -> bool {
        let current_key = self.current_key();
        let mut current_failed = false;

        for entry in queue.entries().to_vec() {
            match self.transport.submit(entry.submission()).await {
                Ok(record) => {
                    self.acked.insert(entry.key);
                    queue.remove(entry.key);
                    info!(key = entry.key, id = %record.id, "pending score accepted");
                    self.persist(queue).await;
                }
                Err(err) => {
                    warn!(key = entry.key, error = %err, "pending score not accepted");
                    if current_key == Some(entry.key) {
                        current_failed = true;
                    }
                }
            }
        }

        current_failed
    }

    /// Submit the current run unless it was already accepted or is still queued.
    async fn submit_current(&mut self, queue: &mut PendingScoreQueue) -> bool {
        let Some((key, submission)) = self.unacked_current().and_then(|entry| {
            (!queue.contains(entry.key)).then(|| (entry.key, entry.submission()))
        }) else {
            return false;
        };

        match self.transport.submit(submission).await {
            Ok(record) => {
                self.acked.insert(key);
                info!(key, id = %record.id, score = record.score, "score submitted");
                false
            }
            Err(err) => {
                warn!(key, error = %err, "score submission failed; queueing for later");
                self.enqueue_current(queue).await;
                true
            }
        }
    }

    async fn enqueue_current(&mut self, queue: &mut PendingScoreQueue) {
        let Some(entry) = self.unacked_current() else {
            return;
        };

        let key = entry.key;
        if queue.push(entry) {
            info!(key, pending = queue.len(), "score queued");
            self.persist(queue).await;
        }
    }

    /// The current run as a queue entry, unless the server already acknowledged it.
    fn unacked_current(&self) -> Option<PendingScore> {
        let current = self.current.as_ref()?;
        let key = current.key?;
        (!self.acked.contains(&key)).then(|| PendingScore::from_run(key, &current.run))
    }

    fn current_key(&self) -> Option<u64> {
        self.current.as_ref().and_then(|current| current.key)
    }

    fn player_match(&self) -> Option<PlayerMatch<'_>> {
        self.current.as_ref().map(|current| PlayerMatch {
            name: &current.own.name,
            time_taken: current.own.time_taken,
        })
    }

    fn view(
        &self,
        entries: Vec<RankedEntry>,
        player_rank: Option<u32>,
        offline: bool,
        notice: Option<Notice>,
        pending: usize,
    ) -> LeaderboardView {
        LeaderboardView {
            entries,
            player_rank,
            offline,
            notice,
            pending,
            own_result: self.own_result().cloned(),
        }
    }
}

fn now_millis() -> u64 {
    u64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or_default()
}
