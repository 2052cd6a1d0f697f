//! Background persistence of the static snapshot.
//!
//! A single writer task owns the backing file. Mutations only bump a
//! generation counter on a `watch` channel, so bursts of updates coalesce and
//! the writer always serializes whatever snapshot is current when it wakes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use common::observability::PERSIST_FAILURES_TOTAL;
use models::Mock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub struct SnapshotWriter {
    notify: watch::Sender<u64>,
    task: JoinHandle<()>,
}

impl SnapshotWriter {
    /// Spawn the writer on the current runtime.
    pub fn spawn(path: PathBuf, snapshot: Arc<ArcSwap<Mock>>) -> Self {
        let (notify, mut rx) = watch::channel(0u64);
        let task = tokio::spawn(async move {
            // yields once more after the sender is dropped if a change is still unseen
            while rx.changed().await.is_ok() {
                let generation = *rx.borrow_and_update();
                let current = snapshot.load_full();
                match write_snapshot(&path, &current).await {
                    Ok(()) => debug!(
                        event = "snapshot_persisted",
                        path = %path.display(),
                        generation,
                        paths = current.len(),
                        "snapshot written"
                    ),
                    Err(e) => {
                        PERSIST_FAILURES_TOTAL.inc();
                        error!(
                            event = "snapshot_persist_failed",
                            path = %path.display(),
                            generation,
                            error = %e,
                            "failed to write snapshot; in-memory state stays authoritative"
                        );
                    }
                }
            }
            info!(event = "snapshot_writer_stopped", path = %path.display(), "snapshot writer stopped");
        });
        Self { notify, task }
    }

    /// Ask the writer to persist the current snapshot. Never blocks.
    pub fn schedule(&self) {
        self.notify.send_modify(|generation| *generation += 1);
    }

    /// Flush any pending write and stop the writer.
    pub async fn shutdown(self) {
        drop(self.notify);
        if let Err(e) = self.task.await {
            error!(event = "snapshot_writer_join_failed", error = %e, "snapshot writer task failed");
        }
    }
}

/// Pretty-print `mock` to a sibling temp file, then rename it over `path`.
pub async fn write_snapshot(path: &Path, mock: &Mock) -> anyhow::Result<()> {
    let data = serde_json::to_vec_pretty(mock)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, data).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
