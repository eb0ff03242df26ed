//! Storage worker thread.
//!
//! # Responsibility
//! - Own the key-value backend on one dedicated thread.
//! - Accept fire-and-forget writes so mutations never wait on disk.
//! - Serve reads and flush barriers in submission order.
//!
//! # Invariants
//! - Commands run strictly FIFO: the last submitted write for a key is the
//!   durable one, and a read observes every write submitted before it.
//! - A failed write is logged and counted, never retried.
//! - One `put_many` batch reaches the backend as one atomic `set_many`.
//! - Shutdown drains every command queued before it.

use super::{KeyValueStore, StorageError, StorageResult};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "habitdeck-storage";

/// Per-key write outcome counters accumulated between two flushes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: u64,
    pub failed: u64,
}

enum Command {
    Get {
        key: String,
        reply: Sender<StorageResult<Option<String>>>,
    },
    Write {
        entries: Vec<(String, String)>,
    },
    Flush {
        reply: Sender<WriteReport>,
    },
    Shutdown,
}

/// Owner of the storage thread. Dropping it drains and joins the thread.
pub struct StorageWorker {
    handle: StorageHandle,
    thread: Option<JoinHandle<()>>,
}

impl StorageWorker {
    /// Moves `store` onto a new storage thread.
    ///
    /// # Errors
    /// - Returns `Backend` when the OS refuses to spawn the thread.
    pub fn spawn<S>(store: S) -> StorageResult<Self>
    where
        S: KeyValueStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(store, rx))
            .map_err(|err| StorageError::Backend(format!("failed to spawn worker: {err}")))?;

        info!("event=storage_worker module=storage status=ok action=spawn");
        Ok(Self {
            handle: StorageHandle { tx },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> StorageHandle {
        self.handle.clone()
    }

    /// Drains queued commands and joins the thread.
    ///
    /// Returns the write counters accumulated since the last flush.
    pub fn shutdown(mut self) -> WriteReport {
        let report = self.handle.flush().unwrap_or_default();
        self.stop();
        report
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.handle.tx.send(Command::Shutdown);
        if thread.join().is_err() {
            error!("event=storage_worker module=storage status=error action=join error=panicked");
        } else {
            info!("event=storage_worker module=storage status=ok action=shutdown");
        }
    }
}

impl Drop for StorageWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cheap, cloneable sender side of the storage worker.
#[derive(Clone)]
pub struct StorageHandle {
    tx: Sender<Command>,
}

impl StorageHandle {
    /// Reads `key`, waiting for every previously queued command first.
    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let (reply, response) = mpsc::channel();
        self.send(Command::Get {
            key: key.to_string(),
            reply,
        })?;
        response
            .recv()
            .map_err(|_| StorageError::WorkerUnavailable)?
    }

    /// Queues a write and returns immediately.
    ///
    /// Only reports failure to enqueue; backend failures surface in the
    /// next `WriteReport`.
    pub fn put(&self, key: &str, value: String) -> StorageResult<()> {
        self.put_many(vec![(key.to_string(), value)])
    }

    /// Queues entries that must land together, in one backend transaction.
    pub fn put_many(&self, entries: Vec<(String, String)>) -> StorageResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.send(Command::Write { entries })
    }

    /// Waits until every queued write settled and returns their counters.
    pub fn flush(&self) -> StorageResult<WriteReport> {
        let (reply, response) = mpsc::channel();
        self.send(Command::Flush { reply })?;
        response.recv().map_err(|_| StorageError::WorkerUnavailable)
    }

    fn send(&self, command: Command) -> StorageResult<()> {
        self.tx
            .send(command)
            .map_err(|_| StorageError::WorkerUnavailable)
    }
}

fn run<S: KeyValueStore>(mut store: S, rx: Receiver<Command>) {
    let mut report = WriteReport::default();

    while let Ok(command) = rx.recv() {
        match command {
            Command::Get { key, reply } => {
                let result = store.get(&key);
                if let Err(err) = &result {
                    warn!("event=kv_read module=storage status=error key={key} error={err}");
                }
                let _ = reply.send(result);
            }
            Command::Write { entries } => {
                let batch = entries
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect::<Vec<_>>();
                let keys = entries
                    .iter()
                    .map(|(key, _)| key.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                let count = entries.len() as u64;
                match store.set_many(&batch) {
                    Ok(()) => {
                        report.written += count;
                        debug!(
                            "event=kv_write module=storage status=ok keys={keys} bytes={}",
                            entries.iter().map(|(_, value)| value.len()).sum::<usize>()
                        );
                    }
                    Err(err) => {
                        report.failed += count;
                        error!("event=kv_write module=storage status=error keys={keys} error={err}");
                    }
                }
            }
            Command::Flush { reply } => {
                let _ = reply.send(std::mem::take(&mut report));
            }
            Command::Shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StorageWorker, WriteReport};
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn reads_observe_earlier_writes_in_order() {
        let store = MemoryKeyValueStore::new();
        let worker = StorageWorker::spawn(store.clone()).unwrap();
        let handle = worker.handle();

        handle.put("k", "first".to_string()).unwrap();
        handle.put("k", "second".to_string()).unwrap();
        assert_eq!(handle.get("k").unwrap().as_deref(), Some("second"));

        let report = handle.flush().unwrap();
        assert_eq!(
            report,
            WriteReport {
                written: 2,
                failed: 0
            }
        );
        assert_eq!(handle.flush().unwrap(), WriteReport::default());

        drop(worker);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn put_many_lands_together_and_counts_each_key() {
        let store = MemoryKeyValueStore::new();
        let worker = StorageWorker::spawn(store.clone()).unwrap();
        let handle = worker.handle();

        handle
            .put_many(vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
            .unwrap();
        handle.put_many(Vec::new()).unwrap();

        assert_eq!(
            handle.flush().unwrap(),
            WriteReport {
                written: 2,
                failed: 0
            }
        );
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn handle_reports_unavailable_after_shutdown() {
        let worker = StorageWorker::spawn(MemoryKeyValueStore::new()).unwrap();
        let handle = worker.handle();
        worker.shutdown();
        assert!(handle.put("k", "v".to_string()).is_err());
        assert!(handle.get("k").is_err());
    }
}
