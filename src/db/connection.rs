use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::migrations::run_migrations;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

type Task = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum Job {
    Run(Task),
    Stop,
}

/// Joins the store thread when the last `Database` handle goes away.
struct Worker {
    jobs: mpsc::Sender<Job>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Worker {
    fn drop(&mut self) {
        let handle = match self.thread.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handle) = handle else {
            return;
        };

        if self.jobs.send(Job::Stop).is_err() {
            log_error!("nudge state thread already gone at shutdown");
        }
        if let Err(panic) = handle.join() {
            log_error!("nudge state thread panicked: {panic:?}");
        }
    }
}

/// Handle to the nudge state store. One thread owns the SQLite connection and runs
/// tasks in submission order, which makes every write single-writer.
#[derive(Clone)]
pub struct Database {
    worker: Arc<Worker>,
    path: Arc<PathBuf>,
}

impl Database {
    /// Open or create the store at `path` and bring its schema up to date.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let thread_path = path.clone();

        let thread = thread::Builder::new()
            .name("focusnudge-db".into())
            .spawn(move || match open_connection(&thread_path) {
                Ok(conn) => {
                    if ready_tx.send(Ok(())).is_ok() {
                        serve(conn, jobs_rx);
                    }
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                }
            })
            .context("failed to spawn nudge state thread")?;

        ready_rx
            .recv()
            .context("nudge state thread exited during startup")??;

        log_info!("nudge state store open at {}", path.display());

        Ok(Self {
            worker: Arc::new(Worker {
                jobs: jobs_tx,
                thread: Mutex::new(Some(thread)),
            }),
            path: Arc::new(path),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Run `task` on the store thread and wait for its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = Job::Run(Box::new(move |conn| {
            // The caller may have been cancelled; nothing to do then.
            let _ = reply_tx.send(task(conn));
        }));

        self.worker
            .jobs
            .send(job)
            .map_err(|_| anyhow!("nudge state thread is not running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("nudge state thread dropped the task"))?
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    // Not every filesystem supports WAL; the store still works without it.
    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
        log_error!("WAL journaling unavailable for {}: {err}", path.display());
    }
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign keys")?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

fn serve(mut conn: Connection, jobs: mpsc::Receiver<Job>) {
    while let Ok(job) = jobs.recv() {
        match job {
            Job::Run(task) => task(&mut conn),
            Job::Stop => break,
        }
    }
    log_info!("nudge state thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tasks_run_on_the_worker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(dir.path().join("nested/state.sqlite3")).expect("open db");
        assert!(db.path().ends_with("nested/state.sqlite3"));

        let version: i32 = db
            .execute(|conn| {
                Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
            })
            .await
            .expect("query");
        assert_eq!(version, 1);

        let failed = db
            .execute(|_conn| -> Result<()> { Err(anyhow!("boom")) })
            .await;
        assert!(failed.is_err());
    }

    #[tokio::test]
    async fn clones_share_one_connection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(dir.path().join("state.sqlite3")).expect("open db");
        let clone = db.clone();

        clone
            .execute(|conn| {
                conn.execute_batch("CREATE TEMP TABLE scratch (value INTEGER)")?;
                Ok(())
            })
            .await
            .expect("create");
        drop(clone);

        // Temp tables live on one connection, so the original handle still sees it.
        let count: i64 = db
            .execute(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM scratch", [], |r| r.get(0))?))
            .await
            .expect("count");
        assert_eq!(count, 0);
    }
}
