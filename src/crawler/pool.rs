//! Bounded pool of browser sessions
//!
//! The dispatcher owns the frontier, the idle sessions and the results. Each
//! spawned job takes one session by value and hands it back when done, so no
//! mutable state is shared between tasks and at most `max_workers` browsers
//! are ever open.

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::crawler::browser::{Session, SessionFactory};
use crate::crawler::error::CrawlError;
use crate::crawler::links::Frontier;

/// What a job produced for one item
#[derive(Debug)]
pub struct Step<I, O> {
    /// Records extracted from the item
    pub output: Vec<O>,

    /// Newly discovered items to schedule
    pub follow_up: Vec<I>,
}

impl<I, O> Step<I, O> {
    pub fn new(output: Vec<O>) -> Self {
        Self {
            output,
            follow_up: Vec::new(),
        }
    }

    pub fn with_follow_up(mut self, follow_up: Vec<I>) -> Self {
        self.follow_up = follow_up;
        self
    }
}

/// Outcome of draining a pool
#[derive(Debug)]
pub struct PoolReport<O> {
    /// Every output of every successful job, in the order items were discovered
    pub outputs: Vec<O>,

    /// Items that completed successfully
    pub succeeded: usize,

    /// Items that were skipped after a failure
    pub failed: usize,

    /// Browser sessions opened over the run
    pub sessions: usize,
}

/// Progress bar in the style used across all jobs
pub fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(len);
    bar.set_style(style);
    bar.set_message(message);
    bar
}

/// Runs a job over a growing set of items with bounded browser sessions
pub struct WorkerPool<F> {
    factory: F,
    max_workers: usize,
    max_items: usize,
    progress: ProgressBar,
}

impl<F: SessionFactory> WorkerPool<F> {
    pub fn new(factory: F, max_workers: usize) -> Self {
        Self {
            factory,
            max_workers: max_workers.max(1),
            max_items: 0,
            progress: ProgressBar::hidden(),
        }
    }

    /// Cap the number of items ever scheduled (0 for unlimited)
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Report progress on `progress`; its length grows as items are discovered
    pub fn progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run `job` for every seed and every follow-up it discovers
    ///
    /// A failing item is logged and skipped. Only failing to open a browser
    /// session aborts the run; every opened session is closed either way.
    pub async fn run<I, O, J, Fut>(
        &self,
        seeds: impl IntoIterator<Item = I>,
        job: J,
    ) -> Result<PoolReport<O>, CrawlError>
    where
        I: Display + Eq + Hash + Clone + Send + 'static,
        O: Send + 'static,
        J: Fn(F::Session, I) -> Fut,
        Fut: Future<Output = (F::Session, Result<Step<I, O>, CrawlError>)> + Send + 'static,
    {
        let mut frontier = Frontier::new(self.max_items);
        frontier.extend(seeds);
        self.progress.set_length(frontier.admitted() as u64);

        let mut idle: Vec<F::Session> = Vec::new();
        let mut tasks = JoinSet::new();
        let mut finished: Vec<(usize, Vec<O>)> = Vec::new();
        let mut dispatched = 0;
        let mut report = PoolReport {
            outputs: Vec::new(),
            succeeded: 0,
            failed: 0,
            sessions: 0,
        };

        loop {
            while tasks.len() < self.max_workers {
                let Some(item) = frontier.pop() else {
                    break;
                };
                let session = match idle.pop() {
                    Some(session) => session,
                    None => match self.factory.open().await {
                        Ok(session) => {
                            report.sessions += 1;
                            session
                        }
                        Err(e) => {
                            error!("Failed to open browser session: {}", e);
                            shutdown(tasks, idle).await;
                            self.progress.abandon();
                            return Err(e);
                        }
                    },
                };

                debug!("Dispatching {}", item);
                let seq = dispatched;
                dispatched += 1;
                let work = job(session, item.clone());
                tasks.spawn(async move {
                    let (session, result) = work.await;
                    (session, (seq, item), result)
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            match joined {
                Ok((session, (seq, item), result)) => {
                    idle.push(session);
                    match result {
                        Ok(step) => {
                            report.succeeded += 1;
                            finished.push((seq, step.output));
                            let added = frontier.extend(step.follow_up);
                            self.progress.inc_length(added as u64);
                        }
                        Err(e) => {
                            report.failed += 1;
                            warn!("Skipping {}: {}", item, e);
                        }
                    }
                }
                Err(e) => {
                    // The session went down with the task; dropping it kills the browser.
                    report.failed += 1;
                    warn!("Worker task failed: {}", e);
                }
            }
            self.progress.inc(1);
        }

        for session in idle {
            session.close().await;
        }
        self.progress.finish_and_clear();

        finished.sort_unstable_by_key(|(seq, _)| *seq);
        report.outputs = finished.into_iter().flat_map(|(_, output)| output).collect();

        info!(
            "Pool drained: {} succeeded, {} skipped, {} sessions",
            report.succeeded, report.failed, report.sessions
        );
        Ok(report)
    }
}

async fn shutdown<S, I, R>(mut tasks: JoinSet<(S, I, R)>, idle: Vec<S>)
where
    S: Session,
    I: Send + 'static,
    R: Send + 'static,
{
    while let Some(joined) = tasks.join_next().await {
        if let Ok((session, _, _)) = joined {
            session.close().await;
        }
    }
    for session in idle {
        session.close().await;
    }
}
