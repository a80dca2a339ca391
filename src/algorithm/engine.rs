//! Execution contexts behind a common render interface
//!
//! [`InlineEngine`] renders on the caller's task. [`BackgroundEngine`] hands
//! self-contained requests to a pool of blocking workers and tags each one
//! with a generation so stale results never reach the caller.

use crate::algorithm::executor::BatchRenderer;
use crate::io::configuration::DEFAULT_WORKER_COUNT;
use crate::io::error::{PatternError, Result};
use crate::io::request::{RenderRequest, RenderedPattern};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, mpsc, oneshot};

/// Anything that turns a request into encoded outputs
pub trait PatternEngine {
    /// Render every size of `request`
    ///
    /// Both contexts produce identical outputs for identical requests.
    fn render(
        &self,
        request: RenderRequest,
    ) -> impl Future<Output = Result<RenderedPattern>> + Send;
}

fn worker_error(reason: impl ToString) -> PatternError {
    PatternError::Worker {
        reason: reason.to_string(),
    }
}

/// Renders on the calling task, keeping its caches between calls
#[derive(Debug, Default)]
pub struct InlineEngine {
    renderer: Mutex<BatchRenderer>,
}

impl InlineEngine {
    /// Create an engine with empty caches
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatternEngine for InlineEngine {
    async fn render(&self, request: RenderRequest) -> Result<RenderedPattern> {
        let mut renderer = self.renderer.lock().map_err(worker_error)?;
        renderer.render(&request)
    }
}

/// Outcome of one background job
struct Reply {
    id: u64,
    result: Result<RenderedPattern>,
}

struct Job {
    id: u64,
    request: RenderRequest,
    reply: oneshot::Sender<Reply>,
}

/// A request accepted by the background workers
#[derive(Debug)]
pub struct PendingRender {
    id: u64,
    generation: u64,
    response: oneshot::Receiver<Reply>,
}

impl PendingRender {
    /// Generation token assigned on submission
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply")
            .field("id", &self.id)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

/// Renders on a bounded pool of blocking workers
///
/// Requests are materialised before dispatch: file-backed images are read
/// into owned buffers, since workers cannot reach the caller's files. A file
/// that cannot be read is skipped and reported like it is inline.
#[derive(Debug)]
pub struct BackgroundEngine {
    jobs: mpsc::Sender<Job>,
    next_id: AtomicU64,
    generation: AtomicU64,
}

impl BackgroundEngine {
    /// Engine with the default number of workers
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Worker`] when called outside a tokio runtime
    pub fn new() -> Result<Self> {
        Self::with_workers(DEFAULT_WORKER_COUNT)
    }

    /// Engine rendering at most `workers` requests at once
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Worker`] when called outside a tokio runtime
    pub fn with_workers(workers: usize) -> Result<Self> {
        let handle = Handle::try_current().map_err(worker_error)?;
        let (jobs, queue) = mpsc::channel(workers.max(1) * 4);
        handle.spawn(dispatch(queue, workers.max(1)));

        log::debug!("Started background engine with {workers} workers");
        Ok(Self {
            jobs,
            next_id: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        })
    }

    /// Newest generation handed out so far
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Materialise `request` and queue it, superseding every earlier submission
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Worker`] if the workers are gone
    pub async fn submit(&self, request: RenderRequest) -> Result<PendingRender> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = request.materialize().await;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let (reply, response) = oneshot::channel();
        self.jobs
            .send(Job { id, request, reply })
            .await
            .map_err(worker_error)?;

        Ok(PendingRender {
            id,
            generation,
            response,
        })
    }

    /// Wait for a submitted request
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Superseded`] if a newer request was submitted in
    /// the meantime, [`PatternError::Worker`] if the worker vanished, or the
    /// render's own error
    pub async fn wait(&self, pending: PendingRender) -> Result<RenderedPattern> {
        let reply = pending.response.await.map_err(worker_error)?;
        if reply.id != pending.id {
            return Err(worker_error(format!(
                "reply for job {} delivered to job {}",
                reply.id, pending.id
            )));
        }

        let latest = self.latest_generation();
        if pending.generation < latest {
            log::debug!(
                "Discarding generation {} in favour of {latest}",
                pending.generation
            );
            return Err(PatternError::Superseded {
                generation: pending.generation,
            });
        }
        reply.result
    }
}

impl PatternEngine for BackgroundEngine {
    async fn render(&self, request: RenderRequest) -> Result<RenderedPattern> {
        let pending = self.submit(request).await?;
        self.wait(pending).await
    }
}

/// Feed queued jobs to at most `workers` blocking tasks
///
/// Renderers are pooled so their caches survive between jobs.
async fn dispatch(mut queue: mpsc::Receiver<Job>, workers: usize) {
    let permits = Arc::new(Semaphore::new(workers));
    let renderers: Arc<Mutex<Vec<BatchRenderer>>> = Arc::new(Mutex::new(Vec::new()));

    while let Some(job) = queue.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let renderers = Arc::clone(&renderers);

        tokio::task::spawn_blocking(move || {
            let mut renderer = renderers
                .lock()
                .ok()
                .and_then(|mut pool| pool.pop())
                .unwrap_or_default();
            let result = renderer.render(&job.request);
            if let Ok(mut pool) = renderers.lock() {
                pool.push(renderer);
            }

            if job.reply.send(Reply { id: job.id, result }).is_err() {
                log::debug!("Job {} finished after its caller left", job.id);
            }
            drop(permit);
        });
    }
}
