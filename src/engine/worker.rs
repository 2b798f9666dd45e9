// src/engine/worker.rs
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

/// The unit of work a task runs.
///
/// `P` is the argument tuple the worker is called with and `R` the value it
/// produces. Implement this for worker types that carry their own state
/// (clients, connection handles); plain closures go through the
/// [`Worker`] constructors instead.
#[async_trait]
pub trait TaskWorker<P, R>: Send + Sync {
    /// Run the worker with the given parameters
    async fn run(&self, params: P) -> anyhow::Result<R>;
}

#[cfg(test)]
mockall::mock! {
    pub TaskWorker<P: Send + Sync + 'static, R: Send + Sync + 'static> {}

    #[async_trait]
    impl<P: Send + Sync + 'static, R: Send + Sync + 'static> TaskWorker<P, R> for TaskWorker<P, R> {
        async fn run(&self, params: P) -> anyhow::Result<R>;
    }
}

/// Shared handle to a worker.
///
/// Cloning is cheap; clones point at the same worker.
pub struct Worker<P, R> {
    inner: Arc<dyn TaskWorker<P, R>>,
}

impl<P, R> Worker<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    /// Wrap an infallible synchronous function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(P) -> R + Send + Sync + 'static,
    {
        Self::fallible(move |params| Ok(f(params)))
    }

    /// Wrap a synchronous function that may fail
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(P) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        Self::from_worker(SyncFn { f: Box::new(f) })
    }

    /// Wrap an async function
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        let boxed = move |params: P| -> BoxFuture<'static, anyhow::Result<R>> { Box::pin(f(params)) };
        Self::from_worker(AsyncFn { f: Box::new(boxed) })
    }

    /// Wrap a [`TaskWorker`] implementation
    pub fn from_worker<W>(worker: W) -> Self
    where
        W: TaskWorker<P, R> + 'static,
    {
        Self {
            inner: Arc::new(worker),
        }
    }

    /// Call the worker
    pub async fn call(&self, params: P) -> anyhow::Result<R> {
        self.inner.run(params).await
    }

    /// Whether two handles point at the same worker
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<P, R> Clone for Worker<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, R> fmt::Debug for Worker<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker").finish_non_exhaustive()
    }
}

struct SyncFn<P, R> {
    f: Box<dyn Fn(P) -> anyhow::Result<R> + Send + Sync>,
}

#[async_trait]
impl<P, R> TaskWorker<P, R> for SyncFn<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    async fn run(&self, params: P) -> anyhow::Result<R> {
        (self.f)(params)
    }
}

struct AsyncFn<P, R> {
    f: Box<dyn Fn(P) -> BoxFuture<'static, anyhow::Result<R>> + Send + Sync>,
}

#[async_trait]
impl<P, R> TaskWorker<P, R> for AsyncFn<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    async fn run(&self, params: P) -> anyhow::Result<R> {
        (self.f)(params).await
    }
}
