// src/plan/registry.rs
use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::engine::Worker;
use crate::error::{TaskError, TaskExecResult};

/// Parameters of the built-in arithmetic workers
pub type Operands = (f64, f64);

/// Named workers that plan files can refer to
pub struct WorkerRegistry<P, R> {
    workers: HashMap<String, Worker<P, R>>,
}

impl<P, R> WorkerRegistry<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            workers: HashMap::new(),
        }
    }

    /// Register `worker` under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, worker: Worker<P, R>) -> &mut Self {
        let name = name.into();
        debug!("Registering worker: {}", name);
        self.workers.insert(name, worker);
        self
    }

    pub fn get(&self, name: &str) -> TaskExecResult<Worker<P, R>> {
        self.workers
            .get(name)
            .cloned()
            .ok_or_else(|| TaskError::UnknownWorker(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.workers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Every worker, made to sleep for `delay` before each call
    pub fn with_delay(self, delay: Duration) -> Self {
        if delay.is_zero() {
            return self;
        }
        Self {
            workers: self
                .workers
                .into_iter()
                .map(|(name, worker)| (name, delayed(worker, delay)))
                .collect(),
        }
    }
}

impl<P, R> Default for WorkerRegistry<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap `worker` into an async worker that sleeps for `delay` first
pub fn delayed<P, R>(worker: Worker<P, R>, delay: Duration) -> Worker<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    Worker::from_async(move |params: P| {
        let worker = worker.clone();
        async move {
            tokio::time::sleep(delay).await;
            worker.call(params).await
        }
    })
}

/// `add`, `sub`, `mul`, `div`, `min` and `max` over pairs of numbers
pub fn arithmetic() -> WorkerRegistry<Operands, f64> {
    let mut registry = WorkerRegistry::new();
    registry
        .register("add", Worker::new(|(a, b): Operands| a + b))
        .register("sub", Worker::new(|(a, b): Operands| a - b))
        .register("mul", Worker::new(|(a, b): Operands| a * b))
        .register(
            "div",
            Worker::fallible(|(a, b): Operands| {
                if b == 0.0 {
                    anyhow::bail!("division by zero: {} / {}", a, b);
                }
                Ok(a / b)
            }),
        )
        .register("min", Worker::new(|(a, b): Operands| a.min(b)))
        .register("max", Worker::new(|(a, b): Operands| a.max(b)));
    registry
}
