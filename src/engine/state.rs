// src/engine/state.rs
use super::worker::Worker;

/// Worker and worker parameters, either as a task's own configuration or as
/// the fallback handed to `execute`.
#[derive(Debug)]
pub struct TaskConfig<P, R> {
    pub worker: Option<Worker<P, R>>,
    pub worker_params: Option<P>,
}

impl<P, R> TaskConfig<P, R> {
    /// Empty configuration, nothing to fall back on
    pub fn new() -> Self {
        Self {
            worker: None,
            worker_params: None,
        }
    }

    pub fn with_worker(mut self, worker: Worker<P, R>) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn with_worker_params(mut self, worker_params: P) -> Self {
        self.worker_params = Some(worker_params);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.worker.is_none() && self.worker_params.is_none()
    }
}

impl<P, R> Default for TaskConfig<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone, R> Clone for TaskConfig<P, R> {
    fn clone(&self) -> Self {
        Self {
            worker: self.worker.clone(),
            worker_params: self.worker_params.clone(),
        }
    }
}

/// State shared by tasks and group tasks: the worker, its parameters and
/// the last stored result `O`.
///
/// Every write to the worker or the parameters clears the result, whether
/// or not the value changed.
#[derive(Debug)]
pub struct TaskState<P, R, O> {
    worker: Option<Worker<P, R>>,
    worker_params: Option<P>,
    result: Option<O>,
}

impl<P, R, O> TaskState<P, R, O> {
    pub fn new(config: TaskConfig<P, R>) -> Self {
        Self {
            worker: config.worker,
            worker_params: config.worker_params,
            result: None,
        }
    }

    pub fn worker(&self) -> Option<&Worker<P, R>> {
        self.worker.as_ref()
    }

    pub fn worker_params(&self) -> Option<&P> {
        self.worker_params.as_ref()
    }

    pub fn result(&self) -> Option<&O> {
        self.result.as_ref()
    }

    pub fn set_worker(&mut self, worker: Option<Worker<P, R>>) {
        self.worker = worker;
        self.result = None;
    }

    pub fn set_worker_params(&mut self, worker_params: Option<P>) {
        self.worker_params = worker_params;
        self.result = None;
    }

    pub(crate) fn store_result(&mut self, result: O) {
        self.result = Some(result);
    }

    /// Own values win, the fallback fills whatever is unset.
    pub(crate) fn resolve(&self, fallback: &TaskConfig<P, R>) -> TaskConfig<P, R>
    where
        P: Clone,
    {
        TaskConfig {
            worker: self.worker.as_ref().or(fallback.worker.as_ref()).cloned(),
            worker_params: self
                .worker_params
                .as_ref()
                .or(fallback.worker_params.as_ref())
                .cloned(),
        }
    }
}

impl<P: Clone, R, O: Clone> Clone for TaskState<P, R, O> {
    fn clone(&self) -> Self {
        Self {
            worker: self.worker.clone(),
            worker_params: self.worker_params.clone(),
            result: self.result.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = TaskState<(i32, i32), i32, i32>;

    fn adder() -> Worker<(i32, i32), i32> {
        Worker::new(|(a, b): (i32, i32)| a + b)
    }

    #[test]
    fn test_new_state_has_no_result() {
        let state = State::new(TaskConfig::new().with_worker(adder()).with_worker_params((1, 2)));
        assert!(state.worker().is_some());
        assert_eq!(state.worker_params(), Some(&(1, 2)));
        assert!(state.result().is_none());
    }

    #[test]
    fn test_setting_worker_clears_result() {
        let worker = adder();
        let mut state = State::new(TaskConfig::new().with_worker(worker.clone()));
        state.store_result(3);
        assert_eq!(state.result(), Some(&3));

        // same worker again still invalidates
        state.set_worker(Some(worker));
        assert!(state.result().is_none());
    }

    #[test]
    fn test_setting_params_clears_result() {
        let mut state = State::new(TaskConfig::new().with_worker_params((1, 2)));
        state.store_result(3);
        state.set_worker_params(Some((1, 2)));
        assert!(state.result().is_none());

        state.store_result(3);
        state.set_worker_params(None);
        assert!(state.result().is_none());
        assert!(state.worker_params().is_none());
    }

    #[test]
    fn test_resolve_prefers_own_values() {
        let own = adder();
        let state = State::new(TaskConfig::new().with_worker(own.clone()).with_worker_params((1, 2)));
        let fallback = TaskConfig::new().with_worker(adder()).with_worker_params((9, 9));

        let resolved = state.resolve(&fallback);
        assert!(resolved.worker.unwrap().ptr_eq(&own));
        assert_eq!(resolved.worker_params, Some((1, 2)));
    }

    #[test]
    fn test_resolve_fills_from_fallback() {
        let fallback_worker = adder();
        let state = State::new(TaskConfig::new().with_worker_params((1, 2)));
        let fallback = TaskConfig::new().with_worker(fallback_worker.clone());

        let resolved = state.resolve(&fallback);
        assert!(resolved.worker.unwrap().ptr_eq(&fallback_worker));
        assert_eq!(resolved.worker_params, Some((1, 2)));
    }

    #[test]
    fn test_empty_tuple_counts_as_set() {
        let state: TaskState<(), i32, i32> = TaskState::new(TaskConfig::new().with_worker_params(()));
        let resolved = state.resolve(&TaskConfig::new());
        assert_eq!(resolved.worker_params, Some(()));
        assert!(!resolved.is_empty());
    }
}
