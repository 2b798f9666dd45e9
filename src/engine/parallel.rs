// src/engine/parallel.rs
use std::future::Future;

use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tracing::trace;

use crate::error::TaskExecResult;

/// Drive every future to completion on the current task and collect the
/// outputs in input order.
///
/// Nothing is cancelled when one of them fails: the remaining futures still
/// run to completion, then the first failure (in completion order) is
/// returned and the other outputs are dropped.
pub async fn join_ordered<I, F, T>(futures: I) -> TaskExecResult<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = TaskExecResult<T>>,
{
    let mut pending: FuturesUnordered<_> = futures
        .into_iter()
        .enumerate()
        .map(|(index, fut)| fut.map(move |outcome| (index, outcome)))
        .collect();

    let mut slots: Vec<Option<T>> = (0..pending.len()).map(|_| None).collect();
    let mut first_error = None;

    while let Some((index, outcome)) = pending.next().await {
        match outcome {
            Ok(value) => {
                trace!("Sub task {} settled", index);
                slots[index] = Some(value);
            }
            Err(e) => {
                trace!("Sub task {} failed: {}", index, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(slots.into_iter().flatten().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TaskError};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    async fn after(ms: u64, value: i32) -> TaskExecResult<i32> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_output_follows_input_order() {
        let out = join_ordered(vec![
            after(60, 1).boxed(),
            after(5, 2).boxed(),
            after(30, 3).boxed(),
        ])
        .await
        .unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let out: Vec<i32> = join_ordered(Vec::<futures::future::Ready<TaskExecResult<i32>>>::new())
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_failure_waits_for_siblings() {
        let finished = Arc::new(Mutex::new(Vec::new()));

        let slow = {
            let finished = Arc::clone(&finished);
            async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                finished.lock().push("slow");
                Ok::<_, TaskError>(1)
            }
            .boxed()
        };
        let failing = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Err::<i32, _>(TaskError::Worker(anyhow::anyhow!("first")))
        }
        .boxed();
        let later_failing = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err::<i32, _>(TaskError::Worker(anyhow::anyhow!("second")))
        }
        .boxed();

        let err = join_ordered(vec![slow, later_failing, failing]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Worker);
        assert_eq!(err.to_string(), "first");
        assert_eq!(*finished.lock(), vec!["slow"]);
    }
}
