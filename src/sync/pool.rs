use std::{future::Future, num::NonZeroUsize};

use futures::StreamExt as _;

/// Run `task` for every item with at most `limit` tasks in flight.
///
/// Tasks start in item order but may finish in any order. Returns once every
/// task has completed.
pub async fn run_bounded<I, F, Fut>(items: I, limit: NonZeroUsize, task: F)
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = ()>,
{
    futures::stream::iter(items)
        .for_each_concurrent(limit.get(), task)
        .await;
}
