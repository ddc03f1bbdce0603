//! A group of tasks where the first failure cancels the rest.
//!
//! Members are expected to poll [`TaskGroup::token`] between units of work
//! and return `Ok` once it is cancelled; only the first error is kept.

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub(crate) struct TaskGroup<T> {
    tasks: JoinSet<Result<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> TaskGroup<T> {
    /// Creates a group, cancelled along with `parent` when one is given.
    pub(crate) fn new(parent: Option<&CancellationToken>) -> Self {
        let token = match parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        Self {
            tasks: JoinSet::new(),
            token,
        }
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(crate) fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Waits for every member, returning their outputs or the first error.
    ///
    /// A group that was cancelled from outside without any member failing
    /// yields [`Error::Cancelled`].
    pub(crate) async fn wait(mut self) -> Result<Vec<T>> {
        let mut outputs = Vec::with_capacity(self.tasks.len());
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = joined
                .map_err(|e| Error::Internal(format!("worker task failed: {e}")))
                .and_then(|r| r);
            match outcome {
                Ok(output) => outputs.push(output),
                Err(err) if first_error.is_none() => {
                    warn!(error = %err, "Task failed, cancelling the group");
                    self.token.cancel();
                    first_error = Some(err);
                }
                Err(err) => debug!(error = %err, "Dropping error after the first failure"),
            }
        }

        match first_error {
            Some(err) => Err(err),
            None if self.token.is_cancelled() => Err(Error::Cancelled),
            None => Ok(outputs),
        }
    }
}

/// A pre-filled, closed queue of work shared by the members of a group.
pub(crate) struct TaskQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> TaskQueue<T> {
    pub(crate) fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
        }
    }

    pub(crate) fn pop(&self) -> Option<T> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
