use std::task::{Context, Poll};

use anyhow::anyhow;
use futures::{channel::oneshot, future::poll_fn, FutureExt as _};
use quota_client_core::{LimitStore, UiCallBack};
use quota_shared::{id::UserId, uac::DailyLimit};
use tracing::info;

use crate::{errors::PersistenceFailure, DraftLimits};

/// A set of independent limit updates that have been sent to the store
///
/// There is no cancellation or timeout, the batch is done when every request
/// has either completed or been dropped by the store.
#[derive(Debug)]
pub struct PendingBatch {
    requests: Vec<PendingUpdate>,
}

#[derive(Debug)]
struct PendingUpdate {
    user_id: UserId,
    limit: DailyLimit,
    state: RequestState,
}

#[derive(Debug)]
enum RequestState {
    Awaiting(oneshot::Receiver<anyhow::Result<()>>),
    Settled(anyhow::Result<()>),
}

#[derive(Debug)]
pub struct FailedUpdate {
    pub user_id: UserId,
    pub limit: DailyLimit,
    pub cause: anyhow::Error,
}

/// Per request results of a settled batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub committed: Vec<(UserId, DailyLimit)>,
    pub failed: Vec<FailedUpdate>,
}

impl PendingBatch {
    /// Sends one update per draft entry without waiting on any of them
    #[tracing::instrument(skip(store, ui_notify))]
    pub fn start<S, F>(store: &S, drafts: &DraftLimits, ui_notify: F) -> Self
    where
        S: LimitStore,
        F: UiCallBack + Clone,
    {
        info!(count = drafts.len(), "sending limit updates");
        let requests = drafts
            .iter()
            .map(|(user_id, limit)| PendingUpdate {
                user_id: user_id.clone(),
                limit,
                state: RequestState::Awaiting(store.update_daily_limit(
                    user_id.clone(),
                    limit,
                    ui_notify.clone(),
                )),
            })
            .collect();
        Self { requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Checks for responses without blocking
    ///
    /// Returns `None` while any request is still outstanding
    pub fn try_settle(&mut self) -> Option<BatchOutcome> {
        let mut is_all_settled = true;
        for request in self.requests.iter_mut() {
            if let RequestState::Awaiting(rx) = &mut request.state {
                match rx.try_recv() {
                    Ok(Some(result)) => request.state = RequestState::Settled(result),
                    Ok(None) => is_all_settled = false,
                    Err(oneshot::Canceled) => {
                        request.state = RequestState::Settled(Err(dropped_request_error()))
                    }
                }
            }
        }
        is_all_settled.then(|| self.take_outcome())
    }

    /// Registers for wake up on every outstanding request
    ///
    /// Responses that arrive are kept in the batch so nothing is lost if the
    /// caller stops polling before the batch is ready.
    pub fn poll_settle(&mut self, cx: &mut Context<'_>) -> Poll<BatchOutcome> {
        let mut is_all_settled = true;
        for request in self.requests.iter_mut() {
            if let RequestState::Awaiting(rx) = &mut request.state {
                match rx.poll_unpin(cx) {
                    Poll::Ready(result) => {
                        request.state = RequestState::Settled(
                            result.unwrap_or_else(|_| Err(dropped_request_error())),
                        )
                    }
                    Poll::Pending => is_all_settled = false,
                }
            }
        }
        if is_all_settled {
            Poll::Ready(self.take_outcome())
        } else {
            Poll::Pending
        }
    }

    /// Waits until every request has settled
    ///
    /// Cancel safe, dropping the future leaves the batch in place
    pub async fn settle(&mut self) -> BatchOutcome {
        poll_fn(|cx| self.poll_settle(cx)).await
    }

    fn take_outcome(&mut self) -> BatchOutcome {
        std::mem::take(&mut self.requests)
            .into_iter()
            .map(|request| {
                let result = match request.state {
                    RequestState::Settled(result) => result,
                    RequestState::Awaiting(_) => Err(dropped_request_error()),
                };
                (request.user_id, request.limit, result)
            })
            .collect()
    }
}

fn dropped_request_error() -> anyhow::Error {
    anyhow!("update request was dropped before it completed")
}

impl FromIterator<(UserId, DailyLimit, anyhow::Result<()>)> for BatchOutcome {
    fn from_iter<T: IntoIterator<Item = (UserId, DailyLimit, anyhow::Result<()>)>>(
        iter: T,
    ) -> Self {
        let mut outcome = Self::default();
        for (user_id, limit, result) in iter {
            match result {
                Ok(()) => outcome.committed.push((user_id, limit)),
                Err(cause) => outcome.failed.push(FailedUpdate {
                    user_id,
                    limit,
                    cause,
                }),
            }
        }
        outcome
    }
}

impl BatchOutcome {
    pub fn attempted(&self) -> usize {
        self.committed.len() + self.failed.len()
    }

    /// The batch only counts as a success if every update succeeded
    pub fn into_result(self) -> Result<Vec<(UserId, DailyLimit)>, PersistenceFailure> {
        if self.failed.is_empty() {
            Ok(self.committed)
        } else {
            Err(PersistenceFailure {
                attempted: self.attempted(),
                committed: self.committed,
                failed: self.failed,
            })
        }
    }
}
