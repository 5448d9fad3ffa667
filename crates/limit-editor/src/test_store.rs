//! In memory [`LimitStore`] used by the unit tests

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use futures::channel::oneshot;
use quota_client_core::{LimitStore, UiCallBack};
use quota_shared::{id::UserId, uac::DailyLimit};

#[derive(Debug, Default, Clone)]
pub struct RecordingStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<(UserId, DailyLimit)>,
    failing: HashSet<UserId>,
    is_deferred: bool,
    pending: Vec<(UserId, oneshot::Sender<anyhow::Result<()>>)>,
}

impl RecordingStore {
    /// Responses are held back until [`Self::complete_pending`] is called
    pub fn deferred() -> Self {
        let result = Self::default();
        result.inner.lock().unwrap().is_deferred = true;
        result
    }

    /// Rejects updates for the listed users and accepts all others
    pub fn failing_for(ids: &[&str]) -> Self {
        let result = Self::default();
        result.set_failing(ids);
        result
    }

    pub fn set_failing(&self, ids: &[&str]) {
        self.inner.lock().unwrap().failing = ids
            .iter()
            .map(|id| (*id).try_into().unwrap())
            .collect();
    }

    pub fn calls(&self) -> Vec<(UserId, DailyLimit)> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn complete_pending(&self) {
        let mut guard = self.inner.lock().unwrap();
        let pending = std::mem::take(&mut guard.pending);
        for (user_id, tx) in pending {
            let result = guard.result_for(&user_id);
            let _ = tx.send(result);
        }
    }

    pub fn drop_pending(&self) {
        self.inner.lock().unwrap().pending.clear();
    }
}

impl Inner {
    fn result_for(&self, user_id: &UserId) -> anyhow::Result<()> {
        if self.failing.contains(user_id) {
            Err(anyhow!("store rejected update for {user_id}"))
        } else {
            Ok(())
        }
    }
}

impl LimitStore for RecordingStore {
    fn update_daily_limit<F: UiCallBack>(
        &self,
        user_id: UserId,
        limit: DailyLimit,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        let (tx, rx) = oneshot::channel();
        let mut guard = self.inner.lock().unwrap();
        guard.calls.push((user_id.clone(), limit));
        if guard.is_deferred {
            guard.pending.push((user_id, tx));
        } else {
            let result = guard.result_for(&user_id);
            let _ = tx.send(result);
            ui_notify();
        }
        rx
    }
}
