use quota_client_core::{LimitStore, UiCallBack};
use quota_shared::{
    id::UserId,
    uac::{DailyLimit, Role, UserRecord},
};
use tracing::{error, info, instrument, warn};

use crate::{
    batch::{BatchOutcome, PendingBatch},
    draft::{DraftLimits, Preset},
    editable_users,
    errors::SessionError,
    Notification,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Closed,
    Editing,
    Persisting,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Closed,
    Editing(DraftLimits),
    /// Drafts stay editable while the batch is in flight but a second save is
    /// rejected
    Persisting {
        drafts: DraftLimits,
        batch: PendingBatch,
    },
}

/// Batch editor for the daily limits of the users a caller may manage
///
/// Holds the editable users (with the limits last known to be persisted) and
/// the state of the current editing session if one is open.
#[derive(Debug)]
pub struct LimitEditor {
    users: Vec<UserRecord>,
    state: SessionState,
    failed_last_save: Vec<UserId>,
}

impl LimitEditor {
    /// Returns `None` if the caller may not edit any of the users, in which
    /// case there should be no way to reach the editor at all
    pub fn new(users: &[UserRecord], caller_role: Role) -> Option<Self> {
        let users = editable_users(users, caller_role);
        if users.is_empty() {
            return None;
        }
        Some(Self {
            users,
            state: SessionState::Closed,
            failed_last_save: Vec::new(),
        })
    }

    /// The editable users in display order
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Closed => SessionPhase::Closed,
            SessionState::Editing(_) => SessionPhase::Editing,
            SessionState::Persisting { .. } => SessionPhase::Persisting,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase() != SessionPhase::Closed
    }

    pub fn is_persisting(&self) -> bool {
        self.phase() == SessionPhase::Persisting
    }

    /// Starts a fresh session with every draft set to the persisted limit
    ///
    /// Reopening an already open session discards its drafts
    #[instrument(skip(self))]
    pub fn open(&mut self) -> Result<(), SessionError> {
        if self.is_persisting() {
            return Err(SessionError::SaveInProgress);
        }
        info!(users = self.users.len(), "opening limit editor");
        self.failed_last_save.clear();
        self.state = SessionState::Editing(DraftLimits::seed(&self.users));
        Ok(())
    }

    /// Closes the session discarding all drafts
    ///
    /// A save that has already been started cannot be cancelled
    #[instrument(skip(self))]
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.is_persisting() {
            return Err(SessionError::SaveInProgress);
        }
        self.failed_last_save.clear();
        self.state = SessionState::Closed;
        Ok(())
    }

    pub fn drafts(&self) -> Option<&DraftLimits> {
        match &self.state {
            SessionState::Closed => None,
            SessionState::Editing(drafts) | SessionState::Persisting { drafts, .. } => {
                Some(drafts)
            }
        }
    }

    pub fn draft(&self, user_id: &UserId) -> Option<DailyLimit> {
        self.drafts()?.get(user_id)
    }

    fn drafts_mut(&mut self) -> Result<&mut DraftLimits, SessionError> {
        match &mut self.state {
            SessionState::Closed => Err(SessionError::NotOpen),
            SessionState::Editing(drafts) | SessionState::Persisting { drafts, .. } => {
                Ok(drafts)
            }
        }
    }

    fn mutate_draft<F>(&mut self, user_id: &UserId, f: F) -> Result<DailyLimit, SessionError>
    where
        F: FnOnce(&mut DraftLimits) -> Option<DailyLimit>,
    {
        f(self.drafts_mut()?).ok_or_else(|| SessionError::UnknownUser(user_id.clone()))
    }

    /// Moves the draft by `delta`, stopping at zero
    pub fn apply_delta(
        &mut self,
        user_id: &UserId,
        delta: i64,
    ) -> Result<DailyLimit, SessionError> {
        self.mutate_draft(user_id, |drafts| drafts.apply_delta(user_id, delta))
    }

    pub fn apply_preset(
        &mut self,
        user_id: &UserId,
        preset: Preset,
    ) -> Result<DailyLimit, SessionError> {
        self.mutate_draft(user_id, |drafts| drafts.apply_preset(user_id, preset))
    }

    /// Sets the draft from free text entered by the operator
    pub fn set_from_input(
        &mut self,
        user_id: &UserId,
        input: &str,
    ) -> Result<DailyLimit, SessionError> {
        self.mutate_draft(user_id, |drafts| drafts.set_from_input(user_id, input))
    }

    pub fn persisted_limit(&self, user_id: &UserId) -> Option<DailyLimit> {
        self.find_user(user_id).map(|user| user.daily_limit)
    }

    /// True if the draft differs from the last known persisted value
    pub fn is_changed(&self, user_id: &UserId) -> bool {
        match (self.draft(user_id), self.persisted_limit(user_id)) {
            (Some(draft), Some(persisted)) => draft != persisted,
            _ => false,
        }
    }

    pub fn changed_count(&self) -> usize {
        self.users
            .iter()
            .filter(|user| self.is_changed(&user.id))
            .count()
    }

    /// Users whose update was rejected by the most recent save
    pub fn failed_last_save(&self) -> &[UserId] {
        &self.failed_last_save
    }

    /// Sends every draft to the store as independent concurrent updates
    ///
    /// Use [`Self::poll_save`] or [`Self::finish_save`] to collect the outcome
    #[instrument(skip(self, store, ui_notify))]
    pub fn save<S, F>(&mut self, store: &S, ui_notify: F) -> Result<(), SessionError>
    where
        S: LimitStore,
        F: UiCallBack + Clone,
    {
        match std::mem::take(&mut self.state) {
            SessionState::Editing(drafts) => {
                self.failed_last_save.clear();
                let batch = PendingBatch::start(store, &drafts, ui_notify);
                self.state = SessionState::Persisting { drafts, batch };
                Ok(())
            }
            SessionState::Closed => Err(SessionError::NotOpen),
            state @ SessionState::Persisting { .. } => {
                warn!("save requested while one is already in progress");
                self.state = state;
                Err(SessionError::SaveInProgress)
            }
        }
    }

    /// Checks without blocking if the save has completed
    ///
    /// Returns the notification for the operator once it has. `on_refresh`
    /// is only called (once) if every update succeeded.
    pub fn poll_save<R: FnOnce()>(&mut self, on_refresh: R) -> Option<Notification> {
        match std::mem::take(&mut self.state) {
            SessionState::Persisting { drafts, mut batch } => match batch.try_settle() {
                Some(outcome) => Some(self.conclude_save(drafts, outcome, on_refresh)),
                None => {
                    self.state = SessionState::Persisting { drafts, batch };
                    None
                }
            },
            state => {
                self.state = state;
                None
            }
        }
    }

    /// Waits for the save to complete, see [`Self::poll_save`]
    ///
    /// Returns `None` immediately if no save is in progress. The session
    /// stays `Persisting` until the outcome is in hand so dropping the future
    /// early loses nothing, [`Self::poll_save`] can still collect the result.
    pub async fn finish_save<R: FnOnce()>(&mut self, on_refresh: R) -> Option<Notification> {
        let SessionState::Persisting { batch, .. } = &mut self.state else {
            return None;
        };
        let outcome = batch.settle().await;
        match std::mem::take(&mut self.state) {
            SessionState::Persisting { drafts, .. } => {
                Some(self.conclude_save(drafts, outcome, on_refresh))
            }
            state => {
                self.state = state;
                None
            }
        }
    }

    #[instrument(skip(self, drafts, on_refresh))]
    fn conclude_save<R: FnOnce()>(
        &mut self,
        drafts: DraftLimits,
        outcome: BatchOutcome,
        on_refresh: R,
    ) -> Notification {
        match outcome.into_result() {
            Ok(committed) => {
                self.record_persisted(&committed);
                info!(count = committed.len(), "all limit updates saved");
                self.state = SessionState::Closed;
                on_refresh();
                Notification::all_saved()
            }
            Err(failure) => {
                self.record_persisted(&failure.committed);
                for failed in failure.failed.iter() {
                    error!(
                        user_id = %failed.user_id,
                        limit = %failed.limit,
                        cause = ?failed.cause,
                        "limit update rejected"
                    );
                }
                error!(%failure, "error updating limits");
                self.failed_last_save = failure
                    .failed
                    .iter()
                    .map(|failed| failed.user_id.clone())
                    .collect();
                let failed_names: Vec<String> = failure
                    .failed
                    .iter()
                    .map(|failed| self.name_of(&failed.user_id))
                    .collect();
                self.state = SessionState::Editing(drafts);
                Notification::save_failed(&failed_names, failure.committed.len())
            }
        }
    }

    /// Updates the known persisted limits for updates the store accepted
    fn record_persisted(&mut self, committed: &[(UserId, DailyLimit)]) {
        for (user_id, limit) in committed {
            if let Some(user) = self.users.iter_mut().find(|user| &user.id == user_id) {
                user.daily_limit = *limit;
            }
        }
    }

    fn find_user(&self, user_id: &UserId) -> Option<&UserRecord> {
        self.users.iter().find(|user| &user.id == user_id)
    }

    fn name_of(&self, user_id: &UserId) -> String {
        self.find_user(user_id)
            .map(|user| user.display_name.to_string())
            .unwrap_or_else(|| user_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::FutureExt as _;

    use super::*;
    use crate::test_store::RecordingStore;

    fn user(id: &str, role: Role, limit: u32) -> UserRecord {
        UserRecord {
            id: id.try_into().unwrap(),
            display_name: format!("{id} name").try_into().unwrap(),
            role,
            daily_limit: DailyLimit::new(limit),
            is_active: true,
        }
    }

    fn id(value: &str) -> UserId {
        value.try_into().unwrap()
    }

    fn base_users() -> Vec<UserRecord> {
        vec![user("u1", Role::User, 100), user("u2", Role::User, 200)]
    }

    fn open_editor(users: &[UserRecord], role: Role) -> LimitEditor {
        let mut editor = LimitEditor::new(users, role).expect("users should be editable");
        editor.open().unwrap();
        editor
    }

    fn preset(value: u32) -> Preset {
        Preset::try_from(DailyLimit::new(value)).unwrap()
    }

    #[test]
    fn no_editor_for_base_user() {
        // Arrange
        let users = vec![
            user("a", Role::Admin, 1),
            user("m", Role::Manager, 1),
            user("u", Role::User, 1),
        ];

        // Act
        let actual = LimitEditor::new(&users, Role::User);

        // Assert
        assert!(actual.is_none());
    }

    #[test]
    fn no_editor_for_manager_without_base_users() {
        let users = vec![user("a", Role::Admin, 1), user("m", Role::Manager, 1)];
        assert!(LimitEditor::new(&users, Role::Manager).is_none());
    }

    #[test]
    fn manager_only_sees_base_users() {
        // Arrange
        let users = vec![
            user("a", Role::Admin, 1),
            user("m", Role::Manager, 1),
            user("u", Role::User, 1),
        ];

        // Act
        let editor = LimitEditor::new(&users, Role::Manager).unwrap();

        // Assert
        let ids: Vec<&str> = editor.users().iter().map(|u| u.id.as_ref()).collect();
        assert_eq!(ids, ["u"]);
    }

    #[test]
    fn starts_closed_without_drafts() {
        // Act
        let editor = LimitEditor::new(&base_users(), Role::Admin).unwrap();

        // Assert
        assert_eq!(editor.phase(), SessionPhase::Closed);
        assert!(editor.drafts().is_none());
    }

    #[test]
    fn open_seeds_drafts_from_persisted_limits() {
        // Act
        let editor = open_editor(&base_users(), Role::Manager);

        // Assert
        assert_eq!(editor.phase(), SessionPhase::Editing);
        for user in base_users() {
            assert_eq!(editor.draft(&user.id), Some(user.daily_limit));
        }
        assert_eq!(editor.changed_count(), 0);
    }

    #[test]
    fn reopening_after_cancel_discards_old_drafts() {
        // Arrange
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.apply_preset(&id("u1"), preset(1000)).unwrap();

        // Act
        editor.cancel().unwrap();
        let closed_drafts = editor.drafts().cloned();
        editor.open().unwrap();

        // Assert
        assert!(closed_drafts.is_none());
        assert_eq!(editor.draft(&id("u1")), Some(DailyLimit::new(100)));
    }

    #[test]
    fn edits_require_an_open_session() {
        // Arrange
        let mut editor = LimitEditor::new(&base_users(), Role::Admin).unwrap();

        // Act
        let actual = editor.apply_delta(&id("u1"), 10);

        // Assert
        assert_eq!(actual, Err(SessionError::NotOpen));
    }

    #[test]
    fn edits_to_users_outside_the_session_are_rejected() {
        // Arrange
        let users = vec![user("a", Role::Admin, 1), user("u1", Role::User, 1)];
        let mut editor = open_editor(&users, Role::Manager);

        // Act
        let actual = editor.apply_delta(&id("a"), 10);

        // Assert
        assert_eq!(actual, Err(SessionError::UnknownUser(id("a"))));
        assert_eq!(editor.draft(&id("a")), None);
    }

    #[test]
    fn change_tracking() {
        // Arrange
        let mut editor = open_editor(&base_users(), Role::Admin);

        // Act
        editor.set_from_input(&id("u1"), "150").unwrap();
        editor.apply_delta(&id("u2"), 10).unwrap();
        editor.apply_delta(&id("u2"), -10).unwrap();

        // Assert
        assert!(editor.is_changed(&id("u1")));
        assert!(!editor.is_changed(&id("u2")));
        assert_eq!(editor.changed_count(), 1);
    }

    #[test]
    fn successful_save_sends_every_draft_closes_and_refreshes_once() {
        // Arrange
        let store = RecordingStore::default();
        let mut editor = open_editor(&base_users(), Role::Manager);
        editor.apply_preset(&id("u1"), preset(500)).unwrap();
        editor.apply_delta(&id("u2"), -10).unwrap();
        let refresh_count = Cell::new(0);

        // Act
        editor.save(&store, || {}).unwrap();
        let notification = editor.poll_save(|| refresh_count.set(refresh_count.get() + 1));

        // Assert
        assert_eq!(
            store.calls(),
            vec![
                (id("u1"), DailyLimit::new(500)),
                (id("u2"), DailyLimit::new(190)),
            ]
        );
        assert_eq!(notification, Some(Notification::all_saved()));
        assert_eq!(editor.phase(), SessionPhase::Closed);
        assert!(editor.drafts().is_none());
        assert_eq!(refresh_count.get(), 1);
        assert_eq!(editor.persisted_limit(&id("u1")), Some(DailyLimit::new(500)));

        // Further polling does nothing
        assert!(editor.poll_save(|| refresh_count.set(refresh_count.get() + 1)).is_none());
        assert_eq!(refresh_count.get(), 1);
    }

    #[test]
    fn failed_save_keeps_session_open_with_drafts_intact() {
        // Arrange
        let store = RecordingStore::failing_for(&["u2"]);
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.apply_preset(&id("u1"), preset(300)).unwrap();
        editor.apply_delta(&id("u2"), 50).unwrap();
        let drafts_before = editor.drafts().cloned();
        let mut is_refreshed = false;

        // Act
        editor.save(&store, || {}).unwrap();
        let notification = editor.poll_save(|| is_refreshed = true).unwrap();

        // Assert
        assert!(!notification.is_success());
        assert!(notification.message().contains("u2 name"));
        assert_eq!(editor.phase(), SessionPhase::Editing);
        assert_eq!(editor.drafts().cloned(), drafts_before);
        assert!(!is_refreshed);
        assert_eq!(editor.failed_last_save(), [id("u2")]);
    }

    #[test]
    fn partial_commit_is_reflected_in_change_tracking() {
        // Arrange
        let store = RecordingStore::failing_for(&["u2"]);
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.apply_preset(&id("u1"), preset(300)).unwrap();
        editor.apply_delta(&id("u2"), 50).unwrap();

        // Act
        editor.save(&store, || {}).unwrap();
        editor.poll_save(|| {}).unwrap();

        // Assert
        assert!(!editor.is_changed(&id("u1")), "u1 was committed");
        assert!(editor.is_changed(&id("u2")), "u2 still needs saving");
        assert_eq!(editor.changed_count(), 1);
    }

    #[test]
    fn retry_after_failure_can_succeed() {
        // Arrange
        let store = RecordingStore::failing_for(&["u1"]);
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.apply_delta(&id("u1"), 10).unwrap();
        editor.save(&store, || {}).unwrap();
        editor.poll_save(|| {}).unwrap();
        store.set_failing(&[]);
        let mut refresh_count = 0;

        // Act
        editor.save(&store, || {}).unwrap();
        let notification = editor.poll_save(|| refresh_count += 1).unwrap();

        // Assert
        assert!(notification.is_success());
        assert_eq!(refresh_count, 1);
        assert!(editor.failed_last_save().is_empty());
        assert_eq!(store.calls().len(), 4);
    }

    #[test]
    fn second_save_is_rejected_while_persisting() {
        // Arrange
        let store = RecordingStore::deferred();
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.save(&store, || {}).unwrap();

        // Act
        let second_save = editor.save(&store, || {});
        let cancel = editor.cancel();
        let reopen = editor.open();

        // Assert
        assert_eq!(second_save, Err(SessionError::SaveInProgress));
        assert_eq!(cancel, Err(SessionError::SaveInProgress));
        assert_eq!(reopen, Err(SessionError::SaveInProgress));
        assert_eq!(editor.phase(), SessionPhase::Persisting);
        assert_eq!(store.calls().len(), 2, "no extra requests were sent");
        assert!(editor.poll_save(|| {}).is_none());

        store.complete_pending();
        assert!(editor.poll_save(|| {}).unwrap().is_success());
    }

    #[test]
    fn save_requires_open_session() {
        let store = RecordingStore::default();
        let mut editor = LimitEditor::new(&base_users(), Role::Admin).unwrap();
        assert_eq!(editor.save(&store, || {}), Err(SessionError::NotOpen));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn dropped_finish_save_keeps_the_save_running() {
        // Arrange
        let store = RecordingStore::deferred();
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.apply_delta(&id("u1"), 50).unwrap();
        editor.save(&store, || {}).unwrap();
        let mut refresh_count = 0;

        // Act
        let early_result = editor.finish_save(|| {}).now_or_never();
        let phase_after_drop = editor.phase();
        store.complete_pending();
        let notification = editor.poll_save(|| refresh_count += 1);

        // Assert
        assert!(early_result.is_none(), "store has not answered yet");
        assert_eq!(phase_after_drop, SessionPhase::Persisting);
        assert_eq!(notification, Some(Notification::all_saved()));
        assert_eq!(refresh_count, 1);
        assert_eq!(editor.persisted_limit(&id("u1")), Some(DailyLimit::new(150)));
    }

    #[tokio::test]
    async fn finish_save_waits_for_the_batch() {
        // Arrange
        let store = RecordingStore::default();
        let mut editor = open_editor(&base_users(), Role::Admin);
        editor.apply_delta(&id("u1"), 50).unwrap();
        editor.save(&store, || {}).unwrap();
        let mut refresh_count = 0;

        // Act
        let notification = editor.finish_save(|| refresh_count += 1).await;

        // Assert
        assert!(notification.unwrap().is_success());
        assert_eq!(refresh_count, 1);
        assert!(!editor.is_open());
    }
}
