use log::{debug, info};

use crate::config::Clock;
use crate::edit::{current_value, CommitOutcome, EditSession};
use crate::error::AppError;
use crate::model::{Day, EditState, EditTarget, SessionState};
use crate::render::{render, DayPhase};
use crate::snapshot::{decode_edit, decode_state, encode_edit, encode_state, EDIT_KEY, STATE_KEY};
use crate::storage::SessionStorage;
use crate::store::PlanStore;

pub struct App {
    storage: SessionStorage,
    clock: Clock,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TaskEditOutcome {
    Updated,
    Deleted,
    Unchanged,
}

impl App {
    pub fn new(storage: SessionStorage, clock: Clock) -> Self {
        Self { storage, clock }
    }

    pub fn phase(&self) -> DayPhase {
        DayPhase::at(self.clock.local)
    }

    pub async fn load_state(&self) -> Result<SessionState, AppError> {
        let raw = self.storage.get_item(STATE_KEY).await?;
        debug!(
            "loaded session {} ({} bytes)",
            self.storage.session_id(),
            raw.as_ref().map_or(0, String::len)
        );
        Ok(decode_state(raw.as_deref()))
    }

    pub async fn save_state(&self, state: &SessionState) -> Result<(), AppError> {
        let raw = encode_state(state)?;
        self.storage.set_item(STATE_KEY, &raw).await
    }

    async fn load_edit(&self) -> Result<EditState, AppError> {
        let raw = self.storage.get_item(EDIT_KEY).await?;
        Ok(decode_edit(raw.as_deref()))
    }

    async fn save_edit(&self, state: &EditState) -> Result<(), AppError> {
        match encode_edit(state)? {
            Some(raw) => self.storage.set_item(EDIT_KEY, &raw).await,
            None => self.storage.remove_item(EDIT_KEY).await.map(|_| ()),
        }
    }

    async fn open_store(&self) -> Result<PlanStore, AppError> {
        Ok(PlanStore::new(self.load_state().await?, self.clock.millis))
    }

    /// Runs one store operation and writes the snapshot back when it reports
    /// a change.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut PlanStore) -> (T, bool),
    ) -> Result<T, AppError> {
        let mut store = self.open_store().await?;
        let (value, changed) = op(&mut store);
        if changed {
            self.save_state(store.state()).await?;
        }
        Ok(value)
    }

    pub async fn add_project(&self, day: Day, name: &str) -> Result<Option<i64>, AppError> {
        self.mutate(|store| {
            let id = store.add_project(day, name);
            (id, id.is_some())
        })
        .await
    }

    pub async fn delete_project(&self, day: Day, project_id: i64) -> Result<bool, AppError> {
        self.mutate(|store| {
            let removed = store.delete_project(day, project_id);
            (removed, removed)
        })
        .await
    }

    pub async fn rename_project(
        &self,
        day: Day,
        project_id: i64,
        name: &str,
    ) -> Result<bool, AppError> {
        self.mutate(|store| {
            let renamed = store.rename_project(day, project_id, name);
            (renamed, renamed)
        })
        .await
    }

    pub async fn add_task(
        &self,
        day: Day,
        project_id: i64,
        text: &str,
    ) -> Result<Option<i64>, AppError> {
        self.mutate(|store| {
            let id = store.add_task(day, project_id, text);
            (id, id.is_some())
        })
        .await
    }

    pub async fn delete_task(
        &self,
        day: Day,
        project_id: i64,
        task_id: i64,
    ) -> Result<bool, AppError> {
        self.mutate(|store| {
            let removed = store.delete_task(day, project_id, task_id);
            (removed, removed)
        })
        .await
    }

    pub async fn edit_task(
        &self,
        day: Day,
        project_id: i64,
        task_id: i64,
        text: &str,
    ) -> Result<TaskEditOutcome, AppError> {
        self.mutate(|store| {
            let deleting = text.trim().is_empty();
            match (store.edit_task(day, project_id, task_id, text), deleting) {
                (true, true) => (TaskEditOutcome::Deleted, true),
                (true, false) => (TaskEditOutcome::Updated, true),
                (false, _) => (TaskEditOutcome::Unchanged, false),
            }
        })
        .await
    }

    /// Only offered in the evening, like the checkbox it stands in for.
    pub async fn set_include_tomorrow(&self, include: bool) -> Result<bool, AppError> {
        if !self.phase().evening {
            return Err(AppError::InvalidInput(
                "the tomorrow plan option is only available from 17:00".to_string(),
            ));
        }
        self.mutate(|store| {
            let changed = store.set_include_tomorrow(include);
            (changed, changed)
        })
        .await
    }

    pub async fn set_template(&self, template: &str) -> Result<bool, AppError> {
        self.mutate(|store| {
            let changed = store.set_template(template);
            (changed, changed)
        })
        .await
    }

    pub async fn reset_template(&self) -> Result<bool, AppError> {
        self.mutate(|store| {
            let changed = store.reset_template();
            (changed, changed)
        })
        .await
    }

    pub async fn render(&self) -> Result<String, AppError> {
        let state = self.load_state().await?;
        Ok(render(&state, self.clock.local))
    }

    pub async fn edit_state(&self) -> Result<EditState, AppError> {
        self.load_edit().await
    }

    /// Starts an edit of `target`, committing any edit left open.
    pub async fn begin_edit(
        &self,
        target: EditTarget,
    ) -> Result<(CommitOutcome, String), AppError> {
        let mut store = self.open_store().await?;
        let mut session = EditSession::new(self.load_edit().await?);

        // An open edit may have renamed or removed the target.
        let outcome = session.commit(&mut store);
        let initial = current_value(store.state(), &target)
            .ok_or_else(|| AppError::NotFound(target.describe()))?;
        session.begin(&mut store, target, initial.clone());

        if outcome.changed() {
            self.save_state(store.state()).await?;
        }
        self.save_edit(session.state()).await?;
        Ok((outcome, initial))
    }

    pub async fn edit_input(&self, text: &str) -> Result<EditTarget, AppError> {
        let mut session = EditSession::new(self.load_edit().await?);
        let target = session
            .input(text)
            .ok_or_else(|| AppError::InvalidInput("no edit in progress".to_string()))?;
        self.save_edit(session.state()).await?;
        Ok(target)
    }

    pub async fn commit_edit(&self) -> Result<CommitOutcome, AppError> {
        let mut store = self.open_store().await?;
        let mut session = EditSession::new(self.load_edit().await?);
        let outcome = session.commit(&mut store);
        if outcome.changed() {
            self.save_state(store.state()).await?;
        }
        self.save_edit(session.state()).await?;
        Ok(outcome)
    }

    pub async fn cancel_edit(&self) -> Result<Option<EditTarget>, AppError> {
        let mut session = EditSession::new(self.load_edit().await?);
        let cancelled = session.cancel();
        self.save_edit(session.state()).await?;
        Ok(cancelled)
    }

    pub async fn raw_state(&self) -> Result<Option<String>, AppError> {
        self.storage.get_item(STATE_KEY).await
    }

    pub async fn end_session(&self) -> Result<u64, AppError> {
        let removed = self.storage.clear().await?;
        info!(
            "ended session {} ({removed} item(s) removed)",
            self.storage.session_id()
        );
        Ok(removed)
    }
}
