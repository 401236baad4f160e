use crate::model::{EditState, EditTarget, SessionState};
use crate::store::PlanStore;

/// What a commit did to the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommitOutcome {
    NothingToCommit,
    Applied { target: EditTarget },
    TaskDeleted { target: EditTarget },
    Unchanged { target: EditTarget },
}

impl CommitOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Applied { .. } | Self::TaskDeleted { .. })
    }
}

/// Looks up the text an edit of `target` starts from.
pub fn current_value(state: &SessionState, target: &EditTarget) -> Option<String> {
    match *target {
        EditTarget::Project { day, project_id } => state
            .plan(day)
            .project(project_id)
            .map(|project| project.name.clone()),
        EditTarget::Task {
            day,
            project_id,
            task_id,
        } => state
            .plan(day)
            .project(project_id)
            .and_then(|project| project.task(task_id))
            .map(|task| task.text.clone()),
    }
}

pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new(state: EditState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Starts editing `target`. An edit already in progress is committed
    /// first, the same as its input losing focus.
    pub fn begin(
        &mut self,
        store: &mut PlanStore,
        target: EditTarget,
        initial: String,
    ) -> CommitOutcome {
        let previous = self.commit(store);
        self.state = EditState::Editing {
            target,
            buffer: initial,
        };
        previous
    }

    /// Replaces the buffer and returns the target being edited, if any.
    pub fn input(&mut self, text: &str) -> Option<EditTarget> {
        match &mut self.state {
            EditState::Editing { target, buffer } => {
                buffer.clear();
                buffer.push_str(text);
                Some(*target)
            }
            EditState::Idle => None,
        }
    }

    pub fn commit(&mut self, store: &mut PlanStore) -> CommitOutcome {
        let EditState::Editing { target, buffer } = std::mem::take(&mut self.state) else {
            return CommitOutcome::NothingToCommit;
        };
        match target {
            EditTarget::Task {
                day,
                project_id,
                task_id,
            } if buffer.trim().is_empty() => {
                if store.delete_task(day, project_id, task_id) {
                    CommitOutcome::TaskDeleted { target }
                } else {
                    CommitOutcome::Unchanged { target }
                }
            }
            EditTarget::Task {
                day,
                project_id,
                task_id,
            } => {
                if store.edit_task(day, project_id, task_id, &buffer) {
                    CommitOutcome::Applied { target }
                } else {
                    CommitOutcome::Unchanged { target }
                }
            }
            EditTarget::Project { day, project_id } => {
                if store.rename_project(day, project_id, &buffer) {
                    CommitOutcome::Applied { target }
                } else {
                    CommitOutcome::Unchanged { target }
                }
            }
        }
    }

    /// Drops the buffer. Returns the target that was being edited, if any.
    pub fn cancel(&mut self) -> Option<EditTarget> {
        match std::mem::take(&mut self.state) {
            EditState::Editing { target, .. } => Some(target),
            EditState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Day;

    fn store_with_task() -> (PlanStore, i64, i64) {
        let mut store = PlanStore::new(SessionState::default(), 1_000);
        let project = store.add_project(Day::Today, "Launch").expect("project");
        let task = store.add_task(Day::Today, project, "Ship").expect("task");
        (store, project, task)
    }

    fn task_target(project_id: i64, task_id: i64) -> EditTarget {
        EditTarget::Task {
            day: Day::Today,
            project_id,
            task_id,
        }
    }

    #[test]
    fn begin_loads_current_value() {
        let (mut store, project, task) = store_with_task();
        let target = task_target(project, task);
        let initial = current_value(store.state(), &target).expect("value");
        let mut session = EditSession::new(EditState::Idle);
        assert_eq!(
            session.begin(&mut store, target, initial),
            CommitOutcome::NothingToCommit
        );
        assert_eq!(
            session.state(),
            &EditState::Editing {
                target,
                buffer: "Ship".to_string()
            }
        );
    }

    #[test]
    fn commit_applies_buffer_without_trimming() {
        let (mut store, project, task) = store_with_task();
        let target = task_target(project, task);
        let mut session = EditSession::new(EditState::Idle);
        session.begin(&mut store, target, "Ship".to_string());
        assert_eq!(session.input("Ship it "), Some(target));

        assert_eq!(session.commit(&mut store), CommitOutcome::Applied { target });
        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(
            store.state().plan(Day::Today).projects[0].tasks[0].text,
            "Ship it "
        );
    }

    #[test]
    fn blank_task_commit_deletes_task() {
        let (mut store, project, task) = store_with_task();
        let target = task_target(project, task);
        let mut session = EditSession::new(EditState::Idle);
        session.begin(&mut store, target, "Ship".to_string());
        session.input("   ");

        assert_eq!(
            session.commit(&mut store),
            CommitOutcome::TaskDeleted { target }
        );
        assert!(store.state().plan(Day::Today).projects[0].tasks.is_empty());
    }

    #[test]
    fn blank_project_commit_keeps_project() {
        let (mut store, project, _) = store_with_task();
        let target = EditTarget::Project {
            day: Day::Today,
            project_id: project,
        };
        let mut session = EditSession::new(EditState::Idle);
        session.begin(&mut store, target, "Launch".to_string());
        session.input("");

        let outcome = session.commit(&mut store);
        assert!(!outcome.changed());
        assert_eq!(store.state().plan(Day::Today).projects[0].name, "Launch");
    }

    #[test]
    fn cancel_discards_buffer() {
        let (mut store, project, task) = store_with_task();
        let target = task_target(project, task);
        let before = store.state().clone();
        let mut session = EditSession::new(EditState::Idle);
        session.begin(&mut store, target, "Ship".to_string());
        session.input("changed");

        assert_eq!(session.cancel(), Some(target));
        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(store.state(), &before);
        assert_eq!(session.cancel(), None);
        assert_eq!(session.input("late"), None);
    }

    #[test]
    fn begin_commits_previous_edit() {
        let (mut store, project, task) = store_with_task();
        let first = task_target(project, task);
        let second = EditTarget::Project {
            day: Day::Today,
            project_id: project,
        };
        let mut session = EditSession::new(EditState::Idle);
        session.begin(&mut store, first, "Ship".to_string());
        session.input("Ship v2");

        let outcome = session.begin(&mut store, second, "Launch".to_string());
        assert_eq!(outcome, CommitOutcome::Applied { target: first });
        assert_eq!(
            store.state().plan(Day::Today).projects[0].tasks[0].text,
            "Ship v2"
        );
        assert!(matches!(
            session.state(),
            EditState::Editing { target, .. } if *target == second
        ));
    }
}
