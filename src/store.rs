use log::info;

use crate::model::{Day, Project, SessionState, Task, DEFAULT_TEMPLATE};

/// Hands out ids close to the creation time in milliseconds, never repeating
/// one already present in the session.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    last: Option<i64>,
}

impl IdGenerator {
    pub fn seeded(last: Option<i64>) -> Self {
        Self { last }
    }

    pub fn next(&mut self, now_millis: i64) -> i64 {
        let id = match self.last {
            Some(last) if last >= now_millis => last.saturating_add(1),
            _ => now_millis,
        };
        self.last = Some(id);
        id
    }
}

pub struct PlanStore {
    state: SessionState,
    ids: IdGenerator,
    now_millis: i64,
}

impl PlanStore {
    pub fn new(state: SessionState, now_millis: i64) -> Self {
        let ids = IdGenerator::seeded(state.max_id());
        Self {
            state,
            ids,
            now_millis,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn add_project(&mut self, day: Day, name: &str) -> Option<i64> {
        let name = name.trim();
        if name.is_empty() {
            info!("declined empty project name for {}", day.as_str());
            return None;
        }
        let id = self.ids.next(self.now_millis);
        self.state.plan_mut(day).projects.push(Project {
            id,
            name: name.to_string(),
            tasks: Vec::new(),
        });
        Some(id)
    }

    pub fn delete_project(&mut self, day: Day, project_id: i64) -> bool {
        let projects = &mut self.state.plan_mut(day).projects;
        let before = projects.len();
        projects.retain(|project| project.id != project_id);
        projects.len() != before
    }

    pub fn add_task(&mut self, day: Day, project_id: i64, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            info!("declined empty task text for {} project {project_id}", day.as_str());
            return None;
        }
        if self.state.plan(day).project(project_id).is_none() {
            info!("declined task for missing {} project {project_id}", day.as_str());
            return None;
        }
        let id = self.ids.next(self.now_millis);
        let project = self.state.plan_mut(day).project_mut(project_id)?;
        project.tasks.push(Task {
            id,
            text: text.to_string(),
        });
        Some(id)
    }

    pub fn delete_task(&mut self, day: Day, project_id: i64, task_id: i64) -> bool {
        let Some(project) = self.state.plan_mut(day).project_mut(project_id) else {
            return false;
        };
        let before = project.tasks.len();
        project.tasks.retain(|task| task.id != task_id);
        project.tasks.len() != before
    }

    /// Sets the name as typed. A blank name leaves the project untouched.
    pub fn rename_project(&mut self, day: Day, project_id: i64, new_name: &str) -> bool {
        if new_name.trim().is_empty() {
            info!("declined blank rename for {} project {project_id}", day.as_str());
            return false;
        }
        match self.state.plan_mut(day).project_mut(project_id) {
            Some(project) if project.name != new_name => {
                project.name = new_name.to_string();
                true
            }
            _ => false,
        }
    }

    /// Sets the text as typed; a blank text deletes the task instead.
    pub fn edit_task(&mut self, day: Day, project_id: i64, task_id: i64, new_text: &str) -> bool {
        if new_text.trim().is_empty() {
            return self.delete_task(day, project_id, task_id);
        }
        let task = self
            .state
            .plan_mut(day)
            .project_mut(project_id)
            .and_then(|project| project.tasks.iter_mut().find(|task| task.id == task_id));
        match task {
            Some(task) if task.text != new_text => {
                task.text = new_text.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_include_tomorrow(&mut self, include: bool) -> bool {
        let changed = self.state.include_tomorrow != include;
        self.state.include_tomorrow = include;
        changed
    }

    pub fn set_template(&mut self, template: &str) -> bool {
        if self.state.template == template {
            return false;
        }
        self.state.template = template.to_string();
        true
    }

    pub fn reset_template(&mut self) -> bool {
        self.set_template(DEFAULT_TEMPLATE)
    }
}
