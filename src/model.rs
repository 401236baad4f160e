use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE: &str = "{{greeting}} sir
----------------------------
{{planTitle}}

{{projects}}
{{nextDayPlan}}";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn task(&self, task_id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Today,
    Tomorrow,
}

impl Day {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Today => 0,
            Self::Tomorrow => 1,
        }
    }
}

/// Projects for one day, kept in insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Plan {
    pub projects: Vec<Project>,
}

impl Plan {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn project(&self, project_id: i64) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }

    pub fn project_mut(&mut self, project_id: i64) -> Option<&mut Project> {
        self.projects
            .iter_mut()
            .find(|project| project.id == project_id)
    }

    pub fn max_id(&self) -> Option<i64> {
        self.projects
            .iter()
            .flat_map(|project| {
                std::iter::once(project.id).chain(project.tasks.iter().map(|task| task.id))
            })
            .max()
    }
}

/// Everything a session persists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionState {
    plans: [Plan; 2],
    pub include_tomorrow: bool,
    pub template: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            plans: [Plan::default(), Plan::default()],
            include_tomorrow: false,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl SessionState {
    pub fn new(today: Plan, tomorrow: Plan, include_tomorrow: bool, template: String) -> Self {
        Self {
            plans: [today, tomorrow],
            include_tomorrow,
            template,
        }
    }

    pub fn plan(&self, day: Day) -> &Plan {
        &self.plans[day.index()]
    }

    pub fn plan_mut(&mut self, day: Day) -> &mut Plan {
        &mut self.plans[day.index()]
    }

    pub fn max_id(&self) -> Option<i64> {
        self.plans.iter().filter_map(Plan::max_id).max()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EditTarget {
    Project {
        day: Day,
        project_id: i64,
    },
    Task {
        day: Day,
        project_id: i64,
        task_id: i64,
    },
}

impl EditTarget {
    pub fn describe(&self) -> String {
        match self {
            Self::Project { day, project_id } => {
                format!("{} project {project_id}", day.as_str())
            }
            Self::Task {
                day,
                project_id,
                task_id,
            } => format!("{} task {task_id} (project {project_id})", day.as_str()),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Editing { target: EditTarget, buffer: String },
}
