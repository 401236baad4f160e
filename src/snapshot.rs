//! JSON layout of the persisted session state.
//!
//! Decoding is lenient: each field is read on its own and falls back to its
//! default when missing or malformed, so a damaged snapshot never blocks the
//! session.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Day, EditState, EditTarget, Plan, Project, SessionState, DEFAULT_TEMPLATE};

pub const STATE_KEY: &str = "dailyPlanState";
pub const EDIT_KEY: &str = "dailyPlanEditing";

const FIELD_PROJECTS: &str = "projects";
const FIELD_NEXT_DAY_PROJECTS: &str = "nextDayProjects";
const FIELD_INCLUDE_NEXT_DAY: &str = "includeNextDayPlan";
const FIELD_TEMPLATE: &str = "customFormat";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord<'a> {
    projects: &'a [Project],
    next_day_projects: &'a [Project],
    include_next_day_plan: bool,
    custom_format: &'a str,
}

#[derive(Serialize, Deserialize)]
struct EditRecord {
    target: EditTarget,
    buffer: String,
}

pub fn encode_state(state: &SessionState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StateRecord {
        projects: &state.plan(Day::Today).projects,
        next_day_projects: &state.plan(Day::Tomorrow).projects,
        include_next_day_plan: state.include_tomorrow,
        custom_format: &state.template,
    })
}

pub fn decode_state(raw: Option<&str>) -> SessionState {
    let Some(raw) = raw else {
        return SessionState::default();
    };
    let fields = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            warn!("session state is not an object ({}); using defaults", kind(&other));
            return SessionState::default();
        }
        Err(err) => {
            warn!("failed to parse session state: {err}; using defaults");
            return SessionState::default();
        }
    };

    let today: Vec<Project> = field_or_default(&fields, FIELD_PROJECTS);
    let tomorrow: Vec<Project> = field_or_default(&fields, FIELD_NEXT_DAY_PROJECTS);
    let include_tomorrow: bool = field_or_default(&fields, FIELD_INCLUDE_NEXT_DAY);
    let template = field_or(&fields, FIELD_TEMPLATE, || DEFAULT_TEMPLATE.to_string());

    SessionState::new(
        Plan::new(today),
        Plan::new(tomorrow),
        include_tomorrow,
        template,
    )
}

pub fn encode_edit(state: &EditState) -> Result<Option<String>, serde_json::Error> {
    match state {
        EditState::Idle => Ok(None),
        EditState::Editing { target, buffer } => serde_json::to_string(&EditRecord {
            target: *target,
            buffer: buffer.clone(),
        })
        .map(Some),
    }
}

pub fn decode_edit(raw: Option<&str>) -> EditState {
    let Some(raw) = raw else {
        return EditState::Idle;
    };
    match serde_json::from_str::<EditRecord>(raw) {
        Ok(record) => EditState::Editing {
            target: record.target,
            buffer: record.buffer,
        },
        Err(err) => {
            warn!("failed to parse edit state: {err}; treating as idle");
            EditState::Idle
        }
    }
}

fn field_or_default<T: DeserializeOwned + Default>(fields: &Map<String, Value>, name: &str) -> T {
    field_or(fields, name, T::default)
}

fn field_or<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    name: &str,
    fallback: impl FnOnce() -> T,
) -> T {
    match fields.get(name) {
        None | Some(Value::Null) => fallback(),
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("ignoring malformed session field `{name}`: {err}");
                fallback()
            }
        },
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::PlanStore;

    fn populated_state() -> SessionState {
        let mut store = PlanStore::new(SessionState::default(), 1_700_000_000_000);
        let launch = store.add_project(Day::Today, "Launch").expect("project");
        store.add_task(Day::Today, launch, "Write docs").expect("task");
        let ship = store.add_task(Day::Today, launch, "Ship").expect("task");
        store.edit_task(Day::Today, launch, ship, "Ship it ");
        let next = store.add_project(Day::Tomorrow, "Review").expect("project");
        store.rename_project(Day::Tomorrow, next, "Review PRs");
        store.add_project(Day::Today, "Empty").expect("project");
        store.set_include_tomorrow(true);
        store.set_template("{{greeting}}\n{{projects}}");
        store.state().clone()
    }

    #[test]
    fn state_survives_encode_decode() {
        let state = populated_state();
        let raw = encode_state(&state).expect("encode");
        assert_eq!(decode_state(Some(&raw)), state);

        let default = SessionState::default();
        let raw = encode_state(&default).expect("encode");
        assert_eq!(decode_state(Some(&raw)), default);
    }

    #[test]
    fn encoded_layout_uses_session_field_names() {
        let raw = encode_state(&populated_state()).expect("encode");
        let value: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["projects"][0]["name"], "Launch");
        assert_eq!(value["projects"][0]["tasks"][1]["text"], "Ship it ");
        assert_eq!(value["nextDayProjects"][0]["name"], "Review PRs");
        assert_eq!(value["includeNextDayPlan"], true);
        assert_eq!(value["customFormat"], "{{greeting}}\n{{projects}}");
    }

    #[test]
    fn missing_snapshot_yields_defaults() {
        assert_eq!(decode_state(None), SessionState::default());
        assert_eq!(decode_state(Some("{}")), SessionState::default());
        assert_eq!(decode_state(Some("not json")), SessionState::default());
        assert_eq!(decode_state(Some("[1, 2]")), SessionState::default());
    }

    #[test]
    fn malformed_field_falls_back_independently() {
        let raw = json!({
            "projects": [{"id": "oops"}],
            "nextDayProjects": [{"id": 5, "name": "Plan", "tasks": []}],
            "includeNextDayPlan": "yes",
            "customFormat": "{{projects}}"
        })
        .to_string();
        let state = decode_state(Some(&raw));
        assert!(state.plan(Day::Today).is_empty());
        assert_eq!(state.plan(Day::Tomorrow).projects[0].name, "Plan");
        assert!(!state.include_tomorrow);
        assert_eq!(state.template, "{{projects}}");
    }

    #[test]
    fn edit_state_round_trips_and_idle_clears() {
        let editing = EditState::Editing {
            target: EditTarget::Task {
                day: Day::Tomorrow,
                project_id: 10,
                task_id: 11,
            },
            buffer: "draft".to_string(),
        };
        let raw = encode_edit(&editing).expect("encode").expect("some");
        let value: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["target"]["kind"], "task");
        assert_eq!(value["target"]["day"], "tomorrow");
        assert_eq!(value["target"]["projectId"], 10);
        assert_eq!(decode_edit(Some(&raw)), editing);

        assert_eq!(encode_edit(&EditState::Idle).expect("encode"), None);
        assert_eq!(decode_edit(None), EditState::Idle);
        assert_eq!(decode_edit(Some("{")), EditState::Idle);
    }
}
