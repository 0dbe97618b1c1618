//! Generated instance entities.
//!
//! An `Instance` is one dated obligation materialized from a pattern,
//! together with its hydrated checklist. Instances are independent
//! historical facts from the moment they are created: deleting the
//! generating pattern clears their back-reference but never removes them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::fields::TaskState;

/// A dated obligation produced from a pattern for one occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: u64,
    pub title: String,
    pub stakeholder: Option<String>,
    pub goal: Option<String>,
    pub due: NaiveDate,
    pub time_of_day: Option<NaiveTime>,
    pub timezone: Option<String>,
    pub notes: Option<String>,
    /// Identity of the generating pattern. Nullable: set to `None` when
    /// that pattern is deleted, never cascaded.
    pub pattern_id: Option<u64>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub tasks: Vec<InstanceTask>,
    pub created_at_utc: i64,
}

/// A live copy of one task template, carrying completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceTask {
    pub title: String,
    pub scope: Option<String>,
    pub order: u32,
    pub state: TaskState,
    #[serde(default)]
    pub subitems: Vec<SubItem>,
}

/// A checklist sub-item on a generated task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubItem {
    pub text: String,
    pub completed: bool,
}
