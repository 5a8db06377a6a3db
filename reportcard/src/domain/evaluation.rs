use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A graded assessment of one pupil in one subject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<f64>,
    #[serde(default)]
    pub matiere_id: Option<i64>,
    #[serde(default)]
    pub eleve_id: Option<i64>,
}

impl Entity for Evaluation {
    const ENTITY_NAME: &'static str = "evaluation";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
