use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// Enrolment of a pupil in a class for one school year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inscrire {
    #[serde(default)]
    pub id: Option<i64>,
    /// e.g. "2025-2026"
    #[serde(default)]
    pub school_year: Option<String>,
    #[serde(default)]
    pub eleve_id: Option<i64>,
    #[serde(default)]
    pub classe_id: Option<i64>,
}

impl Entity for Inscrire {
    const ENTITY_NAME: &'static str = "inscrire";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
