use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A taught subject and its weight in the overall average
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matiere {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coefficient: Option<f64>,
}

impl Entity for Matiere {
    const ENTITY_NAME: &'static str = "matiere";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
