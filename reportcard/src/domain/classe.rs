use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A school class (e.g. "CM2")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classe {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Entity for Classe {
    const ENTITY_NAME: &'static str = "classe";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_path() {
        assert_eq!(Classe::collection_path(), "/api/classes");
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let classe: Classe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(classe, Classe::default());
    }
}
