use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A pupil
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eleve {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl Entity for Eleve {
    const ENTITY_NAME: &'static str = "eleve";

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
    fn test_camel_case_fields_and_iso_dates() {
        let eleve: Eleve = serde_json::from_value(json!({
            "firstName": "Awa",
            "lastName": "Diop",
            "dateOfBirth": "2014-03-09"
        }))
        .unwrap();

        assert_eq!(eleve.first_name.as_deref(), Some("Awa"));
        assert_eq!(eleve.date_of_birth, NaiveDate::from_ymd_opt(2014, 3, 9));

        let value = serde_json::to_value(&eleve).unwrap();
        assert_eq!(value["dateOfBirth"], "2014-03-09");
        assert_eq!(value["id"], serde_json::Value::Null);
    }
}
