use serde::{Deserialize, Serialize};

use crate::models::{non_blank, parse_id_field, Entity, FieldViolation, Form, FormError, Validate};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sales {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Sales {
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for Sales {
    const RESOURCE_PATH: &'static str = "api/sales";
    const ROUTE: &'static str = "sales";
    const PAGE_TITLE: &'static str = "Sales";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

// No constraints on any field.
impl Validate for Sales {
    fn validate(&self) -> Vec<FieldViolation> {
        Vec::new()
    }
}

impl Form for Sales {
    const FIELDS: &'static [&'static str] = &["id", "title"];

    fn set_field(&mut self, field: &str, value: Option<&str>) -> Result<(), FormError> {
        match field {
            "id" => self.id = parse_id_field(field, value)?,
            "title" => self.title = non_blank(value).map(str::to_string),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}
