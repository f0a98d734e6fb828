use serde::{Deserialize, Serialize};

use crate::models::{
    non_blank, parse_id_field, Entity, FieldViolation, Form, FormError, Validate, ViolationKind,
};

pub const TITLE_MIN_LENGTH: usize = 15;
pub const TITLE_MAX_LENGTH: usize = 300;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Job {
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for Job {
    const RESOURCE_PATH: &'static str = "api/jobs";
    const ROUTE: &'static str = "job";
    const PAGE_TITLE: &'static str = "Jobs";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Validate for Job {
    /// Title is required and must be 15–300 characters long.
    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        match self.title.as_deref() {
            None | Some("") => violations.push(FieldViolation {
                field: "title",
                kind: ViolationKind::Required,
            }),
            Some(title) => {
                let actual = title.chars().count();
                if actual < TITLE_MIN_LENGTH {
                    violations.push(FieldViolation {
                        field: "title",
                        kind: ViolationKind::MinLength {
                            min: TITLE_MIN_LENGTH,
                            actual,
                        },
                    });
                } else if actual > TITLE_MAX_LENGTH {
                    violations.push(FieldViolation {
                        field: "title",
                        kind: ViolationKind::MaxLength {
                            max: TITLE_MAX_LENGTH,
                            actual,
                        },
                    });
                }
            }
        }
        violations
    }
}

impl Form for Job {
    const FIELDS: &'static [&'static str] = &["id", "title", "description"];

    fn set_field(&mut self, field: &str, value: Option<&str>) -> Result<(), FormError> {
        match field {
            "id" => self.id = parse_id_field(field, value)?,
            "title" => self.title = non_blank(value).map(str::to_string),
            "description" => self.description = non_blank(value).map(str::to_string),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}
