use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const YEAR_MIN: i64 = 1900;
pub const YEAR_MAX: i64 = 2050;

const MSG_REQUIRED: &str = "This field is required.";
const MSG_NULL: &str = "May not be null.";
const MSG_STRING: &str = "Must be a string.";
const MSG_BLANK: &str = "Must not be blank.";
const MSG_NUMBER: &str = "Must be a number.";
const MSG_INTEGER: &str = "Must be an integer.";

/// Marvel 角色记录：id 由存储层分配，其余字段来自请求或种子数据
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub year: Option<i64>,
    pub appearances: Option<i64>,
}

/// 创建/更新输入模型：不包含 id，由服务端生成或从路径强制指定
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CharacterInput {
    pub name: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub appearances: Option<i64>,
}

/// Field name → message, collected across the whole payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl CharacterInput {
    pub fn new(name: impl Into<String>, year: Option<i64>, appearances: Option<i64>) -> Self {
        Self { name: name.into(), year, appearances }
    }

    /// Schema-driven parse of a raw JSON body.
    ///
    /// Type checks every known field, collects all failures, then applies the
    /// value rules from [`CharacterInput::validate`]. Unknown keys are ignored
    /// and a caller-supplied `id` is type checked but otherwise discarded.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(obj) = body.as_object() else {
            errors.add("body", "Must be an object.");
            return Err(errors);
        };

        if let Err(msg) = optional_integer(obj, "id") {
            errors.add("id", msg);
        }
        let name = match obj.get("name") {
            None => {
                errors.add("name", MSG_REQUIRED);
                None
            }
            Some(Value::Null) => {
                errors.add("name", MSG_NULL);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                errors.add("name", MSG_STRING);
                None
            }
        };
        let year = optional_integer(obj, "year").unwrap_or_else(|msg| {
            errors.add("year", msg);
            None
        });
        let appearances = optional_integer(obj, "appearances").unwrap_or_else(|msg| {
            errors.add("appearances", msg);
            None
        });

        let input = Self { name: name.unwrap_or_default(), year, appearances };
        if let Err(value_errors) = input.validate() {
            for (field, msg) in value_errors.0 {
                errors.add(&field, msg);
            }
        }
        errors.into_result().map(|_| input)
    }

    /// Value rules shared by create and update: non-blank name, year in range.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", MSG_BLANK);
        }
        if let Some(year) = self.year {
            if year < YEAR_MIN {
                errors.add("year", format!("Must be greater than or equal to {YEAR_MIN}."));
            } else if year > YEAR_MAX {
                errors.add("year", format!("Must be less than or equal to {YEAR_MAX}."));
            }
        }
        errors.into_result()
    }

    pub fn into_character(self, id: i64) -> Character {
        Character { id, name: self.name, year: self.year, appearances: self.appearances }
    }
}

/// Missing and null both mean "no value"; booleans are not numbers.
fn optional_integer(obj: &Map<String, Value>, field: &str) -> Result<Option<i64>, &'static str> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => integral(n).map(Some).ok_or(MSG_INTEGER),
        Some(_) => Err(MSG_NUMBER),
    }
}

pub(crate) fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}
