use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::ir::{Course, Prerequisite};

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalogue must be an array of courses or an object with a \"courses\" array")]
    Shape,
    #[error("course at index {index} has an empty id")]
    EmptyId { index: usize },
}

/// Prerequisite block as the web client stores it: a list read as an
/// implicit AND.
#[derive(Debug, Default, Deserialize)]
struct PrerequisiteBlock {
    #[serde(default)]
    prerequisites: Vec<Prerequisite>,
}

#[derive(Debug, Deserialize)]
struct RawCourse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    units: Option<f32>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    prerequisite: Option<Prerequisite>,
    #[serde(default, rename = "Prerequisite")]
    prerequisite_block: Option<PrerequisiteBlock>,
    #[serde(default)]
    incompatible: Vec<String>,
}

impl RawCourse {
    fn into_course(self, index: usize) -> Result<Course, CatalogueError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(CatalogueError::EmptyId { index });
        }
        let prerequisite = self
            .prerequisite
            .or_else(|| self.prerequisite_block.and_then(flatten_block));
        Ok(Course {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            description: self.description,
            units: self.units,
            color: self.color,
            prerequisite,
            incompatible: self.incompatible,
        })
    }
}

fn flatten_block(block: PrerequisiteBlock) -> Option<Prerequisite> {
    let mut items = block.prerequisites;
    match items.len() {
        0 => None,
        1 => items.pop(),
        _ => Some(Prerequisite::and(items)),
    }
}

pub fn parse_catalogue(input: &str) -> Result<Vec<Course>, CatalogueError> {
    let value: Value = serde_json::from_str(input)?;
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("courses").ok_or(CatalogueError::Shape)?,
        _ => return Err(CatalogueError::Shape),
    };
    if !list.is_array() {
        return Err(CatalogueError::Shape);
    }
    let raw: Vec<RawCourse> = serde_json::from_value(list)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, course)| course.into_course(index))
        .collect()
}

pub fn load_catalogue(path: &Path) -> Result<Vec<Course>, CatalogueError> {
    let contents = std::fs::read_to_string(path)?;
    parse_catalogue(&contents)
}
