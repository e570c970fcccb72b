use std::collections::BTreeMap;

use coursemap::config::parse_config;
use coursemap::{Position, compute_layout, find_prerequisite_paths, parse_catalogue};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutResponse {
    positions: BTreeMap<String, Position>,
    levels: BTreeMap<String, usize>,
    edges: Vec<String>,
    intersections: usize,
}

fn layout_json(courses_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let courses = parse_catalogue(courses_json).map_err(|error| error.to_string())?;
    let config = match config_json {
        Some(raw) => parse_config(raw).map_err(|error| error.to_string())?,
        None => Default::default(),
    };
    let layout = compute_layout(&courses, &config.layout);
    let response = LayoutResponse {
        edges: layout.edges.iter().map(|edge| edge.key.to_string()).collect(),
        positions: layout.positions,
        levels: layout.levels,
        intersections: layout.intersections,
    };
    serde_json::to_string(&response).map_err(|error| error.to_string())
}

fn paths_json(selected: &str, courses_json: &str) -> Result<String, String> {
    let courses = parse_catalogue(courses_json).map_err(|error| error.to_string())?;
    let keys: Vec<String> = find_prerequisite_paths(selected, &courses)
        .iter()
        .map(ToString::to_string)
        .collect();
    serde_json::to_string(&keys).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn compute_layout_json(courses_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    layout_json(courses_json, config_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn find_prerequisite_paths_json(selected: &str, courses_json: &str) -> Result<String, JsValue> {
    paths_json(selected, courses_json).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = r#"{"courses": [
        {"id": "CS101"},
        {"id": "CS102", "Prerequisite": {"prerequisites": [{"type": "course", "value": "CS101"}]}},
        {"id": "CS201", "Prerequisite": {"prerequisites": [
            {"type": "OR", "items": [
                {"type": "course", "value": "CS102"},
                {"type": "course", "value": "MA101"}
            ]}
        ]}}
    ]}"#;

    #[test]
    fn layout_response_covers_every_course() {
        let json = layout_json(CATALOGUE, Some("{ refine: { iterations: 50 } }")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let positions = value["positions"].as_object().unwrap();
        assert_eq!(positions.len(), 3);
        assert_eq!(value["levels"]["CS201"], 2);
        assert_eq!(value["edges"], serde_json::json!(["CS101-CS102", "CS102-CS201"]));
    }

    #[test]
    fn paths_response_lists_highlighted_keys() {
        let json = paths_json("CS102", CATALOGUE).unwrap();
        assert_eq!(json, r#"["CS101-CS102","CS102-CS201"]"#);
    }

    #[test]
    fn malformed_catalogue_reports_error() {
        assert!(layout_json("not json", None).is_err());
    }
}
