use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::EdgeKey;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Courses sharing a level that are placed side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub members: Vec<String>,
    /// Built from an OR-affinity group rather than a lone course.
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub key: EdgeKey,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub positions: BTreeMap<String, Position>,
    pub levels: BTreeMap<String, usize>,
    pub edges: Vec<EdgeLayout>,
    pub intersections: usize,
}
