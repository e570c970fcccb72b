use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean prerequisite expression over course ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Prerequisite {
    #[serde(rename = "course")]
    Leaf { value: String },
    #[serde(rename = "AND")]
    And { items: Vec<Prerequisite> },
    #[serde(rename = "OR")]
    Or { items: Vec<Prerequisite> },
}

impl Prerequisite {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self::Leaf { value: id.into() }
    }

    pub fn and(items: Vec<Prerequisite>) -> Self {
        Self::And { items }
    }

    pub fn or(items: Vec<Prerequisite>) -> Self {
        Self::Or { items }
    }

    /// Returns true when `id` appears as a leaf anywhere below this node.
    /// Nodes nested deeper than `max_depth` are not inspected.
    pub fn references(&self, id: &str, max_depth: usize) -> bool {
        let mut stack = vec![(self, 0usize)];
        while let Some((expr, depth)) = stack.pop() {
            match expr {
                Prerequisite::Leaf { value } => {
                    if value == id {
                        return true;
                    }
                }
                Prerequisite::And { items } | Prerequisite::Or { items } => {
                    if depth >= max_depth {
                        continue;
                    }
                    stack.extend(items.iter().map(|item| (item, depth + 1)));
                }
            }
        }
        false
    }

    /// Leaf ids in pre-order, descending at most `max_depth` combinator levels.
    pub fn leaves(&self, max_depth: usize) -> Vec<&str> {
        let mut out = Vec::new();
        collect_leaves(self, 0, max_depth, &mut out);
        out
    }
}

fn collect_leaves<'a>(expr: &'a Prerequisite, depth: usize, max_depth: usize, out: &mut Vec<&'a str>) {
    match expr {
        Prerequisite::Leaf { value } => out.push(value.as_str()),
        Prerequisite::And { items } | Prerequisite::Or { items } => {
            if depth >= max_depth {
                tracing::warn!(depth, "prerequisite expression exceeds depth cap; truncating");
                return;
            }
            for item in items {
                collect_leaves(item, depth + 1, max_depth, out);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub units: Option<f32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub prerequisite: Option<Prerequisite>,
    /// Mutually exclusive courses. Carried for consumers, never laid out as edges.
    #[serde(default)]
    pub incompatible: Vec<String>,
}

impl Course {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Default::default()
        }
    }

    pub fn with_prerequisite(mut self, prerequisite: Prerequisite) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }
}

/// Directed prerequisite relationship, rendered as `"prereq-target"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub prereq: String,
    pub target: String,
}

impl EdgeKey {
    pub fn new(prereq: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prereq: prereq.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prereq, self.target)
    }
}
