use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::ir::{Course, Prerequisite};

/// Leaf ids that appear side by side under one `Or` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrGroup {
    pub target: String,
    /// Pre-order index of the `Or` node within the target's tree.
    pub occurrence: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub forward: BTreeMap<String, BTreeSet<String>>,
    pub reverse: BTreeMap<String, BTreeSet<String>>,
    pub or_groups: Vec<OrGroup>,
}

impl DependencyGraph {
    pub fn contains(&self, id: &str) -> bool {
        self.forward.contains_key(id)
    }

    /// Prerequisites of `id` that are themselves courses in the graph.
    pub fn valid_prerequisites<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a String> + 'a {
        self.forward
            .get(id)
            .into_iter()
            .flatten()
            .filter(|prereq| self.contains(prereq))
    }

    /// Dependents of `id` that are courses in the graph.
    pub fn valid_dependents<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a String> + 'a {
        self.reverse
            .get(id)
            .into_iter()
            .flatten()
            .filter(|target| self.contains(target))
    }

    /// Every `(prereq, target)` pair with both ends in the graph, ordered by
    /// target then prereq.
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for target in self.forward.keys() {
            for prereq in self.valid_prerequisites(target) {
                out.push((prereq.clone(), target.clone()));
            }
        }
        out
    }
}

/// First occurrence of every id, in input order.
pub fn unique_courses(courses: &[Course]) -> Vec<&Course> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(courses.len());
    for course in courses {
        if seen.insert(course.id.as_str()) {
            out.push(course);
        } else {
            tracing::debug!(id = %course.id, "duplicate course id ignored");
        }
    }
    out
}

pub fn build_graph(courses: &[&Course], max_depth: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::default();
    for course in courses {
        graph.forward.entry(course.id.clone()).or_default();
        graph.reverse.entry(course.id.clone()).or_default();
    }

    for course in courses {
        let Some(expr) = course.prerequisite.as_ref() else {
            continue;
        };
        let mut occurrence = 0usize;
        extract(&mut graph, &course.id, expr, 0, max_depth, &mut occurrence);
    }

    graph
}

fn extract(
    graph: &mut DependencyGraph,
    target: &str,
    expr: &Prerequisite,
    depth: usize,
    max_depth: usize,
    occurrence: &mut usize,
) {
    match expr {
        Prerequisite::Leaf { value } => {
            graph
                .forward
                .entry(target.to_string())
                .or_default()
                .insert(value.clone());
            graph
                .reverse
                .entry(value.clone())
                .or_default()
                .insert(target.to_string());
        }
        Prerequisite::And { items } | Prerequisite::Or { items } => {
            if depth >= max_depth {
                tracing::warn!(course = target, depth, "prerequisite tree exceeds depth cap; truncating");
                return;
            }
            if matches!(expr, Prerequisite::Or { .. }) {
                let members: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Prerequisite::Leaf { value } => Some(value.clone()),
                        _ => None,
                    })
                    .collect();
                if !members.is_empty() {
                    graph.or_groups.push(OrGroup {
                        target: target.to_string(),
                        occurrence: *occurrence,
                        members,
                    });
                }
                *occurrence += 1;
            }
            for item in items {
                extract(graph, target, item, depth + 1, max_depth, occurrence);
            }
        }
    }
}
