use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::DEFAULT_MAX_PREREQUISITE_DEPTH;
use crate::ir::{Course, EdgeKey};

/// Edges to highlight when `selected` is picked: every prerequisite edge on a
/// path leading into it, plus one edge to each course that lists it directly.
///
/// Ids outside `courses` never match. An empty or unknown selection yields an
/// empty set.
pub fn find_prerequisite_paths(selected: &str, courses: &[Course]) -> BTreeSet<EdgeKey> {
    find_prerequisite_paths_with_depth(selected, courses, DEFAULT_MAX_PREREQUISITE_DEPTH)
}

pub fn find_prerequisite_paths_with_depth(
    selected: &str,
    courses: &[Course],
    max_depth: usize,
) -> BTreeSet<EdgeKey> {
    let mut by_id: HashMap<&str, &Course> = HashMap::with_capacity(courses.len());
    for course in courses {
        by_id.entry(course.id.as_str()).or_insert(course);
    }

    let mut paths = BTreeSet::new();
    if selected.is_empty() || !by_id.contains_key(selected) {
        return paths;
    }

    collect_ancestors(selected, &by_id, max_depth, &mut paths);
    collect_dependents(selected, courses, &by_id, max_depth, &mut paths);
    paths
}

/// Depth-first walk through prerequisite trees. A course reached again is not
/// expanded a second time: its edges were emitted on the first visit, which
/// also keeps cycles from re-entering the current path.
fn collect_ancestors(
    selected: &str,
    by_id: &HashMap<&str, &Course>,
    max_depth: usize,
    paths: &mut BTreeSet<EdgeKey>,
) {
    let mut expanded: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![selected];

    while let Some(current) = stack.pop() {
        if !expanded.insert(current) {
            continue;
        }
        let Some(expr) = by_id.get(current).and_then(|course| course.prerequisite.as_ref()) else {
            continue;
        };
        for leaf in expr.leaves(max_depth).into_iter().rev() {
            let Some(prereq) = by_id.get(leaf) else {
                continue;
            };
            paths.insert(EdgeKey::new(leaf, current));
            stack.push(prereq.id.as_str());
        }
    }
}

/// Direct dependents only; their own dependents are not followed.
fn collect_dependents(
    selected: &str,
    courses: &[Course],
    by_id: &HashMap<&str, &Course>,
    max_depth: usize,
    paths: &mut BTreeSet<EdgeKey>,
) {
    for course in courses {
        // Later duplicates of an id are shadowed by the first occurrence.
        if !by_id.get(course.id.as_str()).is_some_and(|first| std::ptr::eq(*first, course)) {
            continue;
        }
        let Some(expr) = course.prerequisite.as_ref() else {
            continue;
        };
        if expr.references(selected, max_depth) {
            paths.insert(EdgeKey::new(selected, course.id.as_str()));
        }
    }
}
