use std::collections::{BTreeMap, HashMap};

use super::graph::DependencyGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done(usize),
}

struct Frame {
    node: usize,
    next: usize,
    level: usize,
}

/// Prerequisite depth of every course in `order`.
///
/// A prerequisite found on the current DFS stack contributes level 0, so a
/// cycle `A -> B -> A` gives the course entered second level 1 and the first
/// level 2. The walk keeps its own stack, so deep chains cannot exhaust the
/// thread stack.
pub(super) fn compute_levels(order: &[&str], graph: &DependencyGraph) -> BTreeMap<String, usize> {
    let index: HashMap<&str, usize> = order.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();
    let prereqs: Vec<Vec<usize>> = order
        .iter()
        .map(|id| {
            graph
                .valid_prerequisites(id)
                .filter_map(|prereq| index.get(prereq.as_str()).copied())
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; order.len()];
    let mut stack: Vec<Frame> = Vec::new();
    let mut cycles = 0usize;

    for root in 0..order.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push(Frame {
            node: root,
            next: 0,
            level: 0,
        });

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = prereqs[frame.node].get(frame.next) {
                frame.next += 1;
                match marks[child] {
                    Mark::OnStack => {
                        cycles += 1;
                        tracing::debug!(
                            course = order[frame.node],
                            prerequisite = order[child],
                            "prerequisite cycle detected"
                        );
                        frame.level = frame.level.max(1);
                    }
                    Mark::Done(level) => frame.level = frame.level.max(level + 1),
                    Mark::Unvisited => {
                        marks[child] = Mark::OnStack;
                        stack.push(Frame {
                            node: child,
                            next: 0,
                            level: 0,
                        });
                    }
                }
                continue;
            }

            let done = stack.pop().map(|frame| (frame.node, frame.level));
            if let Some((node, level)) = done {
                marks[node] = Mark::Done(level);
                if let Some(parent) = stack.last_mut() {
                    parent.level = parent.level.max(level + 1);
                }
            }
        }
    }

    if cycles > 0 {
        tracing::debug!(cycles, "levels assigned with cycles broken");
    }

    order
        .iter()
        .zip(marks)
        .map(|(id, mark)| {
            let level = match mark {
                Mark::Done(level) => level,
                _ => 0,
            };
            (id.to_string(), level)
        })
        .collect()
}

/// Course ids bucketed by level, each bucket in input order.
pub(super) fn group_by_level<'a>(order: &[&'a str], levels: &BTreeMap<String, usize>) -> Vec<Vec<&'a str>> {
    let depth = levels.values().copied().max().map_or(0, |max| max + 1);
    let mut buckets: Vec<Vec<&'a str>> = vec![Vec::new(); depth];
    for id in order {
        let level = levels.get(*id).copied().unwrap_or(0);
        buckets[level].push(*id);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Course, Prerequisite};
    use crate::layout::graph::{build_graph, unique_courses};

    fn levels_of(courses: &[Course]) -> BTreeMap<String, usize> {
        let unique = unique_courses(courses);
        let graph = build_graph(&unique, 64);
        let order: Vec<&str> = unique.iter().map(|c| c.id.as_str()).collect();
        compute_levels(&order, &graph)
    }

    #[test]
    fn levels_follow_longest_prerequisite_chain() {
        let courses = vec![
            Course::new("D").with_prerequisite(Prerequisite::and(vec![
                Prerequisite::leaf("B"),
                Prerequisite::leaf("C"),
            ])),
            Course::new("A"),
            Course::new("B").with_prerequisite(Prerequisite::leaf("A")),
            Course::new("C").with_prerequisite(Prerequisite::leaf("B")),
        ];
        let levels = levels_of(&courses);
        assert_eq!(levels["A"], 0);
        assert_eq!(levels["B"], 1);
        assert_eq!(levels["C"], 2);
        assert_eq!(levels["D"], 3);
    }

    #[test]
    fn dangling_only_prerequisites_mean_level_zero() {
        let courses = vec![Course::new("X").with_prerequisite(Prerequisite::leaf("MISSING"))];
        assert_eq!(levels_of(&courses)["X"], 0);
    }

    #[test]
    fn mutual_cycle_terminates_deterministically() {
        let courses = vec![
            Course::new("A").with_prerequisite(Prerequisite::leaf("B")),
            Course::new("B").with_prerequisite(Prerequisite::leaf("A")),
        ];
        let levels = levels_of(&courses);
        assert_eq!(levels["B"], 1);
        assert_eq!(levels["A"], 2);
        assert_eq!(levels, levels_of(&courses));
    }

    #[test]
    fn self_reference_terminates() {
        let courses = vec![Course::new("S").with_prerequisite(Prerequisite::leaf("S"))];
        assert_eq!(levels_of(&courses)["S"], 1);
    }

    #[test]
    fn long_chain_does_not_recurse_on_thread_stack() {
        let mut courses = vec![Course::new("C0")];
        for idx in 1..20_000 {
            courses.push(
                Course::new(format!("C{idx}")).with_prerequisite(Prerequisite::leaf(format!("C{}", idx - 1))),
            );
        }
        courses.reverse();
        let levels = levels_of(&courses);
        assert_eq!(levels["C19999"], 19_999);
    }

    #[test]
    fn buckets_keep_input_order() {
        let courses = vec![
            Course::new("Z"),
            Course::new("M").with_prerequisite(Prerequisite::leaf("Z")),
            Course::new("A"),
        ];
        let unique = unique_courses(&courses);
        let graph = build_graph(&unique, 64);
        let order: Vec<&str> = unique.iter().map(|c| c.id.as_str()).collect();
        let levels = compute_levels(&order, &graph);
        assert_eq!(group_by_level(&order, &levels), vec![vec!["Z", "A"], vec!["M"]]);
    }
}
