mod cluster;
mod crossing;
pub(crate) mod graph;
mod ranking;
mod refine;
pub mod routing;
pub(crate) mod types;
pub use graph::{DependencyGraph, OrGroup};
pub use types::*;
use cluster::*;
use crossing::*;
use ranking::*;
use refine::*;
use routing::*;

use crate::config::LayoutConfig;
use crate::ir::{Course, EdgeKey};

/// Forward/reverse adjacency and OR-affinity groups for `courses`.
pub fn dependency_graph(courses: &[Course], config: &LayoutConfig) -> DependencyGraph {
    graph::build_graph(&graph::unique_courses(courses), config.max_prerequisite_depth)
}

/// Positions every course. The result is a pure function of `courses` and
/// `config`: identical input always yields identical output.
pub fn compute_layout(courses: &[Course], config: &LayoutConfig) -> Layout {
    let unique = graph::unique_courses(courses);
    if unique.is_empty() {
        return Layout::default();
    }

    let graph = graph::build_graph(&unique, config.max_prerequisite_depth);
    let order: Vec<&str> = unique.iter().map(|course| course.id.as_str()).collect();
    let levels = compute_levels(&order, &graph);
    let buckets = group_by_level(&order, &levels);
    let clusters = build_clusters(&buckets, &graph.or_groups);
    tracing::debug!(
        courses = order.len(),
        levels = buckets.len(),
        clusters = clusters.iter().map(Vec::len).sum::<usize>(),
        "clusters built"
    );

    let mut placement = initial_placement(&clusters, &graph, config);
    refine_positions(&mut placement, config);

    let edge_ids = graph.edges();
    let edge_index: Vec<(usize, usize)> = edge_ids
        .iter()
        .filter_map(|(from, to)| Some((*placement.index.get(from)?, *placement.index.get(to)?)))
        .collect();
    let intersections = minimize_intersections(&mut placement, &edge_index, config);

    let positions = placement
        .ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.clone(), placement.position(idx, config)))
        .collect();

    let edges = edge_ids
        .iter()
        .zip(&edge_index)
        .enumerate()
        .map(|(routed, ((from, to), &(source, target)))| EdgeLayout {
            from: from.clone(),
            to: to.clone(),
            key: EdgeKey::new(from.clone(), to.clone()),
            points: flexible_waypoints(
                placement.position(source, config),
                placement.position(target, config),
                routed,
            ),
        })
        .collect();

    Layout {
        positions,
        levels,
        edges,
        intersections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Prerequisite;
    use std::collections::BTreeSet;

    fn sample() -> Vec<Course> {
        vec![
            Course::new("A"),
            Course::new("B").with_prerequisite(Prerequisite::leaf("A")),
            Course::new("C").with_prerequisite(Prerequisite::or(vec![
                Prerequisite::leaf("A"),
                Prerequisite::leaf("B"),
            ])),
            Course::new("D").with_prerequisite(Prerequisite::and(vec![
                Prerequisite::leaf("C"),
                Prerequisite::leaf("NOPE"),
            ])),
            Course::new("E"),
        ]
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let layout = compute_layout(&[], &LayoutConfig::default());
        assert!(layout.positions.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn every_course_gets_exactly_one_position() {
        let mut courses = sample();
        courses.push(Course::new("A"));
        let layout = compute_layout(&courses, &LayoutConfig::default());
        let ids: BTreeSet<&str> = layout.positions.keys().map(String::as_str).collect();
        assert_eq!(ids, BTreeSet::from(["A", "B", "C", "D", "E"]));
    }

    #[test]
    fn y_follows_level() {
        let config = LayoutConfig::default();
        let layout = compute_layout(&sample(), &config);
        for (id, pos) in &layout.positions {
            assert_eq!(pos.y, layout.levels[id] as f32 * config.level_height, "{id}");
        }
        assert_eq!(layout.levels["A"], 0);
        assert_eq!(layout.levels["B"], 1);
        assert_eq!(layout.levels["C"], 2);
        assert_eq!(layout.levels["D"], 3);
        assert_eq!(layout.levels["E"], 0);
    }

    #[test]
    fn layout_is_idempotent() {
        let config = LayoutConfig::default();
        let first = compute_layout(&sample(), &config);
        let second = compute_layout(&sample(), &config);
        assert_eq!(first.positions, second.positions);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn edges_skip_dangling_references() {
        let layout = compute_layout(&sample(), &LayoutConfig::default());
        let keys: Vec<String> = layout.edges.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["A-B", "A-C", "B-C", "C-D"]);
        assert!(layout.edges.iter().all(|e| e.points.len() == 5));
    }

    #[test]
    fn same_level_courses_do_not_stack() {
        let courses: Vec<Course> = (0..6).map(|i| Course::new(format!("L{i}"))).collect();
        let config = LayoutConfig::default();
        let layout = compute_layout(&courses, &config);
        let mut xs: Vec<f32> = layout.positions.values().map(|p| p.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= config.node_width, "{pair:?}");
        }
    }

    #[test]
    fn dependents_of_one_course_do_not_overlap() {
        let mut courses = vec![Course::new("P")];
        courses.extend((0..10).map(|i| Course::new(format!("K{i:02}")).with_prerequisite(Prerequisite::leaf("P"))));
        let config = LayoutConfig::default();
        let layout = compute_layout(&courses, &config);
        let mut xs: Vec<f32> = layout
            .positions
            .iter()
            .filter(|(id, _)| id.starts_with('K'))
            .map(|(_, p)| p.x)
            .collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= config.node_width, "{pair:?}");
        }
    }

    #[test]
    fn cyclic_catalogue_still_lays_out() {
        let courses = vec![
            Course::new("A").with_prerequisite(Prerequisite::leaf("B")),
            Course::new("B").with_prerequisite(Prerequisite::leaf("A")),
        ];
        let layout = compute_layout(&courses, &LayoutConfig::default());
        assert_eq!(layout.positions.len(), 2);
        assert!(layout.positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn dependency_graph_exposes_or_groups() {
        let graph = dependency_graph(&sample(), &LayoutConfig::default());
        assert_eq!(graph.or_groups.len(), 1);
        assert_eq!(graph.or_groups[0].target, "C");
    }
}
