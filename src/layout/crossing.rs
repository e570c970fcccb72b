use crate::config::LayoutConfig;

use super::refine::Placement;
use super::types::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct EdgeBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Bounding box of the source, target and both bezier control points of the
/// curve drawn from `source` to `target`.
pub(super) fn edge_box(source: Position, target: Position) -> EdgeBox {
    let dx = target.x - source.x;
    let bow = dx.abs() * 0.3;
    let c1 = (source.x + dx * 0.25, source.y + bow);
    let c2 = (target.x - dx * 0.25, target.y - bow);
    EdgeBox {
        min_x: source.x.min(target.x).min(c1.0).min(c2.0),
        max_x: source.x.max(target.x).max(c1.0).max(c2.0),
        min_y: source.y.min(target.y).min(c1.1).min(c2.1),
        max_y: source.y.max(target.y).max(c1.1).max(c2.1),
    }
}

pub(super) fn boxes_overlap(a: &EdgeBox, b: &EdgeBox) -> bool {
    !(a.max_x < b.min_x || b.max_x < a.min_x || a.max_y < b.min_y || b.max_y < a.min_y)
}

/// Edges meeting at a course never count as crossing each other.
fn share_endpoint(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 == b.0 || a.0 == b.1 || a.1 == b.0 || a.1 == b.1
}

pub(super) fn count_intersections(edges: &[(usize, usize)], boxes: &[EdgeBox]) -> usize {
    let mut count = 0usize;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if !share_endpoint(edges[i], edges[j]) && boxes_overlap(&boxes[i], &boxes[j]) {
                count += 1;
            }
        }
    }
    count
}

struct Search<'a> {
    edges: &'a [(usize, usize)],
    incident: Vec<Vec<usize>>,
    boxes: Vec<EdgeBox>,
    config: &'a LayoutConfig,
}

impl Search<'_> {
    fn box_with(&self, placement: &Placement, edge: usize, moved: usize, x: f32) -> EdgeBox {
        let (from, to) = self.edges[edge];
        let at = |idx: usize| {
            let mut pos = placement.position(idx, self.config);
            if idx == moved {
                pos.x = x;
            }
            pos
        };
        edge_box(at(from), at(to))
    }

    /// Crossings involving edges incident to `moved` when it sits at `x`.
    fn contribution(&self, placement: &Placement, moved: usize, x: f32) -> usize {
        let mut count = 0usize;
        for &edge in &self.incident[moved] {
            let candidate = self.box_with(placement, edge, moved, x);
            for (other, other_box) in self.boxes.iter().enumerate() {
                if self.incident[moved].contains(&other) || share_endpoint(self.edges[edge], self.edges[other]) {
                    continue;
                }
                if boxes_overlap(&candidate, other_box) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// True when moving `course` to `x` brings it nearer a same-level course that
/// is already, or would become, closer than `min_separation`.
fn crowds_level(placement: &Placement, course: usize, x: f32, min_separation: f32) -> bool {
    let here = placement.x[course];
    placement.level_members[placement.level[course]].iter().any(|&other| {
        if other == course {
            return false;
        }
        let after = (x - placement.x[other]).abs();
        after < min_separation && after < (here - placement.x[other]).abs()
    })
}

/// Local search over horizontal nudges. A nudge never crowds same-level
/// courses below the minimum separation. The returned count belongs to the
/// best configuration seen, which is what `placement` holds on return.
pub(super) fn minimize_intersections(
    placement: &mut Placement,
    edges: &[(usize, usize)],
    config: &LayoutConfig,
) -> usize {
    let minimize = &config.minimize;
    let min_separation = config.min_separation();
    let mut incident = vec![Vec::new(); placement.ids.len()];
    for (edge, &(from, to)) in edges.iter().enumerate() {
        incident[from].push(edge);
        if to != from {
            incident[to].push(edge);
        }
    }
    let boxes = edges
        .iter()
        .map(|&(from, to)| edge_box(placement.position(from, config), placement.position(to, config)))
        .collect::<Vec<_>>();
    let mut search = Search {
        edges,
        incident,
        boxes,
        config,
    };

    let mut total = count_intersections(edges, &search.boxes);
    let mut best_total = total;
    let mut best_x = placement.x.clone();
    let initial = total;

    for pass in 0..minimize.passes {
        if total <= minimize.target_intersections {
            break;
        }
        let mut moved_any = false;

        for course in 0..placement.ids.len() {
            if search.incident[course].is_empty() {
                continue;
            }
            let here = placement.x[course];
            let current = search.contribution(placement, course, here);
            let mut best_offset = 0.0f32;
            let mut lowest = total;
            let mut next = here;
            for &offset in &minimize.candidate_offsets {
                let landing = here + (offset * minimize.damping).clamp(-minimize.max_step, minimize.max_step);
                if crowds_level(placement, course, landing, min_separation) {
                    continue;
                }
                let trial = total - current + search.contribution(placement, course, here + offset);
                if trial < lowest {
                    lowest = trial;
                    best_offset = offset;
                    next = landing;
                }
            }
            if best_offset == 0.0 {
                continue;
            }

            let after = search.contribution(placement, course, next);
            placement.x[course] = next;
            for &edge in &search.incident[course] {
                let (from, to) = edges[edge];
                search.boxes[edge] = edge_box(placement.position(from, config), placement.position(to, config));
            }
            total = total - current + after;
            moved_any = true;

            if total < best_total {
                best_total = total;
                best_x.clone_from(&placement.x);
            }
        }

        tracing::trace!(pass, total, best_total, "intersection pass");
        if !moved_any {
            break;
        }
    }

    placement.x = best_x;
    tracing::debug!(initial, best = best_total, edges = edges.len(), "intersection minimization finished");
    best_total
}
