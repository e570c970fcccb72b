use std::collections::{BTreeSet, HashMap};

use crate::config::LayoutConfig;

use super::graph::DependencyGraph;
use super::types::{Cluster, Position};

/// Index-based working state shared by the refiner and the minimizer.
#[derive(Debug, Clone)]
pub(super) struct Placement {
    pub ids: Vec<String>,
    pub level: Vec<usize>,
    pub x: Vec<f32>,
    /// Courses joined by an edge in either direction.
    pub neighbors: Vec<Vec<usize>>,
    pub level_members: Vec<Vec<usize>>,
    pub index: HashMap<String, usize>,
}

impl Placement {
    pub fn position(&self, idx: usize, config: &LayoutConfig) -> Position {
        Position::new(self.x[idx], self.level[idx] as f32 * config.level_height)
    }
}

fn wave_offset(index: usize, config: &LayoutConfig) -> f32 {
    (index as f32 * config.wave_frequency).sin() * config.wave_amplitude
}

/// Lays every level out left to right, centred on x = 0.
pub(super) fn initial_placement(
    clusters: &[Vec<Cluster>],
    graph: &DependencyGraph,
    config: &LayoutConfig,
) -> Placement {
    let mut ids = Vec::new();
    let mut level = Vec::new();
    let mut x = Vec::new();
    let mut level_members = Vec::with_capacity(clusters.len());

    for (rank, row) in clusters.iter().enumerate() {
        let count: usize = row.iter().map(|c| c.members.len()).sum();
        let mut members = Vec::with_capacity(count);
        if count == 0 {
            level_members.push(members);
            continue;
        }
        let total_width = count as f32 * config.node_width
            + (count - row.len()) as f32 * config.node_spacing
            + row.len().saturating_sub(1) as f32 * config.cluster_spacing;
        let mut cursor = -total_width / 2.0;
        let mut index_in_level = 0usize;

        for (cluster_idx, cluster) in row.iter().enumerate() {
            if cluster_idx > 0 {
                cursor += config.cluster_spacing;
            }
            for (member_idx, id) in cluster.members.iter().enumerate() {
                if member_idx > 0 {
                    cursor += config.node_spacing;
                }
                members.push(ids.len());
                ids.push(id.clone());
                level.push(rank);
                x.push(cursor + config.node_width / 2.0 + wave_offset(index_in_level, config));
                cursor += config.node_width;
                index_in_level += 1;
            }
        }
        level_members.push(members);
    }

    let index: HashMap<String, usize> = ids.iter().enumerate().map(|(idx, id)| (id.clone(), idx)).collect();
    let neighbors = ids
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            let linked: BTreeSet<usize> = graph
                .valid_prerequisites(id)
                .chain(graph.valid_dependents(id))
                .filter_map(|other| index.get(other).copied())
                .filter(|other| *other != idx)
                .collect();
            linked.into_iter().collect()
        })
        .collect();

    Placement {
        ids,
        level,
        x,
        neighbors,
        level_members,
        index,
    }
}

/// Fixed-budget relaxation: linked courses attract, same-level courses
/// closer than the minimum separation repel in proportion to the overlap.
/// Once the sweeps settle, [`enforce_separation`] spreads any courses the
/// relaxation left overlapping. Returns the number of sweeps performed.
pub(super) fn refine_positions(placement: &mut Placement, config: &LayoutConfig) -> usize {
    let refine = &config.refine;
    let min_separation = config.min_separation();
    let mut sweeps = 0usize;

    for _ in 0..refine.iterations {
        sweeps += 1;
        let mut largest_step = 0.0f32;

        for idx in 0..placement.ids.len() {
            let here = placement.x[idx];
            let mut force = 0.0f32;
            let mut contributions = 0usize;

            for &other in &placement.neighbors[idx] {
                force += (placement.x[other] - here) * refine.attraction;
                contributions += 1;
            }

            for &other in &placement.level_members[placement.level[idx]] {
                if other == idx {
                    continue;
                }
                let distance = here - placement.x[other];
                if distance.abs() >= min_separation {
                    continue;
                }
                let push = (min_separation - distance.abs()) * refine.repulsion;
                let away_right = if distance == 0.0 { idx > other } else { distance > 0.0 };
                force += if away_right { push } else { -push };
                contributions += 1;
            }

            if contributions == 0 {
                continue;
            }
            let delta = (force / contributions as f32 * refine.damping).clamp(-refine.max_step, refine.max_step);
            placement.x[idx] = here + delta;
            largest_step = largest_step.max(delta.abs());
        }

        if refine.plateau_epsilon > 0.0 && largest_step < refine.plateau_epsilon {
            break;
        }
    }

    if sweeps > 0 {
        enforce_separation(placement, min_separation);
    }
    tracing::debug!(sweeps, courses = placement.ids.len(), "horizontal refinement finished");
    sweeps
}

/// Walks each level in x order and pushes every course at least
/// `min_separation` right of its left neighbour, then shifts the level back so
/// its mean x is unchanged. Ties in x keep index order.
pub(super) fn enforce_separation(placement: &mut Placement, min_separation: f32) {
    let Placement { x, level_members, .. } = placement;
    for members in level_members.iter() {
        if members.len() < 2 {
            continue;
        }
        let mut order = members.clone();
        order.sort_by(|&a, &b| x[a].total_cmp(&x[b]).then(a.cmp(&b)));

        let count = members.len() as f32;
        let mean_before = members.iter().map(|&idx| x[idx]).sum::<f32>() / count;
        let mut previous = x[order[0]];
        for &idx in &order[1..] {
            let floor = previous + min_separation;
            if x[idx] < floor {
                x[idx] = floor;
            }
            previous = x[idx];
        }
        let shift = mean_before - members.iter().map(|&idx| x[idx]).sum::<f32>() / count;
        if shift != 0.0 {
            for &idx in members {
                x[idx] += shift;
            }
        }
    }
}
