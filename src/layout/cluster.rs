use std::collections::HashSet;

use super::graph::OrGroup;
use super::types::Cluster;

/// Splits every level bucket into clusters: OR-affinity groups with at least
/// two unclaimed members on that level first, then one cluster per remaining
/// course. Groups claim members in the order they were discovered.
pub(super) fn build_clusters(levels: &[Vec<&str>], or_groups: &[OrGroup]) -> Vec<Vec<Cluster>> {
    levels
        .iter()
        .map(|bucket| cluster_level(bucket, or_groups))
        .collect()
}

fn cluster_level(bucket: &[&str], or_groups: &[OrGroup]) -> Vec<Cluster> {
    let on_level: HashSet<&str> = bucket.iter().copied().collect();
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut grouped = Vec::new();

    for group in or_groups {
        let mut members: Vec<&str> = group
            .members
            .iter()
            .map(String::as_str)
            .filter(|id| on_level.contains(id) && !consumed.contains(id))
            .collect();
        members.sort_unstable();
        members.dedup();
        if members.len() < 2 {
            continue;
        }
        consumed.extend(members.iter().copied());
        grouped.push(Cluster {
            members: members.into_iter().map(str::to_string).collect(),
            grouped: true,
        });
    }

    let mut singles: Vec<Cluster> = bucket
        .iter()
        .filter(|id| !consumed.contains(*id))
        .map(|id| Cluster {
            members: vec![id.to_string()],
            grouped: false,
        })
        .collect();

    grouped.sort_by(|a, b| a.members[0].cmp(&b.members[0]));
    singles.sort_by(|a, b| a.members[0].cmp(&b.members[0]));
    grouped.extend(singles);
    grouped
}
