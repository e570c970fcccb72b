use super::types::Position;

const ENDPOINT_INSET: f32 = 25.0;
const MAX_CURVATURE: f32 = 100.0;
const CROWDED_EDGE_COUNT: usize = 10;

/// Five waypoints for a flexible curved edge from `source` to `target`.
///
/// Curvature grows with distance up to a cap and by half again once more than
/// ten edges have already been routed, so busy diagrams bow their edges apart.
pub fn flexible_waypoints(source: Position, target: Position, existing_edges: usize) -> Vec<(f32, f32)> {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let distance = (dx * dx + dy * dy).sqrt();

    let mut curvature = (distance * 0.25).min(MAX_CURVATURE);
    if existing_edges > CROWDED_EDGE_COUNT {
        curvature *= 1.5;
    }

    let mid_x = source.x + dx * 0.5;
    let mid_y = source.y + dy * 0.5;
    let horizontal = if dx > 0.0 { curvature } else { -curvature };
    let vertical = if dy.abs() > 150.0 { curvature * 0.6 } else { curvature * 0.8 };

    vec![
        (source.x, source.y + ENDPOINT_INSET),
        (source.x + dx * 0.2, source.y + vertical),
        (mid_x + horizontal, mid_y),
        (target.x - dx * 0.2, target.y - vertical),
        (target.x, target.y - ENDPOINT_INSET),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_down_edge_bows_left() {
        let points = flexible_waypoints(Position::new(0.0, 0.0), Position::new(0.0, 280.0), 0);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], (0.0, 25.0));
        assert_eq!(points[4], (0.0, 255.0));
        // distance 280 -> curvature 70, |dy| > 150 -> vertical 42.
        assert_eq!(points[2], (-70.0, 140.0));
        assert!((points[1].1 - 42.0).abs() < 1e-4);
    }

    #[test]
    fn curvature_is_capped_then_boosted_when_crowded() {
        let source = Position::new(0.0, 0.0);
        let target = Position::new(1000.0, 0.0);
        let quiet = flexible_waypoints(source, target, 3);
        let busy = flexible_waypoints(source, target, 11);
        assert_eq!(quiet[2], (600.0, 0.0));
        assert_eq!(busy[2], (650.0, 0.0));
    }
}
