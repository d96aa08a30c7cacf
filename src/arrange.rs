use crate::geometry::{Position, Rect, bounding_box};
use crate::layout::Axis;

/// Edge or center the selection aligns on. The reference coordinate always
/// comes from the selection's own bounding box, never an external anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignDirection {
    Left,
    CenterX,
    Right,
    Top,
    CenterY,
    Bottom,
}

/// New positions that give every selected node the shared reference
/// coordinate. Empty below 2 nodes: a degenerate selection is a no-op, not
/// an error.
pub fn align(selected: &[(String, Rect)], direction: AlignDirection) -> Vec<(String, Position)> {
    if selected.len() < 2 {
        return Vec::new();
    }
    let bbox = bounding_box(selected.iter().map(|(_, rect)| *rect))
        .expect("non-empty selection has a bounding box");

    selected
        .iter()
        .map(|(id, rect)| {
            let position = match direction {
                AlignDirection::Left => Position::new(bbox.left(), rect.y),
                AlignDirection::CenterX => {
                    Position::new(bbox.center_x() - rect.width / 2.0, rect.y)
                }
                AlignDirection::Right => Position::new(bbox.right() - rect.width, rect.y),
                AlignDirection::Top => Position::new(rect.x, bbox.top()),
                AlignDirection::CenterY => {
                    Position::new(rect.x, bbox.center_y() - rect.height / 2.0)
                }
                AlignDirection::Bottom => Position::new(rect.x, bbox.bottom() - rect.height),
            };
            (id.clone(), position)
        })
        .collect()
}

/// Even spacing along one axis. The extremes anchor the distribution and are
/// not moved; interior nodes are re-placed so every consecutive gap equals
/// `(span - total size) / (count - 1)`. Empty below 3 nodes.
pub fn distribute(selected: &[(String, Rect)], axis: Axis) -> Vec<(String, Position)> {
    if selected.len() < 3 {
        return Vec::new();
    }

    let mut ordered: Vec<&(String, Rect)> = selected.iter().collect();
    match axis {
        Axis::Horizontal => ordered.sort_by(|a, b| a.1.x.total_cmp(&b.1.x)),
        Axis::Vertical => ordered.sort_by(|a, b| a.1.y.total_cmp(&b.1.y)),
    }

    let first = ordered.first().expect("len checked above").1;
    let last = ordered.last().expect("len checked above").1;
    let (span, total_size) = match axis {
        Axis::Horizontal => (
            last.right() - first.left(),
            ordered.iter().map(|(_, rect)| rect.width).sum::<f32>(),
        ),
        Axis::Vertical => (
            last.bottom() - first.top(),
            ordered.iter().map(|(_, rect)| rect.height).sum::<f32>(),
        ),
    };
    let gap = (span - total_size) / (ordered.len() - 1) as f32;

    let interior = &ordered[1..ordered.len() - 1];
    let mut moved = Vec::with_capacity(interior.len());
    let mut cursor = match axis {
        Axis::Horizontal => first.right() + gap,
        Axis::Vertical => first.bottom() + gap,
    };
    for (id, rect) in interior {
        let position = match axis {
            Axis::Horizontal => Position::new(cursor, rect.y),
            Axis::Vertical => Position::new(rect.x, cursor),
        };
        moved.push((id.clone(), position));
        cursor += match axis {
            Axis::Horizontal => rect.width + gap,
            Axis::Vertical => rect.height + gap,
        };
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(rects: &[(f32, f32, f32, f32)]) -> Vec<(String, Rect)> {
        rects
            .iter()
            .enumerate()
            .map(|(index, &(x, y, w, h))| (format!("n{index}"), Rect::new(x, y, w, h)))
            .collect()
    }

    #[test]
    fn align_below_two_is_a_no_op() {
        let selected = selection(&[(10.0, 10.0, 50.0, 50.0)]);
        assert!(align(&selected, AlignDirection::Left).is_empty());
    }

    #[test]
    fn align_top_uses_minimum_y() {
        let selected = selection(&[
            (0.0, 30.0, 40.0, 20.0),
            (100.0, 10.0, 40.0, 20.0),
            (200.0, 55.0, 40.0, 20.0),
        ]);
        let moved = align(&selected, AlignDirection::Top);
        assert_eq!(moved.len(), 3);
        for (_, position) in &moved {
            assert_eq!(position.y, 10.0);
        }
        // x untouched
        assert_eq!(moved[0].1.x, 0.0);
        assert_eq!(moved[2].1.x, 200.0);
    }

    #[test]
    fn align_right_uses_maximum_right_edge() {
        let selected = selection(&[(0.0, 0.0, 40.0, 20.0), (100.0, 50.0, 60.0, 20.0)]);
        let moved = align(&selected, AlignDirection::Right);
        // bbox right edge is 160
        assert_eq!(moved[0].1.x, 120.0);
        assert_eq!(moved[1].1.x, 100.0);
    }

    #[test]
    fn align_center_x_centers_each_node() {
        let selected = selection(&[(0.0, 0.0, 40.0, 20.0), (100.0, 50.0, 20.0, 20.0)]);
        let moved = align(&selected, AlignDirection::CenterX);
        // bbox spans 0..120, center 60
        assert_eq!(moved[0].1.x, 40.0);
        assert_eq!(moved[1].1.x, 50.0);
    }

    #[test]
    fn distribute_below_three_is_a_no_op() {
        let selected = selection(&[(0.0, 0.0, 10.0, 10.0), (50.0, 0.0, 10.0, 10.0)]);
        assert!(distribute(&selected, Axis::Horizontal).is_empty());
    }

    #[test]
    fn distribute_horizontal_equalizes_gaps_and_anchors_extremes() {
        let selected = selection(&[
            (0.0, 0.0, 20.0, 10.0),
            (30.0, 5.0, 20.0, 10.0),
            (45.0, 10.0, 20.0, 10.0),
            (100.0, 15.0, 20.0, 10.0),
        ]);
        let moved = distribute(&selected, Axis::Horizontal);
        // endpoints are anchored, only the two interior nodes move
        assert_eq!(moved.len(), 2);

        // span 0..120, total width 80, gap = 40/3
        let gap = 40.0 / 3.0;
        assert!((moved[0].1.x - (20.0 + gap)).abs() < 1e-4);
        assert!((moved[1].1.x - (40.0 + 2.0 * gap)).abs() < 1e-4);
        // the off-axis coordinate is untouched
        assert_eq!(moved[0].1.y, 5.0);
        assert_eq!(moved[1].1.y, 10.0);
    }

    #[test]
    fn distribute_vertical_sorts_by_current_position() {
        let selected = selection(&[
            (0.0, 90.0, 10.0, 20.0),
            (0.0, 0.0, 10.0, 20.0),
            (0.0, 40.0, 10.0, 20.0),
        ]);
        let moved = distribute(&selected, Axis::Vertical);
        // sorted order: n1 (0), n2 (40), n0 (90); span 0..110, size 60, gap 25
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].0, "n2");
        assert_eq!(moved[0].1.y, 45.0);
    }
}
