use crate::geometry::{Rect, bounding_box};
use crate::layout::{Axis, SnapLine};

/// Result of one drag-frame snap computation. `dx`/`dy` nudge the whole
/// dragging set onto the winning alignment; an axis with no candidate under
/// the threshold stays at zero with no guide line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    pub lines: Vec<SnapLine>,
    pub dx: f32,
    pub dy: f32,
}

/// Nearest alignment opportunity between the dragging set (at proposed
/// positions) and every other node, per axis, within `threshold` pixels.
///
/// For each axis, five candidate pairs per target: leading/leading,
/// leading/trailing, center/center, trailing/trailing, trailing/leading.
/// The strictly smallest distance wins; an edge exactly at `threshold` does
/// not snap. Exact ties keep the first candidate found, in target iteration
/// order then pair order.
pub fn compute_snap_guides(dragging: &[Rect], targets: &[Rect], threshold: f32) -> SnapResult {
    let Some(bbox) = bounding_box(dragging.iter().copied()) else {
        return SnapResult::default();
    };

    let mut best_x: Option<(f32, f32)> = None; // (delta, guide position)
    let mut best_y: Option<(f32, f32)> = None;
    let mut best_x_dist = threshold;
    let mut best_y_dist = threshold;

    for target in targets {
        let x_pairs = [
            (bbox.left(), target.left()),
            (bbox.left(), target.right()),
            (bbox.center_x(), target.center_x()),
            (bbox.right(), target.right()),
            (bbox.right(), target.left()),
        ];
        for (dragging_edge, target_edge) in x_pairs {
            let dist = (target_edge - dragging_edge).abs();
            if dist < best_x_dist {
                best_x_dist = dist;
                best_x = Some((target_edge - dragging_edge, target_edge));
            }
        }

        let y_pairs = [
            (bbox.top(), target.top()),
            (bbox.top(), target.bottom()),
            (bbox.center_y(), target.center_y()),
            (bbox.bottom(), target.bottom()),
            (bbox.bottom(), target.top()),
        ];
        for (dragging_edge, target_edge) in y_pairs {
            let dist = (target_edge - dragging_edge).abs();
            if dist < best_y_dist {
                best_y_dist = dist;
                best_y = Some((target_edge - dragging_edge, target_edge));
            }
        }
    }

    let mut result = SnapResult::default();
    if let Some((dx, at)) = best_x {
        result.dx = dx;
        result.lines.push(SnapLine {
            axis: Axis::Vertical,
            at,
        });
    }
    if let Some((dy, at)) = best_y {
        result.dy = dy;
        result.lines.push(SnapLine {
            axis: Axis::Horizontal,
            at,
        });
    }
    result
}
