use std::fmt::Write;

use node::CanvasPoint;

/// Convert a freehand point list to a closed SVG path: `M p0 L p1 ... Z`.
///
/// Returns `None` for an empty list.
pub fn points_to_path(points: &[CanvasPoint]) -> Option<String> {
    let (first, rest) = points.split_first()?;
    let mut path = format!("M {} {}", first.x(), first.y());
    for point in rest {
        let _ = write!(path, " L {} {}", point.x(), point.y());
    }
    path.push_str(" Z");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn closes_the_figure() {
        let points = [
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(10.0, 0.0),
            CanvasPoint::new(10.5, 20.0),
        ];
        assert_eq!(points_to_path(&points).unwrap(), "M 0 0 L 10 0 L 10.5 20 Z");
    }

    #[test]
    fn single_point_and_empty() {
        assert_eq!(points_to_path(&[CanvasPoint::new(3.0, 4.0)]).unwrap(), "M 3 4 Z");
        assert_eq!(points_to_path(&[]), None);
    }

    proptest! {
        #[test]
        fn one_command_per_point(coords in prop::collection::vec((0.0f32..1000.0, 0.0f32..1000.0), 1..30)) {
            let points: Vec<_> = coords.iter().map(|(x, y)| CanvasPoint::new(*x, *y)).collect();
            let path = points_to_path(&points).unwrap();
            prop_assert!(path.starts_with("M "));
            prop_assert!(path.ends_with(" Z"));
            prop_assert_eq!(path.matches(" L ").count(), points.len() - 1);
        }
    }
}
