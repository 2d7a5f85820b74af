use crate::C;
use geo::geometry::Coord;
use itertools::Itertools;

/// Straight line distance between `a` and `b`.
pub fn euclidean(a: Coord<C>, b: Coord<C>) -> C {
    let Coord { x: dx, y: dy } = b - a;
    (dx * dx + dy * dy).sqrt()
}

/// Total length of the polyline described by `coords`.
pub fn length(coords: &[Coord<C>]) -> C {
    coords
        .iter()
        .tuple_windows()
        .map(|(a, b)| euclidean(*a, *b))
        .fold(0.0, |total, len| total + len)
}

/// Densifies `coords` so the result holds roughly `nb_points` points.
///
/// Each segment gets a share of `nb_points` proportional to its
/// length, rounded half up and never less than one. Shares are rounded
/// independently, so the total may drift from `nb_points`. Original
/// vertices are kept as-is. A polyline with zero length is returned
/// unchanged.
pub fn resample(coords: &[Coord<C>], nb_points: usize) -> Vec<Coord<C>> {
    let total = length(coords);
    if total == 0.0 {
        return coords.to_vec();
    }

    let mut points = Vec::with_capacity(coords.len());
    points.extend(coords.first().copied());
    for (&a, &b) in coords.iter().tuple_windows() {
        let n = segment_points(nb_points, euclidean(a, b), total);
        points.reserve(n);
        #[allow(clippy::cast_precision_loss)]
        let step = (b - a) / n as C;
        #[allow(clippy::cast_precision_loss)]
        points.extend((1..n).map(|i| a + step * i as C));
        points.push(b);
    }
    points
}

/// Cumulative distance from the first coordinate to each coordinate.
pub fn cumulative_distances(coords: &[Coord<C>]) -> Vec<C> {
    let tail = coords
        .iter()
        .tuple_windows()
        .scan(0.0, |dist, (a, b)| {
            *dist += euclidean(*a, *b);
            Some(*dist)
        });
    coords.first().map(|_| 0.0).into_iter().chain(tail).collect()
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn segment_points(nb_points: usize, segment_len: C, total_len: C) -> usize {
    let share = (nb_points as C * segment_len / total_len + 0.5).floor();
    (share as usize).max(1)
}
