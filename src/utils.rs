use std::cmp::Ordering;

use crate::types::{Orientation, Ruling};

pub(crate) fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Group nearby coordinates and return the mean of each group, ascending.
///
/// A value joins a cluster while it stays within `threshold` of the
/// cluster's running centre.
pub(crate) fn cluster_positions(values: &[f64], threshold: f64) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(cmp_f64);

    let mut clusters: Vec<(f64, usize)> = Vec::new();
    for value in sorted {
        match clusters.last_mut() {
            Some((sum, count)) if (value - *sum / *count as f64).abs() <= threshold => {
                *sum += value;
                *count += 1;
            }
            _ => clusters.push((value, 1)),
        }
    }

    clusters
        .into_iter()
        .map(|(sum, count)| sum / count as f64)
        .collect()
}

/// Merge overlapping `(start, end)` intervals, allowing `tolerance` of slack.
pub(crate) fn merge_intervals(mut intervals: Vec<(f64, f64)>, tolerance: f64) -> Vec<(f64, f64)> {
    intervals.sort_by(|a, b| cmp_f64(&a.0, &b.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 + tolerance => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Join collinear rulings that overlap or nearly meet, so a line drawn as
/// several strokes is seen as one.
pub(crate) fn merge_rulings(rulings: &[Ruling], tolerance: f64) -> Vec<Ruling> {
    let mut merged = Vec::new();

    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let mut group: Vec<Ruling> = rulings
            .iter()
            .filter(|r| r.orientation == orientation)
            .copied()
            .collect();
        group.sort_by(|a, b| cmp_f64(&a.pos, &b.pos).then(cmp_f64(&a.start, &b.start)));

        let mut lines: Vec<Ruling> = Vec::new();
        for ruling in group {
            let joined = lines.iter_mut().rev().find(|line| {
                (line.pos - ruling.pos).abs() <= tolerance && ruling.start <= line.end + tolerance
            });
            match joined {
                Some(line) => {
                    line.start = line.start.min(ruling.start);
                    line.end = line.end.max(ruling.end);
                }
                None => lines.push(ruling),
            }
        }
        merged.extend(lines);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_nearby_positions() {
        let clusters = cluster_positions(&[100.0, 300.0, 101.0, 99.5, 300.5], 2.0);
        assert_eq!(clusters.len(), 2);
        assert!((clusters[0] - 100.1666).abs() < 0.001);
        assert_eq!(clusters[1], 300.25);
    }

    #[test]
    fn merges_overlapping_intervals() {
        let merged = merge_intervals(vec![(50., 60.), (10., 20.), (19., 30.)], 0.5);
        assert_eq!(merged, vec![(10., 30.), (50., 60.)]);
    }

    #[test]
    fn merges_split_strokes() {
        let h = |pos, start, end| Ruling {
            orientation: Orientation::Horizontal,
            pos,
            start,
            end,
        };
        let merged = merge_rulings(&[h(100., 50., 120.), h(100.2, 120., 200.), h(140., 50., 200.)], 1.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].start, 50.);
        assert_eq!(merged[0].end, 200.);
    }
}
