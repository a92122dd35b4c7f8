//! Traced iso-elevation contour polylines, densified to uniform arc
//! spacing before being handed to the [`crate::reconstruct::Reconstructor`].

/// A single hand-traced iso-elevation polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub height_ft: f64,
    pub points_xz: Vec<(f64, f64)>,
}

/// The full set of traced contours for one green. Elevations may repeat
/// across contours; the list's order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourSet {
    pub contours: Vec<Contour>,
}

impl ContourSet {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }
}

/// A densified scattered sample: an (x, z) point with the elevation of
/// the contour it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub z: f64,
    pub h: f64,
}

/// Resample a polyline at approximately `step_ft` spacing along its
/// segments.
///
/// Per segment, `n = max(1, floor(segment_length / step_ft))` sub-samples
/// are taken at `t` linearly spaced over `[0, 1)`; the polyline's final
/// endpoint is appended once at the end, not per-segment.
pub fn sample_polyline(points_xz: &[(f64, f64)], step_ft: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    if points_xz.is_empty() {
        return out;
    }

    for w in points_xz.windows(2) {
        let (x1, z1) = w[0];
        let (x2, z2) = w[1];
        let dx = x2 - x1;
        let dz = z2 - z1;
        let dist = dx.hypot(dz);
        let n = (1usize).max((dist / step_ft) as usize);
        for i in 0..n {
            let t = i as f64 / n as f64;
            out.push((x1 + t * dx, z1 + t * dz));
        }
    }
    out.push(*points_xz.last().unwrap());
    out
}

/// Densify every contour in `set` into scattered (x, z, h) samples.
pub fn densify(set: &ContourSet, step_ft: f64) -> Vec<Sample> {
    let mut samples = Vec::new();
    for c in &set.contours {
        for (x, z) in sample_polyline(&c.points_xz, step_ft) {
            samples.push(Sample { x, z, h: c.height_ft });
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_includes_both_endpoints() {
        let pts = sample_polyline(&[(0.0, 0.0), (10.0, 0.0)], 2.0);
        assert_eq!(*pts.first().unwrap(), (0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), (10.0, 0.0));
        // floor(10/2) = 5 sub-samples at t=0,0.2,...,0.8, plus endpoint.
        assert_eq!(pts.len(), 6);
    }

    #[test]
    fn short_segment_still_yields_one_sample_plus_endpoint() {
        let pts = sample_polyline(&[(0.0, 0.0), (0.1, 0.0), (0.2, 0.0)], 1.0);
        // Each segment shorter than step_ft still contributes its start point.
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), (0.2, 0.0));
    }

    #[test]
    fn densify_tags_samples_with_contour_height() {
        let set = ContourSet::new(vec![
            Contour {
                height_ft: 1.0,
                points_xz: vec![(0.0, 0.0), (4.0, 0.0)],
            },
            Contour {
                height_ft: 2.0,
                points_xz: vec![(0.0, 1.0), (4.0, 1.0)],
            },
        ]);
        let samples = densify(&set, 1.0);
        assert!(samples.iter().any(|s| s.h == 1.0));
        assert!(samples.iter().any(|s| s.h == 2.0));
    }
}
