//! Boundary polygon and point-in-polygon containment.
//!
//! A winding-number test over the boundary vertices; on-boundary behavior
//! is unspecified since boundary cells are rare and either classification
//! is acceptable.

/// A simple closed polygon in green-local (x, z) feet. At least three
/// vertices; self-intersection is caller error (not validated).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    pub vertices: Vec<(f64, f64)>,
}

impl BoundaryPolygon {
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self { vertices }
    }

    /// Winding-number test: `true` iff `(x, z)` is inside the polygon.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        winding_number(&self.vertices, x, z) != 0
    }
}

fn winding_number(vertices: &[(f64, f64)], x: f64, z: f64) -> i32 {
    let n = vertices.len();
    if n < 3 {
        return 0;
    }

    let mut wn = 0;
    for i in 0..n {
        let (x0, z0) = vertices[i];
        let (x1, z1) = vertices[(i + 1) % n];

        if z0 <= z {
            if z1 > z && is_left(x0, z0, x1, z1, x, z) > 0.0 {
                wn += 1;
            }
        } else if z1 <= z && is_left(x0, z0, x1, z1, x, z) < 0.0 {
            wn -= 1;
        }
    }
    wn
}

/// Sign of the cross product `(p1 - p0) x (p - p0)`: >0 if `p` is left of
/// the directed line `p0 -> p1`, <0 if right, 0 if collinear.
fn is_left(x0: f64, z0: f64, x1: f64, z1: f64, x: f64, z: f64) -> f64 {
    (x1 - x0) * (z - z0) - (x - x0) * (z1 - z0)
}
