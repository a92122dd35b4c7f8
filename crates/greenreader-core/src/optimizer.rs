//! Three-stage coarse-to-fine launch-parameter search.

use crate::simulator::{RollSimulator, SimulationResult};

/// One grid-search candidate and its simulated outcome.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub angle_deg: f64,
    pub speed_fps: f64,
    pub v0_x_fps: f64,
    pub v0_z_fps: f64,
    pub score: f64,
    pub miss_ft: f64,
    pub result: SimulationResult,
}

/// Score a single launch: lower is better. Holed trajectories get a
/// large negative bonus (ties among holed candidates broken by miss);
/// otherwise miss distance plus a blow-by penalty on final speed.
fn score_of(miss: f64, holed: bool, final_speed: f64) -> f64 {
    if holed {
        -1000.0 - miss
    } else {
        miss + 0.15 * final_speed
    }
}

#[allow(clippy::too_many_arguments)]
fn evaluate(
    sim: &RollSimulator,
    ball_x: f64,
    ball_z: f64,
    hole_x: f64,
    hole_z: f64,
    angle_deg: f64,
    speed_fps: f64,
    base_angle_rad: f64,
) -> Candidate {
    let ang = base_angle_rad + angle_deg.to_radians();
    let v0_x = ang.cos() * speed_fps;
    let v0_z = ang.sin() * speed_fps;

    let result = sim.simulate(ball_x, ball_z, v0_x, v0_z, Some((hole_x, hole_z)));
    let miss = (result.final_x - hole_x).hypot(result.final_z - hole_z);
    let score = score_of(miss, result.holed, result.final_speed);

    Candidate {
        angle_deg,
        speed_fps,
        v0_x_fps: v0_x,
        v0_z_fps: v0_z,
        score,
        miss_ft: miss,
        result,
    }
}

/// `numpy.arange(start, stop + step, step)`-equivalent inclusive range.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step + 1e-9).floor() as i64 + 1;
    (0..n.max(0)).map(|i| start + i as f64 * step).collect()
}

#[allow(clippy::too_many_arguments)]
fn run_grid(
    sim: &RollSimulator,
    ball_x: f64,
    ball_z: f64,
    hole_x: f64,
    hole_z: f64,
    base_angle_rad: f64,
    angle_step: f64,
    speed_step: f64,
    center_angle_deg: f64,
    angle_window_deg: f64,
    speed_window: (f64, f64),
) -> Candidate {
    let angles = arange(
        center_angle_deg - angle_window_deg,
        center_angle_deg + angle_window_deg,
        angle_step,
    );
    let speeds = arange(speed_window.0, speed_window.1, speed_step);

    let candidates: Vec<(usize, usize)> = (0..angles.len())
        .flat_map(|ai| (0..speeds.len()).map(move |si| (ai, si)))
        .collect();

    evaluate_and_select(sim, ball_x, ball_z, hole_x, hole_z, base_angle_rad, &angles, &speeds, &candidates)
}

#[cfg(feature = "parallel")]
#[allow(clippy::too_many_arguments)]
fn evaluate_and_select(
    sim: &RollSimulator,
    ball_x: f64,
    ball_z: f64,
    hole_x: f64,
    hole_z: f64,
    base_angle_rad: f64,
    angles: &[f64],
    speeds: &[f64],
    candidates: &[(usize, usize)],
) -> Candidate {
    use rayon::prelude::*;

    candidates
        .par_iter()
        .map(|&(ai, si)| {
            let c = evaluate(
                sim,
                ball_x,
                ball_z,
                hole_x,
                hole_z,
                angles[ai],
                speeds[si],
                base_angle_rad,
            );
            (ai, si, c)
        })
        .reduce_with(|a, b| if is_better(&b, &a) { b } else { a })
        .map(|(_, _, c)| c)
        .expect("candidate grid is never empty")
}

#[cfg(not(feature = "parallel"))]
#[allow(clippy::too_many_arguments)]
fn evaluate_and_select(
    sim: &RollSimulator,
    ball_x: f64,
    ball_z: f64,
    hole_x: f64,
    hole_z: f64,
    base_angle_rad: f64,
    angles: &[f64],
    speeds: &[f64],
    candidates: &[(usize, usize)],
) -> Candidate {
    let mut best: Option<(usize, usize, Candidate)> = None;
    for &(ai, si) in candidates {
        let c = evaluate(sim, ball_x, ball_z, hole_x, hole_z, angles[ai], speeds[si], base_angle_rad);
        match &best {
            None => best = Some((ai, si, c)),
            Some((_, _, b)) => {
                if c.score < b.score {
                    best = Some((ai, si, c));
                }
            }
        }
    }
    best.expect("candidate grid is never empty").2
}

/// Tie-break helper for the parallel reduction: `b` replaces `a` only on
/// a strict score improvement, with ties broken toward the
/// lexicographically-earlier (angle index, speed index) pair — this
/// keeps the result independent of which worker finishes first.
#[cfg(feature = "parallel")]
fn is_better(b: &(usize, usize, Candidate), a: &(usize, usize, Candidate)) -> bool {
    if b.2.score != a.2.score {
        b.2.score < a.2.score
    } else {
        (b.0, b.1) < (a.0, a.1)
    }
}

/// Outcome of the full three-stage search: the per-stage best
/// candidates (for the optimizer-monotonicity property) plus the final
/// winner.
pub struct OptimizerResult {
    pub stage1: Candidate,
    pub stage2: Candidate,
    pub stage3: Candidate,
}

impl OptimizerResult {
    pub fn best(&self) -> &Candidate {
        &self.stage3
    }
}

/// Coarse-to-fine grid search over `(angle_offset_deg, speed_fps)`
/// relative to the straight-to-hole bearing.
pub struct LineOptimizer {
    pub angle_span_deg: f64,
    pub speed_bounds_fps: (f64, f64),
}

impl Default for LineOptimizer {
    fn default() -> Self {
        Self {
            angle_span_deg: 25.0,
            speed_bounds_fps: (2.0, 16.0),
        }
    }
}

impl LineOptimizer {
    pub fn run(
        &self,
        sim: &RollSimulator,
        ball_x: f64,
        ball_z: f64,
        hole_x: f64,
        hole_z: f64,
    ) -> OptimizerResult {
        let base_angle_rad = (hole_z - ball_z).atan2(hole_x - ball_x);
        let (vmin, vmax) = self.speed_bounds_fps;

        let stage1 = run_grid(
            sim,
            ball_x,
            ball_z,
            hole_x,
            hole_z,
            base_angle_rad,
            2.0,
            1.0,
            0.0,
            self.angle_span_deg,
            (vmin, vmax),
        );

        let stage2 = run_grid(
            sim,
            ball_x,
            ball_z,
            hole_x,
            hole_z,
            base_angle_rad,
            0.5,
            0.25,
            stage1.angle_deg,
            4.0,
            (
                (stage1.speed_fps - 2.0).max(vmin),
                (stage1.speed_fps + 2.0).min(vmax),
            ),
        );

        let stage3 = run_grid(
            sim,
            ball_x,
            ball_z,
            hole_x,
            hole_z,
            base_angle_rad,
            0.2,
            0.1,
            stage2.angle_deg,
            1.0,
            (
                (stage2.speed_fps - 0.6).max(vmin),
                (stage2.speed_fps + 0.6).min(vmax),
            ),
        );

        OptimizerResult { stage1, stage2, stage3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::HeightMap;

    #[test]
    fn straight_putt_on_flat_green_aims_near_zero_offset() {
        let mut hm = HeightMap::circular(30.0, 0.25);
        hm.compute_gradients();
        let sim = RollSimulator::with_defaults(&hm, 10.0).unwrap();
        let opt = LineOptimizer::default();
        let result = opt.run(&sim, 0.0, 0.0, 10.0, 0.0);
        assert!(result.best().angle_deg.abs() < 1.0, "angle={}", result.best().angle_deg);
    }

    #[test]
    fn stage_scores_improve_monotonically() {
        let mut hm = HeightMap::circular(30.0, 0.25);
        hm.compute_gradients();
        let sim = RollSimulator::with_defaults(&hm, 10.0).unwrap();
        let opt = LineOptimizer::default();
        let result = opt.run(&sim, 0.0, 0.0, 8.0, 3.0);
        assert!(result.stage3.score <= result.stage2.score + 1e-9);
        assert!(result.stage2.score <= result.stage1.score + 1e-9);
    }

    #[test]
    fn holed_candidate_scores_far_below_any_miss() {
        let mut hm = HeightMap::circular(30.0, 0.25);
        hm.compute_gradients();
        let sim = RollSimulator::with_defaults(&hm, 10.0).unwrap();
        let opt = LineOptimizer::default();
        let result = opt.run(&sim, 0.0, 0.0, 10.0, 0.0);
        if result.best().result.holed {
            assert!(result.best().score < 0.0);
        }
    }
}
