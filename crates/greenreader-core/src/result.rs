//! Packages the optimizer's winning candidate plus run context into the
//! transport-friendly `BestLine` record.

use crate::optimizer::Candidate;

/// The recommended launch, its outcome, and the full winning trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct BestLine {
    pub stimp_ft: f64,
    pub ball_x_ft: f64,
    pub ball_z_ft: f64,
    pub hole_x_ft: f64,
    pub hole_z_ft: f64,

    /// Absolute aim angle, degrees; 0 = +X (east), CCW positive.
    pub aim_angle_deg: f64,
    /// Aim angle relative to the straight-to-hole bearing.
    pub aim_offset_deg: f64,
    pub v0_speed_fps: f64,
    pub v0_x_fps: f64,
    pub v0_z_fps: f64,

    pub holed: bool,
    pub miss_ft: f64,
    pub t_end_s: f64,
    pub final_x_ft: f64,
    pub final_z_ft: f64,

    pub path_x_ft: Vec<f64>,
    pub path_z_ft: Vec<f64>,
    pub path_y_ft: Vec<f64>,
}

/// Builds a [`BestLine`] from an optimizer's winning candidate.
pub struct ResultEncoder;

impl ResultEncoder {
    pub fn encode(
        stimp_ft: f64,
        ball_x_ft: f64,
        ball_z_ft: f64,
        hole_x_ft: f64,
        hole_z_ft: f64,
        best: &Candidate,
    ) -> BestLine {
        let aim_angle_deg = best.v0_z_fps.atan2(best.v0_x_fps).to_degrees();

        BestLine {
            stimp_ft,
            ball_x_ft,
            ball_z_ft,
            hole_x_ft,
            hole_z_ft,

            aim_angle_deg,
            aim_offset_deg: best.angle_deg,
            v0_speed_fps: best.speed_fps,
            v0_x_fps: best.v0_x_fps,
            v0_z_fps: best.v0_z_fps,

            holed: best.result.holed,
            miss_ft: best.miss_ft,
            t_end_s: best.result.t_end_s,
            final_x_ft: best.result.final_x,
            final_z_ft: best.result.final_z,

            path_x_ft: best.result.path_x.clone(),
            path_z_ft: best.result.path_z.clone(),
            path_y_ft: best.result.path_y.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::HeightMap;
    use crate::optimizer::LineOptimizer;
    use crate::simulator::RollSimulator;

    #[test]
    fn encoded_record_carries_context_and_winning_trajectory() {
        let mut hm = HeightMap::circular(30.0, 0.25);
        hm.compute_gradients();
        let sim = RollSimulator::with_defaults(&hm, 10.0).unwrap();
        let opt = LineOptimizer::default();
        let outcome = opt.run(&sim, 0.0, 0.0, 10.0, 0.0);
        let best = outcome.best();

        let line = ResultEncoder::encode(10.0, 0.0, 0.0, 10.0, 0.0, best);

        assert_eq!(line.stimp_ft, 10.0);
        assert_eq!(line.hole_x_ft, 10.0);
        assert_eq!(line.aim_offset_deg, best.angle_deg);
        assert_eq!(line.path_x_ft.len(), best.result.path_x.len());
        assert!((line.aim_angle_deg - best.v0_z_fps.atan2(best.v0_x_fps).to_degrees()).abs() < 1e-9);
    }
}
