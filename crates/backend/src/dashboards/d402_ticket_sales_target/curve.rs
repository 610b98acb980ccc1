use contracts::dashboards::d402_ticket_sales_target::CurveKind;

/// Steepness of the logistic `s_curve`
pub const S_CURVE_STEEPNESS: f64 = 8.0;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Maps the elapsed share of the sales window (0..=1) to the expected share
/// of capacity sold (0..=1).
///
/// Input outside 0..=1 (and NaN) is clamped first. Every curve passes through
/// (0, 0) and (1, 1) and never decreases in between.
///
/// * `linear`: `t`
/// * `early_push`: `sqrt(t)`, about 70% sold at 49% of the window
/// * `late_push`: `t^3`, about 13% sold at half of the window
/// * `s_curve`: logistic with `k = 8` centred at `t = 0.5`, min-max rescaled so
///   the endpoints are exactly 0 and 1
pub fn curve_value(progress: f64, curve: CurveKind) -> f64 {
    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };

    let value = match curve {
        CurveKind::Linear => t,
        CurveKind::EarlyPush => t.sqrt(),
        CurveKind::LatePush => t.powi(3),
        CurveKind::SCurve => {
            let k = S_CURVE_STEEPNESS;
            let low = sigmoid(-k / 2.0);
            let high = sigmoid(k / 2.0);
            (sigmoid(k * t - k / 2.0) - low) / (high - low)
        }
    };

    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    #[test]
    fn test_endpoints_for_all_curves() {
        for curve in CurveKind::all() {
            assert_eq!(curve_value(0.0, curve), 0.0, "{curve} at 0");
            assert_eq!(curve_value(1.0, curve), 1.0, "{curve} at 1");
        }
    }

    #[test]
    fn test_monotonic_on_grid() {
        for curve in CurveKind::all() {
            let values: Vec<f64> = GRID.iter().map(|t| curve_value(*t, curve)).collect();
            for pair in values.windows(2) {
                assert!(pair[0] <= pair[1], "{curve} decreases: {values:?}");
            }
        }
    }

    #[test]
    fn test_monotonic_on_fine_grid() {
        for curve in CurveKind::all() {
            let mut previous = 0.0;
            for step in 0..=1000 {
                let value = curve_value(step as f64 / 1000.0, curve);
                assert!(value >= previous, "{curve} decreases at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert!((curve_value(0.49, CurveKind::EarlyPush) - 0.7).abs() < 1e-9);
        assert!((curve_value(0.5, CurveKind::LatePush) - 0.125).abs() < 1e-9);
        assert!((curve_value(0.5, CurveKind::SCurve) - 0.5).abs() < 1e-9);
        assert!((curve_value(0.3, CurveKind::Linear) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_progress_is_clamped() {
        for curve in CurveKind::all() {
            assert_eq!(curve_value(-0.5, curve), 0.0);
            assert_eq!(curve_value(3.0, curve), 1.0);
            assert_eq!(curve_value(f64::NAN, curve), 0.0);
        }
    }
}
