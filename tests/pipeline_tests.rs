use approx::assert_relative_eq;
use nomogen::catalog::{self, parallel_resistors};
use nomogen::defaults::ACCURACY_THRESHOLD_MM;
use nomogen::{
    CheckStage, Nomogram, NomogenError, NomogramConfig, QuadraticFit, ScaleId, Termination,
    TickSide, Verbosity, nomogen,
};

/// Tolerance for positions compared in the unit square
const POSITION_TOLERANCE: f64 = 1e-12;

fn quiet(config: NomogramConfig) -> NomogramConfig {
    config.with_verbosity(Verbosity::Quiet)
}

fn resistors_config() -> NomogramConfig {
    quiet(NomogramConfig::new((5.0, 50.0), (5.0, 50.0), (2.5, 25.0)).unwrap())
}

/// Node heights strictly rising or strictly falling along every scale
fn assert_monotonic(chart: &Nomogram, label: &str) {
    for curve in chart.curves() {
        let steps: Vec<f64> = curve.ys().windows(2).map(|pair| pair[1] - pair[0]).collect();
        let rising = steps.iter().all(|&d| d > 0.0);
        let falling = steps.iter().all(|&d| d < 0.0);
        assert!(
            rising || falling,
            "{label}: {} folds back, ys = {:?}",
            curve.id(),
            curve.ys()
        );
    }
}

// =============================================================================
// End-to-end runs
// =============================================================================

#[test]
fn parallel_resistors_at_nine_nodes() {
    let chart = nomogen(parallel_resistors, &resistors_config()).unwrap();

    assert!(chart.max_error_mm() < ACCURACY_THRESHOLD_MM, "{}", chart.max_error_mm());
    assert!(chart.warning().is_none());
    assert_monotonic(&chart, "parallel_resistors");
    assert_eq!(chart.verification.grid, 100);
    assert_eq!(chart.u().len(), 9);
    assert!(chart.cost.total.is_finite());
    assert_eq!(chart.u().tick_side(), TickSide::Left);
    assert_eq!(chart.v().tick_side(), TickSide::Right);
}

#[test]
fn quadratic_start_reaches_the_same_accuracy() {
    let config = resistors_config().with_initial_fit(QuadraticFit);
    let chart = nomogen(parallel_resistors, &config).unwrap();
    assert!(chart.max_error_mm() < ACCURACY_THRESHOLD_MM, "{}", chart.max_error_mm());
    assert!(chart.warning().is_none());
    assert_monotonic(&chart, "parallel_resistors (quadratic start)");
}

#[test]
fn area_term_keeps_the_chart_accurate() {
    let config = resistors_config().with_area_term(1e-4).unwrap();
    let chart = nomogen(parallel_resistors, &config).unwrap();

    let area = chart.cost.area.unwrap();
    assert!((-1.0..0.0).contains(&area), "{area}");
    assert!(chart.max_error_mm() < ACCURACY_THRESHOLD_MM, "{}", chart.max_error_mm());
    assert!(chart.warning().is_none());
    assert_monotonic(&chart, "parallel_resistors (area term)");
    for curve in chart.curves() {
        for p in [curve.start(), curve.end()] {
            assert!(p.x > -0.5 && p.x < 1.5 && p.y > -0.5 && p.y < 1.5, "{p}");
        }
    }
}

#[test]
fn sum_chart_with_quadratic_start_stays_straight() {
    let config = quiet(NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0)).unwrap())
        .with_initial_fit(QuadraticFit);
    let chart = nomogen(|u, v| u + v, &config).unwrap();
    assert_eq!(chart.termination, Termination::Converged);
    for &x in chart.w().xs() {
        assert_relative_eq!(x, 0.5, epsilon = POSITION_TOLERANCE);
    }
}

#[test]
fn sum_chart_starts_and_ends_straight() {
    let config = quiet(NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0)).unwrap());
    let chart = nomogen(|u, v| u + v, &config).unwrap();

    assert_eq!(chart.termination, Termination::Converged);
    assert_eq!(chart.iterations, 0);
    for &x in chart.u().xs() {
        assert_relative_eq!(x, 0.0);
    }
    for &x in chart.v().xs() {
        assert_relative_eq!(x, 1.0);
    }
    for &x in chart.w().xs() {
        assert_relative_eq!(x, 0.5, epsilon = POSITION_TOLERANCE);
    }
    assert!(chart.warning().is_none());
}

#[test]
fn bounds_map_to_curve_ends() {
    let config = quiet(NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0)).unwrap());
    let chart = nomogen(|u, v| u + v, &config).unwrap();
    let u = chart.scale(ScaleId::U);
    assert_eq!(u.point(1.0), u.start());
    assert_eq!(u.point(5.0), u.end());
}

#[test]
fn fewer_iterations_still_yield_a_chart() {
    let config = quiet(
        NomogramConfig::new((5.0, 50.0), (5.0, 50.0), (2.5, 25.0))
            .unwrap()
            .with_nodes(5)
            .unwrap()
            .with_max_iterations(2),
    );
    let chart = nomogen(parallel_resistors, &config).unwrap();
    assert!(chart.iterations <= 2);
    assert!(chart.max_error_mm().is_finite());
}

#[test]
fn whole_catalog_lays_out() {
    for relation in catalog::catalog() {
        let config = quiet(relation.config().unwrap());
        let chart = nomogen(relation.f, &config)
            .unwrap_or_else(|e| panic!("{}: {e}", relation.name));
        assert!(
            chart.warning().is_none(),
            "{}: {:.4} mm",
            relation.name,
            chart.max_error_mm()
        );
        assert_monotonic(&chart, relation.name);
    }
}

// =============================================================================
// Fatal conditions
// =============================================================================

#[test]
fn inverted_bounds_fail_before_sampling() {
    let err = NomogramConfig::new((5.0, 1.0), (1.0, 5.0), (2.0, 10.0)).unwrap_err();
    assert_eq!(
        err,
        NomogenError::InvertedDomain {
            scale: ScaleId::U,
            min: 5.0,
            max: 1.0
        }
    );
}

#[test]
fn even_node_counts_round_up() {
    let config = NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0))
        .unwrap()
        .with_nodes(8)
        .unwrap();
    assert_eq!(config.nodes().get(), 9);
    assert!(matches!(
        NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0))
            .unwrap()
            .with_nodes(2),
        Err(NomogenError::TooFewNodes { requested: 2 })
    ));
}

#[test]
fn narrow_w_bounds_fail_with_range_violation() {
    let config = quiet(NomogramConfig::new((5.0, 50.0), (5.0, 50.0), (2.5, 20.0)).unwrap());
    let err = nomogen(parallel_resistors, &config).unwrap_err();
    assert!(matches!(
        err,
        NomogenError::RangeViolation {
            stage: CheckStage::CornerCheck,
            ..
        }
    ));
}

#[test]
fn interior_peak_is_caught_at_the_nodes() {
    let config = quiet(NomogramConfig::new((-1.0, 1.0), (-1.0, 1.0), (-1.0, 0.5)).unwrap());
    let err = nomogen(|u, v| 1.0 - u * u - v * v, &config).unwrap_err();
    let NomogenError::RangeViolation { stage, w, .. } = err else {
        panic!("expected a range violation, got {err:?}");
    };
    assert_eq!(stage, CheckStage::NodeSampling);
    assert!(w > 0.5);
}
