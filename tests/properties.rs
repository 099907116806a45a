//! Property-based tests for membership functions and loan inference

use std::sync::OnceLock;

use fuzzy_loan::loan::{APPROVAL_SCORE, CREDIT_SCORE, DEBT_RATIO, EMPLOYMENT_DURATION, INCOME};
use fuzzy_loan::{Inputs, LoanApplication, LoanController, MembershipFunction};
use proptest::prelude::*;

fn controller() -> &'static LoanController {
    static CONTROLLER: OnceLock<LoanController> = OnceLock::new();

    CONTROLLER.get_or_init(|| LoanController::new().unwrap())
}

/// Raw (unrounded) approval score from the standard engine
fn raw_approval(credit_score: f64, debt_ratio: f64, income: f64, employment_duration: f64) -> f64 {
    let engine = controller().engine();
    let vars = engine.variables();
    let var = |name| vars.find(name).unwrap();
    let inputs = Inputs::new()
        .with(var(CREDIT_SCORE), credit_score)
        .with(var(DEBT_RATIO), debt_ratio)
        .with(var(INCOME), income)
        .with(var(EMPLOYMENT_DURATION), employment_duration);

    engine
        .eval(&inputs)
        .unwrap()
        .get_inferred_membership(var(APPROVAL_SCORE))
        .unwrap()
}

/// Four sorted breakpoints
fn breakpoints_strategy() -> impl Strategy<Value = [f64; 4]> {
    prop::array::uniform4(-100f64..100.).prop_map(|mut points| {
        points.sort_by(f64::total_cmp);
        points
    })
}

/// Applications inside the standard domains
fn application_strategy() -> impl Strategy<Value = LoanApplication> {
    (300f64..=850., 0f64..=100., 0f64..=200_000., 0f64..=40.).prop_map(
        |(credit_score, debt_ratio, income, employment_duration)| LoanApplication {
            credit_score,
            debt_ratio,
            income,
            employment_duration,
        },
    )
}

proptest! {
    #[test]
    fn test_degree_in_unit_interval(points in breakpoints_strategy(), x in -200f64..200.) {
        let [a, b, c, d] = points;
        let mf = MembershipFunction::trapezoidal(a, b, c, d).unwrap();
        let degree = mf.degree(x);

        prop_assert!((0. ..=1.).contains(&degree));
    }

    #[test]
    fn test_zero_outside_support(points in breakpoints_strategy(), offset in 0.001f64..100.) {
        let [a, b, c, d] = points;
        let mf = MembershipFunction::trapezoidal(a, b, c, d).unwrap();

        prop_assert_eq!(mf.support(), (a, d));
        prop_assert_eq!(mf.degree(a - offset), 0.);
        prop_assert_eq!(mf.degree(d + offset), 0.);
    }

    #[test]
    fn test_one_on_plateau(points in breakpoints_strategy(), t in 0f64..=1.) {
        let [a, b, c, d] = points;
        let mf = MembershipFunction::trapezoidal(a, b, c, d).unwrap();
        let x = (b + t * (c - b)).clamp(b, c);

        prop_assert_eq!(mf.degree(x), 1.);
    }

    #[test]
    fn test_triangle_peak(points in breakpoints_strategy()) {
        let [a, b, _, d] = points;
        let mf = MembershipFunction::triangular(a, b, d).unwrap();

        prop_assert_eq!(mf.degree(b), 1.);
        prop_assert_eq!(mf.breakpoints(), &[a, b, d][..]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_outputs_stay_in_domain(application in application_strategy()) {
        let evaluation = controller().evaluate_with_diagnostics(&application).unwrap();
        let diagnostics = evaluation.diagnostics.as_ref().unwrap();

        prop_assert!((0. ..=100.).contains(&evaluation.approval_score));
        prop_assert!((3. ..=25.).contains(&evaluation.interest_rate));

        for rule in &diagnostics.rules {
            prop_assert!((0. ..=1.).contains(&rule.strength));
        }
        for (_, memberships) in diagnostics.fuzzified.iter() {
            for (_, degree) in memberships.iter() {
                prop_assert!((0. ..=1.).contains(&degree));
            }
        }
        for set in &diagnostics.aggregated {
            prop_assert!(set.height() <= 1.);
        }
    }

    /// Credit in the upper half of its domain, debt in the core of "low" and income below
    /// the support of "high". Only "excellent credit and low debt" depends on credit there,
    /// and the only competing rule ("low income and short employment") does not.
    #[test]
    fn test_approval_monotonic_in_credit(
        x in 720f64..=850.,
        y in 720f64..=850.,
        debt_ratio in 0f64..=20.,
        income in 0f64..=80_000.,
        employment_duration in 0f64..=40.
    ) {
        let (lo, hi) = if x <= y { (x, y) } else { (y, x) };

        prop_assert!(
            raw_approval(lo, debt_ratio, income, employment_duration)
                <= raw_approval(hi, debt_ratio, income, employment_duration) + 1e-9
        );
    }

    #[test]
    fn test_out_of_range_saturates(application in application_strategy(), excess in 1f64..1e6) {
        let at_upper = LoanApplication {
            credit_score: 850.,
            income: 200_000.,
            ..application
        };
        let beyond_upper = LoanApplication {
            credit_score: 850. + excess,
            income: 200_000. + excess,
            ..application
        };
        let at_lower = LoanApplication {
            debt_ratio: 0.,
            employment_duration: 0.,
            ..application
        };
        let beyond_lower = LoanApplication {
            debt_ratio: -excess,
            employment_duration: -excess,
            ..application
        };

        prop_assert_eq!(controller().evaluate(&at_upper).unwrap(), controller().evaluate(&beyond_upper).unwrap());
        prop_assert_eq!(controller().evaluate(&at_lower).unwrap(), controller().evaluate(&beyond_lower).unwrap());
    }
}
