use approx::assert_abs_diff_eq;
use fuzzy_loan::config::EngineConfig;
use fuzzy_loan::loan::reference_applicants;
use fuzzy_loan::{Decision, EvaluationError, LoanApplication, LoanController, LoanEvaluation};

fn application(credit_score: f64, debt_ratio: f64, income: f64, employment_duration: f64) -> LoanApplication {
    LoanApplication {
        credit_score,
        debt_ratio,
        income,
        employment_duration,
    }
}

fn evaluate(credit_score: f64, debt_ratio: f64, income: f64, employment_duration: f64) -> LoanEvaluation {
    let controller = LoanController::new().unwrap();

    controller
        .evaluate(&application(credit_score, debt_ratio, income, employment_duration))
        .unwrap()
}

#[test]
fn strong_applicant_is_approved() {
    let evaluation = evaluate(780., 15., 85_000., 8.);

    assert_eq!(evaluation.decision, Decision::Approved);
    // Only "excellent credit and low debt" fires, at 0.75. Approve is full at 100 and low
    // at 3, which gives 85.93 / 5.48 against the quoted 85.88 / 5.49.
    assert_abs_diff_eq!(evaluation.approval_score, 85.88, epsilon = 0.1);
    assert_abs_diff_eq!(evaluation.interest_rate, 5.49, epsilon = 0.1);
    assert_abs_diff_eq!(evaluation.approval_score, 85.93, epsilon = 0.005);
    assert_abs_diff_eq!(evaluation.interest_rate, 5.48, epsilon = 0.005);
    assert!(evaluation.diagnostics.is_none());
}

#[test]
fn average_applicant_needs_review() {
    let evaluation = evaluate(650., 35., 50_000., 3.);

    assert_eq!(evaluation.decision, Decision::RequiresReview);
    // Only "fair credit and medium debt" fires, at 0.667. Review and medium are symmetric
    // trapezoids, so the centroids sit at their centers whatever the clip level; the
    // 52.75 / 12.87 sometimes quoted for this applicant is out of reach of these rules.
    assert_abs_diff_eq!(evaluation.approval_score, 50., epsilon = 0.01);
    assert_abs_diff_eq!(evaluation.interest_rate, 12., epsilon = 0.01);
}

#[test]
fn weak_applicant_is_rejected() {
    let controller = LoanController::new().unwrap();
    let evaluation = controller
        .evaluate_with_diagnostics(&application(450., 60., 25_000., 1.))
        .unwrap();
    let strengths: Vec<f64> = evaluation
        .diagnostics
        .as_ref()
        .unwrap()
        .rules
        .iter()
        .map(|rule| rule.strength)
        .collect();

    assert_eq!(evaluation.decision, Decision::Rejected);
    // "poor credit or high debt" and "low income and short employment" both fire fully
    // and aggregate onto reject / high. Reject is full at 0 and high at 25, which moves
    // the centroids from the quoted 18.23 / 21.05 to 13.14 / 21.12.
    assert_eq!(strengths, vec![0., 0., 0., 0., 0., 1., 1., 0.]);
    assert_abs_diff_eq!(evaluation.approval_score, 13.14, epsilon = 0.005);
    assert_abs_diff_eq!(evaluation.interest_rate, 21.12, epsilon = 0.005);
}

#[test]
fn reference_applicants_match_their_decisions() {
    let controller = LoanController::new().unwrap();
    let applicants = reference_applicants();
    let decisions: Vec<Decision> = applicants
        .iter()
        .map(|(_, application)| controller.evaluate(application).unwrap().decision)
        .collect();

    assert_eq!(applicants[0].1, application(780., 15., 85_000., 8.));
    assert_eq!(applicants[1].1, application(650., 35., 50_000., 3.));
    assert_eq!(applicants[2].1, application(450., 60., 25_000., 1.));
    assert_eq!(decisions, vec![Decision::Approved, Decision::RequiresReview, Decision::Rejected]);
}

#[test]
fn decision_boundaries() {
    assert_eq!(Decision::from_score(0.), Decision::Rejected);
    assert_eq!(Decision::from_score(34.99), Decision::Rejected);
    assert_eq!(Decision::from_score(35.), Decision::RequiresReview);
    assert_eq!(Decision::from_score(69.99), Decision::RequiresReview);
    assert_eq!(Decision::from_score(70.), Decision::Approved);
    assert_eq!(Decision::from_score(100.), Decision::Approved);

    // 560/50/40000/2 lands just below the review threshold
    let evaluation = evaluate(560., 50., 40_000., 2.);

    assert_abs_diff_eq!(evaluation.approval_score, 34.62, epsilon = 0.05);
    assert_eq!(evaluation.decision, Decision::Rejected);
}

#[test]
fn scores_have_two_decimals_and_stay_in_range() {
    let controller = LoanController::new().unwrap();

    for credit_score in [300., 480., 560., 650., 700., 780., 850.] {
        for debt_ratio in [0., 30., 50., 100.] {
            let evaluation = controller
                .evaluate(&application(credit_score, debt_ratio, 60_000., 4.))
                .unwrap();

            assert!((0. ..=100.).contains(&evaluation.approval_score));
            assert!((3. ..=25.).contains(&evaluation.interest_rate));
            assert_abs_diff_eq!(
                evaluation.approval_score * 100.,
                (evaluation.approval_score * 100.).round(),
                epsilon = 1e-6
            );
            assert_eq!(evaluation.decision, Decision::from_score(evaluation.approval_score));
        }
    }
}

#[test]
fn no_rule_fired_falls_back_to_midpoints() {
    let controller = LoanController::new().unwrap();
    let evaluation = controller
        .evaluate_with_diagnostics(&application(640., 20., 100_000., 5.))
        .unwrap();
    let diagnostics = evaluation.diagnostics.unwrap();

    assert!(diagnostics.rules.iter().all(|rule| rule.strength == 0.));
    assert!(diagnostics.aggregated.iter().all(|set| set.is_empty()));
    assert_eq!(evaluation.approval_score, 50.);
    assert_eq!(evaluation.interest_rate, 14.);
    assert_eq!(evaluation.decision, Decision::RequiresReview);
}

#[test]
fn domain_boundaries_give_finite_results() {
    let controller = LoanController::new().unwrap();

    for app in [
        application(300., 0., 0., 0.),
        application(850., 100., 200_000., 40.),
        application(300., 100., 200_000., 0.),
        application(850., 0., 0., 40.),
    ] {
        let evaluation = controller.evaluate(&app).unwrap();

        assert!(evaluation.approval_score.is_finite());
        assert!(evaluation.interest_rate.is_finite());
    }

    // Poor credit at the lower bound is a full member of "poor"
    let evaluation = controller
        .evaluate_with_diagnostics(&application(300., 0., 0., 0.))
        .unwrap();
    let diagnostics = evaluation.diagnostics.unwrap();

    assert_eq!(diagnostics.fuzzified.get("credit_score", "poor"), Some(1.));
    assert_eq!(evaluation.decision, Decision::Rejected);
}

#[test]
fn out_of_range_inputs_are_clamped() {
    let controller = LoanController::new().unwrap();
    let inside = controller.evaluate(&application(850., 0., 200_000., 40.)).unwrap();
    let outside = controller
        .evaluate(&application(920., -5., 1_000_000., 55.))
        .unwrap();

    assert_eq!(inside, outside);
}

#[test]
fn diagnostics_expose_the_pipeline() {
    let controller = LoanController::new().unwrap();
    let evaluation = controller
        .evaluate_with_diagnostics(&application(780., 15., 85_000., 8.))
        .unwrap();
    let diagnostics = evaluation.diagnostics.as_ref().unwrap();

    assert_eq!(diagnostics.fuzzified.iter().count(), 4);
    assert_abs_diff_eq!(diagnostics.fuzzified.get("credit_score", "excellent").unwrap(), 0.75);
    assert_abs_diff_eq!(diagnostics.fuzzified.get("credit_score", "good").unwrap(), 0.);
    assert_eq!(diagnostics.rules.len(), 8);
    assert_eq!(diagnostics.rules[0].name.as_deref(), Some("excellent credit and low debt"));
    assert_abs_diff_eq!(diagnostics.rules[0].strength, 0.75);
    assert_eq!(diagnostics.aggregated.len(), 2);

    let approval = &diagnostics.aggregated[0];

    assert_eq!(approval.variable(), "approval_score");
    assert_eq!(approval.samples().len(), 1000);
    assert_abs_diff_eq!(approval.height(), 0.75);

    let json = serde_json::to_value(&evaluation).unwrap();

    assert_eq!(json["decision"], "APPROVED");
    assert_eq!(json["diagnostics"]["fuzzified"]["debt_ratio"]["low"], 1.0);
    assert!(json["diagnostics"]["aggregated"][1]["samples"].is_array());
}

#[test]
fn batch_isolates_bad_records() {
    let controller = LoanController::new().unwrap();
    let results = controller.evaluate_batch(&[
        application(780., 15., 85_000., 8.),
        application(f64::NAN, 15., 85_000., 8.),
        application(450., 60., 25_000., 1.),
    ]);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().decision, Decision::Approved);
    assert!(matches!(
        &results[1],
        Err(EvaluationError::NonFiniteInput { variable, .. }) if variable == "credit_score"
    ));
    assert_eq!(results[2].as_ref().unwrap().decision, Decision::Rejected);
}

#[test]
fn engines_are_independent_and_configurable() {
    let mut config = EngineConfig::loan_default().unwrap();

    assert_eq!(config.rules.len(), 8);
    assert_eq!(config.resolution, Some(1000));

    // Round trip through JSON gives the same engine
    let json = config.to_json_string_pretty().unwrap();
    let reloaded = EngineConfig::from_json_str(&json).unwrap();

    assert_eq!(reloaded, config);

    let standard = LoanController::new().unwrap();
    let rebuilt = LoanController::with_engine(reloaded.build().unwrap()).unwrap();
    let app = application(700., 30., 75_000., 5.);

    assert_eq!(standard.evaluate(&app).unwrap(), rebuilt.evaluate(&app).unwrap());

    // Dropping the "good credit, medium debt" rule changes only the new engine
    config
        .rules
        .retain(|rule| rule.name.as_deref() != Some("good credit, medium debt and medium or high income"));

    let lenient = LoanController::with_engine(config.build().unwrap()).unwrap();

    assert_ne!(standard.evaluate(&app).unwrap(), lenient.evaluate(&app).unwrap());
    assert_eq!(standard.evaluate(&app).unwrap(), rebuilt.evaluate(&app).unwrap());
}

#[test]
fn malformed_configuration_fails_fast() {
    let mut config = EngineConfig::loan_default().unwrap();

    config.variables[0].terms[1].points = vec![620., 500., 720.];

    assert!(matches!(
        config.build(),
        Err(fuzzy_loan::ConfigError::InvalidBreakpoints { .. })
    ));

    let mut config = EngineConfig::loan_default().unwrap();

    config.rules[0].then[0].term = "maybe".to_owned();

    assert!(matches!(
        config.build(),
        Err(fuzzy_loan::ConfigError::UnknownTerm { term, .. }) if term == "maybe"
    ));
}
