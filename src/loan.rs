//! The loan approval controller: four applicant indicators in, an approval
//! score and an interest rate out.
//!
//! | input | domain | terms |
//! |---|---|---|
//! | `credit_score` | 300–850 | poor, fair, good, excellent |
//! | `debt_ratio` | 0–100 % | low, medium, high |
//! | `income` | 0–200 000 | low, medium, high |
//! | `employment_duration` | 0–40 years | short, medium, long |
//!
//! `approval_score` (0–100: reject, review, approve) and `interest_rate`
//! (3–25 %: low, medium, high) are inferred from eight rules and mapped to a
//! [`Decision`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decision::Decision;
use crate::error::{ConfigError, EvaluationError};
use crate::inference::MamdaniInference;
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;
use crate::outputs::Diagnostics;
use crate::rules::Rules;
use crate::terms::Terms;
use crate::variable::{Variable, VariableKind, Variables};

pub const CREDIT_SCORE: &str = "credit_score";
pub const DEBT_RATIO: &str = "debt_ratio";
pub const INCOME: &str = "income";
pub const EMPLOYMENT_DURATION: &str = "employment_duration";
pub const APPROVAL_SCORE: &str = "approval_score";
pub const INTEREST_RATE: &str = "interest_rate";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// FICO score, 300–850
    pub credit_score: f64,
    /// Debt-to-income ratio in percent, 0–100
    pub debt_ratio: f64,
    /// Annual income in dollars, 0–200 000
    pub income: f64,
    /// Years with the current employer, 0–40
    pub employment_duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoanEvaluation {
    pub decision: Decision,
    /// Rounded to two decimals
    pub approval_score: f64,
    /// Annual percentage rate, rounded to two decimals
    pub interest_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

/// Handles of the loan variables inside an engine.
#[derive(Clone, Copy, Debug)]
pub struct LoanVariables {
    pub credit_score: Variable,
    pub debt_ratio: Variable,
    pub income: Variable,
    pub employment_duration: Variable,
    pub approval_score: Variable,
    pub interest_rate: Variable,
}

impl LoanVariables {
    fn find(vars: &Variables) -> Result<Self, ConfigError> {
        let get = |name: &str, kind: VariableKind| {
            vars.find(name)
                .filter(|var| vars.get(*var).map(|v| v.kind()) == Some(kind))
                .ok_or_else(|| ConfigError::MissingVariable {
                    kind: kind.as_str(),
                    name: name.to_owned(),
                })
        };

        Ok(Self {
            credit_score: get(CREDIT_SCORE, VariableKind::Input)?,
            debt_ratio: get(DEBT_RATIO, VariableKind::Input)?,
            income: get(INCOME, VariableKind::Input)?,
            employment_duration: get(EMPLOYMENT_DURATION, VariableKind::Input)?,
            approval_score: get(APPROVAL_SCORE, VariableKind::Output)?,
            interest_rate: get(INTEREST_RATE, VariableKind::Output)?,
        })
    }
}

/// The standard loan variables.
pub fn standard_variables() -> Result<(Variables, LoanVariables), ConfigError> {
    use MembershipFunction as Mf;

    let mut vars = Variables::new();

    let handles = LoanVariables {
        credit_score: vars.add_input(
            CREDIT_SCORE,
            300. ..=850.,
            Terms::new()
                .with("poor", Mf::trapezoidal(300., 300., 500., 580.)?)
                .with("fair", Mf::triangular(500., 620., 720.)?)
                .with("good", Mf::triangular(650., 720., 780.)?)
                .with("excellent", Mf::trapezoidal(720., 800., 850., 850.)?),
        )?,
        // Medium and high overlap around the 43% qualified-mortgage ceiling
        debt_ratio: vars.add_input(
            DEBT_RATIO,
            0. ..=100.,
            Terms::new()
                .with("low", Mf::trapezoidal(0., 0., 20., 35.)?)
                .with("medium", Mf::triangular(25., 40., 55.)?)
                .with("high", Mf::trapezoidal(45., 60., 100., 100.)?),
        )?,
        income: vars.add_input(
            INCOME,
            0. ..=200_000.,
            Terms::new()
                .with("low", Mf::trapezoidal(0., 0., 30_000., 50_000.)?)
                .with("medium", Mf::triangular(35_000., 70_000., 120_000.)?)
                .with("high", Mf::trapezoidal(80_000., 150_000., 200_000., 200_000.)?),
        )?,
        employment_duration: vars.add_input(
            EMPLOYMENT_DURATION,
            0. ..=40.,
            Terms::new()
                .with("short", Mf::trapezoidal(0., 0., 1., 3.)?)
                .with("medium", Mf::triangular(2., 5., 10.)?)
                .with("long", Mf::trapezoidal(7., 15., 40., 40.)?),
        )?,
        approval_score: vars.add_output(
            APPROVAL_SCORE,
            0. ..=100.,
            Terms::new()
                .with("reject", Mf::trapezoidal(0., 0., 15., 35.)?)
                .with("review", Mf::trapezoidal(20., 40., 60., 80.)?)
                .with("approve", Mf::trapezoidal(65., 85., 100., 100.)?),
        )?,
        interest_rate: vars.add_output(
            INTEREST_RATE,
            3. ..=25.,
            Terms::new()
                .with("low", Mf::trapezoidal(3., 3., 6., 9.)?)
                .with("medium", Mf::trapezoidal(7., 10., 14., 17.)?)
                .with("high", Mf::trapezoidal(15., 20., 25., 25.)?),
        )?,
    };

    Ok((vars, handles))
}

/// The eight standard underwriting rules.
pub fn standard_rules(v: &LoanVariables) -> Rules {
    let mut rules = Rules::with_capacity(8);

    rules.add_named(
        "excellent credit and low debt",
        v.credit_score.is("excellent").and(v.debt_ratio.is("low")),
        [v.approval_score.then("approve"), v.interest_rate.then("low")],
    );
    rules.add_named(
        "good credit, low debt and high income",
        v.credit_score
            .is("good")
            .and2(v.debt_ratio.is("low"), v.income.is("high")),
        [v.approval_score.then("approve"), v.interest_rate.then("low")],
    );
    rules.add_named(
        "good credit, medium debt and medium or high income",
        v.credit_score.is("good").and2(
            v.debt_ratio.is("medium"),
            v.income.is("medium").or(v.income.is("high")),
        ),
        [v.approval_score.then("approve"), v.interest_rate.then("medium")],
    );
    rules.add_named(
        "fair credit, low debt and long employment",
        v.credit_score
            .is("fair")
            .and2(v.debt_ratio.is("low"), v.employment_duration.is("long")),
        [v.approval_score.then("review"), v.interest_rate.then("medium")],
    );
    rules.add_named(
        "fair credit and medium debt",
        v.credit_score.is("fair").and(v.debt_ratio.is("medium")),
        [v.approval_score.then("review"), v.interest_rate.then("medium")],
    );
    rules.add_named(
        "poor credit or high debt",
        v.credit_score.is("poor").or(v.debt_ratio.is("high")),
        [v.approval_score.then("reject"), v.interest_rate.then("high")],
    );
    rules.add_named(
        "low income and short employment",
        v.income.is("low").and(v.employment_duration.is("short")),
        [v.approval_score.then("reject"), v.interest_rate.then("high")],
    );
    rules.add_named(
        "excellent credit and medium debt",
        v.credit_score.is("excellent").and(v.debt_ratio.is("medium")),
        [v.approval_score.then("approve"), v.interest_rate.then("medium")],
    );

    rules
}

/// One approvable, one borderline and one rejectable applicant.
pub fn reference_applicants() -> [(&'static str, LoanApplication); 3] {
    let application = |credit_score, debt_ratio, income, employment_duration| LoanApplication {
        credit_score,
        debt_ratio,
        income,
        employment_duration,
    };

    [
        ("High-Quality Applicant", application(780., 15., 85_000., 8.)),
        ("Medium-Quality Applicant", application(650., 35., 50_000., 3.)),
        ("Poor-Quality Applicant", application(450., 60., 25_000., 1.)),
    ]
}

pub struct LoanController {
    engine: MamdaniInference,
    vars: LoanVariables,
}

impl LoanController {
    /// Controller with the standard variables and rules.
    pub fn new() -> Result<Self, ConfigError> {
        let (vars, handles) = standard_variables()?;
        let rules = standard_rules(&handles);

        Self::with_engine(MamdaniInference::new(vars, rules)?)
    }

    /// Wraps any engine that defines the six loan variables by name.
    pub fn with_engine(engine: MamdaniInference) -> Result<Self, ConfigError> {
        let vars = LoanVariables::find(engine.variables())?;

        Ok(Self { engine, vars })
    }

    pub fn engine(&self) -> &MamdaniInference {
        &self.engine
    }

    pub fn evaluate(&self, application: &LoanApplication) -> Result<LoanEvaluation, EvaluationError> {
        self.run(application, false)
    }

    /// Like [`evaluate`](Self::evaluate), keeping the fuzzified inputs, rule
    /// strengths and aggregated output sets.
    pub fn evaluate_with_diagnostics(&self, application: &LoanApplication) -> Result<LoanEvaluation, EvaluationError> {
        self.run(application, true)
    }

    /// Evaluates every application in parallel. Results are in input order and
    /// a failing application does not affect the others.
    pub fn evaluate_batch(&self, applications: &[LoanApplication]) -> Vec<Result<LoanEvaluation, EvaluationError>> {
        applications.par_iter().map(|application| self.evaluate(application)).collect()
    }

    fn run(&self, application: &LoanApplication, keep_diagnostics: bool) -> Result<LoanEvaluation, EvaluationError> {
        let v = &self.vars;
        let inputs = Inputs::new()
            .with(v.credit_score, application.credit_score)
            .with(v.debt_ratio, application.debt_ratio)
            .with(v.income, application.income)
            .with(v.employment_duration, application.employment_duration);
        let outputs = self.engine.eval(&inputs)?;
        let missing = |name: &str| EvaluationError::MissingOutput(name.to_owned());
        let approval_score = round2(
            outputs
                .get_inferred_membership(v.approval_score)
                .ok_or_else(|| missing(APPROVAL_SCORE))?,
        );
        let interest_rate = round2(
            outputs
                .get_inferred_membership(v.interest_rate)
                .ok_or_else(|| missing(INTEREST_RATE))?,
        );
        let decision = Decision::from_score(approval_score);

        debug!(%decision, approval_score, interest_rate, "loan evaluated");

        Ok(LoanEvaluation {
            decision,
            approval_score,
            interest_rate,
            diagnostics: keep_diagnostics.then(|| outputs.into_diagnostics()),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.).round() / 100.
}

#[test]
fn test_standard_configuration() {
    let controller = LoanController::new().unwrap();
    let engine = controller.engine();

    assert_eq!(engine.variables().len(), 6);
    assert_eq!(engine.rules().len(), 8);
    assert_eq!(engine.resolution(), crate::inference::DEFAULT_RESOLUTION);
}

#[test]
fn test_missing_loan_variable() {
    let (vars, _) = standard_variables().unwrap();
    let mut partial = Variables::new();

    for (_, var) in vars.iter().filter(|(_, var)| var.name() != INTEREST_RATE) {
        let terms = var.terms().map(|(name, mf)| (name, *mf)).collect();
        let (lo, hi) = var.domain();

        match var.kind() {
            VariableKind::Input => partial.add_input(var.name(), lo..=hi, terms).unwrap(),
            VariableKind::Output => partial.add_output(var.name(), lo..=hi, terms).unwrap(),
        };
    }

    let credit = partial.find(CREDIT_SCORE).unwrap();
    let approval = partial.find(APPROVAL_SCORE).unwrap();
    let mut rules = Rules::new();

    rules.add(credit.is("poor"), [approval.then("reject")]);

    let engine = MamdaniInference::new(partial, rules).unwrap();

    assert!(matches!(
        LoanController::with_engine(engine),
        Err(ConfigError::MissingVariable { kind: "output", name }) if name == INTEREST_RATE
    ));
}

#[test]
fn test_round2() {
    assert_eq!(round2(85.93470417741503), 85.93);
    assert_eq!(round2(5.4752), 5.48);
    assert_eq!(round2(50.), 50.);
}
