//! Mamdani fuzzy inference, with a ready-made loan approval controller.
//!
//! ```
//! use fuzzy_loan::{Decision, LoanApplication, LoanController};
//!
//! let controller = LoanController::new().unwrap();
//! let evaluation = controller
//!     .evaluate(&LoanApplication {
//!         credit_score: 780.,
//!         debt_ratio: 15.,
//!         income: 85_000.,
//!         employment_duration: 8.,
//!     })
//!     .unwrap();
//!
//! assert_eq!(evaluation.decision, Decision::Approved);
//! ```
//!
//! Engines with other variables and rules are built with [`Variables`],
//! [`Rules`] and [`MamdaniInference`], or loaded from JSON with
//! [`config::EngineConfig`].

pub mod config;
mod decision;
mod defuzz;
mod dsl;
mod error;
mod fuzzify;
mod inference;
mod inputs;
mod linspace;
pub mod loan;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod terms;
mod variable;

pub use decision::{Decision, APPROVAL_THRESHOLD, REVIEW_THRESHOLD};
pub use defuzz::centroid;
pub use dsl::{Consequent, Expr};
pub use error::{ConfigError, EvaluationError};
pub use fuzzify::{fuzzify, FuzzifiedInput, Memberships};
pub use inference::{MamdaniInference, DEFAULT_RESOLUTION};
pub use inputs::Inputs;
pub use loan::{LoanApplication, LoanController, LoanEvaluation};
pub use membership::MembershipFunction;
pub use outputs::{AggregatedOutputSet, Diagnostics, Outputs, RuleActivation};
pub use rules::{Rule, Rules};
pub use terms::Terms;
pub use variable::{LinguisticVariable, Variable, VariableKey, VariableKind, Variables};
