use thiserror::Error;

/// Raised while building variables, rules or an engine. Nothing that fails here
/// is ever evaluated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid breakpoints {breakpoints:?}: must be finite and non-decreasing")]
    InvalidBreakpoints { breakpoints: Vec<f64> },

    #[error("variable `{variable}` has an invalid domain [{lo}, {hi}]")]
    InvalidDomain { variable: String, lo: f64, hi: f64 },

    #[error("term `{term}` of variable `{variable}` reaches outside the domain [{lo}, {hi}]")]
    TermOutOfDomain {
        variable: String,
        term: String,
        lo: f64,
        hi: f64,
    },

    #[error("variable `{variable}` defines term `{term}` more than once")]
    DuplicateTerm { variable: String, term: String },

    #[error("variable `{0}` has no terms")]
    EmptyVariable(String),

    #[error("variable `{0}` is defined more than once")]
    DuplicateVariable(String),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("rule {rule}: `{variable}` is an output variable and cannot appear in a premise")]
    NotAnInput { rule: usize, variable: String },

    #[error("rule {rule}: `{variable}` is an input variable and cannot be a consequence")]
    NotAnOutput { rule: usize, variable: String },

    #[error("rule {0}: `and`/`or` needs at least one operand")]
    EmptyExpression(usize),

    #[error("rule {0} has no consequences")]
    NoConsequents(usize),

    #[error("rule {rule}: weight {weight} is outside [0, 1]")]
    InvalidWeight { rule: usize, weight: f64 },

    #[error("the rule base is empty")]
    EmptyRuleBase,

    #[error("defuzzification needs at least 2 samples, got {0}")]
    InvalidResolution(usize),

    #[error("engine has no {kind} variable named `{name}`")]
    MissingVariable { kind: &'static str, name: String },

    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
}

/// Raised for a single evaluation. Other evaluations on the same engine are unaffected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("input `{variable}` is not a finite number ({value})")]
    NonFiniteInput { variable: String, value: f64 },

    #[error("no value given for input `{0}`")]
    MissingInput(String),

    #[error("engine produced no value for output `{0}`")]
    MissingOutput(String),

    #[error("handle is not an input variable of this engine")]
    UnknownVariable,
}
