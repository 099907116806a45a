//! Declarative engine configuration, so rule bases can be swapped without
//! recompiling.
//!
//! ```json
//! {
//!   "variables": [
//!     { "name": "credit_score", "kind": "input", "domain": [300, 850],
//!       "terms": [{ "name": "poor", "shape": "trapezoidal", "points": [300, 300, 500, 580] }] },
//!     { "name": "approval_score", "kind": "output", "domain": [0, 100],
//!       "terms": [{ "name": "reject", "shape": "trapezoidal", "points": [0, 0, 15, 35] }] }
//!   ],
//!   "rules": [
//!     { "name": "poor credit",
//!       "when": { "is": { "variable": "credit_score", "term": "poor" } },
//!       "then": [{ "variable": "approval_score", "term": "reject" }] }
//!   ],
//!   "resolution": 1000
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dsl::{Consequent, Expr};
use crate::error::ConfigError;
use crate::inference::{MamdaniInference, DEFAULT_RESOLUTION};
use crate::membership::MembershipFunction;
use crate::rules::Rules;
use crate::terms::Terms;
use crate::variable::{Variable, VariableKind, Variables};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub variables: Vec<VariableConfig>,
    pub rules: Vec<RuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableConfig {
    pub name: String,
    pub kind: VariableKind,
    pub domain: [f64; 2],
    pub terms: Vec<TermConfig>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Triangular,
    Trapezoidal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermConfig {
    pub name: String,
    pub shape: Shape,
    pub points: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub when: ExprConfig,
    pub then: Vec<ConsequentConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprConfig {
    Is { variable: String, term: String },
    And(Vec<ExprConfig>),
    Or(Vec<ExprConfig>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsequentConfig {
    pub variable: String,
    pub term: String,
    #[serde(default = "full_weight")]
    pub weight: f64,
}

fn full_weight() -> f64 {
    1.
}

impl TermConfig {
    fn membership(&self) -> Result<MembershipFunction, ConfigError> {
        match (self.shape, self.points.as_slice()) {
            (Shape::Triangular, &[a, b, c]) => MembershipFunction::triangular(a, b, c),
            (Shape::Trapezoidal, &[a, b, c, d]) => MembershipFunction::trapezoidal(a, b, c, d),
            _ => Err(ConfigError::InvalidBreakpoints {
                breakpoints: self.points.clone(),
            }),
        }
    }
}

impl ExprConfig {
    fn build(&self, vars: &Variables) -> Result<Expr, ConfigError> {
        Ok(match self {
            Self::Is { variable, term } => lookup(vars, variable)?.is(term.as_str()),
            Self::And(exprs) => Expr::And(exprs.iter().map(|e| e.build(vars)).collect::<Result<_, _>>()?),
            Self::Or(exprs) => Expr::Or(exprs.iter().map(|e| e.build(vars)).collect::<Result<_, _>>()?),
        })
    }

    fn from_expr(expr: &Expr, vars: &Variables) -> Self {
        match expr {
            Expr::Is(var, term) => Self::Is {
                variable: name_of(vars, *var),
                term: term.clone(),
            },
            Expr::And(exprs) => Self::And(exprs.iter().map(|e| Self::from_expr(e, vars)).collect()),
            Expr::Or(exprs) => Self::Or(exprs.iter().map(|e| Self::from_expr(e, vars)).collect()),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the configuration and builds an engine from it.
    pub fn build(&self) -> Result<MamdaniInference, ConfigError> {
        let mut vars = Variables::new();

        for variable in &self.variables {
            let terms = collect_terms(variable)?;
            let [lo, hi] = variable.domain;

            match variable.kind {
                VariableKind::Input => vars.add_input(variable.name.as_str(), lo..=hi, terms)?,
                VariableKind::Output => vars.add_output(variable.name.as_str(), lo..=hi, terms)?,
            };
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for rule in &self.rules {
            let premise = rule.when.build(&vars)?;
            let consequences = rule
                .then
                .iter()
                .map(|c| Ok(lookup(&vars, &c.variable)?.then(c.term.as_str()).weighted(c.weight)))
                .collect::<Result<Vec<Consequent>, ConfigError>>()?;

            match &rule.name {
                Some(name) => rules.add_named(name.as_str(), premise, consequences),
                None => rules.add(premise, consequences),
            }
        }

        MamdaniInference::with_resolution(vars, rules, self.resolution.unwrap_or(DEFAULT_RESOLUTION))
    }

    /// Describes an existing engine, so it can be saved and edited.
    pub fn from_engine(engine: &MamdaniInference) -> Self {
        let vars = engine.variables();
        let variables = vars
            .iter()
            .map(|(_, var)| {
                let (lo, hi) = var.domain();

                VariableConfig {
                    name: var.name().to_owned(),
                    kind: var.kind(),
                    domain: [lo, hi],
                    terms: var
                        .terms()
                        .map(|(name, mf)| TermConfig {
                            name: name.to_owned(),
                            shape: if mf.is_triangular() {
                                Shape::Triangular
                            } else {
                                Shape::Trapezoidal
                            },
                            points: mf.breakpoints().to_vec(),
                        })
                        .collect(),
                }
            })
            .collect();
        let rules = engine
            .rules()
            .iter()
            .map(|rule| RuleConfig {
                name: rule.name().map(str::to_owned),
                when: ExprConfig::from_expr(rule.premise(), vars),
                then: rule
                    .consequences()
                    .iter()
                    .map(|c| ConsequentConfig {
                        variable: name_of(vars, c.variable()),
                        term: c.term().to_owned(),
                        weight: c.weight(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            variables,
            rules,
            resolution: Some(engine.resolution()),
        }
    }

    /// The standard loan configuration.
    pub fn loan_default() -> Result<Self, ConfigError> {
        let controller = crate::loan::LoanController::new()?;

        Ok(Self::from_engine(controller.engine()))
    }
}

fn collect_terms(variable: &VariableConfig) -> Result<Terms, ConfigError> {
    variable
        .terms
        .iter()
        .map(|term| Ok((term.name.as_str(), term.membership()?)))
        .collect()
}

fn lookup(vars: &Variables, name: &str) -> Result<Variable, ConfigError> {
    vars.find(name).ok_or_else(|| ConfigError::UnknownVariable(name.to_owned()))
}

// Rules only hold handles validated against `vars`
fn name_of(vars: &Variables, var: Variable) -> String {
    vars.get(var).map(|v| v.name().to_owned()).unwrap_or_default()
}

#[test]
fn test_parse_and_build() {
    let json = r#"{
        "variables": [
            { "name": "service", "kind": "input", "domain": [0, 10], "terms": [
                { "name": "poor", "shape": "trapezoidal", "points": [0, 0, 2, 5] },
                { "name": "good", "shape": "triangular", "points": [2, 5, 8] }
            ] },
            { "name": "tip", "kind": "output", "domain": [0, 30], "terms": [
                { "name": "low", "shape": "triangular", "points": [0, 0, 15] },
                { "name": "high", "shape": "triangular", "points": [15, 30, 30] }
            ] }
        ],
        "rules": [
            { "when": { "is": { "variable": "service", "term": "poor" } },
              "then": [{ "variable": "tip", "term": "low" }] },
            { "name": "good service",
              "when": { "or": [{ "is": { "variable": "service", "term": "good" } }] },
              "then": [{ "variable": "tip", "term": "high", "weight": 0.5 }] }
        ],
        "resolution": 301
    }"#;

    let config = EngineConfig::from_json_str(json).unwrap();

    assert_eq!(config.rules[0].then[0].weight, 1.);

    let engine = config.build().unwrap();

    assert_eq!(engine.resolution(), 301);
    assert_eq!(engine.rules().len(), 2);
    assert_eq!(engine.rules().iter().nth(1).unwrap().name(), Some("good service"));
    assert_eq!(EngineConfig::from_engine(&engine), config);
}

#[test]
fn test_invalid_configs() {
    assert!(matches!(
        EngineConfig::from_json_str(r#"{ "variables": [], "rules": [], "unknown": 1 }"#),
        Err(ConfigError::Parse(_))
    ));

    let bad_points = EngineConfig {
        variables: vec![VariableConfig {
            name: "x".to_owned(),
            kind: VariableKind::Input,
            domain: [0., 1.],
            terms: vec![TermConfig {
                name: "t".to_owned(),
                shape: Shape::Triangular,
                points: vec![0., 1.],
            }],
        }],
        rules: vec![],
        resolution: None,
    };

    assert!(matches!(bad_points.build(), Err(ConfigError::InvalidBreakpoints { .. })));

    let mut unknown_variable = bad_points.clone();

    unknown_variable.variables[0].terms[0].points = vec![0., 0.5, 1.];
    unknown_variable.rules.push(RuleConfig {
        name: None,
        when: ExprConfig::Is {
            variable: "y".to_owned(),
            term: "t".to_owned(),
        },
        then: vec![],
    });

    assert!(matches!(
        unknown_variable.build(),
        Err(ConfigError::UnknownVariable(name)) if name == "y"
    ));
}
