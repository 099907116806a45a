use slotmap::SecondaryMap;

use crate::dsl::{Consequent, Expr};
use crate::error::ConfigError;
use crate::variable::{VariableKey, Variables};

#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, premise: Expr, consequences: impl IntoIterator<Item = Consequent>) {
        self.0.push(Rule {
            name: None,
            premise,
            consequences: consequences.into_iter().collect(),
        });
    }

    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        premise: Expr,
        consequences: impl IntoIterator<Item = Consequent>,
    ) {
        self.0.push(Rule {
            name: Some(name.into()),
            premise,
            consequences: consequences.into_iter().collect(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) name: Option<String>,
    pub(crate) premise: Expr,
    pub(crate) consequences: Vec<Consequent>,
}

impl Rule {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequences(&self) -> &[Consequent] {
        &self.consequences
    }

    /// Resolves variable handles and term names to positions, checking every
    /// reference against `vars`. `inputs` and `outputs` give the position of
    /// each variable in the engine's evaluation order.
    pub(crate) fn compile(
        &self,
        index: usize,
        vars: &Variables,
        inputs: &SecondaryMap<VariableKey, usize>,
        outputs: &SecondaryMap<VariableKey, usize>,
    ) -> Result<CompiledRule, ConfigError> {
        let premise = compile_premise(&self.premise, index, vars, inputs)?;

        if self.consequences.is_empty() {
            return Err(ConfigError::NoConsequents(index));
        }

        let consequences = self
            .consequences
            .iter()
            .map(|consequent| {
                let (variable, term) = resolve(vars, consequent.var.0, &consequent.term)?;
                let output = outputs.get(consequent.var.0).copied().ok_or_else(|| ConfigError::NotAnOutput {
                    rule: index,
                    variable: variable.to_owned(),
                })?;

                if !(0. ..=1.).contains(&consequent.weight) {
                    return Err(ConfigError::InvalidWeight {
                        rule: index,
                        weight: consequent.weight,
                    });
                }

                Ok(CompiledConsequent {
                    output,
                    term,
                    weight: consequent.weight,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(CompiledRule {
            name: self.name.clone(),
            premise,
            consequences,
        })
    }
}

/// Premise with every proposition resolved to `(input position, term position)`.
#[derive(Clone, Debug)]
pub(crate) enum Premise {
    Term { input: usize, term: usize },
    And(Vec<Premise>),
    Or(Vec<Premise>),
}

#[derive(Clone, Debug)]
pub(crate) struct CompiledConsequent {
    pub(crate) output: usize,
    pub(crate) term: usize,
    pub(crate) weight: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub(crate) name: Option<String>,
    pub(crate) premise: Premise,
    pub(crate) consequences: Vec<CompiledConsequent>,
}

fn resolve<'v>(vars: &'v Variables, key: VariableKey, term: &str) -> Result<(&'v str, usize), ConfigError> {
    let variable = vars
        .0
        .get(key)
        .ok_or_else(|| ConfigError::UnknownVariable(format!("{key:?}")))?;
    let index = variable.term_index(term).ok_or_else(|| ConfigError::UnknownTerm {
        variable: variable.name().to_owned(),
        term: term.to_owned(),
    })?;

    Ok((variable.name(), index))
}

fn compile_premise(
    expr: &Expr,
    rule: usize,
    vars: &Variables,
    inputs: &SecondaryMap<VariableKey, usize>,
) -> Result<Premise, ConfigError> {
    match expr {
        Expr::Is(var, term) => {
            let (variable, term) = resolve(vars, var.0, term)?;
            let input = inputs.get(var.0).copied().ok_or_else(|| ConfigError::NotAnInput {
                rule,
                variable: variable.to_owned(),
            })?;

            Ok(Premise::Term { input, term })
        },
        Expr::And(exprs) | Expr::Or(exprs) => {
            if exprs.is_empty() {
                return Err(ConfigError::EmptyExpression(rule));
            }

            let operands = exprs
                .iter()
                .map(|expr| compile_premise(expr, rule, vars, inputs))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(match expr {
                Expr::And(_) => Premise::And(operands),
                _ => Premise::Or(operands),
            })
        },
    }
}
