use std::ops::RangeInclusive;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::ConfigError;
use crate::membership::MembershipFunction;
use crate::terms::Terms;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Handle to a variable registered in [`Variables`]. Used to build rules and
/// inputs, and to read outputs back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) VariableKey);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Input,
    Output,
}

impl VariableKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

/// A named axis with a closed domain and an ordered set of linguistic terms.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    min_u: f64,
    max_u: f64,
    kind: VariableKind,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    fn new(
        name: String,
        universe_range: RangeInclusive<f64>,
        kind: VariableKind,
        start_terms: Terms,
    ) -> Result<Self, ConfigError> {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !(min_u.is_finite() && max_u.is_finite() && min_u < max_u) {
            return Err(ConfigError::InvalidDomain {
                variable: name,
                lo: min_u,
                hi: max_u,
            });
        }
        if start_terms.is_empty() {
            return Err(ConfigError::EmptyVariable(name));
        }

        let mut terms = IndexMap::with_capacity(start_terms.len());

        for (term, membership) in start_terms.0 {
            let (lo, hi) = membership.support();

            if lo < min_u || hi > max_u {
                return Err(ConfigError::TermOutOfDomain {
                    variable: name,
                    term,
                    lo: min_u,
                    hi: max_u,
                });
            }

            match terms.entry(term) {
                Entry::Occupied(entry) => {
                    return Err(ConfigError::DuplicateTerm {
                        variable: name,
                        term: entry.key().clone(),
                    })
                },
                Entry::Vacant(entry) => {
                    entry.insert(membership);
                },
            }
        }

        Ok(Self {
            name,
            min_u,
            max_u,
            kind,
            terms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min_u, self.max_u)
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_u + self.max_u) / 2.
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min_u, self.max_u)
    }

    pub fn terms(&self) -> impl ExactSizeIterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(name, mf)| (name.as_str(), mf))
    }

    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    pub(crate) fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.get_index_of(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Variables(pub(crate) SlotMap<VariableKey, LinguisticVariable>);

impl Variables {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn add_input(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
    ) -> Result<Variable, ConfigError> {
        self.add(name.into(), universe_range, VariableKind::Input, terms)
    }

    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
    ) -> Result<Variable, ConfigError> {
        self.add(name.into(), universe_range, VariableKind::Output, terms)
    }

    fn add(
        &mut self,
        name: String,
        universe_range: RangeInclusive<f64>,
        kind: VariableKind,
        terms: Terms,
    ) -> Result<Variable, ConfigError> {
        if self.find(&name).is_some() {
            return Err(ConfigError::DuplicateVariable(name));
        }

        let variable = LinguisticVariable::new(name, universe_range, kind, terms)?;

        Ok(Variable(self.0.insert(variable)))
    }

    pub fn get(&self, var: Variable) -> Option<&LinguisticVariable> {
        self.0.get(var.0)
    }

    pub fn find(&self, name: &str) -> Option<Variable> {
        self.0
            .iter()
            .find(|(_, variable)| variable.name == name)
            .map(|(key, _)| Variable(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, &LinguisticVariable)> {
        self.0.iter().map(|(key, variable)| (Variable(key), variable))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
fn debt_terms() -> Terms {
    Terms::new()
        .with("low", MembershipFunction::trapezoidal(0., 0., 20., 35.).unwrap())
        .with("medium", MembershipFunction::triangular(25., 40., 55.).unwrap())
        .with("high", MembershipFunction::trapezoidal(45., 60., 100., 100.).unwrap())
}

#[test]
fn test_add_variables() {
    let mut vars = Variables::new();
    let debt = vars.add_input("debt_ratio", 0. ..=100., debt_terms()).unwrap();
    let variable = vars.get(debt).unwrap();

    assert_eq!(variable.name(), "debt_ratio");
    assert_eq!(variable.kind(), VariableKind::Input);
    assert_eq!(variable.domain(), (0., 100.));
    assert_eq!(variable.midpoint(), 50.);
    assert_eq!(variable.clamp(-4.), 0.);
    assert_eq!(variable.clamp(140.), 100.);
    assert_eq!(
        variable.terms().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["low", "medium", "high"]
    );
    assert_eq!(variable.term_index("high"), Some(2));
    assert_eq!(variable.term("medium").map(|mf| mf.breakpoints()), Some(&[25., 40., 55.][..]));
    assert!(variable.term("extreme").is_none());
    assert_eq!(vars.find("debt_ratio"), Some(debt));
    assert_eq!(vars.find("income"), None);
}

#[test]
fn test_invalid_variables() {
    let mut vars = Variables::new();

    assert!(matches!(
        vars.add_input("debt_ratio", 100. ..=0., debt_terms()),
        Err(ConfigError::InvalidDomain { .. })
    ));
    assert!(matches!(
        vars.add_input("debt_ratio", 0. ..=60., debt_terms()),
        Err(ConfigError::TermOutOfDomain { term, .. }) if term == "high"
    ));
    assert!(matches!(
        vars.add_input("debt_ratio", 0. ..=100., Terms::new()),
        Err(ConfigError::EmptyVariable(_))
    ));

    let duplicated = debt_terms().with("low", MembershipFunction::triangular(0., 5., 10.).unwrap());

    assert!(matches!(
        vars.add_input("debt_ratio", 0. ..=100., duplicated),
        Err(ConfigError::DuplicateTerm { term, .. }) if term == "low"
    ));

    vars.add_input("debt_ratio", 0. ..=100., debt_terms()).unwrap();

    assert!(matches!(
        vars.add_output("debt_ratio", 0. ..=100., debt_terms()),
        Err(ConfigError::DuplicateVariable(_))
    ));
    assert_eq!(vars.len(), 1);
}
