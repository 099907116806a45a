use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::variable::LinguisticVariable;

/// Degree of every term of one variable, in the variable's term order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Memberships(IndexMap<String, f64>);

impl Memberships {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.0.get(term).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(term, degree)| (term.as_str(), *degree))
    }

    pub(crate) fn get_index(&self, index: usize) -> Option<f64> {
        self.0.get_index(index).map(|(_, degree)| *degree)
    }
}

/// Fuzzified crisp inputs of one evaluation, keyed by variable name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FuzzifiedInput(pub(crate) IndexMap<String, Memberships>);

impl FuzzifiedInput {
    pub fn get(&self, variable: &str, term: &str) -> Option<f64> {
        self.0.get(variable)?.get(term)
    }

    pub fn memberships(&self, variable: &str) -> Option<&Memberships> {
        self.0.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Memberships)> {
        self.0.iter().map(|(name, memberships)| (name.as_str(), memberships))
    }

    pub(crate) fn get_index(&self, variable: usize, term: usize) -> Option<f64> {
        self.0.get_index(variable)?.1.get_index(term)
    }
}

/// Converts a crisp value into the degree of every term of `variable`.
///
/// Values outside the domain saturate at the nearest bound instead of failing.
/// The caller is responsible for rejecting non-finite values.
pub fn fuzzify(variable: &LinguisticVariable, crisp_value: f64) -> Memberships {
    let value = variable.clamp(crisp_value);

    if value != crisp_value {
        debug!(variable = variable.name(), crisp_value, clamped = value, "input clamped to domain");
    }

    Memberships(
        variable
            .terms()
            .map(|(term, membership)| (term.to_owned(), membership.degree(value)))
            .collect(),
    )
}

#[test]
fn test_fuzzify() {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;
    use crate::variable::Variables;

    let mut vars = Variables::new();
    let credit = vars
        .add_input(
            "credit_score",
            300. ..=850.,
            Terms::new()
                .with("poor", MembershipFunction::trapezoidal(300., 300., 500., 580.).unwrap())
                .with("fair", MembershipFunction::triangular(500., 620., 720.).unwrap())
                .with("good", MembershipFunction::triangular(650., 720., 780.).unwrap())
                .with("excellent", MembershipFunction::trapezoidal(720., 800., 850., 850.).unwrap()),
        )
        .unwrap();
    let credit = vars.get(credit).unwrap();

    let memberships = fuzzify(credit, 560.);

    assert_eq!(
        memberships.iter().collect::<Vec<_>>(),
        vec![("poor", 0.25), ("fair", 0.5), ("good", 0.), ("excellent", 0.)]
    );

    // Saturates at the domain bounds
    assert_eq!(fuzzify(credit, 120.), fuzzify(credit, 300.));
    assert_eq!(fuzzify(credit, 300.).get("poor"), Some(1.));
    assert_eq!(fuzzify(credit, 1000.).get("excellent"), Some(1.));
    assert_eq!(fuzzify(credit, 1000.).get("missing"), None);
}
