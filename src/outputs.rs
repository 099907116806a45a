use serde::Serialize;
use slotmap::SecondaryMap;

use crate::fuzzify::FuzzifiedInput;
use crate::math::interp;
use crate::variable::{Variable, VariableKey};

/// Max-union of every clipped consequence that targeted one output variable,
/// sampled evenly over its domain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatedOutputSet {
    variable: String,
    domain: (f64, f64),
    samples: Vec<(f64, f64)>,
}

impl AggregatedOutputSet {
    pub(crate) fn new(variable: String, domain: (f64, f64), samples: Vec<(f64, f64)>) -> Self {
        Self {
            variable,
            domain,
            samples,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// `(x, μ(x))` pairs in increasing `x`.
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// Degree at an arbitrary `x`, interpolated between the nearest samples.
    pub fn degree_at(&self, x: f64) -> f64 {
        if x < self.domain.0 || x > self.domain.1 {
            return 0.;
        }

        interp(x, &self.samples)
    }

    pub fn height(&self) -> f64 {
        self.samples.iter().map(|(_, mu)| *mu).fold(0., f64::max)
    }

    /// True when no rule contributed to this output.
    pub fn is_empty(&self) -> bool {
        self.samples.iter().all(|(_, mu)| *mu == 0.)
    }
}

/// Firing strength of one rule during one evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleActivation {
    pub index: usize,
    pub name: Option<String>,
    pub strength: f64,
}

/// Intermediate values of an evaluation, for inspection and plotting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostics {
    pub fuzzified: FuzzifiedInput,
    pub aggregated: Vec<AggregatedOutputSet>,
    pub rules: Vec<RuleActivation>,
}

#[derive(Debug)]
pub struct Outputs {
    defuzzificated_inferred_memberships: SecondaryMap<VariableKey, f64>,
    diagnostics: Diagnostics,
}

impl Outputs {
    pub(crate) fn new(
        defuzzificated_inferred_memberships: SecondaryMap<VariableKey, f64>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            defuzzificated_inferred_memberships,
            diagnostics,
        }
    }

    pub fn get_inferred_membership(&self, var: Variable) -> Option<f64> {
        self.defuzzificated_inferred_memberships.get(var.0).copied()
    }

    pub fn fuzzified(&self) -> &FuzzifiedInput {
        &self.diagnostics.fuzzified
    }

    pub fn aggregated(&self, variable: &str) -> Option<&AggregatedOutputSet> {
        self.diagnostics.aggregated.iter().find(|set| set.variable == variable)
    }

    pub fn rule_activations(&self) -> &[RuleActivation] {
        &self.diagnostics.rules
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

#[test]
fn test_aggregated_set() {
    let set = AggregatedOutputSet::new(
        "approval_score".to_owned(),
        (0., 100.),
        vec![(0., 0.), (50., 0.5), (100., 0.5)],
    );

    assert_eq!(set.degree_at(25.), 0.25);
    assert_eq!(set.degree_at(75.), 0.5);
    assert_eq!(set.degree_at(-1.), 0.);
    assert_eq!(set.height(), 0.5);
    assert!(!set.is_empty());
}
