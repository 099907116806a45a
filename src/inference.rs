use slotmap::SecondaryMap;
use tracing::{debug, info_span, trace};

use crate::defuzz::centroid;
use crate::error::{ConfigError, EvaluationError};
use crate::fuzzify::{fuzzify, FuzzifiedInput};
use crate::inputs::Inputs;
use crate::linspace::Linspace;
use crate::ops;
use crate::outputs::{AggregatedOutputSet, Diagnostics, Outputs, RuleActivation};
use crate::rules::{CompiledRule, Premise, Rules};
use crate::variable::{VariableKey, VariableKind, Variables};

/// Number of samples used to discretize each output domain.
pub const DEFAULT_RESOLUTION: usize = 1000;

/// Mamdani inference over a fixed set of variables and rules.
///
/// Everything is validated and pre-computed in the constructor; evaluation only
/// reads from `self`, so one engine can serve any number of threads.
#[derive(Debug)]
pub struct MamdaniInference {
    vars: Variables,
    rules: Rules,
    inputs: Vec<VariableKey>,
    outputs: Vec<OutputUniverse>,
    compiled: Vec<CompiledRule>,
    resolution: usize,
}

/// An output domain and its term membership functions, sampled once.
#[derive(Debug)]
struct OutputUniverse {
    key: VariableKey,
    universe: Vec<f64>,
    terms: Vec<Vec<f64>>,
}

impl MamdaniInference {
    pub fn new(vars: Variables, rules: Rules) -> Result<Self, ConfigError> {
        Self::with_resolution(vars, rules, DEFAULT_RESOLUTION)
    }

    pub fn with_resolution(vars: Variables, rules: Rules, resolution: usize) -> Result<Self, ConfigError> {
        if resolution < 2 {
            return Err(ConfigError::InvalidResolution(resolution));
        }
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleBase);
        }

        let input_positions = positions(&vars, VariableKind::Input);
        let output_positions = positions(&vars, VariableKind::Output);
        let compiled = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| rule.compile(i, &vars, &input_positions, &output_positions))
            .collect::<Result<Vec<_>, _>>()?;
        let inputs = ordered_keys(&input_positions);
        let outputs = ordered_keys(&output_positions)
            .into_iter()
            .map(|key| {
                let var = &vars.0[key];
                let (min_u, max_u) = var.domain();
                let universe: Vec<f64> = Linspace::new(min_u, max_u, resolution).collect();
                let terms = var
                    .terms()
                    .map(|(_, membership)| universe.iter().map(|u| membership.degree(*u)).collect())
                    .collect();

                OutputUniverse { key, universe, terms }
            })
            .collect();

        Ok(Self {
            vars,
            rules,
            inputs,
            outputs,
            compiled,
            resolution,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn eval(&self, inputs: &Inputs) -> Result<Outputs, EvaluationError> {
        let _span = info_span!("evaluate", rules = self.compiled.len()).entered();

        // Values are only read for input variables, anything else is a caller error
        if inputs
            .0
            .keys()
            .any(|key| self.vars.0.get(*key).map(|var| var.kind()) != Some(VariableKind::Input))
        {
            return Err(EvaluationError::UnknownVariable);
        }

        // Fuzzificate crisp facts
        let mut fuzzified = FuzzifiedInput::default();

        for key in &self.inputs {
            let var = &self.vars.0[*key];
            let value = *inputs
                .0
                .get(key)
                .ok_or_else(|| EvaluationError::MissingInput(var.name().to_owned()))?;

            if !value.is_finite() {
                return Err(EvaluationError::NonFiniteInput {
                    variable: var.name().to_owned(),
                    value,
                });
            }

            fuzzified.0.insert(var.name().to_owned(), fuzzify(var, value));
        }

        // Fire rules, clip consequences and aggregate them per output
        let mut aggregated: Vec<Vec<f64>> = self.outputs.iter().map(|o| vec![0.; o.universe.len()]).collect();
        let mut activations = Vec::with_capacity(self.compiled.len());

        for (i, rule) in self.compiled.iter().enumerate() {
            let strength = premise_strength(&rule.premise, &fuzzified);

            trace!(rule = i, name = rule.name.as_deref(), strength, "rule fired");

            for consequent in &rule.consequences {
                let level = strength * consequent.weight;

                // A zero level clips to the zero function, which can't raise the max
                if level > 0. {
                    let output = &self.outputs[consequent.output];

                    ops::aggregate(
                        &mut aggregated[consequent.output],
                        ops::implication(level, &output.terms[consequent.term]),
                    );
                }
            }

            activations.push(RuleActivation {
                index: i,
                name: rule.name.clone(),
                strength,
            });
        }

        // Defuzzificate
        let mut defuzzificated_inferred_memberships = SecondaryMap::with_capacity(self.outputs.len());
        let mut sets = Vec::with_capacity(self.outputs.len());

        for (output, membership) in self.outputs.iter().zip(aggregated) {
            let var = &self.vars.0[output.key];
            let samples = output.universe.iter().copied().zip(membership).collect();
            let set = AggregatedOutputSet::new(var.name().to_owned(), var.domain(), samples);
            let crisp = centroid(&set);

            debug!(variable = var.name(), crisp, "defuzzificated");

            defuzzificated_inferred_memberships.insert(output.key, crisp);
            sets.push(set);
        }

        Ok(Outputs::new(
            defuzzificated_inferred_memberships,
            Diagnostics {
                fuzzified,
                aggregated: sets,
                rules: activations,
            },
        ))
    }
}

fn premise_strength(premise: &Premise, fuzzified: &FuzzifiedInput) -> f64 {
    match premise {
        // Positions were checked when the rule was compiled
        Premise::Term { input, term } => fuzzified.get_index(*input, *term).unwrap_or(0.),
        Premise::And(operands) => ops::and(operands.iter().map(|p| premise_strength(p, fuzzified))),
        Premise::Or(operands) => ops::or(operands.iter().map(|p| premise_strength(p, fuzzified))),
    }
}

/// Position of every variable of `kind`, in arena order.
fn positions(vars: &Variables, kind: VariableKind) -> SecondaryMap<VariableKey, usize> {
    vars.0
        .iter()
        .filter(|(_, var)| var.kind() == kind)
        .enumerate()
        .map(|(position, (key, _))| (key, position))
        .collect()
}

fn ordered_keys(positions: &SecondaryMap<VariableKey, usize>) -> Vec<VariableKey> {
    let mut keys: Vec<_> = positions.iter().map(|(key, position)| (*position, key)).collect();

    keys.sort_unstable_by_key(|(position, _)| *position);
    keys.into_iter().map(|(_, key)| key).collect()
}
