use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<VariableKey, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, var: Variable, val: f64) {
        self.0.insert(var.0, val);
    }

    pub fn with(mut self, var: Variable, val: f64) -> Self {
        self.add(var, val);
        self
    }
}
