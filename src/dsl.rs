use crate::variable::Variable;

/// Premise of a rule. `And` takes the minimum of its operands, `Or` the maximum.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(Variable, String),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(vec![self, rhs])
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(vec![self, rhs])
    }

    pub fn and2(self, rhs: Expr, rhs2: Expr) -> Self {
        Expr::And(vec![self, rhs, rhs2])
    }

    pub fn or2(self, rhs: Expr, rhs2: Expr) -> Self {
        Expr::Or(vec![self, rhs, rhs2])
    }
}

/// Output term a rule asserts, clipped at the rule strength times `weight`.
#[derive(Clone, Debug, PartialEq)]
pub struct Consequent {
    pub(crate) var: Variable,
    pub(crate) term: String,
    pub(crate) weight: f64,
}

impl Consequent {
    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn variable(&self) -> Variable {
        self.var
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Variable {
    pub fn is(self, term: impl Into<String>) -> Expr {
        Expr::Is(self, term.into())
    }

    pub fn then(self, term: impl Into<String>) -> Consequent {
        Consequent {
            var: self,
            term: term.into(),
            weight: 1.,
        }
    }
}

#[test]
fn test_builders() {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;
    use crate::variable::Variables;

    let mut vars = Variables::new();
    let terms = || Terms::new().with("low", MembershipFunction::triangular(0., 0., 10.).unwrap());
    let income = vars.add_input("income", 0. ..=10., terms()).unwrap();
    let debt = vars.add_input("debt_ratio", 0. ..=10., terms()).unwrap();
    let rate = vars.add_output("interest_rate", 0. ..=10., terms()).unwrap();

    assert_eq!(
        income.is("low").or2(debt.is("low"), income.is("high")),
        Expr::Or(vec![
            Expr::Is(income, "low".to_owned()),
            Expr::Is(debt, "low".to_owned()),
            Expr::Is(income, "high".to_owned()),
        ])
    );
    assert_eq!(
        income.is("low").and(debt.is("low")),
        Expr::And(vec![Expr::Is(income, "low".to_owned()), Expr::Is(debt, "low".to_owned())])
    );

    let consequent = rate.then("low").weighted(0.25);

    assert_eq!(consequent.variable(), rate);
    assert_eq!(consequent.term(), "low");
    assert_eq!(consequent.weight(), 0.25);
    assert_eq!(rate.then("low").weight(), 1.);
}
