use crate::membership::MembershipFunction;

/// Linguistic terms of a variable, in declaration order. Duplicate names are
/// rejected when the terms are attached to a variable.
#[derive(Clone, Debug, Default)]
pub struct Terms(pub(crate) Vec<(String, MembershipFunction)>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, membership: MembershipFunction) {
        self.0.push((name.into(), membership));
    }

    pub fn with(mut self, name: impl Into<String>, membership: MembershipFunction) -> Self {
        self.insert(name, membership);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, MembershipFunction)> for Terms {
    fn from_iter<I: IntoIterator<Item = (S, MembershipFunction)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, mf)| (name.into(), mf)).collect())
    }
}
