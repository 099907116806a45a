//! Mamdani operators. Premises combine with min/max, consequences are clipped
//! with min and aggregated with max.

use num::Float;

/// And operator for combining the propositions of a rule premise.
pub(crate) fn and<F: Float>(u: impl IntoIterator<Item = F>) -> F {
    u.into_iter().reduce(F::min).unwrap_or_else(F::zero)
}

/// Or operator for combining the propositions of a rule premise.
pub(crate) fn or<F: Float>(u: impl IntoIterator<Item = F>) -> F {
    u.into_iter().reduce(F::max).unwrap_or_else(F::zero)
}

/// Clips a sampled membership function at `level` (the `Rc` implication).
pub(crate) fn implication<F: Float>(level: F, membership: &[F]) -> impl Iterator<Item = F> + '_ {
    membership.iter().map(move |&v| F::min(level, v))
}

/// Folds `v` into `agg` by pointwise maximum (the `Max` production link).
pub(crate) fn aggregate<F: Float>(agg: &mut [F], v: impl IntoIterator<Item = F>) {
    for (u, v) in agg.iter_mut().zip(v) {
        *u = F::max(*u, v);
    }
}

#[test]
fn test_ops() {
    assert_eq!(and([0.4, 0.9, 0.6]), 0.4);
    assert_eq!(or([0.4, 0.9, 0.6]), 0.9);
    assert_eq!(and(std::iter::empty::<f64>()), 0.);

    let membership = [0., 0.5, 1., 0.5, 0.];
    let clipped: Vec<f64> = implication(0.75, &membership).collect();

    assert_eq!(clipped, vec![0., 0.5, 0.75, 0.5, 0.]);

    let mut agg = vec![0.2, 0.2, 0.2, 0.2, 0.2];

    aggregate(&mut agg, clipped);

    assert_eq!(agg, vec![0.2, 0.5, 0.75, 0.5, 0.2]);
}
