use tracing::debug;

use crate::outputs::AggregatedOutputSet;

/// Center of gravity of the sampled set: `Σ x·μ(x) / Σ μ(x)`.
///
/// When nothing fired the set is zero everywhere and the centroid is undefined;
/// the midpoint of the domain is returned instead.
pub fn centroid(set: &AggregatedOutputSet) -> f64 {
    let (num, den) = set
        .samples()
        .iter()
        .fold((0., 0.), |(num, den), &(x, mu)| (num + x * mu, den + mu));

    if den > 0. {
        num / den
    } else {
        let (min_u, max_u) = set.domain();
        let midpoint = (min_u + max_u) / 2.;

        debug!(variable = set.variable(), midpoint, "no rule fired, falling back to midpoint");

        midpoint
    }
}

#[test]
fn test_centroid() {
    use approx::assert_relative_eq;

    let symmetric = AggregatedOutputSet::new(
        "out".to_owned(),
        (0., 4.),
        vec![(0., 0.), (1., 0.5), (2., 1.), (3., 0.5), (4., 0.)],
    );

    assert_relative_eq!(centroid(&symmetric), 2.);

    let skewed = AggregatedOutputSet::new("out".to_owned(), (0., 2.), vec![(0., 0.), (1., 1.), (2., 1.)]);

    assert_relative_eq!(centroid(&skewed), 1.5);
}

#[test]
fn test_centroid_fallback() {
    let empty = AggregatedOutputSet::new("interest_rate".to_owned(), (3., 25.), vec![(3., 0.), (14., 0.), (25., 0.)]);

    assert!(empty.is_empty());
    assert_eq!(centroid(&empty), 14.);
}
