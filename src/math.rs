use num::Float;

/// Similar to numpy.interp, for a single point. `coords` must be sorted by x.
/// Points left or right of the sampled range take the nearest endpoint value.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for pair in coords.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);

        // Actual interpolation. A zero-width pair is never reached: x == x1 == x2 is
        // caught by the pair before it or by the base cases.
        if x1 <= x && x <= x2 {
            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Only reachable for NaN
    F::zero()
}

#[test]
fn test_interp() {
    let coords = [(1., 3.), (2., 2.), (3., 0.)];
    let ys: Vec<f64> = [0., 1., 1.5, 2.72, 3.24].iter().map(|x| interp(*x, &coords)).collect();

    assert_eq!(ys, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];
    let ys: Vec<f64> = [2.5, -1., 7.5].iter().map(|x| interp(*x, &coords)).collect();

    assert_eq!(ys, vec![4., 0., 2.]);
    assert_eq!(interp(f64::NAN, &coords), 0.);

    // Repeated x coordinates form a vertical step, which takes its left value
    let step = [(0., 0.), (1., 0.), (1., 1.), (2., 1.)];

    assert_eq!(interp(0.5, &step), 0.);
    assert_eq!(interp(1., &step), 0.);
    assert_eq!(interp(1.5, &step), 1.);
    assert!(interp(1. + 1e-9, &step) > 0.99);
    assert_eq!(interp(1., &[(1., 0.25), (1., 0.75)]), 0.25);
    assert_eq!(interp(3., &[(1., 0.25), (1., 0.75)]), 0.75);
    assert_eq!(interp::<f64>(1., &[]), 0.);
}
