use num::Float;

/// Evenly spaced samples over a closed interval, endpoints included.
pub struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does
            let i = F::from(self.index)?;
            self.index += 1;
            Some(self.start + self.step * i)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let xs: Vec<f64> = Linspace::new(0., 1., 5).collect();

    assert_eq!(xs, vec![0., 0.25, 0.5, 0.75, 1.]);

    let xs: Vec<f64> = Linspace::new(3., 25., 1000).collect();

    assert_eq!(xs.len(), 1000);
    assert_eq!(xs[0], 3.);
    approx::assert_abs_diff_eq!(xs[999], 25., epsilon = 1e-9);

    let single: Vec<f64> = Linspace::new(2., 4., 1).collect();

    assert_eq!(single, vec![2.]);
    assert_eq!(Linspace::<f64>::new(0., 1., 0).count(), 0);
}
