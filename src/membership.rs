use crate::error::ConfigError;

/// A piecewise-linear membership function. Breakpoints are validated on
/// construction, so a `MembershipFunction` always has finite, non-decreasing
/// breakpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MembershipFunction(Shape);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Shape {
    Triangular([f64; 3]),
    Trapezoidal([f64; 4]),
}

impl MembershipFunction {
    /// Rises from `a` to a peak at `b`, falls back to zero at `c`.
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        let points = [a, b, c];

        check_breakpoints(&points)?;

        Ok(Self(Shape::Triangular(points)))
    }

    /// Rises from `a` to `b`, stays at one until `c`, falls back to zero at `d`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self, ConfigError> {
        let points = [a, b, c, d];

        check_breakpoints(&points)?;

        Ok(Self(Shape::Trapezoidal(points)))
    }

    pub fn breakpoints(&self) -> &[f64] {
        match &self.0 {
            Shape::Triangular(points) => points.as_slice(),
            Shape::Trapezoidal(points) => points.as_slice(),
        }
    }

    pub fn is_triangular(&self) -> bool {
        matches!(self.0, Shape::Triangular(_))
    }

    /// The closed interval outside of which the degree is always zero.
    pub fn support(&self) -> (f64, f64) {
        let points = self.breakpoints();

        (points[0], points[points.len() - 1])
    }

    /// Degree of membership of `x`, always within [0, 1].
    ///
    /// A zero-width rise or fall takes the plateau value at its boundary, so
    /// `triangular(0, 0, 10)` is one at zero.
    pub fn degree(&self, x: f64) -> f64 {
        // A triangle is a trapezoid whose plateau is the single point `b`
        let (a, b, c, d) = match self.0 {
            Shape::Triangular([a, b, c]) => (a, b, b, c),
            Shape::Trapezoidal([a, b, c, d]) => (a, b, c, d),
        };

        if x.is_nan() || x < a || x > d {
            0.
        } else if x < b {
            // a <= x < b, so the rise has non-zero width
            (x - a) / (b - a)
        } else if x <= c {
            1.
        } else {
            // c < x <= d, so the fall has non-zero width
            (d - x) / (d - c)
        }
    }
}

fn check_breakpoints(points: &[f64]) -> Result<(), ConfigError> {
    let finite = points.iter().all(|p| p.is_finite());
    let sorted = points.windows(2).all(|w| w[0] <= w[1]);

    if finite && sorted {
        Ok(())
    } else {
        Err(ConfigError::InvalidBreakpoints {
            breakpoints: points.to_vec(),
        })
    }
}

#[test]
fn test_triangular() {
    let fair = MembershipFunction::triangular(500., 620., 720.).unwrap();

    assert_eq!(fair.degree(620.), 1.);
    assert_eq!(fair.degree(560.), 0.5);
    assert_eq!(fair.degree(670.), 0.5);
    assert_eq!(fair.degree(500.), 0.);
    assert_eq!(fair.degree(720.), 0.);
    assert_eq!(fair.degree(499.), 0.);
    assert_eq!(fair.degree(721.), 0.);
    assert_eq!(fair.support(), (500., 720.));
    assert!(fair.is_triangular());
}

#[test]
fn test_trapezoidal() {
    let poor = MembershipFunction::trapezoidal(300., 300., 500., 580.).unwrap();

    assert_eq!(poor.degree(300.), 1.);
    assert_eq!(poor.degree(400.), 1.);
    assert_eq!(poor.degree(500.), 1.);
    assert_eq!(poor.degree(540.), 0.5);
    assert_eq!(poor.degree(580.), 0.);
    assert_eq!(poor.degree(299.), 0.);
    assert_eq!(poor.breakpoints(), &[300., 300., 500., 580.]);

    let excellent = MembershipFunction::trapezoidal(720., 800., 850., 850.).unwrap();

    assert_eq!(excellent.degree(850.), 1.);
    assert_eq!(excellent.degree(760.), 0.5);
    assert_eq!(excellent.degree(720.), 0.);
}

#[test]
fn test_degenerate_shapes() {
    let left = MembershipFunction::triangular(0., 0., 10.).unwrap();

    assert_eq!(left.degree(0.), 1.);
    assert_eq!(left.degree(5.), 0.5);

    let right = MembershipFunction::triangular(0., 10., 10.).unwrap();

    assert_eq!(right.degree(10.), 1.);
    assert_eq!(right.degree(5.), 0.5);

    let spike = MembershipFunction::trapezoidal(3., 3., 3., 3.).unwrap();

    assert_eq!(spike.degree(3.), 1.);
    assert_eq!(spike.degree(3.000001), 0.);
    assert_eq!(spike.degree(f64::NAN), 0.);
}

#[test]
fn test_invalid_breakpoints() {
    assert!(matches!(
        MembershipFunction::triangular(10., 5., 20.),
        Err(ConfigError::InvalidBreakpoints { .. })
    ));
    assert!(MembershipFunction::trapezoidal(0., 1., 3., 2.).is_err());
    assert!(MembershipFunction::trapezoidal(0., 1., 2., f64::INFINITY).is_err());
    assert!(MembershipFunction::triangular(f64::NAN, 1., 2.).is_err());
}
