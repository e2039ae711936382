/*!
A real elliptic curve is defined as `y^2 = x^3 + ax + b` over `f64`. There is no modulus:
points are plotted, not encrypted, so every operation here is plain floating-point geometry
(chord-and-tangent). The modular arithmetic used by the actual ciphers lives in the backend.

Coordinates follow IEEE semantics: a `NaN` going in comes out as a `NaN`-poisoned point, it is
never turned into an error. Use [`CurvePoint::is_real`] to detect that case.
*/

use log::{debug, warn};
use thiserror::Error;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum CurvePoint {
    Finite { x: f64, y: f64 },
    Infinity,
}

impl CurvePoint {
    pub fn finite(x: f64, y: f64) -> Self {
        CurvePoint::Finite { x, y }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    /// `false` when a coordinate is `NaN` or infinite, e.g. after resolving `y`
    /// for an `x` where `x^3 + ax + b < 0`.
    pub fn is_real(&self) -> bool {
        match self {
            CurvePoint::Infinity => true,
            CurvePoint::Finite { x, y } => x.is_finite() && y.is_finite(),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match *self {
            CurvePoint::Infinity => None,
            CurvePoint::Finite { x, y } => Some((x, y)),
        }
    }

    /// Reflection over the x-axis.
    pub fn negate(&self) -> Self {
        match *self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Finite { x, y } => CurvePoint::Finite { x, y: -y },
        }
    }
}

impl std::fmt::Display for CurvePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurvePoint::Infinity => write!(f, "O"),
            CurvePoint::Finite { x, y } => write!(f, "({}, {})", x, y),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EllipticCurveError {
    #[error("scalar must be at least 1, got {0}")]
    InvalidScalar(u32),
    #[error("cannot multiply the point at infinity")]
    InfiniteBase,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Curve {
    pub a: f64,
    pub b: f64,
}

impl Curve {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// x^3 + ax + b
    pub fn rhs(&self, x: f64) -> f64 {
        x * x * x + self.a * x + self.b
    }

    pub fn discriminant(&self) -> f64 {
        4.0 * self.a.powi(3) + 27.0 * self.b.powi(2)
    }

    /// Singular cubics are still drawn, callers only get told about them.
    pub fn is_singular(&self) -> bool {
        self.discriminant() == 0.0
    }

    /// Exact comparison of `y^2` against `x^3 + ax + b`. Irrational coordinates
    /// almost never pass; see [`Curve::is_on_curve_within`].
    pub fn is_on_curve(&self, point: &CurvePoint) -> bool {
        match *point {
            CurvePoint::Infinity => true,
            CurvePoint::Finite { x, y } => y * y == self.rhs(x),
        }
    }

    pub fn is_on_curve_within(&self, point: &CurvePoint, tolerance: f64) -> bool {
        match *point {
            CurvePoint::Infinity => true,
            CurvePoint::Finite { x, y } => (y * y - self.rhs(x)).abs() <= tolerance,
        }
    }

    /// Replaces `y` by the principal square root of `x^3 + ax + b`.
    /// The result is not real when the right-hand side is negative.
    pub fn resolve_y(&self, point: &CurvePoint) -> CurvePoint {
        match *point {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Finite { x, .. } => CurvePoint::Finite {
                x,
                y: self.rhs(x).sqrt(),
            },
        }
    }

    /// y_3 = -s * (x_3 - x_1) - y_1
    fn third_y(x1: f64, y1: f64, x3: f64, s: f64) -> f64 {
        -s * (x3 - x1) - y1
    }

    /// Membership of `p` and `q` is not checked.
    pub fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        match (*p, *q) {
            (CurvePoint::Infinity, _) => *q,
            (_, CurvePoint::Infinity) => *p,
            (CurvePoint::Finite { x: x1, y: y1 }, CurvePoint::Finite { x: x2, y: y2 }) => {
                // q is the reflection of p, this also covers doubling a point with y = 0
                if x1 == x2 && y1 + y2 == 0.0 {
                    return CurvePoint::Infinity;
                }

                if x1 != x2 {
                    // s = (y2 - y1) / (x2 - x1)
                    let s = (y2 - y1) / (x2 - x1);
                    let x3 = s * s - x1 - x2;
                    return CurvePoint::Finite {
                        x: x3,
                        y: Self::third_y(x1, y1, x3, s),
                    };
                }

                if y1 == y2 && y1 != 0.0 {
                    // s = (3 * x1 ^ 2 + a) / (2 * y1)
                    let s = (3.0 * x1 * x1 + self.a) / (2.0 * y1);
                    let x3 = s * s - 2.0 * x1;
                    return CurvePoint::Finite {
                        x: x3,
                        y: Self::third_y(x1, y1, x3, s),
                    };
                }

                warn!(
                    "no addition rule matches {} + {} on y^2 = x^3 + {}x + {}, returning O",
                    p, q, self.a, self.b
                );
                CurvePoint::Infinity
            }
        }
    }

    pub fn double(&self, p: &CurvePoint) -> CurvePoint {
        self.add(p, p)
    }

    /// Step-by-step view of `n * p` computed as repeated addition.
    pub fn multiplication(
        &self,
        p: &CurvePoint,
        n: u32,
    ) -> Result<ScalarMultiplication<'_>, EllipticCurveError> {
        if n == 0 {
            return Err(EllipticCurveError::InvalidScalar(n));
        }
        if p.is_infinity() {
            return Err(EllipticCurveError::InfiniteBase);
        }
        Ok(ScalarMultiplication {
            curve: self,
            base: *p,
            accumulator: *p,
            completed: 0,
            target: n - 1,
        })
    }

    /// `n * p` by `n - 1` additions. Small scalars only, there is no double-and-add.
    pub fn scalar_mult(&self, p: &CurvePoint, n: u32) -> Result<CurvePoint, EllipticCurveError> {
        let mut steps = self.multiplication(p, n)?;
        for _ in steps.by_ref() {}
        Ok(steps.accumulator())
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MultiplicationState {
    Start,
    Accumulating(u32),
    Done,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct MultiplicationStep {
    /// Additions performed so far; the point equals `(completed + 1) * base`.
    pub completed: u32,
    /// The accumulator the base was added to, after re-resolving `y`.
    pub operand: CurvePoint,
    pub point: CurvePoint,
}

#[derive(Debug, Clone)]
pub struct ScalarMultiplication<'a> {
    curve: &'a Curve,
    base: CurvePoint,
    accumulator: CurvePoint,
    completed: u32,
    target: u32,
}

impl ScalarMultiplication<'_> {
    pub fn state(&self) -> MultiplicationState {
        if self.completed == self.target {
            MultiplicationState::Done
        } else if self.completed == 0 {
            MultiplicationState::Start
        } else {
            MultiplicationState::Accumulating(self.completed)
        }
    }

    pub fn accumulator(&self) -> CurvePoint {
        self.accumulator
    }
}

impl Iterator for ScalarMultiplication<'_> {
    type Item = MultiplicationStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state() == MultiplicationState::Done {
            return None;
        }

        let mut accumulator = self.accumulator;
        if !self.curve.is_on_curve(&accumulator) {
            accumulator = self.curve.resolve_y(&accumulator);
            debug!(
                "step {}: accumulator re-resolved to {}",
                self.completed + 1,
                accumulator
            );
        }
        self.accumulator = self.curve.add(&self.base, &accumulator);
        self.completed += 1;

        Some(MultiplicationStep {
            completed: self.completed,
            operand: accumulator,
            point: self.accumulator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn panel_curve() -> Curve {
        // y^2 = x^3 - 7x + 10
        Curve::new(-7.0, 10.0)
    }

    fn close(p: &CurvePoint, q: &CurvePoint, eps: f64) -> bool {
        match (p, q) {
            (CurvePoint::Infinity, CurvePoint::Infinity) => true,
            (CurvePoint::Finite { x: x1, y: y1 }, CurvePoint::Finite { x: x2, y: y2 }) => {
                (x1 - x2).abs() <= eps && (y1 - y2).abs() <= eps
            }
            _ => false,
        }
    }

    /// A point with the given x on the upper or lower branch, if the curve exists there.
    fn point_at(ec: &Curve, x: f64, upper: bool) -> Option<CurvePoint> {
        let rhs = ec.rhs(x);
        if rhs <= 0.0 {
            return None;
        }
        let y = rhs.sqrt();
        Some(CurvePoint::finite(x, if upper { y } else { -y }))
    }

    #[test]
    fn test_point_on_curve() {
        let ec = panel_curve();
        assert!(ec.is_on_curve(&CurvePoint::finite(1.0, 2.0)));
        assert!(ec.is_on_curve(&CurvePoint::finite(3.0, 4.0)));
        assert!(ec.is_on_curve(&CurvePoint::finite(-3.0, 2.0)));
        assert!(ec.is_on_curve(&CurvePoint::finite(-1.0, -4.0)));
        assert!(ec.is_on_curve(&CurvePoint::Infinity));

        assert!(!ec.is_on_curve(&CurvePoint::finite(1.0, 3.0)));
        assert!(!ec.is_on_curve(&CurvePoint::finite(0.0, 0.0)));
    }

    #[test]
    fn test_membership_is_exact() {
        // y^2 = x^3 + 2, sqrt(2)^2 rounds to 2.0000000000000004
        let ec = Curve::new(0.0, 2.0);
        let p = ec.resolve_y(&CurvePoint::finite(0.0, 0.0));
        assert!(!ec.is_on_curve(&p));
        assert!(ec.is_on_curve_within(&p, 1e-12));
        assert!(!ec.is_on_curve_within(&CurvePoint::finite(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_resolve_y() {
        let ec = panel_curve();
        // 2^3 - 14 + 10 = 4
        let p = ec.resolve_y(&CurvePoint::finite(2.0, 123.0));
        assert_eq!(p, CurvePoint::finite(2.0, 2.0));
        assert!(ec.is_on_curve(&p));

        // only the principal root is produced
        let p = ec.resolve_y(&CurvePoint::finite(-1.0, -4.0));
        assert_eq!(p, CurvePoint::finite(-1.0, 4.0));

        assert_eq!(ec.resolve_y(&CurvePoint::Infinity), CurvePoint::Infinity);
    }

    #[test]
    fn test_resolve_y_outside_the_curve_is_not_real() {
        let ec = panel_curve();
        // (-4)^3 + 28 + 10 = -26
        let p = ec.resolve_y(&CurvePoint::finite(-4.0, 0.0));
        assert!(!p.is_real());
        match p {
            CurvePoint::Finite { x, y } => {
                assert_eq!(x, -4.0);
                assert!(y.is_nan());
            }
            CurvePoint::Infinity => panic!("expected a finite, non-real point"),
        }
    }

    #[test]
    fn test_point_addition() {
        let ec = panel_curve();

        // (1,2) + (3,4) = (-3,2)
        let p1 = CurvePoint::finite(1.0, 2.0);
        let p2 = CurvePoint::finite(3.0, 4.0);
        let pr = CurvePoint::finite(-3.0, 2.0);
        assert_eq!(ec.add(&p1, &p2), pr);
        assert_eq!(ec.add(&p2, &p1), pr);

        // (1,2) + (-1,-4) = (9,-26)
        let p2 = CurvePoint::finite(-1.0, -4.0);
        assert_eq!(ec.add(&p1, &p2), CurvePoint::finite(9.0, -26.0));
        assert_eq!(ec.add(&p2, &p1), CurvePoint::finite(9.0, -26.0));

        // (1,2) + O = (1,2)
        assert_eq!(ec.add(&p1, &CurvePoint::Infinity), p1);
        assert_eq!(ec.add(&CurvePoint::Infinity, &p1), p1);
        // O + O = O
        assert_eq!(
            ec.add(&CurvePoint::Infinity, &CurvePoint::Infinity),
            CurvePoint::Infinity
        );

        // (1,2) + (1,-2) = O
        assert_eq!(ec.add(&p1, &p1.negate()), CurvePoint::Infinity);
        assert_eq!(ec.add(&p1.negate(), &p1), CurvePoint::Infinity);
    }

    #[test]
    fn test_point_doubling() {
        let ec = panel_curve();

        // 2 (1,2) = (-1,-4); the chord slope would be 0/0
        let p1 = CurvePoint::finite(1.0, 2.0);
        let pr = CurvePoint::finite(-1.0, -4.0);
        assert_eq!(ec.add(&p1, &p1), pr);
        assert_eq!(ec.double(&p1), pr);

        // y^2 = x^3 - x has (1,0) of order 2
        let ec = Curve::new(-1.0, 0.0);
        assert_eq!(
            ec.double(&CurvePoint::finite(1.0, 0.0)),
            CurvePoint::Infinity
        );
        assert_eq!(ec.double(&CurvePoint::Infinity), CurvePoint::Infinity);
    }

    #[test]
    fn test_unmatched_addition_falls_back_to_infinity() {
        let ec = panel_curve();
        // same x, unrelated y: not two points of one curve
        let p1 = CurvePoint::finite(1.0, 2.0);
        let p2 = CurvePoint::finite(1.0, 3.0);
        assert_eq!(ec.add(&p1, &p2), CurvePoint::Infinity);
    }

    #[test]
    fn test_nan_propagates() {
        let ec = Curve::new(f64::NAN, 10.0);
        let p = CurvePoint::finite(1.0, 2.0);
        assert!(!ec.double(&p).is_real());
        assert!(!ec.add(&p, &CurvePoint::finite(f64::NAN, 1.0)).is_real());
    }

    #[test]
    fn test_scalar_mult() {
        let ec = panel_curve();
        let a = CurvePoint::finite(1.0, 2.0);

        assert_eq!(ec.scalar_mult(&a, 1).unwrap(), a);
        assert_eq!(ec.scalar_mult(&a, 2).unwrap(), CurvePoint::finite(-1.0, -4.0));
        assert_eq!(ec.scalar_mult(&a, 3).unwrap(), CurvePoint::finite(9.0, -26.0));
        assert_eq!(
            ec.scalar_mult(&a, 4).unwrap(),
            CurvePoint::finite(2.25, 2.375)
        );

        // y^2 = x^3 - x, 2 (1,0) = O and 3 (1,0) = (1,0)
        let ec = Curve::new(-1.0, 0.0);
        let t = CurvePoint::finite(1.0, 0.0);
        assert_eq!(ec.scalar_mult(&t, 2).unwrap(), CurvePoint::Infinity);
        assert_eq!(ec.scalar_mult(&t, 3).unwrap(), t);
    }

    #[test]
    fn test_scalar_mult_rejects_bad_input() {
        let ec = panel_curve();
        let a = CurvePoint::finite(1.0, 2.0);
        assert_eq!(
            ec.scalar_mult(&a, 0),
            Err(EllipticCurveError::InvalidScalar(0))
        );
        assert_eq!(
            ec.scalar_mult(&CurvePoint::Infinity, 3),
            Err(EllipticCurveError::InfiniteBase)
        );
    }

    #[test]
    fn test_scalar_mult_resolves_off_curve_accumulator() {
        // y^2 = x^3 + 2, (0, sqrt(2)) is an inflection point so 3P = O over the reals.
        // sqrt(2) fails the exact membership check, so after the first doubling the
        // accumulator (0, -sqrt(2)) is re-resolved to (0, sqrt(2)) and doubled again.
        let ec = Curve::new(0.0, 2.0);
        let p = ec.resolve_y(&CurvePoint::finite(0.0, 0.0));
        let sqrt2 = 2f64.sqrt();

        assert_eq!(ec.scalar_mult(&p, 2).unwrap(), CurvePoint::finite(0.0, -sqrt2));
        assert_eq!(ec.scalar_mult(&p, 3).unwrap(), CurvePoint::finite(0.0, -sqrt2));
    }

    #[test]
    fn test_multiplication_states() {
        let ec = panel_curve();
        let a = CurvePoint::finite(1.0, 2.0);

        let mut steps = ec.multiplication(&a, 4).unwrap();
        assert_eq!(steps.state(), MultiplicationState::Start);
        assert_eq!(steps.accumulator(), a);

        let step = steps.next().unwrap();
        assert_eq!(step.completed, 1);
        assert_eq!(step.operand, a);
        assert_eq!(step.point, CurvePoint::finite(-1.0, -4.0));
        assert_eq!(steps.state(), MultiplicationState::Accumulating(1));

        steps.next().unwrap();
        assert_eq!(steps.state(), MultiplicationState::Accumulating(2));

        let step = steps.next().unwrap();
        assert_eq!(step.completed, 3);
        assert_eq!(step.operand, CurvePoint::finite(9.0, -26.0));
        assert_eq!(steps.state(), MultiplicationState::Done);
        assert_eq!(steps.next(), None);
        assert_eq!(steps.accumulator(), CurvePoint::finite(2.25, 2.375));

        let steps = ec.multiplication(&a, 1).unwrap();
        assert_eq!(steps.state(), MultiplicationState::Done);
        assert_eq!(steps.count(), 0);
    }

    #[test]
    fn test_group_laws_on_random_points() {
        let ec = panel_curve();
        let mut rng = StdRng::seed_from_u64(7);
        let mut checked = 0;

        while checked < 200 {
            let x1: f64 = rng.gen_range(-3.0..6.0);
            let x2: f64 = rng.gen_range(-3.0..6.0);
            // keep chords away from vertical so the tolerances below stay meaningful
            if (x1 - x2).abs() < 0.1 {
                continue;
            }
            let (Some(p), Some(q)) = (point_at(&ec, x1, rng.gen()), point_at(&ec, x2, rng.gen()))
            else {
                continue;
            };
            checked += 1;

            assert_eq!(ec.add(&p, &CurvePoint::Infinity), p);
            assert_eq!(ec.add(&CurvePoint::Infinity, &p), p);
            assert_eq!(ec.add(&p, &p.negate()), CurvePoint::Infinity);
            assert!(close(&ec.add(&p, &q), &ec.add(&q, &p), 1e-6));

            let r = ec.add(&p, &q);
            let scale = 1.0 + r.coordinates().map_or(0.0, |(_, y)| y * y);
            assert!(ec.is_on_curve_within(&r, 1e-6 * scale));
        }
    }

    #[test]
    fn test_curve_properties() {
        let ec = panel_curve();
        assert_eq!(ec.discriminant(), 4.0 * -343.0 + 27.0 * 100.0);
        assert!(!ec.is_singular());
        assert!(Curve::new(0.0, 0.0).is_singular());
        assert_eq!(ec.rhs(3.0), 16.0);
    }
}
