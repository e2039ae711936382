use serde::{Deserialize, Serialize};
use std::fmt;

use super::VisualizerError;
use crate::config::{AdditionDefaults, MultiplicationDefaults, DEFAULT_MAX_SCALAR};
use crate::math::{Curve, CurvePoint};

/// The inputs a validation message can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    A,
    B,
    P,
    Q,
    N,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::A => write!(f, "A"),
            Field::B => write!(f, "B"),
            Field::P => write!(f, "P"),
            Field::Q => write!(f, "Q"),
            Field::N => write!(f, "n"),
        }
    }
}

/// Reads a number input: blank, unparseable or non-finite text is `NaN`.
pub fn parse_field(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

fn read_number(field: Field, raw: &str) -> Result<f64, VisualizerError> {
    let value = parse_field(raw);
    if value.is_nan() {
        return Err(VisualizerError::MissingInput(field));
    }
    Ok(value)
}

/// A point needs its x coordinate. A blank y is recovered from the curve.
fn read_point(
    field: Field,
    raw_x: &str,
    raw_y: &str,
    curve: &Curve,
) -> Result<CurvePoint, VisualizerError> {
    let x = read_number(field, raw_x)?;
    let y = parse_field(raw_y);
    if !y.is_nan() {
        return Ok(CurvePoint::finite(x, y));
    }

    let resolved = curve.resolve_y(&CurvePoint::finite(x, 0.0));
    if !resolved.is_real() {
        return Err(VisualizerError::UndefinedConstruction { field, x });
    }
    Ok(resolved)
}

fn read_scalar(raw: &str, max: u32) -> Result<u32, VisualizerError> {
    let n = read_number(Field::N, raw)?;
    if n < 1.0 || n.fract() != 0.0 {
        return Err(VisualizerError::InvalidScalar(n));
    }
    if n > f64::from(max) {
        return Err(VisualizerError::ScalarTooLarge { n, max });
    }
    Ok(n as u32)
}

fn read_curve(raw_a: &str, raw_b: &str) -> Result<Curve, VisualizerError> {
    let a = read_number(Field::A, raw_a)?;
    let b = read_number(Field::B, raw_b)?;
    Ok(Curve::new(a, b))
}

/// A validated calculation, ready for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Addition {
        curve: Curve,
        p: CurvePoint,
        q: CurvePoint,
    },
    Multiplication {
        curve: Curve,
        p: CurvePoint,
        n: u32,
    },
}

impl Request {
    pub fn curve(&self) -> Curve {
        match self {
            Request::Addition { curve, .. } | Request::Multiplication { curve, .. } => *curve,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionForm {
    pub a: String,
    pub b: String,
    pub p_x: String,
    pub p_y: String,
    pub q_x: String,
    pub q_y: String,
}

impl AdditionForm {
    pub fn validate(&self) -> Result<Request, VisualizerError> {
        let curve = read_curve(&self.a, &self.b)?;
        let p = read_point(Field::P, &self.p_x, &self.p_y, &curve)?;
        let q = read_point(Field::Q, &self.q_x, &self.q_y, &curve)?;
        Ok(Request::Addition { curve, p, q })
    }
}

impl From<&AdditionDefaults> for AdditionForm {
    fn from(defaults: &AdditionDefaults) -> Self {
        Self {
            a: defaults.a.to_string(),
            b: defaults.b.to_string(),
            p_x: defaults.p[0].to_string(),
            p_y: defaults.p[1].to_string(),
            q_x: defaults.q[0].to_string(),
            q_y: defaults.q[1].to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicationForm {
    pub a: String,
    pub b: String,
    pub p_x: String,
    pub p_y: String,
    pub n: String,
}

impl MultiplicationForm {
    pub fn validate(&self) -> Result<Request, VisualizerError> {
        self.validate_within(DEFAULT_MAX_SCALAR)
    }

    /// Like [`MultiplicationForm::validate`], rejecting any `n` above `max_n`.
    pub fn validate_within(&self, max_n: u32) -> Result<Request, VisualizerError> {
        let curve = read_curve(&self.a, &self.b)?;
        let p = read_point(Field::P, &self.p_x, &self.p_y, &curve)?;
        let n = read_scalar(&self.n, max_n)?;
        Ok(Request::Multiplication { curve, p, n })
    }
}

impl From<&MultiplicationDefaults> for MultiplicationForm {
    fn from(defaults: &MultiplicationDefaults) -> Self {
        Self {
            a: defaults.a.to_string(),
            b: defaults.b.to_string(),
            p_x: defaults.p[0].to_string(),
            p_y: defaults.p[1].to_string(),
            n: defaults.n.to_string(),
        }
    }
}
