pub mod elliptic_curve;

pub use self::elliptic_curve::{Curve, CurvePoint};
