//! Renderer-independent description of what the point-arithmetic panels draw.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::PlotConfig;
use crate::math::{Curve, CurvePoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    /// The zero set of `y^2 - (x^3 + ax + b)`.
    ImplicitCurve { a: f64, b: f64 },
    /// `y = slope * x + intercept`
    Line { slope: f64, intercept: f64 },
    VerticalLine { x: f64 },
    Marker { label: String, x: f64, y: f64 },
    Vector { from: [f64; 2], to: [f64; 2] },
}

impl Shape {
    fn marker(label: &str, point: &CurvePoint) -> Option<Shape> {
        if !point.is_real() {
            return None;
        }
        point.coordinates().map(|(x, y)| Shape::Marker {
            label: label.to_string(),
            x,
            y,
        })
    }

    /// One entry of a function-plot `data` array.
    fn to_datum(&self) -> Value {
        match self {
            Shape::ImplicitCurve { a, b } => json!({
                "fn": format!("y^2 - (x^3 + ({}) * x + ({}))", a, b),
                "fnType": "implicit",
            }),
            Shape::Line { slope, intercept } => json!({
                "fn": format!("({}) * x + ({})", slope, intercept),
            }),
            Shape::VerticalLine { x } => json!({
                "fn": format!("x - ({})", x),
                "fnType": "implicit",
            }),
            Shape::Marker { x, y, .. } => json!({
                "points": [[x, y]],
                "fnType": "points",
                "graphType": "scatter",
            }),
            Shape::Vector { from, to } => json!({
                "vector": [to[0] - from[0], to[1] - from[1]],
                "offset": from,
                "fnType": "vector",
                "graphType": "polyline",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotScene {
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub shapes: Vec<Shape>,
}

impl PlotScene {
    pub fn new(config: &PlotConfig, curve: &Curve) -> Self {
        Self {
            x_domain: config.x_domain,
            y_domain: config.y_domain,
            shapes: vec![Shape::ImplicitCurve {
                a: curve.a,
                b: curve.b,
            }],
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Marker { .. }))
    }

    pub fn has_marker(&self, label: &str) -> bool {
        self.markers()
            .any(|shape| matches!(shape, Shape::Marker { label: l, .. } if l == label))
    }

    fn push_marker(&mut self, label: &str, point: &CurvePoint) {
        self.shapes.extend(Shape::marker(label, point));
    }

    /// Draws the chord or tangent through `p` and `q`, the third intersection `-r`
    /// and the reflection vector onto `r = p + q`.
    fn push_construction(&mut self, curve: &Curve, p: &CurvePoint, q: &CurvePoint, r: &CurvePoint) {
        if !(p.is_real() && q.is_real() && r.is_real()) {
            return;
        }
        let (Some((x1, y1)), Some((x2, y2))) = (p.coordinates(), q.coordinates()) else {
            return;
        };

        let Some((x3, y3)) = r.coordinates() else {
            self.shapes.push(Shape::VerticalLine { x: x1 });
            return;
        };

        let slope = if x1 != x2 {
            (y2 - y1) / (x2 - x1)
        } else {
            (3.0 * x1 * x1 + curve.a) / (2.0 * y1)
        };
        self.shapes.push(Shape::Line {
            slope,
            intercept: y1 - slope * x1,
        });
        self.shapes.push(Shape::Marker {
            label: "-R".to_string(),
            x: x3,
            y: -y3,
        });
        self.shapes.push(Shape::Vector {
            from: [x3, -y3],
            to: [x3, y3],
        });
    }

    pub fn for_addition(
        config: &PlotConfig,
        curve: &Curve,
        p: &CurvePoint,
        q: &CurvePoint,
        r: &CurvePoint,
    ) -> Self {
        let mut scene = Self::new(config, curve);
        scene.push_construction(curve, p, q, r);
        scene.push_marker("P", p);
        scene.push_marker("Q", q);
        scene.push_marker("R", r);
        scene
    }

    /// `last` is the operand of the final addition, absent when `n == 1`.
    pub fn for_multiplication(
        config: &PlotConfig,
        curve: &Curve,
        p: &CurvePoint,
        last: Option<&CurvePoint>,
        r: &CurvePoint,
    ) -> Self {
        let mut scene = Self::new(config, curve);
        if let Some(operand) = last {
            scene.push_construction(curve, p, operand, r);
        }
        scene.push_marker("P", p);
        scene.push_marker("Q", r);
        scene
    }

    /// A function-plot options object.
    pub fn to_json(&self) -> Value {
        let annotations: Vec<Value> = self
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Marker { label, x, y } => Some(json!({ "x": x, "y": y, "text": label })),
                _ => None,
            })
            .collect();

        json!({
            "grid": true,
            "xAxis": { "domain": self.x_domain },
            "yAxis": { "domain": self.y_domain },
            "annotations": annotations,
            "data": self.shapes.iter().map(Shape::to_datum).collect::<Vec<_>>(),
        })
    }
}
