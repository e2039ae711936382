use log::{debug, warn};
use thiserror::Error;

use self::plot::PlotScene;
use crate::config::{Config, PlotConfig, DEFAULT_MAX_SCALAR};
use crate::math::{elliptic_curve::EllipticCurveError, Curve, CurvePoint};

pub mod input;
pub mod plot;

pub use self::input::{parse_field, AdditionForm, Field, MultiplicationForm, Request};

pub const ERROR_DIALOG_TITLE: &str = "Error";
pub const WARNING_DIALOG_TITLE: &str = "Warning";
pub const NON_REAL_RESULT_MESSAGE: &str = "The result is not a real point and cannot be plotted";

/// Relative slack when telling the user an entered point is off the curve.
const MEMBERSHIP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum VisualizerError {
    #[error("Please enter a value for {0}")]
    MissingInput(Field),
    #[error("{field} is not constructible: x^3 + ax + b is negative at x = {x}")]
    UndefinedConstruction { field: Field, x: f64 },
    #[error("n must be a positive integer, got {0}")]
    InvalidScalar(f64),
    #[error("n must not exceed {max}, got {n}")]
    ScalarTooLarge { n: f64, max: u32 },
    #[error(transparent)]
    Curve(#[from] EllipticCurveError),
}

/// Where validation failures end up; the browser shell shows a modal.
pub trait Dialog {
    fn show_error(&mut self, title: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub request: Request,
    pub result: CurvePoint,
    pub scene: PlotScene,
    /// Entered points that do not satisfy the curve equation.
    pub off_curve: Vec<Field>,
}

impl Outcome {
    /// `false` when the result must not be plotted as a point.
    pub fn is_real(&self) -> bool {
        self.result.is_real()
    }
}

fn lies_on(curve: &Curve, point: &CurvePoint) -> bool {
    let scale = 1.0 + point.coordinates().map_or(0.0, |(x, _)| curve.rhs(x).abs());
    curve.is_on_curve_within(point, MEMBERSHIP_TOLERANCE * scale)
}

#[derive(Debug, Clone)]
pub struct Visualizer {
    plot: PlotConfig,
    max_scalar: u32,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(PlotConfig::default())
    }
}

impl Visualizer {
    pub fn new(plot: PlotConfig) -> Self {
        Self {
            plot,
            max_scalar: DEFAULT_MAX_SCALAR,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            plot: config.plot,
            max_scalar: config.multiplication.max_n,
        }
    }

    pub fn calculate(&self, request: Request) -> Result<Outcome, VisualizerError> {
        let (result, scene) = match &request {
            Request::Addition { curve, p, q } => {
                let r = curve.add(p, q);
                (r, PlotScene::for_addition(&self.plot, curve, p, q, &r))
            }
            Request::Multiplication { curve, p, n } => {
                let mut steps = curve.multiplication(p, *n)?;
                let last = steps.by_ref().last();
                let r = steps.accumulator();
                let operand = last.map(|step| step.operand);
                (
                    r,
                    PlotScene::for_multiplication(&self.plot, curve, p, operand.as_ref(), &r),
                )
            }
        };

        let off_curve: Vec<Field> = match &request {
            Request::Addition { curve, p, q } => vec![(Field::P, p), (Field::Q, q)]
                .into_iter()
                .filter(|(_, point)| !lies_on(curve, point))
                .map(|(field, _)| field)
                .collect(),
            Request::Multiplication { curve, p, .. } => {
                if lies_on(curve, p) {
                    vec![]
                } else {
                    vec![Field::P]
                }
            }
        };
        for field in &off_curve {
            warn!("{} of {:?} is not on the curve", field, request);
        }
        if !result.is_real() {
            warn!("result of {:?} is not a real point", request);
        }
        debug!("{:?} = {}", request, result);
        Ok(Outcome {
            request,
            result,
            scene,
            off_curve,
        })
    }

    pub fn submit_addition<D: Dialog>(
        &self,
        form: &AdditionForm,
        dialog: &mut D,
    ) -> Result<Outcome, VisualizerError> {
        self.submit(form.validate(), dialog)
    }

    pub fn submit_multiplication<D: Dialog>(
        &self,
        form: &MultiplicationForm,
        dialog: &mut D,
    ) -> Result<Outcome, VisualizerError> {
        self.submit(form.validate_within(self.max_scalar), dialog)
    }

    fn submit<D: Dialog>(
        &self,
        request: Result<Request, VisualizerError>,
        dialog: &mut D,
    ) -> Result<Outcome, VisualizerError> {
        let outcome = request.and_then(|request| self.calculate(request));
        match &outcome {
            Err(err) => {
                warn!("rejected calculation: {}", err);
                dialog.show_error(ERROR_DIALOG_TITLE, &err.to_string());
            }
            Ok(result) => {
                for field in &result.off_curve {
                    let message = format!("{} does not lie on the curve", field);
                    dialog.show_error(WARNING_DIALOG_TITLE, &message);
                }
                if !result.is_real() {
                    dialog.show_error(ERROR_DIALOG_TITLE, NON_REAL_RESULT_MESSAGE);
                }
            }
        }
        outcome
    }
}
