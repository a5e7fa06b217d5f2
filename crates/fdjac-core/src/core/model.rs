use nalgebra::{DMatrix, DVector};

/// An ordered sequence of floating-point model parameters.
pub type Model = DVector<f64>;

/// An ordered sequence of forward-model outputs.
pub type Response = DVector<f64>;

/// Dense sensitivity matrix of shape `n_data x n_model`; column `i` holds the
/// sensitivity of all outputs to a perturbation of parameter `i`.
pub type Jacobian = DMatrix<f64>;

/// Default multiplicative step applied to one parameter at a time when
/// constructing finite-difference perturbations.
pub const DEFAULT_PERTURBATION_FACTOR: f64 = 1.05;

/// Builds a copy of `model` with entry `index` scaled by `factor` and returns
/// it together with the realized delta `perturbed - original`.
///
/// The realized delta, not the nominal step, is what callers must divide by
/// when scaling a finite-difference column; the subtraction absorbs the
/// floating-point rounding of the multiplication.
pub fn perturb(model: &Model, index: usize, factor: f64) -> (Model, f64) {
    let mut perturbed = model.clone();
    perturbed[index] *= factor;
    let delta = perturbed[index] - model[index];
    (perturbed, delta)
}
