//! Gradient-based structural relaxation.
//!
//! Drives the potential's `energy`/`gradient` interface with a limited-memory
//! BFGS minimizer: two-loop recursion for the inverse Hessian approximation,
//! backtracking line search under the Armijo sufficient-decrease condition,
//! and a per-atom step cap so very large initial forces (close contacts)
//! cannot throw the geometry apart. The defaults converge on a gradient
//! max-norm of 1e-8 within at most 1000 iterations.
//!
//! Reference: Nocedal & Wright, "Numerical Optimization", 2nd ed.,
//! Algorithms 7.4/7.5.

use crate::potential::{Gupta, Result};
use log::{debug, info, warn};
use nalgebra::DVector;
use std::collections::VecDeque;

/// Tunable parameters of the L-BFGS relaxation.
#[derive(Debug, Clone)]
pub struct MinimizeConfig {
    /// Iteration cap (default: 1000).
    pub max_iterations: u32,
    /// Convergence tolerance on the gradient max-norm in eV/Angstrom
    /// (default: 1e-8).
    pub gradient_tolerance: f64,
    /// Number of (s, y) correction pairs kept for the inverse Hessian
    /// approximation (default: 10).
    pub memory_size: usize,
    /// Maximum displacement of any single atom per step, in Angstroms
    /// (default: 0.3).
    pub max_step: f64,
    /// Armijo sufficient-decrease parameter c1 (default: 1e-4).
    pub line_search_c1: f64,
    /// Smallest step the line search will try before giving up.
    pub line_search_min_step: f64,
    /// Maximum number of backtracking halvings per line search.
    pub line_search_max_iter: u32,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            gradient_tolerance: 1e-8,
            memory_size: 10,
            max_step: 0.3,
            line_search_c1: 1e-4,
            line_search_min_step: 1e-16,
            line_search_max_iter: 40,
        }
    }
}

/// Outcome of a relaxation run.
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Final potential energy in eV.
    pub energy: f64,
    /// Number of iterations performed.
    pub iterations: u32,
    /// Whether the gradient tolerance was reached within the iteration cap.
    pub converged: bool,
}

/// Relaxes a structure in place towards a local minimum of the potential.
///
/// `coords` is the flat coordinate vector and holds the relaxed geometry on
/// return whether or not the run converged.
///
/// # Errors
///
/// Propagates [`crate::potential::GuptaError::ShapeMismatch`] when the
/// coordinate vector does not match the engine's atom count.
pub fn minimize(
    gupta: &Gupta,
    coords: &mut DVector<f64>,
    config: &MinimizeConfig,
) -> Result<MinimizeResult> {
    let mut energy = gupta.energy(coords)?;
    let mut grad = gupta.gradient(coords)?;

    // (s, y, 1/s.y) correction pairs, oldest first.
    let mut history: VecDeque<(DVector<f64>, DVector<f64>, f64)> =
        VecDeque::with_capacity(config.memory_size);

    let mut iterations = 0u32;
    let mut converged = false;

    for _ in 0..config.max_iterations {
        if grad.amax() < config.gradient_tolerance {
            converged = true;
            break;
        }

        let mut direction = two_loop_direction(&grad, &history);

        // Fall back to steepest descent when the approximation has lost the
        // descent property.
        if direction.dot(&grad) >= 0.0 {
            debug!("non-descent direction, resetting L-BFGS history");
            history.clear();
            direction = -&grad;
        }

        let slope = direction.dot(&grad);

        // Scale the trial step so no atom moves more than max_step.
        let mut step = 1.0;
        if config.max_step > 0.0 {
            let max_disp = max_atom_displacement(&direction);
            if max_disp > config.max_step {
                step = config.max_step / max_disp;
            }
        }

        // Backtracking line search with the Armijo condition.
        let mut accepted = None;
        for _ in 0..config.line_search_max_iter {
            let trial = &*coords + step * &direction;
            let trial_energy = gupta.energy(&trial)?;
            if trial_energy <= energy + config.line_search_c1 * step * slope {
                accepted = Some((trial, trial_energy));
                break;
            }
            step *= 0.5;
            if step < config.line_search_min_step {
                break;
            }
        }

        // On line search failure take the smallest step anyway so the run
        // keeps making progress.
        let (new_coords, new_energy) = match accepted {
            Some(found) => found,
            None => {
                warn!("line search failed to satisfy Armijo condition, taking smallest step");
                let trial = &*coords + step * &direction;
                let trial_energy = gupta.energy(&trial)?;
                (trial, trial_energy)
            }
        };

        let new_grad = gupta.gradient(&new_coords)?;
        let s = &new_coords - &*coords;
        let y = &new_grad - &grad;
        let sy = s.dot(&y);

        *coords = new_coords;
        energy = new_energy;
        grad = new_grad;
        iterations += 1;

        // Only curvature-positive pairs keep the approximation positive
        // definite.
        if sy > 1e-10 {
            if history.len() == config.memory_size {
                history.pop_front();
            }
            history.push_back((s, y, 1.0 / sy));
        }

        debug!(
            "iteration {}: energy {:.8} eV, max gradient {:.3e}",
            iterations,
            energy,
            grad.amax()
        );
    }

    if converged {
        info!(
            "relaxation converged after {} iterations, energy {:.6} eV",
            iterations, energy
        );
    } else {
        warn!(
            "relaxation did not converge within {} iterations, max gradient {:.3e}",
            config.max_iterations,
            grad.amax()
        );
    }

    Ok(MinimizeResult {
        energy,
        iterations,
        converged,
    })
}

/// L-BFGS two-loop recursion: returns -H_k * g_k.
fn two_loop_direction(
    grad: &DVector<f64>,
    history: &VecDeque<(DVector<f64>, DVector<f64>, f64)>,
) -> DVector<f64> {
    let mut q = grad.clone();
    let k = history.len();
    let mut alpha = vec![0.0; k];

    for (idx, (s, y, rho)) in history.iter().enumerate().rev() {
        alpha[idx] = rho * s.dot(&q);
        q -= alpha[idx] * y;
    }

    // Initial scaling H_0 = gamma * I with gamma = s.y / y.y.
    if let Some((s, y, _)) = history.back() {
        let yy = y.dot(y);
        if yy > 0.0 {
            q *= s.dot(y) / yy;
        }
    }

    for (idx, (s, y, rho)) in history.iter().enumerate() {
        let beta = rho * y.dot(&q);
        q += (alpha[idx] - beta) * s;
    }

    -q
}

/// Largest per-atom displacement magnitude in a flat direction vector.
fn max_atom_displacement(direction: &DVector<f64>) -> f64 {
    let mut max = 0.0f64;
    let mut i = 0;
    while i + 2 < direction.len() {
        let norm = (direction[i] * direction[i]
            + direction[i + 1] * direction[i + 1]
            + direction[i + 2] * direction[i + 2])
            .sqrt();
        max = max.max(norm);
        i += 3;
    }
    max
}
