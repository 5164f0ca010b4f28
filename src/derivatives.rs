//! Analytic first and second derivatives of the Gupta potential.
//!
//! The energy is a closed-form composition of pair distances, exponentials
//! and one square root per atom, so both derivatives are hand-derived rather
//! than obtained by automatic differentiation. With the per-atom band
//! density rho_i = sum of Ub over atom i's pairs, the radial derivative of
//! the energy with respect to one pair distance is
//!
//! ```text
//! f = -(2*P/R0) * Ur + (Q/R0) * Ub * (1/sqrt(rho_i) + 1/sqrt(rho_j))
//! ```
//!
//! and the gradient distributes f along the pair's unit vector. The Hessian
//! splits into pair-local 3x3 blocks (the radial second derivative along the
//! bond plus the f/r transverse part) and a per-atom rank-one band-curvature
//! term (1/(4*rho^{3/2})) * grad(rho) grad(rho)^T that couples every pair of
//! an atom's neighbors.
//!
//! Coincident atoms make the unit vector e = d/r undefined: both derivatives
//! then produce non-finite values. The energy itself stays finite (a large
//! repulsive penalty); callers that may hit degenerate geometries should
//! check the gradient for finiteness.

use crate::parameters::PairParameters;
use crate::potential::{Gupta, PairQuantities, Result};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

impl Gupta {
    /// Gradient of the energy with respect to the coordinates, in eV/Angstrom.
    ///
    /// Returned in the same flat layout as the input: entry 3i+c is the
    /// derivative with respect to coordinate c of atom i.
    ///
    /// # Errors
    ///
    /// Returns [`crate::potential::GuptaError::ShapeMismatch`] if the buffer
    /// does not hold 3 entries per atom.
    pub fn gradient(&self, coords: &DVector<f64>) -> Result<DVector<f64>> {
        self.check_shape(coords)?;
        let pq = self.pair_quantities(coords);
        let inv_sqrt_rho: Vec<f64> = pq.density.iter().map(|rho| 1.0 / rho.sqrt()).collect();

        let mut grad = DVector::zeros(coords.len());
        for (k, pair) in self.table.pairs.iter().enumerate() {
            let f = radial_derivative(&pq, k, &pair.params, &inv_sqrt_rho, pair.i, pair.j);
            let e = unit_vector(coords, pair.i, pair.j, pq.dist[k]);

            let a = pair.i * 3;
            let b = pair.j * 3;
            for c in 0..3 {
                grad[a + c] += f * e[c];
                grad[b + c] -= f * e[c];
            }
        }
        Ok(grad)
    }

    /// Hessian of the energy, a symmetric 3n x 3n matrix in eV/Angstrom^2.
    ///
    /// Rows and columns follow the flat coordinate layout; the 3x3 block at
    /// (3i, 3j) couples atoms i and j.
    ///
    /// # Errors
    ///
    /// Returns [`crate::potential::GuptaError::ShapeMismatch`] if the buffer
    /// does not hold 3 entries per atom.
    pub fn hessian(&self, coords: &DVector<f64>) -> Result<DMatrix<f64>> {
        self.check_shape(coords)?;
        let n = self.num_atoms();
        let pq = self.pair_quantities(coords);
        let inv_sqrt_rho: Vec<f64> = pq.density.iter().map(|rho| 1.0 / rho.sqrt()).collect();

        let mut hess = DMatrix::zeros(3 * n, 3 * n);

        // Per-atom band density gradients, needed for the rank-one curvature
        // term below. grad_rho[i] is dense: in a cluster every atom is a
        // neighbor of every other.
        let mut grad_rho: Vec<DVector<f64>> = vec![DVector::zeros(3 * n); n];

        for (k, pair) in self.table.pairs.iter().enumerate() {
            let p = &pair.params;
            let r = pq.dist[k];
            let e = unit_vector(coords, pair.i, pair.j, r);

            let f = radial_derivative(&pq, k, p, &inv_sqrt_rho, pair.i, pair.j);
            // Radial second derivative along the bond.
            let c2 = (2.0 * p.p * p.p / (p.r0 * p.r0)) * pq.repulsive[k]
                - (2.0 * p.q * p.q / (p.r0 * p.r0))
                    * pq.band[k]
                    * (inv_sqrt_rho[pair.i] + inv_sqrt_rho[pair.j]);

            let outer = e * e.transpose();
            let block: Matrix3<f64> = c2 * outer + (f / r) * (Matrix3::identity() - outer);

            add_block(&mut hess, pair.i, pair.i, &block, 1.0);
            add_block(&mut hess, pair.j, pair.j, &block, 1.0);
            add_block(&mut hess, pair.i, pair.j, &block, -1.0);
            add_block(&mut hess, pair.j, pair.i, &block, -1.0);

            // d(Ub)/dr feeds the band density gradients of both end atoms.
            let db = -(2.0 * p.q / p.r0) * pq.band[k];
            let a = pair.i * 3;
            let b = pair.j * 3;
            for c in 0..3 {
                grad_rho[pair.i][a + c] += db * e[c];
                grad_rho[pair.i][b + c] -= db * e[c];
                grad_rho[pair.j][a + c] += db * e[c];
                grad_rho[pair.j][b + c] -= db * e[c];
            }
        }

        // Band curvature: -sqrt(rho) has second derivative +1/(4*rho^{3/2}).
        for i in 0..n {
            let coeff = 0.25 * inv_sqrt_rho[i].powi(3);
            hess += coeff * &grad_rho[i] * grad_rho[i].transpose();
        }

        Ok(hess)
    }
}

/// Derivative of the total energy with respect to pair k's distance.
fn radial_derivative(
    pq: &PairQuantities,
    k: usize,
    p: &PairParameters,
    inv_sqrt_rho: &[f64],
    i: usize,
    j: usize,
) -> f64 {
    -(2.0 * p.p / p.r0) * pq.repulsive[k]
        + (p.q / p.r0) * pq.band[k] * (inv_sqrt_rho[i] + inv_sqrt_rho[j])
}

/// Unit vector pointing from atom j to atom i.
fn unit_vector(coords: &DVector<f64>, i: usize, j: usize, r: f64) -> Vector3<f64> {
    let a = i * 3;
    let b = j * 3;
    Vector3::new(
        (coords[a] - coords[b]) / r,
        (coords[a + 1] - coords[b + 1]) / r,
        (coords[a + 2] - coords[b + 2]) / r,
    )
}

fn add_block(hess: &mut DMatrix<f64>, i: usize, j: usize, block: &Matrix3<f64>, sign: f64) {
    for r in 0..3 {
        for c in 0..3 {
            hess[(3 * i + r, 3 * j + c)] += sign * block[(r, c)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn trimer() -> (Gupta, DVector<f64>) {
        let gupta = Gupta::new(vec![Element::Fe, Element::Co, Element::Ni]).unwrap();
        let coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 2.45, 0.0, 0.0, 1.2, 2.15, 0.3]);
        (gupta, coords)
    }

    #[test]
    fn test_gradient_sums_to_zero() {
        // Translational invariance: the net force on the cluster vanishes.
        let (gupta, coords) = trimer();
        let grad = gupta.gradient(&coords).unwrap();
        for c in 0..3 {
            let component: f64 = (0..3).map(|i| grad[3 * i + c]).sum();
            assert!(component.abs() < 1e-12, "net force component {}", component);
        }
    }

    #[test]
    fn test_gradient_vanishes_at_dimer_minimum() {
        // For a dimer, dU/dr = 0 at s* = ln(XI*Q/(A*P)) / (Q - P).
        let gupta = Gupta::new(vec![Element::Fe, Element::Fe]).unwrap();
        let (a, xi, p, q, r0): (f64, f64, f64, f64, f64) =
            (0.13315, 1.6179, 10.5000, 2.6000, 2.5530);
        let r_min = r0 * (1.0 + ((xi * q) / (a * p)).ln() / (q - p));
        let coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, r_min]);
        let grad = gupta.gradient(&coords).unwrap();
        assert!(grad.amax() < 1e-10);
    }

    #[test]
    fn test_hessian_rows_sum_to_zero() {
        // A uniform translation costs no energy, so H annihilates it.
        let (gupta, coords) = trimer();
        let hess = gupta.hessian(&coords).unwrap();
        for row in 0..hess.nrows() {
            for c in 0..3 {
                let s: f64 = (0..3).map(|i| hess[(row, 3 * i + c)]).sum();
                assert!(s.abs() < 1e-10, "row {} translation component {}", row, s);
            }
        }
    }

    #[test]
    fn test_coincident_atoms_yield_non_finite_gradient() {
        let gupta = Gupta::new(vec![Element::Fe, Element::Fe]).unwrap();
        let coords = DVector::from_vec(vec![0.0; 6]);
        let grad = gupta.gradient(&coords).unwrap();
        assert!(grad.iter().any(|g| !g.is_finite()));
    }
}
