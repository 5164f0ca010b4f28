// Tests for the L-BFGS structural relaxer driving the Gupta potential.
use nalgebra::DVector;
use ogupta::element::Element;
use ogupta::optimizer::{minimize, MinimizeConfig};
use ogupta::potential::Gupta;

/// Closed-form equilibrium distance of a homonuclear dimer:
/// dU/dr = 0 at s* = ln(XI*Q / (A*P)) / (Q - P), r* = R0 * (1 + s*).
fn dimer_minimum(a: f64, xi: f64, p: f64, q: f64, r0: f64) -> f64 {
    r0 * (1.0 + ((xi * q) / (a * p)).ln() / (q - p))
}

#[test]
fn test_fe_dimer_relaxes_to_closed_form_minimum() {
    let gupta = Gupta::new(vec![Element::Fe, Element::Fe]).unwrap();
    let mut coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 3.1]);

    let result = minimize(&gupta, &mut coords, &MinimizeConfig::default()).unwrap();
    assert!(result.converged, "dimer relaxation should converge");

    let dx = coords[3] - coords[0];
    let dy = coords[4] - coords[1];
    let dz = coords[5] - coords[2];
    let r = (dx * dx + dy * dy + dz * dz).sqrt();

    let expected = dimer_minimum(0.13315, 1.6179, 10.5000, 2.6000, 2.5530);
    assert!(
        (r - expected).abs() < 1e-6,
        "relaxed to {} Å, expected {} Å",
        r,
        expected
    );
    assert_eq!(result.energy, gupta.energy(&coords).unwrap());
}

#[test]
fn test_ni_dimer_relaxes_to_closed_form_minimum() {
    let gupta = Gupta::new(vec![Element::Ni, Element::Ni]).unwrap();
    let mut coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 2.1, 0.0, 0.0]);

    let result = minimize(&gupta, &mut coords, &MinimizeConfig::default()).unwrap();
    assert!(result.converged);

    let r = (coords[3] - coords[0]).abs();
    let expected = dimer_minimum(0.03760, 1.0700, 16.9990, 1.1890, 2.4900);
    assert!((r - expected).abs() < 1e-6);
}

#[test]
fn test_relaxation_decreases_energy() {
    let gupta = Gupta::new(vec![
        Element::Fe,
        Element::Co,
        Element::Ni,
        Element::Fe,
        Element::Co,
    ])
    .unwrap();
    let mut coords = DVector::from_vec(vec![
        0.0, 0.0, 0.0, //
        2.9, 0.0, 0.0, //
        1.4, 2.6, 0.0, //
        1.5, 0.9, 2.5, //
        -0.3, 2.8, 2.4,
    ]);

    let start = gupta.energy(&coords).unwrap();
    let result = minimize(&gupta, &mut coords, &MinimizeConfig::default()).unwrap();

    assert!(result.energy < start);
    assert!(result.iterations > 0);
    // At convergence the residual gradient respects the tolerance.
    if result.converged {
        let grad = gupta.gradient(&coords).unwrap();
        assert!(grad.amax() < MinimizeConfig::default().gradient_tolerance);
    }
}

#[test]
fn test_iteration_cap_is_honored() {
    let gupta = Gupta::new(vec![Element::Fe, Element::Fe, Element::Fe]).unwrap();
    let mut coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 3.4, 0.0, 0.0, 1.7, 3.0, 0.0]);

    let config = MinimizeConfig {
        max_iterations: 3,
        ..MinimizeConfig::default()
    };
    let result = minimize(&gupta, &mut coords, &config).unwrap();
    assert!(result.iterations <= 3);
    assert!(!result.converged);
}

#[test]
fn test_already_converged_input_takes_no_steps() {
    let gupta = Gupta::new(vec![Element::Fe, Element::Fe]).unwrap();
    let r = dimer_minimum(0.13315, 1.6179, 10.5000, 2.6000, 2.5530);
    let mut coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, r]);

    // Loose tolerance: the analytic minimum is already well inside it.
    let config = MinimizeConfig {
        gradient_tolerance: 1e-6,
        ..MinimizeConfig::default()
    };
    let result = minimize(&gupta, &mut coords, &config).unwrap();
    assert!(result.converged);
    assert_eq!(result.iterations, 0);
}
