use crate::constants::{HARTREE_TO_EV, HARTREE_TO_WAVENUMBERS, WAVENUMBER_TO_INVERSE_NM};
use crate::error::{Result, SpectrumError};
use crate::integrals::DipoleMatrices;
use nalgebra::Vector3;
use ndarray::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

pub use settings::SweepSettings;
pub use sweep::{sample_frames, LogObserver, OscillatorSweep, SweepObserver};

mod settings;
mod sweep;

/// Oscillator strength of a single orbital transition at one geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRecord {
    pub initial_state: usize,
    pub final_state: usize,
    /// e_final - e_initial in Hartree, negative for transitions to lower orbitals
    pub energy: f64,
    pub oscillator_strength: f64,
    /// <i|r_u|j> with the origin in the center of mass (a.u.)
    pub dipole: [f64; 3],
}

impl TransitionRecord {
    pub fn energy_ev(&self) -> f64 {
        self.energy * HARTREE_TO_EV
    }

    pub fn energy_inverse_nm(&self) -> f64 {
        self.energy * HARTREE_TO_WAVENUMBERS * WAVENUMBER_TO_INVERSE_NM
    }
}

/// Computes the transition dipole moment and the oscillator strength of the transition
/// `initial_state` -> `final_state`
/// f_i->j = 2/3 * ΔE_i->j * ∑_u <i|r_u - R_u|j>^2
/// where R is the origin of the dipole operator. The dipole matrices are given with respect
/// to the coordinate origin, the shift to R is done with the overlap matrix.
pub fn compute_transition(
    center_of_mass: &Vector3<f64>,
    dipole: &DipoleMatrices,
    coefficients: ArrayView2<f64>,
    energies: ArrayView1<f64>,
    initial_state: usize,
    final_state: usize,
) -> Result<TransitionRecord> {
    let n_orbitals: usize = energies.len();
    if coefficients.ncols() != n_orbitals {
        return Err(SpectrumError::DimensionMismatch {
            context: String::from("number of orbital energies and MO coefficients"),
            expected: coefficients.ncols(),
            found: n_orbitals,
        });
    }
    if coefficients.nrows() != dipole.dim() {
        return Err(SpectrumError::DimensionMismatch {
            context: String::from("basis functions of the MO coefficients and the dipole matrices"),
            expected: dipole.dim(),
            found: coefficients.nrows(),
        });
    }
    for state in [initial_state, final_state] {
        if state >= n_orbitals {
            return Err(SpectrumError::StateOutOfRange { state, n_orbitals });
        }
    }
    let c_i: ArrayView1<f64> = coefficients.column(initial_state);
    let c_j: ArrayView1<f64> = coefficients.column(final_state);
    let energy: f64 = energies[final_state] - energies[initial_state];

    let overlap: f64 = c_i.dot(&dipole.overlap.dot(&c_j));
    let mut components: [f64; 3] = [0.0; 3];
    for (u, matrix) in dipole.components().iter().enumerate() {
        components[u] = c_i.dot(&matrix.dot(&c_j)) - center_of_mass[u] * overlap;
    }
    let sum_squared: f64 = components.iter().map(|d| d * d).sum();

    Ok(TransitionRecord {
        initial_state,
        final_state,
        energy,
        oscillator_strength: 2.0 / 3.0 * energy * sum_squared,
        dipole: components,
    })
}

/// Transitions of a sweep, grouped by the sampled frame and then by the initial state.
/// The records of one group are ordered like the final states of the initial state.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    groups: BTreeMap<(usize, usize), Vec<TransitionRecord>>,
    failed: BTreeSet<usize>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, frame: usize, initial_state: usize, records: Vec<TransitionRecord>) {
        self.groups.insert((frame, initial_state), records);
    }

    /// Frames that could not be computed and are excluded from the spectrum.
    pub fn mark_failed(&mut self, frame: usize) {
        self.failed.insert(frame);
    }

    #[cfg(test)]
    pub fn get(&self, frame: usize, initial_state: usize) -> Option<&[TransitionRecord]> {
        self.groups
            .get(&(frame, initial_state))
            .map(|records| records.as_slice())
    }

    /// Iterates over ((frame, initial state), records) in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &Vec<TransitionRecord>)> {
        self.groups.iter()
    }

    /// Frames that contributed transitions.
    pub fn frames(&self) -> BTreeSet<usize> {
        self.groups.keys().map(|(frame, _)| *frame).collect()
    }

    pub fn n_frames(&self) -> usize {
        self.frames().len()
    }

    pub fn failed_frames(&self) -> &BTreeSet<usize> {
        &self.failed
    }

    pub fn n_transitions(&self) -> usize {
        self.groups.values().map(|records| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.n_transitions() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn symmetric(dim: usize, seed: usize) -> Array2<f64> {
        let a: Array2<f64> = Array2::from_shape_fn((dim, dim), |(i, j)| {
            ((i * 7 + j * 3 + seed * 5) % 13) as f64 * 0.05 - 0.3
        });
        &a + &a.t()
    }

    fn dipole_matrices(dim: usize) -> DipoleMatrices {
        let mut overlap: Array2<f64> = Array2::eye(dim);
        overlap[[0, 1]] = 0.2;
        overlap[[1, 0]] = 0.2;
        DipoleMatrices {
            overlap,
            x: symmetric(dim, 1),
            y: symmetric(dim, 2),
            z: symmetric(dim, 3),
        }
    }

    fn coefficients(dim: usize) -> Array2<f64> {
        Array2::from_shape_fn((dim, dim), |(i, j)| {
            if i == j {
                1.0
            } else {
                0.1 * ((i + 2 * j) % 5) as f64 - 0.2
            }
        })
    }

    #[test]
    fn oscillator_strength_of_a_single_transition() {
        let dim: usize = 2;
        let dipole = DipoleMatrices {
            overlap: Array2::eye(dim),
            x: array![[0.0, 0.5], [0.5, 0.0]],
            y: Array2::zeros((dim, dim)),
            z: array![[0.0, -0.2], [-0.2, 0.0]],
        };
        let energies: Array1<f64> = array![-0.3, -0.1];
        let record = compute_transition(
            &Vector3::new(1.0, 2.0, 3.0),
            &dipole,
            Array2::<f64>::eye(dim).view(),
            energies.view(),
            0,
            1,
        )
        .unwrap();
        assert_abs_diff_eq!(record.energy, 0.2, epsilon = 1e-14);
        assert_eq!(record.dipole, [0.5, 0.0, -0.2]);
        assert_abs_diff_eq!(
            record.oscillator_strength,
            2.0 / 3.0 * 0.2 * (0.25 + 0.04),
            epsilon = 1e-14
        );
    }

    #[test]
    fn swapped_states_flip_the_energy_but_not_the_dipole() {
        let dim: usize = 5;
        let dipole: DipoleMatrices = dipole_matrices(dim);
        let coefficients: Array2<f64> = coefficients(dim);
        let energies: Array1<f64> = array![-0.5, -0.4, -0.1, 0.05, 0.2];
        let center: Vector3<f64> = Vector3::new(0.3, -0.1, 0.7);
        let forward =
            compute_transition(&center, &dipole, coefficients.view(), energies.view(), 1, 3)
                .unwrap();
        let backward =
            compute_transition(&center, &dipole, coefficients.view(), energies.view(), 3, 1)
                .unwrap();
        assert_abs_diff_eq!(forward.energy, -backward.energy, epsilon = 1e-14);
        for u in 0..3 {
            assert_abs_diff_eq!(forward.dipole[u], backward.dipole[u], epsilon = 1e-12);
        }
        assert!(backward.oscillator_strength <= 0.0);
        assert_abs_diff_eq!(
            forward.oscillator_strength,
            -backward.oscillator_strength,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            forward.oscillator_strength / forward.energy,
            backward.oscillator_strength / backward.energy,
            epsilon = 1e-12
        );
    }

    #[test]
    fn origin_shift_uses_the_overlap() {
        let dim: usize = 4;
        let dipole: DipoleMatrices = dipole_matrices(dim);
        let coefficients: Array2<f64> = coefficients(dim);
        let energies: Array1<f64> = array![-0.5, -0.4, -0.1, 0.05];
        let at_origin =
            compute_transition(&Vector3::zeros(), &dipole, coefficients.view(), energies.view(), 0, 2)
                .unwrap();
        let shift: Vector3<f64> = Vector3::new(1.0, 0.0, -2.0);
        let shifted =
            compute_transition(&shift, &dipole, coefficients.view(), energies.view(), 0, 2)
                .unwrap();
        let overlap: f64 = coefficients
            .column(0)
            .dot(&dipole.overlap.dot(&coefficients.column(2)));
        for u in 0..3 {
            assert_abs_diff_eq!(
                shifted.dipole[u],
                at_origin.dipole[u] - shift[u] * overlap,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn states_out_of_range_are_rejected() {
        let dim: usize = 3;
        let dipole: DipoleMatrices = dipole_matrices(dim);
        let energies: Array1<f64> = array![-0.5, -0.4, -0.1];
        let eye: Array2<f64> = Array2::eye(dim);
        assert!(matches!(
            compute_transition(&Vector3::zeros(), &dipole, eye.view(), energies.view(), 0, 3),
            Err(SpectrumError::StateOutOfRange {
                state: 3,
                n_orbitals: 3
            })
        ));
        let wide: Array2<f64> = Array2::zeros((4, 3));
        assert!(matches!(
            compute_transition(&Vector3::zeros(), &dipole, wide.view(), energies.view(), 0, 1),
            Err(SpectrumError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn transition_energy_units() {
        let record = TransitionRecord {
            initial_state: 0,
            final_state: 1,
            energy: 1.0,
            oscillator_strength: 0.0,
            dipole: [0.0; 3],
        };
        assert_abs_diff_eq!(record.energy_ev(), 27.211386245988, epsilon = 1e-12);
        // 1 Hartree = 219474.63 cm^-1 = 0.0219 nm^-1
        assert_abs_diff_eq!(record.energy_inverse_nm(), 0.02194746313632, epsilon = 1e-12);
    }
}
