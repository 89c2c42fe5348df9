use crate::error::{Result, SpectrumError};
use crate::store::{orbital_key, TensorStore};
use ndarray::prelude::*;

/// Molecular orbital energies and coefficients of one geometry.
#[derive(Debug, Clone)]
pub struct MoFrame {
    /// Orbital energies in Hartree
    pub energies: Array1<f64>,
    /// MO coefficients, the rows run over the basis functions and the columns over the orbitals
    pub coefficients: Array2<f64>,
}

impl MoFrame {
    pub fn new(energies: Array1<f64>, coefficients: Array2<f64>) -> Result<Self> {
        if energies.len() != coefficients.ncols() {
            return Err(SpectrumError::DimensionMismatch {
                context: String::from("number of orbital energies and MO coefficients"),
                expected: coefficients.ncols(),
                found: energies.len(),
            });
        }
        Ok(Self {
            energies,
            coefficients,
        })
    }

    #[cfg(test)]
    pub fn n_orbitals(&self) -> usize {
        self.energies.len()
    }

    pub fn n_basis_functions(&self) -> usize {
        self.coefficients.nrows()
    }
}

/// Source of the electronic structure of the geometries of a trajectory, indexed by the
/// position of the geometry in the trajectory.
pub trait MolecularOrbitalProvider: Send + Sync {
    fn mo_frame(&self, point: usize) -> Result<MoFrame>;
}

/// Reads the MOs that an electronic structure program left in the tensor store under
/// `{project}/point_{i}/mo/eigenvalues` and `{project}/point_{i}/mo/coefficients`.
pub struct StoreMoProvider<'a> {
    store: &'a dyn TensorStore,
    project: String,
    enumerate_from: usize,
}

impl<'a> StoreMoProvider<'a> {
    pub fn new(store: &'a dyn TensorStore, project: &str, enumerate_from: usize) -> Self {
        Self {
            store,
            project: project.to_owned(),
            enumerate_from,
        }
    }
}

impl MolecularOrbitalProvider for StoreMoProvider<'_> {
    fn mo_frame(&self, point: usize) -> Result<MoFrame> {
        let point: usize = point + self.enumerate_from;
        let energies: Array1<f64> = self
            .store
            .read(&orbital_key(&self.project, point, "eigenvalues"))?
            .into_dimensionality::<Ix1>()?;
        let coefficients: Array2<f64> = self
            .store
            .read(&orbital_key(&self.project, point, "coefficients"))?
            .into_dimensionality::<Ix2>()?;
        MoFrame::new(energies, coefficients)
    }
}
