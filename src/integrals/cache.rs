use crate::error::{Result, SpectrumError};
use crate::initialization::{xyz_string, AtomPosition};
use crate::integrals::{MultipoleKernel, MultipoleKind, MultipoleTensor, RawMultipole};
use crate::store::{multipole_key, TensorStore};
use hashbrown::HashMap;
use log::{debug, info};
use ndarray::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempPath};

/// Memoized access to the multipole integrals of the geometries of a trajectory. Each
/// (geometry, multipole kind) pair is computed at most once by the kernel and written to
/// the store; every later request is answered from the store.
pub struct IntegralCache<'a> {
    store: &'a dyn TensorStore,
    kernel: &'a dyn MultipoleKernel,
    project: String,
    basis_name: String,
    scratch: PathBuf,
    enumerate_from: usize,
    // number of basis functions of every geometry that was requested so far
    dimensions: Mutex<HashMap<usize, usize>>,
}

impl<'a> IntegralCache<'a> {
    pub fn new(
        store: &'a dyn TensorStore,
        kernel: &'a dyn MultipoleKernel,
        project: &str,
        basis_name: &str,
        scratch: &Path,
        enumerate_from: usize,
    ) -> Self {
        Self {
            store,
            kernel,
            project: project.to_owned(),
            basis_name: basis_name.to_owned(),
            scratch: scratch.to_path_buf(),
            enumerate_from,
            dimensions: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(&self, point: usize, kind: MultipoleKind) -> String {
        multipole_key(&self.project, point + self.enumerate_from, kind.label())
    }

    /// Returns the multipole tensor of the geometry with the index `point` in the basis
    /// of the integral kernel. The atoms are only used if the tensor is not yet stored.
    pub fn get(
        &self,
        point: usize,
        atoms: &[AtomPosition],
        kind: MultipoleKind,
    ) -> Result<MultipoleTensor> {
        let key: String = self.key(point, kind);
        if self.store.exists(&key) {
            debug!("{} integrals of point {} are read from {}", kind, point, key);
            let tensor: MultipoleTensor =
                MultipoleTensor::from_stored(kind, self.store.read(&key)?)?;
            self.check_dimension(point, kind, tensor.dim())?;
            return Ok(tensor);
        }
        info!("computing the {} integrals of point {}", kind, point);
        let tensor: MultipoleTensor = self.compute(point, atoms, kind)?;
        self.check_dimension(point, kind, tensor.dim())?;
        self.store.write(&key, tensor.data.view().into_dyn())?;
        Ok(tensor)
    }

    fn compute(
        &self,
        point: usize,
        atoms: &[AtomPosition],
        kind: MultipoleKind,
    ) -> Result<MultipoleTensor> {
        fs::create_dir_all(&self.scratch)?;
        let mut file: NamedTempFile = tempfile::Builder::new()
            .prefix(&format!("molecule_{}_{}_", point, kind))
            .suffix(".xyz")
            .tempfile_in(&self.scratch)?;
        file.write_all(xyz_string(atoms, &format!("point {}", point)).as_bytes())?;
        file.flush()?;
        // removed when it goes out of scope, also if the kernel fails
        let geometry: TempPath = file.into_temp_path();
        let raw: RawMultipole = self.kernel.compute(&geometry, &self.basis_name, kind)?;
        MultipoleTensor::from_raw(kind, raw)
    }

    /// All tensors of one geometry have to share the same number of basis functions.
    fn check_dimension(&self, point: usize, kind: MultipoleKind, dim: usize) -> Result<()> {
        let mut dimensions = self
            .dimensions
            .lock()
            .map_err(|_| SpectrumError::DimensionRegistry)?;
        let expected: usize = *dimensions.entry(point).or_insert(dim);
        if expected != dim {
            return Err(SpectrumError::DimensionMismatch {
                context: format!("{} integrals of point {}", kind, point),
                expected,
                found: dim,
            });
        }
        Ok(())
    }
}

/// Overlap and dipole matrices of one geometry, split into the single planes.
#[derive(Debug, Clone)]
pub struct DipoleMatrices {
    pub overlap: Array2<f64>,
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

impl DipoleMatrices {
    pub fn dim(&self) -> usize {
        self.overlap.nrows()
    }

    pub fn components(&self) -> [&Array2<f64>; 3] {
        [&self.x, &self.y, &self.z]
    }
}

impl TryFrom<&MultipoleTensor> for DipoleMatrices {
    type Error = SpectrumError;

    /// Dipole and quadrupole tensors both start with the overlap and the three dipole
    /// planes.
    fn try_from(tensor: &MultipoleTensor) -> Result<Self> {
        if tensor.kind == MultipoleKind::Overlap {
            return Err(SpectrumError::DimensionMismatch {
                context: String::from("components of the dipole matrices"),
                expected: MultipoleKind::Dipole.n_components(),
                found: tensor.kind.n_components(),
            });
        }
        Ok(Self {
            overlap: tensor.plane(0).to_owned(),
            x: tensor.plane(1).to_owned(),
            y: tensor.plane(2).to_owned(),
            z: tensor.plane(3).to_owned(),
        })
    }
}
