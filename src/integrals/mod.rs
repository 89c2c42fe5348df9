use crate::error::{Result, SpectrumError};
use ndarray::prelude::*;
use std::fmt;
use std::str::FromStr;

pub use cache::{DipoleMatrices, IntegralCache};
pub use kernel::{ExternalKernel, MultipoleKernel, RawMultipole};
pub use transform::{spherical_polynomials, triangular_to_full, TransformMatrix};

mod cache;
mod kernel;
mod transform;

/// Kind of the multipole integrals. The tensors of the higher multipoles contain all
/// lower orders as well: the dipole tensor is the stack overlap, x, y, z and the
/// quadrupole tensor is the stack overlap, x, y, z, xx, xy, xz, yy, yz, zz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultipoleKind {
    Overlap,
    Dipole,
    Quadrupole,
}

impl MultipoleKind {
    /// Number of matrices stacked in a tensor of this kind.
    pub fn n_components(&self) -> usize {
        match self {
            MultipoleKind::Overlap => 1,
            MultipoleKind::Dipole => 4,
            MultipoleKind::Quadrupole => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MultipoleKind::Overlap => "overlap",
            MultipoleKind::Dipole => "dipole",
            MultipoleKind::Quadrupole => "quadrupole",
        }
    }
}

impl fmt::Display for MultipoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MultipoleKind {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overlap" => Ok(MultipoleKind::Overlap),
            "dipole" => Ok(MultipoleKind::Dipole),
            "quadrupole" => Ok(MultipoleKind::Quadrupole),
            other => Err(SpectrumError::Configuration(format!(
                "unknown multipole: {}, choose one of: overlap, dipole, quadrupole",
                other
            ))),
        }
    }
}

/// Stack of multipole matrices of one geometry. The first axis runs over the
/// components (see [MultipoleKind]), the other two over the basis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipoleTensor {
    pub kind: MultipoleKind,
    pub data: Array3<f64>,
}

impl MultipoleTensor {
    pub fn new(kind: MultipoleKind, data: Array3<f64>) -> Result<Self> {
        let (n_comp, rows, cols) = data.dim();
        if n_comp != kind.n_components() {
            return Err(SpectrumError::DimensionMismatch {
                context: format!("number of {} components", kind),
                expected: kind.n_components(),
                found: n_comp,
            });
        }
        if rows != cols {
            return Err(SpectrumError::DimensionMismatch {
                context: format!("{} matrices are not square", kind),
                expected: rows,
                found: cols,
            });
        }
        Ok(Self { kind, data })
    }

    /// Creates the tensor from the output of the integral kernel. A dense super matrix
    /// has the shape (n_components * dim) x dim and is split into the stacked planes,
    /// the packed variant holds one upper triangle per row.
    pub fn from_raw(kind: MultipoleKind, raw: RawMultipole) -> Result<Self> {
        let n_comp: usize = kind.n_components();
        match raw {
            RawMultipole::Dense(super_matrix) => {
                let (rows, dim) = super_matrix.dim();
                if rows != n_comp * dim {
                    return Err(SpectrumError::DimensionMismatch {
                        context: format!("rows of the {} super matrix", kind),
                        expected: n_comp * dim,
                        found: rows,
                    });
                }
                let data: Array3<f64> = super_matrix
                    .as_standard_layout()
                    .into_owned()
                    .into_shape((n_comp, dim, dim))?;
                Self::new(kind, data)
            }
            RawMultipole::Packed(planes) => {
                if planes.nrows() != n_comp {
                    return Err(SpectrumError::DimensionMismatch {
                        context: format!("packed {} components", kind),
                        expected: n_comp,
                        found: planes.nrows(),
                    });
                }
                let dim: usize = triangular_dimension(planes.ncols())?;
                let mut data: Array3<f64> = Array3::zeros((n_comp, dim, dim));
                for (mut plane, packed) in data.outer_iter_mut().zip(planes.outer_iter()) {
                    plane.assign(&triangular_to_full(packed, dim)?);
                }
                Self::new(kind, data)
            }
        }
    }

    /// Creates the tensor from data that was read from the store. Overlap matrices may be
    /// stored as plain 2D arrays.
    pub fn from_stored(kind: MultipoleKind, stored: ArrayD<f64>) -> Result<Self> {
        let data: Array3<f64> = match stored.ndim() {
            2 => stored.into_dimensionality::<Ix2>()?.insert_axis(Axis(0)),
            _ => stored.into_dimensionality::<Ix3>()?,
        };
        Self::new(kind, data)
    }

    /// Number of basis functions.
    pub fn dim(&self) -> usize {
        self.data.dim().1
    }

    pub fn plane(&self, component: usize) -> ArrayView2<f64> {
        self.data.index_axis(Axis(0), component)
    }
}

/// Edge length of the square matrix whose upper triangle has `n_packed` entries.
fn triangular_dimension(n_packed: usize) -> Result<usize> {
    let dim: usize = (((8 * n_packed + 1) as f64).sqrt() as usize).saturating_sub(1) / 2;
    if dim * (dim + 1) / 2 != n_packed {
        return Err(SpectrumError::DimensionMismatch {
            context: String::from("length of a packed triangular matrix"),
            expected: dim * (dim + 1) / 2,
            found: n_packed,
        });
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_parsed_from_labels() {
        for kind in [
            MultipoleKind::Overlap,
            MultipoleKind::Dipole,
            MultipoleKind::Quadrupole,
        ] {
            assert_eq!(kind.label().parse::<MultipoleKind>().unwrap(), kind);
        }
        assert!("octupole".parse::<MultipoleKind>().is_err());
    }

    #[test]
    fn dense_super_matrix_is_split_into_planes() {
        let dim: usize = 3;
        let super_matrix: Array2<f64> =
            Array2::from_shape_fn((4 * dim, dim), |(i, j)| (100 * (i / dim) + 10 * (i % dim) + j) as f64);
        let tensor = MultipoleTensor::from_raw(
            MultipoleKind::Dipole,
            RawMultipole::Dense(super_matrix),
        )
        .unwrap();
        assert_eq!(tensor.dim(), 3);
        // plane 2 is the y component
        assert_eq!(tensor.plane(2)[[1, 2]], 212.0);
        assert_eq!(tensor.plane(0)[[0, 0]], 0.0);
    }

    #[test]
    fn super_matrix_with_wrong_shape_is_rejected() {
        let super_matrix: Array2<f64> = Array2::zeros((9, 3));
        let result =
            MultipoleTensor::from_raw(MultipoleKind::Dipole, RawMultipole::Dense(super_matrix));
        assert!(matches!(
            result,
            Err(SpectrumError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn packed_planes_are_expanded() {
        // upper triangle of [[1, 2], [2, 3]]
        let planes: Array2<f64> = array![[1.0, 2.0, 3.0]];
        let tensor =
            MultipoleTensor::from_raw(MultipoleKind::Overlap, RawMultipole::Packed(planes))
                .unwrap();
        assert_eq!(tensor.plane(0), array![[1.0, 2.0], [2.0, 3.0]]);
        assert!(triangular_dimension(4).is_err());
        assert_eq!(triangular_dimension(10).unwrap(), 4);
    }

    #[test]
    fn stored_overlap_may_be_two_dimensional() {
        let overlap: ArrayD<f64> = Array2::<f64>::eye(4).into_dyn();
        let tensor = MultipoleTensor::from_stored(MultipoleKind::Overlap, overlap).unwrap();
        assert_eq!(tensor.data.dim(), (1, 4, 4));
        let dipole: ArrayD<f64> = Array3::<f64>::zeros((3, 4, 4)).into_dyn();
        assert!(MultipoleTensor::from_stored(MultipoleKind::Dipole, dipole).is_err());
    }
}
