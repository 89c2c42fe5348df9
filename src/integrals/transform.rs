use crate::error::{Result, SpectrumError};
use crate::initialization::AtomPosition;
use crate::integrals::MultipoleTensor;
use crate::io::basis_set::{AngularMomentum, BasisSpecification};
use ndarray::prelude::*;
use sprs::{CsMat, TriMat};

/// Expands the packed upper triangle (row major: (0,0), (0,1), .., (0,n-1), (1,1), ..)
/// into the full symmetric matrix. The diagonal is counted once.
pub fn triangular_to_full(values: ArrayView1<f64>, dim: usize) -> Result<Array2<f64>> {
    if values.len() != dim * (dim + 1) / 2 {
        return Err(SpectrumError::DimensionMismatch {
            context: format!("packed upper triangle of a {0}x{0} matrix", dim),
            expected: dim * (dim + 1) / 2,
            found: values.len(),
        });
    }
    let mut matrix: Array2<f64> = Array2::zeros((dim, dim));
    let mut packed = values.iter();
    for i in 0..dim {
        for j in i..dim {
            // the length was checked above
            let value: f64 = *packed.next().unwrap_or(&0.0);
            matrix[[i, j]] = value;
            matrix[[j, i]] = value;
        }
    }
    Ok(matrix)
}

/// Sparse transformation from the Cartesian basis of the integral kernel into the
/// spherical basis of the MO coefficients. The shape is n_spherical x n_cartesian.
/// The matrix is built once per trajectory and shared (read only) by all frames.
#[derive(Debug, Clone)]
pub struct TransformMatrix {
    matrix: CsMat<f64>,
}

impl From<CsMat<f64>> for TransformMatrix {
    fn from(matrix: CsMat<f64>) -> Self {
        Self {
            matrix: matrix.into_csr(),
        }
    }
}

impl TransformMatrix {
    pub fn identity(dim: usize) -> Self {
        Self::from(CsMat::eye(dim))
    }

    /// Sparsify a dense transformation matrix, e.g. one that was read from the store.
    /// Entries with a magnitude below 1e-14 are dropped.
    pub fn from_dense(dense: ArrayView2<f64>) -> Self {
        Self::from(CsMat::csr_from_dense(dense, 1.0e-14))
    }

    /// Builds the block diagonal transformation for the molecule from the contracted
    /// functions of the basis set. Every shell of every atom contributes a block of
    /// (2l+1) x (l+1)(l+2)/2 coefficients, see [spherical_polynomials].
    pub fn from_basis(atoms: &[AtomPosition], basis: &BasisSpecification) -> Result<Self> {
        let n_sph: usize = basis.n_spherical(atoms)?;
        let n_cart: usize = basis.n_cartesian(atoms)?;
        let mut triplets: TriMat<f64> = TriMat::new((n_sph, n_cart));
        let (mut row, mut col): (usize, usize) = (0, 0);
        for atom in atoms.iter() {
            for function in basis.functions(atom.symbol)?.iter() {
                let block: Array2<f64> = spherical_polynomials(function.l)?;
                for ((m, c), value) in block.indexed_iter() {
                    if value.abs() > 0.0 {
                        triplets.add_triplet(row + m, col + c, *value);
                    }
                }
                row += block.nrows();
                col += block.ncols();
            }
        }
        Ok(Self::from(triplets.to_csr::<usize>()))
    }

    pub fn n_spherical(&self) -> usize {
        self.matrix.rows()
    }

    pub fn n_cartesian(&self) -> usize {
        self.matrix.cols()
    }

    /// Similarity transformation T · M · T^t of a single Cartesian matrix.
    pub fn to_spherical_basis(&self, matrix: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (rows, cols) = matrix.dim();
        if rows != self.n_cartesian() || cols != self.n_cartesian() {
            return Err(SpectrumError::DimensionMismatch {
                context: String::from("Cartesian basis of the transformation matrix"),
                expected: self.n_cartesian(),
                found: if rows != self.n_cartesian() { rows } else { cols },
            });
        }
        // T · M^t
        let t_mt: Array2<f64> = &self.matrix * &matrix.t();
        // T · (T · M^t)^t = T · M · T^t
        Ok(&self.matrix * &t_mt.t())
    }

    /// Applies [TransformMatrix::to_spherical_basis] to every plane of the tensor.
    pub fn transform_tensor(&self, tensor: &MultipoleTensor) -> Result<MultipoleTensor> {
        let n_sph: usize = self.n_spherical();
        let mut data: Array3<f64> = Array3::zeros((tensor.kind.n_components(), n_sph, n_sph));
        for (mut spherical, cartesian) in data.outer_iter_mut().zip(tensor.data.outer_iter()) {
            spherical.assign(&self.to_spherical_basis(cartesian)?);
        }
        MultipoleTensor::new(tensor.kind, data)
    }
}

/// Cartesian exponents (a, b, c) of x^a y^b z^c for the shell with angular momentum `l`,
/// ordered with `a` descending and then `b` descending: xx, xy, xz, yy, yz, zz.
pub fn cartesian_exponents(l: usize) -> Vec<[usize; 3]> {
    let mut exponents: Vec<[usize; 3]> = Vec::with_capacity((l + 1) * (l + 2) / 2);
    for a in (0..=l).rev() {
        for b in (0..=(l - a)).rev() {
            exponents.push([a, b, l - a - b]);
        }
    }
    exponents
}

/// Coefficients of the real solid harmonics in the basis of the Cartesian functions of a
/// shell. Rows follow the order m = -l, .., l (p: py, pz, px); columns follow
/// [cartesian_exponents]. All Cartesian functions are assumed to carry the normalization
/// of the x^l function, the resulting spherical functions are normalized.
pub fn spherical_polynomials(l: AngularMomentum) -> Result<Array2<f64>> {
    // unnormalized polynomials as (coefficient, exponents)
    let polynomials: Vec<Vec<(f64, [usize; 3])>> = match l {
        AngularMomentum::S => vec![vec![(1.0, [0, 0, 0])]],
        AngularMomentum::P => vec![
            vec![(1.0, [0, 1, 0])],
            vec![(1.0, [0, 0, 1])],
            vec![(1.0, [1, 0, 0])],
        ],
        AngularMomentum::D => vec![
            vec![(1.0, [1, 1, 0])],
            vec![(1.0, [0, 1, 1])],
            vec![(2.0, [0, 0, 2]), (-1.0, [2, 0, 0]), (-1.0, [0, 2, 0])],
            vec![(1.0, [1, 0, 1])],
            vec![(1.0, [2, 0, 0]), (-1.0, [0, 2, 0])],
        ],
        AngularMomentum::F => vec![
            vec![(3.0, [2, 1, 0]), (-1.0, [0, 3, 0])],
            vec![(1.0, [1, 1, 1])],
            vec![(4.0, [0, 1, 2]), (-1.0, [2, 1, 0]), (-1.0, [0, 3, 0])],
            vec![(2.0, [0, 0, 3]), (-3.0, [2, 0, 1]), (-3.0, [0, 2, 1])],
            vec![(4.0, [1, 0, 2]), (-1.0, [3, 0, 0]), (-1.0, [1, 2, 0])],
            vec![(1.0, [2, 0, 1]), (-1.0, [0, 2, 1])],
            vec![(1.0, [3, 0, 0]), (-3.0, [1, 2, 0])],
        ],
        other => {
            return Err(SpectrumError::Configuration(format!(
                "the spherical transformation of {}-shells is not implemented",
                other
            )))
        }
    };
    let l: usize = l as usize;
    let exponents: Vec<[usize; 3]> = cartesian_exponents(l);
    let metric: Array2<f64> = cartesian_metric(&exponents);
    let mut block: Array2<f64> = Array2::zeros((2 * l + 1, exponents.len()));
    for (mut row, polynomial) in block.outer_iter_mut().zip(polynomials.iter()) {
        for (coefficient, exps) in polynomial.iter() {
            if let Some(idx) = exponents.iter().position(|e| e == exps) {
                row[idx] = *coefficient;
            }
        }
        let norm: f64 = row.dot(&metric.dot(&row)).sqrt();
        row /= norm;
    }
    Ok(block)
}

/// Overlap of the angular parts of the Cartesian functions of one shell relative to the
/// self overlap of x^l: (a+a'-1)!! (b+b'-1)!! (c+c'-1)!! / (2l-1)!!, zero for odd sums.
fn cartesian_metric(exponents: &[[usize; 3]]) -> Array2<f64> {
    let l: usize = exponents.first().map(|e| e.iter().sum()).unwrap_or(0);
    let reference: f64 = double_factorial(2 * l as i64 - 1);
    Array2::from_shape_fn((exponents.len(), exponents.len()), |(i, j)| {
        let mut value: f64 = 1.0;
        for k in 0..3 {
            let sum: usize = exponents[i][k] + exponents[j][k];
            if sum % 2 == 1 {
                return 0.0;
            }
            value *= double_factorial(sum as i64 - 1);
        }
        value / reference
    })
}

fn double_factorial(n: i64) -> f64 {
    if n <= 0 {
        1.0
    } else {
        (n as f64) * double_factorial(n - 2)
    }
}
