use crate::error::{Result, SpectrumError};
use crate::integrals::MultipoleKind;
use log::debug;
use ndarray::prelude::*;
use ndarray_npy::read_npy;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempPath;

/// Raw output of a multipole integral program.
#[derive(Debug, Clone)]
pub enum RawMultipole {
    /// Super matrix of the shape (n_components * dim) x dim, the planes are stacked along
    /// the rows.
    Dense(Array2<f64>),
    /// One packed upper triangle per component, shape n_components x dim(dim+1)/2.
    Packed(Array2<f64>),
}

/// Interface to the external library that evaluates the multipole integrals of a molecule
/// in the Cartesian basis. The geometry is handed over as an xyz file.
pub trait MultipoleKernel: Send + Sync {
    fn compute(
        &self,
        geometry: &Path,
        basis_name: &str,
        kind: MultipoleKind,
    ) -> Result<RawMultipole>;
}

/// [MultipoleKernel] that runs an external program as
/// `program [arguments..] <geometry.xyz> <basis name> <multipole> <output.npy>`.
/// The program writes the integrals as a .npy file: either the dense super matrix or the
/// packed upper triangles (1D for a single plane).
#[derive(Debug, Clone)]
pub struct ExternalKernel {
    program: String,
    arguments: Vec<String>,
}

impl ExternalKernel {
    pub fn new(program: String, arguments: Vec<String>) -> Self {
        Self { program, arguments }
    }
}

impl MultipoleKernel for ExternalKernel {
    fn compute(
        &self,
        geometry: &Path,
        basis_name: &str,
        kind: MultipoleKind,
    ) -> Result<RawMultipole> {
        // the program overwrites the empty file, which is removed again on every return path
        let output: TempPath = tempfile::Builder::new()
            .prefix("multipole_")
            .suffix(".npy")
            .tempfile_in(geometry.parent().unwrap_or_else(|| Path::new(".")))?
            .into_temp_path();
        debug!(
            "running {} for the {} integrals of {}",
            self.program,
            kind,
            geometry.display()
        );
        let result = Command::new(&self.program)
            .args(&self.arguments)
            .arg(geometry)
            .arg(basis_name)
            .arg(kind.label())
            .arg(&*output)
            .output()
            .map_err(|err| SpectrumError::Kernel(format!("{}: {}", self.program, err)))?;

        if !result.status.success() {
            return Err(SpectrumError::Kernel(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        if fs::metadata(&output).map(|meta| meta.len() == 0).unwrap_or(true) {
            return Err(SpectrumError::Kernel(format!(
                "{} did not write {}",
                self.program,
                output.display()
            )));
        }
        let raw: ArrayD<f64> = read_npy(&output)?;
        interpret_output(raw, kind)
    }
}

/// Decides whether the array written by the kernel is a dense super matrix or packed.
fn interpret_output(raw: ArrayD<f64>, kind: MultipoleKind) -> Result<RawMultipole> {
    let n_comp: usize = kind.n_components();
    let shape: Vec<usize> = raw.shape().to_vec();
    match shape.as_slice() {
        [_] => {
            let packed: Array1<f64> = raw.into_dimensionality::<Ix1>()?;
            Ok(RawMultipole::Packed(packed.insert_axis(Axis(0))))
        }
        &[rows, cols] if rows == n_comp * cols => {
            Ok(RawMultipole::Dense(raw.into_dimensionality::<Ix2>()?))
        }
        &[rows, _] if rows == n_comp => {
            Ok(RawMultipole::Packed(raw.into_dimensionality::<Ix2>()?))
        }
        shape => Err(SpectrumError::Kernel(format!(
            "unexpected shape {:?} of the {} integrals",
            shape, kind
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_npy::write_npy;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Kernel that runs a shell script. The script sees the geometry, basis name, kind and
    /// output path as `$1` to `$4`.
    fn shell_kernel(script: &str) -> ExternalKernel {
        ExternalKernel::new(
            String::from("sh"),
            vec![String::from("-c"), script.to_owned(), String::from("sh")],
        )
    }

    #[test]
    fn kernel_output_layouts() {
        let dense: ArrayD<f64> = Array2::<f64>::zeros((8, 2)).into_dyn();
        assert!(matches!(
            interpret_output(dense, MultipoleKind::Dipole).unwrap(),
            RawMultipole::Dense(_)
        ));
        let packed: ArrayD<f64> = Array2::<f64>::zeros((4, 6)).into_dyn();
        assert!(matches!(
            interpret_output(packed, MultipoleKind::Dipole).unwrap(),
            RawMultipole::Packed(_)
        ));
        let single: ArrayD<f64> = Array1::<f64>::zeros(6).into_dyn();
        assert!(matches!(
            interpret_output(single, MultipoleKind::Overlap).unwrap(),
            RawMultipole::Packed(_)
        ));
        let broken: ArrayD<f64> = Array2::<f64>::zeros((5, 2)).into_dyn();
        assert!(interpret_output(broken, MultipoleKind::Dipole).is_err());
    }

    #[test]
    fn program_output_is_read_and_removed() {
        let dir: TempDir = TempDir::new().unwrap();
        let fixture: PathBuf = dir.path().join("fixture.npy");
        let integrals: Array2<f64> = Array2::from_shape_fn((8, 2), |(i, j)| (i * 2 + j) as f64);
        write_npy(&fixture, &integrals).unwrap();
        let geometry: PathBuf = dir.path().join("molecule.xyz");
        fs::write(&geometry, "1\n\nH 0.0 0.0 0.0\n").unwrap();
        let log: PathBuf = dir.path().join("arguments.txt");

        let kernel: ExternalKernel = shell_kernel(&format!(
            "printf '%s\\n' \"$1\" \"$2\" \"$3\" \"$4\" > '{}' && cp '{}' \"$4\"",
            log.display(),
            fixture.display()
        ));
        let raw: RawMultipole = kernel
            .compute(&geometry, "sto-3g", MultipoleKind::Dipole)
            .unwrap();
        match raw {
            RawMultipole::Dense(matrix) => assert_eq!(matrix, integrals),
            other => panic!("unexpected layout: {:?}", other),
        }

        let arguments: String = fs::read_to_string(&log).unwrap();
        let arguments: Vec<&str> = arguments.lines().collect();
        assert_eq!(arguments.len(), 4);
        assert_eq!(Path::new(arguments[0]), geometry.as_path());
        assert_eq!(arguments[1], "sto-3g");
        assert_eq!(arguments[2], "dipole");
        assert!(arguments[3].ends_with(".npy"));
        assert!(!Path::new(arguments[3]).exists());
        assert!(geometry.is_file());
    }

    #[test]
    fn missing_program_output_is_a_kernel_error() {
        let dir: TempDir = TempDir::new().unwrap();
        let geometry: PathBuf = dir.path().join("molecule.xyz");
        fs::write(&geometry, "1\n\nH 0.0 0.0 0.0\n").unwrap();
        let result = shell_kernel("true").compute(&geometry, "sto-3g", MultipoleKind::Overlap);
        assert!(matches!(result, Err(SpectrumError::Kernel(_))));
        // only the geometry is left in the scratch directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failing_program_is_a_kernel_error() {
        let dir: TempDir = TempDir::new().unwrap();
        let geometry: PathBuf = dir.path().join("molecule.xyz");
        let kernel: ExternalKernel =
            ExternalKernel::new(String::from("this-program-does-not-exist"), vec![]);
        let result = kernel.compute(&geometry, "sto-3g", MultipoleKind::Overlap);
        assert!(matches!(result, Err(SpectrumError::Kernel(_))));

        let result = shell_kernel("echo broken basis >&2; exit 3").compute(
            &geometry,
            "sto-3g",
            MultipoleKind::Overlap,
        );
        match result {
            Err(SpectrumError::Kernel(message)) => assert!(message.contains("broken basis")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
