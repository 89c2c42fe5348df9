use crate::error::{Result, SpectrumError};
use ndarray::prelude::*;
use ndarray_npy::{read_npy, WriteNpyExt};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[cfg(test)]
pub(crate) mod memory;

/// Hierarchical, string keyed storage of numerical tensors. The keys are paths like
/// `project/multipole/point_3/dipole`. Implementations have to support concurrent
/// writers to different keys; concurrent writes to the same key resolve to the last
/// writer.
pub trait TensorStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    fn read(&self, key: &str) -> Result<ArrayD<f64>>;

    fn write(&self, key: &str, tensor: ArrayViewD<f64>) -> Result<()>;
}

/// Key of a multipole tensor of a single geometry.
pub fn multipole_key(project: &str, point: usize, kind: &str) -> String {
    format!("{}/multipole/point_{}/{}", project, point, kind)
}

/// Key of the molecular orbital data (`eigenvalues` or `coefficients`) of a single geometry.
pub fn orbital_key(project: &str, point: usize, name: &str) -> String {
    format!("{}/point_{}/mo/{}", project, point, name)
}

/// [TensorStore] that keeps every tensor as a `.npy` file below a root directory. Each
/// segment of the key becomes a directory, the last one the file name.
#[derive(Debug, Clone)]
pub struct NpyStore {
    root: PathBuf,
}

impl NpyStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        let mut path: PathBuf = self.root.clone();
        key.split('/')
            .filter(|segment| !segment.is_empty())
            .for_each(|segment| path.push(segment));
        path.set_extension("npy");
        path
    }
}

impl TensorStore for NpyStore {
    fn exists(&self, key: &str) -> bool {
        self.path(key).is_file()
    }

    fn read(&self, key: &str) -> Result<ArrayD<f64>> {
        let path: PathBuf = self.path(key);
        if !path.is_file() {
            return Err(SpectrumError::Lookup {
                key: key.to_owned(),
            });
        }
        Ok(read_npy(&path)?)
    }

    fn write(&self, key: &str, tensor: ArrayViewD<f64>) -> Result<()> {
        let path: PathBuf = self.path(key);
        let parent: &Path = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;
        // every writer gets its own temporary file in the target directory, the rename
        // into place is atomic and the last writer wins
        let mut tmp: NamedTempFile = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            tensor.write_npy(&mut writer)?;
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|err| SpectrumError::Io(err.error))?;
        Ok(())
    }
}
