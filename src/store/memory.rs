use crate::error::{Result, SpectrumError};
use crate::store::TensorStore;
use hashbrown::HashMap;
use ndarray::prelude::*;
use std::sync::RwLock;

/// In-memory [TensorStore], counts the number of writes.
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, ArrayD<f64>>>,
    writes: RwLock<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_writes(&self) -> usize {
        *self.writes.read().unwrap()
    }

    pub fn insert<D: Dimension>(&self, key: &str, tensor: Array<f64, D>) {
        self.map
            .write()
            .unwrap()
            .insert(key.to_owned(), tensor.into_dyn());
    }

    pub fn remove(&self, key: &str) {
        self.map.write().unwrap().remove(key);
    }
}

impl TensorStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.map.read().unwrap().contains_key(key)
    }

    fn read(&self, key: &str) -> Result<ArrayD<f64>> {
        self.map
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| SpectrumError::Lookup {
                key: key.to_owned(),
            })
    }

    fn write(&self, key: &str, tensor: ArrayViewD<f64>) -> Result<()> {
        *self.writes.write().unwrap() += 1;
        self.map
            .write()
            .unwrap()
            .insert(key.to_owned(), tensor.to_owned());
        Ok(())
    }
}

