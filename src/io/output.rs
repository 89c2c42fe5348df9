use crate::defaults::{CROSS_SECTION_FILE, EXTINCTION_FILE, OSCILLATOR_FILE, SPECTRUM_NPY_FILE};
use crate::error::Result;
use crate::oscillator::TransitionTable;
use crate::spectrum::Spectrum;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use itertools::Itertools;
use log::info;
use ndarray::prelude::*;
use ndarray_npy::write_npy;
use std::fs;
use std::path::PathBuf;

const CROSS_SECTION_HEADER: &str = "Energy [eV] photoabsorption_cross_section [cm^2]";
const EXTINCTION_HEADER: &str = "Energy [eV] Extinction_coefficients [M^-1 cm^-1]";
const OSCILLATOR_HEADER: &str =
    "Transition Energy[eV] Energy[nm^-1] Oscillator Transition_dipole_components [a.u.]";

/// Writes the oscillator strengths and the spectrum as plain text files (and the spectrum
/// additionally as .npy). The exporter is built only after the spectrum has been
/// synthesized, so a failed sweep leaves no files behind.
/// ```ignore
/// SpectrumExporterBuilder::default()
///       .table(&table)
///       .spectrum(&spectrum)
///       .directory("results")
///       .build()?
///       .write()?;
/// ```
#[derive(Builder)]
#[builder(build_fn(error = "crate::error::SpectrumError"))]
pub struct SpectrumExporter<'a> {
    table: &'a TransitionTable,
    spectrum: &'a Spectrum,
    #[builder(default = "PathBuf::from(\".\")", setter(into))]
    directory: PathBuf,
    #[builder(default = "self.default_title()")]
    title: String,
}

impl SpectrumExporterBuilder<'_> {
    fn default_title(&self) -> String {
        let now: DateTime<Utc> = Utc::now();
        format!("file created at: {}", now.to_rfc2822())
    }
}

impl SpectrumExporter<'_> {
    /// Two columns, energy in eV and the values, in the layout of numpy.savetxt.
    fn repr_columns(header: &str, energies: ArrayView1<f64>, values: ArrayView1<f64>) -> String {
        let mut txt: String = format!("# {}\n", header);
        for (e, v) in energies.iter().zip(values.iter()) {
            txt += &format!("{:.18e} {:.18e}\n", e, v);
        }
        txt
    }

    pub fn repr_cross_section(&self) -> String {
        Self::repr_columns(
            CROSS_SECTION_HEADER,
            self.spectrum.energies.view(),
            self.spectrum.cross_section.view(),
        )
    }

    pub fn repr_extinction(&self) -> String {
        Self::repr_columns(
            EXTINCTION_HEADER,
            self.spectrum.energies.view(),
            self.spectrum.extinction.view(),
        )
    }

    /// One block per (frame, initial state) with one line per transition.
    pub fn repr_oscillators(&self) -> String {
        let mut txt: String = format!("# {}\n", self.title);
        for ((frame, initial_state), records) in self.table.iter() {
            txt += &format!("# point {} initial state {}\n", frame, initial_state);
            txt += &format!("{}\n", OSCILLATOR_HEADER);
            for record in records.iter() {
                txt += &format!(
                    "{}->{} {:12.5} {:12.5e} {:12.5} {}\n",
                    record.initial_state,
                    record.final_state,
                    record.energy_ev(),
                    record.energy_inverse_nm(),
                    record.oscillator_strength,
                    record.dipole.iter().map(|d| format!("{:11.5}", d)).join(" ")
                );
            }
        }
        if !self.table.failed_frames().is_empty() {
            txt += &format!(
                "# excluded points: {}\n",
                self.table.failed_frames().iter().join(" ")
            );
        }
        txt
    }

    pub fn write(&self) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        self.write_file(CROSS_SECTION_FILE, &self.repr_cross_section())?;
        self.write_file(EXTINCTION_FILE, &self.repr_extinction())?;
        self.write_file(OSCILLATOR_FILE, &self.repr_oscillators())?;
        let path: PathBuf = self.directory.join(SPECTRUM_NPY_FILE);
        write_npy(&path, &self.spectrum.to_array())?;
        info!("spectrum written to {}", self.directory.display());
        Ok(())
    }

    fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let path: PathBuf = self.directory.join(name);
        fs::write(path, content)?;
        Ok(())
    }
}
