use crate::constants::HARTREE_TO_EV;
use crate::error::{Result, SpectrumError};
use crate::io::Configuration;
use crate::spectrum::{Broadening, EnergyGrid, Normalization};
use hashbrown::HashSet;

/// Validated parameters of the oscillator sweep and of the spectrum. The conversion
/// from the [Configuration] fails before any frame is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSettings {
    pub initial_states: Vec<usize>,
    /// final states of every initial state, paired by position
    pub final_states: Vec<Vec<usize>>,
    pub stride: usize,
    pub skip_failed_frames: bool,
    pub broadening: Broadening,
    pub grid: EnergyGrid,
    pub normalization: Normalization,
}

impl SweepSettings {
    /// Pairs of (initial state, final states).
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.initial_states
            .iter()
            .cloned()
            .zip(self.final_states.iter().map(|states| states.as_slice()))
    }
}

impl TryFrom<&Configuration> for SweepSettings {
    type Error = SpectrumError;

    fn try_from(config: &Configuration) -> Result<Self> {
        let oscillator = &config.oscillator;
        let spectrum = &config.spectrum;
        if oscillator.calculate_oscillator_every == 0 {
            return Err(SpectrumError::Configuration(String::from(
                "calculate_oscillator_every has to be at least 1",
            )));
        }
        if oscillator.initial_states.is_empty() {
            return Err(SpectrumError::Configuration(String::from(
                "no initial states are given",
            )));
        }
        if oscillator.initial_states.len() != oscillator.final_states.len() {
            return Err(SpectrumError::Configuration(format!(
                "{} initial states but {} sets of final states are given",
                oscillator.initial_states.len(),
                oscillator.final_states.len()
            )));
        }
        let mut seen: HashSet<usize> = HashSet::new();
        for (initial, finals) in oscillator
            .initial_states
            .iter()
            .zip(oscillator.final_states.iter())
        {
            if !seen.insert(*initial) {
                return Err(SpectrumError::Configuration(format!(
                    "the initial state {} is given more than once",
                    initial
                )));
            }
            if finals.is_empty() {
                return Err(SpectrumError::Configuration(format!(
                    "the initial state {} has no final states",
                    initial
                )));
            }
        }
        let grid: EnergyGrid = EnergyGrid::new(spectrum.energy_range, spectrum.broadening)?;
        let broadening: Broadening =
            Broadening::new(&spectrum.convolution, spectrum.broadening / HARTREE_TO_EV)?;

        Ok(Self {
            initial_states: oscillator.initial_states.clone(),
            final_states: oscillator.final_states.clone(),
            stride: oscillator.calculate_oscillator_every,
            skip_failed_frames: oscillator.skip_failed_frames,
            broadening,
            grid,
            normalization: spectrum.normalization.parse()?,
        })
    }
}
