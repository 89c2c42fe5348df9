use crate::constants::{AVOGADRO, BOHR_TO_METER, HARTREE_TO_EV, SPEED_OF_LIGHT};
use crate::error::{Result, SpectrumError};
use crate::oscillator::TransitionTable;
use ndarray::prelude::*;
use ndarray::Zip;
use std::f64::consts::{LN_10, PI};
use std::str::FromStr;

pub use broadening::Broadening;

mod broadening;

/// Uniform energy grid of the spectrum, the bounds are included. Energies in Hartree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyGrid {
    pub min: f64,
    pub max: f64,
    pub n_points: usize,
}

impl EnergyGrid {
    /// The number of points is floor((max - min) / width). Range and width are given in eV.
    pub fn new(energy_range: (f64, f64), width: f64) -> Result<Self> {
        let (min, max): (f64, f64) = energy_range;
        if !(min.is_finite() && max.is_finite()) {
            return Err(SpectrumError::Configuration(format!(
                "the energy range [{}, {}] eV has to be finite",
                min, max
            )));
        }
        if !(max > min) {
            return Err(SpectrumError::Configuration(format!(
                "the upper bound of the energy range ({} eV) has to exceed the lower bound ({} eV)",
                max, min
            )));
        }
        if !(width > 0.0) {
            return Err(SpectrumError::Configuration(format!(
                "the broadening has to be positive, got {} eV",
                width
            )));
        }
        // the ratio is taken in eV, a small tolerance absorbs the rounding of the division
        let ratio: f64 = (max - min) / width + 1.0e-9;
        if !ratio.is_finite() {
            return Err(SpectrumError::Configuration(format!(
                "the energy range [{}, {}] eV cannot be sampled with a width of {} eV",
                min, max, width
            )));
        }
        let n_points: usize = ratio.floor() as usize;
        if n_points == 0 {
            return Err(SpectrumError::Configuration(format!(
                "the energy range [{}, {}] eV is narrower than the broadening of {} eV",
                min, max, width
            )));
        }
        Ok(Self {
            min: min / HARTREE_TO_EV,
            max: max / HARTREE_TO_EV,
            n_points,
        })
    }

    pub fn points(&self) -> Array1<f64> {
        if self.n_points == 1 {
            return Array1::from_elem(1, self.min);
        }
        let step: f64 = (self.max - self.min) / (self.n_points - 1) as f64;
        Array1::from_shape_fn(self.n_points, |k| self.min + k as f64 * step)
    }
}

/// How the oscillator strengths of one group (frame, initial state) are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// sum over the frames, mean over the final states of every initial state
    FinalStates,
    /// mean over the frames, sum over the final states
    Frames,
}

impl FromStr for Normalization {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "final_states" => Ok(Normalization::FinalStates),
            "frames" => Ok(Normalization::Frames),
            other => Err(SpectrumError::Configuration(format!(
                "unknown normalization: {}, choose final_states or frames",
                other
            ))),
        }
    }
}

/// Photoabsorption cross section and molar extinction coefficients on the energy grid.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// grid energies in eV
    pub energies: Array1<f64>,
    /// cross section in cm^2
    pub cross_section: Array1<f64>,
    /// extinction coefficient in M^-1 cm^-1
    pub extinction: Array1<f64>,
}

impl Spectrum {
    /// Columns: energy, cross section, extinction coefficient.
    pub fn to_array(&self) -> Array2<f64> {
        let mut array: Array2<f64> = Array2::zeros((self.energies.len(), 3));
        array.column_mut(0).assign(&self.energies);
        array.column_mut(1).assign(&self.cross_section);
        array.column_mut(2).assign(&self.extinction);
        array
    }
}

/// Convolutes all transitions of the table with the line shape and converts the result
/// into the photoabsorption cross section
/// σ(E) = 2π^2/c ∑_groups w ∑_transitions f * g(E, ΔE, δ)
/// with the weight w of every group given by the [Normalization]. The cross section is
/// returned in cm^2 and the extinction coefficient ε = σ N_A / (ln(10) 1000).
pub fn synthesize(
    table: &TransitionTable,
    broadening: &Broadening,
    grid: &EnergyGrid,
    normalization: Normalization,
) -> Result<Spectrum> {
    if table.is_empty() {
        return Err(SpectrumError::EmptySweep);
    }
    let n_frames: f64 = table.n_frames() as f64;
    // (center, weighted oscillator strength) of every line
    let lines: Vec<(f64, f64)> = table
        .iter()
        .flat_map(|(_, records)| {
            let weight: f64 = match normalization {
                Normalization::FinalStates => 1.0 / records.len() as f64,
                Normalization::Frames => 1.0 / n_frames,
            };
            records
                .iter()
                .map(move |record| (record.energy, weight * record.oscillator_strength))
        })
        .collect();

    let points: Array1<f64> = grid.points();
    let mut intensity: Array1<f64> = Array1::zeros(points.len());
    Zip::from(&mut intensity)
        .and(&points)
        .par_for_each(|value, &x| {
            *value = lines
                .iter()
                .map(|(center, strength)| strength * broadening.evaluate(x, *center))
                .sum();
        });

    // atomic units of length^2 -> cm^2
    let prefactor: f64 = 2.0 * PI.powi(2) / SPEED_OF_LIGHT * (BOHR_TO_METER * 100.0).powi(2);
    let cross_section: Array1<f64> = intensity * prefactor;
    let extinction: Array1<f64> = &cross_section / (LN_10 * 1.0e3 / AVOGADRO);

    Ok(Spectrum {
        energies: points * HARTREE_TO_EV,
        cross_section,
        extinction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::TransitionRecord;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn record(initial_state: usize, final_state: usize, energy_ev: f64, f: f64) -> TransitionRecord {
        TransitionRecord {
            initial_state,
            final_state,
            energy: energy_ev / HARTREE_TO_EV,
            oscillator_strength: f,
            dipole: [0.0; 3],
        }
    }

    #[test]
    fn number_of_grid_points() {
        assert_eq!(EnergyGrid::new((0.0, 5.0), 0.1).unwrap().n_points, 50);
        assert_eq!(EnergyGrid::new((0.0, 1.0), 0.5).unwrap().n_points, 2);
        assert_eq!(EnergyGrid::new((1.5, 4.5), 0.3).unwrap().n_points, 10);
        let grid = EnergyGrid::new((1.0, 3.0), 0.5).unwrap();
        let points: Array1<f64> = grid.points() * HARTREE_TO_EV;
        assert_eq!(points.len(), 4);
        assert_abs_diff_eq!(points[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[3], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_energy_ranges_are_rejected() {
        assert!(EnergyGrid::new((5.0, 5.0), 0.1).is_err());
        assert!(EnergyGrid::new((5.0, 1.0), 0.1).is_err());
        assert!(EnergyGrid::new((0.0, 0.05), 0.1).is_err());
        assert!(EnergyGrid::new((0.0, 1.0), 0.0).is_err());
        assert!(EnergyGrid::new((0.0, f64::INFINITY), 0.1).is_err());
        assert!(EnergyGrid::new((f64::NEG_INFINITY, 1.0), 0.1).is_err());
        assert!(EnergyGrid::new((0.0, f64::NAN), 0.1).is_err());
        assert!(EnergyGrid::new((0.0, 1.0e300), 1.0e-300).is_err());
    }

    #[test]
    fn normalization_names() {
        assert_eq!(
            "final_states".parse::<Normalization>().unwrap(),
            Normalization::FinalStates
        );
        assert_eq!("Frames".parse::<Normalization>().unwrap(), Normalization::Frames);
        assert!("none".parse::<Normalization>().is_err());
    }

    #[test]
    fn empty_table_gives_no_spectrum() {
        let grid = EnergyGrid::new((0.0, 1.0), 0.5).unwrap();
        let broadening = Broadening::new("gaussian", 0.5 / HARTREE_TO_EV).unwrap();
        assert!(matches!(
            synthesize(&TransitionTable::new(), &broadening, &grid, Normalization::FinalStates),
            Err(SpectrumError::EmptySweep)
        ));
    }

    #[test]
    fn single_line_cross_section() {
        let mut table = TransitionTable::new();
        table.insert(0, 0, vec![record(0, 1, 2.0, 0.4)]);
        // 1.0, 1.5, .., 3.0 eV
        let grid = EnergyGrid::new((1.0, 3.0), 0.4).unwrap();
        let broadening = Broadening::new("gaussian", 0.5 / HARTREE_TO_EV).unwrap();
        let spectrum =
            synthesize(&table, &broadening, &grid, Normalization::FinalStates).unwrap();
        // the grid point at 2 eV is the center of the line
        let center: f64 = 2.0 / HARTREE_TO_EV;
        let expected: f64 = 2.0 * PI.powi(2) / SPEED_OF_LIGHT
            * 0.4
            * broadening.evaluate(center, center)
            * (BOHR_TO_METER * 100.0).powi(2);
        let idx: usize = 2;
        assert_abs_diff_eq!(spectrum.energies[idx], 2.0, epsilon = 1e-12);
        assert_relative_eq!(spectrum.cross_section[idx], expected, max_relative = 1e-12);
        assert_relative_eq!(
            spectrum.extinction[idx],
            expected * AVOGADRO / (LN_10 * 1.0e3),
            max_relative = 1e-12
        );
        assert_eq!(spectrum.to_array().dim(), (5, 3));
    }

    #[test]
    fn groups_are_averaged_over_their_final_states() {
        let grid = EnergyGrid::new((0.0, 4.0), 0.5).unwrap();
        let broadening = Broadening::new("lorentzian", 0.5 / HARTREE_TO_EV).unwrap();
        let mut table = TransitionTable::new();
        for frame in [0, 2] {
            table.insert(frame, 0, vec![record(0, 1, 1.0, 0.2), record(0, 2, 2.0, 0.6)]);
            table.insert(frame, 1, vec![record(1, 2, 1.5, 0.3)]);
        }
        let by_final: Spectrum =
            synthesize(&table, &broadening, &grid, Normalization::FinalStates).unwrap();
        let by_frame: Spectrum =
            synthesize(&table, &broadening, &grid, Normalization::Frames).unwrap();

        let prefactor: f64 = 2.0 * PI.powi(2) / SPEED_OF_LIGHT * (BOHR_TO_METER * 100.0).powi(2);
        let line = |x: f64, e: f64, f: f64| f * broadening.evaluate(x, e / HARTREE_TO_EV);
        for (k, x) in grid.points().iter().enumerate() {
            let final_states: f64 = 2.0
                * ((line(*x, 1.0, 0.2) + line(*x, 2.0, 0.6)) / 2.0 + line(*x, 1.5, 0.3));
            let frames: f64 = line(*x, 1.0, 0.2) + line(*x, 2.0, 0.6) + line(*x, 1.5, 0.3);
            assert_relative_eq!(
                by_final.cross_section[k],
                prefactor * final_states,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                by_frame.cross_section[k],
                prefactor * frames,
                max_relative = 1e-12
            );
        }
    }
}
