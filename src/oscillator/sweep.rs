use crate::error::{Result, SpectrumError};
use crate::initialization::{center_of_mass, AtomPosition};
use crate::integrals::{DipoleMatrices, IntegralCache, MultipoleKind, MultipoleTensor, TransformMatrix};
use crate::orbitals::{MoFrame, MolecularOrbitalProvider};
use crate::oscillator::{compute_transition, SweepSettings, TransitionRecord, TransitionTable};
use log::{debug, info, warn};
use nalgebra::Vector3;
use rayon::prelude::*;

/// Receives the progress of an oscillator sweep. Frames are reported from the worker
/// threads, in no particular order.
pub trait SweepObserver: Send + Sync {
    fn sweep_started(&self, _frames: &[usize]) {}

    fn frame_finished(&self, _frame: usize, _transitions: &[TransitionRecord]) {}

    fn frame_failed(&self, _frame: usize, _error: &SpectrumError) {}
}

/// [SweepObserver] that writes the progress to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SweepObserver for LogObserver {
    fn sweep_started(&self, frames: &[usize]) {
        info!(
            "oscillator strengths are computed for {} frames",
            frames.len()
        );
    }

    fn frame_finished(&self, frame: usize, transitions: &[TransitionRecord]) {
        info!("computed the oscillator strengths at point: {}", frame);
        for record in transitions.iter() {
            debug!(
                "transition {} -> {} f = {:.6}",
                record.initial_state, record.final_state, record.oscillator_strength
            );
        }
    }

    fn frame_failed(&self, frame: usize, error: &SpectrumError) {
        warn!("{}", failure_message(frame, error));
    }
}

/// Whether the frame is excluded or ends the sweep is decided after the frame returns.
fn failure_message(frame: usize, error: &SpectrumError) -> String {
    format!("point {} failed: {}", frame, error)
}

/// Transitions of one frame, grouped by the initial state.
type FrameGroups = Vec<(usize, Vec<TransitionRecord>)>;

fn insert_groups(table: &mut TransitionTable, frame: usize, groups: FrameGroups) {
    for (initial_state, records) in groups.into_iter() {
        table.insert(frame, initial_state, records);
    }
}

/// Indices k * stride < n_frames in ascending order.
pub fn sample_frames(n_frames: usize, stride: usize) -> Result<Vec<usize>> {
    if stride == 0 {
        return Err(SpectrumError::Configuration(String::from(
            "the frame stride has to be at least 1",
        )));
    }
    Ok((0..n_frames).step_by(stride).collect())
}

/// Computes the oscillator strengths for the sampled frames of a trajectory. The frames
/// are independent and are distributed over the rayon thread pool.
pub struct OscillatorSweep<'a> {
    cache: &'a IntegralCache<'a>,
    provider: &'a dyn MolecularOrbitalProvider,
    transform: Option<&'a TransformMatrix>,
    observer: &'a dyn SweepObserver,
}

impl<'a> OscillatorSweep<'a> {
    pub fn new(
        cache: &'a IntegralCache<'a>,
        provider: &'a dyn MolecularOrbitalProvider,
        transform: Option<&'a TransformMatrix>,
        observer: &'a dyn SweepObserver,
    ) -> Self {
        Self {
            cache,
            provider,
            transform,
            observer,
        }
    }

    pub fn run(
        &self,
        geometries: &[Vec<AtomPosition>],
        settings: &SweepSettings,
    ) -> Result<TransitionTable> {
        let frames: Vec<usize> = sample_frames(geometries.len(), settings.stride)?;
        self.observer.sweep_started(&frames);

        let mut table: TransitionTable = TransitionTable::new();
        if settings.skip_failed_frames {
            let results: Vec<(usize, Result<FrameGroups>)> = frames
                .par_iter()
                .map(|frame| (*frame, self.observed_frame(*frame, geometries, settings)))
                .collect();
            for (frame, result) in results.into_iter() {
                match result {
                    Ok(groups) => insert_groups(&mut table, frame, groups),
                    Err(err) => {
                        debug!("excluding point {} from the spectrum: {}", frame, err);
                        table.mark_failed(frame);
                    }
                }
            }
        } else {
            // the first failed frame stops the sweep, frames that were not started yet are
            // never computed
            let results: Vec<(usize, FrameGroups)> = frames
                .par_iter()
                .map(|frame| {
                    self.observed_frame(*frame, geometries, settings)
                        .map(|groups| (*frame, groups))
                })
                .collect::<Result<Vec<(usize, FrameGroups)>>>()?;
            for (frame, groups) in results.into_iter() {
                insert_groups(&mut table, frame, groups);
            }
        }
        Ok(table)
    }

    fn observed_frame(
        &self,
        frame: usize,
        geometries: &[Vec<AtomPosition>],
        settings: &SweepSettings,
    ) -> Result<FrameGroups> {
        let result = self
            .frame_transitions(frame, &geometries[frame], settings)
            .map_err(|err| err.in_frame(frame));
        match &result {
            Ok(groups) => {
                let records: Vec<TransitionRecord> = groups
                    .iter()
                    .flat_map(|(_, records)| records.iter().cloned())
                    .collect();
                self.observer.frame_finished(frame, &records);
            }
            Err(err) => self.observer.frame_failed(frame, err),
        }
        result
    }

    /// All transitions of a single frame, grouped by the initial state.
    fn frame_transitions(
        &self,
        frame: usize,
        atoms: &[AtomPosition],
        settings: &SweepSettings,
    ) -> Result<FrameGroups> {
        let orbitals: MoFrame = self.provider.mo_frame(frame)?;
        let mut tensor: MultipoleTensor = self.cache.get(frame, atoms, MultipoleKind::Dipole)?;
        if let Some(transform) = self.transform {
            tensor = transform.transform_tensor(&tensor)?;
        }
        let dipole: DipoleMatrices = DipoleMatrices::try_from(&tensor)?;
        // the origin of the dipole operator
        let center: Vector3<f64> = center_of_mass(atoms)?;

        let mut groups: FrameGroups = Vec::with_capacity(settings.initial_states.len());
        for (initial_state, final_states) in settings.transitions() {
            let records: Vec<TransitionRecord> = final_states
                .iter()
                .map(|final_state| {
                    compute_transition(
                        &center,
                        &dipole,
                        orbitals.coefficients.view(),
                        orbitals.energies.view(),
                        initial_state,
                        *final_state,
                    )
                })
                .collect::<Result<Vec<TransitionRecord>>>()?;
            groups.push((initial_state, records));
        }
        Ok(groups)
    }
}
