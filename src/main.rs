use crate::defaults::CONFIG_FILE_NAME;
use crate::initialization::AtomPosition;
use crate::integrals::{ExternalKernel, IntegralCache, MultipoleKind, TransformMatrix};
use crate::io::{
    read_input, write_footer, write_header, BasisSpecification, Configuration,
    SpectrumExporterBuilder,
};
use crate::orbitals::StoreMoProvider;
use crate::oscillator::{LogObserver, OscillatorSweep, SweepSettings, TransitionTable};
use crate::spectrum::{synthesize, Spectrum};
use crate::store::{NpyStore, TensorStore};
use crate::utils::Timer;
use anyhow::{bail, Context, Result};
use clap::{App, Arg};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use ndarray::prelude::*;
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;

mod constants;
mod defaults;
mod error;
mod initialization;
mod integrals;
mod io;
mod orbitals;
mod oscillator;
mod spectrum;
mod store;
mod utils;

#[macro_use]
extern crate clap;

fn main() -> Result<()> {
    // Input.
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .about("oscillator strengths and absorption spectra along molecular dynamics trajectories")
        .arg(
            Arg::new("config-File")
                .about("Sets the configuration file to use")
                .default_value(CONFIG_FILE_NAME)
                .index(1),
        )
        .get_matches();
    let config_file: &str = matches.value_of("config-File").unwrap_or(CONFIG_FILE_NAME);
    let (geometries, config): (Vec<Vec<AtomPosition>>, Configuration) =
        read_input(Path::new(config_file))?;

    // Multithreading.
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelization.number_of_cores)
        .build_global()
        .context("Unable to initialize the thread pool")?;

    // Logging.
    // The log level is set.
    let log_level: LevelFilter = match config.verbose {
        2 => LevelFilter::Trace,
        1 => LevelFilter::Debug,
        0 => LevelFilter::Info,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    // and the logger is build.
    Builder::new()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter(None, log_level)
        .init();

    // The program header is written to the command line.
    write_header();
    // and the total wall-time timer is started.
    let timer: Timer = Timer::start();
    info!("{} geometries are read from {}", geometries.len(), config.trajectory.path);

    let store: NpyStore = NpyStore::new(&config.store.root);
    let kernel: ExternalKernel =
        ExternalKernel::new(config.kernel.program.clone(), config.kernel.arguments.clone());
    let cache: IntegralCache = IntegralCache::new(
        &store,
        &kernel,
        &config.project_name,
        &config.basis.name,
        Path::new(&config.store.scratch),
        config.enumerate_from,
    );

    // Computations.
    // ................................................................
    match config.jobtype.as_str() {
        "spectrum" => run_spectrum(&config, &geometries, &store, &cache)?,
        // Precompute the multipole integrals of every geometry of the trajectory
        "multipoles" => run_multipoles(&config, &geometries, &cache)?,
        other => bail!(
            "unknown jobtype: {}, choose one of: spectrum, multipoles",
            other
        ),
    }

    // The program footer with the total wall-time is written.
    write_footer(timer);
    Ok(())
}

fn run_spectrum(
    config: &Configuration,
    geometries: &[Vec<AtomPosition>],
    store: &NpyStore,
    cache: &IntegralCache,
) -> Result<()> {
    // All user input is checked before the first frame is touched.
    let settings: SweepSettings = SweepSettings::try_from(config)?;
    let transform: Option<TransformMatrix> = build_transform(config, geometries, store)?;
    let provider: StoreMoProvider =
        StoreMoProvider::new(store, &config.project_name, config.enumerate_from);

    warn!("{:^80}", "");
    warn!("{: ^80}", "Oscillator strengths");
    warn!("{:-^80}", "");
    let timer: Timer = Timer::start();
    let sweep: OscillatorSweep =
        OscillatorSweep::new(cache, &provider, transform.as_ref(), &LogObserver);
    let table: TransitionTable = sweep.run(geometries, &settings)?;
    warn!("{:>68} {:>8}", "sampled frames:", table.n_frames());
    warn!("{:>68} {:>8}", "transitions:", table.n_transitions());
    if !table.failed_frames().is_empty() {
        warn!("{:>68} {:>8}", "excluded frames:", table.failed_frames().len());
    }
    warn!("{}", timer);

    warn!("{:^80}", "");
    warn!("{: ^80}", "Absorption spectrum");
    warn!("{:-^80}", "");
    let timer: Timer = Timer::start();
    let spectrum: Spectrum = synthesize(
        &table,
        &settings.broadening,
        &settings.grid,
        settings.normalization,
    )?;
    warn!("{:>68} {:>8}", "grid points:", spectrum.energies.len());
    SpectrumExporterBuilder::default()
        .table(&table)
        .spectrum(&spectrum)
        .directory(config.spectrum.output_directory.as_str())
        .build()?
        .write()
        .context("Unable to write the spectrum")?;
    warn!("{}", timer);
    Ok(())
}

fn run_multipoles(
    config: &Configuration,
    geometries: &[Vec<AtomPosition>],
    cache: &IntegralCache,
) -> Result<()> {
    let kinds: Vec<MultipoleKind> = config
        .multipoles
        .kinds
        .iter()
        .map(|kind| kind.parse())
        .collect::<std::result::Result<Vec<MultipoleKind>, _>>()?;

    warn!("{:^80}", "");
    warn!("{: ^80}", "Multipole integrals");
    warn!("{:-^80}", "");
    let timer: Timer = Timer::start();
    geometries
        .par_iter()
        .enumerate()
        .try_for_each(|(point, atoms)| -> crate::error::Result<()> {
            for kind in kinds.iter() {
                cache
                    .get(point, atoms, *kind)
                    .map_err(|err| err.in_frame(point))?;
            }
            Ok(())
        })?;
    warn!("{:>68} {:>8}", "geometries:", geometries.len());
    warn!("{}", timer);
    Ok(())
}

/// Transformation of the integrals into the basis of the MO coefficients, selected by the
/// `transformation` key of the basis section.
fn build_transform(
    config: &Configuration,
    geometries: &[Vec<AtomPosition>],
    store: &NpyStore,
) -> Result<Option<TransformMatrix>> {
    match config.basis.transformation.as_str() {
        "none" => Ok(None),
        "basis" => {
            let path: &str = config
                .basis
                .path
                .as_deref()
                .context("transformation = \"basis\" needs the path of the basis set file")?;
            let basis: BasisSpecification = BasisSpecification::from_file(path)
                .with_context(|| format!("Unable to read the basis set {}", path))?;
            // all frames share the molecule, the first geometry fixes the atom order
            let atoms: &[AtomPosition] = geometries
                .first()
                .context("the trajectory does not contain any geometry")?;
            Ok(Some(TransformMatrix::from_basis(atoms, &basis)?))
        }
        "store" => {
            let key: &str = &config.basis.transformation_key;
            let dense: Array2<f64> = store
                .read(key)?
                .into_dimensionality::<Ix2>()
                .with_context(|| format!("{} is not a matrix", key))?;
            Ok(Some(TransformMatrix::from_dense(dense.view())))
        }
        other => bail!(
            "unknown transformation: {}, choose one of: none, basis, store",
            other
        ),
    }
}
