use crate::defaults::*;
use serde::{Deserialize, Serialize};

fn default_jobtype() -> String {
    String::from(JOBTYPE)
}
fn default_verbose() -> i8 {
    VERBOSE
}
fn default_project_name() -> String {
    String::from(PROJECT_NAME)
}
fn default_enumerate_from() -> usize {
    ENUMERATE_FROM
}
fn default_trajectory_path() -> String {
    String::from(TRAJECTORY_PATH)
}
fn default_geometry_units() -> String {
    String::from(GEOMETRY_UNITS)
}
fn default_basis_name() -> String {
    String::from(BASIS_NAME)
}
fn default_transformation() -> String {
    String::from(TRANSFORMATION)
}
fn default_transformation_key() -> String {
    String::from(TRANSFORMATION_KEY)
}
fn default_store_root() -> String {
    String::from(STORE_ROOT)
}
fn default_scratch() -> String {
    String::from(SCRATCH_DIR)
}
fn default_kernel_program() -> String {
    String::from(KERNEL_PROGRAM)
}
fn default_initial_states() -> Vec<usize> {
    INITIAL_STATES.to_vec()
}
fn default_final_states() -> Vec<Vec<usize>> {
    vec![FINAL_STATES.to_vec()]
}
fn default_calculate_oscillator_every() -> usize {
    CALCULATE_OSCILLATOR_EVERY
}
fn default_skip_failed_frames() -> bool {
    SKIP_FAILED_FRAMES
}
fn default_convolution() -> String {
    String::from(CONVOLUTION)
}
fn default_broadening() -> f64 {
    BROADENING
}
fn default_energy_range() -> (f64, f64) {
    ENERGY_RANGE
}
fn default_normalization() -> String {
    String::from(NORMALIZATION)
}
fn default_output_directory() -> String {
    String::from(OUTPUT_DIRECTORY)
}
fn default_multipole_kinds() -> Vec<String> {
    MULTIPOLE_KINDS.iter().map(|kind| kind.to_string()).collect()
}
fn default_number_of_cores() -> usize {
    NUMBER_OF_CORES
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Configuration {
    #[serde(default = "default_jobtype")]
    pub jobtype: String,
    #[serde(default = "default_verbose")]
    pub verbose: i8,
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_enumerate_from")]
    pub enumerate_from: usize,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub basis: BasisConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub oscillator: OscillatorConfig,
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    #[serde(default)]
    pub multipoles: MultipoleConfig,
    #[serde(default)]
    pub parallelization: ParallelizationConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            jobtype: default_jobtype(),
            verbose: default_verbose(),
            project_name: default_project_name(),
            enumerate_from: default_enumerate_from(),
            trajectory: TrajectoryConfig::default(),
            basis: BasisConfig::default(),
            store: StoreConfig::default(),
            kernel: KernelConfig::default(),
            oscillator: OscillatorConfig::default(),
            spectrum: SpectrumConfig::default(),
            multipoles: MultipoleConfig::default(),
            parallelization: ParallelizationConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrajectoryConfig {
    #[serde(default = "default_trajectory_path")]
    pub path: String,
    #[serde(default = "default_geometry_units")]
    pub geometry_units: String,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            path: default_trajectory_path(),
            geometry_units: default_geometry_units(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BasisConfig {
    #[serde(default = "default_basis_name")]
    pub name: String,
    /// Basis set in the JSON format of the Basis Set Exchange, needed for
    /// `transformation = "basis"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default = "default_transformation")]
    pub transformation: String,
    #[serde(default = "default_transformation_key")]
    pub transformation_key: String,
}

impl Default for BasisConfig {
    fn default() -> Self {
        Self {
            name: default_basis_name(),
            path: None,
            transformation: default_transformation(),
            transformation_key: default_transformation_key(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoreConfig {
    #[serde(default = "default_store_root")]
    pub root: String,
    #[serde(default = "default_scratch")]
    pub scratch: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            scratch: default_scratch(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KernelConfig {
    #[serde(default = "default_kernel_program")]
    pub program: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            program: default_kernel_program(),
            arguments: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OscillatorConfig {
    #[serde(default = "default_initial_states")]
    pub initial_states: Vec<usize>,
    /// One list of final states for every initial state
    #[serde(default = "default_final_states")]
    pub final_states: Vec<Vec<usize>>,
    #[serde(default = "default_calculate_oscillator_every")]
    pub calculate_oscillator_every: usize,
    #[serde(default = "default_skip_failed_frames")]
    pub skip_failed_frames: bool,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            initial_states: default_initial_states(),
            final_states: default_final_states(),
            calculate_oscillator_every: default_calculate_oscillator_every(),
            skip_failed_frames: default_skip_failed_frames(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SpectrumConfig {
    #[serde(default = "default_convolution")]
    pub convolution: String,
    #[serde(default = "default_broadening")]
    pub broadening: f64,
    #[serde(default = "default_energy_range")]
    pub energy_range: (f64, f64),
    #[serde(default = "default_normalization")]
    pub normalization: String,
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            convolution: default_convolution(),
            broadening: default_broadening(),
            energy_range: default_energy_range(),
            normalization: default_normalization(),
            output_directory: default_output_directory(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MultipoleConfig {
    #[serde(default = "default_multipole_kinds")]
    pub kinds: Vec<String>,
}

impl Default for MultipoleConfig {
    fn default() -> Self {
        Self {
            kinds: default_multipole_kinds(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ParallelizationConfig {
    #[serde(default = "default_number_of_cores")]
    pub number_of_cores: usize,
}

impl Default for ParallelizationConfig {
    fn default() -> Self {
        Self {
            number_of_cores: default_number_of_cores(),
        }
    }
}
