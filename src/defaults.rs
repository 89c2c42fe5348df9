// config file
pub const CONFIG_FILE_NAME: &str = "spectrum.toml";
// jobtype
pub const JOBTYPE: &str = "spectrum";
pub const VERBOSE: i8 = 0;
pub const PROJECT_NAME: &str = "project";
// offset that is added to the frame index in the names of the stored data
pub const ENUMERATE_FROM: usize = 0;

// TRAJECTORY
pub const TRAJECTORY_PATH: &str = "trajectory.xyz";
pub const GEOMETRY_UNITS: &str = "angstrom";

// BASIS SET
pub const BASIS_NAME: &str = "DZVP-MOLOPT-SR-GTH";
// "none": the kernel already returns the orbital basis
// "basis": build the Cartesian -> spherical transformation from the basis set file
// "store": read the (dense) transformation matrix from the tensor store
pub const TRANSFORMATION: &str = "none";
pub const TRANSFORMATION_KEY: &str = "trans_mtx";

// TENSOR STORE
pub const STORE_ROOT: &str = "store";
pub const SCRATCH_DIR: &str = "scratch";

// MULTIPOLE INTEGRALS
pub const KERNEL_PROGRAM: &str = "compute_integrals";
pub const MULTIPOLE_KINDS: [&str; 1] = ["dipole"];

// OSCILLATOR STRENGTHS
pub const INITIAL_STATES: [usize; 1] = [0];
pub const FINAL_STATES: [usize; 1] = [1];
// compute the oscillator strengths for every n-th frame
pub const CALCULATE_OSCILLATOR_EVERY: usize = 50;
pub const SKIP_FAILED_FRAMES: bool = false;

// SPECTRUM
pub const CONVOLUTION: &str = "gaussian";
// broadening in eV
pub const BROADENING: f64 = 0.1;
// energy range of the spectrum in eV
pub const ENERGY_RANGE: (f64, f64) = (0.0, 5.0);
pub const NORMALIZATION: &str = "final_states";
pub const OUTPUT_DIRECTORY: &str = ".";

// OUTPUT FILES
pub const CROSS_SECTION_FILE: &str = "cross_section_cm.txt";
pub const EXTINCTION_FILE: &str = "molar_extinction_coefficients.txt";
pub const OSCILLATOR_FILE: &str = "oscillators.txt";
pub const SPECTRUM_NPY_FILE: &str = "spectrum.npy";

// PARALLELIZATION
pub const NUMBER_OF_CORES: usize = 1;
