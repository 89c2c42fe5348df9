use crate::constants::ANGS_TO_BOHR;
use crate::error::{Result, SpectrumError};
use crate::initialization::{change_units, AtomPosition};
use chemfiles::{Frame, Trajectory};
use nalgebra::Vector3;
use std::path::Path;

/// Length unit of the coordinates in a trajectory file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryUnits {
    Angstrom,
    Bohr,
}

impl GeometryUnits {
    /// Factor that converts the coordinates to bohr.
    pub fn to_bohr(&self) -> f64 {
        match self {
            GeometryUnits::Angstrom => ANGS_TO_BOHR,
            GeometryUnits::Bohr => 1.0,
        }
    }
}

impl std::str::FromStr for GeometryUnits {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "angstrom" | "angs" => Ok(GeometryUnits::Angstrom),
            "bohr" | "au" => Ok(GeometryUnits::Bohr),
            other => Err(SpectrumError::Configuration(format!(
                "unknown geometry units: {}, choose angstrom or bohr",
                other
            ))),
        }
    }
}

/// Extract the atoms and their positions from a [Frame](chemfiles::Frame). Chemfiles keeps
/// the positions in the units of the file, they are multiplied by `to_bohr` here.
pub fn frame_to_atoms(frame: &Frame, to_bohr: f64) -> Result<Vec<AtomPosition>> {
    let mut atoms: Vec<AtomPosition> = Vec::with_capacity(frame.size());
    for (i, position) in frame.positions().iter().enumerate() {
        let atom = frame.atom(i);
        let xyz: Vector3<f64> = Vector3::new(position[0], position[1], position[2]);
        // the atomic number is 0 if chemfiles does not know the name of the atom
        let atom_position: AtomPosition = match atom.atomic_number() {
            0 => AtomPosition::new(&atom.name(), xyz)?,
            number => atom_from_number(number, xyz)?,
        };
        atoms.push(atom_position);
    }
    change_units(&mut atoms, to_bohr);
    Ok(atoms)
}

/// Chemfiles reports atomic numbers as u64, anything beyond u8 is not an element.
fn atom_from_number(number: u64, xyz: Vector3<f64>) -> Result<AtomPosition> {
    let number: u8 = u8::try_from(number)
        .map_err(|_| SpectrumError::UnknownElement(format!("Z = {}", number)))?;
    AtomPosition::from_number(number, xyz)
}

/// Reads all geometries of a trajectory file (.xyz, .pdb, ...). The positions of the
/// returned atoms are in bohr.
pub fn read_trajectory<P: AsRef<Path>>(
    path: P,
    units: GeometryUnits,
) -> Result<Vec<Vec<AtomPosition>>> {
    let path: &Path = path.as_ref();
    if !path.is_file() {
        return Err(SpectrumError::Lookup {
            key: path.display().to_string(),
        });
    }
    let mut trajectory: Trajectory = Trajectory::open(path, 'r')?;
    let n_steps: usize = trajectory.nsteps();
    let mut geometries: Vec<Vec<AtomPosition>> = Vec::with_capacity(n_steps);
    let mut frame: Frame = Frame::new();
    for step in 0..n_steps {
        trajectory
            .read_step(step, &mut frame)
            .map_err(|err| SpectrumError::from(err).in_frame(step))?;
        geometries.push(frame_to_atoms(&frame, units.to_bohr()).map_err(|err| err.in_frame(step))?);
    }
    Ok(geometries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn trajectory_is_converted_to_bohr() {
        let root: TempDir = TempDir::new().unwrap();
        let path: PathBuf = root.path().join("trajectory.xyz");
        fs::write(
            &path,
            "2\nstep 0\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n\
             2\nstep 1\nH 0.0 0.0 0.0\nH 0.0 0.0 0.80\n",
        )
        .unwrap();
        let geometries = read_trajectory(&path, GeometryUnits::Angstrom).unwrap();
        assert_eq!(geometries.len(), 2);
        assert_eq!(geometries[1][1].symbol, "H");
        assert_abs_diff_eq!(geometries[1][1].xyz.z, 0.80 * ANGS_TO_BOHR, epsilon = 1e-10);

        let geometries = read_trajectory(&path, GeometryUnits::Bohr).unwrap();
        assert_abs_diff_eq!(geometries[0][1].xyz.z, 0.74, epsilon = 1e-10);
    }

    #[test]
    fn atomic_numbers_are_not_truncated() {
        let atom: AtomPosition = atom_from_number(6, Vector3::zeros()).unwrap();
        assert_eq!(atom.symbol, "C");
        // 262 would wrap around to carbon as a u8
        assert!(matches!(
            atom_from_number(262, Vector3::zeros()),
            Err(SpectrumError::UnknownElement(_))
        ));
    }

    #[test]
    fn missing_trajectory_is_a_lookup_error() {
        assert!(matches!(
            read_trajectory("does/not/exist.xyz", GeometryUnits::Angstrom),
            Err(SpectrumError::Lookup { .. })
        ));
        assert_eq!("Bohr".parse::<GeometryUnits>().unwrap(), GeometryUnits::Bohr);
        assert!("nm".parse::<GeometryUnits>().is_err());
    }
}
