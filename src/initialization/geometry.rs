use crate::constants::BOHR_TO_ANGS;
use crate::error::{Result, SpectrumError};
use crate::initialization::AtomPosition;
use nalgebra::Vector3;

/// Computes the origin of the dipole operator as the mass weighted average of the
/// atomic positions:
///        ∑ m_i * r_i
/// R_cm = -----------
///          ∑ m_i
/// The masses are the mass numbers of the elements.
pub fn center_of_mass(atoms: &[AtomPosition]) -> Result<Vector3<f64>> {
    if atoms.is_empty() {
        return Err(SpectrumError::Configuration(String::from(
            "the center of mass of an empty molecule is not defined",
        )));
    }
    let mut total_mass: f64 = 0.0;
    let mut weighted: Vector3<f64> = Vector3::zeros();
    for atom in atoms.iter() {
        let mass: f64 = atom.mass()?;
        total_mass += mass;
        weighted += mass * atom.xyz;
    }
    Ok(weighted / total_mass)
}

/// Multiply all coordinates by `factor`. Used to convert the units of a geometry.
pub fn change_units(atoms: &mut [AtomPosition], factor: f64) {
    atoms.iter_mut().for_each(|atom| atom.xyz *= factor);
}

/// Returns the geometry in the xyz format. The coordinates are written in Angstrom.
pub fn xyz_string(atoms: &[AtomPosition], comment: &str) -> String {
    let mut txt: String = format!("{}\n{}\n", atoms.len(), comment);
    for atom in atoms.iter() {
        let xyz: Vector3<f64> = atom.xyz * BOHR_TO_ANGS;
        txt += &format!(
            "{:<3} {:>18.10} {:>18.10} {:>18.10}\n",
            atom.symbol, xyz.x, xyz.y, xyz.z
        );
    }
    txt
}
