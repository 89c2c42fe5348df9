use crate::constants::{ELEMENT_SYMBOLS, MASS_NUMBERS, SYMBOL_TO_NUMBER};
use crate::error::{Result, SpectrumError};
use nalgebra::Vector3;

/// `AtomPosition` holds the chemical element and the position of one atom of a frame.
/// The position is always stored in bohr; the conversion from the units of the
/// trajectory happens once, when the frame is read.
#[derive(Clone, Debug)]
pub struct AtomPosition {
    /// Symbol of the chemical element, e.g. "C" or "Cl"
    pub symbol: &'static str,
    /// Ordinary number of the element
    pub number: u8,
    /// Position of the atom in bohr
    pub xyz: Vector3<f64>,
}

impl AtomPosition {
    /// Create a new [AtomPosition] from the atomic symbol (case insensitive) and the
    /// position in bohr.
    pub fn new(symbol: &str, xyz: Vector3<f64>) -> Result<Self> {
        let number: u8 = *SYMBOL_TO_NUMBER
            .get(symbol.trim().to_lowercase().as_str())
            .ok_or_else(|| SpectrumError::UnknownElement(symbol.to_owned()))?;
        Self::from_number(number, xyz)
    }

    /// Create a new [AtomPosition] from the atomic number and the position in bohr.
    pub fn from_number(number: u8, xyz: Vector3<f64>) -> Result<Self> {
        let symbol: &'static str = ELEMENT_SYMBOLS
            .get((number as usize).wrapping_sub(1))
            .ok_or_else(|| SpectrumError::UnknownElement(format!("Z = {}", number)))?;
        Ok(Self {
            symbol,
            number,
            xyz,
        })
    }

    /// Mass number of the element, see [MASS_NUMBERS](crate::constants::MASS_NUMBERS).
    pub fn mass(&self) -> Result<f64> {
        MASS_NUMBERS
            .get(&self.number)
            .map(|mass| *mass as f64)
            .ok_or_else(|| SpectrumError::UnknownElement(self.symbol.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_case_insensitive() {
        let atom = AtomPosition::new("cl", Vector3::zeros()).unwrap();
        assert_eq!(atom.symbol, "Cl");
        assert_eq!(atom.number, 17);
        assert_eq!(atom.mass().unwrap(), 35.0);
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert!(matches!(
            AtomPosition::new("Xx", Vector3::zeros()),
            Err(SpectrumError::UnknownElement(_))
        ));
        assert!(AtomPosition::from_number(0, Vector3::zeros()).is_err());
        assert!(AtomPosition::from_number(87, Vector3::zeros()).is_err());
    }
}
