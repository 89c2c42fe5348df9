use crate::constants::SYMBOL_TO_NUMBER;
use crate::error::{Result, SpectrumError};
use crate::initialization::AtomPosition;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

// Layout of the JSON files of the Basis Set Exchange
#[derive(Serialize, Deserialize, Debug)]
struct InputData {
    name: String,
    #[serde(default)]
    description: String,
    elements: std::collections::HashMap<u8, InputElement>,
}

#[derive(Serialize, Deserialize, Debug)]
struct InputElement {
    electron_shells: Vec<InputShell>,
}

#[derive(Serialize, Deserialize, Debug)]
struct InputShell {
    angular_momentum: Vec<usize>,
    exponents: Vec<String>,
    coefficients: Vec<Vec<String>>,
}

/// Contracted Gaussian functions of every element of a basis set. The specification is
/// read once and shared by all frames of a trajectory.
#[derive(Debug, Clone)]
pub struct BasisSpecification {
    pub name: String,
    pub description: String,
    functions: HashMap<u8, Vec<ContractedGaussian>>,
}

/// One shell of contracted Gaussian functions, i.e. (2l+1) spherical or (l+1)(l+2)/2
/// Cartesian basis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractedGaussian {
    pub l: AngularMomentum,
    pub exponents: Vec<f64>,
    pub coefficients: Vec<f64>,
}

impl ContractedGaussian {
    pub fn n_spherical(&self) -> usize {
        2 * self.l as usize + 1
    }

    pub fn n_cartesian(&self) -> usize {
        let l: usize = self.l as usize;
        (l + 1) * (l + 2) / 2
    }

    /// Pairs of (coefficient, exponent) of the primitive Gaussians.
    #[cfg(test)]
    pub fn primitives(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coefficients
            .iter()
            .cloned()
            .zip(self.exponents.iter().cloned())
    }
}

fn parse_values(values: &[String]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|x| {
            // Fortran style exponents appear in some of the files
            x.trim().replace(['D', 'd'], "E").parse::<f64>().map_err(|_| {
                SpectrumError::Configuration(format!("invalid number in the basis set: {}", x))
            })
        })
        .collect()
}

impl TryFrom<InputData> for BasisSpecification {
    type Error = SpectrumError;

    fn try_from(data: InputData) -> Result<Self> {
        let mut functions: HashMap<u8, Vec<ContractedGaussian>> = HashMap::new();
        for (element, shells) in data.elements.into_iter() {
            let mut contracted: Vec<ContractedGaussian> = Vec::new();
            for shell in shells.electron_shells.iter() {
                // The exponents are the same for all angular momenta of a shell.
                let exponents: Vec<f64> = parse_values(&shell.exponents)?;
                // A single angular momentum with several coefficient rows is a general
                // contraction; sp-shells list one angular momentum per row.
                let momenta: Vec<usize> = if shell.angular_momentum.len() == 1 {
                    vec![shell.angular_momentum[0]; shell.coefficients.len()]
                } else {
                    shell.angular_momentum.clone()
                };
                if momenta.len() != shell.coefficients.len() {
                    return Err(SpectrumError::DimensionMismatch {
                        context: format!("coefficient rows of a shell of element {}", element),
                        expected: momenta.len(),
                        found: shell.coefficients.len(),
                    });
                }
                for (l, c) in momenta.iter().zip(shell.coefficients.iter()) {
                    let coefficients: Vec<f64> = parse_values(c)?;
                    if coefficients.len() != exponents.len() {
                        return Err(SpectrumError::DimensionMismatch {
                            context: format!("primitives of a shell of element {}", element),
                            expected: exponents.len(),
                            found: coefficients.len(),
                        });
                    }
                    contracted.push(ContractedGaussian {
                        l: AngularMomentum::try_from(*l)?,
                        exponents: exponents.clone(),
                        coefficients,
                    });
                }
            }
            functions.insert(element, contracted);
        }
        Ok(Self {
            name: data.name,
            description: data.description,
            functions,
        })
    }
}

impl BasisSpecification {
    pub fn from_json(data: &str) -> Result<Self> {
        let data: InputData = serde_json::from_str(data).map_err(|err| {
            SpectrumError::Configuration(format!("basis set file is not well-formatted: {}", err))
        })?;
        Self::try_from(data)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Ordered shells of the element with the given symbol.
    pub fn functions(&self, symbol: &str) -> Result<&[ContractedGaussian]> {
        let number: u8 = *SYMBOL_TO_NUMBER
            .get(symbol.trim().to_lowercase().as_str())
            .ok_or_else(|| SpectrumError::UnknownElement(symbol.to_owned()))?;
        self.functions
            .get(&number)
            .map(|functions| functions.as_slice())
            .ok_or_else(|| SpectrumError::Lookup {
                key: format!("{}/{}", self.name, symbol),
            })
    }

    /// Number of spherical basis functions of the molecule.
    pub fn n_spherical(&self, atoms: &[AtomPosition]) -> Result<usize> {
        let mut n: usize = 0;
        for atom in atoms.iter() {
            n += self
                .functions(atom.symbol)?
                .iter()
                .map(|f| f.n_spherical())
                .sum::<usize>();
        }
        Ok(n)
    }

    /// Number of Cartesian basis functions of the molecule.
    pub fn n_cartesian(&self, atoms: &[AtomPosition]) -> Result<usize> {
        let mut n: usize = 0;
        for atom in atoms.iter() {
            n += self
                .functions(atom.symbol)?
                .iter()
                .map(|f| f.n_cartesian())
                .sum::<usize>();
        }
        Ok(n)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AngularMomentum {
    S = 0,
    P = 1,
    D = 2,
    F = 3,
    G = 4,
    H = 5,
    I = 6,
}

impl fmt::Display for AngularMomentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol: &str = match self {
            AngularMomentum::S => "s",
            AngularMomentum::P => "p",
            AngularMomentum::D => "d",
            AngularMomentum::F => "f",
            AngularMomentum::G => "g",
            AngularMomentum::H => "h",
            AngularMomentum::I => "i",
        };
        write!(f, "{}", symbol)
    }
}

impl TryFrom<usize> for AngularMomentum {
    type Error = SpectrumError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            0 => Ok(Self::S),
            1 => Ok(Self::P),
            2 => Ok(Self::D),
            3 => Ok(Self::F),
            4 => Ok(Self::G),
            5 => Ok(Self::H),
            6 => Ok(Self::I),
            a => Err(SpectrumError::Configuration(format!(
                "angular momentum {} is not implemented",
                a
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const BASIS: &str = r#"{
        "name": "STO-3G",
        "description": "minimal basis",
        "elements": {
            "1": {"electron_shells": [
                {"function_type": "gto", "region": "", "angular_momentum": [0],
                 "exponents": ["0.3425250914E+01", "0.6239137298E+00", "0.1688554040E+00"],
                 "coefficients": [["0.1543289673E+00", "0.5353281423E+00", "0.4446345422E+00"]]}]},
            "6": {"electron_shells": [
                {"angular_momentum": [0],
                 "exponents": ["0.7161683735E+02", "0.1304509632E+02", "0.3530512160E+01"],
                 "coefficients": [["0.1543289673E+00", "0.5353281423E+00", "0.4446345422E+00"]]},
                {"angular_momentum": [0, 1],
                 "exponents": ["0.2941249355E+01", "0.6834830964E+00", "0.2222899159E+00"],
                 "coefficients": [["-0.9996722919E-01", "0.3995128261E+00", "0.7001154689E+00"],
                                  ["0.1559162750E+00", "0.6076837186E+00", "0.3919573931E+00"]]}]}
        }
    }"#;

    #[test]
    fn shells_are_split_per_angular_momentum() {
        let basis = BasisSpecification::from_json(BASIS).unwrap();
        assert_eq!(basis.name, "STO-3G");
        let carbon: &[ContractedGaussian] = basis.functions("C").unwrap();
        let momenta: Vec<AngularMomentum> = carbon.iter().map(|f| f.l).collect();
        assert_eq!(
            momenta,
            vec![AngularMomentum::S, AngularMomentum::S, AngularMomentum::P]
        );
        assert_eq!(carbon[2].exponents, carbon[1].exponents);
        let (c, e): (f64, f64) = carbon[0].primitives().next().unwrap();
        assert_eq!(c, 0.1543289673);
        assert_eq!(e, 71.61683735);
    }

    #[test]
    fn basis_function_counts_of_methane() {
        let basis = BasisSpecification::from_json(BASIS).unwrap();
        let mut atoms = vec![AtomPosition::new("C", Vector3::zeros()).unwrap()];
        for _ in 0..4 {
            atoms.push(AtomPosition::new("H", Vector3::zeros()).unwrap());
        }
        assert_eq!(basis.n_spherical(&atoms).unwrap(), 9);
        assert_eq!(basis.n_cartesian(&atoms).unwrap(), 9);
    }

    #[test]
    fn missing_elements_are_lookup_errors() {
        let basis = BasisSpecification::from_json(BASIS).unwrap();
        assert!(matches!(
            basis.functions("O"),
            Err(SpectrumError::Lookup { .. })
        ));
        assert!(matches!(
            basis.functions("Qq"),
            Err(SpectrumError::UnknownElement(_))
        ));
        assert!(AngularMomentum::try_from(7).is_err());
    }

    #[test]
    fn malformed_files_are_rejected() {
        assert!(BasisSpecification::from_json("{\"name\": 1}").is_err());
    }
}
