use crate::error::{Result, SpectrumError};
use std::f64::consts::PI;
use std::str::FromStr;

/// Line shape that spreads the oscillator strength of a transition over the energy axis.
/// Both functions integrate to one, the width is given in Hartree.
/// See Phys. Chem. Chem. Phys., 2010, 12, 4959-4967
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Broadening {
    /// sqrt(2/π)/δ exp(-2((x-c)/δ)^2)
    Gaussian { width: f64 },
    /// (δ/2π) / ((x-c)^2 + (δ/2)^2)
    Lorentzian { width: f64 },
}

impl Broadening {
    /// Selects the line shape by its name, `gaussian` or `lorentzian`.
    pub fn new(name: &str, width: f64) -> Result<Self> {
        if !(width > 0.0) || !width.is_finite() {
            return Err(SpectrumError::Configuration(format!(
                "the broadening has to be positive, got {}",
                width
            )));
        }
        let kind: BroadeningKind = name.parse()?;
        Ok(match kind {
            BroadeningKind::Gaussian => Broadening::Gaussian { width },
            BroadeningKind::Lorentzian => Broadening::Lorentzian { width },
        })
    }

    #[cfg(test)]
    pub fn width(&self) -> f64 {
        match self {
            Broadening::Gaussian { width } | Broadening::Lorentzian { width } => *width,
        }
    }

    /// Value of the line shape centered at `center` at the energy `x`.
    pub fn evaluate(&self, x: f64, center: f64) -> f64 {
        match *self {
            Broadening::Gaussian { width } => {
                (2.0 / PI).sqrt() / width * (-2.0 * ((x - center) / width).powi(2)).exp()
            }
            Broadening::Lorentzian { width } => {
                (width / (2.0 * PI)) / ((x - center).powi(2) + (width / 2.0).powi(2))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BroadeningKind {
    Gaussian,
    Lorentzian,
}

impl FromStr for BroadeningKind {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gaussian" => Ok(BroadeningKind::Gaussian),
            "lorentzian" => Ok(BroadeningKind::Lorentzian),
            other => Err(SpectrumError::Configuration(format!(
                "unknown convolution: {}, choose gaussian or lorentzian",
                other
            ))),
        }
    }
}
