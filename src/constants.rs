use phf::phf_map;

// CODATA 2018
/// Hartree energy in eV
pub const HARTREE_TO_EV: f64 = 27.211386245988;
/// Hartree energy in wavenumbers (cm^-1)
pub const HARTREE_TO_WAVENUMBERS: f64 = 219474.6313632;
/// Bohr radius in Angstrom
pub const BOHR_TO_ANGS: f64 = 0.529177210903;
pub const ANGS_TO_BOHR: f64 = 1.0 / BOHR_TO_ANGS;
/// Bohr radius in meter
pub const BOHR_TO_METER: f64 = 5.29177210903e-11;
/// speed of light in atomic units
pub const SPEED_OF_LIGHT: f64 = 137.036;
/// Avogadro constant in mol^-1
pub const AVOGADRO: f64 = 6.02214076e23;
/// 1 cm^-1 expressed in nm^-1
pub const WAVENUMBER_TO_INVERSE_NM: f64 = 1.0e-7;

/// Atomic numbers of the chemical elements up to radon.
pub static SYMBOL_TO_NUMBER: phf::Map<&'static str, u8> = phf_map! {
    "h" => 1, "he" => 2,
    "li" => 3, "be" => 4, "b" => 5, "c" => 6, "n" => 7, "o" => 8, "f" => 9, "ne" => 10,
    "na" => 11, "mg" => 12, "al" => 13, "si" => 14, "p" => 15, "s" => 16, "cl" => 17,
    "ar" => 18,
    "k" => 19, "ca" => 20, "sc" => 21, "ti" => 22, "v" => 23, "cr" => 24, "mn" => 25,
    "fe" => 26, "co" => 27, "ni" => 28, "cu" => 29, "zn" => 30, "ga" => 31, "ge" => 32,
    "as" => 33, "se" => 34, "br" => 35, "kr" => 36,
    "rb" => 37, "sr" => 38, "y" => 39, "zr" => 40, "nb" => 41, "mo" => 42, "tc" => 43,
    "ru" => 44, "rh" => 45, "pd" => 46, "ag" => 47, "cd" => 48, "in" => 49, "sn" => 50,
    "sb" => 51, "te" => 52, "i" => 53, "xe" => 54,
    "cs" => 55, "ba" => 56, "la" => 57, "ce" => 58, "pr" => 59, "nd" => 60, "pm" => 61,
    "sm" => 62, "eu" => 63, "gd" => 64, "tb" => 65, "dy" => 66, "ho" => 67, "er" => 68,
    "tm" => 69, "yb" => 70, "lu" => 71, "hf" => 72, "ta" => 73, "w" => 74, "re" => 75,
    "os" => 76, "ir" => 77, "pt" => 78, "au" => 79, "hg" => 80, "tl" => 81, "pb" => 82,
    "bi" => 83, "po" => 84, "at" => 85, "rn" => 86,
};

/// Mass number of the most abundant isotope of each element. The center of mass of the
/// molecule is computed with these integer masses.
pub static MASS_NUMBERS: phf::Map<u8, u16> = phf_map! {
    1u8 => 1, 2u8 => 4,
    3u8 => 7, 4u8 => 9, 5u8 => 11, 6u8 => 12, 7u8 => 14, 8u8 => 16, 9u8 => 19, 10u8 => 20,
    11u8 => 23, 12u8 => 24, 13u8 => 27, 14u8 => 28, 15u8 => 31, 16u8 => 32, 17u8 => 35,
    18u8 => 40,
    19u8 => 39, 20u8 => 40, 21u8 => 45, 22u8 => 48, 23u8 => 51, 24u8 => 52, 25u8 => 55,
    26u8 => 56, 27u8 => 59, 28u8 => 58, 29u8 => 63, 30u8 => 64, 31u8 => 69, 32u8 => 74,
    33u8 => 75, 34u8 => 80, 35u8 => 79, 36u8 => 84,
    37u8 => 85, 38u8 => 88, 39u8 => 89, 40u8 => 90, 41u8 => 93, 42u8 => 98, 43u8 => 98,
    44u8 => 102, 45u8 => 103, 46u8 => 106, 47u8 => 107, 48u8 => 114, 49u8 => 115,
    50u8 => 120, 51u8 => 121, 52u8 => 130, 53u8 => 127, 54u8 => 132,
    55u8 => 133, 56u8 => 138, 57u8 => 139, 58u8 => 140, 59u8 => 141, 60u8 => 142,
    61u8 => 145, 62u8 => 152, 63u8 => 153, 64u8 => 158, 65u8 => 159, 66u8 => 164,
    67u8 => 165, 68u8 => 166, 69u8 => 169, 70u8 => 174, 71u8 => 175, 72u8 => 180,
    73u8 => 181, 74u8 => 184, 75u8 => 187, 76u8 => 192, 77u8 => 193, 78u8 => 195,
    79u8 => 197, 80u8 => 202, 81u8 => 205, 82u8 => 208, 83u8 => 209, 84u8 => 209,
    85u8 => 210, 86u8 => 222,
};

/// Element symbols indexed by atomic number - 1.
pub const ELEMENT_SYMBOLS: [&str; 86] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn",
];
