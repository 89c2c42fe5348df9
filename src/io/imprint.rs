use crate::utils::Timer;
use clap::{crate_name, crate_version};
use log::warn;

const LOG_WIDTH: usize = 80;

/// Stages of a spectrum job, printed below the program name.
const STAGES: [&str; 3] = [
    "multipole integrals of every sampled geometry (cached in the tensor store)",
    "transition dipoles and oscillator strengths between orbitals",
    "broadened cross section and molar extinction coefficients",
];

fn header_lines() -> Vec<String> {
    let mut lines: Vec<String> = vec![
        crate_name!().to_uppercase(),
        format!("version {}", crate_version!()),
        String::new(),
        String::from("absorption spectra along molecular dynamics trajectories"),
    ];
    lines.extend(STAGES.iter().enumerate().map(|(i, stage)| format!("{}. {}", i + 1, stage)));
    lines
}

pub fn write_header() {
    warn!("{:=^LOG_WIDTH$}", "");
    for line in header_lines().iter() {
        warn!("{: ^LOG_WIDTH$}", line);
    }
    warn!("{:=^LOG_WIDTH$}", "");
    warn!("{: ^LOG_WIDTH$}", "");
}

pub fn write_footer(timer: Timer) {
    warn!("{:-^LOG_WIDTH$}", "");
    warn!(
        "{:>68} {:>8.2} s",
        "total elapsed time:",
        timer.elapsed()
    );
    warn!(
        "{: ^LOG_WIDTH$}",
        format!("{} finished", crate_name!().to_uppercase())
    );
    warn!("{:=^LOG_WIDTH$}", "");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fits_the_log_width() {
        let lines: Vec<String> = header_lines();
        assert_eq!(lines[0], "ABSORPTION-SPECTRUM");
        assert!(lines[1].ends_with(crate_version!()));
        assert_eq!(lines.len(), 4 + STAGES.len());
        assert!(lines.iter().all(|line| line.len() <= LOG_WIDTH));
    }
}
