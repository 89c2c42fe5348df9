use crate::initialization::AtomPosition;
use crate::io::{read_trajectory, Configuration, GeometryUnits};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads the configuration file. If it does not exist in the directory the default
/// settings are used and written to the file, so that the user can see all the options.
pub fn read_config(config_file_path: &Path) -> Result<Configuration> {
    let config_string: String = if config_file_path.exists() {
        fs::read_to_string(config_file_path)
            .with_context(|| format!("Unable to read {}", config_file_path.display()))?
    } else {
        String::new()
    };
    let config: Configuration = toml::from_str(&config_string)
        .with_context(|| format!("{} is not a valid configuration", config_file_path.display()))?;
    if !config_file_path.exists() {
        fs::write(config_file_path, toml::to_string(&config)?)
            .with_context(|| format!("Unable to write {}", config_file_path.display()))?;
    }
    Ok(config)
}

/// Reads the configuration and all geometries of the trajectory that it names. The
/// positions are converted to bohr.
pub fn read_input(config_file_path: &Path) -> Result<(Vec<Vec<AtomPosition>>, Configuration)> {
    let config: Configuration = read_config(config_file_path)?;
    let units: GeometryUnits = config.trajectory.geometry_units.parse()?;
    let geometries: Vec<Vec<AtomPosition>> = read_trajectory(&config.trajectory.path, units)
        .with_context(|| format!("Unable to read the trajectory {}", config.trajectory.path))?;
    Ok((geometries, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::CONFIG_FILE_NAME;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_is_created() {
        let root: TempDir = TempDir::new().unwrap();
        let path: PathBuf = root.path().join(CONFIG_FILE_NAME);
        let config: Configuration = read_config(&path).unwrap();
        assert!(path.is_file());
        let again: Configuration = read_config(&path).unwrap();
        assert_eq!(config.project_name, again.project_name);
    }
}
