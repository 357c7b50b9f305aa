use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use lipidseek::ParameterMap;

use crate::cli::Cli;
use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub input: Option<InputConfig>,
    /// Flat object of search parameters, applied on top of `parameter_file`.
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub parameter_file: Option<PathBuf>,
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum InputConfig {
    #[serde(rename = "mgf")]
    Mgf { path: PathBuf },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Also dump every retained score as JSON Lines.
    #[serde(default = "default_true")]
    pub write_scores: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let conf = std::fs::File::open(path).map_err(|e| CliError::io(e, path))?;
        let config: Config = serde_json::from_reader(std::io::BufReader::new(conf))?;
        Ok(config)
    }

    /// Reads the config named by the command line and applies its overrides.
    pub fn with_cli_args(args: &Cli) -> Result<Self, CliError> {
        let mut config = Self::from_path(&args.config)?;
        if let Some(spectra_file) = &args.spectra_file {
            config.input = Some(InputConfig::Mgf {
                path: spectra_file.clone(),
            });
        }
        if let Some(parameter_file) = &args.parameter_file {
            config.parameter_file = Some(parameter_file.clone());
        }
        if let Some(output_dir) = &args.output_dir {
            config.output = Some(OutputConfig {
                directory: output_dir.clone(),
                write_scores: config.output.as_ref().map_or(true, |o| o.write_scores),
            });
        }
        if args.threads.is_some() {
            config.threads = args.threads;
        }
        Ok(config)
    }

    pub fn spectra_path(&self) -> Result<&Path, CliError> {
        match &self.input {
            Some(InputConfig::Mgf { path }) => Ok(path),
            None => Err(CliError::Config {
                source: "No input provided, please provide one in either the config file or with the --spectra-file flag".to_string(),
            }),
        }
    }

    pub fn output_config(&self) -> Result<&OutputConfig, CliError> {
        self.output.as_ref().ok_or_else(|| CliError::Config {
            source: "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
        })
    }

    /// Parameter file first, inline parameters on top.
    pub fn parameter_map(&self) -> Result<ParameterMap, CliError> {
        let mut map = match &self.parameter_file {
            Some(path) => ParameterMap::from_path(path)?,
            None => ParameterMap::new(),
        };
        if let Some(inline) = &self.parameters {
            map.merge(&ParameterMap::from_json_value(inline)?);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_parameters() {
        let config: Config = serde_json::from_str(
            r#"{
                "input": {"type": "mgf", "path": "spectra.mgf"},
                "parameters": {"HG.PC": 1, "ESI.Negative": false, "mzFragTol": 0.01},
                "output": {"directory": "out"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.spectra_path().unwrap(), Path::new("spectra.mgf"));
        assert!(config.output_config().unwrap().write_scores);
        let map = config.parameter_map().unwrap();
        assert_eq!(map.get("HG.PC"), Some(1.0));
        assert_eq!(map.get("ESI.Negative"), Some(0.0));
        assert_eq!(map.get("mzFragTol"), Some(0.01));
    }

    #[test]
    fn test_missing_sections_are_reported() {
        let config: Config = serde_json::from_str(r#"{"input": null, "output": null}"#).unwrap();
        assert!(matches!(config.spectra_path(), Err(CliError::Config { .. })));
        assert!(matches!(config.output_config(), Err(CliError::Config { .. })));
        assert!(config.parameter_map().unwrap().is_empty());
    }
}
