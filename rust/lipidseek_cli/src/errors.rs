use lipidseek::errors::{
    ConfigError,
    DataReadingError,
    LipidSeekError,
};

#[derive(Debug)]
pub enum CliError {
    Config {
        source: String,
    },
    ParseError {
        msg: String,
    },
    Io {
        source: String,
        path: Option<String>,
    },
    DataReading {
        source: String,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config { source } => write!(f, "Error interpreting the config: {}", source),
            CliError::ParseError { msg } => write!(f, "Error parsing config: {}", msg),
            CliError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "Error accessing file {}: {}", path, source)
                } else {
                    write!(f, "Error accessing file: {}", source)
                }
            }
            CliError::DataReading { source } => write!(f, "Error reading spectra: {}", source),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn io(source: std::io::Error, path: &std::path::Path) -> Self {
        CliError::Io {
            source: source.to_string(),
            path: Some(path.to_string_lossy().to_string()),
        }
    }
}

impl From<DataReadingError> for CliError {
    fn from(e: DataReadingError) -> Self {
        CliError::DataReading {
            source: e.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config {
            source: e.to_string(),
        }
    }
}

impl From<LipidSeekError> for CliError {
    fn from(e: LipidSeekError) -> Self {
        match e {
            LipidSeekError::DataReadingError(x) => x.into(),
            LipidSeekError::ConfigError(x) => x.into(),
            LipidSeekError::Io { source, path } => CliError::Io {
                source: source.to_string(),
                path: path.map(|p| p.to_string_lossy().to_string()),
            },
            LipidSeekError::ParseError { msg } => CliError::ParseError { msg },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::ParseError { msg: e.to_string() }
    }
}
