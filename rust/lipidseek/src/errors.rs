use std::path::PathBuf;

// Fatal preconditions only. Per-candidate and per-spectrum skips are not errors,
// they are simply absent from the output.
#[derive(Debug)]
pub enum DataReadingError {
    FileReadingError {
        source: std::io::Error,
        context: &'static str,
        path: PathBuf,
    },
    NoUsableSpectra {
        total: usize,
    },
}

#[derive(Debug)]
pub enum ConfigError {
    MalformedLine {
        line: usize,
        content: String,
    },
    NonNumericValue {
        key: String,
        value: String,
    },
    JsonError {
        source: serde_json::Error,
    },
    FileReadingError {
        source: std::io::Error,
        path: PathBuf,
    },
}

#[derive(Debug)]
pub enum LipidSeekError {
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    ParseError {
        msg: String,
    },
    DataReadingError(DataReadingError),
    ConfigError(ConfigError),
}

impl std::fmt::Display for DataReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataReadingError::FileReadingError {
                source,
                context,
                path,
            } => write!(f, "{} ({}): {}", context, path.display(), source),
            DataReadingError::NoUsableSpectra { total } => write!(
                f,
                "None of the {} spectra carry a usable precursor m/z",
                total
            ),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MalformedLine { line, content } => {
                write!(f, "Unable to parse config line {}: '{}'", line, content)
            }
            ConfigError::NonNumericValue { key, value } => {
                write!(f, "Value for '{}' is not numeric: '{}'", key, value)
            }
            ConfigError::JsonError { source } => write!(f, "Invalid JSON config: {}", source),
            ConfigError::FileReadingError { source, path } => {
                write!(f, "Unable to read config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::fmt::Display for LipidSeekError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LipidSeekError::Io { source, path } => match path {
                Some(path) => write!(f, "IO error on {}: {}", path.display(), source),
                None => write!(f, "IO error: {}", source),
            },
            LipidSeekError::ParseError { msg } => write!(f, "Parse error: {}", msg),
            LipidSeekError::DataReadingError(e) => write!(f, "{}", e),
            LipidSeekError::ConfigError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DataReadingError {}

impl std::error::Error for ConfigError {}

impl std::error::Error for LipidSeekError {}

pub type Result<T> = std::result::Result<T, LipidSeekError>;

impl From<DataReadingError> for LipidSeekError {
    fn from(x: DataReadingError) -> Self {
        Self::DataReadingError(x)
    }
}

impl From<ConfigError> for LipidSeekError {
    fn from(x: ConfigError) -> Self {
        Self::ConfigError(x)
    }
}

impl From<serde_json::Error> for LipidSeekError {
    fn from(val: serde_json::Error) -> Self {
        LipidSeekError::ParseError {
            msg: val.to_string(),
        }
    }
}

impl From<std::io::Error> for LipidSeekError {
    fn from(source: std::io::Error) -> Self {
        LipidSeekError::Io { source, path: None }
    }
}
