use regmask_image::ImageError;
use regmask_io::IoError;

use crate::lifecycle::LifecycleState;
use crate::schedule::MaskRole;

/// An error type for the configuration source.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A command line flag was given without a value.
    #[error("Command line argument {0} has no value")]
    MissingValue(String),

    /// A command line token is not a `-key` flag.
    #[error("Unexpected command line token: {0}")]
    UnexpectedToken(String),

    /// A parameter value could not be converted to the requested type.
    #[error("Invalid value {value:?} for parameter {key}")]
    InvalidValue {
        /// The parameter key.
        key: String,
        /// The raw value.
        value: String,
    },

    /// A parameter file line could not be parsed.
    #[error("Failed to parse parameter file at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Error to read the parameter file.
    #[error("Failed to read the parameter file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode a json configuration.
    #[error("Failed to decode the json configuration. {0}")]
    JsonError(#[from] serde_json::Error),
}

/// An error type for the metric module.
#[derive(thiserror::Error, Debug)]
pub enum MetricError {
    /// A requested mask could not be loaded.
    #[error("{source}\nError occurred while reading {role} mask in {stage}.")]
    MaskLoad {
        /// Which mask failed.
        role: MaskRole,
        /// Lifecycle stage that attempted the load.
        stage: &'static str,
        /// The underlying failure.
        #[source]
        source: IoError,
    },

    /// The erosion primitive rejected its input.
    #[error("Failed to erode the {role} mask. {source}")]
    Erosion {
        /// Which mask failed.
        role: MaskRole,
        /// The underlying failure.
        #[source]
        source: ImageError,
    },

    /// A lifecycle hook was called out of order.
    #[error("Lifecycle hook {hook} called in state {state:?}")]
    InvalidLifecycle {
        /// The hook that was called.
        hook: &'static str,
        /// The state the component was in.
        state: LifecycleState,
    },

    /// The metric base failed to initialize.
    #[error("Failed to initialize the metric. {0}")]
    Initialization(String),

    /// Error in the configuration source.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
