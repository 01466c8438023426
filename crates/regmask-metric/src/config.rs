use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameter key holding the number of pyramid levels.
pub const NUMBER_OF_RESOLUTIONS_KEY: &str = "NumberOfResolutions";

/// Number of pyramid levels used when the parameter is absent or unparsable.
pub const DEFAULT_NUMBER_OF_RESOLUTIONS: usize = 3;

/// Key/value parameter store with command line overrides.
///
/// Parameters hold a list of values per key, as written in a parameter file:
///
/// ```text
/// // registration parameters
/// (NumberOfResolutions 4)
/// (Metric "MutualInformationHistogram")
/// (ImagePyramidSchedule 8 8 4 4 2 2 1 1)
/// ```
///
/// Command line arguments are `-key value` pairs. A command line argument
/// `-Key` takes precedence over the parameter `Key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    parameters: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    command_line: BTreeMap<String, String>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values of a parameter.
    pub fn with_parameter<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Set a command line argument, e.g. `-fMask`.
    pub fn with_command_line_argument(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.command_line.insert(key.into(), value.into());
        self
    }

    /// Build a configuration from `-key value` command line tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingValue`] for a trailing flag without value and
    /// [`ConfigError::UnexpectedToken`] for a value not preceded by a flag.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(key) = args.next() {
            if !key.starts_with('-') || key.len() < 2 {
                return Err(ConfigError::UnexpectedToken(key));
            }
            let value = args.next().ok_or_else(|| ConfigError::MissingValue(key.clone()))?;
            config.command_line.insert(key, value);
        }

        Ok(config)
    }

    /// Parse parameters from the text of a parameter file.
    ///
    /// Each non-empty line holds one `(Key value ...)` entry. Values may be
    /// double quoted; `//` starts a comment outside of quotes.
    pub fn from_parameter_str(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_number = idx + 1;
            let parse_error = |message: &str| ConfigError::Parse {
                line: line_number,
                message: message.to_string(),
            };

            let tokens = tokenize_line(raw_line).map_err(parse_error)?;
            let Some(tokens) = tokens else {
                continue;
            };

            let mut tokens = tokens.into_iter();
            let key = match tokens.next() {
                Some(Token::Bare(key)) => key,
                Some(Token::Quoted(_)) => return Err(parse_error("parameter name is quoted")),
                None => return Err(parse_error("empty parameter entry")),
            };

            let values = tokens.map(Token::into_inner).collect::<Vec<_>>();
            if values.is_empty() {
                return Err(parse_error("parameter has no value"));
            }

            config.parameters.insert(key, values);
        }

        Ok(config)
    }

    /// Read and parse a parameter file.
    pub fn from_parameter_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_parameter_str(&text)
    }

    /// Decode a configuration from its json representation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge `other` into `self`; entries of `other` win.
    pub fn merge(mut self, other: Configuration) -> Self {
        self.parameters.extend(other.parameters);
        self.command_line.extend(other.command_line);
        self
    }

    /// Get a command line argument. An empty value counts as absent.
    pub fn command_line_argument(&self, key: &str) -> Option<&str> {
        self.command_line
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn raw_parameter(&self, key: &str, index: usize) -> Option<&str> {
        if let Some(value) = self.command_line_argument(&format!("-{key}")) {
            return value.split_whitespace().nth(index);
        }
        self.parameters
            .get(key)
            .and_then(|values| values.get(index))
            .map(String::as_str)
    }

    /// Read the `index`-th value of a parameter.
    ///
    /// Returns `Ok(None)` when the parameter or the index is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value does not parse as `T`.
    pub fn read_parameter<T: FromStr>(
        &self,
        key: &str,
        index: usize,
    ) -> Result<Option<T>, ConfigError> {
        let Some(raw) = self.raw_parameter(key, index) else {
            return Ok(None);
        };

        raw.parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            })
    }

    /// Read the `index`-th value of a parameter, falling back to `default`
    /// when it is absent or unparsable.
    pub fn read_parameter_or<T: FromStr>(&self, key: &str, index: usize, default: T) -> T {
        match self.read_parameter(key, index) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                log::warn!("{e}, using the default value");
                default
            }
        }
    }

    /// The number of pyramid levels, [`DEFAULT_NUMBER_OF_RESOLUTIONS`] if unset.
    pub fn number_of_resolutions(&self) -> usize {
        self.read_parameter_or(NUMBER_OF_RESOLUTIONS_KEY, 0, DEFAULT_NUMBER_OF_RESOLUTIONS)
    }
}

enum Token {
    Bare(String),
    Quoted(String),
}

impl Token {
    fn into_inner(self) -> String {
        match self {
            Token::Bare(s) | Token::Quoted(s) => s,
        }
    }
}

// returns None for blank and comment-only lines
fn tokenize_line(line: &str) -> Result<Option<Vec<Token>>, &'static str> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut opened = false;
    let mut closed = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                tokens.push(Token::Quoted(std::mem::take(&mut current)));
                in_quotes = false;
            } else {
                current.push(c);
            }
            continue;
        }

        if c == '/' && chars.peek() == Some(&'/') {
            break;
        }

        if closed {
            if c.is_whitespace() {
                continue;
            }
            return Err("unexpected content after closing parenthesis");
        }

        match c {
            '(' if !opened => opened = true,
            '(' => return Err("nested parenthesis"),
            _ if !opened && c.is_whitespace() => {}
            _ if !opened => return Err("entry must start with '('"),
            ')' => {
                if !current.is_empty() {
                    tokens.push(Token::Bare(std::mem::take(&mut current)));
                }
                closed = true;
            }
            '"' => {
                if !current.is_empty() {
                    return Err("quote inside a value");
                }
                in_quotes = true;
            }
            _ if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(Token::Bare(std::mem::take(&mut current)));
                }
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quote");
    }
    if opened && !closed {
        return Err("missing closing parenthesis");
    }

    Ok(opened.then_some(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_parameter_text() -> Result<(), ConfigError> {
        let text = r#"
            // multi-resolution setup
            (NumberOfResolutions 4)
            (Metric "MutualInformationHistogram") // trailing comment
            (ImagePyramidSchedule 8 8 4 4 2 2 1 1)
            (ResultImageFormat "mhd")
        "#;
        let config = Configuration::from_parameter_str(text)?;

        assert_eq!(config.read_parameter::<usize>("NumberOfResolutions", 0)?, Some(4));
        assert_eq!(
            config.read_parameter::<String>("Metric", 0)?.as_deref(),
            Some("MutualInformationHistogram")
        );
        assert_eq!(config.read_parameter::<u32>("ImagePyramidSchedule", 5)?, Some(2));
        assert_eq!(config.read_parameter::<u32>("ImagePyramidSchedule", 8)?, None);
        assert_eq!(config.read_parameter::<u32>("Missing", 0)?, None);
        Ok(())
    }

    #[test]
    fn parse_parameter_errors() {
        for (text, line) in [
            ("(NumberOfResolutions 3", 1),
            ("\nNumberOfResolutions 3)", 2),
            ("(Metric \"Mutual)", 1),
            ("(NumberOfResolutions)", 1),
            ("(A 1) (B 2)", 1),
        ] {
            match Configuration::from_parameter_str(text) {
                Err(ConfigError::Parse { line: l, .. }) => assert_eq!(l, line, "{text}"),
                other => panic!("expected parse error for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn command_line_arguments() -> Result<(), ConfigError> {
        let config = Configuration::from_args(["-fMask", "fixed.png", "-mMask", ""])?;
        assert_eq!(config.command_line_argument("-fMask"), Some("fixed.png"));
        assert_eq!(config.command_line_argument("-mMask"), None);
        assert_eq!(config.command_line_argument("-out"), None);
        Ok(())
    }

    #[test]
    fn command_line_argument_errors() {
        let res = Configuration::from_args(["-fMask"]);
        assert!(matches!(res, Err(ConfigError::MissingValue(k)) if k == "-fMask"));

        let res = Configuration::from_args(["fixed.png"]);
        assert!(matches!(res, Err(ConfigError::UnexpectedToken(_))));
    }

    #[test]
    fn command_line_overrides_parameter() {
        let config = Configuration::new()
            .with_parameter(NUMBER_OF_RESOLUTIONS_KEY, ["2"])
            .with_command_line_argument("-NumberOfResolutions", "5");
        assert_eq!(config.number_of_resolutions(), 5);
    }

    #[test]
    fn number_of_resolutions_fallback() {
        let config = Configuration::new();
        assert_eq!(config.number_of_resolutions(), DEFAULT_NUMBER_OF_RESOLUTIONS);

        let config = Configuration::new().with_parameter(NUMBER_OF_RESOLUTIONS_KEY, ["three"]);
        assert!(matches!(
            config.read_parameter::<usize>(NUMBER_OF_RESOLUTIONS_KEY, 0),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config.number_of_resolutions(), DEFAULT_NUMBER_OF_RESOLUTIONS);
    }

    #[test]
    fn json_configuration() -> Result<(), ConfigError> {
        let json = r#"{
            "parameters": { "NumberOfResolutions": ["6"] },
            "command_line": { "-mMask": "moving.png" }
        }"#;
        let config = Configuration::from_json_str(json)?;
        assert_eq!(config.number_of_resolutions(), 6);
        assert_eq!(config.command_line_argument("-mMask"), Some("moving.png"));

        let overrides = Configuration::new().with_parameter(NUMBER_OF_RESOLUTIONS_KEY, ["1"]);
        let merged = config.merge(overrides);
        assert_eq!(merged.number_of_resolutions(), 1);
        Ok(())
    }
}
