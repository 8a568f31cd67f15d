// Import required dependencies
use crate::collector::{normalize_path, ExtensionFilter};
use crate::encoding::{EncodingMode, LineEndingMode};
use crate::errors::{ConfigError, MergerError, MergerResult};
use crate::merge::FileMergeRequest;
use dialoguer::{Confirm, Input, Select}; // For interactive CLI prompts
use serde::{Deserialize, Serialize}; // For JSON serialization/deserialization
use std::path::{Path, PathBuf}; // For file path handling
use tokio::fs; // For async file operations

/// Default output file name when neither the command line nor a config names one
pub const DEFAULT_OUTPUT_FILE: &str = "merged.txt";

// Configuration structure that can be serialized to/from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: Vec<FileMergeRequest>, // Ordered input paths with their requested encodings
    #[serde(default)]
    pub output: Option<PathBuf>, // Path where merged output will be written
    #[serde(default = "default_output_encoding")]
    pub output_encoding: EncodingMode, // Encoding of the merged output
    #[serde(default)]
    pub line_ending: LineEndingMode, // Line-ending convention of the merged output
    #[serde(default)]
    pub extensions: Option<String>, // Extension filter applied inside directories
    #[serde(default)]
    pub verbose: bool, // Enable detailed logging
}

fn default_output_encoding() -> EncodingMode {
    EncodingMode::Utf8NoBom
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            output_encoding: default_output_encoding(),
            line_ending: LineEndingMode::default(),
            extensions: None,
            verbose: false,
        }
    }
}

impl Config {
    // Load configuration from a JSON file
    pub async fn load(path: &Path) -> MergerResult<Self> {
        let content = fs::read_to_string(path).await.map_err(MergerError::Io)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| MergerError::Config(ConfigError::InvalidFormat(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    // Save configuration to a JSON file
    pub async fn save(&self, path: &Path) -> MergerResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MergerError::Config(ConfigError::SerializationError(e.to_string())))?;
        fs::write(path, content).await.map_err(MergerError::Io)
    }

    // Create a configuration template showing every field
    pub fn template() -> Self {
        Self {
            inputs: vec![
                FileMergeRequest::new("notes/part1.txt", EncodingMode::Auto),
                FileMergeRequest::new("legacy/part2.txt", EncodingMode::Cp932),
                FileMergeRequest::new("docs", EncodingMode::Auto),
            ],
            output: Some(PathBuf::from(DEFAULT_OUTPUT_FILE)),
            output_encoding: EncodingMode::Utf8NoBom,
            line_ending: LineEndingMode::Crlf,
            extensions: Some("txt,md".to_string()),
            verbose: false,
        }
    }

    /// Check values that can be judged without touching the file system
    pub fn validate(&self) -> MergerResult<()> {
        self.output_encoding.output_codec()?;
        self.extension_filter()?;
        Ok(())
    }

    pub fn extension_filter(&self) -> MergerResult<Option<ExtensionFilter>> {
        match &self.extensions {
            Some(list) => ExtensionFilter::parse(list),
            None => Ok(None),
        }
    }

    // Interactive configuration setup using command-line prompts
    pub async fn guided_setup() -> MergerResult<Self> {
        let input_labels: Vec<&str> = EncodingMode::INPUT_OPTIONS
            .iter()
            .map(|mode| mode.label())
            .collect();

        // Prompt for input paths until an empty line is entered
        let mut inputs = Vec::new();
        loop {
            let path: String = Input::new()
                .with_prompt("Add a file or folder to merge (empty to finish)")
                .allow_empty(true)
                .interact_text()?;
            let path = path.trim();
            if path.is_empty() {
                break;
            }

            let encoding = Select::new()
                .with_prompt("Input encoding")
                .items(&input_labels)
                .default(0)
                .interact()?;
            inputs.push(FileMergeRequest::new(
                path,
                EncodingMode::INPUT_OPTIONS[encoding],
            ));
        }

        // Prompt for output file path with default value
        let output: String = Input::new()
            .with_prompt("Enter path for output file")
            .default(DEFAULT_OUTPUT_FILE.into())
            .interact_text()?;

        let output_labels: Vec<&str> = EncodingMode::OUTPUT_OPTIONS
            .iter()
            .map(|mode| mode.label())
            .collect();
        let output_encoding = Select::new()
            .with_prompt("Output encoding")
            .items(&output_labels)
            .default(2)
            .interact()?;

        let line_labels: Vec<&str> = LineEndingMode::CHOICES
            .iter()
            .map(|choice| choice.label())
            .collect();
        let line_ending = Select::new()
            .with_prompt("Output line ending")
            .items(&line_labels)
            .default(0)
            .interact()?;

        // Extension filter, re-prompted until it parses
        let extensions = loop {
            let list: String = Input::new()
                .with_prompt("Extensions to take from folders (e.g. txt,md; empty for all)")
                .allow_empty(true)
                .interact_text()?;
            match ExtensionFilter::parse(&list) {
                Ok(_) if list.trim().is_empty() => break None,
                Ok(_) => break Some(list.trim().to_string()),
                Err(e) => eprintln!("{}", e),
            }
        };

        // Confirm whether to enable verbose logging
        let verbose = Confirm::new()
            .with_prompt("Enable verbose logging?")
            .default(false)
            .interact()?;

        Ok(Self {
            inputs,
            output: Some(PathBuf::from(output)),
            output_encoding: EncodingMode::OUTPUT_OPTIONS[output_encoding],
            line_ending: LineEndingMode::CHOICES[line_ending],
            extensions,
            verbose,
        })
    }
}

/// Check that the output can be written and does not overwrite an input
pub fn validate_output(output: &Path, inputs: &[PathBuf]) -> Result<(), ConfigError> {
    let absolute_output = normalize_path(output);
    if let Some(input) = inputs.iter().find(|input| **input == absolute_output) {
        return Err(ConfigError::OutputIsInput(input.clone()));
    }

    // Validate output directory exists and is writable
    let parent = match absolute_output.parent() {
        Some(parent) => parent,
        None => return Err(ConfigError::MissingOutput),
    };
    if !parent.is_dir() {
        return Err(ConfigError::OutputDirectoryNotWritable(parent.to_path_buf()));
    }

    // Check if directory is writable by attempting to create a temporary file
    match tempfile::Builder::new()
        .prefix(".textmerger-probe-")
        .tempfile_in(parent)
    {
        Ok(probe) => {
            // Clean up temporary file
            let _ = probe.close();
            Ok(())
        }
        Err(_) => Err(ConfigError::OutputDirectoryNotWritable(parent.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_template_round_trips_through_json() -> MergerResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");

        Config::template().save(&path).await?;
        let loaded = Config::load(&path).await?;
        assert_eq!(loaded, Config::template());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_take_defaults() -> MergerResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "inputs": [ { "path": "a.txt" } ] }"#).await?;

        let config = Config::load(&path).await?;
        assert_eq!(config.inputs[0].requested_encoding, EncodingMode::Auto);
        assert_eq!(config.output_encoding, EncodingMode::Utf8NoBom);
        assert_eq!(config.line_ending, LineEndingMode::Crlf);
        assert!(config.output.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_auto_output_encoding_is_rejected() -> MergerResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "output_encoding": "auto" }"#).await?;

        let result = Config::load(&path).await;
        assert!(matches!(result, Err(MergerError::InvalidConfiguration(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_extension_list_is_rejected() -> MergerResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "extensions": "txt,a/b" }"#).await?;

        let result = Config::load(&path).await;
        assert!(matches!(result, Err(MergerError::InvalidExtensionToken { .. })));
        Ok(())
    }

    #[test]
    fn test_validate_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");

        assert!(validate_output(&output, &[input.clone()]).is_ok());
        assert!(matches!(
            validate_output(&input, &[input.clone()]),
            Err(ConfigError::OutputIsInput(_))
        ));
        assert!(matches!(
            validate_output(&dir.path().join("missing").join("out.txt"), &[]),
            Err(ConfigError::OutputDirectoryNotWritable(_))
        ));
    }

    #[test]
    fn test_output_reaching_an_input_through_dot_dot_is_rejected() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let input = normalize_path(&sub.join("a.txt"));
        let roundabout = sub.join("..").join("sub").join("a.txt");

        assert!(matches!(
            validate_output(&roundabout, &[input]),
            Err(ConfigError::OutputIsInput(_))
        ));
    }
}
