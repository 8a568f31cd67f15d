// Import required dependencies
use log::{debug, info, warn}; // For logging
use std::path::PathBuf; // For file path operations

// Import local modules
use crate::{
    cli::{Cli, DetectArgs, GenerateConfigArgs, GuidedSetupArgs, MergeArgs}, // CLI arguments
    collector::{retain_first_occurrence, CollectWarning, ExtensionFilter, FileCollector},
    config::{validate_output, Config, DEFAULT_OUTPUT_FILE}, // Configuration handling
    diagnostics::{self, FileDiagnostic},
    display::{self, StatusDisplay},
    encoding::{EncodingMode, LineEndingMode},
    errors::{ConfigError, MergerResult},
    merge::{FileMergeRequest, MergeEngine, MergeOutcome},
    progress::MergeProgress,
};

/// Everything a merge needs, with command-line flags already applied over the config
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub requests: Vec<FileMergeRequest>, // Expanded, de-duplicated files in merge order
    pub output: PathBuf,
    pub output_encoding: EncodingMode,
    pub line_ending: LineEndingMode,
    pub warnings: Vec<CollectWarning>,
    pub verbose: bool,
}

// Command handler for processing CLI commands
pub struct CommandHandler;

impl CommandHandler {
    // Handle the merge command - collect, merge and report
    pub async fn handle_merge(cli: &Cli, args: MergeArgs) -> MergerResult<()> {
        info!("Starting merge operation");

        let plan = Self::plan_merge(&args, cli.verbose_count() > 0).await?;
        let mut status = StatusDisplay::new();
        status.print_lines(&display::format_warnings(&plan.warnings))?;
        if plan.verbose {
            let listing: Vec<String> = plan
                .requests
                .iter()
                .map(|request| {
                    format!(
                        "  {} [{}]",
                        request.path.display(),
                        request.requested_encoding
                    )
                })
                .collect();
            status.print_lines(&listing)?;
        }

        let progress = MergeProgress::new(plan.requests.len());
        match Self::execute_merge(&plan).await {
            Ok(outcome) => {
                progress.finish(&format!("Wrote {}", plan.output.display()));
                status.print_lines(&display::format_outcome(&outcome))?;
                info!("Merge operation completed");
                Ok(())
            }
            Err(e) => {
                progress.abandon("Merge failed");
                Err(e)
            }
        }
    }

    /// Resolve inputs, output and encodings for a merge without writing anything
    ///
    /// Config inputs come first, then command-line paths. Flags given on the
    /// command line win over config values.
    pub async fn plan_merge(args: &MergeArgs, verbose_flag: bool) -> MergerResult<MergePlan> {
        // Load existing config or fall back to defaults
        let config = match &args.config {
            Some(config_path) => Config::load(config_path).await?,
            None => Config::default(),
        };

        let filter = match &args.extensions {
            Some(list) => ExtensionFilter::parse(list)?,
            None => config.extension_filter()?,
        };
        if let Some(filter) = &filter {
            debug!("Folder extension filter: {}", filter);
        }

        let sources: Vec<FileMergeRequest> = config
            .inputs
            .iter()
            .cloned()
            .chain(
                args.paths
                    .iter()
                    .map(|path| FileMergeRequest::new(path, args.input_encoding)),
            )
            .collect();
        if sources.is_empty() {
            return Err(ConfigError::MissingInputs.into());
        }

        let (requests, warnings) =
            tokio::task::spawn_blocking(move || expand_requests(sources, filter.as_ref()))
                .await?;

        let output = args
            .output
            .clone()
            .or(config.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));
        let output_encoding = args.output_encoding.unwrap_or(config.output_encoding);
        output_encoding.output_codec()?;
        let line_ending = args.line_ending.unwrap_or(config.line_ending);

        let input_paths: Vec<PathBuf> = requests.iter().map(|r| r.path.clone()).collect();
        validate_output(&output, &input_paths)?;

        Ok(MergePlan {
            requests,
            output,
            output_encoding,
            line_ending,
            warnings,
            verbose: verbose_flag || config.verbose,
        })
    }

    /// Run the merge on a blocking worker so the spinner keeps ticking
    pub async fn execute_merge(plan: &MergePlan) -> MergerResult<MergeOutcome> {
        let requests = plan.requests.clone();
        let output = plan.output.clone();
        let output_encoding = plan.output_encoding;
        let line_ending = plan.line_ending;

        tokio::task::spawn_blocking(move || {
            MergeEngine::merge_and_write(&requests, &output, output_encoding, line_ending)
        })
        .await?
    }

    // Handle the detect command - show how each file would be read
    pub async fn handle_detect(args: DetectArgs) -> MergerResult<()> {
        let (warnings, diagnostics) = Self::detect(&args).await?;

        let mut status = StatusDisplay::new();
        status.print_lines(&display::format_warnings(&warnings))?;
        if diagnostics.is_empty() {
            status.print_lines(&["No files found".to_string()])?;
            return Ok(());
        }
        let lines: Vec<String> = diagnostics.iter().map(display::format_diagnostic).collect();
        status.print_lines(&lines)?;
        Ok(())
    }

    pub async fn detect(
        args: &DetectArgs,
    ) -> MergerResult<(Vec<CollectWarning>, Vec<FileDiagnostic>)> {
        let filter = match &args.extensions {
            Some(list) => ExtensionFilter::parse(list)?,
            None => None,
        };
        let sources: Vec<FileMergeRequest> = args
            .paths
            .iter()
            .map(|path| FileMergeRequest::new(path, args.input_encoding))
            .collect();

        let result = tokio::task::spawn_blocking(move || {
            let (requests, warnings) = expand_requests(sources, filter.as_ref());
            let diagnostics = requests
                .iter()
                .map(|request| diagnostics::diagnose(&request.path, request.requested_encoding))
                .collect();
            (warnings, diagnostics)
        })
        .await?;
        Ok(result)
    }

    // Handle the encodings command - print the catalog
    pub async fn handle_encodings() -> MergerResult<()> {
        StatusDisplay::new().print_lines(&display::format_catalog())?;
        Ok(())
    }

    // Handle configuration file generation
    pub async fn handle_generate_config(args: GenerateConfigArgs) -> MergerResult<()> {
        info!("Generating configuration file");

        Config::template().save(&args.output).await?;

        info!("Configuration file generated at: {:?}", args.output);
        Ok(())
    }

    // Handle interactive setup process
    pub async fn handle_guided_setup(args: GuidedSetupArgs) -> MergerResult<()> {
        info!("Starting guided setup");

        // Run interactive configuration
        let config = Config::guided_setup().await?;
        if config.inputs.is_empty() {
            warn!("No inputs entered; add paths on the command line when merging");
        }
        config.save(&args.output).await?;

        info!("Configuration saved to: {:?}", args.output);
        Ok(())
    }
}

/// Expand every source path, giving each found file its source's encoding,
/// then drop repeats so each file is merged once at its first position
fn expand_requests(
    sources: Vec<FileMergeRequest>,
    filter: Option<&ExtensionFilter>,
) -> (Vec<FileMergeRequest>, Vec<CollectWarning>) {
    let mut requests = Vec::new();
    let mut warnings = Vec::new();

    for source in sources {
        let collected = FileCollector::expand([&source.path], filter);
        requests.extend(
            collected
                .files
                .into_iter()
                .map(|file| FileMergeRequest::new(file, source.requested_encoding)),
        );
        warnings.extend(collected.warnings);
    }

    let before = requests.len();
    let requests = retain_first_occurrence(requests, |request| request.path.as_path());
    if requests.len() < before {
        debug!("Dropped {} repeated files", before - requests.len());
    }
    (requests, warnings)
}
