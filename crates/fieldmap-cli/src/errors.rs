use console::style;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// A cadastral file the importer refused
pub fn import_rejected(path: &Path, reason: &str) -> CliError {
    CliError::new("Boundary import failed")
        .with_context(format!("File: {}\nReason: {}", path.display(), reason))
        .with_suggestion("Export the parcel again as GeoJSON (Feature, FeatureCollection or Polygon)")
        .with_suggestion("Check that the exterior ring has at least 3 distinct vertices")
        .with_help("Run: fieldmap import --help")
}

/// A boundary input that is neither cadastral GeoJSON nor a coordinate array
pub fn boundary_unreadable(path: &Path, reason: &str) -> CliError {
    CliError::new("Cannot read field boundary")
        .with_context(format!("File: {}\nReason: {}", path.display(), reason))
        .with_suggestion("Pass a cadastral GeoJSON export")
        .with_suggestion("Or a JSON array of vertices: [[lng, lat], ...] or [{\"lat\": .., \"lng\": ..}, ...]")
}

/// Weather samples that could not be parsed
pub fn weather_unreadable(path: &Path, reason: &str) -> CliError {
    CliError::new("Cannot read weather samples")
        .with_context(format!("File: {}\nReason: {}", path.display(), reason))
        .with_suggestion(
            "Use a JSON array like [{\"date\": \"2024-10-01\", \"tMin\": 18.0, \"tMax\": 31.5, \"precipitationMm\": 4.2}]",
        )
        .with_help("Run: fieldmap gdd --help")
}

/// Invalid configuration value
pub fn invalid_config(reason: &str) -> CliError {
    CliError::new("Invalid configuration")
        .with_context(format!("Reason: {}", reason))
        .with_suggestion("Check fieldmap.toml and the FIELDMAP_* environment variables")
        .with_suggestion("Inspect the resolved values: fieldmap config")
        .with_help("Run: fieldmap --help")
}
