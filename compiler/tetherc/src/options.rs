//! Build options parsed from command line arguments.

use std::path::{Path, PathBuf};

use tether_diagnostic::emitter::ColorMode;
use tether_diagnostic::queue::DiagnosticConfig;
use tether_graph::ValidationOptions;

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable, optionally colored.
    #[default]
    Terminal,
    /// One JSON array on stderr, for build tooling.
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "terminal" | "human" => Some(OutputFormat::Terminal),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Options for `tether build` and `tether graph`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fact feed to read (first positional argument)
    pub input: PathBuf,
    /// Generated resolver path (-o, --output=)
    pub output: Option<PathBuf>,
    /// Incremental cache path (--cache=)
    pub cache: Option<PathBuf>,
    /// Skip reading and writing the cache (--no-cache)
    pub no_cache: bool,
    /// Primitive parameter types injected as null (--allow-primitive=, repeatable)
    pub allowed_primitives: Vec<String>,
    /// Rust path the unit modules live under (--crate-root=)
    pub crate_root: String,
    /// Diagnostic format (--format=)
    pub format: OutputFormat,
    /// Terminal colors (--color=)
    pub color: ColorMode,
    /// Stop collecting errors after this many, 0 for no limit (--error-limit=)
    pub error_limit: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            cache: None,
            no_cache: false,
            allowed_primitives: Vec::new(),
            crate_root: "crate".to_string(),
            format: OutputFormat::Terminal,
            color: ColorMode::Auto,
            error_limit: 0,
        }
    }
}

/// Directory name of the default cache, next to the fact feed.
pub const CACHE_DIR: &str = ".tether";
/// File name of the default cache.
pub const CACHE_FILE: &str = "cache.bin";
/// File name of the default artifact.
pub const DEFAULT_OUTPUT: &str = "container.rs";

impl BuildOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    fn input_dir(&self) -> &Path {
        self.input.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Where the artifact is written: `-o`, or `container.rs` beside the feed.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input_dir().join(DEFAULT_OUTPUT))
    }

    /// Where the incremental log lives, `None` with `--no-cache`.
    pub fn cache_path(&self) -> Option<PathBuf> {
        if self.no_cache {
            return None;
        }
        Some(
            self.cache
                .clone()
                .unwrap_or_else(|| self.input_dir().join(CACHE_DIR).join(CACHE_FILE)),
        )
    }

    pub fn diagnostic_config(&self) -> DiagnosticConfig {
        DiagnosticConfig {
            error_limit: self.error_limit,
            ..DiagnosticConfig::default()
        }
    }

    pub fn validation(&self) -> ValidationOptions {
        let mut validation = ValidationOptions::default();
        for primitive in &self.allowed_primitives {
            validation.allow_primitive(primitive.as_str());
        }
        validation
    }
}

/// Parse build arguments (everything after the subcommand).
///
/// The first argument not starting with `-` is the fact feed. Unknown values
/// for known flags print a warning and keep the default.
pub fn parse_build_options(args: &[String]) -> BuildOptions {
    let mut options = BuildOptions::default();
    let mut input = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if (arg == "-o" || arg == "--output") && i + 1 < args.len() {
            options.output = Some(PathBuf::from(&args[i + 1]));
            i += 2;
            continue;
        }

        if let Some(output) = arg.strip_prefix("--output=") {
            options.output = Some(PathBuf::from(output));
        } else if let Some(cache) = arg.strip_prefix("--cache=") {
            options.cache = Some(PathBuf::from(cache));
        } else if arg == "--no-cache" {
            options.no_cache = true;
        } else if let Some(name) = arg.strip_prefix("--allow-primitive=") {
            options
                .allowed_primitives
                .extend(name.split(',').filter(|n| !n.is_empty()).map(str::to_string));
        } else if let Some(root) = arg.strip_prefix("--crate-root=") {
            options.crate_root = root.to_string();
        } else if let Some(format) = arg.strip_prefix("--format=") {
            if let Some(f) = OutputFormat::from_str(format) {
                options.format = f;
            } else {
                eprintln!("warning: unknown format '{format}', options: terminal, json");
            }
        } else if let Some(color) = arg.strip_prefix("--color=") {
            if let Some(mode) = ColorMode::parse(color) {
                options.color = mode;
            } else {
                eprintln!("warning: unknown color mode '{color}', using auto");
            }
        } else if let Some(limit) = arg.strip_prefix("--error-limit=") {
            if let Ok(n) = limit.parse() {
                options.error_limit = n;
            } else {
                eprintln!("warning: invalid error limit '{limit}', reporting every error");
            }
        } else if !arg.starts_with('-') && input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            eprintln!("warning: ignoring unknown option '{arg}'");
        }
        i += 1;
    }

    if let Some(input) = input {
        options.input = input;
    }
    options
}
