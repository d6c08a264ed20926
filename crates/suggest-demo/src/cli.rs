#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Every option can also be
//! set through a `SUGGEST_DEMO_*` environment variable; flags win over the
//! environment, the environment wins over the per-mode defaults.

use std::env;
use std::path::PathBuf;
use std::process;

use suggest_widgets::{FieldConfig, Rgba, Style, Theme};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
suggest-demo: autocomplete search field in the terminal

USAGE:
    suggest-demo [OPTIONS]

OPTIONS:
    --mode=MODE            'local' (default): filter a fixed character list
                           'remote': look up acronyms after you stop typing
    --max-results=N        Cap the number of rows (0 = no limit)
    --max-height=N         Cap the panel height in rows (0 = no limit)
    --start-visible[=BOOL] Show every candidate as soon as the field is focused
    --latency-ms=N         Simulated lookup latency in remote mode (default: 300)
    --no-mouse             Disable mouse event capture
    --help, -h             Show this help message
    --version, -V          Show version

KEYBINDINGS:
    Up / Down              Move the highlighted row
    Enter                  Commit the highlighted row
    Tab                    Accept the first row
    Esc                    Hide the suggestions
    Ctrl+C / Ctrl+Q        Quit

ENVIRONMENT VARIABLES:
    SUGGEST_DEMO_MODE            Override --mode
    SUGGEST_DEMO_MAX_RESULTS     Override --max-results
    SUGGEST_DEMO_MAX_HEIGHT      Override --max-height
    SUGGEST_DEMO_START_VISIBLE   Override --start-visible (1|0|true|false)
    SUGGEST_DEMO_LATENCY_MS      Override --latency-ms
    SUGGEST_DEMO_MOUSE           Set to 0 to disable mouse capture
    SUGGEST_DEMO_LOG             Write logs to this file (filtered by RUST_LOG)";

/// Where candidates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// A fixed list, filtered as you type.
    #[default]
    Local,
    /// A simulated background lookup, fired when typing stops.
    Remote,
}

impl Mode {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Candidate source.
    pub mode: Mode,
    /// Row cap; `None` uses the mode default.
    pub max_results: Option<usize>,
    /// Panel height cap; `None` uses the mode default.
    pub max_height: Option<u16>,
    /// Show on focus; `None` uses the mode default.
    pub start_visible: Option<bool>,
    /// Simulated remote latency in milliseconds.
    pub latency_ms: u64,
    /// Whether mouse events are enabled.
    pub mouse: bool,
    /// Log file, if any.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            mode: Mode::Local,
            max_results: None,
            max_height: None,
            start_visible: None,
            latency_ms: 300,
            mouse: true,
            log_file: None,
        }
    }
}

/// Outcome of parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Run with these options.
    Run(Opts),
    /// `--help` was given.
    Help,
    /// `--version` was given.
    Version,
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a bad argument.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("suggest-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `var` as the environment.
    pub fn parse_from<F>(args: &[String], var: F) -> Result<Parsed, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("SUGGEST_DEMO_MODE")
            && let Some(mode) = Mode::parse(&val)
        {
            opts.mode = mode;
        }
        if let Some(val) = var("SUGGEST_DEMO_MAX_RESULTS")
            && let Ok(n) = val.parse()
        {
            opts.max_results = Some(n);
        }
        if let Some(val) = var("SUGGEST_DEMO_MAX_HEIGHT")
            && let Ok(n) = val.parse()
        {
            opts.max_height = Some(n);
        }
        if let Some(val) = var("SUGGEST_DEMO_START_VISIBLE")
            && let Some(b) = parse_bool(&val)
        {
            opts.start_visible = Some(b);
        }
        if let Some(val) = var("SUGGEST_DEMO_LATENCY_MS")
            && let Ok(n) = val.parse()
        {
            opts.latency_ms = n;
        }
        if let Some(val) = var("SUGGEST_DEMO_MOUSE")
            && let Some(b) = parse_bool(&val)
        {
            opts.mouse = b;
        }
        if let Some(val) = var("SUGGEST_DEMO_LOG")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--no-mouse" => opts.mouse = false,
                "--start-visible" => opts.start_visible = Some(true),
                other => {
                    if let Some(val) = other.strip_prefix("--mode=") {
                        opts.mode =
                            Mode::parse(val).ok_or_else(|| format!("Invalid --mode value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--max-results=") {
                        opts.max_results = Some(parse_num(val, "--max-results")?);
                    } else if let Some(val) = other.strip_prefix("--max-height=") {
                        opts.max_height = Some(parse_num(val, "--max-height")?);
                    } else if let Some(val) = other.strip_prefix("--start-visible=") {
                        opts.start_visible = Some(
                            parse_bool(val)
                                .ok_or_else(|| format!("Invalid --start-visible value: {val}"))?,
                        );
                    } else if let Some(val) = other.strip_prefix("--latency-ms=") {
                        opts.latency_ms = parse_num(val, "--latency-ms")?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }

    /// Field configuration: explicit options over the mode defaults.
    ///
    /// Local mode starts visible with at most 6 rows; remote mode caps at 5
    /// rows in a 10-row panel.
    pub fn field_config(&self) -> FieldConfig {
        let (max_results, max_height, start_visible) = match self.mode {
            Mode::Local => (6, 0, true),
            Mode::Remote => (5, 10, false),
        };
        FieldConfig::default()
            .with_max_results(self.max_results.unwrap_or(max_results))
            .with_max_list_height(self.max_height.unwrap_or(max_height))
            .with_start_visible(self.start_visible.unwrap_or(start_visible))
    }

    /// Panel theme for the mode.
    pub fn theme(&self) -> Theme {
        match self.mode {
            Mode::Local => Theme::light(),
            Mode::Remote => {
                let mut theme = Theme::light();
                theme.background = Rgba::rgba(230, 230, 230, 77);
                theme.border = Rgba::rgb(230, 230, 230);
                theme.separator = Rgba::rgba(230, 230, 230, 128);
                theme
            }
        }
    }

    /// Highlight style for the mode.
    pub fn highlight(&self) -> Style {
        match self.mode {
            Mode::Local => Style::default_highlight(),
            Mode::Remote => Style::new().bg(Rgba::YELLOW).fg(Rgba::BLACK).bold(),
        }
    }
}

fn parse_num<T: std::str::FromStr>(val: &str, flag: &str) -> Result<T, String> {
    val.parse().map_err(|_| format!("Invalid {flag} value: {val}"))
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
