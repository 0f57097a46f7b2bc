//! Logging settings resolved from `QK_LOG`, `QK_LOG_FORMAT` and `RUST_LOG`.
//!
//! `QK_LOG` names a single level for the analysis crates. When it is unset,
//! a `RUST_LOG` value is passed through to the filter as raw directives.
//! Levels given by the caller override both.

/// Where log lines are written and how they look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact text for terminals.
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Verbosity for `qk_core` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Per-replicate bootstrap draws and window scans.
    Trace,
    /// Per-stage summaries.
    Debug,
    #[default]
    Info,
    /// Iteration caps and degenerate bins.
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives, used only when no level was named.
    pub directives: Option<String>,
    /// Prefix human output with timestamps.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            directives: None,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Settings from the process environment, with optional caller overrides.
    pub fn from_env(level: Option<LogLevel>, format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), level, format)
    }

    /// Settings from an arbitrary variable source.
    ///
    /// Unparseable `QK_LOG` or `QK_LOG_FORMAT` values are ignored.
    pub fn from_lookup<F>(lookup: F, level: Option<LogLevel>, format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        match lookup("QK_LOG").map(|v| v.parse::<LogLevel>()) {
            Some(Ok(parsed)) => config.level = parsed,
            _ => {
                config.directives = lookup("RUST_LOG").filter(|d| !d.trim().is_empty());
            }
        }
        if let Some(Ok(parsed)) = lookup("QK_LOG_FORMAT").map(|v| v.parse::<LogFormat>()) {
            config.format = parsed;
        }

        if let Some(level) = level {
            config = config.with_level(level);
        }
        if let Some(format) = format {
            config.format = format;
        }
        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Fix the level, discarding any `RUST_LOG` directives.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self.directives = None;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// `EnvFilter` directive string for these settings.
    pub fn filter_directives(&self) -> String {
        match &self.directives {
            Some(raw) => raw.clone(),
            None => format!("qk_core={}", self.level.as_str()),
        }
    }
}
