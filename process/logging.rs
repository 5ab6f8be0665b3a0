use std::{
    io::Write as IoWrite,
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex},
};

use chrono::Local;
use colored::{control::ShouldColorize, ColoredString, Colorize};
use docker_build_push_utils::{
    constants::{DOCKER_BUILD_PUSH, LOG_DIR},
    get_env_var,
};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter, Record};
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{
                roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
            },
            RollingFileAppender,
        },
    },
    config::{Appender, Root},
    encode::{pattern::PatternEncoder, Encode, Write},
    Config, Logger as L4RSLogger,
};
use nu_ansi_term::Color;
use rand::Rng;

pub use command::{CommandLogging, CommandString};

mod command;

static MULTI_PROGRESS: LazyLock<MultiProgress> = LazyLock::new(MultiProgress::new);
static OUT_DIR: LazyLock<Mutex<PathBuf>> = LazyLock::new(|| Mutex::new(PathBuf::new()));

/// Sets up the `log` facade with a console appender on stderr
/// and a rolling log file.
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    log_dir: Option<PathBuf>,
}

impl Logger {
    const TRIGGER_FILE_SIZE: u64 = 10 * 1024;
    const LOG_FILE_COUNT: u32 = 4;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn filter_level(&mut self, filter_level: LevelFilter) -> &mut Self {
        self.level = filter_level;
        self
    }

    pub fn log_out_dir<P>(&mut self, path: Option<P>) -> &mut Self
    where
        P: AsRef<Path>,
    {
        self.log_dir = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Initializes logging for the application.
    ///
    /// # Panics
    /// Will panic if logging is unable to be initialized.
    pub fn init(&self) {
        let log_dir = self.log_dir.clone().unwrap_or_else(|| {
            Path::new(&get_env_var("HOME").expect("$HOME should be defined")).join(LOG_DIR)
        });
        OUT_DIR
            .lock()
            .expect("Should lock OUT_DIR")
            .clone_from(&log_dir);

        let stderr = ConsoleAppender::builder()
            .encoder(Box::new(HeaderEncoder))
            .target(Target::Stderr)
            .tty_only(true)
            .build();

        let mut config =
            Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
        let mut root = Root::builder().appender("stderr");

        match Self::file_appender(&log_dir) {
            Ok(file) => {
                config = config.appender(Appender::builder().build("file", Box::new(file)));
                root = root.appender("file");
            }
            Err(e) => eprintln!("Cannot create logs directory {}:\n{e}", log_dir.display()),
        }

        let config = config
            .build(root.build(self.level))
            .expect("Logger config should build");

        LogWrapper::new(MULTI_PROGRESS.clone(), L4RSLogger::new(config))
            .try_init()
            .expect("LogWrapper should initialize");
    }

    fn file_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
        let roller = FixedWindowRoller::builder().build(
            &format!("{}/{DOCKER_BUILD_PUSH}.{{}}.log", log_dir.display()),
            Self::LOG_FILE_COUNT,
        )?;

        Ok(RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} - {l} - {m}{n}")))
            .build(
                log_dir.join(format!("{DOCKER_BUILD_PUSH}.log")),
                Box::new(CompoundPolicy::new(
                    Box::new(SizeTrigger::new(Self::TRIGGER_FILE_SIZE)),
                    Box::new(roller),
                )),
            )?)
    }

    pub fn multi_progress() -> MultiProgress {
        MULTI_PROGRESS.clone()
    }

    /// The directory that per-image build logs are written to.
    fn out_dir() -> PathBuf {
        OUT_DIR
            .lock()
            .map(|dir| dir.clone())
            .unwrap_or_default()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            log_dir: None,
        }
    }
}

trait ColoredLevel {
    fn colored(&self) -> ColoredString;
}

impl ColoredLevel for Level {
    fn colored(&self) -> ColoredString {
        let level = format!("{:5}", self.as_str());
        let level = level.as_str();
        match self {
            Self::Error => level.red(),
            Self::Warn => level.yellow(),
            Self::Info => level.green(),
            Self::Debug => level.blue(),
            Self::Trace => level.cyan(),
        }
    }
}

/// Prefixes console records with their level, adding
/// the module and line when tracing.
#[derive(Debug)]
struct HeaderEncoder;

impl Encode for HeaderEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        let label = match log::max_level() {
            LevelFilter::Off => return Ok(()),
            LevelFilter::Trace => format!(
                "{level} {module}:{line}",
                level = record.level().colored(),
                module = record.module_path().unwrap_or_default().bright_yellow(),
                line = record
                    .line()
                    .map(|l| l.to_string())
                    .unwrap_or_default()
                    .as_str()
                    .bright_green(),
            ),
            _ => record.level().colored().to_string(),
        };

        Ok(writeln!(w, "{} {}", log_header(label), record.args())?)
    }
}

/// Keeps the prefix of log lines and command output the same.
fn log_header<T>(text: T) -> String
where
    T: AsRef<str>,
{
    let text = text.as_ref();
    let sep = "=>".bold();

    match log::max_level() {
        LevelFilter::Off => String::new(),
        LevelFilter::Debug | LevelFilter::Trace => format!(
            "[{time} {text}] {sep}",
            time = Local::now().format("%H:%M:%S"),
        ),
        _ => format!("{text} {sep}"),
    }
}

/// Shortens every path segment of an image before its name
/// to its initials so the header fits in the terminal.
///
/// # Examples
/// `ghcr.io/owner/image:latest` -> `g.i/o/image:latest`
fn shorten_name<T>(text: T) -> String
where
    T: AsRef<str>,
{
    let text = text.as_ref();
    let (path, tag) = match text.rsplit_once(':') {
        Some((path, tag)) if !tag.contains('/') => (path, Some(tag)),
        _ => (text, None),
    };

    let mut segments = path.rsplit('/');
    let name = segments.next().unwrap_or_default();
    let mut shortened = segments
        .map(|segment| {
            segment
                .split('.')
                .filter_map(|part| part.chars().next())
                .map(String::from)
                .collect::<Vec<_>>()
                .join(".")
        })
        .collect::<Vec<_>>();
    shortened.reverse();
    shortened.push(name.to_owned());

    let joined = shortened.join("/");
    match tag {
        Some(tag) => format!("{joined}:{tag}"),
        None => joined,
    }
}

/// Picks a color from the 256 color range that is
/// readable on both dark and light terminals.
#[must_use]
pub fn gen_random_ansi_color() -> u8 {
    const LOW_END: u8 = 21;
    const HIGH_END: u8 = 230;

    rand::rng().random_range(LOW_END..=HIGH_END)
}

pub fn color_str<T>(text: T, ansi_color: u8) -> String
where
    T: AsRef<str>,
{
    if ShouldColorize::from_env().should_colorize() {
        Color::Fixed(ansi_color).paint(text.as_ref()).to_string()
    } else {
        text.as_ref().to_owned()
    }
}
