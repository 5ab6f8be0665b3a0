pub mod constants;
pub mod container;
pub mod credentials;
mod macros;
pub mod secret;
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

use std::{io::Write, path::Path};

use chrono::{DateTime, TimeZone};
use comlexr::cmd;
use log::trace;
use miette::{miette, Context, IntoDiagnostic, Result};

/// Checks for the existance of a given command.
///
/// # Errors
/// Will error if the command doesn't exist.
pub fn check_command_exists(command: &str) -> Result<()> {
    trace!("check_command_exists({command})");

    trace!("which {command}");
    if cmd!("which", command)
        .output()
        .into_diagnostic()?
        .status
        .success()
    {
        trace!("Command {command} does exist");
        Ok(())
    } else {
        Err(miette!(
            help = format!("Install `{command}` and make sure it is on your PATH"),
            "Command {command} doesn't exist and is required to continue"
        ))
    }
}

/// Retrieves an environment variable, erroring with the
/// name of the variable when it isn't set or isn't unicode.
///
/// # Errors
/// Will error if the env variable doesn't exist.
pub fn get_env_var<S>(key: S) -> Result<String>
where
    S: AsRef<str>,
{
    fn inner(key: &str) -> Result<String> {
        std::env::var(key).map_err(|e| miette!("Failed to retrieve env var '{key}': {e}"))
    }
    inner(key.as_ref())
}

/// Returns `true` if the env var exists and isn't empty.
#[must_use]
pub fn has_env_var<S>(key: S) -> bool
where
    S: AsRef<str>,
{
    get_env_var(key).is_ok_and(|v| !v.is_empty())
}

/// Parses a comma-delimited input into its trimmed entries.
///
/// Empty entries are dropped. An empty input produces `None`
/// so that callers can fall back to their defaults.
///
/// # Examples
/// ```
/// use docker_build_push_utils::parse_list;
///
/// assert_eq!(
///     parse_list("tag1, tag2,tag3"),
///     Some(vec!["tag1".to_string(), "tag2".to_string(), "tag3".to_string()])
/// );
/// assert_eq!(parse_list(""), None);
/// ```
#[must_use]
pub fn parse_list<S>(input: S) -> Option<Vec<String>>
where
    S: AsRef<str>,
{
    let list = input
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();

    (!list.is_empty()).then_some(list)
}

/// Treats an input that is empty or only whitespace as not given.
///
/// CI systems set inputs without a value to an empty string.
#[must_use]
pub fn non_empty(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|value| !value.is_empty())
}

/// Formats a time as a human readable tag suffix,
/// e.g. `2024-03-09.141503`.
#[must_use]
pub fn format_tag_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%Y-%m-%d.%H%M%S").to_string()
}

/// Formats a time as the number of milliseconds since the epoch.
#[must_use]
pub fn format_numeric_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
{
    time.timestamp_millis().to_string()
}

/// Appends a line to a file, creating it if needed.
///
/// # Errors
/// Will error if it fails to open or write to the file.
pub fn append_to_file<P>(file_path: P, content: &str) -> Result<()>
where
    P: AsRef<Path>,
{
    fn inner(file_path: &Path, content: &str) -> Result<()> {
        trace!("append_to_file({}, {content})", file_path.display());

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(file_path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to open {}", file_path.display()))?;

        writeln!(file, "{content}").into_diagnostic()
    }
    inner(file_path.as_ref(), content)
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use crate::string_vec;

    use super::*;

    #[rstest]
    #[case::spaces("tag1, tag2, tag3", Some(string_vec!["tag1", "tag2", "tag3"]))]
    #[case::inconsistent_spaces("tag1,tag2, tag3", Some(string_vec!["tag1", "tag2", "tag3"]))]
    #[case::no_spaces("tag1,tag2,tag3", Some(string_vec!["tag1", "tag2", "tag3"]))]
    #[case::single("element", Some(string_vec!["element"]))]
    #[case::trailing_comma("a,b,", Some(string_vec!["a", "b"]))]
    #[case::empty("", None)]
    #[case::only_commas(" , ,", None)]
    fn parse_list_inputs(#[case] input: &str, #[case] expected: Option<Vec<String>>) {
        assert_eq!(parse_list(input), expected);
    }

    #[rstest]
    #[case::missing(None, None)]
    #[case::empty(Some(""), None)]
    #[case::blank(Some("  "), None)]
    #[case::padded(Some(" builder "), Some("builder"))]
    fn non_empty_inputs(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(non_empty(input), expected);
    }

    #[test]
    fn tag_timestamp_format() {
        let time = Utc.with_ymd_and_hms(2020, 1, 14, 9, 5, 3).unwrap();

        assert_eq!(format_tag_timestamp(&time), "2020-01-14.090503");
    }

    #[test]
    fn numeric_timestamp_format() {
        let time = Utc.with_ymd_and_hms(2020, 1, 14, 0, 0, 0).unwrap();

        assert_eq!(format_numeric_timestamp(&time), "1578960000000");
    }

    #[test]
    fn append_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");

        append_to_file(&path, "a=1").unwrap();
        append_to_file(&path, "b=2").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a=1\nb=2\n");
    }
}
