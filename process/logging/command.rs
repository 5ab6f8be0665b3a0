use std::{
    ffi::OsStr,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Result, Write},
    process::{Command, ExitStatus, Stdio},
    thread,
    time::Duration,
};

use indicatif::ProgressBar;
use log::{trace, warn};

use super::{color_str, gen_random_ansi_color, log_header, shorten_name, Logger};

mod private {
    pub trait Private {}
}

impl private::Private for Command {}

/// Renders a command the way it would be typed in a shell.
///
/// Only used for logs and assertions, the command itself
/// is never passed through a shell.
pub trait CommandString: private::Private {
    fn to_command_string(&self) -> String;
}

impl CommandString for Command {
    fn to_command_string(&self) -> String {
        let envs = self.get_envs().filter_map(|(key, value)| {
            value.map(|value| format!("{}={}", key.to_string_lossy(), quote(value)))
        });

        envs.chain(std::iter::once(quote(self.get_program())))
            .chain(self.get_args().map(quote))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(value: &OsStr) -> String {
    let value = value.to_string_lossy();

    if value.is_empty() || value.contains(char::is_whitespace) {
        format!("'{value}'")
    } else {
        value.into_owned()
    }
}

pub trait CommandLogging: private::Private {
    /// Prints each line of stdout/stderr prefixed with the image
    /// while also writing the output to a log file for that image.
    ///
    /// # Errors
    /// Will error if there was an issue executing the process.
    fn build_status<T, U>(self, image_ref: T, message: U) -> Result<ExitStatus>
    where
        T: AsRef<str>,
        U: AsRef<str>;

    /// Prints each line of stdout/stderr prefixed with a header.
    ///
    /// # Errors
    /// Will error if there was an issue executing the process.
    fn message_status<S, D>(self, header: S, message: D) -> Result<ExitStatus>
    where
        S: AsRef<str>,
        D: AsRef<str>;
}

impl CommandLogging for Command {
    fn build_status<T, U>(self, image_ref: T, message: U) -> Result<ExitStatus>
    where
        T: AsRef<str>,
        U: AsRef<str>,
    {
        let image_ref = image_ref.as_ref();
        let ansi_color = gen_random_ansi_color();
        let log_path = Logger::out_dir().join(format!(
            "{}.log",
            image_ref.replace(['/', ':', '.'], "_")
        ));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .inspect_err(|e| warn!("Unable to open build log {}: {e}", log_path.display()))
            .ok();

        stream_output(
            self,
            &color_str(shorten_name(image_ref), ansi_color),
            &format!("{} {}", message.as_ref(), color_str(image_ref, ansi_color)),
            log_file,
        )
    }

    fn message_status<S, D>(self, header: S, message: D) -> Result<ExitStatus>
    where
        S: AsRef<str>,
        D: AsRef<str>,
    {
        stream_output(
            self,
            &color_str(header, gen_random_ansi_color()),
            message.as_ref(),
            None::<File>,
        )
    }
}

/// Runs the command with stdout and stderr merged into one pipe,
/// printing each line above a spinner as it arrives.
fn stream_output<W>(
    mut command: Command,
    header: &str,
    message: &str,
    mut log_file: Option<W>,
) -> Result<ExitStatus>
where
    W: Write + Send + 'static,
{
    trace!("{}", command.to_command_string());

    let (reader, writer) = os_pipe::pipe()?;
    command
        .stdout(writer.try_clone()?)
        .stderr(writer)
        .stdin(Stdio::null());

    let progress = Logger::multi_progress()
        .add(ProgressBar::new_spinner().with_message(message.to_owned()));
    progress.enable_steady_tick(Duration::from_millis(100));

    let mut child = command.spawn()?;

    // The writer ends held by `command` have to be closed
    // or the reader never sees EOF.
    drop(command);

    let prefix = log_header(header);
    let printer = thread::spawn(move || {
        let mp = Logger::multi_progress();

        for line in BufReader::new(reader).lines().map_while(Result::ok) {
            let text = format!("{prefix} {line}");
            if mp.is_hidden() || mp.println(&text).is_err() {
                eprintln!("{text}");
            }
            if let Some(file) = log_file.as_mut() {
                if let Err(e) = writeln!(file, "{line}") {
                    trace!("Failed to write to build log: {e}");
                }
            }
        }
    });

    let status = child.wait()?;
    if printer.join().is_err() {
        warn!("Output printer thread panicked");
    }

    progress.finish();
    Logger::multi_progress().remove(&progress);

    Ok(status)
}

#[cfg(test)]
mod test {
    use comlexr::cmd;

    use super::CommandString;

    #[test]
    fn renders_envs_first() {
        let mut command = cmd!("docker", "build", ".");
        command.env("DOCKER_BUILDKIT", "1");

        assert_eq!(command.to_command_string(), "DOCKER_BUILDKIT=1 docker build .");
    }

    #[test]
    fn quotes_whitespace() {
        let command = cmd!("docker", "build", "--label", "maintainer=Mr Smith", "");

        assert_eq!(
            command.to_command_string(),
            "docker build --label 'maintainer=Mr Smith' ''"
        );
    }
}
