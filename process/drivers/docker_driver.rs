use std::{
    fmt,
    io::{Read, Write},
    path::Path,
    process::{Command, Stdio},
};

use comlexr::cmd;
use docker_build_push_utils::{
    check_command_exists,
    constants::{BUILD_OUTPUT_BUFFER_MAX, DOCKER_BUILDKIT, ECR_USERNAME},
    credentials::Credentials,
    non_empty,
    secret::SecretValue,
};
use log::{debug, info, trace};
use miette::{bail, miette, Context, IntoDiagnostic, Result};

use crate::logging::{CommandLogging, CommandString};

use super::{
    error::BuildError,
    opts::{BuildOpts, BuildTagPushOpts, LoginOpts, PushOpts},
    registry::RegistryType,
    BuildDriver,
};

/// The commands needed to login to a registry.
pub enum LoginCommand<'scope> {
    /// `docker login` reading the password from stdin.
    Standard {
        login: Command,
        password: &'scope SecretValue,
    },

    /// The stdout of `password` is written to the stdin of `login`.
    Ecr { password: Command, login: Command },
}

impl fmt::Display for LoginCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard { login, .. } => write!(f, "{}", login.to_command_string()),
            Self::Ecr { password, login } => write!(
                f,
                "{} | {}",
                password.to_command_string(),
                login.to_command_string()
            ),
        }
    }
}

#[derive(Debug)]
pub struct DockerDriver;

impl DockerDriver {
    /// Assembles the `docker build` for the options.
    ///
    /// # Errors
    /// Will error if the dockerfile doesn't exist.
    pub fn build_command(opts: &BuildOpts) -> Result<Command> {
        check_dockerfile(&opts.dockerfile)?;
        Ok(Self::assemble_build(opts))
    }

    fn assemble_build(opts: &BuildOpts) -> Command {
        let image = opts.image;

        let mut command = cmd!(
            "docker",
            if opts.multi_platform => "buildx",
            "build",
            "-f",
            opts.dockerfile.as_ref(),
            for opts.tags.iter().flat_map(|tag| [String::from("-t"), image.with_tag(tag)]),
            for opts.build_args.iter().flat_map(|arg| ["--build-arg", arg.as_str()]),
            for opts.labels.iter().flat_map(|label| ["--label", label.as_str()]),
            if let Some(target) = non_empty(opts.target.as_deref()) => ["--target", target],
            if let Some(platform) = non_empty(opts.platform.as_deref()) => ["--platform", platform],
            if opts.multi_platform && !opts.skip_push => "--push",
            for opts.ssh.iter().flat_map(|ssh| ["--ssh", ssh.as_str()]),
            opts.build_dir.as_ref(),
        );

        if opts.enable_buildkit {
            command.env(DOCKER_BUILDKIT, "1");
        }
        command
    }

    /// Assembles the login for the registry of the credentials.
    ///
    /// ECR registries get their password from the AWS CLI.
    ///
    /// # Errors
    /// Will error if the registry isn't ECR and the username
    /// or password is missing, or if the ECR region can't be parsed.
    pub fn login_command(credentials: &Credentials) -> Result<LoginCommand<'_>> {
        let registry = credentials.registry.as_str();

        Ok(match RegistryType::detect(registry)? {
            RegistryType::Ecr { region } => LoginCommand::Ecr {
                password: cmd!("aws", "ecr", "get-login-password", "--region", region),
                login: cmd!(
                    "docker",
                    "login",
                    "--username",
                    ECR_USERNAME,
                    "--password-stdin",
                    registry,
                ),
            },
            RegistryType::Github | RegistryType::Standard => {
                let (username, password) = credentials
                    .user_pass()
                    .ok_or_else(|| BuildError::CredentialsRequired(registry.into()))?;

                LoginCommand::Standard {
                    login: cmd!(
                        "docker",
                        "login",
                        "-u",
                        username,
                        "--password-stdin",
                        registry
                    ),
                    password,
                }
            }
        })
    }

    #[must_use]
    pub fn push_command(opts: &PushOpts) -> Command {
        cmd!("docker", "push", opts.image.with_tag(opts.tag))
    }

    #[must_use]
    pub fn buildx_create_command() -> Command {
        cmd!("docker", "buildx", "create", "--use")
    }
}

impl BuildDriver for DockerDriver {
    fn build(opts: &BuildOpts) -> Result<()> {
        trace!("DockerDriver::build({opts:#?})");

        let command = Self::build_command(opts)?;
        let image = opts
            .tags
            .primary()
            .map_or_else(|| opts.image.to_string(), |tag| opts.image.with_tag(tag));

        debug!("{}", command.to_command_string());
        let status = command
            .build_status(&image, "Building Image")
            .into_diagnostic()?;

        if status.success() {
            info!("Successfully built {image}");
        } else {
            bail!("Failed to build {image}");
        }
        Ok(())
    }

    fn push(opts: &PushOpts) -> Result<()> {
        trace!("DockerDriver::push({opts:#?})");

        let image = opts.image.with_tag(opts.tag);
        let command = Self::push_command(opts);

        debug!("{}", command.to_command_string());
        let status = command
            .build_status(&image, "Pushing Image")
            .into_diagnostic()?;

        if status.success() {
            info!("Successfully pushed {image}!");
        } else {
            bail!("Failed to push image {image}");
        }
        Ok(())
    }

    fn login(opts: &LoginOpts) -> Result<()> {
        trace!("DockerDriver::login({opts:#?})");

        let registry = opts.credentials.registry.as_str();
        let login = Self::login_command(opts.credentials)?;
        debug!("{login}");

        match login {
            LoginCommand::Standard { login, password } => {
                write_password(login, password)?;
            }
            LoginCommand::Ecr { password, login } => {
                check_command_exists("aws")?;
                let password = SecretValue::from(captured_stdout(password)?.trim());
                write_password(login, &password)?;
            }
        }

        info!("Logged into {registry}");
        Ok(())
    }

    fn setup_multi_platform() -> Result<()> {
        trace!("DockerDriver::setup_multi_platform()");

        let command = Self::buildx_create_command();
        let header = command.to_command_string();
        let status = command
            .message_status(header, "Setting up buildx builder")
            .into_diagnostic()?;

        if !status.success() {
            bail!("Failed to create a buildx builder");
        }
        Ok(())
    }

    fn preflight(opts: &BuildTagPushOpts) -> Result<()> {
        trace!("DockerDriver::preflight({opts:#?})");

        check_command_exists("docker")?;
        check_dockerfile(&opts.build.dockerfile)?;

        if opts.build.tags.is_empty() {
            bail!("No tags to build {}", opts.build.image);
        }
        Ok(())
    }
}

fn check_dockerfile(dockerfile: &Path) -> Result<()> {
    if dockerfile.is_file() {
        Ok(())
    } else {
        Err(BuildError::DockerfileNotFound(dockerfile.to_path_buf()).into())
    }
}

/// Runs the command and returns its stdout,
/// refusing output larger than the buffer limit.
fn captured_stdout(mut command: Command) -> Result<String> {
    let command_string = command.to_command_string();
    trace!("{command_string}");

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .into_diagnostic()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| miette!("Unable to open pipe to stdout"))?;

    let output = match read_limited(stdout, &command_string, BUILD_OUTPUT_BUFFER_MAX) {
        Ok(output) => output,
        Err(e) => {
            if let Err(stop) = child.kill().and_then(|()| child.wait()) {
                debug!("Failed to stop `{command_string}`: {stop}");
            }
            return Err(e);
        }
    };

    if !child.wait().into_diagnostic()?.success() {
        bail!("Failed to run `{command_string}`");
    }

    String::from_utf8(output)
        .into_diagnostic()
        .wrap_err_with(|| format!("Output of `{command_string}` isn't valid UTF-8"))
}

/// Reads at most `max` bytes, erroring instead of
/// buffering anything past the limit.
fn read_limited<R>(reader: R, command: &str, max: usize) -> Result<Vec<u8>>
where
    R: Read,
{
    let mut output = Vec::new();
    reader
        .take(max as u64 + 1)
        .read_to_end(&mut output)
        .into_diagnostic()?;

    if output.len() > max {
        return Err(BuildError::OutputTooLarge {
            command: command.to_owned(),
            max,
        }
        .into());
    }
    Ok(output)
}

fn write_password(mut command: Command, password: &SecretValue) -> Result<()> {
    let command_string = command.to_command_string();
    trace!("{command_string}");

    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().into_diagnostic()?;

    write!(
        child
            .stdin
            .as_mut()
            .ok_or_else(|| miette!("Unable to open pipe to stdin"))?,
        "{}",
        password.value()
    )
    .into_diagnostic()?;

    let output = child.wait_with_output().into_diagnostic()?;

    if !output.status.success() {
        bail!(
            "Failed to login with `{command_string}`:\n{}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
