use bon::Builder;
use clap::Args;
use log::trace;

use crate::{
    constants::{INPUT_PASSWORD, INPUT_USERNAME},
    secret::SecretValue,
};

/// The credentials for logging into an image registry.
///
/// Built once from the user's inputs and passed to
/// whatever needs to log in.
#[derive(Debug, Clone, Builder)]
pub struct Credentials {
    #[builder(into)]
    pub registry: String,

    #[builder(into)]
    pub username: Option<String>,

    #[builder(into)]
    pub password: Option<SecretValue>,
}

impl Credentials {
    /// Returns the username and password when both
    /// were supplied and are non-empty.
    #[must_use]
    pub fn user_pass(&self) -> Option<(&str, &SecretValue)> {
        trace!("Credentials::user_pass()");

        match (self.username.as_deref(), self.password.as_ref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CredentialsArgs {
    /// The username to login to the
    /// container registry.
    #[arg(short = 'U', long, env = INPUT_USERNAME, hide_env_values = true)]
    pub username: Option<String>,

    /// The password to login to the
    /// container registry.
    #[arg(short = 'P', long, env = INPUT_PASSWORD, hide_env_values = true)]
    pub password: Option<SecretValue>,
}

impl CredentialsArgs {
    /// Pairs the username and password with the registry they are for.
    #[must_use]
    pub fn into_credentials<S>(self, registry: S) -> Credentials
    where
        S: Into<String>,
    {
        Credentials::builder()
            .registry(registry)
            .maybe_username(self.username)
            .maybe_password(self.password)
            .build()
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::{Credentials, CredentialsArgs};

    #[rstest]
    #[case::both(Some("mrsmithers"), Some("hunter2"), true)]
    #[case::no_password(Some("mrsmithers"), None, false)]
    #[case::no_username(None, Some("hunter2"), false)]
    #[case::empty_values(Some(""), Some(""), false)]
    #[case::padded_password(Some("mrsmithers"), Some(" hunter2 "), true)]
    #[case::neither(None, None, false)]
    fn user_pass(
        #[case] username: Option<&str>,
        #[case] password: Option<&str>,
        #[case] expected: bool,
    ) {
        let creds = Credentials::builder()
            .registry("docker.io")
            .maybe_username(username)
            .maybe_password(password)
            .build();

        assert_eq!(creds.user_pass().is_some(), expected);
    }

    #[test]
    fn args_into_credentials() {
        let args = CredentialsArgs {
            username: Some("mrsmithers".into()),
            password: Some("hunter2".into()),
        };
        let creds = args.into_credentials("ghcr.io");

        assert_eq!(creds.registry, "ghcr.io");
        assert_eq!(
            creds.user_pass().map(|(user, pass)| (user, pass.value())),
            Some(("mrsmithers", "hunter2"))
        );
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
