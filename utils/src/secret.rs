use std::{convert::Infallible, str::FromStr};

use zeroize::Zeroizing;

/// A sensitive value such as a registry password.
///
/// The contents are zeroed on drop and are never
/// printed by `Display` or `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(Zeroizing<String>);

macro_rules! impl_secret_value {
    ($($type:ty),*) => {
        $(
            impl From<$type> for SecretValue {
                fn from(value: $type) -> Self {
                    Self(String::from(value).into())
                }
            }
        )*
    };
}

impl_secret_value!(String, &String, &str);

impl FromStr for SecretValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl SecretValue {
    /// Get the value of the secret.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}
