use bon::Builder;
use chrono::{DateTime, Local};

/// Options for deriving the tags of an image from
/// the git reference that triggered the run.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Builder)]
pub struct GenerateTagsOpts<'scope> {
    /// The full git reference, e.g. `refs/heads/main`.
    pub git_ref: &'scope str,

    /// The full commit id. Only the first 7
    /// characters end up in a tag.
    pub commit_sha: &'scope str,

    #[builder(default)]
    pub add_latest: bool,

    #[builder(default)]
    pub add_timestamp: bool,

    /// Use milliseconds since the epoch instead of
    /// the `YYYY-MM-DD.HHmmss` format.
    #[builder(default)]
    pub numeric_timestamp: bool,

    /// The time used for the timestamp suffix.
    #[builder(default = Local::now())]
    pub time: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, Builder)]
pub struct GenerateImageNameOpts<'scope> {
    /// The image name without registry, e.g. `some-repo/image-name`.
    pub name: &'scope str,

    /// The registry host, e.g. `ghcr.io`.
    pub registry: &'scope str,

    /// The owner namespace. Only used by GitHub registries.
    pub owner: Option<&'scope str>,
}
