use docker_build_push_utils::{
    constants::{REF_HEADS_PREFIX, REF_PULL_PREFIX, REF_TAGS_PREFIX},
    container::slugify,
};

/// A git reference as provided by CI, e.g. `refs/heads/main`.
///
/// Each variant holds the remainder of the reference after
/// its prefix was stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitRef<'scope> {
    /// `refs/tags/<tag>`
    Tag(&'scope str),

    /// `refs/heads/<branch>`
    Branch(&'scope str),

    /// `refs/pull/<number>/<merge|head>`
    PullRequest(&'scope str),

    /// Any other shape. Holds the whole reference.
    Unsupported(&'scope str),
}

impl<'scope> GitRef<'scope> {
    #[must_use]
    pub fn classify(git_ref: &'scope str) -> Self {
        if let Some(tag) = git_ref.strip_prefix(REF_TAGS_PREFIX) {
            Self::Tag(tag)
        } else if let Some(branch) = git_ref.strip_prefix(REF_HEADS_PREFIX) {
            Self::Branch(branch)
        } else if let Some(pull) = git_ref.strip_prefix(REF_PULL_PREFIX) {
            Self::PullRequest(pull)
        } else {
            Self::Unsupported(git_ref)
        }
    }
}

impl std::fmt::Display for GitRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{REF_TAGS_PREFIX}{tag}"),
            Self::Branch(branch) => write!(f, "{REF_HEADS_PREFIX}{branch}"),
            Self::PullRequest(pull) => write!(f, "{REF_PULL_PREFIX}{pull}"),
            Self::Unsupported(other) => write!(f, "{other}"),
        }
    }
}

/// Slug for a `refs/tags/` reference.
#[must_use]
pub fn tag_slug(git_ref: &str) -> String {
    slugify(git_ref.strip_prefix(REF_TAGS_PREFIX).unwrap_or(git_ref))
}

/// Slug for a `refs/heads/` reference.
///
/// Branches are slugified whole so `feature/x` becomes `feature-x`.
#[must_use]
pub fn branch_slug(git_ref: &str) -> String {
    slugify(git_ref.strip_prefix(REF_HEADS_PREFIX).unwrap_or(git_ref))
}

/// Slug for a `refs/pull/` reference, only the PR number is kept.
#[must_use]
pub fn pr_slug(git_ref: &str) -> String {
    let rest = git_ref.strip_prefix(REF_PULL_PREFIX).unwrap_or(git_ref);
    slugify(rest.split('/').next().unwrap_or_default())
}
