use docker_build_push_utils::{
    constants::{PR_TAG_PREFIX, SHORT_SHA_LEN},
    container::{Tag, TagList},
    format_numeric_timestamp, format_tag_timestamp,
};
use log::{debug, trace};

use super::{
    error::TagError,
    git_ref::{branch_slug, pr_slug, tag_slug, GitRef},
    opts::GenerateTagsOpts,
};

/// The first 7 characters of a commit id.
///
/// Ids that are shorter are used as a whole.
#[must_use]
pub fn short_sha(commit_sha: &str) -> &str {
    commit_sha.get(..SHORT_SHA_LEN).unwrap_or(commit_sha)
}

/// Derives the tags for an image from a git reference.
///
/// The list always starts with the derived tag and ends with
/// `latest` when `add_latest` is set.
///
/// # Errors
/// Will error if the reference isn't a tag, branch, or pull request,
/// or when the derived tag isn't a valid tag.
pub fn try_compose_tags(opts: &GenerateTagsOpts) -> Result<TagList, TagError> {
    trace!("try_compose_tags({opts:#?})");

    let git_ref = GitRef::classify(opts.git_ref);
    let short_sha = short_sha(opts.commit_sha);

    let base = match git_ref {
        GitRef::Tag(_) => tag_slug(opts.git_ref),
        GitRef::Branch(_) => format!("{}-{short_sha}", branch_slug(opts.git_ref)),
        GitRef::PullRequest(_) => {
            format!("{PR_TAG_PREFIX}-{}-{short_sha}", pr_slug(opts.git_ref))
        }
        GitRef::Unsupported(_) => return Err(TagError::UnsupportedRef(opts.git_ref.into())),
    };

    let base = match git_ref {
        GitRef::Tag(_) => base,
        _ if opts.add_timestamp && opts.numeric_timestamp => {
            format!("{base}-{}", format_numeric_timestamp(&opts.time))
        }
        _ if opts.add_timestamp => format!("{base}-{}", format_tag_timestamp(&opts.time)),
        _ => base,
    };

    let mut tags = TagList::new();
    tags.push(base.parse::<Tag>().map_err(|_| TagError::InvalidTag {
        tag: base.clone(),
        git_ref: opts.git_ref.into(),
    })?);

    if opts.add_latest {
        tags.push(Tag::latest());
    }

    debug!("Generated tags {tags} for {git_ref}");
    Ok(tags)
}

/// Derives the tags for an image, handing any failure to `report`.
///
/// On failure `report` is called once and an empty list is
/// returned, leaving it up to the caller to stop the run.
pub fn compose_tags<F>(opts: &GenerateTagsOpts, report: F) -> TagList
where
    F: FnOnce(&TagError),
{
    try_compose_tags(opts).unwrap_or_else(|err| {
        report(&err);
        TagList::new()
    })
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use chrono::{DateTime, Local, TimeZone};
    use docker_build_push_utils::container::{Tag, TagList};
    use lazy_regex::regex;
    use rstest::{fixture, rstest};

    use crate::{
        drivers::{error::TagError, opts::GenerateTagsOpts},
        test::{COMMIT_SHA, SHORT_SHA},
    };

    use super::{compose_tags, short_sha, try_compose_tags};

    #[fixture]
    fn time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2020, 1, 14, 9, 5, 3).unwrap()
    }

    fn tags(
        git_ref: &str,
        add_latest: bool,
        add_timestamp: bool,
        time: DateTime<Local>,
    ) -> Result<TagList, TagError> {
        try_compose_tags(
            &GenerateTagsOpts::builder()
                .git_ref(git_ref)
                .commit_sha(COMMIT_SHA)
                .add_latest(add_latest)
                .add_timestamp(add_timestamp)
                .time(time)
                .build(),
        )
    }

    #[rstest]
    #[case::version_tag("refs/tags/v1.0", "v1.0".into())]
    #[case::capital_version_tag("refs/tags/V1.0", "v1.0".into())]
    #[case::branch("refs/heads/main", format!("main-{SHORT_SHA}"))]
    #[case::branch_with_segments(
        "refs/heads/jira-123/feature/some-cool-feature",
        format!("jira-123-feature-some-cool-feature-{SHORT_SHA}")
    )]
    #[case::pull_request("refs/pull/42/merge", format!("pr-42-{SHORT_SHA}"))]
    fn base_tag(time: DateTime<Local>, #[case] git_ref: &str, #[case] expected: String) {
        let tags = tags(git_ref, false, false, time).unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags.primary().map(Tag::as_str), Some(expected.as_str()));
    }

    #[rstest]
    #[case::version_tag("refs/tags/v2")]
    #[case::branch("refs/heads/main")]
    #[case::pull_request("refs/pull/3/head")]
    fn latest_is_last(time: DateTime<Local>, #[case] git_ref: &str) {
        let without = tags(git_ref, false, false, time).unwrap();
        let with = tags(git_ref, true, false, time).unwrap();

        assert_eq!(with.len(), without.len() + 1);
        assert_eq!(with.iter().last().map(Tag::as_str), Some("latest"));
    }

    #[rstest]
    fn latest_not_deduplicated(time: DateTime<Local>) {
        let tags = tags("refs/tags/latest", true, false, time).unwrap();

        assert_eq!(tags.to_string(), "latest,latest");
    }

    #[rstest]
    #[case::branch("refs/heads/main", format!("main-{SHORT_SHA}-2020-01-14.090503"))]
    #[case::pull_request("refs/pull/9/merge", format!("pr-9-{SHORT_SHA}-2020-01-14.090503"))]
    #[case::version_tag("refs/tags/v1.0", "v1.0".into())]
    fn timestamps(time: DateTime<Local>, #[case] git_ref: &str, #[case] expected: String) {
        let tags = tags(git_ref, true, true, time).unwrap();

        assert_eq!(tags.to_string(), format!("{expected},latest"));
    }

    #[rstest]
    fn numeric_timestamp(time: DateTime<Local>) {
        let opts = GenerateTagsOpts::builder()
            .git_ref("refs/heads/main")
            .commit_sha(COMMIT_SHA)
            .add_timestamp(true)
            .numeric_timestamp(true)
            .time(time)
            .build();
        let tags = try_compose_tags(&opts).unwrap();
        let tag = tags.primary().unwrap();

        assert!(regex!(r"^main-[0-9a-f]{7}-\d+$").is_match(tag));
        assert!(tag.ends_with(&time.timestamp_millis().to_string()));
    }

    #[rstest]
    #[case::remote("refs/remotes/origin/main")]
    #[case::bare("main")]
    #[case::empty("")]
    fn unsupported_reports_once(time: DateTime<Local>, #[case] git_ref: &str) {
        let reports = Cell::new(0);
        let opts = GenerateTagsOpts::builder()
            .git_ref(git_ref)
            .commit_sha(COMMIT_SHA)
            .add_latest(true)
            .time(time)
            .build();

        let tags = compose_tags(&opts, |err| {
            assert!(matches!(err, TagError::UnsupportedRef(_)));
            reports.set(reports.get() + 1);
        });

        assert!(tags.is_empty());
        assert_eq!(reports.get(), 1);
    }

    #[rstest]
    fn supported_never_reports(time: DateTime<Local>) {
        let opts = GenerateTagsOpts::builder()
            .git_ref("refs/heads/main")
            .commit_sha(COMMIT_SHA)
            .time(time)
            .build();

        let tags = compose_tags(&opts, |_| panic!("Should not report"));

        assert_eq!(tags.len(), 1);
    }

    #[rstest]
    fn symbol_only_branch_is_invalid(time: DateTime<Local>) {
        assert!(matches!(
            tags("refs/heads/---", false, false, time),
            Err(TagError::InvalidTag { .. })
        ));
    }

    #[rstest]
    #[case::full(COMMIT_SHA, SHORT_SHA)]
    #[case::exact("abcdef1", "abcdef1")]
    #[case::short("abc", "abc")]
    #[case::empty("", "")]
    fn short_shas(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_sha(input), expected);
    }
}
