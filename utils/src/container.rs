use std::{ops::Deref, str::FromStr};

use indexmap::IndexSet;
use lazy_regex::regex;
use miette::miette;

use crate::constants::{LATEST_TAG, MAX_SLUG_LEN};

/// Converts arbitrary text into a value that is safe
/// to use as part of an image tag.
///
/// The text is lower-cased, every run of characters outside
/// of `[a-z0-9_.-]` becomes a single `-`, leading non-word
/// characters are stripped, and the result is cut to
/// 120 characters.
///
/// # Examples
/// ```
/// use docker_build_push_utils::container::slugify;
///
/// assert_eq!(slugify("jira-123/feature/Some Thing"), "jira-123-feature-some-thing");
/// assert_eq!(slugify("--.hidden"), "hidden");
/// ```
#[must_use]
pub fn slugify<S>(raw: S) -> String
where
    S: AsRef<str>,
{
    let lowered = raw.as_ref().to_lowercase();
    let replaced = regex!(r"[^a-zA-Z0-9_.-]+").replace_all(&lowered, "-");
    let mut slug = regex!(r"^[^a-zA-Z0-9_]+")
        .replace(&replaced, "")
        .into_owned();

    // Everything left is ASCII so truncating on a byte index is safe.
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// A single image tag.
///
/// Tags follow the registry grammar of a leading word
/// character followed by word characters, `.` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn latest() -> Self {
        Self(LATEST_TAG.into())
    }
}

impl FromStr for Tag {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let regex = regex!(r"^[a-zA-Z0-9_][a-zA-Z0-9_.-]*$");
        regex.is_match(s).then(|| Self(s.into())).ok_or_else(|| {
            miette!(
                help = "Tags may only contain letters, digits, '_', '.', and '-' and cannot start with '.' or '-'",
                "Invalid tag: {s:?}"
            )
        })
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::latest()
    }
}

impl Deref for Tag {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl From<&Tag> for String {
    fn from(value: &Tag) -> Self {
        value.0.clone()
    }
}

/// An ordered list of tags for a single image.
///
/// The first tag is the primary tag of the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList(Vec<Tag>);

impl TagList {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses user supplied tags, keeping the first
    /// occurrence of any duplicate.
    ///
    /// # Errors
    /// Will error if any of the tags are invalid.
    pub fn from_user_tags<I, S>(tags: I) -> miette::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique = tags
            .into_iter()
            .map(|tag| tag.as_ref().parse::<Tag>())
            .collect::<miette::Result<IndexSet<_>>>()?;

        Ok(Self(unique.into_iter().collect()))
    }

    /// Appends a tag to the end of the list.
    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    #[must_use]
    pub fn primary(&self) -> Option<&Tag> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagList {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[Tag]> for TagList {
    fn as_ref(&self) -> &[Tag] {
        &self.0
    }
}

/// Comma-joins the tags, the format used for the `tags` output.
impl std::fmt::Display for TagList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(Tag::as_str).collect::<Vec<_>>().join(",")
        )
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::{slugify, Tag, TagList};

    #[rstest]
    #[case::simple("master", "master")]
    #[case::mixed_case("SOME-mixed-CASE-Branch", "some-mixed-case-branch")]
    #[case::path_segments("jira-123/feature/some-cool-feature", "jira-123-feature-some-cool-feature")]
    #[case::collapses_runs("feat//a  b", "feat-a-b")]
    #[case::leading_symbols("-/.foo", "foo")]
    #[case::keeps_underscore("_private", "_private")]
    #[case::version("V1.0", "v1.0")]
    #[case::unicode("café/über", "caf-ber")]
    fn slugify_inputs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn slugify_truncates() {
        let long = "a".repeat(300);

        assert_eq!(slugify(&long).len(), 120);
    }

    #[rstest]
    #[case("SOME-mixed-CASE-Branch")]
    #[case("jira-123/feature/x")]
    #[case("..//weird**name__")]
    #[case("İstanbul/ΣΙΣΥΦΟΣ")]
    #[case("")]
    fn slugify_idempotent(#[case] input: &str) {
        let once = slugify(input);

        assert_eq!(slugify(&once), once);
    }

    #[rstest]
    #[case::latest("latest", true)]
    #[case::version("v1.0.2", true)]
    #[case::underscore("_x", true)]
    #[case::leading_dash("-x", false)]
    #[case::leading_dot(".x", false)]
    #[case::space("a b", false)]
    #[case::empty("", false)]
    fn tag_parse(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(input.parse::<Tag>().is_ok(), valid);
    }

    #[test]
    fn user_tags_deduplicate_in_order() {
        let tags = TagList::from_user_tags(["v1", "latest", "v1", "edge"]).unwrap();

        assert_eq!(tags.to_string(), "v1,latest,edge");
        assert_eq!(tags.primary().map(Tag::as_str), Some("v1"));
    }

    #[test]
    fn user_tags_invalid() {
        assert!(TagList::from_user_tags(["ok", "not ok"]).is_err());
    }
}
