//! Latest-tag selection.
//!
//! Two disjoint policies pick a winner from a tag list:
//!
//! - **Semver**: the greatest semantic version that passes the option
//!   filters. Tags that are not versions (`latest`, `stable`, ...) are
//!   skipped, never an error.
//! - **SHA**: the most recently pushed tag, whatever its text.
//!
//! Version text is parsed leniently: one leading `v` is dropped, leading
//! zeros in the numeric core are ignored and a missing minor or patch
//! component counts as zero (`v1.2` is `1.2.0`, `2024.01.15` is
//! `2024.1.15`).

use std::cmp::Ordering;

use semver::Version;
use tagwatch_core::{ImageTag, Options};

use crate::error::ResolveError;

/// Picks the winning tag from a tag list according to [`Options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionSelector;

impl VersionSelector {
    /// Creates a new version selector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Selects the latest tag.
    ///
    /// With [`Options::use_sha`] the most recently pushed tag wins and no
    /// other option is consulted. Otherwise the greatest eligible semantic
    /// version wins. Ties go to the first tag in list order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoMatch`] if no tag is eligible.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use tagwatch_core::{ImageTag, Options};
    /// use tagwatch_registry::VersionSelector;
    ///
    /// let now = Utc::now();
    /// let tags: Vec<ImageTag> = ["1.2.3", "1.3.0", "1.3.0-beta", "latest"]
    ///     .into_iter()
    ///     .map(|t| ImageTag::new(t, "", now))
    ///     .collect();
    ///
    /// let selector = VersionSelector::new();
    /// let winner = selector.select(&Options::default(), &tags)?;
    /// assert_eq!(winner.tag, "1.3.0");
    /// # Ok::<(), tagwatch_registry::ResolveError>(())
    /// ```
    pub fn select<'a>(
        &self,
        options: &Options,
        tags: &'a [ImageTag],
    ) -> Result<&'a ImageTag, ResolveError> {
        if options.use_sha() {
            Self::latest_sha(options, tags)
        } else {
            Self::latest_semver(options, tags)
        }
    }

    fn latest_semver<'a>(
        options: &Options,
        tags: &'a [ImageTag],
    ) -> Result<&'a ImageTag, ResolveError> {
        let mut latest: Option<(Version, &'a ImageTag)> = None;

        for tag in tags {
            let Some(version) = parse_version(&tag.tag) else {
                continue;
            };

            if !Self::is_eligible(options, tag, &version) {
                continue;
            }

            let is_newer = latest
                .as_ref()
                .is_none_or(|(best, _)| cmp_precedence(&version, best) == Ordering::Greater);
            if is_newer {
                latest = Some((version, tag));
            }
        }

        latest
            .map(|(_, tag)| tag)
            .ok_or_else(|| ResolveError::no_match(options))
    }

    fn is_eligible(options: &Options, tag: &ImageTag, version: &Version) -> bool {
        if let Some(matcher) = options.regex_matcher() {
            if !matcher.is_match(&tag.tag) {
                return false;
            }
        }

        if !version.pre.is_empty() && !options.use_pre_release() {
            return false;
        }

        options.pin_major().is_none_or(|major| version.major == major)
            && options.pin_minor().is_none_or(|minor| version.minor == minor)
            && options.pin_patch().is_none_or(|patch| version.patch == patch)
    }

    fn latest_sha<'a>(
        options: &Options,
        tags: &'a [ImageTag],
    ) -> Result<&'a ImageTag, ResolveError> {
        let mut latest: Option<&'a ImageTag> = None;

        for tag in tags {
            if latest.is_none_or(|best| tag.timestamp > best.timestamp) {
                latest = Some(tag);
            }
        }

        latest.ok_or_else(|| ResolveError::no_match(options))
    }
}

/// Parses tag text as a semantic version, tolerating a `v` prefix, leading
/// zeros and a missing minor or patch component.
fn parse_version(tag: &str) -> Option<Version> {
    let text = tag.strip_prefix('v').unwrap_or(tag);
    if let Ok(version) = Version::parse(text) {
        return Some(version);
    }

    let (core, suffix) = text.split_at(text.find(['-', '+']).unwrap_or(text.len()));
    let numeric = core
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
    if !numeric || core.split('.').count() > 3 {
        return None;
    }

    let mut parts: Vec<&str> = core
        .split('.')
        .map(|part| match part.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        })
        .collect();
    parts.resize(3, "0");

    Version::parse(&format!("{}{suffix}", parts.join("."))).ok()
}

/// Orders by major, minor, patch, then pre-release. Build metadata is ignored.
fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn tags(names: &[&str]) -> Vec<ImageTag> {
        names
            .iter()
            .map(|n| ImageTag::new(*n, "", base_time()))
            .collect()
    }

    fn select(options: &Options, tags: &[ImageTag]) -> Result<String, ResolveError> {
        VersionSelector::new()
            .select(options, tags)
            .map(|t| t.tag.clone())
    }

    #[test]
    fn test_semver_skips_prerelease_and_non_versions() {
        let tags = tags(&["1.2.3", "1.3.0", "1.3.0-beta", "abc"]);
        assert_eq!(select(&Options::default(), &tags).unwrap(), "1.3.0");
    }

    #[test]
    fn test_semver_with_prerelease_prefers_release() {
        let tags = tags(&["1.2.3", "1.3.0", "1.3.0-beta", "abc"]);
        let options = Options::builder().use_pre_release(true).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "1.3.0");
    }

    #[test]
    fn test_semver_prerelease_can_win() {
        let tags = tags(&["1.3.0", "1.4.0-rc.1", "1.4.0-rc.2", "1.4.0-alpha"]);
        let options = Options::builder().use_pre_release(true).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "1.4.0-rc.2");
        assert_eq!(select(&Options::default(), &tags).unwrap(), "1.3.0");
    }

    #[test]
    fn test_semver_pin_major() {
        let tags = tags(&["1.2.3", "1.2.9", "2.0.0"]);

        let options = Options::builder().pin_major(1).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "1.2.9");

        let options = Options::builder().pin_major(3).build().unwrap();
        let err = select(&options, &tags).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
        assert!(err.to_string().contains("pin_major: 3"));
    }

    #[test]
    fn test_semver_pin_minor_and_patch() {
        let tags = tags(&["1.2.3", "1.2.9", "1.3.3", "2.2.3"]);

        let options = Options::builder().pin_minor(2).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "2.2.3");

        let options = Options::builder().pin_major(1).pin_patch(3).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "1.3.3");

        let options = Options::builder()
            .pin_major(1)
            .pin_minor(2)
            .pin_patch(3)
            .build()
            .unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "1.2.3");
    }

    #[test]
    fn test_semver_regex_with_v_prefix_normalized() {
        let tags = tags(&["v1.0.0", "1.0.0"]);
        let options = Options::builder().regex_matcher("^v").build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "v1.0.0");
    }

    /// Under a strict reading `v1.0.0` is not a semantic version, so `^v`
    /// leaves no candidate in the same tag set. The selector implements the
    /// lenient reading only, so the strict outcome is checked by filtering
    /// with the strict parser directly.
    #[test]
    fn test_semver_regex_with_v_prefix_strict_reading() {
        let tags = tags(&["v1.0.0", "1.0.0"]);
        let options = Options::builder().regex_matcher("^v").build().unwrap();
        let matcher = options.regex_matcher().unwrap();

        let strict: Vec<&ImageTag> = tags
            .iter()
            .filter(|t| matcher.is_match(&t.tag))
            .filter(|t| Version::parse(&t.tag).is_ok())
            .collect();
        assert!(strict.is_empty());

        let lenient: Vec<&ImageTag> = tags
            .iter()
            .filter(|t| matcher.is_match(&t.tag))
            .filter(|t| parse_version(&t.tag).is_some())
            .collect();
        assert_eq!(lenient.len(), 1);
        assert_eq!(select(&options, &tags).unwrap(), "v1.0.0");
    }

    #[test]
    fn test_semver_regex_matching_unparseable_tag_is_no_match() {
        let tags = tags(&["vnext", "1.0.0"]);
        let options = Options::builder().regex_matcher("^v").build().unwrap();
        let err = select(&options, &tags).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
    }

    #[test]
    fn test_semver_calendar_versions() {
        let tags = tags(&["2023.12.01", "2024.01.15", "2024.01.02", "latest"]);
        assert_eq!(select(&Options::default(), &tags).unwrap(), "2024.01.15");

        let options = Options::builder().pin_minor(12).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "2023.12.01");
    }

    #[test]
    fn test_semver_regex_filters_variants() {
        let tags = tags(&["1.25.0", "1.26.0-alpine", "1.25.0-alpine", "1.26.0"]);
        let options = Options::builder()
            .regex_matcher("-alpine$")
            .use_pre_release(true)
            .build()
            .unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "1.26.0-alpine");
    }

    #[test]
    fn test_semver_first_wins_on_tie() {
        let tags = tags(&["v2.0.0", "2.0.0", "2.0.0+build.7"]);
        assert_eq!(select(&Options::default(), &tags).unwrap(), "v2.0.0");
    }

    #[test]
    fn test_semver_unsorted_input() {
        let tags = tags(&["0.9.0", "10.0.0", "2.0.0", "9.9.9", "latest", "stable"]);
        assert_eq!(select(&Options::default(), &tags).unwrap(), "10.0.0");
    }

    #[test]
    fn test_semver_no_versions() {
        let tags = tags(&["latest", "stable", "edge"]);
        assert!(select(&Options::default(), &tags).is_err());
        assert!(select(&Options::default(), &[]).is_err());
    }

    #[test]
    fn test_sha_picks_latest_timestamp() {
        let t1 = base_time();
        let tags = vec![
            ImageTag::new("b", "sha256:2", t1 + Duration::hours(1)),
            ImageTag::new("c", "sha256:3", t1 + Duration::hours(2)),
            ImageTag::new("a", "sha256:1", t1),
        ];
        let options = Options::builder().use_sha(true).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "c");
    }

    #[test]
    fn test_sha_ignores_semver_options() {
        let t1 = base_time();
        let tags = vec![
            ImageTag::new("1.0.0", "sha256:1", t1),
            ImageTag::new("not-a-version", "sha256:2", t1 + Duration::minutes(5)),
        ];
        let options = Options::builder()
            .use_sha(true)
            .pin_major(1)
            .regex_matcher("^1")
            .build()
            .unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "not-a-version");
    }

    #[test]
    fn test_sha_first_wins_on_tie() {
        let tags = vec![
            ImageTag::new("first", "sha256:1", base_time()),
            ImageTag::new("second", "sha256:2", base_time()),
        ];
        let options = Options::builder().use_sha(true).build().unwrap();
        assert_eq!(select(&options, &tags).unwrap(), "first");
    }

    #[test]
    fn test_sha_empty_list() {
        let options = Options::builder().use_sha(true).build().unwrap();
        let err = select(&options, &[]).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
    }

    #[test]
    fn test_parse_version_normalization() {
        assert_eq!(parse_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("V1.2.3"), None);
        assert_eq!(parse_version("1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_version("2024.01.15"), Some(Version::new(2024, 1, 15)));
        assert_eq!(parse_version("1.02.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("v00.0"), Some(Version::new(0, 0, 0)));
        assert_eq!(
            parse_version("2024.01.15-rc.1").map(|v| v.pre.to_string()),
            Some("rc.1".to_string())
        );
        assert_eq!(parse_version("v3"), Some(Version::new(3, 0, 0)));
        assert_eq!(
            parse_version("1.2-rc.1").map(|v| v.pre.to_string()),
            Some("rc.1".to_string())
        );
        assert_eq!(parse_version("latest"), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version("vv1.0.0"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn test_precedence_ignores_build() {
        let a = Version::parse("1.0.0+a").unwrap();
        let b = Version::parse("1.0.0+b").unwrap();
        assert_eq!(cmp_precedence(&a, &b), Ordering::Equal);

        let release = Version::parse("1.0.0").unwrap();
        let pre = Version::parse("1.0.0-rc.1").unwrap();
        assert_eq!(cmp_precedence(&release, &pre), Ordering::Greater);
    }
}
