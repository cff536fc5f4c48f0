//! Rational (PEP 386) version numbers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Majors above this are almost always dates (`2009.01.03`), not versions.
const MAX_MAJOR: u64 = 1980;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?P<version>\d+\.\d+)
        (?P<extraversion>(?:\.\d+)*)
        (?:
            (?P<prerel>[abc]|rc)
            (?P<prerelversion>\d+(?:\.\d+)*)
        )?
        (?:\.post(?P<post>\d+))?
        (?:\.dev(?P<dev>\d+))?
        $",
    )
    .expect("version pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("irrational version {version:?}: {reason}")]
pub struct IrrationalVersionError {
    pub version: String,
    pub reason: String,
}

impl IrrationalVersionError {
    fn new(version: &str, reason: impl Into<String>) -> Self {
        Self {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}

/// Pre-release marker. Variant order is the sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PreRelease {
    Alpha(Vec<u64>),
    Beta(Vec<u64>),
    /// `c` and `rc` are the same marker; verlib kept `rc` as a separate
    /// tag that compares equal to `c`, here both display as `c`.
    Candidate(Vec<u64>),
    Final,
}

/// Trailing post/dev marker. Variant order is the sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suffix {
    Dev(u64),
    Final,
    Post { number: u64, dev: PostDev },
}

/// Development marker after a `.postN`: `1.0.post1.dev2 < 1.0.post1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PostDev {
    Dev(u64),
    Final,
}

/// A parsed rational version.
///
/// Ordering compares release segments, then the pre-release marker, then
/// the post/dev suffix, except that a bare `.devN` of a release sorts before
/// every pre-release of that release (`1.0.dev1 < 1.0a1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedVersion {
    release: Vec<u64>,
    pre: PreRelease,
    suffix: Suffix,
}

impl NormalizedVersion {
    /// Parse a rational version string.
    ///
    /// Trailing zero segments after the first two are dropped, so `1.0.0`
    /// and `1.0` are equal.
    pub fn parse(s: &str) -> Result<Self, IrrationalVersionError> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| IrrationalVersionError::new(s, "does not match the version pattern"))?;

        let mut release = parse_numdots(&caps["version"], s, false, 2)?;
        let extra = &caps["extraversion"];
        if !extra.is_empty() {
            release.extend(parse_numdots(&extra[1..], s, true, 0)?);
        }

        if release[0] > MAX_MAJOR {
            return Err(IrrationalVersionError::new(
                s,
                "huge major version number, probably a date",
            ));
        }

        let pre = match caps.name("prerel") {
            Some(tag) => {
                let numbers = parse_numdots(&caps["prerelversion"], s, true, 1)?;
                match tag.as_str() {
                    "a" => PreRelease::Alpha(numbers),
                    "b" => PreRelease::Beta(numbers),
                    _ => PreRelease::Candidate(numbers),
                }
            }
            None => PreRelease::Final,
        };

        let post = caps
            .name("post")
            .map(|m| parse_number(m.as_str(), s))
            .transpose()?;
        let dev = caps
            .name("dev")
            .map(|m| parse_number(m.as_str(), s))
            .transpose()?;

        let suffix = match (post, dev) {
            (Some(number), dev) => Suffix::Post {
                number,
                dev: dev.map_or(PostDev::Final, PostDev::Dev),
            },
            (None, Some(dev)) => Suffix::Dev(dev),
            (None, None) => Suffix::Final,
        };

        Ok(Self {
            release,
            pre,
            suffix,
        })
    }

    /// Release segments, always at least two.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn major(&self) -> u64 {
        self.release[0]
    }

    pub fn minor(&self) -> u64 {
        self.release[1]
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre != PreRelease::Final || matches!(self.suffix, Suffix::Dev(_))
    }

    fn is_bare_dev(&self) -> bool {
        self.pre == PreRelease::Final && matches!(self.suffix, Suffix::Dev(_))
    }
}

impl PartialOrd for NormalizedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalizedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release
            .cmp(&other.release)
            .then_with(|| other.is_bare_dev().cmp(&self.is_bare_dev()))
            .then_with(|| self.pre.cmp(&other.pre))
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

fn parse_number(n: &str, full: &str) -> Result<u64, IrrationalVersionError> {
    n.parse::<u64>()
        .map_err(|_| IrrationalVersionError::new(full, format!("segment '{}' is out of range", n)))
}

fn parse_numdots(
    s: &str,
    full: &str,
    drop_trailing_zeros: bool,
    pad_zeros_length: usize,
) -> Result<Vec<u64>, IrrationalVersionError> {
    let mut nums = Vec::new();
    for n in s.split('.') {
        if n.len() > 1 && n.starts_with('0') {
            return Err(IrrationalVersionError::new(
                full,
                format!("cannot have leading zero in version number segment: '{}'", n),
            ));
        }
        nums.push(parse_number(n, full)?);
    }
    if drop_trailing_zeros {
        while nums.last() == Some(&0) {
            nums.pop();
        }
    }
    while nums.len() < pad_zeros_length {
        nums.push(0);
    }
    Ok(nums)
}

fn join(nums: &[u64]) -> String {
    nums.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.release))?;
        match &self.pre {
            PreRelease::Alpha(n) => write!(f, "a{}", join(n))?,
            PreRelease::Beta(n) => write!(f, "b{}", join(n))?,
            PreRelease::Candidate(n) => write!(f, "c{}", join(n))?,
            PreRelease::Final => {}
        }
        match &self.suffix {
            Suffix::Dev(n) => write!(f, ".dev{}", n),
            Suffix::Final => Ok(()),
            Suffix::Post { number, dev } => {
                write!(f, ".post{}", number)?;
                match dev {
                    PostDev::Dev(n) => write!(f, ".dev{}", n),
                    PostDev::Final => Ok(()),
                }
            }
        }
    }
}

impl FromStr for NormalizedVersion {
    type Err = IrrationalVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
