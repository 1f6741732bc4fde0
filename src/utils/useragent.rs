//! Lightweight User-Agent classification.
//!
//! Produces the `user_agent_parsed` structure attached to click events.
//! Only the coarse facts analytics consumers group by are extracted:
//! browser family and version, platform and version, mobile and bot flags.
//! Patterns are tried in order; the first match wins.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Browser families, most specific first. Chromium derivatives advertise
/// `Chrome/` and `Safari/` too, so they must precede both.
static BROWSERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("Edge", r"Edg(?:e|A|iOS)?/([\d.]+)"),
        ("Opera", r"(?:OPR|Opera)/([\d.]+)"),
        ("Samsung Internet", r"SamsungBrowser/([\d.]+)"),
        ("Firefox", r"(?:Firefox|FxiOS)/([\d.]+)"),
        ("Chrome", r"(?:Chrome|CriOS)/([\d.]+)"),
        ("Safari", r"Version/([\d.]+).*Safari/"),
        ("Internet Explorer", r"(?:MSIE |Trident/.*rv:)([\d.]+)"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("valid browser pattern")))
    .collect()
});

/// Platforms. iOS user agents contain `like Mac OS X` and Android ones contain
/// `Linux`, so those are checked first.
static PLATFORMS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("Android", r"Android ([\d.]+)"),
        ("iOS", r"(?:iPhone|iPad|iPod).*? OS ([\d_]+)"),
        ("Chrome OS", r"CrOS \S+ ([\d.]+)"),
        ("Windows", r"Windows NT ([\d.]+)"),
        ("macOS", r"Mac OS X ([\d_.]+)"),
        ("Linux", r"Linux()"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("valid platform pattern")))
    .collect()
});

static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Mobi|iPhone|iPod").expect("valid mobile pattern"));

static BOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bot|crawl|spider|slurp").expect("valid bot pattern"));

/// Structured view of a User-Agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedUserAgent {
    pub browser_name: Option<String>,
    pub browser_version: Option<String>,
    pub platform_name: Option<String>,
    pub platform_version: Option<String>,
    pub mobile: bool,
    pub bot: bool,
}

/// Parses a raw User-Agent header value.
///
/// Never fails: unknown agents produce a value with every field empty.
pub fn parse(user_agent: &str) -> ParsedUserAgent {
    let (browser_name, browser_version) = first_match(&BROWSERS, user_agent);
    let (platform_name, platform_version) = first_match(&PLATFORMS, user_agent);

    ParsedUserAgent {
        browser_name,
        browser_version,
        platform_name,
        platform_version: platform_version.map(|v| v.replace('_', ".")),
        mobile: MOBILE.is_match(user_agent),
        bot: BOT.is_match(user_agent),
    }
}

fn first_match(
    table: &[(&'static str, Regex)],
    user_agent: &str,
) -> (Option<String>, Option<String>) {
    table
        .iter()
        .find_map(|(name, re)| {
            re.captures(user_agent).map(|caps| {
                let version = caps
                    .get(1)
                    .map(|m| m.as_str())
                    .filter(|v| !v.is_empty())
                    .map(str::to_owned);
                (Some((*name).to_string()), version)
            })
        })
        .unwrap_or((None, None))
}
