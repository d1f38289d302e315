use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Combining Diacritical Marks block, the only marks the CMS strips.
const DIACRITICS: std::ops::RangeInclusive<char> = '\u{300}'..='\u{36f}';

/// Slug matching the CMS slugifier, so brand/model identities line up with
/// what the API stores.
///
/// NFKD, diacritics (U+0300..U+036F) dropped, lowercase, `&` spelled out, then every run outside
/// `[a-z0-9]` becomes a single `-` and edge hyphens are trimmed.
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !DIACRITICS.contains(c))
        .collect();
    let spelled = folded.replace('&', " and ");
    NON_ALNUM_RE
        .replace_all(&spelled, "-")
        .trim_matches('-')
        .to_string()
}

/// `YYYYMM` → `YYYY-MM-01`. Anything that isn't six digits with a real month
/// gives an empty string.
pub fn convert_date(raw: &str) -> String {
    if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return String::new();
    }
    let (year, month) = raw.split_at(4);
    let valid = match (year.parse::<i32>(), month.parse::<u32>()) {
        (Ok(y), Ok(m)) => NaiveDate::from_ymd_opt(y, m, 1).is_some(),
        _ => false,
    };
    if valid {
        format!("{}-{}-01", year, month)
    } else {
        String::new()
    }
}
