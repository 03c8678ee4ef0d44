//! String cleanup for upstream display names and identifiers.

/// Presentation characters the facility service embeds in display names,
/// with their ASCII replacement (empty means the character is dropped).
const NAME_SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2019}', "'"),
    ('\u{2013}', "-"),
    ('\u{2122}', ""),
    ('\u{2022}', "-"),
    ('\u{00ae}', ""),
    ('\u{2014}', "-"),
    ('\u{00a1}', ""),
    ('\u{00ee}', "i"),
];

/// Normalize an upstream display name.
///
/// Applies the substitution table character by character, then trims
/// surrounding whitespace. Characters outside the table pass through, so the
/// result is not guaranteed to be ASCII. Idempotent.
///
/// ```
/// use wdpro_facilities::normalize_name;
///
/// assert_eq!(normalize_name(" Mickey\u{2019}s Club\u{2122} "), "Mickey's Club");
/// ```
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match NAME_SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Extract the id from a facility-service href.
///
/// Drops any query string, then returns the last path segment. Returns `None`
/// when nothing is left (e.g. a trailing slash).
///
/// ```
/// use wdpro_facilities::trailing_segment;
///
/// assert_eq!(
///     trailing_segment("https://api.example/facility-service/theme-parks/80007944?region=us"),
///     Some("80007944")
/// );
/// ```
pub fn trailing_segment(href: &str) -> Option<&str> {
    let path = href.split('?').next().unwrap_or(href);
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Strip the suffix of a composite key such as `80007944;entityType=theme-park`.
///
/// Returns everything before the first `;`, or the whole key if there is none.
pub fn strip_composite(key: &str) -> &str {
    key.split(';').next().unwrap_or(key)
}
