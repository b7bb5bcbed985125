use std::collections::HashMap;
use std::fmt::Write as _;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

lazy_static! {
    static ref DATE_PLACEHOLDER: Regex = Regex::new(r"\{date:([^}]+)\}").unwrap();
}

/// Expand a URL/save-as pattern.
///
/// Plain placeholders (`{slug}`, `{lang}`, `{type}`, ...) come from the
/// replacement map; `{date:FMT}` placeholders are formatted with chrono
/// using the supplied date. Placeholders without a value, and date
/// placeholders with an invalid format, are left as-is.
pub fn format_pattern(
    pattern: &str,
    replacements: &HashMap<&str, String>,
    date: Option<&DateTime<Utc>>,
) -> String {
    let mut result = if pattern.contains("{date:") {
        match date {
            Some(date) => DATE_PLACEHOLDER
                .replace_all(pattern, |caps: &regex::Captures| {
                    // chrono's formatter only reports an unknown
                    // specifier when the output is rendered, so render
                    // into a scratch string instead of to_string()
                    let mut formatted = String::new();
                    match write!(formatted, "{}", date.format(&caps[1])) {
                        Ok(()) => formatted,
                        Err(_) => {
                            warn!(
                                "Invalid date format '{}' in pattern '{}'",
                                &caps[1], pattern
                            );
                            caps[0].to_string()
                        }
                    }
                })
                .into_owned(),
            None => pattern.to_string(),
        }
    } else {
        pattern.to_string()
    };

    for (placeholder, value) in replacements {
        result = result.replace(&format!("{{{}}}", placeholder), value);
    }

    result
}

/// Strip the extension from a save-as path to get a page name.
pub fn page_name(save_as: &str) -> String {
    match save_as.rfind('.') {
        Some(idx) if !save_as[idx..].contains('/') => save_as[..idx].to_string(),
        _ => save_as.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_pattern_replacements() {
        let mut vars = HashMap::new();
        vars.insert("slug", "hello-world".to_string());
        vars.insert("lang", "fr".to_string());

        assert_eq!(
            format_pattern("project/{slug}-{lang}.html", &vars, None),
            "project/hello-world-fr.html"
        );
    }

    #[test]
    fn test_format_pattern_date() {
        let date = Utc.with_ymd_and_hms(2020, 3, 7, 0, 0, 0).unwrap();
        let vars = HashMap::new();

        assert_eq!(
            format_pattern("posts/{date:%Y}/{date:%m}/index.html", &vars, Some(&date)),
            "posts/2020/03/index.html"
        );
    }

    #[test]
    fn test_format_pattern_invalid_date_specifier_left_alone() {
        let date = Utc.with_ymd_and_hms(2020, 3, 7, 0, 0, 0).unwrap();
        let vars = HashMap::new();

        assert_eq!(
            format_pattern("archive/{date:%Q}/index.html", &vars, Some(&date)),
            "archive/{date:%Q}/index.html"
        );
    }

    #[test]
    fn test_format_pattern_missing_value_left_alone() {
        let vars = HashMap::new();
        assert_eq!(format_pattern("{slug}.html", &vars, None), "{slug}.html");
    }

    #[test]
    fn test_page_name() {
        assert_eq!(page_name("projects/index.html"), "projects/index");
        assert_eq!(page_name("projects/archive"), "projects/archive");
    }
}
