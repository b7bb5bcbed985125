use std::collections::HashMap;
use std::error::Error;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Front matter of an entity source file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntityFrontMatter {
    /// Title
    pub title: Option<String>,

    /// Custom slug for URL generation
    pub slug: Option<String>,

    /// Date as a string (YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, or RFC 3339)
    pub date: Option<String>,

    /// Publication status (published, draft, hidden)
    pub status: Option<String>,

    /// Language of this file
    pub lang: Option<String>,

    /// Template override
    pub template: Option<String>,

    /// Category
    pub category: Option<String>,

    /// Tags
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_or_seq")]
    pub tags: Option<Vec<String>>,

    /// Author name
    pub author: Option<String>,

    /// Author names
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_or_seq")]
    pub authors: Option<Vec<String>>,

    /// Custom summary
    pub summary: Option<String>,

    /// URL override
    pub url: Option<String>,

    /// Output path override
    pub save_as: Option<String>,

    /// Custom front matter fields
    #[serde(flatten)]
    pub custom: HashMap<String, serde_yaml::Value>,
}

impl EntityFrontMatter {
    /// Parsed date if available
    pub fn get_date(&self) -> Option<DateTime<Utc>> {
        let date_str = self.date.as_ref()?;

        if let Ok(dt) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            let naive_dt = dt.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive_dt));
        }

        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
            return Some(Utc.from_utc_datetime(&dt));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
            return Some(dt.with_timezone(&Utc));
        }

        None
    }

    /// Authors, falling back to the singular field
    pub fn author_list(&self) -> Vec<String> {
        if let Some(authors) = &self.authors {
            return authors.clone();
        }
        self.author.clone().map(|a| vec![a]).unwrap_or_default()
    }
}

/// Accept either a single string or a sequence of strings
fn deserialize_string_or_seq<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        String(String),
        Seq(Vec<String>),
    }

    Ok(match Option::<StringOrSeq>::deserialize(deserializer)? {
        Some(StringOrSeq::String(s)) => Some(
            s.split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        ),
        Some(StringOrSeq::Seq(seq)) => Some(seq),
        None => None,
    })
}

/// Check if content starts with a front matter block
pub fn has_front_matter(content: &str) -> bool {
    content.trim_start().starts_with("---")
}

/// Split a source file into front matter and body content.
///
/// Files without a front matter block yield default front matter and the
/// whole content as body.
pub fn extract_front_matter(content: &str) -> BoxResult<(EntityFrontMatter, String)> {
    if !has_front_matter(content) {
        return Ok((EntityFrontMatter::default(), content.to_string()));
    }

    // has_front_matter tolerates leading whitespace, so slice from the
    // actual opening marker
    let content = content.trim_start();

    // Find the second --- marker
    if let Some(end_pos) = content[3..].find("---") {
        let yaml_content = content[3..3 + end_pos].trim();

        match serde_yaml::from_str::<EntityFrontMatter>(yaml_content) {
            Ok(front_matter) => {
                let content_start = 3 + end_pos + 3;
                let body = if content_start < content.len() {
                    content[content_start..].trim_start().to_string()
                } else {
                    String::new()
                };

                Ok((front_matter, body))
            }
            Err(e) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Error parsing front matter: {}", e),
            ))),
        }
    } else {
        Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Malformed front matter: missing closing delimiter",
        )))
    }
}
