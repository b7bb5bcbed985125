use std::cmp::Ordering;
use serde::{Deserialize, Serialize};

use crate::content::model::Entity;

/// Declarative sort order for canonical entities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    /// Attribute names compared in order (date, title, slug, or a
    /// metadata field)
    pub fields: Vec<String>,

    /// Reverse the comparison (descending)
    pub reverse: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            fields: vec!["date".to_string()],
            reverse: true,
        }
    }
}

/// Sort entities in place according to the spec.
pub fn sort_entities(entities: &mut [Entity], spec: &SortSpec) {
    entities.sort_by(|a, b| {
        let mut ordering = Ordering::Equal;
        for field in &spec.fields {
            ordering = compare_field(a, b, field);
            if ordering != Ordering::Equal {
                break;
            }
        }

        if spec.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_field(a: &Entity, b: &Entity, field: &str) -> Ordering {
    match field {
        "date" => a.date.cmp(&b.date),
        "title" => a.title.cmp(&b.title),
        "slug" => a.slug.cmp(&b.slug),
        _ => {
            let a_val = a.metadata_str(field);
            let b_val = b.metadata_str(field);
            match (a_val, b_val) {
                (Some(a_val), Some(b_val)) => a_val.cmp(&b_val),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::tests_support::entity_with_date;

    #[test]
    fn test_default_sorter_newest_first() {
        let mut entities = vec![
            entity_with_date("a", "2020-01-01"),
            entity_with_date("b", "2021-06-15"),
            entity_with_date("c", "2019-12-31"),
        ];

        sort_entities(&mut entities, &SortSpec::default());

        let slugs: Vec<&str> = entities.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a", "c"]);
        assert!(entities.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_title_sorter_ascending() {
        let mut entities = vec![
            entity_with_date("beta", "2020-01-01"),
            entity_with_date("alpha", "2021-01-01"),
        ];

        let spec = SortSpec {
            fields: vec!["title".to_string()],
            reverse: false,
        };
        sort_entities(&mut entities, &spec);

        assert_eq!(entities[0].slug, "alpha");
    }

    #[test]
    fn test_metadata_sorter() {
        let mut a = entity_with_date("a", "2020-01-01");
        a.metadata.insert(
            "weight".to_string(),
            serde_yaml::Value::String("2".to_string()),
        );
        let mut b = entity_with_date("b", "2020-01-01");
        b.metadata.insert(
            "weight".to_string(),
            serde_yaml::Value::String("1".to_string()),
        );

        let mut entities = vec![a, b];
        let spec = SortSpec {
            fields: vec!["weight".to_string()],
            reverse: false,
        };
        sort_entities(&mut entities, &spec);

        assert_eq!(entities[0].slug, "b");
    }
}
