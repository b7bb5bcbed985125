use std::collections::HashMap;
use log::warn;

use crate::content::model::Entity;

/// Split entities into canonical items and translations.
///
/// Items sharing a translation id form one group; the group member in the
/// site default language is canonical, the rest are its translations. A
/// group without a default-language member keeps its first item as
/// canonical.
pub fn process_translations(
    items: Vec<Entity>,
    default_lang: &str,
) -> (Vec<Entity>, Vec<Entity>) {
    // Group while preserving the incoming order of first appearance
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Entity>> = HashMap::new();
    for item in items {
        let key = item.translation_id.clone();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(item);
    }

    let mut canonical = Vec::new();
    let mut translations = Vec::new();

    for key in order {
        let group = groups.remove(&key).unwrap_or_default();

        let default_count = group
            .iter()
            .filter(|item| item.lang == default_lang)
            .count();
        if default_count > 1 {
            warn!(
                "Multiple entities with translation id '{}' in language '{}'; \
                 keeping the first as canonical",
                key, default_lang
            );
        }

        let canonical_idx = group
            .iter()
            .position(|item| item.lang == default_lang)
            .unwrap_or(0);

        for (idx, item) in group.into_iter().enumerate() {
            if idx == canonical_idx {
                canonical.push(item);
            } else {
                translations.push(item);
            }
        }
    }

    (canonical, translations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::tests_support::entity_with_date;

    fn entity_with_lang(slug: &str, translation_id: &str, lang: &str) -> Entity {
        let mut entity = entity_with_date(slug, "2020-01-01");
        entity.translation_id = translation_id.to_string();
        entity.lang = lang.to_string();
        entity
    }

    #[test]
    fn test_split_translations() {
        let items = vec![
            entity_with_lang("post-fr", "post", "fr"),
            entity_with_lang("post", "post", "en"),
            entity_with_lang("other", "other", "en"),
        ];

        let (canonical, translations) = process_translations(items, "en");

        assert_eq!(canonical.len(), 2);
        assert_eq!(translations.len(), 1);
        assert!(canonical.iter().all(|e| e.lang == "en"));
        assert_eq!(translations[0].slug, "post-fr");
    }

    #[test]
    fn test_group_without_default_lang_keeps_first() {
        let items = vec![
            entity_with_lang("solo-de", "solo", "de"),
            entity_with_lang("solo-fr", "solo", "fr"),
        ];

        let (canonical, translations) = process_translations(items, "en");

        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[0].slug, "solo-de");
        assert_eq!(translations.len(), 1);
    }

    #[test]
    fn test_no_translations() {
        let items = vec![
            entity_with_lang("a", "a", "en"),
            entity_with_lang("b", "b", "en"),
        ];

        let (canonical, translations) = process_translations(items, "en");
        assert_eq!(canonical.len(), 2);
        assert!(translations.is_empty());
    }
}
