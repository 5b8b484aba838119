use crate::model::{normalize_for_search, LaunchItem};

/// Keeps every item whose name, transliterated name or initials contain
/// `query` (case-insensitive). Matches stay in input order.
pub fn filter(items: &[LaunchItem], query: &str) -> Vec<LaunchItem> {
    let normalized_query = normalize_for_search(query);
    if normalized_query.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| matches(item, &normalized_query))
        .cloned()
        .collect()
}

pub fn matches(item: &LaunchItem, normalized_query: &str) -> bool {
    item.search_keys()
        .iter()
        .any(|key| !key.is_empty() && key.contains(normalized_query))
}

#[cfg(test)]
mod tests {
    use super::filter;
    use crate::model::LaunchItem;

    fn fixture() -> Vec<LaunchItem> {
        vec![
            LaunchItem::new("/Applications/Safari.app", "Safari"),
            LaunchItem::with_keys("/Applications/WeChat.app", "微信", "wei xin", "wx"),
            LaunchItem::new("/Applications/Visual Studio Code.app", "Visual Studio Code"),
            LaunchItem::new("/System/Applications/Calculator.app", "Calculator"),
        ]
    }

    #[test]
    fn filter_is_case_insensitive_and_stable() {
        let results = filter(&fixture(), "A");
        let ids: Vec<&str> = results.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "/Applications/Safari.app",
                "/Applications/Visual Studio Code.app",
                "/System/Applications/Calculator.app",
            ]
        );
    }

    #[test]
    fn initials_match_without_literal_name_match() {
        let results = filter(&fixture(), "wx");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "微信");
    }

    #[test]
    fn transliterated_name_matches() {
        let results = filter(&fixture(), "xin");
        assert_eq!(results[0].id, "/Applications/WeChat.app");
    }

    #[test]
    fn derived_initials_match_latin_names() {
        let results = filter(&fixture(), "vsc");
        assert_eq!(results[0].id, "/Applications/Visual Studio Code.app");
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filter(&fixture(), "zzz").is_empty());
    }
}
