use std::hash::{Hash, Hasher};

/// Produces a romanized form of a display name, e.g. pinyin syllables
/// separated by spaces. Output words drive the initials key.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, display_name: &str) -> String;
}

/// Leaves names untouched. Used when no platform transliteration is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTransliterator;

impl Transliterator for PassthroughTransliterator {
    fn transliterate(&self, display_name: &str) -> String {
        display_name.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct LaunchItem {
    pub id: String,
    pub name: String,
    pub transliterated: String,
    pub initials: String,
    normalized_name: String,
    normalized_transliterated: String,
    normalized_initials: String,
}

impl LaunchItem {
    pub fn new(id: &str, name: &str) -> Self {
        Self::with_transliterator(id, name, &PassthroughTransliterator)
    }

    pub fn with_transliterator(id: &str, name: &str, transliterator: &dyn Transliterator) -> Self {
        let transliterated = transliterator.transliterate(name);
        let initials = initials_of(&transliterated);
        Self::with_keys(id, name, &transliterated, &initials)
    }

    pub fn with_keys(id: &str, name: &str, transliterated: &str, initials: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            transliterated: transliterated.to_string(),
            initials: initials.to_string(),
            normalized_name: normalize_for_search(name),
            normalized_transliterated: normalize_for_search(transliterated),
            normalized_initials: normalize_for_search(initials),
        }
    }

    pub fn search_keys(&self) -> [&str; 3] {
        [
            self.normalized_name.as_str(),
            self.normalized_transliterated.as_str(),
            self.normalized_initials.as_str(),
        ]
    }
}

impl PartialEq for LaunchItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LaunchItem {}

impl Hash for LaunchItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// First alphanumeric character of every word, lowercased.
pub fn initials_of(input: &str) -> String {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

pub fn normalize_for_search(input: &str) -> String {
    input.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{initials_of, LaunchItem, Transliterator};

    struct FixedTransliterator;

    impl Transliterator for FixedTransliterator {
        fn transliterate(&self, _display_name: &str) -> String {
            "wei xin".to_string()
        }
    }

    #[test]
    fn initials_take_first_char_of_each_word() {
        assert_eq!(initials_of("Visual Studio Code"), "vsc");
        assert_eq!(initials_of("wei xin"), "wx");
        assert_eq!(initials_of("  --  "), "");
    }

    #[test]
    fn transliterated_keys_feed_initials() {
        let item = LaunchItem::with_transliterator("/Applications/WeChat.app", "微信", &FixedTransliterator);
        assert_eq!(item.transliterated, "wei xin");
        assert_eq!(item.initials, "wx");
    }

    #[test]
    fn equality_uses_identifier_only() {
        let a = LaunchItem::new("/Applications/Safari.app", "Safari");
        let b = LaunchItem::new("/Applications/Safari.app", "Safari Browser");
        let c = LaunchItem::new("/Applications/Mail.app", "Safari");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
