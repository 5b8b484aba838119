use crate::catalog::Catalog;
use crate::history::{LaunchHistory, DEFAULT_FREQUENT_LIMIT};
use crate::model::LaunchItem;
use crate::search;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    SearchResults,
    Recent,
    Frequent,
    All,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::SearchResults => "search results",
            Self::Recent => "recent",
            Self::Frequent => "frequent",
            Self::All => "all items",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub items: Vec<LaunchItem>,
}

impl Section {
    pub fn new(kind: SectionKind, items: Vec<LaunchItem>) -> Self {
        Self { kind, items }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_frequent: bool,
    pub frequent_limit: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_frequent: false,
            frequent_limit: DEFAULT_FREQUENT_LIMIT,
        }
    }
}

/// Builds the visible sections. A non-empty query yields only search
/// results; otherwise recent (if any), optional frequent, then everything.
pub fn compose(
    catalog: &Catalog,
    history: &LaunchHistory,
    query: &str,
    options: ViewOptions,
) -> Vec<Section> {
    if !query.trim().is_empty() {
        return vec![Section::new(
            SectionKind::SearchResults,
            search::filter(catalog.items(), query),
        )];
    }

    let mut sections = Vec::with_capacity(3);
    let recent = history.recent_items(catalog);
    if !recent.is_empty() {
        sections.push(Section::new(SectionKind::Recent, recent));
    }

    if options.show_frequent {
        let frequent = history.frequent_items(catalog, options.frequent_limit);
        if !frequent.is_empty() {
            sections.push(Section::new(SectionKind::Frequent, frequent));
        }
    }

    sections.push(Section::new(SectionKind::All, catalog.items().to_vec()));
    sections
}

pub fn flatten(sections: &[Section]) -> Vec<LaunchItem> {
    sections
        .iter()
        .flat_map(|section| section.items.iter().cloned())
        .collect()
}

/// Section lengths in display order; the addressable space for navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLayout {
    lengths: Vec<usize>,
}

impl SectionLayout {
    pub fn new(lengths: Vec<usize>) -> Self {
        Self { lengths }
    }

    pub fn from_sections(sections: &[Section]) -> Self {
        Self::new(sections.iter().map(Section::len).collect())
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn total(&self) -> usize {
        self.lengths.iter().sum()
    }

    pub fn section_start(&self, section: usize) -> usize {
        self.lengths[..section].iter().sum()
    }

    /// Section index and offset within it for a flattened index.
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (section, len) in self.lengths.iter().enumerate() {
            if index < start + len {
                return Some((section, index - start));
            }
            start += len;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{compose, flatten, SectionKind, SectionLayout, ViewOptions};
    use crate::catalog::Catalog;
    use crate::history::LaunchHistory;
    use crate::model::LaunchItem;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            LaunchItem::new("/Applications/Notes.app", "Notes"),
            LaunchItem::new("/Applications/Maps.app", "Maps"),
            LaunchItem::new("/Applications/Mail.app", "Mail"),
        ])
    }

    #[test]
    fn empty_history_shows_only_all_items() {
        let sections = compose(&catalog(), &LaunchHistory::default(), "", ViewOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::All);
        assert_eq!(sections[0].label(), "all items");
        assert_eq!(sections[0].len(), 3);
    }

    #[test]
    fn recent_section_precedes_all_items() {
        let mut history = LaunchHistory::default();
        history.record("/Applications/Notes.app");

        let sections = compose(&catalog(), &history, "", ViewOptions::default());
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Recent, SectionKind::All]);

        let flat = flatten(&sections);
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0].id, "/Applications/Notes.app");
        assert_eq!(flat[1].id, "/Applications/Mail.app");
    }

    #[test]
    fn frequent_section_is_opt_in() {
        let mut history = LaunchHistory::default();
        history.record("/Applications/Maps.app");

        let options = ViewOptions {
            show_frequent: true,
            ..ViewOptions::default()
        };
        let sections = compose(&catalog(), &history, "", options);
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Recent, SectionKind::Frequent, SectionKind::All]
        );
    }

    #[test]
    fn query_yields_single_search_section() {
        let mut history = LaunchHistory::default();
        history.record("/Applications/Notes.app");

        let sections = compose(&catalog(), &history, "ma", ViewOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::SearchResults);
        let ids: Vec<&str> = sections[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["/Applications/Mail.app", "/Applications/Maps.app"]);
    }

    #[test]
    fn layout_locates_indices_across_sections() {
        let layout = SectionLayout::new(vec![3, 0, 12]);
        assert_eq!(layout.total(), 15);
        assert_eq!(layout.locate(0), Some((0, 0)));
        assert_eq!(layout.locate(2), Some((0, 2)));
        assert_eq!(layout.locate(3), Some((2, 0)));
        assert_eq!(layout.locate(14), Some((2, 11)));
        assert_eq!(layout.locate(15), None);
        assert_eq!(layout.section_start(2), 3);
    }
}
