use crate::view::SectionLayout;

pub const DEFAULT_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    Index(usize),
}

impl Focus {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Search => None,
            Self::Index(index) => Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
}

/// Row/column movement over sectioned items laid out `columns` wide. Rows
/// never span two sections; every move saturates at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNavigator {
    columns: usize,
}

impl Default for GridNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl GridNavigator {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether the grid consumes `key` while focus is at `focus`. Horizontal
    /// keys in the search field belong to the text caret.
    pub fn intercepts(&self, focus: Focus, key: NavKey) -> bool {
        !matches!(
            (focus, key),
            (Focus::Search, NavKey::Left) | (Focus::Search, NavKey::Right)
        )
    }

    pub fn step(&self, focus: Focus, key: NavKey, layout: &SectionLayout) -> Focus {
        let total = layout.total();
        let focus = clamp_focus(focus, total);

        let index = match focus {
            Focus::Search => {
                return match key {
                    NavKey::Down if total > 0 => Focus::Index(0),
                    _ => Focus::Search,
                };
            }
            Focus::Index(index) => index,
        };

        match key {
            NavKey::Left => Focus::Index(index.saturating_sub(1)),
            NavKey::Right => Focus::Index((index + 1).min(total - 1)),
            NavKey::Down => self.down(index, layout),
            NavKey::Up => self.up(index, layout),
        }
    }

    fn down(&self, index: usize, layout: &SectionLayout) -> Focus {
        let Some((section, offset)) = layout.locate(index) else {
            return Focus::Search;
        };
        let lengths = layout.lengths();

        if offset + self.columns < lengths[section] {
            return Focus::Index(index + self.columns);
        }

        let column = offset % self.columns;
        let next = (section + 1..lengths.len()).find(|candidate| lengths[*candidate] > 0);
        match next {
            Some(target) => {
                let local = column.min(lengths[target] - 1);
                Focus::Index(layout.section_start(target) + local)
            }
            None => Focus::Index(index),
        }
    }

    fn up(&self, index: usize, layout: &SectionLayout) -> Focus {
        let Some((section, offset)) = layout.locate(index) else {
            return Focus::Search;
        };
        let lengths = layout.lengths();

        if offset >= self.columns {
            return Focus::Index(index - self.columns);
        }

        let column = offset % self.columns;
        let previous = (0..section).rev().find(|candidate| lengths[*candidate] > 0);
        match previous {
            Some(target) => {
                let len = lengths[target];
                let last_row_start = (len - 1) / self.columns * self.columns;
                let local = (last_row_start + column).min(len - 1);
                Focus::Index(layout.section_start(target) + local)
            }
            None => Focus::Search,
        }
    }
}

/// Drops an index that no longer addresses an item back to the search field.
pub fn clamp_focus(focus: Focus, total: usize) -> Focus {
    match focus {
        Focus::Index(index) if index >= total => Focus::Search,
        other => other,
    }
}
