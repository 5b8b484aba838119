use serde::{Deserialize, Serialize};

use crate::launcher_state::{LauncherEffect, LauncherState};
use crate::model::LaunchItem;
use crate::navigator::{Focus, NavKey};
use crate::view::Section;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NavKeyDto {
    Up,
    Down,
    Left,
    Right,
}

impl From<NavKeyDto> for NavKey {
    fn from(value: NavKeyDto) -> Self {
        match value {
            NavKeyDto::Up => Self::Up,
            NavKeyDto::Down => Self::Down,
            NavKeyDto::Left => Self::Left,
            NavKeyDto::Right => Self::Right,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreRequest {
    Toggle { has_focus: bool },
    Escape,
    Query { text: String },
    Navigate { key: NavKeyDto },
    Activate,
    ActivateAt { index: usize },
    Rescan,
    Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionDto {
    pub label: String,
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewDto {
    pub query: String,
    pub visible: bool,
    /// Flattened index of the selection; `None` while the search field has focus.
    pub selected: Option<usize>,
    pub sections: Vec<SectionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectDto {
    None,
    Show,
    Focus,
    Hide,
    PassThrough,
    Launch { id: String },
    Rescan { items: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreResponse {
    pub effect: EffectDto,
    pub view: ViewDto,
}

impl From<&LaunchItem> for ItemDto {
    fn from(value: &LaunchItem) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
        }
    }
}

impl From<&Section> for SectionDto {
    fn from(value: &Section) -> Self {
        Self {
            label: value.label().to_string(),
            items: value.items.iter().map(ItemDto::from).collect(),
        }
    }
}

impl From<&LauncherState> for ViewDto {
    fn from(value: &LauncherState) -> Self {
        Self {
            query: value.query().to_string(),
            visible: value.is_visible(),
            selected: match value.focus() {
                Focus::Search => None,
                Focus::Index(index) => Some(index),
            },
            sections: value.sections().iter().map(SectionDto::from).collect(),
        }
    }
}

impl From<LauncherEffect> for EffectDto {
    fn from(value: LauncherEffect) -> Self {
        match value {
            LauncherEffect::None => Self::None,
            LauncherEffect::Show => Self::Show,
            LauncherEffect::Focus => Self::Focus,
            LauncherEffect::Hide => Self::Hide,
            LauncherEffect::PassThrough => Self::PassThrough,
            LauncherEffect::Launch(item) => Self::Launch { id: item.id },
        }
    }
}
