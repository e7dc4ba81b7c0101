//! Result items
//!
//! A [`ScriptFilterItem`] is one row in the host's result list. Everything a
//! row can carry lives in [`ItemFields`]; the item adds a map of modifier
//! overrides, each of which is another [`ItemFields`] and therefore cannot
//! nest further overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::action::Action;
use crate::error::SchemaError;

/// Keyboard modifiers that can override a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Fn,
    Ctrl,
    Opt,
    Cmd,
    Shift,
}

impl Modifier {
    pub const ALL: [Modifier; 5] = [
        Modifier::Fn,
        Modifier::Ctrl,
        Modifier::Opt,
        Modifier::Cmd,
        Modifier::Shift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Fn => "fn",
            Modifier::Ctrl => "ctrl",
            Modifier::Opt => "opt",
            Modifier::Cmd => "cmd",
            Modifier::Shift => "shift",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownVariant {
                kind: "modifier",
                value: s.to_string(),
            })
    }
}

/// How the host treats a result.
///
/// The set is closed; a value outside it does not compile:
///
/// ```compile_fail
/// use script_filter_schemas::ItemType;
///
/// let folder = ItemType::Folder;
/// ```
///
/// ```
/// use script_filter_schemas::ItemType;
///
/// assert_eq!(ItemType::FileSkipCheck.as_str(), "file:skipcheck");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[default]
    #[serde(rename = "default")]
    Default,

    /// A file on disk. The host checks that it exists before showing it and
    /// offers its usual file actions.
    #[serde(rename = "file")]
    File,

    /// A file the script vouches for; the existence check is skipped
    #[serde(rename = "file:skipcheck")]
    FileSkipCheck,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Default, ItemType::File, ItemType::FileSkipCheck];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Default => "default",
            ItemType::File => "file",
            ItemType::FileSkipCheck => "file:skipcheck",
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ItemType::File | ItemType::FileSkipCheck)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownVariant {
                kind: "item type",
                value: s.to_string(),
            })
    }
}

/// How the host interprets an icon path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    /// Use the icon of the file at the path
    FileIcon,
    /// Use the icon of a file type, e.g. `public.png`
    FileType,
}

impl IconType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconType::FileIcon => "fileicon",
            IconType::FileType => "filetype",
        }
    }
}

impl fmt::Display for IconType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fileicon" => Ok(IconType::FileIcon),
            "filetype" => Ok(IconType::FileType),
            other => Err(SchemaError::UnknownVariant {
                kind: "icon type",
                value: other.to_string(),
            }),
        }
    }
}

/// Icon shown in a result row.
///
/// Without a type the host loads the file at `path` itself, for example a
/// png. Scripts run from their extension folder, so relative paths work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItemIcon {
    pub path: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<IconType>,
}

impl FilterItemIcon {
    /// Load the image at `path`
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            icon_type: None,
        }
    }

    /// Use the icon of the file at `path`
    pub fn file_icon(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            icon_type: Some(IconType::FileIcon),
        }
    }

    /// Use the icon of a file type, e.g. `com.apple.rtfd`
    pub fn file_type(type_identifier: impl Into<String>) -> Self {
        Self {
            path: type_identifier.into(),
            icon_type: Some(IconType::FileType),
        }
    }
}

/// Argument passed to the connected output actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    One(String),
    Many(Vec<String>),
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::One(s)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::One(s.to_string())
    }
}

impl From<Vec<String>> for Arg {
    fn from(values: Vec<String>) -> Self {
        Arg::Many(values)
    }
}

/// Text used for copy (⌘C) and large type (⌘L)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub largetype: Option<String>,
}

/// Everything a result row can carry except modifier overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    /// Stable identifier the host uses to learn from the user's choices.
    ///
    /// Keep it the same across runs. Leave it out to have the host show
    /// results in the order the script returns them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Passed to connected output actions. Without it the actions cannot
    /// tell which result was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Arg>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<FilterItemIcon>,

    /// Whether the host actions the item on return. Absent means valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,

    /// Replaces the title for matching when the host filters results.
    /// Always case insensitive; diacritic insensitive unless the query
    /// itself contains diacritics.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_text: Option<String>,

    /// Put into the search field on tab, or on return for invalid items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ItemText>,

    /// Shown with Quick Look (shift or ⌘Y). Accepts a URL or a file path,
    /// absolute or relative to home via `~/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quicklookurl: Option<String>,

    /// Passed out when the item is selected. Overrides session variables
    /// with the same name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
}

/// A modifier override: an item without further overrides.
///
/// A `mods` object nested inside an override is ignored when deserializing.
pub type ModifierItem = ItemFields;

impl ItemFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uid: None,
            title: title.into(),
            subtitle: None,
            arg: None,
            icon: None,
            valid: None,
            match_text: None,
            autocomplete: None,
            item_type: None,
            action: None,
            text: None,
            quicklookurl: None,
            variables: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn with_icon(mut self, icon: FilterItemIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = Some(valid);
        self
    }

    pub fn with_match(mut self, match_text: impl Into<String>) -> Self {
        self.match_text = Some(match_text.into());
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_text(mut self, text: ItemText) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_quicklookurl(mut self, url: impl Into<String>) -> Self {
        self.quicklookurl = Some(url.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace the variables outright. An empty map is kept as-is, which on
    /// a modifier override stops inheritance from the parent item.
    pub fn with_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Validity with the host's default applied
    pub fn is_valid(&self) -> bool {
        self.valid.unwrap_or(true)
    }

    /// Type with the host's default applied
    pub fn effective_type(&self) -> ItemType {
        self.item_type.unwrap_or_default()
    }
}

/// A result row displayed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFilterItem {
    #[serde(flatten)]
    pub fields: ItemFields,

    /// Alternate descriptions used while a modifier is held
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<BTreeMap<Modifier, ModifierItem>>,
}

impl ScriptFilterItem {
    pub fn new(title: impl Into<String>) -> Self {
        ItemFields::new(title).into()
    }

    pub fn with_mod(mut self, modifier: Modifier, item: ModifierItem) -> Self {
        self.mods
            .get_or_insert_with(BTreeMap::new)
            .insert(modifier, item);
        self
    }

    /// The override for `modifier`, if any
    pub fn modifier(&self, modifier: Modifier) -> Option<&ModifierItem> {
        self.mods.as_ref()?.get(&modifier)
    }

    /// Variables passed out when the item is actioned with `modifier` held.
    ///
    /// An override's own variables replace the item's and are not merged
    /// with them; an empty map means no variables at all. An override
    /// without a variables object uses the item's.
    pub fn variables_for(&self, modifier: Option<Modifier>) -> Option<&BTreeMap<String, String>> {
        let Some(override_item) = modifier.and_then(|m| self.modifier(m)) else {
            return self.fields.variables.as_ref();
        };

        match &override_item.variables {
            Some(variables) => Some(variables),
            None => {
                trace!(title = %self.fields.title, "modifier inherits item variables");
                self.fields.variables.as_ref()
            }
        }
    }
}

impl From<ItemFields> for ScriptFilterItem {
    fn from(fields: ItemFields) -> Self {
        Self { fields, mods: None }
    }
}
