//! The result document a script writes to standard output

use std::collections::BTreeMap;
use std::io::Write;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::item::ScriptFilterItem;

/// Re-run interval range in seconds accepted by the host.
///
/// The host enforces it; [`ScriptFilter`] stores whatever it is given.
pub const RERUN_SECONDS: RangeInclusive<f64> = 0.1..=5.0;

/// Results returned to the host from a script filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptFilter {
    /// Session variables.
    ///
    /// Passed out of the filter's outputs when a result is actioned, and
    /// passed back in as environment variables on the next run within the
    /// same session. Useful for keeping state between runs as the user types
    /// or while the filter re-runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,

    /// Re-run the script after this many seconds, as long as the filter is
    /// still active and the user has not changed its state by typing.
    #[serde(default, alias = "return", skip_serializing_if = "Option::is_none")]
    pub rerun: Option<f64>,

    pub items: Vec<ScriptFilterItem>,
}

impl ScriptFilter {
    pub fn new(items: Vec<ScriptFilterItem>) -> Self {
        Self {
            variables: None,
            rerun: None,
            items,
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_rerun(mut self, seconds: f64) -> Self {
        self.rerun = Some(seconds);
        self
    }

    pub fn push(&mut self, item: impl Into<ScriptFilterItem>) {
        self.items.push(item.into());
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        Ok(format.to_json(self)?)
    }

    /// Write the document followed by a newline, e.g. to stdout for the host
    pub fn write_to<W: Write>(&self, mut writer: W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut writer, self)?,
            OutputFormat::Compact => serde_json::to_writer(&mut writer, self)?,
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl From<Vec<ScriptFilterItem>> for ScriptFilter {
    fn from(items: Vec<ScriptFilterItem>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<ScriptFilterItem> for ScriptFilter {
    fn from_iter<I: IntoIterator<Item = ScriptFilterItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemFields;

    #[test]
    fn test_minimal_document() {
        let filter = ScriptFilter::from_json(r#"{"items":[{"title":"x"}]}"#).unwrap();
        assert_eq!(filter.items.len(), 1);
        assert_eq!(filter.items[0].fields.title, "x");
        assert!(filter.variables.is_none());
        assert!(filter.rerun.is_none());
        assert_eq!(
            filter.to_json(OutputFormat::Compact).unwrap(),
            r#"{"items":[{"title":"x"}]}"#
        );
    }

    #[test]
    fn test_items_are_required() {
        assert!(ScriptFilter::from_json(r#"{"rerun":1.0}"#).is_err());
        assert!(ScriptFilter::from_json(r#"{"items":[{"subtitle":"no title"}]}"#).is_err());
    }

    #[test]
    fn test_rerun_accepts_return_key() {
        let filter = ScriptFilter::from_json(r#"{"return":0.5,"items":[]}"#).unwrap();
        assert_eq!(filter.rerun, Some(0.5));
        assert_eq!(
            filter.to_json(OutputFormat::Compact).unwrap(),
            r#"{"rerun":0.5,"items":[]}"#
        );
    }

    #[test]
    fn test_rerun_is_not_range_checked() {
        let filter = ScriptFilter::default().with_rerun(30.0);
        assert!(!RERUN_SECONDS.contains(&filter.rerun.unwrap()));
        assert!(filter.to_json(OutputFormat::Compact).is_ok());
    }

    #[test]
    fn test_write_to_appends_newline() {
        let filter: ScriptFilter = vec![ScriptFilterItem::from(ItemFields::new("a"))].into();
        let mut out = Vec::new();
        filter.write_to(&mut out, OutputFormat::Compact).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"items\":[{\"title\":\"a\"}]}\n");
    }

    #[test]
    fn test_collect_items() {
        let mut filter: ScriptFilter = ["one", "two"].into_iter().map(ScriptFilterItem::new).collect();
        filter.push(ItemFields::new("three"));
        let titles: Vec<&str> = filter.items.iter().map(|i| i.fields.title.as_str()).collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }
}
