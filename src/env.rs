//! Script environment
//!
//! The host launcher injects a set of `alfred_*` variables into every script
//! it runs. Values are set once at process start and are read-only for the
//! lifetime of the invocation.
//!
//! The record has a base shape, which is always present, and an extended
//! shape that adds the bundle identifier and two storage paths derived from
//! it. The host only populates the storage paths when a bundle identifier is
//! configured. That convention is not encoded in the type:
//! [`ScriptEnvironmentVariables::bundle_storage`] exposes the three fields
//! together only when the identifier is present.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};

/// Prefix shared by every variable the host injects
pub const VARIABLE_PREFIX: &str = "alfred_";

/// Value of `alfred_debug` while the host's debug panel is open.
///
/// The host only ever sets the literal `"1"`, so no other value is
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebugFlag {
    #[serde(rename = "1")]
    Enabled,
}

impl DebugFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebugFlag::Enabled => "1",
        }
    }
}

impl fmt::Display for DebugFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebugFlag {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1" => Ok(DebugFlag::Enabled),
            other => Err(SchemaError::UnknownVariant {
                kind: "debug flag",
                value: other.to_string(),
            }),
        }
    }
}

/// Environment variables available to a script run by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEnvironmentVariables {
    /// Location of `Alfred.alfredpreferences`. Follows the user's settings
    /// wherever they are synced.
    #[serde(rename = "alfred_preferences")]
    pub preferences: String,

    /// Hash naming the Mac-specific preferences directory under
    /// `…/preferences/local/[hash]/` inside the preferences bundle.
    #[serde(rename = "alfred_preferences_localhash")]
    pub preferences_localhash: String,

    /// Current theme
    #[serde(rename = "alfred_theme")]
    pub theme: String,

    /// Theme background colour, for scripts that draw icons on the fly
    #[serde(rename = "alfred_theme_background")]
    pub theme_background: String,

    /// Colour of the selected result
    #[serde(rename = "alfred_theme_selection_background")]
    pub theme_selection_background: String,

    /// Subtext mode chosen in the appearance preferences.
    ///
    /// Result text may be tuned to this mode, but should not grow because
    /// of it: users usually hide subtext to get a cleaner window.
    #[serde(rename = "alfred_theme_subtext")]
    pub theme_subtext: String,

    /// Host version, e.g. `5.5`
    #[serde(rename = "alfred_version")]
    pub version: String,

    /// Host build number
    #[serde(rename = "alfred_version_build")]
    pub version_build: String,

    /// Name of the running extension
    #[serde(rename = "alfred_workflow_name")]
    pub workflow_name: String,

    /// Unique ID of the running extension
    #[serde(rename = "alfred_workflow_uid")]
    pub workflow_uid: String,

    /// Version of the running extension
    #[serde(
        rename = "alfred_workflow_version",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_version: Option<String>,

    /// Only set while the user has the debug panel open for this extension
    #[serde(
        rename = "alfred_debug",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub debug: Option<DebugFlag>,

    /// Bundle ID of the running extension
    #[serde(
        rename = "alfred_workflow_bundleid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_bundleid: Option<String>,

    /// Volatile storage:
    /// `~/Library/Caches/com.runningwithcrayons.Alfred/Workflow Data/[bundle id]`
    #[serde(
        rename = "alfred_workflow_cache",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_cache: Option<String>,

    /// Non-volatile storage:
    /// `~/Library/Application Support/Alfred/Workflow Data/[bundle id]`
    #[serde(
        rename = "alfred_workflow_data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_data: Option<String>,
}

/// Bundle identifier together with the storage paths the host derives from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleStorage<'a> {
    pub bundle_id: &'a str,
    pub cache: Option<&'a str>,
    pub data: Option<&'a str>,
}

impl ScriptEnvironmentVariables {
    /// Variables present in every host environment
    pub const REQUIRED_KEYS: [&'static str; 10] = [
        "alfred_preferences",
        "alfred_preferences_localhash",
        "alfred_theme",
        "alfred_theme_background",
        "alfred_theme_selection_background",
        "alfred_theme_subtext",
        "alfred_version",
        "alfred_version_build",
        "alfred_workflow_name",
        "alfred_workflow_uid",
    ];

    /// Variables the host may leave unset
    pub const OPTIONAL_KEYS: [&'static str; 5] = [
        "alfred_workflow_version",
        "alfred_debug",
        "alfred_workflow_bundleid",
        "alfred_workflow_cache",
        "alfred_workflow_data",
    ];

    /// Every variable the record recognises, required ones first
    pub const KEYS: [&'static str; 15] = [
        "alfred_preferences",
        "alfred_preferences_localhash",
        "alfred_theme",
        "alfred_theme_background",
        "alfred_theme_selection_background",
        "alfred_theme_subtext",
        "alfred_version",
        "alfred_version_build",
        "alfred_workflow_name",
        "alfred_workflow_uid",
        "alfred_workflow_version",
        "alfred_debug",
        "alfred_workflow_bundleid",
        "alfred_workflow_cache",
        "alfred_workflow_data",
    ];

    /// Build the record from key/value pairs, e.g. `std::env::vars()`.
    ///
    /// Keys without the `alfred_` prefix are ignored, so the whole process
    /// environment can be passed in.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(VARIABLE_PREFIX))
            .collect();
        debug!(count = vars.len(), "collected host variables");

        let mut required = |name: &str| {
            vars.remove(name).ok_or_else(|| SchemaError::MissingVariable {
                name: name.to_string(),
            })
        };

        let preferences = required("alfred_preferences")?;
        let preferences_localhash = required("alfred_preferences_localhash")?;
        let theme = required("alfred_theme")?;
        let theme_background = required("alfred_theme_background")?;
        let theme_selection_background = required("alfred_theme_selection_background")?;
        let theme_subtext = required("alfred_theme_subtext")?;
        let version = required("alfred_version")?;
        let version_build = required("alfred_version_build")?;
        let workflow_name = required("alfred_workflow_name")?;
        let workflow_uid = required("alfred_workflow_uid")?;

        let debug = match vars.remove("alfred_debug") {
            Some(value) => Some(value.parse::<DebugFlag>().map_err(|_| {
                SchemaError::InvalidVariable {
                    name: "alfred_debug".to_string(),
                    value,
                }
            })?),
            None => None,
        };

        Ok(Self {
            preferences,
            preferences_localhash,
            theme,
            theme_background,
            theme_selection_background,
            theme_subtext,
            version,
            version_build,
            workflow_name,
            workflow_uid,
            workflow_version: vars.remove("alfred_workflow_version"),
            debug,
            workflow_bundleid: vars.remove("alfred_workflow_bundleid"),
            workflow_cache: vars.remove("alfred_workflow_cache"),
            workflow_data: vars.remove("alfred_workflow_data"),
        })
    }

    /// Read the record from the current process environment
    pub fn from_process_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Flatten the record back into key/value pairs, omitting unset variables
    pub fn to_vars(&self) -> Vec<(String, String)> {
        let required = [
            &self.preferences,
            &self.preferences_localhash,
            &self.theme,
            &self.theme_background,
            &self.theme_selection_background,
            &self.theme_subtext,
            &self.version,
            &self.version_build,
            &self.workflow_name,
            &self.workflow_uid,
        ];
        let optional = [
            self.workflow_version.as_deref(),
            self.debug.as_ref().map(DebugFlag::as_str),
            self.workflow_bundleid.as_deref(),
            self.workflow_cache.as_deref(),
            self.workflow_data.as_deref(),
        ];

        let mut vars: Vec<(String, String)> = Self::REQUIRED_KEYS
            .iter()
            .zip(required)
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        vars.extend(
            Self::OPTIONAL_KEYS
                .iter()
                .zip(optional)
                .filter_map(|(k, v)| v.map(|v| (k.to_string(), v.to_string()))),
        );
        vars
    }

    /// Whether the user has the debug panel open for this extension
    pub fn is_debugging(&self) -> bool {
        self.debug.is_some()
    }

    /// The bundle identifier and its storage paths.
    ///
    /// `None` when no bundle identifier is configured, even if the host left
    /// a storage path behind.
    pub fn bundle_storage(&self) -> Option<BundleStorage<'_>> {
        let bundle_id = self.workflow_bundleid.as_deref()?;
        Some(BundleStorage {
            bundle_id,
            cache: self.workflow_cache.as_deref(),
            data: self.workflow_data.as_deref(),
        })
    }

    /// Parse the host version.
    ///
    /// The host reports versions such as `5` or `5.5`; missing components
    /// are read as zero.
    pub fn host_version(&self) -> Result<Version> {
        let raw = self.version.trim();
        let (core, rest) = match raw.find(|c: char| c == '-' || c == '+') {
            Some(idx) => raw.split_at(idx),
            None => (raw, ""),
        };

        let mut padded = core.to_string();
        for _ in core.split('.').count()..3 {
            padded.push_str(".0");
        }
        padded.push_str(rest);

        Version::parse(&padded).map_err(|e| SchemaError::InvalidVersion(format!("{raw}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("alfred_preferences", "/Users/crayons/Dropbox/Alfred.alfredpreferences"),
            ("alfred_preferences_localhash", "adbd4f66bc3ae8493832af61a41ee609b20d8705"),
            ("alfred_theme", "alfred.theme.yosemite"),
            ("alfred_theme_background", "rgba(255,255,255,0.98)"),
            ("alfred_theme_selection_background", "rgba(255,255,255,0.98)"),
            ("alfred_theme_subtext", "3"),
            ("alfred_version", "5.5"),
            ("alfred_version_build", "2257"),
            ("alfred_workflow_name", "Search Notes"),
            ("alfred_workflow_uid", "user.workflow.B0AC54EC-601C-479A-9428-01F9FD732959"),
        ]
    }

    #[test]
    fn test_base_record_has_no_bundle_storage() {
        let env = ScriptEnvironmentVariables::from_vars(base_vars()).unwrap();
        assert_eq!(env.workflow_name, "Search Notes");
        assert!(env.workflow_version.is_none());
        assert!(!env.is_debugging());
        assert!(env.bundle_storage().is_none());
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let mut vars = base_vars();
        vars.push(("HOME", "/Users/crayons"));
        vars.push(("PATH", "/usr/bin:/bin"));
        let env = ScriptEnvironmentVariables::from_vars(vars).unwrap();
        assert_eq!(env.to_vars().len(), ScriptEnvironmentVariables::REQUIRED_KEYS.len());
    }

    #[test]
    fn test_missing_required_variable() {
        let vars = base_vars()
            .into_iter()
            .filter(|(k, _)| *k != "alfred_theme_subtext");
        match ScriptEnvironmentVariables::from_vars(vars) {
            Err(SchemaError::MissingVariable { name }) => assert_eq!(name, "alfred_theme_subtext"),
            other => panic!("Expected MissingVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_flag_only_accepts_one() {
        let mut vars = base_vars();
        vars.push(("alfred_debug", "1"));
        let env = ScriptEnvironmentVariables::from_vars(vars).unwrap();
        assert_eq!(env.debug, Some(DebugFlag::Enabled));

        let mut vars = base_vars();
        vars.push(("alfred_debug", "true"));
        assert!(matches!(
            ScriptEnvironmentVariables::from_vars(vars),
            Err(SchemaError::InvalidVariable { .. })
        ));
    }

    #[test]
    fn test_host_version_padding() {
        let mut env = ScriptEnvironmentVariables::from_vars(base_vars()).unwrap();
        assert_eq!(env.host_version().unwrap(), Version::new(5, 5, 0));

        env.version = "4".to_string();
        assert_eq!(env.host_version().unwrap(), Version::new(4, 0, 0));

        env.version = "5.1.2-beta".to_string();
        let v = env.host_version().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (5, 1, 2));
        assert_eq!(v.pre.as_str(), "beta");

        env.version = "five".to_string();
        assert!(matches!(env.host_version(), Err(SchemaError::InvalidVersion(_))));
    }

    #[test]
    fn test_to_vars_preserves_order() {
        let mut vars = base_vars();
        vars.push(("alfred_workflow_data", "/tmp/data"));
        vars.push(("alfred_workflow_bundleid", "com.example.notes"));
        let env = ScriptEnvironmentVariables::from_vars(vars).unwrap();

        let keys: Vec<String> = env.to_vars().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], "alfred_preferences");
        assert_eq!(keys[keys.len() - 2], "alfred_workflow_bundleid");
        assert_eq!(keys[keys.len() - 1], "alfred_workflow_data");
    }

    #[test]
    fn test_keys_cover_required_and_optional() {
        let combined: Vec<&str> = ScriptEnvironmentVariables::REQUIRED_KEYS
            .into_iter()
            .chain(ScriptEnvironmentVariables::OPTIONAL_KEYS)
            .collect();
        assert_eq!(combined, ScriptEnvironmentVariables::KEYS);

        let mut vars = base_vars();
        vars.push(("alfred_debug", "1"));
        let env = ScriptEnvironmentVariables::from_vars(vars).unwrap();
        for (key, _) in env.to_vars() {
            assert!(ScriptEnvironmentVariables::KEYS.contains(&key.as_str()));
        }
    }
}
