//! Declarative description of a filesystem instance.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::attr::{AttrValue, AttributeProvider};
use crate::error::{FsError, Result};
use crate::name::Normalization;
use crate::path::PathSyntax;

pub const DEFAULT_BLOCK_SIZE: usize = 8192;
pub const DEFAULT_MAX_SIZE: u64 = 4 * 1024 * 1024 * 1024;
pub const DEFAULT_MAX_SYMLINK_DEPTH: usize = 40;

/// Optional engine features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Hard links.
    Links,
    SymbolicLinks,
    SecureDirectoryStream,
    FileChannel,
}

/// Configuration for one filesystem instance.
///
/// Presets mirror the common OS flavors; every option can be overridden
/// through the chainable setters before the filesystem is created.
#[derive(Clone)]
pub struct Config {
    pub(crate) path_syntax: PathSyntax,
    pub(crate) roots: Vec<String>,
    pub(crate) working_directory: String,
    pub(crate) name_canonical_normalization: Normalization,
    pub(crate) name_display_normalization: Normalization,
    pub(crate) case_insensitive_names: bool,
    pub(crate) path_equality_uses_canonical_form: bool,
    pub(crate) block_size: usize,
    pub(crate) max_size: u64,
    pub(crate) max_cache_size: Option<u64>,
    pub(crate) attribute_views: BTreeSet<String>,
    pub(crate) attribute_providers: Vec<Arc<dyn AttributeProvider>>,
    pub(crate) default_attribute_values: HashMap<String, AttrValue>,
    pub(crate) features: BTreeSet<Feature>,
    pub(crate) max_symlink_depth: usize,
}

impl Config {
    fn base(path_syntax: PathSyntax, root: &str, working_directory: &str) -> Config {
        Config {
            path_syntax,
            roots: vec![root.to_owned()],
            working_directory: working_directory.to_owned(),
            name_canonical_normalization: Normalization::None,
            name_display_normalization: Normalization::None,
            case_insensitive_names: false,
            path_equality_uses_canonical_form: false,
            block_size: DEFAULT_BLOCK_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            max_cache_size: None,
            attribute_views: BTreeSet::from(["basic".to_owned()]),
            attribute_providers: Vec::new(),
            default_attribute_values: HashMap::new(),
            features: BTreeSet::new(),
            max_symlink_depth: DEFAULT_MAX_SYMLINK_DEPTH,
        }
    }

    /// Unix flavor: single root `/`, case-sensitive names, symlinks and
    /// hard links enabled.
    pub fn unix() -> Config {
        let mut config = Config::base(PathSyntax::Unix, "/", "/work");
        config.features = BTreeSet::from([
            Feature::Links,
            Feature::SymbolicLinks,
            Feature::SecureDirectoryStream,
            Feature::FileChannel,
        ]);
        config
    }

    /// Mac flavor: unix layout with NFC display forms, NFD canonical forms
    /// and case-insensitive lookup.
    pub fn osx() -> Config {
        let mut config = Config::unix();
        config.name_display_normalization = Normalization::Nfc;
        config.name_canonical_normalization = Normalization::Nfd;
        config.case_insensitive_names = true;
        config
    }

    /// Windows flavor: drive root `C:`, backslash rendering,
    /// case-insensitive names.
    pub fn windows() -> Config {
        let mut config = Config::base(PathSyntax::Windows, "C:\\", "C:\\work");
        config.case_insensitive_names = true;
        config.features =
            BTreeSet::from([Feature::Links, Feature::SymbolicLinks, Feature::FileChannel]);
        config
    }

    pub fn path_syntax(mut self, syntax: PathSyntax) -> Config {
        self.path_syntax = syntax;
        self
    }

    pub fn roots<I, S>(mut self, roots: I) -> Config
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn working_directory(mut self, path: &str) -> Config {
        self.working_directory = path.to_owned();
        self
    }

    pub fn block_size(mut self, bytes: usize) -> Config {
        self.block_size = bytes;
        self
    }

    /// Hard cap on total bytes held by regular files.
    pub fn max_size(mut self, bytes: u64) -> Config {
        self.max_size = bytes;
        self
    }

    /// Bytes retained on the block pool free list; defaults to `max_size`.
    pub fn max_cache_size(mut self, bytes: u64) -> Config {
        self.max_cache_size = Some(bytes);
        self
    }

    pub fn name_canonical_normalization(mut self, form: Normalization) -> Config {
        self.name_canonical_normalization = form;
        self
    }

    pub fn name_display_normalization(mut self, form: Normalization) -> Config {
        self.name_display_normalization = form;
        self
    }

    pub fn case_insensitive_names(mut self, enabled: bool) -> Config {
        self.case_insensitive_names = enabled;
        self
    }

    pub fn path_equality_uses_canonical_form(mut self, enabled: bool) -> Config {
        self.path_equality_uses_canonical_form = enabled;
        self
    }

    pub fn attribute_views<I, S>(mut self, views: I) -> Config
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_views = views.into_iter().map(Into::into).collect();
        if !self.attribute_views.contains("basic") {
            self.attribute_views.insert("basic".to_owned());
        }
        self
    }

    /// Register a user-supplied attribute provider; its view is enabled by
    /// its presence.
    pub fn attribute_provider(mut self, provider: Arc<dyn AttributeProvider>) -> Config {
        self.attribute_providers.push(provider);
        self
    }

    /// Initial value applied to every new file, keyed `"view:attr"`.
    pub fn default_attribute_value(mut self, spec: &str, value: AttrValue) -> Config {
        self.default_attribute_values.insert(spec.to_owned(), value);
        self
    }

    pub fn features<I>(mut self, features: I) -> Config
    where
        I: IntoIterator<Item = Feature>,
    {
        self.features = features.into_iter().collect();
        self
    }

    pub fn max_symlink_depth(mut self, depth: usize) -> Config {
        self.max_symlink_depth = depth;
        self
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub(crate) fn effective_cache_size(&self) -> u64 {
        self.max_cache_size.unwrap_or(self.max_size)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(FsError::InvalidArgument("block size must be positive".to_owned()));
        }
        if self.roots.is_empty() {
            return Err(FsError::InvalidArgument("at least one root is required".to_owned()));
        }
        Ok(())
    }

    /// Load configuration overrides from a TOML document on top of the
    /// preset named by its `os` key (default `unix`).
    pub fn from_toml(text: &str) -> Result<Config> {
        let doc: ConfigDoc = toml::from_str(text)
            .map_err(|err| FsError::InvalidArgument(format!("bad config: {err}")))?;
        let mut config = match doc.os.as_deref() {
            None | Some("unix") => Config::unix(),
            Some("osx") => Config::osx(),
            Some("windows") => Config::windows(),
            Some(other) => {
                return Err(FsError::InvalidArgument(format!("unknown os flavor '{other}'")))
            }
        };
        if let Some(roots) = doc.roots {
            config.roots = roots;
        }
        if let Some(dir) = doc.working_directory {
            config.working_directory = dir;
        }
        if let Some(bytes) = doc.block_size {
            config.block_size = bytes;
        }
        if let Some(bytes) = doc.max_size {
            config.max_size = bytes;
        }
        if let Some(bytes) = doc.max_cache_size {
            config.max_cache_size = Some(bytes);
        }
        if let Some(views) = doc.attribute_views {
            config = config.attribute_views(views);
        }
        if let Some(features) = doc.features {
            config.features = features.into_iter().collect();
        }
        if let Some(flag) = doc.case_insensitive_names {
            config.case_insensitive_names = flag;
        }
        if let Some(form) = doc.name_canonical_normalization {
            config.name_canonical_normalization = form;
        }
        if let Some(form) = doc.name_display_normalization {
            config.name_display_normalization = form;
        }
        if let Some(flag) = doc.path_equality_uses_canonical_form {
            config.path_equality_uses_canonical_form = flag;
        }
        if let Some(depth) = doc.max_symlink_depth {
            config.max_symlink_depth = depth;
        }
        if let Some(values) = doc.default_attribute_values {
            for (spec, value) in values {
                config.default_attribute_values.insert(spec, value.into());
            }
        }
        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("path_syntax", &self.path_syntax)
            .field("roots", &self.roots)
            .field("working_directory", &self.working_directory)
            .field("block_size", &self.block_size)
            .field("max_size", &self.max_size)
            .field("attribute_views", &self.attribute_views)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
struct ConfigDoc {
    os: Option<String>,
    roots: Option<Vec<String>>,
    working_directory: Option<String>,
    block_size: Option<usize>,
    max_size: Option<u64>,
    max_cache_size: Option<u64>,
    attribute_views: Option<Vec<String>>,
    features: Option<Vec<Feature>>,
    case_insensitive_names: Option<bool>,
    name_canonical_normalization: Option<Normalization>,
    name_display_normalization: Option<Normalization>,
    path_equality_uses_canonical_form: Option<bool>,
    max_symlink_depth: Option<usize>,
    default_attribute_values: Option<HashMap<String, TomlValue>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TomlValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl From<TomlValue> for AttrValue {
    fn from(value: TomlValue) -> AttrValue {
        match value {
            TomlValue::Bool(flag) => AttrValue::Bool(flag),
            TomlValue::Int(v) => AttrValue::Long(v),
            TomlValue::String(s) => AttrValue::String(s),
        }
    }
}
