//! Attribute views, providers and the dispatch service.

pub mod basic;
pub mod dos;
pub mod owner;
pub mod posix;
pub mod unix;
pub mod user;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use filetime::FileTime;
use indexmap::IndexMap;

use crate::error::{FsError, Result};
use crate::file::{File, FileId};

/// Value domain of file attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    String(String),
    Time(FileTime),
    Bytes(Vec<u8>),
    Permissions(BTreeSet<PosixPermission>),
    User(UserPrincipal),
    Group(GroupPrincipal),
}

impl AttrValue {
    /// Lossless widening accepted wherever a long is stored.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(i64::from(*v)),
            AttrValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Long(_) => "long",
            AttrValue::String(_) => "string",
            AttrValue::Time(_) => "time",
            AttrValue::Bytes(_) => "bytes",
            AttrValue::Permissions(_) => "permissions",
            AttrValue::User(_) => "user",
            AttrValue::Group(_) => "group",
        }
    }
}

/// Named owner principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserPrincipal(pub String);

impl fmt::Display for UserPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named group principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPrincipal(pub String);

impl fmt::Display for GroupPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the nine POSIX permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PosixPermission {
    OwnerRead,
    OwnerWrite,
    OwnerExecute,
    GroupRead,
    GroupWrite,
    GroupExecute,
    OthersRead,
    OthersWrite,
    OthersExecute,
}

impl PosixPermission {
    const ALL: [PosixPermission; 9] = [
        PosixPermission::OwnerRead,
        PosixPermission::OwnerWrite,
        PosixPermission::OwnerExecute,
        PosixPermission::GroupRead,
        PosixPermission::GroupWrite,
        PosixPermission::GroupExecute,
        PosixPermission::OthersRead,
        PosixPermission::OthersWrite,
        PosixPermission::OthersExecute,
    ];

    fn bit(self) -> u32 {
        match self {
            PosixPermission::OwnerRead => 0o400,
            PosixPermission::OwnerWrite => 0o200,
            PosixPermission::OwnerExecute => 0o100,
            PosixPermission::GroupRead => 0o040,
            PosixPermission::GroupWrite => 0o020,
            PosixPermission::GroupExecute => 0o010,
            PosixPermission::OthersRead => 0o004,
            PosixPermission::OthersWrite => 0o002,
            PosixPermission::OthersExecute => 0o001,
        }
    }

    /// Permission set from mode bits.
    pub fn from_mode(mode: u32) -> BTreeSet<PosixPermission> {
        Self::ALL.iter().copied().filter(|p| mode & p.bit() != 0).collect()
    }

    /// Mode bits from a permission set.
    pub fn to_mode(perms: &BTreeSet<PosixPermission>) -> u32 {
        perms.iter().fold(0, |mode, p| mode | p.bit())
    }

    /// Parse an `rwxr-x---` style string.
    pub fn from_string(s: &str) -> Result<BTreeSet<PosixPermission>> {
        let bytes = s.as_bytes();
        if bytes.len() != 9 {
            return Err(FsError::InvalidArgument(format!("bad permission string: '{s}'")));
        }
        let mut perms = BTreeSet::new();
        for (index, (&expected, perm)) in
            b"rwxrwxrwx".iter().zip(Self::ALL.iter()).enumerate()
        {
            match bytes[index] {
                b'-' => {}
                c if c == expected => {
                    perms.insert(*perm);
                }
                _ => {
                    return Err(FsError::InvalidArgument(format!("bad permission string: '{s}'")));
                }
            }
        }
        Ok(perms)
    }

    /// Render a permission set as `rwxr-x---`.
    pub fn to_display(perms: &BTreeSet<PosixPermission>) -> String {
        b"rwxrwxrwx"
            .iter()
            .zip(Self::ALL.iter())
            .map(|(&c, p)| if perms.contains(p) { c as char } else { '-' })
            .collect()
    }
}

/// Parsed `view:attr` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    pub view: String,
    pub attr: String,
}

/// Split a spec string; `basic` is assumed when the view is omitted.
fn split_spec(spec: &str) -> Result<AttrSpec> {
    let mut parts = spec.split(':');
    let first = parts.next().unwrap_or("");
    let (view, attr) = match parts.next() {
        Some(second) => (first, second),
        None => ("basic", first),
    };
    if parts.next().is_some() || view.is_empty() || attr.is_empty() {
        return Err(FsError::InvalidFormat(spec.to_owned()));
    }
    Ok(AttrSpec { view: view.to_owned(), attr: attr.to_owned() })
}

/// Parse a single-attribute spec; commas and wildcards are not allowed.
pub(crate) fn parse_single(spec: &str) -> Result<AttrSpec> {
    let parsed = split_spec(spec)?;
    if parsed.attr.contains(',') || parsed.attr == "*" {
        return Err(FsError::InvalidFormat(spec.to_owned()));
    }
    Ok(parsed)
}

/// Parse a read-all spec: `view:a,b,c` or `view:*`.
pub(crate) fn parse_list(spec: &str) -> Result<(String, Vec<String>)> {
    let parsed = split_spec(spec)?;
    let attrs: Vec<String> = parsed.attr.split(',').map(str::to_owned).collect();
    if attrs.iter().any(|a| a.is_empty()) {
        return Err(FsError::InvalidFormat(spec.to_owned()));
    }
    if attrs.len() > 1 && attrs.iter().any(|a| a == "*") {
        return Err(FsError::InvalidAttribute(spec.to_owned()));
    }
    Ok((parsed.view, attrs))
}

/// One attribute view: a named namespace of attributes, optionally
/// answering for inherited views as well.
pub trait AttributeProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Views whose attributes this provider also answers.
    fn inherits(&self) -> &[&str] {
        &[]
    }

    /// Readable attribute names, for wildcard reads.
    fn list(&self, file: &File) -> Vec<String>;

    fn supports(&self, attr: &str) -> bool;

    fn settable_on_create(&self, attr: &str) -> bool {
        let _ = attr;
        false
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue>;

    fn set(&self, file: &File, attr: &str, value: AttrValue, on_create: bool) -> Result<()>;

    /// Populate this provider's defaults on a newly created file.
    fn initial(&self, file: &File) {
        let _ = file;
    }
}

/// Registry of enabled attribute providers, keyed by view name.
pub struct AttributeService {
    providers: Vec<Arc<dyn AttributeProvider>>,
    by_view: HashMap<String, Arc<dyn AttributeProvider>>,
}

impl AttributeService {
    /// Build the registry for the requested view names. Inherited views are
    /// enabled transitively; `basic` is always present.
    pub fn new(
        views: &BTreeSet<String>,
        defaults: &HashMap<String, AttrValue>,
        extra: &[Arc<dyn AttributeProvider>],
    ) -> Result<AttributeService> {
        let mut requested: Vec<String> = views.iter().cloned().collect();
        if !requested.iter().any(|v| v == "basic") {
            requested.insert(0, "basic".to_owned());
        }
        // User-supplied providers are enabled by their presence.
        for provider in extra {
            if !requested.iter().any(|v| v == provider.name()) {
                requested.push(provider.name().to_owned());
            }
        }

        let mut service =
            AttributeService { providers: Vec::new(), by_view: HashMap::new() };
        let mut pending = requested;
        while let Some(view) = pending.pop() {
            if service.by_view.contains_key(&view) {
                continue;
            }
            let provider: Arc<dyn AttributeProvider> = match view.as_str() {
                "basic" => Arc::new(basic::BasicProvider),
                "owner" => Arc::new(owner::OwnerProvider::new(defaults)),
                "posix" => Arc::new(posix::PosixProvider::new(defaults)),
                "unix" => Arc::new(unix::UnixProvider::new()),
                "dos" => Arc::new(dos::DosProvider),
                "user" => Arc::new(user::UserProvider),
                other => match extra.iter().find(|p| p.name() == other) {
                    Some(provider) => Arc::clone(provider),
                    None => {
                        return Err(FsError::Unsupported(format!("unknown attribute view '{other}'")))
                    }
                },
            };
            for inherited in provider.inherits() {
                pending.push((*inherited).to_owned());
            }
            service.by_view.insert(view, Arc::clone(&provider));
            service.providers.push(provider);
        }
        // Stable declaration order: basic first, then alphabetical.
        service.providers.sort_by(|a, b| {
            let rank = |p: &Arc<dyn AttributeProvider>| (p.name() != "basic", p.name().to_owned());
            rank(a).cmp(&rank(b))
        });
        Ok(service)
    }

    pub fn supports_view(&self, view: &str) -> bool {
        self.by_view.contains_key(view)
    }

    fn provider(&self, view: &str) -> Result<&Arc<dyn AttributeProvider>> {
        self.by_view
            .get(view)
            .ok_or_else(|| FsError::Unsupported(format!("attribute view '{view}' not enabled")))
    }

    /// The provider plus every provider it inherits from, transitively, in
    /// declaration order.
    fn chain(&self, view: &str) -> Result<Vec<&Arc<dyn AttributeProvider>>> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut pending = vec![view.to_owned()];
        while let Some(view) = pending.pop() {
            if !seen.insert(view.clone()) {
                continue;
            }
            let provider = self.provider(&view)?;
            for inherited in provider.inherits() {
                pending.push((*inherited).to_owned());
            }
            chain.push(provider);
        }
        Ok(chain)
    }

    /// Read one attribute; the view defaults to `basic` when omitted.
    pub fn get(&self, file: &File, spec: &str) -> Result<AttrValue> {
        let parsed = parse_single(spec)?;
        for provider in self.chain(&parsed.view)? {
            if provider.supports(&parsed.attr) {
                return provider
                    .get(file, &parsed.attr)
                    .ok_or_else(|| FsError::InvalidAttribute(spec.to_owned()));
            }
        }
        Err(FsError::InvalidAttribute(spec.to_owned()))
    }

    /// Set one attribute, dispatching through the inheritance chain.
    pub fn set(&self, file: &File, spec: &str, value: AttrValue, on_create: bool) -> Result<()> {
        let parsed = parse_single(spec)?;
        for provider in self.chain(&parsed.view)? {
            if provider.supports(&parsed.attr) {
                if on_create && !provider.settable_on_create(&parsed.attr) {
                    return Err(FsError::Unsupported(format!(
                        "attribute '{spec}' cannot be set at creation"
                    )));
                }
                return provider.set(file, &parsed.attr, value, on_create);
            }
        }
        Err(FsError::InvalidAttribute(spec.to_owned()))
    }

    /// Read several attributes (`view:a,b,c`) or all of a view (`view:*`),
    /// preserving declaration order.
    pub fn read_all(&self, file: &File, spec: &str) -> Result<IndexMap<String, AttrValue>> {
        let (view, attrs) = parse_list(spec)?;
        let chain = self.chain(&view)?;
        let mut out = IndexMap::new();
        if attrs.len() == 1 && attrs[0] == "*" {
            for provider in &chain {
                for attr in provider.list(file) {
                    if let Some(value) = provider.get(file, &attr) {
                        out.entry(attr).or_insert(value);
                    }
                }
            }
            return Ok(out);
        }
        for attr in attrs {
            let mut found = false;
            for provider in &chain {
                if provider.supports(&attr) {
                    if let Some(value) = provider.get(file, &attr) {
                        out.insert(attr.clone(), value);
                    }
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(FsError::InvalidAttribute(format!("{view}:{attr}")));
            }
        }
        Ok(out)
    }

    /// Provider defaults followed by on-create overrides.
    pub fn set_initial(&self, file: &File, overrides: &[(String, AttrValue)]) -> Result<()> {
        for provider in &self.providers {
            provider.initial(file);
        }
        for (spec, value) in overrides {
            self.set(file, spec, value.clone(), true)?;
        }
        Ok(())
    }
}

/// The nine `basic` attributes as one typed snapshot.
#[derive(Debug, Clone)]
pub struct BasicAttributes {
    pub file_key: FileId,
    pub size: u64,
    pub is_regular_file: bool,
    pub is_directory: bool,
    pub is_symbolic_link: bool,
    pub is_other: bool,
    pub created: FileTime,
    pub modified: FileTime,
    pub accessed: FileTime,
}

impl BasicAttributes {
    pub(crate) fn of(file: &File) -> BasicAttributes {
        let (created, modified, accessed) = {
            let header = file.header();
            (header.created, header.modified, header.accessed)
        };
        BasicAttributes {
            file_key: file.id(),
            size: file.size(),
            is_regular_file: file.is_regular(),
            is_directory: file.is_directory(),
            is_symbolic_link: file.is_symlink(),
            is_other: false,
            created,
            modified,
            accessed,
        }
    }
}

/// Owner, group and permissions on top of the basic snapshot.
#[derive(Debug, Clone)]
pub struct PosixAttributes {
    pub basic: BasicAttributes,
    pub owner: UserPrincipal,
    pub group: GroupPrincipal,
    pub permissions: BTreeSet<PosixPermission>,
}

impl PosixAttributes {
    pub(crate) fn of(file: &File) -> PosixAttributes {
        let basic = BasicAttributes::of(file);
        let header = file.header();
        let owner = match header.attrs.get("owner:owner") {
            Some(AttrValue::User(user)) => user.clone(),
            _ => UserPrincipal("user".to_owned()),
        };
        let group = match header.attrs.get("posix:group") {
            Some(AttrValue::Group(group)) => group.clone(),
            _ => GroupPrincipal("group".to_owned()),
        };
        let permissions = match header.attrs.get("posix:permissions") {
            Some(AttrValue::Permissions(perms)) => perms.clone(),
            _ => PosixPermission::from_mode(0o644),
        };
        drop(header);
        PosixAttributes { basic, owner, group, permissions }
    }
}
