//! Immutable path values over a configurable syntax.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{FsError, Result};
use crate::name::{Name, NameRegistry, Normalization};

/// Parsing and rendering rules for one path flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSyntax {
    Unix,
    Windows,
}

impl PathSyntax {
    pub fn separator(self) -> char {
        match self {
            PathSyntax::Unix => '/',
            PathSyntax::Windows => '\\',
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            PathSyntax::Unix => c == '/',
            // Windows tools accept both forms on input.
            PathSyntax::Windows => c == '\\' || c == '/',
        }
    }
}

/// Shared context behind every path of one filesystem instance: syntax,
/// name interner and the configured equality policy.
#[derive(Debug)]
pub struct PathCtx {
    syntax: PathSyntax,
    names: NameRegistry,
    equality_canonical: bool,
}

impl PathCtx {
    pub fn new(
        syntax: PathSyntax,
        canonical: Normalization,
        display: Normalization,
        case_insensitive: bool,
        equality_canonical: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            syntax,
            names: NameRegistry::new(canonical, display, case_insensitive),
            equality_canonical,
        })
    }

    pub(crate) fn intern(&self, raw: &str) -> Name {
        self.names.name(raw)
    }

    /// Parse a path string into an immutable path value.
    pub fn parse(self: &Arc<Self>, raw: &str) -> Result<MemPath> {
        let (root, rest) = self.split_root(raw)?;
        let mut names = Vec::new();
        for segment in rest.split(|c| self.syntax.is_separator(c)) {
            if segment.is_empty() {
                continue;
            }
            names.push(self.names.name(segment));
        }
        Ok(MemPath { ctx: Arc::clone(self), root, names })
    }

    fn split_root<'a>(&self, raw: &'a str) -> Result<(Option<Name>, &'a str)> {
        match self.syntax {
            PathSyntax::Unix => {
                if let Some(rest) = raw.strip_prefix('/') {
                    Ok((Some(self.names.name("/")), rest))
                } else {
                    Ok((None, raw))
                }
            }
            PathSyntax::Windows => {
                let bytes = raw.as_bytes();
                if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
                    let rest = &raw[2..];
                    if let Some(c) = rest.chars().next() {
                        if !self.syntax.is_separator(c) {
                            return Err(FsError::InvalidArgument(format!(
                                "bad path syntax: '{raw}'"
                            )));
                        }
                    }
                    Ok((Some(self.names.name(&raw[..2])), rest))
                } else if raw.chars().next().is_some_and(|c| self.syntax.is_separator(c)) {
                    Err(FsError::InvalidArgument(format!(
                        "root-relative path has no drive: '{raw}'"
                    )))
                } else {
                    Ok((None, raw))
                }
            }
        }
    }
}

/// An immutable sequence of names with an optional root.
#[derive(Clone)]
pub struct MemPath {
    ctx: Arc<PathCtx>,
    root: Option<Name>,
    names: Vec<Name>,
}

impl MemPath {
    pub fn is_absolute(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Name> {
        self.root.as_ref()
    }

    pub fn file_name(&self) -> Option<&Name> {
        self.names.last()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, index: usize) -> Option<&Name> {
        self.names.get(index)
    }

    pub(crate) fn names(&self) -> &[Name] {
        &self.names
    }

    /// Parent path, or `None` for a root or a single-name relative path.
    pub fn parent(&self) -> Option<MemPath> {
        if self.names.is_empty() {
            return None;
        }
        if self.root.is_none() && self.names.len() == 1 {
            return None;
        }
        Some(MemPath {
            ctx: Arc::clone(&self.ctx),
            root: self.root.clone(),
            names: self.names[..self.names.len() - 1].to_vec(),
        })
    }

    /// Relative path over `names[from..to]`.
    pub fn subpath(&self, from: usize, to: usize) -> Result<MemPath> {
        if from > to || to > self.names.len() {
            return Err(FsError::InvalidArgument(format!("bad subpath range {from}..{to}")));
        }
        Ok(MemPath {
            ctx: Arc::clone(&self.ctx),
            root: None,
            names: self.names[from..to].to_vec(),
        })
    }

    /// Resolve `other` against this path.
    pub fn resolve(&self, other: &MemPath) -> MemPath {
        if other.is_absolute() {
            return other.clone();
        }
        if other.names.is_empty() {
            return self.clone();
        }
        let mut names = self.names.clone();
        names.extend(other.names.iter().cloned());
        MemPath { ctx: Arc::clone(&self.ctx), root: self.root.clone(), names }
    }

    /// Parse `raw` and resolve it against this path.
    pub fn join(&self, raw: &str) -> Result<MemPath> {
        Ok(self.resolve(&self.ctx.parse(raw)?))
    }

    /// Construct the relative path from `self` to `other`.
    ///
    /// Both paths must agree on absoluteness (and on the root, when
    /// absolute).
    pub fn relativize(&self, other: &MemPath) -> Result<MemPath> {
        let roots_agree = match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        if !roots_agree {
            return Err(FsError::InvalidArgument(format!(
                "cannot relativize '{other}' against '{self}'"
            )));
        }
        let common = self
            .names
            .iter()
            .zip(other.names.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let mut names = Vec::new();
        for _ in common..self.names.len() {
            names.push(self.ctx.intern(".."));
        }
        names.extend(other.names[common..].iter().cloned());
        Ok(MemPath { ctx: Arc::clone(&self.ctx), root: None, names })
    }

    /// Remove `.` segments and collapse `..` against prior normal segments
    /// without touching the filesystem.
    pub fn normalize(&self) -> MemPath {
        let mut names: Vec<Name> = Vec::with_capacity(self.names.len());
        for name in &self.names {
            if is_dot(name) {
                continue;
            }
            if is_dot_dot(name) {
                match names.last() {
                    Some(last) if !is_dot_dot(last) => {
                        names.pop();
                        continue;
                    }
                    None if self.root.is_some() => continue,
                    _ => {}
                }
            }
            names.push(name.clone());
        }
        MemPath { ctx: Arc::clone(&self.ctx), root: self.root.clone(), names }
    }

    /// Absolute form of this path, resolved against `cwd` when relative.
    pub fn to_absolute(&self, cwd: &MemPath) -> MemPath {
        if self.is_absolute() {
            self.clone()
        } else {
            cwd.resolve(self)
        }
    }

    fn render(&self) -> String {
        let sep = self.ctx.syntax.separator();
        let mut out = String::new();
        if let Some(root) = &self.root {
            out.push_str(root.display());
            if self.ctx.syntax == PathSyntax::Windows {
                out.push(sep);
            }
        }
        for (index, name) in self.names.iter().enumerate() {
            if index > 0 {
                out.push(sep);
            }
            out.push_str(name.display());
        }
        out
    }
}

pub(crate) fn is_dot(name: &Name) -> bool {
    name.display() == "."
}

pub(crate) fn is_dot_dot(name: &Name) -> bool {
    name.display() == ".."
}

impl PartialEq for MemPath {
    fn eq(&self, other: &MemPath) -> bool {
        if self.ctx.equality_canonical {
            self.root == other.root && self.names == other.names
        } else {
            let roots = match (&self.root, &other.root) {
                (None, None) => true,
                (Some(a), Some(b)) => a.display() == b.display(),
                _ => false,
            };
            roots
                && self.names.len() == other.names.len()
                && self
                    .names
                    .iter()
                    .zip(other.names.iter())
                    .all(|(a, b)| a.display() == b.display())
        }
    }
}

impl Eq for MemPath {}

impl Hash for MemPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.is_some().hash(state);
        if self.ctx.equality_canonical {
            if let Some(root) = &self.root {
                root.hash(state);
            }
            for name in &self.names {
                name.hash(state);
            }
        } else {
            if let Some(root) = &self.root {
                root.display().hash(state);
            }
            for name in &self.names {
                name.display().hash(state);
            }
        }
    }
}

impl fmt::Display for MemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for MemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemPath({})", self.render())
    }
}
