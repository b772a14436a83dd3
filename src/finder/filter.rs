//! Entry filtering functionality
//!
//! This module provides the predicates of a find expression: `-user`,
//! `-name` and `-type`.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use glob::Pattern;
use once_cell::unsync::OnceCell;

use super::entry::{EntryKind, EntryMetadata};
use super::identity::IdentityResolver;
use crate::errors::{FindError, FindResult};

/// Numeric owner strings this long or longer are looked up as names.
const MAX_NUMERIC_OWNER_LEN: usize = 19;

/// Everything a filter may look at for one visited entry
pub struct EntryContext<'a> {
    /// Path as it will be printed
    pub path: &'a Path,
    pub metadata: &'a EntryMetadata,
    pub identity: &'a dyn IdentityResolver,
}

/// Trait for entry filters
pub trait FileFilter {
    /// Check if the entry matches the filter
    fn matches(&self, entry: &EntryContext<'_>) -> FindResult<bool>;

    /// Get the filter description
    fn description(&self) -> String;
}

/// Filter for matching the owning user
#[derive(Debug, Clone)]
pub struct UserFilter {
    owner: String,
    /// Owner id, resolved on first evaluation
    uid: OnceCell<u64>,
}

impl UserFilter {
    /// Create a new UserFilter for a user name or numeric id.
    ///
    /// Nothing is resolved here; unknown names and the id `0` fail when the
    /// filter is first evaluated. A successful lookup is reused for every
    /// later entry.
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            uid: OnceCell::new(),
        }
    }

    fn is_numeric(&self) -> bool {
        self.owner.len() < MAX_NUMERIC_OWNER_LEN && self.owner.bytes().all(|b| b.is_ascii_digit())
    }

    fn resolve(&self, identity: &dyn IdentityResolver) -> FindResult<u64> {
        if self.is_numeric() {
            // An empty or all-zero id is rejected, root has to be named
            return self
                .owner
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .ok_or_else(|| FindError::InvalidUserId(self.owner.clone()));
        }

        identity
            .user_id(&self.owner)
            .map(u64::from)
            .ok_or_else(|| FindError::UnknownUser(self.owner.clone()))
    }
}

impl FileFilter for UserFilter {
    fn matches(&self, entry: &EntryContext<'_>) -> FindResult<bool> {
        let uid = self.uid.get_or_try_init(|| self.resolve(entry.identity))?;
        Ok(*uid == u64::from(entry.metadata.uid))
    }

    fn description(&self) -> String {
        format!("owned by '{}'", self.owner)
    }
}

/// Filter for matching entry names against a pattern
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Option<Pattern>,
    /// The same pattern over bytes, one char per byte, for names that are
    /// not valid UTF-8
    byte_pattern: Option<Pattern>,
    original_pattern: String,
}

impl NameFilter {
    /// Create a new NameFilter with the given pattern.
    ///
    /// Runs of `*` count as a single `*`. A pattern that is still not a
    /// valid glob (e.g. an unmatched `[`) matches its own text literally.
    pub fn new(pattern: &str) -> Self {
        let collapsed = collapse_stars(pattern);
        let compiled_pattern = match Pattern::new(&collapsed) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                log::debug!("Pattern '{}' is not a valid glob ({}), matching literally", pattern, e);
                None
            }
        };
        let byte_pattern = compiled_pattern
            .as_ref()
            .and_then(|_| Pattern::new(&bytes_as_chars(collapsed.as_bytes())).ok());

        Self {
            pattern: compiled_pattern,
            byte_pattern,
            original_pattern: pattern.to_string(),
        }
    }

    /// Match a bare name against the pattern
    pub fn matches_name(&self, name: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.matches(name),
            None => self.original_pattern == name,
        }
    }

    /// Match a bare name given as raw bytes.
    ///
    /// UTF-8 names are matched by character. Anything else is matched byte
    /// by byte, so `?` and bracket classes see each undecodable byte.
    pub fn matches_bytes(&self, name: &[u8]) -> bool {
        if let Ok(name) = std::str::from_utf8(name) {
            return self.matches_name(name);
        }
        match &self.byte_pattern {
            Some(pattern) => pattern.matches(&bytes_as_chars(name)),
            None => self.original_pattern.as_bytes() == name,
        }
    }
}

impl FileFilter for NameFilter {
    fn matches(&self, entry: &EntryContext<'_>) -> FindResult<bool> {
        let name = basename(entry.path);
        Ok(self.matches_bytes(name.as_bytes()))
    }

    fn description(&self) -> String {
        format!("name matches '{}'", self.original_pattern)
    }
}

/// Filter for matching entry types
#[derive(Debug, Clone, Copy)]
pub struct TypeFilter {
    kind: EntryKind,
}

impl TypeFilter {
    /// Create a new TypeFilter with the given type code
    pub fn new(type_code: &str) -> FindResult<Self> {
        Ok(Self::from_kind(EntryKind::from_type_code(type_code)?))
    }

    pub fn from_kind(kind: EntryKind) -> Self {
        Self { kind }
    }
}

impl FileFilter for TypeFilter {
    fn matches(&self, entry: &EntryContext<'_>) -> FindResult<bool> {
        Ok(entry.metadata.kind == Some(self.kind))
    }

    fn description(&self) -> String {
        match self.kind {
            EntryKind::BlockDevice => "is a block device".to_string(),
            EntryKind::CharDevice => "is a character device".to_string(),
            EntryKind::Directory => "is a directory".to_string(),
            EntryKind::Fifo => "is a named pipe".to_string(),
            EntryKind::File => "is a regular file".to_string(),
            EntryKind::SymbolicLink => "is a symbolic link".to_string(),
            EntryKind::Socket => "is a socket".to_string(),
        }
    }
}

/// One predicate of a find expression
#[derive(Debug, Clone)]
pub enum Filter {
    User(UserFilter),
    Name(NameFilter),
    Type(TypeFilter),
}

impl FileFilter for Filter {
    fn matches(&self, entry: &EntryContext<'_>) -> FindResult<bool> {
        match self {
            Filter::User(filter) => filter.matches(entry),
            Filter::Name(filter) => filter.matches(entry),
            Filter::Type(filter) => filter.matches(entry),
        }
    }

    fn description(&self) -> String {
        match self {
            Filter::User(filter) => filter.description(),
            Filter::Name(filter) => filter.description(),
            Filter::Type(filter) => filter.description(),
        }
    }
}

/// `a**b` means the same as `a*b` within a single name, but `glob` only
/// accepts `**` as a whole path component.
fn collapse_stars(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Widen every byte to the char with the same value (Latin-1)
fn bytes_as_chars(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Final component of a path, after stripping trailing slashes.
///
/// `/` stays `/`, and `.` or `..` are returned as they are.
pub fn basename(path: &Path) -> &OsStr {
    let bytes = path.as_os_str().as_bytes();
    match bytes.iter().rposition(|&b| b != b'/') {
        None if bytes.is_empty() => OsStr::new("."),
        None => OsStr::new("/"),
        Some(end) => {
            let start = bytes[..end]
                .iter()
                .rposition(|&b| b == b'/')
                .map_or(0, |slash| slash + 1);
            OsStr::from_bytes(&bytes[start..=end])
        }
    }
}
