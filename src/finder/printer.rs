//! Action output
//!
//! This module writes what `-print` and `-ls` produce, plus the one-line
//! notices for entries skipped because of permission errors.

use std::fmt;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use chrono::{Local, TimeZone, Utc};

use super::chain::Action;
use super::entry::EntryMetadata;
use super::identity::IdentityResolver;
use crate::errors::FindResult;

/// strftime format of the modification time column, e.g. `Jan  5 09:03`
const TIME_FORMAT: &str = "%b %e %H:%M";

/// Writes action output for visited entries
pub struct Printer<'a, W: Write> {
    out: W,
    identity: &'a dyn IdentityResolver,
    utc_times: bool,
}

impl<'a, W: Write> Printer<'a, W> {
    pub fn new(out: W, identity: &'a dyn IdentityResolver, utc_times: bool) -> Self {
        Self {
            out,
            identity,
            utc_times,
        }
    }

    /// Run one action for an entry
    pub fn dispatch(&mut self, action: Action, path: &Path, metadata: &EntryMetadata) -> FindResult<()> {
        match action {
            Action::Print => self.print_path(path),
            Action::List => self.print_listing(path, metadata),
        }
    }

    pub fn print_path(&mut self, path: &Path) -> FindResult<()> {
        self.out.write_all(path.as_os_str().as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn print_listing(&mut self, path: &Path, metadata: &EntryMetadata) -> FindResult<()> {
        let mtime = format_mtime(metadata.mtime, self.utc_times);
        let columns = listing_columns(metadata, self.identity, &mtime);
        self.out.write_all(columns.as_bytes())?;
        self.print_path(path)
    }

    /// Write a notice line to the same stream as the results
    pub fn notice(&mut self, message: fmt::Arguments<'_>) -> FindResult<()> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub fn flush(&mut self) -> FindResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Every `-ls` column up to and including the space before the path.
///
/// Owner and group fall back to the numeric id when they cannot be resolved.
pub fn listing_columns(metadata: &EntryMetadata, identity: &dyn IdentityResolver, mtime: &str) -> String {
    let owner = identity
        .user_name(metadata.uid)
        .unwrap_or_else(|| metadata.uid.to_string());
    let group = identity
        .group_name(metadata.gid)
        .unwrap_or_else(|| metadata.gid.to_string());

    format!(
        "{:>10}{:>7}{:>11}{:>4}{:>11}{:>11}{:>10}{:>13} ",
        metadata.ino,
        metadata.kilobyte_blocks(),
        metadata.permissions(),
        metadata.nlink,
        owner,
        group,
        metadata.size,
        mtime,
    )
}

/// Format a modification time as `Mon  D HH:MM`, in local time or UTC.
///
/// Month names are always English. Times chrono cannot represent fall back
/// to the raw seconds.
pub fn format_mtime(secs: i64, utc: bool) -> String {
    let formatted = if utc {
        Utc.timestamp_opt(secs, 0)
            .single()
            .map(|time| time.format(TIME_FORMAT).to_string())
    } else {
        Local
            .timestamp_opt(secs, 0)
            .earliest()
            .map(|time| time.format(TIME_FORMAT).to_string())
    };
    formatted.unwrap_or_else(|| secs.to_string())
}
