//! User and group name resolution

use nix::unistd::{Gid, Group, Uid, User};

/// Lookups against the user and group databases.
///
/// `-user` resolves names to ids through this trait and `-ls` resolves ids
/// back to names, so both can run against a fixed table in tests.
pub trait IdentityResolver {
    /// Name of the user with the given id
    fn user_name(&self, uid: u32) -> Option<String>;

    /// Id of the user with the given name
    fn user_id(&self, name: &str) -> Option<u32>;

    /// Name of the group with the given id
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Resolver backed by the system's passwd and group databases
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdentity;

impl IdentityResolver for SystemIdentity {
    fn user_name(&self, uid: u32) -> Option<String> {
        User::from_uid(Uid::from_raw(uid)).ok().flatten().map(|user| user.name)
    }

    fn user_id(&self, name: &str) -> Option<u32> {
        User::from_name(name).ok().flatten().map(|user| user.uid.as_raw())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        Group::from_gid(Gid::from_raw(gid)).ok().flatten().map(|group| group.name)
    }
}

#[cfg(test)]
pub(crate) use fixed::FixedIdentity;
