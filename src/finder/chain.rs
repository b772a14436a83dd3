//! The ordered chain of predicates and actions evaluated for every entry.

use super::filter::{FileFilter, Filter};

/// Output produced for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `-print`: the path on its own line
    Print,
    /// `-ls`: the detailed listing line
    List,
}

/// One item of a find expression
#[derive(Debug, Clone)]
pub enum Request {
    Filter(Filter),
    Action(Action),
}

impl Request {
    pub fn is_action(&self) -> bool {
        matches!(self, Request::Action(_))
    }

    pub fn description(&self) -> String {
        match self {
            Request::Filter(filter) => filter.description(),
            Request::Action(Action::Print) => "print path".to_string(),
            Request::Action(Action::List) => "list details".to_string(),
        }
    }
}

impl From<Filter> for Request {
    fn from(filter: Filter) -> Self {
        Request::Filter(filter)
    }
}

impl From<Action> for Request {
    fn from(action: Action) -> Self {
        Request::Action(action)
    }
}

/// Predicates and actions in the order they were given.
///
/// Never empty and always holds at least one action: a chain built without
/// one gets a trailing [`Action::Print`].
#[derive(Debug, Clone)]
pub struct RequestChain {
    requests: Vec<Request>,
}

impl RequestChain {
    pub fn new(mut requests: Vec<Request>) -> Self {
        if !requests.iter().any(Request::is_action) {
            requests.push(Request::Action(Action::Print));
        }
        Self { requests }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Request> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Human readable form, for debug logging
    pub fn describe(&self) -> String {
        self.requests
            .iter()
            .map(Request::description)
            .collect::<Vec<_>>()
            .join(", then ")
    }
}

impl Default for RequestChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<'a> IntoIterator for &'a RequestChain {
    type Item = &'a Request;
    type IntoIter = std::slice::Iter<'a, Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
