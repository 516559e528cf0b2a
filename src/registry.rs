/*
 * Handler registry: an insertion-ordered list of (key, handler) entries with
 * first-match linear lookup. Hosts hold three of these (plain messages,
 * commands, notifications). A handful to a few dozen entries per host makes a
 * linear scan cheaper than hashing.
 *
 * Duplicate keys are accepted and shadowed: the first registration wins and
 * later ones are never reached. Shadowing is logged so it does not go
 * unnoticed.
 */

use crate::types::RawEvent;
use std::fmt;
use std::rc::Rc;

/// A type-erased callback: receives the raw record, returns the result word.
///
/// Typed registrations wrap the user closure together with its view
/// projection and default-return rule into one of these.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(RawEvent) -> isize>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(RawEvent) -> isize + 'static,
    {
        Handler(Rc::new(f))
    }

    /// Runs the callback.
    ///
    /// # Safety
    /// `raw` must be the parameters of a live delivery of the event this
    /// handler was registered for; typed handlers dereference them.
    pub unsafe fn invoke(&self, raw: RawEvent) -> isize {
        (self.0)(raw)
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

#[derive(Debug)]
struct Entry<K> {
    key: K,
    handler: Handler,
}

#[derive(Debug)]
pub struct Registry<K> {
    name: &'static str,
    entries: Vec<Entry<K>>,
}

impl<K> Registry<K>
where
    K: Copy + PartialEq + fmt::Debug,
{
    pub fn new(name: &'static str) -> Self {
        Registry {
            name,
            entries: Vec::new(),
        }
    }

    /// Appends unconditionally; an earlier entry with the same key keeps
    /// winning lookups.
    pub fn add(&mut self, key: K, handler: Handler) {
        if self.contains(key) {
            log::warn!(
                "Registry[{}]: key {key:?} already registered; the new handler is shadowed.",
                self.name
            );
        }
        self.entries.push(Entry { key, handler });
    }

    /// Associates one handler with several keys.
    pub fn add_many<I>(&mut self, keys: I, handler: Handler)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.add(key, handler.clone());
        }
    }

    pub fn find(&self, key: K) -> Option<&Handler> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.handler)
    }

    pub fn contains(&self, key: K) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }
}
