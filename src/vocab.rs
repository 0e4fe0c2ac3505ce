//! Interning of corpus strings as dense ids.

use std::collections::HashMap;

/// Bijection between strings and dense ids in first-appearance order.
///
/// Two separate maps, one per direction: a `HashMap` for string to id and a
/// `Vec` for id to string. Ids are assigned `0, 1, 2, ..` as new strings are
/// interned, so the `Vec` index is the id and the maps stay mutual inverses
/// by construction.
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    token_to_id: HashMap<String, usize>,
    id_to_token: Vec<String>,
}

impl Vocab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `token`, interning it first if it has not been seen before.
    pub fn intern(&mut self, token: &str) -> usize {
        if let Some(&id) = self.token_to_id.get(token) {
            return id;
        }
        let id = self.id_to_token.len();
        self.token_to_id.insert(token.to_owned(), id);
        self.id_to_token.push(token.to_owned());
        id
    }

    /// Id of `token`, or `None` if it was never interned.
    #[inline]
    pub fn id(&self, token: &str) -> Option<usize> {
        self.token_to_id.get(token).copied()
    }

    /// String for `id`, or `None` if `id` was never assigned.
    #[inline]
    pub fn token(&self, id: usize) -> Option<&str> {
        self.id_to_token.get(id).map(String::as_str)
    }

    /// Number of distinct interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }
}
