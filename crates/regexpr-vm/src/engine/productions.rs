//! Folded values of one parse.

use std::any::Any;
use std::ops::Range;

use indexmap::IndexMap;
use regexpr_core::Value;

/// One value that reached the output.
#[derive(Debug, Clone)]
pub struct Production<'p> {
    pub token: &'p str,
    pub value: Value,
    pub span: Range<usize>,
    /// Folded directly beneath the synthetic root.
    pub top_level: bool,
}

/// Output of a parse, in fold order.
///
/// Children reach the output when their parent's frame closes, so nested
/// values come before the values of their enclosing occurrence. Values of
/// one token id keep document order.
#[derive(Debug, Clone, Default)]
pub struct Productions<'p> {
    items: Vec<Production<'p>>,
    by_token: IndexMap<&'p str, Vec<usize>>,
}

impl<'p> Productions<'p> {
    pub(super) fn new(items: Vec<Production<'p>>) -> Self {
        let mut by_token: IndexMap<&'p str, Vec<usize>> = IndexMap::new();
        for (index, item) in items.iter().enumerate() {
            by_token.entry(item.token).or_default().push(index);
        }
        Self { items, by_token }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Production<'p>] {
        &self.items
    }

    /// Token ids in order of first production.
    pub fn token_ids(&self) -> impl Iterator<Item = &'p str> + '_ {
        self.by_token.keys().copied()
    }

    /// Every value of token `id` that is a `T`.
    pub fn values<T: Any>(&self, id: &str) -> impl Iterator<Item = &T> + Clone + '_ {
        self.indices(id)
            .iter()
            .filter_map(|&i| self.items[i].value.downcast_ref::<T>())
    }

    pub fn values_any(&self, id: &str) -> impl Iterator<Item = &Value> + Clone + '_ {
        self.indices(id).iter().map(|&i| &self.items[i].value)
    }

    /// The value of token `id` directly beneath the root, if there is
    /// exactly one.
    pub fn get(&self, id: &str) -> Option<&Value> {
        let mut top = self
            .indices(id)
            .iter()
            .map(|&i| &self.items[i])
            .filter(|p| p.top_level);
        let first = top.next()?;
        if top.next().is_some() {
            return None;
        }
        Some(&first.value)
    }

    pub fn get_as<T: Any>(&self, id: &str) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    /// The `index`-th value of token `id`, whatever its type.
    pub fn nth(&self, id: &str, index: usize) -> Option<&Value> {
        let &i = self.indices(id).get(index)?;
        Some(&self.items[i].value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'p str, &Value)> + '_ {
        self.items.iter().map(|p| (p.token, &p.value))
    }

    fn indices(&self, id: &str) -> &[usize] {
        self.by_token
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
