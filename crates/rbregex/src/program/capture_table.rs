// Capture table: group index to name bookkeeping for a compiled pattern.
//
// Indices are 1-based (0 is the whole match and never has a name). A
// name may map to several indices (duplicate named groups); an index has
// at most one name.

use ahash::AHashMap;
use smol_str::SmolStr;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureTable {
    group_count: u32,
    // Declaration order preserved for `names()`.
    names: Vec<(SmolStr, Vec<u32>)>,
    by_name: AHashMap<SmolStr, usize>,
}

impl CaptureTable {
    pub fn new() -> CaptureTable {
        CaptureTable::default()
    }

    /// Record a capturing group. `name` is `None` for plain `(...)`.
    pub fn push_group(&mut self, name: Option<&str>) -> u32 {
        self.group_count += 1;
        let index = self.group_count;
        if let Some(name) = name {
            match self.by_name.get(name) {
                Some(&pos) => self.names[pos].1.push(index),
                None => {
                    let key = SmolStr::new(name);
                    self.by_name.insert(key.clone(), self.names.len());
                    self.names.push((key, vec![index]));
                }
            }
        }
        index
    }

    /// Number of capturing groups, excluding group 0.
    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    pub fn has_names(&self) -> bool {
        !self.names.is_empty()
    }

    /// Declared names in first-declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|(name, _)| name.as_str())
    }

    /// All indices registered under `name`, in declaration order.
    pub fn indices_for(&self, name: &str) -> Option<&[u32]> {
        self.by_name
            .get(name)
            .map(|&pos| self.names[pos].1.as_slice())
    }

    /// The accessor resolution rule: the last index registered under a
    /// name wins.
    pub fn last_index_for(&self, name: &str) -> Option<u32> {
        self.indices_for(name).and_then(|ix| ix.last().copied())
    }

    /// Name → ordered index list, in first-declaration order.
    pub fn named_captures(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.names
            .iter()
            .map(|(name, ix)| (name.as_str(), ix.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_share_entry() {
        let mut table = CaptureTable::new();
        assert_eq!(table.push_group(Some("x")), 1);
        assert_eq!(table.push_group(None), 2);
        assert_eq!(table.push_group(Some("x")), 3);

        assert_eq!(table.group_count(), 3);
        assert_eq!(table.indices_for("x"), Some(&[1, 3][..]));
        assert_eq!(table.last_index_for("x"), Some(3));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_unknown_name() {
        let table = CaptureTable::new();
        assert_eq!(table.indices_for("nope"), None);
    }
}
