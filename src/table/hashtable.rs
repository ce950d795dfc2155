/// Number of chains used by the global variable and function tables.
pub const GLOBAL_BUCKETS: usize = 9901;
/// Number of chains used by the short-lived per-call local tables.
pub const LOCAL_BUCKETS: usize = 121;

struct Entry<V> {
    key:   String,
    value: V,
}

/// A string-keyed hash table with separate chaining.
///
/// The number of chains is fixed at construction. Each chain is a small
/// vector searched linearly, so lookups cost one hash plus a short scan.
///
/// # Example
/// ```
/// use mpcalc::table::hashtable::HashTable;
///
/// let mut table = HashTable::with_buckets(7);
/// *table.lookup_or_insert_with("x", || 0) += 41;
/// *table.lookup_or_insert_with("x", || 0) += 1;
///
/// assert_eq!(table.get("x"), Some(&42));
/// assert_eq!(table.len(), 1);
/// ```
pub struct HashTable<V> {
    chains: Vec<Vec<Entry<V>>>,
    len:    usize,
}

/// Hashes a name by rotating the running value four bits per byte.
///
/// # Example
/// ```
/// use mpcalc::table::hashtable::hash_name;
///
/// assert_eq!(hash_name(""), 0);
/// assert_eq!(hash_name("a"), 0x61);
/// assert_eq!(hash_name("ab"), (0x61 << 4) ^ 0x62);
/// ```
#[must_use]
pub fn hash_name(key: &str) -> u32 {
    key.bytes()
       .fold(0u32, |h, byte| (h << 4) ^ (h >> 28) ^ u32::from(byte))
}

impl<V> HashTable<V> {
    /// Creates an empty table with `buckets` chains (at least one).
    #[must_use]
    pub fn with_buckets(buckets: usize) -> Self {
        let mut chains = Vec::new();
        chains.resize_with(buckets.max(1), Vec::new);
        Self { chains, len: 0 }
    }

    fn chain_index(&self, key: &str) -> usize {
        hash_name(key) as usize % self.chains.len()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.chains[self.chain_index(key)].iter()
                                          .find(|entry| entry.key == key)
                                          .map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.chain_index(key);
        self.chains[index].iter_mut()
                          .find(|entry| entry.key == key)
                          .map(|entry| &mut entry.value)
    }

    /// Returns `true` when `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value under `key`, inserting the result of `create` first
    /// when the key is absent.
    pub fn lookup_or_insert_with(&mut self, key: &str, create: impl FnOnce() -> V) -> &mut V {
        let index = self.chain_index(key);
        let chain = &mut self.chains[index];

        let position = if let Some(position) = chain.iter().position(|entry| entry.key == key) {
            position
        } else {
            chain.push(Entry { key:   key.to_string(),
                               value: create(), });
            self.len += 1;
            chain.len() - 1
        };

        &mut chain[position].value
    }

    /// Looks `key` up, creating a default entry when `create` is set.
    ///
    /// Returns `None` only when the key is absent and `create` is `false`.
    pub fn lookup(&mut self, key: &str, create: bool) -> Option<&mut V>
        where V: Default
    {
        if create {
            Some(self.lookup_or_insert_with(key, V::default))
        } else {
            self.get_mut(key)
        }
    }

    /// Stores `value` under `key` and returns the value it replaced.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(key) {
            return Some(std::mem::replace(slot, value));
        }
        let index = self.chain_index(key);
        self.chains[index].push(Entry { key: key.to_string(),
                                        value });
        self.len += 1;
        None
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.chain_index(key);
        let chain = &mut self.chains[index];
        let position = chain.iter().position(|entry| entry.key == key)?;
        self.len -= 1;
        Some(chain.swap_remove(position).value)
    }

    /// Calls `visit` once for every entry, in chain order.
    pub fn iterate(&self, mut visit: impl FnMut(&str, &V)) {
        for entry in self.chains.iter().flatten() {
            visit(&entry.key, &entry.value);
        }
    }

    /// Returns all keys in ascending order.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len);
        for entry in self.chains.iter().flatten() {
            keys.push(entry.key.as_str());
        }
        keys.sort_unstable();
        keys
    }

    /// Consumes the table, handing every entry to `destructor`.
    pub fn destroy(self, mut destructor: impl FnMut(String, V)) {
        for entry in self.chains.into_iter().flatten() {
            destructor(entry.key, entry.value);
        }
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
