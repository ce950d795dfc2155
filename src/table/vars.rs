use crate::{
    interpreter::value::core::Num,
    memory::pool::{Bucket, Handle, Pool, PoolError},
    table::hashtable::{GLOBAL_BUCKETS, HashTable, LOCAL_BUCKETS},
};

/// How a variable refers to its pooled number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The variable owns the number; it is released when the variable is
    /// reassigned or its table is destroyed.
    Owned(Handle),
    /// The number belongs to someone else (a caller's argument); the
    /// variable never releases it.
    Borrowed(Handle),
}

impl Binding {
    /// The handle of the bound number.
    #[must_use]
    pub const fn handle(self) -> Handle {
        match self {
            Self::Owned(handle) | Self::Borrowed(handle) => handle,
        }
    }
}

/// A variable slot. A freshly created slot has no value yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    binding: Option<Binding>,
}

impl Variable {
    /// The current binding, if the variable has been given a value.
    #[must_use]
    pub const fn binding(&self) -> Option<Binding> {
        self.binding
    }

    /// Replaces the binding, releasing the previous number if it was owned.
    pub fn rebind(&mut self, binding: Binding, pool: &mut Pool<Num>) -> Result<(), PoolError> {
        if let Some(Binding::Owned(previous)) = self.binding.replace(binding) {
            pool.release_from(Bucket::Persistent, previous)?;
        }
        Ok(())
    }
}

/// A variable scope: the global table or the local table of one call.
pub struct VarTable {
    table: HashTable<Variable>,
}

impl VarTable {
    /// Creates the global table.
    #[must_use]
    pub fn global() -> Self {
        Self { table: HashTable::with_buckets(GLOBAL_BUCKETS) }
    }

    /// Creates an empty local table for a single call.
    #[must_use]
    pub fn local() -> Self {
        Self { table: HashTable::with_buckets(LOCAL_BUCKETS) }
    }

    /// Creates a local table that sees every variable of `parent` through
    /// borrowed bindings.
    #[must_use]
    pub fn child_of(parent: &Self) -> Self {
        let mut child = Self::local();
        parent.table.iterate(|name, variable| {
                        if let Some(binding) = variable.binding {
                            let borrowed = Binding::Borrowed(binding.handle());
                            child.table.insert(name, Variable { binding: Some(borrowed) });
                        }
                    });
        child
    }

    /// Looks a variable up, creating an empty slot when `create` is set.
    pub fn lookup(&mut self, name: &str, create: bool) -> Option<&mut Variable> {
        self.table.lookup(name, create)
    }

    /// The handle bound to `name`, if it has a value.
    #[must_use]
    pub fn handle(&self, name: &str) -> Option<Handle> {
        self.table
            .get(name)
            .and_then(Variable::binding)
            .map(Binding::handle)
    }

    /// Binds `name` to a number owned by somebody else.
    pub fn bind_borrowed(&mut self,
                         name: &str,
                         handle: Handle,
                         pool: &mut Pool<Num>)
                         -> Result<(), PoolError> {
        self.table
            .lookup_or_insert_with(name, Variable::default)
            .rebind(Binding::Borrowed(handle), pool)
    }

    /// Stores a persistent copy of `value` under `name`, releasing the
    /// number previously owned by the variable.
    ///
    /// # Example
    /// ```
    /// use mpcalc::{
    ///     interpreter::value::core::Num,
    ///     memory::pool::{Bucket, Pool},
    ///     table::vars::VarTable,
    /// };
    ///
    /// let mut pool = Pool::new();
    /// let mut globals = VarTable::global();
    /// globals.assign("x", Num::from(1), &mut pool).unwrap();
    /// globals.assign("x", Num::from(2), &mut pool).unwrap();
    ///
    /// assert_eq!(pool.live(Bucket::Persistent), 1);
    /// let handle = globals.handle("x").unwrap();
    /// assert_eq!(*pool.get(handle).unwrap(), Num::from(2));
    /// ```
    pub fn assign(&mut self,
                  name: &str,
                  value: Num,
                  pool: &mut Pool<Num>)
                  -> Result<Handle, PoolError> {
        let handle = pool.allocate(Bucket::Persistent, value);
        self.table
            .lookup_or_insert_with(name, Variable::default)
            .rebind(Binding::Owned(handle), pool)?;
        Ok(handle)
    }

    /// Names of all variables that hold a value, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.table
            .sorted_keys()
            .into_iter()
            .filter(|name| self.handle(name).is_some())
            .map(str::to_string)
            .collect()
    }

    /// Number of variable slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table has no slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Destroys the table, releasing every owned number and leaving borrowed
    /// ones untouched. Returns the number of released values.
    pub fn destroy(self, pool: &mut Pool<Num>) -> Result<usize, PoolError> {
        let mut released = 0;
        let mut failure = None;
        self.table.destroy(|_, variable| {
                      if let Some(Binding::Owned(handle)) = variable.binding {
                          match pool.release_from(Bucket::Persistent, handle) {
                              Ok(_) => released += 1,
                              Err(e) => failure = Some(e),
                          }
                      }
                  });
        failure.map_or(Ok(released), Err)
    }
}
