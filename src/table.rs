/// Chained string-keyed hash table.
///
/// The storage behind every symbol table: fixed chain count, lazy creation
/// on lookup, removal, iteration with a callback and destruction with a
/// per-entry destructor.
pub mod hashtable;
/// Variable scopes.
///
/// Defines [`vars::VarTable`], used both for the global scope and for the
/// short-lived local scope of each function call, and the owned/borrowed
/// distinction that decides which numbers a scope releases.
///
/// # Responsibilities
/// - Binds names to pooled numbers.
/// - Releases owned numbers on reassignment and on destruction.
/// - Never releases numbers borrowed from a caller.
pub mod vars;
/// The function table.
///
/// Holds builtins (with their arity and primitive) and user-defined
/// functions (parameters and body).
pub mod funcs;
