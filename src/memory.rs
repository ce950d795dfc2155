/// Bucketed value pool.
///
/// Provides [`pool::Pool`], a generational slot allocator whose allocations
/// are grouped into buckets by lifetime. The evaluator keeps every
/// intermediate number in the scratch bucket and drops the whole bucket after
/// each statement; values owned by variables live in the persistent bucket.
///
/// # Responsibilities
/// - Hands out copyable handles and resolves them back to values.
/// - Detects double releases and use of released handles.
/// - Releases a complete bucket in one call.
pub mod pool;
