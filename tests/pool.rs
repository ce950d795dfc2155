use mpcalc::{
    interpreter::{evaluator::core::Context, value::core::Num},
    memory::pool::{Bucket, Pool, PoolError},
    table::{
        hashtable::{HashTable, hash_name},
        vars::{Binding, VarTable},
    },
};

#[test]
fn allocate_get_release() {
    let mut pool = Pool::new();
    let a = pool.allocate(Bucket::Persistent, "a");
    let b = pool.allocate(Bucket::Scratch, "b");

    assert_eq!(pool.get(a), Ok(&"a"));
    assert_eq!(pool.get(b), Ok(&"b"));
    assert_eq!(b.bucket(), Bucket::Scratch);
    assert_eq!(pool.live(Bucket::Persistent), 1);
    assert_eq!(pool.live(Bucket::Scratch), 1);

    assert_eq!(pool.release(a), Ok("a"));
    assert_eq!(pool.live(Bucket::Persistent), 0);
    assert_eq!(pool.allocations(), 2);
}

#[test]
fn released_handles_are_rejected() {
    let mut pool = Pool::new();
    let a = pool.allocate(Bucket::Persistent, 1);
    pool.release(a).unwrap();

    assert_eq!(pool.get(a), Err(PoolError::Stale(a)));
    assert_eq!(pool.release(a), Err(PoolError::Stale(a)));

    // The slot is reused, but the old handle still does not resolve.
    let b = pool.allocate(Bucket::Persistent, 2);
    assert_eq!(pool.get(b), Ok(&2));
    assert!(pool.get(a).is_err());
}

#[test]
fn release_from_checks_the_bucket() {
    let mut pool = Pool::new();
    let a = pool.allocate(Bucket::Scratch, 1);

    assert!(matches!(pool.release_from(Bucket::Persistent, a),
                     Err(PoolError::WrongBucket { .. })));
    assert_eq!(pool.release_from(Bucket::Scratch, a), Ok(1));
}

#[test]
fn release_all_empties_one_bucket() {
    let mut pool = Pool::new();
    let kept = pool.allocate(Bucket::Persistent, 0);
    let scratch: Vec<_> = (1..=5).map(|n| pool.allocate(Bucket::Scratch, n)).collect();

    assert_eq!(pool.release_all(Bucket::Scratch), 5);
    assert_eq!(pool.live(Bucket::Scratch), 0);
    assert_eq!(pool.get(kept), Ok(&0));
    assert!(scratch.iter().all(|handle| pool.get(*handle).is_err()));
    assert_eq!(pool.release_all(Bucket::Scratch), 0);
}

#[test]
fn hash_table_basics() {
    let mut table = HashTable::with_buckets(3);
    assert!(table.is_empty());

    assert_eq!(table.insert("one", 1), None);
    assert_eq!(table.insert("two", 2), None);
    assert_eq!(table.insert("three", 3), None);
    assert_eq!(table.insert("two", 22), Some(2));
    assert_eq!(table.len(), 3);

    assert_eq!(table.get("two"), Some(&22));
    assert!(table.contains("three"));
    assert_eq!(table.remove("one"), Some(1));
    assert_eq!(table.get("one"), None);
    assert_eq!(table.sorted_keys(), vec!["three", "two"]);
}

#[test]
fn hash_table_lookup_can_create() {
    let mut table: HashTable<u32> = HashTable::with_buckets(7);

    assert!(table.lookup("x", false).is_none());
    if let Some(slot) = table.lookup("x", true) {
        *slot = 9;
    }
    assert_eq!(table.get("x"), Some(&9));
    *table.lookup_or_insert_with("x", || 0) += 1;
    assert_eq!(table.get("x"), Some(&10));

    let mut destroyed = Vec::new();
    table.destroy(|key, value| destroyed.push((key, value)));
    assert_eq!(destroyed, vec![("x".to_string(), 10)]);
}

#[test]
fn hash_name_is_stable() {
    assert_eq!(hash_name(""), 0);
    assert_eq!(hash_name("a"), 97);
    assert_eq!(hash_name("ab"), (97 << 4) ^ 98);
}

#[test]
fn assignment_releases_the_previous_value() {
    let mut pool = Pool::new();
    let mut vars = VarTable::local();

    let first = vars.assign("x", Num::from(1), &mut pool).unwrap();
    let second = vars.assign("x", Num::from(2), &mut pool).unwrap();

    assert!(pool.get(first).is_err());
    assert_eq!(pool.get(second), Ok(&Num::from(2)));
    assert_eq!(pool.live(Bucket::Persistent), 1);
}

#[test]
fn borrowed_bindings_are_not_released() {
    let mut pool = Pool::new();
    let mut globals = VarTable::global();
    let owned = globals.assign("x", Num::from(5), &mut pool).unwrap();

    let mut child = VarTable::child_of(&globals);
    assert_eq!(child.handle("x"), Some(owned));
    assert_eq!(child.lookup("x", false).and_then(|v| v.binding()),
               Some(Binding::Borrowed(owned)));

    child.assign("x", Num::from(6), &mut pool).unwrap();
    child.bind_borrowed("y", owned, &mut pool).unwrap();
    assert_eq!(child.destroy(&mut pool), Ok(1));

    assert_eq!(pool.get(owned), Ok(&Num::from(5)));
    assert_eq!(pool.live(Bucket::Persistent), 1);
}

#[test]
fn statements_leave_no_scratch_values() {
    let mut ctx = Context::silent();
    let persistent = ctx.pool().live(Bucket::Persistent);

    ctx.run_source("x = 1\nx = x + 1\nx = x * 10\nsq(a) = { t = a; t * t }\nsq(x)")
       .unwrap();
    assert!(ctx.run_source("sq(nope)").is_err());

    assert_eq!(ctx.pool().live(Bucket::Scratch), 0);
    // `x` and `ans` are the only new persistent values.
    assert_eq!(ctx.pool().live(Bucket::Persistent), persistent + 2);
}
