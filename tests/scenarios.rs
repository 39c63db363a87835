//! End-to-end scenarios: long push runs, the erase/at example, and a replay of
//! the fixed benchmark sequence checked against `Vec`.

use std::cell::Cell;

use memvec::{array, Array, ArrayError};

thread_local! {
    static CREATED: Cell<usize> = Cell::new(0);
    static DROPPED: Cell<usize> = Cell::new(0);
}

fn created() -> usize {
    CREATED.with(|c| c.get())
}

fn dropped() -> usize {
    DROPPED.with(|c| c.get())
}

/// Padded item that counts how many instances were created and dropped.
#[derive(Debug)]
struct Foo {
    value: i32,
    _dummy: [i64; 12],
}

impl Foo {
    fn new(value: i32) -> Foo {
        CREATED.with(|c| c.set(c.get() + 1));
        Foo { value, _dummy: [0; 12] }
    }
}

impl Default for Foo {
    fn default() -> Foo {
        Foo::new(42)
    }
}

impl From<i32> for Foo {
    fn from(value: i32) -> Foo {
        Foo::new(value)
    }
}

impl Clone for Foo {
    fn clone(&self) -> Foo {
        Foo::new(self.value)
    }
}

impl Drop for Foo {
    fn drop(&mut self) {
        DROPPED.with(|c| c.set(c.get() + 1));
    }
}

impl PartialEq for Foo {
    fn eq(&self, other: &Foo) -> bool {
        self.value == other.value
    }
}

/// The operations the benchmark sequence needs from a container.
trait Target {
    fn reserve_to(&mut self, capacity: usize);
    fn resize_default(&mut self, len: usize);
    fn resize_value(&mut self, len: usize, value: &Foo);
    fn push(&mut self, value: Foo);
    fn insert_at(&mut self, index: usize, value: &Foo);
    fn modify(&mut self, index: usize, value: i32);
    fn erase_front(&mut self);
    fn emplace(&mut self, value: i32);
    fn checked(&self, index: usize) -> Option<i32>;
}

impl Target for Array<Foo> {
    fn reserve_to(&mut self, capacity: usize) {
        self.reserve(capacity);
    }

    fn resize_default(&mut self, len: usize) {
        self.resize(len);
    }

    fn resize_value(&mut self, len: usize, value: &Foo) {
        self.resize_with_value(len, value);
    }

    fn push(&mut self, value: Foo) {
        self.push_back(value);
    }

    fn insert_at(&mut self, index: usize, value: &Foo) {
        self.insert_from_slice(index, std::slice::from_ref(value));
    }

    fn modify(&mut self, index: usize, value: i32) {
        self[index].value = value;
    }

    fn erase_front(&mut self) {
        self.erase(0);
    }

    fn emplace(&mut self, value: i32) {
        self.emplace_back(value);
    }

    fn checked(&self, index: usize) -> Option<i32> {
        self.at(index).ok().map(|foo| foo.value)
    }
}

impl Target for Vec<Foo> {
    fn reserve_to(&mut self, capacity: usize) {
        self.reserve(capacity.saturating_sub(self.len()));
    }

    fn resize_default(&mut self, len: usize) {
        self.resize_with(len, Foo::default);
    }

    fn resize_value(&mut self, len: usize, value: &Foo) {
        self.resize(len, value.clone());
    }

    fn push(&mut self, value: Foo) {
        Vec::push(self, value);
    }

    fn insert_at(&mut self, index: usize, value: &Foo) {
        self.insert(index, value.clone());
    }

    fn modify(&mut self, index: usize, value: i32) {
        self[index].value = value;
    }

    fn erase_front(&mut self) {
        self.remove(0);
    }

    fn emplace(&mut self, value: i32) {
        Vec::push(self, Foo::from(value));
    }

    fn checked(&self, index: usize) -> Option<i32> {
        self.get(index).map(|foo| foo.value)
    }
}

/// Runs the named steps in order, `scale` divides every iteration count and size.
fn run_sequence<V: Target>(target: &mut V, scale: usize) -> Vec<(&'static str, Option<i32>)> {
    let mut probes = vec![];
    let n = |count: usize| count / scale;

    for i in 0..n(10_000) {
        target.reserve_to(i);
    }
    for i in 0..n(1_000) {
        target.resize_default(i * 1_000 / scale);
    }
    let fill = Foo::new(32);
    for i in 0..n(1_000) {
        target.resize_value((i + 100) * 1_000 / scale, &fill);
    }
    for i in 0..n(1_000_000) {
        target.push(Foo::new(i as i32));
    }
    let inserted = Foo::new(42);
    for i in 0..n(1_000) {
        target.insert_at(i * 2, &inserted);
    }
    for i in 0..n(1_000_000) {
        target.modify(n(1_000), i as i32 * 200);
    }
    for _ in 0..n(1_000) {
        target.erase_front();
    }
    for i in 0..n(1_000_000) {
        target.emplace(i as i32);
    }
    for i in 0..n(100_000) {
        let probe = target.checked(i * 3);
        if i % 97 == 0 {
            probes.push(("at", probe));
        }
    }
    probes
}

#[test]
fn push_one_million_integers_with_linear_relocation() {
    let mut array = Array::new();
    let mut relocated = 0usize;
    let mut reallocations = 0usize;
    for i in 0..1_000_000u32 {
        let capacity = array.capacity();
        array.push_back(i);
        if array.capacity() != capacity {
            relocated += array.len() - 1;
            reallocations += 1;
        }
        assert!(array.capacity() >= array.len());
    }
    assert_eq!(1_000_000, array.len());
    assert!(relocated < 2 * array.len(), "relocated {} items", relocated);
    assert_eq!(21, reallocations);
    assert_eq!(1 << 20, array.capacity());
    assert!(array.iter().copied().eq(0..1_000_000));
}

#[test]
fn erase_middle_then_checked_access_fails() {
    let mut array = array![1, 2, 3, 4, 5];
    array.erase(2);
    assert_eq!(array, [1, 2, 4, 5]);
    assert_eq!(Err(ArrayError::OutOfRange { index: 10, len: 4 }), array.at(10));
}

#[test]
fn benchmark_sequence_matches_vec() {
    let mut array: Array<Foo> = Array::new();
    let mut reference: Vec<Foo> = Vec::new();

    let array_probes = run_sequence(&mut array, 100);
    let reference_probes = run_sequence(&mut reference, 100);

    assert_eq!(reference.len(), array.len(), "size mismatch");
    for (index, (expected, actual)) in reference.iter().zip(array.iter()).enumerate() {
        assert_eq!(expected, actual, "element mismatch at {}", index);
    }
    assert_eq!(reference_probes, array_probes);

    drop(array);
    drop(reference);
    assert_eq!(created(), dropped(), "every created item is dropped exactly once");
}

#[test]
fn clone_move_and_swap_compose() {
    let mut a: Array<Foo> = (0..10).map(Foo::new).collect();
    let mut b = Array::new();
    b.clone_from(&a);
    assert_eq!(a, b);

    b[0].value = -1;
    assert_eq!(0, a[0].value);

    let mut c = Array::new();
    c.move_assign(&mut b);
    assert_eq!((0, 0), (b.len(), b.capacity()));
    assert_eq!(-1, c[0].value);

    a.swap(&mut c);
    assert_eq!(-1, a[0].value);
    assert_eq!(0, c[0].value);

    drop((a, b, c));
    assert_eq!(created(), dropped());
}
