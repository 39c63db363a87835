//! This module is for testing only

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type DropFlag<T> = Rc<RefCell<T>>;

/// Lifecycle events observed on `Tracked` values by the current test thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub constructed: usize,
    pub cloned: usize,
    pub clone_assigned: usize,
    pub dropped: usize,
}

impl Counts {
    /// Values created and not yet dropped.
    pub fn live(&self) -> isize {
        (self.constructed + self.cloned) as isize - self.dropped as isize
    }
}

thread_local! {
    static COUNTS: Cell<Counts> = Cell::new(Counts::default());
}

pub fn reset() {
    COUNTS.with(|c| c.set(Counts::default()));
}

pub fn counts() -> Counts {
    COUNTS.with(|c| c.get())
}

fn bump(event: impl FnOnce(&mut Counts)) {
    COUNTS.with(|c| {
        let mut counts = c.get();
        event(&mut counts);
        c.set(counts);
    });
}

/// Value that records every construction, clone, clone-assignment and drop.
#[derive(Debug, PartialEq, Eq)]
pub struct Tracked {
    pub value: i32,
}

impl Tracked {
    pub fn new(value: i32) -> Tracked {
        bump(|c| c.constructed += 1);
        Tracked { value }
    }
}

impl Default for Tracked {
    fn default() -> Tracked {
        Tracked::new(42)
    }
}

impl From<i32> for Tracked {
    fn from(value: i32) -> Tracked {
        Tracked::new(value)
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Tracked {
        bump(|c| c.cloned += 1);
        Tracked { value: self.value }
    }

    fn clone_from(&mut self, source: &Tracked) {
        bump(|c| c.clone_assigned += 1);
        self.value = source.value;
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        bump(|c| c.dropped += 1);
    }
}

/// Sets its flag when dropped.
pub struct Droppable {
    pub dropflag: DropFlag<bool>,
}

impl Drop for Droppable {
    fn drop(&mut self) {
        *self.dropflag.borrow_mut() = true;
    }
}

/// Panics when cloned if `value` is negative.
#[derive(Debug, PartialEq)]
pub struct Fuse {
    pub value: i32,
}

impl Clone for Fuse {
    fn clone(&self) -> Fuse {
        if self.value < 0 {
            panic!("fuse {} blew", self.value);
        }
        Fuse { value: self.value }
    }
}

#[test]
fn dropflag() {
    let flag = DropFlag::new(RefCell::new(false));
    let droppable = Droppable { dropflag: flag.clone() };
    assert_eq!(false, *flag.borrow());
    std::mem::drop(droppable);
    assert_eq!(true, *flag.borrow());
}

#[test]
fn tracked_counts_every_event() {
    reset();
    let a = Tracked::new(1);
    let mut b = a.clone();
    b.clone_from(&a);
    drop(a);
    assert_eq!(Counts { constructed: 1, cloned: 1, clone_assigned: 1, dropped: 1 }, counts());
    assert_eq!(1, counts().live());
    drop(b);
}
