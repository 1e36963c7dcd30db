//! Loop shapes built on top of a single `receive`.
//!
//! Each helper is constructed from a [`Dequeue`] implementation and only
//! ever calls [`Dequeue::dequeue`], so the loop semantics can be checked
//! against a counting fake without any mailbox behind it. An `Err` from
//! `dequeue` ends every loop immediately and is returned as-is.

use std::cell::Cell;

use super::behavior::{Behavior, ReceiveResult};

/// Something that can perform one blocking `receive`.
pub trait Dequeue {
    /// Handle exactly one envelope (or one timeout) with `behavior`.
    fn dequeue(&self, behavior: &mut Behavior<'_>) -> ReceiveResult;
}

/// Counters usable with [`ReceiveFor`].
pub trait Advance {
    /// Step to the next value.
    fn advance(&mut self);
}

macro_rules! impl_advance {
    ($($ty:ty),*) => {
        $(
            impl Advance for $ty {
                fn advance(&mut self) {
                    *self += 1;
                }
            }
        )*
    };
}

impl_advance!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// `for (; *begin != end; begin.advance()) receive(behavior)`
#[must_use = "loop helpers do nothing until `run` is called"]
pub struct ReceiveFor<'s, D: ?Sized, T> {
    dq: &'s D,
    begin: &'s mut T,
    end: T,
}

impl<'s, D, T> ReceiveFor<'s, D, T>
where
    D: Dequeue + ?Sized,
    T: PartialEq + Advance,
{
    /// Loop over `*begin..end`, leaving `*begin == end` on normal completion.
    pub fn new(dq: &'s D, begin: &'s mut T, end: T) -> Self {
        Self { dq, begin, end }
    }

    /// Run the loop with `behavior`.
    pub fn run(self, behavior: &mut Behavior<'_>) -> ReceiveResult {
        let Self { dq, begin, end } = self;
        while *begin != end {
            dq.dequeue(behavior)?;
            begin.advance();
        }
        Ok(())
    }
}

/// `while stmt() { receive(behavior) }`
#[must_use = "loop helpers do nothing until `run` is called"]
pub struct ReceiveWhile<'s, D: ?Sized, F> {
    dq: &'s D,
    stmt: F,
}

impl<'s, D, F> ReceiveWhile<'s, D, F>
where
    D: Dequeue + ?Sized,
    F: FnMut() -> bool,
{
    /// Loop while `stmt` holds; it is evaluated before every iteration.
    pub fn new(dq: &'s D, stmt: F) -> Self {
        Self { dq, stmt }
    }

    /// Run the loop with `behavior`.
    pub fn run(mut self, behavior: &mut Behavior<'_>) -> ReceiveResult {
        while (self.stmt)() {
            self.dq.dequeue(behavior)?;
        }
        Ok(())
    }
}

/// `do { receive(behavior) } while !stmt()`
#[must_use = "loop helpers do nothing until `until` is called"]
pub struct DoReceive<'s, 'b, D: ?Sized> {
    dq: &'s D,
    behavior: Behavior<'b>,
}

impl<'s, 'b, D> DoReceive<'s, 'b, D>
where
    D: Dequeue + ?Sized,
{
    /// Prepare a do-while loop over `behavior`.
    pub fn new(dq: &'s D, behavior: Behavior<'b>) -> Self {
        Self { dq, behavior }
    }

    /// Receive once, then again until `stmt` returns `true`.
    pub fn until<F>(mut self, mut stmt: F) -> ReceiveResult
    where
        F: FnMut() -> bool,
    {
        loop {
            self.dq.dequeue(&mut self.behavior)?;
            if stmt() {
                return Ok(());
            }
        }
    }

    /// Like [`until`](Self::until), re-reading `flag` after every iteration.
    pub fn until_flag(self, flag: &Cell<bool>) -> ReceiveResult {
        self.until(|| flag.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::{ExitReason, Exited};

    #[derive(Default)]
    struct Counting {
        calls: Cell<usize>,
        fail_at: Option<usize>,
        raise_at: Option<usize>,
        raised: Cell<bool>,
    }

    impl Dequeue for Counting {
        fn dequeue(&self, _: &mut Behavior<'_>) -> ReceiveResult {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if self.raise_at == Some(call) {
                self.raised.set(true);
            }
            if self.fail_at == Some(call) {
                return Err(Exited::new(ExitReason::UserShutdown));
            }
            Ok(())
        }
    }

    #[test]
    fn test_receive_for_counts() {
        let dq = Counting::default();
        let mut i = 0u32;
        ReceiveFor::new(&dq, &mut i, 7).run(&mut Behavior::new()).unwrap();

        assert_eq!(dq.calls.get(), 7);
        assert_eq!(i, 7);
    }

    #[test]
    fn test_receive_for_empty_range() {
        let dq = Counting::default();
        let mut i = 3usize;
        ReceiveFor::new(&dq, &mut i, 3).run(&mut Behavior::new()).unwrap();
        assert_eq!(dq.calls.get(), 0);
    }

    #[test]
    fn test_receive_while_checks_first() {
        let dq = Counting::default();
        ReceiveWhile::new(&dq, || false)
            .run(&mut Behavior::new())
            .unwrap();
        assert_eq!(dq.calls.get(), 0);

        let mut remaining = 4;
        ReceiveWhile::new(&dq, || {
            remaining -= 1;
            remaining >= 0
        })
        .run(&mut Behavior::new())
        .unwrap();
        assert_eq!(dq.calls.get(), 4);
    }

    #[test]
    fn test_do_receive_runs_at_least_once() {
        let dq = Counting::default();
        DoReceive::new(&dq, Behavior::new()).until(|| true).unwrap();
        assert_eq!(dq.calls.get(), 1);
    }

    #[test]
    fn test_do_receive_checks_after_each_iteration() {
        let dq = Counting::default();
        let mut polls = 0;
        DoReceive::new(&dq, Behavior::new())
            .until(|| {
                polls += 1;
                polls == 3
            })
            .unwrap();
        assert_eq!(dq.calls.get(), 3);
    }

    #[test]
    fn test_until_flag_sees_updates() {
        let dq = Counting {
            raise_at: Some(3),
            ..Counting::default()
        };
        assert!(!dq.raised.get());
        DoReceive::new(&dq, Behavior::new())
            .until_flag(&dq.raised)
            .unwrap();
        assert_eq!(dq.calls.get(), 3);
    }

    #[test]
    fn test_exit_stops_every_shape() {
        let exited = Err(Exited::new(ExitReason::UserShutdown));

        let dq = Counting {
            fail_at: Some(2),
            ..Counting::default()
        };
        let mut i = 0;
        assert_eq!(ReceiveFor::new(&dq, &mut i, 10).run(&mut Behavior::new()), exited);
        assert_eq!(i, 1);

        let dq = Counting {
            fail_at: Some(3),
            ..Counting::default()
        };
        assert_eq!(ReceiveWhile::new(&dq, || true).run(&mut Behavior::new()), exited);
        assert_eq!(dq.calls.get(), 3);

        let dq = Counting {
            fail_at: Some(1),
            ..Counting::default()
        };
        assert_eq!(DoReceive::new(&dq, Behavior::new()).until(|| false), exited);
        assert_eq!(dq.calls.get(), 1);
    }
}
