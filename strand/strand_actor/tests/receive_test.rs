//! Integration tests for the blocking receive family.
//!
//! These tests drive scoped actors directly from the test thread and check
//! cache ordering, loop shapes and how an exit unwinds nested loops.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use strand_actor::mailbox::Prioritizing;
use strand_actor::policy::{NestableInvoke, NoResume, NoScheduling, Policies};
use strand_actor::{
    ActorSystem, Behavior, BlockingActor, Envelope, ExitReason, Exited, MessageId, Payload,
    Priority, ReceiveResult, ScopedActor,
};

type ScopedPrioritized = Policies<NoScheduling, Prioritizing, NoResume, NestableInvoke>;

#[derive(Debug)]
struct Stop;

#[test]
fn test_cache_is_matched_in_arrival_order() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    for text in ["first", "second", "third"] {
        scoped.address().tell(text.to_string()).unwrap();
    }
    scoped.address().tell(0u8).unwrap();

    // pulls every string into the cache before the u8 matches
    scoped.receive(&mut Behavior::new().on(|_: u8| ())).unwrap();
    assert_eq!(scoped.cache_len(), 3);

    // a newer string must not overtake the cached ones
    scoped.address().tell("fourth".to_string()).unwrap();

    let seen = RefCell::new(Vec::new());
    let mut strings = Behavior::new().on(|text: String| seen.borrow_mut().push(text));
    for _ in 0..4 {
        scoped.receive(&mut strings).unwrap();
    }
    drop(strings);

    assert_eq!(seen.into_inner(), vec!["first", "second", "third", "fourth"]);
}

#[test]
fn test_unmatched_envelope_is_retrievable_later() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    scoped.address().tell(7i64).unwrap();

    let timed_out = Cell::new(false);
    scoped
        .receive(
            &mut Behavior::new()
                .on(|_: String| ())
                .after(Duration::from_millis(10), || timed_out.set(true)),
        )
        .unwrap();
    assert!(timed_out.get());
    assert_eq!(scoped.cache_len(), 1);

    let got = Cell::new(0);
    scoped
        .receive(&mut Behavior::new().on(|n: i64| got.set(n)))
        .unwrap();
    assert_eq!(got.get(), 7);
    assert_eq!(scoped.cache_len(), 0);
}

#[test]
fn test_unbounded_timeout_still_matches() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    scoped.address().tell(1u8).unwrap();

    let got = Cell::new(0u8);
    let timed_out = Cell::new(false);
    scoped
        .receive(
            &mut Behavior::new()
                .on(|n: u8| got.set(n))
                .after(Duration::MAX, || timed_out.set(true)),
        )
        .unwrap();

    assert_eq!(got.get(), 1);
    assert!(!timed_out.get());
}

#[test]
fn test_others_payload_can_be_forwarded() {
    let system = ActorSystem::new();
    let relay = ScopedActor::hidden(&system);
    let target = ScopedActor::hidden(&system);
    relay.address().tell(String::from("hop")).unwrap();

    let forwarded = Cell::new(false);
    relay
        .receive(&mut Behavior::new().others(|payload: Payload| {
            let envelope =
                Envelope::from_payload(None, target.id(), MessageId::NONE, Priority::Normal, payload);
            forwarded.set(target.address().enqueue(envelope).is_ok());
        }))
        .unwrap();
    assert!(forwarded.get());

    let got = RefCell::new(String::new());
    target
        .receive(&mut Behavior::new().on(|text: String| *got.borrow_mut() = text))
        .unwrap();
    assert_eq!(got.into_inner(), "hop");
}

#[test]
fn test_guards_leave_rejected_values_cached() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    for n in [1u32, 20, 3] {
        scoped.address().tell(n).unwrap();
    }

    let got = Cell::new(0);
    scoped
        .receive(&mut Behavior::new().on_if(|n: &u32| *n > 10, |n: u32| got.set(n)))
        .unwrap();

    assert_eq!(got.get(), 20);
    assert_eq!(scoped.cache_len(), 1);
    assert_eq!(scoped.pending(), 1);
}

#[test]
fn test_receive_for_consumes_exactly_n() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    for n in 0..5u32 {
        scoped.address().tell(n).unwrap();
    }

    let sum = Cell::new(0);
    let mut i = 0;
    scoped
        .receive_for(&mut i, 3)
        .run(&mut Behavior::new().on(|n: u32| sum.set(sum.get() + n)))
        .unwrap();

    assert_eq!(i, 3);
    assert_eq!(sum.get(), 3);
    assert_eq!(scoped.pending(), 2);
}

#[test]
fn test_receive_while_rechecks_predicate() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    for n in 1..=4u32 {
        scoped.address().tell(n).unwrap();
    }

    let last = Cell::new(0);
    scoped
        .receive_while(|| last.get() < 2)
        .run(&mut Behavior::new().on(|n: u32| last.set(n)))
        .unwrap();

    assert_eq!(last.get(), 2);
    assert_eq!(scoped.pending(), 2);
}

#[test]
fn test_do_receive_until_flag() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    scoped.address().tell(1u32).unwrap();
    scoped.address().tell(Stop).unwrap();
    scoped.address().tell(2u32).unwrap();

    let done = Cell::new(false);
    let count = Cell::new(0);
    scoped
        .do_receive(
            Behavior::new()
                .on(|_: u32| count.set(count.get() + 1))
                .on(|_: Stop| done.set(true)),
        )
        .until_flag(&done)
        .unwrap();

    assert_eq!(count.get(), 1);
    assert_eq!(scoped.pending(), 1);
}

#[test]
fn test_receive_loop_ends_only_on_exit() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    for n in 0..3u32 {
        scoped.address().tell(n).unwrap();
    }
    scoped.address().tell(Stop).unwrap();

    let handled = Cell::new(0);
    let mut behavior = Behavior::new()
        .on(|_: u32| handled.set(handled.get() + 1))
        .on(|_: Stop| scoped.quit(ExitReason::UserShutdown));
    let result = scoped.receive_loop(&mut behavior);

    assert_eq!(result.unwrap_err(), Exited::new(ExitReason::UserShutdown));
    assert_eq!(handled.get(), 3);
}

#[test]
fn test_exit_unwinds_nested_loops() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    scoped.address().tell(1u32).unwrap();
    scoped.address().tell("inner".to_string()).unwrap();
    scoped.address().tell(3u32).unwrap();
    scoped.address().tell(4u32).unwrap();

    let inner_seen = Cell::new(false);
    let mut outer = Behavior::new().on(|n: u32| -> ReceiveResult {
        if n == 3 {
            return scoped.quit(ExitReason::User(3));
        }
        scoped
            .do_receive(Behavior::new().on(|_: String| inner_seen.set(true)))
            .until(|| true)
    });
    let result = scoped.receive_while(|| true).run(&mut outer);
    drop(outer);

    assert_eq!(result, Err(Exited::new(ExitReason::User(3))));
    assert!(inner_seen.get());
    assert_eq!(scoped.pending(), 1);
    assert_eq!(scoped.planned_exit_reason(), Some(ExitReason::User(3)));

    // every later receive reports the same exit
    let again = scoped.receive(&mut Behavior::new().on(|_: u32| ()));
    assert_eq!(again, Err(Exited::new(ExitReason::User(3))));
}

#[test]
fn test_handler_context_survives_nested_receive() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::hidden(&system);
    let peer = ScopedActor::hidden(&system);
    peer.send(scoped.address(), 1u32).unwrap();
    scoped.address().tell("anonymous".to_string()).unwrap();

    let sender_after = RefCell::new(None);
    scoped
        .receive(&mut Behavior::new().on(|_: u32| {
            scoped
                .receive(&mut Behavior::new().on(|_: String| {
                    assert!(scoped.current_sender().is_none());
                }))
                .unwrap();
            *sender_after.borrow_mut() = scoped.current_sender();
        }))
        .unwrap();

    assert_eq!(sender_after.into_inner(), Some(peer.address().clone()));
}

#[test]
fn test_prioritizing_policy_serves_high_first() {
    let system = ActorSystem::new();
    let actor: BlockingActor<ScopedPrioritized> = BlockingActor::hidden(&system, "prioritized");
    actor.address().tell(1u32).unwrap();
    actor.address().tell(2u32).unwrap();
    actor.address().tell_with_priority(Priority::High, 3u32).unwrap();

    let order = RefCell::new(Vec::new());
    let mut behavior = Behavior::new().on(|n: u32| order.borrow_mut().push(n));
    actor.receive_for(&mut 0, 3).run(&mut behavior).unwrap();
    drop(behavior);

    assert_eq!(order.into_inner(), vec![3, 1, 2]);
}
