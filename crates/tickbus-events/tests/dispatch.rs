use std::sync::Arc;

use tickbus_events::{
    BusSettings, Emitter, Entity, Event, EventBus, EventPayload, FailurePolicy, ListenerResult,
    Listeners, PoolSettings,
};
use tickbus_test_support::{Journal, emitting_listener, failing_listener, names};

#[test]
fn single_event_reaches_listener_with_stamped_payload() {
    let journal = Journal::new();
    let mut bus = EventBus::with_names(names(&[(1, "a")]));
    bus.register(journal.recorder("l"), &[Event(1)]);

    bus.emitter().emit(Event(1));
    bus.update(0.0).expect("update");

    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event, Event(1));
    assert_eq!(entries[0].payload_event, Event(1));
}

#[test]
fn delayed_event_fires_once_cumulative_time_passes_delay() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(journal.recorder("l"), &[Event(7)]);

    let payload = bus.emitter().acquire().with_value(99_u32);
    bus.emitter().emit_later_payload(2.0, Event(7), payload);

    bus.update(1.0).expect("update 1");
    assert!(journal.is_empty());

    bus.update(1.5).expect("update 2");
    assert_eq!(journal.len(), 1);
    assert_eq!(journal.entries()[0].body_as::<u32>(), Some(&99));

    bus.update(10.0).expect("update 3");
    assert_eq!(journal.len(), 1);
}

#[test]
fn listeners_run_in_registration_order() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(journal.recorder("l1"), &[Event(5)]);
    bus.register(journal.recorder("l2"), &[Event(5)]);

    bus.emitter().emit(Event(5));
    bus.update(0.0).expect("update");

    assert_eq!(journal.labels(), vec!["l1", "l2"]);
}

#[test]
fn emission_inside_listener_waits_for_next_update() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(emitting_listener(Event(2)), &[Event(1)]);
    bus.register(journal.recorder("l"), &[Event(1), Event(2)]);

    bus.emitter().emit(Event(1));
    bus.update(0.016).expect("first update");
    assert_eq!(journal.events(), vec![Event(1)]);
    assert_eq!(bus.emitter().pending_immediate(), 1);

    bus.update(0.016).expect("second update");
    assert_eq!(journal.events(), vec![Event(1), Event(2)]);
}

#[test]
fn delayed_emission_inside_listener_is_not_ticked_in_same_update() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(
        Arc::new(
            |_: Event, _: &mut EventPayload, emitter: &mut Emitter| -> ListenerResult {
                emitter.emit_later(0.0, Event(3));
                Ok(())
            },
        ),
        &[Event(1)],
    );
    bus.register(journal.recorder("l"), &[Event(3)]);

    bus.emitter().emit(Event(1));
    bus.update(1.0).expect("first update");
    assert!(journal.is_empty());

    bus.update(0.0).expect("second update");
    assert_eq!(journal.events(), vec![Event(3)]);
}

#[test]
fn self_feeding_listener_dispatches_once_per_frame() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(emitting_listener(Event(1)), &[Event(1)]);
    bus.register(journal.recorder("l"), &[Event(1)]);

    bus.emitter().emit(Event(1));
    for _ in 0..3 {
        bus.update(0.0).expect("update");
    }
    assert_eq!(journal.len(), 3);
}

#[test]
fn ordering_ignores_emit_call_order() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(journal.recorder("l"), &[Event(-4), Event(0), Event(12)]);

    let emitter = bus.emitter();
    emitter.emit(Event(12));
    emitter.emit(Event(0));
    emitter.emit(Event(-4));
    emitter.emit(Event(0));
    bus.update(0.0).expect("update");

    assert_eq!(
        journal.events(),
        vec![Event(-4), Event(0), Event(0), Event(12)]
    );
}

#[test]
fn broadcast_gives_each_target_its_own_payload() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    // the first listener rewrites the target of entity A's copy only; entity
    // B's copy must not observe it
    bus.register(
        Arc::new(
            |_: Event, payload: &mut EventPayload, _: &mut Emitter| -> ListenerResult {
                if payload.target() == Some(Entity::from_raw(10)) {
                    payload.set_target(Some(Entity::from_raw(0)));
                }
                Ok(())
            },
        ),
        &[Event(3)],
    );
    bus.register(journal.recorder("l"), &[Event(3)]);

    let entity_a = Entity::from_raw(10);
    let entity_b = Entity::from_raw(20);
    let payload = bus.emitter().acquire().with_value(String::from("shared"));
    bus.emitter().broadcast(Event(3), &[entity_a, entity_b], payload);
    bus.update(0.0).expect("update");

    let entries = journal.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].target, Some(Entity::from_raw(0)));
    assert_eq!(entries[1].target, Some(entity_b));
    let (Some(first), Some(second)) = (&entries[0].body, &entries[1].body) else {
        panic!("expected bodies on both deliveries");
    };
    assert!(Arc::ptr_eq(first, second));
    assert_eq!(entries[0].body_as::<String>().map(String::as_str), Some("shared"));
}

#[test]
fn broadcast_targets_are_distinct() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(journal.recorder("l"), &[Event(3)]);

    let payload = bus.emitter().acquire();
    bus.emitter()
        .broadcast(Event(3), &[Entity::from_raw(1), Entity::from_raw(2)], payload);
    bus.update(0.0).expect("update");

    let targets: Vec<_> = journal.entries().iter().map(|entry| entry.target).collect();
    assert_eq!(
        targets,
        vec![Some(Entity::from_raw(1)), Some(Entity::from_raw(2))]
    );
}

#[test]
fn emit_data_stores_factory_result() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(journal.recorder("l"), &[Event(8)]);

    bus.emitter()
        .emit_data(Event(8), || Some(Arc::new(3.5_f64) as tickbus_events::Body));
    bus.emitter().emit_data(Event(8), || None);
    bus.update(0.0).expect("update");

    let entries = journal.entries();
    assert_eq!(entries[0].body_as::<f64>(), Some(&3.5));
    assert!(entries[1].body.is_none());
}

#[test]
fn declarative_registration_replays_pairs() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.registers(
        Listeners::new()
            .on_events_with(&[Event(1)], journal.recorder("one"))
            .on_events_with(&[Event(2), Event(3)], journal.recorder("two-three")),
    );

    assert!(bus.registry().contains(Event(1)));
    assert!(bus.registry().contains(Event(2)));
    assert!(bus.registry().contains(Event(3)));
    assert_eq!(bus.registry().events(), vec![Event(1), Event(2), Event(3)]);

    bus.emitter().emit(Event(3));
    bus.update(0.0).expect("update");
    assert_eq!(journal.labels(), vec!["two-three"]);
}

#[test]
fn unheard_events_are_recycled_silently() {
    let mut bus = EventBus::with_settings(
        BusSettings {
            pool: PoolSettings {
                initial_capacity: 1,
                max_free: 8,
            },
            failure_policy: FailurePolicy::Abort,
        },
        names(&[]),
    );
    bus.emitter().emit(Event(404));
    let report = bus.update(0.0).expect("no listeners is not an error");
    assert_eq!(report.immediate, 1);
    assert_eq!(report.invocations, 0);
    assert_eq!(bus.pool_stats().outstanding, 0);
}

#[test]
fn pool_outstanding_tracks_only_pending_delays() {
    let mut bus = EventBus::new();
    bus.emitter().emit(Event(1));
    bus.emitter().emit_later(5.0, Event(2));
    bus.emitter().emit_later(0.5, Event(3));

    bus.update(1.0).expect("update");
    let stats = bus.pool_stats();
    assert_eq!(stats.outstanding, 1);
    assert_eq!(bus.emitter().pending_delayed(), 1);
}

#[test]
fn isolated_failure_does_not_block_other_listeners() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(failing_listener("first"), &[Event(1)]);
    bus.register(journal.recorder("after"), &[Event(1)]);

    bus.emitter().emit(Event(1));
    let report = bus.update(0.0).expect("isolate");
    assert_eq!(report.failures, 1);
    assert_eq!(journal.labels(), vec!["after"]);
}

#[test]
fn abort_failure_keeps_later_emissions_for_next_frame() {
    let journal = Journal::new();
    let mut bus = EventBus::with_settings(
        BusSettings {
            failure_policy: FailurePolicy::Abort,
            ..BusSettings::default()
        },
        names(&[(1, "fragile")]),
    );
    bus.register(emitting_listener(Event(2)), &[Event(1)]);
    bus.register(failing_listener("broken"), &[Event(1)]);
    bus.register(journal.recorder("l"), &[Event(2)]);

    bus.emitter().emit(Event(1));
    let err = bus.update(0.0).expect_err("abort");
    assert_eq!(err.event(), Event(1));

    // the follow-up emitted before the failure still lands next frame
    bus.update(0.0).expect("next frame");
    assert_eq!(journal.events(), vec![Event(2)]);
    assert_eq!(bus.frame(), 2);
}

#[test]
fn fixed_step_delay_fires_on_the_frame_the_sum_reaches_it() {
    let journal = Journal::new();
    let mut bus = EventBus::new();
    bus.register(journal.recorder("l"), &[Event(6)]);

    bus.emitter().emit_later(0.3, Event(6));
    let mut fired_at = None;
    for frame in 1..=5 {
        bus.update(0.1).expect("update");
        if fired_at.is_none() && !journal.is_empty() {
            fired_at = Some(frame);
        }
    }
    assert_eq!(fired_at, Some(3));
    assert_eq!(journal.len(), 1);
}

#[test]
fn aborted_pass_still_delivers_scheduled_events_later() {
    let journal = Journal::new();
    let mut bus = EventBus::with_settings(
        BusSettings {
            failure_policy: FailurePolicy::Abort,
            ..BusSettings::default()
        },
        names(&[]),
    );
    bus.register(failing_listener("broken"), &[Event(1)]);
    bus.register(journal.recorder("l"), &[Event(2)]);

    bus.emitter().emit_later(0.5, Event(1));
    bus.emitter().emit_later(0.5, Event(2));

    assert!(bus.update(1.0).is_err());
    for _ in 0..5 {
        bus.update(1.0).expect("later frames");
    }
    assert_eq!(journal.events(), vec![Event(2)]);
    assert_eq!(bus.pending_delayed(), 0);
    assert_eq!(bus.pool_stats().outstanding, 0);
}
