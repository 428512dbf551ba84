//! `DieselEventRepository` against embedded PostgreSQL: window bounds,
//! ordering, grouped workout counts and cascading deletes.

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use embedded_postgres::{PgContext, pg_context};
use fitfeed::domain::ports::{EventRepository, ReactionRepository};
use fitfeed::domain::{
    Event, EventId, EventMetadata, EventType, NewEvent, ReactionLabel, TimeWindow, UserId,
};
use fitfeed::outbound::persistence::{DieselEventRepository, DieselReactionRepository};

struct Fixture {
    ctx: PgContext,
    events: DieselEventRepository,
    ada: UserId,
    grace: UserId,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0)
        .single()
        .expect("timestamp")
}

/// 8 March 00:00 to 10 March 23:59:59.999999 UTC.
fn three_day_window() -> TimeWindow {
    let utc = FixedOffset::east_opt(0).expect("utc");
    TimeWindow::trailing_days(now(), 3, utc).expect("window")
}

#[fixture]
fn fixture() -> Option<Fixture> {
    let mut ctx = pg_context()?;
    let ada = ctx.add_user("Ada", "ada@example.com");
    let grace = ctx.add_user("Grace", "grace@example.com");
    let events = DieselEventRepository::new(ctx.pool.clone());
    Some(Fixture {
        ctx,
        events,
        ada,
        grace,
    })
}

impl Fixture {
    fn record(&self, owner: UserId, tag: &str, at: DateTime<Utc>, metadata: Value) -> Event {
        let new_event = NewEvent {
            owner_id: owner,
            event_type: EventType::new(tag).expect("event type"),
            occurred_at: at,
            metadata: EventMetadata::from_value(&metadata),
        };
        self.ctx
            .runtime
            .block_on(self.events.insert(&new_event))
            .expect("insert event")
    }
}

#[rstest]
fn inserted_events_read_back_unchanged(fixture: Option<Fixture>) {
    let Some(f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: inserted_events_read_back_unchanged skipped");
        return;
    };
    let payload = json!({ "route": { "km": 5.2, "laps": [1, 2] } });

    let stored = f.record(f.ada, "run", now(), payload.clone());
    let found = f
        .ctx
        .runtime
        .block_on(f.events.find_by_id(stored.id))
        .expect("find")
        .expect("event exists");

    assert_eq!(found, stored);
    assert_eq!(found.owner_id, f.ada);
    assert_eq!(found.occurred_at, now());
    assert_eq!(found.metadata.parse().expect("json"), payload);
}

#[rstest]
fn window_bounds_are_inclusive(fixture: Option<Fixture>) {
    let Some(f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: window_bounds_are_inclusive skipped");
        return;
    };
    let window = three_day_window();
    let one_micro = TimeDelta::microseconds(1);

    let at_start = f.record(f.ada, "run", window.start(), json!({}));
    let at_end = f.record(f.ada, "run", window.end(), json!({}));
    f.record(f.ada, "run", window.start() - one_micro, json!({}));
    f.record(f.ada, "run", window.end() + one_micro, json!({}));

    let listed = f
        .ctx
        .runtime
        .block_on(f.events.list_for_owners(&[f.ada], window))
        .expect("list");
    let ids: Vec<EventId> = listed.iter().map(|item| item.event.id).collect();

    assert_eq!(ids, vec![at_end.id, at_start.id]);
}

#[rstest]
fn listing_is_scoped_newest_first_with_id_tiebreak(fixture: Option<Fixture>) {
    let Some(mut f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: listing_is_scoped_newest_first_with_id_tiebreak skipped");
        return;
    };
    let mallory = f.ctx.add_user("Mallory", "mallory@example.com");
    let noon = now() - TimeDelta::hours(6);

    let older = f.record(f.grace, "walk", now() - TimeDelta::days(1), json!({}));
    let tie_low = f.record(f.ada, "run", noon, json!({}));
    let tie_high = f.record(f.grace, "run", noon, json!({}));
    f.record(mallory, "run", noon, json!({}));

    let listed = f
        .ctx
        .runtime
        .block_on(f.events.list_for_owners(&[f.ada, f.grace], three_day_window()))
        .expect("list");
    let ids: Vec<EventId> = listed.iter().map(|item| item.event.id).collect();

    assert_eq!(ids, vec![tie_high.id, tie_low.id, older.id]);
    assert_eq!(listed[0].owner.handle().as_ref(), "grace@example.com");
    assert_eq!(listed[1].owner.name().as_ref(), "Ada");
}

#[rstest]
fn workout_counts_are_grouped_per_owner(fixture: Option<Fixture>) {
    let Some(f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: workout_counts_are_grouped_per_owner skipped");
        return;
    };
    let window = three_day_window();

    f.record(f.ada, "workout", window.start(), json!({}));
    f.record(f.ada, "workout", window.end(), json!({}));
    f.record(f.ada, "workout", window.end() + TimeDelta::microseconds(1), json!({}));
    f.record(f.ada, "run", now(), json!({}));
    f.record(f.grace, "run", now(), json!({}));

    let mut counts = f
        .ctx
        .runtime
        .block_on(f.events.count_by_owner(&[f.ada, f.grace], &EventType::workout(), window))
        .expect("count");
    counts.sort_unstable();

    assert_eq!(counts, vec![(f.ada, 2)]);
}

#[rstest]
fn empty_owner_lists_short_circuit(fixture: Option<Fixture>) {
    let Some(f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: empty_owner_lists_short_circuit skipped");
        return;
    };
    f.record(f.ada, "workout", now(), json!({}));

    let (listed, counted) = f.ctx.runtime.block_on(async {
        (
            f.events.list_for_owners(&[], three_day_window()).await,
            f.events
                .count_by_owner(&[], &EventType::workout(), three_day_window())
                .await,
        )
    });

    assert!(listed.expect("list").is_empty());
    assert!(counted.expect("count").is_empty());
}

#[rstest]
fn deleting_an_event_removes_its_reactions(fixture: Option<Fixture>) {
    let Some(mut f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: deleting_an_event_removes_its_reactions skipped");
        return;
    };
    let reactions = DieselReactionRepository::new(f.ctx.pool.clone());
    let doomed = f.record(f.ada, "run", now(), json!({}));
    let kept = f.record(f.ada, "walk", now(), json!({}));
    let like = ReactionLabel::new("like").expect("label");

    f.ctx.runtime.block_on(async {
        reactions
            .replace_for_user(doomed.id, f.grace, &like)
            .await
            .expect("react to doomed");
        reactions
            .replace_for_user(kept.id, f.grace, &like)
            .await
            .expect("react to kept");
    });

    let (first, second, found) = f.ctx.runtime.block_on(async {
        (
            f.events.delete(doomed.id).await.expect("delete"),
            f.events.delete(doomed.id).await.expect("repeat delete"),
            f.events.find_by_id(doomed.id).await.expect("find"),
        )
    });

    assert!(first);
    assert!(!second, "a missing row reports false");
    assert!(found.is_none());
    assert!(f.ctx.reaction_rows(doomed.id.as_i64()).is_empty());
    assert_eq!(f.ctx.reaction_rows(kept.id.as_i64()).len(), 1);
}
