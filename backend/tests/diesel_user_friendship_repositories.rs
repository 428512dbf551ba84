//! User lookup and friendship reads against embedded PostgreSQL.

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use rstest::{fixture, rstest};

use embedded_postgres::{PgContext, pg_context};
use fitfeed::domain::ports::{FriendshipRepository, UserRepository};
use fitfeed::domain::{Handle, UserId};
use fitfeed::outbound::persistence::{DieselFriendshipRepository, DieselUserRepository};

struct Fixture {
    ctx: PgContext,
    users: DieselUserRepository,
    friendships: DieselFriendshipRepository,
    ada: UserId,
    grace: UserId,
    linus: UserId,
}

#[fixture]
fn fixture() -> Option<Fixture> {
    let mut ctx = pg_context()?;
    let ada = ctx.add_user("Ada", "ada@example.com");
    let grace = ctx.add_user("Grace", "grace@example.com");
    let linus = ctx.add_user("Linus", "linus@example.com");
    let users = DieselUserRepository::new(ctx.pool.clone());
    let friendships = DieselFriendshipRepository::new(ctx.pool.clone());
    Some(Fixture {
        ctx,
        users,
        friendships,
        ada,
        grace,
        linus,
    })
}

#[rstest]
fn handles_resolve_to_profiles(fixture: Option<Fixture>) {
    let Some(f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: handles_resolve_to_profiles skipped");
        return;
    };
    let handle = Handle::new("grace@example.com").expect("handle");

    let profile = f
        .ctx
        .runtime
        .block_on(f.users.find_by_handle(&handle))
        .expect("lookup")
        .expect("grace exists");

    assert_eq!(profile.id(), f.grace);
    assert_eq!(profile.name().as_ref(), "Grace");
    assert_eq!(profile.handle(), &handle);
}

#[rstest]
fn unknown_handles_are_absent(fixture: Option<Fixture>) {
    let Some(f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_handles_are_absent skipped");
        return;
    };
    let handle = Handle::new("nobody@example.com").expect("handle");

    let profile = f
        .ctx
        .runtime
        .block_on(f.users.find_by_handle(&handle))
        .expect("lookup");

    assert!(profile.is_none());
}

#[rstest]
fn friend_ids_follow_row_direction(fixture: Option<Fixture>) {
    let Some(mut f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: friend_ids_follow_row_direction skipped");
        return;
    };
    f.ctx.add_friendship(f.ada, f.grace);
    f.ctx.add_friendship(f.ada, f.linus);

    let (mut of_ada, of_grace) = f.ctx.runtime.block_on(async {
        (
            f.friendships.friend_ids(f.ada).await.expect("ada's friends"),
            f.friendships.friend_ids(f.grace).await.expect("grace's friends"),
        )
    });
    of_ada.sort_unstable();

    assert_eq!(of_ada, vec![f.grace, f.linus]);
    assert!(of_grace.is_empty(), "rows are directed; no reverse row exists");
}

#[rstest]
fn friendship_checks_accept_either_direction(fixture: Option<Fixture>) {
    let Some(mut f) = fixture else {
        eprintln!("SKIP-TEST-CLUSTER: friendship_checks_accept_either_direction skipped");
        return;
    };
    f.ctx.add_friendship(f.ada, f.grace);

    let (forward, backward, strangers) = f.ctx.runtime.block_on(async {
        (
            f.friendships.exists_between(f.ada, f.grace).await.expect("forward"),
            f.friendships.exists_between(f.grace, f.ada).await.expect("backward"),
            f.friendships.exists_between(f.grace, f.linus).await.expect("strangers"),
        )
    });

    assert!(forward);
    assert!(backward);
    assert!(!strangers);
}
