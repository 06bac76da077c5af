use std::collections::{HashMap, HashSet};

use eyre::Result;
use flight_seats_core::FareClass::{self, Business, Economy, First};
use flight_seats_core::{BookResult, FlightNumber, PassengerId};
use flight_seats_tests::TestCtxBuilder;
use futures::future::join_all;
use nanorand::Rng;
use util::{active_passengers, assert_conserved};

mod util;

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_race_for_the_last_seat() -> Result<()> {
    const PASSENGERS: u64 = 64;
    let flight = FlightNumber(100);
    let ctx = TestCtxBuilder::new()
        .with_flight(100, &[(Economy, 1)])?
        .with_handler_threads(8)
        .build()
        .await?;

    let results = join_all((0..PASSENGERS).map(|p| {
        let api = ctx.api.clone();
        async move { api.book(PassengerId(p), flight, Economy).await }
    }))
    .await;

    let mut confirmed = 0;
    let mut positions = Vec::new();
    for result in results {
        match result?? {
            BookResult::Confirmed { .. } => confirmed += 1,
            BookResult::Waitlisted { position } => positions.push(position),
        }
    }
    positions.sort_unstable();

    assert_eq!(confirmed, 1, "Exactly one passenger must get the last seat.");
    assert_eq!(
        positions,
        (1..PASSENGERS as usize).collect::<Vec<_>>(),
        "Every other passenger must get a distinct waitlist position."
    );

    assert_conserved(&ctx, flight).await?;
    ctx.finish().await
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn test_parallel_flights() -> Result<()> {
    const FLIGHTS: u32 = 4;
    const PASSENGERS: u64 = 400;
    const CLASSES: [FareClass; 3] = [First, Business, Economy];

    let mut builder = TestCtxBuilder::new().with_handler_threads(8);
    for f in 0..FLIGHTS {
        builder = builder.with_flight(f, &[(First, 4), (Business, 12), (Economy, 40)])?;
    }
    let ctx = builder.build().await?;

    // (flight, class, cancels afterwards)
    let mut rng = nanorand::tls_rng();
    let plans: Vec<_> = (0..PASSENGERS)
        .map(|_| {
            (
                FlightNumber(rng.generate_range(0..FLIGHTS)),
                CLASSES[rng.generate_range(0..CLASSES.len())],
                rng.generate_range(0..3u8) == 0,
            )
        })
        .collect();

    let results = join_all(plans.iter().enumerate().map(|(p, &(flight, class, cancel))| {
        let api = ctx.api.clone();
        let passenger = PassengerId(p as u64);
        async move {
            api.book(passenger, flight, class).await??;
            if cancel {
                api.cancel(passenger, flight).await??;
            }
            eyre::Ok(())
        }
    }))
    .await;
    for result in results {
        result?;
    }

    let mut expected: HashMap<FlightNumber, HashSet<PassengerId>> = HashMap::new();
    for (p, &(flight, _, cancel)) in plans.iter().enumerate() {
        if !cancel {
            expected.entry(flight).or_default().insert(PassengerId(p as u64));
        }
    }
    for f in 0..FLIGHTS {
        let flight = FlightNumber(f);
        assert_conserved(&ctx, flight).await?;
        assert_eq!(
            active_passengers(&ctx, flight).await?,
            expected.remove(&flight).unwrap_or_default(),
            "Exactly the passengers who did not cancel must remain on {flight}."
        );
    }

    ctx.finish().await
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_events_per_flight_follow_mutations() -> Result<()> {
    const PASSENGERS: u64 = 32;
    let flight = FlightNumber(7);
    let ctx = TestCtxBuilder::new()
        .with_flight(7, &[(Economy, 8)])?
        .with_handler_threads(4)
        .build()
        .await?;
    let events = ctx.engine().subscribe();

    join_all((0..PASSENGERS).map(|p| {
        let api = ctx.api.clone();
        async move { api.book(PassengerId(p), flight, Economy).await }
    }))
    .await;
    join_all((0..PASSENGERS).step_by(2).map(|p| {
        let api = ctx.api.clone();
        async move { api.cancel(PassengerId(p), flight).await }
    }))
    .await;

    // replaying the events must reproduce the final seat holders
    let mut holders = HashSet::new();
    for event in events.try_iter() {
        use flight_seats_core::EngineEvent::*;
        match event {
            Confirmed { passenger_id, .. } | Promoted { passenger_id, .. } => {
                assert!(holders.insert(passenger_id), "{passenger_id} got two seats");
            }
            Cancelled { passenger_id, .. } => {
                assert!(holders.remove(&passenger_id), "{passenger_id} had no seat");
            }
            Waitlisted { .. } | LeftWaitlist { .. } => {}
        }
    }
    let info = ctx.api.flight_info(flight).await??;
    let booked: HashSet<_> = info.manifest.iter().map(|entry| entry.passenger_id).collect();
    assert_eq!(holders, booked);

    drop(events);
    ctx.finish().await
}
