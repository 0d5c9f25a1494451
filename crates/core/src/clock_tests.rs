// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(60));
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(30));
}

#[tokio::test]
async fn fake_clock_sleep_advances_and_records() {
    let clock = FakeClock::new();
    let t1 = clock.now();

    clock.sleep(Duration::from_millis(1500)).await;
    clock.sleep(Duration::from_secs(30)).await;

    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_millis(1500), Duration::from_secs(30)]
    );
    assert_eq!(clock.now().duration_since(t1), Duration::from_millis(31_500));
}

#[tokio::test]
async fn fake_clock_utc_follows_virtual_time() {
    let clock = FakeClock::new();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    clock.set_utc(start);

    clock.sleep(Duration::from_secs(90)).await;

    assert_eq!(
        clock.utc_now(),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 30).unwrap()
    );
}
