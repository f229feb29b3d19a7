//! End-to-end flow: ingest readings through the correction pipeline, then
//! run every analyzer against the same store.

use barotrend::analysis::front;
use barotrend::analysis::system::{self, PressureSystem};
use barotrend::analysis::trend::{self, Tendency, Trend};
use barotrend::{Config, FixedClock, ReadingStore, SensorMeta, Timestamp};

const MS_PER_MINUTE: u64 = 60_000;
const NOW: Timestamp = 1_740_000_000_000;

fn store() -> ReadingStore<FixedClock> {
    ReadingStore::with_clock(Config::default(), FixedClock::new(NOW))
}

fn minutes_ago(minutes: u64) -> Timestamp {
    NOW - minutes * MS_PER_MINUTE
}

fn add(store: &mut ReadingStore<FixedClock>, minutes: u64, pressure: f32) {
    store
        .add(Some(minutes_ago(minutes)), pressure, SensorMeta::default())
        .unwrap()
        .unwrap();
}

#[test]
fn slow_drift_reports_the_three_hour_window() {
    let mut store = store();
    add(&mut store, 170, 101_350.0);
    add(&mut store, 1, 101_355.0);

    let forecast = trend::forecast(&store).unwrap();

    // Only the three-hour window has two readings
    assert_eq!(forecast.period, 180);
    assert_eq!(forecast.tendency, Tendency::Rising);
    assert_eq!(forecast.trend, Trend::Steady);
    assert_eq!(forecast.difference, 5.0);
    assert_eq!(forecast.from.timestamp, minutes_ago(170));
    assert_eq!(forecast.to.timestamp, minutes_ago(1));
}

#[test]
fn fresh_fall_wins_the_severity_arbitration() {
    let mut store = store();
    add(&mut store, 170, 101_500.0);
    add(&mut store, 160, 101_200.0);
    add(&mut store, 50, 101_350.0);
    add(&mut store, 40, 100_900.0);

    let forecast = trend::forecast(&store).unwrap();

    // Both windows classify Rapidly; the one-hour window takes the tie
    assert_eq!(forecast.period, 60);
    assert_eq!(forecast.tendency, Tendency::Falling);
    assert_eq!(forecast.trend, Trend::Rapidly);
    assert_eq!(forecast.difference, -450.0);
}

#[test]
fn cold_front_passage_pattern() {
    let mut store = store();
    add(&mut store, 170, 101_400.0);
    add(&mut store, 130, 101_390.0);
    add(&mut store, 110, 101_380.0);
    add(&mut store, 70, 101_370.0);
    add(&mut store, 50, 101_370.0);
    add(&mut store, 10, 101_380.0);

    let forecast = front::forecast(&store).unwrap();

    assert_eq!(forecast.pattern(), "FFR");
    assert_eq!(forecast.signature.event, "Cold front passage");
}

#[test]
fn front_needs_every_segment() {
    let mut store = store();
    // Nothing between three and two hours ago
    add(&mut store, 110, 101_380.0);
    add(&mut store, 70, 101_370.0);
    add(&mut store, 50, 101_370.0);
    add(&mut store, 10, 101_380.0);

    assert!(front::forecast(&store).is_none());
}

#[test]
fn system_view_of_a_building_high() {
    let mut store = store();
    add(&mut store, 170, 101_350.0);
    add(&mut store, 110, 101_420.0);
    add(&mut store, 50, 101_480.0);
    add(&mut store, 10, 101_540.0);

    let latest = store.latest_reading().copied().unwrap();
    let current = store.effective_pressure(&latest);
    let result = system::forecast(current, &store.readings_since(180), store.config());

    assert_eq!(result.current, PressureSystem::High);
    assert_eq!(result.trending, Some(PressureSystem::High));
}

#[test]
fn data_quality_tracks_ingest_coverage() {
    let mut store = store();
    assert_eq!(store.data_quality(), 0);

    add(&mut store, 170, 101_400.0);
    add(&mut store, 130, 101_390.0);
    add(&mut store, 110, 101_380.0);

    // Three of six half-hour buckets occupied
    assert_eq!(store.data_quality(), 50);

    add(&mut store, 70, 101_370.0);
    add(&mut store, 50, 101_370.0);
    add(&mut store, 10, 101_380.0);
    assert_eq!(store.data_quality(), 100);
}

#[test]
fn altitude_feed_analyzed_at_sea_level() {
    let mut store = store();
    store.config_mut().prefer_sea_level = true;

    let meta = SensorMeta::at_altitude(100.0);
    store.add(Some(minutes_ago(170)), 98_000.0, meta).unwrap().unwrap();
    store.add(Some(minutes_ago(1)), 98_000.0, meta).unwrap().unwrap();

    // Both readings adjust to 99168 Pa; the trend sees a flat series
    let forecast = trend::forecast(&store).unwrap();
    assert_eq!(forecast.difference, 0.0);
    assert_eq!(forecast.trend, Trend::Steady);
    assert_eq!(store.pressure_by_default_choice(None), Some(99_168.0));
}

#[test]
fn observer_runs_inside_the_ingest_flow() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut store = store();
    let log: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);

    store.subscribe(move |reading| {
        sink.borrow_mut().push(reading.raw_pressure);
    });

    add(&mut store, 20, 101_320.0);
    add(&mut store, 10, 101_330.0);

    assert_eq!(*log.borrow(), vec![101_320.0, 101_330.0]);
}
