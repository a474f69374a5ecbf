//! End-to-end pipeline tests over the in-memory store: one sample in,
//! persisted notifications out, live and push delivery observed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::alerting::Classifier;
use domain::models::{Device, NotificationType, PushToken, RawSample};
use domain::services::{
    LiveChannel, MemoryTelemetryStore, MockPushService, PushService, TelemetryStore,
};
use engine::config::FanoutConfig;
use engine::services::{BroadcastLiveChannel, FanoutDispatcher, IngestionService};
use uuid::Uuid;

struct Pipeline {
    store: Arc<MemoryTelemetryStore>,
    live: Arc<BroadcastLiveChannel>,
    push: Arc<MockPushService>,
    ingestion: IngestionService,
}

fn pipeline() -> Pipeline {
    let store = Arc::new(MemoryTelemetryStore::new());
    let live = Arc::new(BroadcastLiveChannel::new(16));
    let push = Arc::new(MockPushService::new());

    let store_seam: Arc<dyn TelemetryStore> = store.clone();
    let live_seam: Arc<dyn LiveChannel> = live.clone();
    let push_seam: Arc<dyn PushService> = push.clone();

    let dispatcher = Arc::new(FanoutDispatcher::new(
        store_seam.clone(),
        live_seam,
        push_seam,
        FanoutConfig::default(),
    ));
    let ingestion = IngestionService::new(store_seam, Classifier::default(), dispatcher);

    Pipeline {
        store,
        live,
        push,
        ingestion,
    }
}

fn device(id: i64) -> Device {
    Device {
        id,
        device_code: Some(format!("DSP-{id:03}")),
        name: format!("Dispenser {id}"),
        floor_number: 3,
        room_number: "307".to_string(),
        consumable_type: "tissue".to_string(),
        meter_capacity: 500,
        refer_value: 450,
        created_at: Utc::now(),
    }
}

fn token(device_id: i64, value: &str) -> PushToken {
    PushToken {
        id: 0,
        user_id: Uuid::new_v4(),
        device_id: Some(device_id),
        token: value.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample(device_id: i64) -> RawSample {
    RawSample {
        device_id,
        device_timestamp: Some("2026-08-29T10:00:00".to_string()),
        fill_alert: None,
        count: 200,
        refer_val: 450,
        total_usage: Some(250),
        tamper: Some("false".to_string()),
        battery_percentage: Some("95".to_string()),
        power_status: Some("on".to_string()),
    }
}

#[tokio::test]
async fn tamper_sample_reaches_live_subscriber_and_push_tokens() {
    let p = pipeline();
    p.store.insert_device(device(1));
    p.store.insert_token(token(1, "ExponentPushToken[aaa]"));

    let mut rx = p.live.subscribe("notifications").await;

    let mut s = sample(1);
    s.tamper = Some("true".to_string());

    let summary = p.ingestion.ingest(s).await.unwrap();
    assert_eq!(summary.notifications, vec![NotificationType::Tamper]);

    // Dispatch runs on a spawned task; the live event proves it completed
    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("live event not delivered")
        .unwrap();
    assert_eq!(event.kind, NotificationType::Tamper);
    assert_eq!(event.priority, 100);
    assert_eq!(event.device.id, 1);

    // The push side finished before the live publish in dispatch order;
    // poll briefly anyway since the task is detached
    for _ in 0..20 {
        if !p.push.sent_tokens().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(p.push.sent_tokens(), vec!["ExponentPushToken[aaa]".to_string()]);
}

#[tokio::test]
async fn replayed_sample_does_not_duplicate_or_redispatch() {
    let p = pipeline();
    p.store.insert_device(device(1));

    let mut s = sample(1);
    s.fill_alert = Some("EMPTY".to_string());

    let first = p.ingestion.ingest(s.clone()).await.unwrap();
    assert_eq!(first.notifications, vec![NotificationType::Empty]);

    // A re-sent sample is a new reading, so it legitimately re-alerts;
    // replaying the same stored reading must not
    let notifications = p.store.notifications();
    assert_eq!(notifications.len(), 1);

    let reading = &p.store.readings()[0];
    let normalized = domain::alerting::NormalizedReading::from_reading(reading);
    let conditions = Classifier::default().classify(&normalized);
    let drafts = domain::alerting::materialize(&conditions, &normalized, &device(1));

    for draft in &drafts {
        assert!(p
            .store
            .create_notification_if_absent(draft)
            .await
            .unwrap()
            .is_none());
    }
    assert_eq!(p.store.notifications().len(), 1);
}

#[tokio::test]
async fn mixed_fleet_ingest_orders_notifications_by_priority() {
    let p = pipeline();
    p.store.insert_device(device(1));

    let mut s = sample(1);
    s.fill_alert = Some("LOW".to_string());
    s.tamper = Some("1".to_string());
    s.battery_percentage = Some("15".to_string());

    let summary = p.ingestion.ingest(s).await.unwrap();
    assert_eq!(
        summary.notifications,
        vec![
            NotificationType::Tamper,
            NotificationType::Low,
            NotificationType::BatteryLow
        ]
    );

    let priorities: Vec<i32> = p.store.notifications().iter().map(|n| n.priority).collect();
    let mut sorted = priorities.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(priorities, sorted);
}
