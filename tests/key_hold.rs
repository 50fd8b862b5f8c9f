use cockpit::{
    CockpitSettings, EventStream, InputEvent, KeyInput, KeyPhase, KeyboardHandle, RawKeyEvent,
    Subscription,
};
use tokio::time::{sleep, Duration};

async fn next_key(subscription: &mut Subscription) -> KeyInput {
    match subscription.recv().await {
        Some(InputEvent::Key(key)) => key,
        other => panic!("expected key event, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn hold_sequence_press_held_release() {
    let mut keyboard = KeyboardHandle::spawn(&CockpitSettings::default(), EventStream::default());
    let mut subscription = keyboard.subscribe();

    keyboard.key_down("a").await.unwrap();
    let press = next_key(&mut subscription).await;
    assert_eq!(press.event, KeyPhase::Press);
    assert_eq!((press.dt, press.held), (0.0, 0.0));
    assert!(press.keys_held.contains("a"));

    let first = next_key(&mut subscription).await;
    let second = next_key(&mut subscription).await;
    assert_eq!(first.event, KeyPhase::Held);
    assert_eq!(second.event, KeyPhase::Held);
    assert!(first.held > 0.0);
    assert!(second.held > first.held);
    assert!(second.keys_held.contains("a"));

    keyboard.key_up("a").await.unwrap();
    let release = loop {
        let key = next_key(&mut subscription).await;
        if key.event == KeyPhase::Release {
            break key;
        }
        assert_eq!(key.event, KeyPhase::Held);
    };
    assert_eq!((release.dt, release.held), (0.0, 0.0));
    assert!(release.keys_held.is_empty());

    sleep(Duration::from_millis(200)).await;
    assert!(subscription.try_recv().is_none());

    keyboard.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn auto_repeat_and_case_do_not_start_new_sequences() {
    let mut keyboard = KeyboardHandle::spawn(&CockpitSettings::default(), EventStream::default());
    let mut subscription = keyboard.subscribe();

    keyboard.key_down("A").await.unwrap();
    keyboard
        .send(RawKeyEvent::Down {
            key: "a".to_string(),
            repeat: true,
        })
        .await
        .unwrap();
    keyboard.key_down("a").await.unwrap();
    keyboard.key_up("A").await.unwrap();

    let mut phases = Vec::new();
    loop {
        let key = next_key(&mut subscription).await;
        assert_eq!(key.key, "a");
        phases.push(key.event);
        if key.event == KeyPhase::Release {
            break;
        }
    }
    let presses = phases.iter().filter(|p| **p == KeyPhase::Press).count();
    assert_eq!(presses, 1);

    keyboard.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn concurrent_keys_run_independent_sequences() {
    let mut keyboard = KeyboardHandle::spawn(&CockpitSettings::default(), EventStream::default());
    let mut subscription = keyboard.subscribe();

    keyboard.key_down("w").await.unwrap();
    keyboard.key_down("d").await.unwrap();
    sleep(Duration::from_millis(100)).await;
    keyboard.key_up("w").await.unwrap();
    sleep(Duration::from_millis(100)).await;
    keyboard.key_up("d").await.unwrap();
    sleep(Duration::from_millis(10)).await;

    let mut events = Vec::new();
    while let Some(InputEvent::Key(key)) = subscription.try_recv() {
        events.push(key);
    }

    let held = |name: &str| {
        events
            .iter()
            .filter(|k| k.key == name && k.event == KeyPhase::Held)
            .count()
    };
    assert!(held("w") >= 2);
    assert!(held("d") > held("w"));

    let release_w = events
        .iter()
        .find(|k| k.key == "w" && k.event == KeyPhase::Release)
        .unwrap();
    assert_eq!(release_w.keys_held.iter().collect::<Vec<_>>(), vec!["d"]);
    let release_d = events.last().unwrap();
    assert_eq!((release_d.key.as_str(), release_d.event), ("d", KeyPhase::Release));
    assert!(release_d.keys_held.is_empty());

    keyboard.shutdown().await.unwrap();
}
