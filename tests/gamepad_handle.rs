use cockpit::gamepad::VirtualSource;
use cockpit::{
    ButtonStatus, CockpitError, CockpitSettings, Direction, EventStream, GamepadHandle,
    InputEvent, MappingProfile,
};
use tokio::time::{sleep, Duration};

fn plugged_source() -> VirtualSource {
    let source = VirtualSource::new();
    source.plug(0, "virtual pad");
    source
}

async fn next_button(subscription: &mut cockpit::Subscription) -> cockpit::ButtonInput {
    loop {
        match subscription.recv().await {
            Some(InputEvent::Button(button)) => return button,
            Some(_) => continue,
            None => panic!("stream closed"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn press_then_release_is_reported_once_each() {
    let source = plugged_source();
    let stream = EventStream::default();
    let mut handle = GamepadHandle::spawn(source.clone(), CockpitSettings::default(), stream)
        .await
        .unwrap();
    let mut subscription = handle.subscribe();

    source.set_button(0, 0, true);
    let pressed = next_button(&mut subscription).await;
    assert_eq!((pressed.id, pressed.status), (0, ButtonStatus::Pressed));
    assert_eq!(pressed.held, 0.0);

    let still = next_button(&mut subscription).await;
    assert_eq!(still.status, ButtonStatus::Pressed);
    assert!(still.held > 0.0);

    source.set_button(0, 0, false);
    let released = loop {
        let button = next_button(&mut subscription).await;
        if button.status == ButtonStatus::Released {
            break button;
        }
    };
    // Released keeps the accumulated press duration: two 50ms ticks
    assert!((released.held - 0.1).abs() < 1e-6);

    sleep(Duration::from_millis(500)).await;
    assert!(subscription.try_recv().is_none());

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn discovery_times_out_without_devices() {
    let settings = CockpitSettings::default();
    let result = GamepadHandle::spawn(VirtualSource::new(), settings, EventStream::default()).await;
    match result {
        Err(CockpitError::NoDevice { waited_ms }) => assert_eq!(waited_ms, 2000),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("discovery should have failed"),
    }
}

#[tokio::test(start_paused = true)]
async fn late_device_is_discovered() {
    let source = VirtualSource::new();
    let plugger = source.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(700)).await;
        plugger.plug(3, "late pad");
    });

    let mut handle = GamepadHandle::spawn(source, CockpitSettings::default(), EventStream::default())
        .await
        .unwrap();
    let devices = handle.devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, 3);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn connect_rejects_unknown_id() {
    let mut handle =
        GamepadHandle::spawn(plugged_source(), CockpitSettings::default(), EventStream::default())
            .await
            .unwrap();

    let err = handle.connect(5, MappingProfile::Standard).await.unwrap_err();
    assert!(matches!(err, CockpitError::InvalidDeviceId(5)));
    assert_eq!(err.to_string(), "Not a valid gamepad id: 5");

    handle.connect(0, MappingProfile::Alternate).await.unwrap();
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn profile_switch_restarts_held_time() {
    let source = plugged_source();
    let mut handle =
        GamepadHandle::spawn(source.clone(), CockpitSettings::default(), EventStream::default())
            .await
            .unwrap();
    let mut subscription = handle.subscribe();

    source.set_button(0, 0, true);
    sleep(Duration::from_millis(3025)).await;
    let mut held = 0.0;
    while let Some(event) = subscription.try_recv() {
        if let InputEvent::Button(button) = event {
            held = button.held;
        }
    }
    assert!(held > 2.5);

    handle.connect(0, MappingProfile::Alternate).await.unwrap();
    let fresh = next_button(&mut subscription).await;
    assert_eq!(fresh.status, ButtonStatus::Pressed);
    assert_eq!(fresh.held, 0.0);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dpad_buttons_become_a_direction() {
    let source = plugged_source();
    let mut handle =
        GamepadHandle::spawn(source.clone(), CockpitSettings::default(), EventStream::default())
            .await
            .unwrap();
    let mut subscription = handle.subscribe();

    source.set_button(0, 12, true);
    source.set_button(0, 14, true);

    let dpad = loop {
        match subscription.recv().await {
            Some(InputEvent::Dpad(dpad)) => break dpad,
            Some(InputEvent::Button(button)) => {
                assert!(!(12..=15).contains(&button.id), "dpad button leaked")
            }
            Some(_) => {}
            None => panic!("stream closed"),
        }
    };
    assert_eq!(dpad.direction, Direction::NW);

    handle.shutdown().await.unwrap();
}
