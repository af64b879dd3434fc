//! Tests for the key rebinding interaction.

use std::thread;
use std::time::Duration;

use padmap::bindings::ConflictPolicy;
use padmap::bindings_list::BindingsList;
use padmap::capture::CaptureEvent;
use padmap::config::PadConfig;
use padmap::keys::KeyCode;
use padmap::pad::{PadControl, PadType};
use padmap::rebind::{IDLE_STATUS, KeyRebinder, RebindOutcome};

const KEY_Q: KeyCode = KeyCode(0x51);
const KEY_Z: KeyCode = KeyCode(0x5A);

/// Config whose port 0 has no bindings at all.
fn empty_config() -> PadConfig {
    let mut config = PadConfig::default();
    config.populate(0, PadType::Unplugged).unwrap();
    config
}

/// Runs one capture that receives `event`, returning the outcome.
fn rebind(
    config: &mut PadConfig,
    port: usize,
    control: PadControl,
    event: CaptureEvent,
) -> Option<RebindOutcome> {
    let mut rebinder = KeyRebinder::default();
    rebinder.start(config, port, control).expect("start failed");
    assert_eq!(rebinder.poll(config).unwrap(), None);
    rebinder.sender().send(event).unwrap();
    rebinder.poll(config).expect("poll failed")
}

#[test]
fn test_bind_unbound_control() {
    let mut config = PadConfig::default();
    let before = config.port(0).unwrap().bindings.clone();
    assert_eq!(before.key_for(PadControl::L3), None);

    let outcome = rebind(&mut config, 0, PadControl::L3, CaptureEvent::Key(KEY_Q));
    assert!(matches!(
        outcome,
        Some(RebindOutcome::Bound {
            port: 0,
            control: PadControl::L3,
            key: KEY_Q,
            ..
        })
    ));

    let after = &config.port(0).unwrap().bindings;
    assert_eq!(after.control_for(KEY_Q), Some(PadControl::L3));
    assert_eq!(after.key_for(PadControl::L3), Some(KEY_Q));
    assert_eq!(after.len(), before.len() + 1);
    for (key, control) in before.keysym_map() {
        assert_eq!(after.control_for(key), Some(control));
    }
}

#[test]
fn test_rebind_removes_old_key() {
    let mut config = empty_config();
    rebind(&mut config, 0, PadControl::Cross, CaptureEvent::Key(KEY_Q));
    let outcome = rebind(&mut config, 0, PadControl::Cross, CaptureEvent::Key(KEY_Z));

    match outcome {
        Some(RebindOutcome::Bound { change, .. }) => {
            assert_eq!(change.previous_key, Some(KEY_Q));
            assert_eq!(change.displaced, None);
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let bindings = &config.port(0).unwrap().bindings;
    assert_eq!(bindings.control_for(KEY_Q), None);
    assert_eq!(bindings.control_for(KEY_Z), Some(PadControl::Cross));
    assert_eq!(bindings.len(), 1);
}

#[test]
fn test_cancel_leaves_config_unchanged() {
    let mut config = PadConfig::default();
    let before = config.clone();

    let outcome = rebind(&mut config, 0, PadControl::Cross, CaptureEvent::Cancel);
    assert_eq!(outcome, Some(RebindOutcome::Cancelled));
    assert_eq!(config, before);

    let outcome = rebind(
        &mut config,
        0,
        PadControl::Cross,
        CaptureEvent::from_key(KeyCode::ESCAPE),
    );
    assert_eq!(outcome, Some(RebindOutcome::Cancelled));
    assert_eq!(config, before);
}

#[test]
fn test_token_cancel_ignores_later_key() {
    let mut config = PadConfig::default();
    let before = config.clone();
    let mut rebinder = KeyRebinder::default();

    let token = rebinder.start(&config, 0, PadControl::Start).unwrap();
    token.cancel();
    rebinder.sender().send(CaptureEvent::Key(KEY_Q)).unwrap();

    assert_eq!(
        rebinder.poll(&mut config).unwrap(),
        Some(RebindOutcome::Cancelled)
    );
    assert_eq!(config, before);
    assert_eq!(rebinder.status(), IDLE_STATUS);
}

#[test]
fn test_list_has_one_row_per_binding() {
    let mut config = empty_config();
    let mut list = BindingsList::new(0);
    list.refresh(&config).unwrap();
    assert!(list.rows().is_empty());

    rebind(&mut config, 0, PadControl::L1, CaptureEvent::Key(KEY_Q));
    rebind(&mut config, 0, PadControl::R1, CaptureEvent::Key(KEY_Z));
    list.refresh(&config).unwrap();

    assert_eq!(list.rows().len(), 2);
    let labels: Vec<(&str, &str, &str)> = list
        .rows()
        .iter()
        .map(|r| (r.device, r.key_name.as_str(), r.control_label))
        .collect();
    assert_eq!(
        labels,
        vec![("Keyboard", "Q", "L1"), ("Keyboard", "Z", "R1")]
    );
}

#[test]
fn test_same_key_twice_steals() {
    let mut config = empty_config();
    rebind(&mut config, 0, PadControl::Square, CaptureEvent::Key(KEY_Q));
    let outcome = rebind(&mut config, 0, PadControl::Circle, CaptureEvent::Key(KEY_Q));

    match outcome {
        Some(RebindOutcome::Bound { change, .. }) => {
            assert_eq!(change.displaced, Some(PadControl::Square));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let bindings = &config.port(0).unwrap().bindings;
    assert_eq!(bindings.control_for(KEY_Q), Some(PadControl::Circle));
    assert_eq!(bindings.key_for(PadControl::Circle), Some(KEY_Q));
    // the first control no longer claims the key
    assert_eq!(bindings.key_for(PadControl::Square), None);
}

#[test]
fn test_same_key_twice_rejected() {
    let mut config = empty_config();
    config.conflict_policy = ConflictPolicy::Reject;
    rebind(&mut config, 0, PadControl::Square, CaptureEvent::Key(KEY_Q));
    let before = config.clone();

    let mut rebinder = KeyRebinder::default();
    rebinder.start(&config, 0, PadControl::Circle).unwrap();
    rebinder.sender().send(CaptureEvent::Key(KEY_Q)).unwrap();

    assert!(rebinder.poll(&mut config).is_err());
    assert_eq!(config, before);
    assert!(!rebinder.is_capturing());
    assert_eq!(rebinder.status(), IDLE_STATUS);
}

#[test]
fn test_ports_are_independent() {
    let mut config = PadConfig::default();
    rebind(&mut config, 1, PadControl::Cross, CaptureEvent::Key(KeyCode(0x4B)));

    assert_eq!(
        config.port(1).unwrap().bindings.control_for(KeyCode(0x4B)),
        Some(PadControl::Cross)
    );
    // K still drives Cross on port 0 as well
    assert_eq!(
        config.port(0).unwrap().bindings.control_for(KeyCode(0x4B)),
        Some(PadControl::Cross)
    );
}

#[test]
fn test_capture_timeout() {
    let mut config = PadConfig::default();
    config.capture_timeout_ms = 20;
    let before = config.clone();

    let mut rebinder = KeyRebinder::from_config(&config);
    rebinder.start(&config, 0, PadControl::Cross).unwrap();
    thread::sleep(Duration::from_millis(60));

    assert_eq!(
        rebinder.poll(&mut config).unwrap(),
        Some(RebindOutcome::TimedOut)
    );
    assert_eq!(config, before);
}

#[test]
fn test_key_from_another_thread() {
    let mut config = empty_config();
    let mut rebinder = KeyRebinder::default();
    rebinder.start(&config, 0, PadControl::Triangle).unwrap();

    let sender = rebinder.sender();
    thread::spawn(move || sender.send(CaptureEvent::Key(KEY_Z)).unwrap())
        .join()
        .unwrap();

    let outcome = rebinder.poll(&mut config).unwrap();
    assert!(matches!(outcome, Some(RebindOutcome::Bound { key: KEY_Z, .. })));
}
