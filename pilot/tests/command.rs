use pilot::{command, Command, ConfigHandle, Shutdown};

#[test]
fn commands_parse_with_original_field_names() {
    let cmd: Command =
        serde_json::from_str(r#"{"type":"update_sensitivities","yaw":60.0,"pitch":30.0}"#).unwrap();
    assert_eq!(
        cmd,
        Command::UpdateSensitivities {
            yaw: 60.0,
            pitch: 30.0
        }
    );

    let cmd: Command =
        serde_json::from_str(r#"{"type":"update_calibration","l_wink_ratio":0.2}"#).unwrap();
    assert_eq!(
        cmd,
        Command::UpdateCalibration {
            l_wink_ratio: Some(0.2),
            r_wink_ratio: None,
            wink_succ_frame: None,
            wink_cooldown: None,
        }
    );

    let cmd: Command = serde_json::from_str(r#"{"type":"stop"}"#).unwrap();
    assert_eq!(cmd, Command::Stop);
}

#[test]
fn calibration_updates_only_provided_fields() {
    let config = ConfigHandle::default();
    let stop = command::apply(
        Command::UpdateCalibration {
            l_wink_ratio: Some(0.20),
            r_wink_ratio: None,
            wink_succ_frame: Some(3),
            wink_cooldown: None,
        },
        &config,
    );
    assert!(!stop);
    let snap = config.snapshot();
    assert_eq!(snap.wink_threshold_left, 0.20);
    assert_eq!(snap.wink_threshold_right, 0.24);
    assert_eq!(snap.required_wink_frames, 3);
    assert_eq!(snap.wink_cooldown_secs, 0.5);
}

#[tokio::test]
async fn listener_applies_lines_and_stops_on_command() {
    let input: &[u8] = b"not json at all\n\
        {\"type\":\"update_sensitivities\",\"yaw\":70.0,\"pitch\":35.0}\n\
        {\"type\":\"stop\"}\n";
    let config = ConfigHandle::default();
    let shutdown = Shutdown::new();

    command::listen(input, config.clone(), shutdown.clone()).await;

    assert!(shutdown.is_triggered());
    let snap = config.snapshot();
    assert_eq!(snap.sensitivity_yaw, 70.0);
    assert_eq!(snap.sensitivity_pitch, 35.0);
}

#[tokio::test]
async fn listener_treats_eof_as_shutdown() {
    let input: &[u8] = b"";
    let shutdown = Shutdown::new();
    command::listen(input, ConfigHandle::default(), shutdown.clone()).await;
    assert!(shutdown.is_triggered());
}
