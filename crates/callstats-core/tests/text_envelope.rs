//! Text envelope parsing tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use callstats_core::protocol::text::{Envelope, RoomCommand, SysMessage};

#[test]
fn parse_room_join() {
    let env = Envelope::parse(r#"{"v":1,"svc":"room","type":"join","room":"party:1"}"#).unwrap();
    assert_eq!(env.svc, "room");
    assert_eq!(env.msg_type, "join");
    assert!(env.data.is_none());
    assert_eq!(
        env.room_command().unwrap(),
        Some(RoomCommand::Join("party:1".into()))
    );
}

#[test]
fn parse_keeps_raw_data() {
    let env = Envelope::parse(r#"{"v":1,"svc":"chat","type":"send","data":{"text":"hi"}}"#).unwrap();
    assert!(env.room_command().unwrap().is_none());
    let raw = env.data.unwrap();
    assert!(raw.get().contains("\"text\""));
}

#[test]
fn room_command_requires_room() {
    let env = Envelope::parse(r#"{"v":1,"svc":"room","type":"leave"}"#).unwrap();
    let err = env.room_command().expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn unknown_room_type_is_rejected() {
    let env = Envelope::parse(r#"{"v":1,"svc":"room","type":"kick","room":"a"}"#).unwrap();
    assert!(env.room_command().is_err());
}

#[test]
fn wrong_version_is_rejected() {
    let err = Envelope::parse(r#"{"v":2,"svc":"room","type":"join","room":"a"}"#).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Envelope::parse(r#"{"v":1,"svc":"room","type":"join","rom":"a"}"#).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn sys_message_omits_empty_fields() {
    let s = SysMessage::new("left").to_json().unwrap();
    assert_eq!(s, r#"{"v":1,"svc":"sys","type":"left"}"#);

    let s = SysMessage::new("joined").room("a").to_json().unwrap();
    assert_eq!(s, r#"{"v":1,"svc":"sys","type":"joined","room":"a"}"#);
}
