//! Tests for the frame count bit handshake sequencing.

use mbus_master::mbus::handshake::FcbState;
use mbus_master::mbus::telegram::ControlCode;

#[test]
fn test_three_polls_alternate() {
    let mut state = FcbState::new();
    let bits: Vec<bool> = (0..3)
        .map(|_| state.next_bit(ControlCode::RequestUserData2))
        .collect();
    assert_eq!(bits, vec![true, false, true]);
}

#[test]
fn test_init_between_polls_restarts_sequence() {
    let mut state = FcbState::new();
    assert!(state.next_bit(ControlCode::RequestUserData2));
    state.next_bit(ControlCode::InitializeClient);
    // the poll after the interleaved command goes back to "set"
    assert!(state.next_bit(ControlCode::RequestUserData2));
}

#[test]
fn test_kinds_share_one_sequence() {
    // a single last-command/bit pair tracks the most recent kind; switching
    // always restarts at "set" regardless of what either kind emitted before
    let mut state = FcbState::new();
    assert!(state.next_bit(ControlCode::RequestUserData1));
    assert!(!state.next_bit(ControlCode::RequestUserData1));
    assert!(state.next_bit(ControlCode::RequestUserData2));
    assert!(state.next_bit(ControlCode::RequestUserData1));
}

#[test]
fn test_send_user_data_alternates_too() {
    let mut state = FcbState::new();
    assert!(state.next_bit(ControlCode::SendUserData));
    assert!(!state.next_bit(ControlCode::SendUserData));
    assert!(state.next_bit(ControlCode::SendUserData));
    assert!(!state.next_bit(ControlCode::SendUserData));
}

#[test]
fn test_fresh_state_starts_set_for_any_kind() {
    for code in [
        ControlCode::InitializeClient,
        ControlCode::SendUserData,
        ControlCode::RequestUserData1,
        ControlCode::RequestUserData2,
    ] {
        let mut state = FcbState::new();
        assert!(state.next_bit(code), "{code:?}");
    }
}
