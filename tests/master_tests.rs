//! Exchange orchestration tests against the mock transport: exact TX
//! bytes, response classification, FCB progression on the wire, and
//! stale-byte handling.

use mbus_master::mbus::serial_mock::MockMBusPort;
use mbus_master::{ExchangeResult, MBusError, MBusMaster};
use std::io;
use std::time::Duration;

/// A master with timing collapsed so tests run instantly.
fn fast_master(port: MockMBusPort) -> MBusMaster<MockMBusPort> {
    MBusMaster::with_timing(port, Duration::from_millis(1), Duration::from_millis(20))
}

#[tokio::test]
async fn test_initialize_client_tx_and_ack() {
    let port = MockMBusPort::new();
    port.queue_ack();

    let mut master = fast_master(port.clone());
    let result = master.initialize_client(0x02).await.unwrap();
    assert_eq!(result, ExchangeResult::Ack);

    assert_eq!(port.tx_frames(), vec![vec![0x10, 0x40, 0x02, 0x42, 0x16]]);
}

#[tokio::test]
async fn test_request_user_data2_fcb_progression() {
    let port = MockMBusPort::new();
    port.queue_ack();
    port.queue_ack();
    port.queue_ack();

    let mut master = fast_master(port.clone());
    for _ in 0..3 {
        master.request_user_data2(0x05).await.unwrap();
    }

    let frames = port.tx_frames();
    // Set, Clear, Set on consecutive polls of the same kind
    assert_eq!(frames[0], vec![0x10, 0x7B, 0x05, 0x80, 0x16]);
    assert_eq!(frames[1], vec![0x10, 0x5B, 0x05, 0x60, 0x16]);
    assert_eq!(frames[2], vec![0x10, 0x7B, 0x05, 0x80, 0x16]);
}

#[tokio::test]
async fn test_init_resets_fcb_between_polls() {
    let port = MockMBusPort::new();
    for _ in 0..4 {
        port.queue_ack();
    }

    let mut master = fast_master(port.clone());
    master.request_user_data2(0x05).await.unwrap();
    master.initialize_client(0x05).await.unwrap();
    master.request_user_data2(0x05).await.unwrap();
    master.request_user_data2(0x05).await.unwrap();

    let frames = port.tx_frames();
    assert_eq!(frames[0][1], 0x7B); // set
    assert_eq!(frames[1][1], 0x40); // SND_NKE, no bit on the wire
    assert_eq!(frames[2][1], 0x7B); // restarted at set
    assert_eq!(frames[3][1], 0x5B); // then alternating again
}

#[tokio::test]
async fn test_data_response_preserved() {
    let response = [
        0x68, 0x05, 0x05, 0x68, 0x08, 0x05, 0x72, 0x01, 0x02, 0x82, 0x16,
    ];
    let port = MockMBusPort::new();
    port.queue_response(&response);

    let mut master = fast_master(port.clone());
    let result = master.request_user_data2(0x05).await.unwrap();
    assert_eq!(result, ExchangeResult::Data(response.to_vec()));
}

#[tokio::test]
async fn test_empty_read_is_no_response() {
    let port = MockMBusPort::new();
    port.queue_empty();

    let mut master = fast_master(port.clone());
    let result = master.request_user_data1(0x05).await.unwrap();
    assert_eq!(result, ExchangeResult::NoResponse);
}

#[tokio::test]
async fn test_read_timeout_is_no_response() {
    let port = MockMBusPort::new();
    port.set_silent(true);

    let mut master = fast_master(port.clone());
    let result = master.request_user_data2(0x05).await.unwrap();
    assert_eq!(result, ExchangeResult::NoResponse);
}

#[tokio::test]
async fn test_read_error_coalesces_to_no_response() {
    let port = MockMBusPort::new();
    port.set_next_read_error(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));

    let mut master = fast_master(port.clone());
    let result = master.request_user_data2(0x05).await.unwrap();
    assert_eq!(result, ExchangeResult::NoResponse);
}

#[tokio::test]
async fn test_write_error_propagates() {
    let port = MockMBusPort::new();
    port.set_next_write_error(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));

    let mut master = fast_master(port.clone());
    let result = master.request_user_data2(0x05).await;
    assert!(matches!(result, Err(MBusError::SerialPortError(_))));
}

#[tokio::test]
async fn test_send_control_frame_bytes() {
    let port = MockMBusPort::new();
    port.queue_ack();

    let mut master = fast_master(port.clone());
    master.send_control(0xFE, 0x51).await.unwrap();

    // SND_UD with FCB set on a fresh session
    assert_eq!(
        port.tx_frames()[0],
        vec![0x68, 0x03, 0x03, 0x68, 0x73, 0xFE, 0x51, 0xC2, 0x16]
    );
}

#[tokio::test]
async fn test_send_long_telegram_bytes() {
    let port = MockMBusPort::new();
    port.queue_ack();

    let mut master = fast_master(port.clone());
    master
        .send_long_telegram(0xFE, 0x51, &[0x01, 0x7F, 0x01])
        .await
        .unwrap();

    assert_eq!(
        port.tx_frames()[0],
        vec![0x68, 0x06, 0x06, 0x68, 0x73, 0xFE, 0x51, 0x01, 0x7F, 0x01, 0x43, 0x16]
    );
}

#[tokio::test]
async fn test_oversized_payload_rejected_before_any_traffic() {
    let port = MockMBusPort::new();
    let mut master = fast_master(port.clone());

    let payload = vec![0u8; 300];
    let result = master.send_long_telegram(0x01, 0x51, &payload).await;
    assert!(matches!(result, Err(MBusError::PayloadTooLarge(300))));
    assert!(port.tx_frames().is_empty());

    // the failed build did not burn an FCB toggle
    port.queue_ack();
    master.send_long_telegram(0x01, 0x51, &[0x00]).await.unwrap();
    assert_eq!(port.tx_frames()[0][4], 0x73); // still the first "set" bit
}

#[tokio::test]
async fn test_receive_buffer_drained_each_exchange() {
    let port = MockMBusPort::new();
    port.queue_ack();
    port.queue_ack();

    let mut master = fast_master(port.clone());
    master.request_user_data2(0x05).await.unwrap();
    master.request_user_data2(0x05).await.unwrap();

    assert_eq!(port.clear_count(), 2);
}
