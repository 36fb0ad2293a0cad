use std::io::{Read, Write};
use std::time::Duration;

use super::*;
use introspectd_core::Limits;

#[test]
fn pipelined_requests_get_ordered_responses() {
    let mut server = Server::init(0, 2, Limits::default(), 0).unwrap();
    server.register_standard_catalogue().unwrap();
    let addr = server.local_addr();
    let running = server.run();

    let mut client = std::net::TcpStream::connect(addr).unwrap();
    client.write_all(br#"{"method":"SayHello","id":1}{"method":"ListAllMethod","id":2}"#).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    // two newline-terminated responses are expected
    while buf.iter().filter(|&&b| b == b'\n').count() < 2 {
        let n = client.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before two responses arrived");
        buf.extend_from_slice(&chunk[..n]);
    }
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    let first: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    let second: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();

    assert_eq!(first["id"], 1);
    assert_eq!(first["result"], "Hello!lepdendstring");
    assert_eq!(second["id"], 2);
    assert!(second["result"].as_str().unwrap().starts_with("SayHello ListAllMethod"));

    drop(client);
    running.stop();
    running.join();
}

#[test]
fn unknown_method_then_say_hello_keeps_connection_open() {
    let mut server = Server::init(0, 1, Limits::default(), 0).unwrap();
    server.register_standard_catalogue().unwrap();
    let addr = server.local_addr();
    let running = server.run();

    let mut client = std::net::TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    client.write_all(br#"{"method":"GetProcNonexistent","id":3}"#).unwrap();

    let mut buf = [0u8; 4096];
    let n = client.read(&mut buf).unwrap();
    let first: serde_json::Value = serde_json::from_slice(&buf[..n]).unwrap();
    assert_eq!(first["error"]["code"], -32601);
    assert_eq!(first["id"], 3);

    client.write_all(br#"{"method":"SayHello","id":4}"#).unwrap();
    let n = client.read(&mut buf).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&buf[..n]).unwrap();
    assert_eq!(second["result"], "Hello!lepdendstring");

    drop(client);
    running.stop();
    running.join();
}

#[test]
fn malformed_json_closes_connection_after_parse_error() {
    let mut server = Server::init(0, 1, Limits::default(), 0).unwrap();
    server.register_standard_catalogue().unwrap();
    let addr = server.local_addr();
    let running = server.run();

    let mut client = std::net::TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    client.write_all(b"{ this is not json").unwrap();

    let mut buf = [0u8; 4096];
    let n = client.read(&mut buf).unwrap();
    let response: serde_json::Value = serde_json::from_slice(&buf[..n]).unwrap();
    assert_eq!(response["error"]["code"], -32700);
    assert_eq!(response["id"], serde_json::Value::Null);

    // server closes the connection after a parse error
    let n = client.read(&mut buf).unwrap();
    assert_eq!(n, 0);

    running.stop();
    running.join();
}
