use ethttp::network::application::http::*;
use ethttp::network::error::Error;
use heapless::Vec;

fn frame(serializer: &Serializer, resp: &Response) -> String {
    let mut out: Vec<u8, RESPONSE_BUFFER_SIZE> = Vec::new();
    let len = serializer.serialize(resp, &mut out).unwrap();
    assert_eq!(len, out.len());
    String::from_utf8(out.to_vec()).unwrap()
}

#[test]
fn test_serialize_ok_with_body() {
    let resp = Response::ok().with_body(b"Hello world!").unwrap();

    let text = frame(&Serializer::new(), &resp);

    assert_eq!(
        text,
        "HTTP/1.1 200 Success\n\
         Content-Type: text/plain; charset=utf-8\n\
         Content-Length: 12\n\
         \n\
         Hello world!"
    );
}

#[test]
fn test_serialize_empty_body() {
    let text = frame(&Serializer::new(), &Response::with_status(204));

    assert!(text.starts_with("HTTP/1.1 204 No content\n"));
    assert!(text.contains("Content-Length: 0\n"));
    assert!(text.ends_with("\n\n"));
}

#[test]
fn test_serialize_custom_headers_in_order() {
    let resp = Response::ok()
        .with_header("X-First", "1")
        .unwrap()
        .with_header("X-Second", "2")
        .unwrap();

    let text = frame(&Serializer::new(), &resp);

    let first = text.find("X-First: 1\n").unwrap();
    let second = text.find("X-Second: 2\n").unwrap();
    assert!(first < second);
}

#[test]
fn test_serialize_without_header_support() {
    let resp = Response::ok().with_header("X-Hidden", "1").unwrap();

    let text = frame(&Serializer::new().header_support(false), &resp);

    assert!(!text.contains("X-Hidden"));
    assert!(text.contains("Content-Type: "));
    assert!(text.contains("Content-Length: 0\n"));
}

#[test]
fn test_serialize_filters_forged_content_length() {
    let resp = Response::ok()
        .with_header("content-length", "999")
        .unwrap()
        .with_body(b"abc")
        .unwrap();

    let text = frame(&Serializer::new(), &resp);

    assert!(!text.contains("999"));
    assert_eq!(text.matches("Content-Length").count(), 1);
    assert!(text.contains("Content-Length: 3\n"));
}

#[test]
fn test_serialize_custom_content_type() {
    let resp = Response::ok()
        .with_content_type("application/json")
        .unwrap()
        .with_body(b"{}")
        .unwrap();

    let text = frame(&Serializer::new(), &resp);

    assert!(text.contains("Content-Type: application/json\n"));
}

#[test]
fn test_serialize_crlf() {
    let resp = Response::not_found();

    let text = frame(&Serializer::new().line_ending(LineEnding::CrLf), &resp);

    assert!(text.starts_with("HTTP/1.1 404 Not found\r\n"));
    assert!(text.ends_with("Content-Length: 0\r\n\r\n"));
}

#[test]
fn test_serialize_protocol_token() {
    let text = frame(&Serializer::new().protocol("HTTP/1.0"), &Response::ok());

    assert!(text.starts_with("HTTP/1.0 200 Success\n"));
}

#[test]
fn test_serialize_overflow_leaves_buffer_empty() {
    let resp = Response::ok().with_body(&[b'x'; 128]).unwrap();
    let mut out: Vec<u8, 64> = Vec::new();
    out.extend_from_slice(b"stale").unwrap();

    let result = Serializer::new().serialize(&resp, &mut out);

    assert_eq!(result, Err(Error::BufferOverflow));
    assert!(out.is_empty());
}

#[test]
fn test_reason_phrases() {
    assert_eq!(reason_phrase(200), "Success");
    assert_eq!(reason_phrase(404), "Not found");
    assert_eq!(reason_phrase(500), "Internal error");
    assert_eq!(reason_phrase(799), "Unknown");
}

#[test]
fn test_response_builders_report_overflow() {
    let too_long = "x".repeat(MAX_CONTENT_TYPE_LEN + 1);
    assert_eq!(
        Response::ok().with_content_type(&too_long).unwrap_err(),
        Error::BufferOverflow
    );

    let body = [0u8; MAX_RESPONSE_LEN + 1];
    assert!(Response::ok().with_body(&body).is_err());

    let mut resp = Response::ok();
    for i in 0..MAX_HEADERS {
        resp.push_header("X-N", &i.to_string()).unwrap();
    }
    assert_eq!(resp.push_header("X-N", "overflow"), Err(Error::BufferOverflow));
}

#[test]
fn test_body_writer_keeps_what_fits() {
    use core::fmt::Write;

    let mut resp = Response::ok();
    let filler = "y".repeat(MAX_RESPONSE_LEN - 2);
    assert!(resp.body_writer().write_str(&filler).is_ok());
    assert!(resp.body_writer().write_str("abcd").is_err());

    assert_eq!(resp.body.len(), MAX_RESPONSE_LEN);
    assert_eq!(&resp.body[MAX_RESPONSE_LEN - 2..], b"ab");
}

#[test]
fn test_header_with_line_break_refused() {
    let injected = Response::ok().with_header("X-A", "1\nContent-Length: 999");
    assert_eq!(injected.unwrap_err(), Error::ProtocolError);

    let mut resp = Response::ok();
    assert_eq!(resp.push_header("X-A\r\nContent-Length", "1"), Err(Error::ProtocolError));
    assert!(resp.headers.is_empty());
}

#[test]
fn test_content_type_with_line_break_refused() {
    let result = Response::ok().with_content_type("text/plain\r\nContent-Length: 1");
    assert_eq!(result.unwrap_err(), Error::ProtocolError);
}

#[test]
fn test_status_message_line_breaks_removed() {
    let resp = Response::new(200, "OK\nContent-Length: 1").with_body(b"abc").unwrap();
    assert_eq!(resp.message.as_str(), "OKContent-Length: 1");

    let text = frame(&Serializer::new(), &resp);

    assert!(text.starts_with("HTTP/1.1 200 OKContent-Length: 1\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("Content-Length")).count(), 1);
    assert!(text.contains("\nContent-Length: 3\n"));
}

#[test]
fn test_serialize_skips_headers_with_line_breaks() {
    let mut resp = Response::ok().with_body(b"abc").unwrap();
    resp.headers.push(Header::new("X-A", "1\nContent-Length: 999")).unwrap();
    resp.headers.push(Header::new("X-B\r", "2")).unwrap();
    resp.headers.push(Header::new("X-C", "3")).unwrap();

    let text = frame(&Serializer::new(), &resp);

    assert_eq!(text.matches("Content-Length").count(), 1);
    assert!(!text.contains("999"));
    assert!(!text.contains("X-A"));
    assert!(!text.contains("X-B"));
    assert!(text.contains("X-C: 3\n"));
}

#[test]
fn test_serialize_strips_line_breaks_from_public_fields() {
    let mut resp = Response::ok().with_body(b"abc").unwrap();
    resp.message = "OK\r\nContent-Length: 1".try_into().unwrap();
    resp.content_type = "text/plain\nX-Evil: 1".try_into().unwrap();

    let text = frame(&Serializer::new(), &resp);

    assert!(text.starts_with("HTTP/1.1 200 OKContent-Length: 1\n"));
    assert!(text.contains("Content-Type: text/plainX-Evil: 1\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("Content-Length")).count(), 1);
    assert_eq!(text.lines().filter(|l| l.starts_with("X-Evil")).count(), 0);
}
