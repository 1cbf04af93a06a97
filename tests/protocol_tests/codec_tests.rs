//! Codec Tests
//!
//! Tests for command encoding and incremental line decoding.

#[path = "../common/mod.rs"]
mod common;

use std::io::Cursor;

use boardwire::protocol::{encode_command, read_line, write_command, Command, LineBuffer};
use boardwire::BoardError;
use common::ChunkedReader;

const LINE: &[u8] = b"ID X 3 2 .X./O.\n";

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_put() {
    let cmd = Command::put(3, 14).unwrap();
    assert_eq!(encode_command(&cmd).unwrap(), b"PUT 3 14\n");
}

#[test]
fn test_encode_login() {
    let cmd = Command::login("nixi", "test").unwrap();
    assert_eq!(encode_command(&cmd).unwrap(), b"LOGIN nixi test\n");
}

#[test]
fn test_encode_rejects_hand_built_invalid_login() {
    let cmd = Command::Login {
        user: "two words".to_string(),
        password: "pw".to_string(),
    };
    assert!(matches!(encode_command(&cmd), Err(BoardError::Validation(_))));
}

#[test]
fn test_write_command_writes_whole_line() {
    let mut out = Vec::new();
    write_command(&mut out, &Command::Put { x: 0, y: 0 }).unwrap();
    assert_eq!(out, b"PUT 0 0\n");
}

#[test]
fn test_write_command_invalid_writes_nothing() {
    let mut out = Vec::new();
    let cmd = Command::Login {
        user: String::new(),
        password: "pw".to_string(),
    };
    assert!(write_command(&mut out, &cmd).is_err());
    assert!(out.is_empty());
}

// =============================================================================
// LineBuffer Tests
// =============================================================================

#[test]
fn test_single_complete_line() {
    let mut buffer = LineBuffer::new();
    buffer.extend(LINE);

    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("ID X 3 2 .X./O."));
    assert!(buffer.is_empty());
    assert_eq!(buffer.next_line().unwrap(), None);
}

#[test]
fn test_partial_line_stays_buffered() {
    let mut buffer = LineBuffer::new();
    buffer.extend(b"ID X 3 ");

    assert_eq!(buffer.next_line().unwrap(), None);
    assert_eq!(buffer.pending(), 7);

    buffer.extend(b"2 .X./O.\n");
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("ID X 3 2 .X./O."));
}

#[test]
fn test_every_chunk_size_decodes_identically() {
    let mut whole = LineBuffer::new();
    whole.extend(LINE);
    let expected = whole.next_line().unwrap().unwrap();

    for size in 1..=LINE.len() {
        let mut buffer = LineBuffer::new();
        let mut decoded = None;
        for piece in LINE.chunks(size) {
            assert!(decoded.is_none(), "line completed before its newline");
            buffer.extend(piece);
            decoded = buffer.next_line().unwrap();
        }
        assert_eq!(decoded.as_deref(), Some(expected.as_str()), "chunk size {size}");
        assert!(buffer.is_empty());
    }
}

#[test]
fn test_every_two_way_split_decodes_identically() {
    for split in 0..=LINE.len() {
        let (head, tail) = LINE.split_at(split);
        let mut buffer = LineBuffer::new();
        buffer.extend(head);
        let first = buffer.next_line().unwrap();
        buffer.extend(tail);
        let line = first.or_else(|| buffer.next_line().unwrap());
        assert_eq!(line.as_deref(), Some("ID X 3 2 .X./O."), "split at {split}");
    }
}

#[test]
fn test_two_lines_in_one_chunk() {
    let mut buffer = LineBuffer::new();
    buffer.extend(b"ID A 1 1 .\nID A 1 1 A\nID A");

    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("ID A 1 1 ."));
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("ID A 1 1 A"));
    assert_eq!(buffer.next_line().unwrap(), None);
    assert_eq!(buffer.pending(), 4);
}

#[test]
fn test_empty_line() {
    let mut buffer = LineBuffer::new();
    buffer.extend(b"\nrest");
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some(""));
    assert_eq!(buffer.pending(), 4);
}

#[test]
fn test_line_too_long() {
    let mut buffer = LineBuffer::with_max_line_len(8);
    buffer.extend(b"ID X 3 2 ");

    assert!(matches!(buffer.next_line(), Err(BoardError::Protocol(_))));
}

#[test]
fn test_overlong_line_fails_regardless_of_chunking() {
    let mut data = b"ID X 4 4 ".to_vec();
    data.extend_from_slice(&[b'.'; 16]);
    data.extend_from_slice(b"\nID A 1 1 .\n");

    // Whole line already buffered
    let mut buffer = LineBuffer::with_max_line_len(16);
    buffer.extend(&data);
    assert!(matches!(buffer.next_line(), Err(BoardError::Protocol(_))));
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("ID A 1 1 ."));
    assert!(buffer.is_empty());

    // One byte at a time
    let mut buffer = LineBuffer::with_max_line_len(16);
    let mut errors = 0;
    let mut lines = Vec::new();
    for byte in &data {
        buffer.extend(std::slice::from_ref(byte));
        match buffer.next_line() {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => {}
            Err(BoardError::Protocol(_)) => errors += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(errors, 1);
    assert_eq!(lines, vec!["ID A 1 1 .".to_string()]);
    assert!(buffer.is_empty());
}

#[test]
fn test_line_at_limit_is_accepted() {
    let mut buffer = LineBuffer::with_max_line_len(8);
    buffer.extend(b"12345678");
    assert_eq!(buffer.next_line().unwrap(), None);
    buffer.extend(b"\n");
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("12345678"));
}

#[test]
fn test_invalid_utf8_consumes_line() {
    let mut buffer = LineBuffer::new();
    buffer.extend(b"ID \xff 1 1 .\nID A 1 1 .\n");

    assert!(matches!(buffer.next_line(), Err(BoardError::Protocol(_))));
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("ID A 1 1 ."));
}

#[test]
fn test_multibyte_utf8_split_across_chunks() {
    let line = "ID é 1 1 é\n".as_bytes();
    let mut buffer = LineBuffer::new();
    let mut decoded = None;
    for byte in line.chunks(1) {
        buffer.extend(byte);
        if let Some(l) = buffer.next_line().unwrap() {
            decoded = Some(l);
        }
    }
    assert_eq!(decoded.as_deref(), Some("ID é 1 1 é"));
}

#[test]
fn test_clear() {
    let mut buffer = LineBuffer::new();
    buffer.extend(b"partial");
    buffer.next_line().unwrap();
    buffer.clear();

    assert!(buffer.is_empty());
    buffer.extend(b"x\n");
    assert_eq!(buffer.next_line().unwrap().as_deref(), Some("x"));
}

// =============================================================================
// Stream-based Reading Tests
// =============================================================================

#[test]
fn test_read_line_from_cursor() {
    let mut reader = Cursor::new(b"ID X 1 1 X\nID X 1 1 .\n".to_vec());
    let mut buffer = LineBuffer::new();

    assert_eq!(read_line(&mut reader, &mut buffer).unwrap(), "ID X 1 1 X");
    assert_eq!(read_line(&mut reader, &mut buffer).unwrap(), "ID X 1 1 .");
}

#[test]
fn test_read_line_one_byte_reads() {
    let mut reader = ChunkedReader::new(LINE, 1);
    let mut buffer = LineBuffer::new();

    assert_eq!(read_line(&mut reader, &mut buffer).unwrap(), "ID X 3 2 .X./O.");
}

#[test]
fn test_read_line_eof_mid_line() {
    let mut reader = Cursor::new(b"ID X 3".to_vec());
    let mut buffer = LineBuffer::new();

    let err = read_line(&mut reader, &mut buffer).unwrap_err();
    assert!(matches!(err, BoardError::ConnectionClosed(_)));
}

#[test]
fn test_read_line_eof_on_empty_stream() {
    let mut reader = Cursor::new(Vec::new());
    let mut buffer = LineBuffer::new();

    assert!(matches!(
        read_line(&mut reader, &mut buffer),
        Err(BoardError::ConnectionClosed(_))
    ));
}
