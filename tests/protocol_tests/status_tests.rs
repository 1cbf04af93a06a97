//! Status Line Tests
//!
//! Tests for tokenizing status lines and decoding board snapshots.

use boardwire::protocol::{Board, Cell, StatusLine, StatusTokens};
use boardwire::BoardError;

fn assert_protocol_error<T: std::fmt::Debug>(result: Result<T, BoardError>) {
    match result {
        Err(BoardError::Protocol(_)) => {}
        other => panic!("expected protocol error, got {other:?}"),
    }
}

// =============================================================================
// Tokenizing Tests
// =============================================================================

#[test]
fn test_scenario_line() {
    let tokens = StatusTokens::parse("ID X 2 2 ..XO").unwrap();

    assert_eq!(tokens.identity().unwrap(), 'X');
    assert_eq!(tokens.width().unwrap(), 2);
    assert_eq!(tokens.height().unwrap(), 2);

    let board = tokens.board().unwrap();
    assert_eq!(board.rows(), vec![vec!['.', '.'], vec!['X', 'O']]);
}

#[test]
fn test_legacy_board_keyword() {
    let status: StatusLine = "BOARD A 2 1 A.".parse().unwrap();
    assert_eq!(status.id, 'A');
    assert_eq!(status.width(), 2);
    assert_eq!(status.height(), 1);
}

#[test]
fn test_unknown_keyword() {
    assert_protocol_error(StatusTokens::parse("STATE X 2 2 ..XO"));
}

#[test]
fn test_fewer_than_five_tokens() {
    assert_protocol_error(StatusTokens::parse("ID X 2 2"));
    assert_protocol_error(StatusTokens::parse("ID"));
    assert_protocol_error(StatusTokens::parse(""));
}

#[test]
fn test_more_than_five_tokens() {
    assert_protocol_error(StatusTokens::parse("ID X 2 2 ..XO extra"));
}

#[test]
fn test_trailing_carriage_return() {
    let status: StatusLine = "ID X 2 2 ..XO\r".parse().unwrap();
    assert_eq!(status.board.to_flat_string(), "..XO");
}

#[test]
fn test_non_numeric_width() {
    let tokens = StatusTokens::parse("ID X two 2 ..XO").unwrap();
    assert_protocol_error(tokens.width());
    assert_eq!(tokens.height().unwrap(), 2);
    assert_protocol_error(tokens.board());
}

#[test]
fn test_signed_or_zero_dimensions() {
    assert_protocol_error(StatusTokens::parse("ID X -2 2 ..XO").unwrap().width());
    assert_protocol_error(StatusTokens::parse("ID X +2 2 ..XO").unwrap().width());
    assert_protocol_error(StatusTokens::parse("ID X 2 0 ..XO").unwrap().height());
}

#[test]
fn test_dimension_overflow() {
    assert_protocol_error(StatusTokens::parse("ID X 99999999999 1 .").unwrap().width());
}

#[test]
fn test_identity_must_be_single_char() {
    assert_protocol_error(StatusTokens::parse("ID 65 2 2 ..XO").unwrap().identity());
}

#[test]
fn test_width_query_ignores_board_length() {
    // Each query validates only the field it extracts
    let tokens = StatusTokens::parse("ID X 3 3 ........").unwrap();
    assert_eq!(tokens.width().unwrap(), 3);
    assert_protocol_error(tokens.board());
}

// =============================================================================
// Board Tests
// =============================================================================

#[test]
fn test_board_length_mismatch() {
    assert_protocol_error(Board::from_flat(3, 3, "........"));
    assert_protocol_error(Board::from_flat(3, 3, ".........."));
}

#[test]
fn test_board_zero_dimension() {
    assert_protocol_error(Board::from_flat(0, 3, ""));
}

#[test]
fn test_board_round_trip() {
    let cases = [
        (1, 1, "."),
        (2, 2, "..XO"),
        (3, 2, "AB/..C"),
        (1, 4, "ab.c"),
        (5, 1, "/////"),
    ];
    for (width, height, flat) in cases {
        let board = Board::from_flat(width, height, flat).unwrap();
        assert_eq!(board.to_flat_string(), flat);
        assert_eq!(board.to_string(), flat);

        let rejoined: String = board.rows().into_iter().flatten().collect();
        assert_eq!(rejoined, flat);
        assert_eq!(board.rows().len(), height as usize);
    }
}

#[test]
fn test_board_round_trip_large() {
    let flat: String = (0..19 * 19)
        .map(|i| ['.', 'A', 'B', '/'][i % 4])
        .collect();
    let board = Board::from_flat(19, 19, &flat).unwrap();
    assert_eq!(board.to_flat_string(), flat);
}

#[test]
fn test_board_get_and_cell() {
    let board = Board::from_flat(3, 2, ".X/O..").unwrap();

    assert_eq!(board.get(1, 0), Some('X'));
    assert_eq!(board.get(0, 1), Some('O'));
    assert_eq!(board.cell(0, 0), Some(Cell::Empty));
    assert_eq!(board.cell(2, 0), Some(Cell::Wall));
    assert_eq!(board.cell(1, 0), Some(Cell::Player('X')));
    assert_eq!(board.get(3, 0), None);
    assert_eq!(board.get(0, 2), None);
}

#[test]
fn test_board_symbol_counts_and_empty_cells() {
    let board = Board::from_flat(2, 2, ".X..").unwrap();

    let counts = board.symbol_counts();
    assert_eq!(counts.get(&'.'), Some(&3));
    assert_eq!(counts.get(&'X'), Some(&1));
    assert_eq!(board.empty_cells(), vec![(0, 0), (0, 1), (1, 1)]);
}

// =============================================================================
// StatusLine Tests
// =============================================================================

#[test]
fn test_status_line_display() {
    let status: StatusLine = "BOARD X 2 2 ..XO".parse().unwrap();
    assert_eq!(status.to_string(), "ID X 2 2 ..XO");
}

#[test]
fn test_status_line_serializes_to_json() {
    let status: StatusLine = "ID X 2 1 .X".parse().unwrap();
    let json = serde_json::to_value(&status).unwrap();

    assert_eq!(json["id"], "X");
    assert_eq!(json["board"]["width"], 2);
    assert_eq!(json["board"]["height"], 1);
    assert_eq!(json["board"]["cells"], serde_json::json!([".", "X"]));
}
