//! Property-based tests for the console parser.
//!
//! Run with: cargo test -p firmware --test parse_proptest
#![allow(clippy::unwrap_used, clippy::expect_used)]

use dsa::Message;
use firmware::{parse, ParseError, UserCommand};
use proptest::prelude::*;

proptest! {
    /// One to four hex digits, any case, always become that raw message.
    #[test]
    fn hex_digits_become_raw_message(line in "[0-9a-fA-F]{1,4}") {
        let raw = u16::from_str_radix(&line, 16).unwrap();
        prop_assert_eq!(parse(&line), Ok(UserCommand::Raw(Message::from_raw(raw))));
    }

    /// Surrounding whitespace never changes the result.
    #[test]
    fn whitespace_is_trimmed(line in "[0-9a-fA-F]{1,4}", pad in "[ \t\r\n]{0,3}") {
        let padded = format!("{pad}{line}{pad}");
        prop_assert_eq!(parse(&padded), parse(&line));
    }

    /// Five or more hex digits are too long for a message.
    #[test]
    fn overlong_hex_is_rejected(line in "[0-9a-fA-F]{5,8}") {
        prop_assert_eq!(parse(&line), Err(ParseError::Unknown));
    }

    /// Arbitrary input never panics, and only blank input reports `Empty`.
    #[test]
    fn any_input_is_handled(line in ".{0,16}") {
        let result = parse(&line);
        prop_assert_eq!(result == Err(ParseError::Empty), line.trim().is_empty());
    }
}
