//! Inbound line parsing.
//!
//! Matching is exact-prefix and byte-for-byte; nothing is case-normalized.

use thiserror::Error;

/// Lists online participants.
pub const WHO: &str = "who";
/// `rename|<newName>`
pub const RENAME_PREFIX: &str = "rename|";
/// `to|<targetName>|<content>`
pub const PRIVATE_MESSAGE_PREFIX: &str = "to|";

/// A parsed inbound line. Borrows from the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Empty line; counts as activity but produces nothing.
    Empty,
    Who,
    Rename {
        new_name: &'a str,
    },
    /// `content` may still be empty; that is rejected after the target lookup.
    PrivateMessage {
        target: &'a str,
        content: &'a str,
    },
    Broadcast(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("rename command requires a non-empty name")]
    MalformedRename,

    #[error("private message requires a target and content")]
    MalformedPrivateMessage,
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Result<Self, CommandParseError> {
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        if line == WHO {
            return Ok(Command::Who);
        }
        if line.len() > RENAME_PREFIX.len()
            && let Some(rest) = line.strip_prefix(RENAME_PREFIX)
        {
            let new_name = rest.split_once('|').map_or(rest, |(head, _)| head);
            if new_name.is_empty() {
                return Err(CommandParseError::MalformedRename);
            }
            return Ok(Command::Rename { new_name });
        }
        if let Some(rest) = line.strip_prefix(PRIVATE_MESSAGE_PREFIX) {
            // content keeps any further '|' characters
            return match rest.split_once('|') {
                Some((target, content)) if !target.is_empty() => {
                    Ok(Command::PrivateMessage { target, content })
                }
                _ => Err(CommandParseError::MalformedPrivateMessage),
            };
        }
        Ok(Command::Broadcast(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_who() {
        // テスト項目: "who" は一覧コマンドになる
        // given (前提条件):
        let line = "who";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Who));
    }

    #[test]
    fn test_parse_who_is_case_sensitive() {
        // テスト項目: 大文字を含む "Who" や前後に文字がある場合は通常のメッセージ
        // given (前提条件):
        let lines = ["Who", "who ", "whoami"];

        // when (操作) / then (期待する結果):
        for line in lines {
            assert_eq!(Command::parse(line), Ok(Command::Broadcast(line)));
        }
    }

    #[test]
    fn test_parse_rename() {
        // テスト項目: "rename|<name>" は改名コマンドになる
        // given (前提条件):
        let line = "rename|Alice";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Rename { new_name: "Alice" }));
    }

    #[test]
    fn test_parse_rename_takes_segment_before_next_pipe() {
        // テスト項目: 2 つ目の '|' 以降は無視される
        // given (前提条件):
        let line = "rename|Alice|extra";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Rename { new_name: "Alice" }));
    }

    #[test]
    fn test_parse_bare_rename_prefix_is_broadcast() {
        // テスト項目: プレフィックスのみの "rename|" は通常のメッセージ
        // given (前提条件):
        let line = "rename|";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Broadcast("rename|")));
    }

    #[test]
    fn test_parse_rename_with_empty_name() {
        // テスト項目: 空の名前への改名はフォーマットエラー
        // given (前提条件):
        let line = "rename||Alice";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Err(CommandParseError::MalformedRename));
    }

    #[test]
    fn test_parse_private_message() {
        // テスト項目: "to|<target>|<content>" は個別メッセージになる
        // given (前提条件):
        let line = "to|Bob|hello";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::PrivateMessage {
                target: "Bob",
                content: "hello"
            })
        );
    }

    #[test]
    fn test_parse_private_message_content_keeps_pipes() {
        // テスト項目: 本文中の '|' はそのまま残る
        // given (前提条件):
        let line = "to|Bob|a|b";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::PrivateMessage {
                target: "Bob",
                content: "a|b"
            })
        );
    }

    #[test]
    fn test_parse_private_message_with_empty_content() {
        // テスト項目: 本文が空でも解析は成功する（宛先確認の後で拒否する）
        // given (前提条件):
        let line = "to|Bob|";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::PrivateMessage {
                target: "Bob",
                content: ""
            })
        );
    }

    #[test]
    fn test_parse_malformed_private_messages() {
        // テスト項目: 宛先が空、または本文の区切りがない場合はフォーマットエラー
        // given (前提条件):
        let lines = ["to|", "to||hello", "to|Bob"];

        // when (操作) / then (期待する結果):
        for line in lines {
            assert_eq!(
                Command::parse(line),
                Err(CommandParseError::MalformedPrivateMessage),
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_parse_plain_text_and_empty_line() {
        // テスト項目: それ以外は通常のメッセージ、空行は Empty
        // given (前提条件):
        let line = "hello everyone";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Broadcast("hello everyone")));
        assert_eq!(Command::parse(""), Ok(Command::Empty));
    }
}
