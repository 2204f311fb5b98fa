//! Outbound line formats and fixed system replies.

use std::fmt;

use super::ParticipantName;

/// Join notice text.
pub const JOINED_TEXT: &str = "已上线";
/// Leave notice text.
pub const LEFT_TEXT: &str = "已下线";
/// Suffix of each `who` entry.
pub const ONLINE_TEXT: &str = "在线...";

/// `[<address>]<name>:<text>`
pub fn format_broadcast(address: &str, name: &ParticipantName, text: &str) -> String {
    format!("[{}]{}:{}", address, name, text)
}

/// `[<address>]<name>:在线...`
pub fn format_who_entry(address: &str, name: &ParticipantName) -> String {
    format_broadcast(address, name, ONLINE_TEXT)
}

/// `<senderName>对您说：<content>`
pub fn format_private_message(sender: &ParticipantName, content: &str) -> String {
    format!("{}对您说：{}", sender, content)
}

/// システムから 1 人の参加者だけに送る返信
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemReply {
    /// 改名先の名前が使用中
    NameOccupied,
    /// 改名完了
    Renamed(ParticipantName),
    /// 改名コマンドの書式誤り
    RenameUsage,
    /// 個別メッセージの書式誤り
    PrivateMessageUsage,
    /// 宛先が存在しない
    TargetNotFound,
    /// 個別メッセージの本文が空
    EmptyContent,
    /// 無発言によるタイムアウト
    IdleTimeout,
    /// 1 行が上限バイト数を超えたため切断
    LineTooLong(usize),
}

impl fmt::Display for SystemReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemReply::NameOccupied => f.write_str("当前用户名被使用"),
            SystemReply::Renamed(name) => write!(f, "您已经更新用户名:{}", name),
            SystemReply::RenameUsage => {
                f.write_str("用户名不能为空，请使用 \"rename|张三\"格式。")
            }
            SystemReply::PrivateMessageUsage => {
                f.write_str("消息格式不正确，请使用 \"to|张三|你好啊\"格式。")
            }
            SystemReply::TargetNotFound => f.write_str("该用户名不存在"),
            SystemReply::EmptyContent => f.write_str("无消息内容，请重发"),
            SystemReply::IdleTimeout => f.write_str("你因超时未发言被提出聊天室"),
            SystemReply::LineTooLong(max) => {
                write!(f, "消息过长（最多 {} 字节），连接已断开", max)
            }
        }
    }
}
