//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义队列对外暴露的失败语义：调用契约被违反、非阻塞写入受阻、配置非法；
//! - 读取到数据末尾（End-of-Data）是正常的终止信号，由 [`ReadStatus`](crate::ReadStatus)
//!   表达，**不**属于本模块的错误。
//!
//! ## 设计要求（What）
//! - 所有变体通过 `thiserror::Error` 实现 `std::error::Error`；
//! - 每个变体提供稳定错误码 [`QueueError::code`]，便于日志检索与告警聚合；
//! - 携带数据块的变体把块原样交还给调用方，避免写入失败时丢失数据。

use bytes::Bytes;
use thiserror::Error;

/// 稳定错误码集合。
pub mod codes {
    /// 在已标记数据末尾后继续追加。
    pub const END_OF_DATA_SIGNALED: &str = "buffer_queue.end_of_data_signaled";
    /// 重复标记数据末尾。
    pub const ALREADY_ENDED: &str = "buffer_queue.already_ended";
    /// 有界唤醒通道已满，非阻塞写入被拒绝。
    pub const SATURATED: &str = "buffer_queue.saturated";
    /// 消费端句柄已释放。
    pub const CONSUMER_DROPPED: &str = "buffer_queue.consumer_dropped";
    /// 配置未通过校验。
    pub const INVALID_CONFIG: &str = "buffer_queue.invalid_config";
}

/// 队列操作的错误域。
///
/// # 教案式说明
/// - **契约 (What)**：
///   - `EndOfDataSignaled`/`AlreadyEnded` 对应数据末尾标记的一次性语义，
///     队列状态在返回这两个错误时保持不变；
///   - `Saturated`/`ConsumerDropped` 把未入队的数据块交还调用方；
///   - `InvalidConfig` 仅在构造阶段出现。
/// - **执行逻辑 (How)**：生产端在持锁检查状态后直接返回对应变体，不做任何重试。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum QueueError {
    /// 数据末尾已标记，禁止继续追加。
    #[error("cannot append after end-of-data has been signaled")]
    EndOfDataSignaled,

    /// 数据末尾只能标记一次。
    #[error("end-of-data has already been signaled")]
    AlreadyEnded,

    /// 有界唤醒通道已满；`chunk` 为未入队的数据块。
    #[error("wake channel is saturated, {} byte chunk not queued", .chunk.len())]
    Saturated { chunk: Bytes },

    /// 消费端已释放，追加的数据再也不会被读取；`chunk` 为未入队的数据块。
    #[error("consumer has been dropped, {} byte chunk not queued", .chunk.len())]
    ConsumerDropped { chunk: Bytes },

    /// 配置校验失败。
    #[error("invalid queue configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl QueueError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            QueueError::EndOfDataSignaled => codes::END_OF_DATA_SIGNALED,
            QueueError::AlreadyEnded => codes::ALREADY_ENDED,
            QueueError::Saturated { .. } => codes::SATURATED,
            QueueError::ConsumerDropped { .. } => codes::CONSUMER_DROPPED,
            QueueError::InvalidConfig { .. } => codes::INVALID_CONFIG,
        }
    }

    /// 取回随错误一同返回的数据块（若有）。
    pub fn into_chunk(self) -> Option<Bytes> {
        match self {
            QueueError::Saturated { chunk } | QueueError::ConsumerDropped { chunk } => Some(chunk),
            _ => None,
        }
    }
}
