//! 数据块存储与字节记账。
//!
//! # 模块定位（Why）
//! - 生产端交来的数据块以 [`Bytes`] 引用计数形式保存，入队时不复制；
//! - 只有在消费端读取时才把字节拷入调用方提供的目标切片，部分消费的块保留剩余视图。
//!
//! # 契约说明（What）
//! - 静止时刻（没有读取正在进行）`available() == Σ len(chunk)`；
//! - 队首即下一段待读数据，块在被完整拷出的同一次读取中出队；
//! - 长度为 0 的块可以出现在任意位置，只占位不贡献字节，读取时直接出队且不触发拷贝。

use std::collections::VecDeque;

use bytes::{Buf, Bytes};

/// 一次读取结束时队列的状态。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadStatus {
    /// 数据流仍在继续，后续读取可能获得更多字节。
    Open,
    /// 数据末尾：已标记结束且全部字节都已交付。
    EndOfData,
}

/// 一次读取的结果：写入目标切片的字节数与读取结束时的状态。
///
/// `EndOfData` 可以与非零的 `written` 同时出现，表示最后一次（可能不满的）读取。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadOutcome {
    /// 写入目标切片前缀的字节数。
    pub written: usize,
    /// 读取结束时的状态。
    pub status: ReadStatus,
}

impl ReadOutcome {
    pub(crate) fn open(written: usize) -> Self {
        Self {
            written,
            status: ReadStatus::Open,
        }
    }

    pub(crate) fn end_of_data(written: usize) -> Self {
        Self {
            written,
            status: ReadStatus::EndOfData,
        }
    }

    /// 是否已到达数据末尾。
    pub fn is_end_of_data(&self) -> bool {
        self.status == ReadStatus::EndOfData
    }
}

/// 有序数据块队列及其可读字节总数。
#[derive(Debug, Default)]
pub(crate) struct ChunkQueue {
    chunks: VecDeque<Bytes>,
    available: usize,
}

impl ChunkQueue {
    /// 追加到队尾。空块同样入队。
    pub(crate) fn push(&mut self, chunk: Bytes) {
        self.available += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// 当前可读字节总数。
    pub(crate) fn available(&self) -> usize {
        self.available
    }

    /// 队列中的块数量（含空块）。
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.chunks.len()
    }

    /// 请求 `requested` 字节能否立即得到满足。
    ///
    /// 这是读取阻塞的唯一判断条件：可读字节达到阈值，或已到达数据末尾。
    pub(crate) fn can_satisfy(&self, requested: usize, end_of_data: bool) -> bool {
        self.available >= requested || end_of_data
    }

    /// 把队首数据拷入 `dst`。
    ///
    /// # 前置条件
    /// - `dst` 非空；
    /// - `can_satisfy(dst.len(), end_of_data)` 为真。
    ///
    /// # 执行步骤（How）
    /// 1. 已结束且无可读字节时直接返回 `(0, EndOfData)`；
    /// 2. 逐块拷贝，直到 `dst` 写满或队列耗尽；
    /// 3. 完整拷出的块出队；`dst` 先写满时，队首块推进已拷出的部分并保留剩余视图；
    /// 4. 拷贝过程中队列清空且已结束时立即返回 `EndOfData`，此时写入量可能小于 `dst.len()`；
    /// 5. `available` 恰好扣减实际写入的字节数。
    ///
    /// `dst` 中超出写入量的字节保持原值。
    pub(crate) fn drain_into(&mut self, dst: &mut [u8], end_of_data: bool) -> ReadOutcome {
        if self.available == 0 && end_of_data {
            return ReadOutcome::end_of_data(0);
        }

        let requested = dst.len();
        let mut written = 0;
        let mut reached_end = false;
        while written < requested {
            let Some(front) = self.chunks.front_mut() else {
                break;
            };
            let copied = front.len().min(requested - written);
            if copied > 0 {
                dst[written..written + copied].copy_from_slice(&front[..copied]);
                written += copied;
            }
            if copied == front.len() {
                self.chunks.pop_front();
                if self.chunks.is_empty() && end_of_data {
                    reached_end = true;
                    break;
                }
            } else {
                front.advance(copied);
            }
        }

        self.available -= written;
        if reached_end {
            ReadOutcome::end_of_data(written)
        } else {
            ReadOutcome::open(written)
        }
    }

    /// 弹出队首非空块的全部剩余字节，不发生拷贝。
    ///
    /// 途经的空块一并出队；队列中没有非空块时返回 `None`。
    pub(crate) fn pop_chunk(&mut self) -> Option<Bytes> {
        while let Some(chunk) = self.chunks.pop_front() {
            if !chunk.is_empty() {
                self.available -= chunk.len();
                return Some(chunk);
            }
        }
        None
    }
}
