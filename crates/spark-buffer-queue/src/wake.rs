//! 生产端与消费端之间的唤醒协议。
//!
//! # 教案级导览
//! - **Why**：消费端的阻塞条件是“可读字节达到阈值或已结束”，而生产端每次追加只能告诉对方
//!   “状态变了”。唤醒信号因此不携带负载，消费端被唤醒后必须重新检查阈值。
//! - **How**：本模块只维护唤醒通道的计数状态（积压脉冲、代数、关闭标记），所有字段与数据块
//!   位于同一把互斥锁之下；真正的阻塞由队列在持锁状态下配合条件变量完成。
//! - **What**：
//!   - 有界模式：`pulse` 使积压加一，积压达到容量时生产端必须等待；消费端 `take` 取走一个脉冲
//!     并释放一个槽位；
//!   - 代数模式：`pulse` 只推进代数，消费端观察到代数变化即视为被唤醒；
//!   - `close` 只能成功一次，关闭后所有等待方立即被释放且不再阻塞。

/// 消费端一次取信号的结果。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Wakeup {
    /// 尚无新信号，需要继续等待。
    Pending,
    /// 取得一个信号；`freed_slot` 为真时释放了一个积压槽位，需要通知生产端。
    Pulse { freed_slot: bool },
    /// 通道已关闭。
    Closed,
}

/// 唤醒通道的计数状态。
#[derive(Debug)]
pub(crate) struct WakeChannel {
    capacity: Option<usize>,
    pending: usize,
    generation: u64,
    closed: bool,
}

impl WakeChannel {
    /// `capacity` 为 `None` 时采用代数模式。
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            pending: 0,
            generation: 0,
            closed: false,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// 积压脉冲是否已达容量；代数模式恒为 `false`。
    pub(crate) fn is_full(&self) -> bool {
        match self.capacity {
            Some(capacity) => self.pending >= capacity,
            None => false,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// 发出一个脉冲。调用方需保证通道未满且未关闭。
    pub(crate) fn pulse(&mut self) {
        debug_assert!(!self.closed, "pulse after close");
        debug_assert!(!self.is_full(), "pulse on a saturated channel");
        if self.capacity.is_some() {
            self.pending += 1;
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// 消费端尝试取走一个信号。
    ///
    /// `observed` 为消费端进入等待前读到的代数，仅代数模式使用。有界模式下关闭前积压的
    /// 脉冲仍会被逐个取走，与关闭后的通道照常放行等价。
    pub(crate) fn take(&mut self, observed: u64) -> Wakeup {
        match self.capacity {
            Some(_) if self.pending > 0 => {
                self.pending -= 1;
                Wakeup::Pulse { freed_slot: true }
            }
            None if self.generation != observed => Wakeup::Pulse { freed_slot: false },
            _ if self.closed => Wakeup::Closed,
            _ => Wakeup::Pending,
        }
    }

    /// 关闭通道；重复关闭返回 `false` 且不改变状态。
    pub(crate) fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.generation = self.generation.wrapping_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_channel_saturates_at_capacity() {
        let mut channel = WakeChannel::new(Some(2));
        channel.pulse();
        assert!(!channel.is_full());
        channel.pulse();
        assert!(channel.is_full());

        assert_eq!(channel.take(0), Wakeup::Pulse { freed_slot: true });
        assert!(!channel.is_full(), "取走脉冲后应释放一个槽位");
    }

    #[test]
    fn bounded_channel_pends_without_pulse() {
        let mut channel = WakeChannel::new(Some(1));
        assert_eq!(channel.take(channel.generation()), Wakeup::Pending);
    }

    #[test]
    fn closed_channel_drains_pulses_then_releases() {
        let mut channel = WakeChannel::new(Some(4));
        channel.pulse();
        assert!(channel.close());
        assert_eq!(channel.take(0), Wakeup::Pulse { freed_slot: true });
        assert_eq!(channel.take(0), Wakeup::Closed);
        assert_eq!(channel.take(0), Wakeup::Closed, "关闭后应持续放行");
    }

    #[test]
    fn generation_mode_never_saturates() {
        let mut channel = WakeChannel::new(None);
        let observed = channel.generation();
        for _ in 0..1_000 {
            channel.pulse();
            assert!(!channel.is_full());
        }
        assert_eq!(channel.take(observed), Wakeup::Pulse { freed_slot: false });
        assert_eq!(channel.take(channel.generation()), Wakeup::Pending);
    }

    #[test]
    fn close_is_one_shot() {
        let mut channel = WakeChannel::new(None);
        let observed = channel.generation();
        assert!(channel.close());
        assert!(!channel.close());
        assert!(channel.is_closed());
        assert_eq!(channel.take(observed), Wakeup::Pulse { freed_slot: false });
        assert_eq!(channel.take(channel.generation()), Wakeup::Closed);
    }
}
