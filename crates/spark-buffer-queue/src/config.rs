use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// 有界唤醒通道的默认容量。
pub const DEFAULT_WAKE_CAPACITY: usize = 10;

/// 消费端唤醒策略。
///
/// # 教案式说明
/// - **`Bounded`**：每次追加产生一个无负载的唤醒脉冲，最多积压 `capacity` 个；
///   积压已满时追加会阻塞，直到阻塞中的消费端取走一个脉冲。只有真正进入等待的消费端才会
///   取走脉冲，读取请求可立即满足时不消耗脉冲。数据末尾标记相当于关闭通道，所有等待方被释放。
/// - **`Generation`**：以单调递增的代数计数配合条件变量唤醒，生产端永不阻塞；
///   消费端在代数变化后重新检查可读条件。
///
/// 两种策略下消费端在每次被唤醒后都会重新判断阈值是否满足，脉冲数量与字节阈值之间没有对应关系。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WakeStrategy {
    /// 有界脉冲通道。
    Bounded {
        /// 允许积压的未消费脉冲数量，必须大于 0。
        capacity: usize,
    },
    /// 代数计数 + 条件变量。
    Generation,
}

impl Default for WakeStrategy {
    fn default() -> Self {
        WakeStrategy::Bounded {
            capacity: DEFAULT_WAKE_CAPACITY,
        }
    }
}

/// 队列构造配置。
///
/// 队列除唤醒策略外没有其它可调参数；默认使用容量为 10 的有界脉冲通道。
///
/// ```
/// use spark_buffer_queue::{QueueConfig, WakeStrategy};
///
/// let config = QueueConfig::bounded(32);
/// assert_eq!(config.wake, WakeStrategy::Bounded { capacity: 32 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// 唤醒策略。
    pub wake: WakeStrategy,
}

impl QueueConfig {
    /// 使用指定容量的有界脉冲通道。
    pub fn bounded(capacity: usize) -> Self {
        Self {
            wake: WakeStrategy::Bounded { capacity },
        }
    }

    /// 使用代数计数唤醒，生产端不受脉冲积压约束。
    pub fn generation() -> Self {
        Self {
            wake: WakeStrategy::Generation,
        }
    }

    /// 校验配置。
    ///
    /// 有界通道容量为 0 时无法承载任何脉冲，生产端的第一次追加就会永久阻塞，因此视为非法。
    pub fn validate(&self) -> Result<(), QueueError> {
        match self.wake {
            WakeStrategy::Bounded { capacity: 0 } => Err(QueueError::InvalidConfig {
                reason: "bounded wake channel capacity must be greater than zero",
            }),
            _ => Ok(()),
        }
    }

    /// 有界策略下的脉冲容量；代数策略返回 `None`。
    pub(crate) fn pulse_capacity(&self) -> Option<usize> {
        match self.wake {
            WakeStrategy::Bounded { capacity } => Some(capacity),
            WakeStrategy::Generation => None,
        }
    }
}
