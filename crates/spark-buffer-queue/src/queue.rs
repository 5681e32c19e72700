use std::{fmt, io};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::{
    chunk::{ChunkQueue, ReadOutcome},
    config::QueueConfig,
    error::QueueError,
    sync::{Arc, Condvar, Mutex, MutexGuard, lock, wait},
    wake::{WakeChannel, Wakeup},
};

/// 以默认配置创建队列（容量为 10 的有界唤醒通道）。
///
/// ```
/// use spark_buffer_queue::{ReadStatus, buffer_queue};
///
/// let (mut producer, mut consumer) = buffer_queue();
/// producer.append(&b"hello"[..]).unwrap();
/// producer.signal_end_of_data().unwrap();
///
/// let mut dst = [0u8; 8];
/// let outcome = consumer.read(&mut dst);
/// assert_eq!(outcome.written, 5);
/// assert_eq!(outcome.status, ReadStatus::EndOfData);
/// ```
pub fn buffer_queue() -> (Producer, Consumer) {
    split(QueueConfig::default())
}

/// 以指定配置创建队列，配置非法时返回 [`QueueError::InvalidConfig`]。
pub fn buffer_queue_with(config: &QueueConfig) -> Result<(Producer, Consumer), QueueError> {
    config.validate()?;
    Ok(split(*config))
}

fn split(config: QueueConfig) -> (Producer, Consumer) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            chunks: ChunkQueue::default(),
            end_of_data: false,
            wake: WakeChannel::new(config.pulse_capacity()),
            consumer_alive: true,
        }),
        readable: Condvar::new(),
        writable: Condvar::new(),
    });
    debug!(wake = ?config.wake, "buffer queue created");
    (
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    )
}

/// 生产端与消费端共享的状态。
///
/// 数据块、结束标记与唤醒计数位于同一把锁下；`readable` 供消费端等待新数据，
/// `writable` 供生产端等待积压脉冲被取走。
struct Shared {
    state: Mutex<State>,
    readable: Condvar,
    writable: Condvar,
}

struct State {
    chunks: ChunkQueue,
    end_of_data: bool,
    wake: WakeChannel,
    consumer_alive: bool,
}

impl State {
    fn can_satisfy(&self, requested: usize) -> bool {
        self.chunks.can_satisfy(requested, self.end_of_data)
    }
}

/// 生产端句柄：追加数据块并标记数据末尾。
///
/// # 教案式说明
/// - **契约 (What)**：
///   - 句柄不可克隆，所有写操作要求 `&mut self`，单生产者约束由类型系统保证；
///   - 数据块以 [`Bytes`] 引用计数保存，入队不复制；
///   - 数据末尾只能标记一次，标记后追加返回 [`QueueError::EndOfDataSignaled`]；
///   - 句柄被释放时若尚未标记结束，则隐式标记，阻塞中的消费端随之被释放。
/// - **阻塞语义**：有界唤醒通道积压已满时 [`append`](Self::append) 阻塞，直到消费端在等待中取走
///   一个脉冲；积压只与通知次数有关，与字节量无关。
pub struct Producer {
    shared: Arc<Shared>,
}

impl Producer {
    /// 追加一个数据块（允许为空），并发出一个唤醒脉冲。
    ///
    /// 有界通道已满时阻塞；消费端释放后返回 [`QueueError::ConsumerDropped`]。
    pub fn append(&mut self, chunk: impl Into<Bytes>) -> Result<(), QueueError> {
        self.push(chunk.into(), true)
    }

    /// 非阻塞追加：有界通道已满时返回 [`QueueError::Saturated`] 并交还数据块。
    pub fn try_append(&mut self, chunk: impl Into<Bytes>) -> Result<(), QueueError> {
        self.push(chunk.into(), false)
    }

    fn push(&mut self, chunk: Bytes, block: bool) -> Result<(), QueueError> {
        let mut state = lock(&self.shared.state);
        if state.end_of_data {
            warn!(bytes = chunk.len(), "append rejected: end-of-data already signaled");
            return Err(QueueError::EndOfDataSignaled);
        }
        loop {
            if !state.consumer_alive {
                return Err(QueueError::ConsumerDropped { chunk });
            }
            if !state.wake.is_full() {
                break;
            }
            if !block {
                return Err(QueueError::Saturated { chunk });
            }
            trace!("wake channel saturated, producer waiting");
            state = wait(&self.shared.writable, state);
        }

        let len = chunk.len();
        state.chunks.push(chunk);
        state.wake.pulse();
        trace!(
            bytes = len,
            available = state.chunks.available(),
            "chunk appended"
        );
        self.shared.readable.notify_one();
        Ok(())
    }

    /// 标记数据末尾并关闭唤醒通道。
    ///
    /// 当前或此后阻塞的读取都会立即返回；重复标记返回 [`QueueError::AlreadyEnded`]。
    pub fn signal_end_of_data(&mut self) -> Result<(), QueueError> {
        let mut state = lock(&self.shared.state);
        if !state.wake.close() {
            warn!("end-of-data signaled twice");
            return Err(QueueError::AlreadyEnded);
        }
        state.end_of_data = true;
        debug!(
            available = state.chunks.available(),
            "end-of-data signaled"
        );
        self.shared.readable.notify_all();
        Ok(())
    }

    /// 是否已标记数据末尾。
    pub fn is_end_of_data(&self) -> bool {
        lock(&self.shared.state).end_of_data
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        let mut state = lock(&self.shared.state);
        if state.wake.close() {
            state.end_of_data = true;
            debug!(
                available = state.chunks.available(),
                "producer dropped without end-of-data, sealing queue"
            );
            self.shared.readable.notify_all();
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

/// 消费端句柄：按目标切片长度拉取字节。
///
/// # 教案式说明
/// - **契约 (What)**：
///   - 句柄不可克隆，读取要求 `&mut self`，单消费者约束由类型系统保证；
///   - 读取阈值 `K` 等于目标切片长度 `dst.len()`；
///   - `K == 0` 从不阻塞也不消耗字节；
///   - `K > 0` 阻塞直到可读字节不少于 `K` 或已到达数据末尾，随后按块顺序拷贝；
///   - 到达数据末尾后的每次读取都立即返回 `(0, EndOfData)`。
/// - **执行逻辑 (How)**：阻塞期间循环等待唤醒信号，每次被唤醒后重新检查阈值，
///   单个脉冲并不保证阈值已满足。
/// - **取消**：读取没有内建超时或取消；调用方如需超时，应在外部包装阻塞调用。
pub struct Consumer {
    shared: Arc<Shared>,
}

impl Consumer {
    /// 读取至多 `dst.len()` 字节到 `dst` 前缀。
    ///
    /// 返回实际写入的字节数与读取结束时的状态；`EndOfData` 可能伴随少于请求量的最后一段数据。
    /// `dst` 中未写入的部分保持原值。
    pub fn read(&mut self, dst: &mut [u8]) -> ReadOutcome {
        if dst.is_empty() {
            let state = lock(&self.shared.state);
            return if state.end_of_data && state.chunks.available() == 0 {
                ReadOutcome::end_of_data(0)
            } else {
                ReadOutcome::open(0)
            };
        }

        let mut state = self.wait_until(dst.len());
        let end_of_data = state.end_of_data;
        let outcome = state.chunks.drain_into(dst, end_of_data);
        trace!(
            requested = dst.len(),
            written = outcome.written,
            status = ?outcome.status,
            available = state.chunks.available(),
            "read completed"
        );
        outcome
    }

    /// 零拷贝地取出下一个非空数据块的全部剩余字节。
    ///
    /// 阻塞直到至少有 1 字节可读或已到达数据末尾；数据耗尽后返回 `None`。
    pub fn next_chunk(&mut self) -> Option<Bytes> {
        let mut state = self.wait_until(1);
        let chunk = state.chunks.pop_chunk();
        trace!(
            bytes = chunk.as_ref().map_or(0, Bytes::len),
            available = state.chunks.available(),
            "chunk taken"
        );
        chunk
    }

    /// 当前可读字节数。
    pub fn available(&self) -> usize {
        lock(&self.shared.state).chunks.available()
    }

    /// 已标记数据末尾且全部字节均已交付。
    pub fn is_drained(&self) -> bool {
        let state = lock(&self.shared.state);
        state.end_of_data && state.chunks.available() == 0
    }

    /// 阻塞直到 `requested` 字节可读或已到达数据末尾，返回持有的锁。
    fn wait_until(&self, requested: usize) -> MutexGuard<'_, State> {
        let mut state = lock(&self.shared.state);
        while !state.can_satisfy(requested) {
            let observed = state.wake.generation();
            loop {
                match state.wake.take(observed) {
                    Wakeup::Pending => {
                        trace!(
                            requested,
                            available = state.chunks.available(),
                            "consumer waiting"
                        );
                        state = wait(&self.shared.readable, state);
                    }
                    Wakeup::Pulse { freed_slot } => {
                        if freed_slot {
                            self.shared.writable.notify_one();
                        }
                        break;
                    }
                    Wakeup::Closed => break,
                }
            }
        }
        state
    }
}

impl io::Read for Consumer {
    /// 数据末尾以 `Ok(0)` 表达；伴随末尾返回的最后一段数据先以正常字节数交付。
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(Consumer::read(self, buf).written)
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        let mut state = lock(&self.shared.state);
        state.consumer_alive = false;
        let discarded = state.chunks.available();
        state.chunks = ChunkQueue::default();
        if discarded > 0 {
            debug!(discarded, "consumer dropped with unread bytes");
        }
        self.shared.writable.notify_all();
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").finish_non_exhaustive()
    }
}
