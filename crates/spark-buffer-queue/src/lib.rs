#![deny(unsafe_code)]

//! `spark-buffer-queue` 提供读时复制的单生产者/单消费者字节块队列。
//!
//! # 模块定位（Why）
//! - 生产端把数据块以 [`bytes::Bytes`] 引用形式交给队列，入队不复制；
//! - 消费端以拉取方式发起有界读取，读取阻塞到数据足量或数据末尾，字节只在此刻拷入目标切片；
//! - 读取语义与常见流式读取契约对齐：部分读取、零长度读取、携带末尾标记的最后一段短读取。
//!
//! # 设计概要（How）
//! - `chunk` 模块维护有序数据块与可读字节记账，并实现逐块拷贝的读取组装；
//! - `wake` 模块实现无负载的唤醒协议（有界脉冲通道或代数计数）；
//! - `queue` 模块将二者置于同一把锁下，拆分出 [`Producer`] 与 [`Consumer`] 两个不可克隆的句柄，
//!   单生产者/单消费者约束由所有权保证；
//! - [`Consumer`] 实现 [`std::io::Read`]，可直接接入任何基于 `Read` 的流水线。
//!
//! # 契约说明（What）
//! - 字节严格按追加顺序交付，无缺口、无重复、无乱序；
//! - 到达数据末尾且字节全部交付后，任意长度的读取都立即返回 `(0, EndOfData)`；
//! - 违反调用契约（结束后追加、重复结束）返回 [`QueueError`]，队列状态保持不变。
//!
//! ```
//! use std::thread;
//! use spark_buffer_queue::{ReadStatus, buffer_queue};
//!
//! let (mut producer, mut consumer) = buffer_queue();
//! let writer = thread::spawn(move || {
//!     producer.append(vec![0u8, 1, 2, 3, 4]).unwrap();
//!     producer.append(vec![5u8, 6, 7]).unwrap();
//!     producer.signal_end_of_data().unwrap();
//! });
//!
//! let mut dst = [0u8; 5];
//! let first = consumer.read(&mut dst);
//! assert_eq!((first.written, first.status), (5, ReadStatus::Open));
//! let second = consumer.read(&mut dst);
//! assert_eq!((second.written, second.status), (3, ReadStatus::EndOfData));
//! assert_eq!(&dst[..3], &[5, 6, 7]);
//! writer.join().unwrap();
//! ```

mod chunk;
mod config;
mod error;
mod queue;
mod sync;
mod wake;

pub use chunk::{ReadOutcome, ReadStatus};
pub use config::{DEFAULT_WAKE_CAPACITY, QueueConfig, WakeStrategy};
pub use error::{QueueError, codes};
pub use queue::{Consumer, Producer, buffer_queue, buffer_queue_with};
