#![cfg(any(loom, spark_loom))]

//! Loom 模型：穷举生产端与消费端之间的唤醒交错。
//!
//! 运行方式：`RUSTFLAGS="--cfg loom" cargo test -p spark-buffer-queue --features loom-model --test loom_wake`。

use loom::{model, thread};
use spark_buffer_queue::{QueueConfig, QueueError, ReadStatus, buffer_queue, buffer_queue_with};

/// 追加与结束标记可能发生在读取进入等待之前或之后，任意交错下读取都必须被释放并交付全部字节。
#[test]
fn end_of_data_always_releases_reader() {
    model(|| {
        let (mut producer, mut consumer) = buffer_queue();

        let writer = thread::spawn(move || {
            producer.append(vec![1u8, 2]).expect("追加");
            producer.signal_end_of_data().expect("标记结束");
        });

        let mut dst = [0u8; 4];
        let outcome = consumer.read(&mut dst);
        assert_eq!((outcome.written, outcome.status), (2, ReadStatus::EndOfData));
        assert_eq!(&dst[..2], &[1, 2]);

        writer.join().expect("生产线程不应 panic");
    });
}

/// 容量为 1 的有界通道：生产端第二次追加必须等待消费端取走脉冲，且不会丢失唤醒。
#[test]
fn saturated_producer_is_never_stranded() {
    model(|| {
        let (mut producer, mut consumer) =
            buffer_queue_with(&QueueConfig::bounded(1)).expect("配置合法");

        let writer = thread::spawn(move || {
            producer.append(vec![1u8]).expect("第一次追加");
            producer.append(vec![2u8]).expect("第二次追加");
        });

        let mut dst = [0u8; 2];
        let outcome = consumer.read(&mut dst);
        assert_eq!(outcome.written, 2);
        assert_eq!(dst, [1, 2]);

        writer.join().expect("生产线程不应 panic");
        let tail = consumer.read(&mut dst);
        assert_eq!((tail.written, tail.status), (0, ReadStatus::EndOfData));
    });
}

/// 消费端释放与生产端阻塞并发发生时，生产端要么完成追加，要么得到 `ConsumerDropped`。
#[test]
fn consumer_drop_unblocks_producer() {
    model(|| {
        let (mut producer, consumer) =
            buffer_queue_with(&QueueConfig::bounded(1)).expect("配置合法");
        producer.append(vec![0u8]).expect("首个脉冲不阻塞");

        let writer = thread::spawn(move || producer.append(vec![1u8]));
        drop(consumer);

        let result = writer.join().expect("生产线程不应 panic");
        assert!(matches!(result, Err(QueueError::ConsumerDropped { .. })));
    });
}
