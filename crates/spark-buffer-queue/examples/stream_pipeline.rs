//! 演示：生产线程分批写入，消费端经 `std::io::copy` 接入标准输出。
//!
//! 运行：`RUST_LOG=spark_buffer_queue=trace cargo run -p spark-buffer-queue --example stream_pipeline`

use std::{io, thread, time::Duration};

use spark_buffer_queue::{QueueConfig, buffer_queue_with};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config: QueueConfig = toml::from_str(
        r#"
        [wake]
        kind = "bounded"
        capacity = 4
        "#,
    )?;
    let (mut producer, mut consumer) = buffer_queue_with(&config)?;

    let writer = thread::spawn(move || -> Result<(), spark_buffer_queue::QueueError> {
        for line in ["spark ", "buffer ", "", "queue", "\n"] {
            producer.append(line.as_bytes())?;
            thread::sleep(Duration::from_millis(5));
        }
        producer.signal_end_of_data()
    });

    let copied = io::copy(&mut consumer, &mut io::stdout().lock())?;
    writer
        .join()
        .map_err(|_| io::Error::other("producer thread panicked"))??;
    info!(copied, "stream finished");
    Ok(())
}
