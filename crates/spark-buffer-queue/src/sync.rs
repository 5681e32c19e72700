//! 同步原语适配层。
//!
//! 默认使用 `parking_lot` 的 `Mutex`/`Condvar`；当启用 `loom-model` Feature 并以
//! `--cfg loom`（或 `--cfg spark_loom`）编译时切换到 loom 提供的实现，使模型检查能够
//! 穷举生产者与消费者之间的调度交错。
//!
//! 两套实现的等待接口并不一致（`parking_lot` 借用守卫，loom 按值传递守卫），
//! 因此统一收敛为按值传入、按值返回的 [`wait`]。

#[cfg(not(all(feature = "loom-model", any(loom, spark_loom))))]
mod imp {
    pub(crate) use parking_lot::{Condvar, Mutex, MutexGuard};
    pub(crate) use std::sync::Arc;

    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock()
    }

    pub(crate) fn wait<'a, T>(condvar: &Condvar, mut guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        condvar.wait(&mut guard);
        guard
    }
}

#[cfg(all(feature = "loom-model", any(loom, spark_loom)))]
mod imp {
    pub(crate) use loom::sync::{Arc, Condvar, Mutex, MutexGuard};
    use std::sync::PoisonError;

    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn wait<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) use imp::{Arc, Condvar, Mutex, MutexGuard, lock, wait};
