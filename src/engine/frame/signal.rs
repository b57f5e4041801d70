//! ### English
//! Coalescing frame-ready signal.
//!
//! The producer side is non-blocking and may be called from any thread; a
//! burst of publishes before a consume collapses to a single `Available`
//! observation that reflects the latest frame serial. A single-slot wake
//! channel carries the "something happened" edge; the frame counters carry
//! the actual pending/consumed relationship, so a lost or stale wake token is
//! never a lost frame.
//!
//! ### 中文
//! 合并式 frame-ready 信号。
//!
//! 生产者侧不阻塞、可在任意线程调用；consume 之前的连续多次 publish 会合并为
//! 一次 `Available`，且反映最新帧序号。单槽唤醒通道只承载“发生了事件”这条边；
//! 真正的 pending/consumed 关系由帧计数承载，因此丢失或过期的唤醒 token
//! 绝不会造成丢帧。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel as channel;

/// ### English
/// Outcome of one `wait_and_consume` call on the render thread.
///
/// ### 中文
/// 渲染线程一次 `wait_and_consume` 调用的结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// ### English
    /// At least one frame was published since the last consume; the external
    /// texture holds the newest one.
    ///
    /// ### 中文
    /// 自上次 consume 后至少发布过一帧；external texture 中是最新的一帧。
    Available,
    /// ### English
    /// No frame arrived within the timeout slice (used for liveness checks).
    ///
    /// ### 中文
    /// 超时片内没有新帧到达（用于存活检查）。
    TimedOut,
    /// ### English
    /// A stop was requested; the render loop must exit without further waits.
    ///
    /// ### 中文
    /// 已请求停止；渲染循环必须退出且不得再等待。
    Cancelled,
}

/// ### English
/// Shared frame-ready signal. The only cross-thread object between the
/// producer and the render loop.
///
/// ### 中文
/// 共享 frame-ready 信号。生产者与渲染循环之间唯一的跨线程对象。
pub struct FrameSignal {
    /// ### English
    /// Single-slot wake channel; `try_send` coalesces bursts (a full channel
    /// means a wake is already pending).
    ///
    /// ### 中文
    /// 单槽唤醒通道；`try_send` 合并突发（通道已满表示唤醒已挂起）。
    wake_tx: channel::Sender<()>,
    /// ### English
    /// Receiver side of the wake channel (render thread).
    ///
    /// ### 中文
    /// 唤醒通道的接收端（渲染线程）。
    wake_rx: channel::Receiver<()>,
    /// ### English
    /// Monotonic serial of the newest published frame.
    ///
    /// ### 中文
    /// 最新已发布帧的单调序号。
    published: AtomicU64,
    /// ### English
    /// Serial of the newest consumed frame. Written only by the render thread.
    ///
    /// ### 中文
    /// 最新已消费帧的序号。只由渲染线程写入。
    consumed: AtomicU64,
    /// ### English
    /// Stop-requested flag observed on every wake.
    ///
    /// ### 中文
    /// 每次被唤醒都会检查的停止请求标记。
    cancelled: AtomicBool,
}

impl FrameSignal {
    /// ### English
    /// Creates a new signal with no pending frame and no cancellation.
    ///
    /// ### 中文
    /// 创建一个无挂起帧、未取消的新信号。
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = channel::bounded(1);
        Self {
            wake_tx,
            wake_rx,
            published: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// ### English
    /// Producer side: marks a new frame as available. Non-blocking; callable
    /// from any thread. Multiple publishes before a consume collapse into one
    /// pending `Available`.
    ///
    /// ### 中文
    /// 生产者侧：标记新帧可用。不阻塞，可在任意线程调用。
    /// consume 之前的多次 publish 合并为一次挂起的 `Available`。
    pub fn publish(&self) {
        self.published.fetch_add(1, Ordering::Release);
        let _ = self.wake_tx.try_send(());
    }

    /// ### English
    /// Requests cancellation and force-wakes a sleeping waiter. Idempotent.
    ///
    /// ### 中文
    /// 请求取消并强制唤醒睡眠中的等待者。幂等。
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        let _ = self.wake_tx.try_send(());
    }

    /// ### English
    /// Clears a previous cancellation so the signal can serve a restarted
    /// render loop. A frame published while no loop was running stays pending.
    ///
    /// Must only be called while no render thread is waiting on this signal.
    ///
    /// ### 中文
    /// 清除之前的取消状态，使信号可服务于重启后的渲染循环。
    /// 循环未运行期间发布的帧保持挂起。
    ///
    /// 只能在没有渲染线程等待该信号时调用。
    pub fn rearm(&self) {
        self.cancelled.store(false, Ordering::Release);
        while self.wake_rx.try_recv().is_ok() {}
        if self.published.load(Ordering::Acquire) > self.consumed.load(Ordering::Acquire) {
            let _ = self.wake_tx.try_send(());
        }
    }

    /// ### English
    /// Render-thread side: waits for the next event.
    ///
    /// The cancellation flag is checked on every wake, so `Cancelled` is
    /// returned within one wake of a `cancel()` even while asleep in the
    /// timed receive.
    ///
    /// #### Parameters
    /// - `timeout`: Liveness slice after which `TimedOut` is returned.
    ///
    /// ### 中文
    /// 渲染线程侧：等待下一个事件。
    ///
    /// 每次被唤醒都会检查取消标记，因此即使正睡在定时接收中，`cancel()` 之后
    /// 也会在一次唤醒内返回 `Cancelled`。
    ///
    /// #### 参数
    /// - `timeout`：超时片；超过后返回 `TimedOut`。
    pub fn wait_and_consume(&self, timeout: Duration) -> WaitOutcome {
        if self.cancelled.load(Ordering::Acquire) {
            return WaitOutcome::Cancelled;
        }
        if self.take_pending() {
            return WaitOutcome::Available;
        }

        match self.wake_rx.recv_timeout(timeout) {
            Ok(()) => {
                if self.cancelled.load(Ordering::Acquire) {
                    WaitOutcome::Cancelled
                } else if self.take_pending() {
                    WaitOutcome::Available
                } else {
                    // Stale token from an already-consumed burst.
                    WaitOutcome::TimedOut
                }
            }
            Err(channel::RecvTimeoutError::Timeout) => WaitOutcome::TimedOut,
            // Both channel ends live inside `self`; disconnection only happens
            // during teardown. Treat it as cancellation.
            Err(channel::RecvTimeoutError::Disconnected) => WaitOutcome::Cancelled,
        }
    }

    /// ### English
    /// Consumes everything published so far. Returns `true` if at least one
    /// frame was pending. Render thread only.
    ///
    /// ### 中文
    /// 消费截至目前发布的所有帧。若至少有一帧挂起则返回 `true`。
    /// 只能在渲染线程调用。
    fn take_pending(&self) -> bool {
        let published = self.published.load(Ordering::Acquire);
        if published == self.consumed.load(Ordering::Relaxed) {
            return false;
        }
        self.consumed.store(published, Ordering::Relaxed);
        // Drain the (possibly stale) wake token so a fully consumed burst
        // leaves the channel empty. A publish racing this drain still wins:
        // its counter increment is observed by the next `take_pending`.
        let _ = self.wake_rx.try_recv();
        true
    }

    /// ### English
    /// Serial of the newest published frame (diagnostics/tests).
    ///
    /// ### 中文
    /// 最新已发布帧的序号（诊断/测试用）。
    pub fn published_serial(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }
}

impl Default for FrameSignal {
    fn default() -> Self {
        Self::new()
    }
}
