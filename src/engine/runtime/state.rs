//! ### English
//! Render loop state machine storage.
//!
//! `Idle → Running → StopRequested → Stopped`. The coordinator side writes
//! the start/stop edges; the render thread writes only the final `Stopped`.
//!
//! ### 中文
//! 渲染循环状态机存储。
//!
//! `Idle → Running → StopRequested → Stopped`。协调器侧写入启停边；
//! 渲染线程只写入最终的 `Stopped`。

use std::sync::atomic::{AtomicU8, Ordering};

/// ### English
/// Render loop lifecycle state.
///
/// ### 中文
/// 渲染循环生命周期状态。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderLoopState {
    /// ### English
    /// Created, never started.
    ///
    /// ### 中文
    /// 已创建，尚未启动。
    Idle = 0,
    /// ### English
    /// Render thread is live and consuming the frame signal.
    ///
    /// ### 中文
    /// 渲染线程存活并消费帧信号。
    Running = 1,
    /// ### English
    /// A stop was requested; the thread has not yet exited.
    ///
    /// ### 中文
    /// 已请求停止；线程尚未退出。
    StopRequested = 2,
    /// ### English
    /// The thread exited and released its context. A new run may start from
    /// here.
    ///
    /// ### 中文
    /// 线程已退出并释放了上下文。可以从这里开始新的运行。
    Stopped = 3,
}

/// ### English
/// Shared atomic cell holding one `RenderLoopState`.
///
/// ### 中文
/// 持有单个 `RenderLoopState` 的共享原子单元。
pub(crate) struct LoopStateCell(AtomicU8);

impl LoopStateCell {
    /// ### English
    /// Creates a cell in `Idle`.
    ///
    /// ### 中文
    /// 创建处于 `Idle` 的单元。
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(RenderLoopState::Idle as u8))
    }

    /// ### English
    /// Loads the state with Acquire ordering.
    ///
    /// ### 中文
    /// 以 Acquire 顺序读取状态。
    pub(crate) fn load(&self) -> RenderLoopState {
        match self.0.load(Ordering::Acquire) {
            0 => RenderLoopState::Idle,
            1 => RenderLoopState::Running,
            2 => RenderLoopState::StopRequested,
            _ => RenderLoopState::Stopped,
        }
    }

    /// ### English
    /// Stores the state with Release ordering.
    ///
    /// #### Parameters
    /// - `state`: New state.
    ///
    /// ### 中文
    /// 以 Release 顺序写入状态。
    ///
    /// #### 参数
    /// - `state`：新状态。
    pub(crate) fn store(&self, state: RenderLoopState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::{LoopStateCell, RenderLoopState};

    #[test]
    fn starts_idle_and_round_trips_every_state() {
        let cell = LoopStateCell::new();
        assert_eq!(cell.load(), RenderLoopState::Idle);

        for state in [
            RenderLoopState::Running,
            RenderLoopState::StopRequested,
            RenderLoopState::Stopped,
            RenderLoopState::Idle,
        ] {
            cell.store(state);
            assert_eq!(cell.load(), state);
        }
    }
}
