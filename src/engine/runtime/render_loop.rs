//! ### English
//! Render loop handle: spawns the dedicated render thread and enforces the
//! `Idle → Running → StopRequested → Stopped` machine from the caller side.
//!
//! ### 中文
//! 渲染循环句柄：创建独立渲染线程，并在调用方一侧维护
//! `Idle → Running → StopRequested → Stopped` 状态机。

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel as channel;
use dpi::PhysicalSize;
use log::{debug, error};

use crate::engine::error::RenderError;
use crate::engine::frame::FrameSignal;
use crate::engine::producer::FrameProducer;
use crate::engine::rendering::{ExternalTextureId, RenderBackendFactory, SurfaceHandle};

use super::render_thread::{self, RenderThreadParams};
use super::state::{LoopStateCell, RenderLoopState};

/// ### English
/// Upper bound on context + texture initialization inside the freshly
/// spawned render thread.
///
/// ### 中文
/// 新建渲染线程内上下文 + 纹理初始化的时间上限。
const INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// ### English
/// Owns the render thread for one surface instance at a time.
///
/// `start`/`stop` must be called from the UI/event thread; `stop` blocks
/// until the render thread has reached `Stopped`, so by the time it returns
/// no further GPU calls will occur.
///
/// ### 中文
/// 同一时刻为单个 surface 实例持有渲染线程。
///
/// `start`/`stop` 必须在 UI/事件线程调用；`stop` 会阻塞直到渲染线程到达
/// `Stopped`，因此返回后不会再有任何 GPU 调用。
pub struct RenderLoop {
    factory: Arc<dyn RenderBackendFactory>,
    producer: Arc<dyn FrameProducer>,
    signal: Arc<FrameSignal>,
    state: Arc<LoopStateCell>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RenderLoop {
    /// ### English
    /// Creates an idle loop.
    ///
    /// #### Parameters
    /// - `factory`: Builds the backend on the render thread.
    /// - `producer`: Frame producer latched before each draw.
    /// - `signal`: Shared frame-ready signal.
    ///
    /// ### 中文
    /// 创建一个空闲的循环。
    ///
    /// #### 参数
    /// - `factory`：在渲染线程上构造 backend。
    /// - `producer`：每次绘制前锁存的帧生产者。
    /// - `signal`：共享 frame-ready 信号。
    pub fn new(
        factory: Arc<dyn RenderBackendFactory>,
        producer: Arc<dyn FrameProducer>,
        signal: Arc<FrameSignal>,
    ) -> Self {
        Self {
            factory,
            producer,
            signal,
            state: Arc::new(LoopStateCell::new()),
            thread: None,
        }
    }

    /// ### English
    /// Current loop state.
    ///
    /// ### 中文
    /// 当前循环状态。
    pub fn state(&self) -> RenderLoopState {
        self.state.load()
    }

    /// ### English
    /// Spawns the render thread for `surface` and blocks until it reports
    /// its context + texture initialization result.
    ///
    /// Fails with `AlreadyRunning` unless the state is `Idle` or `Stopped`;
    /// context/allocation failures are returned as-is and leave the loop
    /// restartable.
    ///
    /// #### Parameters
    /// - `surface`: Host-owned drawing target.
    /// - `viewport`: Viewport recorded by the coordinator, if any.
    ///
    /// ### 中文
    /// 为 `surface` 创建渲染线程，并阻塞等待其上下文 + 纹理初始化结果。
    ///
    /// 状态不是 `Idle` 或 `Stopped` 时以 `AlreadyRunning` 失败；
    /// 上下文/分配失败原样返回，且循环仍可重新启动。
    ///
    /// #### 参数
    /// - `surface`：宿主持有的绘制目标。
    /// - `viewport`：协调器记录的视口（若有）。
    pub fn start(
        &mut self,
        surface: SurfaceHandle,
        viewport: Option<PhysicalSize<u32>>,
    ) -> Result<ExternalTextureId, RenderError> {
        match self.state.load() {
            RenderLoopState::Idle | RenderLoopState::Stopped => {}
            RenderLoopState::Running | RenderLoopState::StopRequested => {
                return Err(RenderError::AlreadyRunning);
            }
        }
        // A previous run that reached Stopped on its own may still hold an
        // unjoined thread handle.
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }

        self.signal.rearm();
        self.state.store(RenderLoopState::Running);

        let (init_tx, init_rx) = channel::bounded(1);
        let params = RenderThreadParams {
            factory: self.factory.clone(),
            producer: self.producer.clone(),
            signal: self.signal.clone(),
            state: self.state.clone(),
            surface,
            viewport,
            init_tx,
        };
        let thread = match thread::Builder::new()
            .name("video-render".to_string())
            .spawn(move || render_thread::run_render_thread(params))
        {
            Ok(thread) => thread,
            Err(err) => {
                // No thread exists to advance the state machine; without this
                // store every later start would report AlreadyRunning.
                self.state.store(RenderLoopState::Stopped);
                return Err(RenderError::ContextCreation(format!(
                    "thread spawn failed: {err}"
                )));
            }
        };
        self.thread = Some(thread);

        match init_rx.recv_timeout(INIT_TIMEOUT) {
            Ok(Ok(texture)) => {
                debug!("render loop running, texture {}", texture.raw());
                Ok(texture)
            }
            Ok(Err(err)) => {
                // The thread already released everything and stored Stopped.
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                error!("render loop failed to start: {err}");
                Err(err)
            }
            Err(_) => {
                self.signal.cancel();
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                Err(RenderError::ContextCreation(
                    "timed out initializing render thread".to_string(),
                ))
            }
        }
    }

    /// ### English
    /// Requests a stop and joins the render thread. No-op when `Idle` or
    /// already `Stopped`; safe to call repeatedly. When this returns, the
    /// state is `Stopped` and the context/texture have been released.
    ///
    /// ### 中文
    /// 请求停止并 join 渲染线程。`Idle` 或已 `Stopped` 时为 no-op；
    /// 可重复调用。返回时状态为 `Stopped`，上下文/纹理已释放。
    pub fn stop(&mut self) {
        let state = self.state.load();
        if matches!(state, RenderLoopState::Idle | RenderLoopState::Stopped)
            && self.thread.is_none()
        {
            return;
        }

        if state == RenderLoopState::Running {
            self.state.store(RenderLoopState::StopRequested);
        }
        self.signal.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        debug_assert_eq!(self.state.load(), RenderLoopState::Stopped);
        debug!("render loop stopped");
    }
}

impl Drop for RenderLoop {
    /// ### English
    /// Ensures the render thread is joined when the loop handle is dropped.
    ///
    /// ### 中文
    /// 确保循环句柄 drop 时 join 渲染线程。
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::engine::error::RenderError;
    use crate::engine::frame::FrameSignal;
    use crate::engine::runtime::test_support::{
        BackendProbe, InstrumentedFactory, ProbeProducer, fake_surface, wait_until,
    };

    use super::super::state::RenderLoopState;
    use super::RenderLoop;

    fn make_loop() -> (RenderLoop, Arc<BackendProbe>, Arc<ProbeProducer>, Arc<FrameSignal>) {
        let probe = Arc::new(BackendProbe::new());
        let producer = Arc::new(ProbeProducer::new());
        let signal = Arc::new(FrameSignal::new());
        let render_loop = RenderLoop::new(
            Arc::new(InstrumentedFactory::new(probe.clone())),
            producer.clone(),
            signal.clone(),
        );
        (render_loop, probe, producer, signal)
    }

    #[test]
    fn start_runs_and_stop_joins() {
        let (mut render_loop, probe, _producer, signal) = make_loop();
        assert_eq!(render_loop.state(), RenderLoopState::Idle);

        let texture = render_loop.start(fake_surface(), None).unwrap();
        assert_eq!(render_loop.state(), RenderLoopState::Running);
        assert!(texture.raw() > 0);

        signal.publish();
        assert!(wait_until(Duration::from_secs(5), || {
            probe.present_calls() >= 1
        }));

        render_loop.stop();
        assert_eq!(render_loop.state(), RenderLoopState::Stopped);
        probe.mark_stop_returned();
        assert_eq!(probe.live_contexts(), 0);
        assert_eq!(probe.live_textures(), 0);
    }

    #[test]
    fn no_gpu_calls_after_stop_returns() {
        let (mut render_loop, probe, _producer, signal) = make_loop();
        render_loop.start(fake_surface(), None).unwrap();
        signal.publish();
        assert!(wait_until(Duration::from_secs(5), || probe.draw_calls() >= 1));

        render_loop.stop();
        probe.mark_stop_returned();

        // Publishing after stop must not reach the backend.
        signal.publish();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(probe.calls_after_stop(), 0);
    }

    #[test]
    fn second_stop_is_a_no_op() {
        let (mut render_loop, _probe, _producer, _signal) = make_loop();
        render_loop.start(fake_surface(), None).unwrap();

        render_loop.stop();
        let before = std::time::Instant::now();
        render_loop.stop();
        assert!(before.elapsed() < Duration::from_secs(1));
        assert_eq!(render_loop.state(), RenderLoopState::Stopped);
    }

    #[test]
    fn stop_without_start_is_a_no_op() {
        let (mut render_loop, _probe, _producer, _signal) = make_loop();
        render_loop.stop();
        assert_eq!(render_loop.state(), RenderLoopState::Idle);
    }

    #[test]
    fn start_while_running_is_already_running() {
        let (mut render_loop, _probe, _producer, _signal) = make_loop();
        render_loop.start(fake_surface(), None).unwrap();

        match render_loop.start(fake_surface(), None) {
            Err(RenderError::AlreadyRunning) => {}
            other => panic!("expected AlreadyRunning, got {other:?}"),
        }
        render_loop.stop();
    }

    #[test]
    fn restart_after_stop_does_not_leak() {
        let (mut render_loop, probe, _producer, _signal) = make_loop();
        render_loop.start(fake_surface(), None).unwrap();
        render_loop.stop();
        render_loop.start(fake_surface(), None).unwrap();
        render_loop.stop();

        assert_eq!(probe.attach_calls(), 2);
        assert_eq!(probe.live_contexts(), 0);
        assert_eq!(probe.live_textures(), 0);
    }

    #[test]
    fn context_failure_declines_to_start() {
        let (mut render_loop, probe, producer, _signal) = make_loop();
        probe.fail_next_attach();

        match render_loop.start(fake_surface(), None) {
            Err(RenderError::ContextCreation(_)) => {}
            other => panic!("expected ContextCreation, got {other:?}"),
        }
        assert_eq!(render_loop.state(), RenderLoopState::Stopped);
        assert_eq!(producer.attach_calls(), 0);
        assert_eq!(probe.live_contexts(), 0);

        // Terminal for that surface instance, but a later start may succeed.
        render_loop.start(fake_surface(), None).unwrap();
        render_loop.stop();
    }

    #[test]
    fn allocation_failure_releases_the_context() {
        let (mut render_loop, probe, _producer, _signal) = make_loop();
        probe.fail_next_texture_alloc();

        match render_loop.start(fake_surface(), None) {
            Err(RenderError::Allocation(_)) => {}
            other => panic!("expected Allocation, got {other:?}"),
        }
        assert_eq!(probe.live_contexts(), 0);
        assert_eq!(probe.live_textures(), 0);

        // Every failed start must leave the machine at Stopped, never stuck
        // at Running, so the loop stays restartable.
        assert_eq!(render_loop.state(), RenderLoopState::Stopped);
        render_loop.start(fake_surface(), None).unwrap();
        render_loop.stop();
    }

    #[test]
    fn burst_published_before_start_draws_once() {
        let (mut render_loop, probe, producer, signal) = make_loop();
        signal.publish();
        signal.publish();
        signal.publish();

        render_loop.start(fake_surface(), None).unwrap();
        assert!(wait_until(Duration::from_secs(5), || probe.draw_calls() >= 1));
        // Give the loop time to (incorrectly) redraw stale content.
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(probe.draw_calls(), 1);
        assert_eq!(producer.latch_calls(), 1);
        render_loop.stop();
    }
}
