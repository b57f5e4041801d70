//! ### English
//! Dedicated render thread: owns the GPU context and performs every drawing
//! and presentation call.
//!
//! ### 中文
//! 独立渲染线程：持有 GPU 上下文并执行所有绘制与呈现调用。

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel as channel;
use dpi::PhysicalSize;
use log::{debug, warn};

use crate::engine::error::RenderError;
use crate::engine::frame::{FrameSignal, WaitOutcome};
use crate::engine::producer::FrameProducer;
use crate::engine::rendering::{ExternalTextureId, RenderBackendFactory, SurfaceHandle};

use super::state::{LoopStateCell, RenderLoopState};

/// ### English
/// Liveness slice for `wait_and_consume`: an idle loop wakes this often to
/// re-check for work; a stop request wakes it immediately regardless.
///
/// ### 中文
/// `wait_and_consume` 的存活时间片：空闲循环以此周期醒来复查；
/// 停止请求无论如何都会立即唤醒。
pub(super) const FRAME_WAIT_SLICE: Duration = Duration::from_millis(50);

/// ### English
/// Everything the render thread needs, moved into it at spawn.
///
/// ### 中文
/// 渲染线程需要的全部内容，spawn 时一次性移入。
pub(super) struct RenderThreadParams {
    /// ### English
    /// Factory that builds the backend on this thread (GL state never
    /// crosses threads).
    ///
    /// ### 中文
    /// 在本线程上构造 backend 的工厂（GL 状态从不跨线程）。
    pub factory: Arc<dyn RenderBackendFactory>,
    /// ### English
    /// Producer whose newest frame is latched before each draw.
    ///
    /// ### 中文
    /// 每次绘制前锁存其最新帧的生产者。
    pub producer: Arc<dyn FrameProducer>,
    /// ### English
    /// Frame-ready signal consumed by this thread.
    ///
    /// ### 中文
    /// 本线程消费的 frame-ready 信号。
    pub signal: Arc<FrameSignal>,
    /// ### English
    /// Shared loop state; this thread writes only `Stopped`.
    ///
    /// ### 中文
    /// 共享循环状态；本线程只写入 `Stopped`。
    pub state: Arc<LoopStateCell>,
    /// ### English
    /// Host-owned drawing target to bind.
    ///
    /// ### 中文
    /// 要绑定的宿主持有的绘制目标。
    pub surface: SurfaceHandle,
    /// ### English
    /// Viewport recorded by the coordinator, if any.
    ///
    /// ### 中文
    /// 协调器记录的视口（若有）。
    pub viewport: Option<PhysicalSize<u32>>,
    /// ### English
    /// Init handshake: context + texture creation result, sent exactly once.
    ///
    /// ### 中文
    /// 初始化握手：上下文 + 纹理创建结果，恰好发送一次。
    pub init_tx: channel::Sender<Result<ExternalTextureId, RenderError>>,
}

/// ### English
/// Render thread entry function. Attaches the context, creates the external
/// texture, reports both through the init channel, then draws one frame per
/// `Available` until cancelled. On every exit path the context is released
/// and the state is left at `Stopped`.
///
/// ### 中文
/// 渲染线程入口函数。attach 上下文、创建 external texture、通过初始化通道
/// 上报结果，然后每收到一次 `Available` 绘制一帧，直到被取消。
/// 所有退出路径都会释放上下文并把状态置为 `Stopped`。
pub(super) fn run_render_thread(params: RenderThreadParams) {
    let RenderThreadParams {
        factory,
        producer,
        signal,
        state,
        surface,
        viewport,
        init_tx,
    } = params;

    let mut backend = factory.create();

    if let Err(err) = backend.attach(&surface) {
        let _ = init_tx.send(Err(err));
        state.store(RenderLoopState::Stopped);
        return;
    }
    if let Some(viewport) = viewport {
        backend.set_viewport(viewport);
    }

    let texture = match backend.create_external_texture() {
        Ok(texture) => texture,
        Err(err) => {
            backend.detach();
            let _ = init_tx.send(Err(err));
            state.store(RenderLoopState::Stopped);
            return;
        }
    };

    if init_tx.send(Ok(texture)).is_err() {
        // The starter gave up waiting; nobody will ever stop us, so bail out.
        backend.destroy_external_texture(texture);
        backend.detach();
        state.store(RenderLoopState::Stopped);
        return;
    }

    loop {
        match signal.wait_and_consume(FRAME_WAIT_SLICE) {
            WaitOutcome::Available => {
                // The producer's update mechanism moves the newest frame into
                // the external texture; only then is it safe to sample.
                producer.latch_frame();
                match backend.draw(texture) {
                    Ok(()) => {
                        if let Err(err) = backend.present() {
                            warn!("present failed: {err}");
                        }
                    }
                    Err(err) => warn!("draw failed: {err}"),
                }
            }
            WaitOutcome::TimedOut => continue,
            WaitOutcome::Cancelled => break,
        }
    }

    backend.destroy_external_texture(texture);
    backend.detach();
    state.store(RenderLoopState::Stopped);
    debug!("render thread exited cleanly");
}
