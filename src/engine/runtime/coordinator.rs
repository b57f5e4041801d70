//! ### English
//! Lifecycle coordinator: the state machine gluing UI-driven surface/app
//! events to safe start/stop of the render pipeline.
//!
//! The UI owns the surface's lifetime; the coordinator owns the render
//! context, external texture and loop state, and releases all three no later
//! than the moment the surface becomes invalid.
//!
//! All methods take `&self`: the lifecycle state sits behind one mutex so the
//! C ABI layer only ever forms shared references, no matter which thread a
//! frame notification arrives on.
//!
//! ### 中文
//! 生命周期协调器：把 UI 驱动的 surface/app 事件接到渲染管线安全启停上的
//! 状态机。
//!
//! surface 的生命周期由 UI 持有；协调器持有渲染上下文、external texture 与
//! 循环状态，并最迟在 surface 失效的那一刻释放这三者。
//!
//! 所有方法都取 `&self`：生命周期状态放在单个互斥锁之后，
//! 因此无论帧通知来自哪个线程，C ABI 层都只会构造共享引用。

use std::sync::{Arc, Mutex, MutexGuard};

use dpi::PhysicalSize;
use log::{debug, error, info};

use crate::engine::error::RenderError;
use crate::engine::frame::FrameSignal;
use crate::engine::producer::FrameProducer;
use crate::engine::rendering::{ExternalTextureId, RenderBackendFactory, SurfaceHandle};

use super::render_loop::RenderLoop;
use super::state::RenderLoopState;

/// ### English
/// Mutable lifecycle state, guarded by the coordinator's mutex.
///
/// ### 中文
/// 可变的生命周期状态，由协调器的互斥锁保护。
struct CoordinatorState {
    render_loop: RenderLoop,
    /// ### English
    /// Viewport reported by the host; applied at the next loop start.
    ///
    /// ### 中文
    /// 宿主报告的视口；在下一次循环启动时应用。
    viewport: Option<PhysicalSize<u32>>,
    /// ### English
    /// Texture of the current surface instance, while one is live.
    ///
    /// ### 中文
    /// 当前 surface 实例的纹理（存活期间）。
    texture: Option<ExternalTextureId>,
    /// ### English
    /// Whether the producer still holds an output binding. Tracked apart from
    /// `texture`: a binding from a previous run outlives a failed restart and
    /// must still be detached on the destroy paths.
    ///
    /// ### 中文
    /// 生产者是否仍持有输出绑定。与 `texture` 分开记录：
    /// 上一次运行留下的绑定会在重启失败后继续存在，销毁路径上仍必须解绑。
    producer_attached: bool,
}

/// ### English
/// Drives the pipeline from five host events. Lifecycle methods are expected
/// on the UI/event thread and serialize on an internal mutex; each stop path
/// is synchronous and idempotent. `frame_available` never takes that lock and
/// may be called from any thread.
///
/// ### 中文
/// 通过五个宿主事件驱动管线。生命周期方法预期在 UI/事件线程调用，并通过内部
/// 互斥锁串行化；每条停止路径都是同步且幂等的。`frame_available` 不取该锁，
/// 可从任意线程调用。
pub struct LifecycleCoordinator {
    producer: Arc<dyn FrameProducer>,
    signal: Arc<FrameSignal>,
    inner: Mutex<CoordinatorState>,
}

impl LifecycleCoordinator {
    /// ### English
    /// Builds the component graph explicitly: signal, loop, producer wiring.
    /// No global singletons are involved.
    ///
    /// #### Parameters
    /// - `factory`: Builds the render backend on the render thread.
    /// - `producer`: External frame-producer collaborator.
    ///
    /// ### 中文
    /// 显式组装组件图：信号、循环、生产者接线。不依赖任何全局单例。
    ///
    /// #### 参数
    /// - `factory`：在渲染线程上构造渲染 backend。
    /// - `producer`：外部帧生产者协作方。
    pub fn new(factory: Arc<dyn RenderBackendFactory>, producer: Arc<dyn FrameProducer>) -> Self {
        let signal = Arc::new(FrameSignal::new());
        let render_loop = RenderLoop::new(factory, producer.clone(), signal.clone());
        Self {
            producer,
            signal,
            inner: Mutex::new(CoordinatorState {
                render_loop,
                viewport: None,
                texture: None,
                producer_attached: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        // A panic on a lifecycle path aborts teardown anyway; keep the state
        // usable instead of propagating poison.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// ### English
    /// Producer-side entry point: a new frame has been written into the
    /// external texture. Lock-free; callable from any thread.
    ///
    /// ### 中文
    /// 生产者侧入口：新帧已写入 external texture。无锁；可从任意线程调用。
    pub fn frame_available(&self) {
        self.signal.publish();
    }

    /// ### English
    /// Texture of the live surface instance, if any.
    ///
    /// ### 中文
    /// 存活 surface 实例的纹理（若有）。
    pub fn texture_id(&self) -> Option<ExternalTextureId> {
        self.lock().texture
    }

    /// ### English
    /// Current render loop state.
    ///
    /// ### 中文
    /// 当前渲染循环状态。
    pub fn render_loop_state(&self) -> RenderLoopState {
        self.lock().render_loop.state()
    }

    /// ### English
    /// Surface became available: start the pipeline for it.
    ///
    /// Texture creation is deferred into the render thread (which has the
    /// momentarily-current context), and the resulting identity is handed to
    /// the producer before any frame can be published for it. On failure the
    /// coordinator declines to start rendering and reports the error; no
    /// retry. A producer binding left over from a previous run stays in place
    /// either way, so a later destroy path still releases it.
    ///
    /// #### Parameters
    /// - `surface`: Host-owned drawing target that just became valid.
    ///
    /// ### 中文
    /// surface 可用：为其启动管线。
    ///
    /// 纹理创建推迟到渲染线程（其上下文恰好 current），得到的纹理标识在任何
    /// 帧发布之前交给生产者。失败时协调器拒绝开始渲染并报告错误；不重试。
    /// 无论成败，上一次运行遗留的生产者绑定都保持不动，
    /// 之后的销毁路径仍会释放它。
    ///
    /// #### 参数
    /// - `surface`：刚变为有效的宿主绘制目标。
    pub fn on_surface_created(&self, surface: SurfaceHandle) -> Result<(), RenderError> {
        let mut inner = self.lock();

        // Re-entrancy rule: never start while a previous loop has not fully
        // reached Stopped. stop() is a synchronous join, so this suffices.
        inner.render_loop.stop();

        let viewport = inner.viewport;
        match inner.render_loop.start(surface, viewport) {
            Ok(texture) => {
                inner.texture = Some(texture);
                inner.producer_attached = true;
                // Host callbacks may call back into the engine; never enter
                // them with the lifecycle lock held.
                drop(inner);
                self.producer.attach_output(texture);
                info!("pipeline started, texture {}", texture.raw());
                Ok(())
            }
            Err(err) => {
                inner.texture = None;
                error!("declining to start rendering: {err}");
                Err(err)
            }
        }
    }

    /// ### English
    /// Surface dimensions changed. Currently records the viewport for the
    /// next start; reserved for live viewport updates.
    ///
    /// #### Parameters
    /// - `size`: New surface size in physical pixels.
    ///
    /// ### 中文
    /// surface 尺寸变化。目前记录视口供下一次启动使用；保留用于运行中
    /// 的视口更新。
    ///
    /// #### 参数
    /// - `size`：新的 surface 物理像素尺寸。
    pub fn on_surface_changed(&self, size: PhysicalSize<u32>) {
        debug!("surface changed to {}x{}", size.width, size.height);
        self.lock().viewport = Some(size);
    }

    /// ### English
    /// Surface is going away: stop rendering synchronously, then release the
    /// producer resources bound to the now-invalid texture. Idempotent.
    ///
    /// ### 中文
    /// surface 即将失效：同步停止渲染，然后释放生产者绑定在已失效纹理上的
    /// 资源。幂等。
    pub fn on_surface_destroyed(&self) {
        let mut inner = self.lock();
        inner.render_loop.stop();
        inner.texture = None;
        if std::mem::take(&mut inner.producer_attached) {
            drop(inner);
            self.producer.detach_output();
            info!("pipeline torn down with surface");
        }
    }

    /// ### English
    /// App paused: stop rendering but keep the texture identity and producer
    /// binding, so a surviving surface can restart via `on_surface_created`.
    ///
    /// ### 中文
    /// 应用暂停：停止渲染，但保留纹理标识与生产者绑定，
    /// 以便存活的 surface 通过 `on_surface_created` 重启。
    pub fn on_app_paused(&self) {
        self.lock().render_loop.stop();
        debug!("pipeline paused");
    }

    /// ### English
    /// App destroyed: run the surface-teardown path idempotently, then
    /// release the producer collaborator entirely.
    ///
    /// ### 中文
    /// 应用销毁：幂等地执行 surface 清理路径，然后彻底释放生产者协作方。
    pub fn on_app_destroyed(&self) {
        self.on_surface_destroyed();
        self.producer.release();
        info!("pipeline destroyed");
    }
}

impl Drop for LifecycleCoordinator {
    /// ### English
    /// Dropping the coordinator runs the full teardown path.
    ///
    /// ### 中文
    /// drop 协调器会执行完整清理路径。
    fn drop(&mut self) {
        self.on_app_destroyed();
    }
}
