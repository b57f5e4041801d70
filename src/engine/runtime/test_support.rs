//! ### English
//! Instrumented backend/producer used by the runtime tests: records every
//! call, can fail on demand, and flags GPU calls made after `stop()` has
//! returned.
//!
//! ### 中文
//! 运行时测试使用的插桩 backend/生产者：记录所有调用，可按需失败，
//! 并标记 `stop()` 返回之后发生的 GPU 调用。

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dpi::PhysicalSize;

use crate::engine::error::RenderError;
use crate::engine::producer::FrameProducer;
use crate::engine::rendering::{
    ExternalTextureId, RenderBackend, RenderBackendFactory, SurfaceHandle,
};

/// ### English
/// Shared call log for one instrumented backend family.
///
/// ### 中文
/// 一组插桩 backend 共享的调用记录。
pub(crate) struct BackendProbe {
    attach_calls: AtomicUsize,
    detach_calls: AtomicUsize,
    texture_creates: AtomicUsize,
    texture_destroys: AtomicUsize,
    draw_calls: AtomicUsize,
    present_calls: AtomicUsize,
    next_texture: AtomicU32,
    stop_returned: AtomicBool,
    calls_after_stop: AtomicUsize,
    fail_attach: AtomicBool,
    fail_texture_alloc: AtomicBool,
}

impl BackendProbe {
    pub(crate) fn new() -> Self {
        Self {
            attach_calls: AtomicUsize::new(0),
            detach_calls: AtomicUsize::new(0),
            texture_creates: AtomicUsize::new(0),
            texture_destroys: AtomicUsize::new(0),
            draw_calls: AtomicUsize::new(0),
            present_calls: AtomicUsize::new(0),
            next_texture: AtomicU32::new(1),
            stop_returned: AtomicBool::new(false),
            calls_after_stop: AtomicUsize::new(0),
            fail_attach: AtomicBool::new(false),
            fail_texture_alloc: AtomicBool::new(false),
        }
    }

    fn record_call(&self) {
        if self.stop_returned.load(Ordering::SeqCst) {
            self.calls_after_stop.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// ### English
    /// Marks the moment `stop()` returned; any backend call after this is a
    /// correctness violation.
    ///
    /// ### 中文
    /// 标记 `stop()` 返回的时刻；此后任何 backend 调用都是正确性违规。
    pub(crate) fn mark_stop_returned(&self) {
        self.stop_returned.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_next_attach(&self) {
        self.fail_attach.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_next_texture_alloc(&self) {
        self.fail_texture_alloc.store(true, Ordering::SeqCst);
    }

    pub(crate) fn attach_calls(&self) -> usize {
        self.attach_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn draw_calls(&self) -> usize {
        self.draw_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn present_calls(&self) -> usize {
        self.present_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_after_stop(&self) -> usize {
        self.calls_after_stop.load(Ordering::SeqCst)
    }

    /// ### English
    /// Contexts attached minus contexts detached.
    ///
    /// ### 中文
    /// attach 的上下文数减去 detach 的上下文数。
    pub(crate) fn live_contexts(&self) -> isize {
        self.attach_calls.load(Ordering::SeqCst) as isize
            - self.detach_calls.load(Ordering::SeqCst) as isize
    }

    /// ### English
    /// Textures created minus textures destroyed (allocation baseline check).
    ///
    /// ### 中文
    /// 创建的纹理数减去销毁的纹理数（分配基线检查）。
    pub(crate) fn live_textures(&self) -> isize {
        self.texture_creates.load(Ordering::SeqCst) as isize
            - self.texture_destroys.load(Ordering::SeqCst) as isize
    }
}

/// ### English
/// Backend that records calls against a shared probe.
///
/// ### 中文
/// 将调用记录到共享 probe 的 backend。
pub(crate) struct InstrumentedBackend {
    probe: Arc<BackendProbe>,
    attached: bool,
}

impl RenderBackend for InstrumentedBackend {
    fn attach(&mut self, _surface: &SurfaceHandle) -> Result<(), RenderError> {
        self.probe.record_call();
        if self.probe.fail_attach.swap(false, Ordering::SeqCst) {
            return Err(RenderError::ContextCreation(
                "instrumented attach failure".to_string(),
            ));
        }
        self.attached = true;
        self.probe.attach_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn detach(&mut self) {
        self.probe.record_call();
        if !self.attached {
            return;
        }
        self.attached = false;
        self.probe.detach_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn create_external_texture(&mut self) -> Result<ExternalTextureId, RenderError> {
        self.probe.record_call();
        if !self.attached {
            return Err(RenderError::Allocation("no context".to_string()));
        }
        if self.probe.fail_texture_alloc.swap(false, Ordering::SeqCst) {
            return Err(RenderError::Allocation(
                "instrumented allocation failure".to_string(),
            ));
        }
        self.probe.texture_creates.fetch_add(1, Ordering::SeqCst);
        let raw = self.probe.next_texture.fetch_add(1, Ordering::SeqCst);
        Ok(ExternalTextureId::from_raw(raw).expect("non-zero texture name"))
    }

    fn destroy_external_texture(&mut self, _texture: ExternalTextureId) {
        self.probe.record_call();
        self.probe.texture_destroys.fetch_add(1, Ordering::SeqCst);
    }

    fn set_viewport(&mut self, _size: PhysicalSize<u32>) {
        self.probe.record_call();
    }

    fn draw(&mut self, _texture: ExternalTextureId) -> Result<(), RenderError> {
        self.probe.record_call();
        if !self.attached {
            return Err(RenderError::Draw("draw without context".to_string()));
        }
        self.probe.draw_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.probe.record_call();
        if !self.attached {
            return Err(RenderError::Draw("present without context".to_string()));
        }
        self.probe.present_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// ### English
/// Factory producing instrumented backends over one shared probe.
///
/// ### 中文
/// 基于单个共享 probe 生产插桩 backend 的工厂。
pub(crate) struct InstrumentedFactory {
    probe: Arc<BackendProbe>,
}

impl InstrumentedFactory {
    pub(crate) fn new(probe: Arc<BackendProbe>) -> Self {
        Self { probe }
    }
}

impl RenderBackendFactory for InstrumentedFactory {
    fn create(&self) -> Box<dyn RenderBackend> {
        Box::new(InstrumentedBackend {
            probe: self.probe.clone(),
            attached: false,
        })
    }
}

/// ### English
/// Frame producer that records the texture it was attached to and every
/// latch/detach/release call.
///
/// ### 中文
/// 记录所绑定纹理以及每次 latch/detach/release 调用的帧生产者。
pub(crate) struct ProbeProducer {
    output: Mutex<Option<ExternalTextureId>>,
    attach_calls: AtomicUsize,
    latch_calls: AtomicUsize,
    detach_calls: AtomicUsize,
    release_calls: AtomicUsize,
}

impl ProbeProducer {
    pub(crate) fn new() -> Self {
        Self {
            output: Mutex::new(None),
            attach_calls: AtomicUsize::new(0),
            latch_calls: AtomicUsize::new(0),
            detach_calls: AtomicUsize::new(0),
            release_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn output(&self) -> Option<ExternalTextureId> {
        *self.output.lock().unwrap()
    }

    pub(crate) fn attach_calls(&self) -> usize {
        self.attach_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn latch_calls(&self) -> usize {
        self.latch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn detach_calls(&self) -> usize {
        self.detach_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }
}

impl FrameProducer for ProbeProducer {
    fn attach_output(&self, texture: ExternalTextureId) {
        *self.output.lock().unwrap() = Some(texture);
        self.attach_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn latch_frame(&self) {
        self.latch_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn detach_output(&self) {
        *self.output.lock().unwrap() = None;
        self.detach_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// ### English
/// Fake host-owned surface pointer for tests.
///
/// ### 中文
/// 测试用的伪宿主 surface 指针。
pub(crate) fn fake_surface() -> SurfaceHandle {
    SurfaceHandle::from_raw(0x1000 as *mut std::ffi::c_void).expect("non-null fake surface")
}

/// ### English
/// Polls `condition` until it holds or `timeout` elapses.
///
/// ### 中文
/// 轮询 `condition` 直到成立或超过 `timeout`。
pub(crate) fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}
