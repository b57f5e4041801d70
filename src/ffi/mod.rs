//! ### English
//! C ABI surface for `gl_video_engine`.
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`.
//! The host (Java/Kotlin via JNI or Panama) owns the window surface and the
//! frame producer; the engine owns the render context, the external texture
//! and the render thread.
//!
//! ### 中文
//! `gl_video_engine` 的 C ABI 接口层。
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。
//! 宿主（通过 JNI 或 Panama 的 Java/Kotlin）持有 window surface 与帧生产者；
//! 引擎持有渲染上下文、external texture 与渲染线程。

mod engine;
mod lifecycle;
mod producer;

pub use producer::EmbedderFrameProducerApi;

use crate::engine::LifecycleCoordinator;

#[repr(C)]
/// ### English
/// Opaque engine handle owning the lifecycle coordinator (and through it the
/// render thread, when one is live).
///
/// ### 中文
/// 不透明引擎句柄，持有生命周期协调器（并通过它持有存活的渲染线程）。
pub struct GlVideoEngine {
    /// ### English
    /// Coordinator translating host lifecycle events into pipeline start/stop.
    ///
    /// ### 中文
    /// 把宿主生命周期事件翻译成管线启停的协调器。
    coordinator: LifecycleCoordinator,
}

/// ### English
/// C ABI version for `gl_video_engine`.
///
/// ### 中文
/// `gl_video_engine` 的 C ABI 版本号。
const GL_VIDEO_ENGINE_ABI_VERSION: u32 = 1;

#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn gl_video_engine_abi_version() -> u32 {
    GL_VIDEO_ENGINE_ABI_VERSION
}
