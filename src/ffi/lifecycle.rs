//! ### English
//! C ABI bindings for the five host lifecycle events plus the frame-ready
//! notification.
//!
//! All lifecycle calls must come from the host's UI/event thread;
//! `gl_video_engine_frame_available` may come from any thread.
//!
//! ### 中文
//! 五个宿主生命周期事件与 frame-ready 通知的 C ABI 绑定。
//!
//! 所有生命周期调用都必须来自宿主 UI/事件线程；
//! `gl_video_engine_frame_available` 可来自任意线程。

use std::ffi::c_void;

use dpi::PhysicalSize;

use super::GlVideoEngine;
use crate::engine::rendering::SurfaceHandle;

#[unsafe(no_mangle)]
/// ### English
/// Surface became available: binds a render context to it, creates the
/// external texture on the render thread and hands the texture to the
/// producer. Blocks until the pipeline is up or has failed.
///
/// Returns `true` on success; `false` if the pipeline declined to start
/// (NULL arguments, context creation failure, or texture allocation failure).
///
/// #### Parameters
/// - `window`: Host-owned native window pointer (e.g. `ANativeWindow*`).
///
/// ### 中文
/// surface 可用：为其绑定渲染上下文，在渲染线程创建 external texture，
/// 并把纹理交给生产者。阻塞直到管线就绪或失败。
///
/// 成功返回 `true`；管线拒绝启动（NULL 参数、上下文创建失败或纹理分配失败）
/// 返回 `false`。
///
/// #### 参数
/// - `window`：宿主持有的原生 window 指针（例如 `ANativeWindow*`）。
pub unsafe extern "C" fn gl_video_engine_surface_created(
    engine: *mut GlVideoEngine,
    window: *mut c_void,
) -> bool {
    if engine.is_null() {
        return false;
    }
    let Some(surface) = SurfaceHandle::from_raw(window) else {
        return false;
    };

    unsafe { (*engine).coordinator.on_surface_created(surface).is_ok() }
}

#[unsafe(no_mangle)]
/// ### English
/// Surface dimensions changed. Zero dimensions are ignored.
///
/// ### 中文
/// surface 尺寸变化。零尺寸会被忽略。
pub unsafe extern "C" fn gl_video_engine_surface_changed(
    engine: *mut GlVideoEngine,
    width: u32,
    height: u32,
) {
    if engine.is_null() || width == 0 || height == 0 {
        return;
    }

    unsafe {
        (*engine)
            .coordinator
            .on_surface_changed(PhysicalSize::new(width, height));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Surface is about to become invalid: stops rendering synchronously and
/// releases the context, texture and producer output binding. Returns only
/// after the render thread has exited. Idempotent.
///
/// ### 中文
/// surface 即将失效：同步停止渲染并释放上下文、纹理与生产者输出绑定。
/// 仅在渲染线程退出后返回。幂等。
pub unsafe extern "C" fn gl_video_engine_surface_destroyed(engine: *mut GlVideoEngine) {
    if engine.is_null() {
        return;
    }

    unsafe { (*engine).coordinator.on_surface_destroyed() };
}

#[unsafe(no_mangle)]
/// ### English
/// App moved to the background: stops rendering but keeps the producer
/// binding so a surviving surface can restart cheaply.
///
/// ### 中文
/// 应用进入后台：停止渲染但保留生产者绑定，便于存活的 surface 低成本重启。
pub unsafe extern "C" fn gl_video_engine_app_paused(engine: *mut GlVideoEngine) {
    if engine.is_null() {
        return;
    }

    unsafe { (*engine).coordinator.on_app_paused() };
}

#[unsafe(no_mangle)]
/// ### English
/// App is being destroyed: full teardown including the producer itself.
/// Idempotent; `gl_video_engine_destroy` runs the same path again harmlessly.
///
/// ### 中文
/// 应用正在销毁：完整清理，包括生产者本身。
/// 幂等；`gl_video_engine_destroy` 会无害地再次执行同一路径。
pub unsafe extern "C" fn gl_video_engine_app_destroyed(engine: *mut GlVideoEngine) {
    if engine.is_null() {
        return;
    }

    unsafe { (*engine).coordinator.on_app_destroyed() };
}

#[unsafe(no_mangle)]
/// ### English
/// Producer notification: a new frame was published into the external
/// texture. Callable from any thread; bursts coalesce into one redraw.
///
/// ### 中文
/// 生产者通知：新帧已发布进 external texture。可从任意线程调用；
/// 连续多次通知会合并为一次重绘。
pub unsafe extern "C" fn gl_video_engine_frame_available(engine: *const GlVideoEngine) {
    if engine.is_null() {
        return;
    }

    unsafe { (*engine).coordinator.frame_available() };
}
