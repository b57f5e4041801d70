//! ### English
//! C ABI bindings for engine creation and destruction.
//!
//! ### 中文
//! 引擎创建与销毁相关的 C ABI 绑定。

use std::sync::Arc;

use super::GlVideoEngine;
use super::producer::{EmbedderFrameProducerApi, HostFrameProducer};
use crate::engine::LifecycleCoordinator;
use crate::engine::rendering::{EmbedderEglApi, GlesBackendFactory};

#[unsafe(no_mangle)]
/// ### English
/// Creates an engine over host-supplied EGL entry points and a host frame
/// producer. No GPU work happens here; the render context is created on the
/// render thread when a surface arrives.
///
/// Both tables are copied; the pointers only need to stay valid for the
/// duration of this call. `user_data` inside the producer table must stay
/// valid until after `gl_video_engine_destroy`.
///
/// Returns NULL if either table pointer is NULL.
///
/// ### 中文
/// 基于宿主提供的 EGL 入口点与宿主帧生产者创建引擎。此处不做任何 GPU 工作；
/// 渲染上下文在 surface 到来时于渲染线程创建。
///
/// 两个函数表都会被拷贝；指针只需在本次调用期间有效。生产者表里的
/// `user_data` 必须保持有效直到 `gl_video_engine_destroy` 之后。
///
/// 任一函数表指针为 NULL 时返回 NULL。
pub unsafe extern "C" fn gl_video_engine_create(
    egl: *const EmbedderEglApi,
    producer: *const EmbedderFrameProducerApi,
) -> *mut GlVideoEngine {
    if egl.is_null() || producer.is_null() {
        return std::ptr::null_mut();
    }

    let egl = unsafe { *egl };
    let producer = unsafe { *producer };

    let coordinator = LifecycleCoordinator::new(
        Arc::new(GlesBackendFactory::new(egl)),
        Arc::new(HostFrameProducer::new(producer)),
    );

    Box::into_raw(Box::new(GlVideoEngine { coordinator }))
}

#[unsafe(no_mangle)]
/// ### English
/// Destroys an engine created by `gl_video_engine_create`.
///
/// Runs the full teardown path (stop rendering, release context and texture,
/// release the producer) before freeing the handle. Safe on NULL.
///
/// ### 中文
/// 销毁由 `gl_video_engine_create` 创建的引擎。
///
/// 释放句柄前会执行完整清理路径（停止渲染、释放上下文与纹理、释放生产者）。
/// 传入 NULL 安全。
pub unsafe extern "C" fn gl_video_engine_destroy(engine: *mut GlVideoEngine) {
    if engine.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(engine));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Returns the GL name of the external texture for the live surface
/// instance, or 0 if no pipeline is running.
///
/// ### 中文
/// 返回当前存活 surface 实例的 external texture 的 GL name；
/// 无运行中管线时返回 0。
pub unsafe extern "C" fn gl_video_engine_texture_id(engine: *const GlVideoEngine) -> u32 {
    if engine.is_null() {
        return 0;
    }

    match unsafe { (*engine).coordinator.texture_id() } {
        Some(texture) => texture.raw(),
        None => 0,
    }
}
