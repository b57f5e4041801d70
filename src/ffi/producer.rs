//! ### English
//! Host-side frame producer bound through a C function table.
//!
//! The engine never links against the host's decoder stack; the host hands in
//! entry points (plus a `user_data` cookie) and the engine calls them at the
//! producer seam.
//!
//! ### 中文
//! 通过 C 函数表接入的宿主侧帧生产者。
//!
//! 引擎不链接宿主的解码栈；宿主传入入口点（附带 `user_data` cookie），
//! 引擎在生产者接口处调用它们。

use std::ffi::c_void;

use crate::engine::FrameProducer;
use crate::engine::rendering::ExternalTextureId;

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Frame-producer entry points supplied by the host.
///
/// Contract: every function must tolerate being called from the engine's
/// render thread as well as the host's event thread, and `detach_output` /
/// `release` must be safe to call more than once.
///
/// ### 中文
/// 宿主提供的帧生产者入口点。
///
/// 约定：每个函数都必须允许从引擎渲染线程与宿主事件线程调用，
/// 且 `detach_output` / `release` 必须可安全地重复调用。
pub struct EmbedderFrameProducerApi {
    /// ### English
    /// Opaque host cookie passed back on every call.
    ///
    /// ### 中文
    /// 每次调用时原样传回的宿主 cookie。
    pub user_data: *mut c_void,
    /// ### English
    /// Binds the producer's output to the given GL texture name (e.g. wraps
    /// it in a `SurfaceTexture`).
    ///
    /// ### 中文
    /// 把生产者输出绑定到给定 GL 纹理 name（例如包装成 `SurfaceTexture`）。
    pub attach_output: unsafe extern "C" fn(user_data: *mut c_void, texture_name: u32),
    /// ### English
    /// Moves the newest published frame into the bound texture
    /// (e.g. `SurfaceTexture.updateTexImage`). Called on the render thread
    /// with the render context current.
    ///
    /// ### 中文
    /// 把最新发布的帧移入已绑定纹理（例如 `SurfaceTexture.updateTexImage`）。
    /// 在渲染线程上、渲染上下文 current 时调用。
    pub latch_frame: unsafe extern "C" fn(user_data: *mut c_void),
    /// ### English
    /// Releases resources bound to the (now invalid) texture.
    ///
    /// ### 中文
    /// 释放绑定在（已失效）纹理上的资源。
    pub detach_output: unsafe extern "C" fn(user_data: *mut c_void),
    /// ### English
    /// Final release of the producer collaborator itself.
    ///
    /// ### 中文
    /// 对生产者协作方本身的最终释放。
    pub release: unsafe extern "C" fn(user_data: *mut c_void),
}

/// ### English
/// `FrameProducer` adapter over the host table.
///
/// ### 中文
/// 基于宿主函数表的 `FrameProducer` 适配器。
pub(super) struct HostFrameProducer {
    api: EmbedderFrameProducerApi,
}

impl HostFrameProducer {
    pub(super) fn new(api: EmbedderFrameProducerApi) -> Self {
        Self { api }
    }
}

// SAFETY: the table contract requires the host entry points (and whatever
// `user_data` points at) to be callable from any thread.
unsafe impl Send for HostFrameProducer {}
unsafe impl Sync for HostFrameProducer {}

impl FrameProducer for HostFrameProducer {
    fn attach_output(&self, texture: ExternalTextureId) {
        unsafe { (self.api.attach_output)(self.api.user_data, texture.raw()) };
    }

    fn latch_frame(&self) {
        unsafe { (self.api.latch_frame)(self.api.user_data) };
    }

    fn detach_output(&self) {
        unsafe { (self.api.detach_output)(self.api.user_data) };
    }

    fn release(&self) {
        unsafe { (self.api.release)(self.api.user_data) };
    }
}
