//! ### English
//! Frame-producer collaborator seam.
//!
//! The producer (the external media decoder) writes new image content into
//! the external texture through its own update mechanism and announces
//! availability via `FrameSignal::publish`. This trait is the only surface
//! the engine needs from it.
//!
//! ### 中文
//! 帧生产者（外部媒体解码器）协作接口。
//!
//! 生产者通过自身的更新机制把新图像写入 external texture，并通过
//! `FrameSignal::publish` 宣布可用。引擎对它的全部依赖就是这个 trait。

use crate::engine::rendering::ExternalTextureId;

/// ### English
/// External frame producer bound to one external texture.
///
/// Shared between the UI/event thread (attach/detach/release) and the render
/// thread (`latch_frame`), hence `Send + Sync` with interior synchronization
/// left to the implementation.
///
/// ### 中文
/// 绑定到单个 external texture 的外部帧生产者。
///
/// 由 UI/事件线程（attach/detach/release）与渲染线程（`latch_frame`）共享，
/// 因此要求 `Send + Sync`，内部同步由实现方负责。
pub trait FrameProducer: Send + Sync {
    /// ### English
    /// Hands the producer the texture identity it must publish frames into.
    /// Called before the first frame can be published for this texture.
    ///
    /// #### Parameters
    /// - `texture`: External texture the producer binds as its output target.
    ///
    /// ### 中文
    /// 把生产者必须写入帧的纹理标识交给它。
    /// 在该纹理的第一帧发布之前调用。
    ///
    /// #### 参数
    /// - `texture`：生产者绑定为输出目标的 external texture。
    fn attach_output(&self, texture: ExternalTextureId);

    /// ### English
    /// Latches the producer's newest frame into the external texture.
    /// Render thread only, with the owning context current (the analogue of
    /// `SurfaceTexture.updateTexImage`).
    ///
    /// ### 中文
    /// 把生产者的最新帧锁存进 external texture。
    /// 只能在渲染线程、拥有该纹理的上下文 current 时调用
    /// （相当于 `SurfaceTexture.updateTexImage`）。
    fn latch_frame(&self);

    /// ### English
    /// Releases producer-held resources bound to the current output texture.
    /// Idempotent; never raises.
    ///
    /// ### 中文
    /// 释放生产者持有的、绑定到当前输出纹理的资源。幂等；永不报错。
    fn detach_output(&self);

    /// ### English
    /// Releases the producer collaborator entirely. Idempotent; never raises.
    ///
    /// ### 中文
    /// 彻底释放生产者协作方。幂等；永不报错。
    fn release(&self);
}
