//! ### English
//! Backend seam between the render loop and the GPU.
//!
//! The loop only ever talks to a `RenderBackend`; production uses the GLES
//! implementation, tests use an instrumented one that records every call.
//! Backends are constructed on the render thread via a factory, so GL state
//! never has to be `Send`.
//!
//! ### 中文
//! 渲染循环与 GPU 之间的 backend 接口。
//!
//! 循环只与 `RenderBackend` 交互；生产环境用 GLES 实现，测试用记录所有调用的
//! 插桩实现。backend 通过工厂在渲染线程上构造，因此 GL 状态无需 `Send`。

use dpi::PhysicalSize;

use crate::engine::error::RenderError;

use super::{ExternalTextureId, SurfaceHandle};

/// ### English
/// GPU operations the render loop needs. All methods are render-thread only;
/// every GPU call happens between a successful `attach` and the matching
/// `detach`.
///
/// ### 中文
/// 渲染循环需要的 GPU 操作。所有方法仅限渲染线程；每个 GPU 调用都发生在成功的
/// `attach` 与对应的 `detach` 之间。
pub trait RenderBackend {
    /// ### English
    /// Creates the render context for the surface and makes it current.
    ///
    /// #### Parameters
    /// - `surface`: Host-owned drawing target.
    ///
    /// ### 中文
    /// 为 surface 创建渲染上下文并置为 current。
    ///
    /// #### 参数
    /// - `surface`：宿主持有的绘制目标。
    fn attach(&mut self, surface: &SurfaceHandle) -> Result<(), RenderError>;

    /// ### English
    /// Releases the context and everything owned by it. Idempotent; never
    /// raises.
    ///
    /// ### 中文
    /// 释放上下文及其拥有的一切。幂等；永不报错。
    fn detach(&mut self);

    /// ### English
    /// Allocates the externally-sampled texture (requires an attached
    /// context).
    ///
    /// ### 中文
    /// 分配外部采样纹理（要求已 attach 的上下文）。
    fn create_external_texture(&mut self) -> Result<ExternalTextureId, RenderError>;

    /// ### English
    /// Releases the external texture. Never raises.
    ///
    /// #### Parameters
    /// - `texture`: Texture identity to release.
    ///
    /// ### 中文
    /// 释放 external texture。永不报错。
    ///
    /// #### 参数
    /// - `texture`：要释放的纹理标识。
    fn destroy_external_texture(&mut self, texture: ExternalTextureId);

    /// ### English
    /// Records the viewport to render into. Zero-sized values are ignored
    /// (the context keeps its surface-sized default).
    ///
    /// #### Parameters
    /// - `size`: Viewport size in physical pixels.
    ///
    /// ### 中文
    /// 记录渲染视口。为零的尺寸会被忽略（上下文保持默认的 surface 大小视口）。
    ///
    /// #### 参数
    /// - `size`：以物理像素计的视口尺寸。
    fn set_viewport(&mut self, size: PhysicalSize<u32>);

    /// ### English
    /// Draws one full-surface quad sampling the external texture.
    ///
    /// #### Parameters
    /// - `texture`: External texture holding the newest frame.
    ///
    /// ### 中文
    /// 绘制一个采样 external texture 的全屏四边形。
    ///
    /// #### 参数
    /// - `texture`：持有最新帧的 external texture。
    fn draw(&mut self, texture: ExternalTextureId) -> Result<(), RenderError>;

    /// ### English
    /// Presents the drawn frame to the surface.
    ///
    /// ### 中文
    /// 将已绘制的帧呈现到 surface。
    fn present(&mut self) -> Result<(), RenderError>;
}

/// ### English
/// Constructs backends on the render thread. The factory crosses threads;
/// the backend it creates never does.
///
/// ### 中文
/// 在渲染线程上构造 backend。工厂本身跨线程；它创建的 backend 永不跨线程。
pub trait RenderBackendFactory: Send + Sync {
    /// ### English
    /// Creates one backend instance. Called once per render-loop start, on
    /// the freshly spawned render thread.
    ///
    /// ### 中文
    /// 创建一个 backend 实例。每次渲染循环启动时在新建的渲染线程上调用一次。
    fn create(&self) -> Box<dyn RenderBackend>;
}
