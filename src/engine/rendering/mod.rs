/// ### English
/// Rendering modules: EGL binding via an embedder function table, the render
/// context manager, external-texture setup, the textured-quad pipeline, and
/// the backend seam the render loop draws through.
///
/// ### 中文
/// 渲染模块：通过宿主函数表绑定 EGL、渲染上下文管理、external texture 创建、
/// 贴图四边形管线，以及渲染循环绘制所经过的 backend 接口。
mod backend;
mod context;
mod egl;
mod gles;
mod pipeline;
mod texture;

pub use backend::{RenderBackend, RenderBackendFactory};
pub use context::{RenderContextHandle, RenderContextManager};
pub use egl::EmbedderEglApi;
pub use gles::{GlesBackend, GlesBackendFactory};
pub use texture::TEXTURE_EXTERNAL_OES;

use std::ffi::c_void;
use std::num::NonZeroU32;

/// ### English
/// Opaque, externally-owned on-screen drawing target (e.g. `ANativeWindow`).
/// The engine never allocates or frees it; it only binds a context to it.
/// Stored as `usize` so it can cross into the render thread.
///
/// ### 中文
/// 不透明、由外部持有的屏幕绘制目标（例如 `ANativeWindow`）。
/// 引擎从不分配或释放它，只把上下文绑定到它。
/// 以 `usize` 保存，便于传入渲染线程。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceHandle(usize);

impl SurfaceHandle {
    /// ### English
    /// Wraps a raw native window pointer; `None` for NULL.
    ///
    /// #### Parameters
    /// - `ptr`: Host-owned native window pointer.
    ///
    /// ### 中文
    /// 包装原生 window 裸指针；NULL 时返回 `None`。
    ///
    /// #### 参数
    /// - `ptr`：宿主持有的原生 window 指针。
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(ptr as usize))
        }
    }

    /// ### English
    /// Returns the raw native window pointer.
    ///
    /// ### 中文
    /// 返回原生 window 裸指针。
    pub fn as_ptr(&self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

/// ### English
/// Identity of the externally-sampled GPU texture. The raw `u32` GL name is
/// exposed because it crosses the C ABI: the host wraps it in its image
/// source (e.g. a `SurfaceTexture`) so the decoder publishes frames into this
/// exact name.
///
/// ### 中文
/// 外部采样 GPU 纹理的标识。暴露原始 `u32` GL name 是因为它要跨越 C ABI：
/// 宿主用它构造图像源（例如 `SurfaceTexture`），解码器会把帧发布进这个 name。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalTextureId(NonZeroU32);

impl ExternalTextureId {
    /// ### English
    /// Wraps a raw GL texture name; `None` for 0.
    ///
    /// #### Parameters
    /// - `raw`: GL texture name.
    ///
    /// ### 中文
    /// 包装原始 GL 纹理 name；0 时返回 `None`。
    ///
    /// #### 参数
    /// - `raw`：GL 纹理 name。
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// ### English
    /// Wraps a glow texture handle.
    ///
    /// #### Parameters
    /// - `texture`: glow-native texture handle.
    ///
    /// ### 中文
    /// 包装 glow 纹理句柄。
    ///
    /// #### 参数
    /// - `texture`：glow 原生纹理句柄。
    pub fn from_gl(texture: glow::NativeTexture) -> Self {
        Self(texture.0)
    }

    /// ### English
    /// Returns the raw GL texture name.
    ///
    /// ### 中文
    /// 返回原始 GL 纹理 name。
    pub fn raw(&self) -> u32 {
        self.0.get()
    }

    /// ### English
    /// Converts back into a glow texture handle.
    ///
    /// ### 中文
    /// 转换回 glow 纹理句柄。
    pub fn to_gl(&self) -> glow::NativeTexture {
        glow::NativeTexture(self.0)
    }
}
