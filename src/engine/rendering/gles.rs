//! ### English
//! Production `RenderBackend`: EGL context via the embedder table, GL calls
//! via `glow`, quad drawing via `QuadPipeline`.
//!
//! ### 中文
//! 生产环境 `RenderBackend`：通过宿主函数表使用 EGL 上下文，通过 `glow`
//! 调 GL，通过 `QuadPipeline` 绘制四边形。

use dpi::PhysicalSize;
use glow::HasContext as _;
use log::warn;

use crate::engine::error::RenderError;

use super::backend::{RenderBackend, RenderBackendFactory};
use super::context::{RenderContextHandle, RenderContextManager};
use super::egl::EmbedderEglApi;
use super::pipeline::QuadPipeline;
use super::{ExternalTextureId, SurfaceHandle, texture};

/// ### English
/// Everything that only exists while a context is attached.
///
/// ### 中文
/// 仅在上下文 attach 期间存在的状态。
struct Attached {
    handle: RenderContextHandle,
    gl: glow::Context,
    pipeline: QuadPipeline,
}

/// ### English
/// GLES implementation of the backend seam. Render-thread confined.
///
/// ### 中文
/// backend 接口的 GLES 实现。仅限渲染线程。
pub struct GlesBackend {
    manager: RenderContextManager,
    attached: Option<Attached>,
    viewport: Option<PhysicalSize<u32>>,
}

impl GlesBackend {
    /// ### English
    /// Creates a detached backend over the embedder EGL table.
    ///
    /// #### Parameters
    /// - `api`: EGL entry points supplied by the host.
    ///
    /// ### 中文
    /// 基于宿主 EGL 函数表创建一个未 attach 的 backend。
    ///
    /// #### 参数
    /// - `api`：宿主提供的 EGL 入口点。
    pub fn new(api: EmbedderEglApi) -> Self {
        Self {
            manager: RenderContextManager::new(api),
            attached: None,
            viewport: None,
        }
    }

    fn apply_viewport(&self) {
        let (Some(attached), Some(size)) = (self.attached.as_ref(), self.viewport) else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }
        unsafe {
            attached
                .gl
                .viewport(0, 0, size.width as i32, size.height as i32);
        }
    }
}

impl RenderBackend for GlesBackend {
    fn attach(&mut self, surface: &SurfaceHandle) -> Result<(), RenderError> {
        // One live context per surface instance.
        self.detach();

        let handle = self
            .manager
            .attach(surface)
            .map_err(RenderError::ContextCreation)?;
        let gl = self.manager.load_gl();
        let pipeline = match QuadPipeline::new(&gl) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                let mut handle = handle;
                self.manager.detach(&mut handle);
                return Err(RenderError::ContextCreation(err));
            }
        };

        self.attached = Some(Attached {
            handle,
            gl,
            pipeline,
        });
        self.apply_viewport();
        Ok(())
    }

    fn detach(&mut self) {
        let Some(mut attached) = self.attached.take() else {
            return;
        };
        attached.pipeline.destroy(&attached.gl);
        self.manager.detach(&mut attached.handle);
    }

    fn create_external_texture(&mut self) -> Result<ExternalTextureId, RenderError> {
        let Some(attached) = self.attached.as_ref() else {
            return Err(RenderError::Allocation(
                "no render context is current".to_string(),
            ));
        };
        texture::create_external_texture(&attached.gl).map_err(RenderError::Allocation)
    }

    fn destroy_external_texture(&mut self, texture_id: ExternalTextureId) {
        let Some(attached) = self.attached.as_ref() else {
            warn!("destroy_external_texture without a context; texture died with it");
            return;
        };
        texture::destroy_external_texture(&attached.gl, texture_id);
    }

    fn set_viewport(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.viewport = Some(size);
        self.apply_viewport();
    }

    fn draw(&mut self, texture_id: ExternalTextureId) -> Result<(), RenderError> {
        let Some(attached) = self.attached.as_ref() else {
            return Err(RenderError::Draw("draw without a context".to_string()));
        };
        attached.pipeline.draw(&attached.gl, texture_id);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let Some(attached) = self.attached.as_ref() else {
            return Err(RenderError::Draw("present without a context".to_string()));
        };
        if !self.manager.swap_buffers(&attached.handle) {
            return Err(RenderError::Draw("eglSwapBuffers failed".to_string()));
        }
        Ok(())
    }
}

impl Drop for GlesBackend {
    /// ### English
    /// Ensures the context is released even on an abnormal loop exit.
    ///
    /// ### 中文
    /// 即使渲染循环异常退出也确保释放上下文。
    fn drop(&mut self) {
        self.detach();
    }
}

/// ### English
/// Factory handed to the render loop; carries only the (Copy) EGL table.
///
/// ### 中文
/// 交给渲染循环的工厂；只携带（Copy 的）EGL 函数表。
pub struct GlesBackendFactory {
    api: EmbedderEglApi,
}

impl GlesBackendFactory {
    /// ### English
    /// Wraps an embedder EGL table.
    ///
    /// #### Parameters
    /// - `api`: EGL entry points supplied by the host.
    ///
    /// ### 中文
    /// 包装宿主 EGL 函数表。
    ///
    /// #### 参数
    /// - `api`：宿主提供的 EGL 入口点。
    pub fn new(api: EmbedderEglApi) -> Self {
        Self { api }
    }
}

impl RenderBackendFactory for GlesBackendFactory {
    fn create(&self) -> Box<dyn RenderBackend> {
        Box::new(GlesBackend::new(self.api))
    }
}
