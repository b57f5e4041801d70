//! ### English
//! Render context manager: owns the EGL display/context and its binding to
//! the on-screen surface. Exactly one live context per surface instance.
//!
//! All calls must happen on the render thread; the handle is deliberately not
//! `Send` once attached (raw EGL handles inside).
//!
//! ### 中文
//! 渲染上下文管理器：持有 EGL display/context 及其与屏幕 surface 的绑定。
//! 每个 surface 实例只允许一个存活的上下文。
//!
//! 所有调用必须发生在渲染线程；attach 之后的句柄刻意不做 `Send`
//! （内部是 EGL 裸句柄）。

use std::ffi::CString;
use std::ptr;

use log::debug;

use super::SurfaceHandle;
use super::egl::{
    CONFIG_ATTRIBS, CONTEXT_ATTRIBS, EGL_TRUE, EglConfig, EglContext, EglDisplay, EglSurface,
    EmbedderEglApi,
};

/// ### English
/// One EGL context bound to one window surface. `detach` is idempotent: the
/// `bound` flag guards against the two independent teardown edges (surface
/// destroyed and app destroyed) both releasing it.
///
/// ### 中文
/// 绑定到单个 window surface 的 EGL 上下文。`detach` 幂等：`bound` 标记用于
/// 防止两条相互独立的清理路径（surface 销毁与 app 销毁）重复释放。
pub struct RenderContextHandle {
    display: EglDisplay,
    surface: EglSurface,
    context: EglContext,
    bound: bool,
}

impl RenderContextHandle {
    /// ### English
    /// Whether the context is still bound to its surface.
    ///
    /// ### 中文
    /// 上下文是否仍绑定在其 surface 上。
    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

/// ### English
/// Creates and destroys render contexts through the embedder EGL table.
///
/// ### 中文
/// 通过宿主 EGL 函数表创建与销毁渲染上下文。
pub struct RenderContextManager {
    api: EmbedderEglApi,
}

impl RenderContextManager {
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

    /// ### English
    /// Creates an ES2 context compatible with the surface's RGB888 format,
    /// binds it to the surface and makes it current on the calling thread.
    ///
    /// Failure is terminal for this surface instance; the caller reports it
    /// upward instead of retrying.
    ///
    /// #### Parameters
    /// - `surface`: Host-owned native window to bind.
    ///
    /// ### 中文
    /// 创建与 surface RGB888 格式兼容的 ES2 上下文，绑定到该 surface，
    /// 并在调用线程上置为 current。
    ///
    /// 失败对当前 surface 实例是终结性的；调用方向上报告而不是重试。
    ///
    /// #### 参数
    /// - `surface`：宿主持有、需要绑定的原生 window。
    pub fn attach(&self, surface: &SurfaceHandle) -> Result<RenderContextHandle, String> {
        unsafe {
            let display = (self.api.get_display)(ptr::null_mut());
            if display.is_null() {
                return Err("eglGetDisplay returned no display".to_string());
            }
            if (self.api.initialize)(display, ptr::null_mut(), ptr::null_mut()) != EGL_TRUE {
                return Err("eglInitialize failed".to_string());
            }

            let mut config: EglConfig = ptr::null_mut();
            let mut num_configs: i32 = 0;
            if (self.api.choose_config)(
                display,
                CONFIG_ATTRIBS.as_ptr(),
                &mut config,
                1,
                &mut num_configs,
            ) != EGL_TRUE
                || num_configs < 1
            {
                (self.api.terminate)(display);
                return Err("eglChooseConfig found no RGB888/ES2 config".to_string());
            }

            let context =
                (self.api.create_context)(display, config, ptr::null_mut(), CONTEXT_ATTRIBS.as_ptr());
            if context.is_null() {
                (self.api.terminate)(display);
                return Err("eglCreateContext failed".to_string());
            }

            let egl_surface =
                (self.api.create_window_surface)(display, config, surface.as_ptr(), ptr::null());
            if egl_surface.is_null() {
                (self.api.destroy_context)(display, context);
                (self.api.terminate)(display);
                return Err("eglCreateWindowSurface failed for this window".to_string());
            }

            if (self.api.make_current)(display, egl_surface, egl_surface, context) != EGL_TRUE {
                (self.api.destroy_surface)(display, egl_surface);
                (self.api.destroy_context)(display, context);
                (self.api.terminate)(display);
                return Err("eglMakeCurrent failed".to_string());
            }

            debug!("render context attached");
            Ok(RenderContextHandle {
                display,
                surface: egl_surface,
                context,
                bound: true,
            })
        }
    }

    /// ### English
    /// Releases the context and unbinds from the surface. A second `detach`
    /// on an already-detached handle is a no-op, not an error.
    ///
    /// #### Parameters
    /// - `handle`: Context handle to release.
    ///
    /// ### 中文
    /// 释放上下文并与 surface 解绑。对已 detach 的句柄再次 `detach`
    /// 是 no-op，不是错误。
    ///
    /// #### 参数
    /// - `handle`：要释放的上下文句柄。
    pub fn detach(&self, handle: &mut RenderContextHandle) {
        if !handle.bound {
            return;
        }
        handle.bound = false;

        unsafe {
            (self.api.make_current)(
                handle.display,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            (self.api.destroy_surface)(handle.display, handle.surface);
            (self.api.destroy_context)(handle.display, handle.context);
            (self.api.terminate)(handle.display);
        }
        debug!("render context detached");
    }

    /// ### English
    /// Presents the back buffer. Returns `false` on failure (e.g. the window
    /// went away under us).
    ///
    /// #### Parameters
    /// - `handle`: Bound context handle.
    ///
    /// ### 中文
    /// 呈现后备缓冲。失败（例如 window 已失效）时返回 `false`。
    ///
    /// #### 参数
    /// - `handle`：已绑定的上下文句柄。
    pub fn swap_buffers(&self, handle: &RenderContextHandle) -> bool {
        if !handle.bound {
            return false;
        }
        unsafe { (self.api.swap_buffers)(handle.display, handle.surface) == EGL_TRUE }
    }

    /// ### English
    /// Loads the GL API for the current context via `eglGetProcAddress`.
    /// Must be called with a context current on this thread.
    ///
    /// ### 中文
    /// 通过 `eglGetProcAddress` 为当前上下文加载 GL API。
    /// 必须在本线程有 current 上下文时调用。
    pub fn load_gl(&self) -> glow::Context {
        unsafe {
            glow::Context::from_loader_function(|name| match CString::new(name) {
                Ok(name) => (self.api.get_proc_address)(name.as_ptr()),
                Err(_) => ptr::null(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_char, c_void};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::super::SurfaceHandle;
    use super::super::egl::{EGL_TRUE, EglConfig, EglContext, EglDisplay, EglSurface, EmbedderEglApi};
    use super::RenderContextManager;

    // Serializes the tests that reset the shared stub counters.
    static COUNTER_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    static DESTROY_SURFACE_CALLS: AtomicUsize = AtomicUsize::new(0);
    static DESTROY_CONTEXT_CALLS: AtomicUsize = AtomicUsize::new(0);
    static TERMINATE_CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn get_display(_native: *mut c_void) -> EglDisplay {
        0x10 as EglDisplay
    }
    unsafe extern "C" fn initialize(_d: EglDisplay, _major: *mut i32, _minor: *mut i32) -> u32 {
        EGL_TRUE
    }
    unsafe extern "C" fn choose_config(
        _d: EglDisplay,
        _attribs: *const i32,
        configs: *mut EglConfig,
        _max: i32,
        num: *mut i32,
    ) -> u32 {
        unsafe {
            *configs = 0x20 as EglConfig;
            *num = 1;
        }
        EGL_TRUE
    }
    unsafe extern "C" fn create_context(
        _d: EglDisplay,
        _c: EglConfig,
        _share: EglContext,
        _attribs: *const i32,
    ) -> EglContext {
        0x30 as EglContext
    }
    unsafe extern "C" fn create_window_surface(
        _d: EglDisplay,
        _c: EglConfig,
        _window: *mut c_void,
        _attribs: *const i32,
    ) -> EglSurface {
        0x40 as EglSurface
    }
    unsafe extern "C" fn make_current(
        _d: EglDisplay,
        _draw: EglSurface,
        _read: EglSurface,
        _c: EglContext,
    ) -> u32 {
        EGL_TRUE
    }
    unsafe extern "C" fn swap_buffers(_d: EglDisplay, _s: EglSurface) -> u32 {
        EGL_TRUE
    }
    unsafe extern "C" fn destroy_surface(_d: EglDisplay, _s: EglSurface) -> u32 {
        DESTROY_SURFACE_CALLS.fetch_add(1, Ordering::SeqCst);
        EGL_TRUE
    }
    unsafe extern "C" fn destroy_context(_d: EglDisplay, _c: EglContext) -> u32 {
        DESTROY_CONTEXT_CALLS.fetch_add(1, Ordering::SeqCst);
        EGL_TRUE
    }
    unsafe extern "C" fn terminate(_d: EglDisplay) -> u32 {
        TERMINATE_CALLS.fetch_add(1, Ordering::SeqCst);
        EGL_TRUE
    }
    unsafe extern "C" fn get_proc_address(_name: *const c_char) -> *const c_void {
        std::ptr::null()
    }
    unsafe extern "C" fn create_window_surface_failing(
        _d: EglDisplay,
        _c: EglConfig,
        _window: *mut c_void,
        _attribs: *const i32,
    ) -> EglSurface {
        std::ptr::null_mut()
    }

    fn stub_api() -> EmbedderEglApi {
        EmbedderEglApi {
            get_display,
            initialize,
            choose_config,
            create_context,
            create_window_surface,
            make_current,
            swap_buffers,
            destroy_surface,
            destroy_context,
            terminate,
            get_proc_address,
        }
    }

    fn stub_surface() -> SurfaceHandle {
        SurfaceHandle::from_raw(0x1000 as *mut c_void).unwrap()
    }

    #[test]
    fn attach_then_detach_releases_everything_once() {
        let _guard = COUNTER_LOCK.lock().unwrap();
        DESTROY_SURFACE_CALLS.store(0, Ordering::SeqCst);
        DESTROY_CONTEXT_CALLS.store(0, Ordering::SeqCst);
        TERMINATE_CALLS.store(0, Ordering::SeqCst);

        let manager = RenderContextManager::new(stub_api());
        let mut handle = manager.attach(&stub_surface()).unwrap();
        assert!(handle.is_bound());
        assert!(manager.swap_buffers(&handle));

        manager.detach(&mut handle);
        assert!(!handle.is_bound());
        assert_eq!(DESTROY_SURFACE_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(DESTROY_CONTEXT_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(TERMINATE_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_detach_is_a_no_op() {
        let _guard = COUNTER_LOCK.lock().unwrap();
        DESTROY_SURFACE_CALLS.store(0, Ordering::SeqCst);
        DESTROY_CONTEXT_CALLS.store(0, Ordering::SeqCst);
        TERMINATE_CALLS.store(0, Ordering::SeqCst);

        let manager = RenderContextManager::new(stub_api());
        let mut handle = manager.attach(&stub_surface()).unwrap();
        manager.detach(&mut handle);
        manager.detach(&mut handle);

        assert_eq!(DESTROY_SURFACE_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(DESTROY_CONTEXT_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(TERMINATE_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn swap_on_detached_handle_fails_without_egl_calls() {
        let manager = RenderContextManager::new(stub_api());
        let mut handle = manager.attach(&stub_surface()).unwrap();
        manager.detach(&mut handle);
        assert!(!manager.swap_buffers(&handle));
    }

    #[test]
    fn surface_creation_failure_cleans_up_context() {
        let _guard = COUNTER_LOCK.lock().unwrap();
        DESTROY_CONTEXT_CALLS.store(0, Ordering::SeqCst);
        TERMINATE_CALLS.store(0, Ordering::SeqCst);

        let mut api = stub_api();
        api.create_window_surface = create_window_surface_failing;
        let manager = RenderContextManager::new(api);

        assert!(manager.attach(&stub_surface()).is_err());
        assert_eq!(DESTROY_CONTEXT_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(TERMINATE_CALLS.load(Ordering::SeqCst), 1);
    }
}
