//! ### English
//! Minimal EGL binding through an embedder-provided function table.
//!
//! The host (the JNI shim that loads this library) fills an `EmbedderEglApi`
//! with the EGL entry points it already links against, so this crate carries
//! no link-time EGL dependency and builds on any platform. Only the calls the
//! pipeline needs are present.
//!
//! ### 中文
//! 通过宿主提供的函数表实现的最小 EGL 绑定。
//!
//! 宿主（加载本库的 JNI 垫层）把它已链接的 EGL 入口点填进 `EmbedderEglApi`，
//! 因此本 crate 不携带链接期 EGL 依赖，可在任意平台构建。
//! 只包含管线需要的调用。

use std::ffi::{c_char, c_void};

/// ### English
/// Opaque EGL display handle.
///
/// ### 中文
/// 不透明 EGL display 句柄。
pub type EglDisplay = *mut c_void;
/// ### English
/// Opaque EGL config handle.
///
/// ### 中文
/// 不透明 EGL config 句柄。
pub type EglConfig = *mut c_void;
/// ### English
/// Opaque EGL context handle.
///
/// ### 中文
/// 不透明 EGL context 句柄。
pub type EglContext = *mut c_void;
/// ### English
/// Opaque EGL surface handle.
///
/// ### 中文
/// 不透明 EGL surface 句柄。
pub type EglSurface = *mut c_void;

pub const EGL_TRUE: u32 = 1;
pub const EGL_NONE: i32 = 0x3038;
pub const EGL_RED_SIZE: i32 = 0x3024;
pub const EGL_GREEN_SIZE: i32 = 0x3023;
pub const EGL_BLUE_SIZE: i32 = 0x3022;
pub const EGL_RENDERABLE_TYPE: i32 = 0x3040;
pub const EGL_OPENGL_ES2_BIT: i32 = 0x0004;
pub const EGL_CONTEXT_CLIENT_VERSION: i32 = 0x3098;

/// ### English
/// Config attribute list for an RGB888 / OpenGL ES 2 window surface.
///
/// ### 中文
/// RGB888 / OpenGL ES 2 window surface 的 config 属性列表。
pub const CONFIG_ATTRIBS: [i32; 9] = [
    EGL_RENDERABLE_TYPE,
    EGL_OPENGL_ES2_BIT,
    EGL_RED_SIZE,
    8,
    EGL_GREEN_SIZE,
    8,
    EGL_BLUE_SIZE,
    8,
    EGL_NONE,
];

/// ### English
/// Context attribute list requesting an ES 2 client context.
///
/// ### 中文
/// 请求 ES 2 client context 的属性列表。
pub const CONTEXT_ATTRIBS: [i32; 3] = [EGL_CONTEXT_CLIENT_VERSION, 2, EGL_NONE];

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// EGL entry points supplied by the embedder. Every pointer must be non-NULL
/// and remain valid for the lifetime of the engine; all fields follow the
/// standard EGL signatures.
///
/// ### 中文
/// 由宿主提供的 EGL 入口点。每个指针必须非 NULL 且在引擎生命周期内有效；
/// 所有字段遵循标准 EGL 签名。
pub struct EmbedderEglApi {
    /// ### English
    /// `eglGetDisplay`; pass NULL for `EGL_DEFAULT_DISPLAY`.
    ///
    /// ### 中文
    /// `eglGetDisplay`；NULL 表示 `EGL_DEFAULT_DISPLAY`。
    pub get_display: unsafe extern "C" fn(native_display: *mut c_void) -> EglDisplay,
    /// ### English
    /// `eglInitialize`.
    ///
    /// ### 中文
    /// `eglInitialize`。
    pub initialize: unsafe extern "C" fn(EglDisplay, *mut i32, *mut i32) -> u32,
    /// ### English
    /// `eglChooseConfig`.
    ///
    /// ### 中文
    /// `eglChooseConfig`。
    pub choose_config:
        unsafe extern "C" fn(EglDisplay, *const i32, *mut EglConfig, i32, *mut i32) -> u32,
    /// ### English
    /// `eglCreateContext`.
    ///
    /// ### 中文
    /// `eglCreateContext`。
    pub create_context:
        unsafe extern "C" fn(EglDisplay, EglConfig, EglContext, *const i32) -> EglContext,
    /// ### English
    /// `eglCreateWindowSurface` (native window as raw pointer).
    ///
    /// ### 中文
    /// `eglCreateWindowSurface`（原生 window 以裸指针传入）。
    pub create_window_surface:
        unsafe extern "C" fn(EglDisplay, EglConfig, *mut c_void, *const i32) -> EglSurface,
    /// ### English
    /// `eglMakeCurrent`.
    ///
    /// ### 中文
    /// `eglMakeCurrent`。
    pub make_current: unsafe extern "C" fn(EglDisplay, EglSurface, EglSurface, EglContext) -> u32,
    /// ### English
    /// `eglSwapBuffers`.
    ///
    /// ### 中文
    /// `eglSwapBuffers`。
    pub swap_buffers: unsafe extern "C" fn(EglDisplay, EglSurface) -> u32,
    /// ### English
    /// `eglDestroySurface`.
    ///
    /// ### 中文
    /// `eglDestroySurface`。
    pub destroy_surface: unsafe extern "C" fn(EglDisplay, EglSurface) -> u32,
    /// ### English
    /// `eglDestroyContext`.
    ///
    /// ### 中文
    /// `eglDestroyContext`。
    pub destroy_context: unsafe extern "C" fn(EglDisplay, EglContext) -> u32,
    /// ### English
    /// `eglTerminate`.
    ///
    /// ### 中文
    /// `eglTerminate`。
    pub terminate: unsafe extern "C" fn(EglDisplay) -> u32,
    /// ### English
    /// `eglGetProcAddress`; used to load the GL API for the current context.
    ///
    /// ### 中文
    /// `eglGetProcAddress`；用于为当前上下文加载 GL API。
    pub get_proc_address: unsafe extern "C" fn(*const c_char) -> *const c_void,
}
