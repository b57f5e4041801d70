//! ### English
//! External texture binding.
//!
//! Allocates the GL texture name the decoder publishes frames into. The
//! texture is bound as `GL_TEXTURE_EXTERNAL_OES` so a separately-produced
//! image appears as texture content without a CPU copy.
//!
//! ### 中文
//! External texture 绑定。
//!
//! 分配解码器用来发布帧的 GL 纹理 name。纹理绑定为
//! `GL_TEXTURE_EXTERNAL_OES`，使外部生产的图像无需 CPU 拷贝即可作为纹理内容。

use glow::HasContext as _;

use super::ExternalTextureId;

/// ### English
/// `GL_TEXTURE_EXTERNAL_OES`; not exported by `glow`.
///
/// ### 中文
/// `GL_TEXTURE_EXTERNAL_OES`；`glow` 未导出该常量。
pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

/// ### English
/// Allocates one external texture with linear filtering and clamp-to-edge
/// wrap on both axes. Must be called on the render thread with the owning
/// context current, before the identity is handed to the frame producer.
///
/// #### Parameters
/// - `gl`: GL API for the current context.
///
/// ### 中文
/// 分配一个 external texture，线性过滤、两轴 clamp-to-edge。
/// 必须在渲染线程、拥有纹理的上下文 current 时调用，
/// 且要在把纹理标识交给帧生产者之前完成。
///
/// #### 参数
/// - `gl`：当前上下文的 GL API。
pub fn create_external_texture(gl: &glow::Context) -> Result<ExternalTextureId, String> {
    unsafe {
        let texture = gl
            .create_texture()
            .map_err(|err| format!("glGenTextures failed: {err}"))?;
        gl.bind_texture(TEXTURE_EXTERNAL_OES, Some(texture));
        gl.tex_parameter_i32(
            TEXTURE_EXTERNAL_OES,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            TEXTURE_EXTERNAL_OES,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            TEXTURE_EXTERNAL_OES,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            TEXTURE_EXTERNAL_OES,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        Ok(ExternalTextureId::from_gl(texture))
    }
}

/// ### English
/// Deletes the texture name. The id is consumed; the owning context must
/// still be current.
///
/// #### Parameters
/// - `gl`: GL API for the current context.
/// - `texture`: Texture identity to delete.
///
/// ### 中文
/// 删除纹理 name。id 被消费；拥有它的上下文必须仍为 current。
///
/// #### 参数
/// - `gl`：当前上下文的 GL API。
/// - `texture`：要删除的纹理标识。
pub fn destroy_external_texture(gl: &glow::Context, texture: ExternalTextureId) {
    unsafe {
        gl.delete_texture(texture.to_gl());
    }
}
