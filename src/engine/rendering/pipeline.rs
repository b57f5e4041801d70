//! ### English
//! Textured-quad pipeline: the ES2 program and vertex buffer that draw one
//! full-surface quad sampling the external texture.
//!
//! ### 中文
//! 贴图四边形管线：ES2 program 与顶点缓冲，用于绘制一个采样 external texture
//! 的全屏四边形。

use glow::HasContext as _;

use super::ExternalTextureId;
use super::texture::TEXTURE_EXTERNAL_OES;

const VERTEX_SHADER_SRC: &str = r#"
attribute vec4 aPosition;
attribute vec2 aTexCoord;
varying vec2 vTexCoord;
void main() {
    gl_Position = aPosition;
    vTexCoord = aTexCoord;
}
"#;

const FRAGMENT_SHADER_SRC: &str = r#"
#extension GL_OES_EGL_image_external : require
precision mediump float;
uniform samplerExternalOES uTexture;
varying vec2 vTexCoord;
void main() {
    gl_FragColor = texture2D(uTexture, vTexCoord);
}
"#;

/// ### English
/// Interleaved x/y position + u/v texcoord, `TRIANGLE_STRIP` order.
/// The quad is letterboxed for 16:9 content (`y = ±0.5625`).
///
/// ### 中文
/// 交错的 x/y 位置 + u/v 纹理坐标，`TRIANGLE_STRIP` 顺序。
/// 四边形按 16:9 内容做了上下留黑（`y = ±0.5625`）。
const VERTICES: [f32; 16] = [
    -1.0, -0.5625, 0.0, 1.0, //
    1.0, -0.5625, 1.0, 1.0, //
    -1.0, 0.5625, 0.0, 0.0, //
    1.0, 0.5625, 1.0, 0.0, //
];

const FLOATS_PER_VERTEX: i32 = 4;

/// ### English
/// Compiled program plus the attribute/uniform locations and the static VBO.
/// Lives and dies with its render context; render-thread confined.
///
/// ### 中文
/// 已编译的 program、attribute/uniform 位置以及静态 VBO。
/// 与其渲染上下文同生共死；仅限渲染线程使用。
pub struct QuadPipeline {
    program: glow::NativeProgram,
    vbo: glow::NativeBuffer,
    a_position: u32,
    a_tex_coord: u32,
    u_texture: glow::NativeUniformLocation,
}

fn compile_shader(gl: &glow::Context, kind: u32, src: &str) -> Result<glow::NativeShader, String> {
    unsafe {
        let shader = gl
            .create_shader(kind)
            .map_err(|err| format!("glCreateShader failed: {err}"))?;
        gl.shader_source(shader, src);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let info = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(format!("shader compile failed: {info}"));
        }
        Ok(shader)
    }
}

impl QuadPipeline {
    /// ### English
    /// Compiles and links the program and uploads the quad vertices.
    /// Requires a current render context on this thread.
    ///
    /// #### Parameters
    /// - `gl`: GL API for the current context.
    ///
    /// ### 中文
    /// 编译并链接 program，上传四边形顶点。
    /// 要求本线程有 current 的渲染上下文。
    ///
    /// #### 参数
    /// - `gl`：当前上下文的 GL API。
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        unsafe {
            let vs = compile_shader(gl, glow::VERTEX_SHADER, VERTEX_SHADER_SRC)?;
            let fs = match compile_shader(gl, glow::FRAGMENT_SHADER, FRAGMENT_SHADER_SRC) {
                Ok(fs) => fs,
                Err(err) => {
                    gl.delete_shader(vs);
                    return Err(err);
                }
            };

            let program = gl
                .create_program()
                .map_err(|err| format!("glCreateProgram failed: {err}"))?;
            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            if !gl.get_program_link_status(program) {
                let info = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("program link failed: {info}"));
            }

            let a_position = gl
                .get_attrib_location(program, "aPosition")
                .ok_or_else(|| "aPosition attribute missing".to_string())?;
            let a_tex_coord = gl
                .get_attrib_location(program, "aTexCoord")
                .ok_or_else(|| "aTexCoord attribute missing".to_string())?;
            let u_texture = gl
                .get_uniform_location(program, "uTexture")
                .ok_or_else(|| "uTexture uniform missing".to_string())?;

            let vbo = gl
                .create_buffer()
                .map_err(|err| format!("glGenBuffers failed: {err}"))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            let bytes = core::slice::from_raw_parts(
                VERTICES.as_ptr().cast::<u8>(),
                size_of_val(&VERTICES),
            );
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);

            gl.clear_color(0.0, 0.0, 0.0, 1.0);

            Ok(Self {
                program,
                vbo,
                a_position,
                a_tex_coord,
                u_texture,
            })
        }
    }

    /// ### English
    /// Clears and draws one quad sampling the external texture.
    ///
    /// #### Parameters
    /// - `gl`: GL API for the current context.
    /// - `texture`: External texture holding the newest frame.
    ///
    /// ### 中文
    /// 清屏并绘制一个采样 external texture 的四边形。
    ///
    /// #### 参数
    /// - `gl`：当前上下文的 GL API。
    /// - `texture`：持有最新帧的 external texture。
    pub fn draw(&self, gl: &glow::Context, texture: ExternalTextureId) {
        unsafe {
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(TEXTURE_EXTERNAL_OES, Some(texture.to_gl()));
            gl.uniform_1_i32(Some(&self.u_texture), 0);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.enable_vertex_attrib_array(self.a_position);
            gl.enable_vertex_attrib_array(self.a_tex_coord);
            let stride = FLOATS_PER_VERTEX * size_of::<f32>() as i32;
            gl.vertex_attrib_pointer_f32(self.a_position, 2, glow::FLOAT, false, stride, 0);
            gl.vertex_attrib_pointer_f32(
                self.a_tex_coord,
                2,
                glow::FLOAT,
                false,
                stride,
                2 * size_of::<f32>() as i32,
            );

            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
        }
    }

    /// ### English
    /// Deletes the program and vertex buffer. Call before the owning context
    /// is destroyed.
    ///
    /// #### Parameters
    /// - `gl`: GL API for the current context.
    ///
    /// ### 中文
    /// 删除 program 与顶点缓冲。须在拥有它们的上下文销毁之前调用。
    ///
    /// #### 参数
    /// - `gl`：当前上下文的 GL API。
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_buffer(self.vbo);
            gl.delete_program(self.program);
        }
    }
}
