//! The fixed two-color tint shader (GLSL).
//!
//! Output alpha is texture alpha times light-tint alpha. Output RGB lerps
//! between the dark tint and the light-tinted texture color; the lerp factor
//! compensates for premultiplied-alpha source textures via the `u_pma`
//! uniform. The vertex stage rescales light alpha by 255/254 to undo the
//! top-bit mask applied when packing colors into float bits.

/// Combined projection * transform matrix uniform.
pub const UNIFORM_PROJ_TRANS: &str = "u_proj_trans";

/// Premultiplied-alpha flag uniform (0.0 or 1.0).
pub const UNIFORM_PMA: &str = "u_pma";

/// Texture sampler uniform, bound to unit 0.
pub const UNIFORM_TEXTURE: &str = "u_texture";

/// Vertex stage of the two-color tint shader.
pub const TWO_COLOR_VERTEX_SHADER: &str = r#"attribute vec4 a_position;
attribute vec4 a_light;
attribute vec4 a_dark;
attribute vec2 a_texCoord0;
uniform mat4 u_proj_trans;
varying vec4 v_light;
varying vec4 v_dark;
varying vec2 v_texCoords;

void main() {
    v_light = a_light;
    v_light.a = v_light.a * (255.0 / 254.0);
    v_dark = a_dark;
    v_texCoords = a_texCoord0;
    gl_Position = u_proj_trans * a_position;
}
"#;

/// Fragment stage of the two-color tint shader.
pub const TWO_COLOR_FRAGMENT_SHADER: &str = r#"#ifdef GL_ES
#define LOWP lowp
precision mediump float;
#else
#define LOWP
#endif
varying LOWP vec4 v_light;
varying LOWP vec4 v_dark;
varying vec2 v_texCoords;
uniform float u_pma;
uniform sampler2D u_texture;

void main() {
    vec4 texColor = texture2D(u_texture, v_texCoords);
    gl_FragColor.a = texColor.a * v_light.a;
    gl_FragColor.rgb = ((texColor.a - 1.0) * u_pma + 1.0 - texColor.rgb) * v_dark.rgb
        + texColor.rgb * v_light.rgb;
}
"#;
