use glow::{Context, HasContext as _};
use nalgebra::{Matrix4, Point3};

use crate::scene::{Lighting, Material, ProductModel};

/// Vertex range of one part inside the shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRange {
    pub first: i32,
    pub count: i32,
}

/// Per-frame uniforms, copied into the paint callback.
#[derive(Debug, Clone)]
pub struct FrameUniforms {
    pub view_projection: Matrix4<f32>,
    pub model: Matrix4<f32>,
    pub eye: Point3<f32>,
    pub lighting: Lighting,
    pub materials: Vec<Material>,
}

pub struct GpuMesh {
    program: glow::Program,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ranges: Vec<PartRange>,
    u_view_projection: Option<glow::UniformLocation>,
    u_model: Option<glow::UniformLocation>,
    u_eye: Option<glow::UniformLocation>,
    u_color: Option<glow::UniformLocation>,
    u_emissive: Option<glow::UniformLocation>,
    u_opacity: Option<glow::UniformLocation>,
    u_shininess: Option<glow::UniformLocation>,
    u_lit: Option<glow::UniformLocation>,
    u_ambient: Option<glow::UniformLocation>,
    u_dir_color: Option<glow::UniformLocation>,
    u_dir_from: Option<glow::UniformLocation>,
    u_point_color: Option<glow::UniformLocation>,
    u_point_pos: Option<glow::UniformLocation>,
    u_point_range: Option<glow::UniformLocation>,
}

// WebGL handles are JS objects; they only ever cross into egui's paint
// callback on the same thread.
unsafe impl Send for GpuMesh {}
unsafe impl Sync for GpuMesh {}

const VERTEX_SHADER: &str = r#"
    uniform mat4 u_view_projection;
    uniform mat4 u_model;
    layout(location = 0) in vec3 a_pos;
    layout(location = 1) in vec3 a_normal;
    out vec3 v_world;
    out vec3 v_normal;
    void main() {
        vec4 world = u_model * vec4(a_pos, 1.0);
        v_world = world.xyz;
        v_normal = mat3(u_model) * a_normal;
        gl_Position = u_view_projection * world;
    }"#;

const FRAGMENT_SHADER: &str = r#"
    uniform vec3 u_eye;
    uniform vec3 u_color;
    uniform vec3 u_emissive;
    uniform float u_opacity;
    uniform float u_shininess;
    uniform float u_lit;
    uniform vec3 u_ambient;
    uniform vec3 u_dir_color;
    uniform vec3 u_dir_from;
    uniform vec3 u_point_color;
    uniform vec3 u_point_pos;
    uniform float u_point_range;
    in vec3 v_world;
    in vec3 v_normal;
    out vec4 o_col;

    vec3 shade(vec3 light_dir, vec3 light_color, vec3 n, vec3 view_dir) {
        float diffuse = max(dot(n, light_dir), 0.0);
        vec3 half_dir = normalize(light_dir + view_dir);
        float spec = diffuse > 0.0 ? pow(max(dot(n, half_dir), 0.0), max(u_shininess, 1.0)) : 0.0;
        return light_color * (diffuse * u_color + 0.5 * spec);
    }

    void main() {
        if (u_lit < 0.5) {
            o_col = vec4(u_color, u_opacity);
            return;
        }
        vec3 n = normalize(v_normal);
        vec3 view_dir = normalize(u_eye - v_world);
        vec3 rgb = u_ambient * u_color + u_emissive;
        rgb += shade(normalize(u_dir_from), u_dir_color, n, view_dir);
        vec3 to_point = u_point_pos - v_world;
        float falloff = clamp(1.0 - length(to_point) / u_point_range, 0.0, 1.0);
        rgb += falloff * shade(normalize(to_point), u_point_color, n, view_dir);
        o_col = vec4(rgb, u_opacity);
    }"#;

fn shader_header() -> &'static str {
    if cfg!(target_arch = "wasm32") {
        "#version 300 es\nprecision mediump float;\n"
    } else {
        "#version 330\n"
    }
}

/// Flattens the model into `xyz nxnynz` vertices plus one range per part.
pub fn vertex_data(model: &ProductModel) -> (Vec<f32>, Vec<PartRange>) {
    let mut verts = Vec::new();
    let mut ranges = Vec::with_capacity(model.parts.len());
    for part in &model.parts {
        let first = (verts.len() / 6) as i32;
        for tri in &part.triangles {
            for (p, n) in tri.positions.iter().zip(&tri.normals) {
                verts.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
            }
        }
        ranges.push(PartRange {
            first,
            count: (verts.len() / 6) as i32 - first,
        });
    }
    (verts, ranges)
}

/// Part indices with opaque parts first; translucent ones keep their relative
/// order after them.
pub fn draw_order(materials: &[Material]) -> Vec<usize> {
    let (opaque, translucent): (Vec<usize>, Vec<usize>) =
        (0..materials.len()).partition(|&i| materials[i].opacity >= 1.0);
    opaque.into_iter().chain(translucent).collect()
}

impl GpuMesh {
    pub unsafe fn new(gl: &Context) -> anyhow::Result<Self> {
        let program = unsafe { compile_program(gl)? };

        let vao = unsafe { gl.create_vertex_array() }.map_err(anyhow::Error::msg)?;
        let vbo = unsafe { gl.create_buffer() }.map_err(anyhow::Error::msg)?;
        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 24, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, 24, 12);
            gl.bind_vertex_array(None);
        }

        let loc = |name: &str| unsafe { gl.get_uniform_location(program, name) };
        Ok(Self {
            program,
            vao,
            vbo,
            ranges: Vec::new(),
            u_view_projection: loc("u_view_projection"),
            u_model: loc("u_model"),
            u_eye: loc("u_eye"),
            u_color: loc("u_color"),
            u_emissive: loc("u_emissive"),
            u_opacity: loc("u_opacity"),
            u_shininess: loc("u_shininess"),
            u_lit: loc("u_lit"),
            u_ambient: loc("u_ambient"),
            u_dir_color: loc("u_dir_color"),
            u_dir_from: loc("u_dir_from"),
            u_point_color: loc("u_point_color"),
            u_point_pos: loc("u_point_pos"),
            u_point_range: loc("u_point_range"),
        })
    }

    /// The geometry never changes, so this runs once after creation.
    pub unsafe fn upload(&mut self, gl: &Context, model: &ProductModel) {
        let (verts, ranges) = vertex_data(model);
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(&verts), glow::STATIC_DRAW);
        }
        self.ranges = ranges;
    }

    pub unsafe fn paint(&self, gl: &Context, frame: &FrameUniforms) {
        let l = &frame.lighting;
        let scaled = |c: [f32; 3], k: f32| [c[0] * k, c[1] * k, c[2] * k];
        let ambient = scaled(l.ambient.color, l.ambient.intensity);
        let dir = scaled(l.directional.color, l.directional.intensity);
        let point = scaled(l.point.color, l.point.intensity);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);
            gl.clear(glow::DEPTH_BUFFER_BIT);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            gl.use_program(Some(self.program));
            gl.uniform_matrix_4_f32_slice(self.u_view_projection.as_ref(), false, frame.view_projection.as_slice());
            gl.uniform_matrix_4_f32_slice(self.u_model.as_ref(), false, frame.model.as_slice());
            gl.uniform_3_f32(self.u_eye.as_ref(), frame.eye.x, frame.eye.y, frame.eye.z);
            gl.uniform_3_f32(self.u_ambient.as_ref(), ambient[0], ambient[1], ambient[2]);
            gl.uniform_3_f32(self.u_dir_color.as_ref(), dir[0], dir[1], dir[2]);
            let [dx, dy, dz] = l.directional.position;
            gl.uniform_3_f32(self.u_dir_from.as_ref(), dx, dy, dz);
            gl.uniform_3_f32(self.u_point_color.as_ref(), point[0], point[1], point[2]);
            let [px, py, pz] = l.point.position;
            gl.uniform_3_f32(self.u_point_pos.as_ref(), px, py, pz);
            gl.uniform_1_f32(self.u_point_range.as_ref(), l.point_range);

            gl.bind_vertex_array(Some(self.vao));
            for i in draw_order(&frame.materials) {
                let (Some(range), Some(material)) = (self.ranges.get(i), frame.materials.get(i)) else {
                    continue;
                };
                gl.depth_mask(material.opacity >= 1.0);
                let [r, g, b] = material.color;
                gl.uniform_3_f32(self.u_color.as_ref(), r, g, b);
                let e = material.emissive.unwrap_or([0.0; 3]);
                let k = material.emissive_intensity;
                gl.uniform_3_f32(self.u_emissive.as_ref(), e[0] * k, e[1] * k, e[2] * k);
                gl.uniform_1_f32(self.u_opacity.as_ref(), material.opacity);
                gl.uniform_1_f32(self.u_shininess.as_ref(), material.shininess);
                gl.uniform_1_f32(self.u_lit.as_ref(), if material.is_lit() { 1.0 } else { 0.0 });
                gl.draw_arrays(glow::TRIANGLES, range.first, range.count);
            }
            gl.bind_vertex_array(None);
            gl.depth_mask(true);
            gl.disable(glow::DEPTH_TEST);
        }
    }

    pub unsafe fn destroy(&self, gl: &Context) {
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

unsafe fn compile_program(gl: &Context) -> anyhow::Result<glow::Program> {
    unsafe {
        let program = gl.create_program().map_err(anyhow::Error::msg)?;
        let mut shaders = Vec::with_capacity(2);
        for (kind, source) in [(glow::VERTEX_SHADER, VERTEX_SHADER), (glow::FRAGMENT_SHADER, FRAGMENT_SHADER)] {
            let shader = gl.create_shader(kind).map_err(anyhow::Error::msg)?;
            gl.shader_source(shader, &format!("{}{source}", shader_header()));
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                anyhow::bail!("shader compile failed: {}", gl.get_shader_info_log(shader));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            anyhow::bail!("program link failed: {}", gl.get_program_info_log(program));
        }
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
        Ok(program)
    }
}
