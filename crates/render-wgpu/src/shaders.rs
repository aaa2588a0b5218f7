/// WGSL shader for every primitive topology.
///
/// Vertices arrive already in clip space; the model, view and projection
/// transforms are applied on the CPU when a batch is submitted.
pub const COLORED_SHADER: &str = r#"
struct ColoredVertex {
    @location(0) clip_position: vec4<f32>,
    @location(1) color: vec4<f32>,
};

struct ColoredOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_colored(vertex: ColoredVertex) -> ColoredOutput {
    var out: ColoredOutput;
    out.clip_position = vertex.clip_position;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_colored(in: ColoredOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
