/// Full-screen raymarching shader.
///
/// The vertex stage emits a single oversized triangle; the fragment stage
/// orbits the ray origin around the volume by `rotation` at distance `zoom`
/// and composites the marched volume over the background texture.
pub const SHADER: &str = r#"
struct Params {
    time: f32,
    zoom: f32,
    resolution: vec2<f32>,
    rotation: vec2<f32>,
    padding: vec2<f32>,
}

@group(0) @binding(0)
var<uniform> params: Params;

@group(0) @binding(1)
var background_texture: texture_2d<f32>;

@group(0) @binding(2)
var background_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
}

const VOLUME_RADIUS: f32 = 4.5;
const MAX_STEPS: i32 = 96;

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let x = f32((index << 1u) & 2u);
    let y = f32(index & 2u);
    var out: VertexOutput;
    out.position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 0.0, 1.0);
    return out;
}

fn rotate_x(p: vec3<f32>, angle: f32) -> vec3<f32> {
    let c = cos(angle);
    let s = sin(angle);
    return vec3<f32>(p.x, c * p.y - s * p.z, s * p.y + c * p.z);
}

fn rotate_y(p: vec3<f32>, angle: f32) -> vec3<f32> {
    let c = cos(angle);
    let s = sin(angle);
    return vec3<f32>(c * p.x + s * p.z, p.y, -s * p.x + c * p.z);
}

fn orbit(p: vec3<f32>) -> vec3<f32> {
    return rotate_y(rotate_x(p, params.rotation.x), params.rotation.y);
}

fn hash3(p: vec3<f32>) -> f32 {
    let q = fract(p * 0.3183099 + vec3<f32>(0.1, 0.2, 0.3)) * 17.0;
    return fract(q.x * q.y * q.z * (q.x + q.y + q.z));
}

fn value_noise(p: vec3<f32>) -> f32 {
    let cell = floor(p);
    let f = fract(p);
    let u = f * f * (vec3<f32>(3.0) - 2.0 * f);
    let n000 = hash3(cell);
    let n100 = hash3(cell + vec3<f32>(1.0, 0.0, 0.0));
    let n010 = hash3(cell + vec3<f32>(0.0, 1.0, 0.0));
    let n110 = hash3(cell + vec3<f32>(1.0, 1.0, 0.0));
    let n001 = hash3(cell + vec3<f32>(0.0, 0.0, 1.0));
    let n101 = hash3(cell + vec3<f32>(1.0, 0.0, 1.0));
    let n011 = hash3(cell + vec3<f32>(0.0, 1.0, 1.0));
    let n111 = hash3(cell + vec3<f32>(1.0, 1.0, 1.0));
    let lower = mix(mix(n000, n100, u.x), mix(n010, n110, u.x), u.y);
    let upper = mix(mix(n001, n101, u.x), mix(n011, n111, u.x), u.y);
    return mix(lower, upper, u.z);
}

fn fbm(start: vec3<f32>) -> f32 {
    var p = start;
    var amplitude = 0.5;
    var total = 0.0;
    for (var octave = 0; octave < 4; octave += 1) {
        total += amplitude * value_noise(p);
        p = p * 2.03 + vec3<f32>(1.7, 9.2, 3.1);
        amplitude *= 0.5;
    }
    return total;
}

fn density(p: vec3<f32>) -> f32 {
    let drift = vec3<f32>(0.0, params.time * 0.25, params.time * 0.1);
    let shell = 3.0 - length(p);
    let detail = fbm(p * 0.9 + drift);
    return clamp(shell * 0.5 + detail * 1.4 - 0.55, 0.0, 1.0);
}

fn sphere_span(origin: vec3<f32>, direction: vec3<f32>, radius: f32) -> vec2<f32> {
    let b = dot(origin, direction);
    let c = dot(origin, origin) - radius * radius;
    let h = b * b - c;
    if (h < 0.0) {
        return vec2<f32>(-1.0, -1.0);
    }
    let root = sqrt(h);
    return vec2<f32>(max(-b - root, 0.0), -b + root);
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let frag = input.position.xy;
    let screen_uv = frag / params.resolution;
    let background = textureSampleLevel(background_texture, background_sampler, screen_uv, 0.0).rgb;

    let centered = (frag * 2.0 - params.resolution) / params.resolution.y;
    let origin = orbit(vec3<f32>(0.0, 0.0, params.zoom));
    let direction = orbit(normalize(vec3<f32>(centered.x, -centered.y, -2.0)));

    let span = sphere_span(origin, direction, VOLUME_RADIUS);
    if (span.y <= 0.0) {
        return vec4<f32>(background, 1.0);
    }

    let step_size = (span.y - span.x) / f32(MAX_STEPS);
    var t = span.x;
    var color = vec3<f32>(0.0);
    var transmittance = 1.0;
    for (var i = 0; i < MAX_STEPS; i += 1) {
        let p = origin + direction * t;
        let d = density(p);
        if (d > 0.001) {
            let warmth = clamp(length(p) / 3.0, 0.0, 1.0);
            let emission = mix(vec3<f32>(1.0, 0.55, 0.25), vec3<f32>(0.25, 0.45, 1.0), warmth);
            let absorbed = d * step_size * 1.8;
            color += transmittance * emission * absorbed;
            transmittance *= exp(-absorbed);
            if (transmittance < 0.01) {
                break;
            }
        }
        t += step_size;
    }

    return vec4<f32>(color + background * transmittance, 1.0);
}
"#;
