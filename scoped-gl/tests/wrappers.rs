mod common;

use glam::Vec4;
use scoped_gl::gl;
use scoped_gl::{
    current_binding, ActiveTextureUnit, AttachedObject, AttachmentPoint, Buffer, BufferAccess,
    BufferTarget, Error, Framebuffer, FramebufferTarget, Program, Renderbuffer,
    RenderbufferTarget, Shader, ShaderStage, Texture, TextureFormat, TextureTarget, UniformValue,
    VertexArray,
};

const VERTEX: &str = r"
    #version 330
    uniform mat4 transform;
    in vec3 position;
    out vec2 uv;
    void main() {
        uv = position.xy;
        gl_Position = transform * vec4(position, 1.0);
    }
";

const FRAGMENT: &str = r"
    #version 330
    uniform sampler2D albedo;
    uniform vec4 tint;
    in vec2 uv;
    out vec4 color;
    void main() {
        color = tint * texture(albedo, uv);
    }
";

const FRAGMENT_MISMATCH: &str = r"
    #version 330
    in vec3 uv;
    out vec4 color;
    void main() {
        color = vec4(uv, 1.0);
    }
";

fn compiled(gl: &scoped_gl::Gl, stage: ShaderStage, source: &str) -> Shader {
    let shader = Shader::with_source(gl, stage, source).unwrap();
    shader.compile().unwrap();
    shader
}

#[test]
fn wrapper_operations_leave_caller_bindings_alone() {
    let gl = common::context(8, 8);

    // the caller's own state
    let caller_buffer = gl.gen_buffer();
    gl.bind_buffer(gl::ARRAY_BUFFER, caller_buffer);
    let caller_texture = gl.gen_texture();
    gl.bind_texture(gl::TEXTURE_2D, caller_texture);
    let caller_renderbuffer = gl.gen_renderbuffer();
    gl.bind_renderbuffer(gl::RENDERBUFFER, caller_renderbuffer);

    let mut buffer = Buffer::new(&gl);
    buffer.create_with_data(4, Some(&[1, 2, 3, 4])).unwrap();
    buffer.sub_data(1, &[9]).unwrap();
    assert_eq!(buffer.size().unwrap(), 4);

    let mut texture = Texture::new(&gl);
    texture.create().unwrap();
    texture.config().size(4, 4).apply().unwrap();
    assert_eq!(texture.size().unwrap(), (4, 4));
    assert_eq!(texture.channel_count().unwrap(), 4);

    let mut renderbuffer = Renderbuffer::new(&gl);
    renderbuffer
        .create_with_storage(TextureFormat::Depth24Stencil8, 4, 4)
        .unwrap();
    assert_eq!(renderbuffer.width().unwrap(), 4);

    assert_eq!(current_binding(&gl, BufferTarget::Array), caller_buffer);
    assert_eq!(current_binding(&gl, TextureTarget::Texture2D), caller_texture);
    assert_eq!(current_binding(&gl, RenderbufferTarget), caller_renderbuffer);
}

#[test]
fn buffer_sub_data_changes_only_its_range() {
    let gl = common::context(4, 4);
    let mut buffer = Buffer::new(&gl);
    buffer
        .create_with_data(8, Some(&[0, 1, 2, 3, 4, 5, 6, 7]))
        .unwrap();
    buffer.sub_data(2, &[20, 30, 40]).unwrap();
    let mapping = unsafe { buffer.map(BufferAccess::Read) }.unwrap();
    assert_eq!(&mapping[..], &[0, 1, 20, 30, 40, 5, 6, 7]);
}

#[test]
fn compressed_uploads_use_block_sizes() {
    let gl = common::context(4, 4);
    let cases = [
        (TextureFormat::CompressedRgbS3tcDxt1, 8, 8, 54),
        (TextureFormat::CompressedRgbaS3tcDxt1, 8, 8, 32),
        (TextureFormat::CompressedRgbaS3tcDxt3, 4, 4, 16),
        (TextureFormat::CompressedRgbaS3tcDxt5, 5, 5, 64),
    ];
    for &(format, width, height, expected) in &cases {
        let blocks = vec![0x5au8; expected];
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture
            .config()
            .size(width, height)
            .internal_format(format)
            .pixels(&blocks)
            .apply()
            .unwrap();
        assert_eq!(texture.compressed_size().unwrap(), expected, "{:?}", format);
    }
}

#[test]
fn recreate_discards_previous_objects() {
    let (gl, soft) = common::soft_context(4, 4);

    let mut buffer = Buffer::new(&gl);
    buffer.create_with_data(4, Some(&[1, 2, 3, 4])).unwrap();
    let old_buffer = buffer.id();
    buffer.recreate().unwrap();
    assert_ne!(buffer.id(), old_buffer);
    assert!(!soft.is_buffer(old_buffer));
    assert_eq!(buffer.size().unwrap(), 0);

    let mut texture = Texture::new(&gl);
    texture.create().unwrap();
    texture.config().size(4, 4).apply().unwrap();
    let old_texture = texture.id();
    texture.recreate().unwrap();
    assert_ne!(texture.id(), old_texture);
    assert!(!soft.is_texture(old_texture));
    assert_eq!(texture.size().unwrap(), (0, 0));

    let mut framebuffer = Framebuffer::new(&gl);
    framebuffer.create().unwrap();
    let old_framebuffer = framebuffer.id();
    framebuffer.recreate().unwrap();
    assert_ne!(framebuffer.id(), old_framebuffer);
    assert!(!soft.is_framebuffer(old_framebuffer));

    let mut renderbuffer = Renderbuffer::new(&gl);
    renderbuffer
        .create_with_storage(TextureFormat::Rgba8, 4, 4)
        .unwrap();
    let old_renderbuffer = renderbuffer.id();
    renderbuffer.recreate().unwrap();
    assert_ne!(renderbuffer.id(), old_renderbuffer);
    assert!(!soft.is_renderbuffer(old_renderbuffer));
    assert_eq!(renderbuffer.width().unwrap(), 0);

    let mut vertex_array = VertexArray::new(&gl);
    vertex_array.create().unwrap();
    vertex_array.enable_for_attribute(1).unwrap();
    let old_vertex_array = vertex_array.id();
    vertex_array.recreate().unwrap();
    assert_ne!(vertex_array.id(), old_vertex_array);
    assert!(!soft.is_vertex_array(old_vertex_array));
    assert!(!vertex_array.attribute_enabled(1).unwrap());

    let mut shader = compiled(&gl, ShaderStage::Vertex, VERTEX);
    let old_shader = shader.id();
    shader.recreate(ShaderStage::Fragment).unwrap();
    assert_ne!(shader.id(), old_shader);
    assert!(!soft.is_shader(old_shader));
    assert!(!shader.compiled());
    assert_eq!(shader.stage().unwrap(), ShaderStage::Fragment);

    let vs = compiled(&gl, ShaderStage::Vertex, VERTEX);
    let fs = compiled(&gl, ShaderStage::Fragment, FRAGMENT);
    let mut program = Program::new(&gl);
    program.create().unwrap();
    program.attach_all(&[&vs, &fs]).unwrap();
    program.link().unwrap();
    let old_program = program.id();
    program.recreate().unwrap();
    assert_ne!(program.id(), old_program);
    assert!(!soft.is_program(old_program));
    assert!(!program.linked());
}

#[test]
fn channel_counts_follow_internal_format() {
    let gl = common::context(4, 4);
    let cases = [
        (TextureFormat::Rgba8, TextureFormat::Rgba, 4),
        (TextureFormat::Rgb8, TextureFormat::Rgb, 3),
        (TextureFormat::Depth24, TextureFormat::Depth, 1),
    ];
    for &(internal_format, format, channels) in &cases {
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture
            .config()
            .size(2, 2)
            .internal_format(internal_format)
            .format(format)
            .apply()
            .unwrap();
        assert_eq!(
            texture.channel_count().unwrap(),
            channels,
            "{:?}",
            internal_format
        );
    }
}

#[test]
fn link_reports_interface_mismatch() {
    let gl = common::context(4, 4);
    let vs = compiled(&gl, ShaderStage::Vertex, VERTEX);
    let bad = compiled(&gl, ShaderStage::Fragment, FRAGMENT_MISMATCH);

    let mut program = Program::new(&gl);
    program.create().unwrap();
    program.attach_all(&[&vs, &bad]).unwrap();
    match program.link() {
        Err(Error::Link(log)) => assert!(log.contains("uv"), "{}", log),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!program.linked());

    let fs = compiled(&gl, ShaderStage::Fragment, FRAGMENT);
    let mut program = Program::new(&gl);
    program.create().unwrap();
    program.attach_all(&[&vs, &fs]).unwrap();
    program.make().unwrap();
    assert!(program.linked());
}

#[test]
fn texture_level_attaches_to_color_attachment() {
    let gl = common::context(4, 4);
    let mut texture = Texture::new(&gl);
    texture.create().unwrap();
    texture.config().size(16, 16).apply().unwrap();
    texture.config().size(4, 4).level(2).apply().unwrap();

    let mut framebuffer = Framebuffer::new(&gl);
    framebuffer.create().unwrap();
    framebuffer
        .attach(AttachmentPoint::Color(1), texture.with_level(2))
        .unwrap();

    assert_eq!(
        framebuffer.attachment(AttachmentPoint::Color(1)).unwrap(),
        AttachedObject::Texture {
            id: texture.id(),
            level: 2
        }
    );
    assert_eq!(
        framebuffer.attachment(AttachmentPoint::Color(0)).unwrap(),
        AttachedObject::None
    );
    framebuffer.check().unwrap();
    assert_eq!(current_binding(&gl, FramebufferTarget::Read), framebuffer.id());
}

#[test]
fn uniforms_are_cached_and_samplers_get_units() {
    let (gl, soft) = common::soft_context(4, 4);
    let vs = compiled(&gl, ShaderStage::Vertex, VERTEX);
    let fs = compiled(&gl, ShaderStage::Fragment, FRAGMENT);
    let mut program = Program::new(&gl);
    program.create().unwrap();
    program.attach_all(&[&vs, &fs]).unwrap();
    program.make().unwrap();

    let mut texture = Texture::new(&gl);
    texture.create().unwrap();
    texture.config().size(2, 2).apply().unwrap();

    let id = program.id();
    let uniforms = program.uniforms();
    let tint = uniforms.location("tint").unwrap();
    assert!(tint >= 0);
    assert_eq!(uniforms.location("missing").unwrap(), -1);
    uniforms.set("tint", Vec4::new(0.5, 0.25, 1.0, 1.0)).unwrap();
    // inactive uniforms are ignored
    uniforms.set("missing", 1.0f32).unwrap();

    assert_eq!(uniforms.texture("albedo", &texture).unwrap(), 0);
    assert_eq!(uniforms.texture("albedo", &texture).unwrap(), 0);
    assert_eq!(uniforms.texture_unit("albedo"), Some(0));

    let albedo = uniforms.location("albedo").unwrap();
    assert_eq!(
        soft.uniform(id, tint),
        Some(UniformValue::Vec4(Vec4::new(0.5, 0.25, 1.0, 1.0)))
    );
    assert_eq!(soft.uniform(id, albedo), Some(UniformValue::Int(0)));
    assert_eq!(current_binding(&gl, TextureTarget::Texture2D), texture.id());
}

#[test]
fn texture_unit_past_enum_range_is_rejected() {
    let gl = common::context(4, 4);
    let vs = compiled(&gl, ShaderStage::Vertex, VERTEX);
    let fs = compiled(&gl, ShaderStage::Fragment, FRAGMENT);
    let mut program = Program::new(&gl);
    program.create().unwrap();
    program.attach_all(&[&vs, &fs]).unwrap();
    program.make().unwrap();

    let mut texture = Texture::new(&gl);
    texture.create().unwrap();

    let result = program
        .uniforms()
        .texture_at_unit("albedo", u32::MAX, &texture);
    if cfg!(debug_assertions) {
        assert!(result.unwrap_err().driver_error().is_some());
        assert_eq!(program.uniforms().texture_unit("albedo"), None);
        assert_eq!(current_binding(&gl, ActiveTextureUnit), gl::TEXTURE0);
    }
}
