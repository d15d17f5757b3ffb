use crate::api::Gl;
use crate::binding::{current_binding, ProgramBinding};
use crate::error::{Error, GlResult};
use crate::gl;
use crate::gl::types::*;
use crate::uniform::Uniforms;
use tracing::{debug, trace};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum ShaderStage {
    Vertex = gl::VERTEX_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
    Geometry = gl::GEOMETRY_SHADER,
}

fn shader_info_log(gl: &Gl, obj: GLuint) -> String {
    let log_size = gl.get_shader_i(obj, gl::INFO_LOG_LENGTH);
    if log_size <= 0 {
        return String::new();
    }
    gl.get_shader_info_log(obj, log_size)
}

fn program_info_log(gl: &Gl, obj: GLuint) -> String {
    let log_size = gl.get_program_i(obj, gl::INFO_LOG_LENGTH);
    if log_size <= 0 {
        return String::new();
    }
    gl.get_program_info_log(obj, log_size)
}

//--------------------------------------------------------------------------------------------------

pub struct Shader {
    gl: Gl,
    id: GLuint,
}

impl_handle_type!(Shader, "shader", |gl, id| gl.delete_shader(id));

impl Shader {
    pub fn new(gl: &Gl) -> Shader {
        Shader {
            gl: gl.clone(),
            id: 0,
        }
    }

    /// Creates a shader object and sets its source. Does not compile.
    pub fn with_source(gl: &Gl, stage: ShaderStage, source: &str) -> GlResult<Shader> {
        let mut shader = Shader::new(gl);
        shader.create(stage)?;
        shader.source(source)?;
        Ok(shader)
    }

    pub fn create(&mut self, stage: ShaderStage) -> GlResult<()> {
        self.id = glcheck!(self.gl, self.gl.create_shader(stage as GLenum));
        trace!(id = self.id, kind = "shader", ?stage, "create");
        Ok(())
    }

    pub fn recreate(&mut self, stage: ShaderStage) -> GlResult<()> {
        self.remove();
        self.create(stage)
    }

    pub fn stage(&self) -> GlResult<ShaderStage> {
        let value = glcheck!(self.gl, self.gl.get_shader_i(self.id, gl::SHADER_TYPE)) as GLenum;
        match value {
            gl::VERTEX_SHADER => Ok(ShaderStage::Vertex),
            gl::FRAGMENT_SHADER => Ok(ShaderStage::Fragment),
            gl::GEOMETRY_SHADER => Ok(ShaderStage::Geometry),
            value => Err(Error::UnknownEnum {
                what: "shader type",
                value,
            }),
        }
    }

    /// Replaces the source code.
    pub fn source(&self, source: &str) -> GlResult<()> {
        glcheck!(self.gl, self.gl.shader_source(self.id, source));
        Ok(())
    }

    /// Compiles the current source. On failure, returns the compiler log.
    pub fn compile(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.compile_shader(self.id));
        let status = self.gl.get_shader_i(self.id, gl::COMPILE_STATUS);
        if status != gl::TRUE as GLint {
            let log = shader_info_log(&self.gl, self.id);
            debug!(id = self.id, %log, "shader compilation failed");
            return Err(Error::Compile(log));
        }
        Ok(())
    }

    pub fn compiled(&self) -> bool {
        self.gl.get_shader_i(self.id, gl::COMPILE_STATUS) == gl::TRUE as GLint
    }
}

//--------------------------------------------------------------------------------------------------

/// A program object that this value does not own, such as the current program.
#[derive(Clone, Debug)]
pub struct ProgramRef {
    gl: Gl,
    id: GLuint,
}

impl ProgramRef {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn use_program(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.use_program(self.id));
        Ok(())
    }
}

pub struct Program {
    gl: Gl,
    id: GLuint,
    uniforms: Uniforms,
}

impl_handle_type!(Program, "program", |gl, id| gl.delete_program(id));

impl Program {
    pub fn new(gl: &Gl) -> Program {
        Program {
            gl: gl.clone(),
            id: 0,
            uniforms: Uniforms::new(gl, 0),
        }
    }

    pub fn create(&mut self) -> GlResult<()> {
        self.id = glcheck!(self.gl, self.gl.create_program());
        self.uniforms.reset(self.id);
        trace!(id = self.id, kind = "program", "create");
        Ok(())
    }

    pub fn recreate(&mut self) -> GlResult<()> {
        self.remove();
        self.create()
    }

    /// The program currently installed in the context.
    pub fn current(gl: &Gl) -> ProgramRef {
        ProgramRef {
            gl: gl.clone(),
            id: current_binding(gl, ProgramBinding),
        }
    }

    pub fn attach(&self, shader: &Shader) -> GlResult<()> {
        glcheck!(self.gl, self.gl.attach_shader(self.id, shader.id()));
        Ok(())
    }

    pub fn attach_all(&self, shaders: &[&Shader]) -> GlResult<()> {
        for shader in shaders {
            self.attach(shader)?;
        }
        Ok(())
    }

    /// Links the attached shaders. On failure, returns the linker log.
    ///
    /// Cached uniform locations and texture unit assignments are discarded.
    pub fn link(&mut self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.link_program(self.id));
        self.uniforms.reset(self.id);
        let status = self.gl.get_program_i(self.id, gl::LINK_STATUS);
        if status != gl::TRUE as GLint {
            let log = program_info_log(&self.gl, self.id);
            debug!(id = self.id, %log, "program link failed");
            return Err(Error::Link(log));
        }
        Ok(())
    }

    /// Checks whether the program can execute in the current state. On failure, returns the
    /// validation log.
    pub fn validate(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.validate_program(self.id));
        let status = self.gl.get_program_i(self.id, gl::VALIDATE_STATUS);
        if status != gl::TRUE as GLint {
            let log = program_info_log(&self.gl, self.id);
            debug!(id = self.id, %log, "program validation failed");
            return Err(Error::Validation(log));
        }
        Ok(())
    }

    /// Links, then validates.
    pub fn make(&mut self) -> GlResult<()> {
        self.link()?;
        self.validate()
    }

    pub fn linked(&self) -> bool {
        self.gl.get_program_i(self.id, gl::LINK_STATUS) == gl::TRUE as GLint
    }

    /// Installs the program. The previous program is not restored.
    pub fn use_program(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.use_program(self.id));
        Ok(())
    }

    pub fn uniforms(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::soft::SoftGl;
    use std::rc::Rc;

    const VERTEX: &str = r"
        #version 330
        in vec3 position;
        out vec2 uv;
        void main() {
            uv = position.xy;
            gl_Position = vec4(position, 1.0);
        }
    ";

    const FRAGMENT: &str = r"
        #version 330
        in vec2 uv;
        out vec4 color;
        void main() {
            color = vec4(uv, 0.0, 1.0);
        }
    ";

    fn context() -> Gl {
        Gl::new(Rc::new(SoftGl::new(8, 8)))
    }

    fn compiled(gl: &Gl, stage: ShaderStage, source: &str) -> Shader {
        let shader = Shader::with_source(gl, stage, source).unwrap();
        shader.compile().unwrap();
        shader
    }

    #[test]
    fn test_compile_failure_reports_log() {
        let gl = context();
        let shader = Shader::with_source(&gl, ShaderStage::Vertex, "int x;").unwrap();
        match shader.compile() {
            Err(Error::Compile(log)) => assert!(!log.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!shader.compiled());
        assert_eq!(shader.stage().unwrap(), ShaderStage::Vertex);
    }

    #[test]
    fn test_make_and_use() {
        let gl = context();
        let vs = compiled(&gl, ShaderStage::Vertex, VERTEX);
        let fs = compiled(&gl, ShaderStage::Fragment, FRAGMENT);
        let mut program = Program::new(&gl);
        program.create().unwrap();
        program.attach_all(&[&vs, &fs]).unwrap();
        program.make().unwrap();
        assert!(program.linked());

        program.use_program().unwrap();
        assert_eq!(Program::current(&gl).id(), program.id());
        ProgramRef {
            gl: gl.clone(),
            id: 0,
        }
        .use_program()
        .unwrap();
        assert_eq!(Program::current(&gl).id(), 0);
    }

    #[test]
    fn test_link_without_shaders_fails() {
        let gl = context();
        let mut program = Program::new(&gl);
        program.create().unwrap();
        match program.link() {
            Err(Error::Link(log)) => assert!(!log.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
