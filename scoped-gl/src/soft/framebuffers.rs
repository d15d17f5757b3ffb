//! Renderbuffers, framebuffer objects and the operations that read or write framebuffer images.
use super::pixels::{PixelFormat, StorageClass, Texel};
use super::state::{
    ensure, fail, size_arg, Attachment, Failure, FramebufferObject, Level, RenderbufferObject,
    SoftResult, State,
};
use super::textures::{MAX_LEVEL, MAX_SIZE};
use crate::api::{PixelPackData, PixelUnpackData};
use crate::gl;
use crate::gl::types::*;

/// An image that framebuffer operations read or write.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Surface {
    Attached(Attachment),
    DefaultColor,
    DefaultDepthStencil,
}

/// A copy of a surface layer, used as a blit source.
struct Snapshot {
    width: usize,
    height: usize,
    texels: Vec<Texel>,
}

impl Snapshot {
    fn texel(&self, x: usize, y: usize) -> Texel {
        self.texels[y * self.width + x]
    }

    /// Bilinear sample at texel-space coordinates, clamped to the edges.
    fn sample_linear(&self, u: f64, v: f64) -> Texel {
        let clamp = |c: f64, n: usize| c.max(0.0).min((n - 1) as f64);
        let u = clamp(u - 0.5, self.width);
        let v = clamp(v - 0.5, self.height);
        let (x0, y0) = (u.floor() as usize, v.floor() as usize);
        let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
        let (fx, fy) = ((u - x0 as f64) as f32, (v - y0 as f64) as f32);
        let (a, b, c, d) = (
            self.texel(x0, y0),
            self.texel(x1, y0),
            self.texel(x0, y1),
            self.texel(x1, y1),
        );
        let mut out = [0.0; 4];
        for i in 0..4 {
            let top = a[i] + (b[i] - a[i]) * fx;
            let bottom = c[i] + (d[i] - c[i]) * fx;
            out[i] = top + (bottom - top) * fy;
        }
        out
    }
}

/// Which parts of a texel a framebuffer write replaces.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Aspect {
    Color,
    Depth,
    Stencil,
}

impl Aspect {
    fn merge(self, dst: &mut Texel, src: &Texel) {
        match self {
            Aspect::Color => *dst = *src,
            Aspect::Depth => dst[0] = src[0],
            Aspect::Stencil => dst[1] = src[1],
        }
    }
}

impl FramebufferObject {
    fn new(max_color_attachments: usize) -> FramebufferObject {
        FramebufferObject {
            color: vec![None; max_color_attachments],
            depth: None,
            stencil: None,
            draw_buffers: vec![gl::COLOR_ATTACHMENT0],
            read_buffer: gl::COLOR_ATTACHMENT0,
        }
    }

    fn attachments(&self) -> impl Iterator<Item = (StorageClass, Attachment)> + '_ {
        let color = self
            .color
            .iter()
            .filter_map(|a| a.map(|a| (StorageClass::Color, a)));
        let depth = self.depth.map(|a| (StorageClass::Depth, a));
        let stencil = self.stencil.map(|a| (StorageClass::Stencil, a));
        color.chain(depth).chain(stencil)
    }
}

impl State {
    //----------------------------------------------------------------------------------------------
    // Renderbuffers

    pub(super) fn gen_renderbuffer(&mut self) -> GLuint {
        let name = self.new_name();
        self.renderbuffers
            .insert(name, RenderbufferObject { image: None });
        name
    }

    pub(super) fn delete_renderbuffer(&mut self, name: GLuint) {
        if name == 0 || self.renderbuffers.remove(&name).is_none() {
            return;
        }
        if self.renderbuffer == name {
            self.renderbuffer = 0;
        }
        self.detach_everywhere(|a| a.references_renderbuffer(name));
    }

    pub(super) fn bind_renderbuffer(&mut self, target: GLenum, name: GLuint) -> SoftResult<()> {
        ensure(target == gl::RENDERBUFFER, gl::INVALID_ENUM, "invalid renderbuffer target")?;
        ensure(
            name == 0 || self.renderbuffers.contains_key(&name),
            gl::INVALID_OPERATION,
            "not a renderbuffer name",
        )?;
        self.renderbuffer = name;
        Ok(())
    }

    fn bound_renderbuffer(&mut self, target: GLenum) -> SoftResult<&mut RenderbufferObject> {
        ensure(target == gl::RENDERBUFFER, gl::INVALID_ENUM, "invalid renderbuffer target")?;
        let name = self.renderbuffer;
        match self.renderbuffers.get_mut(&name) {
            Some(rb) if name != 0 => Ok(rb),
            _ => fail(gl::INVALID_OPERATION, "no renderbuffer bound"),
        }
    }

    pub(super) fn renderbuffer_storage(
        &mut self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) -> SoftResult<()> {
        let info = super::pixels::internal_format(internal_format);
        ensure(
            info.map_or(false, |info| !info.compressed),
            gl::INVALID_ENUM,
            "not a renderable internal format",
        )?;
        let width = size_arg(width, "negative width")?;
        let height = size_arg(height, "negative height")?;
        ensure(
            width <= MAX_SIZE && height <= MAX_SIZE,
            gl::INVALID_VALUE,
            "renderbuffer too large",
        )?;
        self.bound_renderbuffer(target)?.image =
            Some(Level::new(width, height, 1, internal_format));
        Ok(())
    }

    pub(super) fn get_renderbuffer_parameter(
        &mut self,
        target: GLenum,
        pname: GLenum,
    ) -> SoftResult<GLint> {
        let image = self.bound_renderbuffer(target)?.image.as_ref();
        match pname {
            gl::RENDERBUFFER_WIDTH => Ok(image.map_or(0, |i| i.width as GLint)),
            gl::RENDERBUFFER_HEIGHT => Ok(image.map_or(0, |i| i.height as GLint)),
            gl::RENDERBUFFER_INTERNAL_FORMAT => {
                Ok(image.map_or(gl::RGBA, |i| i.internal_format) as GLint)
            }
            _ => fail(gl::INVALID_ENUM, "unknown renderbuffer parameter"),
        }
    }

    //----------------------------------------------------------------------------------------------
    // Framebuffer objects

    fn framebuffer_binding(&self, target: GLenum) -> SoftResult<GLuint> {
        match target {
            gl::FRAMEBUFFER | gl::DRAW_FRAMEBUFFER => Ok(self.draw_framebuffer),
            gl::READ_FRAMEBUFFER => Ok(self.read_framebuffer),
            _ => fail(gl::INVALID_ENUM, "invalid framebuffer target"),
        }
    }

    fn bound_framebuffer(&mut self, target: GLenum) -> SoftResult<&mut FramebufferObject> {
        let name = self.framebuffer_binding(target)?;
        match self.framebuffers.get_mut(&name) {
            Some(fb) if name != 0 => Ok(fb),
            _ => fail(
                gl::INVALID_OPERATION,
                "the default framebuffer has no attachments",
            ),
        }
    }

    fn color_index(&self, attachment: GLenum) -> Option<usize> {
        let index = attachment.wrapping_sub(gl::COLOR_ATTACHMENT0) as usize;
        if attachment >= gl::COLOR_ATTACHMENT0
            && index < self.limits.max_color_attachments as usize
        {
            Some(index)
        } else {
            None
        }
    }

    pub(super) fn gen_framebuffer(&mut self) -> GLuint {
        let name = self.new_name();
        let fb = FramebufferObject::new(self.limits.max_color_attachments as usize);
        self.framebuffers.insert(name, fb);
        name
    }

    pub(super) fn delete_framebuffer(&mut self, name: GLuint) {
        if name == 0 || self.framebuffers.remove(&name).is_none() {
            return;
        }
        if self.draw_framebuffer == name {
            self.draw_framebuffer = 0;
        }
        if self.read_framebuffer == name {
            self.read_framebuffer = 0;
        }
    }

    pub(super) fn bind_framebuffer(&mut self, target: GLenum, name: GLuint) -> SoftResult<()> {
        self.framebuffer_binding(target)?;
        ensure(
            name == 0 || self.framebuffers.contains_key(&name),
            gl::INVALID_OPERATION,
            "not a framebuffer name",
        )?;
        match target {
            gl::FRAMEBUFFER => {
                self.draw_framebuffer = name;
                self.read_framebuffer = name;
            }
            gl::DRAW_FRAMEBUFFER => self.draw_framebuffer = name,
            _ => self.read_framebuffer = name,
        }
        Ok(())
    }

    /// Removes every attachment matching `pred` from all framebuffer objects.
    pub(super) fn detach_everywhere(&mut self, pred: impl Fn(&Attachment) -> bool) {
        let matches = |slot: &Option<Attachment>| slot.map_or(false, |a| pred(&a));
        for fb in self.framebuffers.values_mut() {
            for slot in fb.color.iter_mut() {
                if matches(slot) {
                    *slot = None;
                }
            }
            if matches(&fb.depth) {
                fb.depth = None;
            }
            if matches(&fb.stencil) {
                fb.stencil = None;
            }
        }
    }

    fn set_attachment(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        value: Option<Attachment>,
    ) -> SoftResult<()> {
        let color = self.color_index(attachment);
        let fb = self.bound_framebuffer(target)?;
        match (attachment, color) {
            (_, Some(index)) => fb.color[index] = value,
            (gl::DEPTH_ATTACHMENT, _) => fb.depth = value,
            (gl::STENCIL_ATTACHMENT, _) => fb.stencil = value,
            (gl::DEPTH_STENCIL_ATTACHMENT, _) => {
                fb.depth = value;
                fb.stencil = value;
            }
            _ => return fail(gl::INVALID_ENUM, "invalid attachment point"),
        }
        Ok(())
    }

    /// Attaches a texture level. `dims` is 1, 2 or 3, matching the entry point used.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn framebuffer_texture(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
        layer: GLint,
        dims: u32,
    ) -> SoftResult<()> {
        self.framebuffer_binding(target)?;
        if texture == 0 {
            return self.set_attachment(target, attachment, None);
        }
        let expected = match dims {
            1 => gl::TEXTURE_1D,
            2 => gl::TEXTURE_2D,
            _ => gl::TEXTURE_3D,
        };
        ensure(
            tex_target == expected,
            gl::INVALID_ENUM,
            "invalid texture target for this entry point",
        )?;
        let object = self.textures.get(&texture).ok_or(Failure {
            code: gl::INVALID_OPERATION,
            reason: "not a texture name",
        })?;
        ensure(
            object.target == Some(tex_target),
            gl::INVALID_OPERATION,
            "texture target mismatch",
        )?;
        ensure(
            (0..=MAX_LEVEL).contains(&level),
            gl::INVALID_VALUE,
            "mip level out of range",
        )?;
        ensure(
            layer >= 0 && (layer as usize) < MAX_SIZE,
            gl::INVALID_VALUE,
            "layer out of range",
        )?;
        let value = Attachment::Texture {
            name: texture,
            level,
            layer: layer as usize,
        };
        self.set_attachment(target, attachment, Some(value))
    }

    pub(super) fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) -> SoftResult<()> {
        ensure(
            renderbuffer_target == gl::RENDERBUFFER,
            gl::INVALID_ENUM,
            "invalid renderbuffer target",
        )?;
        ensure(
            renderbuffer == 0 || self.renderbuffers.contains_key(&renderbuffer),
            gl::INVALID_OPERATION,
            "not a renderbuffer name",
        )?;
        let value = if renderbuffer == 0 {
            None
        } else {
            Some(Attachment::Renderbuffer(renderbuffer))
        };
        self.set_attachment(target, attachment, value)
    }

    fn attached_image(&self, attachment: Attachment) -> Option<(&Level, usize)> {
        let (image, layer) = match attachment {
            Attachment::Texture { name, level, layer } => {
                (self.textures.get(&name)?.levels.get(&level)?, layer)
            }
            Attachment::Renderbuffer(name) => (self.renderbuffers.get(&name)?.image.as_ref()?, 0),
        };
        if image.compressed.is_some() || layer >= image.depth {
            return None;
        }
        Some((image, layer))
    }

    fn surface(&self, surface: Surface) -> Option<(&Level, usize)> {
        match surface {
            Surface::Attached(a) => self.attached_image(a),
            Surface::DefaultColor => Some((&self.default_framebuffer.color, 0)),
            Surface::DefaultDepthStencil => Some((&self.default_framebuffer.depth_stencil, 0)),
        }
    }

    fn surface_mut(&mut self, surface: Surface) -> Option<(&mut Level, usize)> {
        let (image, layer) = match surface {
            Surface::Attached(Attachment::Texture { name, level, layer }) => {
                (self.textures.get_mut(&name)?.levels.get_mut(&level)?, layer)
            }
            Surface::Attached(Attachment::Renderbuffer(name)) => {
                (self.renderbuffers.get_mut(&name)?.image.as_mut()?, 0)
            }
            Surface::DefaultColor => (&mut self.default_framebuffer.color, 0),
            Surface::DefaultDepthStencil => (&mut self.default_framebuffer.depth_stencil, 0),
        };
        if image.compressed.is_some() || layer >= image.depth {
            return None;
        }
        Some((image, layer))
    }

    fn status(&self, name: GLuint) -> GLenum {
        let fb = match self.framebuffers.get(&name) {
            Some(fb) if name != 0 => fb,
            _ => return gl::FRAMEBUFFER_COMPLETE,
        };
        let mut any = false;
        for (class, attachment) in fb.attachments() {
            any = true;
            let info = self
                .attached_image(attachment)
                .filter(|(image, _)| image.width > 0 && image.height > 0)
                .and_then(|(image, _)| image.format());
            let usable = match info {
                Some(info) => match class {
                    StorageClass::Color => info.class == StorageClass::Color,
                    StorageClass::Depth => info.class.has_depth(),
                    _ => info.class.has_stencil(),
                },
                None => false,
            };
            if !usable {
                return gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT;
            }
        }
        if any {
            gl::FRAMEBUFFER_COMPLETE
        } else {
            gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
        }
    }

    pub(super) fn check_framebuffer_status(&self, target: GLenum) -> SoftResult<GLenum> {
        let name = self.framebuffer_binding(target)?;
        Ok(self.status(name))
    }

    fn require_complete(&self, name: GLuint) -> SoftResult<()> {
        ensure(
            self.status(name) == gl::FRAMEBUFFER_COMPLETE,
            gl::INVALID_FRAMEBUFFER_OPERATION,
            "framebuffer is incomplete",
        )
    }

    pub(super) fn get_framebuffer_attachment_parameter(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        pname: GLenum,
    ) -> SoftResult<GLint> {
        let color = self.color_index(attachment);
        let fb = self.bound_framebuffer(target)?;
        let value = match (attachment, color) {
            (_, Some(index)) => fb.color[index],
            (gl::DEPTH_ATTACHMENT, _) => fb.depth,
            (gl::STENCIL_ATTACHMENT, _) => fb.stencil,
            (gl::DEPTH_STENCIL_ATTACHMENT, _) => {
                ensure(
                    fb.depth == fb.stencil,
                    gl::INVALID_OPERATION,
                    "depth and stencil attachments differ",
                )?;
                fb.depth
            }
            _ => return fail(gl::INVALID_ENUM, "invalid attachment point"),
        };
        match (pname, value) {
            (gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE, None) => Ok(gl::NONE as GLint),
            (gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE, Some(Attachment::Texture { .. })) => {
                Ok(gl::TEXTURE as GLint)
            }
            (gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE, Some(Attachment::Renderbuffer(_))) => {
                Ok(gl::RENDERBUFFER as GLint)
            }
            (gl::FRAMEBUFFER_ATTACHMENT_OBJECT_NAME, None) => Ok(0),
            (gl::FRAMEBUFFER_ATTACHMENT_OBJECT_NAME, Some(Attachment::Texture { name, .. }))
            | (gl::FRAMEBUFFER_ATTACHMENT_OBJECT_NAME, Some(Attachment::Renderbuffer(name))) => {
                Ok(name as GLint)
            }
            (gl::FRAMEBUFFER_ATTACHMENT_TEXTURE_LEVEL, Some(Attachment::Texture { level, .. })) => {
                Ok(level)
            }
            (gl::FRAMEBUFFER_ATTACHMENT_TEXTURE_LAYER, Some(Attachment::Texture { layer, .. })) => {
                Ok(layer as GLint)
            }
            _ => fail(gl::INVALID_ENUM, "invalid attachment parameter"),
        }
    }

    pub(super) fn draw_buffers(&mut self, buffers: &[GLenum]) -> SoftResult<()> {
        ensure(
            buffers.len() <= self.limits.max_draw_buffers as usize,
            gl::INVALID_VALUE,
            "too many draw buffers",
        )?;
        let name = self.draw_framebuffer;
        if name == 0 {
            ensure(
                buffers.len() == 1 && matches!(buffers[0], gl::NONE | gl::BACK | gl::FRONT),
                gl::INVALID_OPERATION,
                "the default framebuffer draws to NONE, FRONT or BACK",
            )?;
            self.default_framebuffer.draw_buffer = buffers[0];
            return Ok(());
        }
        for (i, &buffer) in buffers.iter().enumerate() {
            ensure(
                buffer == gl::NONE || self.color_index(buffer).is_some(),
                gl::INVALID_OPERATION,
                "invalid draw buffer for a framebuffer object",
            )?;
            ensure(
                buffer == gl::NONE || !buffers[..i].contains(&buffer),
                gl::INVALID_OPERATION,
                "duplicate draw buffer",
            )?;
        }
        self.bound_framebuffer(gl::DRAW_FRAMEBUFFER)?.draw_buffers = buffers.to_vec();
        Ok(())
    }

    pub(super) fn read_buffer(&mut self, mode: GLenum) -> SoftResult<()> {
        let name = self.read_framebuffer;
        if name == 0 {
            ensure(
                matches!(mode, gl::NONE | gl::BACK | gl::FRONT),
                gl::INVALID_OPERATION,
                "the default framebuffer reads from NONE, FRONT or BACK",
            )?;
            self.default_framebuffer.read_buffer = mode;
            return Ok(());
        }
        ensure(
            mode == gl::NONE || self.color_index(mode).is_some(),
            gl::INVALID_OPERATION,
            "invalid read buffer for a framebuffer object",
        )?;
        self.bound_framebuffer(gl::READ_FRAMEBUFFER)?.read_buffer = mode;
        Ok(())
    }

    pub(super) fn read_buffer_mode(&self) -> GLenum {
        match self.framebuffers.get(&self.read_framebuffer) {
            Some(fb) if self.read_framebuffer != 0 => fb.read_buffer,
            _ => self.default_framebuffer.read_buffer,
        }
    }

    pub(super) fn draw_buffer_mode(&self, index: usize) -> GLenum {
        match self.framebuffers.get(&self.draw_framebuffer) {
            Some(fb) if self.draw_framebuffer != 0 => {
                fb.draw_buffers.get(index).copied().unwrap_or(gl::NONE)
            }
            _ if index == 0 => self.default_framebuffer.draw_buffer,
            _ => gl::NONE,
        }
    }

    //----------------------------------------------------------------------------------------------
    // Surfaces of the bound framebuffers

    fn draw_surfaces(&self, aspect: Aspect) -> Vec<Surface> {
        let name = self.draw_framebuffer;
        let fb = match self.framebuffers.get(&name) {
            Some(fb) if name != 0 => fb,
            _ => {
                return match aspect {
                    Aspect::Color if self.default_framebuffer.draw_buffer == gl::NONE => vec![],
                    Aspect::Color => vec![Surface::DefaultColor],
                    _ => vec![Surface::DefaultDepthStencil],
                }
            }
        };
        match aspect {
            Aspect::Color => fb
                .draw_buffers
                .iter()
                .filter_map(|&b| self.color_index(b))
                .filter_map(|i| fb.color[i])
                .map(Surface::Attached)
                .collect(),
            Aspect::Depth => fb.depth.map(Surface::Attached).into_iter().collect(),
            Aspect::Stencil => fb.stencil.map(Surface::Attached).into_iter().collect(),
        }
    }

    fn read_surface(&self, aspect: Aspect) -> Option<Surface> {
        let name = self.read_framebuffer;
        let fb = match self.framebuffers.get(&name) {
            Some(fb) if name != 0 => fb,
            _ => {
                return match aspect {
                    Aspect::Color if self.default_framebuffer.read_buffer == gl::NONE => None,
                    Aspect::Color => Some(Surface::DefaultColor),
                    _ => Some(Surface::DefaultDepthStencil),
                }
            }
        };
        match aspect {
            Aspect::Color => self
                .color_index(fb.read_buffer)
                .and_then(|i| fb.color[i])
                .map(Surface::Attached),
            Aspect::Depth => fb.depth.map(Surface::Attached),
            Aspect::Stencil => fb.stencil.map(Surface::Attached),
        }
    }

    fn snapshot(&self, surface: Surface) -> Option<Snapshot> {
        let (image, layer) = self.surface(surface)?;
        let n = image.width * image.height;
        Some(Snapshot {
            width: image.width,
            height: image.height,
            texels: image.texels[layer * n..(layer + 1) * n].to_vec(),
        })
    }

    /// Applies `f` to every texel of the surface layer, then re-normalizes it to the format.
    fn update(&mut self, surface: Surface, mut f: impl FnMut(usize, usize, &mut Texel)) {
        if let Some((image, layer)) = self.surface_mut(surface) {
            let info = match image.format() {
                Some(info) => info,
                None => return,
            };
            let (width, height) = (image.width, image.height);
            let base = layer * width * height;
            for y in 0..height {
                for x in 0..width {
                    let texel = &mut image.texels[base + y * width + x];
                    f(x, y, &mut *texel);
                    *texel = info.store(*texel);
                }
            }
        }
    }

    fn aspects(mask: GLbitfield) -> SoftResult<Vec<Aspect>> {
        let all = gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT;
        ensure(mask & !all == 0, gl::INVALID_VALUE, "unknown bits in buffer mask")?;
        let mut aspects = Vec::new();
        if mask & gl::COLOR_BUFFER_BIT != 0 {
            aspects.push(Aspect::Color);
        }
        if mask & gl::DEPTH_BUFFER_BIT != 0 {
            aspects.push(Aspect::Depth);
        }
        if mask & gl::STENCIL_BUFFER_BIT != 0 {
            aspects.push(Aspect::Stencil);
        }
        Ok(aspects)
    }

    //----------------------------------------------------------------------------------------------
    // Operations

    pub(super) fn clear(&mut self, mask: GLbitfield) -> SoftResult<()> {
        let aspects = State::aspects(mask)?;
        self.require_complete(self.draw_framebuffer)?;
        let value = [
            self.clear_color[0],
            self.clear_color[1],
            self.clear_color[2],
            self.clear_color[3],
        ];
        let depth = self.clear_depth.max(0.0).min(1.0) as f32;
        let stencil = (self.clear_stencil & 0xff) as f32;
        let clear_value: Texel = [depth, stencil, 0.0, 0.0];
        for aspect in aspects {
            for surface in self.draw_surfaces(aspect) {
                let src = if aspect == Aspect::Color {
                    value
                } else {
                    clear_value
                };
                self.update(surface, |_, _, texel| aspect.merge(texel, &src));
            }
        }
        Ok(())
    }

    pub(super) fn blit_framebuffer(
        &mut self,
        src: [GLint; 4],
        dst: [GLint; 4],
        mask: GLbitfield,
        filter: GLenum,
    ) -> SoftResult<()> {
        let aspects = State::aspects(mask)?;
        ensure(
            matches!(filter, gl::NEAREST | gl::LINEAR),
            gl::INVALID_ENUM,
            "invalid blit filter",
        )?;
        ensure(
            filter == gl::NEAREST || mask & !gl::COLOR_BUFFER_BIT == 0,
            gl::INVALID_OPERATION,
            "depth and stencil blits must use nearest filtering",
        )?;
        self.require_complete(self.read_framebuffer)?;
        self.require_complete(self.draw_framebuffer)?;

        let [sx0, sy0, sx1, sy1] = src;
        let [dx0, dy0, dx1, dy1] = dst;
        if dx0 == dx1 || dy0 == dy1 {
            return Ok(());
        }
        // corners may span the whole GLint range
        let scale_x = (sx1 as f64 - sx0 as f64) / (dx1 as f64 - dx0 as f64);
        let scale_y = (sy1 as f64 - sy0 as f64) / (dy1 as f64 - dy0 as f64);
        let (min_x, max_x) = (dx0.min(dx1), dx0.max(dx1));
        let (min_y, max_y) = (dy0.min(dy1), dy0.max(dy1));

        for aspect in aspects {
            let source = match self.read_surface(aspect).and_then(|s| self.snapshot(s)) {
                Some(source) => source,
                None => continue,
            };
            if source.width == 0 || source.height == 0 {
                continue;
            }
            for surface in self.draw_surfaces(aspect) {
                self.update(surface, |x, y, texel| {
                    let (x, y) = (x as GLint, y as GLint);
                    if x < min_x || x >= max_x || y < min_y || y >= max_y {
                        return;
                    }
                    let u = sx0 as f64 + (x as f64 + 0.5 - dx0 as f64) * scale_x;
                    let v = sy0 as f64 + (y as f64 + 0.5 - dy0 as f64) * scale_y;
                    let sample = if filter == gl::LINEAR {
                        source.sample_linear(u, v)
                    } else {
                        let (sx, sy) = (u.floor(), v.floor());
                        if sx < 0.0
                            || sy < 0.0
                            || sx >= source.width as f64
                            || sy >= source.height as f64
                        {
                            return;
                        }
                        source.texel(sx as usize, sy as usize)
                    };
                    aspect.merge(texel, &sample);
                });
            }
        }
        Ok(())
    }

    fn transfer_aspects(class: StorageClass) -> &'static [Aspect] {
        match class {
            StorageClass::Color => &[Aspect::Color],
            StorageClass::Depth => &[Aspect::Depth],
            StorageClass::Stencil => &[Aspect::Stencil],
            StorageClass::DepthStencil => &[Aspect::Depth, Aspect::Stencil],
        }
    }

    /// Reads a rectangle of the read framebuffer. Pixels outside the source image read as zero.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn read_pixels(
        &mut self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelPackData,
    ) -> SoftResult<()> {
        let width = size_arg(width, "negative width")?;
        let height = size_arg(height, "negative height")?;
        ensure(
            x.checked_add(width as GLint).is_some() && y.checked_add(height as GLint).is_some(),
            gl::INVALID_VALUE,
            "region exceeds the coordinate range",
        )?;
        let pixel = PixelFormat::new(format, ty).map_err(|code| Failure {
            code,
            reason: "invalid pixel format or type",
        })?;
        self.require_complete(self.read_framebuffer)?;

        let mut texels = vec![[0.0f32; 4]; width * height];
        for &aspect in State::transfer_aspects(pixel.format.class) {
            let source = self
                .read_surface(aspect)
                .and_then(|s| self.snapshot(s))
                .ok_or(Failure {
                    code: gl::INVALID_OPERATION,
                    reason: "no buffer to read from",
                })?;
            for row in 0..height {
                for col in 0..width {
                    let (sx, sy) = (x + col as GLint, y + row as GLint);
                    if sx < 0
                        || sy < 0
                        || sx as usize >= source.width
                        || sy as usize >= source.height
                    {
                        continue;
                    }
                    let texel = source.texel(sx as usize, sy as usize);
                    aspect.merge(&mut texels[row * width + col], &texel);
                }
            }
        }
        self.pack_texels(pixels, &pixel, 2, width, height, 1, &texels)
    }

    /// Writes client pixels at the origin of the draw framebuffer.
    pub(super) fn draw_pixels(
        &mut self,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    ) -> SoftResult<()> {
        let width = size_arg(width, "negative width")?;
        let height = size_arg(height, "negative height")?;
        self.require_complete(self.draw_framebuffer)?;
        let (pixel, texels) = match self.unpack_texels(pixels, format, ty, 2, width, height, 1)? {
            Some(data) => data,
            None => return Ok(()),
        };
        for &aspect in State::transfer_aspects(pixel.format.class) {
            for surface in self.draw_surfaces(aspect) {
                let compatible = self
                    .surface(surface)
                    .and_then(|(image, _)| image.format())
                    .map_or(false, |info| info.class.accepts(pixel.format.class));
                ensure(
                    compatible,
                    gl::INVALID_OPERATION,
                    "pixel format does not match the draw buffer",
                )?;
                self.update(surface, |x, y, texel| {
                    if x < width && y < height {
                        aspect.merge(texel, &texels[y * width + x]);
                    }
                });
            }
        }
        Ok(())
    }
}
