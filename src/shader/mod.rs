//! Shader script bookkeeping: which material names already have hand-written definitions in the
//! shader library, and which ones the converter has asked us to generate for the current map.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub mod emit;
pub mod generate;
pub mod registry;
pub mod scan;

pub use self::generate::ShaderGenerator;
pub use self::registry::{RegistryLimits, ShaderRegistry, SourceRegistry};

/// Most sky layers a generated sky shader will carry; extras are dropped.
pub const MAX_SKYBOX_LAYERS: usize = 2;


pub struct Handle<T>(usize, PhantomData<*const T>);

// Implemented by hand because the auto-generated impls assume T must also implement them, but we
// don't actually own a T.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle(self.0, PhantomData)
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Handle<T>) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl<T> From<usize> for Handle<T> {
    fn from(index: usize) -> Self {
        Handle(index, PhantomData)
    }
}

impl<T> Handle<T> {
    pub fn index(&self) -> usize {
        self.0
    }
}


/// A shader script file, either one found in the library or the map's companion file that
/// generated shaders get appended to.
#[derive(Debug)]
pub struct SourceFile {
    pub filename: String,
    /// Set once the library scan has read this file
    pub scanned: bool,
    /// Shaders defined in this file, in the order they were found
    pub authored: Vec<Handle<Shader>>,
    /// Generated shaders waiting to be written, most recent first
    pub pending: VecDeque<Handle<Shader>>,
}

impl SourceFile {
    pub fn new(filename: &str) -> Self {
        SourceFile {
            filename: filename.to_string(),
            scanned: false,
            authored: Vec::new(),
            pending: VecDeque::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkyLayer {
    pub map: String,
    pub tc_scale: [f32; 2],
    pub tc_scroll: [f32; 2],
    pub alpha_gen_const: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkyBox {
    /// Base name of the six sky box images
    pub sky: String,
    pub height: f32,
    pub layers: Vec<SkyLayer>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkyShader {
    pub sky_box: SkyBox,
    pub fog: Fog,
    pub editor_image: String,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CullMode {
    Back,
    Front,
    None,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BlendMode {
    None,
    AlphaTest,
    Blend,
}

/// Knobs for a plain single-texture shader.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimplifiedParams {
    pub cull: CullMode,
    pub blend: BlendMode,
    pub lightmapped: bool,
    pub alpha_gen_const: f32,
    pub tc_scroll: [f32; 2],
}

impl Default for SimplifiedParams {
    fn default() -> Self {
        SimplifiedParams {
            cull: CullMode::Back,
            blend: BlendMode::None,
            lightmapped: true,
            alpha_gen_const: 1.0,
            tc_scroll: [0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimplifiedShader {
    pub diffuse_map: String,
    pub params: SimplifiedParams,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShaderKind {
    /// Name is known but nothing has claimed it yet
    Untouched,
    /// Defined by hand somewhere in the shader library; never overridden
    Authored,
    Fog(Fog),
    Sky(SkyShader),
    Simplified(SimplifiedShader),
}

impl ShaderKind {
    pub fn is_generated(&self) -> bool {
        match *self {
            ShaderKind::Fog(_) | ShaderKind::Sky(_) | ShaderKind::Simplified(_) => true,
            ShaderKind::Untouched | ShaderKind::Authored => false,
        }
    }
}

#[derive(Debug)]
pub struct Shader {
    /// Name as first seen, minus any extension
    pub name: String,
    pub kind: ShaderKind,
    /// File this shader lives in: the library file for authored shaders, the companion file for
    /// generated ones
    pub owner: Option<Handle<SourceFile>>,
    /// Line the authored definition starts on
    pub line: Option<usize>,
}

impl Shader {
    pub fn new(name: &str) -> Self {
        Shader {
            name: name.to_string(),
            kind: ShaderKind::Untouched,
            owner: None,
            line: None,
        }
    }
}


/// Something worth complaining about that doesn't stop the run.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    NoShaderFiles {
        dir: String,
    },
    UnreadableFile {
        file: String,
        reason: String,
    },
    MissingOpeningBrace {
        file: String,
        shader: String,
        line: usize,
        found: Option<(String, usize)>,
    },
    MissingClosingBrace {
        file: String,
        shader: String,
        line: usize,
    },
    DuplicateShader {
        shader: String,
        line: usize,
        file: String,
        previous_file: String,
        previous_line: Option<usize>,
    },
    RegistryFull {
        table: &'static str,
        name: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Diagnostic::NoShaderFiles { ref dir } => {
                write!(f, "no shader files found in {}", dir)
            }
            Diagnostic::UnreadableFile { ref file, ref reason } => {
                write!(f, "ignoring shader file {}: {}", file, reason)
            }
            Diagnostic::MissingOpeningBrace { ref file, ref shader, line, ref found } => {
                write!(f, "ignoring rest of shader file {}: shader \"{}\" on line {} missing opening brace", file, shader, line)?;
                if let Some((ref token, token_line)) = *found {
                    write!(f, " (found \"{}\" on line {})", token, token_line)?;
                }
                Ok(())
            }
            Diagnostic::MissingClosingBrace { ref file, ref shader, line } => {
                write!(f, "ignoring rest of shader file {}: shader \"{}\" on line {} missing closing brace", file, shader, line)
            }
            Diagnostic::DuplicateShader { ref shader, line, ref file, ref previous_file, previous_line } => {
                write!(f, "shader \"{}\" on line {} of file {} previously defined in file {}", shader, line, file, previous_file)?;
                if let Some(previous_line) = previous_line {
                    write!(f, " on line {}", previous_line)?;
                }
                Ok(())
            }
            Diagnostic::RegistryFull { table, ref name } => {
                write!(f, "{} registry is full, skipping {}", table, name)
            }
        }
    }
}


/// Both registries plus everything needed to place the companion file.  Created once per run by
/// `ShaderGenerator::init`.
pub struct ShaderContext {
    base_dir: PathBuf,
    map_name: String,
    pub files: SourceRegistry,
    pub shaders: ShaderRegistry,
    companion: Option<Handle<SourceFile>>,
    diagnostics: Vec<Diagnostic>,
}

impl ShaderContext {
    pub fn new(base_dir: &Path, map_name: &str, limits: &RegistryLimits) -> Self {
        ShaderContext {
            base_dir: base_dir.to_path_buf(),
            map_name: map_name.to_string(),
            files: SourceRegistry::new(limits),
            shaders: ShaderRegistry::new(limits),
            companion: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn companion(&self) -> Option<Handle<SourceFile>> {
        self.companion
    }

    /// Where generated shaders for this map end up.
    pub fn companion_filename(&self) -> String {
        format!("{}_gen.shader", self.map_name)
    }

    pub fn companion_path(&self) -> PathBuf {
        self.base_dir.join(self.companion_filename())
    }

    /// Registers the companion file, if that hasn't happened yet.
    pub fn register_companion(&mut self) -> Option<Handle<SourceFile>> {
        if self.companion.is_none() {
            let filename = self.companion_filename();
            match self.files.get_or_create(&filename) {
                Ok(handle) => { self.companion = Some(handle); }
                Err(_) => {
                    self.report(Diagnostic::RegistryFull { table: "shader file", name: filename });
                }
            }
        }
        self.companion
    }

    /// Look up a shader by name, whatever its state.
    pub fn shader(&self, name: &str) -> Option<&Shader> {
        self.shaders.find(name).map(|handle| self.shaders.get(handle))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
