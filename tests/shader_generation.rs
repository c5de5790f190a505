extern crate bspshaders;
extern crate tempfile;

use std::fs;
use std::path::Path;

use bspshaders::{DiskFs, ShaderGenerator};
use bspshaders::bsp::{Bsp, BspShader, BSP_FORMATS, ContentFlags, NUM_LUMPS, SurfaceFlags};
use bspshaders::shader::{BlendMode, CullMode, Diagnostic, ShaderKind, SimplifiedParams, SkyBox, SkyLayer};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn generates_only_missing_shaders() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "base.shader", "// the basics\ntextures/base/wall\n{\n\t{\n\t\tmap $lightmap\n\t}\n}\n");
    write(dir.path(), "readme.txt", "textures/base/floor { }");

    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(dir.path(), "q3dm1");
    assert!(generator.context().unwrap().diagnostics().is_empty());

    generator.define_simplified("textures/base/wall", "textures/base/wall", SimplifiedParams::default());
    let params = SimplifiedParams { cull: CullMode::None, blend: BlendMode::None, lightmapped: true, ..SimplifiedParams::default() };
    generator.define_simplified("textures/base/floor", "textures/base/floor_d", params);
    assert_eq!(generator.flush().unwrap(), 1);

    assert_eq!(read(dir.path(), "q3dm1_gen.shader"), "\ntextures/base/floor\n{\n\
        \tcull none\n\
        \t{\n\
        \t\tmap textures/base/floor_d\n\
        \t}\n\
        \t{\n\
        \t\tmap $lightmap\n\
        \t\tblendFunc filter\n\
        \t\tdepthFunc equal\n\
        \t\ttcGen lightmap\n\
        \t}\n\
        }\n");
    // The library itself is untouched
    assert!(read(dir.path(), "base.shader").starts_with("// the basics\n"));
}

#[test]
fn existing_companion_content_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "q3dm1_gen.shader", "// tweaked by hand\ntextures/q3dm1/lava\n{\n\tsurfaceparm lava\n}\n");

    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(dir.path(), "q3dm1");
    generator.define_fog("textures/q3dm1/lava", [1.0, 0.0, 0.0], 64.0);
    generator.define_fog("textures/q3dm1/mist", [0.5, 0.5, 0.5], 1024.0);
    assert_eq!(generator.flush().unwrap(), 1);

    let written = read(dir.path(), "q3dm1_gen.shader");
    assert!(written.starts_with("// tweaked by hand\ntextures/q3dm1/lava\n{\n\tsurfaceparm lava\n}\n"));
    assert!(written.contains("\ntextures/q3dm1/mist\n{\n"));
    assert!(written.contains("\tfogparms ( 0.500000 0.500000 0.500000 ) 1024.000000\n"));
    assert_eq!(written.matches("textures/q3dm1/lava").count(), 1);
}

#[test]
fn rerunning_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "base.shader", "textures/base/wall { }");

    for _ in 0..2 {
        let mut generator = ShaderGenerator::new(DiskFs);
        generator.init(dir.path(), "q3dm1");
        generator.define_simplified("textures/base/glass", "textures/base/glass",
            SimplifiedParams { cull: CullMode::None, blend: BlendMode::Blend, ..SimplifiedParams::default() });
        generator.flush().unwrap();
    }

    let written = read(dir.path(), "q3dm1_gen.shader");
    assert_eq!(written.matches("textures/base/glass\n{").count(), 1);
    assert!(written.contains("\tsort additive\n"));
}

#[test]
fn unterminated_shader_is_reported_and_later_files_still_count() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.shader", "textures/a/one\n{\n}\ntextures/a/two\n{\n\t{\n\t\tmap x\n\t}\n");
    write(dir.path(), "b.shader", "textures/b/three { }");

    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(dir.path(), "q3dm1");

    let context = generator.context().unwrap();
    assert_eq!(context.diagnostics(), &[Diagnostic::MissingClosingBrace {
        file: "a.shader".to_string(),
        shader: "textures/a/two".to_string(),
        line: 4,
    }]);
    assert_eq!(context.shader("textures/a/one").unwrap().kind, ShaderKind::Authored);
    assert_eq!(context.shader("textures/b/three").unwrap().kind, ShaderKind::Authored);

    // Since two never got defined, it's fair game
    generator.define_simplified("textures/a/two", "textures/a/two", SimplifiedParams::default());
    assert_eq!(generator.flush().unwrap(), 1);
}

#[test]
fn sky_without_fog_distance() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sky.shader", "textures/skies/stars { }");

    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(dir.path(), "mp_beach");
    let sky_box = SkyBox {
        sky: "env/beach".to_string(),
        height: 256.0,
        layers: vec![SkyLayer {
            map: "textures/skies/clouds".to_string(),
            tc_scale: [2.0, 2.0],
            tc_scroll: [0.05, 0.0],
            alpha_gen_const: 1.0,
        }],
    };
    generator.define_sky_box(&sky_box, [0.2, 0.3, 0.4], 0.0, "textures/skies/preview");
    assert_eq!(generator.flush().unwrap(), 1);

    assert_eq!(read(dir.path(), "mp_beach_gen.shader"), "\ntextures/mp_beach/sky\n{\n\
        \tqer_editorimage textures/skies/preview\n\
        \tsurfaceparm noimpact\n\
        \tsurfaceparm nolightmap\n\
        \tsurfaceparm sky\n\
        \tskyparms - 256.000000 env/beach\n\
        \t{\n\
        \t\tmap textures/skies/clouds\n\
        \t\ttcMod scale 2.000000 2.000000\n\
        \t\ttcMod scroll 0.050000 0.000000\n\
        \t}\n\
        }\n");
}

#[test]
fn missing_library_directory() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("nope");

    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(&library, "q3dm1");
    match generator.context().unwrap().diagnostics() {
        &[Diagnostic::NoShaderFiles { .. }] => {}
        other => panic!("unexpected diagnostics {:?}", other),
    }

    // Can't append into a directory that doesn't exist, so the shader stays pending
    generator.define_fog("textures/fog/murk", [0.0; 3], 128.0);
    assert!(generator.flush().is_err());
    fs::create_dir(&library).unwrap();
    assert_eq!(generator.flush().unwrap(), 1);
    assert!(read(&library, "q3dm1_gen.shader").contains("textures/fog/murk"));
}

#[test]
fn converted_map_gets_shaders() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "base.shader", "textures/base/glass { }");

    let shaders = vec![
        BspShader { name: "textures/base/wall".to_string(), surface_flags: 0, content_flags: 1 },
        BspShader {
            name: "textures/base/glass".to_string(),
            surface_flags: 0,
            content_flags: ContentFlags::TRANSLUCENT.bits() as i32,
        },
        BspShader {
            name: "textures/base/light".to_string(),
            surface_flags: SurfaceFlags::NOLIGHTMAP.bits() as i32,
            content_flags: 1,
        },
        BspShader {
            name: "textures/base/clip".to_string(),
            surface_flags: SurfaceFlags::NODRAW.bits() as i32,
            content_flags: ContentFlags::TRANSLUCENT.bits() as i32,
        },
    ];
    let bsp = Bsp { format: &BSP_FORMATS[0], shaders, lumps: vec![&[][..]; NUM_LUMPS] };

    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(dir.path(), "q3dm1");
    bspshaders::declare_generated_shaders(&bsp, &mut generator);
    assert_eq!(generator.flush().unwrap(), 1);

    let written = read(dir.path(), "q3dm1_gen.shader");
    assert!(written.starts_with("\ntextures/base/light\n{\n"));
    assert!(!written.contains("$lightmap"));
    assert!(!written.contains("glass"));
    assert!(!written.contains("clip"));
}
