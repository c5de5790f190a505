use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;

extern crate termcolor;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
use log::LevelFilter;

extern crate bspshaders;
use bspshaders::{BSP_FORMATS, DiskFs, ShaderGenerator};
use bspshaders::bsp::LUMP_NAMES;
use bspshaders::errors::{Error, ErrorKind, Result};
use bspshaders::input_buffer::InputBuffer;

mod logger;
use logger::Logger;

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => {
            drop(write_err(err));
            process::exit(1);
        }
    }
}

fn write_err(err: Error) -> Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(&mut stderr, "error: ")?;
    stderr.set_color(&ColorSpec::new())?;
    writeln!(&mut stderr, "{}", err)?;
    for cause in err.iter().skip(1) {
        writeln!(&mut stderr, "  caused by: {}", cause)?;
    }
    if let Some(backtrace) = err.backtrace() {
        writeln!(&mut stderr, "{:?}", backtrace)?;
    }
    Ok(())
}

fn run() -> Result<()> {
    let args = clap_app!(bspshaders =>
        (about: "Converts Quake 3 family BSP files, generating the shaders they need")
        (@setting SubcommandRequiredElseHelp)
        (@arg color: -c --color +takes_value "Choose whether to use colored output (auto, always, never)")
        (@arg verbose: -v --verbose "Print more information")
        (@subcommand convert =>
            (about: "Convert a BSP to another format")
            (@arg input: +required "Input BSP file")
            (@arg format: +required "Output format; see `formats`")
            (@arg output: +required "Output BSP file")
            (@arg shader_dir: -s --("shader-dir") +takes_value
                "Shader library to check and add to (default depends on the format; empty to skip shaders)")
        )
        (@subcommand info =>
            (about: "Print generic information about a BSP")
            (@arg input: +required "Input BSP file")
        )
        (@subcommand formats =>
            (about: "List the supported BSP formats")
        )
    ).get_matches();

    let color = match args.value_of("color") {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    };
    let level = if args.is_present("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    // Only fails if a logger is already installed, which would be fine anyway
    drop(Logger::install(level, color));

    match args.subcommand() {
        ("convert", Some(subargs)) => do_convert(subargs),
        ("info", Some(subargs)) => do_info(subargs),
        ("formats", Some(_)) => do_formats(),
        _ => unreachable!(),
    }
}

/// Refuse paths we can't or shouldn't work with.
fn check_path(path: &str) -> Result<&Path> {
    if path == "-" {
        return Err(ErrorKind::StdioUnsupported.into());
    }
    Ok(Path::new(path))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn do_convert(subargs: &clap::ArgMatches) -> Result<()> {
    // All three are required, so clap has already made sure they're here
    let input_path = check_path(subargs.value_of("input").unwrap_or_default())?;
    let output_path = check_path(subargs.value_of("output").unwrap_or_default())?;
    if same_file(input_path, output_path) {
        return Err(ErrorKind::SameInputAndOutput.into());
    }
    let format_name = subargs.value_of("format").unwrap_or_default();
    let format = match bspshaders::format_by_name(format_name) {
        Some(format) => format,
        None => return Err(ErrorKind::UnknownFormat(format_name.to_string()).into()),
    };

    let map_name = output_path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let shader_dir = subargs.value_of("shader_dir").unwrap_or(format.shader_dir);
    let mut generator = ShaderGenerator::new(DiskFs);
    generator.init(shader_dir, &map_name);

    let input = InputBuffer::new_from_file(input_path)?;
    let bsp = bspshaders::parse_bsp(input.bytes())?;
    info!("Loaded {} ({}, {} shaders)", input_path.display(), bsp.format.game_name, bsp.shaders.len());

    let declared = bspshaders::declare_generated_shaders(&bsp, &mut generator);
    debug!("{} shaders might need generating", declared);

    {
        let mut writer = BufWriter::new(File::create(output_path)?);
        bsp.write_to(format, &mut writer)?;
        writer.flush()?;
    }
    info!("Wrote {} ({})", output_path.display(), format.game_name);

    // The map itself is already safe; missing shaders are only cosmetic
    match generator.flush() {
        Ok(0) => {}
        Ok(count) => info!("Wrote {} shaders", count),
        Err(err) => warn!("couldn't write generated shaders: {}", err),
    }
    Ok(())
}

fn do_info(subargs: &clap::ArgMatches) -> Result<()> {
    let input_path = check_path(subargs.value_of("input").unwrap_or_default())?;
    let input = InputBuffer::new_from_file(input_path)?;
    let bsp = bspshaders::parse_bsp(input.bytes())?;

    println!("{}: {} (version {})", input_path.display(), bsp.format.game_name, bsp.format.version);
    println!();
    for (name, lump) in LUMP_NAMES.iter().zip(bsp.lumps.iter()) {
        println!("{:>14}  {:9} bytes", name, lump.len());
    }
    println!();
    println!("{} shaders:", bsp.shaders.len());
    for shader in &bsp.shaders {
        println!("  {:08x} {:08x}  {}", shader.surface_flags, shader.content_flags, shader.name);
    }
    Ok(())
}

fn do_formats() -> Result<()> {
    for format in BSP_FORMATS.iter() {
        println!("{:8}  {}  (version {}, shaders in {})", format.name, format.game_name, format.version, format.shader_dir);
    }
    Ok(())
}
