use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use vignette::{DemoId, Options, Viewer};

/// Browse small 3D rendering demos.
#[derive(Debug, Parser)]
#[command(name = "vignette", version)]
struct Cli {
    /// Demo to open, by name (see --list).
    demo: Option<String>,
    /// List the demos and exit.
    #[arg(long)]
    list: bool,
    /// Print the JSON schema of the options file and exit.
    #[arg(long)]
    schema: bool,
    /// TOML options file.
    #[arg(long, value_name = "PATH")]
    options: Option<PathBuf>,
    /// Initial window width in logical pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Initial window height in logical pixels.
    #[arg(long)]
    height: Option<u32>,
}

fn list_demos(out: &mut impl Write) -> io::Result<()> {
    for demo in DemoId::ALL {
        writeln!(out, "{:<20} {}", demo.name(), demo.title())?;
    }
    Ok(())
}

fn print_schema(out: &mut impl Write) -> io::Result<()> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())?;
    writeln!(out, "{schema}")
}

fn run(cli: Cli) -> Result<(), vignette::VignetteError> {
    if cli.list {
        return list_demos(&mut io::stdout().lock()).map_err(Into::into);
    }
    if cli.schema {
        return print_schema(&mut io::stdout().lock()).map_err(Into::into);
    }

    let mut options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(width) = cli.width {
        options.window.width = width;
    }
    if let Some(height) = cli.height {
        options.window.height = height;
    }
    if let Some(name) = &cli.demo {
        let demo: DemoId = name.parse()?;
        options.window.start_demo = Some(demo.name().to_owned());
    }

    Viewer::builder().with_options(options).build().run()
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
