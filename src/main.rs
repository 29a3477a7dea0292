#![deny(warnings)]

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use bitgrid::codec::Radix;
use bitgrid::script::parse_line;
use bitgrid::{EditorConfig, EditorEvent, EditorSession, GridError, Outcome};

#[derive(Parser)]
#[command(name = "bitgrid", about = "Headless monochrome bitmap editor")]
struct Cli {
    /// JSON file with editor settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the grid as # and . rows when done
    #[arg(long, global = true)]
    preview: bool,

    /// Write the final grid to a PNG file
    #[arg(long, global = true)]
    png: Option<PathBuf>,

    /// Image pixels per cell for --png
    #[arg(long, global = true, default_value_t = 8)]
    scale: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum RadixArg {
    Hex,
    Binary,
}

impl From<RadixArg> for Radix {
    fn from(radix: RadixArg) -> Self {
        match radix {
            RadixArg::Hex => Radix::Hex,
            RadixArg::Binary => Radix::Binary,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Replays an event script ("-" reads stdin) and prints the code
    Replay { script: PathBuf },

    /// Imports a bitmap array, transforms it and prints it again
    Convert {
        /// File with the array code, "-" reads stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        #[arg(long)]
        width: u16,

        #[arg(long)]
        height: u16,

        /// Number of clockwise quarter turns
        #[arg(long, default_value_t = 0)]
        rotate: u8,

        #[arg(long)]
        flip_h: bool,

        #[arg(long)]
        flip_v: bool,

        #[arg(long)]
        invert: bool,

        #[arg(long, value_enum)]
        radix: Option<RadixArg>,
    },
}

fn read_input(path: &Path) -> Result<String, GridError> {
    let result = if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };

    result.map_err(|e| {
        GridError::Config(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Replays the script. Errors raised by single events are reported and the
/// replay goes on, the same way an interface would show a message and keep
/// running.
fn replay(session: &mut EditorSession, script: &str) -> Result<(), GridError> {
    for (index, text) in script.lines().enumerate() {
        let Some(event) = parse_line(index + 1, text)? else {
            continue;
        };

        match session.dispatch(event) {
            Ok(Outcome::CodeCopied(code)) => println!("{}", code),
            Ok(outcome) => info!("line {}: {:?}", index + 1, outcome),
            Err(e) => warn!("line {}: {}", index + 1, e),
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), GridError> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };

    let mut session = match cli.command {
        Command::Replay { script } => {
            let script = read_input(&script)?;
            let mut session = EditorSession::new(&config)?;
            replay(&mut session, &script)?;
            session
        }
        Command::Convert {
            input,
            width,
            height,
            rotate,
            flip_h,
            flip_v,
            invert,
            radix,
        } => {
            config.width = width;
            config.height = height;
            if let Some(radix) = radix {
                config.radix = radix.into();
            }

            let code = read_input(&input)?;
            let mut session = EditorSession::new(&config)?;
            session.dispatch(EditorEvent::Import(code))?;
            for _ in 0..rotate % 4 {
                session.dispatch(EditorEvent::RotateClockwise)?;
            }
            if flip_h {
                session.dispatch(EditorEvent::FlipHorizontal)?;
            }
            if flip_v {
                session.dispatch(EditorEvent::FlipVertical)?;
            }
            if invert {
                session.dispatch(EditorEvent::Invert)?;
            }
            session
        }
    };

    println!("{}", session.generate_code());

    if cli.preview {
        print!("{}", session.grid());
    }
    if let Some(path) = &cli.png {
        session
            .grid()
            .write_to_png(&path.to_string_lossy(), cli.scale)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
