//! A short tour of the in-memory filesystem API.
//!
//! ```sh
//! cargo run --example tour -- --flavor unix
//! ```

use std::error::Error;
use std::io::Read;

use clap::Parser;
use memfs::{AttrValue, Config, CopyOptions, Filesystem, MoveOptions};

#[derive(Parser, Debug)]
#[command(about = "Walk the memfs API against a throwaway filesystem")]
struct Args {
    /// OS flavor preset: unix, osx or windows.
    #[arg(long, default_value = "unix")]
    flavor: String,

    /// Optional TOML config file overriding the preset.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Block size in bytes.
    #[arg(long, default_value_t = 8192)]
    block_size: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_toml(&std::fs::read_to_string(path)?)?,
        None => match args.flavor.as_str() {
            "unix" => Config::unix(),
            "osx" => Config::osx(),
            "windows" => Config::windows(),
            other => return Err(format!("unknown flavor '{other}'").into()),
        },
    }
    .block_size(args.block_size)
    .attribute_views(["unix", "user"]);

    let fs = Filesystem::new(config)?;
    let sep = if args.flavor == "windows" { "\\" } else { "/" };
    let base = fs.working_directory()?.to_string();

    let file = format!("{base}{sep}greeting.txt");
    fs.write(&file, b"hello from memory")?;
    println!("wrote {} bytes to {file}", fs.metadata(&file)?.size);

    let mut reader = fs.reader(&file)?;
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    println!("read back: {contents:?}");

    let copy = format!("{base}{sep}copy.txt");
    fs.copy(&file, &copy, &CopyOptions { copy_attributes: true, ..CopyOptions::default() })?;
    let moved = format!("{base}{sep}archive.txt");
    fs.rename(&copy, &moved, &MoveOptions::default())?;

    fs.set_attribute(&moved, "user:origin", AttrValue::Bytes(b"tour".to_vec()))?;
    for (name, value) in fs.read_attributes(&moved, "basic:*")? {
        println!("basic:{name} = {value:?}");
    }

    println!("directory listing of {base}:");
    for entry in fs.read_dir(&base)? {
        let kind = if entry.is_directory { "dir" } else { "file" };
        println!("  {:>4}  {}  (key {})", kind, entry.name, entry.file_key);
    }

    println!("allocated bytes: {}", fs.allocated_bytes());
    Ok(())
}
