//! Add a STAT table to static fonts, in place.
//!
//! The style of each font is taken from its file name: "Italic" anywhere in
//! the name means italic, otherwise "Bold" means bold, otherwise regular.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The font files to update. Each is overwritten.
    #[arg(required = true)]
    fonts: Vec<std::path::PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    for path in &args.fonts {
        if let Err(e) = add_stat::add_stat_to_file(path) {
            eprintln!("{}: {e}", path.display());
            std::process::exit(1);
        }
        println!("Added STAT table to {}", path.display());
    }
}
