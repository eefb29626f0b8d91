//! CLI entry point for chroma-key sprite-sheet extraction

use clap::Parser;
use spritekey::io::cli::{Cli, FileProcessor};

fn main() -> spritekey::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
