//! CryptoBridge CLI - Client cho remote cryptographic service
//!
//! Sinh password/key, mã hóa và giải mã file, hash file qua backend HTTP;
//! so sánh hash chạy hoàn toàn local.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::commands::run(cli.command)
}
