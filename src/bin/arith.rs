use std::path::PathBuf;
use std::{env, fs, process};

use arithcode::cs::compression::arithmetic::{compress, decompress, Compressed};
use arithcode::{Error, Result};
use log::info;

#[derive(Clone, Copy)]
enum Action {
    Compress,
    Decompress,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        if matches!(err, Error::InvalidInput(_)) {
            print_usage();
        }
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    if args.len() != 4 {
        return Err(Error::InvalidInput(format!(
            "expected 3 arguments, got {}",
            args.len().saturating_sub(1)
        )));
    }
    let action = match args[1].as_str() {
        "compress" | "c" => Action::Compress,
        "decompress" | "d" => Action::Decompress,
        other => return Err(Error::InvalidInput(format!("unknown action '{other}'"))),
    };
    let input = PathBuf::from(&args[2]);
    let output = PathBuf::from(&args[3]);

    let data = fs::read(&input)?;
    match action {
        Action::Compress => {
            let packed = compress(&data)?;
            fs::write(&output, packed.to_bytes())?;
            info!(
                "{} -> {}: {} bytes -> {} bytes",
                input.display(),
                output.display(),
                data.len(),
                packed.encoded_len()
            );
            println!("Compression ratio: {:.2}", packed.ratio(data.len()));
        }
        Action::Decompress => {
            let packed = Compressed::from_bytes(&data)?;
            let restored = decompress(packed.header(), packed.payload())?;
            fs::write(&output, &restored)?;
            info!(
                "{} -> {}: restored {} bytes",
                input.display(),
                output.display(),
                restored.len()
            );
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: arith <action> <input> <output>");
    eprintln!("  compress   (c)  compress <input> into <output>");
    eprintln!("  decompress (d)  restore <input> into <output>");
    eprintln!("Set RUST_LOG=debug for codec diagnostics");
}
