use anyhow::{Context, Result};
use hikidoc_config::Config;
use hikidoc_engine::{Compiler, HtmlOutput};
use std::io::{Read, Write};
use std::{env, fs, io, process};

fn read_source(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut src = String::new();
            io::stdin()
                .read_to_string(&mut src)
                .context("Failed to read HikiDoc source from stdin")?;
            Ok(src)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read HikiDoc source from '{path}'")),
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [FILE]");
    eprintln!("       {program} --write-config");
    eprintln!("Reads stdin when FILE is missing or '-'.");
    eprintln!("--write-config saves the effective settings to the config file.");
    process::exit(1);
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("hikidoc", String::as_str);
    let arg = match args.len() {
        0 | 1 => None,
        2 => Some(args[1].as_str()),
        _ => usage(program),
    };
    if matches!(arg, Some("-h" | "--help")) {
        usage(program);
    }

    let config_path = Config::default_path();
    let config = Config::load_or_default(&config_path)?;

    if arg == Some("--write-config") {
        config.write_to(&config_path)?;
        log::info!("Wrote settings to {}", config_path.display());
        return Ok(());
    }

    let src = read_source(arg)?;
    let mut compiler = Compiler::new(HtmlOutput::new(config.html_options()), config.options());
    let html = compiler.compile(&src).context("Failed to compile HikiDoc source")?;

    io::stdout()
        .lock()
        .write_all(html.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}
