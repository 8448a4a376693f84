use anyhow::{ensure, Context, Result};
use json_value::{DecodeOptions, Json, MAX_DEPTH_LIMIT};
use std::fs::{self, File};
use std::io::{stdin, Read, Write};
use tracing_subscriber::EnvFilter;

#[macro_use]
extern crate clap;
use clap::App;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let yaml = load_yaml!("main.yml");
    let matches = App::from_yaml(yaml).get_matches();
    let mut options = DecodeOptions::default();
    if let Some(depth) = matches.value_of("max_depth") {
        options.max_depth = depth
            .parse()
            .with_context(|| format!("invalid --max-depth `{}`", depth))?;
        ensure!(
            options.max_depth <= MAX_DEPTH_LIMIT,
            "--max-depth must be at most {}",
            MAX_DEPTH_LIMIT
        );
    }
    let compact = matches.is_present("compact");
    if let Some(path) = matches.value_of_os("json_file") {
        let input = fs::read(path)
            .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
        let result = format(&input, &options, compact)?;
        if matches.is_present("in_place") {
            let mut f = File::create(path)?;
            writeln!(f, "{}", result)?;
        } else {
            println!("{}", result);
        }
    } else {
        let mut input = Vec::new();
        stdin().lock().read_to_end(&mut input)?;
        let result = format(&input, &options, compact)?;
        println!("{}", result);
    }
    Ok(())
}

fn format(input: &[u8], options: &DecodeOptions, compact: bool) -> Result<String> {
    let v = Json::decode_with(input, options)?;
    let bytes = if compact { v.encode()? } else { v.canonical()? };
    Ok(String::from_utf8(bytes)?)
}
