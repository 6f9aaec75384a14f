use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use inx_nls::{Decoder, Encoding};
use inx_script::InxScript;

mod config;
mod render;

use crate::config::{level_from_verbosity, DumpConfig, OutputFormat, Table};

/// Dump the declarations stored in an INX compiled script
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Compiled script, e.g. setup.inx
    input: PathBuf,

    /// Write here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Text encoding of names: latin1, utf8, sjis, gbk, gb18030
    #[arg(short, long, default_value = "latin1")]
    lang: Encoding,

    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = Table::ALL)]
    tables: Vec<Table>,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Args> for DumpConfig {
    fn from(args: Args) -> Self {
        DumpConfig {
            input: args.input,
            output: args.output,
            format: args.format,
            encoding: args.lang,
            tables: args.tables,
            log_level: level_from_verbosity(args.verbose),
        }
    }
}

fn run(config: &DumpConfig) -> Result<()> {
    let bytes = std::fs::read(&config.input)
        .with_context(|| format!("read {:?}", config.input))?;
    log::info!("{:?}: {} bytes", config.input, bytes.len());

    let nls = Decoder::new(config.encoding);
    let script = InxScript::decode_tables(&bytes, &nls, &config.table_kinds())
        .with_context(|| format!("decode header of {:?}", config.input))?;

    let mut writer: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    match config.format {
        OutputFormat::Text => render::render_text(&mut writer, &script, config, &nls)?,
        OutputFormat::Yaml => serde_yaml::to_writer(&mut writer, &script)?,
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let config = DumpConfig::from(Args::parse());
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.to_string()),
    )
    .init();

    run(&config)
}
