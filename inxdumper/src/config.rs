use std::path::PathBuf;

use clap::ValueEnum;
use inx_nls::Encoding;
use inx_script::TableKind;
use log::LevelFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// typedef/struc/func listing
    #[default]
    Text,
    Yaml,
}

/// A part of the file that can be dumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Header,
    Types,
    Structs,
    Functions,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Header, Table::Types, Table::Structs, Table::Functions];

    pub fn kind(self) -> Option<TableKind> {
        match self {
            Table::Header => None,
            Table::Types => Some(TableKind::Types),
            Table::Structs => Some(TableKind::Structs),
            Table::Functions => Some(TableKind::Functions),
        }
    }
}

/// Resolved options for one dump run.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub input: PathBuf,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub encoding: Encoding,
    pub tables: Vec<Table>,
    pub log_level: LevelFilter,
}

impl DumpConfig {
    pub fn wants(&self, table: Table) -> bool {
        self.tables.contains(&table)
    }

    /// Tables the decoder has to read.
    pub fn table_kinds(&self) -> Vec<TableKind> {
        self.tables.iter().filter_map(|t| t.kind()).collect()
    }
}

/// `-v` count to log level; warnings are always shown.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
