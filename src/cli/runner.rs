//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::denest::{denest_schema, to_table_batches};
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_stream, StreamDefinition};
use crate::output::{write_table_batches, ParquetWriterConfig};
use crate::types::JsonValue;
use serde_json::json;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Schema => self.schema(),
            Commands::Flatten {
                input,
                output,
                format,
            } => self.flatten(input.as_deref(), output.as_deref(), *format),
            Commands::Validate => self.validate(),
        }
    }

    /// Load the stream definition
    fn load_stream(&self) -> Result<StreamDefinition> {
        let path = self
            .cli
            .stream
            .as_ref()
            .ok_or_else(|| Error::config("Stream file not specified (use -s flag)"))?;
        load_stream(path)
    }

    /// Print the denested table schemas as pretty JSON
    fn schema(&self) -> Result<()> {
        let stream = self.load_stream()?;
        let tables = denest_schema(&stream.schema, &stream.key_properties)?;
        println!("{}", serde_json::to_string_pretty(&tables)?);
        Ok(())
    }

    /// Flatten records into table batches and emit them
    fn flatten(
        &self,
        input: Option<&Path>,
        output: Option<&Path>,
        format: OutputFormat,
    ) -> Result<()> {
        let stream = self.load_stream()?;
        let records = read_records(input)?;
        info!(
            stream = %stream.name,
            records = records.len(),
            "flattening records"
        );

        let batches = to_table_batches(&stream.schema, &stream.key_properties, &records)?;

        match format {
            OutputFormat::Json => {
                for batch in &batches {
                    let doc = json!({
                        "table": batch.schema.path,
                        "key_properties": batch.schema.key_properties,
                        "rows": batch.rows,
                    });
                    println!("{}", serde_json::to_string(&doc)?);
                }
            }
            OutputFormat::Parquet => {
                let dir = output.ok_or_else(|| {
                    Error::config("Parquet output requires an output directory (use -o flag)")
                })?;
                let paths =
                    write_table_batches(dir, &stream.name, &batches, &ParquetWriterConfig::default())?;
                for path in paths {
                    println!("{}", path.display());
                }
            }
        }

        Ok(())
    }

    /// Validate the stream definition and report the tables it produces
    fn validate(&self) -> Result<()> {
        let stream = self.load_stream()?;
        let tables = denest_schema(&stream.schema, &stream.key_properties)?;

        println!("Stream '{}' is valid", stream.name);
        println!("  Key properties: {}", stream.key_properties.join(", "));
        println!("  Tables: {}", tables.len());
        for table in &tables {
            println!("    {} ({} columns)", table.path, table.properties.len());
        }
        Ok(())
    }
}

/// Read newline-delimited JSON records from a file, or stdin when no path is given
fn read_records(input: Option<&Path>) -> Result<Vec<JsonValue>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::FileNotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: JsonValue = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON record on line {}", number + 1))?;
        records.push(record);
    }
    Ok(records)
}
