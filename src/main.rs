//! `certgen`: fill, preview and export certificates from the command line.
//!
//! # Commands
//!
//! - `preview` - Render the certificate as text, HTML, SVG or JSON
//! - `check` - Show per-field validation and the status banner
//! - `export` - Produce the PDF (raster) or hand it to a print window
//! - `sample` - Print the sample record as JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use certgen::export::banner_for;
use certgen::session::Session;
use certgen::{
    CertificateRecord, DateStyle, Field, FormPolicy, GeneratorConfig, PrintHostKind, StrategyKind,
};

#[derive(Parser)]
#[command(name = "certgen")]
#[command(about = "Generate participation certificates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the certificate preview.
    Preview {
        #[command(flatten)]
        fields: FieldArgs,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate the record; exits non-zero when required fields are empty.
    Check {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Export the certificate.
    Export {
        #[command(flatten)]
        fields: FieldArgs,

        /// raster (PDF file) or print (print dialog)
        #[arg(long, default_value = "raster")]
        strategy: StrategyKind,

        /// Directory for the produced files
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Program used to open the print document
        #[arg(long)]
        print_command: Option<String>,

        /// Print through headless Chrome instead of the desktop browser
        #[cfg(feature = "cdp")]
        #[arg(long)]
        cdp: bool,
    },

    /// Print the sample record as JSON.
    Sample,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Html,
    Svg,
    Json,
}

/// Record source and field overrides shared by every command
#[derive(Args)]
struct FieldArgs {
    /// Start from a JSON record
    #[arg(long)]
    record: Option<PathBuf>,

    #[arg(long)]
    participant: Option<String>,

    #[arg(long)]
    program: Option<String>,

    #[arg(long)]
    organization: Option<String>,

    /// ISO date (YYYY-MM-DD), not after today
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    initiative: Option<String>,

    /// Certificate type, e.g. Participation or Completion
    #[arg(long = "type")]
    certificate_type: Option<String>,

    /// Single-field variant: only the participant name is editable
    #[arg(long, conflicts_with = "policy")]
    locked: bool,

    /// Lock policy JSON file
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Wordmark above the heading; empty for none
    #[arg(long)]
    brand: Option<String>,

    #[arg(long, default_value = "long")]
    date_style: DateStyle,
}

impl FieldArgs {
    fn apply(&self, config: &mut GeneratorConfig) -> Result<()> {
        if self.locked {
            config.policy = FormPolicy::single_field(config.today());
        } else if let Some(path) = &self.policy {
            config.policy = FormPolicy::from_json_file(path)
                .with_context(|| format!("loading policy {}", path.display()))?;
        }
        if let Some(brand) = &self.brand {
            config.preview.brand = (!brand.is_empty()).then(|| brand.clone());
        }
        config.preview.date_style = self.date_style;
        Ok(())
    }

    fn edits(&self) -> Vec<(Field, &str)> {
        [
            (Field::ParticipantName, &self.participant),
            (Field::ProgramName, &self.program),
            (Field::OrganizationName, &self.organization),
            (Field::Date, &self.date),
            (Field::InitiativeName, &self.initiative),
            (Field::CertificateType, &self.certificate_type),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    /// Load the record and replay the field flags as form edits
    async fn fill(&self, session: &Session) -> Result<CertificateRecord> {
        let mut record = match &self.record {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let record: CertificateRecord = serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?;
                session.replace(record).await?
            }
            None => session.record().await?,
        };
        for (field, value) in self.edits() {
            record = session.edit(field, value).await?;
            if record.get(field) != value {
                eprintln!("{}: kept {:?}, {:?} was not accepted", field.label(), record.get(field), value);
            }
        }
        Ok(record)
    }
}

async fn open(fields: &FieldArgs, mut config: GeneratorConfig) -> Result<Session> {
    fields.apply(&mut config)?;
    let session = Session::new(config)?;
    fields.fill(&session).await?;
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { fields, format } => {
            let session = open(&fields, GeneratorConfig::default()).await?;
            let rendered = session.render().await?;
            match format {
                Format::Text => println!("{}", rendered.to_text()),
                Format::Html => println!("{}", rendered.target.html),
                Format::Svg => println!("{}", rendered.target.svg),
                Format::Json => {
                    let record = session.record().await?;
                    let status = session.status().await?;
                    let doc = serde_json::json!({
                        "record": record,
                        "heading": rendered.view.heading(),
                        "ready": status.is_ready(),
                        "exportTrigger": rendered.trigger,
                        "filename": rendered.target.artifact_filename(),
                    });
                    println!("{}", serde_json::to_string_pretty(&doc)?);
                }
            }
            session.close().await?;
        }

        Commands::Check { fields } => {
            let session = open(&fields, GeneratorConfig::default()).await?;
            for control in session.controls().await? {
                let marker = if control.required { "*" } else { "" };
                let lock = if control.locked { " (locked)" } else { "" };
                match control.error {
                    Some(err) => println!("{}{}: {:?}{}  <- {}", control.label, marker, control.value, lock, err),
                    None => println!("{}{}: {:?}{}", control.label, marker, control.value, lock),
                }
            }
            let status = session.status().await?;
            println!("\n{}", status.message());
            session.close().await?;
            if !status.is_ready() {
                std::process::exit(1);
            }
        }

        Commands::Export {
            fields,
            strategy,
            out,
            print_command,
            #[cfg(feature = "cdp")]
            cdp,
        } => {
            #[cfg(feature = "cdp")]
            let print_host = if cdp { PrintHostKind::Cdp } else { PrintHostKind::System };
            #[cfg(not(feature = "cdp"))]
            let print_host = PrintHostKind::System;
            let config = GeneratorConfig {
                strategy,
                print_host,
                output_dir: out.clone(),
                print_command,
                ..GeneratorConfig::default()
            };
            if config.print_host == PrintHostKind::System && strategy == StrategyKind::Print {
                println!("print document goes to {}", out.display());
            }

            let session = open(&fields, config).await?;
            let result = session.export().await;
            session.close().await?;
            match result {
                Ok(outcome) => match outcome.artifact {
                    Some(artifact) => {
                        std::fs::create_dir_all(&out)
                            .with_context(|| format!("creating {}", out.display()))?;
                        let path = out.join(&artifact.filename);
                        std::fs::write(&path, &artifact.bytes)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("{}", path.display());
                    }
                    None => println!("certificate handed to the print dialog"),
                },
                Err(e) => {
                    if matches!(e, certgen::Error::ValidationIncomplete(_)) {
                        eprintln!("{}", e);
                    } else {
                        eprintln!("{}", banner_for(&e));
                    }
                    return Err(e.into());
                }
            }
        }

        Commands::Sample => {
            let today = GeneratorConfig::default().today();
            println!("{}", serde_json::to_string_pretty(&CertificateRecord::sample(today))?);
        }
    }

    Ok(())
}
