use std::{
    fs,
    path::{Path, PathBuf},
};

mod terminal;

use clap::ArgAction;
use formbridge::{FormOutput, FormRepository, JsonSource, TransformError, convert_form};
use indicatif::ProgressBar;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Convert forms from a legacy dump into declarative form files
    Convert(Convert),

    /// List the forms in a legacy dump
    List(List),

    /// Validate that every form in a dump converts cleanly
    Check(Check),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Convert(command) => command.run(),
            Self::List(command) => command.run(),
            Self::Check(command) => command.run(),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Convert {
    /// Path to the JSON dump of the legacy form tables
    dump: PathBuf,

    /// Directory to write the converted forms into
    #[arg(short, long, default_value = "converted")]
    out: PathBuf,

    /// Convert only this form id
    #[arg(long)]
    form: Option<u64>,
}

impl Convert {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let source = JsonSource::load(&self.dump)?;
        if !source.has_conditional_actions() {
            eprintln!(
                "{}",
                "source schema predates conditional actions; nothing converted".warning()
            );
            return Ok(());
        }

        let ids = match self.form {
            Some(nid) => vec![nid],
            None => source.form_ids(),
        };
        fs::create_dir_all(&self.out)?;

        let bar = ProgressBar::new(ids.len().try_into().unwrap_or(u64::MAX));
        let results: Vec<(u64, Result<FormOutput, TransformError>)> = ids
            .par_iter()
            .map(|&nid| {
                let result = convert_form(&source, nid);
                bar.inc(1);
                (nid, result)
            })
            .collect();
        bar.finish_and_clear();

        let mut converted = 0usize;
        let mut failed = 0usize;
        for (nid, result) in results {
            match result {
                Ok(output) => {
                    let dir = write_form(&self.out, &output)?;
                    converted += 1;
                    println!("{}", format!("✅ form {nid} → {}", dir.display()).success());
                }
                Err(err) => {
                    failed += 1;
                    eprintln!("{}", format!("⚠️  form {nid}: {err}").warning());
                }
            }
        }

        println!(
            "{}",
            format!("{converted} form(s) converted, {failed} failed").dim()
        );
        if failed > 0 {
            std::process::exit(2);
        }
        Ok(())
    }
}

/// Writes one converted form into its own subdirectory, named after the
/// form's machine name.
fn write_form(out: &Path, output: &FormOutput) -> anyhow::Result<PathBuf> {
    let name = if output.settings.machine_name.is_empty() {
        format!("webform_{}", output.nid)
    } else {
        output.settings.machine_name.clone()
    };
    let dir = out.join(name);
    fs::create_dir_all(&dir)?;

    fs::write(dir.join("elements.yml"), &output.elements)?;
    fs::write(
        dir.join("handlers.json"),
        serde_json::to_string_pretty(&output.handlers)?,
    )?;
    fs::write(
        dir.join("access.json"),
        serde_json::to_string_pretty(&output.access)?,
    )?;
    fs::write(
        dir.join("settings.json"),
        serde_json::to_string_pretty(&output.settings)?,
    )?;
    Ok(dir)
}

#[derive(Debug, clap::Parser)]
pub struct List {
    /// Path to the JSON dump of the legacy form tables
    dump: PathBuf,
}

impl List {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let source = JsonSource::load(&self.dump)?;

        let mut ids = source.form_ids();
        ids.sort_unstable();
        for nid in ids {
            if let Some(form) = source.form(nid) {
                println!(
                    "{nid}\t{}\t{} component(s)",
                    if form.title.is_empty() {
                        "(untitled)"
                    } else {
                        &form.title
                    },
                    form.components.len()
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Check {
    /// Path to the JSON dump of the legacy form tables
    dump: PathBuf,
}

impl Check {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let source = JsonSource::load(&self.dump)?;
        let ids = source.form_ids();

        let mut failures: Vec<(u64, TransformError)> = ids
            .par_iter()
            .filter_map(|&nid| convert_form(&source, nid).err().map(|err| (nid, err)))
            .collect();
        failures.sort_by_key(|(nid, _)| *nid);

        if failures.is_empty() {
            println!(
                "{}",
                format!("✅ all {} form(s) convert cleanly", ids.len()).success()
            );
            return Ok(());
        }

        for (nid, err) in &failures {
            eprintln!("{}", format!("⚠️  form {nid}: {err}").warning());
        }
        eprintln!(
            "{}",
            format!("{} of {} form(s) failed", failures.len(), ids.len()).warning()
        );
        std::process::exit(2);
    }
}
