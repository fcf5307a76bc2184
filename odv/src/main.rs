use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;

use odv_edt::lookup::{CoTeachers, SubjectNames};
use odv_edt::schedule::{Schedule, DEFAULT_START_TIMES};
use odv_edt::Edt;

mod tools;

#[derive(Parser)]
#[command(author, version, about, long_about, arg_required_else_help = true)]
struct Args {
  /// Log every row and lesson, not just the totals.
  #[arg(long, short, global = true)]
  verbose: bool,
  /// `code = Display Name` lines, used as subject names and to spot unknown codes.
  #[arg(long, env = "ODV_SUBJECTS", global = true)]
  subjects: Option<PathBuf>,
  /// `Surname1, Surname2 = Surname, Given name` lines for co-taught lessons.
  #[arg(long, env = "ODV_CO_TEACHERS", global = true)]
  co_teachers: Option<PathBuf>,
  /// Start times of the lessons of a day, in order.
  #[arg(
    long,
    env = "ODV_START_TIMES",
    global = true,
    value_delimiter = ',',
    default_values_t = DEFAULT_START_TIMES.map(String::from)
  )]
  start_times: Vec<String>,
  #[command(subcommand)]
  tool: Tool,
}

#[derive(Subcommand)]
enum Tool {
  /// One HTML timetable page per class.
  #[command(arg_required_else_help = true)]
  Classes {
    input: PathBuf,
    #[arg(default_value = "orario-classi")]
    output: PathBuf,
  },
  /// The big board: every teacher's week in one sheet, plus a CSV copy.
  #[command(arg_required_else_help = true)]
  Board {
    input: PathBuf,
    #[arg(default_value = "out/full-timetable.xlsx")]
    output: PathBuf,
  },
  /// Every class's week in one sheet, plus a CSV copy.
  #[command(arg_required_else_help = true)]
  ClassBook {
    input: PathBuf,
    #[arg(default_value = "out/class-timetable.xlsx")]
    output: PathBuf,
  },
  /// Subject, class, teacher and room lookup tables.
  #[command(arg_required_else_help = true)]
  Tables {
    input: PathBuf,
    #[arg(default_value = "out")]
    output: PathBuf,
  },
}

fn main() -> anyhow::Result<ExitCode> {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(err) => {
      if is_missing_input(err.kind()) {
        Args::command().print_help()?;
      } else {
        err.print()?;
      }
      return Ok(if is_usage(err.kind()) {
        ExitCode::SUCCESS
      } else {
        ExitCode::FAILURE
      });
    }
  };

  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_max_level(if args.verbose {
      Level::DEBUG
    } else {
      Level::INFO
    })
    .init();

  let edt = edt(&args)?;

  match &args.tool {
    Tool::Classes { input, output } => tools::classes(&edt, input, output)?,
    Tool::Board { input, output } => tools::board(&edt, input, output)?,
    Tool::ClassBook { input, output } => tools::class_book(&edt, input, output)?,
    Tool::Tables { input, output } => tools::tables(&edt, input, output)?,
  }

  Ok(ExitCode::SUCCESS)
}

/// No tool or no input file, with or without other flags around.
fn is_missing_input(kind: ErrorKind) -> bool {
  matches!(
    kind,
    ErrorKind::MissingRequiredArgument | ErrorKind::MissingSubcommand
  )
}

/// Parse outcomes that only show usage and still exit successfully.
fn is_usage(kind: ErrorKind) -> bool {
  is_missing_input(kind)
    || matches!(
      kind,
      ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn edt(args: &Args) -> anyhow::Result<Edt> {
  let schedule = Schedule::new(args.start_times.as_slice())?;

  let subjects = match &args.subjects {
    Some(path) => SubjectNames::load(path)
      .with_context(|| format!("Unable to load subject names from '{}'", path.display()))?,
    None => SubjectNames::default(),
  };

  let co_teachers = match &args.co_teachers {
    Some(path) => CoTeachers::load(path)
      .with_context(|| format!("Unable to load co-teachers from '{}'", path.display()))?,
    None => CoTeachers::default(),
  };

  Ok(Edt::new(schedule, subjects, co_teachers))
}
