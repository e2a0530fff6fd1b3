use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use prep_core::error::MalformedToken;
use prep_core::codec::QUERY_PARAM;
use prep_core::*;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spmc")]
#[command(about = "SPMC bowel preparation dosing schedule", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA time zone for the procedure time, e.g. Asia/Riyadh
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the base URL of share links
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a schedule from patient details
    New {
        /// Patient name
        #[arg(long)]
        name: String,

        /// Procedure date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Procedure time (h:mm AM|PM or HH:MM)
        #[arg(long)]
        time: String,

        /// Number of sachets (2, 3 or 4)
        #[arg(long)]
        sachets: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the schedule carried by a share link or token
    Open {
        /// Full share link, query string or bare token
        link: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write patient instruction documents for a share link or token
    Document {
        /// Full share link, query string or bare token
        link: String,

        /// Document language(s); defaults to the configured list
        #[arg(long, value_enum)]
        lang: Option<LangChoice>,

        /// Output directory; defaults to the configured one
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the selectable procedure times
    Times,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Print the schedule as JSON
    #[arg(long, conflicts_with = "message")]
    json: bool,

    /// Print the message text for sharing by chat or email
    #[arg(long)]
    message: bool,

    /// Language for timeline labels and dates
    #[arg(long, default_value = "en")]
    lang: Language,
}

#[derive(Clone, Copy, ValueEnum)]
enum LangChoice {
    En,
    Ar,
    Both,
}

impl LangChoice {
    fn languages(self) -> Vec<Language> {
        match self {
            LangChoice::En => vec![Language::En],
            LangChoice::Ar => vec![Language::Ar],
            LangChoice::Both => Language::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    prep_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.share.base_url = base_url;
    }

    // Flag beats config; neither means the system zone
    match cli.tz.or_else(|| config.display.timezone.clone()) {
        Some(name) => {
            let tz: chrono_tz::Tz = name
                .parse()
                .map_err(|e| Error::Config(format!("Unknown time zone {:?}: {}", name, e)))?;
            tracing::debug!("Using time zone {}", tz);
            run(cli.command, &config, &tz)
        }
        None => run(cli.command, &config, &Local),
    }
}

fn run<Tz>(command: Commands, config: &Config, tz: &Tz) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match command {
        Commands::New {
            name,
            date,
            time,
            sachets,
            output,
        } => cmd_new(name, date, time, sachets, &output, config, tz),
        Commands::Open { link, output } => cmd_open(&link, &output, config, tz),
        Commands::Document { link, lang, out } => cmd_document(&link, lang, out, config, tz),
        Commands::Times => {
            for option in time_options() {
                println!("{}", option);
            }
            Ok(())
        }
    }
}

fn cmd_new<Tz>(
    name: String,
    date: String,
    time: String,
    sachets: String,
    output: &OutputArgs,
    config: &Config,
    tz: &Tz,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    // Unparseable times go through as typed so the validator reports them
    // alongside any other field errors
    let time = match to_24_hour(&time) {
        Ok(normalized) => normalized,
        Err(e) => {
            tracing::debug!("{}, validating as typed", e);
            time
        }
    };

    let raw = RawScheduleInput {
        patient_name: Some(name),
        procedure_date: Some(date),
        procedure_time: Some(time),
        sachets: Some(sachets),
    };

    let state = match ViewState::submit(&raw, tz) {
        Ok(state) => state,
        Err(errors) => {
            eprintln!("Please correct the following:");
            print_field_errors(&errors);
            return Err(errors.into());
        }
    };

    print_schedule(&state, output, config)
}

fn cmd_open<Tz>(link: &str, output: &OutputArgs, config: &Config, tz: &Tz) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let state = open_link(link, tz)?;
    print_schedule(&state, output, config)
}

fn cmd_document<Tz>(
    link: &str,
    lang: Option<LangChoice>,
    out: Option<PathBuf>,
    config: &Config,
    tz: &Tz,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let state = open_link(link, tz)?;
    let Some(schedule) = state.schedule() else {
        return Ok(());
    };

    let languages = lang.map_or_else(|| config.documents.languages.clone(), |l| l.languages());
    let out_dir = out.unwrap_or_else(|| config.documents.output_dir.clone());

    // Render everything before touching the disk
    let documents = render_all(&TextDocumentRenderer, schedule, &languages)?;

    std::fs::create_dir_all(&out_dir)?;
    for document in documents {
        let path = out_dir.join(&document.file_name);
        std::fs::write(&path, &document.bytes)?;
        tracing::info!("Wrote {} document to {:?}", document.language, path);
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}

/// Open a full link, a query string or a bare token. Only ever returns a
/// state that is showing a schedule.
fn open_link<Tz: TimeZone>(link: &str, tz: &Tz) -> Result<ViewState<Tz>> {
    let link = link.trim();
    let query = if link.contains('?') || token_from_query(link).is_some() {
        link.to_string()
    } else {
        format!("?{}={}", QUERY_PARAM, link)
    };

    let opened = ViewState::from_query(&query, tz);
    let notice = opened.notice();
    match (opened.state, opened.error) {
        (_, Some(error)) => {
            if let Some(notice) = notice {
                eprintln!("Invalid link: {}", notice);
            }
            if let DecodeError::Invalid(errors) = &error {
                print_field_errors(errors);
            }
            Err(error.into())
        }
        (ViewState::Empty, None) => {
            eprintln!("Invalid link: no schedule data found.");
            Err(Error::Decode(MalformedToken::Empty.into()))
        }
        (state, None) => Ok(state),
    }
}

fn print_field_errors(errors: &ValidationErrors) {
    for error in errors.iter() {
        eprintln!("  - {}: {}", error.field, error.message);
    }
}

fn print_schedule<Tz>(state: &ViewState<Tz>, output: &OutputArgs, config: &Config) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let ViewState::Showing {
        input,
        schedule,
        token,
    } = state
    else {
        return Ok(());
    };
    let link = share_link(&config.share.base_url, input);

    if output.json {
        let value = serde_json::json!({
            "schedule": schedule,
            "token": token,
            "link": link,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if output.message {
        println!("{}", share_text(schedule));
        return Ok(());
    }

    let lang = output.lang;
    let labels = lang.labels();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", labels.title);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}: {}", labels.patient, schedule.patient_name());
    println!();

    for entry in timeline(schedule) {
        println!("  {}", entry.title(lang));
        println!("    {}", lang.format_instant(&entry.at));
        println!("    {}", entry.description(lang));
        println!();
    }

    println!("  {}", labels.footer);
    println!();
    println!("  Share link: {}", link);
    println!();

    Ok(())
}
