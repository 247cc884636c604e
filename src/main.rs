use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use textfmt::config::Config;
use textfmt::format;
use textfmt::limit::string_limit;
use textfmt::storage::{Database, TableCheck};
use textfmt::unique::{make_unique, unique_slug, Condition};

#[derive(Parser, Debug)]
#[command(name = "textfmt", version, about = "Format text for display: truncate, slug, money, phone, dates")]
struct Args {
    /// Config file (default: ~/.config/textfmt/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Truncate text to a word or character budget, keeping HTML tags intact
    Limit {
        /// Text to limit (read from stdin when omitted)
        text: Option<String>,

        /// Limit to this many words
        #[arg(long, conflicts_with = "chars")]
        words: Option<usize>,

        /// Limit to this many characters
        #[arg(long)]
        chars: Option<usize>,

        /// Strip tags instead of preserving them
        #[arg(long)]
        no_html: bool,

        /// Text appended when content was cut
        #[arg(long, value_name = "TEXT", conflicts_with = "no_end")]
        end: Option<String>,

        /// Append nothing when content was cut
        #[arg(long)]
        no_end: bool,

        /// Link the appended text to this URL (relative URLs use base_url)
        #[arg(long, value_name = "URL")]
        link: Option<String>,
    },

    /// Build a URI slug
    Slug {
        text: String,

        /// Maximum slug length in characters
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Find a value not yet used in a table column, adding -2, -3, ... as needed
    Unique {
        candidate: String,

        /// SQLite database file
        #[arg(long, value_name = "FILE")]
        db: PathBuf,

        #[arg(long)]
        table: String,

        /// Column to check (default from config, then "name")
        #[arg(long)]
        field: Option<String>,

        /// Row id to ignore (the record being updated)
        #[arg(long, value_name = "ID")]
        ignore_id: Option<i64>,

        #[arg(long, value_name = "N")]
        char_limit: Option<usize>,

        /// Keep the file extension last (name-2.ext)
        #[arg(long)]
        filename: bool,

        /// Ignore rows whose deleted_at is set
        #[arg(long)]
        soft_delete: bool,

        /// Extra filter as COLUMN=VALUE; VALUE may start with =, !=, <, >, <= or >=
        #[arg(long = "where", value_name = "COLUMN=VALUE")]
        conditions: Vec<Condition>,

        /// Slug the candidate before resolving
        #[arg(long)]
        slug: bool,
    },

    /// Format a money amount
    Money { value: String },

    /// Format a North-American phone number
    Phone {
        input: String,

        /// Use 11-digit style (1 (555) 123-4567)
        #[arg(long)]
        country_code: bool,
    },

    /// Format a Canadian postal code
    PostalCode {
        input: String,

        /// Omit the middle space
        #[arg(long)]
        compact: bool,
    },

    /// Format a date with the configured date format
    Date {
        date: String,

        /// Use the date-time format
        #[arg(long)]
        time: bool,

        /// strftime pattern overriding the configured one
        #[arg(long, value_name = "PATTERN")]
        format: Option<String>,
    },

    /// Describe a date relative to now ("3 minutes ago", "until tomorrow")
    Ago {
        date: String,

        /// Reference instant instead of the current local time
        #[arg(long, value_name = "DATE")]
        now: Option<String>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path.or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from '{}'", path.display())),
        None => {
            tracing::debug!("HOME not set, using default configuration");
            Ok(Config::default())
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read text from stdin")?;
    Ok(input)
}

fn parse_date_arg(input: &str) -> Result<chrono::NaiveDateTime> {
    format::parse_date(input)
        .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS", input))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the formatted value.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config)?;

    let output = match args.command {
        Command::Limit {
            text,
            words,
            chars,
            no_html,
            end,
            no_end,
            link,
        } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };

            let mut limit = config.string_limit.clone();
            if let Some(words) = words {
                limit = limit.with_words(words);
            }
            if let Some(chars) = chars {
                limit = limit.with_chars(chars);
            }
            if no_html {
                limit = limit.with_html(false);
            }
            if let Some(end) = end {
                limit = limit.with_exceeded_text(end);
            }
            if no_end {
                limit = limit.without_exceeded_text();
            }
            if let Some(link) = link {
                limit = limit.with_exceeded_link(link);
            }

            // Resolve a relative link through the config's base_url.
            let resolved = Config {
                string_limit: limit,
                ..config
            }
            .string_limit();
            tracing::debug!(mode = ?resolved.mode, html = resolved.html, "Limiting text");
            string_limit(&text, &resolved)
        }

        Command::Slug { text, limit } => format::slug(&text, limit),

        Command::Unique {
            candidate,
            db,
            table,
            field,
            ignore_id,
            char_limit,
            filename,
            soft_delete,
            conditions,
            slug,
        } => {
            let mut unique = config.unique.clone();
            if let Some(field) = field {
                unique.field = field;
            }
            unique.ignore_id = ignore_id.or(unique.ignore_id);
            unique.char_limit = char_limit.or(unique.char_limit);
            unique.filename |= filename;
            unique.soft_delete |= soft_delete;
            unique.matching_values.extend(conditions);

            let db_path = db.to_string_lossy();
            let database = Database::open(&db_path)
                .await
                .with_context(|| format!("Failed to open database '{}'", db_path))?;
            let check = TableCheck::new(database, &table)?;

            if slug {
                unique_slug(&candidate, &check, &unique).await?
            } else {
                make_unique(&candidate, &check, &unique).await?
            }
        }

        Command::Money { value } => format::money(&value, &config.money),

        Command::Phone {
            input,
            country_code,
        } => {
            let mut phone = config.phone.clone();
            if country_code {
                phone.digits = 11;
            }
            format::phone(&input, &phone)
                .with_context(|| format!("Not a phone number: '{}'", input))?
        }

        Command::PostalCode { input, compact } => format::postal_code(&input, !compact)
            .with_context(|| format!("Not a postal code: '{}'", input))?,

        Command::Date {
            date,
            time,
            format: custom,
        } => {
            let pattern = custom.unwrap_or_else(|| {
                if time {
                    config.datetime_format.clone()
                } else {
                    config.date_format.clone()
                }
            });
            format::format_date(&date, &pattern)
                .with_context(|| format!("Cannot format '{}' with '{}'", date, pattern))?
        }

        Command::Ago { date, now } => {
            let date = parse_date_arg(&date)?;
            let now = match now {
                Some(now) => parse_date_arg(&now)?,
                None => Local::now().naive_local(),
            };
            format::relative_interval_str(date, now)
        }
    };

    println!("{}", output);
    Ok(())
}
