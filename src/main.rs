//! CLI entry point for `letterdesk`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use letterdesk::audio::{AudioController, CommandPlayer};
use letterdesk::config::{self, Config};
use letterdesk::desk::Desk;
use letterdesk::i18n;
use letterdesk::ledger::query::{ArchiveFilter, ArchiveQuery, SortOrder};
use letterdesk::ledger::store::{FileStore, MemoryStore};
use letterdesk::ledger::ActionLedger;
use letterdesk::model::letter::Letter;
use letterdesk::reveal::config::RevealMode;
use letterdesk::source::{self, LetterSource};
use letterdesk::tui::app::App;
use letterdesk::tui::theme::{self, ThemeName};

#[derive(Parser)]
#[command(name = "letterdesk", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Letters endpoint URL or JSON file
    #[arg(long, global = true, value_name = "URL|FILE", env = "LETTERDESK_SOURCE")]
    source: Option<String>,

    /// Reveal mode: scratch, hover or click
    #[arg(long, global = true, value_name = "MODE")]
    mode: Option<String>,

    /// Theme: paper, night or rose
    #[arg(long, global = true, value_name = "THEME")]
    theme: Option<String>,

    /// Keep the ledger in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the desk in the TUI
    Open,
    /// List opened letters
    List {
        #[arg(long)]
        json: bool,
        #[arg(long, value_name = "TAG", conflicts_with = "favorites")]
        tag: Option<String>,
        #[arg(long)]
        favorites: bool,
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
        #[arg(long, value_name = "ORDER", default_value = "newest")]
        sort: String,
    },
    /// Show ledger statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    // Check --lang flag in raw args
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return lang;
            }
        }
        if let Some(lang) = arg
            .strip_prefix("--lang=")
            .and_then(i18n::Lang::from_code)
        {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command();
    cmd = cmd
        .about(i18n::app_about())
        .long_about(i18n::app_long_about())
        .after_help(i18n::app_after_help())
        .mut_arg("source", |a| a.help(i18n::help_source()))
        .mut_arg("mode", |a| a.help(i18n::help_mode()))
        .mut_arg("theme", |a| a.help(i18n::help_theme()))
        .mut_arg("ephemeral", |a| a.help(i18n::help_ephemeral()))
        .mut_arg("verbose", |a| a.help(i18n::help_verbose()))
        .mut_arg("lang", |a| a.help(i18n::help_lang()));

    // Localize subcommands
    let subcommands: Vec<clap::Command> = cmd
        .get_subcommands()
        .map(|sub| {
            let mut s = sub.clone();
            match s.get_name() {
                "open" => { s = s.about(i18n::help_cmd_open()); }
                "list" => {
                    s = s
                        .about(i18n::help_cmd_list())
                        .mut_arg("json", |a| a.help(i18n::help_output_json()))
                        .mut_arg("tag", |a| a.help(i18n::help_filter_tag()))
                        .mut_arg("favorites", |a| a.help(i18n::help_favorites()))
                        .mut_arg("search", |a| a.help(i18n::help_search()))
                        .mut_arg("sort", |a| a.help(i18n::help_sort()));
                }
                "stats" => {
                    s = s
                        .about(i18n::help_cmd_stats())
                        .mut_arg("json", |a| a.help(i18n::help_output_json()));
                }
                "completions" => { s = s.about(i18n::help_cmd_completions()); }
                "manpage" => { s = s.about(i18n::help_cmd_manpage()); }
                _ => {}
            }
            s
        })
        .collect();

    // Replace subcommands
    for sub in subcommands {
        cmd = cmd.mut_subcommand(sub.get_name(), |_| sub.clone());
    }

    cmd
}

fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    let lang = detect_lang_early();
    i18n::set_lang(lang);

    // Build localized command and parse
    let cmd = build_localized_command();
    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    // Load configuration
    let config = config::load_config();

    // Configure logging; the TUI owns the terminal, so it only logs to file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let interactive = matches!(cli.command, None | Some(Commands::Open));
    setup_logging(log_level, &config, !interactive);

    match &cli.command {
        None | Some(Commands::Open) => cmd_open(&cli, config),
        Some(Commands::List {
            json,
            tag,
            favorites,
            search,
            sort,
        }) => {
            let sort = SortOrder::from_name(sort)
                .ok_or_else(|| anyhow::anyhow!("{}: '{sort}'", i18n::err_bad_sort()))?;
            let filter = match (tag, favorites) {
                (_, true) => ArchiveFilter::Favorites,
                (Some(tag), false) => ArchiveFilter::Tag(tag.clone()),
                (None, false) => ArchiveFilter::All,
            };
            let query = ArchiveQuery {
                search: search.clone().unwrap_or_default(),
                filter,
                sort,
            };
            cmd_list(&cli, &config, &query, *json)
        }
        Some(Commands::Stats { json }) => cmd_stats(&cli, &config, *json),
        Some(Commands::Completions { shell }) => cmd_completions(*shell),
        Some(Commands::Manpage) => cmd_manpage(),
    }
}

/// Set up tracing with an optional stderr layer and file logging.
fn setup_logging(level: &str, config: &Config, to_stderr: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = to_stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    let file_layer = std::fs::create_dir_all(&log_dir).is_ok().then(|| {
        let file_appender = tracing_appender::rolling::never(&log_dir, "letterdesk.log");
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

/// Resolve the letter source from the command line, then the config file.
fn resolve_source(cli: &Cli, config: &Config) -> anyhow::Result<LetterSource> {
    let location = cli
        .source
        .as_deref()
        .or(config.source.location.as_deref())
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{}", i18n::err_no_source()))?;
    Ok(LetterSource::parse(location))
}

/// Open the ledger: the file under the data directory, or memory only.
fn open_ledger(cli: &Cli, config: &Config) -> (ActionLedger, Option<PathBuf>) {
    if cli.ephemeral {
        return (ActionLedger::load(MemoryStore::new()), None);
    }
    let path = config::ledger_path(config);
    tracing::debug!(path = %path.display(), "Opening ledger");
    (ActionLedger::load(FileStore::new(&path)), Some(path))
}

/// Run the interactive desk.
fn cmd_open(cli: &Cli, mut config: Config) -> anyhow::Result<()> {
    let source = resolve_source(cli, &config)?;

    if let Some(mode) = &cli.mode {
        if RevealMode::from_name(mode).is_none() {
            anyhow::bail!("{}: '{mode}'", i18n::err_bad_mode());
        }
        config.reveal.mode = mode.clone();
    }
    let reveal = config.reveal.to_reveal_config()?;

    let theme_name = cli.theme.as_deref().unwrap_or(&config.display.theme);
    let theme_name = ThemeName::from_name(theme_name)
        .ok_or_else(|| anyhow::anyhow!("{}: '{theme_name}'", i18n::err_bad_theme()))?;
    theme::set_theme(theme_name);
    let reveal_delay = config
        .display
        .animation_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| theme_name.reveal_delay());

    let (ledger, _) = open_ledger(cli, &config);
    let player = CommandPlayer::new(config.audio.program.clone(), config.audio.args.clone());
    let desk = Desk::new(ledger, AudioController::new(player), reveal_delay);

    tracing::info!(
        mode = reveal.mode.name(),
        theme = ?theme_name,
        ephemeral = cli.ephemeral,
        "Starting desk"
    );
    let app = App::new(desk, reveal, config.reveal.cell_pixels(), source.describe());
    letterdesk::tui::run_tui(app, Some((source, config.source.timeout())))
}

/// Fetch the letters behind a spinner.
fn fetch_with_spinner(source: &LetterSource, config: &Config) -> anyhow::Result<Vec<Letter>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("{} {}", i18n::msg_fetching(), source.describe()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = source::load_letters(source, config.source.timeout());
    pb.finish_and_clear();
    Ok(result?)
}

/// Print the opened letters matching `query`.
fn cmd_list(cli: &Cli, config: &Config, query: &ArchiveQuery, json: bool) -> anyhow::Result<()> {
    let source = resolve_source(cli, config)?;
    let letters = fetch_with_spinner(&source, config)?;
    let (ledger, _) = open_ledger(cli, config);
    let found = ledger.seen(&letters, query);

    if json {
        let items: Vec<serde_json::Value> = found
            .iter()
            .map(|&i| {
                let letter = &letters[i];
                let state = ledger.get(&letter.id);
                serde_json::json!({
                    "id": letter.id,
                    "number": letter.number,
                    "tag": letter.tag,
                    "status": state.map(|s| s.status.as_str()),
                    "seenAt": state.and_then(|s| s.seen_at).map(|t| t.timestamp_millis()),
                    "updatedAt": state.map(|s| s.updated_at.timestamp_millis()),
                    "text": letter.text,
                    "audio": letter.audio,
                })
            })
            .collect();
        let output = serde_json::json!({
            "result_count": found.len(),
            "results": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", found.len(), i18n::msg_results());
    println!();
    if found.is_empty() {
        return Ok(());
    }

    println!(
        "  {:<5} {:<14} {:<10} {:<17} {:<40}",
        "#",
        i18n::tui_col_tag(),
        i18n::tui_col_status(),
        i18n::tui_col_updated(),
        i18n::tui_col_letter()
    );
    println!("  {}", "-".repeat(90));

    for &i in &found {
        let letter = &letters[i];
        let state = ledger.get(&letter.id);
        let status = state.map(|s| s.status.as_str()).unwrap_or_default();
        let updated = state
            .map(|s| {
                s.updated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_default();
        let tag: String = letter.tag.chars().take(13).collect();

        println!(
            "  {:<5} {:<14} {:<10} {:<17} {:<40}",
            letter.number,
            tag,
            status,
            updated,
            letter.excerpt(40)
        );
    }
    println!();
    Ok(())
}

/// Print how many letters are waiting and what the ledger holds.
fn cmd_stats(cli: &Cli, config: &Config, json: bool) -> anyhow::Result<()> {
    let source = resolve_source(cli, config)?;
    let letters = fetch_with_spinner(&source, config)?;
    let (ledger, path) = open_ledger(cli, config);
    let counts = ledger.counts();
    let unseen = ledger.unseen(&letters).len();

    if json {
        let stats = serde_json::json!({
            "source": source.describe(),
            "ledger": path.as_ref().map(|p| p.to_string_lossy().to_string()),
            "letters": letters.len(),
            "unseen": unseen,
            "read": counts.read,
            "hearted": counts.hearted,
            "archived": counts.archived,
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let ledger_label = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| i18n::msg_in_memory().to_string());

    println!();
    println!("  {:<12} {}", i18n::msg_source(), source.describe());
    println!("  {:<12} {}", i18n::msg_ledger(), ledger_label);
    println!("  {:<12} {}", i18n::msg_total(), letters.len());
    println!("  {:<12} {}", i18n::msg_unseen(), unseen);
    println!("  {:<12} {}", i18n::msg_read(), counts.read);
    println!("  {:<12} {}", i18n::msg_hearted(), counts.hearted);
    println!("  {:<12} {}", i18n::msg_archived(), counts.archived);
    println!();
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "letterdesk", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
