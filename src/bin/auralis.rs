use auralis_client::{
    history::DeleteOutcome, Client, History, MixOptions, Navigation, SimulatedProgress,
    StemCollection, StemSettings, TerminalPrompt,
};
use clap::{Args, Parser, Subcommand};
use std::{collections::BTreeMap, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auralis")]
#[command(about = "Upload stems, mix them on the Auralis backend, review past mixes", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and AURALIS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show where navigating to a path would lead
    Route { path: String },

    Mix(MixArgs),

    #[command(subcommand)]
    History(HistoryCommands),
}

#[derive(Args)]
struct MixArgs {
    /// Stem files to upload; the name is the file name up to the first dot
    #[arg(short, long = "stem", required = true, num_args = 1..)]
    stems: Vec<PathBuf>,

    /// Per-stem gain in dB, as name=value
    #[arg(short, long = "gain", value_parser = parse_setting)]
    gains: Vec<(String, f32)>,

    /// Per-stem pan in [-1, 1], as name=value
    #[arg(long = "pan", value_parser = parse_setting)]
    pans: Vec<(String, f32)>,

    #[arg(long)]
    auto_gain: bool,

    /// Use the CNN gain predictor (on by default with --auto-gain)
    #[arg(long, conflicts_with = "no_cnn")]
    cnn: bool,

    #[arg(long)]
    no_cnn: bool,

    /// Download the finished mix here
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum HistoryCommands {
    List {
        /// Include the processing logs of each mix
        #[arg(long)]
        logs: bool,
    },

    Delete {
        id: i64,

        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },

    Download { id: i64, output: PathBuf },
}

fn parse_setting(s: &str) -> Result<(String, f32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{s}`"))?;
    let v: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !v.is_finite() {
        return Err(format!("`{value}` is not a finite number"));
    }
    Ok((name.trim().to_string(), v))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn run(cli: Cli) -> CliResult {
    let mut client = Client::from_env(cli.api_url.as_deref())?;
    match cli.command {
        Commands::Login { username, password } => handle_login(&mut client, &username, &password),
        Commands::Register {
            username,
            email,
            password,
        } => handle_register(&mut client, &username, &email, &password),
        Commands::Logout => {
            client.logout();
            eprintln!("👋 Logged out");
            Ok(())
        }
        Commands::Whoami => handle_whoami(&client),
        Commands::Route { path } => handle_route(&client, &path),
        Commands::Mix(args) => handle_mix(&client, args),
        Commands::History(cmd) => handle_history(&client, cmd),
    }
}

fn require_login(client: &Client) -> CliResult {
    match client.navigate("/") {
        Navigation::Admit(_) => Ok(()),
        Navigation::Redirect(to) => {
            Err(format!("not logged in; run `auralis login` first (redirected to {to})").into())
        }
    }
}

fn handle_login(client: &mut Client, username: &str, password: &str) -> CliResult {
    let next = client.login(username, password)?;
    let who = client.session().username.clone().unwrap_or_default();
    eprintln!("✅ Welcome, {who}");
    println!("{next}");
    Ok(())
}

fn handle_register(client: &mut Client, username: &str, email: &str, password: &str) -> CliResult {
    let next = client.register(username, email, password)?;
    eprintln!("✅ Account created for {username}");
    println!("{next}");
    Ok(())
}

fn handle_whoami(client: &Client) -> CliResult {
    let s = client.session();
    match (&s.token, &s.username) {
        (None, _) => eprintln!("Not logged in"),
        (Some(_), None) => eprintln!("Logged in (token does not name a user)"),
        (Some(_), Some(u)) => {
            println!("{u}");
            if let Some(exp) = s.expires_at() {
                eprintln!("Token exp: {exp} (unix seconds, not checked locally)");
            }
        }
    }
    Ok(())
}

fn handle_route(client: &Client, path: &str) -> CliResult {
    match client.navigate(path) {
        Navigation::Admit(r) => println!("admit {r}"),
        Navigation::Redirect(r) => println!("redirect {r}"),
    }
    Ok(())
}

fn handle_mix(client: &Client, args: MixArgs) -> CliResult {
    require_login(client)?;
    let api = client.api();
    let prompt = TerminalPrompt { assume_yes: false };

    for p in &args.stems {
        if !p.exists() {
            return Err(format!("Input file not found: {}", p.display()).into());
        }
    }

    let mut stems = StemCollection::new();
    let report = stems.upload(&api, &args.stems, &prompt);
    if !args.quiet {
        for name in &report.uploaded {
            eprintln!("📤 Uploaded {name}");
        }
    }

    let mut settings: BTreeMap<String, StemSettings> = BTreeMap::new();
    for (name, gain) in args.gains {
        settings.entry(name).or_default().gain = gain;
    }
    for (name, pan) in args.pans {
        settings.entry(name).or_default().pan = pan;
    }
    for (name, s) in settings {
        if !stems.update(&name, s) {
            eprintln!("⚠️  No stem named `{name}`; ignoring its settings");
        }
    }

    let use_cnn = if args.no_cnn {
        false
    } else {
        args.cnn || args.auto_gain
    };
    let opts = MixOptions {
        auto_gain: args.auto_gain,
        use_cnn,
    };

    let progress = if args.quiet {
        SimulatedProgress::new()
    } else {
        SimulatedProgress::with_callback(|pct| eprint!("\r🔄 Mixing (estimated): {pct:>3}%"))
    };
    let mut workflow = client.mix_workflow(progress);
    let outcome = workflow.submit(&api, &mut stems, opts, &prompt);
    if !args.quiet {
        eprintln!();
    }

    let result = match outcome {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", workflow.logs());
            return Err(e.into());
        }
    };

    if !args.quiet {
        eprintln!("{}", workflow.logs());
        if opts.auto_gain && result.gains.is_some() {
            eprintln!("🎚️  Gains after auto-gain:");
            for s in stems.iter() {
                eprintln!("  • {}: {:+.2} dB", s.name, s.gain);
            }
        }
        eprintln!("✅ Mix ready");
    }
    if let Some(url) = workflow.mix_url() {
        println!("{url}");
    }

    if let Some(out) = args.output {
        api.download(&result.url, &out, &download_printer(args.quiet))?;
        if !args.quiet {
            eprintln!("💾 Saved {}", out.display());
        }
    }

    Ok(())
}

fn handle_history(client: &Client, cmd: HistoryCommands) -> CliResult {
    require_login(client)?;
    let api = client.api();
    let mut history = History::new();
    history.refresh(&api);

    match cmd {
        HistoryCommands::List { logs } => {
            if history.records().is_empty() {
                eprintln!("No mix history found.");
            }
            for r in history.records() {
                println!("{}\t{}\t{}", r.id, r.timestamp, r.settings_summary);
                println!("\t{}", api.absolute(&r.output_url));
                if logs {
                    for line in r.logs.lines() {
                        println!("\t| {line}");
                    }
                }
            }
        }
        HistoryCommands::Delete { id, yes } => {
            let prompt = TerminalPrompt { assume_yes: yes };
            match history.delete(&api, id, &prompt) {
                DeleteOutcome::Deleted => eprintln!("🗑️  Deleted mix {id}"),
                DeleteOutcome::Cancelled => eprintln!("Cancelled"),
                DeleteOutcome::Failed(e) => return Err(e.into()),
            }
        }
        HistoryCommands::Download { id, output } => {
            let rec = history
                .get(id)
                .ok_or_else(|| format!("No history item with id {id}"))?;
            api.download(&rec.output_url, &output, &download_printer(false))?;
            eprintln!("💾 Saved {}", output.display());
        }
    }
    Ok(())
}

fn download_printer(quiet: bool) -> impl Fn(u64, u64) {
    move |downloaded, total| {
        if quiet {
            return;
        }
        if total > 0 {
            let percent = (downloaded as f64 / total as f64 * 100.0).round() as u64;
            eprint!(
                "\r📥 Downloading: {:>3}% ({:.2} MB / {:.2} MB)",
                percent,
                downloaded as f64 / 1_000_000.0,
                total as f64 / 1_000_000.0
            );
            if downloaded >= total {
                eprintln!();
            }
        } else {
            eprint!("\r📥 Downloading: {:.2} MB", downloaded as f64 / 1_000_000.0);
        }
    }
}
