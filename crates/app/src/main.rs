use std::fmt;
use std::io::Write;

use services::{AppServices, Clock, QuizSessionController, TriviaApiConfig};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use trivia_core::model::{CategoryId, Difficulty, GameConfig};
use ui::vm::{
    AnswerState, ErrorTone, GameSetupVm, QuizScreenVm, QuizVm, category_options,
    difficulty_options, home_presets, map_quiz_snapshot,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCategory { raw: String },
    InvalidDifficulty { raw: String },
    InvalidAmount { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::InvalidAmount { raw } => write!(f, "invalid --amount value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--category <id>] [--difficulty <level>] [--amount <n>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://trivia.sqlite3");
    eprintln!("  without --category/--difficulty/--amount a menu offers Quick Play or Custom Game");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_DB_URL, TRIVIA_API_BASE_URL, RUST_LOG");
}

struct Args {
    db_url: String,
    setup: GameSetupVm,
    // Any game flag skips the home menu.
    custom: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("TRIVIA_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://trivia.sqlite3".into(), normalize_sqlite_url);
        let mut setup = GameSetupVm::default();
        let mut custom = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--category" => {
                    let value = require_value(args, "--category")?;
                    let id: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCategory { raw: value.clone() })?;
                    setup.set_category(Some(CategoryId::new(id)));
                    custom = true;
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    let difficulty: Difficulty = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                    setup.set_difficulty(Some(difficulty));
                    custom = true;
                }
                "--amount" => {
                    let value = require_value(args, "--amount")?;
                    let amount: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAmount { raw: value.clone() })?;
                    setup.set_amount(amount);
                    custom = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            setup,
            custom,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

//
// ─── TERMINAL IO ───────────────────────────────────────────────────────────────
//

type Input = Lines<BufReader<Stdin>>;

/// Prints `label` and reads one trimmed line. `None` on end of input.
async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

/// Reads a 1-based menu choice; empty input picks `default`.
async fn choose(
    input: &mut Input,
    label: &str,
    len: usize,
    default: usize,
) -> std::io::Result<Option<usize>> {
    loop {
        let Some(line) = prompt(input, label).await? else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(Some(default));
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("Enter a number between 1 and {len}."),
        }
    }
}

async fn pick_config(input: &mut Input) -> std::io::Result<Option<GameConfig>> {
    let presets = home_presets();
    println!();
    for (index, preset) in presets.iter().enumerate() {
        println!("  {}) {} - {}", index + 1, preset.title, preset.subtitle);
    }
    let Some(choice) = choose(input, "Choose a game [1]: ", presets.len(), 0).await? else {
        return Ok(None);
    };
    let preset = presets[choice].preset;
    if let Some(config) = preset.config() {
        return Ok(Some(config));
    }
    let mut setup = GameSetupVm::default();

    let categories = category_options();
    println!();
    for (index, option) in categories.iter().enumerate() {
        println!("  {:>2}) {}", index + 1, option.label);
    }
    let Some(choice) = choose(input, "Category [1]: ", categories.len(), 0).await? else {
        return Ok(None);
    };
    setup.set_category(categories[choice].id);

    let difficulties = difficulty_options();
    println!();
    for (index, option) in difficulties.iter().enumerate() {
        println!("  {}) {}", index + 1, option.label);
    }
    let Some(choice) = choose(input, "Difficulty [1]: ", difficulties.len(), 0).await? else {
        return Ok(None);
    };
    setup.set_difficulty(difficulties[choice].value);

    loop {
        let label = format!("Number of questions [{}]: ", setup.amount());
        let Some(line) = prompt(input, &label).await? else {
            return Ok(None);
        };
        if !line.is_empty() {
            match line.parse::<u32>() {
                Ok(amount) => setup.set_amount(amount),
                Err(_) => {
                    println!("Enter a whole number.");
                    continue;
                }
            }
        }
        match setup.build() {
            Ok(config) => {
                println!("{}", setup.summary_label());
                return Ok(Some(config));
            }
            Err(err) => println!("{err}"),
        }
    }
}

fn render(vm: &QuizVm) {
    println!();
    match &vm.screen {
        QuizScreenVm::Idle => println!("No game running."),
        QuizScreenVm::Loading => println!("Loading questions..."),
        QuizScreenVm::Error(error) => {
            let heading = match error.tone {
                ErrorTone::Warning => "Hold on",
                ErrorTone::Error => "Something went wrong",
            };
            println!("{heading}: {}", error.message);
        }
        QuizScreenVm::Question(question) => {
            println!(
                "{}   {}   {} {}",
                question.progress_label,
                question.difficulty_chip,
                vm.streak.current_label,
                vm.streak.best_label
            );
            println!("[{}]", question.category);
            println!("{}", question.prompt);
            for (index, answer) in question.answers.iter().enumerate() {
                let marker = match answer.state {
                    AnswerState::Idle => " ",
                    AnswerState::Selected => ">",
                    AnswerState::Correct => "+",
                    AnswerState::Incorrect => "x",
                };
                println!(" {marker} {}) {}", index + 1, answer.label);
            }
            if let Some(feedback) = &question.feedback {
                println!("{feedback}");
            }
        }
    }
}

async fn play(quiz: &QuizSessionController, input: &mut Input) -> std::io::Result<()> {
    loop {
        let vm = map_quiz_snapshot(&quiz.snapshot());
        render(&vm);

        match vm.screen {
            QuizScreenVm::Idle | QuizScreenVm::Loading => return Ok(()),
            QuizScreenVm::Error(_) => {
                let Some(line) = prompt(input, "r to retry, q to quit: ").await? else {
                    return Ok(());
                };
                match line.as_str() {
                    "q" => return Ok(()),
                    _ => quiz.show_current_question().await,
                }
            }
            QuizScreenVm::Question(question) if question.can_advance => {
                let Some(line) = prompt(input, "Enter for next, q to quit: ").await? else {
                    return Ok(());
                };
                if line == "q" {
                    return Ok(());
                }
                quiz.next_question().await;
            }
            QuizScreenVm::Question(question) => {
                let label = format!("Answer 1-{} (q to quit): ", question.answers.len());
                let Some(line) = prompt(input, &label).await? else {
                    return Ok(());
                };
                if line == "q" {
                    return Ok(());
                }
                let picked = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| question.answers.get(index));
                match picked {
                    Some(answer) => {
                        quiz.select_answer(answer.value.clone()).await;
                        quiz.submit_answer().await;
                    }
                    None => println!("Pick one of the listed answers."),
                }
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(log_fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let api = TriviaApiConfig::from_env()?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), &api).await?;
    info!(db = %parsed.db_url, api = %api.base_url(), "services ready");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let config = if parsed.custom {
        parsed.setup.build()?
    } else {
        match pick_config(&mut input).await? {
            Some(config) => config,
            None => return Ok(()),
        }
    };

    let quiz = services.quiz();
    quiz.start_game(config).await;
    play(&quiz, &mut input).await?;

    let best = services.streaks().best_streak().await?;
    println!();
    println!("Best streak: {best}");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
