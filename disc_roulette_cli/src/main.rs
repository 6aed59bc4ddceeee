use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use disc_roulette_core::{
    pick_item, OsRandom, RandomSource, RouletteError, SeededRandom, SelectableItemStore,
    SpinAnimation, SpinRecord, SpinSequencer, UniformPicker, ITEM_ANIMATION, REEL_ANIMATION,
};
use disc_roulette_shared::SpinView;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod storage;

use storage::FileStorage;

type Picker = UniformPicker<Box<dyn RandomSource>>;

#[derive(Parser)]
#[command(name = "disc-roulette", about = "Reel-position and machine roulettes for slot players")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Directory holding the machine list, default <data dir>/disc-roulette
    #[arg(long, value_parser, env = "DISC_ROULETTE_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Seed for a reproducible run instead of OS randomness
    #[arg(long, env = "DISC_ROULETTE_SEED")]
    seed: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin a plain reel pair (21 or 20 positions)
    Spin {
        #[arg(long, default_value_t = 21, value_parser = parse_reel)]
        reel: u32,
        /// Flicker through positions before settling
        #[arg(long)]
        animate: bool,
    },
    /// Run one grouped 21-position session (groups A, B, C)
    Grouped {
        /// Spins to attempt; a fourth shows the cap being refused
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=4))]
        spins: u8,
        /// Export the session history to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        animate: bool,
    },
    /// Manage the machine list and draw from the checked machines
    Machines {
        #[command(subcommand)]
        action: MachineAction,
    },
}

#[derive(Subcommand)]
enum MachineAction {
    List,
    Add { name: String },
    Remove { index: usize },
    Check { index: usize },
    Uncheck { index: usize },
    Pick {
        #[arg(long)]
        animate: bool,
    },
}

/// The reel pair being spun plus the picker feeding it.
struct ReelSession {
    reel: SpinSequencer,
    picker: Picker,
}

fn parse_reel(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(n @ (20 | 21)) => Ok(n),
        _ => Err(format!("reel must be 20 or 21, got {s}")),
    }
}

fn make_picker(seed: Option<&str>) -> Picker {
    let rng: Box<dyn RandomSource> = match seed {
        Some(seed) => {
            let rng = SeededRandom::new(seed, "disc-roulette", 0);
            info!(seed_hash = %rng.server_seed_hash_hex(), "seeded run");
            Box::new(rng)
        }
        None => Box::new(OsRandom::new()),
    };
    UniformPicker::new(rng)
}

fn open_store(data_dir: Option<PathBuf>) -> anyhow::Result<SelectableItemStore<FileStorage>> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|d| d.join("disc-roulette"))
            .context("no data directory on this platform, pass --data-dir")?,
    };
    let storage = FileStorage::new(dir);
    info!(dir = %storage.dir().display(), "opening machine list");
    let store = SelectableItemStore::open(storage).context("machine list could not be loaded")?;
    Ok(store)
}

fn spin_line(record: &SpinRecord) -> String {
    let view = SpinView::from(record);
    let reels = format!("左 {}  右 {}", view.left_text(), view.right_text());
    match &view.group_label {
        Some(label) => format!("[{label}] {reels}"),
        None => reels,
    }
}

fn flicker(line: &str, animation: SpinAnimation) {
    print!("\r{line:<48}");
    let _ = std::io::stdout().flush();
    thread::sleep(Duration::from_millis(u64::from(animation.interval_ms)));
}

fn spin_session(session: &mut ReelSession, animate: bool) -> Result<SpinRecord, RouletteError> {
    if !animate {
        return session.reel.spin(&mut session.picker);
    }
    let record = REEL_ANIMATION.run(
        session,
        |s, _| {
            if let Ok(frame) = s.reel.preview(&mut s.picker) {
                flicker(&spin_line(&frame), REEL_ANIMATION);
            }
        },
        |s| s.reel.spin(&mut s.picker),
    );
    print!("\r{:<48}\r", "");
    record
}

/// Prompts for conditions the user can fix; anything else propagates.
fn prompt(err: RouletteError) -> anyhow::Result<()> {
    match err {
        RouletteError::InvalidArgument(reason) => {
            eprintln!("{reason}");
            Ok(())
        }
        RouletteError::SpinLimitExceeded { limit } => {
            eprintln!("{limit}回転まで記録済みです。履歴をクリアしてください");
            Ok(())
        }
        RouletteError::OutOfRange { index, len } => {
            eprintln!("{index}番の機種はありません（登録数 {len}）");
            Ok(())
        }
        other => Err(other.into()),
    }
}

fn export_csv(path: &Path, history: &[SpinRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["ts", "spin", "group", "left", "right"])?;
    let ts = Utc::now().to_rfc3339();
    for (i, record) in history.iter().enumerate() {
        wtr.write_record(&[
            ts.clone(),
            (i + 1).to_string(),
            record.group_label.clone().unwrap_or_default(),
            record.left.to_string(),
            record.right.to_string(),
        ])?;
    }
    wtr.flush()?;
    println!("Exported {} spins to {}", history.len(), path.display());
    Ok(())
}

fn run_machines(
    store: &mut SelectableItemStore<FileStorage>,
    action: MachineAction,
    picker: &mut Picker,
) -> anyhow::Result<()> {
    let outcome = match action {
        MachineAction::List => {
            if store.is_empty() {
                println!("機種が登録されていません");
            }
            for (i, item) in store.list().iter().enumerate() {
                let mark = if item.selected { "x" } else { " " };
                println!("{i:>3} [{mark}] {}", item.name);
            }
            Ok(())
        }
        MachineAction::Add { name } => store.add(&name).map_err(|err| match err {
            RouletteError::InvalidArgument(_) => {
                RouletteError::InvalidArgument("機種名を入力してください".into())
            }
            other => other,
        }),
        MachineAction::Remove { index } => store.remove(index).map(|removed| {
            println!("削除: {}", removed.name);
        }),
        MachineAction::Check { index } => store.set_selected(index, true),
        MachineAction::Uncheck { index } => store.set_selected(index, false),
        MachineAction::Pick { animate } => {
            let picked = if animate {
                let names: Vec<String> = store
                    .selected_subset()
                    .iter()
                    .map(|item| item.name.clone())
                    .collect();
                let picked = ITEM_ANIMATION.run(
                    picker,
                    |p, _| {
                        if let Ok(name) = p.pick_from(&names) {
                            flicker(name, ITEM_ANIMATION);
                        }
                    },
                    |p| pick_item(store, p),
                );
                print!("\r{:<48}\r", "");
                picked
            } else {
                pick_item(store, picker)
            };
            picked
                .map(|item| println!("{}", item.name))
                .map_err(|err| match err {
                    RouletteError::InvalidArgument(_) => {
                        RouletteError::InvalidArgument("少なくとも1機種は選択してください".into())
                    }
                    other => other,
                })
        }
    };
    outcome.or_else(prompt)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let mut picker = make_picker(cli.seed.as_deref());

    match cli.command {
        Commands::Spin { reel, animate } => {
            let sequencer = if reel == 20 {
                SpinSequencer::disc20()
            } else {
                SpinSequencer::disc21()
            };
            let mut session = ReelSession {
                reel: sequencer,
                picker,
            };
            match spin_session(&mut session, animate) {
                Ok(record) => println!("{}", spin_line(&record)),
                Err(err) => prompt(err)?,
            }
        }
        Commands::Grouped {
            spins,
            csv,
            animate,
        } => {
            let mut session = ReelSession {
                reel: SpinSequencer::grouped21(),
                picker,
            };
            for _ in 0..spins {
                match spin_session(&mut session, animate) {
                    Ok(record) => println!("{}", spin_line(&record)),
                    Err(err) => {
                        prompt(err)?;
                        break;
                    }
                }
            }
            if let Some(path) = csv {
                export_csv(&path, session.reel.history())?;
            }
        }
        Commands::Machines { action } => {
            let mut store = open_store(cli.data_dir)?;
            run_machines(&mut store, action, &mut picker)?;
        }
    }

    Ok(())
}
