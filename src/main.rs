//! lockerwatch CLI
//!
//! Import locker pickup notifications and list parcels with their storage status.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser as _, Subcommand};
use lockerwatch::{parse, render_report, status_rows, AppConfig, ParcelId, ParcelStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Track parcels waiting in delivery lockers
#[derive(clap::Parser)]
#[command(name = "lockerwatch")]
#[command(author, version, about = "Track parcels waiting in delivery lockers", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Database file (overrides configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Configuration file (defaults to ./lockerwatch.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import notification text from a file, or stdin when no file is given
    Import {
        /// File containing pasted notifications
        file: Option<PathBuf>,
    },

    /// List parcels grouped by locker with their current status
    List {
        /// Emit parcels and statuses as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one parcel by ID
    Delete {
        /// Parcel ID as shown by `list`
        id: String,

        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },

    /// Delete every parcel
    Clear {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },

    /// Manage locker free-hour settings
    Lockers {
        #[command(subcommand)]
        command: LockerCommands,
    },

    /// Copy the database to another file
    Backup {
        /// Destination file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum LockerCommands {
    /// Show configured lockers
    List,

    /// Add or update a locker
    Set {
        /// Locker name as it appears between 【】
        name: String,

        /// Free storage hours (at least 1)
        hours: u32,
    },

    /// Remove a locker
    Remove {
        name: String,

        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn require_confirmation(yes: bool, prompt: &str) -> Result<()> {
    if !yes {
        bail!("{}（使用 --yes 确认）", prompt);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load_from(cli.config.as_deref());
    let filter = log_filter_from_verbosity(cli.verbose).map_or_else(
        || {
            loaded
                .as_ref()
                .map_or_else(|_| "warn".to_string(), |c| c.log_filter.clone())
        },
        str::to_string,
    );
    init_tracing(&filter);

    let config = AppConfig::or_defaults(loaded, cli.config.as_deref())?;
    let db_path = cli.db.unwrap_or(config.database_path);
    let mut store = ParcelStore::open(&db_path)?;

    match cli.command {
        Commands::Import { file } => {
            let text = read_input(file.as_deref())?;
            if text.trim().is_empty() {
                bail!("请输入要导入的数据");
            }

            let records = parse(&text);
            if records.is_empty() {
                bail!("未能解析出有效的快递信息，请检查格式");
            }

            let count = store.append_parcels(&records)?;
            info!(count, db = %db_path.display(), "imported parcels");
            println!("成功导入 {} 条快递信息", count);
        }

        Commands::List { json } => {
            let records = store.list_parcels()?;
            let settings = store.load_settings()?;
            let now = Local::now().naive_local();

            if json {
                let rows = status_rows(&records, &settings, now);
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_report(&records, &settings, now));
            }
        }

        Commands::Delete { id, yes } => {
            let id = ParcelId::parse(&id).context(format!("Invalid parcel id: {}", id))?;
            require_confirmation(yes, "确定要删除这条快递信息吗？")?;
            if !store.delete_parcel(id)? {
                bail!("未找到快递信息: {}", id);
            }
            println!("已删除 {}", id);
        }

        Commands::Clear { yes } => {
            require_confirmation(yes, "确定要清空所有快递数据吗？此操作不可恢复！")?;
            let count = store.clear_parcels()?;
            println!("已清空 {} 条快递信息", count);
        }

        Commands::Lockers { command } => match command {
            LockerCommands::List => {
                let settings = store.load_settings()?;
                if settings.is_empty() {
                    println!("暂无快递柜设置");
                }
                for (name, hours) in settings.iter() {
                    println!("{}\t{}小时免费", name, hours);
                }
            }
            LockerCommands::Set { name, hours } => {
                store.save_setting(&name, hours)?;
                println!("已保存 {}: {}小时", name.trim(), hours);
            }
            LockerCommands::Remove { name, yes } => {
                require_confirmation(yes, &format!("确定要删除快递柜\"{}\"的设置吗？", name))?;
                if !store.delete_setting(&name)? {
                    bail!("未找到快递柜: {}", name);
                }
                println!("已删除快递柜 {}", name);
            }
        },

        Commands::Backup { path } => {
            store.backup_to(&path)?;
            let stats = store.stats()?;
            println!(
                "已备份到 {}（{} 个快递柜，{} 条快递信息）",
                path.display(),
                stats.locker_count,
                stats.parcel_count
            );
        }
    }

    Ok(())
}
