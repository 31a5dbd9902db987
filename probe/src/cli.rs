use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use simplelog::LevelFilter;

use probe_core::DEFAULT_BASE_URL;

use crate::batch::DEFAULT_BATCH_COUNT;

/// Manual smoke-test probe for the supermarket Communication API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the Communication API
    #[arg(long, env = "PROBE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds; requests wait forever when unset
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Exit non-zero if any batch unit fails or answers outside 2xx
    #[arg(long)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// The smoke run when no subcommand was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Smoke)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cluster probe on partition 0, then a batch of 10 triple-cart purchases
    Smoke,

    /// GET the service details of one backend partition
    Cluster {
        #[arg(long, default_value_t = 0)]
        partition_id: i64,
    },

    /// GET the partition serving a category
    Node {
        #[arg(long)]
        category: String,
    },

    /// GET every category the cluster knows
    Categories,

    /// POST a cart to the stock check
    VerifyStock(CartArgs),

    /// POST one purchase
    Purchase(CartArgs),

    /// POST the same purchase COUNT times in parallel
    Batch {
        #[arg(long, default_value_t = DEFAULT_BATCH_COUNT)]
        count: usize,

        #[command(flatten)]
        cart: CartArgs,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CartArgs {
    /// Built-in cart to send
    #[arg(long, value_enum, conflicts_with = "cart_file")]
    pub cart: Option<CartPreset>,

    /// JSON file holding an array of products
    #[arg(long, value_name = "PATH")]
    pub cart_file: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPreset {
    /// One loaf of bread
    Single,
    /// One product per partition
    Triple,
}
