//! CLI module - Command-line interface for Noticebot
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

pub use commands::{cmd_categories, cmd_config_init, cmd_config_show, cmd_fetch};

use clap::{Parser, Subcommand};

/// Noticebot - chat skill backend for company notice board announcements
#[derive(Parser)]
#[command(name = "noticebot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the skill HTTP server (default)
    #[command(alias = "daemon")]
    Serve,

    /// List the known notice categories and their board ids
    #[command(alias = "ls", alias = "l")]
    Categories,

    /// Fetch and print the latest notices of a category
    #[command(alias = "f")]
    Fetch {
        /// Category label, e.g. 공지사항
        #[arg(required = true)]
        label: Vec<String>,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default config.toml in the working directory if none exists
    Init,

    /// Print the effective configuration
    Show,
}
