use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use common::toast::{Toast, ToastLevel};

mod cli;

use cli::{Cli, Op, OpContext};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &args.log_level;
        EnvFilter::new(format!("pulse={level},pulse_client={level},common={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = OpContext::new(args.config, args.remote);
    let result = args.command.execute(&ctx).await;

    // toasts raised along the way are shown whether or not the op failed
    ctx.toasts.drain().iter().for_each(print_toast);

    match result {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            report(&anyhow::Error::new(e));
            std::process::exit(1);
        }
    }
}

fn print_toast(toast: &Toast) {
    match toast.level {
        ToastLevel::Error => eprintln!("{} {}", "✗".red().bold(), toast.message),
        ToastLevel::Success => eprintln!("{} {}", "✓".green().bold(), toast.message),
        ToastLevel::Info => eprintln!("{} {}", "•".blue(), toast.message),
    }
}

/// Top-level error boundary: a generic retry hint plus the cause chain
fn report(error: &anyhow::Error) {
    eprintln!(
        "{} Something went wrong. Please try again.",
        "Error:".red().bold()
    );
    for cause in error.chain() {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }
}
