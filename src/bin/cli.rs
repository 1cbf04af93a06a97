//! boardwire CLI Client
//!
//! Command-line interface for talking to a board game server.

use std::process::ExitCode;

use boardwire::{Client, Config, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// boardwire CLI
#[derive(Parser, Debug)]
#[command(name = "boardc")]
#[command(about = "CLI for the line-based board game protocol")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "1312")]
    port: u16,

    /// Connect timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Status line read timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Command write timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the next full status line
    Status,

    /// Print the next board snapshot
    Board,

    /// Print the board width
    Width,

    /// Print the board height
    Height,

    /// Print the marker assigned to this client
    Id,

    /// Place a stone, then print the next status line
    Put {
        /// Column
        #[arg(allow_negative_numbers = true)]
        x: i64,

        /// Row
        #[arg(allow_negative_numbers = true)]
        y: i64,
    },

    /// Log in, then print the next status line
    Login {
        user: String,
        password: String,
    },

    /// Print status lines as they arrive
    Watch {
        /// Stop after this many lines (0 runs until the server disconnects)
        #[arg(short, long, default_value = "0")]
        count: usize,
    },
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,boardwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    tracing::debug!("Connecting to {}", config.addr());

    let mut client: Client = Client::new(config);
    let outcome = client
        .connect()
        .and_then(|()| run(&mut client, &args))
        .and_then(|()| client.disconnect());

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(client: &mut Client, args: &Args) -> Result<()> {
    match &args.command {
        Commands::Status => emit(args, &client.read_status()?),
        Commands::Board => {
            let board = client.query_board()?;
            if args.json {
                emit(args, &board);
            } else {
                for row in board.rows() {
                    println!("{}", row.into_iter().collect::<String>());
                }
            }
        }
        Commands::Width => emit(args, &client.query_width()?),
        Commands::Height => emit(args, &client.query_height()?),
        Commands::Id => emit(args, &client.query_identity()?),
        Commands::Put { x, y } => {
            client.submit_move(*x, *y)?;
            emit(args, &client.read_status()?);
        }
        Commands::Login { user, password } => {
            client.login(user, password)?;
            emit(args, &client.read_status()?);
        }
        Commands::Watch { count } => {
            let mut seen = 0;
            while *count == 0 || seen < *count {
                emit(args, &client.read_status()?);
                seen += 1;
            }
        }
    }
    Ok(())
}

/// Print a value as JSON or with its Display form
fn emit<V: Serialize + std::fmt::Display>(args: &Args, value: &V) {
    if args.json {
        match serde_json::to_string(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: could not encode result: {e}"),
        }
    } else {
        println!("{value}");
    }
}
