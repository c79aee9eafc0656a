use std::{env, io, process};

use seat_eng::csv::{read_commands, write_bookings};
use seat_eng::{Engine, Route};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: seat-eng [--chart] <commands.csv>";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut chart = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--chart" => chart = true,
            _ if path.is_none() => path = Some(arg),
            _ => {
                eprintln!("{USAGE}");
                process::exit(2);
            }
        }
    }
    let Some(path) = path else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let route = Route::from_env().unwrap_or_else(|e| {
        error!("invalid route configuration: {e}");
        process::exit(1);
    });

    let commands = read_commands(path.clone()).unwrap_or_else(|e| {
        error!(path, "{e}");
        process::exit(1);
    });

    let mut engine = Engine::new(route);
    let (cmd_sender, cmd_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in commands {
            match result {
                Ok(command) => {
                    if cmd_sender.send(command).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine.run(ReceiverStream::new(cmd_receiver)).await;

    if chart {
        print!("{}", engine.chart_snapshot());
    } else if let Err(e) = write_bookings(io::stdout().lock(), engine.bookings(), engine.waitlist())
    {
        error!("failed to write bookings: {e}");
        process::exit(1);
    }
}
