use lenslink::{cleanup_sessions, complete_bookings, init_tracing, Config};

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} <cleanup-sessions|complete-bookings>");
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args();
    let bin_name = args.next().unwrap_or_else(|| "cron".to_string());
    let command = args.next();

    let command = match command {
        Some(command) if args.next().is_none() => command,
        _ => {
            print_usage(&bin_name);
            std::process::exit(2);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    match command.as_str() {
        "cleanup-sessions" => match cleanup_sessions(&config).await {
            Ok(result) => {
                println!("Session cleanup completed: sessions_removed={}", result.sessions_removed);
            }
            Err(err) => {
                eprintln!("Cron job failed: {err}");
                std::process::exit(1);
            }
        },
        "complete-bookings" => match complete_bookings(&config).await {
            Ok(result) => {
                println!(
                    "Booking completion completed: bookings_examined={}, bookings_completed={}",
                    result.bookings_examined, result.bookings_completed
                );
            }
            Err(err) => {
                eprintln!("Cron job failed: {err}");
                std::process::exit(1);
            }
        },
        _ => {
            print_usage(&bin_name);
            std::process::exit(2);
        }
    }
}
