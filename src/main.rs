use std::io::{self, BufRead, Write};

use clap::Parser;
use log::{LevelFilter, debug, info};
use rb_aggregates::session::{Command, MENU, MenuChoice, Session, parse_value};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Interactive red-black tree over real numbers
#[derive(Parser, Debug)]
#[command(name = "rb-aggregates")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print the menu before each prompt
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Err(e) = TermLogger::init(
        filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

/// Prints `prompt` and reads one line, `None` at end of input
fn prompt_line(
    stdout: &mut impl Write,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    lines.next().transpose()
}

/// Runs the menu loop until `0` is chosen or `input` runs out
fn run(cli: &Cli, input: impl BufRead, mut stdout: impl Write) -> io::Result<()> {
    let mut lines = input.lines();
    let mut session = Session::new();

    loop {
        if !cli.quiet {
            write!(stdout, "{MENU}")?;
        }
        let Some(line) = prompt_line(&mut stdout, &mut lines, "Choose a mode: ")? else {
            break;
        };

        let choice = match line.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(e) => {
                debug!("rejected menu input: {e}");
                writeln!(stdout, "Invalid choice: {e}. Try again.")?;
                continue;
            }
        };

        let value = if choice.needs_value() {
            let Some(line) = prompt_line(&mut stdout, &mut lines, "Enter a real number: ")? else {
                break;
            };
            match parse_value(&line) {
                Ok(value) => value,
                Err(e) => {
                    debug!("rejected value input: {e}");
                    writeln!(stdout, "Invalid value: {e}. Try again.")?;
                    continue;
                }
            }
        } else {
            0.0
        };

        let reply = session.execute(choice.into_command(value));
        writeln!(stdout, "{reply}")?;

        if session.is_finished() {
            return Ok(());
        }
    }

    info!("end of input, closing session");
    writeln!(stdout)?;
    let reply = session.execute(Command::Exit);
    writeln!(stdout, "{reply}")
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli, io::stdin().lock(), io::stdout().lock()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> String {
        let cli = Cli {
            verbose: 0,
            quiet: true,
        };
        let mut output = Vec::new();
        run(&cli, script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_insert_reads_value_line() {
        let output = run_script("1\n10\n1\n20\n1\n30\n3\n5\n0\n");
        assert!(output.contains("Inserted 10."));
        assert!(output.contains("Inorder: 10(R) 20(B) 30(R)"));
        assert!(output.contains("Average: 20.0000"));
        assert!(output.ends_with("Shutting down.\n"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let output = run_script("9\n1\nabc\n1\n4.5\n3\n0\n");
        assert!(output.contains("Invalid choice: unknown menu choice `9`. Try again."));
        assert!(output.contains("Invalid value: `abc` is not a real number. Try again."));
        assert!(output.contains("Inorder: 4.5(B)"));
        assert!(output.ends_with("Shutting down.\n"));
    }

    #[test]
    fn test_exit_stops_reading() {
        let output = run_script("0\n1\n7\n3\n");
        assert_eq!(output, "Choose a mode: Shutting down.\n");
    }

    #[test]
    fn test_end_of_input_mid_insert_exits() {
        let output = run_script("1\n");
        assert!(output.ends_with("Enter a real number: \nShutting down.\n"));

        let output = run_script("");
        assert_eq!(output, "Choose a mode: \nShutting down.\n");
    }

    #[test]
    fn test_overflowing_average_is_infinite() {
        let output = run_script("1\n1e308\n1\n1e308\n5\n0\n");
        assert!(output.contains("Average: inf"));
    }
}
