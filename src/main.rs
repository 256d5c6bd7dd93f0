mod cli;

use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};

use cli::{Args, Command};

/// Start stderr logging. `RUST_LOG` wins when set; otherwise `-v` picks the level.
fn init_logging(verbose: u8) -> Option<LoggerHandle> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    match Logger::try_with_env_or_str(level).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: could not start logger: {}", e);
            None
        }
    }
}

fn main() {
    let args = Args::parse();
    let _logger = init_logging(args.verbose);

    let config_path = args.config.as_deref();

    let result = match args.command {
        Command::Render {
            input,
            output,
            render,
        } => cli::load_config(config_path)
            .and_then(|cfg| cli::run_render(&input, output.as_deref(), &render, &cfg)),
        Command::Generate {
            prompt,
            output,
            model,
            image_size,
            timeout,
            render,
        } => cli::load_config(config_path).and_then(|cfg| {
            cli::run_generate(
                &prompt,
                output.as_deref(),
                model,
                image_size,
                timeout,
                &render,
                &cfg,
            )
        }),
        Command::Charsets => {
            cli::list_charsets();
            Ok(())
        }
        Command::Config { action } => cli::handle_config_action(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
