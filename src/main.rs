// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pythia CLI entrypoint.
//!
//! By default this opens `<file>` in the interactive TUI, talking to the oracle server given by
//! `--server` (or `PYTHIA_SERVER`). `--query` runs a single query and prints the answer instead.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use pythia::backend::{decode_json, Backend, Query, QueryFormat};
use pythia::config::ClientConfig;
use pythia::controller::{InteractionController, OutputLine};
use pythia::logging::{self, LogTarget};
use pythia::model::{Mode, PositionDescriptor};
use pythia::session::Session;
use pythia::tui::{self, TuiTheme};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--server <url>] [--line <n>] <file>\n  {program} --demo [--line <n>]\n  {program} [--server <url>] --query <mode> --pos <file:#start[,#end]> [--json]\n  {program} --modes\n\nThe server defaults to $PYTHIA_SERVER, then http://127.0.0.1:8080/.\n--demo browses a built-in program without a server.\n--query prints the oracle's answer for one position; --json asks for the json format.\n--modes lists the query modes.\n\nSet PYTHIA_LOG (e.g. pythia=debug) to enable logging; the TUI logs to $PYTHIA_LOG_FILE."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    modes: bool,
    json: bool,
    server: Option<String>,
    line: Option<u32>,
    file: Option<String>,
    query: Option<Mode>,
    pos: Option<PositionDescriptor>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--modes" => {
                if options.modes {
                    return Err(());
                }
                options.modes = true;
            }
            "--json" => {
                if options.json {
                    return Err(());
                }
                options.json = true;
            }
            "--server" => {
                if options.server.is_some() {
                    return Err(());
                }
                options.server = Some(args.next().ok_or(())?);
            }
            "--line" => {
                if options.line.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let line: u32 = raw.parse().map_err(|_| ())?;
                if line == 0 {
                    return Err(());
                }
                options.line = Some(line);
            }
            "--query" => {
                if options.query.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.query = Some(raw.parse().map_err(|_| ())?);
            }
            "--pos" => {
                if options.pos.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.pos = Some(raw.parse().map_err(|_| ())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    let one_shot = options.query.is_some() || options.pos.is_some();
    if options.modes && options != (CliOptions { modes: true, ..CliOptions::default() }) {
        return Err(());
    }
    if one_shot {
        if options.query.is_none() || options.pos.is_none() {
            return Err(());
        }
        if options.demo || options.file.is_some() || options.line.is_some() {
            return Err(());
        }
    } else if options.json {
        return Err(());
    }
    if options.demo && (options.file.is_some() || options.server.is_some()) {
        return Err(());
    }
    if !options.modes && !options.demo && !one_shot && options.file.is_none() {
        return Err(());
    }

    Ok(options)
}

fn mode_catalog_lines() -> Vec<String> {
    Mode::ALL
        .iter()
        .map(|mode| format!("{:<11} {:<15} {}", mode.id(), mode.name(), mode.description()))
        .collect()
}

/// Renders a plain answer the way the output pane shows it, with link targets spelled out.
fn plain_answer_lines(body: &str) -> Vec<String> {
    let mut controller = InteractionController::new();
    controller.write_output(body);
    controller
        .output()
        .lines()
        .iter()
        .map(|line| match line {
            OutputLine::Link { label, target, .. } => format!("{label}  [{target}]"),
            OutputLine::Indented(text) | OutputLine::Verbatim(text) => text.clone(),
        })
        .collect()
}

fn run_query(config: &ClientConfig, query: Query) -> Result<(), Box<dyn Error>> {
    let backend = config.http_backend()?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let body = runtime.block_on(backend.query(&query))?;

    let mut stdout = io::stdout().lock();
    match query.format {
        QueryFormat::Json => {
            let value = decode_json(&body)?;
            writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        QueryFormat::Plain => {
            for line in plain_answer_lines(&body) {
                writeln!(stdout, "{line}")?;
            }
        }
    }
    Ok(())
}

fn run_tui<B: Backend>(
    backend: B,
    file: String,
    line: u32,
    config: &ClientConfig,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let product_title = config.product_title.clone();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(async move {
        let handle = tokio::runtime::Handle::current();
        let tui_join = tokio::task::spawn_blocking(move || {
            let mut session = Session::new(Arc::new(backend), handle, product_title);
            session.mount(file, line);
            tui::run(session, theme).map_err(|err| err.to_string())
        })
        .await;

        let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
        tui_result.map_err(|err| Box::new(io::Error::other(err)) as Box<dyn Error>)?;
        Ok::<(), Box<dyn Error>>(())
    })
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "pythia".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.modes {
            for line in mode_catalog_lines() {
                println!("{line}");
            }
            return Ok(());
        }

        let config = ClientConfig::resolve(options.server);

        if let (Some(mode), Some(pos)) = (options.query, options.pos) {
            logging::init(LogTarget::Stderr)?;
            let query = if options.json {
                Query::json(mode, pos)
            } else {
                Query::plain(mode, pos)
            };
            return run_query(&config, query);
        }

        logging::init(LogTarget::file_from_env())?;
        let line = options.line.unwrap_or(1);
        if options.demo {
            return run_tui(tui::demo_backend(), tui::DEMO_FILE.to_owned(), line, &config);
        }

        let file = options.file.unwrap_or_default();
        run_tui(config.http_backend()?, file, line, &config)
    })();

    if let Err(err) = result {
        eprintln!("pythia: {err}");
        std::process::exit(1);
    }
}
