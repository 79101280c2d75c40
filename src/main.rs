// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Zoneplan CLI entrypoint.
//!
//! By default this runs the terminal editor against the layout service at
//! `http://127.0.0.1:8000`. `zoneplan serve` runs that service.

use std::error::Error;
use std::fs::File;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use zoneplan::gateway::{HttpGateway, LayoutGateway, DEFAULT_SERVER_URL};
use zoneplan::server::DEFAULT_PORT;
use zoneplan::store::{LayoutFile, WriteDurability, DEFAULT_STORE_PATH};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--server <url> | --file <path>] [--durable-writes] [--log <path>]\n  {program} serve [--store <path>] [--port <port>] [--public] [--durable-writes]\n\nThe editor talks to the layout service at --server (default {DEFAULT_SERVER_URL}),\nor reads and writes a layout file directly with --file.\n--log writes diagnostics to a file; the terminal itself stays clean.\n\n`serve` answers GET /load-zones and POST /save-zones on 127.0.0.1:<port>\n(default {DEFAULT_PORT}; 0 = ephemeral; --public binds 0.0.0.0), storing the layout in\n--store (default {DEFAULT_STORE_PATH}). Set RUST_LOG to adjust logging.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    serve: bool,
    server_url: Option<String>,
    file: Option<String>,
    log: Option<String>,
    store: Option<String>,
    port: Option<u16>,
    public: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut first = true;

    while let Some(arg) = args.next() {
        let leading = std::mem::replace(&mut first, false);
        match arg.as_str() {
            "serve" if leading => options.serve = true,
            "--server" => {
                if options.server_url.is_some() {
                    return Err(());
                }
                options.server_url = Some(args.next().ok_or(())?);
            }
            "--file" => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(args.next().ok_or(())?);
            }
            "--log" => {
                if options.log.is_some() {
                    return Err(());
                }
                options.log = Some(args.next().ok_or(())?);
            }
            "--store" => {
                if options.store.is_some() {
                    return Err(());
                }
                options.store = Some(args.next().ok_or(())?);
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--public" => {
                if options.public {
                    return Err(());
                }
                options.public = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ => return Err(()),
        }
    }

    if options.server_url.is_some() && options.file.is_some() {
        return Err(());
    }

    let editor_only = options.server_url.is_some() || options.file.is_some() || options.log.is_some();
    let serve_only = options.store.is_some() || options.port.is_some() || options.public;
    if (options.serve && editor_only) || (!options.serve && serve_only) {
        return Err(());
    }

    Ok(options)
}

fn layout_file(path: String, durable_writes: bool) -> LayoutFile {
    let file = LayoutFile::new(path);
    if durable_writes {
        file.with_durability(WriteDurability::Durable)
    } else {
        file
    }
}

fn run_server(options: CliOptions) -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = layout_file(
        options.store.unwrap_or_else(|| DEFAULT_STORE_PATH.to_owned()),
        options.durable_writes,
    );
    let host = if options.public { "0.0.0.0" } else { "127.0.0.1" };
    let port = options.port.unwrap_or(DEFAULT_PORT);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind((host, port)).await?;
        let addr = listener.local_addr()?;
        tracing::info!(
            %addr,
            store = %store.path().display(),
            "layout service listening"
        );
        zoneplan::server::serve(listener, store, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "cannot listen for ctrl-c; stopping");
            }
        })
        .await?;
        tracing::info!("layout service stopped");
        Ok::<(), Box<dyn Error>>(())
    })
}

fn run_editor(options: CliOptions) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &options.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let gateway: Arc<dyn LayoutGateway> = match options.file {
        Some(path) => Arc::new(layout_file(path, options.durable_writes)),
        None => Arc::new(HttpGateway::new(
            options
                .server_url
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned()),
        )?),
    };
    tracing::info!(gateway = %gateway.describe(), "starting editor");
    zoneplan::tui::run(gateway)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "zoneplan".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.serve {
            run_server(options)
        } else {
            run_editor(options)
        }
    })();

    if let Err(err) = result {
        eprintln!("zoneplan: {err}");
        std::process::exit(1);
    }
}
