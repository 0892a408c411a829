//! `cmpdesk` - CLI for complaintdesk
//!
//! This binary submits, lists and searches hospital complaints kept in the
//! local origin store, and can run an interactive desk session.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use complaintdesk::cli::{session, Cli, Command, ConfigCommand, OutputFormat, SubmitCommand};
use complaintdesk::render::{self, Style};
use complaintdesk::{
    init_logging, ComplaintDesk, Config, DeskSettings, RecordStore, SlotRecordStore, SqliteSlots,
    Urgency,
};

type Desk = ComplaintDesk<SlotRecordStore<SqliteSlots>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation reports a broken file instead of failing to load it
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        handle_validate(file.clone().or_else(|| cli.config.clone()));
        return Ok(());
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Submit(cmd) => handle_submit(&config, &cmd),
        Command::List(cmd) => handle_list(&config, cmd.search.as_deref(), cmd.format),
        Command::Search(cmd) => handle_list(&config, Some(&cmd.keyword), cmd.format),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Session => handle_session(&config).await,
        Command::Config(cmd) => handle_config(&config, &cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<SlotRecordStore<SqliteSlots>> {
    let slots = SqliteSlots::open(config.database_path())?.with_quota(config.quota());
    Ok(SlotRecordStore::with_key(slots, &config.storage.slot_key))
}

fn open_desk(config: &Config) -> anyhow::Result<Desk> {
    let store = open_store(config)?;
    Ok(ComplaintDesk::mount(store, DeskSettings::from(config))?)
}

fn style(config: &Config, desk: &Desk) -> Style {
    Style {
        theme: desk.theme(),
        color: config.display.color && std::io::stdout().is_terminal(),
    }
}

fn handle_submit(config: &Config, cmd: &SubmitCommand) -> anyhow::Result<()> {
    let mut desk = open_desk(config)?;
    for edit in cmd.edits() {
        desk.edit(edit);
    }

    let notice = desk.submit()?;
    desk.teardown();

    if cmd.json {
        let output = serde_json::json!({
            "notice": notice,
            "record": desk.records().last(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render::celebration(style(config, &desk)));
        println!("{}", render::notice(&notice));
    }

    if !notice.durable {
        bail!("complaint {} was not saved to {}", notice.id, config.database_path().display());
    }
    Ok(())
}

fn handle_list(config: &Config, keyword: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    let mut desk = open_desk(config)?;
    if let Some(keyword) = keyword {
        desk.set_search(keyword);
    }

    let view = desk.view();
    let output = match format {
        OutputFormat::Plain => render::plain(&view),
        OutputFormat::Table => render::table(&view, style(config, &desk)),
        OutputFormat::Json => render::json(&view)?,
    };
    println!("{output}");
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let info = store.backend().slot_info(store.key())?;
    let records = store.load();

    let count = |urgency: Urgency| records.iter().filter(|r| r.urgency == urgency).count();
    let high = count(Urgency::High);
    let medium = count(Urgency::Medium);
    let low = count(Urgency::Low);
    let bytes = info.as_ref().map_or(0, |i| i.bytes);
    let updated_at = info.as_ref().and_then(|i| i.updated_at);

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "slot_key": store.key(),
            "records": records.len(),
            "payload_bytes": bytes,
            "quota_bytes": config.quota(),
            "updated_at": updated_at.map(|t| t.to_rfc3339()),
            "by_urgency": { "high": high, "medium": medium, "low": low },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("cmpdesk status");
        println!("--------------");
        println!("Database:      {}", config.database_path().display());
        println!("Slot:          {}", store.key());
        println!("Complaints:    {}", records.len());
        match config.quota() {
            Some(quota) => println!("Payload:       {bytes} / {quota} bytes"),
            None => println!("Payload:       {bytes} bytes"),
        }
        match updated_at {
            Some(t) => println!("Last write:    {}", t.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last write:    never"),
        }
        println!("By urgency:    High {high}, Medium {medium}, Low {low}");
    }
    Ok(())
}

async fn handle_session(config: &Config) -> anyhow::Result<()> {
    let mut desk = open_desk(config)?;
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    let color = config.display.color && out.is_terminal();

    session::run(&mut desk, input, &mut out, color).await?;
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                match config.quota() {
                    Some(quota) => println!("  Quota (bytes):      {quota}"),
                    None => println!("  Quota (bytes):      unlimited"),
                }
                println!();
                println!("[Form]");
                println!("  Notice (ms):        {}", config.form.notice_duration_ms);
                println!("  Id redraws:         {}", config.form.id_redraws);
                println!();
                println!("[Display]");
                println!("  Theme:              {}", config.display.theme);
                println!("  Color:              {}", config.display.color);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            handle_validate(file.clone());
        }
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}
