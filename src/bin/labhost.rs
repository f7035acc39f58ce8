use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use labhost_core::launch::{launch, LaunchKind, Outbound, OutboundError};
use labhost_core::model::{HostFields, HostRecord};
use labhost_core::probe::{Prober, SweepObserver};
use labhost_core::store::{export_filename, resolve_host, HostQuery, Store};
use labhost_core::validation::{parse_port, parse_tags};
use labhost_core::FileBackend;

#[derive(Parser)]
#[command(name = "labhost", about = "Lab host bookmarks and reachability checks")]
struct Cli {
    /// Directory holding the persisted documents
    #[arg(long, value_name = "DIR", env = "LABHOST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Args)]
struct HostArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long, value_name = "ADDRESS")]
    ip: Option<String>,
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    rdp_user: Option<String>,
    /// Environment id
    #[arg(long = "env", value_name = "ID")]
    environment: Option<String>,
    /// Comma separated
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    pinned: Option<bool>,
}

impl HostArgs {
    /// Overlay the given flags on `fields`.
    fn apply(self, mut fields: HostFields) -> Result<HostFields> {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(ip) = self.ip {
            fields.ip = ip;
        }
        if let Some(port) = self.port {
            fields.port = parse_port(&port)?;
        }
        if let Some(user) = self.rdp_user {
            fields.rdp_user = Some(user);
        }
        if let Some(env) = self.environment {
            fields.environment_id = Some(env);
        }
        if let Some(tags) = self.tags {
            fields.tags = parse_tags(&tags);
        }
        if let Some(notes) = self.notes {
            fields.notes = notes;
        }
        if let Some(pinned) = self.pinned {
            fields.pinned = pinned;
        }
        Ok(fields)
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// List hosts, pinned first
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long = "env", value_name = "ID")]
        environment: Option<String>,
    },
    /// Add a host
    Add(HostArgs),
    /// Edit (or move) a host
    Edit {
        id: String,
        #[command(flatten)]
        args: HostArgs,
    },
    /// Delete a host
    Rm { id: String },
    /// Add an environment
    EnvAdd { name: String },
    /// Probe one host by id or name
    Probe { host: String },
    /// Probe every host in order
    Sweep {
        /// Run even when health probing is disabled
        #[arg(long)]
        force: bool,
    },
    /// Export the document (defaults to a dated file name)
    Export { path: Option<PathBuf> },
    /// Replace the document with an export file
    Import { path: PathBuf },
    /// Launch a host by id or name
    Open {
        host: String,
        #[arg(long, default_value = "web")]
        action: LaunchKind,
    },
    /// Show or change settings
    Settings {
        #[arg(long)]
        enable_probe: Option<bool>,
        #[arg(long)]
        dark_mode: Option<bool>,
        #[arg(long)]
        ssh_user: Option<String>,
        #[arg(long)]
        rdp_user: Option<String>,
        #[arg(long)]
        ssh_port: Option<u16>,
        #[arg(long)]
        rdp_port: Option<u16>,
        /// Restore the defaults
        #[arg(long)]
        reset: bool,
    },
    /// Remove all hosts and environments
    Clear,
    /// Host, environment and tag counts
    Stats,
}

/// Terminal stand-in for the browser surfaces.
struct Terminal;

impl Outbound for Terminal {
    fn open_url(&self, url: &str) -> Result<(), OutboundError> {
        println!("{}", url);
        Ok(())
    }

    fn copy_text(&self, text: &str) -> Result<(), OutboundError> {
        println!("{}", text);
        Ok(())
    }

    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

struct Progress;

impl SweepObserver for Progress {
    fn on_checking(&self, host: &HostRecord) {
        eprintln!("checking {} ({})", host.name, host.ip);
    }

    fn on_committed(&self, host: &HostRecord) {
        println!("{}", status_line(host));
    }
}

fn status_line(host: &HostRecord) -> String {
    let method = host
        .health_method
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    let time = host
        .response_time_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<8} {:<24} {:<20} {:<10} {}",
        host.health_status.as_str(),
        host.name,
        host.ip,
        method,
        time
    )
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().unwrap_or(std::env::current_dir()?);
    Ok(base.join("labhost"))
}

async fn lookup(store: &Store<FileBackend>, text: &str) -> Result<HostRecord> {
    let doc = store.load().await;
    resolve_host(&doc, text)
        .cloned()
        .ok_or_else(|| anyhow!("no host matches {:?}", text))
}

#[tokio::main]
async fn main() -> Result<()> {
    labhost_core::init_logger();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let store = Store::new(FileBackend::new(&data_dir));

    match cli.cmd {
        Cmd::List {
            search,
            tags,
            environment,
        } => {
            let mut query = HostQuery::new().search(search.as_deref().unwrap_or(""));
            for tag in &tags {
                query = query.tag(tag);
            }
            if let Some(env) = environment {
                query = query.environment(&env);
            }
            let doc = store.load().await;
            for host in query.run(&doc) {
                let pin = if host.pinned { "*" } else { " " };
                println!(
                    "{} {}  [{}]  {}",
                    pin,
                    host.id,
                    doc.environment_name(&host.environment_id),
                    status_line(host)
                );
            }
        }
        Cmd::Add(args) => {
            let fields = args.apply(HostFields::default())?;
            let env = fields.environment_id.clone().unwrap_or_default();
            let host = store.add_host(&env, fields).await?;
            println!("{}", host.id);
        }
        Cmd::Edit { id, args } => {
            let current = lookup(&store, &id).await?;
            let fields = args.apply(HostFields::from_record(&current))?;
            let host = store.move_or_update_host(&current.id, fields).await?;
            println!("{}", host.id);
        }
        Cmd::Rm { id } => {
            let host = lookup(&store, &id).await?;
            store.delete_host(&host.id).await?;
        }
        Cmd::EnvAdd { name } => {
            let env = store.add_environment(&name).await?;
            println!("{}", env.id);
        }
        Cmd::Probe { host } => {
            let host = lookup(&store, &host).await?;
            let prober = Prober::network()?;
            let host = store.probe_host(&prober, &host.id).await?;
            println!("{}", status_line(&host));
        }
        Cmd::Sweep { force } => {
            let prober = Prober::network()?;
            let summary = if force {
                Some(store.sweep(&prober, &Progress).await)
            } else {
                store.sweep_if_enabled(&prober, &Progress).await
            };
            match summary {
                Some(s) => eprintln!(
                    "{} checked, {} online, {} offline",
                    s.checked, s.online, s.offline
                ),
                None => eprintln!("health probing is disabled (use --force or settings --enable-probe true)"),
            }
        }
        Cmd::Export { path } => {
            let path =
                path.unwrap_or_else(|| PathBuf::from(export_filename(Utc::now().date_naive(), false)));
            let text = store.export_json().await?;
            tokio::fs::write(&path, text)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
        }
        Cmd::Import { path } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let doc = store.import_json(&text).await?;
            println!("imported {} hosts", doc.host_count());
        }
        Cmd::Open { host, action } => {
            let host = lookup(&store, &host).await?;
            let settings = store.load_settings().await;
            launch(&Terminal, action, &host, &settings)?;
        }
        Cmd::Settings {
            enable_probe,
            dark_mode,
            ssh_user,
            rdp_user,
            ssh_port,
            rdp_port,
            reset,
        } => {
            let settings = if reset {
                store.reset_settings().await?
            } else {
                let mut settings = store.load_settings().await;
                let changed = enable_probe.is_some()
                    || dark_mode.is_some()
                    || ssh_user.is_some()
                    || rdp_user.is_some()
                    || ssh_port.is_some()
                    || rdp_port.is_some();
                settings.enable_health_probe = enable_probe.unwrap_or(settings.enable_health_probe);
                settings.enable_dark_mode = dark_mode.unwrap_or(settings.enable_dark_mode);
                settings.default_ssh_user = ssh_user.unwrap_or(settings.default_ssh_user);
                settings.default_rdp_user = rdp_user.unwrap_or(settings.default_rdp_user);
                settings.default_ssh_port = ssh_port.unwrap_or(settings.default_ssh_port);
                settings.default_rdp_port = rdp_port.unwrap_or(settings.default_rdp_port);
                if changed {
                    store.save_settings(settings).await?
                } else {
                    settings
                }
            };
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Cmd::Clear => {
            store.clear().await?;
        }
        Cmd::Stats => {
            let doc = store.load().await;
            let stats = doc.stats();
            println!(
                "{} hosts, {} environments, {} tags",
                stats.hosts, stats.environments, stats.tags
            );
            let tags: Vec<&str> = doc.all_tags().into_iter().collect();
            if !tags.is_empty() {
                println!("tags: {}", tags.join(", "));
            }
        }
    }

    Ok(())
}

