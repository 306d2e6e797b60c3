use api_client::{
    AlbumPatch, ApiClient, DirKind, Directory, Hash, Location, NewAlbum, Photograph,
    PlannedAction, Resource, TimeLoc,
};
use browser::photographs::DatePath;
use browser::{albums, bulk, photo_paths, photographs, BulkPolicy, Message, Shell};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hierarchy::SortKey;
use photocat::config::{AppConfig, AppConfigOverrides};
use photocat::render;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "photocat",
    author,
    version,
    about = "Browse a photo catalog by directory, capture date and album"
)]
struct Cli {
    /// Override the catalog API base URL
    #[arg(long)]
    api_url: Option<String>,
    /// Override log level (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
    /// Where levels are computed: server or client
    #[arg(long)]
    grouping: Option<String>,
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse photographs by capture date, or act on them
    Photos {
        #[command(subcommand)]
        action: Option<PhotoAction>,
        #[command(flatten)]
        level: DateArgs,
        #[command(flatten)]
        order: SortArgs,
    },
    /// Browse photo paths by directory
    Paths {
        /// Directory to list; the root when omitted
        prefix: Option<String>,
        #[command(flatten)]
        order: SortArgs,
    },
    /// Manage albums
    Albums {
        #[command(subcommand)]
        action: AlbumAction,
    },
    /// Dump other catalog records as JSON lines
    Catalog {
        #[command(subcommand)]
        kind: CatalogKind,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[derive(Args)]
struct DateArgs {
    /// Capture year
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=9999))]
    year: Option<u16>,
    /// Capture month, needs --year
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u8).range(1..=12))]
    month: Option<u8>,
    /// Capture day, needs --month
    #[arg(long, requires = "month", value_parser = clap::value_parser!(u8).range(1..=31))]
    day: Option<u8>,
    /// Photographs without a usable capture time
    #[arg(long, conflicts_with = "year")]
    unknown: bool,
}

impl DateArgs {
    fn date_path(&self) -> DatePath {
        if self.unknown {
            return DatePath::Unknown;
        }
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => {
                DatePath::Day(format!("{:04}", y), format!("{:02}", m), format!("{:02}", d))
            }
            (Some(y), Some(m), None) => DatePath::Month(format!("{:04}", y), format!("{:02}", m)),
            (Some(y), None, _) => DatePath::Year(format!("{:04}", y)),
            _ => DatePath::Root,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortField {
    Id,
    Time,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Id => SortKey::Id,
            SortField::Time => SortKey::Time,
        }
    }
}

#[derive(Args)]
struct SortArgs {
    /// Sort shown items by
    #[arg(long, value_enum, default_value = "id")]
    sort: SortField,
    /// Sort descending
    #[arg(long)]
    desc: bool,
}

#[derive(Subcommand)]
enum PhotoAction {
    /// Mark photographs for deletion
    Delete {
        #[arg(required = true)]
        ids: Vec<u64>,
        /// Keep going after a failed request
        #[arg(long)]
        keep_going: bool,
    },
    /// Have the server hash the image files of photographs
    Hash {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

#[derive(Subcommand)]
enum AlbumAction {
    /// List all albums
    List,
    /// Create an album
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Rename an album or change its description
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an album
    Delete { id: u64 },
    /// Add photographs to an album
    Add {
        album: u64,
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Remove photographs from an album
    Remove {
        album: u64,
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Albums shared by all given photographs
    Common {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

#[derive(Subcommand)]
enum CatalogKind {
    Hashes {
        #[arg(long)]
        id: Option<u64>,
    },
    Directories {
        #[arg(long)]
        id: Option<u64>,
    },
    DirKinds {
        #[arg(long)]
        id: Option<u64>,
    },
    Locations {
        #[arg(long)]
        id: Option<u64>,
    },
    TimeLocs {
        #[arg(long)]
        id: Option<u64>,
    },
    PlannedActions {
        #[arg(long)]
        id: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg_attr(feature = "trace-spans", tracing::instrument(skip_all))]
async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let overrides = AppConfigOverrides {
        api_base_url: cli.api_url.clone(),
        log_level: cli.log_level.clone(),
        grouping: cli.grouping.clone(),
    };
    let cfg = AppConfig::load_from(cli.config.clone())?.apply_overrides(&overrides);
    let mode = cfg.grouping_mode()?;
    let _guard = init_logging(&cfg)?;
    tracing::debug!(api = %cfg.api_base_url, %mode, "Configuration loaded");

    let client = Arc::new(ApiClient::new(cfg.api_base_url.clone()));
    let mut shell = Shell::new(mode);

    match cli.command {
        Commands::ShowConfig => {
            print!("{}", toml::to_string(&cfg)?);
        }
        Commands::Photos {
            action: Some(PhotoAction::Delete { ids, keep_going }),
            ..
        } => {
            let policy = if keep_going {
                BulkPolicy::Continue
            } else {
                BulkPolicy::StopOnFirstFailure
            };
            let report = bulk::delete_photographs(&client, &ids, policy).await;
            print!("{}", render::bulk_report(&report));
            if let Some(e) = report.first_error() {
                let failed = report.failed().len();
                return Err(format!("{} of {} deletions failed: {}", failed, ids.len(), e).into());
            }
        }
        Commands::Photos {
            action: Some(PhotoAction::Hash { ids }),
            ..
        } => {
            for id in ids {
                let computed = client.compute_hash(id).await?;
                println!("{} {}", id, computed.hash);
            }
        }
        Commands::Photos {
            action: None,
            level,
            order,
        } => {
            let mut messages = vec![
                photographs::Message::SetSortKey(order.sort.into()),
                photographs::Message::Jump(level.date_path()),
            ];
            if order.desc {
                messages.push(photographs::Message::ToggleDirection);
            }
            shell
                .drive(client, messages.into_iter().map(Message::Photographs))
                .await;
            print!("{}", render::photographs(shell.photographs())?);
        }
        Commands::Paths { prefix, order } => {
            let mut messages = vec![
                photo_paths::Message::SetSortKey(order.sort.into()),
                photo_paths::Message::Jump(prefix.unwrap_or_default()),
            ];
            if order.desc {
                messages.push(photo_paths::Message::ToggleDirection);
            }
            shell
                .drive(client, messages.into_iter().map(Message::PhotoPaths))
                .await;
            print!("{}", render::photo_paths(shell.photo_paths())?);
        }
        Commands::Albums { action } => run_albums(&mut shell, client, action).await?,
        Commands::Catalog { kind } => match kind {
            CatalogKind::Hashes { id } => print_records::<Hash>(&client, id).await?,
            CatalogKind::Directories { id } => print_records::<Directory>(&client, id).await?,
            CatalogKind::DirKinds { id } => print_records::<DirKind>(&client, id).await?,
            CatalogKind::Locations { id } => print_records::<Location>(&client, id).await?,
            CatalogKind::TimeLocs { id } => print_records::<TimeLoc>(&client, id).await?,
            CatalogKind::PlannedActions { id } => {
                print_records::<PlannedAction>(&client, id).await?
            }
        },
    }

    Ok(())
}

async fn run_albums(
    shell: &mut Shell,
    client: Arc<ApiClient>,
    action: AlbumAction,
) -> Result<(), Box<dyn Error>> {
    let message = match action {
        AlbumAction::List => albums::Message::Refresh,
        AlbumAction::Create { name, description } => {
            albums::Message::Create(NewAlbum { name, description })
        }
        AlbumAction::Update {
            id,
            name,
            description,
        } => {
            let patch = AlbumPatch { name, description };
            if patch.is_empty() {
                return Err("Nothing to update: pass --name or --description".into());
            }
            albums::Message::Update(id, patch)
        }
        AlbumAction::Delete { id } => albums::Message::Delete(id),
        AlbumAction::Add { album, ids } => {
            bulk::add_to_album(&client, album, &ids).await?;
            println!("Added {} photographs to album {}", ids.len(), album);
            return Ok(());
        }
        AlbumAction::Remove { album, ids } => {
            bulk::remove_from_album(&client, album, &ids).await?;
            println!("Removed {} photographs from album {}", ids.len(), album);
            return Ok(());
        }
        AlbumAction::Common { ids } => {
            let mut selected = Vec::with_capacity(ids.len());
            for id in ids {
                selected.push(client.get::<Photograph>(id).await?);
            }
            shell
                .drive(client, [Message::Albums(albums::Message::Refresh)])
                .await;
            let view = shell.albums();
            if let Some(e) = view.state().error() {
                return Err(e.into());
            }
            print!("{}", render::albums(view.common_to(&selected)));
            return Ok(());
        }
    };

    shell.drive(client, [Message::Albums(message)]).await;
    let view = shell.albums();
    print!("{}", render::albums(view.albums()));
    if let Some(e) = view.last_error().or_else(|| view.state().error()) {
        return Err(e.into());
    }
    Ok(())
}

async fn print_records<T>(client: &ApiClient, id: Option<u64>) -> Result<(), Box<dyn Error>>
where
    T: Resource + Serialize,
{
    let records = match id {
        Some(id) => vec![client.get::<T>(id).await?],
        None => client.fetch_all::<T>(&[]).await?,
    };
    if records.is_empty() {
        println!("{}", render::NOTHING_HERE);
    }
    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

/// Logs go to stderr and to a daily file in `log_dir`; the guard flushes the file.
fn init_logging(
    cfg: &AppConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn Error>> {
    std::fs::create_dir_all(&cfg.log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&cfg.log_dir, "photocat.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    #[cfg(feature = "tokio-console")]
    {
        let _ = file_writer;
        console_subscriber::init();
    }
    #[cfg(not(feature = "tokio-console"))]
    {
        use tracing_subscriber::fmt::writer::MakeWriterExt;
        use tracing_subscriber::EnvFilter;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(cfg.log_level.clone()))
            .with_writer(std::io::stderr.and(file_writer))
            .init();
    }
    tracing::debug!(dir = ?cfg.log_dir, "Logging initialized");
    Ok(guard)
}
