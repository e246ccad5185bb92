use std::{fs, io::Read, path::PathBuf, sync::Arc, time::Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{self, Settings},
    form::{SubmissionForm, WordCountTier},
    pages::{
        DetailPage, DetailState, HistoryPage, HistoryState, SubmissionEvent, SubmissionPage,
        SubmissionState,
    },
    render::{format_timestamp, CopyAcknowledgement, DetailView, ResultView},
    EsApi, EsClient,
};
use shared::{
    domain::{EntryId, Industry, QuestionType},
    protocol::PageQuery,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "es-cli", about = "Entry-sheet analysis client")]
struct Cli {
    /// Overrides the configured backend base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit an entry sheet for analysis. Reads the body from stdin when
    /// neither --content nor --content-file is given.
    Analyze {
        #[arg(long, default_value = "ガクチカ")]
        question_type: QuestionType,
        #[arg(long)]
        question: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        industry: Option<Industry>,
        /// Copy the improved text to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    History,
    Detail {
        id: i64,
    },
    Entries {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings_from(&cli.config)?;
    if let Some(url) = cli.api_base_url {
        settings = settings.with_base_url(url).validated()?;
    }
    info!(api_base_url = %settings.api_base_url, "es-cli: using backend");
    let api: Arc<dyn EsApi> = Arc::new(EsClient::new(&settings)?);

    match cli.command {
        Command::Analyze {
            question_type,
            question,
            content,
            content_file,
            company,
            industry,
            copy,
        } => {
            let content = match (content, content_file) {
                (Some(content), _) => content,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read '{}'", path.display()))?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read ES body from stdin")?;
                    buf
                }
            };

            let mut form = SubmissionForm::new();
            form.set_question_type(question_type);
            form.set_question_text(question);
            form.set_content(content);
            if let Some(company) = company {
                form.set_company_name(company);
            }
            if let Some(industry) = industry {
                form.toggle_industry(industry);
            }
            analyze(api, &form, copy).await?;
        }
        Command::History => history(api, &settings).await?,
        Command::Detail { id } => detail(api, EntryId(id)).await?,
        Command::Entries { skip, limit } => {
            let entries = api.list_entries(PageQuery { skip, limit }).await?;
            if entries.is_empty() {
                println!("No entries.");
            }
            for entry in entries {
                println!(
                    "#{:<5} {}  {}  ({} chars, {})",
                    entry.id,
                    entry.question_type,
                    entry.question_text,
                    entry.word_count,
                    format_timestamp(&entry.created_at)
                );
            }
        }
    }

    Ok(())
}

async fn analyze(api: Arc<dyn EsApi>, form: &SubmissionForm, copy: bool) -> Result<()> {
    let tier = match form.word_count_tier() {
        WordCountTier::Empty => "empty",
        WordCountTier::Short => "short",
        WordCountTier::Sufficient => "sufficient",
    };
    println!("{} chars ({tier})", form.word_count());
    if let Some(industry) = form.industry() {
        println!(
            "Optimizing for {industry}: {}",
            industry.emphasis()
        );
    }

    let page = SubmissionPage::new(api);
    let mut events = page.subscribe_events();
    page.submit(form).await?;

    while let Ok(SubmissionEvent::ResultReady { entry_id }) = events.try_recv() {
        println!("\n=== Analysis #{entry_id} ===\n");
    }

    match page.state().await {
        SubmissionState::Success(record) => {
            print!("{}", ResultView::from_record(&record));
            if copy {
                let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
                clipboard.set_text(record.analysis.improved_content.clone())?;
                let mut ack = CopyAcknowledgement::default();
                let now = Instant::now();
                ack.mark_copied(now);
                println!("\n[{}]", ack.button_label(now));
            }
            Ok(())
        }
        SubmissionState::Failure(message) => bail!(message),
        SubmissionState::Idle | SubmissionState::Loading => bail!("analysis did not complete"),
    }
}

async fn history(api: Arc<dyn EsApi>, settings: &Settings) -> Result<()> {
    let page = HistoryPage::with_query(
        api,
        PageQuery {
            skip: 0,
            limit: settings.history_limit,
        },
    );
    page.load().await;

    match page.state().await {
        HistoryState::Empty => println!("No analyses yet. Run `es-cli analyze` to create one."),
        HistoryState::List(_) => {
            for row in page.rows().await {
                println!("{row}");
            }
        }
        HistoryState::Failure(message) => bail!(message),
        HistoryState::Loading => bail!("history did not load"),
    }
    Ok(())
}

async fn detail(api: Arc<dyn EsApi>, entry_id: EntryId) -> Result<()> {
    let page = DetailPage::new(api);
    page.open(entry_id).await;

    match page.state().await {
        DetailState::Found(record) => print!("{}", DetailView::from_record(&record)),
        DetailState::NotFound => bail!("entry #{entry_id} was not found"),
        DetailState::Failure(message) => bail!(message),
        DetailState::Loading => bail!("entry did not load"),
    }
    Ok(())
}
