//! decor: Notion データベースの未装飾ページにアイコンとカバーを付ける CLI
//!
//! ローカルでは `.env` / 環境変数 / フラグから、GitHub Actions 上では
//! action inputs から認証情報を読む。

mod config;
mod hosted;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use decor_core::domain::BatchSummary;
use decor_core::impls::{NotionRecordSource, TracingEventSink};
use decor_core::ports::EventSink;
use decor_core::DecoratorBuilder;

use config::Cli;
use hosted::{ActionsEventSink, HostedContext};

#[tokio::main]
async fn main() -> ExitCode {
    let hosted = HostedContext::detect();
    if !hosted.is_active() {
        dotenvy::dotenv().ok();
    }
    init_tracing();

    let cli = Cli::parse();
    match run(&cli, &hosted).await {
        Ok(summary) => {
            tracing::debug!(
                skipped = summary.skipped,
                total = summary.total(),
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            hosted.set_failed(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, hosted: &HostedContext) -> anyhow::Result<BatchSummary> {
    let credentials = cli.credentials(hosted)?;
    let source = NotionRecordSource::new(credentials.api_key.clone()).with_base_url(&cli.api_base);
    let config = cli.run_config(credentials.database_id.clone());

    let events: Arc<dyn EventSink> = if hosted.is_active() {
        Arc::new(ActionsEventSink::new(Arc::new(TracingEventSink)))
    } else {
        Arc::new(TracingEventSink)
    };

    let orchestrator = DecoratorBuilder::new(Arc::new(source), config)
        .event_sink(events)
        .build()
        .context("invalid run configuration")?;

    orchestrator
        .run()
        .await
        .with_context(|| format!("decorating database {}", credentials.database_id))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("decor_cli=info,decor_core=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
