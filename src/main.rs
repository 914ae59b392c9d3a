use anyhow::Context;
use clap::Parser;
use scholarship_import::config::{Command, ImportArgs, TemplateArgs};
use scholarship_import::core::pipeline::prepare_batch;
use scholarship_import::utils::error::{ErrorSeverity, ImportError};
use scholarship_import::utils::{logger, validation::Validate};
use scholarship_import::{template, BatchSummary, Cli, ImportEngine, LocalFile, UploadedFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting scholarship-import");
    if cli.verbose {
        tracing::debug!("CLI arguments: {:?}", cli);
    }

    match cli.command {
        Command::Import(args) => run_import(args).await,
        Command::Template(args) => write_template(args).await,
    }
}

async fn run_import(args: ImportArgs) -> anyhow::Result<()> {
    if let Err(e) = args.validate() {
        exit_with(&e);
    }

    let file = match &args.mime {
        Some(mime) => LocalFile::with_mime_type(&args.file, mime.clone()),
        None => LocalFile::new(&args.file),
    };
    tracing::info!("📄 Importing {} ({})", file.path().display(), file.mime_type());

    let config = match args.store_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if args.dry_run {
        let max_records = config
            .as_ref()
            .map_or(args.max_records, |c| c.max_records());

        match prepare_batch(&file, max_records).await {
            Ok(batch) => {
                println!("{}", BatchSummary::of(&batch));
                println!("Dry run: nothing was submitted");
                return Ok(());
            }
            Err(e) => exit_with(&e),
        }
    }

    let Some(config) = config else {
        exit_with(&ImportError::MissingConfigError {
            field: "--config or --store-file".to_string(),
        });
    };

    let store = match config.build_store() {
        Ok(store) => store,
        Err(e) => exit_with(&e),
    };

    let engine = ImportEngine::new(store).with_max_records(config.max_records());
    let result = engine.run(&file).await;

    if result.success {
        println!("✅ {}", result.message);
        Ok(())
    } else {
        eprintln!("❌ {}", result.message);
        std::process::exit(1);
    }
}

async fn write_template(args: TemplateArgs) -> anyhow::Result<()> {
    let json = template::to_pretty_json().context("failed to render template")?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("failed to write template to {}", path.display()))?;
            tracing::info!("📁 Template saved to: {}", path.display());
            println!("📁 Template saved to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn exit_with(e: &ImportError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
