use clap::Parser;
use qr_forge::utils::error::{ErrorSeverity, QrForgeError};
use qr_forge::utils::{logger, validation::Validate};
use qr_forge::{CliConfig, LocalStorage, QrCodeEncoder, QrGenerator, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting qr-forge");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    match run(&cli, &config).await {
        Ok(Some(output_path)) => {
            tracing::info!("✅ QR code generated successfully!");
            println!("📁 Saved to: {}", output_path);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ QR generation failed: {} (Category: {:?}, Severity: {:?})",
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

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// Returns the saved file path, or `None` for a dry run.
async fn run(cli: &CliConfig, config: &TomlConfig) -> Result<Option<String>, QrForgeError> {
    let form = cli.input.to_form()?;

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be encoded or saved");
        let payload = form.to_payload(config.escaping())?;
        println!("{}", payload);
        return Ok(None);
    }

    let options = config.encode_options();
    let mut generator = QrGenerator::new(QrCodeEncoder::new())
        .with_options(options)
        .with_escaping(config.escaping());

    generator.submit(&form).await?;

    if let Some(qr) = generator.current() {
        if cli.print_payload {
            println!("{}", qr.payload);
        }
        if cli.preview {
            let preview = generator.encoder().preview(&qr.payload, &options)?;
            println!("{}", preview);
        }
        if cli.data_url {
            println!("{}", qr.image.to_data_url());
        }
    }

    let storage = LocalStorage::new(config.output_dir());
    let output_path = generator.download(&storage).await?;
    Ok(Some(output_path))
}
